//! # Analytics Engine
//!
//! $$
//! \mathbf{w}^\* = \operatorname{Optimize}(\mu, \Sigma)
//! $$
//!
//! Configured entry point over the stateless analytics functions. Every call
//! is a pure function of its arguments plus the shared configuration; the
//! engine holds no mutable state and is safe to use from parallel callers.

use crate::attribution::brinson_attribution;
use crate::attribution::calculate_alpha;
use crate::attribution::calculate_beta;
use crate::attribution::calculate_information_ratio;
use crate::attribution::calculate_tracking_error;
use crate::decomposition::decompose_risk;
use crate::optimizers::calculate_efficient_frontier;
use crate::optimizers::optimize_portfolio;
use crate::rebalancing::suggest_rebalancing;
use crate::rebalancing::RebalancingConfig;
use crate::risk::calculate_expected_shortfall;
use crate::risk::calculate_var_with_simulations;
use crate::risk::risk_metrics;
use crate::risk::stress_test;
use crate::risk::MC_SIMULATIONS;
use crate::types::AttributionResult;
use crate::types::EfficientFrontier;
use crate::types::Metric;
use crate::types::OptimizationObjective;
use crate::types::OptimizationResult;
use crate::types::RebalancingPlan;
use crate::types::RiskDecomposition;
use crate::types::RiskMetrics;
use crate::types::StressImpact;
use crate::types::StressScenario;
use crate::types::VarMethod;
use crate::types::WeightBounds;

/// Runtime configuration for [`AnalyticsEngine`].
#[derive(Clone, Debug)]
pub struct AnalyticsConfig {
  /// Risk-free rate used in Sharpe, alpha and the Sharpe objective.
  pub risk_free: f64,
  /// Monte Carlo VaR draw count.
  pub mc_simulations: usize,
  /// Seed for Monte Carlo draws; `None` leaves runs non-reproducible.
  pub mc_seed: Option<u64>,
  /// Point count for [`AnalyticsEngine::efficient_frontier`].
  pub frontier_points: usize,
}

impl Default for AnalyticsConfig {
  fn default() -> Self {
    Self {
      risk_free: 0.0,
      mc_simulations: MC_SIMULATIONS,
      mc_seed: None,
      frontier_points: 25,
    }
  }
}

/// Single entry-point engine for risk, optimization, attribution and
/// rebalancing analytics.
#[derive(Clone, Debug)]
pub struct AnalyticsEngine {
  config: AnalyticsConfig,
}

impl AnalyticsEngine {
  /// Construct a new engine with explicit configuration.
  pub fn new(config: AnalyticsConfig) -> Self {
    Self { config }
  }

  /// Borrow engine configuration.
  pub fn config(&self) -> &AnalyticsConfig {
    &self.config
  }

  /// Value at Risk under the selected methodology.
  pub fn var(&self, returns: &[f64], confidence_level: f64, method: VarMethod) -> Metric {
    calculate_var_with_simulations(
      returns,
      confidence_level,
      method,
      self.config.mc_seed,
      self.config.mc_simulations,
    )
  }

  /// Expected shortfall beyond the historical VaR threshold.
  pub fn expected_shortfall(&self, returns: &[f64], confidence_level: f64) -> Metric {
    calculate_expected_shortfall(returns, confidence_level)
  }

  /// Cumulative portfolio impact of named shock scenarios.
  pub fn stress_test(
    &self,
    weights: &[f64],
    asset_returns: &[Vec<f64>],
    scenarios: &[StressScenario],
  ) -> Vec<StressImpact> {
    stress_test(weights, asset_returns, scenarios)
  }

  /// Flat risk/performance summary of a return series against a market.
  pub fn risk_metrics(&self, returns: &[f64], market_returns: &[f64]) -> Option<RiskMetrics> {
    risk_metrics(returns, market_returns, self.config.risk_free)
  }

  /// Solve a constrained portfolio-construction problem.
  pub fn optimize(
    &self,
    expected_returns: &[f64],
    cov: &[Vec<f64>],
    objective: OptimizationObjective,
    bounds: &WeightBounds,
  ) -> OptimizationResult {
    optimize_portfolio(expected_returns, cov, objective, bounds, self.config.risk_free)
  }

  /// Trace the efficient frontier with the configured point count.
  pub fn efficient_frontier(
    &self,
    expected_returns: &[f64],
    cov: &[Vec<f64>],
  ) -> EfficientFrontier {
    calculate_efficient_frontier(expected_returns, cov, self.config.frontier_points)
  }

  /// Brinson allocation/selection/interaction decomposition.
  pub fn brinson_attribution(
    &self,
    portfolio_weights: &[f64],
    benchmark_weights: &[f64],
    portfolio_returns: &[f64],
    benchmark_returns: &[f64],
  ) -> Option<AttributionResult> {
    brinson_attribution(
      portfolio_weights,
      benchmark_weights,
      portfolio_returns,
      benchmark_returns,
    )
  }

  /// Annualized standard deviation of active returns.
  pub fn tracking_error(&self, portfolio_returns: &[f64], benchmark_returns: &[f64]) -> Metric {
    calculate_tracking_error(portfolio_returns, benchmark_returns)
  }

  /// Annualized active return over tracking error.
  pub fn information_ratio(
    &self,
    portfolio_returns: &[f64],
    benchmark_returns: &[f64],
  ) -> Metric {
    calculate_information_ratio(portfolio_returns, benchmark_returns)
  }

  /// Regression beta against the market.
  pub fn beta(&self, portfolio_returns: &[f64], market_returns: &[f64]) -> Metric {
    calculate_beta(portfolio_returns, market_returns)
  }

  /// Annualized CAPM alpha against the market.
  pub fn alpha(&self, portfolio_returns: &[f64], market_returns: &[f64]) -> Metric {
    calculate_alpha(portfolio_returns, market_returns, self.config.risk_free)
  }

  /// Marginal/component volatility decomposition.
  pub fn decompose_risk(&self, weights: &[f64], cov: &[Vec<f64>]) -> Option<RiskDecomposition> {
    decompose_risk(weights, cov)
  }

  /// Drift assessment and trade plan against target weights.
  pub fn suggest_rebalancing(
    &self,
    current_weights: &[f64],
    target_weights: &[f64],
    config: &RebalancingConfig,
  ) -> Option<RebalancingPlan> {
    suggest_rebalancing(current_weights, target_weights, config)
  }
}

impl Default for AnalyticsEngine {
  fn default() -> Self {
    Self::new(AnalyticsConfig::default())
  }
}
