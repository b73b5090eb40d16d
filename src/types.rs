//! # Analytics Types
//!
//! $$
//! \mathbf{w}^\*=\arg\max_{\mathbf{w}} \frac{\mathbb E[R_p]-r_f}{\sigma_p}
//! $$
//!
//! Shared enums and result containers for the analytics engine.

/// Value-at-Risk estimation methodologies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarMethod {
  /// Empirical percentile of the observed return distribution.
  Historical,
  /// Normal approximation from the sample mean and standard deviation.
  Parametric,
  /// Historical rule applied to simulated normal draws.
  MonteCarlo,
}

impl VarMethod {
  /// Parse a string into a [`VarMethod`].
  pub fn from_str(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "parametric" | "normal" => Self::Parametric,
      "monte-carlo" | "montecarlo" | "mc" => Self::MonteCarlo,
      _ => Self::Historical,
    }
  }
}

/// Scalar objectives supported by the constrained optimizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimizationObjective {
  /// Maximize `(expected_return - risk_free) / volatility`.
  MaxSharpe,
  /// Minimize portfolio volatility.
  MinVolatility,
  /// Equalize per-asset risk contributions.
  RiskParity,
  /// Maximize weighted-average vol over portfolio vol.
  MaxDiversification,
}

/// Outcome of a scalar statistic that may be undefined for degenerate input.
///
/// Replaces the silent-zero policy: a dashboard tile can render "N/A" for
/// [`Metric::Invalid`] instead of conflating it with a genuine zero.
#[derive(Clone, Debug, PartialEq)]
pub enum Metric {
  /// A well-defined value.
  Value(f64),
  /// The statistic could not be computed; carries the reason.
  Invalid(String),
}

impl Metric {
  /// The value, if defined.
  pub fn value(&self) -> Option<f64> {
    match self {
      Metric::Value(v) => Some(*v),
      Metric::Invalid(_) => None,
    }
  }

  /// The value, or 0.0 for the legacy fail-soft behavior.
  pub fn value_or_zero(&self) -> f64 {
    self.value().unwrap_or(0.0)
  }

  /// Whether the statistic is defined.
  pub fn is_valid(&self) -> bool {
    matches!(self, Metric::Value(_))
  }
}

/// Outcome of a constrained portfolio optimization.
///
/// `weights` and the portfolio statistics are only meaningful when `success`
/// is true; on failure only `message` is populated.
#[derive(Clone, Debug, Default)]
pub struct OptimizationResult {
  /// Whether the solve converged to a feasible portfolio.
  pub success: bool,
  /// Final portfolio weights (empty on failure).
  pub weights: Vec<f64>,
  /// Model expected portfolio return.
  pub expected_return: f64,
  /// Model portfolio volatility.
  pub volatility: f64,
  /// Sharpe ratio computed as `(expected_return - risk_free) / volatility`.
  pub sharpe_ratio: f64,
  /// Achieved value of the selected objective, in its natural orientation.
  pub objective_value: f64,
  /// Diagnostic message on failure.
  pub message: Option<String>,
}

impl OptimizationResult {
  pub(crate) fn failed(message: impl Into<String>) -> Self {
    Self {
      success: false,
      message: Some(message.into()),
      ..Self::default()
    }
  }
}

/// Optional weight bounds for [`crate::optimize_portfolio`].
///
/// The long-only simplex constraints (weights in `[0, 1]` summing to one) are
/// always enforced; these tighten them.
#[derive(Clone, Debug, Default)]
pub struct WeightBounds {
  /// Upper bound applied to every asset.
  pub max_weight: Option<f64>,
  /// Per-asset lower bounds as `(asset_index, bound)` pairs.
  pub min_weights: Vec<(usize, f64)>,
}

/// Efficient-frontier trace with index-aligned arrays.
///
/// Every array has exactly `num_points` entries; a point whose solve failed
/// holds NaN (and an empty weight vector) so the target grid alignment is
/// preserved.
#[derive(Clone, Debug, Default)]
pub struct EfficientFrontier {
  /// Equally spaced target returns between the min-vol and max-return anchors.
  pub target_returns: Vec<f64>,
  /// Achieved expected return per point (NaN on failed solve).
  pub expected_returns: Vec<f64>,
  /// Achieved volatility per point (NaN on failed solve).
  pub volatilities: Vec<f64>,
  /// Weights per point (empty on failed solve).
  pub weights: Vec<Vec<f64>>,
}

/// Flat per-series risk and performance summary.
#[derive(Clone, Copy, Debug, Default)]
pub struct RiskMetrics {
  /// Historical VaR at 95% confidence.
  pub var_95: f64,
  /// Historical VaR at 99% confidence.
  pub var_99: f64,
  /// Expected shortfall at 95% confidence.
  pub expected_shortfall: f64,
  /// Mean period return scaled by trading days per year.
  pub annualized_return: f64,
  /// Period volatility scaled by the square root of trading days per year.
  pub annualized_volatility: f64,
  /// Annualized Sharpe ratio.
  pub sharpe_ratio: f64,
  /// Largest peak-to-trough loss of the cumulative return path.
  pub max_drawdown: f64,
  /// Regression beta against the market series.
  pub beta: f64,
  /// Annualized CAPM alpha against the market series.
  pub alpha: f64,
  /// Annualized active return over tracking error.
  pub information_ratio: f64,
  /// Annualized standard deviation of active returns.
  pub tracking_error: f64,
}

/// Brinson decomposition of excess return over a benchmark.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttributionResult {
  /// Effect of over/underweighting segments: `sum (wp - wb) * rb`.
  pub allocation_effect: f64,
  /// Effect of security selection within segments: `sum wb * (rp - rb)`.
  pub selection_effect: f64,
  /// Cross term: `sum (wp - wb) * (rp - rb)`.
  pub interaction_effect: f64,
  /// Sum of the three effects, formed additively so the identity is exact.
  pub total_excess_return: f64,
}

/// Volatility decomposition into marginal and component contributions.
#[derive(Clone, Debug, Default)]
pub struct RiskDecomposition {
  /// Portfolio volatility under the supplied weights and covariance.
  pub total_risk: f64,
  /// Fixed 60% share of total risk (illustrative split, not a factor model).
  pub market_risk: f64,
  /// Fixed 20% share of total risk.
  pub credit_risk: f64,
  /// Fixed 15% share of total risk.
  pub liquidity_risk: f64,
  /// Fixed 5% share of total risk.
  pub operational_risk: f64,
  /// Weighted-average asset volatility over portfolio volatility.
  pub diversification_ratio: f64,
  /// Per-asset marginal risk `(Sigma w)_i / sigma_p`.
  pub marginal_contributions: Vec<f64>,
  /// Per-asset component risk `w_i * marginal_i`; sums to `total_risk`.
  pub component_contributions: Vec<f64>,
}

/// A named stress scenario of additive per-asset return shocks.
#[derive(Clone, Debug)]
pub struct StressScenario {
  /// Scenario label.
  pub name: String,
  /// `(asset_index, additive_shock)` pairs; assets not listed are unshocked.
  pub shocks: Vec<(usize, f64)>,
}

/// Cumulative portfolio effect of one stress scenario.
#[derive(Clone, Debug)]
pub struct StressImpact {
  /// Scenario label.
  pub name: String,
  /// Sum of shocked portfolio period returns.
  pub shocked_return: f64,
  /// Shocked cumulative return minus the unshocked one.
  pub impact: f64,
}

/// Trade direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TradeAction {
  Buy,
  Sell,
}

/// One rebalancing trade.
#[derive(Clone, Debug)]
pub struct Trade {
  /// Asset index in the weight vectors.
  pub asset_index: usize,
  /// Weight before the trade.
  pub current_weight: f64,
  /// Weight after the trade.
  pub target_weight: f64,
  /// Signed weight change `target - current`.
  pub trade_amount: f64,
  /// `|trade_amount|` times the per-asset cost rate.
  pub trade_cost: f64,
  /// Buy when `trade_amount > 0`, sell otherwise.
  pub action: TradeAction,
}

/// Drift assessment and trade list produced by the rebalancing advisor.
///
/// `trades` is empty exactly when `needs_rebalancing` is false.
#[derive(Clone, Debug, Default)]
pub struct RebalancingPlan {
  /// Whether the maximum drift reached the trigger threshold.
  pub needs_rebalancing: bool,
  /// Largest elementwise `|current - target|`.
  pub max_deviation: f64,
  /// Per-asset trades for deviations at or above the trade threshold.
  pub trades: Vec<Trade>,
  /// Sum of trade costs.
  pub total_transaction_cost: f64,
}
