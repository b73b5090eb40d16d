//! # Portfolio Risk & Optimization Analytics
//!
//! `portfolio_analytics` is a pure, stateless computation library for
//! portfolio risk and construction analytics. It accepts plain numeric
//! slices and configuration scalars and returns structured numeric results;
//! it performs no I/O and retains no references after a call returns.
//!
//! ## Modules
//!
//! | Module            | Description                                                               |
//! |-------------------|---------------------------------------------------------------------------|
//! | [`risk`]          | VaR (historical/parametric/Monte Carlo), expected shortfall, stress tests. |
//! | [`optimizers`]    | Constrained portfolio optimization and efficient-frontier tracing.        |
//! | [`attribution`]   | Brinson decomposition, tracking error, information ratio, beta, alpha.    |
//! | [`decomposition`] | Marginal/component risk contributions and diversification ratio.          |
//! | [`rebalancing`]   | Drift detection and trade-plan generation with transaction costs.         |
//! | [`engine`]        | Configured single entry point over all of the above.                      |
//! | [`data`]          | Shared sample statistics and portfolio arithmetic.                        |
//! | [`types`]         | Enums and result containers.                                              |
//!
//! Degenerate inputs never panic: scalar statistics return the tagged
//! [`Metric`] wrapper, record-shaped results return `Option`, and solver
//! outcomes carry an explicit `success` flag. Every fail-soft path emits a
//! `tracing` warning.

pub mod attribution;
pub mod data;
pub mod decomposition;
pub mod engine;
pub mod optimizers;
pub mod rebalancing;
pub mod risk;
pub mod types;

pub use attribution::brinson_attribution;
pub use attribution::calculate_alpha;
pub use attribution::calculate_beta;
pub use attribution::calculate_information_ratio;
pub use attribution::calculate_tracking_error;
pub use data::max_drawdown;
pub use data::percentile;
pub use data::portfolio_return;
pub use data::portfolio_volatility;
pub use data::TRADING_DAYS_PER_YEAR;
pub use decomposition::decompose_risk;
pub use decomposition::diversification_ratio;
pub use engine::AnalyticsConfig;
pub use engine::AnalyticsEngine;
pub use optimizers::calculate_efficient_frontier;
pub use optimizers::optimize_portfolio;
pub use rebalancing::suggest_rebalancing;
pub use rebalancing::RebalancingConfig;
pub use risk::calculate_expected_shortfall;
pub use risk::calculate_var;
pub use risk::calculate_var_with_simulations;
pub use risk::risk_metrics;
pub use risk::stress_test;
pub use risk::MC_SIMULATIONS;
pub use types::AttributionResult;
pub use types::EfficientFrontier;
pub use types::Metric;
pub use types::OptimizationObjective;
pub use types::OptimizationResult;
pub use types::RebalancingPlan;
pub use types::RiskDecomposition;
pub use types::RiskMetrics;
pub use types::StressImpact;
pub use types::StressScenario;
pub use types::Trade;
pub use types::TradeAction;
pub use types::VarMethod;
pub use types::WeightBounds;
