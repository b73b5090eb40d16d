//! # Performance Attribution
//!
//! $$
//! R_p - R_b = \sum_i (w_{p,i}-w_{b,i})r_{b,i} + \sum_i w_{b,i}(r_{p,i}-r_{b,i})
//!   + \sum_i (w_{p,i}-w_{b,i})(r_{p,i}-r_{b,i})
//! $$
//!
//! Brinson decomposition of excess return over a benchmark and relative-risk
//! statistics (tracking error, information ratio, beta, alpha).

use tracing::warn;

use crate::data::sample_covariance;
use crate::data::sample_mean;
use crate::data::sample_std;
use crate::data::sample_variance;
use crate::data::TRADING_DAYS_PER_YEAR;
use crate::types::AttributionResult;
use crate::types::Metric;

/// Brinson allocation/selection/interaction decomposition.
///
/// All four slices are per-asset and must share one length; the total is
/// formed additively from the three effects so the identity holds exactly.
pub fn brinson_attribution(
  portfolio_weights: &[f64],
  benchmark_weights: &[f64],
  portfolio_returns: &[f64],
  benchmark_returns: &[f64],
) -> Option<AttributionResult> {
  let n = portfolio_weights.len();
  if n == 0
    || benchmark_weights.len() != n
    || portfolio_returns.len() != n
    || benchmark_returns.len() != n
  {
    warn!(
      portfolio = portfolio_weights.len(),
      benchmark = benchmark_weights.len(),
      "attribution inputs empty or of mismatched length"
    );
    return None;
  }

  let mut allocation_effect = 0.0;
  let mut selection_effect = 0.0;
  let mut interaction_effect = 0.0;

  for i in 0..n {
    let dw = portfolio_weights[i] - benchmark_weights[i];
    let dr = portfolio_returns[i] - benchmark_returns[i];
    allocation_effect += dw * benchmark_returns[i];
    selection_effect += benchmark_weights[i] * dr;
    interaction_effect += dw * dr;
  }

  Some(AttributionResult {
    allocation_effect,
    selection_effect,
    interaction_effect,
    total_excess_return: allocation_effect + selection_effect + interaction_effect,
  })
}

fn active_returns(portfolio_returns: &[f64], benchmark_returns: &[f64]) -> Option<Vec<f64>> {
  if portfolio_returns.is_empty() || portfolio_returns.len() != benchmark_returns.len() {
    warn!(
      portfolio = portfolio_returns.len(),
      benchmark = benchmark_returns.len(),
      "active-return series empty or of mismatched length"
    );
    return None;
  }

  Some(
    portfolio_returns
      .iter()
      .zip(benchmark_returns.iter())
      .map(|(p, b)| p - b)
      .collect(),
  )
}

/// Annualized standard deviation of active period returns.
pub fn calculate_tracking_error(
  portfolio_returns: &[f64],
  benchmark_returns: &[f64],
) -> Metric {
  match active_returns(portfolio_returns, benchmark_returns) {
    Some(active) => Metric::Value(sample_std(&active) * TRADING_DAYS_PER_YEAR.sqrt()),
    None => Metric::Invalid("mismatched or empty return series".to_string()),
  }
}

/// Annualized active return over tracking error.
pub fn calculate_information_ratio(
  portfolio_returns: &[f64],
  benchmark_returns: &[f64],
) -> Metric {
  let active = match active_returns(portfolio_returns, benchmark_returns) {
    Some(a) => a,
    None => return Metric::Invalid("mismatched or empty return series".to_string()),
  };

  let te = sample_std(&active) * TRADING_DAYS_PER_YEAR.sqrt();
  if te < 1e-15 {
    warn!("tracking error is zero; information ratio undefined");
    return Metric::Invalid("zero tracking error".to_string());
  }

  Metric::Value(sample_mean(&active) * TRADING_DAYS_PER_YEAR / te)
}

/// Regression beta of the portfolio against the market.
///
/// Zero market variance yields `Value(0.0)`, the documented degenerate answer.
pub fn calculate_beta(portfolio_returns: &[f64], market_returns: &[f64]) -> Metric {
  let n = portfolio_returns.len().min(market_returns.len());
  if n < 2 || portfolio_returns.len() != market_returns.len() {
    warn!(
      portfolio = portfolio_returns.len(),
      market = market_returns.len(),
      "beta inputs too short or of mismatched length"
    );
    return Metric::Invalid("mismatched or too-short return series".to_string());
  }

  let market_var = sample_variance(market_returns, sample_mean(market_returns));
  if market_var < 1e-30 {
    return Metric::Value(0.0);
  }

  Metric::Value(sample_covariance(portfolio_returns, market_returns) / market_var)
}

/// Annualized CAPM alpha: portfolio return minus `rf + beta (market - rf)`.
pub fn calculate_alpha(
  portfolio_returns: &[f64],
  market_returns: &[f64],
  risk_free: f64,
) -> Metric {
  let beta = match calculate_beta(portfolio_returns, market_returns) {
    Metric::Value(b) => b,
    invalid => return invalid,
  };

  let ann_portfolio = sample_mean(portfolio_returns) * TRADING_DAYS_PER_YEAR;
  let ann_market = sample_mean(market_returns) * TRADING_DAYS_PER_YEAR;
  let capm = risk_free + beta * (ann_market - risk_free);

  Metric::Value(ann_portfolio - capm)
}
