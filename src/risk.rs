//! # Risk Estimator
//!
//! $$
//! \mathrm{VaR}_\alpha = -\inf\{x : F(x) \ge 1-\alpha\}
//! $$
//!
//! Tail-risk estimation under historical, parametric and Monte Carlo
//! methodologies, scenario stress testing and a flat per-series summary.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;
use rand_distr::Normal as SamplingNormal;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;
use tracing::warn;

use crate::attribution::calculate_alpha;
use crate::attribution::calculate_beta;
use crate::attribution::calculate_information_ratio;
use crate::attribution::calculate_tracking_error;
use crate::data::max_drawdown;
use crate::data::percentile;
use crate::data::sample_mean;
use crate::data::sample_std;
use crate::data::sorted_copy;
use crate::data::TRADING_DAYS_PER_YEAR;
use crate::types::Metric;
use crate::types::RiskMetrics;
use crate::types::StressImpact;
use crate::types::StressScenario;
use crate::types::VarMethod;

/// Default Monte Carlo draw count; bounds runtime and keeps runs comparable.
pub const MC_SIMULATIONS: usize = 10_000;

fn check_var_inputs(returns: &[f64], confidence_level: f64) -> Option<Metric> {
  if returns.is_empty() {
    warn!("VaR requested on an empty return series");
    return Some(Metric::Invalid("empty return series".to_string()));
  }
  if confidence_level <= 0.0 || confidence_level >= 1.0 {
    warn!(confidence_level, "confidence level outside (0, 1)");
    return Some(Metric::Invalid(format!(
      "confidence level {confidence_level} outside (0, 1)"
    )));
  }
  None
}

fn historical_var(returns: &[f64], confidence_level: f64) -> f64 {
  let sorted = sorted_copy(returns);
  -percentile(&sorted, (1.0 - confidence_level) * 100.0)
}

fn parametric_var(returns: &[f64], confidence_level: f64) -> f64 {
  let mean = sample_mean(returns);
  let std = sample_std(returns);
  let normal = Normal::new(0.0, 1.0).unwrap();
  let z = normal.inverse_cdf(1.0 - confidence_level);
  -(mean + z * std)
}

fn monte_carlo_var(
  returns: &[f64],
  confidence_level: f64,
  simulations: usize,
  seed: Option<u64>,
) -> Metric {
  let mean = sample_mean(returns);
  let std = sample_std(returns);

  let dist = match SamplingNormal::new(mean, std) {
    Ok(d) => d,
    Err(e) => {
      warn!(mean, std, "could not parameterize simulation distribution");
      return Metric::Invalid(format!("simulation distribution: {e}"));
    }
  };

  let mut rng = match seed {
    Some(s) => StdRng::seed_from_u64(s),
    None => StdRng::from_entropy(),
  };

  let simulated: Vec<f64> = (0..simulations.max(1)).map(|_| dist.sample(&mut rng)).collect();
  Metric::Value(historical_var(&simulated, confidence_level))
}

/// Value at Risk of a periodic return series.
///
/// `seed` pins the Monte Carlo draws for reproducibility; `None` uses a fresh
/// generator, so repeated Monte Carlo calls differ run to run. The seed is
/// ignored by the other two methods.
pub fn calculate_var(
  returns: &[f64],
  confidence_level: f64,
  method: VarMethod,
  seed: Option<u64>,
) -> Metric {
  calculate_var_with_simulations(returns, confidence_level, method, seed, MC_SIMULATIONS)
}

/// [`calculate_var`] with an explicit Monte Carlo draw count.
pub fn calculate_var_with_simulations(
  returns: &[f64],
  confidence_level: f64,
  method: VarMethod,
  seed: Option<u64>,
  simulations: usize,
) -> Metric {
  if let Some(invalid) = check_var_inputs(returns, confidence_level) {
    return invalid;
  }

  match method {
    VarMethod::Historical => Metric::Value(historical_var(returns, confidence_level)),
    VarMethod::Parametric => Metric::Value(parametric_var(returns, confidence_level)),
    VarMethod::MonteCarlo => monte_carlo_var(returns, confidence_level, simulations, seed),
  }
}

/// Mean loss strictly beyond the historical VaR threshold.
///
/// `Value(0.0)` when no observation falls in the tail, which is a genuine
/// "no tail" answer rather than a degenerate input.
pub fn calculate_expected_shortfall(returns: &[f64], confidence_level: f64) -> Metric {
  if let Some(invalid) = check_var_inputs(returns, confidence_level) {
    return invalid;
  }

  let threshold = -historical_var(returns, confidence_level);
  let tail: Vec<f64> = returns.iter().copied().filter(|&r| r < threshold).collect();

  if tail.is_empty() {
    Metric::Value(0.0)
  } else {
    Metric::Value(-sample_mean(&tail))
  }
}

/// Apply additive per-asset shocks and report each scenario's cumulative
/// portfolio effect.
///
/// `asset_returns[i]` is the aligned return series of asset `i`; assets
/// absent from a scenario's shock list are left unshocked.
pub fn stress_test(
  weights: &[f64],
  asset_returns: &[Vec<f64>],
  scenarios: &[StressScenario],
) -> Vec<StressImpact> {
  let n_assets = weights.len().min(asset_returns.len());
  let n_periods = asset_returns.iter().map(|r| r.len()).min().unwrap_or(0);

  if n_assets == 0 || n_periods == 0 {
    warn!("stress test requested with no assets or no observations");
    return Vec::new();
  }

  let baseline: f64 = (0..n_periods)
    .map(|t| (0..n_assets).map(|i| weights[i] * asset_returns[i][t]).sum::<f64>())
    .sum();

  scenarios
    .iter()
    .map(|scenario| {
      let mut shocks = vec![0.0; n_assets];
      for &(asset, shock) in &scenario.shocks {
        if asset < n_assets {
          shocks[asset] = shock;
        }
      }

      let shocked_return: f64 = (0..n_periods)
        .map(|t| {
          (0..n_assets)
            .map(|i| weights[i] * (asset_returns[i][t] + shocks[i]))
            .sum::<f64>()
        })
        .sum();

      StressImpact {
        name: scenario.name.clone(),
        shocked_return,
        impact: shocked_return - baseline,
      }
    })
    .collect()
}

/// Full per-series risk summary against a market/benchmark series.
///
/// `None` when the portfolio series is empty (logged); relative statistics
/// fall back to zero when the market series is degenerate.
pub fn risk_metrics(
  returns: &[f64],
  market_returns: &[f64],
  risk_free: f64,
) -> Option<RiskMetrics> {
  if returns.is_empty() {
    warn!("risk metrics requested on an empty return series");
    return None;
  }

  let annualized_return = sample_mean(returns) * TRADING_DAYS_PER_YEAR;
  let annualized_volatility = sample_std(returns) * TRADING_DAYS_PER_YEAR.sqrt();
  let sharpe_ratio = if annualized_volatility > 1e-15 {
    (annualized_return - risk_free) / annualized_volatility
  } else {
    0.0
  };

  Some(RiskMetrics {
    var_95: calculate_var(returns, 0.95, VarMethod::Historical, None).value_or_zero(),
    var_99: calculate_var(returns, 0.99, VarMethod::Historical, None).value_or_zero(),
    expected_shortfall: calculate_expected_shortfall(returns, 0.95).value_or_zero(),
    annualized_return,
    annualized_volatility,
    sharpe_ratio,
    max_drawdown: max_drawdown(returns),
    beta: calculate_beta(returns, market_returns).value_or_zero(),
    alpha: calculate_alpha(returns, market_returns, risk_free).value_or_zero(),
    information_ratio: calculate_information_ratio(returns, market_returns).value_or_zero(),
    tracking_error: calculate_tracking_error(returns, market_returns).value_or_zero(),
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use tracing_test::traced_test;

  use super::*;

  fn sample_returns() -> Vec<f64> {
    vec![
      -0.021, 0.014, 0.003, -0.008, 0.011, -0.035, 0.022, 0.001, -0.012, 0.017, 0.004, -0.026,
      0.009, -0.002, 0.030, -0.015, 0.006, 0.019, -0.041, 0.013,
    ]
  }

  #[test]
  fn historical_var_matches_percentile_rule() {
    let returns = vec![-0.05, -0.03, 0.01, 0.02, 0.10];
    let var = calculate_var(&returns, 0.8, VarMethod::Historical, None);
    // 20th percentile of the sorted array is -0.034
    assert_abs_diff_eq!(var.value().unwrap(), 0.034, epsilon = 1e-12);
  }

  #[test]
  fn var_grows_with_confidence() {
    let returns = sample_returns();
    let var_95 = calculate_var(&returns, 0.95, VarMethod::Historical, None)
      .value()
      .unwrap();
    let var_99 = calculate_var(&returns, 0.99, VarMethod::Historical, None)
      .value()
      .unwrap();
    assert!(var_99 >= var_95);

    let p_95 = calculate_var(&returns, 0.95, VarMethod::Parametric, None)
      .value()
      .unwrap();
    let p_99 = calculate_var(&returns, 0.99, VarMethod::Parametric, None)
      .value()
      .unwrap();
    assert!(p_99 >= p_95);
  }

  #[test]
  fn expected_shortfall_dominates_historical_var() {
    let returns = sample_returns();
    let var = calculate_var(&returns, 0.9, VarMethod::Historical, None)
      .value()
      .unwrap();
    let es = calculate_expected_shortfall(&returns, 0.9).value().unwrap();
    assert!(es >= var);
  }

  #[test]
  fn expected_shortfall_is_zero_without_tail_observations() {
    // Every observation equal: nothing lies strictly beyond the threshold.
    let returns = vec![0.01; 10];
    let es = calculate_expected_shortfall(&returns, 0.95);
    assert_eq!(es, Metric::Value(0.0));
  }

  #[test]
  fn seeded_monte_carlo_is_deterministic() {
    let returns = sample_returns();
    let a = calculate_var(&returns, 0.95, VarMethod::MonteCarlo, Some(42));
    let b = calculate_var(&returns, 0.95, VarMethod::MonteCarlo, Some(42));
    assert_eq!(a, b);

    let v = a.value().unwrap();
    let parametric = calculate_var(&returns, 0.95, VarMethod::Parametric, None)
      .value()
      .unwrap();
    // Simulated draws are normal, so the two estimates agree loosely.
    assert!((v - parametric).abs() < 0.02);
  }

  #[traced_test]
  #[test]
  fn empty_series_is_invalid_and_logged() {
    let var = calculate_var(&[], 0.95, VarMethod::Historical, None);
    assert!(!var.is_valid());
    assert!(logs_contain("empty return series"));
  }

  #[test]
  fn out_of_range_confidence_is_invalid() {
    let returns = sample_returns();
    assert!(!calculate_var(&returns, 1.0, VarMethod::Historical, None).is_valid());
    assert!(!calculate_var(&returns, 0.0, VarMethod::Parametric, None).is_valid());
    assert!(!calculate_expected_shortfall(&returns, 1.5).is_valid());
  }

  #[test]
  fn stress_test_shifts_cumulative_return_by_weighted_shock() {
    let weights = vec![0.6, 0.4];
    let asset_returns = vec![vec![0.01, -0.02, 0.005], vec![0.002, 0.004, -0.001]];
    let scenarios = vec![
      StressScenario {
        name: "equity shock".to_string(),
        shocks: vec![(0, -0.10)],
      },
      StressScenario {
        name: "no shock".to_string(),
        shocks: Vec::new(),
      },
    ];

    let impacts = stress_test(&weights, &asset_returns, &scenarios);
    assert_eq!(impacts.len(), 2);

    // Three periods of a -0.10 shock on a 0.6 weight.
    assert_abs_diff_eq!(impacts[0].impact, 3.0 * 0.6 * -0.10, epsilon = 1e-12);
    assert_abs_diff_eq!(impacts[1].impact, 0.0, epsilon = 1e-12);
  }

  #[test]
  fn stress_test_ignores_out_of_range_assets() {
    let impacts = stress_test(
      &[1.0],
      &[vec![0.01, 0.01]],
      &[StressScenario {
        name: "phantom".to_string(),
        shocks: vec![(5, -0.5)],
      }],
    );
    assert_abs_diff_eq!(impacts[0].impact, 0.0, epsilon = 1e-12);
  }

  #[test]
  fn risk_metrics_populates_flat_record() {
    let returns = sample_returns();
    let market: Vec<f64> = returns.iter().map(|r| r * 0.8 + 0.001).collect();

    let metrics = risk_metrics(&returns, &market, 0.02).unwrap();
    assert!(metrics.var_99 >= metrics.var_95);
    assert!(metrics.expected_shortfall >= metrics.var_95);
    assert!(metrics.annualized_volatility > 0.0);
    assert!(metrics.max_drawdown > 0.0);
    assert!(metrics.beta > 0.0);
    assert!(metrics.tracking_error > 0.0);

    assert!(risk_metrics(&[], &market, 0.02).is_none());
  }
}
