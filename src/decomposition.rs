//! # Risk Decomposition
//!
//! $$
//! \sigma_p = \sum_i w_i \frac{(\Sigma \mathbf{w})_i}{\sigma_p}
//! $$
//!
//! Marginal and component risk contributions, diversification ratio and an
//! illustrative category split of total volatility.

use tracing::warn;

use crate::data::dot;
use crate::data::mat_vec_mul;
use crate::types::RiskDecomposition;

/// Decompose portfolio volatility into per-asset contributions.
///
/// The market/credit/liquidity/operational figures are a fixed 60/20/15/5
/// split of total risk, not a factor model; treat them as illustrative.
pub fn decompose_risk(weights: &[f64], cov: &[Vec<f64>]) -> Option<RiskDecomposition> {
  let n = weights.len();
  if n == 0 || cov.len() != n || cov.iter().any(|row| row.len() != n) {
    warn!(
      assets = n,
      cov_rows = cov.len(),
      "risk decomposition inputs empty or of mismatched shape"
    );
    return None;
  }

  let sigma_w = mat_vec_mul(cov, weights);
  let variance = dot(weights, &sigma_w).max(0.0);
  let total_risk = variance.sqrt();

  let (marginal, component) = if total_risk > 1e-15 {
    let marginal: Vec<f64> = sigma_w.iter().map(|&sw| sw / total_risk).collect();
    let component: Vec<f64> = weights
      .iter()
      .zip(marginal.iter())
      .map(|(&w, &m)| w * m)
      .collect();
    (marginal, component)
  } else {
    (vec![0.0; n], vec![0.0; n])
  };

  Some(RiskDecomposition {
    total_risk,
    market_risk: total_risk * 0.60,
    credit_risk: total_risk * 0.20,
    liquidity_risk: total_risk * 0.15,
    operational_risk: total_risk * 0.05,
    diversification_ratio: diversification_ratio(weights, cov, total_risk),
    marginal_contributions: marginal,
    component_contributions: component,
  })
}

/// Weighted average of individual asset volatilities over portfolio
/// volatility; 1 under perfect correlation, above 1 when diversification
/// reduces risk below the naive average.
pub fn diversification_ratio(weights: &[f64], cov: &[Vec<f64>], total_risk: f64) -> f64 {
  if total_risk < 1e-15 {
    return 0.0;
  }

  let weighted_vol: f64 = weights
    .iter()
    .enumerate()
    .map(|(i, &w)| {
      let var = cov
        .get(i)
        .and_then(|row| row.get(i))
        .copied()
        .unwrap_or(0.0)
        .max(0.0);
      w.abs() * var.sqrt()
    })
    .sum();

  weighted_vol / total_risk
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;
  use crate::data::portfolio_volatility;

  fn sample_cov() -> Vec<Vec<f64>> {
    vec![
      vec![0.04, 0.01, 0.005],
      vec![0.01, 0.09, 0.01],
      vec![0.005, 0.01, 0.0225],
    ]
  }

  #[test]
  fn component_contributions_sum_to_total_risk() {
    let weights = vec![0.5, 0.3, 0.2];
    let cov = sample_cov();

    let decomp = decompose_risk(&weights, &cov).unwrap();
    let sum: f64 = decomp.component_contributions.iter().sum();

    assert_abs_diff_eq!(sum, decomp.total_risk, epsilon = 1e-6);
    assert_abs_diff_eq!(
      decomp.total_risk,
      portfolio_volatility(&weights, &cov),
      epsilon = 1e-12
    );
  }

  #[test]
  fn category_split_is_proportional() {
    let decomp = decompose_risk(&[0.5, 0.3, 0.2], &sample_cov()).unwrap();
    let total = decomp.market_risk + decomp.credit_risk + decomp.liquidity_risk
      + decomp.operational_risk;
    assert_abs_diff_eq!(total, decomp.total_risk, epsilon = 1e-12);
    assert_abs_diff_eq!(decomp.market_risk, 0.6 * decomp.total_risk, epsilon = 1e-12);
  }

  #[test]
  fn diversification_ratio_is_one_under_perfect_correlation() {
    // Identical assets with correlation 1.
    let cov = vec![vec![0.04, 0.04], vec![0.04, 0.04]];
    let decomp = decompose_risk(&[0.5, 0.5], &cov).unwrap();
    assert_abs_diff_eq!(decomp.diversification_ratio, 1.0, epsilon = 1e-12);
  }

  #[test]
  fn diversification_ratio_exceeds_one_for_uncorrelated_assets() {
    let cov = vec![vec![0.04, 0.0], vec![0.0, 0.04]];
    let decomp = decompose_risk(&[0.5, 0.5], &cov).unwrap();
    assert!(decomp.diversification_ratio > 1.0);
  }

  #[test]
  fn decomposition_rejects_shape_mismatch() {
    assert!(decompose_risk(&[0.5, 0.5], &[vec![0.04]]).is_none());
    assert!(decompose_risk(&[], &[]).is_none());
  }
}
