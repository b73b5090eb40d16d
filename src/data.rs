//! # Numeric Primitives
//!
//! $$
//! \sigma_p^2 = \mathbf{w}^\top \Sigma \mathbf{w}
//! $$
//!
//! Shared sample statistics and portfolio arithmetic used by every component.

/// Trading periods per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Arithmetic mean; 0.0 for an empty slice.
pub fn sample_mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}

/// Unbiased sample variance (ddof = 1); 0.0 below two observations.
pub fn sample_variance(xs: &[f64], mean: f64) -> f64 {
  if xs.len() < 2 {
    return 0.0;
  }

  let mut acc = 0.0;
  for &x in xs {
    let d = x - mean;
    acc += d * d;
  }
  acc / (xs.len() - 1) as f64
}

/// Sample standard deviation (ddof = 1).
pub fn sample_std(xs: &[f64]) -> f64 {
  sample_variance(xs, sample_mean(xs)).sqrt()
}

/// Unbiased sample covariance of two equal-length slices.
pub fn sample_covariance(x: &[f64], y: &[f64]) -> f64 {
  let n = x.len().min(y.len());
  if n < 2 {
    return 0.0;
  }

  let mx = sample_mean(&x[..n]);
  let my = sample_mean(&y[..n]);

  let mut acc = 0.0;
  for i in 0..n {
    acc += (x[i] - mx) * (y[i] - my);
  }
  acc / (n - 1) as f64
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
  a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

pub(crate) fn mat_vec_mul(mat: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
  mat
    .iter()
    .map(|row| row.iter().zip(v.iter()).map(|(a, b)| a * b).sum())
    .collect()
}

/// Expected portfolio return `w . mu`.
pub fn portfolio_return(weights: &[f64], expected_returns: &[f64]) -> f64 {
  dot(weights, expected_returns)
}

/// Portfolio volatility `sqrt(w' Sigma w)`, clamped at zero.
pub fn portfolio_volatility(weights: &[f64], cov: &[Vec<f64>]) -> f64 {
  let sigma_w = mat_vec_mul(cov, weights);
  dot(weights, &sigma_w).max(0.0).sqrt()
}

/// Linear-interpolation percentile of a sorted slice, `p` in `[0, 100]`.
///
/// Matches `numpy.percentile` with the default interpolation.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
  let n = sorted.len();
  if n == 0 {
    return 0.0;
  }
  if n == 1 {
    return sorted[0];
  }

  let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
  let lo = rank.floor() as usize;
  let hi = rank.ceil() as usize;
  let frac = rank - lo as f64;

  sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub(crate) fn sorted_copy(xs: &[f64]) -> Vec<f64> {
  let mut out = xs.to_vec();
  out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
  out
}

/// Largest peak-to-trough loss of the compounded return path, as a
/// positive fraction. Order of the series matters.
pub fn max_drawdown(returns: &[f64]) -> f64 {
  let mut wealth = 1.0;
  let mut peak = 1.0;
  let mut max_dd = 0.0_f64;

  for &r in returns {
    wealth *= 1.0 + r;
    if wealth > peak {
      peak = wealth;
    }
    if peak > 0.0 {
      max_dd = max_dd.max((peak - wealth) / peak);
    }
  }

  max_dd
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn percentile_matches_numpy_linear_interpolation() {
    let sorted = vec![-0.05, -0.03, 0.01, 0.02, 0.10];

    // rank 0.8 between -0.05 and -0.03
    assert_abs_diff_eq!(percentile(&sorted, 20.0), -0.034, epsilon = 1e-12);
    assert_abs_diff_eq!(percentile(&sorted, 0.0), -0.05, epsilon = 1e-12);
    assert_abs_diff_eq!(percentile(&sorted, 100.0), 0.10, epsilon = 1e-12);
    assert_abs_diff_eq!(percentile(&sorted, 50.0), 0.01, epsilon = 1e-12);
  }

  #[test]
  fn variance_uses_unbiased_denominator() {
    let xs = vec![1.0, 2.0, 3.0, 4.0];
    let var = sample_variance(&xs, sample_mean(&xs));
    assert_abs_diff_eq!(var, 5.0 / 3.0, epsilon = 1e-12);
  }

  #[test]
  fn drawdown_tracks_running_peak() {
    let returns = vec![0.10, -0.20, 0.05, -0.10];
    // wealth: 1.10, 0.88, 0.924, 0.8316; peak stays 1.10
    let dd = max_drawdown(&returns);
    assert_abs_diff_eq!(dd, (1.10 - 0.8316) / 1.10, epsilon = 1e-12);
  }

  #[test]
  fn drawdown_is_zero_for_monotone_gains() {
    assert_eq!(max_drawdown(&[0.01, 0.02, 0.005]), 0.0);
    assert_eq!(max_drawdown(&[]), 0.0);
  }

  #[test]
  fn portfolio_volatility_is_nonnegative() {
    let cov = vec![vec![0.04, 0.01], vec![0.01, 0.09]];
    let vol = portfolio_volatility(&[0.5, 0.5], &cov);
    assert_abs_diff_eq!(vol, (0.25_f64 * 0.04 + 0.25 * 0.09 + 0.5 * 0.01).sqrt(), epsilon = 1e-12);
  }
}
