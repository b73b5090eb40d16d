//! # Portfolio Optimizers
//!
//! $$
//! \min_{\mathbf{w}} \ \mathcal{L}(\mathbf{w}) + \lambda(\mu_p-r^\*)^2
//! $$
//!
//! Constrained single-objective optimization and efficient-frontier tracing.
//! Weights live on the long-only simplex via a softmax reparameterization, so
//! the sum-to-one and `[0, 1]` constraints hold by construction; tighter
//! bounds enter as quadratic penalties.

use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::solver::neldermead::NelderMead;
use tracing::warn;

use crate::data::dot;
use crate::data::mat_vec_mul;
use crate::data::portfolio_return;
use crate::data::portfolio_volatility;
use crate::types::EfficientFrontier;
use crate::types::OptimizationObjective;
use crate::types::OptimizationResult;
use crate::types::WeightBounds;

const BOUND_PENALTY: f64 = 1e4;
const TARGET_PENALTY: f64 = 100.0;

fn softmax(x: &[f64]) -> Vec<f64> {
  if x.is_empty() {
    return Vec::new();
  }

  let max_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
  let exps: Vec<f64> = x.iter().map(|&v| (v - max_x).exp()).collect();
  let sum: f64 = exps.iter().sum();

  if sum < 1e-15 {
    vec![1.0 / x.len() as f64; x.len()]
  } else {
    exps.iter().map(|&e| e / sum).collect()
  }
}

/// n+1 vertex simplex around the equal-weight point (softmax of zeros).
fn unit_simplex(n: usize) -> Vec<Vec<f64>> {
  let x0 = vec![0.0; n];
  let mut simplex = Vec::with_capacity(n + 1);
  simplex.push(x0.clone());
  for i in 0..n {
    let mut point = x0.clone();
    point[i] = 1.0;
    simplex.push(point);
  }
  simplex
}

struct SimplexCost<F: Fn(&[f64]) -> f64> {
  objective: F,
}

impl<F: Fn(&[f64]) -> f64> CostFunction for SimplexCost<F> {
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
    Ok((self.objective)(&softmax(x)))
  }
}

/// Minimize `objective` over the long-only simplex; `None` when the solver
/// fails to converge.
fn solve_on_simplex<F>(n: usize, max_iters: u64, objective: F) -> Option<Vec<f64>>
where
  F: Fn(&[f64]) -> f64,
{
  let cost = SimplexCost { objective };

  let solver = NelderMead::new(unit_simplex(n)).with_sd_tolerance(1e-8).ok()?;
  let res = Executor::new(cost, solver)
    .configure(|state| state.max_iters(max_iters))
    .run()
    .ok()?;

  res.state.best_param.map(|best_x| softmax(&best_x))
}

fn bound_violation(w: &[f64], bounds: &WeightBounds) -> f64 {
  let mut acc = 0.0;

  if let Some(max_w) = bounds.max_weight {
    for &wi in w {
      acc += (wi - max_w).max(0.0).powi(2);
    }
  }
  for &(i, min_w) in &bounds.min_weights {
    if i < w.len() {
      acc += (min_w - w[i]).max(0.0).powi(2);
    }
  }

  acc
}

fn check_feasibility(n: usize, bounds: &WeightBounds) -> Option<String> {
  let min_sum: f64 = bounds
    .min_weights
    .iter()
    .filter(|(i, _)| *i < n)
    .map(|(_, b)| b.max(0.0))
    .sum();
  if min_sum > 1.0 + 1e-9 {
    return Some(format!("lower bounds sum to {min_sum:.4}, above 1"));
  }

  if let Some(max_w) = bounds.max_weight {
    if max_w * (n as f64) < 1.0 - 1e-9 {
      return Some(format!("upper bound {max_w} over {n} assets cannot reach a full allocation"));
    }
  }

  None
}

fn risk_parity_error(w: &[f64], cov: &[Vec<f64>]) -> f64 {
  let sigma_w = mat_vec_mul(cov, w);
  let vol = dot(w, &sigma_w).max(0.0).sqrt();
  if vol < 1e-15 {
    return 1e10;
  }

  let contributions: Vec<f64> = w
    .iter()
    .zip(sigma_w.iter())
    .map(|(&wi, &sw)| wi * sw / vol)
    .collect();
  let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;

  contributions.iter().map(|c| (c - mean).powi(2)).sum()
}

fn diversification_numerator(w: &[f64], cov: &[Vec<f64>]) -> f64 {
  w.iter()
    .enumerate()
    .map(|(i, &wi)| {
      let var = cov
        .get(i)
        .and_then(|row| row.get(i))
        .copied()
        .unwrap_or(0.0)
        .max(0.0);
      wi * var.sqrt()
    })
    .sum()
}

/// Solve a constrained portfolio-construction problem.
///
/// Starts from equal weights; on convergence the result carries the weights
/// and portfolio statistics, otherwise `success` is false and only the
/// diagnostic message is populated. `objective_value` is reported in the
/// objective's natural orientation (Sharpe and diversification ratio are the
/// maximized quantities).
pub fn optimize_portfolio(
  expected_returns: &[f64],
  cov: &[Vec<f64>],
  objective: OptimizationObjective,
  bounds: &WeightBounds,
  risk_free: f64,
) -> OptimizationResult {
  let n = expected_returns.len();
  if n == 0 || cov.len() != n || cov.iter().any(|row| row.len() != n) {
    warn!(assets = n, cov_rows = cov.len(), "optimizer inputs empty or of mismatched shape");
    return OptimizationResult::failed("empty or mismatched expected returns / covariance");
  }

  if let Some(reason) = check_feasibility(n, bounds) {
    return OptimizationResult::failed(format!("infeasible constraints: {reason}"));
  }

  let mu = expected_returns.to_vec();
  let cov_owned = cov.to_vec();
  let bounds_owned = bounds.clone();

  let max_iters = match objective {
    OptimizationObjective::RiskParity => 10_000,
    _ => 5_000,
  };

  let solved = solve_on_simplex(n, max_iters, move |w| {
    let base = match objective {
      OptimizationObjective::MaxSharpe => {
        let vol = portfolio_volatility(w, &cov_owned);
        if vol < 1e-12 {
          1e6
        } else {
          -(portfolio_return(w, &mu) - risk_free) / vol
        }
      }
      OptimizationObjective::MinVolatility => portfolio_volatility(w, &cov_owned),
      OptimizationObjective::RiskParity => risk_parity_error(w, &cov_owned),
      OptimizationObjective::MaxDiversification => {
        let vol = portfolio_volatility(w, &cov_owned);
        if vol < 1e-12 {
          1e6
        } else {
          -diversification_numerator(w, &cov_owned) / vol
        }
      }
    };

    base + BOUND_PENALTY * bound_violation(w, &bounds_owned)
  });

  let weights = match solved {
    Some(w) => w,
    None => return OptimizationResult::failed("solver did not converge"),
  };

  if bound_violation(&weights, bounds).sqrt() > 1e-4 {
    return OptimizationResult::failed("weight bounds could not be satisfied");
  }

  let expected_return = portfolio_return(&weights, expected_returns);
  let volatility = portfolio_volatility(&weights, cov);
  let sharpe_ratio = if volatility > 1e-15 {
    (expected_return - risk_free) / volatility
  } else {
    0.0
  };

  let objective_value = match objective {
    OptimizationObjective::MaxSharpe => sharpe_ratio,
    OptimizationObjective::MinVolatility => volatility,
    OptimizationObjective::RiskParity => risk_parity_error(&weights, cov),
    OptimizationObjective::MaxDiversification => {
      if volatility > 1e-15 {
        diversification_numerator(&weights, cov) / volatility
      } else {
        0.0
      }
    }
  };

  OptimizationResult {
    success: true,
    weights,
    expected_return,
    volatility,
    sharpe_ratio,
    objective_value,
    message: None,
  }
}

/// Trace the efficient frontier between the minimum-variance and
/// maximum-return portfolios.
///
/// All output arrays have exactly `num_points` entries; a point whose solve
/// fails is recorded as NaN so index alignment with the target grid is
/// preserved.
pub fn calculate_efficient_frontier(
  expected_returns: &[f64],
  cov: &[Vec<f64>],
  num_points: usize,
) -> EfficientFrontier {
  let n = expected_returns.len();
  if n == 0 || num_points == 0 || cov.len() != n || cov.iter().any(|row| row.len() != n) {
    warn!(
      assets = n,
      num_points, "frontier inputs empty or of mismatched shape"
    );
    return EfficientFrontier::default();
  }

  let mu = expected_returns.to_vec();
  let cov_for_min = cov.to_vec();
  let min_vol_weights = solve_on_simplex(n, 5_000, move |w| portfolio_volatility(w, &cov_for_min));

  let mu_for_max = mu.clone();
  let max_ret_weights = solve_on_simplex(n, 5_000, move |w| -portfolio_return(w, &mu_for_max));

  let equal = vec![1.0 / n as f64; n];
  let ret_low = portfolio_return(min_vol_weights.as_deref().unwrap_or(&equal), expected_returns);
  let ret_high = max_ret_weights
    .as_deref()
    .map(|w| portfolio_return(w, expected_returns))
    .unwrap_or_else(|| expected_returns.iter().cloned().fold(f64::NEG_INFINITY, f64::max));

  let mut frontier = EfficientFrontier::default();

  for k in 0..num_points {
    let t = if num_points > 1 {
      k as f64 / (num_points - 1) as f64
    } else {
      0.0
    };
    let target = ret_low + t * (ret_high - ret_low);
    frontier.target_returns.push(target);

    let mu_k = mu.clone();
    let cov_k = cov.to_vec();
    let solved = solve_on_simplex(n, 5_000, move |w| {
      let sigma_w = mat_vec_mul(&cov_k, w);
      let variance = dot(w, &sigma_w);
      variance + TARGET_PENALTY * (portfolio_return(w, &mu_k) - target).powi(2)
    });

    match solved {
      Some(w) => {
        frontier.expected_returns.push(portfolio_return(&w, expected_returns));
        frontier.volatilities.push(portfolio_volatility(&w, cov));
        frontier.weights.push(w);
      }
      None => {
        frontier.expected_returns.push(f64::NAN);
        frontier.volatilities.push(f64::NAN);
        frontier.weights.push(Vec::new());
      }
    }
  }

  frontier
}
