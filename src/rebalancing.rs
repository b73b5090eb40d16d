//! # Rebalancing Advisor
//!
//! $$
//! d_{\max} = \max_i |w_i^{cur} - w_i^{tgt}|
//! $$
//!
//! Drift detection against configurable thresholds and trade-list generation
//! with per-asset transaction-cost accounting.

use tracing::warn;

use crate::types::RebalancingPlan;
use crate::types::Trade;
use crate::types::TradeAction;

/// Thresholds and costs for [`suggest_rebalancing`].
///
/// The portfolio-level trigger and the per-asset trade-inclusion threshold
/// are independent; `Default` sets both to 0.05 for the legacy
/// single-threshold behavior.
#[derive(Clone, Debug)]
pub struct RebalancingConfig {
  /// Rebalance at all once `max_deviation >= trigger_threshold`.
  pub trigger_threshold: f64,
  /// Emit a trade for assets with `|deviation| >= trade_threshold`.
  pub trade_threshold: f64,
  /// Per-asset proportional cost rates; missing entries cost nothing.
  pub transaction_costs: Vec<f64>,
}

impl Default for RebalancingConfig {
  fn default() -> Self {
    Self {
      trigger_threshold: 0.05,
      trade_threshold: 0.05,
      transaction_costs: Vec::new(),
    }
  }
}

impl RebalancingConfig {
  /// Single-threshold configuration: trigger and trade share `threshold`.
  pub fn with_threshold(threshold: f64) -> Self {
    Self {
      trigger_threshold: threshold,
      trade_threshold: threshold,
      ..Self::default()
    }
  }
}

/// Compare current weights to targets and propose trades.
///
/// Deviations at the threshold boundary count as drift (the comparator is
/// `>=`). Below the trigger the plan is empty; above it, every asset whose
/// absolute deviation reaches the trade threshold gets a trade of
/// `target - current` with cost `|amount| * cost_rate`.
pub fn suggest_rebalancing(
  current_weights: &[f64],
  target_weights: &[f64],
  config: &RebalancingConfig,
) -> Option<RebalancingPlan> {
  let n = current_weights.len();
  if n == 0 || target_weights.len() != n {
    warn!(
      current = current_weights.len(),
      target = target_weights.len(),
      "rebalancing inputs empty or of mismatched length"
    );
    return None;
  }

  let deviations: Vec<f64> = current_weights
    .iter()
    .zip(target_weights.iter())
    .map(|(c, t)| t - c)
    .collect();
  let max_deviation = deviations.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));

  // Zero drift is never actionable, even under a zero trigger threshold.
  if max_deviation < config.trigger_threshold || max_deviation == 0.0 {
    return Some(RebalancingPlan {
      needs_rebalancing: false,
      max_deviation,
      trades: Vec::new(),
      total_transaction_cost: 0.0,
    });
  }

  let mut trades = Vec::new();
  let mut total_transaction_cost = 0.0;

  for (i, &amount) in deviations.iter().enumerate() {
    if amount.abs() < config.trade_threshold {
      continue;
    }

    let cost_rate = config.transaction_costs.get(i).copied().unwrap_or(0.0);
    let trade_cost = amount.abs() * cost_rate;
    total_transaction_cost += trade_cost;

    trades.push(Trade {
      asset_index: i,
      current_weight: current_weights[i],
      target_weight: target_weights[i],
      trade_amount: amount,
      trade_cost,
      action: if amount > 0.0 {
        TradeAction::Buy
      } else {
        TradeAction::Sell
      },
    });
  }

  Some(RebalancingPlan {
    needs_rebalancing: true,
    max_deviation,
    trades,
    total_transaction_cost,
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn boundary_deviation_triggers_rebalancing() {
    let current = vec![0.35, 0.25, 0.25, 0.15];
    let target = vec![0.30, 0.30, 0.20, 0.20];

    let plan = suggest_rebalancing(&current, &target, &RebalancingConfig::with_threshold(0.05))
      .unwrap();

    assert!(plan.needs_rebalancing);
    assert_abs_diff_eq!(plan.max_deviation, 0.05, epsilon = 1e-12);
    assert!(!plan.trades.is_empty());

    for trade in &plan.trades {
      let expected =
        target[trade.asset_index] - current[trade.asset_index];
      assert_abs_diff_eq!(trade.trade_amount, expected, epsilon = 1e-12);
      let action = if trade.trade_amount > 0.0 {
        TradeAction::Buy
      } else {
        TradeAction::Sell
      };
      assert_eq!(trade.action, action);
    }
  }

  #[test]
  fn no_drift_means_empty_plan_for_any_threshold() {
    let weights = vec![0.4, 0.35, 0.25];

    for threshold in [0.0, 0.01, 0.05, 0.5] {
      let plan =
        suggest_rebalancing(&weights, &weights, &RebalancingConfig::with_threshold(threshold))
          .unwrap();
      assert!(!plan.needs_rebalancing);
      assert!(plan.trades.is_empty());
      assert_eq!(plan.max_deviation, 0.0);
      assert_eq!(plan.total_transaction_cost, 0.0);
    }
  }

  #[test]
  fn higher_threshold_never_adds_trades() {
    let current = vec![0.40, 0.20, 0.25, 0.15];
    let target = vec![0.25, 0.30, 0.25, 0.20];

    let mut previous = usize::MAX;
    for threshold in [0.01, 0.04, 0.06, 0.11, 0.20] {
      let plan =
        suggest_rebalancing(&current, &target, &RebalancingConfig::with_threshold(threshold))
          .unwrap();
      assert!(plan.trades.len() <= previous);
      previous = plan.trades.len();
    }
  }

  #[test]
  fn transaction_costs_are_proportional_to_trade_size() {
    let current = vec![0.50, 0.50];
    let target = vec![0.30, 0.70];
    let config = RebalancingConfig {
      transaction_costs: vec![0.001, 0.002],
      ..RebalancingConfig::with_threshold(0.05)
    };

    let plan = suggest_rebalancing(&current, &target, &config).unwrap();
    assert_eq!(plan.trades.len(), 2);

    assert_eq!(plan.trades[0].action, TradeAction::Sell);
    assert_abs_diff_eq!(plan.trades[0].trade_cost, 0.20 * 0.001, epsilon = 1e-12);
    assert_eq!(plan.trades[1].action, TradeAction::Buy);
    assert_abs_diff_eq!(plan.trades[1].trade_cost, 0.20 * 0.002, epsilon = 1e-12);
    assert_abs_diff_eq!(
      plan.total_transaction_cost,
      0.20 * 0.001 + 0.20 * 0.002,
      epsilon = 1e-12
    );
  }

  #[test]
  fn missing_cost_entries_cost_nothing() {
    let plan = suggest_rebalancing(
      &[0.6, 0.4],
      &[0.4, 0.6],
      &RebalancingConfig {
        transaction_costs: vec![0.001],
        ..RebalancingConfig::with_threshold(0.05)
      },
    )
    .unwrap();

    assert_abs_diff_eq!(plan.trades[1].trade_cost, 0.0, epsilon = 1e-12);
  }

  #[test]
  fn separate_trade_threshold_filters_small_trades() {
    let current = vec![0.40, 0.28, 0.32];
    let target = vec![0.30, 0.33, 0.37];
    // Trigger fires on the 0.10 drift; only that asset clears the tighter
    // per-trade bar.
    let config = RebalancingConfig {
      trigger_threshold: 0.05,
      trade_threshold: 0.08,
      transaction_costs: Vec::new(),
    };

    let plan = suggest_rebalancing(&current, &target, &config).unwrap();
    assert!(plan.needs_rebalancing);
    assert_eq!(plan.trades.len(), 1);
    assert_eq!(plan.trades[0].asset_index, 0);
  }

  #[test]
  fn mismatched_lengths_are_rejected() {
    assert!(suggest_rebalancing(&[0.5, 0.5], &[1.0], &RebalancingConfig::default()).is_none());
    assert!(suggest_rebalancing(&[], &[], &RebalancingConfig::default()).is_none());
  }
}
