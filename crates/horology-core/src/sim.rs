//! The fixed-cadence simulation step.

use crate::event::{apply_events, event_multiplier};
use crate::progress::apply_unlocks;
use crate::rates::{cash_rate, momentum_rate};
use crate::registry::Registry;
use crate::state::GameState;
use serde::{Deserialize, Serialize};

/// Driver-side simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Longest span a single step may cover. Longer gaps are truncated.
    pub max_step_ms: u64,
    /// Local time offset used for calendar event windows.
    pub utc_offset_minutes: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_step_ms: 60_000,
            utc_offset_minutes: 0,
        }
    }
}

/// Split `amount + carry` into whole units and the new carry.
fn accrue(amount: f64, carry: f64) -> (u64, f64) {
    let total = amount + carry;
    if !total.is_finite() || total <= 0.0 {
        return (0, carry.clamp(0.0, 1.0));
    }
    if total >= u64::MAX as f64 {
        return (u64::MAX, 0.0);
    }
    let whole = total.floor();
    (whole as u64, total - whole)
}

/// Advance `state` by `elapsed_ms` ending at `now`.
///
/// A zero-length step returns the input unchanged. Otherwise the elapsed
/// time is clamped to `config.max_step_ms`, events are advanced to `now`,
/// cash and momentum accrue at the resulting rates (sub-unit remainders are
/// kept in `state.carry`), and unlocks are re-evaluated.
pub fn step(
    state: &GameState,
    elapsed_ms: u64,
    now: u64,
    registry: &Registry,
    config: &SimConfig,
) -> GameState {
    if elapsed_ms == 0 {
        return state.clone();
    }
    let elapsed = elapsed_ms.min(config.max_step_ms);
    let seconds = elapsed as f64 / 1_000.0;

    let mut next = state.clone();
    apply_events(&mut next, registry, now, config.utc_offset_minutes);

    let multiplier = event_multiplier(&next, registry, now);
    let (cash, cash_carry) = accrue(
        cash_rate(&next, registry, multiplier) * seconds,
        next.carry.cash,
    );
    let (momentum, momentum_carry) =
        accrue(momentum_rate(&next, registry) * seconds, next.carry.momentum);

    next.cash = next.cash.saturating_add(cash);
    next.momentum = next.momentum.saturating_add(momentum);
    next.nostalgia.earned = next.nostalgia.earned.saturating_add(cash);
    next.carry.cash = cash_carry;
    next.carry.momentum = momentum_carry;

    apply_unlocks(&mut next, registry);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{AchievementId, ItemTier};

    fn reg() -> &'static Registry {
        Registry::standard()
    }

    fn cfg() -> SimConfig {
        SimConfig::default()
    }

    #[test]
    fn zero_step_is_identity() {
        let mut state = GameState::new();
        state.items.insert(ItemTier::Quartz, 3);
        assert_eq!(step(&state, 0, 123, reg(), &cfg()), state);
    }

    #[test]
    fn fresh_state_earns_base_income() {
        let state = GameState::new();
        let next = step(&state, 1_000, 1_000, reg(), &cfg());
        assert_eq!(next.cash, 1);
        assert_eq!(next.nostalgia.earned, 1);
    }

    #[test]
    fn split_steps_accrue_the_same() {
        let mut state = GameState::new();
        state.items.insert(ItemTier::Quartz, 7);
        state.items.insert(ItemTier::Mechanical, 3);

        let whole = step(&state, 1_000, 1_000, reg(), &cfg());
        let mut split = state.clone();
        for i in 1..=10 {
            split = step(&split, 100, i * 100, reg(), &cfg());
        }
        let total = |s: &GameState| s.cash as f64 + s.carry.cash;
        let total_momentum = |s: &GameState| s.momentum as f64 + s.carry.momentum;
        assert!((total(&whole) - total(&split)).abs() < 1e-6);
        assert!((total_momentum(&whole) - total_momentum(&split)).abs() < 1e-6);
    }

    #[test]
    fn long_gap_is_clamped() {
        let state = GameState::new();
        let next = step(&state, 3_600_000, 3_600_000, reg(), &cfg());
        assert_eq!(next.cash, 60);
    }

    #[test]
    fn momentum_accrues_with_carry() {
        let mut state = GameState::new();
        state.items.insert(ItemTier::Quartz, 1);
        let mut next = state.clone();
        for i in 1..=6 {
            next = step(&next, 1_000, i * 1_000, reg(), &cfg());
        }
        // 0.2 momentum per second.
        assert_eq!(next.momentum, 1);
        assert!((next.carry.momentum - 0.2).abs() < 1e-9);
    }

    #[test]
    fn step_evaluates_unlocks() {
        let mut state = GameState::new();
        state.cash = 999_999;
        let next = step(&state, 1_000, 1_000, reg(), &cfg());
        assert!(next.achievements.contains(&AchievementId::Millionaire));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"utc_offset_minutes": 60}"#).unwrap();
        assert_eq!(config.max_step_ms, 60_000);
        assert_eq!(config.utc_offset_minutes, 60);
    }
}
