//! Prices, the dual-currency purchase gate, and max-affordable counts.

use crate::id::{ItemTier, UpgradeId};
use crate::progress::is_item_unlocked;
use crate::registry::{ItemDef, Registry, UpgradeDef};
use crate::state::GameState;

/// Relative tolerance used to snap float prices onto whole units before
/// rounding up, so `15.000000000000002` is charged as 15, not 16.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Raw geometric-series price of buying `qty` units when `owned` are
/// already owned: `Σ base·growth^(owned+k)` for `k in 0..qty`.
pub fn series_price(base: f64, growth: f64, owned: u64, qty: u64) -> f64 {
    if qty == 0 {
        return 0.0;
    }
    if growth == 1.0 {
        return base * qty as f64;
    }
    let first = base * growth.powf(owned as f64);
    first * (growth.powf(qty as f64) - 1.0) / (growth - 1.0)
}

/// Round a float price up to whole currency units, saturating at `u64::MAX`.
pub fn to_units(raw: f64) -> u64 {
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    if !raw.is_finite() || raw >= u64::MAX as f64 {
        return u64::MAX;
    }
    let rounded = raw.round();
    if (raw - rounded).abs() <= SNAP_TOLERANCE * raw.max(1.0) {
        rounded as u64
    } else {
        raw.ceil() as u64
    }
}

/// Whole-unit price of `qty` more units of `def`.
pub fn quote(def: &ItemDef, owned: u64, qty: u64) -> u64 {
    to_units(series_price(def.base_price, def.growth, owned, qty))
}

/// Price of buying `qty` of `tier` given the current holdings.
pub fn item_price(state: &GameState, registry: &Registry, tier: ItemTier, qty: u64) -> u64 {
    match registry.item(tier) {
        Some(def) => quote(def, state.owned(tier), qty),
        None => u64::MAX,
    }
}

/// Momentum balance needed to buy `tier`. Waived by a nostalgia unlock.
pub fn momentum_requirement(state: &GameState, registry: &Registry, tier: ItemTier) -> u64 {
    if state.nostalgia.has_unlocked(tier) {
        return 0;
    }
    registry
        .item(tier)
        .map(|def| def.momentum_requirement)
        .unwrap_or(0)
}

/// Why a purchase gate is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateBlock {
    ZeroQuantity,
    Locked,
    /// Momentum short. Reported even when cash is also short.
    Momentum,
    /// Cash short while momentum is satisfied.
    Cash,
}

/// Result of checking an item purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseGate {
    pub ok: bool,
    pub price: u64,
    pub momentum_required: u64,
    pub blocked_by: Option<GateBlock>,
    pub cash_deficit: u64,
    pub momentum_deficit: u64,
}

/// Check whether `qty` units of `tier` can be bought right now.
///
/// Cash and momentum are independent conditions. When both fail the block
/// is reported as [`GateBlock::Momentum`]; both deficits are always filled.
pub fn purchase_gate(
    state: &GameState,
    registry: &Registry,
    tier: ItemTier,
    qty: u64,
) -> PurchaseGate {
    let price = item_price(state, registry, tier, qty);
    let momentum_required = momentum_requirement(state, registry, tier);
    let cash_deficit = price.saturating_sub(state.cash);
    let momentum_deficit = momentum_required.saturating_sub(state.momentum);

    let blocked_by = if qty == 0 {
        Some(GateBlock::ZeroQuantity)
    } else if !is_item_unlocked(state, registry, tier) {
        Some(GateBlock::Locked)
    } else if momentum_deficit > 0 {
        Some(GateBlock::Momentum)
    } else if cash_deficit > 0 || price == u64::MAX {
        Some(GateBlock::Cash)
    } else {
        None
    };

    PurchaseGate {
        ok: blocked_by.is_none(),
        price,
        momentum_required,
        blocked_by,
        cash_deficit,
        momentum_deficit,
    }
}

/// Largest quantity of `tier` purchasable with the current cash.
///
/// Zero when the item is locked or the momentum gate already fails. The
/// closed form `floor(log(cash·(g−1)/unit + 1) / log(g))` is nudged by exact
/// price checks so the answer always agrees with [`purchase_gate`].
pub fn max_affordable(state: &GameState, registry: &Registry, tier: ItemTier) -> u64 {
    let Some(def) = registry.item(tier) else {
        return 0;
    };
    if !is_item_unlocked(state, registry, tier)
        || state.momentum < momentum_requirement(state, registry, tier)
    {
        return 0;
    }

    let owned = state.owned(tier);
    let balance = state.cash as f64;
    let unit = def.base_price * def.growth.powf(owned as f64);
    if !unit.is_finite() || unit <= 0.0 {
        return 0;
    }

    let estimate = if def.growth == 1.0 {
        (balance / unit).floor()
    } else {
        ((balance * (def.growth - 1.0) / unit + 1.0).ln() / def.growth.ln()).floor()
    };
    let mut n = if estimate.is_finite() && estimate > 0.0 {
        estimate.min(u32::MAX as f64) as u64
    } else {
        0
    };

    while n > 0 && quote(def, owned, n) > state.cash {
        n -= 1;
    }
    for _ in 0..64 {
        if quote(def, owned, n + 1) <= state.cash {
            n += 1;
        } else {
            break;
        }
    }
    n
}

/// Cash cost of taking `def` from `level` to `level + 1`.
pub fn upgrade_cost(def: &UpgradeDef, level: u32) -> u64 {
    to_units(def.base_cost * def.cost_growth.powf(level as f64))
}

/// How many consecutive levels of an upgrade the current cash covers,
/// bounded by the upgrade's max level.
pub fn max_affordable_upgrades(state: &GameState, registry: &Registry, id: UpgradeId) -> u32 {
    let Some(def) = registry.upgrade(id) else {
        return 0;
    };
    let mut level = state.upgrade_level(id);
    let mut budget = state.cash;
    let mut count = 0;
    while level < def.max_level {
        let cost = upgrade_cost(def, level);
        if cost > budget {
            break;
        }
        budget -= cost;
        level += 1;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::MilestoneId;

    fn reg() -> &'static Registry {
        Registry::standard()
    }

    #[test]
    fn series_price_matches_summation() {
        let closed = series_price(15.0, 1.15, 3, 5);
        let summed: f64 = (0..5).map(|k| 15.0 * 1.15f64.powi(3 + k)).sum();
        assert!((closed - summed).abs() < 1e-9);
    }

    #[test]
    fn flat_growth_is_linear() {
        assert_eq!(series_price(7.0, 1.0, 100, 3), 21.0);
    }

    #[test]
    fn first_unit_costs_base_price() {
        let def = reg().item(ItemTier::Quartz).unwrap();
        assert_eq!(quote(def, 0, 1), 15);
    }

    #[test]
    fn to_units_rounds_up_fractions() {
        assert_eq!(to_units(17.25), 18);
        assert_eq!(to_units(15.000000000000002), 15);
        assert_eq!(to_units(0.0), 0);
        assert_eq!(to_units(f64::INFINITY), u64::MAX);
    }

    #[test]
    fn zero_quantity_is_blocked() {
        let state = GameState::new();
        let gate = purchase_gate(&state, reg(), ItemTier::Quartz, 0);
        assert!(!gate.ok);
        assert_eq!(gate.blocked_by, Some(GateBlock::ZeroQuantity));
    }

    #[test]
    fn locked_item_is_blocked() {
        let mut state = GameState::new();
        state.cash = u64::MAX / 2;
        state.momentum = 1_000_000;
        let gate = purchase_gate(&state, reg(), ItemTier::Chronograph, 1);
        assert_eq!(gate.blocked_by, Some(GateBlock::Locked));

        state.milestones.insert(MilestoneId::Collector);
        assert!(purchase_gate(&state, reg(), ItemTier::Chronograph, 1).ok);
    }

    #[test]
    fn momentum_wins_tie_break() {
        let state = GameState::new();
        let gate = purchase_gate(&state, reg(), ItemTier::Mechanical, 1);
        assert_eq!(gate.blocked_by, Some(GateBlock::Momentum));
        assert_eq!(gate.cash_deficit, 250);
        assert_eq!(gate.momentum_deficit, 50);
    }

    #[test]
    fn cash_reported_when_momentum_met() {
        let mut state = GameState::new();
        state.momentum = 50;
        state.cash = 100;
        let gate = purchase_gate(&state, reg(), ItemTier::Mechanical, 1);
        assert_eq!(gate.blocked_by, Some(GateBlock::Cash));
        assert_eq!(gate.cash_deficit, 150);
        assert_eq!(gate.momentum_deficit, 0);
    }

    #[test]
    fn nostalgia_unlock_waives_momentum() {
        let mut state = GameState::new();
        state.cash = 1_000;
        state.nostalgia.unlocked = vec![ItemTier::Mechanical];
        assert_eq!(momentum_requirement(&state, reg(), ItemTier::Mechanical), 0);
        assert!(purchase_gate(&state, reg(), ItemTier::Mechanical, 1).ok);
    }

    #[test]
    fn max_affordable_agrees_with_gate() {
        let mut state = GameState::new();
        for cash in [0u64, 14, 15, 16, 100, 1_000, 123_456] {
            state.cash = cash;
            let n = max_affordable(&state, reg(), ItemTier::Quartz);
            if n > 0 {
                assert!(purchase_gate(&state, reg(), ItemTier::Quartz, n).ok);
            }
            assert!(!purchase_gate(&state, reg(), ItemTier::Quartz, n + 1).ok);
        }
    }

    #[test]
    fn max_affordable_zero_when_momentum_gated() {
        let mut state = GameState::new();
        state.cash = 1_000_000;
        assert_eq!(max_affordable(&state, reg(), ItemTier::Mechanical), 0);
        state.momentum = 50;
        assert!(max_affordable(&state, reg(), ItemTier::Mechanical) > 0);
    }

    #[test]
    fn upgrade_cost_grows_per_level() {
        let def = reg().upgrade(UpgradeId::Polishing).unwrap();
        assert_eq!(upgrade_cost(def, 0), 100);
        assert_eq!(upgrade_cost(def, 1), 190);
        assert_eq!(upgrade_cost(def, 2), 361);
    }

    #[test]
    fn max_affordable_upgrades_respects_budget_and_cap() {
        let mut state = GameState::new();
        state.cash = 100 + 190;
        assert_eq!(max_affordable_upgrades(&state, reg(), UpgradeId::Polishing), 2);
        state.cash = u64::MAX;
        assert_eq!(max_affordable_upgrades(&state, reg(), UpgradeId::Polishing), 10);
    }
}
