//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::id::*;
use crate::progress::refresh_catalog_tiers;
use crate::registry::Registry;
use crate::sim::{SimConfig, step};
use crate::state::GameState;

// ===========================================================================
// Time
// ===========================================================================

/// 2026-06-01T00:00:00Z, outside every standard calendar window.
pub const MIDYEAR_MS: u64 = 1_780_272_000_000;

// ===========================================================================
// State builders
// ===========================================================================

pub fn with_cash(cash: u64) -> GameState {
    GameState {
        cash,
        ..GameState::new()
    }
}

pub fn with_items(items: &[(ItemTier, u64)]) -> GameState {
    let mut state = GameState::new();
    for &(tier, count) in items {
        state.items.insert(tier, count);
    }
    state
}

/// A late-game state touching every substate, for conservation checks.
pub fn populated() -> GameState {
    let mut s = with_items(&[
        (ItemTier::Quartz, 60),
        (ItemTier::Mechanical, 25),
        (ItemTier::Chronograph, 12),
        (ItemTier::Tourbillon, 2),
    ]);
    s.cash = 5_000_000;
    s.momentum = 30_000_000;
    s.carry.cash = 0.5;
    s.carry.momentum = 0.25;
    s.upgrades.insert(UpgradeId::Polishing, 4);
    s.upgrades.insert(UpgradeId::Vault, 1);
    s.milestones.insert(MilestoneId::FirstSteps);
    s.milestones.insert(MilestoneId::Collector);
    s.achievements.insert(AchievementId::FirstPurchase);
    s.achievements.insert(AchievementId::HundredPieces);
    s.workshop.blueprints = 6;
    s.workshop.resets = 3;
    s.workshop.upgrades.insert(WorkshopUpgradeId::Jigs, true);
    s.maison.heritage = 2;
    s.maison.reputation = 1;
    s.maison.upgrades.insert(MaisonUpgradeId::Atelier, true);
    s.maison.lines.insert(MaisonLineId::Dress, true);
    s.nostalgia.points = 3;
    s.nostalgia.resets = 1;
    s.nostalgia.unlocked = vec![ItemTier::Mechanical];
    s.nostalgia.earned = 5_000_000_000;
    if let Some(ev) = s.events.get_mut(&EventId::PrivateSale) {
        ev.active_until = MIDYEAR_MS + 10_000;
        ev.next_available = MIDYEAR_MS + 310_000;
    }
    s.catalog.discovered.insert(CatalogEntryId::QuartzCrisis);
    s.crafting.parts = 40;
    s.crafting.boosts.insert(CraftedBoostId::BalanceWheel, 2);
    s.career.level = 2;
    s.career.experience = 1;
    s.career.next_available = MIDYEAR_MS;
    refresh_catalog_tiers(&mut s, Registry::standard());
    s
}

// ===========================================================================
// Stepping
// ===========================================================================

/// Step `state` `ticks` times by `tick_ms`, starting the clock at `start`.
pub fn run_ticks(
    state: &GameState,
    registry: &Registry,
    start: u64,
    tick_ms: u64,
    ticks: u64,
) -> GameState {
    let config = SimConfig::default();
    let mut current = state.clone();
    for i in 1..=ticks {
        current = step(&current, tick_ms, start + i * tick_ms, registry, &config);
    }
    current
}
