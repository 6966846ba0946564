//! The player-progress aggregate.
//!
//! [`GameState`] is a plain value: every transition takes `&GameState` and
//! returns a new one. Maps keyed by closed enumerations always carry an
//! entry for every id, so lookups never need a registry.

use crate::id::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

fn zeroed<K: Ord + Copy, V: Default>(ids: &[K]) -> BTreeMap<K, V> {
    ids.iter().map(|&id| (id, V::default())).collect()
}

/// Tier-A prestige substate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkshopState {
    pub blueprints: u64,
    pub resets: u64,
    pub upgrades: BTreeMap<WorkshopUpgradeId, bool>,
}

impl Default for WorkshopState {
    fn default() -> Self {
        Self {
            blueprints: 0,
            resets: 0,
            upgrades: zeroed(WorkshopUpgradeId::ALL),
        }
    }
}

impl WorkshopState {
    pub fn owns(&self, id: WorkshopUpgradeId) -> bool {
        self.upgrades.get(&id).copied().unwrap_or(false)
    }
}

/// Tier-B prestige substate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaisonState {
    pub heritage: u64,
    pub reputation: u64,
    pub upgrades: BTreeMap<MaisonUpgradeId, bool>,
    pub lines: BTreeMap<MaisonLineId, bool>,
}

impl Default for MaisonState {
    fn default() -> Self {
        Self {
            heritage: 0,
            reputation: 0,
            upgrades: zeroed(MaisonUpgradeId::ALL),
            lines: zeroed(MaisonLineId::ALL),
        }
    }
}

impl MaisonState {
    pub fn owns(&self, id: MaisonUpgradeId) -> bool {
        self.upgrades.get(&id).copied().unwrap_or(false)
    }

    pub fn owns_line(&self, id: MaisonLineId) -> bool {
        self.lines.get(&id).copied().unwrap_or(false)
    }
}

/// Tier-C prestige substate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NostalgiaState {
    pub points: u64,
    pub resets: u64,
    /// Permanently unlocked items. Always a prefix of the registry's
    /// nostalgia order.
    pub unlocked: Vec<ItemTier>,
    /// Cash earned since the last nostalgia reset.
    pub earned: u64,
    pub last_gain: u64,
    pub last_reset_at: u64,
}

impl NostalgiaState {
    pub fn has_unlocked(&self, item: ItemTier) -> bool {
        self.unlocked.contains(&item)
    }
}

/// Scheduler state for one event. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EventState {
    pub active_until: u64,
    pub next_available: u64,
    /// Replaces the definition's multiplier for the current activation.
    pub override_multiplier: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogState {
    pub discovered: BTreeSet<CatalogEntryId>,
    pub tiers: BTreeSet<CatalogTierId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftingState {
    pub parts: u64,
    pub boosts: BTreeMap<CraftedBoostId, u64>,
}

impl Default for CraftingState {
    fn default() -> Self {
        Self {
            parts: 0,
            boosts: zeroed(CraftedBoostId::ALL),
        }
    }
}

impl CraftingState {
    pub fn boost_count(&self, id: CraftedBoostId) -> u64 {
        self.boosts.get(&id).copied().unwrap_or(0)
    }
}

/// The therapist side career.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CareerState {
    /// Always at least 1.
    pub level: u32,
    pub experience: u64,
    pub next_available: u64,
}

impl Default for CareerState {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            next_available: 0,
        }
    }
}

/// Sub-unit remainders of accrued currency, each in `[0, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccrualCarry {
    pub cash: f64,
    pub momentum: f64,
}

/// Everything describing one player's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub cash: u64,
    pub momentum: u64,
    pub items: BTreeMap<ItemTier, u64>,
    pub upgrades: BTreeMap<UpgradeId, u32>,
    pub milestones: BTreeSet<MilestoneId>,
    pub achievements: BTreeSet<AchievementId>,
    pub workshop: WorkshopState,
    pub maison: MaisonState,
    pub nostalgia: NostalgiaState,
    pub events: BTreeMap<EventId, EventState>,
    pub catalog: CatalogState,
    pub crafting: CraftingState,
    pub career: CareerState,
    pub carry: AccrualCarry,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A fresh save.
    pub fn new() -> Self {
        Self {
            cash: 0,
            momentum: 0,
            items: zeroed(ItemTier::ALL),
            upgrades: zeroed(UpgradeId::ALL),
            milestones: BTreeSet::new(),
            achievements: BTreeSet::new(),
            workshop: WorkshopState::default(),
            maison: MaisonState::default(),
            nostalgia: NostalgiaState::default(),
            events: zeroed(EventId::ALL),
            catalog: CatalogState::default(),
            crafting: CraftingState::default(),
            career: CareerState::default(),
            carry: AccrualCarry::default(),
        }
    }

    pub fn owned(&self, tier: ItemTier) -> u64 {
        self.items.get(&tier).copied().unwrap_or(0)
    }

    pub fn total_owned(&self) -> u64 {
        self.items.values().fold(0u64, |acc, &n| acc.saturating_add(n))
    }

    pub fn upgrade_level(&self, id: UpgradeId) -> u32 {
        self.upgrades.get(&id).copied().unwrap_or(0)
    }

    pub fn event(&self, id: EventId) -> EventState {
        self.events.get(&id).copied().unwrap_or_default()
    }
}
