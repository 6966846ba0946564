//! Unlock evaluation, catalog discovery and progress ratios.

use crate::id::{AchievementId, CatalogEntryId, ItemTier, MilestoneId};
use crate::prestige;
use crate::rates::collection_value;
use crate::registry::{CatalogEntryDef, Registry, Requirement};
use crate::state::GameState;
use tracing::debug;

/// Whether `tier` can be bought at all (momentum aside).
pub fn is_item_unlocked(state: &GameState, registry: &Registry, tier: ItemTier) -> bool {
    if state.nostalgia.has_unlocked(tier) {
        return true;
    }
    match registry.item(tier) {
        Some(def) => match def.unlock_milestone {
            Some(milestone) => state.milestones.contains(&milestone),
            None => true,
        },
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Requirements
// ---------------------------------------------------------------------------

/// Current value of the quantity a requirement measures.
pub fn requirement_current(req: &Requirement, state: &GameState, registry: &Registry) -> f64 {
    match *req {
        Requirement::ItemCount { tier, .. } => state.owned(tier) as f64,
        Requirement::TotalItems(_) => state.total_owned() as f64,
        Requirement::CollectionValue(_) => collection_value(state, registry),
        Requirement::Discoveries(_) => state.catalog.discovered.len() as f64,
        Requirement::Cash(_) => state.cash as f64,
        Requirement::CraftedBoosts(_) => state
            .crafting
            .boosts
            .values()
            .fold(0u64, |acc, &n| acc.saturating_add(n)) as f64,
        Requirement::Parts(_) => state.crafting.parts as f64,
        Requirement::WorkshopResets(_) => state.workshop.resets as f64,
        Requirement::Heritage(_) => state.maison.heritage as f64,
        Requirement::NostalgiaResets(_) => state.nostalgia.resets as f64,
    }
}

pub fn requirement_threshold(req: &Requirement) -> f64 {
    match *req {
        Requirement::ItemCount { count, .. } => count as f64,
        Requirement::CollectionValue(value) => value,
        Requirement::TotalItems(n)
        | Requirement::Discoveries(n)
        | Requirement::Cash(n)
        | Requirement::CraftedBoosts(n)
        | Requirement::Parts(n)
        | Requirement::WorkshopResets(n)
        | Requirement::Heritage(n)
        | Requirement::NostalgiaResets(n) => n as f64,
    }
}

pub fn requirement_met(req: &Requirement, state: &GameState, registry: &Registry) -> bool {
    requirement_current(req, state, registry) >= requirement_threshold(req)
}

/// `min(1, current / threshold)`. A non-positive threshold is always met.
pub fn progress_ratio(current: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 1.0;
    }
    (current / threshold).clamp(0.0, 1.0)
}

pub fn requirement_progress(req: &Requirement, state: &GameState, registry: &Registry) -> f64 {
    progress_ratio(
        requirement_current(req, state, registry),
        requirement_threshold(req),
    )
}

pub fn milestone_progress(state: &GameState, registry: &Registry, id: MilestoneId) -> f64 {
    registry
        .milestone(id)
        .map(|def| requirement_progress(&def.requirement, state, registry))
        .unwrap_or(0.0)
}

pub fn achievement_progress(state: &GameState, registry: &Registry, id: AchievementId) -> f64 {
    registry
        .achievement(id)
        .map(|def| requirement_progress(&def.requirement, state, registry))
        .unwrap_or(0.0)
}

/// The three prestige layers, shallowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrestigeTier {
    Workshop,
    Maison,
    Nostalgia,
}

/// Progress toward a prestige gain of at least one.
pub fn prestige_progress(state: &GameState, registry: &Registry, tier: PrestigeTier) -> f64 {
    let eco = registry.economy();
    match tier {
        PrestigeTier::Workshop => {
            progress_ratio(state.momentum as f64, eco.workshop_threshold)
        }
        PrestigeTier::Maison => {
            if prestige::reputation_gain(state) > 0 {
                return 1.0;
            }
            progress_ratio(
                state.momentum as f64 / eco.maison_threshold + state.workshop.blueprints as f64,
                1.0,
            )
        }
        PrestigeTier::Nostalgia => {
            progress_ratio(state.nostalgia.earned as f64, eco.nostalgia_threshold)
        }
    }
}

/// Whether a hidden section should be shown at this progress ratio.
pub fn is_revealed(registry: &Registry, ratio: f64) -> bool {
    ratio >= registry.economy().reveal_ratio
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Add every milestone and achievement whose requirement is now met.
/// Never removes anything.
pub fn evaluate_unlocks(state: &GameState, registry: &Registry) -> GameState {
    let mut next = state.clone();
    apply_unlocks(&mut next, registry);
    next
}

pub(crate) fn apply_unlocks(state: &mut GameState, registry: &Registry) {
    let milestones: Vec<MilestoneId> = registry
        .milestones()
        .filter(|def| !state.milestones.contains(&def.id))
        .filter(|def| requirement_met(&def.requirement, state, registry))
        .map(|def| def.id)
        .collect();
    for id in milestones {
        debug!(milestone = %id, "milestone unlocked");
        state.milestones.insert(id);
    }

    let achievements: Vec<AchievementId> = registry
        .achievements()
        .filter(|def| !state.achievements.contains(&def.id))
        .filter(|def| requirement_met(&def.requirement, state, registry))
        .map(|def| def.id)
        .collect();
    for id in achievements {
        debug!(achievement = %id, "achievement unlocked");
        state.achievements.insert(id);
    }
}

fn entry_matches(entry: &CatalogEntryDef, registry: &Registry, tier: ItemTier) -> bool {
    let Some(item) = registry.item(tier) else {
        return false;
    };
    if entry.tags.iter().any(|tag| item.tags.contains(tag)) {
        return true;
    }
    entry
        .title
        .to_lowercase()
        .contains(&item.name.to_lowercase())
}

/// Catalog entries matched by owned items but not yet discovered.
pub fn pending_discoveries(state: &GameState, registry: &Registry) -> Vec<CatalogEntryId> {
    registry
        .catalog_entries()
        .filter(|entry| !state.catalog.discovered.contains(&entry.id))
        .filter(|entry| {
            ItemTier::ALL
                .iter()
                .any(|&tier| state.owned(tier) > 0 && entry_matches(entry, registry, tier))
        })
        .map(|entry| entry.id)
        .collect()
}

/// Record new discoveries and the catalog tiers they complete.
pub(crate) fn apply_discoveries(state: &mut GameState, registry: &Registry) {
    for id in pending_discoveries(state, registry) {
        debug!(entry = %id, "catalog entry discovered");
        state.catalog.discovered.insert(id);
    }
    refresh_catalog_tiers(state, registry);
}

/// Recompute catalog tiers from the discovery count. Append-only.
pub(crate) fn refresh_catalog_tiers(state: &mut GameState, registry: &Registry) {
    let count = state.catalog.discovered.len() as u64;
    for tier in registry.catalog_tiers() {
        if count >= tier.discoveries {
            state.catalog.tiers.insert(tier.id);
        }
    }
}
