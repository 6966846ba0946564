//! The three prestige layers and the nostalgia unlock order.
//!
//! Every reset names the fields it clears. Anything not named is carried
//! over verbatim through struct update syntax.
//!
//! | Layer | Clears | Adds |
//! |---|---|---|
//! | workshop | cash, momentum, carry, items, flat upgrades | blueprints, reset count |
//! | maison | cash, momentum, carry, items, flat upgrades, workshop | heritage, reputation |
//! | nostalgia | cash, momentum, carry, flat upgrades, workshop, maison, milestones, events, crafting, career | points, reset count |
//!
//! Nostalgia keeps the item collection, the unlock allowlist, achievements
//! and the catalog.

use crate::id::ItemTier;
use crate::registry::Registry;
use crate::state::{
    AccrualCarry, CareerState, CraftingState, GameState, MaisonState, NostalgiaState,
    WorkshopState,
};
use std::collections::BTreeSet;
use tracing::{info, trace};

fn floor_sqrt(x: f64) -> u64 {
    if x.is_nan() || x <= 0.0 {
        return 0;
    }
    // `as` saturates on overflow.
    x.sqrt().floor() as u64
}

// ---------------------------------------------------------------------------
// Gains
// ---------------------------------------------------------------------------

/// Blueprints a workshop reset would grant.
pub fn workshop_gain(state: &GameState, registry: &Registry) -> u64 {
    floor_sqrt(state.momentum as f64 / registry.economy().workshop_threshold)
}

/// Heritage a maison reset would grant. Banked blueprints count toward it.
pub fn heritage_gain(state: &GameState, registry: &Registry) -> u64 {
    floor_sqrt(
        state.momentum as f64 / registry.economy().maison_threshold
            + state.workshop.blueprints as f64,
    )
}

/// Reputation a maison reset would grant: half the workshop resets.
pub fn reputation_gain(state: &GameState) -> u64 {
    state.workshop.resets / 2
}

/// Nostalgia points a nostalgia reset would grant.
pub fn nostalgia_gain(state: &GameState, registry: &Registry) -> u64 {
    floor_sqrt(state.nostalgia.earned as f64 / registry.economy().nostalgia_threshold)
}

pub fn can_workshop_prestige(state: &GameState, registry: &Registry) -> bool {
    workshop_gain(state, registry) > 0
}

/// Reputation alone is enough to allow a maison reset.
pub fn can_maison_prestige(state: &GameState, registry: &Registry) -> bool {
    heritage_gain(state, registry) > 0 || reputation_gain(state) > 0
}

pub fn can_nostalgia_prestige(state: &GameState, registry: &Registry) -> bool {
    nostalgia_gain(state, registry) > 0
}

// ---------------------------------------------------------------------------
// Resets
// ---------------------------------------------------------------------------

pub fn workshop_prestige(state: &GameState, registry: &Registry) -> GameState {
    let gain = workshop_gain(state, registry);
    if gain == 0 {
        trace!("workshop prestige rejected: no gain");
        return state.clone();
    }
    let fresh = GameState::new();
    let next = GameState {
        cash: 0,
        momentum: 0,
        carry: AccrualCarry::default(),
        items: fresh.items,
        upgrades: fresh.upgrades,
        workshop: WorkshopState {
            blueprints: state.workshop.blueprints.saturating_add(gain),
            resets: state.workshop.resets.saturating_add(1),
            upgrades: state.workshop.upgrades.clone(),
        },
        ..state.clone()
    };
    info!(
        gain,
        blueprints = next.workshop.blueprints,
        resets = next.workshop.resets,
        "workshop prestige"
    );
    next
}

pub fn maison_prestige(state: &GameState, registry: &Registry) -> GameState {
    let heritage = heritage_gain(state, registry);
    let reputation = reputation_gain(state);
    if heritage == 0 && reputation == 0 {
        trace!("maison prestige rejected: no gain");
        return state.clone();
    }
    let fresh = GameState::new();
    let next = GameState {
        cash: 0,
        momentum: 0,
        carry: AccrualCarry::default(),
        items: fresh.items,
        upgrades: fresh.upgrades,
        workshop: WorkshopState::default(),
        maison: MaisonState {
            heritage: state.maison.heritage.saturating_add(heritage),
            reputation: state.maison.reputation.saturating_add(reputation),
            upgrades: state.maison.upgrades.clone(),
            lines: state.maison.lines.clone(),
        },
        ..state.clone()
    };
    info!(heritage, reputation, "maison prestige");
    next
}

pub fn nostalgia_prestige(state: &GameState, registry: &Registry, now: u64) -> GameState {
    let gain = nostalgia_gain(state, registry);
    if gain == 0 {
        trace!("nostalgia prestige rejected: no gain");
        return state.clone();
    }
    let fresh = GameState::new();
    let next = GameState {
        cash: 0,
        momentum: 0,
        carry: AccrualCarry::default(),
        upgrades: fresh.upgrades,
        milestones: BTreeSet::new(),
        workshop: WorkshopState::default(),
        maison: MaisonState::default(),
        events: fresh.events,
        crafting: CraftingState::default(),
        career: CareerState::default(),
        nostalgia: NostalgiaState {
            points: state.nostalgia.points.saturating_add(gain),
            resets: state.nostalgia.resets.saturating_add(1),
            unlocked: state.nostalgia.unlocked.clone(),
            earned: 0,
            last_gain: gain,
            last_reset_at: now,
        },
        ..state.clone()
    };
    info!(gain, resets = next.nostalgia.resets, "nostalgia prestige");
    next
}

// ---------------------------------------------------------------------------
// Nostalgia unlocks
// ---------------------------------------------------------------------------

/// The longest prefix of the fixed unlock order contained in `set`.
pub fn ordered_allowlist(registry: &Registry, set: &BTreeSet<ItemTier>) -> Vec<ItemTier> {
    registry
        .nostalgia_order()
        .iter()
        .map(|slot| slot.item)
        .take_while(|item| set.contains(item))
        .collect()
}

/// True iff `item` is the next slot in the unlock order.
pub fn can_buy_nostalgia_unlock(state: &GameState, registry: &Registry, item: ItemTier) -> bool {
    match registry.nostalgia_position(item) {
        Some(position) => {
            !state.nostalgia.has_unlocked(item)
                && registry.nostalgia_order()[..position]
                    .iter()
                    .all(|slot| state.nostalgia.has_unlocked(slot.item))
        }
        None => false,
    }
}

pub fn nostalgia_unlock_cost(registry: &Registry, item: ItemTier) -> Option<u64> {
    registry
        .nostalgia_order()
        .iter()
        .find(|slot| slot.item == item)
        .map(|slot| slot.cost)
}

pub fn buy_nostalgia_unlock(state: &GameState, registry: &Registry, item: ItemTier) -> GameState {
    let Some(cost) = nostalgia_unlock_cost(registry, item) else {
        return state.clone();
    };
    if !can_buy_nostalgia_unlock(state, registry, item) || state.nostalgia.points < cost {
        trace!(%item, "nostalgia unlock rejected");
        return state.clone();
    }
    let mut set: BTreeSet<ItemTier> = state.nostalgia.unlocked.iter().copied().collect();
    set.insert(item);
    let mut next = state.clone();
    next.nostalgia.points -= cost;
    next.nostalgia.unlocked = ordered_allowlist(registry, &set);
    info!(%item, cost, "nostalgia unlock bought");
    next
}

/// Only the most recent unlock may be refunded.
pub fn can_refund_nostalgia_unlock(state: &GameState, item: ItemTier) -> bool {
    state.nostalgia.unlocked.last() == Some(&item)
}

pub fn refund_nostalgia_unlock(
    state: &GameState,
    registry: &Registry,
    item: ItemTier,
) -> GameState {
    let Some(cost) = nostalgia_unlock_cost(registry, item) else {
        return state.clone();
    };
    if !can_refund_nostalgia_unlock(state, item) {
        trace!(%item, "nostalgia refund rejected");
        return state.clone();
    }
    let mut set: BTreeSet<ItemTier> = state.nostalgia.unlocked.iter().copied().collect();
    set.remove(&item);
    let mut next = state.clone();
    next.nostalgia.points = next.nostalgia.points.saturating_add(cost);
    next.nostalgia.unlocked = ordered_allowlist(registry, &set);
    info!(%item, cost, "nostalgia unlock refunded");
    next
}
