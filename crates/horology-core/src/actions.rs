//! Player actions.
//!
//! Every function takes the current state and returns the next one. A
//! rejected action returns an unchanged clone, so callers detect a no-op by
//! comparing with the input.

use crate::id::*;
use crate::pricing::{purchase_gate, upgrade_cost};
use crate::progress::{apply_discoveries, apply_unlocks};
use crate::registry::{MaisonCurrency, Registry};
use crate::state::{GameState, MaisonState};
use tracing::{debug, trace};

fn rejected(state: &GameState, action: &str, reason: &str) -> GameState {
    trace!(action, reason, "action rejected");
    state.clone()
}

/// Buy `qty` units of an item. Spends cash only; momentum is a gate.
pub fn buy_item(state: &GameState, registry: &Registry, tier: ItemTier, qty: u64) -> GameState {
    let gate = purchase_gate(state, registry, tier, qty);
    if let Some(block) = gate.blocked_by {
        trace!(%tier, qty, ?block, "buy_item rejected");
        return state.clone();
    }
    let mut next = state.clone();
    next.cash -= gate.price;
    let owned = next.items.entry(tier).or_insert(0);
    *owned = owned.saturating_add(qty);
    // Discoveries feed a milestone, so they go first.
    apply_discoveries(&mut next, registry);
    apply_unlocks(&mut next, registry);
    debug!(%tier, qty, price = gate.price, "items bought");
    next
}

/// Whether the next level of a flat upgrade can be bought now.
pub fn can_buy_upgrade(state: &GameState, registry: &Registry, id: UpgradeId) -> bool {
    let Some(def) = registry.upgrade(id) else {
        return false;
    };
    let level = state.upgrade_level(id);
    level < def.max_level
        && def.requires.is_none_or(|m| state.milestones.contains(&m))
        && state.cash >= upgrade_cost(def, level)
}

pub fn buy_upgrade(state: &GameState, registry: &Registry, id: UpgradeId) -> GameState {
    let Some(def) = registry.upgrade(id) else {
        return rejected(state, "buy_upgrade", "unknown upgrade");
    };
    if !can_buy_upgrade(state, registry, id) {
        return rejected(state, "buy_upgrade", "not eligible");
    }
    let level = state.upgrade_level(id);
    let mut next = state.clone();
    next.cash -= upgrade_cost(def, level);
    next.upgrades.insert(id, level + 1);
    apply_unlocks(&mut next, registry);
    debug!(upgrade = %id, level = level + 1, "upgrade bought");
    next
}

pub fn can_buy_workshop_upgrade(
    state: &GameState,
    registry: &Registry,
    id: WorkshopUpgradeId,
) -> bool {
    let Some(def) = registry.workshop_upgrade(id) else {
        return false;
    };
    !state.workshop.owns(id)
        && def.requires.is_none_or(|req| state.workshop.owns(req))
        && state.workshop.blueprints >= def.cost
}

pub fn buy_workshop_upgrade(
    state: &GameState,
    registry: &Registry,
    id: WorkshopUpgradeId,
) -> GameState {
    let Some(def) = registry.workshop_upgrade(id) else {
        return rejected(state, "buy_workshop_upgrade", "unknown upgrade");
    };
    if !can_buy_workshop_upgrade(state, registry, id) {
        return rejected(state, "buy_workshop_upgrade", "not eligible");
    }
    let mut next = state.clone();
    next.workshop.blueprints -= def.cost;
    next.workshop.upgrades.insert(id, true);
    debug!(upgrade = %id, "workshop upgrade bought");
    next
}

fn maison_balance(maison: &MaisonState, currency: MaisonCurrency) -> u64 {
    match currency {
        MaisonCurrency::Heritage => maison.heritage,
        MaisonCurrency::Reputation => maison.reputation,
    }
}

fn spend_maison(maison: &mut MaisonState, currency: MaisonCurrency, cost: u64) {
    match currency {
        MaisonCurrency::Heritage => maison.heritage -= cost,
        MaisonCurrency::Reputation => maison.reputation -= cost,
    }
}

pub fn can_buy_maison_upgrade(
    state: &GameState,
    registry: &Registry,
    id: MaisonUpgradeId,
) -> bool {
    let Some(def) = registry.maison_upgrade(id) else {
        return false;
    };
    !state.maison.owns(id)
        && def.requires.is_none_or(|req| state.maison.owns(req))
        && maison_balance(&state.maison, def.currency) >= def.cost
}

/// Spends heritage or reputation, strictly per the upgrade's currency.
pub fn buy_maison_upgrade(
    state: &GameState,
    registry: &Registry,
    id: MaisonUpgradeId,
) -> GameState {
    let Some(def) = registry.maison_upgrade(id) else {
        return rejected(state, "buy_maison_upgrade", "unknown upgrade");
    };
    if !can_buy_maison_upgrade(state, registry, id) {
        return rejected(state, "buy_maison_upgrade", "not eligible");
    }
    let mut next = state.clone();
    spend_maison(&mut next.maison, def.currency, def.cost);
    next.maison.upgrades.insert(id, true);
    debug!(upgrade = %id, currency = ?def.currency, "maison upgrade bought");
    next
}

pub fn can_buy_maison_line(state: &GameState, registry: &Registry, id: MaisonLineId) -> bool {
    let Some(def) = registry.maison_line(id) else {
        return false;
    };
    !state.maison.owns_line(id)
        && def.requires.is_none_or(|req| state.maison.owns(req))
        && maison_balance(&state.maison, def.currency) >= def.cost
}

pub fn buy_maison_line(state: &GameState, registry: &Registry, id: MaisonLineId) -> GameState {
    let Some(def) = registry.maison_line(id) else {
        return rejected(state, "buy_maison_line", "unknown line");
    };
    if !can_buy_maison_line(state, registry, id) {
        return rejected(state, "buy_maison_line", "not eligible");
    }
    let mut next = state.clone();
    spend_maison(&mut next.maison, def.currency, def.cost);
    next.maison.lines.insert(id, true);
    debug!(line = %id, "maison line bought");
    next
}

/// Break `qty` owned units down into parts.
pub fn dismantle_item(
    state: &GameState,
    registry: &Registry,
    tier: ItemTier,
    qty: u64,
) -> GameState {
    let Some(def) = registry.item(tier) else {
        return rejected(state, "dismantle_item", "unknown item");
    };
    if qty == 0 || def.parts_yield == 0 || state.owned(tier) < qty {
        return rejected(state, "dismantle_item", "not enough owned");
    }
    let parts = def.parts_yield.saturating_mul(qty);
    let mut next = state.clone();
    next.items.insert(tier, state.owned(tier) - qty);
    next.crafting.parts = next.crafting.parts.saturating_add(parts);
    apply_unlocks(&mut next, registry);
    debug!(%tier, qty, parts, "items dismantled");
    next
}

pub fn can_craft_boost(state: &GameState, registry: &Registry, id: RecipeId) -> bool {
    let Some(recipe) = registry.recipe(id) else {
        return false;
    };
    let crafted = state.crafting.boost_count(recipe.boost);
    state.crafting.parts >= recipe.parts_cost && recipe.limit.is_none_or(|limit| crafted < limit)
}

/// Spend parts on a recipe. Crafted boosts are never removed.
pub fn craft_boost(state: &GameState, registry: &Registry, id: RecipeId) -> GameState {
    let Some(recipe) = registry.recipe(id) else {
        return rejected(state, "craft_boost", "unknown recipe");
    };
    if !can_craft_boost(state, registry, id) {
        return rejected(state, "craft_boost", "not eligible");
    }
    let mut next = state.clone();
    next.crafting.parts -= recipe.parts_cost;
    let count = next.crafting.boosts.entry(recipe.boost).or_insert(0);
    *count += 1;
    apply_unlocks(&mut next, registry);
    debug!(recipe = %id, boost = %recipe.boost, "boost crafted");
    next
}

pub fn can_hold_therapy_session(state: &GameState, now: u64) -> bool {
    now >= state.career.next_available
}

/// Run one therapist session: cash, experience, maybe a level.
pub fn hold_therapy_session(state: &GameState, registry: &Registry, now: u64) -> GameState {
    if !can_hold_therapy_session(state, now) {
        return rejected(state, "hold_therapy_session", "on cooldown");
    }
    let career = registry.career();
    let fee = career.cash_per_level.saturating_mul(state.career.level as u64);

    let mut next = state.clone();
    next.cash = next.cash.saturating_add(fee);
    next.nostalgia.earned = next.nostalgia.earned.saturating_add(fee);
    next.career.experience += 1;
    let needed = career.xp_per_level.saturating_mul(next.career.level as u64);
    if next.career.experience >= needed {
        next.career.experience -= needed;
        next.career.level = next.career.level.saturating_add(1);
        debug!(level = next.career.level, "career level up");
    }
    next.career.next_available = now.saturating_add(career.cooldown_ms);
    apply_unlocks(&mut next, registry);
    debug!(fee, "therapy session held");
    next
}
