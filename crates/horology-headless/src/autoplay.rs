//! A scripted player that exercises every transition.
//!
//! Each call to [`Autoplayer::act`] makes at most a handful of decisions in
//! a fixed priority order. It is not a good player; it only has to reach
//! every part of the economy in a long run.

use horology_core::actions::*;
use horology_core::event::{can_activate_event, negotiate};
use horology_core::id::*;
use horology_core::pricing::{max_affordable, purchase_gate};
use horology_core::prestige::*;
use horology_core::registry::Registry;
use horology_core::rng::SimRng;
use horology_core::state::GameState;
use tracing::debug;

/// Owned units of a tier above which the surplus is dismantled.
const DISMANTLE_ABOVE: u64 = 150;

/// Running totals for the end-of-run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoplayStats {
    pub items_bought: u64,
    pub upgrades_bought: u64,
    pub prestige_upgrades_bought: u64,
    pub boosts_crafted: u64,
    pub items_dismantled: u64,
    pub workshop_resets: u64,
    pub maison_resets: u64,
    pub nostalgia_resets: u64,
    pub nostalgia_unlocks: u64,
    pub negotiations_won: u64,
    pub negotiations_lost: u64,
    pub therapy_sessions: u64,
}

pub struct Autoplayer {
    rng: SimRng,
    tension: u32,
    stats: AutoplayStats,
}

impl Autoplayer {
    pub fn new(seed: u64, tension: u32) -> Self {
        Self {
            rng: SimRng::new(seed),
            tension,
            stats: AutoplayStats::default(),
        }
    }

    pub fn stats(&self) -> AutoplayStats {
        self.stats
    }

    /// Take this tick's actions and return the resulting state.
    pub fn act(&mut self, state: &GameState, registry: &Registry, now: u64) -> GameState {
        if let Some(next) = self.prestige(state, registry, now) {
            return next;
        }
        let mut s = state.clone();
        s = self.spend_prestige_currencies(&s, registry);
        s = self.side_activities(&s, registry, now);
        s = self.craft(&s, registry);
        s = self.buy_upgrades(&s, registry);
        self.buy_items(&s, registry)
    }

    // -----------------------------------------------------------------------
    // Decisions
    // -----------------------------------------------------------------------

    fn prestige(&mut self, state: &GameState, registry: &Registry, now: u64) -> Option<GameState> {
        if can_nostalgia_prestige(state, registry) {
            self.stats.nostalgia_resets += 1;
            return Some(nostalgia_prestige(state, registry, now));
        }
        if heritage_gain(state, registry) > 0 {
            self.stats.maison_resets += 1;
            return Some(maison_prestige(state, registry));
        }
        // Wait for two blueprints so a reset is worth the lost collection.
        if workshop_gain(state, registry) >= 2 {
            self.stats.workshop_resets += 1;
            return Some(workshop_prestige(state, registry));
        }
        None
    }

    fn spend_prestige_currencies(&mut self, state: &GameState, registry: &Registry) -> GameState {
        let mut s = state.clone();
        for slot in registry.nostalgia_order() {
            let next = buy_nostalgia_unlock(&s, registry, slot.item);
            if next == s {
                break;
            }
            self.stats.nostalgia_unlocks += 1;
            s = next;
        }
        for &id in WorkshopUpgradeId::ALL {
            if can_buy_workshop_upgrade(&s, registry, id) {
                s = buy_workshop_upgrade(&s, registry, id);
                self.stats.prestige_upgrades_bought += 1;
            }
        }
        for &id in MaisonUpgradeId::ALL {
            if can_buy_maison_upgrade(&s, registry, id) {
                s = buy_maison_upgrade(&s, registry, id);
                self.stats.prestige_upgrades_bought += 1;
            }
        }
        for &id in MaisonLineId::ALL {
            if can_buy_maison_line(&s, registry, id) {
                s = buy_maison_line(&s, registry, id);
                self.stats.prestige_upgrades_bought += 1;
            }
        }
        s
    }

    fn side_activities(&mut self, state: &GameState, registry: &Registry, now: u64) -> GameState {
        let mut s = state.clone();
        if can_hold_therapy_session(&s, now) {
            s = hold_therapy_session(&s, registry, now);
            self.stats.therapy_sessions += 1;
        }
        if let Some(negotiation) = registry.negotiation()
            && can_activate_event(&s, registry, negotiation.event, now)
        {
            let roll = self.rng.next_unit();
            s = negotiate(&s, registry, self.tension, roll, now);
            if s.event(negotiation.event).override_multiplier.is_some() {
                self.stats.negotiations_won += 1;
            } else {
                self.stats.negotiations_lost += 1;
            }
            debug!(roll, tension = self.tension, "negotiated");
        }
        s
    }

    fn craft(&mut self, state: &GameState, registry: &Registry) -> GameState {
        let mut s = state.clone();
        for &tier in ItemTier::ALL {
            let surplus = s.owned(tier).saturating_sub(DISMANTLE_ABOVE);
            if surplus > 0 {
                let next = dismantle_item(&s, registry, tier, surplus);
                if next != s {
                    self.stats.items_dismantled += surplus;
                    s = next;
                }
            }
        }
        for &id in RecipeId::ALL {
            while can_craft_boost(&s, registry, id) {
                s = craft_boost(&s, registry, id);
                self.stats.boosts_crafted += 1;
            }
        }
        s
    }

    fn buy_upgrades(&mut self, state: &GameState, registry: &Registry) -> GameState {
        let mut s = state.clone();
        for &id in UpgradeId::ALL {
            while can_buy_upgrade(&s, registry, id) {
                s = buy_upgrade(&s, registry, id);
                self.stats.upgrades_bought += 1;
            }
        }
        s
    }

    /// Best tier first, as many as cash allows.
    fn buy_items(&mut self, state: &GameState, registry: &Registry) -> GameState {
        let mut s = state.clone();
        for &tier in ItemTier::ALL.iter().rev() {
            let qty = max_affordable(&s, registry, tier);
            if qty > 0 && purchase_gate(&s, registry, tier, qty).ok {
                s = buy_item(&s, registry, tier, qty);
                self.stats.items_bought += qty;
            }
        }
        s
    }
}
