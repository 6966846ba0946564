//! Production-rate composition.
//!
//! Cash income is `(flat + Σ count·income) × Π sources`, passed once through
//! the softcap, then scaled by the event multiplier. Momentum income only
//! sees the legacy multiplier.

use crate::registry::{Effect, Registry};
use crate::state::GameState;

// ---------------------------------------------------------------------------
// Effect folding
// ---------------------------------------------------------------------------

/// Accumulated upgrade effects.
#[derive(Debug, Clone, Copy, PartialEq)]
struct EffectTotals {
    income: f64,
    softcap: f64,
    exponent_bonus: f64,
}

impl EffectTotals {
    const IDENTITY: Self = Self {
        income: 1.0,
        softcap: 1.0,
        exponent_bonus: 0.0,
    };

    /// Apply `effect` `times` times.
    fn add(&mut self, effect: &Effect, times: u32) {
        if times == 0 {
            return;
        }
        if let Some(m) = effect.income_multiplier {
            self.income *= m.powi(times as i32);
        }
        if let Some(m) = effect.softcap_multiplier {
            self.softcap *= m.powi(times as i32);
        }
        if let Some(b) = effect.softcap_exponent_bonus {
            self.exponent_bonus += b * times as f64;
        }
    }
}

fn flat_upgrade_effects(state: &GameState, registry: &Registry) -> EffectTotals {
    let mut totals = EffectTotals::IDENTITY;
    for def in registry.upgrades() {
        totals.add(&def.effect, state.upgrade_level(def.id));
    }
    totals
}

fn workshop_effects(state: &GameState, registry: &Registry) -> EffectTotals {
    let mut totals = EffectTotals::IDENTITY;
    for def in registry.workshop_upgrades() {
        if state.workshop.owns(def.id) {
            totals.add(&def.effect, 1);
        }
    }
    totals
}

fn maison_effects(state: &GameState, registry: &Registry) -> EffectTotals {
    let mut totals = EffectTotals::IDENTITY;
    for def in registry.maison_upgrades() {
        if state.maison.owns(def.id) {
            totals.add(&def.effect, 1);
        }
    }
    for line in registry.maison_lines() {
        if state.maison.owns_line(line.id) {
            totals.income *= line.income_multiplier;
        }
    }
    totals
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// `Σ owned × collector value`.
pub fn collection_value(state: &GameState, registry: &Registry) -> f64 {
    registry
        .items()
        .map(|def| state.owned(def.tier) as f64 * def.collector_value)
        .sum()
}

/// Cross-tier multiplier from workshop resets and heritage, capped.
pub fn legacy_multiplier(state: &GameState, registry: &Registry) -> f64 {
    let eco = registry.economy();
    let raw = eco.legacy_workshop_base.powf(state.workshop.resets as f64)
        * eco.legacy_heritage_base.powf(state.maison.heritage as f64);
    raw.min(eco.legacy_cap)
}

/// Every income multiplier source, each counted exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplierBreakdown {
    pub upgrades: f64,
    pub set_bonuses: f64,
    pub collection: f64,
    pub workshop: f64,
    pub maison: f64,
    pub catalog: f64,
    pub abilities: f64,
    pub crafted: f64,
    pub legacy: f64,
}

impl MultiplierBreakdown {
    pub fn total(&self) -> f64 {
        self.upgrades
            * self.set_bonuses
            * self.collection
            * self.workshop
            * self.maison
            * self.catalog
            * self.abilities
            * self.crafted
            * self.legacy
    }
}

pub fn multiplier_breakdown(state: &GameState, registry: &Registry) -> MultiplierBreakdown {
    let set_bonuses: f64 = registry
        .set_bonuses()
        .iter()
        .filter(|set| {
            set.requirements
                .iter()
                .all(|&(tier, count)| state.owned(tier) >= count)
        })
        .map(|set| set.multiplier)
        .product();

    let value = collection_value(state, registry);
    let collection = registry
        .collection_tiers()
        .iter()
        .rev()
        .find(|tier| value >= tier.threshold)
        .map(|tier| tier.multiplier)
        .unwrap_or(1.0);

    let catalog: f64 = state
        .catalog
        .tiers
        .iter()
        .filter_map(|&id| registry.catalog_tier(id))
        .map(|tier| tier.multiplier)
        .product();

    let abilities: f64 = registry
        .abilities()
        .iter()
        .filter(|ability| state.owned(ability.tier) >= ability.count)
        .map(|ability| ability.multiplier)
        .product();

    let crafted: f64 = state
        .crafting
        .boosts
        .iter()
        .filter_map(|(&id, &count)| {
            registry
                .boost(id)
                .map(|def| 1.0 + def.per_unit * count as f64)
        })
        .product();

    MultiplierBreakdown {
        upgrades: flat_upgrade_effects(state, registry).income,
        set_bonuses,
        collection,
        workshop: workshop_effects(state, registry).income,
        maison: maison_effects(state, registry).income,
        catalog,
        abilities,
        crafted,
        legacy: legacy_multiplier(state, registry),
    }
}

pub fn income_multiplier(state: &GameState, registry: &Registry) -> f64 {
    multiplier_breakdown(state, registry).total()
}

/// Effective softcap after upgrades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Softcap {
    pub cap: f64,
    pub exponent: f64,
}

impl Softcap {
    pub fn apply(&self, raw: f64) -> f64 {
        apply_softcap(raw, self.cap, self.exponent)
    }
}

/// `raw` below the cap, `cap·(raw/cap)^exponent` above it.
pub fn apply_softcap(raw: f64, cap: f64, exponent: f64) -> f64 {
    if raw <= cap {
        raw
    } else {
        cap * (raw / cap).powf(exponent)
    }
}

pub fn softcap(state: &GameState, registry: &Registry) -> Softcap {
    let eco = registry.economy();
    let mut cap = eco.softcap;
    let mut exponent = eco.softcap_exponent;
    for totals in [
        flat_upgrade_effects(state, registry),
        workshop_effects(state, registry),
        maison_effects(state, registry),
    ] {
        cap *= totals.softcap;
        exponent += totals.exponent_bonus;
    }
    Softcap {
        cap,
        exponent: exponent.clamp(f64::MIN_POSITIVE, 1.0),
    }
}

/// Base income before multipliers.
pub fn base_income(state: &GameState, registry: &Registry) -> f64 {
    registry.economy().flat_base_income
        + registry
            .items()
            .map(|def| state.owned(def.tier) as f64 * def.income)
            .sum::<f64>()
}

/// Income before the softcap.
pub fn raw_cash_rate(state: &GameState, registry: &Registry) -> f64 {
    base_income(state, registry) * income_multiplier(state, registry)
}

/// Cash per second at the given event multiplier.
pub fn cash_rate(state: &GameState, registry: &Registry, event_multiplier: f64) -> f64 {
    softcap(state, registry).apply(raw_cash_rate(state, registry)) * event_multiplier
}

/// Momentum per second.
pub fn momentum_rate(state: &GameState, registry: &Registry) -> f64 {
    let base: f64 = registry
        .items()
        .map(|def| state.owned(def.tier) as f64 * def.momentum_income)
        .sum();
    base * legacy_multiplier(state, registry)
}
