//! Immutable definition registry.
//!
//! Every number the economy uses lives here: item prices and incomes,
//! upgrade effects, unlock requirements, prestige thresholds, the softcap,
//! event timings. Selectors and transitions take `&Registry` and never
//! mutate it, so a rebalanced registry can be swapped in without touching
//! any logic.
//!
//! Construction follows a three-phase lifecycle: register definitions on a
//! [`RegistryBuilder`], optionally mutate them by id (this is how data files
//! rebalance the standard catalog), then [`RegistryBuilder::build`] validates
//! and freezes the result.

use crate::id::*;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Optional effects carried by an upgrade definition.
///
/// Effects are a closed set, folded over owned flags/levels with an
/// accumulator rather than dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Effect {
    pub income_multiplier: Option<f64>,
    pub softcap_multiplier: Option<f64>,
    pub softcap_exponent_bonus: Option<f64>,
}

impl Effect {
    pub fn income(multiplier: f64) -> Self {
        Self {
            income_multiplier: Some(multiplier),
            ..Self::default()
        }
    }

    pub fn softcap(multiplier: f64) -> Self {
        Self {
            softcap_multiplier: Some(multiplier),
            ..Self::default()
        }
    }

    pub fn exponent(bonus: f64) -> Self {
        Self {
            softcap_exponent_bonus: Some(bonus),
            ..Self::default()
        }
    }
}

/// A collectible item tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDef {
    pub tier: ItemTier,
    pub name: String,
    pub base_price: f64,
    /// Per-unit price growth. `1.0` means a flat price.
    pub growth: f64,
    /// Cash per second per owned unit.
    pub income: f64,
    /// Momentum per second per owned unit.
    pub momentum_income: f64,
    /// Contribution of one owned unit to the collection value.
    pub collector_value: f64,
    /// Momentum balance required to buy (never spent).
    pub momentum_requirement: u64,
    pub unlock_milestone: Option<MilestoneId>,
    /// Parts gained per dismantled unit. Zero means not dismantlable.
    pub parts_yield: u64,
    /// Catalog matching tags.
    pub tags: Vec<String>,
}

/// A measurable condition over the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Requirement {
    ItemCount { tier: ItemTier, count: u64 },
    TotalItems(u64),
    CollectionValue(f64),
    Discoveries(u64),
    Cash(u64),
    CraftedBoosts(u64),
    Parts(u64),
    WorkshopResets(u64),
    Heritage(u64),
    NostalgiaResets(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneDef {
    pub id: MilestoneId,
    pub name: String,
    pub requirement: Requirement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: String,
    pub requirement: Requirement,
}

/// A leveled cash upgrade. Its effect applies once per level.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: String,
    pub base_cost: f64,
    pub cost_growth: f64,
    pub max_level: u32,
    pub effect: Effect,
    pub requires: Option<MilestoneId>,
}

/// Active while every listed item threshold is met.
#[derive(Debug, Clone, PartialEq)]
pub struct SetBonusDef {
    pub name: String,
    pub requirements: Vec<(ItemTier, u64)>,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionTierDef {
    pub threshold: f64,
    pub multiplier: f64,
}

/// A small bonus tied to a single item count.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityDef {
    pub name: String,
    pub tier: ItemTier,
    pub count: u64,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkshopUpgradeDef {
    pub id: WorkshopUpgradeId,
    pub name: String,
    /// Cost in blueprints.
    pub cost: u64,
    pub effect: Effect,
    pub requires: Option<WorkshopUpgradeId>,
}

/// Which maison currency pays for a purchase. Never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaisonCurrency {
    Heritage,
    Reputation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaisonUpgradeDef {
    pub id: MaisonUpgradeId,
    pub name: String,
    pub cost: u64,
    pub currency: MaisonCurrency,
    pub effect: Effect,
    pub requires: Option<MaisonUpgradeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaisonLineDef {
    pub id: MaisonLineId,
    pub name: String,
    pub cost: u64,
    pub currency: MaisonCurrency,
    pub income_multiplier: f64,
    pub requires: Option<MaisonUpgradeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntryDef {
    pub id: CatalogEntryId,
    pub title: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogTierDef {
    pub id: CatalogTierId,
    pub discoveries: u64,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecipeDef {
    pub id: RecipeId,
    pub boost: CraftedBoostId,
    pub parts_cost: u64,
    /// Maximum number of boosts this recipe may ever produce.
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftedBoostDef {
    pub id: CraftedBoostId,
    /// Each crafted unit adds this much to the boost's `1 + x` multiplier.
    pub per_unit: f64,
}

/// What moves an event from idle to active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventTrigger {
    /// Fires when the collection value reaches the threshold while idle.
    Threshold { collection_value: f64 },
    /// Fires only when a caller activates it.
    Manual,
    /// Active every year from local midnight of `month`/`day` for the
    /// event's duration.
    Calendar { month: u32, day: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDef {
    pub id: EventId,
    pub name: String,
    pub trigger: EventTrigger,
    pub multiplier: f64,
    pub duration_ms: u64,
    /// Ignored by calendar events.
    pub cooldown_ms: u64,
}

/// One slot in the fixed nostalgia unlock order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NostalgiaUnlockDef {
    pub item: ItemTier,
    /// Cost in nostalgia points.
    pub cost: u64,
}

/// Global economy tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct Economy {
    /// Cash per second earned with nothing owned.
    pub flat_base_income: f64,
    pub softcap: f64,
    pub softcap_exponent: f64,
    /// Momentum per blueprint-squared (tier A).
    pub workshop_threshold: f64,
    /// Momentum per heritage-squared (tier B).
    pub maison_threshold: f64,
    /// Cumulative cash earned per nostalgia-point-squared (tier C).
    pub nostalgia_threshold: f64,
    pub legacy_workshop_base: f64,
    pub legacy_heritage_base: f64,
    pub legacy_cap: f64,
    /// Progress ratio at which a hidden section becomes visible.
    pub reveal_ratio: f64,
}

/// The therapist side career.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CareerDef {
    pub cooldown_ms: u64,
    pub cash_per_level: u64,
    /// Experience needed to leave level `n` is `xp_per_level * n`.
    pub xp_per_level: u64,
}

/// The tension minigame attached to a manual event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegotiationDef {
    pub event: EventId,
    pub max_tension: u32,
    pub base_multiplier: f64,
    pub multiplier_per_tension: f64,
    pub max_multiplier: f64,
    /// Success chance lost per tension point.
    pub risk_per_tension: f64,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`Registry`].
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    items: BTreeMap<ItemTier, ItemDef>,
    upgrades: BTreeMap<UpgradeId, UpgradeDef>,
    milestones: BTreeMap<MilestoneId, MilestoneDef>,
    achievements: BTreeMap<AchievementId, AchievementDef>,
    set_bonuses: Vec<SetBonusDef>,
    collection_tiers: Vec<CollectionTierDef>,
    abilities: Vec<AbilityDef>,
    workshop_upgrades: BTreeMap<WorkshopUpgradeId, WorkshopUpgradeDef>,
    maison_upgrades: BTreeMap<MaisonUpgradeId, MaisonUpgradeDef>,
    maison_lines: BTreeMap<MaisonLineId, MaisonLineDef>,
    catalog_entries: BTreeMap<CatalogEntryId, CatalogEntryDef>,
    catalog_tiers: BTreeMap<CatalogTierId, CatalogTierDef>,
    recipes: BTreeMap<RecipeId, RecipeDef>,
    boosts: BTreeMap<CraftedBoostId, CraftedBoostDef>,
    events: BTreeMap<EventId, EventDef>,
    nostalgia_order: Vec<NostalgiaUnlockDef>,
    economy: Economy,
    career: CareerDef,
    negotiation: Option<NegotiationDef>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// An empty builder with neutral economy tuning.
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            upgrades: BTreeMap::new(),
            milestones: BTreeMap::new(),
            achievements: BTreeMap::new(),
            set_bonuses: Vec::new(),
            collection_tiers: Vec::new(),
            abilities: Vec::new(),
            workshop_upgrades: BTreeMap::new(),
            maison_upgrades: BTreeMap::new(),
            maison_lines: BTreeMap::new(),
            catalog_entries: BTreeMap::new(),
            catalog_tiers: BTreeMap::new(),
            recipes: BTreeMap::new(),
            boosts: BTreeMap::new(),
            events: BTreeMap::new(),
            nostalgia_order: Vec::new(),
            economy: Economy {
                flat_base_income: 0.0,
                softcap: f64::MAX,
                softcap_exponent: 1.0,
                workshop_threshold: 1.0,
                maison_threshold: 1.0,
                nostalgia_threshold: 1.0,
                legacy_workshop_base: 1.0,
                legacy_heritage_base: 1.0,
                legacy_cap: 1.0,
                reveal_ratio: 0.8,
            },
            career: CareerDef {
                cooldown_ms: 0,
                cash_per_level: 0,
                xp_per_level: 1,
            },
            negotiation: None,
        }
    }

    // -- Phase 1: registration --

    pub fn register_item(&mut self, def: ItemDef) -> &mut Self {
        self.items.insert(def.tier, def);
        self
    }

    pub fn register_upgrade(&mut self, def: UpgradeDef) -> &mut Self {
        self.upgrades.insert(def.id, def);
        self
    }

    pub fn register_milestone(&mut self, def: MilestoneDef) -> &mut Self {
        self.milestones.insert(def.id, def);
        self
    }

    pub fn register_achievement(&mut self, def: AchievementDef) -> &mut Self {
        self.achievements.insert(def.id, def);
        self
    }

    pub fn register_set_bonus(&mut self, def: SetBonusDef) -> &mut Self {
        self.set_bonuses.push(def);
        self
    }

    pub fn register_collection_tier(&mut self, def: CollectionTierDef) -> &mut Self {
        self.collection_tiers.push(def);
        self
    }

    pub fn register_ability(&mut self, def: AbilityDef) -> &mut Self {
        self.abilities.push(def);
        self
    }

    pub fn register_workshop_upgrade(&mut self, def: WorkshopUpgradeDef) -> &mut Self {
        self.workshop_upgrades.insert(def.id, def);
        self
    }

    pub fn register_maison_upgrade(&mut self, def: MaisonUpgradeDef) -> &mut Self {
        self.maison_upgrades.insert(def.id, def);
        self
    }

    pub fn register_maison_line(&mut self, def: MaisonLineDef) -> &mut Self {
        self.maison_lines.insert(def.id, def);
        self
    }

    pub fn register_catalog_entry(&mut self, def: CatalogEntryDef) -> &mut Self {
        self.catalog_entries.insert(def.id, def);
        self
    }

    pub fn register_catalog_tier(&mut self, def: CatalogTierDef) -> &mut Self {
        self.catalog_tiers.insert(def.id, def);
        self
    }

    pub fn register_recipe(&mut self, def: RecipeDef) -> &mut Self {
        self.recipes.insert(def.id, def);
        self
    }

    pub fn register_boost(&mut self, def: CraftedBoostDef) -> &mut Self {
        self.boosts.insert(def.id, def);
        self
    }

    pub fn register_event(&mut self, def: EventDef) -> &mut Self {
        self.events.insert(def.id, def);
        self
    }

    /// Append the next slot of the nostalgia unlock order.
    pub fn push_nostalgia_unlock(&mut self, def: NostalgiaUnlockDef) -> &mut Self {
        self.nostalgia_order.push(def);
        self
    }

    pub fn set_economy(&mut self, economy: Economy) -> &mut Self {
        self.economy = economy;
        self
    }

    pub fn set_career(&mut self, career: CareerDef) -> &mut Self {
        self.career = career;
        self
    }

    pub fn set_negotiation(&mut self, negotiation: NegotiationDef) -> &mut Self {
        self.negotiation = Some(negotiation);
        self
    }

    // -- Phase 2: mutation --

    pub fn mutate_item<F>(&mut self, tier: ItemTier, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut ItemDef),
    {
        let def = self
            .items
            .get_mut(&tier)
            .ok_or_else(|| RegistryError::NotFound(tier.to_string()))?;
        f(def);
        Ok(())
    }

    pub fn mutate_upgrade<F>(&mut self, id: UpgradeId, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut UpgradeDef),
    {
        let def = self
            .upgrades
            .get_mut(&id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        f(def);
        Ok(())
    }

    pub fn mutate_event<F>(&mut self, id: EventId, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut EventDef),
    {
        let def = self
            .events
            .get_mut(&id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        f(def);
        Ok(())
    }

    pub fn mutate_nostalgia_unlock<F>(&mut self, item: ItemTier, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut NostalgiaUnlockDef),
    {
        let def = self
            .nostalgia_order
            .iter_mut()
            .find(|slot| slot.item == item)
            .ok_or_else(|| RegistryError::NotFound(item.to_string()))?;
        f(def);
        Ok(())
    }

    pub fn mutate_economy<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Economy),
    {
        f(&mut self.economy);
    }

    // -- Phase 3: finalization --

    /// Validate and freeze the registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        for &tier in ItemTier::ALL {
            let def = self
                .items
                .get(&tier)
                .ok_or(RegistryError::MissingItem(tier))?;
            if !(def.growth.is_finite() && def.growth >= 1.0) {
                return Err(RegistryError::InvalidValue {
                    what: format!("growth of {tier}"),
                    value: def.growth,
                });
            }
            if !(def.base_price.is_finite() && def.base_price > 0.0) {
                return Err(RegistryError::InvalidValue {
                    what: format!("base price of {tier}"),
                    value: def.base_price,
                });
            }
        }

        let economy = &self.economy;
        for (what, value) in [
            ("workshop threshold", economy.workshop_threshold),
            ("maison threshold", economy.maison_threshold),
            ("nostalgia threshold", economy.nostalgia_threshold),
            ("softcap", economy.softcap),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(RegistryError::InvalidValue {
                    what: what.to_string(),
                    value,
                });
            }
        }
        if economy.softcap_exponent.is_nan()
            || economy.softcap_exponent <= 0.0
            || economy.softcap_exponent > 1.0
        {
            return Err(RegistryError::InvalidValue {
                what: "softcap exponent".to_string(),
                value: economy.softcap_exponent,
            });
        }

        for (index, slot) in self.nostalgia_order.iter().enumerate() {
            if self.nostalgia_order[..index]
                .iter()
                .any(|earlier| earlier.item == slot.item)
            {
                return Err(RegistryError::DuplicateNostalgiaUnlock(slot.item));
            }
        }

        for recipe in self.recipes.values() {
            if !self.boosts.contains_key(&recipe.boost) {
                return Err(RegistryError::InvalidReference {
                    from: recipe.id.to_string(),
                    to: recipe.boost.to_string(),
                });
            }
        }

        for event in self.events.values() {
            if let EventTrigger::Calendar { month, day } = event.trigger
                && (!(1..=12).contains(&month) || !(1..=31).contains(&day))
            {
                return Err(RegistryError::InvalidCalendarDate(event.id));
            }
            if event.multiplier.is_nan() || event.multiplier < 0.0 {
                return Err(RegistryError::InvalidValue {
                    what: format!("multiplier of {}", event.id),
                    value: event.multiplier,
                });
            }
        }

        if let Some(negotiation) = &self.negotiation {
            match self.events.get(&negotiation.event) {
                Some(def) if def.trigger == EventTrigger::Manual => {}
                _ => {
                    return Err(RegistryError::InvalidReference {
                        from: "negotiation".to_string(),
                        to: negotiation.event.to_string(),
                    });
                }
            }
        }

        Ok(self.freeze())
    }

    /// Freeze without validation. Only used for the compiled-in catalog,
    /// whose validity is covered by tests.
    fn freeze(mut self) -> Registry {
        self.collection_tiers
            .sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Registry {
            items: self.items,
            upgrades: self.upgrades,
            milestones: self.milestones,
            achievements: self.achievements,
            set_bonuses: self.set_bonuses,
            collection_tiers: self.collection_tiers,
            abilities: self.abilities,
            workshop_upgrades: self.workshop_upgrades,
            maison_upgrades: self.maison_upgrades,
            maison_lines: self.maison_lines,
            catalog_entries: self.catalog_entries,
            catalog_tiers: self.catalog_tiers,
            recipes: self.recipes,
            boosts: self.boosts,
            events: self.events,
            nostalgia_order: self.nostalgia_order,
            economy: self.economy,
            career: self.career,
            negotiation: self.negotiation,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

static STANDARD: LazyLock<Registry> = LazyLock::new(|| RegistryBuilder::standard().freeze());

/// Immutable registry. Frozen after build(). Thread-safe to share.
#[derive(Debug, Clone)]
pub struct Registry {
    items: BTreeMap<ItemTier, ItemDef>,
    upgrades: BTreeMap<UpgradeId, UpgradeDef>,
    milestones: BTreeMap<MilestoneId, MilestoneDef>,
    achievements: BTreeMap<AchievementId, AchievementDef>,
    set_bonuses: Vec<SetBonusDef>,
    collection_tiers: Vec<CollectionTierDef>,
    abilities: Vec<AbilityDef>,
    workshop_upgrades: BTreeMap<WorkshopUpgradeId, WorkshopUpgradeDef>,
    maison_upgrades: BTreeMap<MaisonUpgradeId, MaisonUpgradeDef>,
    maison_lines: BTreeMap<MaisonLineId, MaisonLineDef>,
    catalog_entries: BTreeMap<CatalogEntryId, CatalogEntryDef>,
    catalog_tiers: BTreeMap<CatalogTierId, CatalogTierDef>,
    recipes: BTreeMap<RecipeId, RecipeDef>,
    boosts: BTreeMap<CraftedBoostId, CraftedBoostDef>,
    events: BTreeMap<EventId, EventDef>,
    nostalgia_order: Vec<NostalgiaUnlockDef>,
    economy: Economy,
    career: CareerDef,
    negotiation: Option<NegotiationDef>,
}

impl Registry {
    /// The compiled-in catalog, built once per process.
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    pub fn item(&self, tier: ItemTier) -> Option<&ItemDef> {
        self.items.get(&tier)
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    pub fn upgrade(&self, id: UpgradeId) -> Option<&UpgradeDef> {
        self.upgrades.get(&id)
    }

    pub fn upgrades(&self) -> impl Iterator<Item = &UpgradeDef> {
        self.upgrades.values()
    }

    pub fn milestone(&self, id: MilestoneId) -> Option<&MilestoneDef> {
        self.milestones.get(&id)
    }

    pub fn milestones(&self) -> impl Iterator<Item = &MilestoneDef> {
        self.milestones.values()
    }

    pub fn achievement(&self, id: AchievementId) -> Option<&AchievementDef> {
        self.achievements.get(&id)
    }

    pub fn achievements(&self) -> impl Iterator<Item = &AchievementDef> {
        self.achievements.values()
    }

    pub fn set_bonuses(&self) -> &[SetBonusDef] {
        &self.set_bonuses
    }

    /// Sorted by ascending threshold.
    pub fn collection_tiers(&self) -> &[CollectionTierDef] {
        &self.collection_tiers
    }

    pub fn abilities(&self) -> &[AbilityDef] {
        &self.abilities
    }

    pub fn workshop_upgrade(&self, id: WorkshopUpgradeId) -> Option<&WorkshopUpgradeDef> {
        self.workshop_upgrades.get(&id)
    }

    pub fn workshop_upgrades(&self) -> impl Iterator<Item = &WorkshopUpgradeDef> {
        self.workshop_upgrades.values()
    }

    pub fn maison_upgrade(&self, id: MaisonUpgradeId) -> Option<&MaisonUpgradeDef> {
        self.maison_upgrades.get(&id)
    }

    pub fn maison_upgrades(&self) -> impl Iterator<Item = &MaisonUpgradeDef> {
        self.maison_upgrades.values()
    }

    pub fn maison_line(&self, id: MaisonLineId) -> Option<&MaisonLineDef> {
        self.maison_lines.get(&id)
    }

    pub fn maison_lines(&self) -> impl Iterator<Item = &MaisonLineDef> {
        self.maison_lines.values()
    }

    pub fn catalog_entries(&self) -> impl Iterator<Item = &CatalogEntryDef> {
        self.catalog_entries.values()
    }

    pub fn catalog_entry(&self, id: CatalogEntryId) -> Option<&CatalogEntryDef> {
        self.catalog_entries.get(&id)
    }

    pub fn catalog_tiers(&self) -> impl Iterator<Item = &CatalogTierDef> {
        self.catalog_tiers.values()
    }

    pub fn catalog_tier(&self, id: CatalogTierId) -> Option<&CatalogTierDef> {
        self.catalog_tiers.get(&id)
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&RecipeDef> {
        self.recipes.get(&id)
    }

    pub fn recipes(&self) -> impl Iterator<Item = &RecipeDef> {
        self.recipes.values()
    }

    pub fn boost(&self, id: CraftedBoostId) -> Option<&CraftedBoostDef> {
        self.boosts.get(&id)
    }

    pub fn event(&self, id: EventId) -> Option<&EventDef> {
        self.events.get(&id)
    }

    pub fn events(&self) -> impl Iterator<Item = &EventDef> {
        self.events.values()
    }

    /// The fixed nostalgia unlock order.
    pub fn nostalgia_order(&self) -> &[NostalgiaUnlockDef] {
        &self.nostalgia_order
    }

    /// Position of an item in the nostalgia unlock order.
    pub fn nostalgia_position(&self, item: ItemTier) -> Option<usize> {
        self.nostalgia_order.iter().position(|slot| slot.item == item)
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn career(&self) -> &CareerDef {
        &self.career
    }

    pub fn negotiation(&self) -> Option<&NegotiationDef> {
        self.negotiation.as_ref()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("no definition for item tier {0}")]
    MissingItem(ItemTier),
    #[error("invalid {what}: {value}")]
    InvalidValue { what: String, value: f64 },
    #[error("item {0} appears twice in the nostalgia unlock order")]
    DuplicateNostalgiaUnlock(ItemTier),
    #[error("{from} references missing definition {to}")]
    InvalidReference { from: String, to: String },
    #[error("event {0} has an impossible calendar date")]
    InvalidCalendarDate(EventId),
}
