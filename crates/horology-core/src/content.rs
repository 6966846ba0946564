//! The compiled-in standard catalog.

use crate::id::*;
use crate::registry::*;

const SECOND: u64 = 1_000;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

impl RegistryBuilder {
    /// A builder pre-loaded with the standard catalog.
    pub fn standard() -> Self {
        let mut b = RegistryBuilder::new();

        b.set_economy(Economy {
            flat_base_income: 1.0,
            softcap: 100_000.0,
            softcap_exponent: 0.5,
            workshop_threshold: 800_000.0,
            maison_threshold: 20_000_000.0,
            nostalgia_threshold: 1_000_000_000.0,
            legacy_workshop_base: 1.05,
            legacy_heritage_base: 1.03,
            legacy_cap: 10.0,
            reveal_ratio: 0.8,
        });

        // -- Items --

        b.register_item(ItemDef {
            tier: ItemTier::Quartz,
            name: "Quartz".to_string(),
            base_price: 15.0,
            growth: 1.15,
            income: 1.0,
            momentum_income: 0.2,
            collector_value: 10.0,
            momentum_requirement: 0,
            unlock_milestone: None,
            parts_yield: 1,
            tags: tags(&["quartz", "battery", "everyday"]),
        })
        .register_item(ItemDef {
            tier: ItemTier::Mechanical,
            name: "Mechanical".to_string(),
            base_price: 250.0,
            growth: 1.15,
            income: 8.0,
            momentum_income: 1.0,
            collector_value: 150.0,
            momentum_requirement: 50,
            unlock_milestone: None,
            parts_yield: 4,
            tags: tags(&["mechanical", "movement", "hand-wound"]),
        })
        .register_item(ItemDef {
            tier: ItemTier::Chronograph,
            name: "Chronograph".to_string(),
            base_price: 4_000.0,
            growth: 1.18,
            income: 60.0,
            momentum_income: 6.0,
            collector_value: 2_500.0,
            momentum_requirement: 500,
            unlock_milestone: Some(MilestoneId::Collector),
            parts_yield: 15,
            tags: tags(&["chronograph", "complication", "sport"]),
        })
        .register_item(ItemDef {
            tier: ItemTier::Tourbillon,
            name: "Tourbillon".to_string(),
            base_price: 75_000.0,
            growth: 1.2,
            income: 500.0,
            momentum_income: 40.0,
            collector_value: 50_000.0,
            momentum_requirement: 5_000,
            unlock_milestone: Some(MilestoneId::Connoisseur),
            parts_yield: 60,
            tags: tags(&["tourbillon", "complication", "haute-horlogerie"]),
        });

        // -- Flat upgrades --

        b.register_upgrade(UpgradeDef {
            id: UpgradeId::Polishing,
            name: "Polishing Bench".to_string(),
            base_cost: 100.0,
            cost_growth: 1.9,
            max_level: 10,
            effect: Effect::income(1.25),
            requires: None,
        })
        .register_upgrade(UpgradeDef {
            id: UpgradeId::Marketing,
            name: "Boutique Marketing".to_string(),
            base_cost: 2_500.0,
            cost_growth: 2.4,
            max_level: 8,
            effect: Effect::income(1.5),
            requires: Some(MilestoneId::FirstSteps),
        })
        .register_upgrade(UpgradeDef {
            id: UpgradeId::Vault,
            name: "Climate Vault".to_string(),
            base_cost: 50_000.0,
            cost_growth: 3.0,
            max_level: 5,
            effect: Effect::softcap(1.5),
            requires: Some(MilestoneId::Collector),
        });

        // -- Milestones --

        for (id, name, requirement) in [
            (
                MilestoneId::FirstSteps,
                "First Steps",
                Requirement::ItemCount {
                    tier: ItemTier::Quartz,
                    count: 10,
                },
            ),
            (
                MilestoneId::Collector,
                "Collector",
                Requirement::CollectionValue(5_000.0),
            ),
            (MilestoneId::Archivist, "Archivist", Requirement::Discoveries(3)),
            (
                MilestoneId::Connoisseur,
                "Connoisseur",
                Requirement::ItemCount {
                    tier: ItemTier::Chronograph,
                    count: 10,
                },
            ),
            (
                MilestoneId::Curator,
                "Curator",
                Requirement::CollectionValue(1_000_000.0),
            ),
        ] {
            b.register_milestone(MilestoneDef {
                id,
                name: name.to_string(),
                requirement,
            });
        }

        // -- Achievements --

        for (id, name, requirement) in [
            (
                AchievementId::FirstPurchase,
                "First Purchase",
                Requirement::TotalItems(1),
            ),
            (
                AchievementId::HundredPieces,
                "Hundred Pieces",
                Requirement::TotalItems(100),
            ),
            (
                AchievementId::Millionaire,
                "Millionaire",
                Requirement::Cash(1_000_000),
            ),
            (AchievementId::Tinkerer, "Tinkerer", Requirement::CraftedBoosts(1)),
            (AchievementId::Scrapper, "Scrapper", Requirement::Parts(50)),
            (
                AchievementId::Apprentice,
                "Apprentice",
                Requirement::WorkshopResets(1),
            ),
            (AchievementId::Heir, "Heir", Requirement::Heritage(1)),
            (
                AchievementId::Nostalgic,
                "Nostalgic",
                Requirement::NostalgiaResets(1),
            ),
            (
                AchievementId::Encyclopedist,
                "Encyclopedist",
                Requirement::Discoveries(CatalogEntryId::ALL.len() as u64),
            ),
        ] {
            b.register_achievement(AchievementDef {
                id,
                name: name.to_string(),
                requirement,
            });
        }

        // -- Multiplier sources --

        b.register_set_bonus(SetBonusDef {
            name: "Starter Set".to_string(),
            requirements: vec![(ItemTier::Quartz, 10), (ItemTier::Mechanical, 5)],
            multiplier: 1.2,
        })
        .register_set_bonus(SetBonusDef {
            name: "Sport Set".to_string(),
            requirements: vec![(ItemTier::Mechanical, 10), (ItemTier::Chronograph, 5)],
            multiplier: 1.35,
        })
        .register_set_bonus(SetBonusDef {
            name: "Grand Set".to_string(),
            requirements: vec![
                (ItemTier::Quartz, 25),
                (ItemTier::Mechanical, 25),
                (ItemTier::Chronograph, 25),
                (ItemTier::Tourbillon, 5),
            ],
            multiplier: 2.0,
        });

        for (threshold, multiplier) in [
            (10_000.0, 1.1),
            (100_000.0, 1.25),
            (1_000_000.0, 1.5),
            (10_000_000.0, 2.0),
        ] {
            b.register_collection_tier(CollectionTierDef {
                threshold,
                multiplier,
            });
        }

        b.register_ability(AbilityDef {
            name: "Assembly Line".to_string(),
            tier: ItemTier::Quartz,
            count: 50,
            multiplier: 1.1,
        })
        .register_ability(AbilityDef {
            name: "Master Hand".to_string(),
            tier: ItemTier::Tourbillon,
            count: 1,
            multiplier: 1.15,
        });

        // -- Workshop (tier A) --

        b.register_workshop_upgrade(WorkshopUpgradeDef {
            id: WorkshopUpgradeId::Jigs,
            name: "Assembly Jigs".to_string(),
            cost: 1,
            effect: Effect::income(1.5),
            requires: None,
        })
        .register_workshop_upgrade(WorkshopUpgradeDef {
            id: WorkshopUpgradeId::Lathe,
            name: "Watchmaker's Lathe".to_string(),
            cost: 3,
            effect: Effect::income(2.0),
            requires: Some(WorkshopUpgradeId::Jigs),
        })
        .register_workshop_upgrade(WorkshopUpgradeDef {
            id: WorkshopUpgradeId::Loupe,
            name: "Master Loupe".to_string(),
            cost: 2,
            effect: Effect::softcap(2.0),
            requires: Some(WorkshopUpgradeId::Jigs),
        })
        .register_workshop_upgrade(WorkshopUpgradeDef {
            id: WorkshopUpgradeId::Escapement,
            name: "Free Escapement".to_string(),
            cost: 5,
            effect: Effect::exponent(0.1),
            requires: Some(WorkshopUpgradeId::Loupe),
        });

        // -- Maison (tier B) --

        b.register_maison_upgrade(MaisonUpgradeDef {
            id: MaisonUpgradeId::Atelier,
            name: "Family Atelier".to_string(),
            cost: 1,
            currency: MaisonCurrency::Heritage,
            effect: Effect::income(2.0),
            requires: None,
        })
        .register_maison_upgrade(MaisonUpgradeDef {
            id: MaisonUpgradeId::Archives,
            name: "Maison Archives".to_string(),
            cost: 2,
            currency: MaisonCurrency::Reputation,
            effect: Effect::softcap(3.0),
            requires: None,
        })
        .register_maison_upgrade(MaisonUpgradeDef {
            id: MaisonUpgradeId::Guild,
            name: "Guild Charter".to_string(),
            cost: 3,
            currency: MaisonCurrency::Heritage,
            effect: Effect::exponent(0.1),
            requires: Some(MaisonUpgradeId::Atelier),
        });

        b.register_maison_line(MaisonLineDef {
            id: MaisonLineId::Dress,
            name: "Dress Line".to_string(),
            cost: 1,
            currency: MaisonCurrency::Heritage,
            income_multiplier: 1.5,
            requires: None,
        })
        .register_maison_line(MaisonLineDef {
            id: MaisonLineId::Diver,
            name: "Diver Line".to_string(),
            cost: 2,
            currency: MaisonCurrency::Reputation,
            income_multiplier: 1.75,
            requires: None,
        })
        .register_maison_line(MaisonLineDef {
            id: MaisonLineId::Complication,
            name: "Complication Line".to_string(),
            cost: 5,
            currency: MaisonCurrency::Heritage,
            income_multiplier: 2.5,
            requires: Some(MaisonUpgradeId::Atelier),
        });

        // -- Catalog --

        for (id, title, entry_tags) in [
            (CatalogEntryId::QuartzCrisis, "The Quartz Crisis", &["battery"][..]),
            (CatalogEntryId::DigitalDawn, "Digital Dawn", &["quartz", "digital"][..]),
            (CatalogEntryId::CalibreHistory, "A History of Calibres", &["movement"][..]),
            (CatalogEntryId::HandWinding, "The Art of Hand Winding", &["hand-wound"][..]),
            (CatalogEntryId::RacingChronographs, "Racing Chronographs", &["sport"][..]),
            (CatalogEntryId::DiveWatches, "Dive Watches", &["sport", "diver"][..]),
            (CatalogEntryId::MoonPhases, "Moon Phases", &["complication"][..]),
            (
                CatalogEntryId::TourbillonInvention,
                "Breguet's Tourbillon",
                &["haute-horlogerie"][..],
            ),
            (
                CatalogEntryId::GrandComplications,
                "Grand Complications",
                &["complication", "haute-horlogerie"][..],
            ),
            (CatalogEntryId::EverydayWear, "Everyday Wear", &["everyday"][..]),
        ] {
            b.register_catalog_entry(CatalogEntryDef {
                id,
                title: title.to_string(),
                tags: tags(entry_tags),
            });
        }

        for (id, discoveries, multiplier) in [
            (CatalogTierId::Novice, 3, 1.05),
            (CatalogTierId::Scholar, 6, 1.1),
            (CatalogTierId::Historian, 10, 1.25),
        ] {
            b.register_catalog_tier(CatalogTierDef {
                id,
                discoveries,
                multiplier,
            });
        }

        // -- Crafting --

        for (recipe, boost, parts_cost, limit, per_unit) in [
            (RecipeId::Mainspring, CraftedBoostId::Mainspring, 25, None, 0.05),
            (RecipeId::BalanceWheel, CraftedBoostId::BalanceWheel, 60, None, 0.1),
            (RecipeId::JewelBearing, CraftedBoostId::JewelBearing, 150, Some(3), 0.25),
        ] {
            b.register_recipe(RecipeDef {
                id: recipe,
                boost,
                parts_cost,
                limit,
            });
            b.register_boost(CraftedBoostDef { id: boost, per_unit });
        }

        // -- Events --

        b.register_event(EventDef {
            id: EventId::AuctionFrenzy,
            name: "Auction Frenzy".to_string(),
            trigger: EventTrigger::Threshold {
                collection_value: 25_000.0,
            },
            multiplier: 1.6,
            duration_ms: MINUTE,
            cooldown_ms: 10 * MINUTE,
        })
        .register_event(EventDef {
            id: EventId::PrivateSale,
            name: "Private Sale".to_string(),
            trigger: EventTrigger::Manual,
            multiplier: 1.15,
            duration_ms: 30 * SECOND,
            cooldown_ms: 5 * MINUTE,
        })
        .register_event(EventDef {
            id: EventId::WatchFair,
            name: "Watch Fair".to_string(),
            trigger: EventTrigger::Calendar { month: 4, day: 1 },
            multiplier: 1.27,
            duration_ms: 7 * DAY,
            cooldown_ms: 0,
        })
        .register_event(EventDef {
            id: EventId::HolidaySeason,
            name: "Holiday Season".to_string(),
            trigger: EventTrigger::Calendar { month: 12, day: 20 },
            multiplier: 1.5,
            duration_ms: 14 * DAY,
            cooldown_ms: 0,
        });

        b.set_negotiation(NegotiationDef {
            event: EventId::PrivateSale,
            max_tension: 10,
            base_multiplier: 1.05,
            multiplier_per_tension: 0.02,
            max_multiplier: 1.25,
            risk_per_tension: 0.07,
        });

        // -- Nostalgia (tier C) --

        for (item, cost) in [
            (ItemTier::Mechanical, 2),
            (ItemTier::Chronograph, 5),
            (ItemTier::Tourbillon, 12),
        ] {
            b.push_nostalgia_unlock(NostalgiaUnlockDef { item, cost });
        }

        b.set_career(CareerDef {
            cooldown_ms: HOUR,
            cash_per_level: 250,
            xp_per_level: 3,
        });

        b
    }
}
