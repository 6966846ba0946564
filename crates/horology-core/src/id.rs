use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a closed identifier enumeration with a stable snake_case key.
///
/// Variants are ordered by declaration, so `BTreeMap`/`BTreeSet` keyed by an
/// id iterate in catalog order. The key is what the save codec and the data
/// files use.
macro_rules! id_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable key used in save payloads and data files.
            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            /// Parse a stable key. Unknown keys yield `None`.
            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

id_enum! {
    /// The four collectible item tiers. Owned counts drive both incomes.
    pub enum ItemTier {
        Quartz => "quartz",
        Mechanical => "mechanical",
        Chronograph => "chronograph",
        Tourbillon => "tourbillon",
    }
}

id_enum! {
    /// Leveled cash upgrades. Reset by every prestige tier.
    pub enum UpgradeId {
        Polishing => "polishing",
        Marketing => "marketing",
        Vault => "vault",
    }
}

id_enum! {
    pub enum MilestoneId {
        FirstSteps => "first_steps",
        Collector => "collector",
        Archivist => "archivist",
        Connoisseur => "connoisseur",
        Curator => "curator",
    }
}

id_enum! {
    /// Permanent proof-of-progress flags. Never cleared.
    pub enum AchievementId {
        FirstPurchase => "first_purchase",
        HundredPieces => "hundred_pieces",
        Millionaire => "millionaire",
        Tinkerer => "tinkerer",
        Scrapper => "scrapper",
        Apprentice => "apprentice",
        Heir => "heir",
        Nostalgic => "nostalgic",
        Encyclopedist => "encyclopedist",
    }
}

id_enum! {
    /// Tier-A (workshop) upgrades, bought with blueprints.
    pub enum WorkshopUpgradeId {
        Jigs => "jigs",
        Lathe => "lathe",
        Loupe => "loupe",
        Escapement => "escapement",
    }
}

id_enum! {
    /// Tier-B (maison) upgrades, bought with heritage or reputation.
    pub enum MaisonUpgradeId {
        Atelier => "atelier",
        Archives => "archives",
        Guild => "guild",
    }
}

id_enum! {
    /// Tier-B (maison) product lines.
    pub enum MaisonLineId {
        Dress => "dress",
        Diver => "diver",
        Complication => "complication",
    }
}

id_enum! {
    pub enum EventId {
        AuctionFrenzy => "auction_frenzy",
        PrivateSale => "private_sale",
        WatchFair => "watch_fair",
        HolidaySeason => "holiday_season",
    }
}

id_enum! {
    /// Reference entries in the collectibles catalog.
    pub enum CatalogEntryId {
        QuartzCrisis => "quartz_crisis",
        DigitalDawn => "digital_dawn",
        CalibreHistory => "calibre_history",
        HandWinding => "hand_winding",
        RacingChronographs => "racing_chronographs",
        DiveWatches => "dive_watches",
        MoonPhases => "moon_phases",
        TourbillonInvention => "tourbillon_invention",
        GrandComplications => "grand_complications",
        EverydayWear => "everyday_wear",
    }
}

id_enum! {
    /// Catalog tiers unlocked by discovery counts.
    pub enum CatalogTierId {
        Novice => "novice",
        Scholar => "scholar",
        Historian => "historian",
    }
}

id_enum! {
    pub enum RecipeId {
        Mainspring => "mainspring",
        BalanceWheel => "balance_wheel",
        JewelBearing => "jewel_bearing",
    }
}

id_enum! {
    /// Crafted boosts. Counters only ever grow.
    pub enum CraftedBoostId {
        Mainspring => "mainspring",
        BalanceWheel => "balance_wheel",
        JewelBearing => "jewel_bearing",
    }
}
