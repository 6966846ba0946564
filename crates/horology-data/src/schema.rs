//! On-disk shape of the balance file.
//!
//! Every field is optional: a balance file only names what it changes, and
//! everything else keeps its standard value. Ids are the stable snake_case
//! keys from `horology_core::id`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Top-level contents of `balance.{ron,toml,json}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BalanceData {
    pub economy: EconomyOverrides,
    /// Keyed by item tier key, e.g. `"quartz"`.
    pub items: BTreeMap<String, ItemOverrides>,
    pub upgrades: BTreeMap<String, UpgradeOverrides>,
    pub events: BTreeMap<String, EventOverrides>,
    /// Nostalgia point cost per unlockable item tier.
    pub nostalgia_costs: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomyOverrides {
    pub flat_base_income: Option<f64>,
    pub softcap: Option<f64>,
    pub softcap_exponent: Option<f64>,
    pub workshop_threshold: Option<f64>,
    pub maison_threshold: Option<f64>,
    pub nostalgia_threshold: Option<f64>,
    pub legacy_cap: Option<f64>,
    pub reveal_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ItemOverrides {
    pub base_price: Option<f64>,
    pub growth: Option<f64>,
    pub income: Option<f64>,
    pub momentum_income: Option<f64>,
    pub collector_value: Option<f64>,
    pub momentum_requirement: Option<u64>,
    pub parts_yield: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpgradeOverrides {
    pub base_cost: Option<f64>,
    pub cost_growth: Option<f64>,
    pub max_level: Option<u32>,
    pub income_multiplier: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventOverrides {
    pub multiplier: Option<f64>,
    pub duration_ms: Option<u64>,
    pub cooldown_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let data: BalanceData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, BalanceData::default());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result: Result<BalanceData, _> = serde_json::from_str(r#"{"itemz": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn toml_tables_map_to_overrides() {
        let data: BalanceData = toml::from_str(
            r#"
[economy]
softcap = 250000.0

[items.quartz]
base_price = 20.0

[nostalgia_costs]
mechanical = 1
"#,
        )
        .unwrap();
        assert_eq!(data.economy.softcap, Some(250_000.0));
        assert_eq!(data.items["quartz"].base_price, Some(20.0));
        assert_eq!(data.items["quartz"].growth, None);
        assert_eq!(data.nostalgia_costs["mechanical"], 1);
    }

    #[test]
    fn ron_with_implicit_some() {
        let data: BalanceData = ron::from_str(
            r#"#![enable(implicit_some)]
(
    events: { "auction_frenzy": (multiplier: 2.0) },
    upgrades: { "vault": (max_level: 3) },
)"#,
        )
        .unwrap();
        assert_eq!(data.events["auction_frenzy"].multiplier, Some(2.0));
        assert_eq!(data.upgrades["vault"].max_level, Some(3));
    }
}
