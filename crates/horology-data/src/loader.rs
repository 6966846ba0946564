//! Resolution pipeline: reads data files, resolves id keys, rebalances the
//! standard registry.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus the loaders that turn a data directory into
//! a validated [`Registry`] and a [`SimConfig`].

use horology_core::id::{EventId, ItemTier, UpgradeId};
use horology_core::registry::{Registry, RegistryBuilder, RegistryError};
use horology_core::sim::SimConfig;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::schema::BalanceData;

/// Base name of the optional balance file.
pub const BALANCE_FILE: &str = "balance";
/// Base name of the optional simulation settings file.
pub const SIM_FILE: &str = "sim";

// ===========================================================================
// Errors
// ===========================================================================

/// Why a data directory could not be turned into a registry or sim config.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// Not a `.ron`, `.toml` or `.json` file.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Both `balance.ron` and `balance.toml` (say) are present.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An id key does not name any known definition.
    #[error("unknown {kind} '{key}' in {file}")]
    UnknownId {
        file: PathBuf,
        key: String,
        kind: &'static str,
    },

    /// The rebalanced registry failed validation.
    #[error("invalid balance in {file}: {source}")]
    Registry {
        file: PathBuf,
        #[source]
        source: RegistryError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Format implied by the file extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// The single `{stem}.{ron,toml,json}` file in `dir`, if any. Data files
/// are optional; two formats for one stem is an error.
pub fn find_data_file(dir: &Path, stem: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = ["ron", "toml", "json"]
        .into_iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .filter(|path| path.is_file());

    let Some(first) = present.next() else {
        return Ok(None);
    };
    match present.next() {
        Some(second) => Err(DataLoadError::ConflictingFormats {
            a: first,
            b: second,
        }),
        None => Ok(Some(first)),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Parse `path` with the deserializer its extension names.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let text = std::fs::read_to_string(path)?;
    let parse_error = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(&text).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(&text).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(&text).map_err(|e| parse_error(e.to_string())),
    }
}

// ===========================================================================
// Balance resolution
// ===========================================================================

fn resolve<T>(
    key: &str,
    file: &Path,
    kind: &'static str,
    from_key: fn(&str) -> Option<T>,
) -> Result<T, DataLoadError> {
    from_key(key).ok_or_else(|| DataLoadError::UnknownId {
        file: file.to_path_buf(),
        key: key.to_string(),
        kind,
    })
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Apply the overrides in `data` to `builder`. `file` is only used for
/// error reporting.
pub fn apply_balance(
    builder: &mut RegistryBuilder,
    data: &BalanceData,
    file: &Path,
) -> Result<(), DataLoadError> {
    let registry_error = |source: RegistryError| DataLoadError::Registry {
        file: file.to_path_buf(),
        source,
    };

    let eco = &data.economy;
    builder.mutate_economy(|economy| {
        set(&mut economy.flat_base_income, eco.flat_base_income);
        set(&mut economy.softcap, eco.softcap);
        set(&mut economy.softcap_exponent, eco.softcap_exponent);
        set(&mut economy.workshop_threshold, eco.workshop_threshold);
        set(&mut economy.maison_threshold, eco.maison_threshold);
        set(&mut economy.nostalgia_threshold, eco.nostalgia_threshold);
        set(&mut economy.legacy_cap, eco.legacy_cap);
        set(&mut economy.reveal_ratio, eco.reveal_ratio);
    });

    for (key, o) in &data.items {
        let tier = resolve(key, file, "item", ItemTier::from_key)?;
        builder
            .mutate_item(tier, |def| {
                set(&mut def.base_price, o.base_price);
                set(&mut def.growth, o.growth);
                set(&mut def.income, o.income);
                set(&mut def.momentum_income, o.momentum_income);
                set(&mut def.collector_value, o.collector_value);
                set(&mut def.momentum_requirement, o.momentum_requirement);
                set(&mut def.parts_yield, o.parts_yield);
            })
            .map_err(registry_error)?;
        debug!(item = key.as_str(), "item rebalanced");
    }

    for (key, o) in &data.upgrades {
        let id = resolve(key, file, "upgrade", UpgradeId::from_key)?;
        builder
            .mutate_upgrade(id, |def| {
                set(&mut def.base_cost, o.base_cost);
                set(&mut def.cost_growth, o.cost_growth);
                set(&mut def.max_level, o.max_level);
                if o.income_multiplier.is_some() {
                    def.effect.income_multiplier = o.income_multiplier;
                }
            })
            .map_err(registry_error)?;
    }

    for (key, o) in &data.events {
        let id = resolve(key, file, "event", EventId::from_key)?;
        builder
            .mutate_event(id, |def| {
                set(&mut def.multiplier, o.multiplier);
                set(&mut def.duration_ms, o.duration_ms);
                set(&mut def.cooldown_ms, o.cooldown_ms);
            })
            .map_err(registry_error)?;
    }

    for (key, &cost) in &data.nostalgia_costs {
        let item = resolve(key, file, "item", ItemTier::from_key)?;
        builder
            .mutate_nostalgia_unlock(item, |slot| slot.cost = cost)
            .map_err(registry_error)?;
    }

    Ok(())
}

/// Build a registry from the standard catalog plus the optional balance
/// file in `dir`. Without a balance file this is the standard registry.
pub fn load_balance(dir: &Path) -> Result<Registry, DataLoadError> {
    let mut builder = RegistryBuilder::standard();
    let Some(path) = find_data_file(dir, BALANCE_FILE)? else {
        return builder.build().map_err(|source| DataLoadError::Registry {
            file: dir.to_path_buf(),
            source,
        });
    };

    let data: BalanceData = deserialize_file(&path)?;
    apply_balance(&mut builder, &data, &path)?;
    let registry = builder.build().map_err(|source| DataLoadError::Registry {
        file: path.clone(),
        source,
    })?;
    info!(file = %path.display(), "balance loaded");
    Ok(registry)
}

/// Read the optional simulation settings file in `dir`.
pub fn load_sim_config(dir: &Path) -> Result<SimConfig, DataLoadError> {
    match find_data_file(dir, SIM_FILE)? {
        Some(path) => {
            let config = deserialize_file(&path)?;
            info!(file = %path.display(), "simulation settings loaded");
            Ok(config)
        }
        None => Ok(SimConfig::default()),
    }
}

/// Everything a driver needs from a data directory.
#[derive(Debug)]
pub struct GameData {
    pub registry: Registry,
    pub sim: SimConfig,
}

pub fn load_game_data(dir: &Path) -> Result<GameData, DataLoadError> {
    Ok(GameData {
        registry: load_balance(dir)?,
        sim: load_sim_config(dir)?,
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use horology_core::prestige::nostalgia_unlock_cost;
    use std::fs;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "horology_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format / find_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("balance.ron")).unwrap(), Format::Ron);
        assert_eq!(
            detect_format(Path::new("balance.toml")).unwrap(),
            Format::Toml
        );
        assert_eq!(
            detect_format(Path::new("balance.json")).unwrap(),
            Format::Json
        );
    }

    #[test]
    fn detect_format_unsupported() {
        assert!(matches!(
            detect_format(Path::new("balance.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("balance")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn find_data_file_missing() {
        let dir = make_test_dir("find_missing");
        assert_eq!(find_data_file(&dir, BALANCE_FILE).unwrap(), None);
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("balance.ron"), "()").unwrap();
        fs::write(dir.join("balance.json"), "{}").unwrap();

        assert!(matches!(
            find_data_file(&dir, BALANCE_FILE),
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_balance
    // -----------------------------------------------------------------------

    #[test]
    fn no_balance_file_gives_standard_numbers() {
        let dir = make_test_dir("balance_none");
        let registry = load_balance(&dir).unwrap();
        let standard = Registry::standard();
        assert_eq!(registry.economy(), standard.economy());
        assert_eq!(registry.item(ItemTier::Quartz), standard.item(ItemTier::Quartz));
        cleanup(&dir);
    }

    #[test]
    fn json_balance_overrides_named_fields() {
        let dir = make_test_dir("balance_json");
        fs::write(
            dir.join("balance.json"),
            r#"{
                "economy": {"softcap": 250000.0},
                "items": {"quartz": {"base_price": 20.0}},
                "events": {"auction_frenzy": {"multiplier": 2.0}},
                "nostalgia_costs": {"mechanical": 1}
            }"#,
        )
        .unwrap();

        let registry = load_balance(&dir).unwrap();
        assert_eq!(registry.economy().softcap, 250_000.0);
        let quartz = registry.item(ItemTier::Quartz).unwrap();
        assert_eq!(quartz.base_price, 20.0);
        assert_eq!(quartz.growth, 1.15);
        assert_eq!(registry.event(EventId::AuctionFrenzy).unwrap().multiplier, 2.0);
        assert_eq!(nostalgia_unlock_cost(&registry, ItemTier::Mechanical), Some(1));

        cleanup(&dir);
    }

    #[test]
    fn toml_balance_overrides_upgrade() {
        let dir = make_test_dir("balance_toml");
        fs::write(
            dir.join("balance.toml"),
            r#"
[upgrades.vault]
max_level = 2
income_multiplier = 1.5
"#,
        )
        .unwrap();

        let registry = load_balance(&dir).unwrap();
        let vault = registry.upgrade(UpgradeId::Vault).unwrap();
        assert_eq!(vault.max_level, 2);
        assert_eq!(vault.effect.income_multiplier, Some(1.5));

        cleanup(&dir);
    }

    #[test]
    fn unknown_item_key_is_reported() {
        let dir = make_test_dir("balance_unknown");
        fs::write(dir.join("balance.json"), r#"{"items": {"sundial": {}}}"#).unwrap();

        let result = load_balance(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::UnknownId { ref key, kind: "item", .. }) if key == "sundial"
        ));

        cleanup(&dir);
    }

    #[test]
    fn invalid_balance_fails_validation() {
        let dir = make_test_dir("balance_invalid");
        fs::write(
            dir.join("balance.json"),
            r#"{"items": {"quartz": {"growth": 0.5}}}"#,
        )
        .unwrap();

        assert!(matches!(
            load_balance(&dir),
            Err(DataLoadError::Registry { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn parse_error_names_file() {
        let dir = make_test_dir("balance_parse");
        fs::write(dir.join("balance.ron"), "this is not valid RON {{{").unwrap();

        let err = load_balance(&dir).unwrap_err();
        assert!(matches!(err, DataLoadError::Parse { .. }));
        assert!(err.to_string().contains("balance.ron"));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_sim_config / load_game_data
    // -----------------------------------------------------------------------

    #[test]
    fn sim_config_defaults_without_file() {
        let dir = make_test_dir("sim_none");
        assert_eq!(load_sim_config(&dir).unwrap(), SimConfig::default());
        cleanup(&dir);
    }

    #[test]
    fn sim_config_from_ron() {
        let dir = make_test_dir("sim_ron");
        fs::write(
            dir.join("sim.ron"),
            "(max_step_ms: 5000, utc_offset_minutes: -300)",
        )
        .unwrap();

        let config = load_sim_config(&dir).unwrap();
        assert_eq!(config.max_step_ms, 5_000);
        assert_eq!(config.utc_offset_minutes, -300);

        cleanup(&dir);
    }

    #[test]
    fn game_data_combines_both_files() {
        let dir = make_test_dir("game_data");
        fs::write(dir.join("sim.toml"), "max_step_ms = 1000").unwrap();
        fs::write(
            dir.join("balance.toml"),
            "[economy]\nworkshop_threshold = 1000.0\n",
        )
        .unwrap();

        let data = load_game_data(&dir).unwrap();
        assert_eq!(data.sim.max_step_ms, 1_000);
        assert_eq!(data.registry.economy().workshop_threshold, 1_000.0);

        cleanup(&dir);
    }
}
