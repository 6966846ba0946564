//! Save-format version migrations.
//!
//! A registry of functions that each lift a save envelope from version `N`
//! to `N + 1`. The registry chains them so any supported older save can be
//! brought up to [`FORMAT_VERSION`] before validation.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::serialize::FORMAT_VERSION;

/// A save envelope that could not be lifted to the current format.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("no migration path from version {from} to version {to}")]
    NoMigrationPath { from: u32, to: u32 },
    #[error("migration from version {from} to version {to} failed: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// A function that transforms a save envelope from one version to the next.
pub type MigrationFn = fn(Value) -> Result<Value, MigrationError>;

/// Single-step save upgrades, keyed by the version they upgrade from.
pub struct MigrationRegistry {
    migrations: BTreeMap<u32, MigrationFn>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self {
            migrations: BTreeMap::new(),
        }
    }

    /// Every migration this build knows, up to [`FORMAT_VERSION`].
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(1, v1_to_v2);
        registry.register(2, v2_to_v3);
        registry
    }

    /// Install the `from_version -> from_version + 1` step.
    pub fn register(&mut self, from_version: u32, migrate: MigrationFn) {
        self.migrations.insert(from_version, migrate);
    }

    /// True when every step between `from` and `to` is installed.
    pub fn can_migrate(&self, from: u32, to: u32) -> bool {
        if from >= to {
            return from == to;
        }
        (from..to).all(|v| self.migrations.contains_key(&v))
    }

    /// Migrate an envelope from version `from` to version `to`, stamping the
    /// new version after every step.
    pub fn migrate(&self, data: Value, from: u32, to: u32) -> Result<Value, MigrationError> {
        if from == to {
            return Ok(data);
        }
        if from > to {
            return Err(MigrationError::NoMigrationPath { from, to });
        }

        let mut current = data;
        for version in from..to {
            let migrate_fn = self
                .migrations
                .get(&version)
                .ok_or(MigrationError::NoMigrationPath { from, to })?;
            current = migrate_fn(current)?;
            if let Value::Object(root) = &mut current {
                root.insert("version".to_string(), Value::from(version + 1));
            }
            debug!(from = version, to = version + 1, "save migrated");
        }
        Ok(current)
    }
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Known migrations
// ---------------------------------------------------------------------------

fn into_object(data: Value, from: u32) -> Result<Map<String, Value>, MigrationError> {
    match data {
        Value::Object(map) => Ok(map),
        _ => Err(MigrationError::MigrationFailed {
            from,
            to: from + 1,
            reason: "envelope is not an object".to_string(),
        }),
    }
}

/// v1 saves were flat: `money`, `watches`, and the workshop counters at the
/// top level. v2 nests everything under `state`.
fn v1_to_v2(data: Value) -> Result<Value, MigrationError> {
    let mut root = into_object(data, 1)?;
    let mut state = Map::new();

    if let Some(money) = root.remove("money") {
        state.insert("cash".to_string(), money);
    }
    if let Some(watches) = root.remove("watches") {
        state.insert("items".to_string(), watches);
    }
    for key in ["momentum", "upgrades", "milestones", "achievements"] {
        if let Some(value) = root.remove(key) {
            state.insert(key.to_string(), value);
        }
    }

    let mut workshop = Map::new();
    if let Some(blueprints) = root.remove("blueprints") {
        workshop.insert("blueprints".to_string(), blueprints);
    }
    if let Some(resets) = root.remove("workshop_resets") {
        workshop.insert("resets".to_string(), resets);
    }
    state.insert("workshop".to_string(), Value::Object(workshop));

    let mut out = Map::new();
    for key in ["version", "saved_at"] {
        if let Some(value) = root.remove(key) {
            out.insert(key.to_string(), value);
        }
    }
    out.insert("state".to_string(), Value::Object(state));
    Ok(Value::Object(out))
}

/// v2 event records used `until` / `cooldown_until`. Nostalgia, career and
/// the accrual carry did not exist and are left to decode defaults.
fn v2_to_v3(data: Value) -> Result<Value, MigrationError> {
    let mut root = into_object(data, 2)?;
    if let Some(Value::Object(state)) = root.get_mut("state")
        && let Some(Value::Object(events)) = state.get_mut("events")
    {
        for record in events.values_mut() {
            if let Value::Object(fields) = record {
                if let Some(until) = fields.remove("until") {
                    fields.insert("active_until".to_string(), until);
                }
                if let Some(cooldown) = fields.remove("cooldown_until") {
                    fields.insert("next_available".to_string(), cooldown);
                }
            }
        }
    }
    Ok(Value::Object(root))
}

/// Whether this build can bring `version` up to date.
pub fn is_supported(version: u32) -> bool {
    version >= 1 && MigrationRegistry::standard().can_migrate(version, FORMAT_VERSION)
}

// ===========================================================================
// Tests
// ===========================================================================
