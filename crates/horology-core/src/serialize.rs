//! Versioned save encoding.
//!
//! A save is a JSON envelope `{"version", "saved_at", "state"}`. Decoding
//! rejects envelopes it cannot trust (bad structure, unsupported version)
//! but is tolerant inside the state record: every field is read on its
//! own, and anything missing, malformed, or naming an id this build does
//! not know falls back to the fresh-state default.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::id::*;
use crate::migration::{MigrationError, MigrationRegistry};
use crate::prestige::ordered_allowlist;
use crate::progress::refresh_catalog_tiers;
use crate::registry::Registry;
use crate::state::{EventState, GameState};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Current save format version. Increment when the state shape changes and
/// register a migration from the previous version.
pub const FORMAT_VERSION: u32 = 3;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("state encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("payload is not valid JSON: {0}")]
    Parse(String),
    #[error("payload root is not an object")]
    NotAnObject,
    #[error("missing or malformed version field")]
    MissingVersion,
    #[error("unsupported save version {0} (this build supports 1 to {FORMAT_VERSION})")]
    UnsupportedVersion(u64),
    #[error("missing or malformed saved_at timestamp")]
    InvalidTimestamp,
    #[error("missing state record")]
    MissingState,
    #[error(transparent)]
    Migration(#[from] MigrationError),
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The envelope fields that surround the state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHeader {
    pub version: u32,
    /// Epoch milliseconds at which the save was written.
    pub saved_at: u64,
}

impl SaveHeader {
    pub fn new(saved_at: u64) -> Self {
        Self {
            version: FORMAT_VERSION,
            saved_at,
        }
    }

    /// Read and check the header of an envelope.
    pub fn read(root: &Map<String, Value>) -> Result<Self, DeserializeError> {
        let version = root
            .get("version")
            .and_then(Value::as_u64)
            .ok_or(DeserializeError::MissingVersion)?;
        if version == 0 || version > FORMAT_VERSION as u64 {
            return Err(DeserializeError::UnsupportedVersion(version));
        }
        let saved_at = root
            .get("saved_at")
            .and_then(Value::as_u64)
            .ok_or(DeserializeError::InvalidTimestamp)?;
        Ok(Self {
            version: version as u32,
            saved_at,
        })
    }
}

/// A successfully decoded save.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSave {
    pub header: SaveHeader,
    /// The version the payload was written with, if it had to be migrated.
    pub migrated_from: Option<u32>,
    pub state: GameState,
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

pub fn encode(state: &GameState, saved_at: u64) -> Result<Value, SerializeError> {
    let header = SaveHeader::new(saved_at);
    let state = serde_json::to_value(state).map_err(|e| SerializeError::Encode(e.to_string()))?;
    let mut root = Map::new();
    root.insert("version".to_string(), Value::from(header.version));
    root.insert("saved_at".to_string(), Value::from(header.saved_at));
    root.insert("state".to_string(), state);
    Ok(Value::Object(root))
}

pub fn encode_string(state: &GameState, saved_at: u64) -> Result<String, SerializeError> {
    let value = encode(state, saved_at)?;
    serde_json::to_string(&value).map_err(|e| SerializeError::Encode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

pub fn decode_str(payload: &str, registry: &Registry) -> Result<DecodedSave, DeserializeError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| DeserializeError::Parse(e.to_string()))?;
    decode(value, registry)
}

pub fn decode(payload: Value, registry: &Registry) -> Result<DecodedSave, DeserializeError> {
    let Value::Object(root) = payload else {
        return Err(DeserializeError::NotAnObject);
    };
    let original = SaveHeader::read(&root)?;

    let root = if original.version < FORMAT_VERSION {
        let migrated = MigrationRegistry::standard().migrate(
            Value::Object(root),
            original.version,
            FORMAT_VERSION,
        )?;
        info!(from = original.version, to = FORMAT_VERSION, "save migrated");
        match migrated {
            Value::Object(root) => root,
            _ => return Err(DeserializeError::NotAnObject),
        }
    } else {
        root
    };
    let header = SaveHeader::read(&root)?;

    let Some(Value::Object(fields)) = root.get("state") else {
        return Err(DeserializeError::MissingState);
    };

    Ok(DecodedSave {
        header,
        migrated_from: (original.version < FORMAT_VERSION).then_some(original.version),
        state: overlay_state(fields, registry),
    })
}

/// Build a state from a fresh default, taking every field that reads
/// cleanly from `fields`.
fn overlay_state(fields: &Map<String, Value>, registry: &Registry) -> GameState {
    let mut state = GameState::new();

    if let Some(n) = fields.get("cash").and_then(read_u64) {
        state.cash = n;
    }
    if let Some(n) = fields.get("momentum").and_then(read_u64) {
        state.momentum = n;
    }
    read_count_map(fields.get("items"), "items", ItemTier::from_key, &mut state.items);
    read_count_map(
        fields.get("upgrades"),
        "upgrades",
        UpgradeId::from_key,
        &mut state.upgrades,
    );
    read_set(
        fields.get("milestones"),
        "milestones",
        MilestoneId::from_key,
        &mut state.milestones,
    );
    read_set(
        fields.get("achievements"),
        "achievements",
        AchievementId::from_key,
        &mut state.achievements,
    );

    if let Some(Value::Object(workshop)) = fields.get("workshop") {
        if let Some(n) = workshop.get("blueprints").and_then(read_u64) {
            state.workshop.blueprints = n;
        }
        if let Some(n) = workshop.get("resets").and_then(read_u64) {
            state.workshop.resets = n;
        }
        read_flag_map(
            workshop.get("upgrades"),
            "workshop.upgrades",
            WorkshopUpgradeId::from_key,
            &mut state.workshop.upgrades,
        );
    }

    if let Some(Value::Object(maison)) = fields.get("maison") {
        if let Some(n) = maison.get("heritage").and_then(read_u64) {
            state.maison.heritage = n;
        }
        if let Some(n) = maison.get("reputation").and_then(read_u64) {
            state.maison.reputation = n;
        }
        read_flag_map(
            maison.get("upgrades"),
            "maison.upgrades",
            MaisonUpgradeId::from_key,
            &mut state.maison.upgrades,
        );
        read_flag_map(
            maison.get("lines"),
            "maison.lines",
            MaisonLineId::from_key,
            &mut state.maison.lines,
        );
    }

    if let Some(Value::Object(nostalgia)) = fields.get("nostalgia") {
        let n = &mut state.nostalgia;
        for (key, slot) in [
            ("points", &mut n.points),
            ("resets", &mut n.resets),
            ("earned", &mut n.earned),
            ("last_gain", &mut n.last_gain),
            ("last_reset_at", &mut n.last_reset_at),
        ] {
            if let Some(value) = nostalgia.get(key).and_then(read_u64) {
                *slot = value;
            }
        }
        let mut unlocked = BTreeSet::new();
        read_set(
            nostalgia.get("unlocked"),
            "nostalgia.unlocked",
            ItemTier::from_key,
            &mut unlocked,
        );
        let prefix = ordered_allowlist(registry, &unlocked);
        if prefix.len() < unlocked.len() {
            warn!(
                kept = prefix.len(),
                decoded = unlocked.len(),
                "nostalgia unlocks truncated to ordered prefix"
            );
        }
        n.unlocked = prefix;
    }

    if let Some(Value::Object(events)) = fields.get("events") {
        for (key, record) in events {
            let Some(id) = EventId::from_key(key) else {
                warn!(field = "events", key = %key, "dropping unknown id");
                continue;
            };
            if let Some(event) = read_event(record) {
                state.events.insert(id, event);
            }
        }
    }

    if let Some(Value::Object(catalog)) = fields.get("catalog") {
        read_set(
            catalog.get("discovered"),
            "catalog.discovered",
            CatalogEntryId::from_key,
            &mut state.catalog.discovered,
        );
        read_set(
            catalog.get("tiers"),
            "catalog.tiers",
            CatalogTierId::from_key,
            &mut state.catalog.tiers,
        );
    }
    refresh_catalog_tiers(&mut state, registry);

    if let Some(Value::Object(crafting)) = fields.get("crafting") {
        if let Some(n) = crafting.get("parts").and_then(read_u64) {
            state.crafting.parts = n;
        }
        read_count_map(
            crafting.get("boosts"),
            "crafting.boosts",
            CraftedBoostId::from_key,
            &mut state.crafting.boosts,
        );
    }

    if let Some(Value::Object(career)) = fields.get("career") {
        if let Some(n) = career.get("level").and_then(read_u64) {
            state.career.level = n.clamp(1, u32::MAX as u64) as u32;
        }
        if let Some(n) = career.get("experience").and_then(read_u64) {
            state.career.experience = n;
        }
        if let Some(n) = career.get("next_available").and_then(read_u64) {
            state.career.next_available = n;
        }
    }

    if let Some(Value::Object(carry)) = fields.get("carry") {
        if let Some(x) = carry.get("cash").and_then(read_fraction) {
            state.carry.cash = x;
        }
        if let Some(x) = carry.get("momentum").and_then(read_fraction) {
            state.carry.momentum = x;
        }
    }

    state
}

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

/// A non-negative integer. Integral floats are accepted.
fn read_u64(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let x = value.as_f64()?;
    (x.is_finite() && x >= 0.0 && x.fract() == 0.0 && x < u64::MAX as f64).then_some(x as u64)
}

/// A carry remainder in `[0, 1)`.
fn read_fraction(value: &Value) -> Option<f64> {
    let x = value.as_f64()?;
    (x.is_finite() && (0.0..1.0).contains(&x)).then_some(x)
}

fn read_count_map<K, V>(
    value: Option<&Value>,
    field: &str,
    parse: fn(&str) -> Option<K>,
    into: &mut BTreeMap<K, V>,
) where
    K: Ord,
    V: TryFrom<u64>,
{
    let Some(Value::Object(map)) = value else {
        return;
    };
    for (key, raw) in map {
        let Some(id) = parse(key) else {
            warn!(field, key = %key, "dropping unknown id");
            continue;
        };
        if let Some(n) = read_u64(raw).and_then(|n| V::try_from(n).ok()) {
            into.insert(id, n);
        }
    }
}

fn read_flag_map<K: Ord>(
    value: Option<&Value>,
    field: &str,
    parse: fn(&str) -> Option<K>,
    into: &mut BTreeMap<K, bool>,
) {
    let Some(Value::Object(map)) = value else {
        return;
    };
    for (key, raw) in map {
        let Some(id) = parse(key) else {
            warn!(field, key = %key, "dropping unknown id");
            continue;
        };
        if let Some(flag) = raw.as_bool() {
            into.insert(id, flag);
        }
    }
}

fn read_set<K: Ord>(
    value: Option<&Value>,
    field: &str,
    parse: fn(&str) -> Option<K>,
    into: &mut BTreeSet<K>,
) {
    let Some(Value::Array(list)) = value else {
        return;
    };
    for raw in list {
        let Some(key) = raw.as_str() else {
            continue;
        };
        match parse(key) {
            Some(id) => {
                into.insert(id);
            }
            None => warn!(field, key = %key, "dropping unknown id"),
        }
    }
}

fn read_event(record: &Value) -> Option<EventState> {
    let Value::Object(fields) = record else {
        return None;
    };
    let active_until = fields.get("active_until").and_then(read_u64).unwrap_or(0);
    let next_available = fields.get("next_available").and_then(read_u64).unwrap_or(0);
    let override_multiplier = fields
        .get("override_multiplier")
        .and_then(Value::as_f64)
        .filter(|m| m.is_finite() && *m >= 0.0);
    Some(EventState {
        active_until,
        next_available: next_available.max(active_until),
        override_multiplier,
    })
}
