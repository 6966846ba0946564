//! The save storage contract.
//!
//! The core never touches a disk. A driver hands in something that can
//! read, write and clear one raw payload; [`load_game`] and [`save_game`]
//! wrap that with the codec.

use tracing::{info, warn};

use crate::registry::Registry;
use crate::serialize::{DecodedSave, SerializeError, decode_str, encode_string};
use crate::state::GameState;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("reading the save failed: {0}")]
    Read(String),
    #[error("writing the save failed: {0}")]
    Write(String),
    #[error("clearing the save failed: {0}")]
    Clear(String),
    #[error(transparent)]
    Encode(#[from] SerializeError),
}

/// A single-slot store for the raw save payload.
pub trait SaveStorage {
    /// The stored payload, or `None` when nothing has been saved.
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn persist(&mut self, payload: &str) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-memory storage for tests and embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    payload: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

impl SaveStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.payload.clone())
    }

    fn persist(&mut self, payload: &str) -> Result<(), StorageError> {
        self.payload = Some(payload.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.payload = None;
        Ok(())
    }
}

/// What [`load_game`] found.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Nothing stored; start from a fresh state.
    Fresh(GameState),
    Restored(DecodedSave),
    /// The stored payload could not be trusted. The caller should clear it
    /// and continue with the fresh `state`.
    Rejected { state: GameState, reason: String },
}

impl LoadOutcome {
    pub fn into_state(self) -> GameState {
        match self {
            LoadOutcome::Fresh(state) | LoadOutcome::Rejected { state, .. } => state,
            LoadOutcome::Restored(save) => save.state,
        }
    }
}

/// Read and decode the stored save. Only storage failures are errors; a bad
/// payload is reported as [`LoadOutcome::Rejected`].
pub fn load_game(
    storage: &impl SaveStorage,
    registry: &Registry,
) -> Result<LoadOutcome, StorageError> {
    let Some(payload) = storage.load()? else {
        return Ok(LoadOutcome::Fresh(GameState::new()));
    };
    match decode_str(&payload, registry) {
        Ok(save) => {
            info!(saved_at = save.header.saved_at, "save restored");
            Ok(LoadOutcome::Restored(save))
        }
        Err(err) => {
            warn!(error = %err, "stored save rejected");
            Ok(LoadOutcome::Rejected {
                state: GameState::new(),
                reason: err.to_string(),
            })
        }
    }
}

pub fn save_game(
    storage: &mut impl SaveStorage,
    state: &GameState,
    now: u64,
) -> Result<(), StorageError> {
    let payload = encode_string(state, now)?;
    storage.persist(&payload)
}
