//! Horology Core -- the economy engine for an idle watch-collecting game.
//!
//! Everything here is a pure function over a [`state::GameState`] value and
//! an immutable [`registry::Registry`] of content definitions. Transitions
//! take `&GameState` and return a new state; a rejected action returns an
//! unchanged copy. Nothing reads the wall clock or touches a disk: callers
//! pass `now` in milliseconds and supply a [`storage::SaveStorage`].
//!
//! # Currencies and prestige
//!
//! Items earn **cash** and **momentum**. Three nested prestige tiers trade
//! progress for permanent currencies:
//!
//! 1. **Workshop** -- momentum into blueprints.
//! 2. **Maison** -- blueprints and workshop resets into heritage and
//!    reputation.
//! 3. **Nostalgia** -- lifetime cash into points that buy ordered item
//!    unlocks which bypass the momentum gate.
//!
//! # Key Types
//!
//! - [`registry::Registry`] -- Immutable content catalog, built once through
//!   [`registry::RegistryBuilder`] and validated at startup.
//! - [`state::GameState`] -- The complete player aggregate.
//! - [`sim::step`] -- Fixed-cadence accrual with fractional carry.
//! - [`pricing::purchase_gate`] -- Why a purchase is or is not possible.
//! - [`rates::multiplier_breakdown`] -- Every income multiplier, by source.
//! - [`serialize`] -- Versioned JSON envelope with field-level recovery.

mod content;

pub mod actions;
pub mod event;
pub mod id;
pub mod migration;
pub mod pricing;
pub mod prestige;
pub mod progress;
pub mod rates;
pub mod registry;
pub mod rng;
pub mod serialize;
pub mod sim;
pub mod state;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
