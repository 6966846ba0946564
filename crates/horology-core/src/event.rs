//! Timed income events.
//!
//! Each event is a small state machine driven by its trigger:
//!
//! - **Threshold**: fires when the collection value reaches its threshold
//!   while idle, runs for its duration, then cools down.
//! - **Manual**: fires only through [`activate_event`] or [`negotiate`],
//!   subject to the same idle/cooldown gating. An activation may carry an
//!   override multiplier.
//! - **Calendar**: active inside a yearly local-time window, evaluated on
//!   every advance regardless of cooldown.
//!
//! All timestamps are epoch milliseconds. Nothing here reads a clock.

use crate::id::EventId;
use crate::rates::collection_value;
use crate::registry::{EventDef, EventTrigger, Registry};
use crate::state::{EventState, GameState};
use tracing::{info, trace};

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_MINUTE: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Idle,
    Active,
    Cooldown,
}

impl EventState {
    pub fn status(&self, now: u64) -> EventStatus {
        if now < self.active_until {
            EventStatus::Active
        } else if now < self.next_available {
            EventStatus::Cooldown
        } else {
            EventStatus::Idle
        }
    }
}

pub fn event_status(state: &GameState, id: EventId, now: u64) -> EventStatus {
    state.event(id).status(now)
}

// ---------------------------------------------------------------------------
// Calendar arithmetic
// ---------------------------------------------------------------------------

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = month as i64;
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Calendar year containing a day count since the epoch.
fn year_from_days(days: i64) -> i64 {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400;
    if month <= 2 { year + 1 } else { year }
}

/// UTC window `[start, end)` of a calendar event in `year`, where the
/// window opens at local midnight.
pub fn calendar_window(
    year: i64,
    month: u32,
    day: u32,
    duration_ms: u64,
    utc_offset_minutes: i32,
) -> (i64, i64) {
    let local_start = days_from_civil(year, month, day).saturating_mul(MS_PER_DAY);
    let start = local_start.saturating_sub(utc_offset_minutes as i64 * MS_PER_MINUTE);
    (start, start.saturating_add(to_signed_ms(duration_ms)))
}

/// Timestamps past `i64::MAX` saturate instead of wrapping negative.
fn to_signed_ms(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

fn clamp_ms(ms: i64) -> u64 {
    ms.max(0) as u64
}

fn advance_calendar(
    def: &EventDef,
    month: u32,
    day: u32,
    now: u64,
    utc_offset_minutes: i32,
) -> EventState {
    let now_i = to_signed_ms(now);
    let local_now = now_i.saturating_add(utc_offset_minutes as i64 * MS_PER_MINUTE);
    let year = year_from_days(local_now.div_euclid(MS_PER_DAY));

    // A window opened last year may still be running.
    for y in [year - 1, year] {
        let (start, end) = calendar_window(y, month, day, def.duration_ms, utc_offset_minutes);
        if (start..end).contains(&now_i) {
            return EventState {
                active_until: clamp_ms(end),
                next_available: clamp_ms(end),
                override_multiplier: None,
            };
        }
    }

    let (_, end) = calendar_window(year, month, day, def.duration_ms, utc_offset_minutes);
    if now_i >= end {
        let (next_start, _) =
            calendar_window(year + 1, month, day, def.duration_ms, utc_offset_minutes);
        EventState {
            active_until: clamp_ms(end),
            next_available: clamp_ms(next_start),
            override_multiplier: None,
        }
    } else {
        EventState::default()
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fold the scheduler forward to `now`.
pub fn advance_events(
    state: &GameState,
    registry: &Registry,
    now: u64,
    utc_offset_minutes: i32,
) -> GameState {
    let mut next = state.clone();
    apply_events(&mut next, registry, now, utc_offset_minutes);
    next
}

pub(crate) fn apply_events(
    state: &mut GameState,
    registry: &Registry,
    now: u64,
    utc_offset_minutes: i32,
) {
    let value = collection_value(state, registry);
    for def in registry.events() {
        let current = state.event(def.id);
        let updated = match def.trigger {
            EventTrigger::Threshold {
                collection_value: threshold,
            } => {
                if current.status(now) == EventStatus::Idle && value >= threshold {
                    info!(event = %def.id, value, "event fired");
                    fire(def, now, None)
                } else {
                    current
                }
            }
            EventTrigger::Manual => current,
            EventTrigger::Calendar { month, day } => {
                let updated = advance_calendar(def, month, day, now, utc_offset_minutes);
                if updated.status(now) == EventStatus::Active
                    && current.status(now) != EventStatus::Active
                {
                    info!(event = %def.id, "calendar event opened");
                }
                updated
            }
        };
        let updated = if updated.override_multiplier.is_some() && now >= updated.active_until {
            EventState {
                override_multiplier: None,
                ..updated
            }
        } else {
            updated
        };
        state.events.insert(def.id, updated);
    }
}

fn fire(def: &EventDef, now: u64, override_multiplier: Option<f64>) -> EventState {
    let active_until = now.saturating_add(def.duration_ms);
    EventState {
        active_until,
        next_available: active_until.saturating_add(def.cooldown_ms),
        override_multiplier,
    }
}

/// A manual event can be activated only while idle.
pub fn can_activate_event(state: &GameState, registry: &Registry, id: EventId, now: u64) -> bool {
    match registry.event(id) {
        Some(def) => {
            def.trigger == EventTrigger::Manual && state.event(id).status(now) == EventStatus::Idle
        }
        None => false,
    }
}

/// Start a manual event. A supplied override is clamped to `>= 0`.
pub fn activate_event(
    state: &GameState,
    registry: &Registry,
    id: EventId,
    now: u64,
    override_multiplier: Option<f64>,
) -> GameState {
    let Some(def) = registry.event(id) else {
        return state.clone();
    };
    if !can_activate_event(state, registry, id, now) {
        trace!(event = %id, "activation rejected");
        return state.clone();
    }
    let override_multiplier =
        override_multiplier.map(|m| if m.is_nan() { 0.0 } else { m.max(0.0) });
    let mut next = state.clone();
    next.events.insert(id, fire(def, now, override_multiplier));
    info!(event = %id, ?override_multiplier, "event activated");
    next
}

/// Product of every active event's multiplier. 1 when none are active.
pub fn event_multiplier(state: &GameState, registry: &Registry, now: u64) -> f64 {
    registry
        .events()
        .filter_map(|def| {
            let ev = state.event(def.id);
            (ev.status(now) == EventStatus::Active)
                .then(|| ev.override_multiplier.unwrap_or(def.multiplier))
        })
        .product()
}

// ---------------------------------------------------------------------------
// Negotiation
// ---------------------------------------------------------------------------

/// Multiplier won at a tension level: `min(max, base + step·tension)`.
pub fn negotiation_multiplier(registry: &Registry, tension: u32) -> f64 {
    match registry.negotiation() {
        Some(n) => {
            let t = tension.min(n.max_tension) as f64;
            (n.base_multiplier + n.multiplier_per_tension * t).min(n.max_multiplier)
        }
        None => 1.0,
    }
}

/// Chance that a negotiation at `tension` succeeds.
pub fn negotiation_success_chance(registry: &Registry, tension: u32) -> f64 {
    match registry.negotiation() {
        Some(n) => {
            let t = tension.min(n.max_tension) as f64;
            (1.0 - n.risk_per_tension * t).clamp(0.0, 1.0)
        }
        None => 0.0,
    }
}

/// Play the negotiation attached to the manual event.
///
/// `roll` is a caller-supplied uniform sample in `[0, 1)`. Success
/// activates the event with the tension's multiplier as override; failure
/// burns the activation and starts the cooldown immediately.
pub fn negotiate(
    state: &GameState,
    registry: &Registry,
    tension: u32,
    roll: f64,
    now: u64,
) -> GameState {
    let Some(negotiation) = registry.negotiation() else {
        return state.clone();
    };
    let Some(def) = registry.event(negotiation.event) else {
        return state.clone();
    };
    if !can_activate_event(state, registry, def.id, now) {
        trace!(event = %def.id, "negotiation rejected");
        return state.clone();
    }
    let tension = tension.min(negotiation.max_tension);
    if roll < negotiation_success_chance(registry, tension) {
        let multiplier = negotiation_multiplier(registry, tension);
        info!(tension, multiplier, "negotiation succeeded");
        return activate_event(state, registry, def.id, now, Some(multiplier));
    }
    let mut next = state.clone();
    next.events.insert(
        def.id,
        EventState {
            active_until: now,
            next_available: now.saturating_add(def.cooldown_ms),
            override_multiplier: None,
        },
    );
    info!(tension, "negotiation failed");
    next
}
