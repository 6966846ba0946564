//! End-to-end economy scenarios.
//!
//! Each test drives the public API the way a game loop would: build a
//! state, call transitions and `step`, and check the observable numbers.

use horology_core::actions::buy_item;
use horology_core::event::{event_multiplier, event_status, EventStatus};
use horology_core::id::*;
use horology_core::prestige::*;
use horology_core::pricing::{GateBlock, item_price, purchase_gate};
use horology_core::progress::evaluate_unlocks;
use horology_core::rates::{apply_softcap, cash_rate, multiplier_breakdown, softcap};
use horology_core::registry::Registry;
use horology_core::sim::{SimConfig, step};
use horology_core::state::{
    AccrualCarry, CareerState, CraftingState, GameState, MaisonState, WorkshopState,
};
use horology_core::test_utils::*;

fn reg() -> &'static Registry {
    Registry::standard()
}

/// 2026-04-02T12:00:00Z, inside the spring watch fair.
const FAIR_MS: u64 = 1_775_131_200_000;

// ===========================================================================
// Purchases
// ===========================================================================

#[test]
fn basic_purchase_is_momentum_gated_then_succeeds() {
    let state = with_cash(1_000);

    let gate = purchase_gate(&state, reg(), ItemTier::Mechanical, 1);
    assert!(!gate.ok);
    assert_eq!(gate.blocked_by, Some(GateBlock::Momentum));
    assert_eq!(gate.momentum_deficit, 50);
    assert_eq!(buy_item(&state, reg(), ItemTier::Mechanical, 1), state);

    let funded = GameState {
        momentum: 50,
        ..state
    };
    let gate = purchase_gate(&funded, reg(), ItemTier::Mechanical, 1);
    assert!(gate.ok);
    let bought = buy_item(&funded, reg(), ItemTier::Mechanical, 1);
    assert_eq!(bought.cash, 1_000 - gate.price);
    assert_eq!(gate.price, 250);
    assert_eq!(bought.owned(ItemTier::Mechanical), 1);
    assert_eq!(bought.momentum, 50);
    assert!(bought.achievements.contains(&AchievementId::FirstPurchase));
}

#[test]
fn both_short_reports_momentum() {
    let state = with_cash(10);
    let gate = purchase_gate(&state, reg(), ItemTier::Mechanical, 1);
    assert_eq!(gate.blocked_by, Some(GateBlock::Momentum));
    assert_eq!(gate.cash_deficit, 240);
    assert_eq!(gate.momentum_deficit, 50);
}

#[test]
fn bulk_price_is_the_series_sum() {
    let bulk = item_price(&GameState::new(), reg(), ItemTier::Quartz, 10);
    let singles: u64 = (0..10)
        .map(|owned| {
            let state = with_items(&[(ItemTier::Quartz, owned)]);
            item_price(&state, reg(), ItemTier::Quartz, 1)
        })
        .sum();
    // Each single is rounded up on its own; the bulk quote once.
    assert!(singles >= bulk);
    assert!(singles - bulk < 10);

    let bought = buy_item(&with_cash(bulk), reg(), ItemTier::Quartz, 10);
    assert_eq!(bought.cash, 0);
    assert_eq!(bought.owned(ItemTier::Quartz), 10);
}

// ===========================================================================
// Prestige
// ===========================================================================

#[test]
fn workshop_prestige_grants_two_blueprints() {
    let mut state = with_items(&[(ItemTier::Quartz, 30), (ItemTier::Mechanical, 4)]);
    state.momentum = 3_200_000;
    state.workshop.blueprints = 1;

    assert_eq!(workshop_gain(&state, reg()), 2);
    let next = workshop_prestige(&state, reg());
    assert!(ItemTier::ALL.iter().all(|&t| next.owned(t) == 0));
    assert_eq!(next.workshop.blueprints, 3);
    assert_eq!(next.workshop.resets, 1);
    assert_eq!(next.momentum, 0);
}

#[test]
fn workshop_reset_table() {
    let base = populated();
    let next = workshop_prestige(&base, reg());
    let fresh = GameState::new();

    assert_eq!(next.cash, 0);
    assert_eq!(next.momentum, 0);
    assert_eq!(next.carry, AccrualCarry::default());
    assert_eq!(next.items, fresh.items);
    assert_eq!(next.upgrades, fresh.upgrades);

    assert_eq!(next.workshop.upgrades, base.workshop.upgrades);
    assert_eq!(next.maison, base.maison);
    assert_eq!(next.nostalgia, base.nostalgia);
    assert_eq!(next.milestones, base.milestones);
    assert_eq!(next.achievements, base.achievements);
    assert_eq!(next.events, base.events);
    assert_eq!(next.catalog, base.catalog);
    assert_eq!(next.crafting, base.crafting);
    assert_eq!(next.career, base.career);
}

#[test]
fn maison_reset_table() {
    let base = populated();
    assert!(can_maison_prestige(&base, reg()));
    let next = maison_prestige(&base, reg());
    let fresh = GameState::new();

    assert_eq!(next.cash, 0);
    assert_eq!(next.momentum, 0);
    assert_eq!(next.items, fresh.items);
    assert_eq!(next.upgrades, fresh.upgrades);
    assert_eq!(next.workshop, WorkshopState::default());

    assert_eq!(
        next.maison.heritage,
        base.maison.heritage + heritage_gain(&base, reg())
    );
    assert_eq!(next.maison.reputation, base.maison.reputation + 1);
    assert_eq!(next.maison.upgrades, base.maison.upgrades);
    assert_eq!(next.maison.lines, base.maison.lines);
    assert_eq!(next.nostalgia, base.nostalgia);
    assert_eq!(next.achievements, base.achievements);
    assert_eq!(next.catalog, base.catalog);
    assert_eq!(next.crafting, base.crafting);
}

#[test]
fn nostalgia_reset_table() {
    let base = populated();
    assert_eq!(nostalgia_gain(&base, reg()), 2);
    let next = nostalgia_prestige(&base, reg(), MIDYEAR_MS);
    let fresh = GameState::new();

    assert_eq!(next.cash, 0);
    assert_eq!(next.momentum, 0);
    assert_eq!(next.upgrades, fresh.upgrades);
    assert!(next.milestones.is_empty());
    assert_eq!(next.workshop, WorkshopState::default());
    assert_eq!(next.maison, MaisonState::default());
    assert_eq!(next.events, fresh.events);
    assert_eq!(next.crafting, CraftingState::default());
    assert_eq!(next.career, CareerState::default());

    assert_eq!(next.items, base.items);
    assert_eq!(next.achievements, base.achievements);
    assert_eq!(next.catalog, base.catalog);
    assert_eq!(next.nostalgia.unlocked, base.nostalgia.unlocked);
    assert_eq!(next.nostalgia.points, base.nostalgia.points + 2);
    assert_eq!(next.nostalgia.resets, base.nostalgia.resets + 1);
    assert_eq!(next.nostalgia.earned, 0);
    assert_eq!(next.nostalgia.last_reset_at, MIDYEAR_MS);
}

#[test]
fn nostalgia_unlocks_follow_the_order() {
    let mut state = GameState::new();
    state.nostalgia.resets = 1;
    state.nostalgia.points = 10;

    assert!(!can_buy_nostalgia_unlock(&state, reg(), ItemTier::Chronograph));
    assert_eq!(
        buy_nostalgia_unlock(&state, reg(), ItemTier::Chronograph),
        state
    );

    let first = buy_nostalgia_unlock(&state, reg(), ItemTier::Mechanical);
    assert_eq!(first.nostalgia.points, 8);
    let second = buy_nostalgia_unlock(&first, reg(), ItemTier::Chronograph);
    assert_eq!(second.nostalgia.points, 3);
    assert_eq!(
        second.nostalgia.unlocked,
        vec![ItemTier::Mechanical, ItemTier::Chronograph]
    );

    // Only the last unlock can be refunded.
    assert_eq!(
        refund_nostalgia_unlock(&second, reg(), ItemTier::Mechanical),
        second
    );
    let refunded = refund_nostalgia_unlock(&second, reg(), ItemTier::Chronograph);
    assert_eq!(refunded.nostalgia.unlocked, vec![ItemTier::Mechanical]);
    assert_eq!(refunded.nostalgia.points, 8);
}

#[test]
fn nostalgia_unlock_waives_lock_and_momentum() {
    let mut state = with_cash(10_000);
    state.nostalgia.unlocked = vec![ItemTier::Mechanical, ItemTier::Chronograph];

    let gate = purchase_gate(&state, reg(), ItemTier::Chronograph, 1);
    assert!(gate.ok, "{gate:?}");
    assert_eq!(gate.momentum_required, 0);
    let next = buy_item(&state, reg(), ItemTier::Chronograph, 1);
    assert_eq!(next.cash, 10_000 - 4_000);
}

// ===========================================================================
// Events and rates
// ===========================================================================

#[test]
fn concurrent_events_multiply() {
    // A tourbillon pushes the collection past the auction threshold.
    let start = evaluate_unlocks(&with_items(&[(ItemTier::Tourbillon, 1)]), reg());
    let rate = cash_rate(&start, reg(), 1.0);

    let next = step(&start, 1_000, FAIR_MS, reg(), &SimConfig::default());
    assert_eq!(
        event_status(&next, EventId::AuctionFrenzy, FAIR_MS),
        EventStatus::Active
    );
    assert_eq!(
        event_status(&next, EventId::WatchFair, FAIR_MS),
        EventStatus::Active
    );
    let combined = event_multiplier(&next, reg(), FAIR_MS);
    assert!((combined - 1.6 * 1.27).abs() < 1e-12);

    let earned = next.cash as f64 + next.carry.cash;
    assert!((earned - rate * 1.6 * 1.27).abs() < 1e-6);
}

#[test]
fn threshold_event_cools_down_then_rearms() {
    let start = evaluate_unlocks(&with_items(&[(ItemTier::Tourbillon, 1)]), reg());
    let cfg = SimConfig::default();

    let fired = step(&start, 1_000, MIDYEAR_MS, reg(), &cfg);
    let ev = fired.event(EventId::AuctionFrenzy);
    assert_eq!(ev.active_until, MIDYEAR_MS + 60_000);
    assert_eq!(ev.next_available, MIDYEAR_MS + 660_000);

    let cooling = step(&fired, 1_000, MIDYEAR_MS + 120_000, reg(), &cfg);
    assert_eq!(
        event_status(&cooling, EventId::AuctionFrenzy, MIDYEAR_MS + 120_000),
        EventStatus::Cooldown
    );
    assert_eq!(event_multiplier(&cooling, reg(), MIDYEAR_MS + 120_000), 1.0);

    let again = step(&cooling, 1_000, MIDYEAR_MS + 660_000, reg(), &cfg);
    assert_eq!(
        again.event(EventId::AuctionFrenzy).active_until,
        MIDYEAR_MS + 720_000
    );
}

#[test]
fn every_multiplier_source_counts_once() {
    let state = evaluate_unlocks(&populated(), reg());
    let parts = multiplier_breakdown(&state, reg());
    let product = parts.upgrades
        * parts.set_bonuses
        * parts.collection
        * parts.workshop
        * parts.maison
        * parts.catalog
        * parts.abilities
        * parts.crafted
        * parts.legacy;
    assert!((parts.total() - product).abs() < 1e-9 * product);
    assert!(parts.legacy > 1.0);
    assert!(parts.crafted > 1.0);
}

#[test]
fn softcap_bends_high_income() {
    let mut state = with_items(&[(ItemTier::Tourbillon, 400)]);
    state = evaluate_unlocks(&state, reg());
    let cap = softcap(&state, reg());
    let rate = cash_rate(&state, reg(), 1.0);
    assert!(rate > cap.cap);
    assert_eq!(apply_softcap(cap.cap * 0.5, cap.cap, cap.exponent), cap.cap * 0.5);
}

// ===========================================================================
// Long runs
// ===========================================================================

#[test]
fn an_hour_of_ticks_earns_and_unlocks() {
    let state = with_items(&[(ItemTier::Quartz, 10), (ItemTier::Mechanical, 5)]);
    let after = run_ticks(&state, reg(), MIDYEAR_MS, 1_000, 3_600);
    assert!(after.cash > 0);
    assert!(after.momentum >= 3_600 * 7);
    assert!(after.achievements.contains(&AchievementId::FirstPurchase));
    assert_eq!(after.nostalgia.earned, after.cash);
}
