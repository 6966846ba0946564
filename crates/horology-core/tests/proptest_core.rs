//! Property-based tests for the Horology core engine.
//!
//! Uses proptest to generate random states and action sequences, then
//! verify the economy's structural invariants hold.

use horology_core::actions::*;
use horology_core::event::negotiate;
use horology_core::id::*;
use horology_core::prestige::*;
use horology_core::pricing::purchase_gate;
use horology_core::progress::evaluate_unlocks;
use horology_core::rates::apply_softcap;
use horology_core::registry::Registry;
use horology_core::serialize::{decode, decode_str, encode, encode_string};
use horology_core::sim::{SimConfig, step};
use horology_core::state::GameState;
use horology_core::test_utils::*;
use proptest::prelude::*;

fn reg() -> &'static Registry {
    Registry::standard()
}

// ===========================================================================
// Generators
// ===========================================================================

fn arb_tier() -> impl Strategy<Value = ItemTier> {
    proptest::sample::select(ItemTier::ALL.to_vec())
}

/// An early-to-mid game state: some cash, some momentum, a few items.
fn arb_state() -> impl Strategy<Value = GameState> {
    (
        0..5_000_000u64,
        0..50_000_000u64,
        0..40u64,
        0..15u64,
        0..5u64,
    )
        .prop_map(|(cash, momentum, quartz, mechanical, chronograph)| {
            let mut state = with_items(&[
                (ItemTier::Quartz, quartz),
                (ItemTier::Mechanical, mechanical),
                (ItemTier::Chronograph, chronograph),
            ]);
            state.cash = cash;
            state.momentum = momentum;
            state
        })
}

#[derive(Debug, Clone)]
enum Op {
    Buy(ItemTier, u64),
    Upgrade(UpgradeId),
    Dismantle(ItemTier, u64),
    Craft(RecipeId),
    Step(u64),
    Therapy,
    Workshop,
    Maison,
    Nostalgia,
}

fn arb_ops(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            (arb_tier(), 1..20u64).prop_map(|(t, q)| Op::Buy(t, q)),
            proptest::sample::select(UpgradeId::ALL.to_vec()).prop_map(Op::Upgrade),
            (arb_tier(), 1..5u64).prop_map(|(t, q)| Op::Dismantle(t, q)),
            proptest::sample::select(RecipeId::ALL.to_vec()).prop_map(Op::Craft),
            (1..120_000u64).prop_map(Op::Step),
            Just(Op::Therapy),
            Just(Op::Workshop),
            Just(Op::Maison),
            Just(Op::Nostalgia),
        ],
        1..=max_ops,
    )
}

fn apply(state: &GameState, op: &Op, now: u64) -> GameState {
    let r = reg();
    match *op {
        Op::Buy(tier, qty) => buy_item(state, r, tier, qty),
        Op::Upgrade(id) => buy_upgrade(state, r, id),
        Op::Dismantle(tier, qty) => dismantle_item(state, r, tier, qty),
        Op::Craft(id) => craft_boost(state, r, id),
        Op::Step(ms) => step(state, ms, now, r, &SimConfig::default()),
        Op::Therapy => hold_therapy_session(state, r, now),
        Op::Workshop => workshop_prestige(state, r),
        Op::Maison => maison_prestige(state, r),
        Op::Nostalgia => nostalgia_prestige(state, r, now),
    }
}

#[derive(Debug, Clone, Copy)]
enum Move {
    Tick(u64),
    Negotiate(u32, f64),
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Achievements are never removed, whatever the action sequence.
    #[test]
    fn achievements_only_grow(start in arb_state(), ops in arb_ops(40)) {
        let mut state = start;
        let mut now = MIDYEAR_MS;
        for op in &ops {
            now += 1_000;
            if let Op::Step(ms) = op {
                now += ms;
            }
            let next = apply(&state, op, now);
            prop_assert!(next.achievements.is_superset(&state.achievements));
            for (boost, &count) in &state.crafting.boosts {
                // Crafted boosts only drop through a nostalgia reset.
                if !matches!(op, Op::Nostalgia) {
                    prop_assert!(next.crafting.boost_count(*boost) >= count);
                }
            }
            state = next;
        }
    }

    /// A purchase happens iff the gate is open, and costs exactly its price.
    #[test]
    fn gate_decides_purchase(state in arb_state(), tier in arb_tier(), qty in 0..50u64) {
        let gate = purchase_gate(&state, reg(), tier, qty);
        let next = buy_item(&state, reg(), tier, qty);
        if gate.ok {
            prop_assert_eq!(next.cash, state.cash - gate.price);
            prop_assert_eq!(next.owned(tier), state.owned(tier) + qty);
            prop_assert_eq!(next.momentum, state.momentum);
        } else {
            prop_assert_eq!(next, state);
        }
    }

    /// Two short steps accrue the same total as one long one.
    #[test]
    fn steps_are_additive(
        quartz in 0..30u64,
        mechanical in 0..5u64,
        first in 1..30_000u64,
        second in 1..30_000u64,
    ) {
        let state = evaluate_unlocks(
            &with_items(&[(ItemTier::Quartz, quartz), (ItemTier::Mechanical, mechanical)]),
            reg(),
        );
        let cfg = SimConfig::default();
        let total = first + second;
        let whole = step(&state, total, MIDYEAR_MS + total, reg(), &cfg);
        let half = step(&state, first, MIDYEAR_MS + first, reg(), &cfg);
        let split = step(&half, second, MIDYEAR_MS + total, reg(), &cfg);

        let cash = |s: &GameState| s.cash as f64 + s.carry.cash;
        let momentum = |s: &GameState| s.momentum as f64 + s.carry.momentum;
        prop_assert!((cash(&whole) - cash(&split)).abs() < 1e-6);
        prop_assert!((momentum(&whole) - momentum(&split)).abs() < 1e-6);
    }

    #[test]
    fn zero_step_changes_nothing(state in arb_state(), now in 0..u64::MAX / 2) {
        let next = step(&state, 0, now, reg(), &SimConfig::default());
        prop_assert_eq!(next, state);
    }

    /// The unlock list is always a prefix of the fixed order.
    #[test]
    fn nostalgia_unlocks_stay_ordered(
        points in 0..40u64,
        ops in proptest::collection::vec((any::<bool>(), arb_tier()), 1..30),
    ) {
        let mut state = GameState::new();
        state.nostalgia.points = points;
        let order: Vec<ItemTier> = reg().nostalgia_order().iter().map(|s| s.item).collect();
        for (buy, item) in ops {
            state = if buy {
                buy_nostalgia_unlock(&state, reg(), item)
            } else {
                refund_nostalgia_unlock(&state, reg(), item)
            };
            let unlocked = &state.nostalgia.unlocked;
            prop_assert_eq!(unlocked.as_slice(), &order[..unlocked.len()]);
        }
        let spent: u64 = state
            .nostalgia
            .unlocked
            .iter()
            .filter_map(|&item| nostalgia_unlock_cost(reg(), item))
            .sum();
        prop_assert_eq!(state.nostalgia.points + spent, points);
    }

    /// The softcap is continuous at the cap and never raises income.
    #[test]
    fn softcap_is_continuous_and_dampening(
        cap in 1.0..1e9f64,
        exponent in 0.05..=1.0f64,
        scale in 0.0..10.0f64,
    ) {
        prop_assert_eq!(apply_softcap(cap, cap, exponent), cap);
        let raw = cap * scale;
        let out = apply_softcap(raw, cap, exponent);
        prop_assert!(out <= raw * (1.0 + 1e-12));
        if raw > cap {
            prop_assert!(out >= cap);
        } else {
            prop_assert_eq!(out, raw);
        }
    }

    /// Above the cap the curve keeps rising, but slower than the raw rate.
    #[test]
    fn softcap_is_increasing_and_sublinear_above_cap(
        cap in 1.0..1e9f64,
        exponent in 0.05..0.95f64,
        low in 1.01..100.0f64,
        gap in 0.01..100.0f64,
    ) {
        let r1 = cap * low;
        let r2 = r1 * (1.0 + gap);
        let out1 = apply_softcap(r1, cap, exponent);
        let out2 = apply_softcap(r2, cap, exponent);
        prop_assert!(out1 < out2, "{} !< {}", out1, out2);
        prop_assert!(out1 < r1);
        prop_assert!(out2 < r2);
        prop_assert!(out2 - out1 < r2 - r1);
    }

    /// Each reset keeps everything outside its own scope.
    #[test]
    fn resets_preserve_outer_progress(momentum in 0..80_000_000u64, earned in 0..10_000_000_000u64) {
        let mut base = populated();
        base.momentum = momentum;
        base.nostalgia.earned = earned;

        let w = workshop_prestige(&base, reg());
        if can_workshop_prestige(&base, reg()) {
            prop_assert_eq!(w.workshop.blueprints, base.workshop.blueprints + workshop_gain(&base, reg()));
            prop_assert_eq!(w.total_owned(), 0);
        } else {
            prop_assert_eq!(&w, &base);
        }
        prop_assert_eq!(&w.workshop.upgrades, &base.workshop.upgrades);
        prop_assert_eq!(&w.milestones, &base.milestones);
        prop_assert_eq!(&w.events, &base.events);
        prop_assert_eq!(&w.career, &base.career);
        prop_assert_eq!(&w.achievements, &base.achievements);
        prop_assert_eq!(&w.maison, &base.maison);
        prop_assert_eq!(&w.nostalgia, &base.nostalgia);
        prop_assert_eq!(&w.catalog, &base.catalog);
        prop_assert_eq!(&w.crafting, &base.crafting);

        let m = maison_prestige(&base, reg());
        prop_assert_eq!(&m.nostalgia, &base.nostalgia);
        prop_assert_eq!(&m.achievements, &base.achievements);
        prop_assert_eq!(&m.crafting, &base.crafting);
        prop_assert_eq!(&m.career, &base.career);
        prop_assert!(m.maison.heritage >= base.maison.heritage);

        let n = nostalgia_prestige(&base, reg(), MIDYEAR_MS);
        if can_nostalgia_prestige(&base, reg()) {
            prop_assert_eq!(&n.items, &base.items);
            prop_assert_eq!(&n.nostalgia.unlocked, &base.nostalgia.unlocked);
            prop_assert_eq!(n.maison.heritage, 0);
            prop_assert_eq!(n.workshop.blueprints, 0);
        }
        prop_assert_eq!(&n.achievements, &base.achievements);
        prop_assert_eq!(&n.catalog, &base.catalog);
    }

    /// Any state reached by ticking and negotiating survives a save exactly,
    /// fractional carries and override multipliers included.
    #[test]
    fn played_states_survive_a_save(
        quartz in 1..40u64,
        mechanical in 0..10u64,
        moves in proptest::collection::vec(
            prop_oneof![
                (1..90_000u64).prop_map(Move::Tick),
                (0..=10u32, 0.0..1.0f64).prop_map(|(t, r)| Move::Negotiate(t, r)),
            ],
            1..40,
        ),
    ) {
        let mut state = with_items(&[(ItemTier::Quartz, quartz), (ItemTier::Mechanical, mechanical)]);
        let mut now = MIDYEAR_MS;
        for (i, mv) in moves.iter().enumerate() {
            now += 1_000;
            state = match *mv {
                Move::Tick(ms) => {
                    now += ms;
                    step(&state, ms, now, reg(), &SimConfig::default())
                }
                Move::Negotiate(tension, roll) => negotiate(&state, reg(), tension, roll, now),
            };

            let text = encode_string(&state, now).unwrap();
            prop_assert_eq!(&decode_str(&text, reg()).unwrap().state, &state, "move {}", i);
            let value = encode(&state, now).unwrap();
            prop_assert_eq!(&decode(value, reg()).unwrap().state, &state, "move {}", i);
        }
    }
}
