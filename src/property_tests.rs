//! Crate-wide invariant properties (language preservation under minimization, conversion,
//! algebra, serialization, balancing and pruning) plus a handful of worked scenarios fixed sizes
//! are good at catching but randomized generation tends to walk right past. Generators build
//! through the public `build_dfa`/`build_nfa`/`build_enfa` constructors (rather than literal
//! struct construction) so every generated automaton is guaranteed to already satisfy the
//! builder's structural invariants.

use crate::config::EngineConfig;
use crate::dfa::Dfa;
use crate::model::{RawState, Transition};
use crate::nfa::Nfa;
use proptest::prelude::*;
use std::rc::Rc;

fn state_name(i: usize) -> String {
    format!("s{i}")
}

prop_compose! {
    fn dfa(max_states: usize, alphabet_size: usize)
        (num_states in 2..max_states)
        (
            transitions in prop::collection::vec(prop::collection::vec(0..num_states, alphabet_size), num_states),
            accepting in prop::collection::vec(any::<bool>(), num_states),
            num_states in Just(num_states),
        )
    -> Dfa {
        let states: Vec<RawState> = (0..num_states).map(|i| RawState::new(state_name(i))).collect();
        let alphabet: Vec<Rc<str>> = (0..alphabet_size).map(|i| Rc::from(format!("a{i}").as_str())).collect();
        let mut trans = Vec::new();
        for (src, row) in transitions.iter().enumerate() {
            for (sym_idx, &target) in row.iter().enumerate() {
                trans.push(Transition::symbol_transition(state_name(src), format!("a{sym_idx}"), state_name(target)));
            }
        }
        let finals: Vec<Rc<str>> = accepting.iter().enumerate().filter(|(_, &b)| b).map(|(i, _)| Rc::from(state_name(i).as_str())).collect();
        crate::dfa::build_dfa(&states, &alphabet, &trans, &state_name(0), &finals).unwrap().0
    }
}

prop_compose! {
    fn nfa(max_states: usize, alphabet_size: usize)
        (num_states in 2..max_states)
        (
            transitions in prop::collection::vec(prop::collection::vec(prop::collection::vec(any::<bool>(), num_states), alphabet_size), num_states),
            accepting in prop::collection::vec(any::<bool>(), num_states),
            num_states in Just(num_states),
        )
    -> Nfa {
        let states: Vec<RawState> = (0..num_states).map(|i| RawState::new(state_name(i))).collect();
        let alphabet: Vec<Rc<str>> = (0..alphabet_size).map(|i| Rc::from(format!("a{i}").as_str())).collect();
        let mut trans = Vec::new();
        for (src, row) in transitions.iter().enumerate() {
            for (sym_idx, targets) in row.iter().enumerate() {
                for (dst, &present) in targets.iter().enumerate() {
                    if present {
                        trans.push(Transition::symbol_transition(state_name(src), format!("a{sym_idx}"), state_name(dst)));
                    }
                }
            }
        }
        let finals: Vec<Rc<str>> = accepting.iter().enumerate().filter(|(_, &b)| b).map(|(i, _)| Rc::from(state_name(i).as_str())).collect();
        crate::nfa::build_nfa(&states, &alphabet, &trans, &[Rc::from(state_name(0).as_str())], &finals).unwrap().0
    }
}

proptest! {
    /// minimization never changes the recognized language.
    #[test]
    fn minimize_preserves_acceptance(dfa in dfa(20, 3)) {
        let mut minimized = dfa.clone();
        minimized.minimize();
        prop_assert!(dfa.equivalent_to(&minimized));
        prop_assert!(minimized.equivalent_to(&dfa));
    }

    /// minimizing an already-minimal DFA doesn't shrink it further.
    #[test]
    fn minimize_is_idempotent(dfa in dfa(15, 3)) {
        let mut once = dfa.clone();
        once.minimize();
        let mut twice = once.clone();
        twice.minimize();
        prop_assert_eq!(once.states().len(), twice.states().len());
    }

    /// subset construction preserves the recognized language.
    #[test]
    fn convert_to_dfa_preserves_acceptance(nfa in nfa(12, 3)) {
        let config = EngineConfig::default();
        let converted = nfa.to_dfa_with_config(&config).unwrap();
        prop_assert!(nfa.equivalent_to(&converted.clone().to_nfa()));
    }

    /// double complement is the identity (up to language equivalence).
    #[test]
    fn complement_is_an_involution(dfa in dfa(15, 3)) {
        let once = crate::algebra::complement(&dfa);
        let twice = crate::algebra::complement(&once);
        let completed = crate::optimize::completed_with_sink(&dfa);
        prop_assert!(completed.equivalent_to(&twice));
    }

    /// union and intersection are commutative up to language equivalence.
    #[test]
    fn union_and_intersection_are_commutative(a in dfa(12, 3), b in dfa(12, 3)) {
        let union_ab = crate::algebra::union(&a, &b).unwrap();
        let union_ba = crate::algebra::union(&b, &a).unwrap();
        prop_assert!(union_ab.equivalent_to(&union_ba));

        let inter_ab = crate::algebra::intersection(&a, &b).unwrap();
        let inter_ba = crate::algebra::intersection(&b, &a).unwrap();
        prop_assert!(inter_ab.equivalent_to(&inter_ba));
    }

    /// JSON serialization round-trips to a language-equivalent automaton.
    #[test]
    fn json_round_trip_preserves_language(dfa in dfa(15, 3)) {
        let json = crate::serialization::dfa_to_json(&dfa).unwrap();
        let (reloaded, _) = crate::serialization::dfa_from_json(&json).unwrap();
        prop_assert!(dfa.equivalent_to(&reloaded));
    }

    /// every registered balancing strategy preserves the recognized language.
    #[test]
    fn balancing_preserves_language(dfa in dfa(15, 3)) {
        let engine = crate::balance::BalancingEngine::default();
        let profile = crate::balance::metrics::uniform_profile(&dfa);
        let result = engine.balance(&dfa, crate::balance::BalanceChoice::Auto, &profile).unwrap();
        prop_assert!(dfa.equivalent_to(&result.dfa));
    }

    /// pruning unreachable/non-coaccessible states never changes the recognized language.
    #[test]
    fn pruning_preserves_language(dfa in dfa(20, 3)) {
        let mut pruned = dfa.clone();
        pruned.remove_unreachable_states();
        crate::optimize::prune_non_coaccessible(&mut pruned);
        prop_assert!(dfa.equivalent_to(&pruned));
    }
}

/// Concrete scenario: a 2-state DFA over {a, b} accepting strings with an odd number of `a`s.
#[test]
fn scenario_odd_number_of_a_over_ab() {
    let states = vec![RawState::new("even"), RawState::new("odd")];
    let alphabet = vec![Rc::from("a"), Rc::from("b")];
    let transitions = vec![
        Transition::symbol_transition("even", "a", "odd"),
        Transition::symbol_transition("even", "b", "even"),
        Transition::symbol_transition("odd", "a", "even"),
        Transition::symbol_transition("odd", "b", "odd"),
    ];
    let (dfa, validation) = crate::dfa::build_dfa(&states, &alphabet, &transitions, "even", &[Rc::from("odd")]).unwrap();
    assert!(validation.is_valid());
    assert!(dfa.accepts(&["a"]).unwrap());
    assert!(dfa.accepts(&["a", "a", "a"]).unwrap());
    assert!(!dfa.accepts(&["a", "a"]).unwrap());
    assert!(!dfa.accepts(&[]).unwrap());
}

/// Concrete scenario: a 5-state DFA with two equivalence classes minimizes down to 2 states.
#[test]
fn scenario_five_state_dfa_minimizes_to_two_classes() {
    let states = vec![
        RawState::new("a"),
        RawState::new("b"),
        RawState::new("c"),
        RawState::new("d"),
        RawState::new("e"),
    ];
    let alphabet = vec![Rc::from("0"), Rc::from("1")];
    let transitions = vec![
        Transition::symbol_transition("a", "0", "b"),
        Transition::symbol_transition("a", "1", "c"),
        Transition::symbol_transition("b", "0", "a"),
        Transition::symbol_transition("b", "1", "d"),
        Transition::symbol_transition("c", "0", "e"),
        Transition::symbol_transition("c", "1", "b"),
        Transition::symbol_transition("d", "0", "e"),
        Transition::symbol_transition("d", "1", "a"),
        Transition::symbol_transition("e", "0", "e"),
        Transition::symbol_transition("e", "1", "e"),
    ];
    let finals: Vec<Rc<str>> = vec![Rc::from("a"), Rc::from("b"), Rc::from("c"), Rc::from("d")];
    let (dfa, _) = crate::dfa::build_dfa(&states, &alphabet, &transitions, "a", &finals).unwrap();
    let mut minimized = dfa.clone();
    minimized.minimize();
    assert_eq!(minimized.states().len(), 2);
    assert!(dfa.equivalent_to(&minimized));
}

/// Concrete scenario: an εNFA over {a} accepting `a*` (including the empty word via an
/// ε-transition straight to the final state).
#[test]
fn scenario_enfa_over_a_accepts_a_star() {
    let states = vec![RawState::new("s0"), RawState::new("s1")];
    let transitions = vec![
        Transition::epsilon_transition("s0", "s1"),
        Transition::symbol_transition("s1", "a", "s1"),
    ];
    let (enfa, validation) = crate::nfa::build_enfa(&states, &[Rc::from("a")], &transitions, &[Rc::from("s0")], &[Rc::from("s1")]).unwrap();
    assert!(validation.is_valid());
    assert!(enfa.accepts(&[]).unwrap());
    assert!(enfa.accepts(&["a", "a", "a"]).unwrap());
}

/// Concrete scenario: the classic "nth-from-last symbol is `a`" NFA with n=4 determinizes to
/// exactly 2^4 = 16 DFA states.
#[test]
fn scenario_nth_from_last_determinizes_to_sixteen_states() {
    let n = 4;
    let states: Vec<RawState> = (0..=n).map(|i| RawState::new(format!("s{i}"))).collect();
    let mut transitions = Vec::new();
    for i in 0..=n {
        transitions.push(Transition::symbol_transition(format!("s{i}"), "a", format!("s{i}")));
        if i < n {
            transitions.push(Transition::symbol_transition(format!("s{i}"), "a", format!("s{}", i + 1)));
        }
    }
    let (nfa, _) = crate::nfa::build_nfa(&states, &[Rc::from("a")], &transitions, &[Rc::from("s0")], &[Rc::from(format!("s{n}").as_str())]).unwrap();
    let dfa = nfa.to_dfa();
    assert_eq!(dfa.states().len(), 1 << n);
}

/// Concrete scenario: union of `a*` and `b*` accepts exactly the words made of all `a`s or all
/// `b`s (and rejects any mix).
#[test]
fn scenario_a_star_union_b_star() {
    let a_states = vec![RawState::new("qa")];
    let (a, _) = crate::dfa::build_dfa(&a_states, &[Rc::from("a"), Rc::from("b")], &[Transition::symbol_transition("qa", "a", "qa")], "qa", &[Rc::from("qa")]).unwrap();
    let b_states = vec![RawState::new("qb")];
    let (b, _) = crate::dfa::build_dfa(&b_states, &[Rc::from("a"), Rc::from("b")], &[Transition::symbol_transition("qb", "b", "qb")], "qb", &[Rc::from("qb")]).unwrap();

    let union = crate::algebra::union(&a, &b).unwrap();
    assert!(union.accepts(&[]).unwrap());
    assert!(union.accepts(&["a", "a", "a"]).unwrap());
    assert!(union.accepts(&["b", "b"]).unwrap());
    assert!(!union.accepts(&["a", "b"]).unwrap());
}

/// Concrete scenario: balancing a 50-state random DFA never changes its recognized language.
#[test]
fn scenario_fifty_state_random_dfa_balances_without_changing_language() {
    use rand::prelude::*;
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let n = 50;
    let states: Vec<RawState> = (0..n).map(|i| RawState::new(state_name(i))).collect();
    let alphabet = vec![Rc::from("a"), Rc::from("b"), Rc::from("c")];
    let mut transitions = Vec::new();
    for i in 0..n {
        for symbol in ["a", "b", "c"] {
            let target = rng.gen_range(0..n);
            transitions.push(Transition::symbol_transition(state_name(i), symbol, state_name(target)));
        }
    }
    let finals: Vec<Rc<str>> = (0..n).filter(|i| i % 4 == 0).map(|i| Rc::from(state_name(i).as_str())).collect();
    let (dfa, _) = crate::dfa::build_dfa(&states, &alphabet, &transitions, &state_name(0), &finals).unwrap();

    let engine = crate::balance::BalancingEngine::default();
    let profile = crate::balance::metrics::uniform_profile(&dfa);
    let result = engine.balance(&dfa, crate::balance::BalanceChoice::Auto, &profile).unwrap();
    assert!(dfa.equivalent_to(&result.dfa));
}
