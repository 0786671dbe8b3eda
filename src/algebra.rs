//! Language algebra: union, intersection, complement, concatenation and Kleene star.
//!
//! Union/intersection/complement operate on DFAs and generalize
//! `Dfa::product_construction`/`Dfa::invert` directly. Concatenation and star operate on
//! NFAs and reuse the same disjointify-and-shift technique `Nfa::union` already uses to combine
//! two automata's state spaces, wiring the pieces together with fresh ε-transitions the way a
//! Thompson construction would.

use crate::config::EngineConfig;
use crate::dfa::{Dfa, DfaState};
use crate::error::EngineError;
use crate::model::{AutomatonKind, StateKind};
use crate::nfa::{Nfa, NfaState};
use crate::optimize::completed_with_sink;
use std::rc::Rc;

/// Extends `dfa`'s alphabet to `full_alphabet`, routing any symbol `dfa` didn't already have
/// through a fresh sink state. Used to align two DFAs with different alphabets before a product
/// construction: any symbol missing from one side's alphabet routes through a shared sink added
/// to whichever automaton lacks it.
fn extend_alphabet(dfa: &Dfa, full_alphabet: &[Rc<str>]) -> Dfa {
    if dfa.alphabet().len() == full_alphabet.len() && dfa.alphabet().iter().zip(full_alphabet).all(|(a, b)| a == b) {
        return dfa.clone();
    }
    let old_index: std::collections::HashMap<&Rc<str>, usize> = dfa.alphabet().iter().enumerate().map(|(i, s)| (s, i)).collect();
    let sink = dfa.states().len();
    let mut states: Vec<DfaState> = dfa
        .states()
        .iter()
        .map(|s| DfaState {
            name: Rc::from(s.name()),
            kind: s.kind(),
            metadata: s.metadata().cloned(),
            transitions: full_alphabet
                .iter()
                .map(|symbol| old_index.get(symbol).and_then(|&i| s.transitions()[i]))
                .collect(),
        })
        .collect();
    states.push(DfaState {
        name: Rc::from("__sink"),
        kind: StateKind::Intermediate,
        metadata: None,
        transitions: vec![Some(sink); full_alphabet.len()],
    });
    Dfa::from_parts(Rc::from(full_alphabet), states, dfa.initial_state_index())
}

fn merged_alphabet(a: &Dfa, b: &Dfa) -> Vec<Rc<str>> {
    let mut merged: Vec<Rc<str>> = a.alphabet().to_vec();
    for symbol in b.alphabet() {
        if !merged.contains(symbol) {
            merged.push(symbol.clone());
        }
    }
    merged
}

/// Union of two DFAs, merging alphabets first if they differ.
pub fn union(a: &Dfa, b: &Dfa) -> Result<Dfa, EngineError> {
    product(a, b, |s1, s2| is_accepting(s1) || is_accepting(s2))
}

/// Intersection of two DFAs, merging alphabets first if they differ.
pub fn intersection(a: &Dfa, b: &Dfa) -> Result<Dfa, EngineError> {
    product(a, b, |s1, s2| is_accepting(s1) && is_accepting(s2))
}

fn is_accepting(state: Option<&DfaState>) -> bool {
    state.map_or(false, DfaState::is_accepting)
}

fn product(a: &Dfa, b: &Dfa, combinator: impl FnMut(Option<&DfaState>, Option<&DfaState>) -> bool) -> Result<Dfa, EngineError> {
    let full_alphabet = merged_alphabet(a, b);
    let a = extend_alphabet(a, &full_alphabet);
    let b = extend_alphabet(b, &full_alphabet);
    a.product_construction(&b, combinator).ok_or_else(|| EngineError::InvalidAutomaton {
        reason: "could not align alphabets for product construction".to_string(),
        location: Some("algebra::product".to_string()),
    })
}

/// Complement of a DFA: completes it against a sink if it isn't total, then flips the final set.
/// A total DFA is required because an incomplete one's "non-accepting" states include the
/// implicit stuck state, which has to be made explicit before its acceptance can be inverted.
pub fn complement(dfa: &Dfa) -> Dfa {
    let mut total = completed_with_sink(dfa);
    total.invert();
    total
}

/// Concatenation of two NFAs: disjointifies their state sets (index-shift, as in
/// `Nfa::union`), wires an ε-transition from each final of `a` to the (shifted) initial of `b`,
/// and — if `a` accepts the empty word — an extra ε-transition straight from `a`'s initial to
/// `b`'s initial, so a zero-length match of `a` still reaches `b`. New initial is `a`'s initial;
/// new finals are (shifted) finals of `b`.
pub fn concatenate(a: &Nfa, b: &Nfa) -> Result<Nfa, EngineError> {
    if a.alphabet() != b.alphabet() {
        return Err(EngineError::InvalidAutomaton {
            reason: "concatenation requires identical alphabets".to_string(),
            location: Some("algebra::concatenate".to_string()),
        });
    }
    let a_accepts_empty = a.accepts(&[])?;
    let shift = a.states().len();

    let mut states: Vec<NfaState> = a.states().to_vec();
    for state in states.iter_mut() {
        if state.is_accepting() {
            state.kind = StateKind::from_flags(state.is_initial(), false);
        }
    }
    for state in b.states() {
        states.push(NfaState {
            name: state.name.clone(),
            kind: StateKind::from_flags(false, state.is_accepting()),
            metadata: state.metadata().cloned(),
            epsilon_transitions: state.epsilon_transitions().iter().map(|i| i + shift).collect(),
            transitions: state.transitions().iter().map(|ts| ts.iter().map(|i| i + shift).collect()).collect(),
        });
    }

    let a_initials = a.initial_state_indices();
    let b_initials: Vec<usize> = b.initial_state_indices().iter().map(|i| i + shift).collect();
    for (idx, state) in states.iter_mut().enumerate().take(shift) {
        if a.states()[idx].is_accepting() || (a_initials.contains(&idx) && a_accepts_empty) {
            state.epsilon_transitions.extend(b_initials.iter().copied());
        }
    }

    Ok(Nfa::from_parts(a.alphabet().to_vec().into(), states, a_initials.to_vec(), AutomatonKind::Enfa))
}

/// Kleene star of an NFA: a fresh initial-and-final state `s0`, ε-wired to the original initial
/// and from every original final back to `s0`.
pub fn star(a: &Nfa) -> Nfa {
    let mut states: Vec<NfaState> = a.states().to_vec();
    let new_idx = states.len();
    let old_initials: Vec<usize> = a.initial_state_indices().to_vec();

    for (idx, state) in states.iter_mut().enumerate() {
        if old_initials.contains(&idx) {
            state.kind = StateKind::from_flags(false, state.is_accepting());
        }
        if state.is_accepting() {
            state.epsilon_transitions.push(new_idx);
        }
    }

    states.push(NfaState {
        name: Rc::from("s_star"),
        kind: StateKind::InitialFinal,
        metadata: None,
        epsilon_transitions: old_initials,
        transitions: vec![vec![]; a.alphabet().len()],
    });

    Nfa::from_parts(a.alphabet().to_vec().into(), states, vec![new_idx], AutomatonKind::Enfa)
}

/// Determinizes a language-algebra NFA result and minimizes it -- a convenience for callers that
/// want a compact DFA out of `concatenate`/`star` rather than the raw εNFA.
pub fn to_minimized_dfa(nfa: &Nfa, config: &EngineConfig) -> Result<Dfa, EngineError> {
    crate::convert::convert_to_dfa(nfa, config).map(|mut dfa| {
        dfa.minimize();
        dfa
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawState, Transition};

    fn star_dfa(symbol: &str) -> Dfa {
        let states = vec![RawState::new("q0")];
        let transitions = vec![Transition::symbol_transition("q0", symbol, "q0")];
        crate::dfa::build_dfa(&states, &[Rc::from(symbol)], &transitions, "q0", &[Rc::from("q0")]).unwrap().0
    }

    #[test]
    fn union_accepts_either_language() {
        let a = star_dfa("a");
        let b = star_dfa("b");
        let u = union(&a, &b).unwrap();
        assert!(u.accepts(&[]).unwrap());
        assert!(u.accepts(&["a", "a", "a"]).unwrap());
        assert!(u.accepts(&["b", "b"]).unwrap());
        assert!(!u.accepts(&["a", "b"]).unwrap());
    }

    #[test]
    fn complement_flips_acceptance_on_total_dfa() {
        let states = vec![RawState::new("q0"), RawState::new("q1")];
        let alphabet = vec![Rc::from("a")];
        let transitions = vec![Transition::symbol_transition("q0", "a", "q1"), Transition::symbol_transition("q1", "a", "q0")];
        let (dfa, _) = crate::dfa::build_dfa(&states, &alphabet, &transitions, "q0", &[Rc::from("q1")]).unwrap();
        let comp = complement(&dfa);
        assert_eq!(dfa.accepts(&["a"]).unwrap(), !comp.accepts(&["a"]).unwrap());
        assert_eq!(dfa.accepts(&[]).unwrap(), !comp.accepts(&[]).unwrap());
    }

    #[test]
    fn concatenate_then_star_accepts_repeated_ab() {
        let states_a = vec![RawState::new("a0"), RawState::new("a1")];
        let (a, _) = crate::nfa::build_nfa(&states_a, &[Rc::from("a"), Rc::from("b")], &[Transition::symbol_transition("a0", "a", "a1")], &[Rc::from("a0")], &[Rc::from("a1")]).unwrap();
        let states_b = vec![RawState::new("b0"), RawState::new("b1")];
        let (b, _) = crate::nfa::build_nfa(&states_b, &[Rc::from("a"), Rc::from("b")], &[Transition::symbol_transition("b0", "b", "b1")], &[Rc::from("b0")], &[Rc::from("b1")]).unwrap();

        let ab = concatenate(&a, &b).unwrap();
        assert!(ab.accepts(&["a", "b"]).unwrap());
        assert!(!ab.accepts(&["a"]).unwrap());

        let starred = star(&ab);
        assert!(starred.accepts(&[]).unwrap());
        assert!(starred.accepts(&["a", "b", "a", "b", "a", "b"]).unwrap());
        assert!(!starred.accepts(&["a", "b", "a"]).unwrap());
    }
}
