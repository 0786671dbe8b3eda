//! # fa-engine
//!
//! `fa-engine` is a unified engine for deterministic (DFA), nondeterministic (NFA) and
//! ε-transition (εNFA) finite automata: recognition, determinization, minimization, language
//! algebra and structural balancing, all built on a dense, arena-indexed representation
//! (`Rc<str>` names, `Vec`-of-indices adjacency) rather than a pointer-chasing graph.
//!
//! ## Usage
//!
//! ```rust
//! use fa_engine::dfa::build_dfa;
//! use fa_engine::model::{RawState, Transition};
//! use std::rc::Rc;
//!
//! let states = vec![RawState::new("s0"), RawState::new("s1")];
//! let alphabet = vec![Rc::from("a"), Rc::from("b")];
//! let transitions = vec![
//!     Transition::symbol_transition("s0", "a", "s1"),
//!     Transition::symbol_transition("s1", "a", "s0"),
//!     Transition::symbol_transition("s0", "b", "s0"),
//!     Transition::symbol_transition("s1", "b", "s1"),
//! ];
//! let (dfa, validation) = build_dfa(&states, &alphabet, &transitions, "s0", &[Rc::from("s1")]).unwrap();
//! assert!(validation.is_valid());
//! assert!(dfa.accepts(&["a"]).unwrap());
//! assert!(!dfa.accepts(&["a", "a"]).unwrap());
//! ```
//!
//! ## Validation
//!
//! Every automaton is built through `build_dfa`/`build_nfa`/`build_enfa`, which run the full
//! invariant suite (I1-I6, see `validation::automaton`) before a single state is allocated.
//! Construction fails with [`error::EngineError::InvalidAutomaton`] on a genuine invariant
//! violation (duplicate states, nondeterministic DFA transitions, dangling endpoints, ...); a
//! non-total DFA or an unreachable state is reported back as a warning/info alongside the built
//! automaton rather than rejected.
//!
//! ## Operations
//!
//! This crate supports:
//!
//! * Building and [validating](validation) DFAs, NFAs and εNFAs
//! * [Recognition](dfa::Dfa::accepts) / [step-by-step evaluation](dfa::Dfa::evaluator) for all three
//! * [Determinization](nfa::Nfa::to_dfa) (subset construction) and [ε-elimination](nfa::Nfa::remove_epsilon_moves)
//! * [Minimization](dfa::Dfa::minimize) via Hopcroft partition refinement, plus [incremental re-minimization](optimize::incremental_minimize)
//! * [Unreachable](dfa::Dfa::remove_unreachable_states)/[non-coaccessible](optimize::prune_non_coaccessible) state pruning
//! * [Union](algebra::union)/[intersection](algebra::intersection)/[complement](algebra::complement)/[concatenation](algebra::concatenate)/[Kleene star](algebra::star)
//! * [Structural/performance/memory balancing](balance) with language-preservation verification
//! * Canonical JSON [serialization](serialization)

pub mod algebra;
pub mod automaton;
pub mod balance;
pub mod config;
pub mod convert;
pub mod dfa;
pub mod error;
pub mod model;
pub mod nfa;
pub mod optimize;
#[cfg(test)]
mod property_tests;
pub mod serialization;
pub mod util;
pub mod validation;

pub use automaton::Automaton;
pub use config::EngineConfig;
pub use error::EngineError;

use model::{RawState, Transition};
use std::rc::Rc;
use validation::ValidationResult;

/// Builds a DFA from raw builder input, running I1-I6 (see `dfa::build_dfa`).
pub fn build_dfa(
    states: &[RawState],
    alphabet: &[Rc<str>],
    transitions: &[Transition],
    initial_state: &str,
    final_states: &[Rc<str>],
) -> Result<(Automaton, ValidationResult), EngineError> {
    let (built, validation) = dfa::build_dfa(states, alphabet, transitions, initial_state, final_states)?;
    Ok((built.into(), validation))
}

/// Builds a plain NFA from raw builder input, running I1-I6 (see `nfa::build_nfa`).
pub fn build_nfa(
    states: &[RawState],
    alphabet: &[Rc<str>],
    transitions: &[Transition],
    initial_states: &[Rc<str>],
    final_states: &[Rc<str>],
) -> Result<(Automaton, ValidationResult), EngineError> {
    let (built, validation) = nfa::build_nfa(states, alphabet, transitions, initial_states, final_states)?;
    Ok((built.into(), validation))
}

/// Builds an εNFA from raw builder input, running I1-I6 (see `nfa::build_enfa`).
pub fn build_enfa(
    states: &[RawState],
    alphabet: &[Rc<str>],
    transitions: &[Transition],
    initial_states: &[Rc<str>],
    final_states: &[Rc<str>],
) -> Result<(Automaton, ValidationResult), EngineError> {
    let (built, validation) = nfa::build_enfa(states, alphabet, transitions, initial_states, final_states)?;
    Ok((built.into(), validation))
}

/// Checks if `automaton` accepts `word`, failing with [`EngineError::UnknownSymbol`] on a
/// symbol outside its alphabet.
pub fn accepts(automaton: &Automaton, word: &[&str]) -> Result<bool, EngineError> {
    automaton.accepts(word)
}

/// Minimizes a DFA (unreachable + non-coaccessible pruning, then Hopcroft refinement).
pub fn minimize(dfa: &dfa::Dfa, config: &EngineConfig) -> Result<dfa::Dfa, EngineError> {
    optimize::minimize(dfa, config)
}

/// Converts a NFA/εNFA to an equivalent DFA via subset construction.
pub fn convert_to_dfa(nfa: &nfa::Nfa, config: &EngineConfig) -> Result<dfa::Dfa, EngineError> {
    convert::convert_to_dfa(nfa, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_build_and_accepts_round_trip() {
        let states = vec![RawState::new("q0"), RawState::new("q1")];
        let alphabet = vec![Rc::from("a")];
        let transitions = vec![Transition::symbol_transition("q0", "a", "q1")];
        let (automaton, validation) = build_dfa(&states, &alphabet, &transitions, "q0", &[Rc::from("q1")]).unwrap();
        assert!(validation.is_valid());
        assert!(accepts(&automaton, &["a"]).unwrap());
    }

    #[test]
    fn top_level_minimize_shrinks_redundant_states() {
        let states = vec![RawState::new("a"), RawState::new("b"), RawState::new("c"), RawState::new("d")];
        let alphabet = vec![Rc::from("x")];
        let transitions = vec![
            Transition::symbol_transition("a", "x", "b"),
            Transition::symbol_transition("b", "x", "a"),
            Transition::symbol_transition("c", "x", "d"),
            Transition::symbol_transition("d", "x", "c"),
        ];
        let finals: Vec<Rc<str>> = vec![Rc::from("b"), Rc::from("d")];
        let (dfa, _) = dfa::build_dfa(&states, &alphabet, &transitions, "a", &finals).unwrap();
        let minimized = minimize(&dfa, &EngineConfig::default()).unwrap();
        assert_eq!(minimized.states().len(), 2);
    }
}
