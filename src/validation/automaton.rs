//! Whole-automaton validation: I1-I6 checked over a raw builder input before any `Dfa`/`Nfa`
//! is constructed, plus a lighter post-construction revalidation entry point for callers that
//! already hold a built automaton (e.g. after a hand-assembled transform) and want to re-check it.
//!
//! The pre-construction entry point deliberately does not take `&Dfa`/`&Nfa`: those types only
//! exist once I1-I6 already hold, so checking them beforehand would be circular. Instead it
//! takes the same raw shape the `build_dfa`/`build_nfa` constructors take.

use super::state::StateValidator;
use super::transition::TransitionValidator;
use super::{ValidationResult, ValidationResultBuilder};
use crate::model::{AutomatonKind, RawState, Transition, TransitionKind};
use std::collections::HashSet;
use std::rc::Rc;

/// I6 size bound: an automaton with more states than this is rejected outright rather than
/// built and then discovered to be unworkable downstream.
const MAX_STATES: usize = 100_000;

/// I6 size bound: as `MAX_STATES`, for the transition table.
const MAX_TRANSITIONS: usize = 1_000_000;

/// Everything needed to construct a `Dfa`/`Nfa`, gathered up for validation before any
/// index-based internal representation is built.
pub struct RawAutomaton<'a> {
    pub kind: AutomatonKind,
    pub states: &'a [RawState],
    pub alphabet: &'a [Rc<str>],
    pub transitions: &'a [Transition],
    pub initial_states: &'a [Rc<str>],
    pub final_states: &'a [Rc<str>],
}

pub struct AutomatonValidator;

impl AutomatonValidator {
    /// Validates a raw builder input against I1-I6. This is the only validation path the
    /// `build_dfa`/`build_nfa`/`build_enfa` constructors call.
    pub fn validate_build(input: &RawAutomaton<'_>) -> ValidationResult {
        let mut sub_results = Vec::new();

        for state in input.states {
            sub_results.push(StateValidator::validate(state));
        }
        for transition in input.transitions {
            sub_results.push(TransitionValidator::validate(transition));
        }

        let mut builder = ValidationResultBuilder::new();

        // I1: unique state identifiers.
        let mut seen = HashSet::new();
        for state in input.states {
            if !seen.insert(&state.id) {
                builder.error("automaton.duplicate_state", format!("duplicate state id '{}'", state.id));
            }
        }
        let known_states: HashSet<&Rc<str>> = input.states.iter().map(|s| &s.id).collect();

        // I1: at least one state, exactly the declared alphabet has no duplicate/empty symbols.
        if input.states.is_empty() {
            builder.error("automaton.no_states", "automaton has no states");
        }

        // I6: reject outright rather than build something downstream transforms can't handle.
        if input.states.len() > MAX_STATES {
            builder.error(
                "automaton.too_many_states",
                format!("automaton declares {} states, exceeding the {MAX_STATES} limit", input.states.len()),
            );
        }
        if input.transitions.len() > MAX_TRANSITIONS {
            builder.error(
                "automaton.too_many_transitions",
                format!("automaton declares {} transitions, exceeding the {MAX_TRANSITIONS} limit", input.transitions.len()),
            );
        }
        let mut seen_symbols = HashSet::new();
        for symbol in input.alphabet {
            if symbol.is_empty() {
                builder.error("automaton.empty_symbol", "alphabet contains an empty symbol");
            }
            if !seen_symbols.insert(symbol) {
                builder.error("automaton.duplicate_symbol", format!("duplicate alphabet symbol '{symbol}'"));
            }
        }
        let known_symbols: HashSet<&Rc<str>> = input.alphabet.iter().collect();

        // I2: at least one initial state; DFA has exactly one.
        if input.initial_states.is_empty() {
            builder.error("automaton.no_initial_state", "automaton declares no initial state");
        }
        if input.kind == AutomatonKind::Dfa && input.initial_states.len() > 1 {
            builder.error(
                "automaton.multiple_initial_states",
                format!("DFA declares {} initial states, exactly one is required", input.initial_states.len()),
            );
        }
        for id in input.initial_states {
            if !known_states.contains(id) {
                builder.error("automaton.dangling_initial_state", format!("initial state '{id}' is not declared"));
            }
        }
        for id in input.final_states {
            if !known_states.contains(id) {
                builder.error("automaton.dangling_final_state", format!("final state '{id}' is not declared"));
            }
        }
        if input.final_states.is_empty() {
            builder.warning("automaton.no_final_states", "automaton declares no final states; it recognizes no words");
        }

        // I3: every transition endpoint and symbol must be declared; epsilon only outside DFA.
        let mut used_symbols: HashSet<&Rc<str>> = HashSet::new();
        let mut epsilon_count = 0usize;
        for transition in input.transitions {
            if !known_states.contains(&transition.source) {
                builder.error(
                    "automaton.dangling_transition_source",
                    format!("transition source '{}' is not a declared state", transition.source),
                );
            }
            if !known_states.contains(&transition.target) {
                builder.error(
                    "automaton.dangling_transition_target",
                    format!("transition target '{}' is not a declared state", transition.target),
                );
            }
            if let Some(symbol) = &transition.symbol {
                if !known_symbols.contains(symbol) {
                    builder.error(
                        "automaton.unknown_transition_symbol",
                        format!("transition symbol '{symbol}' is not in the declared alphabet"),
                    );
                } else {
                    used_symbols.insert(symbol);
                }
            }
            if transition.kind == TransitionKind::Epsilon {
                epsilon_count += 1;
            }
            if transition.kind == TransitionKind::Epsilon && input.kind == AutomatonKind::Dfa {
                builder.error(
                    "automaton.epsilon_in_dfa",
                    format!("DFA transition {} -> {} is an epsilon transition", transition.source, transition.target),
                );
            }
            if transition.kind == TransitionKind::Epsilon && input.kind == AutomatonKind::Nfa {
                builder.error(
                    "automaton.epsilon_in_nfa",
                    format!(
                        "non-epsilon NFA transition {} -> {} is tagged epsilon; use kind ENFA for automata with epsilon moves",
                        transition.source, transition.target
                    ),
                );
            }
        }

        // I5: an alphabet symbol no transition ever uses is dead weight, not a defect.
        for symbol in input.alphabet {
            if !symbol.is_empty() && !used_symbols.contains(symbol) {
                builder.warning("automaton.unused_alphabet_symbol", format!("alphabet symbol '{symbol}' is used by no transition"));
            }
        }

        if input.kind == AutomatonKind::Enfa {
            builder.info("automaton.epsilon_transition_count", format!("automaton declares {epsilon_count} epsilon transition(s)"));
        }

        // I4: DFA determinism -- no (state, symbol) pair may appear more than once.
        if input.kind == AutomatonKind::Dfa {
            let mut seen_pairs = HashSet::new();
            for transition in input.transitions {
                if let Some(symbol) = &transition.symbol {
                    if !seen_pairs.insert((transition.source.clone(), symbol.clone())) {
                        builder.error(
                            "automaton.nondeterministic_transition",
                            format!("state '{}' has more than one transition on symbol '{symbol}'", transition.source),
                        );
                    }
                }
            }
        }

        // I5: DFA completeness is a warning, not an error -- missing (state, symbol) pairs are
        // allowed and recognition simply rejects on them (see `crate::dfa::eval`).
        if input.kind == AutomatonKind::Dfa && builder_has_no_blocking_errors(&sub_results, &builder) {
            let mut present_pairs = HashSet::new();
            for transition in input.transitions {
                if let Some(symbol) = &transition.symbol {
                    present_pairs.insert((transition.source.clone(), symbol.clone()));
                }
            }
            let mut missing = 0usize;
            for state in input.states {
                for symbol in input.alphabet {
                    if !present_pairs.contains(&(state.id.clone(), symbol.clone())) {
                        missing += 1;
                    }
                }
            }
            if missing > 0 {
                builder.warning(
                    "automaton.incomplete_dfa",
                    format!("DFA is missing {missing} (state, symbol) transition(s); it is not total"),
                );
            }
        }

        // I6: unreachable states are a warning (dead weight, not a defect).
        if builder_has_no_blocking_errors(&sub_results, &builder) {
            let reachable = reachable_from(input);
            for state in input.states {
                if !reachable.contains(&state.id) {
                    builder.info("automaton.unreachable_state", format!("state '{}' is unreachable from the initial state(s)", state.id));
                }
            }
        }

        sub_results.push(builder.build());
        ValidationResult::merge(sub_results)
    }
}

fn builder_has_no_blocking_errors(sub_results: &[ValidationResult], builder: &ValidationResultBuilder) -> bool {
    sub_results.iter().all(ValidationResult::is_valid) && !builder.has_errors()
}

fn reachable_from(input: &RawAutomaton<'_>) -> HashSet<Rc<str>> {
    let mut reachable: HashSet<Rc<str>> = input.initial_states.iter().cloned().collect();
    let mut frontier: Vec<Rc<str>> = reachable.iter().cloned().collect();
    while let Some(id) = frontier.pop() {
        for transition in input.transitions {
            if transition.source == id && reachable.insert(transition.target.clone()) {
                frontier.push(transition.target.clone());
            }
        }
    }
    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawState;

    fn rc(s: &str) -> Rc<str> {
        Rc::from(s)
    }

    #[test]
    fn valid_total_dfa_has_no_findings() {
        let states = vec![RawState::new("q0"), RawState::new("q1")];
        let alphabet = vec![rc("a")];
        let transitions = vec![
            Transition::symbol_transition("q0", "a", "q1"),
            Transition::symbol_transition("q1", "a", "q1"),
        ];
        let initial = vec![rc("q0")];
        let finals = vec![rc("q1")];
        let input = RawAutomaton {
            kind: AutomatonKind::Dfa,
            states: &states,
            alphabet: &alphabet,
            transitions: &transitions,
            initial_states: &initial,
            final_states: &finals,
        };
        let result = AutomatonValidator::validate_build(&input);
        assert!(result.is_valid());
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn incomplete_dfa_is_a_warning_not_an_error() {
        let states = vec![RawState::new("q0"), RawState::new("q1")];
        let alphabet = vec![rc("a")];
        let transitions = vec![Transition::symbol_transition("q0", "a", "q1")];
        let initial = vec![rc("q0")];
        let finals = vec![rc("q1")];
        let input = RawAutomaton {
            kind: AutomatonKind::Dfa,
            states: &states,
            alphabet: &alphabet,
            transitions: &transitions,
            initial_states: &initial,
            final_states: &finals,
        };
        let result = AutomatonValidator::validate_build(&input);
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn dfa_with_two_initial_states_is_rejected() {
        let states = vec![RawState::new("q0"), RawState::new("q1")];
        let input = RawAutomaton {
            kind: AutomatonKind::Dfa,
            states: &states,
            alphabet: &[],
            transitions: &[],
            initial_states: &[rc("q0"), rc("q1")],
            final_states: &[],
        };
        let result = AutomatonValidator::validate_build(&input);
        assert!(!result.is_valid());
    }

    #[test]
    fn nondeterministic_dfa_transition_is_rejected() {
        let states = vec![RawState::new("q0"), RawState::new("q1"), RawState::new("q2")];
        let alphabet = vec![rc("a")];
        let transitions = vec![
            Transition::symbol_transition("q0", "a", "q1"),
            Transition::symbol_transition("q0", "a", "q2"),
        ];
        let input = RawAutomaton {
            kind: AutomatonKind::Dfa,
            states: &states,
            alphabet: &alphabet,
            transitions: &transitions,
            initial_states: &[rc("q0")],
            final_states: &[rc("q1")],
        };
        let result = AutomatonValidator::validate_build(&input);
        assert!(!result.is_valid());
    }

    #[test]
    fn empty_final_set_is_a_warning() {
        let states = vec![RawState::new("q0")];
        let input = RawAutomaton {
            kind: AutomatonKind::Dfa,
            states: &states,
            alphabet: &[],
            transitions: &[],
            initial_states: &[rc("q0")],
            final_states: &[],
        };
        let result = AutomatonValidator::validate_build(&input);
        assert!(result.is_valid());
        assert!(result.warnings().iter().any(|f| f.code == "automaton.no_final_states"));
    }

    #[test]
    fn unused_alphabet_symbol_is_a_warning() {
        let states = vec![RawState::new("q0"), RawState::new("q1")];
        let alphabet = vec![rc("a"), rc("b")];
        let transitions = vec![Transition::symbol_transition("q0", "a", "q1")];
        let input = RawAutomaton {
            kind: AutomatonKind::Dfa,
            states: &states,
            alphabet: &alphabet,
            transitions: &transitions,
            initial_states: &[rc("q0")],
            final_states: &[rc("q1")],
        };
        let result = AutomatonValidator::validate_build(&input);
        assert!(result.is_valid());
        assert!(result.warnings().iter().any(|f| f.code == "automaton.unused_alphabet_symbol"));
    }

    #[test]
    fn enfa_reports_epsilon_transition_count() {
        let states = vec![RawState::new("q0"), RawState::new("q1")];
        let transitions = vec![Transition::epsilon_transition("q0", "q1")];
        let input = RawAutomaton {
            kind: AutomatonKind::Enfa,
            states: &states,
            alphabet: &[],
            transitions: &transitions,
            initial_states: &[rc("q0")],
            final_states: &[rc("q1")],
        };
        let result = AutomatonValidator::validate_build(&input);
        assert!(result.is_valid());
        assert!(result.infos().iter().any(|f| f.code == "automaton.epsilon_transition_count"));
    }

    #[test]
    fn too_many_states_is_rejected() {
        let states: Vec<RawState> = (0..MAX_STATES + 1).map(|i| RawState::new(format!("q{i}"))).collect();
        let input = RawAutomaton {
            kind: AutomatonKind::Dfa,
            states: &states,
            alphabet: &[],
            transitions: &[],
            initial_states: &[rc("q0")],
            final_states: &[],
        };
        let result = AutomatonValidator::validate_build(&input);
        assert!(!result.is_valid());
        assert!(result.errors().iter().any(|f| f.code == "automaton.too_many_states"));
    }

    #[test]
    fn unreachable_state_is_an_info_finding() {
        let states = vec![RawState::new("q0"), RawState::new("q1"), RawState::new("isolated")];
        let alphabet = vec![rc("a")];
        let transitions = vec![Transition::symbol_transition("q0", "a", "q1")];
        let input = RawAutomaton {
            kind: AutomatonKind::Nfa,
            states: &states,
            alphabet: &alphabet,
            transitions: &transitions,
            initial_states: &[rc("q0")],
            final_states: &[rc("q1")],
        };
        let result = AutomatonValidator::validate_build(&input);
        assert!(result.is_valid());
        assert_eq!(result.infos().len(), 1);
    }
}
