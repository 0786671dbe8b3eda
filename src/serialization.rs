//! Canonical JSON exchange format for DFAs and NFAs/εNFAs.
//!
//! `to_json` emits sorted arrays and sorted transition keys for byte-stable output; `from_json`
//! round-trips through the same `build_dfa`/`build_nfa`/`build_enfa` constructors the
//! programmatic API uses, so I1-I6 always re-run on load. Per-state kind tags and metadata are
//! not part of the wire format -- they're re-derived from the initial/final sets on load.

use crate::dfa::Dfa;
use crate::error::EngineError;
use crate::model::{AutomatonKind, RawState, Transition};
use crate::nfa::Nfa;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

/// One transition target set, keyed by `"<state>,<symbol>"` (symbol `""` denotes ε). A `Dfa`
/// serializes a singleton target; a `Nfa`/εNFA serializes the full set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum TargetSet {
    Single(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerializedAutomaton {
    kind: AutomatonKind,
    states: Vec<String>,
    alphabet: Vec<String>,
    /// Sorted `"state,symbol"` keys (symbol `""` for ε) for byte-stable output.
    transitions: BTreeMap<String, TargetSet>,
    /// A `Dfa` always serializes a singleton; a `Nfa`/εNFA may carry several.
    initial_states: Vec<String>,
    final_states: Vec<String>,
}

fn transition_key(state: &str, symbol: Option<&str>) -> String {
    format!("{state},{}", symbol.unwrap_or(""))
}

/// Serializes a DFA to the canonical JSON exchange format.
pub fn dfa_to_json(dfa: &Dfa) -> Result<String, EngineError> {
    let mut states: Vec<String> = dfa.states().iter().map(|s| s.name().to_string()).collect();
    states.sort();
    let mut alphabet: Vec<String> = dfa.alphabet().iter().map(|s| s.to_string()).collect();
    alphabet.sort();
    let mut final_states: Vec<String> = dfa.states().iter().filter(|s| s.is_accepting()).map(|s| s.name().to_string()).collect();
    final_states.sort();

    let mut transitions = BTreeMap::new();
    for state in dfa.states() {
        for (symbol, target) in dfa.alphabet().iter().zip(state.transitions()) {
            if let Some(target_idx) = target {
                transitions.insert(transition_key(state.name(), Some(symbol)), TargetSet::Single(dfa.states()[*target_idx].name().to_string()));
            }
        }
    }

    let doc = SerializedAutomaton {
        kind: AutomatonKind::Dfa,
        states,
        alphabet,
        transitions,
        initial_states: vec![dfa.initial_state().name().to_string()],
        final_states,
    };
    serde_json::to_string(&doc).map_err(|e| EngineError::InvalidAutomaton {
        reason: format!("failed to serialize DFA: {e}"),
        location: Some("dfa_to_json".to_string()),
    })
}

/// Deserializes a DFA from the canonical JSON exchange format, re-running I1-I6 via `build_dfa`.
pub fn dfa_from_json(json: &str) -> Result<(Dfa, crate::validation::ValidationResult), EngineError> {
    let doc: SerializedAutomaton = parse_doc(json)?;
    let (states, alphabet, transitions, finals) = to_builder_input(&doc);
    let initial = doc.initial_states.first().map(String::as_str).unwrap_or("");
    crate::dfa::build_dfa(&states, &alphabet, &transitions, initial, &finals)
}

/// Serializes a NFA/εNFA to the canonical JSON exchange format.
pub fn nfa_to_json(nfa: &Nfa) -> Result<String, EngineError> {
    let mut states: Vec<String> = nfa.states().iter().map(|s| s.name().to_string()).collect();
    states.sort();
    let mut alphabet: Vec<String> = nfa.alphabet().iter().map(|s| s.to_string()).collect();
    alphabet.sort();
    let mut final_states: Vec<String> = nfa.states().iter().filter(|s| s.is_accepting()).map(|s| s.name().to_string()).collect();
    final_states.sort();

    let mut transitions: BTreeMap<String, TargetSet> = BTreeMap::new();
    for state in nfa.states() {
        for (symbol, targets) in nfa.alphabet().iter().zip(state.transitions()) {
            if !targets.is_empty() {
                let mut names: Vec<String> = targets.iter().map(|&idx| nfa.states()[idx].name().to_string()).collect();
                names.sort();
                transitions.insert(transition_key(state.name(), Some(symbol)), TargetSet::Many(names));
            }
        }
        if !state.epsilon_transitions().is_empty() {
            let mut names: Vec<String> = state.epsilon_transitions().iter().map(|&idx| nfa.states()[idx].name().to_string()).collect();
            names.sort();
            transitions.insert(transition_key(state.name(), None), TargetSet::Many(names));
        }
    }

    let doc = SerializedAutomaton {
        kind: nfa.kind(),
        states,
        alphabet,
        transitions,
        initial_states: {
            let mut names: Vec<String> = nfa.initial_states().map(|s| s.name().to_string()).collect();
            names.sort();
            names
        },
        final_states,
    };
    serde_json::to_string(&doc).map_err(|e| EngineError::InvalidAutomaton {
        reason: format!("failed to serialize NFA: {e}"),
        location: Some("nfa_to_json".to_string()),
    })
}

/// Deserializes a NFA/εNFA from the canonical JSON exchange format, re-running I1-I6 via
/// `build_nfa`/`build_enfa` depending on the serialized `kind`.
pub fn nfa_from_json(json: &str) -> Result<(Nfa, crate::validation::ValidationResult), EngineError> {
    let doc: SerializedAutomaton = parse_doc(json)?;
    let (states, alphabet, transitions, finals) = to_builder_input(&doc);
    let initials: Vec<Rc<str>> = doc.initial_states.iter().map(|s| Rc::from(s.as_str())).collect();
    match doc.kind {
        AutomatonKind::Enfa => crate::nfa::build_enfa(&states, &alphabet, &transitions, &initials, &finals),
        _ => crate::nfa::build_nfa(&states, &alphabet, &transitions, &initials, &finals),
    }
}

fn parse_doc(json: &str) -> Result<SerializedAutomaton, EngineError> {
    serde_json::from_str(json).map_err(|e| EngineError::InvalidAutomaton {
        reason: format!("failed to parse automaton JSON: {e}"),
        location: Some("from_json".to_string()),
    })
}

fn to_builder_input(doc: &SerializedAutomaton) -> (Vec<RawState>, Vec<Rc<str>>, Vec<Transition>, Vec<Rc<str>>) {
    let states = doc.states.iter().map(|s| RawState::new(s.as_str())).collect();
    let alphabet = doc.alphabet.iter().map(|s| Rc::from(s.as_str())).collect();
    let mut transitions = Vec::new();
    for (key, targets) in &doc.transitions {
        let Some((source, symbol)) = key.split_once(',') else { continue };
        let target_names: Vec<&str> = match targets {
            TargetSet::Single(s) => vec![s.as_str()],
            TargetSet::Many(v) => v.iter().map(|s| s.as_str()).collect(),
        };
        for target in target_names {
            transitions.push(if symbol.is_empty() {
                Transition::epsilon_transition(source, target)
            } else {
                Transition::symbol_transition(source, symbol, target)
            });
        }
    }
    let finals = doc.final_states.iter().map(|s| Rc::from(s.as_str())).collect();
    (states, alphabet, transitions, finals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transition as Tr;

    #[test]
    fn dfa_round_trips_through_json() {
        let states = vec![RawState::new("q0"), RawState::new("q1")];
        let alphabet = vec![Rc::from("a"), Rc::from("b")];
        let transitions = vec![Tr::symbol_transition("q0", "a", "q1"), Tr::symbol_transition("q1", "b", "q0")];
        let (dfa, _) = crate::dfa::build_dfa(&states, &alphabet, &transitions, "q0", &[Rc::from("q1")]).unwrap();

        let json = dfa_to_json(&dfa).unwrap();
        let (reloaded, validation) = dfa_from_json(&json).unwrap();
        assert!(validation.is_valid());
        assert!(dfa.equivalent_to(&reloaded));
    }

    #[test]
    fn json_output_is_byte_stable_across_runs() {
        let states = vec![RawState::new("b"), RawState::new("a")];
        let (dfa, _) = crate::dfa::build_dfa(&states, &[], &[], "a", &[]).unwrap();
        assert_eq!(dfa_to_json(&dfa).unwrap(), dfa_to_json(&dfa).unwrap());
    }

    #[test]
    fn enfa_round_trips_and_preserves_epsilon_kind() {
        let states = vec![RawState::new("s"), RawState::new("t")];
        let transitions = vec![Tr::epsilon_transition("s", "t")];
        let (enfa, _) = crate::nfa::build_enfa(&states, &[], &transitions, &[Rc::from("s")], &[Rc::from("t")]).unwrap();
        let json = nfa_to_json(&enfa).unwrap();
        let (reloaded, _) = nfa_from_json(&json).unwrap();
        assert_eq!(reloaded.kind(), AutomatonKind::Enfa);
        assert!(enfa.equivalent_to(&reloaded));
    }

    #[test]
    fn nfa_with_multiple_initial_states_round_trips() {
        let states = vec![RawState::new("s1"), RawState::new("s2"), RawState::new("f")];
        let alphabet = vec![Rc::from("x")];
        let transitions = vec![Tr::symbol_transition("s1", "x", "f"), Tr::symbol_transition("s2", "x", "f")];
        let (nfa, _) = crate::nfa::build_nfa(&states, &alphabet, &transitions, &[Rc::from("s1"), Rc::from("s2")], &[Rc::from("f")]).unwrap();
        let json = nfa_to_json(&nfa).unwrap();
        let (reloaded, _) = nfa_from_json(&json).unwrap();
        assert_eq!(reloaded.initial_state_indices().len(), 2);
        assert!(nfa.equivalent_to(&reloaded));
    }
}
