//! Step-by-step NFA/εNFA evaluation (C3 Recognition Engine).
//!
//! Like [`crate::dfa::DfaEvaluator`], a symbol outside the alphabet is a hard
//! [`EngineError::UnknownSymbol`]. Unlike the DFA evaluator there is no "stuck" state: the set
//! of current states can become empty, which is simply never accepting.

use crate::error::EngineError;
use crate::nfa::{Nfa, NfaState};
use std::collections::{HashMap, HashSet};
use std::iter;

#[derive(Clone, Debug)]
pub struct NfaEvaluator<'a> {
    nfa: &'a Nfa,
    rev_map: HashMap<&'a str, usize>,
    current_states: HashSet<usize>,
}

impl<'a> NfaEvaluator<'a> {
    pub fn is_accepting(&self) -> bool {
        self.current_states().iter().any(|s| s.is_accepting())
    }

    pub fn current_states(&self) -> Vec<&NfaState> {
        self.current_states.iter().map(|&s| &self.nfa.states[s]).collect()
    }

    pub fn current_states_idx(&self) -> &HashSet<usize> {
        &self.current_states
    }

    pub fn step_all(&self) -> Vec<NfaEvaluator<'a>> {
        iter::repeat(self.clone())
            .zip(&self.nfa.alphabet)
            .map(|(mut eval, elem)| {
                eval.step(elem).ok();
                eval
            })
            .collect()
    }

    /// Steps on `elem`. Returns `Err(UnknownSymbol)` if `elem` is not in the alphabet.
    pub fn step(&mut self, elem: &str) -> Result<(), EngineError> {
        let &idx = self.rev_map.get(elem).ok_or_else(|| EngineError::UnknownSymbol {
            symbol: elem.to_string(),
            position: None,
        })?;
        self.current_states = self.current_states.iter().flat_map(|&state| self.nfa.states[state].transitions[idx].clone()).collect();
        self.include_closure();
        Ok(())
    }

    pub fn step_multiple(&mut self, elems: &[&str]) -> Result<(), EngineError> {
        for (position, elem) in elems.iter().enumerate() {
            let &idx = self.rev_map.get(elem).ok_or_else(|| EngineError::UnknownSymbol {
                symbol: elem.to_string(),
                position: Some(position),
            })?;
            self.current_states = self.current_states.iter().flat_map(|&state| self.nfa.states[state].transitions[idx].clone()).collect();
            self.include_closure();
        }
        Ok(())
    }

    fn include_closure(&mut self) {
        let mut updated = true;
        let mut to_push = HashSet::new();
        while updated {
            updated = false;
            for state in self.current_states.iter() {
                for epsilon_state in self.nfa.states[*state].epsilon_transitions.iter() {
                    if !self.current_states.contains(epsilon_state) {
                        updated = true;
                        to_push.insert(*epsilon_state);
                    }
                }
            }
            self.current_states.extend(to_push.drain());
        }
    }
}

impl<'a> From<&'a Nfa> for NfaEvaluator<'a> {
    fn from(value: &'a Nfa) -> Self {
        let map = value.alphabet.iter().enumerate().map(|(idx, c)| (c as &str, idx)).collect();
        let mut evaluator = Self {
            nfa: value,
            rev_map: map,
            current_states: HashSet::new(),
        };
        evaluator.current_states.extend(value.initial_states.iter().copied());
        evaluator.include_closure();
        evaluator
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{RawState, Transition};
    use crate::nfa::build_nfa;
    use std::rc::Rc;

    #[test]
    fn epsilon_closure_is_included_on_construction() {
        let states = vec![RawState::new("a"), RawState::new("b")];
        let transitions = vec![Transition::epsilon_transition("a", "b")];
        let (nfa, _) = crate::nfa::build_enfa(&states, &[], &transitions, &[Rc::from("a")], &[Rc::from("b")]).unwrap();
        let eval = nfa.evaluator();
        assert!(eval.is_accepting());
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let states = vec![RawState::new("a")];
        let (nfa, _) = build_nfa(&states, &[Rc::from("x")], &[], &[Rc::from("a")], &[]).unwrap();
        let mut eval = nfa.evaluator();
        assert!(eval.step("y").is_err());
    }
}
