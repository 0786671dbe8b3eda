//! Step-by-step DFA evaluation (C3 Recognition Engine).
//!
//! A symbol outside the alphabet is a hard [`EngineError::UnknownSymbol`] -- the caller asked
//! a question the automaton has no opinion on. A missing `(state, symbol)` transition on an
//! otherwise-known symbol is not an error: the evaluator simply falls into a "stuck" state that
//! can never be accepting, mirroring how a non-total DFA rejects in the formal definition.

use crate::dfa::{Dfa, DfaState};
use crate::error::EngineError;
use std::collections::HashMap;
use std::iter;

#[derive(Debug, Clone)]
pub struct DfaEvaluator<'a> {
    dfa: &'a Dfa,
    rev_map: HashMap<&'a str, usize>,
    current_state: Option<usize>,
}

impl<'a> DfaEvaluator<'a> {
    pub fn is_accepting(&self) -> bool {
        self.current_state().map_or(false, DfaState::is_accepting)
    }

    pub fn current_state(&self) -> Option<&DfaState> {
        self.current_state.map(|idx| &self.dfa.states[idx])
    }

    pub fn current_state_idx(&self) -> Option<usize> {
        self.current_state
    }

    pub fn step_all(&self) -> Vec<DfaEvaluator<'a>> {
        iter::repeat(self.clone())
            .zip(self.dfa.alphabet())
            .map(|(mut eval, elem)| {
                eval.step(elem).ok();
                eval
            })
            .collect()
    }

    /// Steps on `elem`. Returns `Err(UnknownSymbol)` if `elem` is not in the alphabet; otherwise
    /// moves to the next state (or to "stuck" if the transition is absent) and returns the new
    /// current state, if any.
    pub fn step(&mut self, elem: &str) -> Result<Option<&DfaState>, EngineError> {
        let &idx = self.rev_map.get(elem).ok_or_else(|| EngineError::UnknownSymbol {
            symbol: elem.to_string(),
            position: None,
        })?;
        self.current_state = self.current_state.and_then(|s| self.dfa.states[s].transitions[idx]);
        Ok(self.current_state())
    }

    pub fn step_multiple(&mut self, elems: &[&str]) -> Result<Option<&DfaState>, EngineError> {
        for (position, elem) in elems.iter().enumerate() {
            let &idx = self.rev_map.get(elem).ok_or_else(|| EngineError::UnknownSymbol {
                symbol: elem.to_string(),
                position: Some(position),
            })?;
            self.current_state = self.current_state.and_then(|s| self.dfa.states[s].transitions[idx]);
        }
        Ok(self.current_state())
    }
}

impl<'a> From<&'a Dfa> for DfaEvaluator<'a> {
    fn from(value: &'a Dfa) -> Self {
        let map = value.alphabet.iter().enumerate().map(|(idx, c)| (c as &str, idx)).collect();
        Self {
            dfa: value,
            rev_map: map,
            current_state: Some(value.initial_state),
        }
    }
}
