//! The thin `Automaton` dispatch seam: a closed enum over the two internal representations, so
//! every place that needs to treat "a DFA or a NFA/εNFA" uniformly (e.g. the external `accepts`
//! entry point) matches on it exhaustively instead of walking a type hierarchy.

use crate::dfa::Dfa;
use crate::error::EngineError;
use crate::model::AutomatonKind;
use crate::nfa::Nfa;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Automaton {
    Dfa(Dfa),
    Nfa(Nfa),
}

impl Automaton {
    pub fn kind(&self) -> AutomatonKind {
        match self {
            Automaton::Dfa(_) => AutomatonKind::Dfa,
            Automaton::Nfa(nfa) => nfa.kind(),
        }
    }

    pub fn alphabet(&self) -> &[Rc<str>] {
        match self {
            Automaton::Dfa(dfa) => dfa.alphabet(),
            Automaton::Nfa(nfa) => nfa.alphabet(),
        }
    }

    pub fn accepts(&self, word: &[&str]) -> Result<bool, EngineError> {
        match self {
            Automaton::Dfa(dfa) => dfa.accepts(word),
            Automaton::Nfa(nfa) => nfa.accepts(word),
        }
    }

    pub fn state_count(&self) -> usize {
        match self {
            Automaton::Dfa(dfa) => dfa.states().len(),
            Automaton::Nfa(nfa) => nfa.states().len(),
        }
    }

    pub fn as_dfa(&self) -> Option<&Dfa> {
        match self {
            Automaton::Dfa(dfa) => Some(dfa),
            Automaton::Nfa(_) => None,
        }
    }

    pub fn as_nfa(&self) -> Option<&Nfa> {
        match self {
            Automaton::Nfa(nfa) => Some(nfa),
            Automaton::Dfa(_) => None,
        }
    }
}

impl From<Dfa> for Automaton {
    fn from(dfa: Dfa) -> Self {
        Automaton::Dfa(dfa)
    }
}

impl From<Nfa> for Automaton {
    fn from(nfa: Nfa) -> Self {
        Automaton::Nfa(nfa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawState;

    #[test]
    fn dispatches_accepts_to_the_right_representation() {
        let states = vec![RawState::new("q0")];
        let (dfa, _) = crate::dfa::build_dfa(&states, &[], &[], "q0", &[Rc::from("q0")]).unwrap();
        let automaton: Automaton = dfa.into();
        assert!(automaton.accepts(&[]).unwrap());
        assert_eq!(automaton.kind(), AutomatonKind::Dfa);
    }
}
