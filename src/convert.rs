//! Conversion engine: εNFA → NFA, NFA → DFA, DFA → NFA.
//!
//! Each conversion here is a thin, config-aware wrapper over the core algorithm that already
//! lives on `Dfa`/`Nfa` (`Nfa::remove_epsilon_moves`, `Nfa::to_dfa_with_config`,
//! `Dfa::to_nfa`); this module is the place callers reach for when they want the
//! `EngineConfig`-checkpointed, logged, stats-emitting variant rather than calling the method
//! directly.

use crate::config::EngineConfig;
use crate::dfa::Dfa;
use crate::error::EngineError;
use crate::nfa::Nfa;
use log::debug;

/// Eliminates ε-transitions from an εNFA, producing a plain NFA with the same language.
pub fn remove_epsilon_moves(enfa: &Nfa) -> Nfa {
    let mut nfa = enfa.clone();
    let before = nfa.states().len();
    nfa.remove_epsilon_moves();
    debug!("eliminated epsilon moves: {} -> {} states", before, nfa.states().len());
    nfa
}

/// Converts an NFA/εNFA to an equivalent DFA via subset construction, respecting
/// `config.subset_construction_state_cap`.
pub fn convert_to_dfa(nfa: &Nfa, config: &EngineConfig) -> Result<Dfa, EngineError> {
    let dfa = nfa.to_dfa_with_config(config)?;
    debug!(
        "subset construction: {} NFA states -> {} DFA states, {} alphabet symbols",
        nfa.states().len(),
        dfa.states().len(),
        dfa.alphabet().len()
    );
    Ok(dfa)
}

/// Embeds a DFA into the NFA representation (every transition becomes a singleton set).
pub fn convert_to_nfa(dfa: Dfa) -> Nfa {
    let before = dfa.states().len();
    let nfa = dfa.to_nfa();
    debug!("embedded DFA with {before} states into NFA representation");
    nfa
}
