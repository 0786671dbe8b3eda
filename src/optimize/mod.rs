//! Optimization engine: Hopcroft minimization, reachability/coaccessibility pruning,
//! transition merging, incremental re-minimization and a shared result cache.
//!
//! Most of the heavy lifting already lives on `Dfa`/`Nfa` themselves (`minimize_with_config`,
//! `coaccessible_state_idx`, `remove_unreachable_states`); this module is the facade the rest
//! of the engine (balancing, the `minimize`/`convert_to_dfa` free functions) calls through, plus
//! the pieces that don't belong on a single automaton type: the cache and incremental-update
//! bookkeeping.

pub mod cache;
pub mod incremental;

pub use cache::{CacheKey, CacheStats, ResultCache};
pub use incremental::{incremental_minimize, TransitionChange};

use crate::config::EngineConfig;
use crate::dfa::Dfa;
use crate::error::EngineError;
use crate::nfa::Nfa;
use log::debug;

/// Completes a (possibly partial) DFA against a fresh sink state so every `(state, symbol)`
/// pair has a transition; a no-op if the DFA is already total. Used as step 1 of Hopcroft
/// minimization and as the precondition for `crate::algebra::complement`.
pub fn completed_with_sink(dfa: &Dfa) -> Dfa {
    if dfa.is_total() {
        return dfa.clone();
    }
    let sink_name: Rc<str> = fresh_sink_name(dfa);
    let alphabet = dfa.alphabet().to_vec();
    let mut states: Vec<crate::model::RawState> = dfa.states().iter().map(|s| crate::model::RawState::new(s.name())).collect();
    states.push(crate::model::RawState::new(sink_name.clone()));

    let mut transitions = Vec::new();
    for state in dfa.states() {
        for (symbol, target) in alphabet.iter().zip(state.transitions()) {
            let target_name = target.map(|idx| dfa.states()[idx].name().to_string()).unwrap_or_else(|| sink_name.to_string());
            transitions.push(crate::model::Transition::symbol_transition(state.name(), symbol.clone(), target_name));
        }
    }
    for symbol in &alphabet {
        transitions.push(crate::model::Transition::symbol_transition(sink_name.clone(), symbol.clone(), sink_name.clone()));
    }

    let finals: Vec<Rc<str>> = dfa.states().iter().filter(|s| s.is_accepting()).map(|s| Rc::from(s.name())).collect();
    let initial = dfa.initial_state().name().to_string();
    crate::dfa::build_dfa(&states, &alphabet, &transitions, &initial, &finals)
        .expect("completing a valid DFA against a sink cannot violate I1-I6")
        .0
}

fn fresh_sink_name(dfa: &Dfa) -> Rc<str> {
    if dfa.states().iter().all(|s| s.name() != "sink") {
        return Rc::from("sink");
    }
    (0..).map(|i| Rc::from(format!("sink_{i}").as_str())).find(|n: &Rc<str>| dfa.states().iter().all(|s| s.name() != n.as_ref())).unwrap()
}

/// Runs the full minimization pipeline: complete against a sink if partial, prune
/// non-coaccessible states, then Hopcroft partition refinement. A partial DFA is completed
/// first because Hopcroft's refinement distinguishes states by their transition targets --
/// two states that both go missing on the same symbol look identical to the refinement unless
/// an explicit sink state is there to tell them apart.
pub fn minimize(dfa: &Dfa, config: &EngineConfig) -> Result<Dfa, EngineError> {
    let mut working = completed_with_sink(dfa);
    prune_non_coaccessible(&mut working);
    working.minimize_with_config(config)?;
    debug!("minimize: {} -> {} states", dfa.states().len(), working.states().len());
    Ok(working)
}

/// Removes states with no path to any accepting state. Language-preserving: no
/// accepted word ever passes through a non-coaccessible state.
pub fn prune_non_coaccessible(dfa: &mut Dfa) {
    let coaccessible = dfa.coaccessible_state_idx();
    let dead: Vec<usize> = (0..dfa.states().len()).filter(|i| !coaccessible.contains(i)).collect();
    if dead.is_empty() || dead.contains(&dfa.initial_state_index()) {
        return;
    }
    dfa.remove_state_set(dead);
}

/// De-duplicates each state's outgoing target list for every alphabet symbol. A NFA's
/// transitions are already set-valued; states can still accumulate duplicate targets through
/// repeated unions, so this collapses them back down.
pub fn merge_duplicate_targets(nfa: &mut Nfa) {
    for state in nfa.states.iter_mut() {
        for targets in state.transitions.iter_mut() {
            let mut seen = std::collections::HashSet::new();
            targets.retain(|t| seen.insert(*t));
        }
        let mut seen = std::collections::HashSet::new();
        state.epsilon_transitions.retain(|t| seen.insert(*t));
    }
}

use std::rc::Rc;
