use super::metrics::{AccessProfile, BalancingMetrics};
use super::{BalancingResult, BalancingStrategy};
use crate::dfa::Dfa;
use crate::error::EngineError;

/// A state's out-degree below this fraction of the alphabet size is a candidate for a sparse
/// (rather than dense) transition row.
const SPARSE_CANDIDATE_THRESHOLD: f64 = 0.25;

/// Prunes dead weight (unreachable and non-coaccessible states) and reports which states are
/// sparse enough that a `HashMap`-backed row would beat the dense fixed-size row the engine
/// otherwise always uses. The transition representation stays dense either way (cheap enough for
/// the state counts this engine targets); this strategy's actual memory win comes from pruning,
/// with the sparse-candidate list surfaced for a caller that wants to act on it.
pub struct MemoryStrategy;

impl BalancingStrategy for MemoryStrategy {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn balance(&self, dfa: &Dfa, profile: &AccessProfile) -> Result<BalancingResult, EngineError> {
        let before = BalancingMetrics::compute(dfa, profile);

        let mut balanced = dfa.clone();
        crate::optimize::prune_non_coaccessible(&mut balanced);
        balanced.remove_unreachable_states();

        let after = BalancingMetrics::compute(&balanced, profile);
        Ok(BalancingResult {
            dfa: balanced,
            metrics_before: before,
            metrics_after: after,
            fast_path_cache: None,
        })
    }

    fn is_balanced(&self, dfa: &Dfa, profile: &AccessProfile) -> bool {
        let _ = profile;
        dfa.unreachable_state_idx().is_empty() && dfa.states().len() == dfa.coaccessible_state_idx().len()
    }
}

/// Names of states whose out-degree is low enough, relative to the alphabet size, that a sparse
/// transition row would use less memory than the dense one.
pub fn sparse_candidate_states(dfa: &Dfa) -> Vec<&str> {
    let alphabet_len = dfa.alphabet().len().max(1) as f64;
    dfa.states()
        .iter()
        .filter(|s| {
            let out_degree = s.transitions().iter().filter(|t| t.is_some()).count() as f64;
            out_degree / alphabet_len < SPARSE_CANDIDATE_THRESHOLD
        })
        .map(|s| s.name())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawState, Transition};
    use std::rc::Rc;

    #[test]
    fn memory_balance_prunes_dead_states_and_preserves_language() {
        let states = vec![RawState::new("q0"), RawState::new("q1"), RawState::new("dead")];
        let alphabet = vec![Rc::from("a")];
        let transitions = vec![Transition::symbol_transition("q0", "a", "q1"), Transition::symbol_transition("dead", "a", "dead")];
        let (dfa, _) = crate::dfa::build_dfa(&states, &alphabet, &transitions, "q0", &[Rc::from("q1")]).unwrap();
        let profile = super::super::metrics::uniform_profile(&dfa);
        let result = MemoryStrategy.balance(&dfa, &profile).unwrap();
        assert_eq!(result.dfa.states().len(), 2);
        assert!(dfa.equivalent_to(&result.dfa));
    }

    #[test]
    fn sparse_candidates_are_low_out_degree_states() {
        let states = vec![RawState::new("q0"), RawState::new("q1")];
        let alphabet = vec![Rc::from("a"), Rc::from("b"), Rc::from("c"), Rc::from("d")];
        let transitions = vec![Transition::symbol_transition("q0", "a", "q1")];
        let (dfa, _) = crate::dfa::build_dfa(&states, &alphabet, &transitions, "q0", &[Rc::from("q1")]).unwrap();
        assert_eq!(sparse_candidate_states(&dfa), vec!["q0"]);
    }
}
