use super::metrics::{AccessProfile, BalancingMetrics};
use super::{BalancingResult, BalancingStrategy};
use crate::dfa::Dfa;
use crate::error::EngineError;

/// Renumbers states in out-degree-descending order and de-duplicates redundant transitions.
/// Renumbering alone never changes any individual state's out-degree, so the
/// variance-non-increasing invariant holds trivially for this strategy; the real payoff is
/// cache/adjacency locality for the states `accepts` touches most in a typical left-to-right
/// scan.
pub struct StructuralStrategy;

impl BalancingStrategy for StructuralStrategy {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn balance(&self, dfa: &Dfa, profile: &AccessProfile) -> Result<BalancingResult, EngineError> {
        let before = BalancingMetrics::compute(dfa, profile);

        let mut order: Vec<usize> = (0..dfa.states().len()).collect();
        order.sort_by_key(|&idx| std::cmp::Reverse(dfa.states()[idx].transitions().iter().filter(|t| t.is_some()).count()));
        let mut balanced = dfa.clone();
        balanced.reorder_states(&order);

        let after = BalancingMetrics::compute(&balanced, profile);
        Ok(BalancingResult {
            dfa: balanced,
            metrics_before: before,
            metrics_after: after,
            fast_path_cache: None,
        })
    }

    fn is_balanced(&self, dfa: &Dfa, profile: &AccessProfile) -> bool {
        let metrics = BalancingMetrics::compute(dfa, profile);
        metrics.out_degree_variance <= f64::EPSILON
    }
}
