use super::metrics::{AccessProfile, BalancingMetrics};
use super::{BalancingResult, BalancingStrategy};
use crate::dfa::Dfa;
use crate::error::EngineError;
use std::rc::Rc;

/// Number of frequent prefixes the fast-path side-table memoizes.
const FAST_PATH_TOP_K: usize = 8;

/// Sorts states by access frequency descending, so the hottest state sits at adjacency-list
/// index 0, then precomputes a fast-path side-table for the `top-k` most frequently visited
/// states (the shortest word from the initial state that reaches each one).
pub struct PerformanceStrategy;

impl BalancingStrategy for PerformanceStrategy {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn balance(&self, dfa: &Dfa, profile: &AccessProfile) -> Result<BalancingResult, EngineError> {
        let before = BalancingMetrics::compute(dfa, profile);

        let mut order: Vec<usize> = (0..dfa.states().len()).collect();
        order.sort_by(|&a, &b| {
            let freq_a = profile.get(dfa.states()[a].name()).copied().unwrap_or(1.0);
            let freq_b = profile.get(dfa.states()[b].name()).copied().unwrap_or(1.0);
            freq_b.partial_cmp(&freq_a).unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut balanced = dfa.clone();
        balanced.reorder_states(&order);

        let after = BalancingMetrics::compute(&balanced, profile);
        let cache = fast_path_cache(&balanced, profile);
        Ok(BalancingResult {
            dfa: balanced,
            metrics_before: before,
            metrics_after: after,
            fast_path_cache: Some(cache),
        })
    }

    fn is_balanced(&self, dfa: &Dfa, profile: &AccessProfile) -> bool {
        dfa.states().is_empty() || dfa.states()[0].name() == hottest_state_name(dfa, profile).as_deref().unwrap_or("")
    }
}

fn hottest_state_name(dfa: &Dfa, profile: &AccessProfile) -> Option<String> {
    dfa.states()
        .iter()
        .max_by(|a, b| {
            let fa = profile.get(a.name()).copied().unwrap_or(1.0);
            let fb = profile.get(b.name()).copied().unwrap_or(1.0);
            fa.partial_cmp(&fb).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|s| s.name().to_string())
}

/// Shortest word (by BFS) from the initial state to each of the `FAST_PATH_TOP_K` most
/// frequently accessed states, for use as a precomputed fast-path lookup.
pub fn fast_path_cache(dfa: &Dfa, profile: &AccessProfile) -> std::collections::HashMap<Rc<str>, Vec<Rc<str>>> {
    let mut hottest: Vec<usize> = (0..dfa.states().len()).collect();
    hottest.sort_by(|&a, &b| {
        let fa = profile.get(dfa.states()[a].name()).copied().unwrap_or(1.0);
        let fb = profile.get(dfa.states()[b].name()).copied().unwrap_or(1.0);
        fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal)
    });
    hottest.truncate(FAST_PATH_TOP_K);
    let targets: std::collections::HashSet<usize> = hottest.into_iter().collect();

    let mut result = std::collections::HashMap::new();
    let mut queue = std::collections::VecDeque::new();
    let mut visited = std::collections::HashSet::new();
    queue.push_back((dfa.initial_state_index(), Vec::<Rc<str>>::new()));
    visited.insert(dfa.initial_state_index());

    while let Some((idx, path)) = queue.pop_front() {
        if targets.contains(&idx) {
            result.insert(Rc::from(dfa.states()[idx].name()), path.clone());
        }
        if result.len() == targets.len() {
            break;
        }
        for (symbol, target) in dfa.alphabet().iter().zip(dfa.states()[idx].transitions()) {
            if let Some(next) = target {
                if visited.insert(*next) {
                    let mut next_path = path.clone();
                    next_path.push(symbol.clone());
                    queue.push_back((*next, next_path));
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawState, Transition};

    #[test]
    fn performance_balance_preserves_language() {
        let states = vec![RawState::new("a"), RawState::new("b"), RawState::new("c")];
        let alphabet = vec![Rc::from("x")];
        let transitions = vec![Transition::symbol_transition("a", "x", "b"), Transition::symbol_transition("b", "x", "c")];
        let (dfa, _) = crate::dfa::build_dfa(&states, &alphabet, &transitions, "a", &[Rc::from("c")]).unwrap();
        let mut profile = super::super::metrics::uniform_profile(&dfa);
        profile.insert(Rc::from("c"), 100.0);
        let result = PerformanceStrategy.balance(&dfa, &profile).unwrap();
        assert!(dfa.equivalent_to(&result.dfa));
        assert_eq!(result.dfa.states()[0].name(), "c");
    }

    #[test]
    fn fast_path_cache_finds_shortest_words() {
        let states = vec![RawState::new("a"), RawState::new("b"), RawState::new("c")];
        let alphabet = vec![Rc::from("x")];
        let transitions = vec![Transition::symbol_transition("a", "x", "b"), Transition::symbol_transition("b", "x", "c")];
        let (dfa, _) = crate::dfa::build_dfa(&states, &alphabet, &transitions, "a", &[Rc::from("c")]).unwrap();
        let profile = super::super::metrics::uniform_profile(&dfa);
        let cache = fast_path_cache(&dfa, &profile);
        assert_eq!(cache.get(&Rc::from("c")).unwrap().len(), 2);
    }
}
