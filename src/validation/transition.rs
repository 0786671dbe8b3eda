//! Per-transition validation (I2/I3's shape rules: symbol present iff `Symbol` kind, endpoints
//! named). Membership of `source`/`target` in the declared state set is a cross-entity check
//! and belongs to `automaton::AutomatonValidator`.

use super::{ValidationResult, ValidationResultBuilder};
use crate::model::{is_valid_identifier, Transition, TransitionKind};

pub struct TransitionValidator;

impl TransitionValidator {
    pub fn validate(transition: &Transition) -> ValidationResult {
        let mut builder = ValidationResultBuilder::new();

        if !is_valid_identifier(&transition.source) {
            builder.error(
                "transition.invalid_source",
                format!("transition source '{}' is not a valid identifier", transition.source),
            );
        }
        if !is_valid_identifier(&transition.target) {
            builder.error(
                "transition.invalid_target",
                format!("transition target '{}' is not a valid identifier", transition.target),
            );
        }

        match (&transition.kind, &transition.symbol) {
            (TransitionKind::Symbol, None) => {
                builder.error(
                    "transition.missing_symbol",
                    format!(
                        "symbol transition {} -> {} has no symbol",
                        transition.source, transition.target
                    ),
                );
            }
            (TransitionKind::Epsilon, Some(symbol)) => {
                builder.error(
                    "transition.epsilon_with_symbol",
                    format!(
                        "epsilon transition {} -> {} carries symbol '{symbol}'",
                        transition.source, transition.target
                    ),
                );
            }
            (TransitionKind::Symbol, Some(symbol)) if symbol.is_empty() => {
                builder.error(
                    "transition.empty_symbol",
                    format!("transition {} -> {} has an empty symbol", transition.source, transition.target),
                );
            }
            _ => {}
        }

        if transition.condition.is_some() && !matches!(transition.kind, TransitionKind::Conditional) {
            builder.warning(
                "transition.condition_on_non_conditional",
                format!(
                    "transition {} -> {} carries a condition but is not marked conditional",
                    transition.source, transition.target
                ),
            );
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_symbol_transition() {
        let t = Transition::symbol_transition("q0", "a", "q1");
        assert!(TransitionValidator::validate(&t).is_valid());
    }

    #[test]
    fn accepts_well_formed_epsilon_transition() {
        let t = Transition::epsilon_transition("q0", "q1");
        assert!(TransitionValidator::validate(&t).is_valid());
    }

    #[test]
    fn rejects_symbol_transition_without_symbol() {
        let mut t = Transition::symbol_transition("q0", "a", "q1");
        t.symbol = None;
        assert!(!TransitionValidator::validate(&t).is_valid());
    }

    #[test]
    fn rejects_epsilon_transition_with_symbol() {
        let mut t = Transition::epsilon_transition("q0", "q1");
        t.symbol = Some("a".into());
        assert!(!TransitionValidator::validate(&t).is_valid());
    }

    #[test]
    fn rejects_invalid_endpoint_identifiers() {
        let t = Transition::symbol_transition("0q", "a", "q1");
        assert!(!TransitionValidator::validate(&t).is_valid());
    }
}
