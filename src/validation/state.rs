//! Per-state validation (I1's identifier rule, metadata shape).

use super::{ValidationResult, ValidationResultBuilder};
use crate::model::{is_valid_identifier, RawState};

/// Validates a single [`RawState`] in isolation. Cross-state checks (duplicate ids,
/// unreachable/dangling names) belong to `automaton::AutomatonValidator`, which sees the
/// whole state set at once.
pub struct StateValidator;

impl StateValidator {
    pub fn validate(state: &RawState) -> ValidationResult {
        let mut builder = ValidationResultBuilder::new();

        if !is_valid_identifier(&state.id) {
            builder.error(
                "state.invalid_identifier",
                format!(
                    "state id '{}' is not a valid identifier (must match ^[A-Za-z_][A-Za-z0-9_]*$, length <= 100)",
                    state.id
                ),
            );
        }

        if let Some(metadata) = &state.metadata {
            if metadata.is_empty() {
                builder.info("state.empty_metadata", format!("state '{}' has an empty metadata map", state.id));
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifier() {
        let state = RawState::new("q0");
        assert!(StateValidator::validate(&state).is_valid());
    }

    #[test]
    fn rejects_identifier_starting_with_digit() {
        let state = RawState::new("0q");
        let result = StateValidator::validate(&state);
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn rejects_empty_identifier() {
        let state = RawState::new("");
        assert!(!StateValidator::validate(&state).is_valid());
    }

    #[test]
    fn rejects_overlong_identifier() {
        let state = RawState::new("q".repeat(101));
        assert!(!StateValidator::validate(&state).is_valid());
    }
}
