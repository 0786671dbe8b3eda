//! Engine-wide configuration: limits, caps and the cooperative cancellation/deadline
//! mechanism used by long-running transforms.
//!
//! None of this is mandatory plumbing for a caller who just wants `minimize` or `accepts` to
//! work: every entry point that takes an [`EngineConfig`] also works with `EngineConfig::default()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Tunable limits and toggles threaded through the conversion, optimization and balancing
/// entry points.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Hard cap on the number of states a subset construction (NFA → DFA) may generate
    /// before it gives up with [`crate::error::EngineError::ConversionTooLarge`].
    pub subset_construction_state_cap: usize,
    /// Fraction (0.0-1.0) of partition classes that may go dirty during incremental
    /// minimization before the engine falls back to a full re-minimization.
    pub incremental_dirty_fallback_ratio: f64,
    /// Capacity of the shared optimization/balancing result cache.
    pub cache_capacity: usize,
    /// Optional wall-clock deadline for the current call.
    pub deadline: Option<Deadline>,
    /// Optional cooperative cancellation token for the current call.
    pub cancellation: Option<CancellationToken>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            subset_construction_state_cap: 1 << 20,
            incremental_dirty_fallback_ratio: 0.5,
            cache_capacity: 256,
            deadline: None,
            cancellation: None,
        }
    }
}

/// A wall-clock point in time after which a transform should abort with
/// [`crate::error::EngineError::OperationTimeout`].
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn after(duration: std::time::Duration) -> Self {
        Self(Instant::now() + duration)
    }

    pub fn has_elapsed(&self) -> bool {
        Instant::now() >= self.0
    }
}

/// A cheap, `Clone`-able flag a caller can share across threads to ask a running transform
/// to stop at its next checkpoint.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Checked between refinement iterations / new DFA subset creation. Returns the appropriate
/// [`crate::error::EngineError`] if the deadline elapsed or cancellation was requested.
pub(crate) fn check_checkpoint(
    config: &EngineConfig,
    phase: &str,
) -> Result<(), crate::error::EngineError> {
    if let Some(deadline) = &config.deadline {
        if deadline.has_elapsed() {
            return Err(crate::error::EngineError::OperationTimeout {
                phase: phase.to_string(),
            });
        }
    }
    if let Some(token) = &config.cancellation {
        if token.is_cancelled() {
            return Err(crate::error::EngineError::OperationCancelled {
                phase: phase.to_string(),
            });
        }
    }
    Ok(())
}
