//! Phase progress reporting.

use std::time::Duration;

use seoforge_shared::{Phase, PhaseEvent, PhaseStatus, PipelineMode};

/// Receives phase transitions from a running pipeline.
pub trait ProgressReporter: Send + Sync {
    /// Called on every phase transition.
    fn phase(&self, event: &PhaseEvent);
    /// Called once when all phases completed.
    fn done(&self, mode: PipelineMode, elapsed: Duration);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _event: &PhaseEvent) {}
    fn done(&self, _mode: PipelineMode, _elapsed: Duration) {}
}

pub(crate) fn emit(progress: &dyn ProgressReporter, phase: Phase, status: PhaseStatus) {
    progress.phase(&PhaseEvent::new(phase, status));
}
