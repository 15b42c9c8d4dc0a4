//! Progress notification port
//!
//! Defines the interface for reporting progress while a research run
//! alternates between the planning model and tools.

use deepcast_domain::{LoopPhase, ToolCall};

/// Callback for progress updates during a run
///
/// Implementations live in the presentation layer. Every method has a no-op
/// default so implementors only override what they display.
pub trait LoopProgressNotifier: Send + Sync {
    /// Called on entering Planning or ExecutingTools.
    fn on_phase_change(&self, _phase: LoopPhase) {}

    /// Called before each planning call (1-based iteration).
    fn on_planning_start(&self, _iteration: usize, _max_iterations: usize) {}

    /// Called for each text chunk streamed from a model.
    fn on_model_chunk(&self, _chunk: &str) {}

    /// Called when a planning response has been received.
    fn on_planning_complete(&self, _iteration: usize, _tool_calls: usize) {}

    fn on_tool_start(&self, _call: &ToolCall) {}

    fn on_tool_complete(&self, _call: &ToolCall, _success: bool, _duration_ms: u64) {}

    fn on_synthesis_start(&self) {}

    /// Called once when the run reaches a terminal phase.
    fn on_finished(&self, _phase: LoopPhase) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoLoopProgress;

impl LoopProgressNotifier for NoLoopProgress {}
