//! Removal of signaling-machinery frames from rethrown traces.
//!
//! A condition raised while handling another one is captured from inside the
//! handler, so its trace ends in frames belonging to dispatch. Those frames
//! are noise: the interesting context is where the original condition came
//! from. Three frame shapes are recognized; anything else is kept whole.

use crate::cnd::Condition;
use crate::trace::CallTrace;
use crate::trace::Frame;
use crate::trace::FrameKind;
use crate::trace::HandlerKind;

/// Frame kinds directly below a calling handler's own frame.
const CALLING_SHAPE: [FrameKind; 3] = [
  FrameKind::DispatchEntry,
  FrameKind::SignalDelivery,
  FrameKind::HandlerInvocation,
];

/// Trims `trace` for a condition raised with the given `parent`.
///
/// Traces of fresh conditions (no parent) are returned unchanged.
pub fn trim(trace: CallTrace, parent: Option<&Condition>) -> CallTrace {
  if parent.is_none() {
    return trace;
  }

  let depth: usize = context_depth(trace.frames());

  tracing::trace!(
    target: "klaxon",
    frames = trace.len(),
    depth,
    "trim trace",
  );

  trace.truncate(depth)
}

/// Returns the number of leading frames that describe the context of a
/// rethrow.
///
/// The result never exceeds `frames.len()`.
pub fn context_depth(frames: &[Frame]) -> usize {
  let count: usize = frames.len();

  if count <= 3 {
    return count;
  }

  let shape: bool = frames[count - 4..count - 1]
    .iter()
    .map(Frame::kind)
    .eq(CALLING_SHAPE);

  if shape {
    return count - 4;
  }

  let Some(invocation) = frames
    .iter()
    .rposition(|frame| frame.kind() == FrameKind::ExitingInvocation)
  else {
    return count;
  };

  frames[..invocation]
    .iter()
    .rposition(|frame| frame.kind() == FrameKind::Establish(HandlerKind::Exiting))
    .unwrap_or(count)
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
