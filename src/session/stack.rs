use std::borrow::Cow;
use std::cell::Cell;
use std::cell::RefCell;

use crate::session::Session;
use crate::trace::CallTrace;
use crate::trace::Env;
use crate::trace::Frame;
use crate::trace::FrameKind;

// -----------------------------------------------------------------------------
// Call Stack
// -----------------------------------------------------------------------------

/// The live call stack of a session.
#[derive(Debug, Default)]
pub(crate) struct CallStack {
  frames: RefCell<Vec<Frame>>,
}

impl CallStack {
  #[inline]
  pub(crate) const fn new() -> Self {
    Self {
      frames: RefCell::new(Vec::new()),
    }
  }

  /// Pushes a frame that is popped when the returned guard drops.
  pub(crate) fn push<S>(&self, site: S, kind: FrameKind, parent: Option<usize>) -> FrameGuard<'_>
  where
    S: Into<Cow<'static, str>>,
  {
    let mut frames: std::cell::RefMut<'_, Vec<Frame>> = self.frames.borrow_mut();
    let index: usize = frames.len();

    frames.push(Frame::new(site, kind, index, parent));

    FrameGuard { stack: self, index }
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.frames.borrow().len()
  }

  /// Returns the index of the most recent frame.
  #[inline]
  pub(crate) fn top(&self) -> Option<usize> {
    self.len().checked_sub(1)
  }

  #[inline]
  pub(crate) fn top_env(&self) -> Option<Env> {
    self.frames.borrow().last().map(Frame::env)
  }

  /// Returns the index of the live frame owning `env`.
  #[inline]
  pub(crate) fn find(&self, env: Env) -> Option<usize> {
    self
      .frames
      .borrow()
      .iter()
      .rposition(|frame| frame.env() == env)
  }

  #[inline]
  pub(crate) fn snapshot(&self) -> Vec<Frame> {
    self.frames.borrow().clone()
  }
}

/// Pops a frame (and anything pushed above it) on drop.
#[derive(Debug)]
pub(crate) struct FrameGuard<'a> {
  stack: &'a CallStack,
  index: usize,
}

impl FrameGuard<'_> {
  #[inline]
  pub(crate) const fn index(&self) -> usize {
    self.index
  }
}

impl Drop for FrameGuard<'_> {
  fn drop(&mut self) {
    self.stack.frames.borrow_mut().truncate(self.index);
  }
}

// -----------------------------------------------------------------------------
// Capture
// -----------------------------------------------------------------------------

/// Clears the capture flag on every exit path.
struct CaptureGuard<'a> {
  flag: &'a Cell<bool>,
}

impl Drop for CaptureGuard<'_> {
  fn drop(&mut self) {
    self.flag.set(false);
  }
}

impl Session {
  /// Snapshots the current call stack, root first.
  ///
  /// A capture requested while another one is in progress yields an empty
  /// trace.
  pub fn capture_trace(&self) -> CallTrace {
    if self.capturing.replace(true) {
      tracing::trace!(target: "klaxon", reason = "re-entrant", "capture skipped");
      return CallTrace::empty();
    }

    let _guard: CaptureGuard<'_> = CaptureGuard {
      flag: &self.capturing,
    };

    let trace: CallTrace = CallTrace::from_frames(self.stack.snapshot());

    tracing::trace!(target: "klaxon", frames = trace.len(), "capture");

    trace
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
