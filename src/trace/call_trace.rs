use std::slice::Iter;

use crate::trace::Frame;

/// Ordered snapshot of the call stack, root first.
///
/// A trace is captured once when a condition is raised and never changes
/// afterwards, except for the single trim applied before the condition is
/// finalized. Trimming always yields a prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallTrace {
  frames: Vec<Frame>,
}

impl CallTrace {
  /// Creates an empty trace.
  #[inline]
  pub const fn empty() -> Self {
    Self { frames: Vec::new() }
  }

  #[inline]
  pub(crate) fn from_frames(frames: Vec<Frame>) -> Self {
    Self { frames }
  }

  /// Returns the number of frames in the trace.
  #[inline]
  pub fn len(&self) -> usize {
    self.frames.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.frames.is_empty()
  }

  #[inline]
  pub fn frames(&self) -> &[Frame] {
    &self.frames
  }

  #[inline]
  pub fn get(&self, index: usize) -> Option<&Frame> {
    self.frames.get(index)
  }

  /// Returns the most recent frame.
  #[inline]
  pub fn last(&self) -> Option<&Frame> {
    self.frames.last()
  }

  #[inline]
  pub fn iter(&self) -> Iter<'_, Frame> {
    self.frames.iter()
  }

  /// Keeps the frames `[0, depth)` and drops the rest.
  ///
  /// A `depth` past the end leaves the trace unchanged.
  #[inline]
  pub fn truncate(mut self, depth: usize) -> Self {
    self.frames.truncate(depth);
    self
  }

  /// Returns the indices of the chain of callers leading to `index`, root
  /// first and including `index` itself.
  pub fn ancestry(&self, index: usize) -> Vec<usize> {
    let mut chain: Vec<usize> = Vec::new();
    let mut cursor: Option<usize> = self.frames.get(index).map(Frame::index);

    while let Some(current) = cursor {
      chain.push(current);
      cursor = self.frames.get(current).and_then(Frame::parent);
    }

    chain.reverse();
    chain
  }

  /// Returns the indices of the frames called directly by `parent`.
  ///
  /// `None` selects the root frames.
  pub fn children(&self, parent: Option<usize>) -> Vec<usize> {
    self
      .frames
      .iter()
      .filter(|frame| frame.parent() == parent)
      .map(Frame::index)
      .collect()
  }
}

impl<'a> IntoIterator for &'a CallTrace {
  type Item = &'a Frame;
  type IntoIter = Iter<'a, Frame>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.frames.iter()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
