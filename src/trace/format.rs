use std::fmt::Write;

use crate::consts;
use crate::trace::CallTrace;
use crate::trace::DisplayMode;
use crate::trace::Frame;
use crate::trace::Glyphs;

/// Renders a [`CallTrace`] at a given level of simplification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BacktraceFormatter {
  glyphs: Glyphs,
  branch_frames: usize,
}

impl BacktraceFormatter {
  #[inline]
  pub const fn new(glyphs: Glyphs, branch_frames: usize) -> Self {
    Self {
      glyphs,
      branch_frames,
    }
  }

  #[inline]
  pub const fn glyphs(&self) -> Glyphs {
    self.glyphs
  }

  /// Renders `trace` in the given `mode`.
  ///
  /// Returns [`None`] when there is nothing to show: the trace is empty, the
  /// mode is [`DisplayMode::None`], or the mode is [`DisplayMode::Reminder`]
  /// outside an interactive session.
  pub fn render(&self, trace: &CallTrace, mode: DisplayMode, interactive: bool) -> Option<String> {
    if trace.is_empty() {
      return None;
    }

    match mode {
      DisplayMode::None => None,
      DisplayMode::Reminder if interactive => Some(consts::TRACE_REMINDER.to_owned()),
      DisplayMode::Reminder => None,
      DisplayMode::Branch => Some(self.branch(trace)),
      DisplayMode::Collapse => Some(self.tree(trace, true)),
      DisplayMode::Full => Some(self.tree(trace, false)),
    }
  }

  /// Renders the chain of callers leading to the most recent frame.
  ///
  /// Only the last `branch_frames` frames of the chain are shown.
  pub fn branch(&self, trace: &CallTrace) -> String {
    let Some(last) = trace.last() else {
      return String::new();
    };

    let chain: Vec<usize> = trace.ancestry(last.index());
    let width: usize = index_width(trace.len());
    let skip: usize = chain.len().saturating_sub(self.branch_frames);
    let mut output: String = String::new();

    if skip > 0 {
      let _ignore: std::fmt::Result = write!(output, " {:>width$}", "...");
    }

    for index in chain.into_iter().skip(skip) {
      let Some(frame) = trace.get(index) else {
        continue;
      };

      if !output.is_empty() {
        output.push('\n');
      }

      let _ignore: std::fmt::Result = write!(output, " {:>width$}. {}", index + 1, frame.site());
    }

    output
  }

  /// Renders the trace as a call tree.
  ///
  /// With `collapse` set, subtrees that do not lead to the most recent frame
  /// are reduced to their root and a count of hidden frames.
  pub fn tree(&self, trace: &CallTrace, collapse: bool) -> String {
    let width: usize = index_width(trace.len());
    let branch: Vec<usize> = trace.last().map_or_else(Vec::new, |last| trace.ancestry(last.index()));

    let mut tree: Tree<'_> = Tree {
      trace,
      glyphs: self.glyphs,
      width,
      branch: collapse.then_some(branch),
      output: " ".repeat(width + 2),
    };

    tree.output.push_str(self.glyphs.root);
    tree.children(None, &mut String::new());
    tree.output
  }
}

impl Default for BacktraceFormatter {
  #[inline]
  fn default() -> Self {
    Self::new(Glyphs::UNICODE, consts::DEFAULT_BRANCH_FRAMES)
  }
}

// -----------------------------------------------------------------------------
// Tree Walk
// -----------------------------------------------------------------------------

struct Tree<'a> {
  trace: &'a CallTrace,
  glyphs: Glyphs,
  width: usize,
  branch: Option<Vec<usize>>,
  output: String,
}

impl Tree<'_> {
  fn children(&mut self, parent: Option<usize>, prefix: &mut String) {
    let children: Vec<usize> = self.trace.children(parent);
    let count: usize = children.len();

    for (position, index) in children.into_iter().enumerate() {
      let Some(frame) = self.trace.get(index) else {
        continue;
      };

      let last: bool = position + 1 == count;
      self.node(frame, prefix, last);

      let hidden: bool = self
        .branch
        .as_ref()
        .is_some_and(|branch| !branch.contains(&index));

      if hidden {
        let more: usize = self.descendants(index);

        if more > 0 {
          let _ignore: std::fmt::Result = write!(self.output, " [{more} more]");
        }

        continue;
      }

      let length: usize = prefix.len();
      prefix.push_str(if last { self.glyphs.space } else { self.glyphs.pipe });
      self.children(Some(index), prefix);
      prefix.truncate(length);
    }
  }

  fn node(&mut self, frame: &Frame, prefix: &str, last: bool) {
    let width: usize = self.width;
    let connector: &str = if last { self.glyphs.elbow } else { self.glyphs.tee };

    let _ignore: std::fmt::Result = write!(
      self.output,
      "\n{:>width$}. {prefix}{connector}{}",
      frame.index() + 1,
      frame.site(),
    );
  }

  fn descendants(&self, index: usize) -> usize {
    self
      .trace
      .children(Some(index))
      .into_iter()
      .map(|child| 1 + self.descendants(child))
      .sum()
  }
}

/// Width of the frame index column for a trace of `count` frames.
fn index_width(count: usize) -> usize {
  count.to_string().len().max(consts::MIN_INDEX_WIDTH)
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
