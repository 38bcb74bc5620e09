use hashbrown::HashMap;
use std::borrow::Cow;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::iter;
use std::rc::Rc;

use crate::cnd::CndFormat;
use crate::cnd::CndKind;
use crate::cnd::DefaultFormat;
use crate::cnd::Message;
use crate::core::Value;
use crate::trace::BacktraceFormatter;
use crate::trace::CallTrace;
use crate::trace::DisplayMode;

/// Rendering preference attached to conditions handed out by the last-error
/// accessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct View {
  pub mode: DisplayMode,
  pub formatter: BacktraceFormatter,
}

/// A raised (or about to be raised) condition.
///
/// Conditions are built by a [`ConditionBuilder`] and are immutable once
/// finalized. The class list is ordered from most to least specific and
/// always ends with the base class of the condition's [`CndKind`].
///
/// Cloning a condition is cheap: the trace and the parent chain are shared.
///
/// [`ConditionBuilder`]: crate::cnd::ConditionBuilder
#[derive(Clone)]
pub struct Condition {
  pub(crate) kind: CndKind,
  pub(crate) classes: Vec<String>,
  pub(crate) message: Message,
  pub(crate) data: HashMap<String, Value>,
  pub(crate) trace: Option<Rc<CallTrace>>,
  pub(crate) parent: Option<Rc<Condition>>,
  pub(crate) view: Option<View>,
}

impl Condition {
  // ---------------------------------------------------------------------------
  // Classes
  // ---------------------------------------------------------------------------

  #[inline]
  pub const fn kind(&self) -> CndKind {
    self.kind
  }

  /// Returns the class list, most specific first.
  #[inline]
  pub fn classes(&self) -> &[String] {
    &self.classes
  }

  /// Returns the most specific class.
  #[inline]
  pub fn class(&self) -> &str {
    self
      .classes
      .first()
      .map_or_else(|| self.kind.base_class(), String::as_str)
  }

  /// Returns `true` if a handler registered for `class` matches this
  /// condition.
  ///
  /// The `condition` class matches every condition.
  #[inline]
  pub fn inherits(&self, class: &str) -> bool {
    class == "condition" || self.classes.iter().any(|item| item == class)
  }

  // ---------------------------------------------------------------------------
  // Message
  // ---------------------------------------------------------------------------

  /// Returns the display message, computing it if the condition was raised
  /// without literal text.
  pub fn message(&self) -> Cow<'_, str> {
    match &self.message {
      Message::Literal(text) => Cow::Borrowed(text.as_str()),
      Message::Lazy {
        format: Some(format),
        ..
      } => Cow::Owned(format.format(self)),
      Message::Lazy { format: None, glyphs } => Cow::Owned(DefaultFormat::new(*glyphs).format(self)),
    }
  }

  /// Returns `true` if the condition carries literal message text.
  #[inline]
  pub const fn has_literal_message(&self) -> bool {
    self.message.is_literal()
  }

  /// Returns the message followed by the messages of every ancestor.
  pub fn full_message(&self) -> String {
    let mut output: String = self.message().into_owned();

    for parent in self.chain().skip(1) {
      output.push_str("\nCaused by ");
      output.push_str(parent.kind.label());
      output.push_str(":\n");
      output.push_str(&parent.message());
    }

    output
  }

  // ---------------------------------------------------------------------------
  // Data
  // ---------------------------------------------------------------------------

  #[inline]
  pub const fn data(&self) -> &HashMap<String, Value> {
    &self.data
  }

  /// Returns the data field `key`.
  #[inline]
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.data.get(key)
  }

  // ---------------------------------------------------------------------------
  // Trace & Chain
  // ---------------------------------------------------------------------------

  #[inline]
  pub fn trace(&self) -> Option<&CallTrace> {
    self.trace.as_deref()
  }

  #[inline]
  pub(crate) fn set_trace(&mut self, trace: CallTrace) {
    self.trace = Some(Rc::new(trace));
  }

  /// Returns the condition this one was raised while handling.
  #[inline]
  pub fn parent(&self) -> Option<&Condition> {
    self.parent.as_deref()
  }

  /// Iterates over this condition and its ancestors, newest first.
  pub fn chain(&self) -> impl Iterator<Item = &Condition> {
    iter::successors(Some(self), |condition| condition.parent())
  }

  /// Returns the trace of the oldest ancestor that carries one.
  pub fn root_trace(&self) -> Option<&CallTrace> {
    self.chain().filter_map(Condition::trace).last()
  }

  // ---------------------------------------------------------------------------
  // Rendering
  // ---------------------------------------------------------------------------

  #[inline]
  pub const fn view(&self) -> Option<View> {
    self.view
  }

  /// Returns a copy of this condition that renders its backtrace in `mode`.
  #[inline]
  pub fn with_view(mut self, mode: DisplayMode, formatter: BacktraceFormatter) -> Self {
    self.view = Some(View { mode, formatter });
    self
  }

  /// Renders the root trace according to the attached view.
  pub fn backtrace(&self) -> Option<String> {
    let view: View = self.view?;
    let trace: &CallTrace = self.root_trace()?;

    view.formatter.render(trace, view.mode, false)
  }
}

impl Debug for Condition {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("Condition")
      .field("kind", &self.kind)
      .field("classes", &self.classes)
      .field("message", &self.message)
      .field("data", &self.data)
      .field("trace", &self.trace.as_ref().map(|trace| trace.len()))
      .field("parent", &self.parent)
      .finish()
  }
}

impl Display for Condition {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "<{}/{}>\n{}", self.kind, self.class(), self.full_message())?;

    if let Some(backtrace) = self.backtrace() {
      write!(f, "\n---\nBacktrace:\n{backtrace}")?;
    }

    Ok(())
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
