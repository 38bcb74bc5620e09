use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::cnd::Condition;
use crate::error::Exception;

/// Result of an evaluation that may be cut short by a [`Signal`].
pub type Outcome<T> = std::result::Result<T, Signal>;

// -----------------------------------------------------------------------------
// Scope Id
// -----------------------------------------------------------------------------

/// Identity of one established handler scope.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ScopeId(u64);

impl ScopeId {
  #[inline]
  pub(crate) const fn new(bits: u64) -> Self {
    Self(bits)
  }
}

// -----------------------------------------------------------------------------
// Unwind
// -----------------------------------------------------------------------------

/// A condition claimed by an exiting handler, travelling back to the scope
/// that established it.
#[derive(Debug)]
pub struct Unwind {
  pub(crate) scope: ScopeId,
  pub(crate) slot: usize,
  pub(crate) condition: Box<Condition>,
}

impl Unwind {
  #[inline]
  pub(crate) fn new(scope: ScopeId, slot: usize, condition: Condition) -> Self {
    Self {
      scope,
      slot,
      condition: Box::new(condition),
    }
  }

  /// Returns the scope the unwind is travelling to.
  #[inline]
  pub const fn scope(&self) -> ScopeId {
    self.scope
  }

  #[inline]
  pub fn condition(&self) -> &Condition {
    &self.condition
  }
}

// -----------------------------------------------------------------------------
// Fallback
// -----------------------------------------------------------------------------

/// Minimal error left behind by a condition that escaped every handler.
///
/// Carries only the final message text. The rich condition is available
/// from [`Session::last_error`].
///
/// [`Session::last_error`]: crate::session::Session::last_error
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fallback {
  message: String,
  printed: bool,
}

impl Fallback {
  #[inline]
  pub(crate) const fn new(message: String, printed: bool) -> Self {
    Self { message, printed }
  }

  #[inline]
  pub fn message(&self) -> &str {
    self.message.as_str()
  }

  /// Returns `true` if the error was already written to the error sink and
  /// the top level must not print it again.
  #[inline]
  pub const fn printed(&self) -> bool {
    self.printed
  }
}

impl Display for Fallback {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(&self.message)
  }
}

// -----------------------------------------------------------------------------
// Signal
// -----------------------------------------------------------------------------

/// Non-local exit from an evaluation.
#[derive(Debug)]
pub enum Signal {
  /// An exiting handler claimed a condition.
  Unwind(Unwind),
  /// An error escaped every handler.
  Abort(Fallback),
  /// An interrupt was not resumed.
  Interrupt(Box<Condition>),
  /// The engine was misused. Never offered to handlers.
  Fatal(Exception),
}

impl Signal {
  /// Returns the fallback error, if this is an escaped error.
  #[inline]
  pub const fn as_abort(&self) -> Option<&Fallback> {
    match self {
      Self::Abort(fallback) => Some(fallback),
      _ => None,
    }
  }

  /// Returns the usage error, if this is one.
  #[inline]
  pub const fn as_fatal(&self) -> Option<&Exception> {
    match self {
      Self::Fatal(exception) => Some(exception),
      _ => None,
    }
  }
}

impl Display for Signal {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::Unwind(unwind) => write!(f, "unwind to scope {:?}", unwind.scope),
      Self::Abort(fallback) => Display::fmt(fallback, f),
      Self::Interrupt(_) => f.write_str("interrupt"),
      Self::Fatal(exception) => Display::fmt(exception, f),
    }
  }
}

impl Error for Signal {}

impl From<Exception> for Signal {
  #[inline]
  fn from(other: Exception) -> Self {
    Self::Fatal(other)
  }
}
