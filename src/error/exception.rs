use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::error::ExceptionGroup;

/// A usage error with group, message, and backtrace.
///
/// Exceptions are produced when the engine is misused: building a condition
/// with neither message nor class, asking for the last error before one was
/// recorded, or invoking a restart that does not exist. They travel through
/// [`Signal::Fatal`] and are never offered to condition handlers.
///
/// # Display Format
///
/// Exceptions format as: `[klaxon] {group}: {message}`
///
/// [`Signal::Fatal`]: crate::session::Signal::Fatal
pub struct Exception {
  group: ExceptionGroup,
  error: String,
  trace: Backtrace,
}

impl Exception {
  /// Creates a new exception with the given group and message.
  ///
  /// Captures a Rust backtrace of the engine at the call site; availability
  /// depends on the `RUST_BACKTRACE` environment variable.
  ///
  /// # Examples
  ///
  /// ```
  /// use klaxon::error::{Exception, ExceptionGroup};
  ///
  /// let exception = Exception::new(ExceptionGroup::InvalidCondition, "no message");
  ///
  /// assert_eq!(exception.group(), ExceptionGroup::InvalidCondition);
  /// assert_eq!(exception.error(), "no message");
  /// ```
  #[inline]
  pub fn new<T>(group: ExceptionGroup, error: T) -> Self
  where
    T: Display,
  {
    Self {
      group,
      error: error.to_string(),
      trace: Backtrace::capture(),
    }
  }

  /// Returns the exception's error category.
  #[inline]
  pub const fn group(&self) -> ExceptionGroup {
    self.group
  }

  /// Returns the human-readable error message.
  #[inline]
  pub const fn error(&self) -> &str {
    self.error.as_str()
  }

  /// Returns the captured engine backtrace.
  #[inline]
  pub const fn trace(&self) -> &Backtrace {
    &self.trace
  }
}

impl Debug for Exception {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for Exception {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "[klaxon] {}: {}", self.group.label(), self.error)
  }
}

impl Error for Exception {}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
