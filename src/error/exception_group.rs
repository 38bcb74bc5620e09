use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Category of a usage error raised by the engine itself.
///
/// Usage errors are never delivered to condition handlers; they describe a
/// misuse of the API rather than a condition of the program being run.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExceptionGroup {
  /// A condition was built without a message and without a class.
  ///
  /// A lazily computed message needs a class to dispatch on.
  InvalidCondition,
  /// The last error was requested before any error escaped.
  NoRecordedError,
  /// The backtrace display setting holds an unrecognized value.
  InvalidDisplayMode,
  /// A handler invoked a restart the condition does not offer.
  InvalidRestart,
  /// Invalid engine operation or state.
  SysInv,
}

impl ExceptionGroup {
  #[inline]
  pub(crate) const fn label(&self) -> &'static str {
    match self {
      Self::InvalidCondition => "invalid_condition",
      Self::NoRecordedError => "no_recorded_error",
      Self::InvalidDisplayMode => "invalid_display_mode",
      Self::InvalidRestart => "invalid_restart",
      Self::SysInv => "sysinv",
    }
  }
}

impl Display for ExceptionGroup {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::InvalidCondition => f.write_str("(InvalidCondition) the condition could not be built"),
      Self::NoRecordedError => f.write_str("(NoRecordedError) no error has been recorded"),
      Self::InvalidDisplayMode => f.write_str("(InvalidDisplayMode) unknown backtrace display mode"),
      Self::InvalidRestart => f.write_str("(InvalidRestart) the restart is not available"),
      Self::SysInv => f.write_str("(SysInv) an engine invariant has been broken"),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
