use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// The built-in kind of a condition.
///
/// Every condition's class list ends with the base class of its kind.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum CndKind {
  /// A plain condition, signaled without display.
  Condition,
  /// An informational message.
  Message,
  /// A warning; displayed and then execution continues.
  Warning,
  /// An error; terminates the raising call.
  Error,
  /// An interrupt; only the resume restart stops it.
  Interrupt,
}

impl CndKind {
  /// Returns the class every condition of this kind ends with.
  #[inline]
  pub const fn base_class(&self) -> &'static str {
    match self {
      Self::Condition | Self::Interrupt => "condition",
      Self::Message => "message",
      Self::Warning => "warning",
      Self::Error => "error",
    }
  }

  #[inline]
  pub const fn label(&self) -> &'static str {
    match self {
      Self::Condition => "condition",
      Self::Message => "message",
      Self::Warning => "warning",
      Self::Error => "error",
      Self::Interrupt => "interrupt",
    }
  }

  /// Returns `true` if a calling handler may muffle conditions of this kind.
  #[inline]
  pub const fn is_muffleable(&self) -> bool {
    matches!(self, Self::Condition | Self::Message | Self::Warning)
  }

  /// Returns `true` if a calling handler may resume conditions of this kind.
  #[inline]
  pub const fn is_resumable(&self) -> bool {
    matches!(self, Self::Condition | Self::Interrupt)
  }
}

impl Display for CndKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.label())
  }
}
