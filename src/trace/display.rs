use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::str::FromStr;

use crate::error::Exception;
use crate::error::ExceptionGroup;

/// How much of a backtrace is shown when an error escapes.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum DisplayMode {
  /// Never show a backtrace.
  None,
  /// Show a one-line hint naming `last_trace()` (interactive sessions only).
  Reminder,
  /// Show the single branch leading to the error.
  Branch,
  /// Show a tree with sub-branches off the error path collapsed.
  Collapse,
  /// Show every frame as a tree.
  Full,
}

impl DisplayMode {
  /// Every recognized mode, in increasing order of detail.
  pub const ALL: [Self; 5] = [
    Self::None,
    Self::Reminder,
    Self::Branch,
    Self::Collapse,
    Self::Full,
  ];

  /// Returns the mode used when no setting is present.
  #[inline]
  pub const fn fallback(interactive: bool) -> Self {
    if interactive { Self::Reminder } else { Self::Full }
  }

  /// Returns the setting value that selects this mode.
  #[inline]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::None => "none",
      Self::Reminder => "reminder",
      Self::Branch => "branch",
      Self::Collapse => "collapse",
      Self::Full => "full",
    }
  }
}

impl Display for DisplayMode {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for DisplayMode {
  type Err = Exception;

  fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|mode| mode.as_str() == value)
      .ok_or_else(|| {
        Exception::new(
          ExceptionGroup::InvalidDisplayMode,
          format_args!("unknown backtrace display mode `{value}`"),
        )
      })
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
