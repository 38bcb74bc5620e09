use std::env;
use std::io::IsTerminal;
use std::io::stderr;

use crate::consts;
use crate::session::ErrorSink;
use crate::trace::BacktraceFormatter;
use crate::trace::Glyphs;

/// Session configuration.
#[derive(Clone, Debug)]
pub struct SessionConfig {
  // ---------------------------------------------------------------------------
  // Reporting
  // ---------------------------------------------------------------------------
  pub interactive: bool,
  pub unicode: bool,
  pub backtrace_display: Option<String>,
  pub branch_frames: usize,
  pub sink: ErrorSink,
  // ---------------------------------------------------------------------------
  // Tracing Subscriber Configuration
  // ---------------------------------------------------------------------------
  pub tracing_source_file: bool,
  pub tracing_source_line: bool,
  pub tracing_source_name: bool,
  pub tracing_verbose: bool,
  pub tracing_very_verbose: bool,
}

impl SessionConfig {
  #[inline]
  pub fn new() -> Self {
    Self {
      interactive: stderr().is_terminal(),
      unicode: consts::DEFAULT_UNICODE,
      backtrace_display: None,
      branch_frames: consts::DEFAULT_BRANCH_FRAMES,
      sink: ErrorSink::Stderr,
      tracing_source_file: false,
      tracing_source_line: false,
      tracing_source_name: false,
      tracing_verbose: true,
      tracing_very_verbose: false,
    }
  }

  /// Creates a configuration from defaults and the process environment.
  ///
  /// - `KLAXON_BACKTRACE_ON_ERROR` sets the initial display mode.
  /// - `KLAXON_ASCII` (any value) disables rich glyphs.
  pub fn from_env() -> Self {
    let mut config: Self = Self::new();

    if let Ok(value) = env::var(consts::ENV_BACKTRACE_ON_ERROR) {
      config.backtrace_display = Some(value);
    }

    if env::var_os(consts::ENV_ASCII).is_some() {
      config.unicode = false;
    }

    config
  }

  #[inline]
  pub const fn tracing_filter(&self) -> tracing::Level {
    if self.tracing_very_verbose {
      tracing::Level::TRACE
    } else if self.tracing_verbose {
      tracing::Level::DEBUG
    } else {
      tracing::Level::INFO
    }
  }

  #[inline]
  pub const fn glyphs(&self) -> Glyphs {
    Glyphs::select(self.unicode)
  }

  #[inline]
  pub const fn formatter(&self) -> BacktraceFormatter {
    BacktraceFormatter::new(self.glyphs(), self.branch_frames)
  }
}

impl Default for SessionConfig {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
