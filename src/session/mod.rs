//! The evaluation context: call stack, handler stack, and diagnostics.
//!
//! A [`Session`] holds all state the engine needs: the live call stack that
//! traces are captured from, the established handler scopes, the last-error
//! slot, and the backtrace display setting. Every operation takes the
//! session explicitly; nothing is global.
//!
//! # Evaluation Model
//!
//! Evaluations return [`Outcome<T>`], and non-local exits travel as a
//! [`Signal`] through ordinary `?` propagation:
//!
//! - [`Signal::Unwind`]: an exiting handler claimed a condition and the
//!   stack is unwinding to its [`try_catch`] scope.
//! - [`Signal::Abort`]: an error escaped every handler.
//! - [`Signal::Interrupt`]: an interrupt was not resumed.
//! - [`Signal::Fatal`]: the engine was misused.
//!
//! # Examples
//!
//! ```
//! use klaxon::cnd::ConditionBuilder;
//! use klaxon::session::{ExitingHandlers, Session};
//!
//! let session = Session::default();
//!
//! let value = session.try_catch(
//!   ExitingHandlers::new().on("pkg_bad", |_, _| Ok(0)),
//!   |session| session.raise_error(ConditionBuilder::from("boom").class("pkg_bad")),
//! );
//!
//! assert_eq!(value.ok(), Some(0));
//! ```
//!
//! [`try_catch`]: Session::try_catch

mod config;
mod dispatch;
mod escalate;
mod handler;
mod lifecycle;
mod raise;
mod signal;
mod sink;
mod stack;
mod store;

pub(crate) use self::dispatch::Dispatched;
pub(crate) use self::handler::HandlerStack;
pub(crate) use self::handler::HiddenScopes;
pub(crate) use self::handler::Lookup;
pub(crate) use self::stack::CallStack;
pub(crate) use self::stack::FrameGuard;
pub(crate) use self::store::LastError;

pub use self::config::SessionConfig;
pub use self::handler::Action;
pub use self::handler::CallingFn;
pub use self::handler::CallingHandlers;
pub use self::handler::ExitingHandlers;
pub use self::signal::Fallback;
pub use self::signal::Outcome;
pub use self::signal::ScopeId;
pub use self::signal::Signal;
pub use self::signal::Unwind;
pub use self::sink::ErrorSink;
pub use self::sink::SinkBuffer;

use hashbrown::HashMap;
use hashbrown::HashSet;
use std::borrow::Cow;
use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

use crate::cnd::CndFormat;
use crate::trace::CallTrace;
use crate::trace::Env;
use crate::trace::FrameKind;

// -----------------------------------------------------------------------------
// Session
// -----------------------------------------------------------------------------

/// Evaluation context of the condition system.
pub struct Session {
  pub(crate) config: SessionConfig,
  pub(crate) root: Env,
  pub(crate) stack: CallStack,
  pub(crate) handlers: HandlerStack,
  pub(crate) store: LastError,
  pub(crate) capturing: Cell<bool>,
  pub(crate) capture_disabled: Cell<bool>,
  pub(crate) display: RefCell<Option<String>>,
  pub(crate) formats: RefCell<HashMap<String, Rc<dyn CndFormat>>>,
  pub(crate) warned: RefCell<HashSet<String>>,
  pub(crate) scope_ids: Cell<u64>,
}

impl Session {
  /// Creates a new session.
  pub fn new(config: SessionConfig) -> Self {
    tracing::debug!(
      target: "klaxon",
      interactive = config.interactive,
      unicode = config.unicode,
      display = config.backtrace_display.as_deref(),
      "session",
    );

    Self {
      display: RefCell::new(config.backtrace_display.clone()),
      config,
      root: Env::next(),
      stack: CallStack::new(),
      handlers: HandlerStack::new(),
      store: LastError::new(),
      capturing: Cell::new(false),
      capture_disabled: Cell::new(false),
      formats: RefCell::new(HashMap::new()),
      warned: RefCell::new(HashSet::new()),
      scope_ids: Cell::new(0),
    }
  }

  #[inline]
  pub const fn config(&self) -> &SessionConfig {
    &self.config
  }

  #[inline]
  pub(crate) fn next_scope_id(&self) -> ScopeId {
    let bits: u64 = self.scope_ids.get() + 1;
    self.scope_ids.set(bits);
    ScopeId::new(bits)
  }

  // ---------------------------------------------------------------------------
  // Evaluation
  // ---------------------------------------------------------------------------

  /// Evaluates `body` in a new call frame named `site`.
  ///
  /// The frame is called from the current frame and popped on every exit
  /// path.
  pub fn call<S, T, F>(&self, site: S, body: F) -> Outcome<T>
  where
    S: Into<Cow<'static, str>>,
    F: FnOnce(&Session) -> Outcome<T>,
  {
    let _frame: FrameGuard<'_> = self.stack.push(site, FrameKind::Call, self.stack.top());
    body(self)
  }

  /// Evaluates `body` in a new call frame whose caller is the frame owning
  /// `env`.
  ///
  /// The global environment makes the call a new root. An `env` that does
  /// not belong to a live frame falls back to the current frame.
  pub fn call_in<S, T, F>(&self, site: S, env: Env, body: F) -> Outcome<T>
  where
    S: Into<Cow<'static, str>>,
    F: FnOnce(&Session) -> Outcome<T>,
  {
    let parent: Option<usize> = if env == self.root {
      None
    } else if let Some(index) = self.stack.find(env) {
      Some(index)
    } else {
      tracing::warn!(target: "klaxon", %env, "calling environment is not live");
      self.stack.top()
    };

    let _frame: FrameGuard<'_> = self.stack.push(site, FrameKind::Call, parent);
    body(self)
  }

  /// Returns the environment of the current frame.
  #[inline]
  pub fn current_env(&self) -> Env {
    self.stack.top_env().unwrap_or(self.root)
  }

  /// Returns the global environment, which owns no frame.
  #[inline]
  pub const fn global_env(&self) -> Env {
    self.root
  }

  /// Evaluates `body` with trace capture disabled for conditions raised
  /// without message text.
  pub fn without_capture<T, F>(&self, body: F) -> T
  where
    F: FnOnce(&Session) -> T,
  {
    let previous: bool = self.capture_disabled.replace(true);
    let _guard: RestoreCapture<'_> = RestoreCapture {
      flag: &self.capture_disabled,
      previous,
    };

    body(self)
  }

  /// Evaluates `body` as a top-level request.
  ///
  /// Reports whatever signal ends the evaluation the way a host's top
  /// level would: escaped errors not already written to the sink are
  /// printed, as are usage errors. The result is returned unchanged.
  pub fn top_level<T, F>(&self, body: F) -> Outcome<T>
  where
    F: FnOnce(&Session) -> Outcome<T>,
  {
    let result: Outcome<T> = body(self);

    if let Err(signal) = &result {
      self.report(signal);
    }

    result
  }

  fn report(&self, signal: &Signal) {
    match signal {
      Signal::Abort(fallback) if fallback.printed() => {
        tracing::trace!(target: "klaxon", reason = "already printed", "top level");
      }
      Signal::Abort(fallback) => {
        self.config.sink.write(&format!("Error: {}\n", fallback.message()));
      }
      Signal::Interrupt(_) => {
        tracing::debug!(target: "klaxon", "top level interrupted");
      }
      Signal::Fatal(exception) => {
        self.config.sink.write(&format!("Error: {exception}\n"));
      }
      Signal::Unwind(unwind) => {
        tracing::error!(
          target: "klaxon",
          scope = ?unwind.scope(),
          class = unwind.condition().class(),
          "unwind reached the top level",
        );
      }
    }
  }

  // ---------------------------------------------------------------------------
  // Diagnostics
  // ---------------------------------------------------------------------------

  /// Writes the current call stack to the error sink.
  ///
  /// `full` renders every frame as a tree; otherwise only the branch leading
  /// to the current frame is shown.
  pub fn print_backtrace(&self, full: bool) {
    let trace: CallTrace = self.capture_trace();

    if trace.is_empty() {
      return;
    }

    let text: String = if full {
      self.config.formatter().tree(&trace, false)
    } else {
      self.config.formatter().branch(&trace)
    };

    self.config.sink.write(&format!("{text}\n"));
  }

  /// Returns the backtrace display setting.
  #[inline]
  pub fn backtrace_display(&self) -> Option<String> {
    self.display.borrow().clone()
  }

  /// Replaces the backtrace display setting.
  ///
  /// The value is validated when an error escapes, not here.
  pub fn set_backtrace_display(&self, value: Option<&str>) {
    *self.display.borrow_mut() = value.map(str::to_owned);
  }

  /// Registers the formatter used for conditions of `class` raised without
  /// message text.
  pub fn register_format<C, F>(&self, class: C, format: F)
  where
    C: Into<String>,
    F: CndFormat + 'static,
  {
    let format: Rc<dyn CndFormat> = Rc::new(format);
    self.formats.borrow_mut().insert(class.into(), format);
  }
}

impl Default for Session {
  #[inline]
  fn default() -> Self {
    Self::new(SessionConfig::default())
  }
}

/// Restores the capture override on every exit path.
struct RestoreCapture<'a> {
  flag: &'a Cell<bool>,
  previous: bool,
}

impl Drop for RestoreCapture<'_> {
  fn drop(&mut self) {
    self.flag.set(self.previous);
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
