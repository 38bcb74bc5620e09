use std::cell::RefCell;
use std::rc::Rc;

use crate::cnd::Condition;
use crate::error::Exception;
use crate::error::ExceptionGroup;
use crate::session::Session;
use crate::trace::DisplayMode;

/// Single slot holding the most recent error that escaped every handler.
#[derive(Debug, Default)]
pub(crate) struct LastError {
  slot: RefCell<Option<Rc<Condition>>>,
}

impl LastError {
  #[inline]
  pub(crate) const fn new() -> Self {
    Self {
      slot: RefCell::new(None),
    }
  }

  /// Stores `condition`, dropping the previous occupant.
  #[inline]
  pub(crate) fn set(&self, condition: Rc<Condition>) {
    let previous: Option<Rc<Condition>> = self.slot.replace(Some(condition));

    if previous.is_some() {
      tracing::trace!(target: "klaxon", "last error replaced");
    }
  }

  #[inline]
  pub(crate) fn get(&self) -> Option<Rc<Condition>> {
    self.slot.borrow().clone()
  }
}

impl Session {
  /// Returns the most recent error that escaped every handler.
  ///
  /// The returned condition renders its backtrace as a single branch.
  ///
  /// # Errors
  ///
  /// Returns a [`NoRecordedError`] exception if no error has escaped yet.
  ///
  /// [`NoRecordedError`]: ExceptionGroup::NoRecordedError
  pub fn last_error(&self) -> Result<Condition, Exception> {
    self.recorded(DisplayMode::Branch)
  }

  /// Returns the most recent error that escaped every handler, rendering
  /// its full backtrace.
  ///
  /// # Errors
  ///
  /// Returns a [`NoRecordedError`] exception if no error has escaped yet.
  ///
  /// [`NoRecordedError`]: ExceptionGroup::NoRecordedError
  pub fn last_trace(&self) -> Result<Condition, Exception> {
    self.recorded(DisplayMode::Full)
  }

  fn recorded(&self, mode: DisplayMode) -> Result<Condition, Exception> {
    let Some(condition) = self.store.get() else {
      return Err(Exception::new(
        ExceptionGroup::NoRecordedError,
        "Can't show last error because no error was recorded yet.",
      ));
    };

    let condition: Condition = Condition::clone(&condition);

    Ok(condition.with_view(mode, self.config.formatter()))
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
