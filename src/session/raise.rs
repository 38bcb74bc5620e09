use crate::cnd::CndKind;
use crate::cnd::Condition;
use crate::cnd::ConditionBuilder;
use crate::error::Exception;
use crate::error::ExceptionGroup;
use crate::session::Dispatched;
use crate::session::Outcome;
use crate::session::Session;
use crate::session::Signal;
use crate::trace::CallTrace;
use crate::trace::trim;

impl Session {
  // ---------------------------------------------------------------------------
  // Raise Entry Points
  // ---------------------------------------------------------------------------

  /// Raises an error condition.
  ///
  /// Always returns `Err`: either the [`Signal::Unwind`] of the exiting
  /// handler that claimed the error, or the [`Signal::Abort`] left behind
  /// after the error escaped every handler and was recorded.
  pub fn raise_error<T, B>(&self, builder: B) -> Outcome<T>
  where
    B: Into<ConditionBuilder>,
  {
    let condition: Condition = self.finalize(builder.into().kind(CndKind::Error))?;

    match self.dispatch(condition)? {
      Dispatched::Unwind(unwind) => Err(Signal::Unwind(unwind)),
      Dispatched::Unhandled(condition) => Err(self.escape(condition)),
      Dispatched::Muffled | Dispatched::Resumed => Err(Signal::Fatal(Exception::new(
        ExceptionGroup::SysInv,
        "an error condition returned to its raise site",
      ))),
    }
  }

  /// Raises a warning condition.
  ///
  /// Unless a calling handler muffles it, the warning is written to the
  /// error sink and execution continues.
  pub fn raise_warning<B>(&self, builder: B) -> Outcome<()>
  where
    B: Into<ConditionBuilder>,
  {
    let condition: Condition = self.finalize(builder.into().kind(CndKind::Warning))?;

    match self.dispatch(condition)? {
      Dispatched::Unwind(unwind) => Err(Signal::Unwind(unwind)),
      Dispatched::Unhandled(condition) => {
        self.config.sink.write(&format!("Warning: {}\n", condition.full_message()));
        Ok(())
      }
      Dispatched::Muffled | Dispatched::Resumed => Ok(()),
    }
  }

  /// Raises a message condition.
  ///
  /// Unless a calling handler muffles it, the message is written to the
  /// error sink and execution continues.
  pub fn raise_message<B>(&self, builder: B) -> Outcome<()>
  where
    B: Into<ConditionBuilder>,
  {
    let condition: Condition = self.finalize(builder.into().kind(CndKind::Message))?;

    match self.dispatch(condition)? {
      Dispatched::Unwind(unwind) => Err(Signal::Unwind(unwind)),
      Dispatched::Unhandled(condition) => {
        self.config.sink.write(&format!("{}\n", condition.full_message()));
        Ok(())
      }
      Dispatched::Muffled | Dispatched::Resumed => Ok(()),
    }
  }

  /// Raises an interrupt.
  ///
  /// Interrupts are never claimed by exiting handlers. Returns `Ok` only if a
  /// calling handler invokes the resume restart.
  pub fn raise_interrupt(&self) -> Outcome<()> {
    let builder: ConditionBuilder = ConditionBuilder::new().kind(CndKind::Interrupt).class("interrupt");

    let condition: Condition = self.finalize(builder)?;

    match self.dispatch(condition)? {
      Dispatched::Resumed | Dispatched::Muffled => Ok(()),
      Dispatched::Unwind(unwind) => Err(Signal::Unwind(unwind)),
      Dispatched::Unhandled(condition) => {
        tracing::debug!(target: "klaxon", result = "interrupted");
        Err(Signal::Interrupt(Box::new(condition)))
      }
    }
  }

  /// Signals a plain condition.
  ///
  /// Nothing is displayed; returns `Ok` unless an exiting handler claims the
  /// condition.
  pub fn signal<B>(&self, builder: B) -> Outcome<()>
  where
    B: Into<ConditionBuilder>,
  {
    let condition: Condition = self.finalize(builder.into().kind(CndKind::Condition))?;

    match self.dispatch(condition)? {
      Dispatched::Unwind(unwind) => Err(Signal::Unwind(unwind)),
      Dispatched::Unhandled(_) | Dispatched::Muffled | Dispatched::Resumed => Ok(()),
    }
  }

  // ---------------------------------------------------------------------------
  // Finalization
  // ---------------------------------------------------------------------------

  /// Builds the condition and attaches a trimmed trace where its kind calls
  /// for one.
  pub(crate) fn finalize(&self, builder: ConditionBuilder) -> Outcome<Condition> {
    let kind: CndKind = builder.get_kind();
    let wants: bool = wants_trace(kind, builder.has_parent());
    let mut condition: Condition = builder.build_with(self.config.glyphs(), &self.formats.borrow())?;

    tracing::debug!(
      target: "klaxon",
      kind = kind.label(),
      class = condition.class(),
      "raise",
    );

    if condition.trace().is_some() || !wants {
      return Ok(condition);
    }

    if self.capture_disabled.get() && !condition.has_literal_message() {
      tracing::trace!(target: "klaxon", reason = "capture disabled", "capture skipped");
      return Ok(condition);
    }

    let trace: CallTrace = trim(self.capture_trace(), condition.parent());

    condition.set_trace(trace);

    Ok(condition)
  }
}

/// Errors always carry a trace; warnings and messages only when chained.
#[inline]
const fn wants_trace(kind: CndKind, chained: bool) -> bool {
  match kind {
    CndKind::Error => true,
    CndKind::Warning | CndKind::Message => chained,
    CndKind::Condition | CndKind::Interrupt => false,
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
