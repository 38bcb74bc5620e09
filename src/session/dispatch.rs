use std::rc::Rc;
use tracing::Span;

use crate::cnd::Condition;
use crate::session::Action;
use crate::session::CallingFn;
use crate::session::FrameGuard;
use crate::session::HiddenScopes;
use crate::session::Lookup;
use crate::session::Outcome;
use crate::session::Session;
use crate::session::Unwind;
use crate::trace::FrameKind;

/// Where a dispatched condition ended up.
#[derive(Debug)]
pub(crate) enum Dispatched {
  /// No handler stopped the condition.
  Unhandled(Condition),
  /// A calling handler muffled the condition.
  Muffled,
  /// A calling handler invoked the resume restart.
  Resumed,
  /// An exiting handler claimed the condition.
  Unwind(Unwind),
}

impl Session {
  /// Offers `condition` to the established handlers, innermost scope first.
  ///
  /// Every matching calling handler of a scope runs before any outer scope
  /// is consulted. The first matching exiting handler ends the walk.
  pub(crate) fn dispatch(&self, condition: Condition) -> Outcome<Dispatched> {
    let span: Span = tracing::trace_span!(
      target: "klaxon",
      "dispatch",
      kind = condition.kind().label(),
      class = condition.class(),
    );

    let _enter: tracing::span::Entered<'_> = span.enter();
    let entry: FrameGuard<'_> = self.stack.push("signal_condition()", FrameKind::DispatchEntry, self.stack.top());
    let mut index: usize = self.handlers.len();

    while index > 0 {
      index -= 1;

      match self.handlers.lookup(index, &condition) {
        Lookup::Skip => {}
        Lookup::Exiting { scope, slot } => {
          tracing::trace!(target: "klaxon", result = "unwind", scope = ?scope);
          return Ok(Dispatched::Unwind(Unwind::new(scope, slot, condition)));
        }
        Lookup::Calling(handlers) => {
          for handler in handlers {
            let action: Action = self.invoke(index, entry.index(), &handler, &condition)?;

            match action.validate(condition.kind())? {
              Action::Continue => {}
              Action::Muffle => {
                tracing::trace!(target: "klaxon", result = "muffled");
                return Ok(Dispatched::Muffled);
              }
              Action::Resume => {
                tracing::trace!(target: "klaxon", result = "resumed");
                return Ok(Dispatched::Resumed);
              }
            }
          }
        }
      }
    }

    tracing::trace!(target: "klaxon", result = "unhandled");

    Ok(Dispatched::Unhandled(condition))
  }

  /// Runs one calling handler of scope `index`.
  ///
  /// The scope and everything inside it are hidden while the handler runs,
  /// so a condition raised by the handler only reaches outer scopes.
  fn invoke(&self, index: usize, entry: usize, handler: &Rc<CallingFn>, condition: &Condition) -> Outcome<Action> {
    let _hidden: HiddenScopes<'_> = self.handlers.hide(index);

    let delivery: FrameGuard<'_> = self.stack.push("deliver_signal()", FrameKind::SignalDelivery, Some(entry));
    let invocation: FrameGuard<'_> = self.stack.push(
      "invoke_handler()",
      FrameKind::HandlerInvocation,
      Some(delivery.index()),
    );

    let _frame: FrameGuard<'_> = self.stack.push("handler(cnd)", FrameKind::Call, Some(invocation.index()));

    handler(self, condition)
  }
}
