use std::cell::RefCell;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::mem;
use std::rc::Rc;

use crate::cnd::CndKind;
use crate::cnd::Condition;
use crate::error::Exception;
use crate::error::ExceptionGroup;
use crate::session::FrameGuard;
use crate::session::Outcome;
use crate::session::ScopeId;
use crate::session::Session;
use crate::session::Signal;
use crate::session::Unwind;
use crate::trace::FrameKind;
use crate::trace::HandlerKind;

// -----------------------------------------------------------------------------
// Action
// -----------------------------------------------------------------------------

/// What a calling handler asks dispatch to do next.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Action {
  /// Decline; the next matching handler is consulted.
  Continue,
  /// Stop a warning, message, or plain condition from propagating further.
  Muffle,
  /// Resume an interrupt (or plain condition) at its raise site.
  Resume,
}

impl Action {
  #[inline]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Continue => "continue",
      Self::Muffle => "muffle",
      Self::Resume => "resume",
    }
  }

  /// Checks that a condition of `kind` offers this restart.
  pub(crate) fn validate(self, kind: CndKind) -> Outcome<Self> {
    let valid: bool = match self {
      Self::Continue => true,
      Self::Muffle => kind.is_muffleable(),
      Self::Resume => kind.is_resumable(),
    };

    if valid {
      Ok(self)
    } else {
      Err(Signal::Fatal(Exception::new(
        ExceptionGroup::InvalidRestart,
        format_args!("can't {self} a condition of kind `{kind}`"),
      )))
    }
  }
}

impl Display for Action {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.as_str())
  }
}

// -----------------------------------------------------------------------------
// Calling Handlers
// -----------------------------------------------------------------------------

/// A handler that runs without unwinding.
pub type CallingFn = dyn Fn(&Session, &Condition) -> Outcome<Action>;

/// Set of calling handlers established together.
///
/// # Examples
///
/// ```
/// use klaxon::session::{Action, CallingHandlers};
///
/// let handlers = CallingHandlers::new()
///   .on("warning", |_, _| Ok(Action::Muffle))
///   .on("message", |_, _| Ok(Action::Continue));
/// ```
#[derive(Clone, Default)]
pub struct CallingHandlers {
  entries: Vec<(String, Rc<CallingFn>)>,
}

impl CallingHandlers {
  #[inline]
  pub fn new() -> Self {
    Self {
      entries: Vec::new(),
    }
  }

  /// Adds a handler for conditions inheriting from `class`.
  pub fn on<C, F>(mut self, class: C, handler: F) -> Self
  where
    C: Into<String>,
    F: Fn(&Session, &Condition) -> Outcome<Action> + 'static,
  {
    let handler: Rc<CallingFn> = Rc::new(handler);
    self.entries.push((class.into(), handler));
    self
  }
}

impl Debug for CallingHandlers {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_list()
      .entries(self.entries.iter().map(|(class, _)| class))
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Exiting Handlers
// -----------------------------------------------------------------------------

type ExitingFn<'a, T> = Box<dyn FnOnce(&Session, Condition) -> Outcome<T> + 'a>;

/// Set of exiting handlers established together by [`Session::try_catch`].
///
/// At most one of them runs, after the protected body has unwound.
pub struct ExitingHandlers<'a, T> {
  entries: Vec<(String, ExitingFn<'a, T>)>,
}

impl<'a, T> ExitingHandlers<'a, T> {
  #[inline]
  pub fn new() -> Self {
    Self {
      entries: Vec::new(),
    }
  }

  /// Adds a handler for conditions inheriting from `class`.
  pub fn on<C, F>(mut self, class: C, handler: F) -> Self
  where
    C: Into<String>,
    F: FnOnce(&Session, Condition) -> Outcome<T> + 'a,
  {
    let handler: ExitingFn<'a, T> = Box::new(handler);
    self.entries.push((class.into(), handler));
    self
  }

  fn classes(&self) -> Vec<String> {
    self.entries.iter().map(|(class, _)| class.clone()).collect()
  }

  fn take(self, slot: usize) -> Option<ExitingFn<'a, T>> {
    self.entries.into_iter().nth(slot).map(|(_, handler)| handler)
  }
}

impl<T> Default for ExitingHandlers<'_, T> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Debug for ExitingHandlers<'_, T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_list()
      .entries(self.entries.iter().map(|(class, _)| class))
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Handler Stack
// -----------------------------------------------------------------------------

pub(crate) enum ScopeEntries {
  Calling(Vec<(String, Rc<CallingFn>)>),
  Exiting(Vec<String>),
}

pub(crate) struct HandlerScope {
  id: ScopeId,
  entries: ScopeEntries,
}

/// Result of looking up one scope for a condition.
pub(crate) enum Lookup {
  /// No handler in the scope matches.
  Skip,
  /// Matching calling handlers, in registration order.
  Calling(Vec<Rc<CallingFn>>),
  /// The first matching exiting handler.
  Exiting { scope: ScopeId, slot: usize },
}

/// Established handler scopes, outermost first.
#[derive(Default)]
pub(crate) struct HandlerStack {
  scopes: RefCell<Vec<HandlerScope>>,
}

impl HandlerStack {
  #[inline]
  pub(crate) const fn new() -> Self {
    Self {
      scopes: RefCell::new(Vec::new()),
    }
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.scopes.borrow().len()
  }

  fn push(&self, id: ScopeId, entries: ScopeEntries) -> ScopeGuard<'_> {
    let mut scopes: std::cell::RefMut<'_, Vec<HandlerScope>> = self.scopes.borrow_mut();
    let index: usize = scopes.len();

    scopes.push(HandlerScope { id, entries });

    ScopeGuard { stack: self, index }
  }

  /// Finds the handlers of scope `index` that match `condition`.
  ///
  /// Interrupts are never claimed by exiting handlers.
  pub(crate) fn lookup(&self, index: usize, condition: &Condition) -> Lookup {
    let scopes: std::cell::Ref<'_, Vec<HandlerScope>> = self.scopes.borrow();

    let Some(scope) = scopes.get(index) else {
      return Lookup::Skip;
    };

    match &scope.entries {
      ScopeEntries::Calling(entries) => {
        let handlers: Vec<Rc<CallingFn>> = entries
          .iter()
          .filter(|(class, _)| condition.inherits(class))
          .map(|(_, handler)| Rc::clone(handler))
          .collect();

        if handlers.is_empty() {
          Lookup::Skip
        } else {
          Lookup::Calling(handlers)
        }
      }
      ScopeEntries::Exiting(_) if condition.kind() == CndKind::Interrupt => Lookup::Skip,
      ScopeEntries::Exiting(classes) => classes
        .iter()
        .position(|class| condition.inherits(class))
        .map_or(Lookup::Skip, |slot| Lookup::Exiting {
          scope: scope.id,
          slot,
        }),
    }
  }

  /// Hides scope `index` and everything inside it until the guard drops.
  pub(crate) fn hide(&self, index: usize) -> HiddenScopes<'_> {
    let hidden: Vec<HandlerScope> = self.scopes.borrow_mut().split_off(index);

    HiddenScopes {
      stack: self,
      hidden,
    }
  }
}

/// Pops a handler scope on drop.
pub(crate) struct ScopeGuard<'a> {
  stack: &'a HandlerStack,
  index: usize,
}

impl Drop for ScopeGuard<'_> {
  fn drop(&mut self) {
    self.stack.scopes.borrow_mut().truncate(self.index);
  }
}

/// Restores hidden scopes on drop.
pub(crate) struct HiddenScopes<'a> {
  stack: &'a HandlerStack,
  hidden: Vec<HandlerScope>,
}

impl Drop for HiddenScopes<'_> {
  fn drop(&mut self) {
    let mut hidden: Vec<HandlerScope> = mem::take(&mut self.hidden);
    self.stack.scopes.borrow_mut().append(&mut hidden);
  }
}

// -----------------------------------------------------------------------------
// Establishing Handlers
// -----------------------------------------------------------------------------

impl Session {
  /// Evaluates `body` with `handlers` established.
  ///
  /// Calling handlers run at the raise site, before anything unwinds, and
  /// decide through their [`Action`] whether propagation continues.
  pub fn with_calling_handlers<T, F>(&self, handlers: CallingHandlers, body: F) -> Outcome<T>
  where
    F: FnOnce(&Session) -> Outcome<T>,
  {
    let id: ScopeId = self.next_scope_id();
    let kind: FrameKind = FrameKind::Establish(HandlerKind::Calling);

    let _frame: FrameGuard<'_> = self.stack.push("with_calling_handlers()", kind, self.stack.top());
    let _scope: ScopeGuard<'_> = self.handlers.push(id, ScopeEntries::Calling(handlers.entries));

    body(self)
  }

  /// Evaluates `body` with exiting `handlers` established.
  ///
  /// When dispatch selects one of the handlers, `body` unwinds and the
  /// handler's result becomes the result of this call.
  pub fn try_catch<'a, T, F>(&self, handlers: ExitingHandlers<'a, T>, body: F) -> Outcome<T>
  where
    F: FnOnce(&Session) -> Outcome<T>,
  {
    let id: ScopeId = self.next_scope_id();
    let kind: FrameKind = FrameKind::Establish(HandlerKind::Exiting);

    let establish: FrameGuard<'_> = self.stack.push("try_catch()", kind, self.stack.top());

    let result: Outcome<T> = {
      let _scope: ScopeGuard<'_> = self.handlers.push(id, ScopeEntries::Exiting(handlers.classes()));
      body(self)
    };

    let unwind: Unwind = match result {
      Err(Signal::Unwind(unwind)) if unwind.scope == id => unwind,
      result => return result,
    };

    let Some(handler) = handlers.take(unwind.slot) else {
      return Err(Signal::Fatal(Exception::new(
        ExceptionGroup::SysInv,
        "unwind targets a missing exiting handler",
      )));
    };

    tracing::debug!(
      target: "klaxon",
      class = unwind.condition.class(),
      result = "absorbed",
      "exiting handler",
    );

    let _frame: FrameGuard<'_> = self.stack.push(
      "exiting_handler(cnd)",
      FrameKind::ExitingInvocation,
      Some(establish.index()),
    );

    handler(self, *unwind.condition)
  }
}
