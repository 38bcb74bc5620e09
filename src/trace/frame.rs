use std::borrow::Cow;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::num::NonZeroU64;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

// -----------------------------------------------------------------------------
// Env
// -----------------------------------------------------------------------------

/// Opaque identity of an evaluation scope.
///
/// Every call frame gets a fresh [`Env`]. Handles are only compared and
/// hashed; they carry no bindings.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Env {
  bits: NonZeroU64,
}

impl Env {
  /// Allocates a new, process-unique environment handle.
  #[inline]
  pub(crate) fn next() -> Self {
    static NEXT: AtomicU64 = AtomicU64::new(1);

    let bits: u64 = NEXT.fetch_add(1, Ordering::Relaxed);

    // The counter starts at one and a u64 does not wrap in practice.
    match NonZeroU64::new(bits) {
      Some(bits) => Self { bits },
      None => Self { bits: NonZeroU64::MIN },
    }
  }

  /// Returns the raw identity of this handle.
  #[inline]
  pub const fn into_bits(self) -> u64 {
    self.bits.get()
  }
}

impl Display for Env {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "<env:{}>", self.bits)
  }
}

// -----------------------------------------------------------------------------
// Frame Kind
// -----------------------------------------------------------------------------

/// Which flavor of handler a scope establishes.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum HandlerKind {
  /// Handlers that run without unwinding.
  Calling,
  /// Handlers that unwind to their establishment point.
  Exiting,
}

/// Role of a frame on the call stack.
///
/// Trimming matches on these kinds to recognize the frames that belong to
/// the signaling machinery.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum FrameKind {
  /// A regular evaluated call.
  Call,
  /// Entry into condition dispatch.
  DispatchEntry,
  /// Delivery of a signal to one handler.
  SignalDelivery,
  /// Invocation of a calling handler.
  HandlerInvocation,
  /// Invocation of an exiting handler after unwinding.
  ExitingInvocation,
  /// A scope that establishes handlers.
  Establish(HandlerKind),
}

// -----------------------------------------------------------------------------
// Frame
// -----------------------------------------------------------------------------

/// One call on the stack, as recorded in a [`CallTrace`].
///
/// [`CallTrace`]: crate::trace::CallTrace
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
  site: Cow<'static, str>,
  env: Env,
  kind: FrameKind,
  index: usize,
  parent: Option<usize>,
}

impl Frame {
  #[inline]
  pub(crate) fn new<S>(site: S, kind: FrameKind, index: usize, parent: Option<usize>) -> Self
  where
    S: Into<Cow<'static, str>>,
  {
    Self {
      site: site.into(),
      env: Env::next(),
      kind,
      index,
      parent,
    }
  }

  /// Returns the call-site text of this frame.
  #[inline]
  pub fn site(&self) -> &str {
    &self.site
  }

  /// Returns the environment handle of this frame.
  #[inline]
  pub const fn env(&self) -> Env {
    self.env
  }

  #[inline]
  pub const fn kind(&self) -> FrameKind {
    self.kind
  }

  /// Returns the position of this frame in its trace.
  #[inline]
  pub const fn index(&self) -> usize {
    self.index
  }

  /// Returns the position of the frame that made this call.
  ///
  /// Always less than [`index()`][Self::index].
  #[inline]
  pub const fn parent(&self) -> Option<usize> {
    self.parent
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
