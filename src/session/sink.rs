use parking_lot::Mutex;
use std::io::Write;
use std::io::stderr;
use std::mem;
use std::sync::Arc;

/// Destination of user-visible error, warning, and message output.
#[derive(Clone, Debug, Default)]
pub enum ErrorSink {
  /// The process standard error stream.
  #[default]
  Stderr,
  /// A shared in-memory buffer.
  Buffer(SinkBuffer),
}

impl ErrorSink {
  /// Creates a buffer sink and a handle for reading what it receives.
  pub fn buffer() -> (Self, SinkBuffer) {
    let buffer: SinkBuffer = SinkBuffer::default();
    (Self::Buffer(buffer.clone()), buffer)
  }

  pub(crate) fn write(&self, text: &str) {
    match self {
      Self::Stderr => {
        if let Err(error) = stderr().lock().write_all(text.as_bytes()) {
          tracing::warn!(target: "klaxon", %error, "failed to write to stderr");
        }
      }
      Self::Buffer(buffer) => {
        buffer.inner.lock().push_str(text);
      }
    }
  }
}

/// Shared handle to the contents of an [`ErrorSink::Buffer`].
#[derive(Clone, Debug, Default)]
pub struct SinkBuffer {
  inner: Arc<Mutex<String>>,
}

impl SinkBuffer {
  /// Returns a copy of everything written so far.
  #[inline]
  pub fn contents(&self) -> String {
    self.inner.lock().clone()
  }

  /// Returns everything written so far and clears the buffer.
  #[inline]
  pub fn take(&self) -> String {
    mem::take(&mut *self.inner.lock())
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
