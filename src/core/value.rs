//! Type-erased metadata value attached to conditions.
//!
//! Condition metadata is opaque to the engine: handlers put arbitrary values
//! in and downcast them back out. [`Value`] is the container that makes this
//! possible while keeping conditions cloneable and comparable.
//!
//! # Examples
//!
//! ```
//! use klaxon::core::Value;
//!
//! let num = Value::new(42_i32);
//!
//! assert_eq!(num.downcast_ref::<i32>(), Some(&42));
//! assert_eq!(num.downcast_ref::<String>(), None);
//! ```

use dyn_clone::clone_box;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::core::Item;

/// Dynamically typed metadata value.
///
/// Cloning a [`Value`] deep-clones the contained value.
#[repr(transparent)]
pub struct Value {
  data: Box<dyn Item>,
}

impl Value {
  /// Creates a new value wrapping `data`.
  #[inline]
  pub fn new<T>(data: T) -> Self
  where
    T: Item,
  {
    Self {
      data: Box::new(data),
    }
  }

  /// Returns `true` if the contained value is of type `T`.
  #[inline]
  pub fn is<T>(&self) -> bool
  where
    T: 'static,
  {
    self.data.as_any().is::<T>()
  }

  /// Returns a shared reference to the contained value of type `T`.
  ///
  /// Returns [`None`] if the value has a different concrete type.
  #[inline]
  pub fn downcast_ref<T>(&self) -> Option<&T>
  where
    T: 'static,
  {
    self.data.as_any().downcast_ref()
  }

  /// Returns the contained value as a string slice, if it is textual.
  ///
  /// Both `String` and `&'static str` payloads are recognized.
  pub fn as_str(&self) -> Option<&str> {
    if let Some(text) = self.downcast_ref::<String>() {
      return Some(text.as_str());
    }

    self.downcast_ref::<&'static str>().copied()
  }
}

impl Clone for Value {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      data: clone_box(&*self.data),
    }
  }
}

impl PartialEq for Value {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    *self.data == *other.data
  }
}

impl Debug for Value {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Debug::fmt(&*self.data, f)
  }
}

/// Textual values display verbatim; everything else uses its [`Debug`] form.
impl Display for Value {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self.as_str() {
      Some(text) => f.write_str(text),
      None => Debug::fmt(&*self.data, f),
    }
  }
}

impl From<&'static str> for Value {
  #[inline]
  fn from(other: &'static str) -> Self {
    Self::new(other)
  }
}

impl From<String> for Value {
  #[inline]
  fn from(other: String) -> Self {
    Self::new(other)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
