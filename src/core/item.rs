//! Trait defining type-erased values usable within [`Value`].
//!
//! [`Value`]: crate::core::Value

use dyn_clone::DynClone;
use std::any::Any;
use std::fmt::Debug;

/// Trait implemented by all values stored in condition metadata.
///
/// [`Item`] is automatically implemented for every `'static` type that is
/// [`Debug`], [`Clone`], and [`PartialEq`]. Conditions never leave the thread
/// that raised them, so no [`Send`] or [`Sync`] bound is required.
///
/// # Examples
///
/// ```
/// use klaxon::core::Value;
///
/// let a = Value::new(42_i32);
/// let b = Value::new(String::from("hello"));
/// let c = Value::new(vec![1, 2, 3]);
/// ```
pub trait Item: Any + Debug + DynClone + 'static {
  /// Returns a shared reference to this value as [`Any`].
  fn as_any(&self) -> &dyn Any;

  /// Tests for `self` and `other` values to be equal.
  ///
  /// This is stricter than [`PartialEq`] because the types must be identical.
  fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl PartialEq for dyn Item {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.dyn_eq(other.as_any())
  }
}

impl<T> Item for T
where
  T: Any + Debug + DynClone + 'static,
  T: PartialEq,
{
  #[inline]
  fn as_any(&self) -> &dyn Any {
    self
  }

  #[inline]
  fn dyn_eq(&self, other: &dyn Any) -> bool {
    other
      .downcast_ref::<T>()
      .is_some_and(|other| PartialEq::eq(self, other))
  }
}
