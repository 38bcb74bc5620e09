//! Core value types.

mod item;
mod value;

pub use self::item::Item;
pub use self::value::Value;
