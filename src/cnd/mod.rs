//! Conditions: classed, chainable signals with metadata.
//!
//! A [`Condition`] is built with a [`ConditionBuilder`], which enforces the
//! construction rules:
//!
//! - A condition has message text, a class, or both.
//! - The class list always ends with the base class of its [`CndKind`].
//! - Multi-line messages are folded into a header and bullets.
//!
//! Conditions without message text get one computed on demand by a
//! [`CndFormat`] registered for their class, or by [`DefaultFormat`].

mod builder;
mod condition;
mod kind;
mod message;

pub use self::builder::ConditionBuilder;
pub use self::condition::Condition;
pub use self::condition::View;
pub use self::kind::CndKind;
pub use self::message::Bullet;
pub use self::message::BulletKind;
pub use self::message::CndFormat;
pub use self::message::DefaultFormat;
pub use self::message::Message;
pub use self::message::MessageText;
