//! Usage errors raised by the engine itself.
//!
//! Conditions (errors, warnings, messages, interrupts) are the designed,
//! catchable control-flow values of this crate and live in [`cnd`]. This
//! module covers the other kind of failure: misuse of the engine.
//!
//! # Exception Model
//!
//! An [`Exception`] carries two pieces of information:
//!
//! 1. **Group**: The error category ([`InvalidCondition`], [`NoRecordedError`], ...)
//! 2. **Description**: A human-readable error message
//!
//! Exceptions surface immediately. Inside an evaluation they travel as
//! [`Signal::Fatal`], which no handler scope intercepts; outside of one they
//! are returned directly as `Result<_, Exception>`.
//!
//! [`cnd`]: crate::cnd
//! [`InvalidCondition`]: ExceptionGroup::InvalidCondition
//! [`NoRecordedError`]: ExceptionGroup::NoRecordedError
//! [`Signal::Fatal`]: crate::session::Signal::Fatal

mod exception;
mod exception_group;

pub use self::exception::Exception;
pub use self::exception_group::ExceptionGroup;
