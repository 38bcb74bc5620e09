//! Klaxon - classed-condition signaling with call-trace capture.
//!
//! Klaxon raises conditions that carry a class hierarchy, arbitrary
//! metadata, a snapshot of the call stack, and an optional parent
//! condition. Raised conditions are offered to calling handlers (which run
//! in place) and exiting handlers (which unwind to where they were
//! established). An error that escapes every handler is recorded, reported
//! exactly once, and can be inspected afterwards.
//!
//! # Quick Start
//!
//! ```
//! use klaxon::cnd::ConditionBuilder;
//! use klaxon::session::{ErrorSink, Session, SessionConfig};
//!
//! let (sink, buffer) = ErrorSink::buffer();
//! let session = Session::new(SessionConfig { interactive: false, sink, ..SessionConfig::new() });
//!
//! let result: klaxon::session::Outcome<()> = session.call("load()", |session| {
//!   session.raise_error(ConditionBuilder::from("boom").class("pkg_bad"))
//! });
//!
//! assert!(result.is_err());
//! assert!(buffer.contents().starts_with("Error: boom\n"));
//! assert_eq!(session.last_error().unwrap().classes(), ["pkg_bad", "error"]);
//! ```
//!
//! # Core Modules
//!
//! - [`session`]: Evaluation context, handlers, and raise entry points
//! - [`cnd`]: Conditions and their builder
//! - [`trace`]: Call traces, trimming, and backtrace rendering
//! - [`core`]: Type-erased metadata values
//! - [`error`]: Usage errors raised by the engine
//! - [`init`]: Session startup with tracing
//! - [`consts`]: Defaults and well-known names

pub mod cnd;
pub mod consts;
pub mod core;
pub mod error;
pub mod init;
pub mod session;
pub mod trace;
