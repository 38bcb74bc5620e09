//! Call traces: capture snapshots, trimming, and rendering.
//!
//! A [`CallTrace`] is the snapshot of the session call stack taken when a
//! condition is raised. Each [`Frame`] records its call site, a fresh
//! [`Env`] handle, a [`FrameKind`], and the index of its caller, so a trace
//! describes a call tree rather than a flat list.
//!
//! Rethrown conditions have their trace trimmed with [`trim`] so that frames
//! belonging to handler dispatch do not show up in reports. Traces are
//! rendered by a [`BacktraceFormatter`] according to a [`DisplayMode`].

mod call_trace;
mod display;
mod format;
mod frame;
mod glyphs;
mod trim;

pub use self::call_trace::CallTrace;
pub use self::display::DisplayMode;
pub use self::format::BacktraceFormatter;
pub use self::frame::Env;
pub use self::frame::Frame;
pub use self::frame::FrameKind;
pub use self::frame::HandlerKind;
pub use self::glyphs::Glyphs;
pub use self::trim::context_depth;
pub use self::trim::trim;
