//! Session startup and tracing subscriber installation.

use std::fmt::Display;

use crate::error::Exception;
use crate::error::ExceptionGroup;
use crate::session::Session;
use crate::session::SessionConfig;

/// Creates a session, installing the global tracing subscriber first.
///
/// Failing to install the subscriber (for example because one is already
/// set) is reported on stderr and does not prevent the session from being
/// created.
pub fn start(config: SessionConfig) -> Session {
  if let Err(error) = init_tracing_subscriber(&config) {
    eprintln!("failed to set tracing subscriber:");
    eprintln!("    {}", error.error());
  }

  Session::new(config)
}

/// Installs the global tracing subscriber described by `config`.
#[cfg(feature = "subscriber")]
pub fn init_tracing_subscriber(config: &SessionConfig) -> Result<(), Exception> {
  use tracing_subscriber::FmtSubscriber;
  use tracing_subscriber::fmt::format;
  use tracing_subscriber::util::SubscriberInitExt;

  FmtSubscriber::builder()
    .event_format(format().compact())
    .log_internal_errors(true)
    .with_ansi(config.interactive)
    .with_file(config.tracing_source_file)
    .with_level(true)
    .with_line_number(config.tracing_source_line)
    .with_max_level(config.tracing_filter())
    .with_target(config.tracing_source_name)
    .with_writer(std::io::stderr)
    .finish()
    .try_init()
    .map_err(error)
}

/// Installs the global tracing subscriber described by `config`.
///
/// Without the `subscriber` feature this does nothing.
#[cfg(not(feature = "subscriber"))]
pub fn init_tracing_subscriber(_config: &SessionConfig) -> Result<(), Exception> {
  Ok(())
}

/// Returns a generic `SysInv` exception with the given error message.
#[cold]
#[cfg_attr(not(feature = "subscriber"), allow(dead_code))]
fn error<E>(error: E) -> Exception
where
  E: Display,
{
  Exception::new(ExceptionGroup::SysInv, error)
}
