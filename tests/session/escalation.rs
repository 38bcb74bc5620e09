use klaxon::cnd::Condition;
use klaxon::cnd::ConditionBuilder;
use klaxon::error::ExceptionGroup;
use klaxon::session::ErrorSink;
use klaxon::session::ExitingHandlers;
use klaxon::session::Fallback;
use klaxon::session::Outcome;
use klaxon::session::Session;
use klaxon::session::SessionConfig;
use klaxon::session::Signal;
use klaxon::session::SinkBuffer;
use klaxon::trace::CallTrace;
use klaxon::trace::Frame;

fn session(interactive: bool) -> (Session, SinkBuffer) {
  let (sink, buffer): (ErrorSink, SinkBuffer) = ErrorSink::buffer();

  let config: SessionConfig = SessionConfig {
    interactive,
    unicode: false,
    backtrace_display: None,
    sink,
    ..SessionConfig::new()
  };

  (Session::new(config), buffer)
}

fn last_error(session: &Session) -> Condition {
  match session.last_error() {
    Ok(condition) => condition,
    Err(error) => panic!("{error}"),
  }
}

fn pkg_bad(session: &Session) -> Outcome<u32> {
  session.raise_error(ConditionBuilder::from("boom").class("pkg_bad"))
}

fn sites(trace: Option<&CallTrace>) -> Vec<String> {
  trace
    .map(|trace| trace.iter().map(Frame::site).map(str::to_owned).collect())
    .unwrap_or_default()
}

#[test]
fn unhandled_error_is_written_once() {
  let (session, buffer): (Session, SinkBuffer) = session(false);

  let result: Outcome<u32> = session.top_level(|session| session.call("f()", pkg_bad));

  assert_eq!(buffer.take(), "Error: boom\nBacktrace:\n    x\n 1. \\-f()\n");

  let fallback: Option<&Fallback> = result.as_ref().err().and_then(Signal::as_abort);

  assert_eq!(fallback.map(Fallback::message), Some("boom"));
  assert_eq!(fallback.map(Fallback::printed), Some(true));

  let condition: Condition = last_error(&session);

  assert_eq!(condition.classes(), ["pkg_bad", "error"]);
  assert_eq!(condition.message(), "boom");
}

#[test]
fn error_without_frames_has_no_backtrace() {
  let (session, buffer): (Session, SinkBuffer) = session(false);

  let result: Outcome<u32> = pkg_bad(&session);

  assert!(result.is_err());
  assert_eq!(buffer.take(), "Error: boom\n");
}

#[test]
fn last_error_is_overwritten() {
  let (session, _buffer): (Session, SinkBuffer) = session(false);

  let _e1: Outcome<()> = session.raise_error("first");
  let _e2: Outcome<()> = session.raise_error("second");

  assert_eq!(last_error(&session).message(), "second");
}

#[test]
fn absorbed_error_is_not_stored() {
  let (session, buffer): (Session, SinkBuffer) = session(false);

  let _e1: Outcome<()> = session.raise_error("first");
  let _ignore: String = buffer.take();

  let result: Outcome<u32> = session.try_catch(ExitingHandlers::new().on("pkg_bad", |_, _| Ok(7)), pkg_bad);

  assert_eq!(result.ok(), Some(7));
  assert_eq!(buffer.take(), "");
  assert_eq!(last_error(&session).message(), "first");
}

#[test]
fn chained_error_renders_root_trace() {
  let (session, buffer): (Session, SinkBuffer) = session(false);

  let result: Outcome<()> = session.call("outer()", |session| {
    let rethrow: ExitingHandlers<'_, ()> = ExitingHandlers::new().on("e2", |session, e2| {
      session.raise_error(ConditionBuilder::from("e3").parent(e2))
    });

    session.try_catch(rethrow, |session| {
      let wrap: ExitingHandlers<'_, ()> = ExitingHandlers::new().on("e1", |session, e1| {
        session.raise_error(ConditionBuilder::from("e2").class("e2").parent(e1))
      });

      session.try_catch(wrap, |session| {
        session.call("a()", |session| {
          session.call("b()", |session| session.raise_error(ConditionBuilder::from("e1").class("e1")))
        })
      })
    })
  });

  assert!(result.is_err());

  let expected: &str = concat!(
    "Error: e3\n",
    "Caused by error:\n",
    "e2\n",
    "Caused by error:\n",
    "e1\n",
    "Backtrace:\n",
    "    x\n",
    " 1. \\-outer()\n",
    " 2.   \\-try_catch()\n",
    " 3.     \\-try_catch()\n",
    " 4.       \\-a()\n",
    " 5.         \\-b()\n",
  );

  assert_eq!(buffer.take(), expected);

  let e3: Condition = last_error(&session);
  let e2: Option<&Condition> = e3.parent();

  assert_eq!(sites(e2.and_then(Condition::trace)), ["outer()", "try_catch()"]);
  assert_eq!(e3.chain().count(), 3);
}

#[test]
fn invalid_display_mode_is_reset() {
  let (session, buffer): (Session, SinkBuffer) = session(false);

  session.set_backtrace_display(Some("verbose"));

  let _error: Outcome<u32> = session.call("f()", pkg_bad);

  let expected: &str = concat!(
    "Warning: Invalid backtrace display setting `verbose`, resetting to unset.\n",
    "i It must be one of `none`, `reminder`, `branch`, `collapse`, or `full`.\n",
    "Error: boom\n",
  );

  assert_eq!(buffer.take(), expected);
  assert_eq!(session.backtrace_display(), None);

  let _error: Outcome<u32> = session.call("f()", pkg_bad);

  assert!(buffer.take().contains("Backtrace:\n"));
}

#[test]
fn display_mode_none_and_branch() {
  let (session, buffer): (Session, SinkBuffer) = session(false);

  session.set_backtrace_display(Some("none"));
  let _error: Outcome<u32> = session.call("f()", pkg_bad);
  assert_eq!(buffer.take(), "Error: boom\n");

  session.set_backtrace_display(Some("branch"));
  let _error: Outcome<u32> = session.call("f()", |session| session.call("g()", pkg_bad));
  assert_eq!(buffer.take(), "Error: boom\nBacktrace:\n  1. f()\n  2. g()\n");
}

#[test]
fn interactive_error_is_left_to_the_top_level() {
  let (session, buffer): (Session, SinkBuffer) = session(true);

  let result: Outcome<u32> = session.call("f()", pkg_bad);
  let fallback: Option<&Fallback> = result.as_ref().err().and_then(Signal::as_abort);

  assert_eq!(buffer.contents(), "");
  assert_eq!(
    fallback.map(Fallback::message),
    Some("boom\nRun `last_trace()` to see where the error occurred."),
  );
  assert_eq!(fallback.map(Fallback::printed), Some(false));

  let _result: Outcome<u32> = session.top_level(|session| session.call("f()", pkg_bad));

  assert_eq!(
    buffer.take(),
    "Error: boom\nRun `last_trace()` to see where the error occurred.\n",
  );
}

#[test]
fn interactive_reminder_is_skipped_without_frames() {
  let (session, _buffer): (Session, SinkBuffer) = session(true);

  let result: Outcome<u32> = pkg_bad(&session);
  let fallback: Option<&Fallback> = result.as_ref().err().and_then(Signal::as_abort);

  assert_eq!(fallback.map(Fallback::message), Some("boom"));
}

#[test]
fn last_trace_renders_full_tree() {
  let (session, _buffer): (Session, SinkBuffer) = session(false);

  let _error: Outcome<u32> = session.call("f()", |session| session.call("g()", pkg_bad));

  let error: String = last_error(&session).to_string();
  let trace: String = match session.last_trace() {
    Ok(condition) => condition.to_string(),
    Err(error) => panic!("{error}"),
  };

  assert_eq!(error, "<error/pkg_bad>\nboom\n---\nBacktrace:\n  1. f()\n  2. g()");
  assert_eq!(
    trace,
    "<error/pkg_bad>\nboom\n---\nBacktrace:\n    x\n 1. \\-f()\n 2.   \\-g()",
  );
}

#[test]
fn invalid_condition_is_fatal() {
  let (session, buffer): (Session, SinkBuffer) = session(false);

  let result: Outcome<()> = session.top_level(|session| {
    session.try_catch(ExitingHandlers::new().on("condition", |_, _| Ok(())), |session| {
      session.raise_error(ConditionBuilder::new())
    })
  });

  let group: Option<ExceptionGroup> = result
    .as_ref()
    .err()
    .and_then(Signal::as_fatal)
    .map(|error| error.group());

  assert_eq!(group, Some(ExceptionGroup::InvalidCondition));
  assert!(buffer.take().starts_with("Error: [klaxon] invalid_condition: "));
  assert!(session.last_error().is_err());
}

#[test]
fn warnings_and_messages_are_displayed() {
  let (session, buffer): (Session, SinkBuffer) = session(false);

  let result: Outcome<()> = session.call("f()", |session| {
    session.raise_warning("careful")?;
    session.raise_message("hello\ni details")?;
    Ok(())
  });

  assert!(result.is_ok());
  assert_eq!(buffer.take(), "Warning: careful\nhello\ni details\n");
  assert!(session.last_error().is_err());
}
