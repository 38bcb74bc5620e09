use klaxon::cnd::Condition;
use klaxon::cnd::ConditionBuilder;
use klaxon::error::ExceptionGroup;
use klaxon::session::Action;
use klaxon::session::CallingHandlers;
use klaxon::session::ErrorSink;
use klaxon::session::ExitingHandlers;
use klaxon::session::Outcome;
use klaxon::session::Session;
use klaxon::session::SessionConfig;
use klaxon::session::Signal;
use klaxon::session::SinkBuffer;
use klaxon::trace::Frame;
use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn session() -> (Session, SinkBuffer) {
  let (sink, buffer): (ErrorSink, SinkBuffer) = ErrorSink::buffer();

  let config: SessionConfig = SessionConfig {
    interactive: false,
    unicode: false,
    backtrace_display: None,
    sink,
    ..SessionConfig::new()
  };

  (Session::new(config), buffer)
}

fn record(log: &Log, entry: &'static str, action: Action) -> CallingHandlers {
  let log: Log = Rc::clone(log);

  CallingHandlers::new().on("condition", move |_, _| {
    log.borrow_mut().push(entry.to_owned());
    Ok(action)
  })
}

fn sites(condition: &Condition) -> Vec<String> {
  condition
    .trace()
    .map(|trace| trace.iter().map(Frame::site).map(str::to_owned).collect())
    .unwrap_or_default()
}

#[test]
fn exiting_handler_value_replaces_the_body() {
  let (session, buffer): (Session, SinkBuffer) = session();
  let reached: Cell<bool> = Cell::new(false);

  let result: Outcome<&str> = session.try_catch(
    ExitingHandlers::new().on("pkg_bad", |_, condition: Condition| {
      assert_eq!(condition.message(), "boom");
      Ok("handled")
    }),
    |session| {
      session.raise_error::<(), _>(ConditionBuilder::from("boom").class("pkg_bad"))?;
      reached.set(true);
      Ok("normal")
    },
  );

  assert_eq!(result.ok(), Some("handled"));
  assert!(!reached.get());
  assert_eq!(buffer.contents(), "");
  assert!(session.last_error().is_err());
}

#[test]
fn first_matching_exiting_handler_wins() {
  let (session, _buffer): (Session, SinkBuffer) = session();

  let handlers: ExitingHandlers<'_, u8> = ExitingHandlers::new()
    .on("warning", |_, _| Ok(1))
    .on("pkg_bad", |_, _| Ok(2))
    .on("error", |_, _| Ok(3));

  let result: Outcome<u8> = session.try_catch(handlers, |session| {
    session.raise_error(ConditionBuilder::from("boom").class("pkg_bad"))
  });

  assert_eq!(result.ok(), Some(2));
}

#[test]
fn unmatched_exiting_handler_lets_the_error_through() {
  let (session, buffer): (Session, SinkBuffer) = session();

  let result: Outcome<u8> = session.try_catch(ExitingHandlers::new().on("other", |_, _| Ok(1)), |session| {
    session.raise_error(ConditionBuilder::from("boom").class("pkg_bad"))
  });

  assert!(matches!(result, Err(Signal::Abort(_))));
  assert_eq!(buffer.take(), "Error: boom\nBacktrace:\n    x\n 1. \\-try_catch()\n");
}

#[test]
fn handlers_run_innermost_first() {
  let (session, _buffer): (Session, SinkBuffer) = session();
  let log: Log = Log::default();

  let result: Outcome<()> = session.with_calling_handlers(record(&log, "outer", Action::Continue), |session| {
    session.with_calling_handlers(record(&log, "inner", Action::Continue), |session| {
      session.signal(ConditionBuilder::new().class("ping"))
    })
  });

  assert!(result.is_ok());
  assert_eq!(*log.borrow(), ["inner", "outer"]);
}

#[test]
fn calling_handlers_run_before_outer_exiting_handler() {
  let (session, _buffer): (Session, SinkBuffer) = session();
  let log: Log = Log::default();

  let result: Outcome<&str> = session.try_catch(ExitingHandlers::new().on("error", |_, _| Ok("caught")), |session| {
    session.with_calling_handlers(record(&log, "calling", Action::Continue), |session| {
      session.raise_error(ConditionBuilder::from("boom"))
    })
  });

  assert_eq!(result.ok(), Some("caught"));
  assert_eq!(*log.borrow(), ["calling"]);
}

#[test]
fn inner_exiting_handler_hides_outer_calling_handler() {
  let (session, _buffer): (Session, SinkBuffer) = session();
  let log: Log = Log::default();

  let result: Outcome<&str> = session.with_calling_handlers(record(&log, "calling", Action::Continue), |session| {
    session.try_catch(ExitingHandlers::new().on("error", |_, _| Ok("caught")), |session| {
      session.raise_error(ConditionBuilder::from("boom"))
    })
  });

  assert_eq!(result.ok(), Some("caught"));
  assert!(log.borrow().is_empty());
}

#[test]
fn muffled_warning_is_not_displayed() {
  let (session, buffer): (Session, SinkBuffer) = session();

  let handlers: CallingHandlers = CallingHandlers::new().on("warning", |_, _| Ok(Action::Muffle));

  let result: Outcome<()> = session.with_calling_handlers(handlers, |session| {
    session.raise_warning("quiet")?;
    session.raise_message("loud")
  });

  assert!(result.is_ok());
  assert_eq!(buffer.take(), "loud\n");
}

#[test]
fn muffling_an_error_is_a_usage_error() {
  let (session, _buffer): (Session, SinkBuffer) = session();

  let handlers: CallingHandlers = CallingHandlers::new().on("error", |_, _| Ok(Action::Muffle));

  let result: Outcome<()> = session.with_calling_handlers(handlers, |session| session.raise_error("boom"));

  let group: Option<ExceptionGroup> = result
    .as_ref()
    .err()
    .and_then(Signal::as_fatal)
    .map(|error| error.group());

  assert_eq!(group, Some(ExceptionGroup::InvalidRestart));
}

#[test]
fn interrupt_can_only_be_resumed() {
  let (session, _buffer): (Session, SinkBuffer) = session();

  let caught: Outcome<()> = session.try_catch(ExitingHandlers::new().on("interrupt", |_, _| Ok(())), |session| {
    session.raise_interrupt()
  });

  assert!(matches!(caught, Err(Signal::Interrupt(_))));

  let handlers: CallingHandlers = CallingHandlers::new().on("interrupt", |_, condition| {
    assert_eq!(condition.classes(), ["interrupt", "condition"]);
    assert!(condition.trace().is_none());
    Ok(Action::Resume)
  });

  let resumed: Outcome<()> = session.with_calling_handlers(handlers, |session| session.raise_interrupt());

  assert!(resumed.is_ok());
}

#[test]
fn handler_does_not_see_its_own_signals() {
  let (session, buffer): (Session, SinkBuffer) = session();
  let calls: Rc<Cell<u32>> = Rc::new(Cell::new(0));
  let counter: Rc<Cell<u32>> = Rc::clone(&calls);

  let handlers: CallingHandlers = CallingHandlers::new().on("warning", move |session, condition| {
    counter.set(counter.get() + 1);
    session.raise_warning(format!("while handling: {}", condition.message()))?;
    Ok(Action::Muffle)
  });

  let result: Outcome<()> = session.with_calling_handlers(handlers, |session| session.raise_warning("first"));

  assert!(result.is_ok());
  assert_eq!(calls.get(), 1);
  assert_eq!(buffer.take(), "Warning: while handling: first\n");
}

#[test]
fn rethrow_from_calling_handler_drops_dispatch_frames() {
  let (session, _buffer): (Session, SinkBuffer) = session();

  let rethrow: CallingHandlers = CallingHandlers::new().on("e1", |session, e1| {
    session.raise_error(ConditionBuilder::from("e2").class("e2").parent(e1.clone()))
  });

  let result: Outcome<Condition> = session.try_catch(ExitingHandlers::new().on("e2", |_, e2| Ok(e2)), |session| {
    session.with_calling_handlers(rethrow, |session| {
      session.call("f()", |session| session.raise_error(ConditionBuilder::from("e1").class("e1")))
    })
  });

  let e2: Condition = match result {
    Ok(condition) => condition,
    Err(signal) => panic!("{signal}"),
  };

  let e1: Option<&Condition> = e2.parent();

  assert_eq!(sites(&e2), ["try_catch()", "with_calling_handlers()", "f()"]);
  assert_eq!(e1.map(sites), Some(sites(&e2)));
}

#[test]
fn condition_class_matches_everything() {
  let (session, _buffer): (Session, SinkBuffer) = session();

  let result: Outcome<String> = session.try_catch(
    ExitingHandlers::new().on("condition", |_, condition: Condition| Ok(condition.class().to_owned())),
    |session| session.raise_error(ConditionBuilder::from("boom").class("pkg_bad")),
  );

  assert_eq!(result.ok().as_deref(), Some("pkg_bad"));
}

#[test]
fn plain_signal_is_silent_unless_caught() {
  let (session, buffer): (Session, SinkBuffer) = session();

  let silent: Outcome<()> = session.signal(ConditionBuilder::from("tick").class("pkg_tick"));

  assert!(silent.is_ok());
  assert_eq!(buffer.contents(), "");

  let caught: Outcome<u8> = session.try_catch(ExitingHandlers::new().on("pkg_tick", |_, _| Ok(1)), |session| {
    session.signal(ConditionBuilder::new().class("pkg_tick"))?;
    Ok(0)
  });

  assert_eq!(caught.ok(), Some(1));
}

#[test]
fn registered_format_computes_lazy_message() {
  let (session, buffer): (Session, SinkBuffer) = session();

  session.register_format("pkg_missing", |condition: &Condition| {
    let path: String = condition.get("path").map(ToString::to_string).unwrap_or_default();
    format!("Can't find `{path}`.")
  });

  let _error: Outcome<()> = session.raise_error(ConditionBuilder::new().class("pkg_missing").data("path", "data.csv"));
  let _error: Outcome<()> = session.raise_error(ConditionBuilder::new().class("pkg_other").data("n", 3_i32));

  assert_eq!(
    buffer.take(),
    "Error: Can't find `data.csv`.\nError: Condition of class `pkg_other`.\n* n: 3\n",
  );
}

#[test]
fn empty_message_falls_back_to_class_format() {
  let (session, buffer): (Session, SinkBuffer) = session();

  session.register_format("pkg_error", |_: &Condition| String::from("package failure"));

  let _error: Outcome<()> = session.raise_error(ConditionBuilder::new().classes(["pkg_missing", "pkg_error"]));
  let _error: Outcome<()> = session.raise_error(ConditionBuilder::from("").class("pkg_error"));

  assert_eq!(buffer.take(), "Error: package failure\nError: package failure\n");
}
