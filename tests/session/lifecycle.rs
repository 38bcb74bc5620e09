use klaxon::cnd::CndKind;
use klaxon::cnd::Condition;
use klaxon::consts;
use klaxon::core::Value;
use klaxon::init;
use klaxon::session::Action;
use klaxon::session::CallingHandlers;
use klaxon::session::ErrorSink;
use klaxon::session::ExitingHandlers;
use klaxon::session::Outcome;
use klaxon::session::Session;
use klaxon::session::SessionConfig;
use klaxon::session::SinkBuffer;
use std::cell::RefCell;
use std::rc::Rc;

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

#[test]
fn deprecation_warning_is_shown_once_per_id() {
  let (session, buffer): (Session, SinkBuffer) = session();

  for _ in 0..3 {
    let result: Outcome<()> = session.warn_deprecated("`old()` is deprecated.", None);
    assert!(result.is_ok());
  }

  let _other: Outcome<()> = session.warn_deprecated("`older()` is deprecated.", Some("older"));
  let _again: Outcome<()> = session.warn_deprecated("`older()` is still deprecated.", Some("older"));

  assert_eq!(
    buffer.take(),
    "Warning: `old()` is deprecated.\nWarning: `older()` is deprecated.\n",
  );
}

#[test]
fn soft_deprecation_only_reaches_handlers() {
  let (session, buffer): (Session, SinkBuffer) = session();
  let seen: Rc<RefCell<Vec<String>>> = Rc::default();
  let log: Rc<RefCell<Vec<String>>> = Rc::clone(&seen);

  let silent: Outcome<()> = session.signal_soft_deprecated("`old()` is soft-deprecated.", None);

  assert!(silent.is_ok());
  assert_eq!(buffer.contents(), "");

  let handlers: CallingHandlers = CallingHandlers::new().on(consts::CLASS_SOFT_DEPRECATED, move |_, condition| {
    let id: Option<&str> = condition.get(consts::LIFECYCLE_ID_FIELD).and_then(Value::as_str);
    log.borrow_mut().push(id.unwrap_or_default().to_owned());
    Ok(Action::Continue)
  });

  let result: Outcome<()> = session.with_calling_handlers(handlers, |session| {
    session.signal_soft_deprecated("`old()` is soft-deprecated.", Some("old"))
  });

  assert!(result.is_ok());
  assert_eq!(*seen.borrow(), ["old"]);
  assert_eq!(buffer.contents(), "");
}

#[test]
fn defunct_feature_is_an_error() {
  let (session, buffer): (Session, SinkBuffer) = session();

  let result: Outcome<Condition> = session.try_catch(
    ExitingHandlers::new().on(consts::CLASS_ERROR_DEFUNCT, |_, condition: Condition| Ok(condition)),
    |session| session.stop_defunct("`gone()` was removed."),
  );

  let condition: Condition = match result {
    Ok(condition) => condition,
    Err(signal) => panic!("{signal}"),
  };

  assert_eq!(condition.kind(), CndKind::Error);
  assert_eq!(condition.classes(), [consts::CLASS_ERROR_DEFUNCT, "error"]);
  assert_eq!(buffer.contents(), "");

  let _error: Outcome<()> = session.stop_defunct("`gone()` was removed.");

  assert_eq!(buffer.take(), "Error: `gone()` was removed.\n");
}

#[test]
fn kind_labels_and_base_classes() {
  let kinds: [CndKind; 5] = [
    CndKind::Condition,
    CndKind::Message,
    CndKind::Warning,
    CndKind::Error,
    CndKind::Interrupt,
  ];

  let labels: Vec<String> = kinds.iter().map(ToString::to_string).collect();
  let bases: Vec<&str> = kinds.iter().map(CndKind::base_class).collect();

  assert_eq!(labels, ["condition", "message", "warning", "error", "interrupt"]);
  assert_eq!(bases, ["condition", "message", "warning", "error", "condition"]);
}

#[test]
fn started_session_is_usable() {
  let (sink, buffer): (ErrorSink, SinkBuffer) = ErrorSink::buffer();

  let session: Session = init::start(SessionConfig {
    interactive: false,
    sink,
    ..SessionConfig::new()
  });

  let result: Outcome<()> = session.raise_message("ready");

  assert!(result.is_ok());
  assert_eq!(buffer.take(), "ready\n");
}
