use crate::cnd::ConditionBuilder;
use crate::consts;
use crate::session::Outcome;
use crate::session::Session;

impl Session {
  /// Signals that a feature is soft-deprecated.
  ///
  /// Nothing is displayed; the condition only reaches handlers for the
  /// `lifecycle_soft_deprecated` class. `id` defaults to the message.
  pub fn signal_soft_deprecated(&self, message: &str, id: Option<&str>) -> Outcome<()> {
    let builder: ConditionBuilder = ConditionBuilder::from(message)
      .class(consts::CLASS_SOFT_DEPRECATED)
      .data(consts::LIFECYCLE_ID_FIELD, id.unwrap_or(message).to_owned());

    self.signal(builder)
  }

  /// Warns that a feature is deprecated, at most once per `id` per session.
  ///
  /// `id` defaults to the message.
  pub fn warn_deprecated(&self, message: &str, id: Option<&str>) -> Outcome<()> {
    let id: &str = id.unwrap_or(message);

    if !self.warned.borrow_mut().insert(id.to_owned()) {
      tracing::trace!(target: "klaxon", id, reason = "already warned", "deprecation skipped");
      return Ok(());
    }

    let builder: ConditionBuilder = ConditionBuilder::from(message)
      .class(consts::CLASS_WARNING_DEPRECATED)
      .data(consts::LIFECYCLE_ID_FIELD, id.to_owned());

    self.raise_warning(builder)
  }

  /// Raises an error for a feature that no longer exists.
  pub fn stop_defunct<T>(&self, message: &str) -> Outcome<T> {
    let builder: ConditionBuilder = ConditionBuilder::from(message).class(consts::CLASS_ERROR_DEFUNCT);

    self.raise_error(builder)
  }
}
