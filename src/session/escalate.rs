use std::rc::Rc;

use crate::cnd::Condition;
use crate::cnd::ConditionBuilder;
use crate::error::Exception;
use crate::session::Fallback;
use crate::session::Outcome;
use crate::session::Session;
use crate::session::Signal;
use crate::trace::DisplayMode;

/// Class of the warning raised for an unrecognized display setting.
const CLASS_INVALID_DISPLAY: &str = "klaxon_invalid_display_mode";

impl Session {
  /// Records an error that escaped every handler and produces the fallback
  /// error that terminates the evaluation.
  ///
  /// Outside interactive sessions the error is written to the sink right
  /// away and the fallback is marked as printed, so the top level never
  /// shows it twice.
  pub(crate) fn escape(&self, condition: Condition) -> Signal {
    let condition: Rc<Condition> = Rc::new(condition);

    self.store.set(Rc::clone(&condition));

    let message: String = condition.full_message();

    let backtrace: Option<(DisplayMode, String)> = match self.format_backtrace(&condition) {
      Ok(backtrace) => backtrace,
      Err(signal) => return signal,
    };

    tracing::debug!(
      target: "klaxon",
      class = condition.class(),
      interactive = self.config.interactive,
      backtrace = backtrace.as_ref().map(|(mode, _)| mode.as_str()),
      "escape",
    );

    if self.config.interactive {
      let text: String = match backtrace {
        None => message,
        Some((DisplayMode::Reminder, reminder)) => format!("{message}\n{reminder}"),
        Some((_, backtrace)) => format!("{message}\nBacktrace:\n{backtrace}"),
      };

      return Signal::Abort(Fallback::new(text, false));
    }

    let mut output: String = format!("Error: {message}\n");

    if let Some((_, backtrace)) = backtrace {
      output.push_str("Backtrace:\n");
      output.push_str(&backtrace);
      output.push('\n');
    }

    self.config.sink.write(&output);

    Signal::Abort(Fallback::new(message, true))
  }

  /// Renders the backtrace shown with an escaped error.
  ///
  /// The trace of the oldest ancestor carrying one is rendered.
  pub(crate) fn format_backtrace(&self, condition: &Condition) -> Outcome<Option<(DisplayMode, String)>> {
    let Some(mode) = self.display_mode()? else {
      return Ok(None);
    };

    let Some(trace) = condition.root_trace() else {
      return Ok(None);
    };

    let text: Option<String> = self.config.formatter().render(trace, mode, self.config.interactive);

    Ok(text.map(|text| (mode, text)))
  }

  /// Resolves the display setting.
  ///
  /// An unrecognized setting is reset to unset and reported with a warning;
  /// nothing is rendered for the error at hand.
  fn display_mode(&self) -> Outcome<Option<DisplayMode>> {
    let setting: Option<String> = self.display.borrow().clone();

    let Some(setting) = setting else {
      return Ok(Some(DisplayMode::fallback(self.config.interactive)));
    };

    let error: Exception = match setting.parse::<DisplayMode>() {
      Ok(mode) => return Ok(Some(mode)),
      Err(error) => error,
    };

    *self.display.borrow_mut() = None;

    tracing::warn!(
      target: "klaxon",
      setting = setting.as_str(),
      error = error.error(),
      "resetting backtrace display",
    );

    let warning: ConditionBuilder = ConditionBuilder::from(format!(
      "Invalid backtrace display setting `{setting}`, resetting to unset."
    ))
    .class(CLASS_INVALID_DISPLAY)
    .info("It must be one of `none`, `reminder`, `branch`, `collapse`, or `full`.");

    self.raise_warning(warning)?;

    Ok(None)
  }
}
