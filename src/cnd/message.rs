use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use std::fmt::Write;
use std::rc::Rc;

use crate::cnd::Condition;
use crate::trace::Glyphs;

// -----------------------------------------------------------------------------
// Bullets
// -----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum BulletKind {
  Plain,
  Info,
  Cross,
}

impl BulletKind {
  #[inline]
  const fn glyph(&self, glyphs: &Glyphs) -> &'static str {
    match self {
      Self::Plain => glyphs.bullet,
      Self::Info => glyphs.info,
      Self::Cross => glyphs.cross,
    }
  }
}

/// One line below a message header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bullet {
  pub kind: BulletKind,
  pub text: String,
}

impl Bullet {
  #[inline]
  pub fn new<T>(kind: BulletKind, text: T) -> Self
  where
    T: Into<String>,
  {
    Self {
      kind,
      text: text.into(),
    }
  }

  /// Parses one message line, recognizing `i `, `x `, and `* ` markers.
  fn parse(line: &str) -> Self {
    if let Some(text) = line.strip_prefix("i ") {
      Self::new(BulletKind::Info, text)
    } else if let Some(text) = line.strip_prefix("x ") {
      Self::new(BulletKind::Cross, text)
    } else if let Some(text) = line.strip_prefix("* ") {
      Self::new(BulletKind::Plain, text)
    } else {
      Self::new(BulletKind::Plain, line)
    }
  }
}

// -----------------------------------------------------------------------------
// Message Text
// -----------------------------------------------------------------------------

/// A literal message split into a header line and bullets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageText {
  pub header: String,
  pub bullets: Vec<Bullet>,
}

impl MessageText {
  /// Splits `text` into its first line and bullet lines.
  pub fn parse(text: &str) -> Self {
    let mut lines: std::str::Lines<'_> = text.lines();

    Self {
      header: lines.next().unwrap_or_default().to_owned(),
      bullets: lines.map(Bullet::parse).collect(),
    }
  }

  /// Folds the header and bullets into a single display string.
  pub fn fold(&self, glyphs: &Glyphs) -> String {
    let mut output: String = self.header.clone();

    for bullet in self.bullets.iter() {
      let _ignore: std::fmt::Result = write!(output, "\n{} {}", bullet.kind.glyph(glyphs), bullet.text);
    }

    output
  }
}

// -----------------------------------------------------------------------------
// Lazy Formatting
// -----------------------------------------------------------------------------

/// Computes the message of a condition that was raised without one.
///
/// Formatters are registered per class with [`Session::register_format`];
/// any `Fn(&Condition) -> String` closure is a formatter.
///
/// [`Session::register_format`]: crate::session::Session::register_format
pub trait CndFormat {
  fn format(&self, condition: &Condition) -> String;
}

impl<F> CndFormat for F
where
  F: Fn(&Condition) -> String,
{
  #[inline]
  fn format(&self, condition: &Condition) -> String {
    self(condition)
  }
}

/// Formatter used when no class-specific one is registered.
///
/// Renders the class followed by one bullet per data field, sorted by key.
#[derive(Clone, Copy, Debug)]
pub struct DefaultFormat {
  glyphs: Glyphs,
}

impl DefaultFormat {
  #[inline]
  pub const fn new(glyphs: Glyphs) -> Self {
    Self { glyphs }
  }
}

impl CndFormat for DefaultFormat {
  fn format(&self, condition: &Condition) -> String {
    let mut output: String = format!("Condition of class `{}`.", condition.class());
    let mut keys: Vec<&String> = condition.data().keys().collect();

    keys.sort_unstable();

    for key in keys {
      if let Some(value) = condition.get(key) {
        let _ignore: std::fmt::Result = write!(output, "\n{} {key}: {value}", self.glyphs.bullet);
      }
    }

    output
  }
}

// -----------------------------------------------------------------------------
// Message
// -----------------------------------------------------------------------------

/// Message of a condition: literal text or computed on demand.
#[derive(Clone)]
pub enum Message {
  /// Folded literal text.
  Literal(String),
  /// Computed from the condition by a class formatter.
  Lazy {
    format: Option<Rc<dyn CndFormat>>,
    glyphs: Glyphs,
  },
}

impl Message {
  #[inline]
  pub const fn is_literal(&self) -> bool {
    matches!(self, Self::Literal(_))
  }
}

impl Debug for Message {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
      Self::Lazy { format, .. } => f
        .debug_struct("Lazy")
        .field("custom", &format.is_some())
        .finish_non_exhaustive(),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::cnd::Bullet;
  use crate::cnd::BulletKind;
  use crate::cnd::MessageText;
  use crate::trace::Glyphs;

  #[test]
  fn test_parse_single_line() {
    let text: MessageText = MessageText::parse("boom");

    assert_eq!(text.header, "boom");
    assert!(text.bullets.is_empty());
  }

  #[test]
  fn test_parse_markers() {
    let text: MessageText = MessageText::parse("Can't open file.\ni It is locked.\nx Permission denied.\nretry later");

    assert_eq!(text.header, "Can't open file.");
    assert_eq!(
      text.bullets,
      vec![
        Bullet::new(BulletKind::Info, "It is locked."),
        Bullet::new(BulletKind::Cross, "Permission denied."),
        Bullet::new(BulletKind::Plain, "retry later"),
      ],
    );
  }

  #[test]
  fn test_fold() {
    let text: MessageText = MessageText::parse("head\ni info\nx fail\n* note");

    assert_eq!(text.fold(&Glyphs::ASCII), "head\ni info\nx fail\n* note");
    assert_eq!(
      text.fold(&Glyphs::UNICODE),
      "head\n\u{2139} info\n\u{2716} fail\n\u{2022} note",
    );
  }
}
