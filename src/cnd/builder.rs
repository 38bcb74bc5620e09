use hashbrown::HashMap;
use std::rc::Rc;

use crate::cnd::Bullet;
use crate::cnd::BulletKind;
use crate::cnd::CndFormat;
use crate::cnd::CndKind;
use crate::cnd::Condition;
use crate::cnd::Message;
use crate::cnd::MessageText;
use crate::core::Item;
use crate::core::Value;
use crate::error::Exception;
use crate::error::ExceptionGroup;
use crate::trace::CallTrace;
use crate::trace::Glyphs;

/// Validating constructor for [`Condition`]s.
///
/// Builders are what the raise entry points accept; `&str` and `String`
/// convert into a builder carrying that message.
///
/// # Examples
///
/// ```
/// use klaxon::cnd::ConditionBuilder;
///
/// let condition = ConditionBuilder::from("Can't find file.")
///   .class("pkg_missing")
///   .info("Did you mean `data.csv`?")
///   .data("path", "data.cvs")
///   .build()
///   .unwrap();
///
/// assert_eq!(condition.classes(), ["pkg_missing", "error"]);
/// ```
#[derive(Clone, Debug)]
pub struct ConditionBuilder {
  kind: CndKind,
  message: Option<String>,
  bullets: Vec<Bullet>,
  classes: Vec<String>,
  data: Vec<(String, Value)>,
  trace: Option<CallTrace>,
  parent: Option<Rc<Condition>>,
}

impl ConditionBuilder {
  /// Creates an empty builder for an error condition.
  #[inline]
  pub const fn new() -> Self {
    Self {
      kind: CndKind::Error,
      message: None,
      bullets: Vec::new(),
      classes: Vec::new(),
      data: Vec::new(),
      trace: None,
      parent: None,
    }
  }

  #[inline]
  pub fn message<T>(mut self, message: T) -> Self
  where
    T: Into<String>,
  {
    self.message = Some(message.into());
    self
  }

  #[inline]
  pub const fn kind(mut self, kind: CndKind) -> Self {
    self.kind = kind;
    self
  }

  #[inline]
  pub(crate) const fn get_kind(&self) -> CndKind {
    self.kind
  }

  /// Appends a class, less specific than the ones already added.
  #[inline]
  pub fn class<T>(mut self, class: T) -> Self
  where
    T: Into<String>,
  {
    self.classes.push(class.into());
    self
  }

  #[inline]
  pub fn classes<I, T>(mut self, classes: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    self.classes.extend(classes.into_iter().map(Into::into));
    self
  }

  #[inline]
  pub fn bullet<T>(mut self, text: T) -> Self
  where
    T: Into<String>,
  {
    self.bullets.push(Bullet::new(BulletKind::Plain, text));
    self
  }

  #[inline]
  pub fn info<T>(mut self, text: T) -> Self
  where
    T: Into<String>,
  {
    self.bullets.push(Bullet::new(BulletKind::Info, text));
    self
  }

  #[inline]
  pub fn cross<T>(mut self, text: T) -> Self
  where
    T: Into<String>,
  {
    self.bullets.push(Bullet::new(BulletKind::Cross, text));
    self
  }

  /// Adds a data field. A later field with the same key wins.
  #[inline]
  pub fn data<K, V>(self, key: K, value: V) -> Self
  where
    K: Into<String>,
    V: Item,
  {
    self.value(key, Value::new(value))
  }

  /// Adds a pre-built data field. A later field with the same key wins.
  #[inline]
  pub fn value<K>(mut self, key: K, value: Value) -> Self
  where
    K: Into<String>,
  {
    self.data.push((key.into(), value));
    self
  }

  /// Supplies a trace, disabling capture at raise time.
  #[inline]
  pub fn trace(mut self, trace: CallTrace) -> Self {
    self.trace = Some(trace);
    self
  }

  /// Chains this condition to the one being handled.
  #[inline]
  pub fn parent<T>(mut self, parent: T) -> Self
  where
    T: Into<Rc<Condition>>,
  {
    self.parent = Some(parent.into());
    self
  }

  #[inline]
  pub(crate) fn has_parent(&self) -> bool {
    self.parent.is_some()
  }

  /// Builds the condition with rich glyphs and the default lazy formatter.
  #[inline]
  pub fn build(self) -> Result<Condition, Exception> {
    self.build_with(Glyphs::UNICODE, &HashMap::new())
  }

  /// Builds the condition.
  ///
  /// Fails with [`InvalidCondition`] when the builder has neither message
  /// text nor a class. Without message text (an empty message counts as
  /// none) the message is computed lazily by the formatter registered in
  /// `formats` for the most specific class that has one.
  ///
  /// [`InvalidCondition`]: ExceptionGroup::InvalidCondition
  pub fn build_with(
    self,
    glyphs: Glyphs,
    formats: &HashMap<String, Rc<dyn CndFormat>>,
  ) -> Result<Condition, Exception> {
    let text: Option<MessageText> = match self.message {
      Some(message) => Some(MessageText::parse(&message)),
      None if self.bullets.is_empty() => None,
      None => Some(MessageText::default()),
    };

    let text: Option<MessageText> = text
      .map(|mut text| {
        text.bullets.extend(self.bullets);
        text
      })
      .filter(|text| !text.header.is_empty() || !text.bullets.is_empty());

    if text.is_none() && self.classes.is_empty() {
      return Err(Exception::new(
        ExceptionGroup::InvalidCondition,
        "a condition needs a message or a class",
      ));
    }

    let message: Message = match text {
      Some(text) => Message::Literal(text.fold(&glyphs)),
      None => Message::Lazy {
        format: self.classes.iter().find_map(|class| formats.get(class)).cloned(),
        glyphs,
      },
    };

    let mut classes: Vec<String> = self.classes;
    let base: &str = self.kind.base_class();

    if classes.last().is_none_or(|class| class != base) {
      classes.push(base.to_owned());
    }

    let mut data: HashMap<String, Value> = HashMap::with_capacity(self.data.len());

    for (key, value) in self.data {
      data.insert(key, value);
    }

    Ok(Condition {
      kind: self.kind,
      classes,
      message,
      data,
      trace: self.trace.map(Rc::new),
      parent: self.parent,
      view: None,
    })
  }
}

impl Default for ConditionBuilder {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl From<&str> for ConditionBuilder {
  #[inline]
  fn from(other: &str) -> Self {
    Self::new().message(other)
  }
}

impl From<String> for ConditionBuilder {
  #[inline]
  fn from(other: String) -> Self {
    Self::new().message(other)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
