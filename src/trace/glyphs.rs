/// Glyph set used when rendering messages and backtraces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
  /// Marker for plain message bullets.
  pub bullet: &'static str,
  /// Marker for "info" message bullets.
  pub info: &'static str,
  /// Marker for "error" message bullets.
  pub cross: &'static str,
  /// Root marker of a backtrace tree.
  pub root: &'static str,
  /// Connector for a child that has later siblings.
  pub tee: &'static str,
  /// Connector for the last child.
  pub elbow: &'static str,
  /// Continuation below a child that has later siblings.
  pub pipe: &'static str,
  /// Continuation below the last child.
  pub space: &'static str,
}

impl Glyphs {
  pub const UNICODE: Self = Self {
    bullet: "\u{2022}",
    info: "\u{2139}",
    cross: "\u{2716}",
    root: "\u{2586}",
    tee: "\u{251C}\u{2500}",
    elbow: "\u{2514}\u{2500}",
    pipe: "\u{2502} ",
    space: "  ",
  };

  pub const ASCII: Self = Self {
    bullet: "*",
    info: "i",
    cross: "x",
    root: "x",
    tee: "+-",
    elbow: "\\-",
    pipe: "| ",
    space: "  ",
  };

  /// Returns the rich glyph set when `unicode` is set, plain ASCII otherwise.
  #[inline]
  pub const fn select(unicode: bool) -> Self {
    if unicode { Self::UNICODE } else { Self::ASCII }
  }
}

impl Default for Glyphs {
  #[inline]
  fn default() -> Self {
    Self::UNICODE
  }
}
