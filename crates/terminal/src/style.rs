//! crates/terminal/src/style.rs
//! Symbolic style descriptors and their SGR encoding.

use std::fmt::Write as _;

use crate::codes::{Attribute, Color};

/// Control sequence introducer for SGR sequences.
pub const CSI: &str = "\x1b[";

/// Sequence restoring the terminal's default rendition.
pub const RESET: &str = "\x1b[0m";

/// An ordered, deduplicated set of style tokens.
///
/// A style holds at most one foreground color, at most one background color,
/// and any number of attributes in the order they were supplied. Attributes
/// that map to the same SGR code (for example `bold` and `bright`) are kept
/// only once, so two styles that would emit the same parameters compare equal
/// and encode to byte-identical sequences.
///
/// # Examples
///
/// ```
/// use terminal::{Attribute, Color, Style};
///
/// let style = Style::new()
///     .foreground(Color::Blue)
///     .attribute(Attribute::Underline)
///     .attribute(Attribute::Bold);
/// assert_eq!(style.encode(), "\x1b[34;4;1m");
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Style {
    foreground: Option<Color>,
    background: Option<Color>,
    attributes: Vec<Attribute>,
}

impl Style {
    /// Creates an empty style that encodes to an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            foreground: None,
            background: None,
            attributes: Vec::new(),
        }
    }

    /// Builds a style from symbolic tokens.
    ///
    /// Unknown color or attribute names are ignored rather than rejected.
    ///
    /// ```
    /// use terminal::Style;
    ///
    /// let style = Style::from_tokens(Some("blue"), None, &["underline", "bold"]);
    /// assert_eq!(style.encode(), "\x1b[34;4;1m");
    ///
    /// let hinted = Style::from_tokens(Some("blue"), Some("mauve"), &["shimmer"]);
    /// assert_eq!(hinted.encode(), "\x1b[34m");
    /// ```
    pub fn from_tokens(
        foreground: Option<&str>,
        background: Option<&str>,
        attributes: &[&str],
    ) -> Self {
        let mut style = Self {
            foreground: foreground.and_then(Color::from_name),
            background: background.and_then(Color::from_name),
            attributes: Vec::with_capacity(attributes.len()),
        };
        for attribute in attributes.iter().filter_map(|name| Attribute::from_name(name)) {
            style = style.attribute(attribute);
        }
        style
    }

    /// Sets the foreground color.
    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Sets the background color.
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Appends an attribute unless one with the same code is already present.
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        if !self.attributes.iter().any(|existing| existing.code() == attribute.code()) {
            self.attributes.push(attribute);
        }
        self
    }

    /// Returns the foreground color, if any.
    #[must_use]
    pub const fn foreground_color(&self) -> Option<Color> {
        self.foreground
    }

    /// Returns the background color, if any.
    #[must_use]
    pub const fn background_color(&self) -> Option<Color> {
        self.background
    }

    /// Returns the attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Reports whether the style carries no tokens at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foreground.is_none() && self.background.is_none() && self.attributes.is_empty()
    }

    /// SGR parameters in emission order: foreground, background, attributes.
    #[must_use]
    pub fn codes(&self) -> Vec<u8> {
        let mut codes = Vec::with_capacity(2 + self.attributes.len());
        codes.extend(self.foreground.map(Color::foreground_code));
        codes.extend(self.background.map(Color::background_code));
        codes.extend(self.attributes.iter().map(|attribute| attribute.code()));
        codes
    }

    /// Encodes the style as a single `ESC [ params m` sequence.
    ///
    /// An empty style produces an empty string so that concatenating it with
    /// text never introduces stray control bytes.
    #[must_use]
    pub fn encode(&self) -> String {
        let codes = self.codes();
        if codes.is_empty() {
            return String::new();
        }

        let mut sequence = String::with_capacity(CSI.len() + codes.len() * 3 + 1);
        sequence.push_str(CSI);
        for (index, code) in codes.iter().enumerate() {
            if index > 0 {
                sequence.push(';');
            }
            // Writing into a String cannot fail.
            let _ = write!(sequence, "{code}");
        }
        sequence.push('m');
        sequence
    }
}
