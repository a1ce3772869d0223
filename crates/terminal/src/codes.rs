//! crates/terminal/src/codes.rs
//! Fixed token tables mapping color and attribute names to SGR parameters.

/// Named terminal colors.
///
/// Foreground codes are `30 + index` and background codes are `40 + index`,
/// matching the eight-color xterm palette plus the `default` slot at index 9.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Color {
    /// Index 0.
    Black,
    /// Index 1.
    Red,
    /// Index 2.
    Green,
    /// Index 3.
    Yellow,
    /// Index 4.
    Blue,
    /// Index 5.
    Magenta,
    /// Index 6.
    Cyan,
    /// Index 7.
    White,
    /// Index 9, the terminal's configured default color.
    Default,
}

impl Color {
    /// Palette index of the color.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Black => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Blue => 4,
            Self::Magenta => 5,
            Self::Cyan => 6,
            Self::White => 7,
            Self::Default => 9,
        }
    }

    /// SGR parameter selecting this color as the foreground.
    #[must_use]
    pub const fn foreground_code(self) -> u8 {
        30 + self.index()
    }

    /// SGR parameter selecting this color as the background.
    #[must_use]
    pub const fn background_code(self) -> u8 {
        40 + self.index()
    }

    /// Looks up a color by its token name.
    ///
    /// Names are matched case-insensitively. Unknown names return `None` so
    /// callers can forward platform-specific hints without failing.
    ///
    /// # Examples
    ///
    /// ```
    /// use terminal::Color;
    ///
    /// assert_eq!(Color::from_name("blue"), Some(Color::Blue));
    /// assert_eq!(Color::from_name("BLUE"), Some(Color::Blue));
    /// assert_eq!(Color::from_name("chartreuse"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "black" => Some(Self::Black),
            "red" => Some(Self::Red),
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "blue" => Some(Self::Blue),
            "magenta" => Some(Self::Magenta),
            "cyan" => Some(Self::Cyan),
            "white" => Some(Self::White),
            "default" => Some(Self::Default),
            _ => None,
        }
    }
}

/// Text attributes that can be combined with colors.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Attribute {
    /// Code 0. Resets every attribute when emitted on its own.
    Normal,
    /// Code 1. Also reachable through the `bright` token.
    Bold,
    /// Code 2.
    Faint,
    /// Code 3.
    Italic,
    /// Code 4.
    Underline,
    /// Code 5.
    Blink,
    /// Code 7.
    Reverse,
    /// Code 8.
    Hidden,
}

impl Attribute {
    /// SGR parameter for the attribute.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Bold => 1,
            Self::Faint => 2,
            Self::Italic => 3,
            Self::Underline => 4,
            Self::Blink => 5,
            Self::Reverse => 7,
            Self::Hidden => 8,
        }
    }

    /// Looks up an attribute by its token name; unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "bold" | "bright" => Some(Self::Bold),
            "faint" => Some(Self::Faint),
            "italic" => Some(Self::Italic),
            "underline" => Some(Self::Underline),
            "blink" => Some(Self::Blink),
            "reverse" => Some(Self::Reverse),
            "hidden" => Some(Self::Hidden),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreground_and_background_offsets() {
        assert_eq!(Color::Black.foreground_code(), 30);
        assert_eq!(Color::Blue.foreground_code(), 34);
        assert_eq!(Color::Default.foreground_code(), 39);
        assert_eq!(Color::Red.background_code(), 41);
        assert_eq!(Color::White.background_code(), 47);
    }

    #[test]
    fn bright_is_an_alias_for_bold() {
        assert_eq!(Attribute::from_name("bright"), Some(Attribute::Bold));
        assert_eq!(Attribute::from_name("bold"), Some(Attribute::Bold));
    }

    #[test]
    fn attribute_codes_skip_six() {
        assert_eq!(Attribute::Blink.code(), 5);
        assert_eq!(Attribute::Reverse.code(), 7);
        assert_eq!(Attribute::Hidden.code(), 8);
    }

    #[test]
    fn unknown_tokens_are_none() {
        assert_eq!(Attribute::from_name("sparkle"), None);
        assert_eq!(Color::from_name(""), None);
    }
}
