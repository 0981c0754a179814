//! CSS identifiers and keywords.
//! Reference: <https://www.w3.org/TR/css-values-3/#keywords>

use core::fmt;

/// A keyword value. Identifiers that only mean something to one attribute
/// are carried as `Ident`, lowercased by the parser.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Auto,
    None,
    Normal,
    /// css-cascade-4 §7.3 — explicit inheritance.
    Inherit,
    /// css-cascade-4 §7.2 — explicit defaulting to the initial value.
    Initial,
    /// css-cascade-4 §7.4 — `inherit` for inherited attributes, `initial` otherwise.
    Unset,
    Ident(Box<str>),
}

impl Keyword {
    /// Build an attribute-specific identifier keyword.
    #[inline]
    pub fn ident(name: &str) -> Self {
        Self::Ident(name.to_ascii_lowercase().into_boxed_str())
    }

    /// The CSS-wide keyword this is, if any.
    #[inline]
    pub const fn global(&self) -> Option<GlobalKeyword> {
        match self {
            Self::Inherit => Some(GlobalKeyword::Inherit),
            Self::Initial => Some(GlobalKeyword::Initial),
            Self::Unset => Some(GlobalKeyword::Unset),
            Self::Auto | Self::None | Self::Normal | Self::Ident(_) => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::Normal => "normal",
            Self::Inherit => "inherit",
            Self::Initial => "initial",
            Self::Unset => "unset",
            Self::Ident(name) => name,
        };
        formatter.write_str(text)
    }
}

/// The CSS-wide keywords every attribute accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlobalKeyword {
    Inherit,
    Initial,
    Unset,
}
