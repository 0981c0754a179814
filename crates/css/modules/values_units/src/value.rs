//! The value unit every cascade stage stores and compares.

use core::fmt;

use bitflags::bitflags;

use crate::{Color, GlobalKeyword, Keyword, Length, LengthUnit, Number, Percentage};

/// A single resolved-or-not CSS value.
///
/// `NoDeclaration` is the sentinel an attribute holds when no rule declared it,
/// so reads never have to deal with a missing slot.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    NoDeclaration,
    Keyword(Keyword),
    Length(Length),
    Percentage(Percentage),
    Number(Number),
    Color(Color),
    String(Box<str>),
}

/// Type tag of a `Value`, used by option-set validation and error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    NoDeclaration,
    Auto,
    None,
    Inherit,
    Initial,
    Unset,
    Keyword,
    Length,
    Percentage,
    Number,
    Color,
    String,
}

bitflags! {
    /// Properties of a value that matter to the cascade.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ValueFlags: u8 {
        /// The value can only be made absolute against an element's context
        /// (percentages, font- and viewport-relative lengths).
        const DEPENDS_ON_CONTEXT = 1;
        /// `inherit`, `initial` or `unset`.
        const GLOBAL_KEYWORD = 1 << 1;
    }
}

impl Value {
    pub const AUTO: Self = Self::Keyword(Keyword::Auto);
    pub const NONE: Self = Self::Keyword(Keyword::None);
    pub const INHERIT: Self = Self::Keyword(Keyword::Inherit);
    pub const INITIAL: Self = Self::Keyword(Keyword::Initial);
    pub const UNSET: Self = Self::Keyword(Keyword::Unset);

    #[inline]
    pub const fn px(value: f32) -> Self {
        Self::Length(Length::px(value))
    }

    /// `percent(50.0)` is `50%`.
    #[inline]
    pub fn percent(percent: f32) -> Self {
        Self::Percentage(Percentage::from_percent(percent))
    }

    #[inline]
    pub const fn number(value: f32) -> Self {
        Self::Number(Number(value))
    }

    #[inline]
    pub fn ident(name: &str) -> Self {
        Self::Keyword(Keyword::ident(name))
    }

    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::NoDeclaration => ValueType::NoDeclaration,
            Self::Keyword(keyword) => match keyword {
                Keyword::Auto => ValueType::Auto,
                Keyword::None => ValueType::None,
                Keyword::Inherit => ValueType::Inherit,
                Keyword::Initial => ValueType::Initial,
                Keyword::Unset => ValueType::Unset,
                Keyword::Normal | Keyword::Ident(_) => ValueType::Keyword,
            },
            Self::Length(_) => ValueType::Length,
            Self::Percentage(_) => ValueType::Percentage,
            Self::Number(_) => ValueType::Number,
            Self::Color(_) => ValueType::Color,
            Self::String(_) => ValueType::String,
        }
    }

    pub fn flags(&self) -> ValueFlags {
        match self {
            Self::Percentage(_) => ValueFlags::DEPENDS_ON_CONTEXT,
            Self::Length(length) if length.is_relative() => ValueFlags::DEPENDS_ON_CONTEXT,
            Self::Keyword(keyword) if keyword.global().is_some() => ValueFlags::GLOBAL_KEYWORD,
            Self::NoDeclaration
            | Self::Keyword(_)
            | Self::Length(_)
            | Self::Number(_)
            | Self::Color(_)
            | Self::String(_) => ValueFlags::empty(),
        }
    }

    /// False for lengths, percentages and numbers holding NaN or an infinity.
    pub const fn is_finite(&self) -> bool {
        match self {
            Self::Length(length) => length.value.is_finite(),
            Self::Percentage(percentage) => percentage.0.is_finite(),
            Self::Number(number) => number.0.is_finite(),
            Self::NoDeclaration | Self::Keyword(_) | Self::Color(_) | Self::String(_) => true,
        }
    }

    #[inline]
    pub const fn is_no_declaration(&self) -> bool {
        matches!(self, Self::NoDeclaration)
    }

    #[inline]
    pub const fn global_keyword(&self) -> Option<GlobalKeyword> {
        match self {
            Self::Keyword(keyword) => keyword.global(),
            Self::NoDeclaration
            | Self::Length(_)
            | Self::Percentage(_)
            | Self::Number(_)
            | Self::Color(_)
            | Self::String(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDeclaration => formatter.write_str("<no declaration>"),
            Self::Keyword(keyword) => keyword.fmt(formatter),
            Self::Length(length) => {
                let unit = match length.unit {
                    LengthUnit::Pixels => "px",
                    LengthUnit::Ems => "em",
                    LengthUnit::RootEms => "rem",
                    LengthUnit::ViewportWidth => "vw",
                    LengthUnit::ViewportHeight => "vh",
                };
                write!(formatter, "{}{unit}", length.value)
            }
            Self::Percentage(percentage) => write!(formatter, "{}%", percentage.0 * 100.0),
            Self::Number(number) => write!(formatter, "{}", number.0),
            Self::Color(color) => write!(
                formatter,
                "rgba({}, {}, {}, {})",
                color.red, color.green, color.blue, color.alpha
            ),
            Self::String(text) => write!(formatter, "\"{text}\""),
        }
    }
}

impl From<Keyword> for Value {
    #[inline]
    fn from(keyword: Keyword) -> Self {
        Self::Keyword(keyword)
    }
}

impl From<Length> for Value {
    #[inline]
    fn from(length: Length) -> Self {
        Self::Length(length)
    }
}

impl From<Color> for Value {
    #[inline]
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}
