//! CSS Values and Units — the value units the style engine resolves.
//! Reference: <https://www.w3.org/TR/css-values-3/>
//!
//! Values arrive here already built by the tokenizer/parser layer; this crate
//! never reads CSS text. It only gives every value a comparable shape, a type
//! tag for validation, and the flags the cascade needs.

#![forbid(unsafe_code)]

// Per-chapter modules mirroring the css-values table of contents.
pub mod chapter_3_identifiers;
pub mod chapter_4_numbers;
pub mod chapter_5_percentages;
pub mod chapter_6_dimensions;
pub mod chapter_9_colors;
mod list;
mod value;

// Re-exports for ergonomic access from other crates.
pub use chapter_3_identifiers::{GlobalKeyword, Keyword};
pub use chapter_4_numbers::Number;
pub use chapter_5_percentages::Percentage;
pub use chapter_6_dimensions::{Length, LengthUnit, Viewport, compute_length_px};
pub use chapter_9_colors::Color;
pub use list::ValueList;
pub use value::{Value, ValueFlags, ValueType};
