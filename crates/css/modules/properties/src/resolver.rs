//! Stage resolution strategies.
//!
//! Each derivation stage of an attribute applies one [`Resolver`]. The set of
//! strategies is closed; attribute-specific formulas that the engine does not
//! know about plug in through [`Resolver::Formula`] as plain function pointers.

use core::fmt;

use css_values_units::{Length, Percentage, Value, Viewport, compute_length_px};
use log::trace;

use crate::ResolverError;

/// An externally supplied resolution formula.
pub type ResolveFn = fn(&Value, &ResolveContext) -> Result<Value, ResolverError>;

/// What the element layer knows about an element when its values resolve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolveContext {
    /// Font size used for `em` and font-relative percentages.
    pub font_size_px: f32,
    pub root_font_size_px: f32,
    pub viewport: Option<Viewport>,
    /// Containing block (width, height), once layout has one.
    pub containing_block: Option<(f32, f32)>,
    pub device_pixel_ratio: f32,
}

impl ResolveContext {
    pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

    #[inline]
    #[must_use]
    pub const fn with_containing_block(mut self, width: f32, height: f32) -> Self {
        self.containing_block = Some((width, height));
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_font_size(mut self, font_size_px: f32) -> Self {
        self.font_size_px = font_size_px;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self {
            font_size_px: Self::DEFAULT_FONT_SIZE_PX,
            root_font_size_px: Self::DEFAULT_FONT_SIZE_PX,
            viewport: None,
            containing_block: None,
            device_pixel_ratio: 1.0,
        }
    }
}

/// Which length a percentage is taken of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PercentageBasis {
    ContainingBlockWidth,
    ContainingBlockHeight,
    FontSize,
}

/// Resolution strategy for one derivation stage.
#[derive(Clone, Copy, Default)]
pub enum Resolver {
    /// Hand the previous stage through unchanged.
    #[default]
    PassThrough,
    /// Convert lengths to pixels; everything else passes through.
    AbsoluteLength,
    /// Resolve percentages against a basis, and lengths to pixels.
    Percentage(PercentageBasis),
    /// Round pixel lengths to whole device pixels.
    SnapToDevicePixels,
    /// Attribute-specific formula supplied by the definition.
    Formula(ResolveFn),
}

impl Resolver {
    /// Short name used in logs and errors.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PassThrough => "pass-through",
            Self::AbsoluteLength => "absolute-length",
            Self::Percentage(_) => "percentage",
            Self::SnapToDevicePixels => "device-pixel-snap",
            Self::Formula(_) => "formula",
        }
    }

    /// Apply the strategy to one value.
    ///
    /// # Errors
    /// Returns `ResolverError::MissingContext` when the context lacks a basis the
    /// value needs, `ResolverError::InvalidResult` when the outcome is the
    /// no-declaration sentinel or a CSS-wide keyword, and whatever a formula
    /// reports.
    pub fn resolve(&self, value: &Value, context: &ResolveContext) -> Result<Value, ResolverError> {
        let resolved = match self {
            Self::PassThrough => value.clone(),
            Self::AbsoluteLength => absolute_length(value, context, self.name())?,
            Self::Percentage(basis) => match value {
                Value::Percentage(percentage) => {
                    Value::px(resolve_percentage(*percentage, *basis, context)?)
                }
                other => absolute_length(other, context, self.name())?,
            },
            Self::SnapToDevicePixels => match value {
                Value::Length(length) if !length.is_relative() => {
                    Value::px(snap(length.value, context.device_pixel_ratio))
                }
                other => other.clone(),
            },
            Self::Formula(formula) => formula(value, context)?,
        };
        trace!(target: "css_properties", "{}: {value} -> {resolved}", self.name());
        self.check_output(resolved)
    }

    /// A stage never produces something that still needs the cascade.
    fn check_output(&self, resolved: Value) -> Result<Value, ResolverError> {
        if resolved.is_no_declaration() || resolved.global_keyword().is_some() {
            return Err(ResolverError::InvalidResult {
                resolver: self.name(),
                value_type: resolved.value_type(),
            });
        }
        Ok(resolved)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage(basis) => write!(formatter, "Percentage({basis:?})"),
            Self::PassThrough | Self::AbsoluteLength | Self::SnapToDevicePixels | Self::Formula(_) => {
                formatter.write_str(self.name())
            }
        }
    }
}

fn absolute_length(
    value: &Value,
    context: &ResolveContext,
    resolver: &'static str,
) -> Result<Value, ResolverError> {
    let Value::Length(length) = value else {
        return Ok(value.clone());
    };
    length_px(*length, context)
        .map(Value::px)
        .ok_or(ResolverError::MissingContext {
            resolver,
            missing: "a viewport",
        })
}

fn length_px(length: Length, context: &ResolveContext) -> Option<f32> {
    compute_length_px(
        length,
        context.font_size_px,
        context.root_font_size_px,
        context.viewport,
    )
}

fn resolve_percentage(
    percentage: Percentage,
    basis: PercentageBasis,
    context: &ResolveContext,
) -> Result<f32, ResolverError> {
    let basis_px = match basis {
        PercentageBasis::ContainingBlockWidth => context.containing_block.map(|(width, _)| width),
        PercentageBasis::ContainingBlockHeight => {
            context.containing_block.map(|(_, height)| height)
        }
        PercentageBasis::FontSize => Some(context.font_size_px),
    };
    basis_px
        .map(|basis_value| percentage.of(basis_value))
        .ok_or(ResolverError::MissingContext {
            resolver: "percentage",
            missing: "a containing block",
        })
}

fn snap(pixels: f32, device_pixel_ratio: f32) -> f32 {
    if device_pixel_ratio <= 0.0 {
        return pixels.round();
    }
    (pixels * device_pixel_ratio).round() / device_pixel_ratio
}
