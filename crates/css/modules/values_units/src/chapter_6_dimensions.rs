//! CSS Values & Units Level 3 — §6 Dimensions (Lengths subset)
//! Reference: <https://www.w3.org/TR/css-values-3/#lengths>

/// Supported subset of CSS <length>: px, em, rem, vw, vh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Pixels,
    Ems,
    RootEms,
    ViewportWidth,
    ViewportHeight,
}

/// Compute the pixel value for a given `Length` using the current environment.
///
/// - Pixels: returns the raw value.
/// - Ems/RootEms: scales by the provided font sizes.
/// - Viewport-relative (vw/vh): requires viewport; returns a percentage of width/height.
pub fn compute_length_px(
    length: Length,
    font_size_px: f32,
    root_font_size_px: f32,
    viewport: Option<Viewport>,
) -> Option<f32> {
    match length.unit {
        LengthUnit::Pixels => Some(length.value),
        LengthUnit::Ems => Some(length.value * font_size_px),
        LengthUnit::RootEms => Some(length.value * root_font_size_px),
        LengthUnit::ViewportWidth => viewport
            .map(|viewport_metrics| length.value * (viewport_metrics.width_px as f32) / 100.0),
        LengthUnit::ViewportHeight => viewport
            .map(|viewport_metrics| length.value * (viewport_metrics.height_px as f32) / 100.0),
    }
}

/// A CSS <length> value with unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    #[inline]
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Pixels,
        }
    }

    #[inline]
    pub const fn em(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Ems,
        }
    }

    #[inline]
    pub const fn rem(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::RootEms,
        }
    }

    /// True when the pixel size cannot be known without an element's context.
    #[inline]
    pub const fn is_relative(self) -> bool {
        !matches!(self.unit, LengthUnit::Pixels)
    }
}

/// Viewport metrics used to evaluate viewport-relative units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_units_need_a_viewport() {
        let length = Length {
            value: 10.0,
            unit: LengthUnit::ViewportWidth,
        };
        assert!(compute_length_px(length, 16.0, 16.0, None).is_none());
        let viewport = Viewport {
            width_px: 800,
            height_px: 600,
        };
        assert_eq!(
            compute_length_px(length, 16.0, 16.0, Some(viewport)).map(Length::px),
            Some(Length::px(80.0))
        );
    }

    #[test]
    fn font_relative_units_scale() {
        assert_eq!(
            compute_length_px(Length::em(2.0), 12.0, 16.0, None).map(Length::px),
            Some(Length::px(24.0))
        );
        assert_eq!(
            compute_length_px(Length::rem(2.0), 12.0, 16.0, None).map(Length::px),
            Some(Length::px(32.0))
        );
    }
}
