//! The attributes every document starts with.

use css_values_units::{Color, Keyword, Length, Number, Value};

use crate::{
    Definition, DefinitionRegistry, DirtyFlags, LookupError, OptionSet, PercentageBasis,
    ResolveContext, Resolver, ResolverError,
};

const MARGIN_SIDES: [&str; 4] = ["margin-top", "margin-right", "margin-bottom", "margin-left"];
const PADDING_SIDES: [&str; 4] = [
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
];

impl DefinitionRegistry {
    /// Registry holding the stock CSS attributes the engine styles.
    ///
    /// # Errors
    /// Only fails if two stock definitions share a name.
    pub fn css_defaults() -> Result<Self, LookupError> {
        let mut registry = Self::new();

        registry.define(
            Definition::builder("color", Value::Color(Color::BLACK))
                .inherited()
                .options(OptionSet::PERMISSIVE.without_auto().without_percentage()),
        )?;
        registry.define(
            Definition::builder("font-size", Value::ident("medium"))
                .inherited()
                .options(OptionSet::PERMISSIVE.without_auto())
                .computed(Resolver::Formula(font_size_px))
                .dirty(DirtyFlags::TEXT | DirtyFlags::FLOW),
        )?;
        registry.define(
            Definition::builder("font-family", Value::ident("sans-serif"))
                .inherited()
                .list_valued()
                .options(OptionSet::PERMISSIVE.without_auto().without_percentage())
                .dirty(DirtyFlags::TEXT | DirtyFlags::FLOW),
        )?;
        registry.define(
            Definition::builder("line-height", Value::Keyword(Keyword::Normal))
                .inherited()
                .options(OptionSet::PERMISSIVE.without_auto())
                .computed(Resolver::Percentage(PercentageBasis::FontSize))
                .dirty(DirtyFlags::FLOW),
        )?;
        registry.define(
            Definition::builder("display", Value::ident("inline"))
                .options(OptionSet::PERMISSIVE.without_auto().without_percentage())
                .dirty(DirtyFlags::BOX | DirtyFlags::FLOW),
        )?;
        registry.define(
            Definition::builder("width", Value::AUTO)
                .computed(Resolver::Percentage(PercentageBasis::ContainingBlockWidth))
                .actual(Resolver::SnapToDevicePixels)
                .dirty(DirtyFlags::BOX | DirtyFlags::FLOW),
        )?;
        registry.define(
            Definition::builder("height", Value::AUTO)
                .computed(Resolver::Percentage(PercentageBasis::ContainingBlockHeight))
                .actual(Resolver::SnapToDevicePixels)
                .dirty(DirtyFlags::BOX | DirtyFlags::FLOW),
        )?;
        for side in MARGIN_SIDES {
            registry.define(
                Definition::builder(side, Value::px(0.0))
                    .computed(Resolver::Percentage(PercentageBasis::ContainingBlockWidth))
                    .dirty(DirtyFlags::FLOW),
            )?;
        }
        for side in PADDING_SIDES {
            registry.define(
                Definition::builder(side, Value::px(0.0))
                    .options(OptionSet::PERMISSIVE.without_auto())
                    .computed(Resolver::Percentage(PercentageBasis::ContainingBlockWidth))
                    .dirty(DirtyFlags::BOX | DirtyFlags::FLOW),
            )?;
        }
        registry.define(
            Definition::builder("background-color", Value::Color(Color::TRANSPARENT))
                .options(OptionSet::PERMISSIVE.without_auto().without_percentage()),
        )?;
        registry.define(
            Definition::builder("opacity", Value::number(1.0))
                .options(OptionSet::PERMISSIVE.without_auto())
                .computed(Resolver::Formula(clamp_opacity)),
        )?;
        registry.define(
            Definition::builder("visibility", Value::ident("visible"))
                .inherited()
                .options(OptionSet::PERMISSIVE.without_auto().without_percentage()),
        )?;
        registry.define(
            Definition::builder("text-align", Value::ident("start"))
                .inherited()
                .options(OptionSet::PERMISSIVE.without_auto().without_percentage())
                .dirty(DirtyFlags::TEXT),
        )?;

        Ok(registry)
    }
}

/// Absolute size keywords, css-fonts-4 §2.5. `medium` is the user agent default.
fn keyword_font_size(name: &str) -> Option<f32> {
    let pixels = match name {
        "xx-small" => 9.0,
        "x-small" => 10.0,
        "small" => 13.0,
        "medium" => ResolveContext::DEFAULT_FONT_SIZE_PX,
        "large" => 18.0,
        "x-large" => 24.0,
        "xx-large" => 32.0,
        _ => return None,
    };
    Some(pixels)
}

/// `font-size` computes to pixels. Relative values resolve against the
/// context font size, which the element layer fills with the parent's size.
fn font_size_px(value: &Value, context: &ResolveContext) -> Result<Value, ResolverError> {
    match value {
        Value::Keyword(Keyword::Ident(name)) => keyword_font_size(name)
            .map(Value::px)
            .ok_or_else(|| ResolverError::Failed(format!("unknown font size `{name}`"))),
        Value::Length(length) => Resolver::AbsoluteLength.resolve(&Value::Length(*length), context),
        Value::Percentage(percentage) => Ok(Value::Length(Length::px(
            percentage.of(context.font_size_px),
        ))),
        other => Err(ResolverError::Failed(format!("font-size cannot be {other}"))),
    }
}

fn clamp_opacity(value: &Value, _: &ResolveContext) -> Result<Value, ResolverError> {
    match value {
        Value::Number(Number(alpha)) => Ok(Value::number(alpha.clamp(0.0, 1.0))),
        Value::Percentage(percentage) => Ok(Value::number(percentage.0.clamp(0.0, 1.0))),
        other => Err(ResolverError::Failed(format!("opacity cannot be {other}"))),
    }
}
