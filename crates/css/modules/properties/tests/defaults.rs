#![cfg(test)]
#![allow(
    clippy::missing_panics_doc,
    reason = "Assertions in tests are expected"
)]

use core::error::Error;

use css_properties::{
    DefinitionRegistry, DirtyFlags, ResolveContext, Resolver, ResolverError, ValidationError,
};
use css_values_units::{Keyword, Value, ValueList};

type TestResult = Result<(), Box<dyn Error>>;

fn defaults() -> Result<DefinitionRegistry, Box<dyn Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    Ok(DefinitionRegistry::css_defaults()?)
}

#[test]
fn every_side_is_defined_in_order() -> TestResult {
    let registry = defaults()?;
    for (index, definition) in registry.iter().enumerate() {
        assert_eq!(definition.id().index(), index);
        assert_eq!(registry.by_id(definition.id())?.name(), definition.name());
    }
    for side in ["top", "right", "bottom", "left"] {
        registry.lookup(&format!("margin-{side}"))?;
        registry.lookup(&format!("padding-{side}"))?;
    }
    assert_eq!(registry.len(), 19);
    Ok(())
}

#[test]
fn initial_values_match_css() -> TestResult {
    let registry = defaults()?;
    assert_eq!(registry.lookup("width")?.initial(), &Value::AUTO);
    assert_eq!(
        registry.lookup("line-height")?.initial(),
        &Value::Keyword(Keyword::Normal)
    );
    assert_eq!(registry.lookup("margin-top")?.initial(), &Value::px(0.0));
    assert_eq!(
        registry.lookup("font-size")?.dirty(),
        DirtyFlags::TEXT | DirtyFlags::FLOW
    );
    Ok(())
}

#[test]
fn padding_refuses_auto_but_margin_accepts_it() -> TestResult {
    let registry = defaults()?;
    let padding = registry.lookup("padding-left")?;
    assert!(matches!(
        padding.validate(&ValueList::single(Value::AUTO)),
        Err(ValidationError::Disallowed { .. })
    ));
    registry
        .lookup("margin-left")?
        .validate(&ValueList::single(Value::AUTO))?;
    Ok(())
}

#[test]
fn only_font_family_takes_lists() -> TestResult {
    let registry = defaults()?;
    let families = ValueList::from(vec![Value::ident("Inter"), Value::ident("sans-serif")]);
    registry.lookup("font-family")?.validate(&families)?;
    assert!(matches!(
        registry.lookup("display")?.validate(&families),
        Err(ValidationError::TooManyValues { count: 2, .. })
    ));
    Ok(())
}

#[test]
fn width_percentages_resolve_at_computed_time() -> TestResult {
    let registry = defaults()?;
    let computed = registry.lookup("width")?.derivations().computed;
    let laid_out = ResolveContext::default().with_containing_block(300.0, 100.0);
    assert_eq!(computed.resolve(&Value::percent(10.0), &laid_out)?, Value::px(30.0));
    assert_eq!(
        registry.lookup("height")?.derivations().computed.resolve(&Value::percent(10.0), &laid_out)?,
        Value::px(10.0)
    );
    assert!(matches!(
        computed.resolve(&Value::percent(10.0), &ResolveContext::default()),
        Err(ResolverError::MissingContext { .. })
    ));
    assert!(matches!(
        registry.lookup("width")?.derivations().actual,
        Some(Resolver::SnapToDevicePixels)
    ));
    Ok(())
}
