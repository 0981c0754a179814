#![cfg(test)]
#![allow(
    clippy::missing_panics_doc,
    reason = "Assertions in tests are expected"
)]

use core::error::Error;
use std::sync::Arc;

use css_cascade::Origin;
use css_properties::{
    Definition, DefinitionRegistry, DirtyFlags, ResolveContext, Resolver, ResolverError,
    ValidationError,
};
use css_values_units::{Color, Length, Value, ValueList};
use style_engine::{
    Detached, Document, ElementId, PropertySet, RecomputeMode, Stage, StyleConfig, StyleError,
};

type TestResult = Result<(), Box<dyn Error>>;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn new_document(recompute: RecomputeMode) -> Result<Document, Box<dyn Error>> {
    init_logger();
    let registry = Arc::new(DefinitionRegistry::css_defaults()?);
    Ok(Document::new(registry, StyleConfig::new(None, recompute))?)
}

fn parent_and_child(document: &mut Document) -> Result<(ElementId, ElementId), StyleError> {
    let root = document.create_root()?;
    let child = document.append_child(root)?;
    Ok((root, child))
}

fn single(value: Value) -> ValueList {
    ValueList::single(value)
}

const RED: Value = Value::Color(Color::rgb(255, 0, 0));

#[test]
fn repeated_reads_are_idempotent() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let root = document.create_root()?;
    let width = document.style(root)?.get("width")?;
    width.set_assigned(Value::px(12.5))?;

    let first = width.actual(&document)?;
    let changes = document.drain_changes().len();
    let second = width.actual(&document)?;
    assert_eq!(first, second);
    assert_eq!(changes, 5);
    assert!(document.drain_changes().is_empty());
    Ok(())
}

#[test]
fn undeclared_inherited_attribute_follows_the_parent() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let (root, child) = parent_and_child(&mut document)?;

    let root_color = document.style(root)?.get("color")?;
    assert_eq!(root_color.computed(&document)?, single(Value::Color(Color::BLACK)));

    root_color.set_assigned(RED)?;
    let child_color = document.style(child)?.get("color")?;
    assert_eq!(child_color.computed(&document)?, root_color.computed(&document)?);
    assert_eq!(child_color.computed(&document)?, single(RED));
    Ok(())
}

#[test]
fn writes_through_the_working_set_reach_cached_descendants() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let (root, child) = parent_and_child(&mut document)?;
    let grandchild = document.append_child(child)?;
    let blue = Value::Color(Color::rgb(0, 0, 255));

    document.style(root)?.assign("color", RED)?;
    let child_color = document.style(child)?.get("color")?;
    let grandchild_color = document.style(grandchild)?.get("color")?;
    assert_eq!(child_color.computed(&document)?, single(RED));
    assert_eq!(grandchild_color.computed(&document)?, single(RED));
    document.drain_changes();

    document.style(root)?.assign("color", blue.clone())?;
    let root_color = document.style(root)?.get("color")?;
    assert_eq!(grandchild_color.computed(&document)?, single(blue.clone()));
    assert_eq!(child_color.computed(&document)?, root_color.computed(&document)?);

    // Rereading after an unrelated write republishes nothing.
    document.style(root)?.assign("width", Value::px(4.0))?;
    document.drain_changes();
    assert_eq!(child_color.computed(&document)?, single(blue));
    assert!(document.drain_changes().is_empty());
    Ok(())
}

#[test]
fn undeclared_font_size_computes_from_the_initial_keyword_at_the_root() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let (root, child) = parent_and_child(&mut document)?;
    let root_size = document.style(root)?.get("font-size")?;
    assert_eq!(root_size.specified(&document)?, single(Value::ident("medium")));
    assert_eq!(root_size.computed(&document)?, single(Value::px(16.0)));

    document.style(child)?.assign("font-size", Value::Length(Length::em(2.0)))?;
    document.set_context(child, ResolveContext::default().with_font_size(10.0))?;
    assert_eq!(
        document.style(child)?.get("font-size")?.computed(&document)?,
        single(Value::px(20.0))
    );
    Ok(())
}

#[test]
fn initial_and_inherit_ignore_the_inherited_flag() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let (root, child) = parent_and_child(&mut document)?;
    let parent_style = document.style(root)?;
    parent_style.assign("color", RED)?;
    parent_style.assign("width", Value::px(40.0))?;

    let child_style = document.style(child)?;
    child_style.assign("color", Value::INITIAL)?;
    child_style.assign("width", Value::INHERIT)?;
    assert_eq!(
        child_style.get("color")?.specified(&document)?,
        single(Value::Color(Color::BLACK))
    );
    assert_eq!(
        child_style.get("width")?.specified(&document)?,
        single(Value::px(40.0))
    );
    Ok(())
}

#[test]
fn unset_inherits_or_resets_by_attribute() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let (root, child) = parent_and_child(&mut document)?;
    let parent_style = document.style(root)?;
    parent_style.assign("color", RED)?;
    parent_style.assign("width", Value::px(40.0))?;

    let child_style = document.style(child)?;
    child_style.assign("color", Value::UNSET)?;
    child_style.assign("width", Value::UNSET)?;
    assert_eq!(child_style.get("color")?.specified(&document)?, single(RED));
    assert_eq!(child_style.get("width")?.specified(&document)?, single(Value::AUTO));
    Ok(())
}

#[test]
fn inherit_at_the_root_falls_back_to_initial() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let root = document.create_root()?;
    let width = document.style(root)?.get("width")?;
    width.set_assigned(Value::INHERIT)?;
    assert_eq!(width.computed(&document)?, single(Value::AUTO));
    Ok(())
}

#[test]
fn rejected_values_leave_the_cell_untouched() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let root = document.create_root()?;
    let style = document.style(root)?;
    style.assign("color", RED)?;

    let error = style.assign("color", Value::percent(50.0));
    assert!(matches!(
        error,
        Err(StyleError::Validation(ValidationError::Disallowed { .. }))
    ));
    assert_eq!(style.get("color")?.assigned(), single(RED));

    let too_many = style.assign("width", vec![Value::px(1.0), Value::px(2.0)]);
    assert!(matches!(
        too_many,
        Err(StyleError::Validation(ValidationError::TooManyValues { count: 2, .. }))
    ));
    let keyword = style.assign("font-family", vec![Value::ident("serif"), Value::INHERIT]);
    assert!(matches!(
        keyword,
        Err(StyleError::Validation(ValidationError::KeywordInList { .. }))
    ));
    assert!(!style.has_assigned("width"));
    Ok(())
}

#[test]
fn failed_resolution_can_be_retried() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let root = document.create_root()?;
    document.style(root)?.assign("width", Value::percent(50.0))?;

    let width = document.style(root)?.get("width")?;
    let failure = width.computed(&document);
    assert!(matches!(
        failure,
        Err(StyleError::Resolver {
            stage: Stage::Computed,
            ..
        })
    ));
    assert!(width.peek(Stage::Specified).is_some());
    assert_eq!(width.peek(Stage::Computed), None);

    document.set_context(root, ResolveContext::default().with_containing_block(640.0, 480.0))?;
    let width = document.style(root)?.get("width")?;
    assert_eq!(width.computed(&document)?, single(Value::px(320.0)));
    Ok(())
}

fn needs_a_containing_block(
    value: &Value,
    context: &ResolveContext,
) -> Result<Value, ResolverError> {
    match context.containing_block {
        Some(_) => Ok(value.clone()),
        None => Err(ResolverError::MissingContext {
            resolver: "block formula",
            missing: "a containing block",
        }),
    }
}

#[test]
fn late_stage_failures_keep_earlier_stages() -> TestResult {
    init_logger();
    let mut registry = DefinitionRegistry::new();
    let formula = Resolver::Formula(needs_a_containing_block);
    registry.define(Definition::builder("inset", Value::AUTO).used(formula))?;
    registry.define(Definition::builder("gap", Value::px(0.0)).actual(formula))?;
    let mut document = Document::new(Arc::new(registry), StyleConfig::default())?;
    let root = document.create_root()?;
    let style = document.style(root)?;
    style.assign("inset", Value::px(3.0))?;
    style.assign("gap", Value::px(2.0))?;

    let inset = style.get("inset")?;
    assert!(matches!(
        inset.actual(&document),
        Err(StyleError::Resolver { stage: Stage::Used, .. })
    ));
    assert!(inset.peek(Stage::Computed).is_some());
    assert_eq!(inset.peek(Stage::Used), None);
    assert_eq!(inset.peek(Stage::Actual), None);

    let gap = style.get("gap")?;
    assert!(matches!(
        gap.actual(&document),
        Err(StyleError::Resolver { stage: Stage::Actual, .. })
    ));
    assert_eq!(gap.peek(Stage::Used), Some(single(Value::px(2.0))));
    assert_eq!(gap.peek(Stage::Actual), None);

    document.set_context(root, ResolveContext::default().with_containing_block(100.0, 50.0))?;
    let style = document.style(root)?;
    assert_eq!(style.get("inset")?.actual(&document)?, single(Value::px(3.0)));
    assert_eq!(style.get("gap")?.actual(&document)?, single(Value::px(2.0)));
    Ok(())
}

#[test]
fn lists_derive_positionally_and_inherit_whole() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let (root, child) = parent_and_child(&mut document)?;
    let families = ValueList::from(vec![Value::ident("Helvetica"), Value::ident("serif")]);
    document.style(root)?.assign("font-family", families.clone())?;

    let root_family = document.style(root)?.get("font-family")?;
    assert_eq!(root_family.computed(&document)?, families);
    let child_family = document.style(child)?.get("font-family")?;
    assert_eq!(child_family.computed(&document)?, families);
    Ok(())
}

#[test]
fn assignments_report_dirtiness() -> TestResult {
    let mut document = new_document(RecomputeMode::Lazy)?;
    let root = document.create_root()?;
    document.style(root)?.assign("width", Value::px(3.0))?;

    let changes = document.drain_changes();
    assert_eq!(changes.len(), 1);
    let change = &changes[0];
    assert_eq!(change.stage, Stage::Assigned);
    assert_eq!(&*change.name, "width");
    assert_eq!(change.owner, Some(root));
    assert_eq!(change.dirty, DirtyFlags::BOX | DirtyFlags::FLOW);
    Ok(())
}

#[test]
fn immediate_mode_settles_after_a_cascade() -> TestResult {
    let mut document = new_document(RecomputeMode::Immediate)?;
    let root = document.create_root()?;
    let rule = document.rule_set(Origin::Author, None);
    rule.assign("opacity", Value::number(0.25))?;
    document.apply_cascade(root, &[&rule])?;

    let opacity = document.style(root)?.get("opacity")?;
    assert_eq!(opacity.peek(Stage::Actual), Some(single(Value::number(0.25))));
    Ok(())
}

#[test]
fn immediate_assignment_on_a_detached_set() -> TestResult {
    init_logger();
    let registry = Arc::new(DefinitionRegistry::css_defaults()?);
    let rule = PropertySet::builder(registry, Origin::User).build();
    let actual = rule
        .get("width")?
        .set_assigned_immediate(Value::px(7.4), &Detached)?;
    assert_eq!(actual, single(Value::px(7.0)));
    Ok(())
}
