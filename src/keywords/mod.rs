//! Keyword evaluation.
//!
//! [`check`] interprets one schema node against one value and recurses through the
//! keyword modules below. Every keyword family lives in its own module.
pub(crate) mod all_of;
pub(crate) mod any_of;
pub(crate) mod const_;
pub(crate) mod contains;
pub(crate) mod content;
pub(crate) mod dependencies;
pub(crate) mod enum_;
pub(crate) mod format;
pub(crate) mod helpers;
pub(crate) mod if_;
pub(crate) mod items;
pub(crate) mod max_items;
pub(crate) mod max_length;
pub(crate) mod max_properties;
pub(crate) mod maximum;
pub(crate) mod min_items;
pub(crate) mod min_length;
pub(crate) mod min_properties;
pub(crate) mod minimum;
pub(crate) mod multiple_of;
pub(crate) mod not;
pub(crate) mod one_of;
pub(crate) mod pattern;
pub(crate) mod properties;
pub(crate) mod property_names;
pub(crate) mod ref_;
pub(crate) mod required;
pub(crate) mod type_;
pub(crate) mod unique_items;

use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationErrorKind},
    mode::CheckMode,
    paths::InstancePath,
};
use serde_json::{Map, Number, Value};
use std::borrow::Cow;

pub(crate) type CheckResult = Result<(), SchemaError>;

/// Check `instance` against `schema`.
///
/// `None` stands for an absent property or tuple slot. It is distinct from a present
/// `null` and only fails schemas that make the value mandatory.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: Option<&Value>,
    schema: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
    property_change: bool,
) -> CheckResult {
    let object = match schema {
        Value::Bool(true) => return Ok(()),
        Value::Bool(false) => {
            return match instance {
                Some(_) => ctx.error(ValidationErrorKind::FalseSchema, path),
                None => Ok(()),
            }
        }
        Value::Object(object) => object,
        other => {
            return Err(SchemaError::malformed(
                &scope.base,
                format!("a schema must be an object or a boolean, got {}", other),
            ))
        }
    };
    let reference = object.get("$ref");
    // Siblings of `$ref`, `id` included, are ignored unless the dialect says otherwise
    let scope = match reference {
        Some(_) if !scope.draft.applies_ref_siblings() => Cow::Borrowed(scope),
        _ => scope.push(schema)?,
    };
    let scope = scope.as_ref();
    if property_change && instance.is_some() && is_read_only(object) {
        ctx.error(ValidationErrorKind::ReadOnly, path)?;
    }
    if let Some(reference) = reference {
        ref_::check_ref(ctx, instance, reference, scope, path, property_change)?;
        if !scope.draft.applies_ref_siblings() {
            return Ok(());
        }
    }
    if scope.draft.supports_legacy_keywords() {
        if let Some(parents) = object.get("extends") {
            ref_::check_extends(ctx, instance, parents, scope, path, property_change)?;
        }
    }
    match instance {
        Some(instance) => check_value(ctx, instance, object, scope, path),
        None => check_missing(ctx, object, scope, path),
    }
}

fn is_read_only(object: &Map<String, Value>) -> bool {
    matches!(object.get("readonly"), Some(Value::Bool(true)))
        || matches!(object.get("readOnly"), Some(Value::Bool(true)))
}

/// Boolean `required` marks the property itself as mandatory, `optional` overrides it.
fn is_mandatory(object: &Map<String, Value>) -> bool {
    matches!(object.get("required"), Some(Value::Bool(true)))
        && !matches!(object.get("optional"), Some(Value::Bool(true)))
}

fn check_missing(
    ctx: &mut ValidationContext<'_>,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    if ctx.mode.contains(CheckMode::APPLY_DEFAULTS) {
        if let Some(default) = object.get("default") {
            ctx.record_patch(path, default.clone());
            let filled = path.as_default();
            return check_value(ctx, default, object, scope, &filled);
        }
    }
    if is_mandatory(object) {
        ctx.error(
            ValidationErrorKind::Required {
                property: path.last_name(),
            },
            path,
        )?;
    }
    Ok(())
}

/// Every keyword except `$ref` / `extends` against a present value.
pub(crate) fn check_value(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let cast = match object.get("type") {
        Some(expression) => type_::check_type(ctx, instance, expression, scope, path)?,
        None => None,
    };
    // Coerced values stand in for the original in every later keyword
    let instance = cast.as_ref().unwrap_or(instance);
    if scope.draft.supports_legacy_keywords() {
        if let Some(disallow) = object.get("disallow") {
            type_::check_disallow(ctx, instance, disallow, scope, path)?;
        }
    }
    let types = ctx.types;
    if types.is_array(instance) {
        check_array(ctx, &types.elements(instance), object, scope, path)?;
    }
    if types.is_object(instance)
        || (ctx.mode.is_loose() && declares_object(object) && types.is_array(instance))
    {
        check_object(ctx, instance, object, scope, path)?;
    }
    match instance {
        Value::String(string) => check_string(ctx, string, object, scope, path)?,
        Value::Number(number) => check_number(ctx, number, object, scope, path)?,
        _ => {}
    }
    if let Some(options) = object.get("enum") {
        enum_::check(ctx, instance, options, scope, path)?;
    }
    if scope.draft.supports_draft6_keywords() {
        if let Some(expected) = object.get("const") {
            const_::check(ctx, instance, expected, path)?;
        }
    }
    if scope.draft.supports_combinators() {
        if let Some(schemas) = object.get("allOf") {
            all_of::check(ctx, instance, schemas, scope, path)?;
        }
        if let Some(schemas) = object.get("anyOf") {
            any_of::check(ctx, instance, schemas, scope, path)?;
        }
        if let Some(schemas) = object.get("oneOf") {
            one_of::check(ctx, instance, schemas, scope, path)?;
        }
        if let Some(schema) = object.get("not") {
            not::check(ctx, instance, schema, scope, path)?;
        }
    }
    if scope.draft.supports_conditionals() {
        if_::check(ctx, instance, object, scope, path)?;
    }
    Ok(())
}

fn declares_object(object: &Map<String, Value>) -> bool {
    match object.get("type") {
        Some(Value::String(name)) => name == "object",
        Some(Value::Array(names)) => names.iter().any(|name| name == "object"),
        _ => false,
    }
}

fn check_array(
    ctx: &mut ValidationContext<'_>,
    elements: &[&Value],
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    items::check(ctx, elements, object, scope, path)?;
    if let Some(limit) = object.get("minItems") {
        min_items::check(ctx, elements.len(), limit, scope, path)?;
    }
    if let Some(limit) = object.get("maxItems") {
        max_items::check(ctx, elements.len(), limit, scope, path)?;
    }
    if let Some(Value::Bool(true)) = object.get("uniqueItems") {
        unique_items::check(ctx, elements, path)?;
    }
    if scope.draft.supports_draft6_keywords() {
        contains::check(ctx, elements, object, scope, path)?;
    }
    Ok(())
}

fn check_object(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    properties::check(ctx, instance, object, scope, path)?;
    if let Some(required) = object.get("required") {
        required::check(ctx, instance, required, object, scope, path)?;
    }
    if let Some(dependencies) = object.get("dependencies") {
        dependencies::check(ctx, instance, dependencies, scope, path)?;
    }
    if scope.draft.supports_draft6_keywords() {
        if let Some(schema) = object.get("propertyNames") {
            property_names::check(ctx, instance, schema, scope, path)?;
        }
    }
    let count = ctx.types.property_count(instance);
    if let Some(limit) = object.get("minProperties") {
        min_properties::check(ctx, count, limit, scope, path)?;
    }
    if let Some(limit) = object.get("maxProperties") {
        max_properties::check(ctx, count, limit, scope, path)?;
    }
    Ok(())
}

fn check_string(
    ctx: &mut ValidationContext<'_>,
    string: &str,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    if let Some(pattern) = object.get("pattern") {
        pattern::check(ctx, string, pattern, scope, path)?;
    }
    if let Some(limit) = object.get("minLength") {
        min_length::check(ctx, string, limit, scope, path)?;
    }
    if let Some(limit) = object.get("maxLength") {
        max_length::check(ctx, string, limit, scope, path)?;
    }
    if let Some(format) = object.get("format") {
        format::check(ctx, string, format, path)?;
    }
    if scope.draft.supports_conditionals() {
        content::check(ctx, string, object, path)?;
    }
    Ok(())
}

fn check_number(
    ctx: &mut ValidationContext<'_>,
    number: &Number,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    minimum::check(ctx, number, object, scope, path)?;
    maximum::check(ctx, number, object, scope, path)?;
    multiple_of::check(ctx, number, object, scope, path)
}
