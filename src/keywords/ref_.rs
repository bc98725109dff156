use crate::{
    context::{Scope, ValidationContext},
    error::SchemaError,
    keywords::{check, CheckResult},
    paths::InstancePath,
    resolver::walk,
    schemas::draft_from_schema,
};
use serde_json::Value;

/// `$ref`: the referenced schema replaces the current one.
pub(crate) fn check_ref(
    ctx: &mut ValidationContext<'_>,
    instance: Option<&Value>,
    reference: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
    property_change: bool,
) -> CheckResult {
    match reference {
        Value::String(reference) => follow(ctx, instance, reference, scope, path, property_change),
        other => Err(SchemaError::InvalidReference {
            reference: other.to_string(),
        }),
    }
}

/// Legacy `extends`: the value has to satisfy every parent as well.
///
/// A parent is either an inline schema or a reference to one, several parents are given
/// as a list.
pub(crate) fn check_extends(
    ctx: &mut ValidationContext<'_>,
    instance: Option<&Value>,
    parents: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
    property_change: bool,
) -> CheckResult {
    match parents {
        Value::String(reference) => follow(ctx, instance, reference, scope, path, property_change),
        Value::Object(_) | Value::Bool(_) => {
            check(ctx, instance, parents, scope, path, property_change)
        }
        Value::Array(parents) => {
            for parent in parents {
                check_extends(ctx, instance, parent, scope, path, property_change)?;
            }
            Ok(())
        }
        other => Err(SchemaError::InvalidReference {
            reference: other.to_string(),
        }),
    }
}

fn follow(
    ctx: &mut ValidationContext<'_>,
    instance: Option<&Value>,
    reference: &str,
    scope: &Scope,
    path: &InstancePath<'_>,
    property_change: bool,
) -> CheckResult {
    ctx.enter_reference(reference)?;
    let result = resolve_and_check(ctx, instance, reference, scope, path, property_change);
    ctx.leave_reference();
    result
}

fn resolve_and_check(
    ctx: &mut ValidationContext<'_>,
    instance: Option<&Value>,
    reference: &str,
    scope: &Scope,
    path: &InstancePath<'_>,
    property_change: bool,
) -> CheckResult {
    let location = ctx.resolver.locate(reference, &scope.base)?;
    let document = location.document.as_value();
    let draft = draft_from_schema(document).unwrap_or(scope.draft);
    let (target, base) = walk(document, &location.segments, &location.base, draft)?;
    let scope = Scope::new(base, draft);
    check(ctx, instance, target, &scope, path, property_change)
}
