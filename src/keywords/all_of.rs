use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationErrorKind},
    keywords::{self, CheckResult},
    paths::InstancePath,
};
use serde_json::Value;

/// Non-empty array of sub-schemas shared by `allOf`, `anyOf` and `oneOf`.
pub(crate) fn branches<'s>(
    schemas: &'s Value,
    keyword: &str,
    scope: &Scope,
) -> Result<&'s [Value], SchemaError> {
    match schemas {
        Value::Array(items) if !items.is_empty() => Ok(items),
        other => Err(SchemaError::malformed(
            &scope.base,
            format!("'{}' must be a non-empty array, got {}", keyword, other),
        )),
    }
}

/// Every branch has to pass. Branch errors are reported, followed by one `allOf` error.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    schemas: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let mut failures = Vec::new();
    for schema in branches(schemas, "allOf", scope)? {
        failures.extend(
            ctx.isolated(|ctx| keywords::check(ctx, Some(instance), schema, scope, path, false))?,
        );
    }
    if failures.is_empty() {
        return Ok(());
    }
    ctx.extend_errors(failures)?;
    ctx.error(ValidationErrorKind::AllOf, path)
}
