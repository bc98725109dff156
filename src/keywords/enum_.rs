use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationErrorKind},
    keywords::{helpers, CheckResult},
    paths::InstancePath,
};
use serde_json::Value;

/// `enum`: the value has to be deep-equal to one of the options.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    options: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let items = options.as_array().ok_or_else(|| {
        SchemaError::malformed(
            &scope.base,
            format!("'enum' must be an array, got {}", options),
        )
    })?;
    if items.iter().any(|item| helpers::equal(instance, item)) {
        return Ok(());
    }
    ctx.error(
        ValidationErrorKind::Enum {
            options: options.clone(),
        },
        path,
    )
}
