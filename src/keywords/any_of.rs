use crate::{
    context::{Scope, ValidationContext},
    error::ValidationErrorKind,
    keywords::{self, all_of::branches, CheckResult},
    paths::InstancePath,
};
use serde_json::Value;

/// The first passing branch wins. Errors of failed branches are dropped.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    schemas: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    for schema in branches(schemas, "anyOf", scope)? {
        let failures =
            ctx.isolated(|ctx| keywords::check(ctx, Some(instance), schema, scope, path, false))?;
        if failures.is_empty() {
            return Ok(());
        }
    }
    ctx.error(ValidationErrorKind::AnyOf, path)
}
