use crate::{
    context::{Scope, ValidationContext},
    error::ValidationErrorKind,
    keywords::{self, all_of::branches, CheckResult},
    paths::InstancePath,
};
use serde_json::Value;

/// Exactly one branch has to pass.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    schemas: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let mut matched = 0;
    for schema in branches(schemas, "oneOf", scope)? {
        let passed = if matched == 0 {
            ctx.isolated(|ctx| keywords::check(ctx, Some(instance), schema, scope, path, false))?
                .is_empty()
        } else {
            // A second match fails the keyword, nothing it records is kept
            ctx.probe(|ctx| keywords::check(ctx, Some(instance), schema, scope, path, false))?
        };
        if passed {
            matched += 1;
        }
    }
    if matched == 1 {
        Ok(())
    } else {
        ctx.error(ValidationErrorKind::OneOf { matched }, path)
    }
}
