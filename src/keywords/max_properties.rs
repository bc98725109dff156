use crate::{
    context::{Scope, ValidationContext},
    error::ValidationErrorKind,
    keywords::{helpers, CheckResult},
    paths::InstancePath,
};
use serde_json::Value;

#[inline]
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    count: usize,
    limit: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let limit = helpers::limit(limit, "maxProperties", scope)?;
    if (count as u64) > limit {
        ctx.error(ValidationErrorKind::MaxProperties { limit }, path)?;
    }
    Ok(())
}
