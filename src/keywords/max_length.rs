use crate::{
    context::{Scope, ValidationContext},
    error::ValidationErrorKind,
    keywords::{helpers, CheckResult},
    paths::InstancePath,
};
use serde_json::Value;

/// Length is counted in code points.
#[inline]
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    string: &str,
    limit: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let limit = helpers::limit(limit, "maxLength", scope)?;
    if (bytecount::num_chars(string.as_bytes()) as u64) > limit {
        ctx.error(ValidationErrorKind::MaxLength { limit }, path)?;
    }
    Ok(())
}
