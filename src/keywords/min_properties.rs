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
    let limit = helpers::limit(limit, "minProperties", scope)?;
    if (count as u64) < limit {
        ctx.error(ValidationErrorKind::MinProperties { limit }, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"a": 1}); "exact")]
    #[test_case(&json!([]); "not an object")]
    fn valid(instance: &Value) {
        tests_util::is_valid(&json!({"minProperties": 1}), instance)
    }

    #[test]
    fn too_few() {
        tests_util::expect_errors(
            &json!({"minProperties": 1}),
            &json!({}),
            &["#: Must contain a minimum of 1 property"],
        );
    }
}
