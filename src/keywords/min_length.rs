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
    let limit = helpers::limit(limit, "minLength", scope)?;
    if (bytecount::num_chars(string.as_bytes()) as u64) < limit {
        ctx.error(ValidationErrorKind::MinLength { limit }, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!("ab"); "exact")]
    #[test_case(&json!("åß"); "multi byte characters")]
    #[test_case(&json!(1); "not a string")]
    fn valid(instance: &Value) {
        tests_util::is_valid(&json!({"minLength": 2}), instance)
    }

    #[test]
    fn too_short() {
        tests_util::expect_errors(
            &json!({"minLength": 2}),
            &json!("é"),
            &["#: Must be at least 2 characters long"],
        );
    }
}
