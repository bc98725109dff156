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
    let limit = helpers::limit(limit, "minItems", scope)?;
    if (count as u64) < limit {
        ctx.error(ValidationErrorKind::MinItems { limit }, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{tests_util, CheckMode};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!([1, 2]); "exact")]
    #[test_case(&json!([1, 2, 3]); "longer")]
    #[test_case(&json!("a"); "not an array")]
    fn valid(instance: &Value) {
        tests_util::is_valid(&json!({"minItems": 2.0}), instance)
    }

    #[test]
    fn too_short() {
        tests_util::expect_errors(
            &json!({"minItems": 2}),
            &json!([1]),
            &["#: There must be a minimum of 2 items in the array"],
        );
    }

    #[test]
    fn sequential_object_in_loose_mode() {
        tests_util::is_not_valid_with_mode(
            &json!({"minItems": 2}),
            &json!({"0": "a"}),
            CheckMode::TYPE_CAST,
        );
    }
}
