use crate::{
    context::{Scope, ValidationContext},
    error::ValidationErrorKind,
    keywords::{self, CheckResult},
    paths::InstancePath,
};
use serde_json::Value;

#[inline]
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    schema: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    if ctx.probe(|ctx| keywords::check(ctx, Some(instance), schema, scope, path, false))? {
        ctx.error(ValidationErrorKind::Not, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"not": {"type": "integer"}}), &json!("a"); "mismatch")]
    #[test_case(&json!({"not": false}), &json!(1); "false schema")]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test]
    fn matching_value() {
        tests_util::expect_errors(
            &json!({"not": {"type": "integer", "minimum": 1}}),
            &json!(2),
            &["#: Matched a schema which it should not"],
        );
        tests_util::is_not_valid(&json!({"not": {}}), &json!(null));
    }
}
