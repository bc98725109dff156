use crate::{
    context::{Scope, ValidationContext},
    error::ValidationErrorKind,
    keywords::{helpers, minimum::ordering, CheckResult},
    paths::InstancePath,
};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// `maximum` and `exclusiveMaximum`, with the same draft split as the lower bounds.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    number: &Number,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let numeric_exclusive = scope.draft.has_numeric_exclusive_bounds();
    if let Some(limit) = object.get("maximum") {
        let limit = helpers::number(limit, "maximum", scope)?;
        let exclusive =
            !numeric_exclusive && matches!(object.get("exclusiveMaximum"), Some(Value::Bool(true)));
        let order = ordering(number, limit, scope)?;
        let failed = if exclusive {
            order != Ordering::Less
        } else {
            order == Ordering::Greater
        };
        if failed {
            ctx.error(
                ValidationErrorKind::Maximum {
                    limit: limit.clone(),
                    exclusive,
                },
                path,
            )?;
        }
    }
    if numeric_exclusive {
        if let Some(limit) = object.get("exclusiveMaximum") {
            let limit = helpers::number(limit, "exclusiveMaximum", scope)?;
            if ordering(number, limit, scope)? != Ordering::Less {
                ctx.error(
                    ValidationErrorKind::ExclusiveMaximum {
                        limit: limit.clone(),
                    },
                    path,
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{tests_util, CheckMode};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"maximum": 5}), &json!(5); "inclusive bound")]
    #[test_case(&json!({"maximum": 5.5}), &json!(5); "float bound")]
    #[test_case(&json!({"maximum": 5, "exclusiveMaximum": true}), &json!(4.99); "boolean exclusive")]
    #[test_case(&json!({"$schema": "http://json-schema.org/draft-07/schema#", "exclusiveMaximum": 5}), &json!(-3); "numeric exclusive")]
    // Boolean modifiers mean nothing from draft 6 on
    #[test_case(&json!({"$schema": "http://json-schema.org/draft-06/schema#", "maximum": 5, "exclusiveMaximum": 6}), &json!(5); "independent bounds")]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test]
    fn inclusive_message() {
        tests_util::expect_errors(
            &json!({"maximum": 3}),
            &json!(3.5),
            &["#: Must be less than or equal to 3"],
        );
    }

    #[test]
    fn both_bounds_reported() {
        tests_util::expect_errors(
            &json!({"$schema": "http://json-schema.org/draft-06/schema#", "maximum": 5, "exclusiveMaximum": 5}),
            &json!(6),
            &["#: Must be less than or equal to 5", "#: Must be less than 5"],
        );
    }

    #[test]
    fn malformed_bound() {
        assert!(matches!(
            crate::validate(&json!(1), &json!({"maximum": "5"}), None, CheckMode::NORMAL),
            Err(crate::SchemaError::MalformedSchema { .. })
        ));
    }
}
