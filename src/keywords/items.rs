use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationErrorKind},
    keywords::{self, CheckResult},
    paths::InstancePath,
};
use serde_json::{Map, Value};

/// `items` in both its forms, with `additionalItems` for elements past a tuple.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    elements: &[&Value],
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    match object.get("items") {
        None => Ok(()),
        Some(Value::Array(slots)) => check_tuple(ctx, elements, slots, object, scope, path),
        Some(schema @ (Value::Object(_) | Value::Bool(_))) => {
            for (idx, element) in elements.iter().enumerate() {
                keywords::check(ctx, Some(*element), schema, scope, &path.push(idx), false)?;
            }
            Ok(())
        }
        Some(other) => Err(SchemaError::malformed(
            &scope.base,
            format!("'items' must be a schema or an array of schemas, got {}", other),
        )),
    }
}

fn check_tuple(
    ctx: &mut ValidationContext<'_>,
    elements: &[&Value],
    slots: &[Value],
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    // Slots past the end of the array see a missing value, so mandatory entries are reported
    for (idx, slot) in slots.iter().enumerate() {
        let element = elements.get(idx).copied();
        keywords::check(ctx, element, slot, scope, &path.push(idx), false)?;
    }
    if elements.len() <= slots.len() {
        return Ok(());
    }
    let additional = object.get("additionalItems").or_else(|| {
        if scope.draft.supports_legacy_keywords() {
            object.get("additionalProperties")
        } else {
            None
        }
    });
    match additional {
        None | Some(Value::Bool(true)) => Ok(()),
        Some(Value::Bool(false)) => {
            for idx in slots.len()..elements.len() {
                ctx.error(
                    ValidationErrorKind::AdditionalItems { index: idx },
                    &path.push(idx),
                )?;
            }
            Ok(())
        }
        Some(schema @ Value::Object(_)) => {
            for (idx, element) in elements.iter().enumerate().skip(slots.len()) {
                keywords::check(ctx, Some(*element), schema, scope, &path.push(idx), false)?;
            }
            Ok(())
        }
        Some(other) => Err(SchemaError::malformed(
            &scope.base,
            format!("'additionalItems' must be a boolean or a schema, got {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::{tests_util, CheckMode};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"items": {"type": "integer"}}), &json!([1, 2, 3]); "every element")]
    #[test_case(&json!({"items": {"type": "integer"}}), &json!([]); "empty array")]
    #[test_case(&json!({"items": [{"type": "integer"}, {"type": "string"}]}), &json!([1, "a", null]); "tuple with extra element")]
    #[test_case(&json!({"items": [{"type": "integer"}, {"type": "string"}]}), &json!([1]); "short tuple")]
    #[test_case(&json!({"items": [{}], "additionalItems": {"type": "string"}}), &json!([1, "a", "b"]); "additional items schema")]
    #[test_case(&json!({"items": {"type": "integer"}}), &json!({"a": "b"}); "objects are ignored")]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(&json!({"items": {"type": "integer"}}), &json!([1, "a"]); "wrong element")]
    #[test_case(&json!({"items": [{"type": "integer"}]}), &json!(["a"]); "wrong tuple slot")]
    #[test_case(&json!({"items": [{}], "additionalItems": {"type": "string"}}), &json!([1, 2]); "additional items schema")]
    #[test_case(&json!({"items": false}), &json!([1]); "false items")]
    fn invalid(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn element_location() {
        tests_util::expect_errors(
            &json!({"items": {"type": "number"}}),
            &json!([1, 2, "a"]),
            &["#/2: String value found, but a number is required"],
        );
    }

    #[test]
    fn additional_items_not_allowed() {
        tests_util::expect_errors(
            &json!({"items": [{}], "additionalItems": false}),
            &json!([1, 2, 3]),
            &[
                "#/1: The item at index 1 is not defined and the definition does not allow additional items",
                "#/2: The item at index 2 is not defined and the definition does not allow additional items",
            ],
        );
    }

    #[test]
    fn additional_properties_limit_tuples_in_legacy_drafts() {
        let schema = json!({"items": [{}], "additionalProperties": false});
        tests_util::is_not_valid(&schema, &json!([1, 2]));
        let mut draft7 = schema;
        draft7["$schema"] = json!("http://json-schema.org/draft-07/schema#");
        tests_util::is_valid(&draft7, &json!([1, 2]));
    }

    #[test]
    fn missing_mandatory_slot() {
        tests_util::expect_errors(
            &json!({"items": [{}, {"required": true}]}),
            &json!([1]),
            &["#/1: The property 1 is required"],
        );
    }

    #[test]
    fn sequential_object_in_loose_mode() {
        let schema = json!({"items": {"type": "integer"}});
        let instance = json!({"0": 1, "1": "a"});
        tests_util::is_valid(&schema, &instance);
        tests_util::is_not_valid_with_mode(&schema, &instance, CheckMode::TYPE_CAST);
    }

    #[test]
    fn malformed_items() {
        assert!(matches!(
            crate::validate(&json!([1]), &json!({"items": 1}), None, CheckMode::NORMAL),
            Err(crate::SchemaError::MalformedSchema { .. })
        ));
    }
}
