use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationErrorKind},
    keywords::CheckResult,
    mode::CheckMode,
    paths::InstancePath,
};
use serde_json::{Map, Value};

/// Array form of `required`. The boolean draft 3 marker is handled on the property itself.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    required: &Value,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let names = match required {
        Value::Array(names) => names,
        Value::Bool(_) => return Ok(()),
        other => {
            return Err(SchemaError::malformed(
                &scope.base,
                format!("'required' must be an array of strings, got {}", other),
            ))
        }
    };
    for name in names {
        let name = name.as_str().ok_or_else(|| {
            SchemaError::malformed(
                &scope.base,
                format!("'required' members must be strings, got {}", name),
            )
        })?;
        if ctx.types.property_exists(instance, name) || is_defaulted(ctx, object, name) {
            continue;
        }
        ctx.error(
            ValidationErrorKind::Required {
                property: name.to_string(),
            },
            &path.push(name),
        )?;
    }
    Ok(())
}

/// The property is filled in from its `default` instead.
fn is_defaulted(ctx: &ValidationContext<'_>, object: &Map<String, Value>, name: &str) -> bool {
    ctx.mode.contains(CheckMode::APPLY_DEFAULTS)
        && object
            .get("properties")
            .and_then(|properties| properties.get(name))
            .and_then(|subschema| subschema.get("default"))
            .is_some()
}

#[cfg(test)]
mod tests {
    use crate::{tests_util, CheckMode};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"required": ["a"]}), &json!({"a": null}); "present null")]
    #[test_case(&json!({"required": []}), &json!({}); "nothing required")]
    #[test_case(&json!({"required": ["a"]}), &json!([]); "not an object")]
    #[test_case(&json!({"required": true}), &json!({}); "boolean marker")]
    fn valid(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test]
    fn every_missing_property_is_reported() {
        tests_util::expect_errors(
            &json!({"required": ["a", "b", "c"]}),
            &json!({"b": 1}),
            &[
                "#/a: The property a is required",
                "#/c: The property c is required",
            ],
        );
    }

    #[test]
    fn sequential_object_in_loose_mode() {
        let schema = json!({"type": "object", "required": ["1"]});
        tests_util::is_valid_with_mode(&schema, &json!(["a", "b"]), CheckMode::ARRAY_AS_OBJECT);
        tests_util::is_not_valid_with_mode(&schema, &json!(["a"]), CheckMode::ARRAY_AS_OBJECT);
    }

    #[test]
    fn defaults_satisfy_required() {
        let schema = json!({"required": ["a"], "properties": {"a": {"default": 1}}});
        tests_util::is_not_valid(&schema, &json!({}));
        tests_util::is_valid_with_mode(&schema, &json!({}), CheckMode::APPLY_DEFAULTS);
    }

    #[test]
    fn malformed_required() {
        assert!(matches!(
            crate::validate(&json!({}), &json!({"required": [1]}), None, CheckMode::NORMAL),
            Err(crate::SchemaError::MalformedSchema { .. })
        ));
    }
}
