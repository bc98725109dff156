use jsonschema_check::{validate, CheckMode, ErrorContext, SchemaError, Validator};
use serde_json::{json, Value};
use test_case::test_case;

fn errors(instance: &Value, schema: &Value, mode: CheckMode) -> Vec<String> {
    validate(instance, schema, None, mode)
        .expect("Valid schema")
        .errors
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn nested_array_item() {
    let schema = json!({
        "type": "object",
        "properties": {"array": {"type": "array", "items": {"type": "number"}}}
    });
    let report = validate(&json!({"array": [1, 2, "a"]}), &schema, None, CheckMode::NORMAL)
        .expect("Valid schema");
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    let error = &report.errors[0];
    assert_eq!(error.property(), "array[2]");
    assert_eq!(error.pointer(), "#/array/2");
    assert_eq!(error.constraint().name(), "type");
    assert_eq!(error.context(), ErrorContext::DOCUMENT);
}

#[test]
fn integer_with_minimum() {
    let schema = json!({
        "type": "object",
        "properties": {"value": {"type": "integer", "minimum": 4}}
    });
    let report = validate(&json!({"value": 6}), &schema, None, CheckMode::NORMAL)
        .expect("Valid schema");
    assert!(report.valid);
    assert!(report.errors.is_empty());
    assert_eq!(report.context_mask, ErrorContext::NONE);
}

#[test_case(&json!([1, 2, 2]), false; "duplicate")]
#[test_case(&json!([1, 2, 3]), true; "distinct")]
fn unique_items(instance: &Value, expected: bool) {
    let schema = json!({"type": "array", "uniqueItems": true});
    assert_eq!(jsonschema_check::is_valid(&schema, instance), expected);
}

#[test_case("2020-01-01T00:00:00Z", true; "valid date-time")]
#[test_case("2020-13-40T00:00:00Z", false; "impossible date")]
fn date_time(value: &str, expected: bool) {
    let schema = json!({"format": "date-time"});
    assert_eq!(jsonschema_check::is_valid(&schema, &json!(value)), expected);
}

#[test_case("aaa", true; "whole string")]
#[test_case("xxaxx", false; "substring only")]
fn pattern_matches_whole_string(value: &str, expected: bool) {
    let schema = json!({"type": "string", "pattern": "a+"});
    assert_eq!(jsonschema_check::is_valid(&schema, &json!(value)), expected);
}

#[test]
fn binary_base64_content() {
    let schema = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "contentEncoding": "base64"
    });
    assert!(jsonschema_check::is_valid(&schema, &json!("/w==")));
    assert!(!jsonschema_check::is_valid(&schema, &json!("/w=")));
}

#[test]
fn empty_property_name() {
    let schema = json!({"properties": {"": {"type": "string"}}});
    let report = validate(&json!({"": 1}), &schema, None, CheckMode::NORMAL)
        .expect("Valid schema");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].pointer(), "#");
}

#[test]
fn type_cast() {
    let schema = json!({"type": "integer"});
    let mut instance = json!("6");
    let report = Validator::new()
        .coerce(&mut instance, &schema, None, CheckMode::TYPE_CAST)
        .expect("Valid schema");
    assert!(report.valid);
    assert_eq!(instance, json!(6));

    let mut instance = json!("6.5");
    let report = Validator::new()
        .coerce(&mut instance, &schema, None, CheckMode::TYPE_CAST)
        .expect("Valid schema");
    assert_eq!(report.errors[0].constraint().name(), "type");
    assert_eq!(instance, json!("6.5"));
}

#[test]
fn type_cast_is_off_by_default() {
    assert_eq!(
        errors(&json!("6"), &json!({"type": "integer"}), CheckMode::NORMAL),
        vec!["#: String value found, but an integer is required"]
    );
}

#[test]
fn errors_in_document_order() {
    let schema = json!({
        "properties": {
            "name": {"type": "string", "minLength": 2},
            "tags": {"type": "array", "maxItems": 1}
        },
        "required": ["id"]
    });
    assert_eq!(
        errors(&json!({"name": "a", "tags": [1, 2]}), &schema, CheckMode::NORMAL),
        vec![
            "#/name: Must be at least 2 characters long",
            "#/tags: There must be a maximum of 1 item in the array",
            "#/id: The property id is required",
        ]
    );
}

#[test]
fn fail_fast() {
    let schema = json!({"properties": {"a": {"type": "string"}, "b": {"type": "string"}}});
    let error = validate(&json!({"a": 1, "b": 2}), &schema, None, CheckMode::EXCEPTIONS)
        .expect_err("Fails on the first violation");
    let error = error.as_validation_error().expect("A violation");
    assert_eq!(error.pointer(), "#/a");
    assert!(matches!(
        validate(&json!({"a": "x"}), &schema, None, CheckMode::EXCEPTIONS),
        Ok(report) if report.valid
    ));
}

#[test]
fn combined_modes() {
    let schema = json!({
        "type": "object",
        "properties": {"count": {"type": "integer"}, "label": {"default": "none"}}
    });
    let mut instance = json!({"count": "3"});
    let report = Validator::new()
        .coerce(
            &mut instance,
            &schema,
            None,
            CheckMode::TYPE_CAST | CheckMode::APPLY_DEFAULTS,
        )
        .expect("Valid schema");
    assert!(report.valid);
    assert_eq!(instance, json!({"count": 3, "label": "none"}));
}

#[test]
fn defaults_are_validated() {
    let schema = json!({"properties": {"a": {"type": "integer", "default": "x"}}});
    let mut instance = json!({});
    let report = Validator::new()
        .coerce(&mut instance, &schema, None, CheckMode::APPLY_DEFAULTS)
        .expect("Valid schema");
    assert!(!report.valid);
    assert!(report.errors[0].location().from_default());
}

#[test]
fn schema_validation() {
    let schema = json!({"minLength": -1});
    let report = validate(&json!("a"), &schema, None, CheckMode::VALIDATE_SCHEMA)
        .expect("Meta-schema evaluates");
    assert!(!report.valid);
    assert_eq!(report.context_mask.bits(), 2);
    let report = validate(&json!("a"), &json!({"minLength": 1}), None, CheckMode::VALIDATE_SCHEMA)
        .expect("Valid schema");
    assert!(report.valid);
}

#[test]
fn read_only() {
    let schema = json!({"type": "string", "readonly": true});
    let validator = Validator::new();
    assert!(validator.is_valid(&json!("a"), &schema));
    let report = validator
        .validate_property_change(&json!("a"), &schema, None, CheckMode::NORMAL)
        .expect("Valid schema");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].constraint().name(), "readOnly");
}

#[test]
fn array_as_object() {
    let schema = json!({"type": "object", "properties": {"1": {"type": "integer"}}});
    assert!(!jsonschema_check::is_valid(&schema, &json!(["a", 1])));
    let report = validate(&json!(["a", 1]), &schema, None, CheckMode::ARRAY_AS_OBJECT)
        .expect("Valid schema");
    assert!(report.valid);
}

#[test]
fn cyclic_reference() {
    let schema = json!({"definitions": {"a": {"$ref": "#/definitions/b"}, "b": {"$ref": "#/definitions/a"}}, "$ref": "#/definitions/a"});
    assert!(matches!(
        validate(&json!(1), &schema, None, CheckMode::NORMAL),
        Err(SchemaError::TooDeep { .. })
    ));
}

#[test]
fn recursive_schema() {
    let schema = json!({
        "type": "object",
        "properties": {"children": {"type": "array", "items": {"$ref": "#"}}},
        "additionalProperties": false
    });
    let instance = json!({"children": [{"children": []}, {"children": [{"name": 1}]}]});
    assert_eq!(
        errors(&instance, &schema, CheckMode::NORMAL),
        vec!["#/children/1/children/0: The property name is not defined and the definition does not allow additional properties"]
    );
}

#[test]
fn wire_shape() {
    let report = validate(&json!({"a": 7}), &json!({"properties": {"a": {"maximum": 5}}}), None, CheckMode::NORMAL)
        .expect("Valid schema");
    assert_eq!(
        serde_json::to_value(&report).expect("Serializable"),
        json!({
            "valid": false,
            "errors": [{
                "property": "a",
                "pointer": "#/a",
                "message": "Must be less than or equal to 5",
                "constraint": {
                    "name": "maximum",
                    "params": {"maximum": 5, "exclusive": false}
                },
                "context": 1
            }],
            "context_mask": 1
        })
    );
}
