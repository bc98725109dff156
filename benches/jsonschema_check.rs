use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsonschema_check::{CheckMode, Validator};
use serde_json::{json, Value};

macro_rules! bench_validate {
    ($b:ident, $name:expr, $schema:tt, $data: tt) => {
        fn $b(c: &mut Criterion) {
            let schema = json!($schema);
            let validator = Validator::new();
            let data = black_box(json!($data));
            c.bench_function($name, |b| b.iter(|| validator.is_valid(&data, &schema)));
        }
    };
}

fn fast_schema() -> Value {
    json!({
        "type": "array",
        "items": [
            {"type": "number", "maximum": 10, "exclusiveMaximum": true},
            {"type": "string", "enum": ["hello", "world"]},
            {"type": "array", "minItems": 1, "maxItems": 3, "items": [
                {"type": "number"}, {"type": "string"}, {"type": "boolean"}
            ]},
            {
                "type": "object",
                "required": ["a", "b"],
                "minProperties": 3,
                "properties": {"a": {"type": ["null", "string"]}, "b": {"type": ["null", "string"]}},
                "additionalProperties": {"type": "string"}
            },
            {"not": {"type": ["null"]}},
            {"oneOf": [{"type": "number", "multipleOf": 3}, {"type": "number", "multipleOf": 5}]}
        ]
    })
}

fn fast_valid(c: &mut Criterion) {
    let schema = fast_schema();
    let validator = Validator::new();
    let data =
        black_box(json!([9, "hello", [1, "a", true], {"a": "a", "b": "b", "d": "d"}, 42, 3]));
    c.bench_function("fast schema valid", |b| {
        b.iter(|| validator.is_valid(&data, &schema))
    });
}

fn fast_invalid(c: &mut Criterion) {
    let schema = fast_schema();
    let validator = Validator::new();
    let data =
        black_box(json!([10, "world", [1, "a", true], {"a": "a", "b": "b", "c": "xy"}, "str", 5]));
    c.bench_function("fast schema invalid report", |b| {
        b.iter(|| validator.validate(&data, &schema, None, CheckMode::NORMAL))
    });
}

fn type_cast(c: &mut Criterion) {
    let schema = json!({"type": "object", "properties": {"a": {"type": "integer"}, "b": {"type": "boolean"}}});
    let validator = Validator::new();
    let data = black_box(json!({"a": "42", "b": "true"}));
    c.bench_function("type cast", |b| {
        b.iter(|| {
            let mut instance = data.clone();
            validator.coerce(&mut instance, &schema, None, CheckMode::TYPE_CAST)
        })
    });
}

fn local_reference(c: &mut Criterion) {
    let schema = json!({
        "definitions": {"node": {"type": "object", "properties": {"next": {"$ref": "#/definitions/node"}}}},
        "$ref": "#/definitions/node"
    });
    let validator = Validator::new();
    let data = black_box(json!({"next": {"next": {"next": {"next": {}}}}}));
    c.bench_function("local reference", |b| {
        b.iter(|| validator.is_valid(&data, &schema))
    });
}

fn schema_validation(c: &mut Criterion) {
    let schema = fast_schema();
    let validator = Validator::new();
    let data = black_box(json!([1, "hello"]));
    c.bench_function("meta-schema validation", |b| {
        b.iter(|| validator.validate(&data, &schema, None, CheckMode::VALIDATE_SCHEMA))
    });
}

bench_validate!(type_string, "type string", {"type": "string"}, "1");
bench_validate!(type_union, "type union", {"type": ["integer", "null"]}, null);
bench_validate!(required, "required", {"required": ["a", "b"]}, {"a": 1, "b": 2});
bench_validate!(properties, "properties", {"properties": {"a": {"type": "integer"}}}, {"a": 1});
bench_validate!(pattern, "pattern", {"pattern": "^[a-z]+\\d$"}, "abc1");
bench_validate!(format_date_time, "format date-time", {"format": "date-time"}, "2020-01-01T00:00:00Z");
bench_validate!(unique_items, "uniqueItems", {"uniqueItems": true}, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17]);
bench_validate!(all_of_valid, "allOf valid", {"allOf": [{"type": "integer"}, {"minimum": 2}]}, 4);
bench_validate!(any_of_invalid, "anyOf invalid", {"anyOf": [{"type": "integer"}, {"minimum": 2}]}, 1.5);
bench_validate!(one_of_valid, "oneOf valid", {"oneOf": [{"type": "integer"}, {"minimum": 2}]}, 1);

criterion_group!(
    keywords,
    type_string,
    type_union,
    required,
    properties,
    pattern,
    format_date_time,
    unique_items,
    all_of_valid,
    any_of_invalid,
    one_of_valid
);
criterion_group!(
    documents,
    fast_valid,
    fast_invalid,
    type_cast,
    local_reference,
    schema_validation
);
criterion_main!(keywords, documents);
