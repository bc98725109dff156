use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationError, ValidationErrorKind},
    keywords::{check, helpers, CheckResult},
    mode::CheckMode,
    paths::InstancePath,
};
use serde_json::{Number, Value};

/// Shape of a `type` / `disallow` value.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TypeExpr<'s> {
    /// `"integer"`
    Name(&'s str),
    /// `["integer", {"type": "string"}]`
    Union(&'s [Value]),
    /// `{"type": "string"}`, a schema the value has to satisfy
    Nested(&'s Value),
}

impl<'s> TypeExpr<'s> {
    pub(crate) fn parse(value: &'s Value, scope: &Scope) -> Result<TypeExpr<'s>, SchemaError> {
        match value {
            Value::String(name) => Ok(TypeExpr::Name(name)),
            Value::Array(members) => Ok(TypeExpr::Union(members)),
            Value::Object(_) | Value::Bool(_) => Ok(TypeExpr::Nested(value)),
            other => Err(SchemaError::malformed(
                &scope.base,
                format!("invalid type expression {}", other),
            )),
        }
    }
}

enum Outcome {
    Match,
    Cast(Value),
    Mismatch,
}

/// Whether `instance` is of the named type, possibly after a lossless coercion.
fn match_name(
    ctx: &ValidationContext<'_>,
    name: &str,
    instance: &Value,
    allow_cast: bool,
    scope: &Scope,
) -> Result<Outcome, SchemaError> {
    let matched = match name {
        "any" => true,
        "null" => instance.is_null(),
        "boolean" => instance.is_boolean(),
        "integer" => matches!(instance, Value::Number(number) if helpers::is_integer(number)),
        "number" => instance.is_number(),
        "string" => instance.is_string(),
        "array" => ctx.types.is_array(instance),
        "object" => ctx.types.is_object(instance),
        other => {
            return Err(SchemaError::malformed(
                &scope.base,
                format!("unknown type '{}'", other),
            ))
        }
    };
    if matched {
        return Ok(Outcome::Match);
    }
    if allow_cast {
        if let Some(cast) = cast(name, instance) {
            return Ok(Outcome::Cast(cast));
        }
    }
    Ok(Outcome::Mismatch)
}

/// Lossless coercion: rendering the result back has to reproduce the original text.
fn cast(name: &str, instance: &Value) -> Option<Value> {
    match (name, instance) {
        ("integer", Value::String(text)) => {
            let number = if let Ok(value) = text.parse::<u64>() {
                Number::from(value)
            } else {
                Number::from(text.parse::<i64>().ok()?)
            };
            (number.to_string() == *text).then(|| Value::Number(number))
        }
        ("number", Value::String(text)) => {
            let number = if let Ok(value) = text.parse::<u64>() {
                Number::from(value)
            } else if let Ok(value) = text.parse::<i64>() {
                Number::from(value)
            } else {
                Number::from_f64(text.parse::<f64>().ok()?)?
            };
            (number.to_string() == *text).then(|| Value::Number(number))
        }
        ("string", Value::Number(number)) => Some(Value::String(number.to_string())),
        ("boolean", Value::String(text)) => match text.as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn type_error(names: Vec<String>, instance: &Value) -> ValidationErrorKind {
    ValidationErrorKind::Type {
        expected: names,
        found: helpers::type_name(instance).to_string(),
    }
}

/// `type`. Returns the coerced value when `TYPE_CAST` converted the instance.
pub(crate) fn check_type(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    expression: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> Result<Option<Value>, SchemaError> {
    let allow_cast = ctx.mode.contains(CheckMode::TYPE_CAST);
    match TypeExpr::parse(expression, scope)? {
        TypeExpr::Name(name) => match match_name(ctx, name, instance, allow_cast, scope)? {
            Outcome::Match => Ok(None),
            Outcome::Cast(value) => {
                ctx.record_patch(path, value.clone());
                Ok(Some(value))
            }
            Outcome::Mismatch => {
                ctx.error(type_error(vec![name.to_string()], instance), path)?;
                Ok(None)
            }
        },
        TypeExpr::Nested(schema) => {
            check(ctx, Some(instance), schema, scope, path, false)?;
            Ok(None)
        }
        TypeExpr::Union(members) => check_union(ctx, instance, members, allow_cast, scope, path),
    }
}

/// The first matching member wins. Exact matches are preferred over coercions.
fn check_union(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    members: &[Value],
    allow_cast: bool,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> Result<Option<Value>, SchemaError> {
    let mut names = Vec::new();
    let mut errors: Vec<ValidationError> = Vec::new();
    for member in members {
        match TypeExpr::parse(member, scope)? {
            TypeExpr::Name(name) => {
                if let Outcome::Match = match_name(ctx, name, instance, false, scope)? {
                    return Ok(None);
                }
                names.push(name);
            }
            TypeExpr::Nested(schema) => {
                let failures =
                    ctx.isolated(|ctx| check(ctx, Some(instance), schema, scope, path, false))?;
                if failures.is_empty() {
                    return Ok(None);
                }
                errors.extend(failures);
            }
            TypeExpr::Union(_) => {
                return Err(SchemaError::malformed(
                    &scope.base,
                    "type unions can not be nested",
                ))
            }
        }
    }
    if allow_cast {
        for name in &names {
            if let Outcome::Cast(value) = match_name(ctx, name, instance, true, scope)? {
                ctx.record_patch(path, value.clone());
                return Ok(Some(value));
            }
        }
    }
    if !names.is_empty() {
        let names = names.into_iter().map(str::to_string).collect();
        ctx.error(type_error(names, instance), path)?;
    }
    ctx.extend_errors(errors)?;
    Ok(None)
}

/// Legacy `disallow`: the value must not match the type expression.
pub(crate) fn check_disallow(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    disallow: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let matched = ctx.probe(|ctx| check_type(ctx, instance, disallow, scope, path).map(|_| ()))?;
    if matched {
        ctx.error(ValidationErrorKind::Disallow, path)?;
    }
    Ok(())
}
