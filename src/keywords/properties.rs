use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationErrorKind},
    keywords::{self, CheckResult},
    paths::InstancePath,
};
use serde_json::{Map, Value};

/// `properties`, `patternProperties` and `additionalProperties`, plus the draft 3 `requires`
/// of every declared property that is present.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let types = ctx.types;
    let properties = match object.get("properties") {
        None => None,
        Some(Value::Object(properties)) => Some(properties),
        Some(other) => {
            return Err(SchemaError::malformed(
                &scope.base,
                format!("'properties' must be an object, got {}", other),
            ))
        }
    };
    if let Some(properties) = properties {
        for (name, subschema) in properties {
            let value = types.property_get(instance, name);
            let child = path.push(name.as_str());
            keywords::check(ctx, value, subschema, scope, &child, false)?;
            if value.is_some() && scope.draft.supports_legacy_keywords() {
                if let Some(requires) = subschema.get("requires") {
                    check_requires(ctx, instance, name, requires, scope, &child)?;
                }
            }
        }
    }
    let patterns = match object.get("patternProperties") {
        None => None,
        Some(Value::Object(patterns)) => Some(patterns),
        Some(other) => {
            return Err(SchemaError::malformed(
                &scope.base,
                format!("'patternProperties' must be an object, got {}", other),
            ))
        }
    };
    let additional = object.get("additionalProperties");
    if patterns.is_none() && additional.is_none() {
        return Ok(());
    }
    for (name, value) in types.entries(instance) {
        let child = path.push(&*name);
        let mut matched = false;
        if let Some(patterns) = patterns {
            for (pattern, subschema) in patterns {
                let regex = ctx.regex(pattern, scope)?;
                if regex.is_match(&name).unwrap_or(false) {
                    matched = true;
                    keywords::check(ctx, Some(value), subschema, scope, &child, false)?;
                }
            }
        }
        let declared = properties.map_or(false, |properties| properties.contains_key(&*name));
        if declared || matched || name == "$schema" {
            continue;
        }
        match additional {
            None | Some(Value::Bool(true)) => {}
            Some(Value::Bool(false)) => ctx.error(
                ValidationErrorKind::AdditionalProperties {
                    property: name.to_string(),
                },
                path,
            )?,
            Some(schema @ Value::Object(_)) => {
                keywords::check(ctx, Some(value), schema, scope, &child, false)?
            }
            Some(other) => {
                return Err(SchemaError::malformed(
                    &scope.base,
                    format!(
                        "'additionalProperties' must be a boolean or a schema, got {}",
                        other
                    ),
                ))
            }
        }
    }
    Ok(())
}

/// Draft 3 `requires`: a sibling name, a list of them, or a schema for the whole object.
fn check_requires(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    property: &str,
    requires: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    match requires {
        Value::String(sibling) => require_sibling(ctx, instance, property, sibling, path),
        Value::Array(siblings) => {
            for sibling in siblings {
                match sibling {
                    Value::String(sibling) => {
                        require_sibling(ctx, instance, property, sibling, path)?
                    }
                    other => {
                        return Err(SchemaError::malformed(
                            &scope.base,
                            format!("'requires' members must be strings, got {}", other),
                        ))
                    }
                }
            }
            Ok(())
        }
        Value::Object(_) => keywords::check(ctx, Some(instance), requires, scope, path, false),
        other => Err(SchemaError::malformed(
            &scope.base,
            format!("'requires' must be a string or a schema, got {}", other),
        )),
    }
}

fn require_sibling(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    property: &str,
    sibling: &str,
    path: &InstancePath<'_>,
) -> CheckResult {
    if ctx.types.property_exists(instance, sibling) {
        return Ok(());
    }
    ctx.error(
        ValidationErrorKind::Requires {
            property: property.to_string(),
            requires: sibling.to_string(),
        },
        path,
    )
}
