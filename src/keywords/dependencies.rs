use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationErrorKind},
    keywords::{self, CheckResult},
    paths::InstancePath,
};
use serde_json::Value;

/// `dependencies`: property dependencies (a name or a list of names) and schema dependencies.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    dependencies: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let dependencies = dependencies.as_object().ok_or_else(|| {
        SchemaError::malformed(
            &scope.base,
            format!("'dependencies' must be an object, got {}", dependencies),
        )
    })?;
    for (property, dependency) in dependencies {
        if !ctx.types.property_exists(instance, property) {
            continue;
        }
        match dependency {
            Value::String(name) => require(ctx, instance, property, name, path)?,
            Value::Array(names) => {
                for name in names {
                    let name = name.as_str().ok_or_else(|| {
                        SchemaError::malformed(
                            &scope.base,
                            format!("property dependencies must be strings, got {}", name),
                        )
                    })?;
                    require(ctx, instance, property, name, path)?;
                }
            }
            Value::Object(_) | Value::Bool(_) => {
                keywords::check(ctx, Some(instance), dependency, scope, path, false)?
            }
            other => {
                return Err(SchemaError::malformed(
                    &scope.base,
                    format!("invalid dependency of '{}': {}", property, other),
                ))
            }
        }
    }
    Ok(())
}

fn require(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    property: &str,
    dependency: &str,
    path: &InstancePath<'_>,
) -> CheckResult {
    if ctx.types.property_exists(instance, dependency) {
        return Ok(());
    }
    ctx.error(
        ValidationErrorKind::Dependencies {
            property: property.to_string(),
            dependency: dependency.to_string(),
        },
        path,
    )
}
