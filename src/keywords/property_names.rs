use crate::{
    context::{Scope, ValidationContext},
    keywords::{self, CheckResult},
    paths::InstancePath,
};
use serde_json::Value;

/// `propertyNames`: every key is checked as a string value. Errors point at the object.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    schema: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    for (name, _) in ctx.types.entries(instance) {
        let name = Value::String(name.into_owned());
        keywords::check(ctx, Some(&name), schema, scope, path, false)?;
    }
    Ok(())
}
