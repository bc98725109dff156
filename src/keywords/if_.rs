use crate::{
    context::{Scope, ValidationContext},
    keywords::{self, CheckResult},
    paths::InstancePath,
};
use serde_json::{Map, Value};

/// `if` / `then` / `else`. The `if` result only picks the branch, its own errors are dropped.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let condition = match object.get("if") {
        Some(condition) => condition,
        None => return Ok(()),
    };
    let matched =
        ctx.probe(|ctx| keywords::check(ctx, Some(instance), condition, scope, path, false))?;
    let branch = if matched {
        object.get("then")
    } else {
        object.get("else")
    };
    if let Some(branch) = branch {
        let failures =
            ctx.isolated(|ctx| keywords::check(ctx, Some(instance), branch, scope, path, false))?;
        ctx.extend_errors(failures)?;
    }
    Ok(())
}
