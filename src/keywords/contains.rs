use crate::{
    context::{Scope, ValidationContext},
    error::ValidationErrorKind,
    keywords::{self, helpers, CheckResult},
    paths::InstancePath,
};
use serde_json::{Map, Value};

/// `contains` with the `minContains` / `maxContains` bounds of draft 2019-09.
///
/// Without bounds at least one element has to match.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    elements: &[&Value],
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let schema = match object.get("contains") {
        Some(schema) => schema,
        None => return Ok(()),
    };
    let (min, max) = if scope.draft.supports_contains_bounds() {
        let min = match object.get("minContains") {
            Some(limit) => helpers::limit(limit, "minContains", scope)?,
            None => 1,
        };
        let max = match object.get("maxContains") {
            Some(limit) => Some(helpers::limit(limit, "maxContains", scope)?),
            None => None,
        };
        (min, max)
    } else {
        (1, None)
    };
    let mut count: u64 = 0;
    for (idx, element) in elements.iter().enumerate() {
        let item = path.push(idx);
        if ctx.probe(|ctx| keywords::check(ctx, Some(*element), schema, scope, &item, false))? {
            count += 1;
        }
    }
    if count < min {
        ctx.error(ValidationErrorKind::Contains { min, count }, path)?;
    }
    if let Some(max) = max {
        if count > max {
            ctx.error(ValidationErrorKind::MaxContains { max, count }, path)?;
        }
    }
    Ok(())
}
