use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationErrorKind},
    keywords::{helpers, CheckResult},
    paths::InstancePath,
};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// `minimum` and `exclusiveMinimum`.
///
/// Before draft 6 `exclusiveMinimum` is a boolean modifier of `minimum`, after that it is
/// a bound of its own.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    number: &Number,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let numeric_exclusive = scope.draft.has_numeric_exclusive_bounds();
    if let Some(limit) = object.get("minimum") {
        let limit = helpers::number(limit, "minimum", scope)?;
        let exclusive =
            !numeric_exclusive && matches!(object.get("exclusiveMinimum"), Some(Value::Bool(true)));
        let order = ordering(number, limit, scope)?;
        let failed = if exclusive {
            order != Ordering::Greater
        } else {
            order == Ordering::Less
        };
        if failed {
            ctx.error(
                ValidationErrorKind::Minimum {
                    limit: limit.clone(),
                    exclusive,
                },
                path,
            )?;
        }
    }
    if numeric_exclusive {
        if let Some(limit) = object.get("exclusiveMinimum") {
            let limit = helpers::number(limit, "exclusiveMinimum", scope)?;
            if ordering(number, limit, scope)? != Ordering::Greater {
                ctx.error(
                    ValidationErrorKind::ExclusiveMinimum {
                        limit: limit.clone(),
                    },
                    path,
                )?;
            }
        }
    }
    Ok(())
}

pub(crate) fn ordering(
    number: &Number,
    limit: &Number,
    scope: &Scope,
) -> Result<Ordering, SchemaError> {
    helpers::compare(number, limit).ok_or_else(|| {
        SchemaError::malformed(&scope.base, format!("{} is not comparable", limit))
    })
}
