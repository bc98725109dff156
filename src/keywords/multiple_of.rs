use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationErrorKind},
    keywords::{helpers, CheckResult},
    paths::InstancePath,
};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

const TOLERANCE: f64 = 1e-9;

/// `multipleOf`, plus `divisibleBy` and `maxDecimal` in legacy drafts.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    number: &Number,
    object: &Map<String, Value>,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    check_divisor(ctx, number, object, "multipleOf", scope, path)?;
    if scope.draft.supports_legacy_keywords() {
        check_divisor(ctx, number, object, "divisibleBy", scope, path)?;
        if let Some(limit) = object.get("maxDecimal") {
            let limit = helpers::limit(limit, "maxDecimal", scope)?;
            if !has_max_decimal(number, limit) {
                ctx.error(ValidationErrorKind::MaxDecimal { limit }, path)?;
            }
        }
    }
    Ok(())
}

fn check_divisor(
    ctx: &mut ValidationContext<'_>,
    number: &Number,
    object: &Map<String, Value>,
    keyword: &'static str,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let divisor = match object.get(keyword) {
        Some(divisor) => helpers::number(divisor, keyword, scope)?,
        None => return Ok(()),
    };
    if helpers::compare(divisor, &Number::from(0)) != Some(Ordering::Greater) {
        return Err(SchemaError::malformed(
            &scope.base,
            format!("'{}' must be greater than 0, got {}", keyword, divisor),
        ));
    }
    if !is_multiple(number, divisor) {
        ctx.error(
            ValidationErrorKind::MultipleOf {
                multiple_of: divisor.clone(),
                keyword,
            },
            path,
        )?;
    }
    Ok(())
}

fn as_i128(number: &Number) -> Option<i128> {
    number
        .as_u64()
        .map(i128::from)
        .or_else(|| number.as_i64().map(i128::from))
}

/// Exact for integers. Floats are compared to their rounded quotient within a tolerance.
pub(crate) fn is_multiple(number: &Number, divisor: &Number) -> bool {
    if let (Some(value), Some(divisor)) = (as_i128(number), as_i128(divisor)) {
        return value % divisor == 0;
    }
    match (number.as_f64(), divisor.as_f64()) {
        (Some(value), Some(divisor)) => {
            let quotient = value / divisor;
            quotient.is_finite() && (quotient - quotient.round()).abs() < TOLERANCE
        }
        _ => false,
    }
}

/// `value * 10^places` has to be a whole number.
pub(crate) fn has_max_decimal(number: &Number, places: u64) -> bool {
    if number.is_u64() || number.is_i64() {
        return true;
    }
    let value = number.as_f64().unwrap_or_default();
    let scaled = value * 10_f64.powi(i32::try_from(places).unwrap_or(i32::MAX));
    !scaled.is_finite() || (scaled - scaled.round()).abs() < TOLERANCE
}
