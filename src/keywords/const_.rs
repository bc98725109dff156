use crate::{
    context::ValidationContext,
    error::ValidationErrorKind,
    keywords::{helpers, CheckResult},
    paths::InstancePath,
};
use serde_json::Value;

#[inline]
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    instance: &Value,
    expected: &Value,
    path: &InstancePath<'_>,
) -> CheckResult {
    if helpers::equal(instance, expected) {
        Ok(())
    } else {
        ctx.error(
            ValidationErrorKind::Constant {
                expected: expected.clone(),
            },
            path,
        )
    }
}
