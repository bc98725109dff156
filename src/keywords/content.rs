//! `contentEncoding` and `contentMediaType`.
use crate::{
    content_encoding::DEFAULT_CONTENT_ENCODING_CONVERTERS,
    content_media_type::DEFAULT_CONTENT_MEDIA_TYPE_CHECKS,
    context::ValidationContext,
    error::ValidationErrorKind,
    keywords::CheckResult,
    paths::InstancePath,
};
use serde_json::{Map, Value};
use std::{borrow::Cow, str};

/// The string is decoded first when an encoding is declared, the media type applies to the
/// decoded content. Unknown encodings and media types are not checked.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    string: &str,
    object: &Map<String, Value>,
    path: &InstancePath<'_>,
) -> CheckResult {
    let content = match object.get("contentEncoding").and_then(Value::as_str) {
        Some(encoding) => match DEFAULT_CONTENT_ENCODING_CONVERTERS.get(encoding) {
            Some(convert) => match convert(string) {
                Some(decoded) => Cow::Owned(decoded),
                None => {
                    return ctx.error(
                        ValidationErrorKind::ContentEncoding {
                            encoding: encoding.to_string(),
                        },
                        path,
                    )
                }
            },
            None => return Ok(()),
        },
        None => Cow::Borrowed(string.as_bytes()),
    };
    if let Some(media_type) = object.get("contentMediaType").and_then(Value::as_str) {
        if let Some(is_valid) = DEFAULT_CONTENT_MEDIA_TYPE_CHECKS.get(media_type) {
            // Binary content never satisfies a text media type
            if !str::from_utf8(&content).map_or(false, is_valid) {
                ctx.error(
                    ValidationErrorKind::ContentMediaType {
                        media_type: media_type.to_string(),
                    },
                    path,
                )?;
            }
        }
    }
    Ok(())
}
