//! # jsonschema-check
//!
//! A crate for checking JSON documents against JSON Schema. Every violation is reported with
//! its location in the instance, a human readable message and a machine readable constraint.
//!
//! Supports:
//!   - JSON Schema drafts 3, 4, 6, 7 and the core of 2019-09;
//!   - `$ref` / `extends` to local fragments, embedded ids and remote documents;
//!   - Type coercion of string inputs and default filling;
//!   - Loading remote documents via the filesystem or HTTP(S).
//!
//! ## Usage Examples:
//! A one-off check with the default configuration
//! ```rust
//! # use jsonschema_check::{CheckMode, SchemaError};
//! # use serde_json::json;
//! # fn foo() -> Result<(), SchemaError> {
//! let schema = json!({"type": "object", "required": ["name"]});
//! let report = jsonschema_check::validate(&json!({}), &schema, None, CheckMode::NORMAL)?;
//! assert_eq!(report.errors[0].to_string(), "#/name: The property name is required");
//! # Ok(())
//! # }
//! ```
//! A configured validator that can be reused across threads
//! ```rust
//! # use jsonschema_check::{CheckMode, Draft, SchemaError, Validator};
//! # use serde_json::json;
//! # fn foo() -> Result<(), SchemaError> {
//! let validator = Validator::options()
//!     .with_draft(Draft::Draft7)
//!     .build()?;
//! let schema = json!({"if": {"minimum": 10}, "then": {"multipleOf": 5}});
//! let report = validator.validate(&json!(12), &schema, None, CheckMode::EXCEPTIONS);
//! assert!(report.is_err());
//! # Ok(())
//! # }
//! ```
#![warn(
    clippy::cast_possible_truncation,
    clippy::doc_markdown,
    clippy::explicit_iter_loop,
    clippy::map_unwrap_or,
    clippy::match_same_arms,
    clippy::needless_borrow,
    clippy::needless_pass_by_value,
    clippy::print_stdout,
    clippy::redundant_closure,
    clippy::trivially_copy_pass_by_ref,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    variant_size_differences
)]
#![allow(clippy::unnecessary_wraps, clippy::upper_case_acronyms)]
mod content_encoding;
mod content_media_type;
mod context;
mod error;
mod error_bag;
mod keywords;
mod mode;
mod options;
mod paths;
mod resolver;
mod retriever;
mod schemas;
mod type_check;
pub mod uri;
mod validator;

pub use error::{Constraint, ErrorContext, SchemaError, ValidationError, ValidationErrorKind};
pub use keywords::format::Format;
pub use mode::CheckMode;
pub use options::ValidationOptions;
pub use paths::JsonPointer;
pub use resolver::SchemaStore;
#[cfg(feature = "resolve-file")]
pub use retriever::FileRetriever;
#[cfg(feature = "resolve-http")]
pub use retriever::HttpRetriever;
pub use retriever::{DefaultRetriever, Resource, Retrieve};
pub use schemas::{draft_from_schema, draft_from_url, Draft};
pub use validator::{Report, Validator};

use once_cell::sync::Lazy;
use serde_json::Value;

static DEFAULT_VALIDATOR: Lazy<Validator> = Lazy::new(Validator::new);

/// Check `instance` against `schema` with the default options.
///
/// Remote documents are cached for the lifetime of the process.
///
/// # Errors
///
/// See [`Validator::validate`].
#[inline]
pub fn validate(
    instance: &Value,
    schema: &Value,
    base_uri: Option<&str>,
    mode: CheckMode,
) -> Result<Report, SchemaError> {
    DEFAULT_VALIDATOR.validate(instance, schema, base_uri, mode)
}

/// A shortcut for validating `instance` against `schema`. Draft version is detected automatically.
/// ```rust
/// use jsonschema_check::is_valid;
/// use serde_json::json;
///
/// let schema = json!({"maxLength": 5});
/// let instance = json!("foo");
/// assert!(is_valid(&schema, &instance));
/// ```
///
/// A schema that cannot be evaluated makes every instance invalid.
#[must_use]
#[inline]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    DEFAULT_VALIDATOR.is_valid(instance, schema)
}

#[cfg(test)]
pub(crate) mod tests_util {
    use super::{CheckMode, Report};
    use serde_json::Value;

    fn report(schema: &Value, instance: &Value, mode: CheckMode) -> Report {
        crate::validate(instance, schema, None, mode).expect("Valid schema")
    }

    pub(crate) fn is_not_valid(schema: &Value, instance: &Value) {
        is_not_valid_with_mode(schema, instance, CheckMode::NORMAL)
    }

    pub(crate) fn is_not_valid_with_mode(schema: &Value, instance: &Value, mode: CheckMode) {
        let report = report(schema, instance, mode);
        assert!(!report.valid, "{} should not be valid", instance);
        assert!(
            !report.errors.is_empty(),
            "{} should not be valid (via errors)",
            instance
        );
    }

    pub(crate) fn expect_errors(schema: &Value, instance: &Value, errors: &[&str]) {
        expect_errors_with_mode(schema, instance, CheckMode::NORMAL, errors)
    }

    pub(crate) fn expect_errors_with_mode(
        schema: &Value,
        instance: &Value,
        mode: CheckMode,
        errors: &[&str],
    ) {
        assert_eq!(
            report(schema, instance, mode)
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<String>>(),
            errors
        )
    }

    pub(crate) fn is_valid(schema: &Value, instance: &Value) {
        is_valid_with_mode(schema, instance, CheckMode::NORMAL)
    }

    pub(crate) fn is_valid_with_mode(schema: &Value, instance: &Value, mode: CheckMode) {
        let report = report(schema, instance, mode);
        assert!(
            report.valid,
            "{} should be valid, got {:?}",
            instance, report.errors
        );
        assert!(crate::is_valid(schema, instance) || mode != CheckMode::NORMAL);
    }
}
