//! Entry points of a validation run and the report they produce.
use crate::{
    context::{Formats, Patch, Scope, ValidationContext},
    error::{ErrorContext, SchemaError, ValidationError},
    error_bag::ErrorBag,
    keywords,
    mode::CheckMode,
    options::ValidationOptions,
    paths::InstancePath,
    resolver::{Resolver, SchemaStore},
    retriever::Retrieve,
    schemas::{draft_from_schema, id_of, Draft},
    type_check::{self, TypeCheck},
    uri,
};
use serde::Serialize;
use serde_json::Value;
use std::{fmt, sync::Arc};
use tracing::{debug, trace};

/// Outcome of checking one instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Report {
    /// `true` when no violation was found.
    pub valid: bool,
    /// Violations in the order they were found.
    pub errors: Vec<ValidationError>,
    /// Bitwise OR of the contexts of all errors.
    pub context_mask: ErrorContext,
}

impl Report {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// Configured validator. Holds no per-run state and may be shared between threads.
///
/// ```rust
/// use jsonschema_check::{CheckMode, Validator};
/// use serde_json::json;
///
/// let validator = Validator::new();
/// let schema = json!({"properties": {"a": {"type": "integer"}}});
/// let report = validator
///     .validate(&json!({"a": "b"}), &schema, None, CheckMode::NORMAL)
///     .expect("Valid schema");
/// assert!(!report.is_valid());
/// assert_eq!(
///     report.errors[0].to_string(),
///     "#/a: String value found, but an integer is required"
/// );
/// ```
#[derive(Clone)]
pub struct Validator {
    draft: Draft,
    retriever: Arc<dyn Retrieve>,
    store: Arc<SchemaStore>,
    formats: Option<Formats>,
    max_depth: usize,
    base_uri: Option<String>,
}

impl Validator {
    /// Return a default `ValidationOptions` that can configure a `Validator`.
    #[must_use]
    pub fn options() -> ValidationOptions {
        ValidationOptions::default()
    }

    /// A validator with default options.
    #[must_use]
    pub fn new() -> Validator {
        Validator::from_options(&ValidationOptions::default())
    }

    pub(crate) fn from_options(options: &ValidationOptions) -> Validator {
        Validator {
            draft: options.draft,
            retriever: Arc::clone(&options.retriever),
            store: options
                .store
                .clone()
                .unwrap_or_else(|| Arc::new(SchemaStore::new())),
            formats: if options.formats_enabled {
                Some(options.formats.clone())
            } else {
                None
            },
            max_depth: options.max_depth,
            base_uri: options.base_uri.clone(),
        }
    }

    /// Document cache used by this validator.
    #[must_use]
    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    /// Check `instance` against `schema`.
    ///
    /// `base_uri` overrides the configured base URI for this run.
    ///
    /// # Errors
    ///
    /// A [`SchemaError`] when the schema cannot be evaluated, or the first violation when
    /// `mode` contains [`CheckMode::EXCEPTIONS`].
    pub fn validate(
        &self,
        instance: &Value,
        schema: &Value,
        base_uri: Option<&str>,
        mode: CheckMode,
    ) -> Result<Report, SchemaError> {
        self.run(instance, schema, base_uri, mode, false)
            .map(|(report, _)| report)
    }

    /// Check a value about to be written into a property.
    ///
    /// Read-only schemas reject any value and the schema itself is never meta-validated.
    ///
    /// # Errors
    ///
    /// Same as [`Validator::validate`].
    pub fn validate_property_change(
        &self,
        instance: &Value,
        schema: &Value,
        base_uri: Option<&str>,
        mode: CheckMode,
    ) -> Result<Report, SchemaError> {
        self.run(instance, schema, base_uri, mode, true)
            .map(|(report, _)| report)
    }

    /// Check `instance` and write back the values produced by [`CheckMode::TYPE_CAST`] and
    /// [`CheckMode::APPLY_DEFAULTS`].
    ///
    /// ```rust
    /// use jsonschema_check::{CheckMode, Validator};
    /// use serde_json::json;
    ///
    /// let schema = json!({"properties": {"a": {"type": "integer"}, "b": {"default": "x"}}});
    /// let mut instance = json!({"a": "5"});
    /// let report = Validator::new()
    ///     .coerce(&mut instance, &schema, None, CheckMode::TYPE_CAST | CheckMode::APPLY_DEFAULTS)
    ///     .expect("Valid schema");
    /// assert!(report.is_valid());
    /// assert_eq!(instance, json!({"a": 5, "b": "x"}));
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`Validator::validate`]. The instance is left untouched on error.
    pub fn coerce(
        &self,
        instance: &mut Value,
        schema: &Value,
        base_uri: Option<&str>,
        mode: CheckMode,
    ) -> Result<Report, SchemaError> {
        let (report, patches) = self.run(instance, schema, base_uri, mode, false)?;
        trace!(count = patches.len(), "Applying instance changes");
        let types = type_check::for_mode(mode);
        for patch in patches {
            apply(types, instance, patch);
        }
        Ok(report)
    }

    /// Whether `instance` is valid against `schema`. Unusable schemas count as a failure.
    #[must_use]
    pub fn is_valid(&self, instance: &Value, schema: &Value) -> bool {
        self.validate(instance, schema, None, CheckMode::NORMAL)
            .map_or(false, |report| report.valid)
    }

    fn run(
        &self,
        instance: &Value,
        schema: &Value,
        base_uri: Option<&str>,
        mode: CheckMode,
        property_change: bool,
    ) -> Result<(Report, Vec<Patch>), SchemaError> {
        let base = base_uri.or(self.base_uri.as_deref()).unwrap_or("");
        if !base.is_empty() && !uri::is_absolute(base) {
            return Err(SchemaError::Configuration(format!(
                "base URI must be absolute, got '{}'",
                base
            )));
        }
        let draft = draft_from_schema(schema).unwrap_or(self.draft);
        trace!(?draft, base, mode = mode.bits(), "Validation started");
        let mut errors = ErrorBag::new(mode.contains(CheckMode::EXCEPTIONS));
        if mode.contains(CheckMode::VALIDATE_SCHEMA) && !property_change {
            errors = self.validate_schema(schema, draft, errors)?;
            if !errors.is_empty() {
                return Ok((into_report(errors), Vec::new()));
            }
            // The same bag collects the instance errors
            errors.reset();
            errors.set_context(ErrorContext::DOCUMENT);
        }
        let resolver = Resolver::new(schema, base, draft, &self.store, &*self.retriever)?;
        let mut ctx =
            ValidationContext::new(mode, resolver, self.formats.as_ref(), self.max_depth)
                .with_errors(errors);
        keywords::check(
            &mut ctx,
            Some(instance),
            schema,
            &Scope::new(base, draft),
            &InstancePath::new(),
            property_change,
        )?;
        let (errors, patches) = ctx.finish();
        Ok((into_report(errors), patches))
    }

    /// Check the schema document against the meta-schema of its dialect.
    fn validate_schema(
        &self,
        schema: &Value,
        draft: Draft,
        errors: ErrorBag,
    ) -> Result<ErrorBag, SchemaError> {
        let meta_schema = draft.meta_schema();
        let meta_draft = draft_from_schema(meta_schema).unwrap_or(draft);
        let base = id_of(meta_draft, meta_schema).unwrap_or("");
        debug!(?draft, meta_schema = base, "Validating the schema document");
        // Meta-validation never rewrites the schema and uses native container typing
        let mode = if errors.is_fail_fast() {
            CheckMode::EXCEPTIONS
        } else {
            CheckMode::NORMAL
        };
        let resolver = Resolver::new(meta_schema, base, meta_draft, &self.store, &*self.retriever)?;
        let mut ctx =
            ValidationContext::new(mode, resolver, self.formats.as_ref(), self.max_depth)
                .with_errors(errors);
        ctx.errors_mut().set_context(ErrorContext::SCHEMA);
        keywords::check(
            &mut ctx,
            Some(schema),
            meta_schema,
            &Scope::new(base, meta_draft),
            &InstancePath::new(),
            false,
        )?;
        let (errors, _) = ctx.finish();
        if !errors.is_empty() {
            debug!(count = errors.len(), "Schema document is invalid");
        }
        Ok(errors)
    }
}

fn into_report(errors: ErrorBag) -> Report {
    Report {
        valid: errors.is_empty(),
        context_mask: errors.mask(),
        errors: errors.into_errors(),
    }
}

impl Default for Validator {
    fn default() -> Self {
        Validator::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("draft", &self.draft)
            .field("store", &self.store)
            .field("formats_enabled", &self.formats.is_some())
            .field("max_depth", &self.max_depth)
            .field("base_uri", &self.base_uri)
            .finish()
    }
}

/// Write `patch` into `target`. Changes below a vanished container are dropped.
fn apply(types: &dyn TypeCheck, target: &mut Value, patch: Patch) {
    let Some((last, parents)) = patch.segments.split_last() else {
        *target = patch.value;
        return;
    };
    let mut current = target;
    for segment in parents {
        current = match child_mut(current, segment) {
            Some(child) => child,
            None => return,
        };
    }
    types.property_set(current, last, patch.value);
}

fn child_mut<'v>(value: &'v mut Value, segment: &str) -> Option<&'v mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(move |idx| items.get_mut(idx)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn report() {
        let report = Validator::new()
            .validate(&json!("a"), &json!({"type": "integer"}), None, CheckMode::NORMAL)
            .expect("Valid schema");
        assert!(!report.is_valid());
        assert_eq!(report.context_mask, ErrorContext::DOCUMENT);
        assert_eq!(
            report.into_errors()[0].to_string(),
            "#: String value found, but an integer is required"
        );
    }

    #[test]
    fn instance_errors_after_schema_pass() {
        let report = Validator::new()
            .validate(
                &json!("a"),
                &json!({"type": "integer"}),
                None,
                CheckMode::VALIDATE_SCHEMA,
            )
            .expect("Valid schema");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].context(), ErrorContext::DOCUMENT);
        assert_eq!(report.context_mask, ErrorContext::DOCUMENT);
    }

    #[test]
    fn schema_errors_are_reported_in_their_own_context() {
        let schema = json!({"type": 1});
        let report = Validator::new()
            .validate(&json!({}), &schema, None, CheckMode::VALIDATE_SCHEMA)
            .expect("Meta-schema evaluates");
        assert!(!report.valid);
        assert_eq!(report.context_mask, ErrorContext::SCHEMA);
        assert_eq!(report.context_mask.bits(), 2);
        assert!(report
            .errors
            .iter()
            .all(|error| error.context() == ErrorContext::SCHEMA));
    }

    #[test_case(&json!({"type": "string"}); "draft 4")]
    #[test_case(&json!({"$schema": "http://json-schema.org/draft-03/schema#", "properties": {"a": {"required": true}}}); "draft 3")]
    #[test_case(&json!({"$schema": "http://json-schema.org/draft-06/schema#", "exclusiveMinimum": 1}); "draft 6")]
    #[test_case(&json!({"$schema": "http://json-schema.org/draft-07/schema#", "if": {"type": "string"}}); "draft 7")]
    fn valid_schema_documents(schema: &Value) {
        let report = Validator::new()
            .validate(&json!("a"), schema, None, CheckMode::VALIDATE_SCHEMA)
            .expect("Valid schema");
        assert!(report.valid, "{:?}", report.errors);
        assert_eq!(report.context_mask, ErrorContext::NONE);
    }

    #[test]
    fn property_change_skips_the_schema_document() {
        let schema = json!({"type": 1, "readonly": true});
        let error = Validator::new()
            .validate_property_change(&json!(1), &schema, None, CheckMode::VALIDATE_SCHEMA)
            .expect_err("Malformed type");
        assert!(matches!(error, SchemaError::MalformedSchema { .. }));
    }

    #[test]
    fn coerce_leaves_invalid_values_alone() {
        let schema = json!({"items": {"type": "integer"}});
        let mut instance = json!(["1", "x", 2]);
        let report = Validator::new()
            .coerce(&mut instance, &schema, None, CheckMode::TYPE_CAST)
            .expect("Valid schema");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(instance, json!([1, "x", 2]));
    }

    #[test]
    fn coerce_root() {
        let mut instance = json!("true");
        Validator::new()
            .coerce(&mut instance, &json!({"type": "boolean"}), None, CheckMode::TYPE_CAST)
            .expect("Valid schema");
        assert_eq!(instance, json!(true));
    }

    #[test]
    fn nested_defaults() {
        let schema = json!({
            "properties": {
                "a": {"default": {}, "properties": {"b": {"default": 1}}}
            }
        });
        let mut instance = json!({});
        let report = Validator::new()
            .coerce(&mut instance, &schema, None, CheckMode::APPLY_DEFAULTS)
            .expect("Valid schema");
        assert!(report.valid);
        assert_eq!(instance, json!({"a": {"b": 1}}));
    }

    #[test]
    fn relative_base_uri() {
        assert!(matches!(
            Validator::new().validate(&json!(1), &json!({}), Some("relative"), CheckMode::NORMAL),
            Err(SchemaError::Configuration(_))
        ));
    }

    #[test]
    fn is_valid_on_broken_schema() {
        assert!(!Validator::new().is_valid(&json!(1), &json!({"type": 5})));
    }
}
