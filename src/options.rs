use crate::{
    context::Formats,
    error::SchemaError,
    keywords::format::{self, Format},
    resolver::SchemaStore,
    retriever::{DefaultRetriever, Retrieve},
    schemas::Draft,
    validator::Validator,
};
use std::{fmt, sync::Arc};
use url::Url;

pub(crate) const DEFAULT_MAX_DEPTH: usize = 128;

/// Full configuration to guide validation.
///
/// Using a `ValidationOptions` instance you can configure the default draft, the way remote
/// documents are fetched and cached, the set of known formats and more (check the exposed
/// methods).
/// ```rust
/// use jsonschema_check::{Draft, Validator};
///
/// let validator = Validator::options()
///     .with_draft(Draft::Draft7)
///     .with_max_depth(32)
///     .build()
///     .expect("Valid options");
/// ```
#[derive(Clone)]
pub struct ValidationOptions {
    pub(crate) draft: Draft,
    pub(crate) retriever: Arc<dyn Retrieve>,
    pub(crate) store: Option<Arc<SchemaStore>>,
    pub(crate) formats: Formats,
    pub(crate) formats_enabled: bool,
    pub(crate) max_depth: usize,
    pub(crate) base_uri: Option<String>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            draft: Draft::default(),
            retriever: Arc::new(DefaultRetriever),
            store: None,
            formats: format::builtin(),
            formats_enabled: true,
            max_depth: DEFAULT_MAX_DEPTH,
            base_uri: None,
        }
    }
}

impl ValidationOptions {
    /// Dialect used when a schema does not declare one through `$schema`.
    ///
    /// ```rust
    /// # use jsonschema_check::{Draft, ValidationOptions};
    /// # let mut options = ValidationOptions::default();
    /// options.with_draft(Draft::Draft3);
    /// ```
    #[inline]
    pub fn with_draft(&mut self, draft: Draft) -> &mut Self {
        self.draft = draft;
        self
    }

    /// Fetch documents referenced by `$ref` / `extends` through `retriever`.
    #[inline]
    pub fn with_retriever(&mut self, retriever: impl Retrieve + 'static) -> &mut Self {
        self.retriever = Arc::new(retriever);
        self
    }

    /// Share a document cache with other validators. Every validator gets its own otherwise.
    #[inline]
    pub fn with_store(&mut self, store: Arc<SchemaStore>) -> &mut Self {
        self.store = Some(store);
        self
    }

    /// Register a format, replacing a built-in one with the same name.
    #[inline]
    pub fn with_format(&mut self, name: impl Into<String>, format: impl Format) -> &mut Self {
        self.formats.insert(name.into(), Arc::new(format));
        self
    }

    /// Treat `format` as an annotation only.
    #[inline]
    pub fn without_formats(&mut self) -> &mut Self {
        self.formats_enabled = false;
        self
    }

    /// Limit on nested `$ref` / `extends` resolutions, reached by cyclic schemas.
    #[inline]
    pub fn with_max_depth(&mut self, max_depth: usize) -> &mut Self {
        self.max_depth = max_depth;
        self
    }

    /// Base URI for schemas without one of their own.
    #[inline]
    pub fn with_base_uri(&mut self, base_uri: impl Into<String>) -> &mut Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Build a [`Validator`] with the current options.
    ///
    /// # Errors
    ///
    /// `Configuration` for a relative base URI, a zero depth limit or an unnamed format.
    pub fn build(&self) -> Result<Validator, SchemaError> {
        if let Some(base_uri) = &self.base_uri {
            if Url::parse(base_uri).is_err() {
                return Err(SchemaError::Configuration(format!(
                    "base URI must be absolute, got '{}'",
                    base_uri
                )));
            }
        }
        if self.max_depth == 0 {
            return Err(SchemaError::Configuration(
                "max depth must be at least 1".to_string(),
            ));
        }
        if self.formats.contains_key("") {
            return Err(SchemaError::Configuration(
                "format names must not be empty".to_string(),
            ));
        }
        Ok(Validator::from_options(self))
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats: Vec<&String> = self.formats.keys().collect();
        formats.sort();
        f.debug_struct("ValidationOptions")
            .field("draft", &self.draft)
            .field("store", &self.store)
            .field("formats", &formats)
            .field("formats_enabled", &self.formats_enabled)
            .field("max_depth", &self.max_depth)
            .field("base_uri", &self.base_uri)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CheckMode;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn defaults() {
        let options = ValidationOptions::default();
        assert_eq!(options.draft, Draft::Draft4);
        assert_eq!(options.max_depth, 128);
        assert!(options.formats_enabled);
        assert!(options.formats.contains_key("date-time"));
    }

    #[test_case(ValidationOptions::default().with_base_uri("relative/path").clone(); "relative base uri")]
    #[test_case(ValidationOptions::default().with_max_depth(0).clone(); "zero depth")]
    #[test_case(ValidationOptions::default().with_format("", |_: &str| true).clone(); "unnamed format")]
    fn invalid_configuration(options: ValidationOptions) {
        assert!(matches!(
            options.build(),
            Err(SchemaError::Configuration(_))
        ));
    }

    #[test]
    fn draft_detection_is_honored() {
        let schema = json!({"items": [{}], "additionalProperties": false});
        let draft3 = Validator::options()
            .with_draft(Draft::Draft3)
            .build()
            .expect("Valid options");
        assert!(!draft3.is_valid(&json!([1, 2]), &schema));
        let draft7 = Validator::options()
            .with_draft(Draft::Draft7)
            .build()
            .expect("Valid options");
        assert!(draft7.is_valid(&json!([1, 2]), &schema));
    }

    #[test]
    fn base_uri() {
        let store = Arc::new(SchemaStore::new());
        store.add("http://example.com/schemas/item.json", json!({"type": "string"}));
        let validator = Validator::options()
            .with_store(Arc::clone(&store))
            .with_base_uri("http://example.com/schemas/root.json")
            .build()
            .expect("Valid options");
        let schema = json!({"$ref": "item.json"});
        assert!(validator.is_valid(&json!("a"), &schema));
        assert!(!validator.is_valid(&json!(1), &schema));
        let report = validator
            .validate(&json!(1), &schema, Some("http://other.com/"), CheckMode::NORMAL);
        assert!(report.is_err());
    }
}
