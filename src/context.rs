use crate::{
    error::{SchemaError, ValidationError, ValidationErrorKind},
    error_bag::ErrorBag,
    keywords::{format::Format, pattern},
    mode::CheckMode,
    paths::InstancePath,
    resolver::Resolver,
    schemas::{draft_from_schema, id_of, Draft},
    type_check::{self, TypeCheck},
    uri,
};
use ahash::AHashMap;
use fancy_regex::Regex;
use serde_json::Value;
use std::{borrow::Cow, mem, sync::Arc};

/// Resolution scope of the schema being evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Scope {
    pub(crate) base: String,
    pub(crate) draft: Draft,
}

impl Scope {
    pub(crate) fn new(base: impl Into<String>, draft: Draft) -> Scope {
        Scope {
            base: base.into(),
            draft,
        }
    }

    /// Scope for entering `schema`. All references inside it are resolved against its id
    /// and it may switch the dialect through `$schema`.
    /// Before push:
    ///    base = http://example.com/root.json
    /// After pushing {"id": "folder/", ...}:
    ///    base = http://example.com/folder/
    pub(crate) fn push(&self, schema: &Value) -> Result<Cow<'_, Scope>, SchemaError> {
        let draft = draft_from_schema(schema).unwrap_or(self.draft);
        match id_of(draft, schema) {
            Some(id) => Ok(Cow::Owned(Scope {
                base: uri::resolve(id, &self.base)?,
                draft,
            })),
            None if draft != self.draft => Ok(Cow::Owned(Scope {
                base: self.base.clone(),
                draft,
            })),
            None => Ok(Cow::Borrowed(self)),
        }
    }
}

/// Instance change recorded by type casting or default filling.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Patch {
    pub(crate) segments: Vec<String>,
    pub(crate) value: Value,
}

pub(crate) type Formats = AHashMap<String, Arc<dyn Format>>;

/// Mutable state of one validation run, threaded through every recursive check.
pub(crate) struct ValidationContext<'a> {
    pub(crate) mode: CheckMode,
    pub(crate) types: &'static dyn TypeCheck,
    pub(crate) resolver: Resolver<'a>,
    /// `None` when formats are advisory only.
    pub(crate) formats: Option<&'a Formats>,
    errors: ErrorBag,
    patches: Vec<Patch>,
    regexes: AHashMap<String, Arc<Regex>>,
    depth: usize,
    max_depth: usize,
}

impl<'a> ValidationContext<'a> {
    pub(crate) fn new(
        mode: CheckMode,
        resolver: Resolver<'a>,
        formats: Option<&'a Formats>,
        max_depth: usize,
    ) -> ValidationContext<'a> {
        ValidationContext {
            mode,
            types: type_check::for_mode(mode),
            resolver,
            formats,
            errors: ErrorBag::new(mode.contains(CheckMode::EXCEPTIONS)),
            patches: Vec::new(),
            regexes: AHashMap::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Collect into `errors` instead of a fresh bag.
    pub(crate) fn with_errors(mut self, errors: ErrorBag) -> ValidationContext<'a> {
        self.errors = errors;
        self
    }

    /// Record a violation at `path`. Fails in fail-fast mode.
    #[inline]
    pub(crate) fn error(
        &mut self,
        kind: ValidationErrorKind,
        path: &InstancePath<'_>,
    ) -> Result<(), SchemaError> {
        self.errors.add_error(kind, path)
    }

    /// Fold errors of an isolated evaluation into the current scope.
    pub(crate) fn extend_errors(&mut self, errors: Vec<ValidationError>) -> Result<(), SchemaError> {
        self.errors.add_errors(errors)
    }

    /// Run `check` with a private error list and return what it reported.
    ///
    /// Errors never abort an isolated evaluation, fatal schema errors still do. Patches
    /// recorded by a failing evaluation are dropped.
    pub(crate) fn isolated<F>(&mut self, check: F) -> Result<Vec<ValidationError>, SchemaError>
    where
        F: FnOnce(&mut ValidationContext<'a>) -> Result<(), SchemaError>,
    {
        let mut scoped = ErrorBag::new(false);
        scoped.set_context(self.errors.context());
        let outer = mem::replace(&mut self.errors, scoped);
        let patches = self.patches.len();
        let result = check(self);
        let errors = mem::replace(&mut self.errors, outer).into_errors();
        result?;
        if !errors.is_empty() {
            self.patches.truncate(patches);
        }
        Ok(errors)
    }

    /// Whether `check` passes. Nothing it reports or records is kept.
    pub(crate) fn probe<F>(&mut self, check: F) -> Result<bool, SchemaError>
    where
        F: FnOnce(&mut ValidationContext<'a>) -> Result<(), SchemaError>,
    {
        let patches = self.patches.len();
        let errors = self.isolated(check)?;
        self.patches.truncate(patches);
        Ok(errors.is_empty())
    }

    /// Enter a `$ref` / `extends` target.
    pub(crate) fn enter_reference(&mut self, reference: &str) -> Result<(), SchemaError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            return Err(SchemaError::TooDeep {
                max_depth: self.max_depth,
                reference: reference.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn leave_reference(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Compiled `pattern` / `patternProperties` expression, cached for the run.
    pub(crate) fn regex(&mut self, source: &str, scope: &Scope) -> Result<Arc<Regex>, SchemaError> {
        if let Some(regex) = self.regexes.get(source) {
            return Ok(Arc::clone(regex));
        }
        let regex = pattern::convert_regex(source).map_err(|error| {
            SchemaError::malformed(&scope.base, format!("invalid regex '{}': {}", source, error))
        })?;
        let regex = Arc::new(regex);
        self.regexes.insert(source.to_string(), Arc::clone(&regex));
        Ok(regex)
    }

    pub(crate) fn record_patch(&mut self, path: &InstancePath<'_>, value: Value) {
        self.patches.push(Patch {
            segments: path.to_vec(),
            value,
        });
    }

    pub(crate) fn errors_mut(&mut self) -> &mut ErrorBag {
        &mut self.errors
    }

    pub(crate) fn finish(self) -> (ErrorBag, Vec<Patch>) {
        (self.errors, self.patches)
    }
}
