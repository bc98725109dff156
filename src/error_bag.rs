//! Accumulation of keyword violations for a single validation run.
use crate::{
    error::{ErrorContext, SchemaError, ValidationError, ValidationErrorKind},
    paths::{InstancePath, JsonPointer},
};

/// Ordered list of violations plus the OR of all their contexts.
///
/// In fail-fast mode the first added error aborts the run instead of being stored.
#[derive(Debug, Default)]
pub(crate) struct ErrorBag {
    errors: Vec<ValidationError>,
    mask: ErrorContext,
    fail_fast: bool,
    context: ErrorContext,
}

impl ErrorBag {
    pub(crate) fn new(fail_fast: bool) -> ErrorBag {
        ErrorBag {
            errors: Vec::new(),
            mask: ErrorContext::NONE,
            fail_fast,
            context: ErrorContext::DOCUMENT,
        }
    }

    /// Record a violation at `path`.
    pub(crate) fn add_error(
        &mut self,
        kind: ValidationErrorKind,
        path: &InstancePath<'_>,
    ) -> Result<(), SchemaError> {
        let error = ValidationError::new(kind, JsonPointer::from(path), self.context);
        self.push(error)
    }

    /// Fold in errors produced by an isolated sub-evaluation.
    pub(crate) fn add_errors(&mut self, errors: Vec<ValidationError>) -> Result<(), SchemaError> {
        for error in errors {
            self.push(error)?;
        }
        Ok(())
    }

    fn push(&mut self, error: ValidationError) -> Result<(), SchemaError> {
        self.mask = self.mask | error.context();
        if self.fail_fast {
            return Err(SchemaError::Validation(error));
        }
        self.errors.push(error);
        Ok(())
    }

    /// Context stamped on errors added from now on.
    pub(crate) fn set_context(&mut self, context: ErrorContext) {
        self.context = context;
    }

    pub(crate) fn context(&self) -> ErrorContext {
        self.context
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn mask(&self) -> ErrorContext {
        self.mask
    }

    pub(crate) fn is_fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Drop collected errors and the mask. The fail-fast switch and context are kept.
    pub(crate) fn reset(&mut self) {
        self.errors.clear();
        self.mask = ErrorContext::NONE;
    }

    pub(crate) fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(name: &str) -> ValidationErrorKind {
        ValidationErrorKind::Required {
            property: name.to_string(),
        }
    }

    #[test]
    fn collects_in_order() {
        let mut bag = ErrorBag::new(false);
        let root = InstancePath::new();
        let child = root.push("a");
        bag.add_error(required("a"), &child).unwrap();
        bag.add_error(ValidationErrorKind::UniqueItems, &root)
            .unwrap();
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.mask(), ErrorContext::DOCUMENT);
        let errors = bag.into_errors();
        assert_eq!(errors[0].pointer(), "#/a");
        assert_eq!(errors[0].property(), "a");
        assert_eq!(errors[1].pointer(), "#");
    }

    #[test]
    fn fail_fast_raises_first_error() {
        let mut bag = ErrorBag::new(true);
        let root = InstancePath::new();
        let path = root.push(1);
        let error = bag.add_error(required("x"), &path).unwrap_err();
        match error {
            SchemaError::Validation(error) => {
                assert_eq!(error.pointer(), "#/1");
                assert_eq!(error.message(), "The property x is required");
            }
            other => panic!("Unexpected error: {}", other),
        }
        assert!(bag.is_empty());
    }

    #[test]
    fn reset_clears_errors_and_mask() {
        let mut bag = ErrorBag::new(false);
        bag.set_context(ErrorContext::SCHEMA);
        bag.add_error(required("x"), &InstancePath::new()).unwrap();
        assert_eq!(bag.mask(), ErrorContext::SCHEMA);
        bag.reset();
        assert!(bag.is_empty());
        assert_eq!(bag.mask(), ErrorContext::NONE);
        assert_eq!(bag.context(), ErrorContext::SCHEMA);
    }
}
