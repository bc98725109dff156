//! Error types.
//!
//! Keyword violations are [`ValidationError`]s collected into a report. Problems that make
//! validation impossible (unreadable references, cycles, bad configuration) are
//! [`SchemaError`]s and abort the run.
use crate::paths::JsonPointer;
use serde::Serialize;
use serde_json::{json, Map, Number, Value};
use std::{error, fmt, ops::BitOr};

/// Which document a validation error belongs to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct ErrorContext(u8);

impl ErrorContext {
    /// No error recorded yet.
    pub const NONE: ErrorContext = ErrorContext(0);
    /// The instance violates the schema.
    pub const DOCUMENT: ErrorContext = ErrorContext(1);
    /// The schema violates its meta-schema.
    pub const SCHEMA: ErrorContext = ErrorContext(2);

    #[must_use]
    pub const fn contains(self, other: ErrorContext) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for ErrorContext {
    type Output = ErrorContext;

    fn bitor(self, rhs: ErrorContext) -> ErrorContext {
        ErrorContext(self.0 | rhs.0)
    }
}

/// Kinds of errors that may happen during validation.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationErrorKind {
    /// Array element beyond the tuple definition while additional items are not allowed.
    AdditionalItems { index: usize },
    /// Object property not declared while additional properties are not allowed.
    AdditionalProperties { property: String },
    /// At least one of `allOf` sub-schemas failed.
    AllOf,
    /// None of `anyOf` sub-schemas matched.
    AnyOf,
    /// Value differs from `const`.
    Constant { expected: Value },
    /// Too few elements match `contains`.
    Contains { min: u64, count: u64 },
    /// Too many elements match `contains`.
    MaxContains { max: u64, count: u64 },
    /// String is not valid in the declared `contentEncoding`.
    ContentEncoding { encoding: String },
    /// String is not a valid document of the declared `contentMediaType`.
    ContentMediaType { media_type: String },
    /// A property required by a present property is absent.
    Dependencies { property: String, dependency: String },
    /// Value matches a `disallow` type expression.
    Disallow,
    /// Value is not deep-equal to any `enum` member.
    Enum { options: Value },
    /// Number is not below `exclusiveMaximum`.
    ExclusiveMaximum { limit: Number },
    /// Number is not above `exclusiveMinimum`.
    ExclusiveMinimum { limit: Number },
    /// Nothing is valid against the `false` schema.
    FalseSchema,
    /// String does not satisfy the named format.
    Format { format: String },
    /// Number has more decimal places than allowed.
    MaxDecimal { limit: u64 },
    MaxItems { limit: u64 },
    MaxLength { limit: u64 },
    MaxProperties { limit: u64 },
    Maximum { limit: Number, exclusive: bool },
    MinItems { limit: u64 },
    MinLength { limit: u64 },
    MinProperties { limit: u64 },
    Minimum { limit: Number, exclusive: bool },
    /// Number is not a multiple of `multipleOf` (or draft 3 `divisibleBy`).
    MultipleOf {
        multiple_of: Number,
        keyword: &'static str,
    },
    /// Value matches the `not` sub-schema.
    Not,
    /// `oneOf` matched no sub-schema or more than one.
    OneOf { matched: usize },
    Pattern { pattern: String },
    /// A read-only property is being changed.
    ReadOnly,
    /// A mandatory property is absent.
    Required { property: String },
    /// A draft 3 `requires` sibling is absent.
    Requires { property: String, requires: String },
    /// Value does not have any of the expected types.
    Type { expected: Vec<String>, found: String },
    UniqueItems,
}

impl ValidationErrorKind {
    /// Constraint name as it appears in reports.
    #[must_use]
    pub fn constraint_name(&self) -> &'static str {
        match self {
            ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
            ValidationErrorKind::AdditionalProperties { .. } => "additionalProp",
            ValidationErrorKind::AllOf => "allOf",
            ValidationErrorKind::AnyOf => "anyOf",
            ValidationErrorKind::Constant { .. } => "const",
            ValidationErrorKind::Contains { .. } => "contains",
            ValidationErrorKind::MaxContains { .. } => "maxContains",
            ValidationErrorKind::ContentEncoding { .. } => "contentEncoding",
            ValidationErrorKind::ContentMediaType { .. } => "contentMediaType",
            ValidationErrorKind::Dependencies { .. } => "dependencies",
            ValidationErrorKind::Disallow => "disallow",
            ValidationErrorKind::Enum { .. } => "enum",
            ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
            ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
            ValidationErrorKind::FalseSchema => "false",
            ValidationErrorKind::Format { .. } => "format",
            ValidationErrorKind::MaxDecimal { .. } => "maxDecimal",
            ValidationErrorKind::MaxItems { .. } => "maxItems",
            ValidationErrorKind::MaxLength { .. } => "maxLength",
            ValidationErrorKind::MaxProperties { .. } => "maxProperties",
            ValidationErrorKind::Maximum { .. } => "maximum",
            ValidationErrorKind::MinItems { .. } => "minItems",
            ValidationErrorKind::MinLength { .. } => "minLength",
            ValidationErrorKind::MinProperties { .. } => "minProperties",
            ValidationErrorKind::Minimum { .. } => "minimum",
            ValidationErrorKind::MultipleOf { keyword, .. } => *keyword,
            ValidationErrorKind::Not => "not",
            ValidationErrorKind::OneOf { .. } => "oneOf",
            ValidationErrorKind::Pattern { .. } => "pattern",
            ValidationErrorKind::ReadOnly => "readOnly",
            ValidationErrorKind::Required { .. } => "required",
            ValidationErrorKind::Requires { .. } => "requires",
            ValidationErrorKind::Type { .. } => "type",
            ValidationErrorKind::UniqueItems => "uniqueItems",
        }
    }

    /// Constraint parameters as they appear in reports.
    #[must_use]
    pub fn params(&self) -> Map<String, Value> {
        let params = match self {
            ValidationErrorKind::AllOf
            | ValidationErrorKind::AnyOf
            | ValidationErrorKind::Disallow
            | ValidationErrorKind::FalseSchema
            | ValidationErrorKind::Not
            | ValidationErrorKind::ReadOnly
            | ValidationErrorKind::UniqueItems => json!({}),
            ValidationErrorKind::AdditionalItems { index } => json!({ "index": index }),
            ValidationErrorKind::AdditionalProperties { property } => {
                json!({ "property": property })
            }
            ValidationErrorKind::Constant { expected } => json!({ "const": expected }),
            ValidationErrorKind::Contains { min, count } => {
                json!({ "minContains": min, "count": count })
            }
            ValidationErrorKind::MaxContains { max, count } => {
                json!({ "maxContains": max, "count": count })
            }
            ValidationErrorKind::ContentEncoding { encoding } => {
                json!({ "contentEncoding": encoding })
            }
            ValidationErrorKind::ContentMediaType { media_type } => {
                json!({ "contentMediaType": media_type })
            }
            ValidationErrorKind::Dependencies {
                property,
                dependency,
            } => json!({ "property": property, "dependency": dependency }),
            ValidationErrorKind::Enum { options } => json!({ "choices": options }),
            ValidationErrorKind::ExclusiveMaximum { limit } => json!({ "maximum": limit }),
            ValidationErrorKind::ExclusiveMinimum { limit } => json!({ "minimum": limit }),
            ValidationErrorKind::Format { format } => json!({ "format": format }),
            ValidationErrorKind::MaxDecimal { limit } => json!({ "maxDecimal": limit }),
            ValidationErrorKind::MaxItems { limit } => json!({ "maxItems": limit }),
            ValidationErrorKind::MaxLength { limit } => json!({ "maxLength": limit }),
            ValidationErrorKind::MaxProperties { limit } => json!({ "maxProperties": limit }),
            ValidationErrorKind::Maximum { limit, exclusive } => {
                json!({ "maximum": limit, "exclusive": exclusive })
            }
            ValidationErrorKind::MinItems { limit } => json!({ "minItems": limit }),
            ValidationErrorKind::MinLength { limit } => json!({ "minLength": limit }),
            ValidationErrorKind::MinProperties { limit } => json!({ "minProperties": limit }),
            ValidationErrorKind::Minimum { limit, exclusive } => {
                json!({ "minimum": limit, "exclusive": exclusive })
            }
            ValidationErrorKind::MultipleOf {
                multiple_of,
                keyword,
            } => json!({ *keyword: multiple_of }),
            ValidationErrorKind::OneOf { matched } => json!({ "matched": matched }),
            ValidationErrorKind::Pattern { pattern } => json!({ "pattern": pattern }),
            ValidationErrorKind::Required { property } => json!({ "property": property }),
            ValidationErrorKind::Requires { property, requires } => {
                json!({ "property": property, "requires": requires })
            }
            ValidationErrorKind::Type { expected, found } => {
                json!({ "expected": expected, "found": found })
            }
        };
        match params {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

fn plural(limit: u64, single: &'static str, many: &'static str) -> &'static str {
    if limit == 1 {
        single
    } else {
        many
    }
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Message templates. Reports capitalize the first letter.
impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorKind::AdditionalItems { index } => write!(
                f,
                "the item at index {} is not defined and the definition does not allow additional items",
                index
            ),
            ValidationErrorKind::AdditionalProperties { property } => write!(
                f,
                "the property {} is not defined and the definition does not allow additional properties",
                property
            ),
            ValidationErrorKind::AllOf => f.write_str("failed to match all schemas"),
            ValidationErrorKind::AnyOf => f.write_str("failed to match at least one schema"),
            ValidationErrorKind::Constant { expected } => {
                write!(f, "does not have a value equal to {}", expected)
            }
            ValidationErrorKind::Contains { min, count } => write!(
                f,
                "must contain at least {} matching item{}, found {}",
                min,
                plural(*min, "", "s"),
                count
            ),
            ValidationErrorKind::MaxContains { max, count } => write!(
                f,
                "must contain at most {} matching item{}, found {}",
                max,
                plural(*max, "", "s"),
                count
            ),
            ValidationErrorKind::ContentEncoding { encoding } => {
                write!(f, "not a valid {} encoded string", encoding)
            }
            ValidationErrorKind::ContentMediaType { media_type } => {
                write!(f, "not valid {} content", media_type)
            }
            ValidationErrorKind::Dependencies {
                property,
                dependency,
            } => write!(
                f,
                "{} is a dependency of {} and is missing",
                dependency, property
            ),
            ValidationErrorKind::Disallow => f.write_str("disallowed value was matched"),
            ValidationErrorKind::Enum { options } => {
                write!(f, "does not have a value in the enumeration {}", options)
            }
            ValidationErrorKind::ExclusiveMaximum { limit } => {
                write!(f, "must be less than {}", limit)
            }
            ValidationErrorKind::ExclusiveMinimum { limit } => {
                write!(f, "must be greater than {}", limit)
            }
            ValidationErrorKind::FalseSchema => f.write_str("no value is allowed here"),
            ValidationErrorKind::Format { format } => {
                write!(f, "does not match the '{}' format", format)
            }
            ValidationErrorKind::MaxDecimal { limit } => write!(
                f,
                "may have at most {} decimal place{}",
                limit,
                plural(*limit, "", "s")
            ),
            ValidationErrorKind::MaxItems { limit } => write!(
                f,
                "there must be a maximum of {} item{} in the array",
                limit,
                plural(*limit, "", "s")
            ),
            ValidationErrorKind::MaxLength { limit } => write!(
                f,
                "must be at most {} character{} long",
                limit,
                plural(*limit, "", "s")
            ),
            ValidationErrorKind::MaxProperties { limit } => write!(
                f,
                "must contain no more than {} propert{}",
                limit,
                plural(*limit, "y", "ies")
            ),
            ValidationErrorKind::Maximum { limit, exclusive } => {
                if *exclusive {
                    write!(f, "must be less than {}", limit)
                } else {
                    write!(f, "must be less than or equal to {}", limit)
                }
            }
            ValidationErrorKind::MinItems { limit } => write!(
                f,
                "there must be a minimum of {} item{} in the array",
                limit,
                plural(*limit, "", "s")
            ),
            ValidationErrorKind::MinLength { limit } => write!(
                f,
                "must be at least {} character{} long",
                limit,
                plural(*limit, "", "s")
            ),
            ValidationErrorKind::MinProperties { limit } => write!(
                f,
                "must contain a minimum of {} propert{}",
                limit,
                plural(*limit, "y", "ies")
            ),
            ValidationErrorKind::Minimum { limit, exclusive } => {
                if *exclusive {
                    write!(f, "must be greater than {}", limit)
                } else {
                    write!(f, "must be greater than or equal to {}", limit)
                }
            }
            ValidationErrorKind::MultipleOf { multiple_of, .. } => {
                write!(f, "must be a multiple of {}", multiple_of)
            }
            ValidationErrorKind::Not => f.write_str("matched a schema which it should not"),
            ValidationErrorKind::OneOf { matched } => write!(
                f,
                "failed to match exactly one schema, {} matched",
                matched
            ),
            ValidationErrorKind::Pattern { pattern } => {
                write!(f, "does not match the regex pattern {}", pattern)
            }
            ValidationErrorKind::ReadOnly => f.write_str("this is a read-only field"),
            ValidationErrorKind::Required { property } => {
                write!(f, "the property {} is required", property)
            }
            ValidationErrorKind::Requires { property, requires } => write!(
                f,
                "{} requires the property {} to be present",
                property, requires
            ),
            ValidationErrorKind::Type { expected, found } => {
                let first = expected.first().map_or("", String::as_str);
                write!(
                    f,
                    "{} value found, but {} {} is required",
                    found,
                    article(first),
                    expected.join(" or ")
                )
            }
            ValidationErrorKind::UniqueItems => {
                f.write_str("there are no duplicates allowed in the array")
            }
        }
    }
}

/// Constraint that produced an error, as reported on the wire.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Constraint {
    name: &'static str,
    params: Map<String, Value>,
}

impl Constraint {
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }
}

/// A single keyword violation.
///
/// Serializes to `{"property", "pointer", "message", "constraint": {"name", "params"}, "context"}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationError {
    property: String,
    pointer: String,
    message: String,
    constraint: Constraint,
    context: ErrorContext,
    #[serde(skip)]
    kind: ValidationErrorKind,
    #[serde(skip)]
    location: JsonPointer,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        location: JsonPointer,
        context: ErrorContext,
    ) -> ValidationError {
        ValidationError {
            property: location.property_path(),
            pointer: location.to_string(),
            message: capitalize(&kind.to_string()),
            constraint: Constraint {
                name: kind.constraint_name(),
                params: kind.params(),
            },
            context,
            kind,
            location,
        }
    }

    /// Dotted path of the offending value, e.g. `array[2]`.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Rendered JSON Pointer of the offending value, e.g. `#/array/2`.
    #[must_use]
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    #[must_use]
    pub fn context(&self) -> ErrorContext {
        self.context
    }

    #[must_use]
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }

    /// Structured location of the offending value.
    #[must_use]
    pub fn location(&self) -> &JsonPointer {
        &self.location
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pointer, self.message)
    }
}

impl error::Error for ValidationError {}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Errors that abort a validation run.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema is structurally unusable.
    #[error("Malformed schema at '{location}': {reason}")]
    MalformedSchema { location: String, reason: String },
    /// A reference is not a string or cannot be parsed.
    #[error("Invalid reference: {reference}")]
    InvalidReference { reference: String },
    /// The retriever could not provide a document.
    #[error("Resource not found: {uri}")]
    ResourceNotFound {
        uri: String,
        #[source]
        source: Option<Box<dyn error::Error + Send + Sync>>,
    },
    /// A fetched document declares a content type other than a JSON schema.
    #[error("Unexpected content type '{content_type}' for {uri}")]
    InvalidMediaType { uri: String, content_type: String },
    /// A fragment does not point to anything in its document.
    #[error("Fragment '{fragment}' not found in '{uri}'")]
    FragmentNotFound { uri: String, fragment: String },
    /// A relative reference cannot be merged onto its base.
    #[error("Unable to resolve '{reference}' against '{base}'")]
    UriResolution { reference: String, base: String },
    /// Invalid validator options.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    /// `$ref` / `extends` nesting exceeded the configured depth.
    #[error("Schema graph is cyclic or deeper than {max_depth} levels at '{reference}'")]
    TooDeep { max_depth: usize, reference: String },
    /// A fetched document is not valid JSON.
    #[error("Failed to decode '{uri}': {source}")]
    Decode {
        uri: String,
        #[source]
        source: serde_json::Error,
    },
    /// First violation in fail-fast mode.
    #[error("{0}")]
    Validation(ValidationError),
}

impl SchemaError {
    pub(crate) fn malformed(location: impl Into<String>, reason: impl Into<String>) -> SchemaError {
        SchemaError::MalformedSchema {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// The violation that aborted a fail-fast run, if that is what happened.
    #[must_use]
    pub fn as_validation_error(&self) -> Option<&ValidationError> {
        match self {
            SchemaError::Validation(error) => Some(error),
            _ => None,
        }
    }
}
