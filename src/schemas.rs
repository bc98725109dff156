use once_cell::sync::Lazy;
use serde_json::Value;

macro_rules! schema {
    ($name:ident, $path:expr) => {
        static $name: Lazy<Value> = Lazy::new(|| {
            serde_json::from_slice(include_bytes!($path)).expect("Invalid meta-schema")
        });
    };
}

schema!(DRAFT3, "../meta_schemas/draft3.json");
schema!(DRAFT4, "../meta_schemas/draft4.json");
schema!(DRAFT6, "../meta_schemas/draft6.json");
schema!(DRAFT7, "../meta_schemas/draft7.json");

/// JSON Schema dialect.
///
/// Every behavioral difference between dialects is answered by one of the capability
/// methods below, so keyword code never compares versions directly.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash)]
#[non_exhaustive]
pub enum Draft {
    /// JSON Schema Draft 3
    Draft3,
    /// JSON Schema Draft 4
    #[default]
    Draft4,
    /// JSON Schema Draft 6
    Draft6,
    /// JSON Schema Draft 7
    Draft7,
    /// JSON Schema Draft 2019-09
    Draft201909,
}

impl Draft {
    /// Keyword that rebases the resolution scope.
    pub(crate) const fn id_keyword(self) -> &'static str {
        match self {
            Draft::Draft3 | Draft::Draft4 => "id",
            Draft::Draft6 | Draft::Draft7 | Draft::Draft201909 => "$id",
        }
    }

    /// `extends`, `disallow`, `divisibleBy`, `maxDecimal`, `requires`, `optional` and the
    /// boolean `required` marker.
    pub(crate) const fn supports_legacy_keywords(self) -> bool {
        matches!(self, Draft::Draft3 | Draft::Draft4)
    }

    /// `allOf`, `anyOf`, `oneOf` and `not`.
    pub(crate) const fn supports_combinators(self) -> bool {
        !matches!(self, Draft::Draft3)
    }

    /// `exclusiveMinimum` / `exclusiveMaximum` are numbers rather than modifiers of
    /// `minimum` / `maximum`.
    pub(crate) const fn has_numeric_exclusive_bounds(self) -> bool {
        matches!(self, Draft::Draft6 | Draft::Draft7 | Draft::Draft201909)
    }

    /// `const`, `contains` and `propertyNames`.
    pub(crate) const fn supports_draft6_keywords(self) -> bool {
        matches!(self, Draft::Draft6 | Draft::Draft7 | Draft::Draft201909)
    }

    /// `if` / `then` / `else`, `contentEncoding` and `contentMediaType`.
    pub(crate) const fn supports_conditionals(self) -> bool {
        matches!(self, Draft::Draft7 | Draft::Draft201909)
    }

    /// `minContains` / `maxContains`.
    pub(crate) const fn supports_contains_bounds(self) -> bool {
        matches!(self, Draft::Draft201909)
    }

    /// Keywords next to `$ref` are evaluated too instead of being ignored.
    pub(crate) const fn applies_ref_siblings(self) -> bool {
        matches!(self, Draft::Draft201909)
    }

    /// Bundled meta-schema used by `VALIDATE_SCHEMA`.
    ///
    /// Draft 2019-09 is checked against the Draft 7 meta-schema: its own meta-schema is
    /// split over vocabularies relying on `$recursiveRef`.
    pub(crate) fn meta_schema(self) -> &'static Value {
        match self {
            Draft::Draft3 => &DRAFT3,
            Draft::Draft4 => &DRAFT4,
            Draft::Draft6 => &DRAFT6,
            Draft::Draft7 | Draft::Draft201909 => &DRAFT7,
        }
    }
}

/// Canonical location of every bundled meta-schema.
pub(crate) fn meta_schemas() -> [(&'static str, &'static Value); 4] {
    [
        ("http://json-schema.org/draft-03/schema", &*DRAFT3),
        ("http://json-schema.org/draft-04/schema", &*DRAFT4),
        ("http://json-schema.org/draft-06/schema", &*DRAFT6),
        ("http://json-schema.org/draft-07/schema", &*DRAFT7),
    ]
}

/// Get the `Draft` from a JSON Schema URL.
#[inline]
pub fn draft_from_url(url: &str) -> Option<Draft> {
    match url.trim_end_matches('#') {
        "http://json-schema.org/draft-03/schema" => Some(Draft::Draft3),
        "http://json-schema.org/draft-04/schema" => Some(Draft::Draft4),
        "http://json-schema.org/draft-06/schema" => Some(Draft::Draft6),
        "http://json-schema.org/draft-07/schema" => Some(Draft::Draft7),
        "https://json-schema.org/draft/2019-09/schema" => Some(Draft::Draft201909),
        _ => None,
    }
}

/// Get the `Draft` from a JSON Schema.
#[inline]
pub fn draft_from_schema(schema: &Value) -> Option<Draft> {
    schema
        .as_object()
        .and_then(|x| x.get("$schema"))
        .and_then(Value::as_str)
        .and_then(draft_from_url)
}

#[inline]
pub(crate) fn id_of(draft: Draft, schema: &Value) -> Option<&str> {
    schema
        .as_object()
        .and_then(|object| object.get(draft.id_keyword()))
        .and_then(Value::as_str)
}
