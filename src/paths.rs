//! Facilities for working with locations within schemas or validated instances.
use crate::error::SchemaError;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::{fmt, fmt::Write};

/// A location inside a document: the document identifier plus decoded path segments.
///
/// Pointers are immutable, every transformation returns a new one.
/// ```rust
/// use jsonschema_check::JsonPointer;
///
/// let pointer = JsonPointer::parse("file.json#/definitions/a~1b").unwrap();
/// assert_eq!(pointer.filename(), "file.json");
/// assert_eq!(pointer.segments(), ["definitions", "a/b"]);
/// assert_eq!(pointer.to_string(), "file.json#/definitions/a~1b");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JsonPointer {
    filename: String,
    segments: Vec<String>,
    from_default: bool,
}

impl JsonPointer {
    /// Pointer into `filename` with already decoded `segments`.
    #[must_use]
    pub fn new(filename: impl Into<String>, segments: Vec<String>) -> JsonPointer {
        JsonPointer {
            filename: filename.into(),
            segments,
            from_default: false,
        }
    }

    /// Parse a raw reference such as `other.json#/definitions/item`.
    ///
    /// Everything before the first `#` is the document identifier, the remainder is a
    /// `/`-delimited list of escaped segments.
    ///
    /// # Errors
    ///
    /// `InvalidReference` if the fragment is not valid percent-encoded UTF-8.
    pub fn parse(reference: &str) -> Result<JsonPointer, SchemaError> {
        let (filename, fragment) = match reference.split_once('#') {
            Some((filename, fragment)) => (filename, fragment),
            None => (reference, ""),
        };
        let segments = fragment
            .strip_prefix('/')
            .map(|path| {
                path.split('/')
                    .map(|segment| decode_segment(segment, reference))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();
        Ok(JsonPointer::new(filename, segments))
    }

    /// Parse a reference that has to be a JSON string.
    ///
    /// # Errors
    ///
    /// `InvalidReference` if `reference` is not a string.
    pub fn from_value(reference: &Value) -> Result<JsonPointer, SchemaError> {
        match reference {
            Value::String(reference) => JsonPointer::parse(reference),
            other => Err(SchemaError::InvalidReference {
                reference: other.to_string(),
            }),
        }
    }

    /// Document identifier, empty for same-document pointers.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Decoded path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether the value at this location was filled in from a schema `default`.
    #[must_use]
    pub fn from_default(&self) -> bool {
        self.from_default
    }

    /// The same document with a different path.
    #[must_use]
    pub fn with_property_paths(&self, segments: Vec<String>) -> JsonPointer {
        JsonPointer {
            filename: self.filename.clone(),
            segments,
            from_default: self.from_default,
        }
    }

    pub(crate) fn with_from_default(mut self, from_default: bool) -> JsonPointer {
        self.from_default = from_default;
        self
    }

    /// Dotted rendering, e.g. `items[2].name`.
    #[must_use]
    pub fn property_path(&self) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            if !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_digit()) {
                output.push('[');
                output.push_str(segment);
                output.push(']');
            } else {
                output.push('.');
                output.push_str(segment);
            }
        }
        output.trim_start_matches('.').to_string()
    }

    /// Encoded segments, as they appear in the rendered pointer.
    #[must_use]
    pub fn encoded_segments(&self) -> Vec<String> {
        self.segments
            .iter()
            .map(|segment| encode_segment(segment))
            .collect()
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename)?;
        f.write_char('#')?;
        let mut rendered = String::new();
        for segment in &self.segments {
            rendered.push('/');
            rendered.push_str(&encode_segment(segment));
        }
        // A trailing empty segment is not rendered
        f.write_str(rendered.strip_suffix('/').unwrap_or(&rendered))
    }
}

/// Escape a single segment: `~` as `~0`, `/` as `~1`, `%` as `%25`.
pub(crate) fn encode_segment(segment: &str) -> String {
    let mut output = String::with_capacity(segment.len());
    for ch in segment.chars() {
        match ch {
            '~' => output.push_str("~0"),
            '/' => output.push_str("~1"),
            '%' => output.push_str("%25"),
            _ => output.push(ch),
        }
    }
    output
}

/// Reverse of `encode_segment`. Percent escapes are decoded first, then `~1` and `~0`.
pub(crate) fn decode_segment(segment: &str, reference: &str) -> Result<String, SchemaError> {
    let decoded = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|_| SchemaError::InvalidReference {
            reference: reference.to_string(),
        })?;
    let mut output = String::with_capacity(decoded.len());
    let mut chars = decoded.chars();
    while let Some(ch) = chars.next() {
        if ch == '~' {
            match chars.next() {
                Some('0') => output.push('~'),
                Some('1') => output.push('/'),
                Some(other) => {
                    output.push('~');
                    output.push(other);
                }
                None => output.push('~'),
            }
        } else {
            output.push(ch);
        }
    }
    Ok(output)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum PathChunk {
    Property(String),
    Index(usize),
}

/// Location of the value under check, kept as a stack-allocated linked list while
/// recursing and only materialized when an error is recorded.
#[derive(Debug)]
pub(crate) struct InstancePath<'a> {
    pub(crate) chunk: Option<PathChunk>,
    pub(crate) parent: Option<&'a InstancePath<'a>>,
    pub(crate) from_default: bool,
}

impl<'a> InstancePath<'a> {
    pub(crate) const fn new() -> Self {
        InstancePath {
            chunk: None,
            parent: None,
            from_default: false,
        }
    }

    pub(crate) fn push(&'a self, chunk: impl Into<PathChunk>) -> Self {
        InstancePath {
            chunk: Some(chunk.into()),
            parent: Some(self),
            from_default: self.from_default,
        }
    }

    /// The same location, flagged as filled in from a schema `default`.
    pub(crate) fn as_default(&self) -> InstancePath<'a> {
        InstancePath {
            chunk: self.chunk.clone(),
            parent: self.parent,
            from_default: true,
        }
    }

    /// Name of the last chunk, empty at the root.
    pub(crate) fn last_name(&self) -> String {
        match &self.chunk {
            Some(PathChunk::Property(name)) => name.clone(),
            Some(PathChunk::Index(idx)) => idx.to_string(),
            None => String::new(),
        }
    }

    pub(crate) fn to_vec(&'a self) -> Vec<String> {
        let mut result = Vec::with_capacity(6);
        let mut current = Some(self);
        while let Some(node) = current {
            match &node.chunk {
                Some(PathChunk::Property(name)) => result.push(name.clone()),
                Some(PathChunk::Index(idx)) => result.push(idx.to_string()),
                None => {}
            }
            current = node.parent;
        }
        result.reverse();
        result
    }
}

impl From<String> for PathChunk {
    #[inline]
    fn from(value: String) -> Self {
        PathChunk::Property(value)
    }
}
impl From<&str> for PathChunk {
    #[inline]
    fn from(value: &str) -> Self {
        PathChunk::Property(value.to_string())
    }
}
impl From<usize> for PathChunk {
    #[inline]
    fn from(value: usize) -> Self {
        PathChunk::Index(value)
    }
}

impl<'a> From<&'a InstancePath<'a>> for JsonPointer {
    #[inline]
    fn from(path: &'a InstancePath<'a>) -> Self {
        JsonPointer::new("", path.to_vec()).with_from_default(path.from_default)
    }
}
