//! Reference resolution. Implements the logic required by `$ref` and `extends`.
use crate::{
    error::SchemaError,
    paths::{decode_segment, JsonPointer},
    retriever::Retrieve,
    schemas::{self, id_of, Draft},
    uri,
};
use ahash::AHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::{fmt, sync::Arc};
use tracing::{debug, trace, warn};

const SCHEMA_MEDIA_TYPES: [&str; 2] = ["application/schema+json", "application/json"];
const JSON_SCHEMA_ORG: &str = "http://json-schema.org/";

/// Cache of referenced documents keyed by absolute, fragment-free URI.
///
/// A store may be shared between validators and threads. Documents are fetched on first
/// use and kept for the lifetime of the store.
/// ```rust
/// use jsonschema_check::SchemaStore;
/// use serde_json::json;
///
/// let store = SchemaStore::new();
/// store.add("http://example.com/item.json#", json!({"type": "integer"}));
/// assert!(store.contains("http://example.com/item.json"));
/// assert!(store.contains("http://json-schema.org/draft-07/schema#"));
/// ```
pub struct SchemaStore {
    documents: RwLock<AHashMap<String, Arc<Value>>>,
    // Sub-schemas of stored documents under their plain-name ids, e.g. `http://x.y/a.json#item`
    anchors: RwLock<AHashMap<String, Arc<Value>>>,
}

impl SchemaStore {
    /// A store holding the bundled meta-schemas.
    #[must_use]
    pub fn new() -> SchemaStore {
        let documents = schemas::meta_schemas()
            .iter()
            .map(|(uri, schema)| ((*uri).to_string(), Arc::new((*schema).clone())))
            .collect();
        SchemaStore {
            documents: RwLock::new(documents),
            anchors: RwLock::new(AHashMap::new()),
        }
    }

    /// Register a document up front, replacing any previous one under the same URI.
    pub fn add(&self, uri: &str, document: Value) {
        let location = uri::extract_location(uri).to_string();
        debug!(uri = %location, "Registering document");
        self.documents.write().insert(location, Arc::new(document));
    }

    /// Whether a document is cached under `uri`, fragment ignored.
    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.documents
            .read()
            .contains_key(uri::extract_location(uri))
    }

    /// Number of cached documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Cached document at `location`, fetching it through `retriever` on a miss.
    ///
    /// The fetch runs without holding the lock. Concurrent misses for the same URI may fetch
    /// twice, the last insert wins.
    pub(crate) fn get_or_fetch(
        &self,
        location: &str,
        retriever: &dyn Retrieve,
    ) -> Result<Arc<Value>, SchemaError> {
        if let Some(document) = self.documents.read().get(location) {
            debug!(uri = location, "Document cache hit");
            return Ok(Arc::clone(document));
        }
        debug!(uri = location, "Document cache miss, fetching");
        let resource =
            retriever
                .retrieve(location)
                .map_err(|error| SchemaError::ResourceNotFound {
                    uri: location.to_string(),
                    source: Some(error),
                })?;
        if let Some(content_type) = &resource.content_type {
            check_content_type(location, content_type)?;
        }
        let document: Value =
            serde_json::from_slice(&resource.body).map_err(|source| SchemaError::Decode {
                uri: location.to_string(),
                source,
            })?;
        let document = Arc::new(document);
        self.documents
            .write()
            .insert(location.to_string(), Arc::clone(&document));
        Ok(document)
    }

    /// Sub-schema identified by the plain-name `id` inside the document at `location`.
    ///
    /// The document is indexed on the first lookup, `draft` applies when it does not declare
    /// its own dialect.
    pub(crate) fn get_or_fetch_anchor(
        &self,
        id: &str,
        location: &str,
        draft: Draft,
        retriever: &dyn Retrieve,
    ) -> Result<Option<Arc<Value>>, SchemaError> {
        if let Some(schema) = self.anchors.read().get(id) {
            return Ok(Some(Arc::clone(schema)));
        }
        let document = self.get_or_fetch(location, retriever)?;
        let draft = schemas::draft_from_schema(&document).unwrap_or(draft);
        let mut found = Vec::new();
        find_schemas(draft, &document, location, &mut |anchor, schema| {
            if !uri::extract_fragment(&anchor).is_empty() {
                found.push((anchor, schema.clone()));
            }
        })?;
        trace!(uri = location, count = found.len(), "Indexed plain-name ids");
        let mut anchors = self.anchors.write();
        for (anchor, schema) in found {
            anchors.entry(anchor).or_insert_with(|| Arc::new(schema));
        }
        Ok(anchors.get(id).cloned())
    }
}

impl Default for SchemaStore {
    fn default() -> Self {
        SchemaStore::new()
    }
}

impl fmt::Debug for SchemaStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let documents = self.documents.read();
        let mut uris: Vec<&String> = documents.keys().collect();
        uris.sort();
        f.debug_struct("SchemaStore")
            .field("documents", &uris)
            .finish()
    }
}

fn check_content_type(location: &str, content_type: &str) -> Result<(), SchemaError> {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if SCHEMA_MEDIA_TYPES.contains(&media_type.as_str()) {
        Ok(())
    } else if location.starts_with(JSON_SCHEMA_ORG) {
        warn!(
            uri = location,
            content_type, "Tolerating unexpected content type"
        );
        Ok(())
    } else {
        Err(SchemaError::InvalidMediaType {
            uri: location.to_string(),
            content_type: content_type.to_string(),
        })
    }
}

/// Document holding a resolved reference.
#[derive(Debug)]
pub(crate) enum Document<'a> {
    /// Part of the document under validation.
    Local(&'a Value),
    /// Document from the store.
    Shared(Arc<Value>),
}

impl Document<'_> {
    pub(crate) fn as_value(&self) -> &Value {
        match self {
            Document::Local(value) => value,
            Document::Shared(value) => value,
        }
    }
}

/// Where a reference points: the containing document, its base URI and the decoded
/// fragment path inside it.
#[derive(Debug)]
pub(crate) struct Location<'a> {
    pub(crate) document: Document<'a>,
    pub(crate) base: String,
    pub(crate) segments: Vec<String>,
}

/// Per-run resolver: the root document with its embedded ids, backed by a shared store.
pub(crate) struct Resolver<'a> {
    draft: Draft,
    ids: AHashMap<String, &'a Value>,
    store: &'a SchemaStore,
    retriever: &'a dyn Retrieve,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        root: &'a Value,
        base: &str,
        draft: Draft,
        store: &'a SchemaStore,
        retriever: &'a dyn Retrieve,
    ) -> Result<Resolver<'a>, SchemaError> {
        let mut ids = AHashMap::new();
        ids.insert(uri::extract_location(base).to_string(), root);
        find_schemas(draft, root, base, &mut |id, schema| {
            ids.insert(id, schema);
        })?;
        Ok(Resolver {
            draft,
            ids,
            store,
            retriever,
        })
    }

    /// Locate `reference` relative to `base`.
    pub(crate) fn locate(&self, reference: &str, base: &str) -> Result<Location<'a>, SchemaError> {
        let resolved = uri::resolve(reference, base)?;
        trace!(reference, base, resolved = %resolved, "Resolving reference");
        let location = uri::extract_location(&resolved);
        let fragment = uri::extract_fragment(&resolved);
        if !fragment.is_empty() && !fragment.starts_with('/') {
            // Location-independent identifier, e.g. `#item`
            let document = match self.ids.get(resolved.as_str()) {
                Some(&schema) => Some(Document::Local(schema)),
                None if self.ids.contains_key(location) => None,
                None => self
                    .store
                    .get_or_fetch_anchor(&resolved, location, self.draft, self.retriever)?
                    .map(Document::Shared),
            };
            return match document {
                Some(document) => Ok(Location {
                    document,
                    base: location.to_string(),
                    segments: Vec::new(),
                }),
                None => Err(SchemaError::FragmentNotFound {
                    uri: location.to_string(),
                    fragment: fragment.to_string(),
                }),
            };
        }
        let segments = fragment_segments(fragment)?;
        let document = match self.ids.get(location) {
            Some(&schema) => Document::Local(schema),
            None => Document::Shared(self.store.get_or_fetch(location, self.retriever)?),
        };
        Ok(Location {
            document,
            base: location.to_string(),
            segments,
        })
    }
}

/// Walk `segments` from `document`, rebasing `base` on every id passed on the way.
///
/// Objects are entered by key and arrays by index.
pub(crate) fn walk<'v>(
    document: &'v Value,
    segments: &[String],
    base: &str,
    draft: Draft,
) -> Result<(&'v Value, String), SchemaError> {
    let mut target = document;
    let mut base = base.to_string();
    for segment in segments {
        if let Some(id) = id_of(draft, target) {
            base = uri::resolve(id, &base)?;
        }
        let next = match target {
            Value::Object(map) => map.get(segment.as_str()),
            Value::Array(items) => parse_index(segment).and_then(|idx| items.get(idx)),
            _ => None,
        };
        target = next.ok_or_else(|| SchemaError::FragmentNotFound {
            uri: base.clone(),
            fragment: JsonPointer::new("", segments.to_vec()).to_string(),
        })?;
    }
    Ok((target, base))
}

fn parse_index(s: &str) -> Option<usize> {
    if s.starts_with('+') || (s.starts_with('0') && s.len() != 1) {
        None
    } else {
        s.parse().ok()
    }
}

/// Find every sub-schema with an id and pass it to `callback` under its absolute id.
///
/// `enum` and `const` hold data rather than schemas and are skipped.
pub(crate) fn find_schemas<'a, F>(
    draft: Draft,
    schema: &'a Value,
    base: &str,
    callback: &mut F,
) -> Result<(), SchemaError>
where
    F: FnMut(String, &'a Value),
{
    match schema {
        Value::Object(item) => {
            let scope = match id_of(draft, schema) {
                Some(id) => {
                    let mut resolved = uri::resolve(id, base)?;
                    // Empty fragments are not distinguishable from absent ones
                    if resolved.ends_with('#') {
                        resolved.pop();
                    }
                    callback(resolved.clone(), schema);
                    resolved
                }
                None => base.to_string(),
            };
            let scope = uri::extract_location(&scope);
            for (key, subschema) in item {
                if key == "enum" || key == "const" {
                    continue;
                }
                find_schemas(draft, subschema, scope, callback)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                find_schemas(draft, item, base, callback)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Decoded segments of a raw fragment such as `/definitions/a~1b`.
pub(crate) fn fragment_segments(fragment: &str) -> Result<Vec<String>, SchemaError> {
    match fragment.strip_prefix('/') {
        Some(path) => path
            .split('/')
            .map(|segment| decode_segment(segment, fragment))
            .collect(),
        None => Ok(Vec::new()),
    }
}
