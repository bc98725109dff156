//! Container typing strategies.
//!
//! Instances may come from hosts where a mapping with the keys `0..n-1` cannot be told apart
//! from a sequence. The strategy decides how such containers are viewed and gives uniform
//! property access for both shapes. It is picked once per validation run from the
//! [`CheckMode`].
use crate::mode::CheckMode;
use serde_json::{Map, Value};
use std::borrow::Cow;

pub(crate) type Entries<'v> = Vec<(Cow<'v, str>, &'v Value)>;

pub(crate) trait TypeCheck: Send + Sync {
    fn is_object(&self, value: &Value) -> bool;
    fn is_array(&self, value: &Value) -> bool;
    fn property_get<'v>(&self, value: &'v Value, name: &str) -> Option<&'v Value>;
    fn property_count(&self, value: &Value) -> usize;
    /// Sequence view of an array-like container.
    fn elements<'v>(&self, value: &'v Value) -> Vec<&'v Value>;
    /// Key/value view of an object-like container.
    fn entries<'v>(&self, value: &'v Value) -> Entries<'v>;

    fn property_exists(&self, value: &Value, name: &str) -> bool {
        self.property_get(value, name).is_some()
    }

    fn property_set(&self, value: &mut Value, name: &str, new: Value) {
        match value {
            Value::Object(map) => {
                map.insert(name.to_string(), new);
            }
            Value::Array(items) => {
                if let Ok(idx) = name.parse::<usize>() {
                    if idx < items.len() {
                        items[idx] = new;
                    } else if idx == items.len() {
                        items.push(new);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Native distinction: only JSON arrays are arrays and only JSON objects are objects.
#[derive(Debug)]
pub(crate) struct StrictTypeCheck;

impl TypeCheck for StrictTypeCheck {
    fn is_object(&self, value: &Value) -> bool {
        value.is_object()
    }

    fn is_array(&self, value: &Value) -> bool {
        value.is_array()
    }

    fn property_get<'v>(&self, value: &'v Value, name: &str) -> Option<&'v Value> {
        value.as_object().and_then(|map| map.get(name))
    }

    fn property_count(&self, value: &Value) -> usize {
        match value {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    fn elements<'v>(&self, value: &'v Value) -> Vec<&'v Value> {
        match value {
            Value::Array(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn entries<'v>(&self, value: &'v Value) -> Entries<'v> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| (Cow::Borrowed(key.as_str()), value))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Shape-based distinction: a container with keys `0..n-1` is array-like, empty containers
/// are both array-like and object-like.
#[derive(Debug)]
pub(crate) struct LooseTypeCheck {
    array_as_object: bool,
}

/// Keys are exactly `"0"` through `"n-1"`. Map keys are unique, so every key being a
/// canonical index below `n` covers the whole range.
fn is_sequential(map: &Map<String, Value>) -> bool {
    let len = map.len();
    let mut buffer = itoa::Buffer::new();
    map.keys().all(|key| match key.parse::<usize>() {
        Ok(idx) => idx < len && key == buffer.format(idx),
        Err(_) => false,
    })
}

impl TypeCheck for LooseTypeCheck {
    fn is_object(&self, value: &Value) -> bool {
        match value {
            Value::Object(map) => map.is_empty() || !is_sequential(map),
            Value::Array(items) => self.array_as_object || items.is_empty(),
            _ => false,
        }
    }

    fn is_array(&self, value: &Value) -> bool {
        match value {
            Value::Array(_) => true,
            Value::Object(map) => is_sequential(map),
            _ => false,
        }
    }

    fn property_get<'v>(&self, value: &'v Value, name: &str) -> Option<&'v Value> {
        match value {
            Value::Object(map) => map.get(name),
            Value::Array(items) => name.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        }
    }

    fn property_count(&self, value: &Value) -> usize {
        StrictTypeCheck.property_count(value)
    }

    fn elements<'v>(&self, value: &'v Value) -> Vec<&'v Value> {
        match value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) if is_sequential(map) => {
                let mut buffer = itoa::Buffer::new();
                (0..map.len())
                    .filter_map(|idx| map.get(buffer.format(idx)))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn entries<'v>(&self, value: &'v Value) -> Entries<'v> {
        match value {
            Value::Object(_) => StrictTypeCheck.entries(value),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, value)| (Cow::Owned(idx.to_string()), value))
                .collect(),
            _ => Vec::new(),
        }
    }
}

static STRICT: StrictTypeCheck = StrictTypeCheck;
static LOOSE: LooseTypeCheck = LooseTypeCheck {
    array_as_object: false,
};
static LOOSE_ARRAY_AS_OBJECT: LooseTypeCheck = LooseTypeCheck {
    array_as_object: true,
};

/// Pick the typing strategy for a validation run.
pub(crate) fn for_mode(mode: CheckMode) -> &'static dyn TypeCheck {
    if !mode.is_loose() {
        &STRICT
    } else if mode.contains(CheckMode::ARRAY_AS_OBJECT) {
        &LOOSE_ARRAY_AS_OBJECT
    } else {
        &LOOSE
    }
}
