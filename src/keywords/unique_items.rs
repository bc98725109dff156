use crate::{
    context::ValidationContext,
    error::ValidationErrorKind,
    keywords::{helpers, CheckResult},
    paths::InstancePath,
};
use ahash::AHashSet;
use serde_json::Value;
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

// Pairwise comparison beats hashing below this many elements
const ITEMS_SIZE_THRESHOLD: usize = 15;

// Based on implementation proposed by Sven Marnach:
// https://stackoverflow.com/questions/60882381/what-is-the-fastest-correct-way-to-detect-that-there-are-no-duplicates-in-a-json
/// Hash key with the deep equality of `enum` and `const`: `1` and `1.0` are the same item.
pub(crate) struct HashedValue<'a>(&'a Value);

impl PartialEq for HashedValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        helpers::equal(self.0, other.0)
    }
}

impl Eq for HashedValue<'_> {}

impl Hash for HashedValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.0 {
            Value::Null => state.write_u32(3_221_225_473), // chosen randomly
            Value::Bool(ref item) => item.hash(state),
            Value::Number(ref item) => {
                if let Some(number) = item.as_u64() {
                    number.hash(state);
                } else if let Some(number) = item.as_i64() {
                    number.hash(state);
                } else if let Some(number) = item.as_f64() {
                    // Whole floats hash like the integer they are equal to
                    if number.fract() == 0. && number >= 0. && number <= u64::MAX as f64 {
                        (number as u64).hash(state);
                    } else if number.fract() == 0. && number >= i64::MIN as f64 && number < 0. {
                        (number as i64).hash(state);
                    } else {
                        number.to_bits().hash(state);
                    }
                }
            }
            Value::String(ref item) => item.hash(state),
            Value::Array(ref items) => {
                for item in items {
                    HashedValue(item).hash(state);
                }
            }
            Value::Object(ref items) => {
                let mut hash = 0;
                for (key, value) in items {
                    // We have no way of building a new hasher of type `H`, so we
                    // hardcode using the default hasher of a hash map.
                    let mut item_hasher = DefaultHasher::default();
                    key.hash(&mut item_hasher);
                    HashedValue(value).hash(&mut item_hasher);
                    hash ^= item_hasher.finish();
                }
                state.write_u64(hash);
            }
        }
    }
}

pub(crate) fn is_unique(items: &[&Value]) -> bool {
    if items.len() <= ITEMS_SIZE_THRESHOLD {
        items.iter().enumerate().all(|(idx, item)| {
            items[idx + 1..]
                .iter()
                .all(|other| !helpers::equal(item, other))
        })
    } else {
        let mut seen = AHashSet::with_capacity(items.len());
        items
            .iter()
            .map(|item| HashedValue(item))
            .all(move |x| seen.insert(x))
    }
}

pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    elements: &[&Value],
    path: &InstancePath<'_>,
) -> CheckResult {
    if is_unique(elements) {
        Ok(())
    } else {
        ctx.error(ValidationErrorKind::UniqueItems, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_util;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(&json!([1, 2, 3]), true; "distinct numbers")]
    #[test_case(&json!([1, 2, 2]), false; "duplicate numbers")]
    #[test_case(&json!([1, 1.0]), false; "integer and float")]
    #[test_case(&json!([1, "1"]), true; "number and string")]
    #[test_case(&json!([0, false]), true; "zero and false")]
    #[test_case(&json!([{"a": 1, "b": 2}, {"b": 2, "a": 1}]), false; "reordered objects")]
    #[test_case(&json!([[1], [true]]), true; "nested arrays")]
    fn small_arrays(instance: &Value, expected: bool) {
        let items: Vec<&Value> = instance.as_array().unwrap().iter().collect();
        assert_eq!(is_unique(&items), expected);
    }

    #[test]
    fn large_arrays() {
        let mut items: Vec<Value> = (0..20).map(|idx| json!(idx)).collect();
        let refs: Vec<&Value> = items.iter().collect();
        assert!(is_unique(&refs));
        items.push(json!(7.0));
        let refs: Vec<&Value> = items.iter().collect();
        assert!(!is_unique(&refs));
        let objects: Vec<Value> = (0..20).map(|idx| json!({"a": idx, "b": [idx]})).collect();
        let mut refs: Vec<&Value> = objects.iter().collect();
        assert!(is_unique(&refs));
        let duplicate = json!({"b": [3.0], "a": 3});
        refs.push(&duplicate);
        assert!(!is_unique(&refs));
    }

    #[test]
    fn scenario() {
        let schema = json!({"type": "array", "uniqueItems": true});
        tests_util::expect_errors(
            &schema,
            &json!([1, 2, 2]),
            &["#: There are no duplicates allowed in the array"],
        );
        tests_util::is_valid(&schema, &json!([1, 2, 3]));
        tests_util::is_valid(&json!({"uniqueItems": false}), &json!([1, 1]));
    }
}
