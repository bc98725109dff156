//! RFC 3986 reference resolution.
//!
//! Unlike most URL libraries, a `..` segment that would climb above the root of the base
//! path is reported as an error instead of being silently dropped.
use crate::error::SchemaError;
use once_cell::sync::Lazy;
use regex::Regex;

// RFC 3986, Appendix B
static URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("Is a valid regex")
});

#[derive(Debug, Default)]
struct Components<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> Components<'a> {
    fn parse(uri: &'a str) -> Components<'a> {
        match URI_RE.captures(uri) {
            Some(captures) => Components {
                scheme: captures.get(1).map(|m| m.as_str()),
                authority: captures.get(2).map(|m| m.as_str()),
                path: captures.get(3).map_or("", |m| m.as_str()),
                query: captures.get(4).map(|m| m.as_str()),
                fragment: captures.get(5).map(|m| m.as_str()),
            },
            // The expression matches any input; keep everything as a path otherwise
            None => Components {
                path: uri,
                ..Components::default()
            },
        }
    }
}

fn recompose(
    scheme: Option<&str>,
    authority: Option<&str>,
    path: &str,
    query: Option<&str>,
    fragment: Option<&str>,
) -> String {
    let mut output = String::with_capacity(path.len() + 32);
    if let Some(scheme) = scheme {
        output.push_str(scheme);
        output.push(':');
    }
    if let Some(authority) = authority {
        output.push_str("//");
        output.push_str(authority);
    }
    output.push_str(path);
    if let Some(query) = query {
        output.push('?');
        output.push_str(query);
    }
    if let Some(fragment) = fragment {
        output.push('#');
        output.push_str(fragment);
    }
    output
}

/// Whether `uri` carries a scheme.
#[must_use]
pub fn is_absolute(uri: &str) -> bool {
    Components::parse(uri).scheme.is_some()
}

/// Everything before the first `#`.
#[must_use]
pub fn extract_location(uri: &str) -> &str {
    uri.split_once('#').map_or(uri, |(location, _)| location)
}

/// Everything after the first `#`, empty when there is no fragment.
#[must_use]
pub fn extract_fragment(uri: &str) -> &str {
    uri.split_once('#').map_or("", |(_, fragment)| fragment)
}

/// Resolve `reference` against `base`.
///
/// Absolute references are returned unchanged.
/// ```rust
/// use jsonschema_check::uri;
///
/// assert_eq!(
///     uri::resolve("../b.json#/x", "http://host/dir/sub/a.json").unwrap(),
///     "http://host/dir/b.json#/x"
/// );
/// assert!(uri::resolve("../../../b.json", "http://host/dir/a.json").is_err());
/// ```
///
/// # Errors
///
/// `UriResolution` when a `..` segment climbs above the root.
pub fn resolve(reference: &str, base: &str) -> Result<String, SchemaError> {
    let relative = Components::parse(reference);
    if relative.scheme.is_some() {
        return Ok(reference.to_string());
    }
    let base_parts = Components::parse(base);
    let failure = || SchemaError::UriResolution {
        reference: reference.to_string(),
        base: base.to_string(),
    };
    let (authority, path, query) = if relative.authority.is_some() {
        (
            relative.authority,
            remove_dot_segments(relative.path).ok_or_else(failure)?,
            relative.query,
        )
    } else if relative.path.is_empty() {
        (
            base_parts.authority,
            base_parts.path.to_string(),
            relative.query.or(base_parts.query),
        )
    } else if relative.path.starts_with('/') {
        (
            base_parts.authority,
            remove_dot_segments(relative.path).ok_or_else(failure)?,
            relative.query,
        )
    } else {
        let merged = merge(&base_parts, relative.path);
        (
            base_parts.authority,
            remove_dot_segments(&merged).ok_or_else(failure)?,
            relative.query,
        )
    };
    Ok(recompose(
        base_parts.scheme,
        authority,
        &path,
        query,
        relative.fragment,
    ))
}

fn merge(base: &Components<'_>, path: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        format!("/{}", path)
    } else {
        match base.path.rfind('/') {
            Some(idx) => format!("{}{}", &base.path[..=idx], path),
            None => path.to_string(),
        }
    }
}

/// `None` when the path ascends above its root.
fn remove_dot_segments(path: &str) -> Option<String> {
    let absolute = path.starts_with('/');
    let body = if absolute { &path[1..] } else { path };
    let mut output: Vec<&str> = Vec::new();
    let mut segments = body.split('/').peekable();
    let mut trailing_slash = false;
    while let Some(segment) = segments.next() {
        let last = segments.peek().is_none();
        match segment {
            "." => trailing_slash = last,
            ".." => {
                output.pop()?;
                trailing_slash = last;
            }
            _ => {
                output.push(segment);
                trailing_slash = false;
            }
        }
    }
    let mut result = String::with_capacity(path.len());
    if absolute {
        result.push('/');
    }
    result.push_str(&output.join("/"));
    if trailing_slash && !output.is_empty() {
        result.push('/');
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const BASE: &str = "http://a/b/c/d;p?q";

    // RFC 3986, Section 5.4
    #[test_case("g:h", "g:h"; "other scheme")]
    #[test_case("g", "http://a/b/c/g"; "sibling")]
    #[test_case("./g", "http://a/b/c/g"; "dot sibling")]
    #[test_case("g/", "http://a/b/c/g/"; "sibling directory")]
    #[test_case("/g", "http://a/g"; "absolute path")]
    #[test_case("//g", "http://g"; "network path")]
    #[test_case("?y", "http://a/b/c/d;p?y"; "query only")]
    #[test_case("g?y", "http://a/b/c/g?y"; "sibling with query")]
    #[test_case("#s", "http://a/b/c/d;p?q#s"; "fragment only")]
    #[test_case("g#s", "http://a/b/c/g#s"; "sibling with fragment")]
    #[test_case("", "http://a/b/c/d;p?q"; "empty")]
    #[test_case(".", "http://a/b/c/"; "dot")]
    #[test_case("./", "http://a/b/c/"; "dot slash")]
    #[test_case("..", "http://a/b/"; "parent")]
    #[test_case("../", "http://a/b/"; "parent slash")]
    #[test_case("../g", "http://a/b/g"; "parent sibling")]
    #[test_case("../..", "http://a/"; "grandparent")]
    #[test_case("../../g", "http://a/g"; "grandparent sibling")]
    fn rfc_examples(reference: &str, expected: &str) {
        assert_eq!(resolve(reference, BASE).unwrap(), expected);
    }

    #[test_case("../../../g"; "relative path")]
    #[test_case("/../g"; "absolute path")]
    fn ascending_above_root_fails(reference: &str) {
        assert!(matches!(
            resolve(reference, BASE),
            Err(SchemaError::UriResolution { .. })
        ));
    }

    #[test_case("#/definitions/a", "", "#/definitions/a"; "fragment without base")]
    #[test_case("child.json", "", "child.json"; "path without base")]
    #[test_case("other.json#/a", "schemas/root.json", "schemas/other.json#/a"; "relative base")]
    #[test_case("item.json", "http://host/dir/", "http://host/dir/item.json"; "directory base")]
    #[test_case("item.json", "http://host", "http://host/item.json"; "empty base path")]
    #[test_case("http://other/x.json", "http://host/y.json", "http://other/x.json"; "absolute reference")]
    fn resolution(reference: &str, base: &str, expected: &str) {
        assert_eq!(resolve(reference, base).unwrap(), expected);
    }

    #[test_case("http://host/a.json#/b", "http://host/a.json", "/b"; "with fragment")]
    #[test_case("http://host/a.json", "http://host/a.json", ""; "without fragment")]
    #[test_case("#", "", ""; "empty fragment")]
    fn split(uri: &str, location: &str, fragment: &str) {
        assert_eq!(extract_location(uri), location);
        assert_eq!(extract_fragment(uri), fragment);
    }

    #[test_case("http://host/a.json", true; "http")]
    #[test_case("urn:example:a", true; "urn")]
    #[test_case("file:///tmp/a.json", true; "file")]
    #[test_case("a.json", false; "relative path")]
    #[test_case("#/definitions/a", false; "fragment")]
    #[test_case("/abs/path", false; "absolute path")]
    fn absolute(uri: &str, expected: bool) {
        assert_eq!(is_absolute(uri), expected);
    }
}
