use ahash::AHashMap;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;

/// Decodes a string in some encoding. `None` when the string is not valid in it.
pub(crate) type ContentEncodingConverterType = fn(&str) -> Option<Vec<u8>>;

static BASE64_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").expect("Is a valid regex"));

/// The alphabet is checked before decoding.
pub(crate) fn from_base64(instance_string: &str) -> Option<Vec<u8>> {
    if !BASE64_RE.is_match(instance_string) {
        return None;
    }
    STANDARD.decode(instance_string).ok()
}

pub(crate) static DEFAULT_CONTENT_ENCODING_CONVERTERS: Lazy<
    AHashMap<&'static str, ContentEncodingConverterType>,
> = Lazy::new(|| {
    let mut map: AHashMap<&'static str, ContentEncodingConverterType> =
        AHashMap::with_capacity(1);
    map.insert("base64", from_base64);
    map
});

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("eyJmb28iOiAiYmFyIn0=", Some(&br#"{"foo": "bar"}"#[..]); "padded")]
    #[test_case("Zm9v", Some(&b"foo"[..]); "unpadded")]
    #[test_case("", Some(&b""[..]); "empty")]
    #[test_case("/w==", Some(&[0xFF][..]); "binary")]
    #[test_case("Zm9v!", None; "outside alphabet")]
    #[test_case("Zm9v\n", None; "newline")]
    #[test_case("Zm9===", None; "too much padding")]
    fn decode(input: &str, expected: Option<&[u8]>) {
        assert_eq!(from_base64(input).as_deref(), expected);
    }
}
