use crate::{
    context::{Scope, ValidationContext},
    error::{SchemaError, ValidationErrorKind},
    keywords::CheckResult,
    paths::InstancePath,
};
use once_cell::sync::Lazy;
use serde_json::Value;

// `regex::Regex` for `replace_all`, which `fancy_regex` lacks
static CONTROL_GROUPS_RE: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"\\c[A-Za-z]").expect("Is a valid regex"));

/// `pattern`: the expression has to match the whole string.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    string: &str,
    pattern: &Value,
    scope: &Scope,
    path: &InstancePath<'_>,
) -> CheckResult {
    let source = match pattern {
        Value::String(source) => source,
        other => {
            return Err(SchemaError::malformed(
                &scope.base,
                format!("'pattern' must be a string, got {}", other),
            ))
        }
    };
    let regex = ctx.regex(&format!("^(?:{})$", source), scope)?;
    // Exceeding the backtrack limit counts as a mismatch
    if !regex.is_match(string).unwrap_or(false) {
        ctx.error(
            ValidationErrorKind::Pattern {
                pattern: source.clone(),
            },
            path,
        )?;
    }
    Ok(())
}

/// Translate ECMA 262 classes into their ASCII-only equivalents and compile.
pub(crate) fn convert_regex(pattern: &str) -> Result<fancy_regex::Regex, fancy_regex::Error> {
    let new_pattern = CONTROL_GROUPS_RE.replace_all(pattern, replace_control_group);
    let mut out = String::with_capacity(new_pattern.len());
    let mut chars = new_pattern.chars();
    while let Some(current) = chars.next() {
        if current != '\\' {
            out.push(current);
            continue;
        }
        match chars.next() {
            Some('d') => out.push_str("[0-9]"),
            Some('D') => out.push_str("[^0-9]"),
            Some('w') => out.push_str("[A-Za-z0-9_]"),
            Some('W') => out.push_str("[^A-Za-z0-9_]"),
            Some('s') => {
                out.push_str("[ \t\n\r\u{000b}\u{000c}\u{2003}\u{feff}\u{2029}\u{00a0}]")
            }
            Some('S') => {
                out.push_str("[^ \t\n\r\u{000b}\u{000c}\u{2003}\u{feff}\u{2029}\u{00a0}]")
            }
            Some(next) => {
                out.push(current);
                out.push(next);
            }
            // A dangling escape, rejected by the compiler below
            None => out.push(current),
        }
    }
    fancy_regex::Regex::new(&out)
}

fn replace_control_group(captures: &regex::Captures<'_>) -> String {
    // `\cX` is the control character X - 64, X is always an ASCII letter here
    captures[0]
        .chars()
        .last()
        .map(|letter| ((letter.to_ascii_uppercase() as u8 - 64) as char).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_util;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(r"^[\w\-\.\+]+$", "CC-BY-4.0", true; "word class")]
    #[test_case(r"^[\w\-\.\+]+$", "CC-BY-!", false; "word class mismatch")]
    #[test_case(r"^\W+$", "1_0", false; "negated word class")]
    #[test_case(r"\\w", r"\w", true; "escaped backslash")]
    #[test_case(r"^\d+$", "١٢", false; "digits are ascii only")]
    #[test_case(r"^\cJ$", "\n", true; "control group")]
    #[test_case("^(?!eo:)", "proj:epsg", true; "negative lookahead")]
    fn regex_matches(pattern: &str, text: &str, is_matching: bool) {
        let compiled = convert_regex(pattern).expect("A valid regex");
        assert_eq!(
            compiled.is_match(text).expect("A valid pattern"),
            is_matching
        );
    }

    #[test_case(r"\"; "lone backslash")]
    #[test_case(r"\d\"; "trailing backslash")]
    fn invalid_escape_sequences(pattern: &str) {
        assert!(convert_regex(pattern).is_err())
    }

    #[test_case("a+", "aaa", true; "whole string")]
    #[test_case("a+", "xxaxx", false; "substring")]
    #[test_case("a|b", "ab", false; "alternation is grouped")]
    #[test_case("^a+$", "aa", true; "explicit anchors")]
    #[test_case("", "", true; "empty")]
    fn full_match(pattern: &str, value: &str, expected: bool) {
        let schema = json!({ "pattern": pattern });
        if expected {
            tests_util::is_valid(&schema, &json!(value))
        } else {
            tests_util::is_not_valid(&schema, &json!(value))
        }
    }

    #[test]
    fn only_strings_are_constrained() {
        tests_util::is_valid(&json!({"pattern": "^b+$"}), &json!(42));
    }

    #[test]
    fn error_message() {
        tests_util::expect_errors(
            &json!({"pattern": "^a"}),
            &json!("b"),
            &["#: Does not match the regex pattern ^a"],
        );
    }
}
