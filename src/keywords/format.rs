//! Validator for `format` keyword.
use crate::{
    context::{Formats, ValidationContext},
    error::ValidationErrorKind,
    keywords::{pattern, CheckResult},
    paths::InstancePath,
};
use chrono::NaiveDate;
use email_address::EmailAddress;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::{
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
    sync::Arc,
};
use url::Url;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}\z").expect("Is a valid regex"));
static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.[0-9]+)?(?:[Zz]|([+-])([0-9]{2}):([0-9]{2}))\z")
        .expect("Is a valid regex")
});
static JSON_POINTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/(([^/~])|(~[01]))*)*\z").expect("Is a valid regex"));
static RELATIVE_JSON_POINTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:0|[1-9][0-9]*)(?:#|(?:/(?:[^~/]|~0|~1)*)*)\z").expect("Is a valid regex")
});
static URI_REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+:(/?/?))?[^#\\\s]*(#[^\\\s]*)?\z").expect("Is a valid regex"));
static URI_TEMPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:(?:[^\x00-\x20"'<>%\\^`{|}]|%[0-9a-f]{2})|\{[+#./;?&=,!@|]?(?:[a-z0-9_]|%[0-9a-f]{2})+(?::[1-9][0-9]{0,3}|\*)?(?:,(?:[a-z0-9_]|%[0-9a-f]{2})+(?::[1-9][0-9]{0,3}|\*)?)*})*\z"#
    )
    .expect("Is a valid regex")
});
static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})\z").expect("Is a valid regex")
});
static STYLE_DECLARATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*[-a-z]+\s*:\s*.+$").expect("Is a valid regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?(\([0-9]{3}\)|[0-9]{3}) [0-9]{3} [0-9]{4}\z").expect("Is a valid regex")
});

const CSS_COLORS: [&str; 17] = [
    "aqua", "black", "blue", "fuchsia", "gray", "green", "lime", "maroon", "navy", "olive",
    "orange", "purple", "red", "silver", "teal", "white", "yellow",
];

/// A predicate over strings, used for the `format` keyword.
///
/// Implemented for every `Fn(&str) -> bool` closure, so custom formats are usually plain
/// functions:
/// ```rust
/// use jsonschema_check::Validator;
///
/// fn is_currency(value: &str) -> bool {
///     value.len() == 3 && value.bytes().all(|b| b.is_ascii_uppercase())
/// }
///
/// let validator = Validator::options()
///     .with_format("currency", is_currency)
///     .build()
///     .expect("Valid options");
/// ```
pub trait Format: Send + Sync + 'static {
    fn is_valid(&self, value: &str) -> bool;
}

impl<F> Format for F
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    #[inline]
    fn is_valid(&self, value: &str) -> bool {
        self(value)
    }
}

/// `format`: delegate to the validator registered under the name. Unknown names pass.
pub(crate) fn check(
    ctx: &mut ValidationContext<'_>,
    string: &str,
    format: &Value,
    path: &InstancePath<'_>,
) -> CheckResult {
    let (Some(formats), Value::String(name)) = (ctx.formats, format) else {
        return Ok(());
    };
    if let Some(validator) = formats.get(name.as_str()) {
        if !validator.is_valid(string) {
            ctx.error(
                ValidationErrorKind::Format {
                    format: name.clone(),
                },
                path,
            )?;
        }
    }
    Ok(())
}

fn entry(name: &str, format: impl Format) -> (String, Arc<dyn Format>) {
    (name.to_string(), Arc::new(format))
}

/// Formats known out of the box, including the names older drafts used.
pub(crate) fn builtin() -> Formats {
    [
        entry("color", is_valid_color),
        entry("date", is_valid_date),
        entry("date-time", is_valid_datetime),
        entry("email", is_valid_email),
        entry("host-name", is_valid_hostname),
        entry("hostname", is_valid_hostname),
        entry("idn-email", is_valid_email),
        entry("idn-hostname", is_valid_hostname),
        entry("ip-address", is_valid_ipv4),
        entry("ipv4", is_valid_ipv4),
        entry("ipv6", is_valid_ipv6),
        entry("iri", is_valid_uri),
        entry("iri-reference", is_valid_uri_reference),
        entry("json-pointer", is_valid_json_pointer),
        entry("phone", is_valid_phone),
        entry("regex", is_valid_regex),
        entry("relative-json-pointer", is_valid_relative_json_pointer),
        entry("style", is_valid_style),
        entry("time", is_valid_time),
        entry("uri", is_valid_uri),
        entry("uri-reference", is_valid_uri_reference),
        entry("uri-template", is_valid_uri_template),
        entry("uriref", is_valid_uri_reference),
        entry("utc-millisec", is_valid_utc_millisec),
    ]
    .into_iter()
    .collect()
}

/// `YYYY-MM-DD` that survives a round trip through a calendar date.
fn is_valid_date(date: &str) -> bool {
    DATE_RE.is_match(date)
        && NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_or(false, |parsed| parsed.format("%Y-%m-%d").to_string() == date)
}

/// RFC 3339 `full-time`.
///
/// A leap second is only valid when the UTC equivalent is 23:59:60.
fn is_valid_time(time: &str) -> bool {
    let Some(captures) = TIME_RE.captures(time) else {
        return false;
    };
    let field = |idx: usize| {
        captures
            .get(idx)
            .and_then(|m| m.as_str().parse::<i32>().ok())
    };
    let (Some(hour), Some(minute), Some(second)) = (field(1), field(2), field(3)) else {
        return false;
    };
    if hour > 23 || minute > 59 || second > 60 {
        return false;
    }
    let offset = match captures.get(4).map(|m| m.as_str()) {
        Some(sign) => {
            let (Some(offset_hour), Some(offset_minute)) = (field(5), field(6)) else {
                return false;
            };
            if offset_hour > 23 || offset_minute > 59 {
                return false;
            }
            let offset = offset_hour * 60 + offset_minute;
            if sign == "-" {
                -offset
            } else {
                offset
            }
        }
        None => 0,
    };
    if second == 60 {
        let utc = (hour * 60 + minute - offset).rem_euclid(24 * 60);
        utc == 23 * 60 + 59
    } else {
        true
    }
}

fn is_valid_datetime(datetime: &str) -> bool {
    match datetime.find(|ch: char| ch == 'T' || ch == 't') {
        Some(idx) => is_valid_date(&datetime[..idx]) && is_valid_time(&datetime[idx + 1..]),
        None => false,
    }
}

fn is_valid_ipv4(address: &str) -> bool {
    Ipv4Addr::from_str(address).is_ok()
}

fn is_valid_ipv6(address: &str) -> bool {
    Ipv6Addr::from_str(address).is_ok()
}

fn is_valid_email(email: &str) -> bool {
    let Ok(parsed) = EmailAddress::from_str(email) else {
        return false;
    };
    let domain = parsed.domain();
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        match literal.strip_prefix("IPv6:") {
            Some(address) => is_valid_ipv6(address),
            None => is_valid_ipv4(literal),
        }
    } else {
        is_valid_hostname(domain)
    }
}

/// Host names, internationalized ones included.
///
/// The name is checked against the contextual rules of RFC 5892 first, then converted with
/// IDNA ToASCII and every label checked against the LDH rule.
fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.split('.').any(violates_context_rules) {
        return false;
    }
    let Ok(ascii) = idna::domain_to_ascii(hostname) else {
        return false;
    };
    ascii.len() <= 253 && ascii.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn is_greek(ch: char) -> bool {
    matches!(ch, '\u{0370}'..='\u{03FF}' | '\u{1F00}'..='\u{1FFF}')
}

fn is_hebrew(ch: char) -> bool {
    matches!(ch, '\u{0590}'..='\u{05FF}')
}

fn is_japanese(ch: char) -> bool {
    matches!(
        ch,
        '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FA}' | '\u{30FC}'..='\u{30FF}' | '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}'
    )
}

/// CONTEXTJ / CONTEXTO characters used outside of their allowed context.
fn violates_context_rules(label: &str) -> bool {
    let chars: Vec<char> = label.chars().collect();
    let mut arabic_indic = false;
    let mut extended_arabic_indic = false;
    for (idx, &ch) in chars.iter().enumerate() {
        let previous = idx.checked_sub(1).and_then(|i| chars.get(i)).copied();
        let next = chars.get(idx + 1).copied();
        let allowed = match ch {
            // Zero width non-joiner and joiner
            '\u{200C}' | '\u{200D}' => false,
            // Devanagari danda and double danda
            '\u{0964}' | '\u{0965}' => false,
            // Catalan middle dot
            '\u{00B7}' => previous == Some('l') && next == Some('l'),
            // Greek keraia
            '\u{0375}' => next.map_or(false, is_greek),
            // Hebrew geresh and gershayim
            '\u{05F3}' | '\u{05F4}' => previous.map_or(false, is_hebrew),
            // Katakana middle dot
            '\u{30FB}' => chars.iter().copied().any(is_japanese),
            '\u{0660}'..='\u{0669}' => {
                arabic_indic = true;
                true
            }
            '\u{06F0}'..='\u{06F9}' => {
                extended_arabic_indic = true;
                true
            }
            _ => true,
        };
        if !allowed {
            return true;
        }
    }
    arabic_indic && extended_arabic_indic
}

fn is_valid_json_pointer(pointer: &str) -> bool {
    JSON_POINTER_RE.is_match(pointer)
}

fn is_valid_relative_json_pointer(pointer: &str) -> bool {
    RELATIVE_JSON_POINTER_RE.is_match(pointer)
}

fn is_valid_regex(source: &str) -> bool {
    pattern::convert_regex(source).is_ok()
}

fn is_valid_uri(uri: &str) -> bool {
    Url::from_str(uri).is_ok()
}

fn is_valid_uri_reference(reference: &str) -> bool {
    URI_REFERENCE_RE.is_match(reference)
}

fn is_valid_uri_template(template: &str) -> bool {
    URI_TEMPLATE_RE.is_match(template)
}

fn is_valid_color(color: &str) -> bool {
    CSS_COLORS.contains(&color.to_ascii_lowercase().as_str()) || HEX_COLOR_RE.is_match(color)
}

/// `prop: value` declarations separated by semicolons, a trailing one is allowed.
fn is_valid_style(style: &str) -> bool {
    let style = style.trim_end();
    let style = style.strip_suffix(';').unwrap_or(style);
    !style.is_empty()
        && style
            .split(';')
            .all(|declaration| STYLE_DECLARATION_RE.is_match(declaration))
}

fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

fn is_valid_utc_millisec(value: &str) -> bool {
    value.parse::<f64>().map_or(false, f64::is_finite)
}
