//! # Sanitize Module
//!
//! Neutralizes untrusted form input before it is stored or rendered.
//!
//! ## Where This Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dashboard form                                                         │
//! │    { "name": "<b>Fazenda</b>", "area_ha": "1.250,5", "active": true }   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  sanitize_record() ← THIS MODULE                                        │
//! │    strings → sanitize_text    numbers → sanitize_number    rest → as-is │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Store / API client                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Limits
//! This is a plain-text field filter, not an HTML sanitizer. Pattern removal
//! is best-effort and can be defeated by obfuscated payloads; the final
//! `<`/`>` escape is what guarantees no markup survives. Rich text needs an
//! allow-list encoder instead.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Patterns
// =============================================================================

fn script_regex() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid pattern"))
}

fn js_scheme_regex() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| Regex::new(r"(?i)javascript:").expect("valid pattern"))
}

/// Inline handlers such as `onclick=` or `onError =`.
fn event_handler_regex() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| Regex::new(r"(?i)\bon\w+\s*=").expect("valid pattern"))
}

/// Longest leading decimal number, after stripping.
fn number_prefix_regex() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").expect("valid pattern"))
}

fn email_regex() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~\-]+@[a-zA-Z0-9](?:[a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("valid pattern")
    })
}

// =============================================================================
// Text
// =============================================================================

/// Neutralizes a free-text field.
///
/// ## Steps (order matters)
/// 1. Trim surrounding whitespace
/// 2. Remove `<script …>…</script>` spans (case-insensitive, non-greedy)
/// 3. Remove `javascript:` anywhere
/// 4. Remove `on<word>=` handler fragments
/// 5. Escape `<` → `&lt;` and `>` → `&gt;`
///
/// Script spans must be removed before escaping: once escaped, `&lt;script&gt;`
/// no longer matches and its body would survive as visible text.
///
/// ## Example
/// ```rust
/// use fieldkit_core::sanitize::sanitize_text;
///
/// assert_eq!(sanitize_text("  <script>alert(1)</script>Hello "), "Hello");
/// assert_eq!(sanitize_text("<div>x</div>"), "&lt;div&gt;x&lt;/div&gt;");
/// ```
pub fn sanitize_text(input: &str) -> String {
    let trimmed = input.trim();

    let without_scripts = script_regex().replace_all(trimmed, "");
    if without_scripts.len() != trimmed.len() {
        debug!(
            removed_bytes = trimmed.len() - without_scripts.len(),
            "Stripped script spans from text input"
        );
    }

    let without_scheme = js_scheme_regex().replace_all(&without_scripts, "");
    let without_handlers = event_handler_regex().replace_all(&without_scheme, "");

    without_handlers.replace('<', "&lt;").replace('>', "&gt;")
}

/// [`sanitize_text`] for an arbitrary JSON value.
///
/// Non-string values yield an empty string.
pub fn sanitize_text_value(input: &Value) -> String {
    match input {
        Value::String(s) => sanitize_text(s),
        _ => String::new(),
    }
}

// =============================================================================
// Numbers
// =============================================================================

/// Coerces a value to a finite number.
///
/// ## Rules
/// - JSON number → returned as `f64`
/// - String → everything except digits, `.` and `-` is dropped, then the
///   leading numeric part is parsed (`"12.3.4"` → 12.3, `"R$ 1500"` → 1500)
/// - Anything else, or nothing parseable → `None`
///
/// ## Example
/// ```rust
/// use fieldkit_core::sanitize::sanitize_number;
/// use serde_json::json;
///
/// assert_eq!(sanitize_number(&json!("123.45")), Some(123.45));
/// assert_eq!(sanitize_number(&json!(42)), Some(42.0));
/// assert_eq!(sanitize_number(&json!("abc")), None);
/// assert_eq!(sanitize_number(&json!(true)), None);
/// ```
pub fn sanitize_number(input: &Value) -> Option<f64> {
    match input {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => sanitize_number_str(s),
        _ => None,
    }
}

/// String case of [`sanitize_number`].
pub fn sanitize_number_str(input: &str) -> Option<f64> {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let prefix = number_prefix_regex().find(&kept)?;
    prefix
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

// =============================================================================
// Email
// =============================================================================

/// Checks that `input` looks like `local@domain`.
///
/// ## Rules
/// - Local part: letters, digits and ``.!#$%&'*+/=?^_`{|}~-``
/// - Domain: dot-separated labels, each 1-63 characters, starting and
///   ending with a letter or digit, hyphens allowed inside
///
/// Syntax only; deliverability is the mail provider's problem.
pub fn check_email(input: &str) -> ValidationResult<()> {
    if email_regex().is_match(input) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Returns `true` if `input` is a syntactically valid email address.
///
/// ## Example
/// ```rust
/// use fieldkit_core::sanitize::validate_email;
///
/// assert!(validate_email("produtor@fazenda.com.br"));
/// assert!(!validate_email("produtor@-fazenda.com"));
/// ```
pub fn validate_email(input: &str) -> bool {
    check_email(input).is_ok()
}

// =============================================================================
// Records
// =============================================================================

/// Sanitizes every field of a flat form record.
///
/// - Strings go through [`sanitize_text`]
/// - Numbers go through [`sanitize_number`]; unusable ones become `null`
/// - Booleans, nulls, arrays and objects are copied unchanged
///
/// The returned map has exactly the same keys.
pub fn sanitize_record(record: &Map<String, Value>) -> Map<String, Value> {
    record
        .iter()
        .map(|(key, value)| {
            let clean = match value {
                Value::String(s) => Value::String(sanitize_text(s)),
                Value::Number(_) => match sanitize_number(value) {
                    Some(_) => value.clone(),
                    None => Value::Null,
                },
                other => other.clone(),
            };
            (key.clone(), clean)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_script_spans_removed() {
        let out = sanitize_text("<script>alert(1)</script>Hello");
        assert!(!out.contains("<script"));
        assert!(out.contains("Hello"));

        let out = sanitize_text("a<SCRIPT type=\"x\">\nsteal()\n</ScRiPt>b<script>c</script>d");
        assert_eq!(out, "abd");
    }

    #[test]
    fn test_script_removal_is_non_greedy() {
        let out = sanitize_text("<script>1</script>keep<script>2</script>");
        assert_eq!(out, "keep");
    }

    #[test]
    fn test_markup_escaped() {
        let out = sanitize_text("<div>x</div>");
        assert!(out.contains("&lt;div&gt;"));
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
    }

    #[test]
    fn test_unclosed_script_is_escaped_not_removed() {
        let out = sanitize_text("<script>alert(1)");
        assert_eq!(out, "&lt;script&gt;alert(1)");
    }

    #[test]
    fn test_javascript_scheme_removed() {
        assert_eq!(sanitize_text("JavaScript:alert(1)"), "alert(1)");
        assert_eq!(
            sanitize_text("<a href=\"javascript:void(0)\">"),
            "&lt;a href=\"void(0)\"&gt;"
        );
    }

    #[test]
    fn test_event_handlers_removed() {
        assert_eq!(
            sanitize_text("<img src=x onError=alert(1)>"),
            "&lt;img src=x alert(1)&gt;"
        );
        assert_eq!(sanitize_text("onclick = go()"), " go()");
        // Words merely containing "on" are untouched
        assert_eq!(sanitize_text("Sonnet=14"), "Sonnet=14");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize_text("  Fazenda Boa Vista  "), "Fazenda Boa Vista");
        assert_eq!(sanitize_text(""), "");
    }

    #[test]
    fn test_non_text_value_yields_empty() {
        assert_eq!(sanitize_text_value(&json!(12)), "");
        assert_eq!(sanitize_text_value(&Value::Null), "");
        assert_eq!(sanitize_text_value(&json!("<b>")), "&lt;b&gt;");
    }

    #[test]
    fn test_sanitize_number() {
        assert_eq!(sanitize_number(&json!("123.45")), Some(123.45));
        assert_eq!(sanitize_number(&json!("abc")), None);
        assert_eq!(sanitize_number(&json!(42)), Some(42.0));
        assert_eq!(sanitize_number(&json!(-0.5)), Some(-0.5));
        assert_eq!(sanitize_number(&json!(null)), None);
        assert_eq!(sanitize_number(&json!([1])), None);
    }

    #[test]
    fn test_sanitize_number_str_prefix_semantics() {
        assert_eq!(sanitize_number_str("R$ 1500"), Some(1500.0));
        assert_eq!(sanitize_number_str("12.3.4"), Some(12.3));
        assert_eq!(sanitize_number_str("-7kg"), Some(-7.0));
        assert_eq!(sanitize_number_str("1-2"), Some(1.0));
        assert_eq!(sanitize_number_str(".5"), Some(0.5));
        assert_eq!(sanitize_number_str("-"), None);
        assert_eq!(sanitize_number_str("--5"), None);
        assert_eq!(sanitize_number_str(""), None);
        // Overflows to infinity
        assert_eq!(sanitize_number_str(&"9".repeat(400)), None);
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("produtor@fazenda.com.br"));
        assert!(validate_email("o'neil+farm@coop-sul.org"));
        assert!(validate_email("a@b"));

        assert!(!validate_email(""));
        assert!(!validate_email("no-at-sign"));
        assert!(!validate_email("@fazenda.com"));
        assert!(!validate_email("x@fazenda-.com"));
        assert!(!validate_email("x@fazenda..com"));
        assert!(!validate_email("x y@fazenda.com"));
        assert_eq!(check_email("x@"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_sanitize_record() {
        let record = json!({
            "name": "  <script>x()</script>Fazenda <b>Sul</b> ",
            "area_ha": 1250.5,
            "head_count": 42,
            "active": true,
            "notes": null,
            "tags": ["<a>"],
        });
        let record = record.as_object().unwrap();

        let clean = sanitize_record(record);

        assert_eq!(clean.len(), record.len());
        assert_eq!(clean["name"], json!("Fazenda &lt;b&gt;Sul&lt;/b&gt;"));
        assert_eq!(clean["area_ha"], json!(1250.5));
        assert_eq!(clean["head_count"], json!(42));
        assert_eq!(clean["active"], json!(true));
        assert_eq!(clean["notes"], Value::Null);
        // Nested values are not descended into
        assert_eq!(clean["tags"], json!(["<a>"]));
    }
}
