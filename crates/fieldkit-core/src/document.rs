//! # Document Module
//!
//! Check-digit validation and display formatting for CPF (short) and CNPJ
//! (long) identifiers.
//!
//! ## Check Digit Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Modulo-11, applied twice                                               │
//! │                                                                         │
//! │  base digits ──► Σ digit[i] × weight[i] ──► r = Σ mod 11                │
//! │                                              │                          │
//! │                               dv = r < 2 ? 0 : 11 - r                   │
//! │                                                                         │
//! │  1st dv: over the base digits                                           │
//! │  2nd dv: over base + 1st dv, weights shifted by one                     │
//! │                                                                         │
//! │  Short weights:  10 9 8 7 6 5 4 3 2        (then 11 10 … 2)             │
//! │  Long weights:   5 4 3 2 9 8 7 6 5 4 3 2   (then 6 5 4 3 2 9 … 2)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both weight sequences are "count down to 2 from the right"; the long kind
//! wraps back to 9 after reaching 2.
//!
//! ## Usage
//! ```rust
//! use fieldkit_core::document::{format_document, validate_document};
//! use fieldkit_core::DocumentKind;
//!
//! // Live formatting while the user types
//! assert_eq!(format_document("5299822", DocumentKind::Short), "529.982.2");
//!
//! // On submit
//! assert!(validate_document("529.982.247-25", DocumentKind::Short));
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::DocumentKind;

// =============================================================================
// Layout
// =============================================================================

/// Separator inserted *before* the digit at the given zero-based index.
const SHORT_SEPARATORS: &[(usize, char)] = &[(3, '.'), (6, '.'), (9, '-')];
const LONG_SEPARATORS: &[(usize, char)] = &[(2, '.'), (5, '.'), (8, '/'), (12, '-')];

fn separators(kind: DocumentKind) -> &'static [(usize, char)] {
    match kind {
        DocumentKind::Short => SHORT_SEPARATORS,
        DocumentKind::Long => LONG_SEPARATORS,
    }
}

// =============================================================================
// Digits
// =============================================================================

/// Removes every character that is not an ASCII digit.
///
/// ## Example
/// ```rust
/// use fieldkit_core::document::digits_only;
///
/// assert_eq!(digits_only("529.982.247-25"), "52998224725");
/// assert_eq!(digits_only("abc"), "");
/// ```
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn digit_values(raw: &str) -> Vec<u8> {
    raw.bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

/// Weight applied to the digit at `index` when `len` digits are summed.
fn weight(kind: DocumentKind, len: usize, index: usize) -> u32 {
    let from_right = (len - 1 - index) as u32;
    match kind {
        DocumentKind::Short => from_right + 2,
        DocumentKind::Long => from_right % 8 + 2,
    }
}

/// Computes the check digit that follows `digits`.
pub(crate) fn check_digit(kind: DocumentKind, digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * weight(kind, digits.len(), i))
        .sum();

    match sum % 11 {
        r if r < 2 => 0,
        r => (11 - r) as u8,
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a document and reports the first rule it breaks.
///
/// ## Rules (checked in order)
/// 1. Exactly `kind.digit_count()` digits once punctuation is stripped
/// 2. Not a single repeated digit
/// 3. First check digit matches
/// 4. Second check digit matches
///
/// ## Example
/// ```rust
/// use fieldkit_core::document::check_document;
/// use fieldkit_core::{DocumentKind, ValidationError};
///
/// assert!(check_document("529.982.247-25", DocumentKind::Short).is_ok());
/// assert!(matches!(
///     check_document("111.111.111-11", DocumentKind::Short),
///     Err(ValidationError::RepeatedDigits { .. })
/// ));
/// ```
pub fn check_document(raw: &str, kind: DocumentKind) -> ValidationResult<()> {
    let digits = digit_values(raw);
    let expected = kind.digit_count();

    if digits.len() != expected {
        return Err(ValidationError::InvalidLength {
            kind,
            expected,
            actual: digits.len(),
        });
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return Err(ValidationError::RepeatedDigits { kind });
    }

    // First pass covers the base digits, second pass includes the first dv.
    for position in [kind.base_len(), kind.base_len() + 1] {
        let computed = check_digit(kind, &digits[..position]);
        if computed != digits[position] {
            return Err(ValidationError::CheckDigitMismatch {
                kind,
                position,
                expected: computed,
                found: digits[position],
            });
        }
    }

    Ok(())
}

/// Returns `true` if `raw` is a valid document of the given kind.
///
/// Punctuation is ignored; only the digits matter. Never panics, for any
/// input (including empty).
pub fn validate_document(raw: &str, kind: DocumentKind) -> bool {
    check_document(raw, kind).is_ok()
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats `raw` as a (possibly partial) document.
///
/// ## Behavior
/// - Non-digits are dropped
/// - Digits beyond `kind.digit_count()` are dropped
/// - A separator is written only when a digit follows it, so partial input
///   never ends with dangling punctuation
///
/// ## User Workflow
/// ```text
/// keystrokes:  5 → 52 → 529 → 5299 → … → 52998224725
/// display:     5 → 52 → 529 → 529.9 → … → 529.982.247-25
/// ```
///
/// ## Example
/// ```rust
/// use fieldkit_core::document::format_document;
/// use fieldkit_core::DocumentKind;
///
/// assert_eq!(format_document("11222333000181", DocumentKind::Long), "11.222.333/0001-81");
/// assert_eq!(format_document("112", DocumentKind::Long), "11.2");
/// ```
pub fn format_document(raw: &str, kind: DocumentKind) -> String {
    let layout = separators(kind);
    let mut out = String::with_capacity(kind.digit_count() + layout.len());

    for (i, c) in raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(kind.digit_count())
        .enumerate()
    {
        if let Some(&(_, sep)) = layout.iter().find(|(at, _)| *at == i) {
            out.push(sep);
        }
        out.push(c);
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
