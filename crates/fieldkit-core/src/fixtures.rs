//! # Fixtures Module
//!
//! Generates plausible-but-fake documents for seed data, demos, and tests.
//!
//! Uses `rand::thread_rng()`, which is NOT suitable for anything secret.
//! Generated numbers pass the check-digit rule and nothing else: never use
//! them as tokens, and never store them as a real person's identity.

use rand::Rng;

use crate::document::{check_digit, format_document};
use crate::types::DocumentKind;

/// Generates an unformatted, check-digit-valid document.
///
/// Draws that come out as a single repeated digit are redrawn, so every
/// result passes [`crate::document::validate_document`].
pub fn generate_digits(kind: DocumentKind) -> String {
    let mut rng = rand::thread_rng();

    let digits = loop {
        let mut digits: Vec<u8> = (0..kind.base_len()).map(|_| rng.gen_range(0..10)).collect();
        digits.push(check_digit(kind, &digits));
        digits.push(check_digit(kind, &digits));

        if digits.iter().any(|&d| d != digits[0]) {
            break digits;
        }
    };

    digits.into_iter().map(|d| char::from(b'0' + d)).collect()
}

/// Generates a formatted, check-digit-valid document.
///
/// ## Example
/// ```rust
/// use fieldkit_core::fixtures::generate_document;
/// use fieldkit_core::document::validate_document;
/// use fieldkit_core::DocumentKind;
///
/// let cnpj = generate_document(DocumentKind::Long);
/// assert_eq!(cnpj.len(), 18); // 11.222.333/0001-81
/// assert!(validate_document(&cnpj, DocumentKind::Long));
/// ```
pub fn generate_document(kind: DocumentKind) -> String {
    format_document(&generate_digits(kind), kind)
}

// =============================================================================
// Unit Tests
// =============================================================================
