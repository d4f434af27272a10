//! # Error Types
//!
//! Domain-specific error types for fieldkit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError            - Umbrella type for fallible setup paths          │
//! │  ├── ValidationError  - Why a document/email was rejected               │
//! │  └── ConfigError      - Rate limit configuration problems               │
//! │                                                                         │
//! │  The form-facing API never returns these: validate_document() is a     │
//! │  bool, sanitize_number() is an Option. Errors exist for callers that   │
//! │  want to know WHY (check_document) or that build a limiter from config. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (kind, position, key)
//! 3. Errors are enum variants, never String
//! 4. No user-facing copy here; the dashboard translates variants

use thiserror::Error;

use crate::types::DocumentKind;

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for the crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error (wraps ConfigError).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Reasons a value was rejected by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Wrong number of digits after stripping punctuation.
    #[error("{kind} must have {expected} digits, got {actual}")]
    InvalidLength {
        kind: DocumentKind,
        expected: usize,
        actual: usize,
    },

    /// Every digit is the same (e.g. 111.111.111-11).
    ///
    /// ## Why This Is Rejected
    /// Sequences like 000.000.000-00 satisfy the modulo-11 rule but are
    /// never issued. They are the most common value typed to "get past"
    /// a required field.
    #[error("{kind} cannot consist of a single repeated digit")]
    RepeatedDigits { kind: DocumentKind },

    /// A computed check digit does not match the one supplied.
    ///
    /// `position` is the zero-based index in the stripped digit string.
    #[error("{kind} check digit at position {position} should be {expected}, found {found}")]
    CheckDigitMismatch {
        kind: DocumentKind,
        position: usize,
        expected: u8,
        found: u8,
    },

    /// Email address does not have a `local@domain` shape.
    #[error("invalid email address")]
    InvalidEmail,
}

// =============================================================================
// Config Error
// =============================================================================

/// Rate limit configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is present but unusable.
    #[error("{key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// TOML could not be parsed into a config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
