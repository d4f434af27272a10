//! # fieldkit-core: Input Safety for the Farm Dashboard
//!
//! This crate is the one part of the dashboard with real edge cases: it
//! decides what user input is acceptable before it reaches a store, a
//! report, or another user's screen.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Farm Dashboard Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (TypeScript)                        │   │
//! │  │   Supplier form ──► Field log form ──► Submit handler           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw strings / JSON values              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fieldkit-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ document  │  │ fixtures  │  │ sanitize  │  │rate_limit │  │   │
//! │  │   │ CPF/CNPJ  │  │ fake docs │  │ text, num │  │ sliding   │  │   │
//! │  │   │ validate  │  │ for demos │  │ email,    │  │ window    │  │   │
//! │  │   │ format    │  │           │  │ records   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO NETWORK • NO DATABASE • NO PERSISTENCE                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`document`] - Check-digit validation and formatting
//! - [`fixtures`] - Fake but valid documents for seed data and tests
//! - [`sanitize`] - Text, number, email and record sanitization
//! - [`rate_limit`] - Per-identifier sliding-window limiter
//! - [`config`] - Rate limit configuration (TOML + environment)
//! - [`clock`] - Time source used by the limiter
//! - [`types`] - Types shared with the frontend
//! - [`error`] - Error types
//!
//! ## Design Principles
//!
//! 1. **Total Functions**: validators answer `bool`, `Option` or `String`;
//!    bad input is an answer, not a panic
//! 2. **No I/O**: nothing here talks to the network or disk
//! 3. **Components Stand Alone**: documents, sanitization and rate limiting
//!    never call each other; the frontend composes them
//!
//! ## Example Usage
//!
//! ```rust
//! use fieldkit_core::{format_document, sanitize_text, validate_document, DocumentKind};
//!
//! let display = format_document("52998224725", DocumentKind::Short);
//! assert_eq!(display, "529.982.247-25");
//! assert!(validate_document(&display, DocumentKind::Short));
//!
//! let note = sanitize_text("<script>alert(1)</script>Talhão 3 irrigado");
//! assert_eq!(note, "Talhão 3 irrigado");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod config;
pub mod document;
pub mod error;
pub mod fixtures;
pub mod rate_limit;
pub mod sanitize;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fieldkit_core::validate_document` instead of
// `use fieldkit_core::document::validate_document`. Fixtures are deliberately
// NOT re-exported: generating a document should read as test code.

pub use config::RateLimitConfig;
pub use document::{check_document, digits_only, format_document, validate_document};
pub use error::{ConfigError, CoreError, CoreResult, ValidationError, ValidationResult};
pub use rate_limit::RateLimiter;
pub use sanitize::{
    check_email, sanitize_number, sanitize_number_str, sanitize_record, sanitize_text,
    sanitize_text_value, validate_email,
};
pub use types::DocumentKind;
