//! # Domain Types
//!
//! Types shared between the core and the dashboard.
//!
//! ## Document Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      National Tax Identifiers                           │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │  Short (CPF, individuals)    │   │  Long (CNPJ, companies)      │   │
//! │  │  ──────────────────────────  │   │  ──────────────────────────  │   │
//! │  │  11 digits                   │   │  14 digits                   │   │
//! │  │  529.982.247-25              │   │  11.222.333/0001-81          │   │
//! │  │  9 base + 2 check digits     │   │  12 base + 2 check digits    │   │
//! │  └──────────────────────────────┘   └──────────────────────────────┘   │
//! │                                                                         │
//! │  Farmers register as individuals, cooperatives and buyers as           │
//! │  companies: the supplier form accepts either.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Document Kind
// =============================================================================

/// Which identifier format a document string is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// 11-digit individual taxpayer number (CPF).
    #[serde(alias = "cpf")]
    Short,
    /// 14-digit company registration number (CNPJ).
    #[serde(alias = "cnpj")]
    Long,
}

impl DocumentKind {
    /// Number of digits in a complete document, check digits included.
    #[inline]
    pub const fn digit_count(&self) -> usize {
        match self {
            DocumentKind::Short => 11,
            DocumentKind::Long => 14,
        }
    }

    /// Number of digits before the two check digits.
    #[inline]
    pub const fn base_len(&self) -> usize {
        self.digit_count() - 2
    }

    /// Conventional acronym, for log lines and error messages.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            DocumentKind::Short => "CPF",
            DocumentKind::Long => "CNPJ",
        }
    }

    /// Infers the kind from the number of digits in `raw`.
    ///
    /// Punctuation is ignored, so both `"529.982.247-25"` and
    /// `"52998224725"` detect as [`DocumentKind::Short`]. Any digit count
    /// other than 11 or 14 yields `None`.
    ///
    /// ## Example
    /// ```rust
    /// use fieldkit_core::DocumentKind;
    ///
    /// assert_eq!(DocumentKind::detect("11.222.333/0001-81"), Some(DocumentKind::Long));
    /// assert_eq!(DocumentKind::detect("123"), None);
    /// ```
    pub fn detect(raw: &str) -> Option<Self> {
        match raw.chars().filter(char::is_ascii_digit).count() {
            11 => Some(DocumentKind::Short),
            14 => Some(DocumentKind::Long),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
