//! CEP (Brazilian postal code) validation.
//!
//! A CEP is accepted iff, after stripping every non-digit character,
//! exactly 8 decimal digits remain. This check is a hard gate: an
//! invalid CEP must never be forwarded to a collaborator.

use std::fmt;

use thiserror::Error;

/// Error returned when a raw string does not contain a valid CEP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid zipcode")]
pub struct InvalidCep;

/// A validated 8-digit CEP.
///
/// Separators are tolerated on input (`"01001-000"` parses), but the
/// stored value is always the bare digit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    /// Parse a raw string into a CEP.
    ///
    /// Strips every character that is not a decimal digit and accepts
    /// iff the remainder has length exactly 8. No partial acceptance,
    /// no locale awareness.
    pub fn parse(raw: &str) -> Result<Self, InvalidCep> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != 8 {
            return Err(InvalidCep);
        }
        Ok(Self(digits))
    }

    /// The bare 8-digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
