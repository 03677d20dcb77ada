//! Temperature unit conversions.
//!
//! Pure numeric helpers; NaN and infinities pass through unchecked.
//! Callers are expected to hand in finite upstream values.

use serde::{Deserialize, Serialize};

/// Kelvin conversion behavior.
///
/// The deployed service variants disagree: one rounds `c + 273.15` to
/// one decimal, the other adds a bare `273` offset with no rounding.
/// Neither source is authoritative, so both are kept as explicit
/// policy. `Rounded` is the default; `LegacyOffset` exists only for
/// compatibility with the older variant and is pending confirmation
/// before removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KelvinPolicy {
    /// `round(c + 273.15, 1dp)`.
    #[default]
    Rounded,
    /// `c + 273`, unrounded. Deprecated.
    LegacyOffset,
}

/// Celsius to Fahrenheit, rounded to one decimal.
pub fn to_fahrenheit(celsius: f64) -> f64 {
    round1(celsius * 1.8 + 32.0)
}

/// Celsius to Kelvin under the given policy.
pub fn to_kelvin(celsius: f64, policy: KelvinPolicy) -> f64 {
    match policy {
        KelvinPolicy::Rounded => round1(celsius + 273.15),
        KelvinPolicy::LegacyOffset => celsius + 273.0,
    }
}

/// Round half away from zero, one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
