//! Price presentation, price input coercion and price range presets.
//!
//! Prices are plain `f64` amounts in the store currency (USD). Totals are kept
//! unrounded; rounding to cents happens only in [`format_price`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format an amount for display, rounded to two decimals (e.g., "$19.99").
#[must_use]
pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Coerce a free-form price field into an optional bound.
///
/// Empty, non-numeric, non-finite and negative input all mean "no constraint".
#[must_use]
pub fn parse_price_input(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Error returned when a price range name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown price range: {0}")]
pub struct UnknownPriceRange(pub String);

/// Preset price ranges offered by the catalog and sidebars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRange {
    /// $0 to $50.
    Budget,
    /// $50 to $100.
    Standard,
    /// $100 to $1000.
    Premium,
    /// Clears both bounds.
    Any,
}

impl PriceRange {
    /// Every preset, in display order.
    pub const ALL: [Self; 4] = [Self::Budget, Self::Standard, Self::Premium, Self::Any];

    /// The `(min, max)` bounds this preset applies.
    #[must_use]
    pub const fn bounds(self) -> (Option<f64>, Option<f64>) {
        match self {
            Self::Budget => (Some(0.0), Some(50.0)),
            Self::Standard => (Some(50.0), Some(100.0)),
            Self::Premium => (Some(100.0), Some(1000.0)),
            Self::Any => (None, None),
        }
    }

    /// Form value for this preset.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::Any => "any",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
            Self::Any => "Any price",
        }
    }

    /// Short description of the bounds.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Budget => "$0-$50",
            Self::Standard => "$50-$100",
            Self::Premium => "$100-$1000",
            Self::Any => "No limit",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceRange {
    type Err = UnknownPriceRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "budget" | "cheap" => Ok(Self::Budget),
            "standard" | "medium" => Ok(Self::Standard),
            "premium" | "expensive" => Ok(Self::Premium),
            "any" | "" => Ok(Self::Any),
            other => Err(UnknownPriceRange(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_rounds_to_cents() {
        assert_eq!(format_price(20.0), "$20.00");
        assert_eq!(format_price(9.999), "$10.00");
        assert_eq!(format_price(0.1 + 0.2), "$0.30");
    }

    #[test]
    fn test_parse_price_input() {
        assert_eq!(parse_price_input("12.5"), Some(12.5));
        assert_eq!(parse_price_input("  40 "), Some(40.0));
        assert_eq!(parse_price_input("0"), Some(0.0));
        assert_eq!(parse_price_input(""), None);
        assert_eq!(parse_price_input("   "), None);
        assert_eq!(parse_price_input("abc"), None);
        assert_eq!(parse_price_input("-5"), None);
        assert_eq!(parse_price_input("NaN"), None);
        assert_eq!(parse_price_input("inf"), None);
    }

    #[test]
    fn test_price_range_bounds() {
        assert_eq!(PriceRange::Budget.bounds(), (Some(0.0), Some(50.0)));
        assert_eq!(PriceRange::Premium.bounds(), (Some(100.0), Some(1000.0)));
        assert_eq!(PriceRange::Any.bounds(), (None, None));
    }

    #[test]
    fn test_price_range_parse() {
        for range in PriceRange::ALL {
            assert_eq!(range.as_str().parse::<PriceRange>(), Ok(range));
        }
        assert_eq!("cheap".parse::<PriceRange>(), Ok(PriceRange::Budget));
        assert_eq!(
            "luxury".parse::<PriceRange>(),
            Err(UnknownPriceRange("luxury".to_string()))
        );
    }
}
