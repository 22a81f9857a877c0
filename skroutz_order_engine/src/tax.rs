//! VAT back-calculation.
//!
//! Marketplace payloads quote VAT-inclusive unit prices; the platform stores VAT-exclusive ones.
//! The conversion is `price_excl = price_incl / multiplier`, performed in plain `f64` with no
//! intermediate rounding.
//!
//! The multipliers are configuration constants matching the Greek VAT bands the storefront sells
//! under. They are not derived from a live tax table.

/// Standard VAT band, also applied when the tax class is the platform's empty default.
pub const STANDARD_RATE_MULTIPLIER: f64 = 1.24;
/// Reduced VAT band.
pub const REDUCED_RATE_MULTIPLIER: f64 = 1.13;
/// Low VAT band.
pub const LOW_RATE_MULTIPLIER: f64 = 1.06;
/// Applied to non-taxable products and to unrecognised tax classes.
pub const ZERO_RATE_MULTIPLIER: f64 = 1.0;

/// The platform's tax-status value for products that charge VAT.
pub const TAX_STATUS_TAXABLE: &str = "taxable";

/// A product's tax class, parsed from the raw platform string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxClass {
    Standard,
    ReducedRate,
    LowRate,
    Other(String),
}

impl From<&str> for TaxClass {
    fn from(value: &str) -> Self {
        match value {
            "" => TaxClass::Standard,
            "reduced-rate" => TaxClass::ReducedRate,
            "low-rate" => TaxClass::LowRate,
            other => TaxClass::Other(other.to_string()),
        }
    }
}

impl TaxClass {
    pub fn multiplier(&self) -> f64 {
        match self {
            TaxClass::Standard => STANDARD_RATE_MULTIPLIER,
            TaxClass::ReducedRate => REDUCED_RATE_MULTIPLIER,
            TaxClass::LowRate => LOW_RATE_MULTIPLIER,
            TaxClass::Other(_) => ZERO_RATE_MULTIPLIER,
        }
    }
}

/// Resolve the VAT multiplier for a product's live tax settings. Non-taxable products always get
/// the neutral multiplier, whatever their class says.
pub fn vat_multiplier(tax_status: &str, tax_class: &str) -> f64 {
    if tax_status != TAX_STATUS_TAXABLE {
        return ZERO_RATE_MULTIPLIER;
    }
    TaxClass::from(tax_class).multiplier()
}
