//! Billing-rate derivation
//!
//! The remote API quotes a single raw rate per resource together with its
//! billing period. Exactly one of the hourly/daily figures is native; the
//! other is always derived from the project's hours-per-day.

use ca_core::{CaError, CaResult};

/// The derived pair of billing figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillingRates {
    pub hourly: f64,
    pub daily: f64,
}

/// Derive hourly and daily rates from a raw rate and its billing period.
///
/// A period of `"hour"` makes the hourly rate native; any other period is
/// treated as per-day. Converting a day-period rate with non-positive
/// hours-per-day would divide by zero, so that case is an explicit error
/// rather than a silent infinity.
pub fn derive(raw_rate: f64, billing_period: &str, hours_per_day: f64) -> CaResult<BillingRates> {
    if billing_period == "hour" {
        return Ok(BillingRates {
            hourly: raw_rate,
            daily: raw_rate * hours_per_day,
        });
    }
    if hours_per_day <= 0.0 {
        return Err(CaError::RateDerivation {
            billing_period: billing_period.to_string(),
            hours_per_day,
        });
    }
    Ok(BillingRates {
        hourly: raw_rate / hours_per_day,
        daily: raw_rate,
    })
}
