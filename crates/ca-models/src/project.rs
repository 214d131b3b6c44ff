//! Project model
//!
//! Resource: `projects`

use ca_core::Id;
use serde::{Deserialize, Serialize};

/// A billable project.
///
/// The wire carries one raw rate plus a billing period; both `hourly_billing_rate`
/// and `daily_billing_rate` are always populated, with the non-native one
/// derived through [`crate::rates::derive`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,

    pub name: String,

    /// ISO currency code the project bills in (e.g. "GBP")
    pub currency: String,

    pub hourly_billing_rate: f64,

    pub daily_billing_rate: f64,

    pub hours_per_day: f64,

    /// Owning contact, when the account links projects to contacts
    pub contact_id: Option<Id>,
}
