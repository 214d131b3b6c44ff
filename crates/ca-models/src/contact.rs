//! Contact model
//!
//! Resource: `contacts`

use ca_core::Id;
use serde::{Deserialize, Serialize};

use crate::project::Project;

/// A billing contact plus the projects linked to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Id,

    pub organisation_name: String,

    pub first_name: String,

    pub last_name: String,

    pub address1: String,
    pub address2: String,
    pub address3: String,
    pub town: String,
    pub region: String,
    pub postcode: String,
    pub country: String,

    pub phone_number: String,

    pub email: String,

    pub billing_email: String,

    /// Whether invoices carry the contact name
    pub contact_name_on_invoices: bool,

    pub charge_sales_tax: bool,

    pub sales_tax_registration_number: String,

    pub account_balance: f64,

    /// Projects whose `contact_id` matches, embedded as copies
    pub projects: Vec<Project>,
}
