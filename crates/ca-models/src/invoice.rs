//! Invoice and invoice-item models
//!
//! Resource: `invoices`

use ca_core::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::project::Project;

/// An issued invoice with its line items in document order.
///
/// Unlike timeslips, an invoice with an unresolvable project reference is
/// kept with `project: None` rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Id,

    pub project_id: Option<Id>,

    /// Resolved project, when the reference could be looked up
    pub project: Option<Project>,

    pub description: String,

    pub reference: String,

    /// Net value of the invoice as stated on the wire
    pub amount: f64,

    pub status: String,

    pub dated_on: Option<NaiveDate>,

    pub due_on: Option<NaiveDate>,

    pub items: Vec<InvoiceItem>,
}

/// A single invoice line.
///
/// `cost` is always `price * quantity`, never read from the payload, so a
/// stated wire total can never disagree with the line's own figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Id,

    pub invoice_id: Id,

    pub project_id: Option<Id>,

    pub project: Option<Project>,

    pub item_type: String,

    pub description: String,

    pub price: f64,

    pub quantity: f64,

    pub cost: f64,
}
