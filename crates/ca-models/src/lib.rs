//! # ca-models
//!
//! Domain models for CostAgent RS.
//!
//! This crate contains the entity records resolved out of the remote XML
//! payloads, plus billing-rate derivation. Every record is an immutable
//! owned value once constructed: cross-references are embedded as copies as
//! of resolution time, never as live references, so there are no ownership
//! cycles and a later refetch cannot retroactively change an already
//! resolved record.

pub mod contact;
pub mod invoice;
pub mod project;
pub mod rates;
pub mod task;
pub mod timeslip;
pub mod user;

// Re-exports for convenience
pub use contact::Contact;
pub use invoice::{Invoice, InvoiceItem};
pub use project::Project;
pub use rates::{derive, BillingRates};
pub use task::Task;
pub use timeslip::Timeslip;
pub use user::User;
