//! Task model
//!
//! Resource: `projects/{id}/tasks`

use ca_core::Id;
use serde::{Deserialize, Serialize};

use crate::project::Project;

/// A task within a project.
///
/// Rates are derived with the owning project's hours-per-day. When the
/// project reference cannot be resolved the task still resolves with
/// `project: None` and both rate fields left at the raw wire rate, since no
/// hours-per-day is available to convert with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,

    pub name: String,

    /// Owning project, embedded as a copy at resolution time
    pub project: Option<Project>,

    pub hourly_billing_rate: f64,

    pub daily_billing_rate: f64,

    /// Literal `is-billable == "true"` on the wire. A billable task with a
    /// zero rate is a valid unbilled task.
    pub billable: bool,
}
