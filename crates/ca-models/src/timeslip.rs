//! Timeslip model
//!
//! Resource: `timeslips`

use ca_core::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::project::Project;
use crate::task::Task;

/// A unit of recorded work, priced at resolution time.
///
/// `cost` is the task's hourly rate when a task is present, otherwise the
/// project's, multiplied by `hours`. A timeslip whose project cannot be
/// resolved is dropped from results by the resolver rather than surfaced as
/// a placeholder, so `project` is always populated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeslip {
    pub id: Id,

    /// Project snapshot as of resolution; later refetches do not change it
    pub project: Project,

    /// Task within the project; legitimately absent
    pub task: Option<Task>,

    pub hours: f64,

    /// `dated-on` from the wire; some payloads omit it
    pub date: Option<NaiveDate>,

    pub cost: f64,

    pub comment: String,

    pub status: String,
}
