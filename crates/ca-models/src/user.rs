//! User model
//!
//! Built from the response headers of the `verify` endpoint, not from an
//! XML body, so all fields are the raw header strings.

use serde::{Deserialize, Serialize};

/// The authenticated user for the configured credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// `user_id` header
    pub id: String,

    /// `user_permission_level` header
    pub permissions: String,

    /// `company_type` header
    pub company_type: String,
}
