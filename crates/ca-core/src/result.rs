//! Result type alias for CostAgent operations

use crate::error::CaError;

/// Standard Result type for CostAgent operations
pub type CaResult<T> = Result<T, CaError>;
