//! Result type alias for Javelin operations

use crate::error::JavelinError;

/// Standard Result type for Javelin operations
pub type Result<T> = std::result::Result<T, JavelinError>;
