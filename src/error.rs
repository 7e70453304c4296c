//! Errors returned by the fallible [`Cache`](crate::Cache) entry points.
//!
//! The infallible methods (`add`, `remove`) treat the same conditions as
//! programming errors and panic instead.

use thiserror::Error;

/// Reasons a fallible cache operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The key is already resident.
    #[error("key is already resident in the cache")]
    DuplicateKey,

    /// The key is not resident.
    #[error("key is not resident in the cache")]
    KeyNotFound,

    /// Entries must have a non-zero size.
    #[error("cache entries must have a non-zero size")]
    ZeroSize,

    /// The cost was negative, infinite or NaN.
    #[error("cost must be finite and non-negative")]
    InvalidCost,
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::DuplicateKey.to_string(),
            "key is already resident in the cache"
        );
        assert_eq!(
            CacheError::ZeroSize.to_string(),
            "cache entries must have a non-zero size"
        );
    }
}
