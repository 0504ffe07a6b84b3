//! Error types for cache operations.
//!
//! This module defines specific error types for cache management,
//! providing detailed context for failures during cache operations.

use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Cache entry exceeds maximum allowed size.
    EntryTooLarge {
        /// The cache key.
        key: String,
        /// The actual size of the entry.
        size: usize,
        /// The maximum allowed size.
        max_size: usize,
    },
    /// Failed to serialize cache entry.
    SerializationFailed {
        /// The cache key.
        key: String,
        /// The serialization error message.
        error: String,
    },
    /// Failed to deserialize cache entry.
    DeserializationFailed {
        /// The cache key.
        key: String,
        /// The deserialization error message.
        error: String,
    },
    /// Cache eviction failed.
    EvictionFailed {
        /// The reason for eviction failure.
        reason: String,
    },
    /// Invalid cache configuration.
    InvalidConfiguration {
        /// The configuration field that is invalid.
        field: String,
        /// The invalid value.
        value: String,
    },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntryTooLarge {
                key,
                size,
                max_size,
            } => {
                write!(
                    f,
                    "Cache entry too large: key='{key}', size={size}, max_size={max_size}"
                )
            }
            Self::SerializationFailed { key, error } => {
                write!(f, "Failed to serialize cache entry '{key}': {error}")
            }
            Self::DeserializationFailed { key, error } => {
                write!(f, "Failed to deserialize cache entry '{key}': {error}")
            }
            Self::EvictionFailed { reason } => {
                write!(f, "Cache eviction failed: {reason}")
            }
            Self::InvalidConfiguration { field, value } => {
                write!(
                    f,
                    "Invalid cache configuration: field='{field}', value='{value}'"
                )
            }
        }
    }
}

impl std::error::Error for CacheError {}
