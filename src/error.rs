//! Error types for DeltaKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::types::PageId;

/// Result type alias using DeltaError
pub type Result<T> = std::result::Result<T, DeltaError>;

/// Unified error type for DeltaKV operations
#[derive(Debug, Error)]
pub enum DeltaError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Log Format Errors
    // -------------------------------------------------------------------------
    #[error("Log format error: {0}")]
    Format(String),

    // -------------------------------------------------------------------------
    // Cache Errors
    // -------------------------------------------------------------------------
    #[error("Page not found: {0}")]
    PageNotFound(PageId),
}
