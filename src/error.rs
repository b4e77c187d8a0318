//! Error types for autotiling

use thiserror::Error;

/// Errors that can occur while configuring or running the autotiler
#[derive(Debug, Clone, Error)]
pub enum AutotileError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A catalog was consulted that is missing required roles.
    ///
    /// Raised at validation time only; at runtime an empty role simply
    /// places nothing.
    #[error("catalog missing required roles: {}", missing.join(", "))]
    IncompleteCatalog {
        /// Every required role that had no tile variants, in catalog order
        missing: Vec<String>,
    },

    /// The terrain source failed to answer a coordinate query.
    ///
    /// Fatal to the map being generated; the pass is aborted and never
    /// retried internally.
    #[error("terrain source failed at ({x}, {y}): {reason}")]
    TerrainSource {
        /// Queried x coordinate
        x: i32,
        /// Queried y coordinate
        y: i32,
        /// Source-supplied failure description
        reason: String,
    },

    /// The worker pool could not be constructed
    #[error("worker pool failed: {0}")]
    WorkerPool(String),
}

/// Result type alias for autotiler operations
pub type Result<T> = std::result::Result<T, AutotileError>;
