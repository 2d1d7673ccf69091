//! Builder error types.

use thiserror::Error;
use wayline_domain::{DomainError, ValidationErrors, Violation};
use wayline_kmz::KmzError;

/// Mission builder errors
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("No current waypoint: call fly_to before {operation}")]
    NoCurrentWaypoint { operation: &'static str },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Kmz(#[from] KmzError),
}

impl PlannerError {
    /// Machine-readable error code. A rejected mission reports the code of
    /// its first violation.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoCurrentWaypoint { .. } => "NO_CURRENT_WAYPOINT",
            Self::Domain(err) => err.error_code(),
            Self::Validation(errors) => errors
                .violations()
                .first()
                .map_or("VALIDATION_FAILED", |violation| violation.kind.error_code()),
            Self::Kmz(err) => err.error_code(),
        }
    }

    /// Every violation, if the mission was rejected by validation
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation(errors) => errors.violations(),
            _ => &[],
        }
    }
}

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, PlannerError>;
