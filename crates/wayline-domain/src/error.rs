//! Domain-level error types.

use thiserror::Error;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Unknown vehicle model '{id}' (supported: {supported})")]
    UnknownVehicleModel { id: String, supported: String },

    #[error("Invalid {field} '{value}' (expected one of: {expected})")]
    InvalidOption {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("Waypoint index {index} out of range for mission with {count} waypoints")]
    WaypointIndex { index: usize, count: usize },

    #[error("Action identifier space exhausted")]
    ActionIdOverflow,
}

impl DomainError {
    /// Machine-readable error code
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownVehicleModel { .. } => "UNKNOWN_VEHICLE_MODEL",
            Self::InvalidOption { .. } => "INVALID_OPTION",
            Self::WaypointIndex { .. } => "WAYPOINT_INDEX",
            Self::ActionIdOverflow => "ACTION_ID_OVERFLOW",
        }
    }
}

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, DomainError>;

/// Look up `value` in a table of accepted authoring names.
pub(crate) fn parse_option<T: Copy>(
    field: &'static str,
    value: &str,
    table: &[(&str, T)],
) -> Result<T> {
    table
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, parsed)| *parsed)
        .ok_or_else(|| DomainError::InvalidOption {
            field,
            value: value.to_string(),
            expected: table
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}
