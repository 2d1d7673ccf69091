//! # Wayline Planner
//!
//! Fluent authoring API for waypoint missions. A [`DroneTask`] accumulates
//! waypoints and actions, validates the result against the vehicle's
//! capability envelope and writes the KMZ archive.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod builder;
pub mod error;

pub use builder::DroneTask;
pub use error::{PlannerError, Result};

pub use wayline_domain::{
    ApprovedMission, CapabilityRegistry, Mission, Subject, ValidationErrors, Violation,
    ViolationKind, Waypoint,
};
pub use wayline_kmz::MissionDocuments;
