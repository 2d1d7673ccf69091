//! Mission validation against a vehicle capability envelope.
//!
//! [`validate`] never mutates its input. It short-circuits on an unknown
//! vehicle or an empty mission and otherwise collects every violation in
//! check order, so a caller can fix all problems in one pass.

use crate::action::{ActionKind, ActionType};
use crate::registry::{CapabilityRegistry, PayloadModel, VehicleModel};
use crate::{Bounds, Mission, PositioningType};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

// =============================================================================
// VIOLATIONS
// =============================================================================

/// Entity a violation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Mission,
    MissionDefaults,
    Waypoint(usize),
    Action { waypoint: usize, id: u32 },
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mission => f.write_str("mission"),
            Self::MissionDefaults => f.write_str("mission defaults"),
            Self::Waypoint(index) => write!(f, "waypoint {index}"),
            Self::Action { waypoint, id } => write!(f, "action {id} at waypoint {waypoint}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateAxis {
    Latitude,
    Longitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GimbalAxis {
    Pitch,
    Yaw,
}

impl fmt::Display for CoordinateAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        })
    }
}

impl fmt::Display for GimbalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pitch => "pitch",
            Self::Yaw => "yaw",
        })
    }
}

/// What is wrong, with the offending value and allowed range where relevant
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViolationKind {
    #[error("Unknown vehicle model '{id}'")]
    UnknownVehicleModel { id: String },

    #[error("Mission has no waypoints")]
    EmptyMission,

    #[error("Invalid {axis} {value} (allowed {allowed})")]
    InvalidCoordinate {
        axis: CoordinateAxis,
        value: f64,
        allowed: Bounds,
    },

    #[error("Speed {value} m/s out of range {allowed}")]
    SpeedOutOfRange { value: f64, allowed: Bounds },

    #[error("Altitude {value} m out of range {allowed}")]
    AltitudeOutOfRange { value: f64, allowed: Bounds },

    #[error("Positioning {positioning:?} not supported by this vehicle")]
    UnsupportedPositioning { positioning: PositioningType },

    #[error("Payload {payload} not compatible with this vehicle")]
    IncompatiblePayload { payload: PayloadModel },

    #[error("Action {action} not supported by this vehicle")]
    UnsupportedAction { action: ActionType },

    #[error("Gimbal {axis} {value} out of range {allowed}")]
    GimbalOutOfRange {
        axis: GimbalAxis,
        value: f64,
        allowed: Bounds,
    },

    #[error("Duplicate action identifier {id}")]
    DuplicateActionId { id: u32 },

    #[error("Action identifier {id} does not follow {previous}")]
    ActionIdOutOfOrder { id: u32, previous: u32 },

    #[error("Negative hover duration {value} s")]
    NegativeHoverDuration { value: f64 },

    #[error("Heading {value} is not a finite angle")]
    InvalidHeading { value: f64 },
}

impl ViolationKind {
    /// Machine-readable error code
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownVehicleModel { .. } => "UNKNOWN_VEHICLE_MODEL",
            Self::EmptyMission => "EMPTY_MISSION",
            Self::InvalidCoordinate { .. } => "INVALID_COORDINATE",
            Self::SpeedOutOfRange { .. } => "SPEED_OUT_OF_RANGE",
            Self::AltitudeOutOfRange { .. } => "ALTITUDE_OUT_OF_RANGE",
            Self::UnsupportedPositioning { .. } => "UNSUPPORTED_POSITIONING",
            Self::IncompatiblePayload { .. } => "INCOMPATIBLE_PAYLOAD",
            Self::UnsupportedAction { .. } => "UNSUPPORTED_ACTION",
            Self::GimbalOutOfRange { .. } => "GIMBAL_OUT_OF_RANGE",
            Self::DuplicateActionId { .. } => "DUPLICATE_ACTION_ID",
            Self::ActionIdOutOfOrder { .. } => "ACTION_ID_OUT_OF_ORDER",
            Self::NegativeHoverDuration { .. } => "NEGATIVE_HOVER_DURATION",
            Self::InvalidHeading { .. } => "INVALID_HEADING",
        }
    }
}

/// One violation tagged with the entity it refers to
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{subject}: {kind}")]
pub struct Violation {
    pub subject: Subject,
    pub kind: ViolationKind,
}

/// Non-empty, ordered list of violations
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mission rejected with {} violation(s)", self.violations.len())?;
        if let Some(first) = self.violations.first() {
            write!(f, "; first: {first}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Whether any violation has the given error code.
    pub fn contains(&self, error_code: &str) -> bool {
        self.violations
            .iter()
            .any(|violation| violation.kind.error_code() == error_code)
    }
}

// =============================================================================
// APPROVED MISSION
// =============================================================================

/// A mission that passed validation, bound to its resolved vehicle.
///
/// Only [`validate`] constructs this type; the serializer accepts nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovedMission<'r> {
    mission: Mission,
    vehicle: &'r VehicleModel,
}

impl<'r> ApprovedMission<'r> {
    pub const fn mission(&self) -> &Mission {
        &self.mission
    }

    pub const fn vehicle(&self) -> &'r VehicleModel {
        self.vehicle
    }

    /// Payload in use: the explicit choice or the vehicle's default.
    pub fn payload(&self) -> PayloadModel {
        self.mission
            .payload_model
            .unwrap_or(self.vehicle.default_payload)
    }

    pub fn into_mission(self) -> Mission {
        self.mission
    }
}

// =============================================================================
// VALIDATOR
// =============================================================================

/// Check a mission against the registry.
///
/// # Errors
///
/// Returns every violation found. An unknown vehicle or empty mission is
/// reported alone.
pub fn validate<'r>(
    mission: &Mission,
    registry: &'r CapabilityRegistry,
) -> std::result::Result<ApprovedMission<'r>, ValidationErrors> {
    let Ok(vehicle) = registry.lookup(&mission.vehicle_model) else {
        return Err(reject(
            mission,
            vec![Violation {
                subject: Subject::Mission,
                kind: ViolationKind::UnknownVehicleModel {
                    id: mission.vehicle_model.clone(),
                },
            }],
        ));
    };

    if mission.is_empty() {
        return Err(reject(
            mission,
            vec![Violation {
                subject: Subject::Mission,
                kind: ViolationKind::EmptyMission,
            }],
        ));
    }

    let mut found = Vec::new();
    check_coordinates(mission, &mut found);
    check_envelope(mission, vehicle, &mut found);
    check_payload(mission, vehicle, &mut found);
    check_action_support(mission, vehicle, &mut found);
    check_gimbal(mission, vehicle, &mut found);
    check_action_ids(mission, &mut found);
    check_action_parameters(mission, &mut found);

    if !found.is_empty() {
        return Err(reject(mission, found));
    }

    tracing::debug!(
        mission_id = %mission.mission_id,
        vehicle = vehicle.id,
        waypoints = mission.len(),
        actions = mission.action_count(),
        "Mission approved"
    );

    Ok(ApprovedMission {
        mission: mission.clone(),
        vehicle,
    })
}

fn reject(mission: &Mission, violations: Vec<Violation>) -> ValidationErrors {
    for violation in &violations {
        if matches!(violation.kind, ViolationKind::DuplicateActionId { .. }) {
            tracing::error!(
                mission_id = %mission.mission_id,
                subject = %violation.subject,
                "Action identifier invariant broken: {}",
                violation.kind
            );
        } else {
            tracing::warn!(
                mission_id = %mission.mission_id,
                subject = %violation.subject,
                code = violation.kind.error_code(),
                "{}",
                violation.kind
            );
        }
    }
    ValidationErrors { violations }
}

fn check_coordinates(mission: &Mission, found: &mut Vec<Violation>) {
    for (index, waypoint) in mission.waypoints().iter().enumerate() {
        let axes = [
            (CoordinateAxis::Latitude, waypoint.latitude, Bounds::LATITUDE),
            (CoordinateAxis::Longitude, waypoint.longitude, Bounds::LONGITUDE),
        ];
        for (axis, value, allowed) in axes {
            if !allowed.contains(value) {
                found.push(Violation {
                    subject: Subject::Waypoint(index),
                    kind: ViolationKind::InvalidCoordinate {
                        axis,
                        value,
                        allowed,
                    },
                });
            }
        }
    }
}

fn check_envelope(mission: &Mission, vehicle: &VehicleModel, found: &mut Vec<Violation>) {
    let waypoints = mission.waypoints();

    // Defaults are written into both documents as globals, so they are
    // checked even when every waypoint overrides them.
    let default_speed = mission.default_speed();
    if !vehicle.speed.contains(default_speed) {
        found.push(Violation {
            subject: Subject::MissionDefaults,
            kind: ViolationKind::SpeedOutOfRange {
                value: default_speed,
                allowed: vehicle.speed,
            },
        });
    }

    let default_altitude = mission.default_altitude();
    if !vehicle.altitude.contains(default_altitude) {
        found.push(Violation {
            subject: Subject::MissionDefaults,
            kind: ViolationKind::AltitudeOutOfRange {
                value: default_altitude,
                allowed: vehicle.altitude,
            },
        });
    }

    let takeoff = mission.config.takeoff_security_height;
    if !Bounds::TAKEOFF_SECURITY_HEIGHT.contains(takeoff) {
        found.push(Violation {
            subject: Subject::MissionDefaults,
            kind: ViolationKind::AltitudeOutOfRange {
                value: takeoff,
                allowed: Bounds::TAKEOFF_SECURITY_HEIGHT,
            },
        });
    }

    for (index, waypoint) in waypoints.iter().enumerate() {
        if let Some(speed) = waypoint.speed.filter(|s| !vehicle.speed.contains(*s)) {
            found.push(Violation {
                subject: Subject::Waypoint(index),
                kind: ViolationKind::SpeedOutOfRange {
                    value: speed,
                    allowed: vehicle.speed,
                },
            });
        }
        if let Some(height) = waypoint.height.filter(|h| !vehicle.altitude.contains(*h)) {
            found.push(Violation {
                subject: Subject::Waypoint(index),
                kind: ViolationKind::AltitudeOutOfRange {
                    value: height,
                    allowed: vehicle.altitude,
                },
            });
        }
    }

    let positioning = mission.config.positioning;
    if positioning == PositioningType::RtkBaseStation && !vehicle.supports_rtk {
        found.push(Violation {
            subject: Subject::Mission,
            kind: ViolationKind::UnsupportedPositioning { positioning },
        });
    }
}

fn check_payload(mission: &Mission, vehicle: &VehicleModel, found: &mut Vec<Violation>) {
    if let Some(payload) = mission.payload_model {
        if !vehicle.is_payload_compatible(payload) {
            found.push(Violation {
                subject: Subject::Mission,
                kind: ViolationKind::IncompatiblePayload { payload },
            });
        }
    }
}

fn check_action_support(mission: &Mission, vehicle: &VehicleModel, found: &mut Vec<Violation>) {
    for (waypoint, action) in mission.actions() {
        let action_type = action.action_type();
        if !vehicle.supports(action_type) {
            found.push(Violation {
                subject: Subject::Action {
                    waypoint,
                    id: action.id,
                },
                kind: ViolationKind::UnsupportedAction {
                    action: action_type,
                },
            });
        }
    }
}

fn check_gimbal(mission: &Mission, vehicle: &VehicleModel, found: &mut Vec<Violation>) {
    for (waypoint, action) in mission.actions() {
        let ActionKind::GimbalRotate {
            pitch_degrees,
            yaw_degrees,
        } = action.kind
        else {
            continue;
        };

        let axes = [
            (GimbalAxis::Pitch, pitch_degrees, vehicle.gimbal_pitch),
            (GimbalAxis::Yaw, yaw_degrees, vehicle.gimbal_yaw),
        ];
        for (axis, value, allowed) in axes {
            if let Some(value) = value.filter(|v| !allowed.contains(*v)) {
                found.push(Violation {
                    subject: Subject::Action {
                        waypoint,
                        id: action.id,
                    },
                    kind: ViolationKind::GimbalOutOfRange {
                        axis,
                        value,
                        allowed,
                    },
                });
            }
        }
    }
}

fn check_action_ids(mission: &Mission, found: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    let mut previous: Option<u32> = None;

    for (waypoint, action) in mission.actions() {
        let subject = Subject::Action {
            waypoint,
            id: action.id,
        };
        if !seen.insert(action.id) {
            found.push(Violation {
                subject,
                kind: ViolationKind::DuplicateActionId { id: action.id },
            });
        } else if let Some(previous) = previous.filter(|p| *p >= action.id) {
            found.push(Violation {
                subject,
                kind: ViolationKind::ActionIdOutOfOrder {
                    id: action.id,
                    previous,
                },
            });
        }
        previous = Some(action.id);
    }
}

fn check_action_parameters(mission: &Mission, found: &mut Vec<Violation>) {
    for (waypoint, action) in mission.actions() {
        let kind = match action.kind {
            ActionKind::Hover { duration_seconds } if !(duration_seconds >= 0.0) => {
                ViolationKind::NegativeHoverDuration {
                    value: duration_seconds,
                }
            }
            ActionKind::Heading { angle_degrees } if !angle_degrees.is_finite() => {
                ViolationKind::InvalidHeading {
                    value: angle_degrees,
                }
            }
            ActionKind::TakePhoto { .. }
            | ActionKind::StartRecording
            | ActionKind::StopRecording
            | ActionKind::Hover { .. }
            | ActionKind::Heading { .. }
            | ActionKind::GimbalRotate { .. } => continue,
        };
        found.push(Violation {
            subject: Subject::Action {
                waypoint,
                id: action.id,
            },
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::Waypoint;

    fn mission(vehicle: &str) -> Mission {
        let mut mission = Mission::new(vehicle, "Pilot A");
        let registry = CapabilityRegistry::builtin();
        let defaults = registry.lookup(vehicle).or_else(|_| registry.lookup("M350"));
        mission.apply_vehicle_defaults(defaults.unwrap());
        mission
    }

    fn codes(errors: &ValidationErrors) -> Vec<&'static str> {
        errors
            .violations()
            .iter()
            .map(|violation| violation.kind.error_code())
            .collect()
    }

    #[test]
    fn test_unknown_vehicle_short_circuits() {
        let mut mission = mission("UnknownModel");
        mission.push_waypoint(Waypoint::new(200.0, 0.0));

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        assert_eq!(codes(&err), vec!["UNKNOWN_VEHICLE_MODEL"]);
        assert_eq!(err.violations()[0].subject, Subject::Mission);
    }

    #[test]
    fn test_empty_mission_short_circuits() {
        let mut mission = mission("M350");
        mission.set_default_speed(99.0);

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        assert_eq!(codes(&err), vec!["EMPTY_MISSION"]);
    }

    #[test]
    fn test_violations_collected_in_check_order() {
        let mut mission = mission("M350");
        mission.payload_model = Some(PayloadModel::M3T);
        let index = mission.push_waypoint(Waypoint::new(91.0, 0.0).with_speed(20.0));
        mission
            .push_action(
                index,
                ActionKind::GimbalRotate {
                    pitch_degrees: Some(-91.0),
                    yaw_degrees: None,
                },
            )
            .unwrap();

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        assert_eq!(
            codes(&err),
            vec![
                "INVALID_COORDINATE",
                "SPEED_OUT_OF_RANGE",
                "INCOMPATIBLE_PAYLOAD",
                "GIMBAL_OUT_OF_RANGE"
            ]
        );
        assert_eq!(err.violations()[1].subject, Subject::Waypoint(0));
        assert!(err.to_string().contains("4 violation"));
    }

    #[test]
    fn test_default_speed_reported_on_defaults() {
        let mut mission = mission("M350");
        mission.set_default_speed(50.0);
        mission.push_waypoint(Waypoint::new(0.0, 0.0));

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        let violation = &err.violations()[0];
        assert_eq!(violation.subject, Subject::MissionDefaults);
        assert_eq!(
            violation.kind,
            ViolationKind::SpeedOutOfRange {
                value: 50.0,
                allowed: Bounds::new(1.0, 15.0)
            }
        );
    }

    #[test]
    fn test_overridden_invalid_default_still_rejected() {
        let mut mission = mission("M350");
        mission.set_default_speed(50.0);
        mission.set_default_altitude(5000.0);
        mission.push_waypoint(Waypoint::new(0.0, 0.0).with_speed(5.0).with_height(50.0));

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        assert_eq!(codes(&err), vec!["SPEED_OUT_OF_RANGE", "ALTITUDE_OUT_OF_RANGE"]);
        assert!(err
            .violations()
            .iter()
            .all(|violation| violation.subject == Subject::MissionDefaults));
    }

    #[test]
    fn test_altitude_bounds() {
        let mut mission = mission("M350");
        mission.push_waypoint(Waypoint::new(0.0, 0.0).with_height(2.0));
        mission.push_waypoint(Waypoint::new(0.0, 0.001).with_height(1500.0));
        assert!(validate(&mission, CapabilityRegistry::builtin()).is_ok());

        mission.push_waypoint(Waypoint::new(0.0, 0.002).with_height(1.9));
        mission.push_waypoint(Waypoint::new(0.0, 0.003).with_height(1500.5));
        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        let subjects: Vec<Subject> = err.violations().iter().map(|v| v.subject).collect();
        assert_eq!(subjects, vec![Subject::Waypoint(2), Subject::Waypoint(3)]);
        assert_eq!(
            err.violations()[0].kind,
            ViolationKind::AltitudeOutOfRange {
                value: 1.9,
                allowed: Bounds::new(2.0, 1500.0)
            }
        );
    }

    #[test]
    fn test_default_altitude_reported_on_defaults() {
        let mut mission = mission("M3E");
        mission.set_default_altitude(600.0);
        mission.push_waypoint(Waypoint::new(0.0, 0.0));

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        assert_eq!(codes(&err), vec!["ALTITUDE_OUT_OF_RANGE"]);
        assert_eq!(err.violations()[0].subject, Subject::MissionDefaults);
    }

    #[test]
    fn test_longitude_bounds() {
        let mut mission = mission("M350");
        mission.push_waypoint(Waypoint::new(0.0, 180.0));
        mission.push_waypoint(Waypoint::new(0.0, -180.0));
        assert!(validate(&mission, CapabilityRegistry::builtin()).is_ok());

        mission.push_waypoint(Waypoint::new(0.0, -180.5));
        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        assert_eq!(
            err.violations()[0].kind,
            ViolationKind::InvalidCoordinate {
                axis: CoordinateAxis::Longitude,
                value: -180.5,
                allowed: Bounds::LONGITUDE
            }
        );
        assert_eq!(err.violations()[0].subject, Subject::Waypoint(2));
    }

    #[test]
    fn test_takeoff_security_height_bounds() {
        let mut mission = mission("M350");
        mission.push_waypoint(Waypoint::new(0.0, 0.0));
        for height in [1.2, 1500.0] {
            mission.config.takeoff_security_height = height;
            assert!(validate(&mission, CapabilityRegistry::builtin()).is_ok());
        }
        for height in [1.1, 1500.1] {
            mission.config.takeoff_security_height = height;
            let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
            assert_eq!(codes(&err), vec!["ALTITUDE_OUT_OF_RANGE"]);
            assert_eq!(err.violations()[0].subject, Subject::MissionDefaults);
        }
    }

    #[test]
    fn test_gimbal_yaw_bounds() {
        let mut mission = mission("M350");
        let index = mission.push_waypoint(Waypoint::new(0.0, 0.0));
        for yaw in [180.0, -180.0, 180.5, -180.5] {
            mission
                .push_action(
                    index,
                    ActionKind::GimbalRotate {
                        pitch_degrees: None,
                        yaw_degrees: Some(yaw),
                    },
                )
                .unwrap();
        }

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        let ids: Vec<Subject> = err.violations().iter().map(|v| v.subject).collect();
        assert_eq!(
            ids,
            vec![
                Subject::Action { waypoint: 0, id: 2 },
                Subject::Action { waypoint: 0, id: 3 }
            ]
        );
        assert_eq!(codes(&err), vec!["GIMBAL_OUT_OF_RANGE"; 2]);
    }

    #[test]
    fn test_rtk_requires_support() {
        let mut mission = mission("M3E");
        mission.config.positioning = PositioningType::RtkBaseStation;
        mission.push_waypoint(Waypoint::new(0.0, 0.0));

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        assert_eq!(codes(&err), vec!["UNSUPPORTED_POSITIONING"]);
    }

    #[test]
    fn test_unsupported_action() {
        let mut mission = mission("M3M");
        let index = mission.push_waypoint(Waypoint::new(0.0, 0.0));
        mission.push_action(index, ActionKind::StartRecording).unwrap();

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        assert_eq!(codes(&err), vec!["UNSUPPORTED_ACTION"]);
        assert_eq!(
            err.violations()[0].subject,
            Subject::Action { waypoint: 0, id: 0 }
        );
    }

    #[test]
    fn test_duplicate_and_unordered_ids() {
        let mut mission = mission("M350");
        let mut first = Waypoint::new(0.0, 0.0);
        first.actions.push(Action::new(5, ActionKind::StartRecording));
        first.actions.push(Action::new(3, ActionKind::StopRecording));
        let mut second = Waypoint::new(0.0, 0.001);
        second.actions.push(Action::new(5, ActionKind::StopRecording));
        mission.push_waypoint(first);
        mission.push_waypoint(second);

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        assert_eq!(
            codes(&err),
            vec!["ACTION_ID_OUT_OF_ORDER", "DUPLICATE_ACTION_ID"]
        );
    }

    #[test]
    fn test_action_parameters() {
        let mut mission = mission("M350");
        let index = mission.push_waypoint(Waypoint::new(0.0, 0.0));
        mission
            .push_action(index, ActionKind::Hover { duration_seconds: -1.0 })
            .unwrap();
        mission
            .push_action(index, ActionKind::Heading { angle_degrees: f64::INFINITY })
            .unwrap();
        mission
            .push_action(index, ActionKind::Hover { duration_seconds: 0.0 })
            .unwrap();

        let err = validate(&mission, CapabilityRegistry::builtin()).unwrap_err();
        assert_eq!(codes(&err), vec!["NEGATIVE_HOVER_DURATION", "INVALID_HEADING"]);
    }

    #[test]
    fn test_approved_mission_payload_fallback() {
        let mut mission = mission("M30T");
        mission.push_waypoint(Waypoint::new(37.0, -122.0));

        let approved = validate(&mission, CapabilityRegistry::builtin()).unwrap();
        assert_eq!(approved.payload(), PayloadModel::M30T);
        assert_eq!(approved.vehicle().id, "M30T");
        assert_eq!(approved.mission(), &mission);
    }
}
