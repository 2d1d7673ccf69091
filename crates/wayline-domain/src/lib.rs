//! # Wayline Mission Planning - Domain Model
//!
//! Core entities, value objects and enums for autonomous waypoint missions,
//! together with the vehicle capability registry and the validator that
//! approves a mission before any document is rendered from it.
//!
//! These types are the single source of truth for the builder, the
//! document serializer and the command line front end.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod action;
pub mod error;
pub mod registry;
pub mod validation;

pub use action::{normalize_heading, Action, ActionKind, ActionType};
pub use error::{DomainError, Result};
pub use registry::{CapabilityRegistry, PayloadModel, VehicleModel};
pub use validation::{
    validate, ApprovedMission, CoordinateAxis, GimbalAxis, Subject, ValidationErrors, Violation,
    ViolationKind,
};

use chrono::{DateTime, Utc};
use error::parse_option;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const LATITUDE: Self = Self::new(-90.0, 90.0);
    pub const LONGITUDE: Self = Self::new(-180.0, 180.0);
    pub const TAKEOFF_SECURITY_HEIGHT: Self = Self::new(1.2, 1500.0);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends; NaN is never contained.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

// =============================================================================
// ENUMS
// =============================================================================

/// How the aircraft passes through a waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnMode {
    TurnAtPoint,
    EarlyTurn,
    CurveAndStop,
    CurveAndPass,
}

impl TurnMode {
    const NAMES: [(&'static str, Self); 4] = [
        ("turn_at_point", Self::TurnAtPoint),
        ("early_turn", Self::EarlyTurn),
        ("curve_and_stop", Self::CurveAndStop),
        ("curve_and_pass", Self::CurveAndPass),
    ];

    /// Parse an authoring name such as `"early_turn"`.
    pub fn parse(name: &str) -> Result<Self> {
        parse_option("turn mode", name, &Self::NAMES)
    }

    /// Firmware turn mode identifier
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TurnAtPoint => "toPointAndStopWithDiscontinuityCurvature",
            Self::EarlyTurn => "coordinateTurn",
            Self::CurveAndStop => "toPointAndStopWithContinuityCurvature",
            Self::CurveAndPass => "toPointAndPassWithContinuityCurvature",
        }
    }

    /// Coordinated turns must declare how early the turn starts.
    pub const fn damping_distance_m(self) -> Option<f64> {
        match self {
            Self::EarlyTurn => Some(0.2),
            _ => None,
        }
    }
}

/// What the aircraft does after the last waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishAction {
    GoHome,
    NoAction,
    AutoLand,
    GotoFirstWaypoint,
}

impl FinishAction {
    const NAMES: [(&'static str, Self); 4] = [
        ("return_home", Self::GoHome),
        ("hover", Self::NoAction),
        ("land", Self::AutoLand),
        ("restart", Self::GotoFirstWaypoint),
    ];

    pub fn parse(name: &str) -> Result<Self> {
        parse_option("finish action", name, &Self::NAMES)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoHome => "goHome",
            Self::NoAction => "noAction",
            Self::AutoLand => "autoLand",
            Self::GotoFirstWaypoint => "gotoFirstWaypoint",
        }
    }
}

/// Behaviour on loss of the remote-control link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RcLostAction {
    Continue,
    Hover,
    GoHome,
    Land,
}

impl RcLostAction {
    /// `exitOnRCLost` value
    pub const fn exit_mode(self) -> &'static str {
        match self {
            Self::Continue => "goContinue",
            _ => "executeLostAction",
        }
    }

    /// `executeRCLostAction` value, only present when the mission is exited
    pub const fn lost_action(self) -> Option<&'static str> {
        match self {
            Self::Continue => None,
            Self::Hover => Some("hover"),
            Self::GoHome => Some("goBack"),
            Self::Land => Some("landing"),
        }
    }
}

/// How the aircraft reaches the first waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlyToWaylineMode {
    Safely,
    PointToPoint,
}

impl FlyToWaylineMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safely => "safely",
            Self::PointToPoint => "pointToPoint",
        }
    }
}

/// Positioning source for waypoint coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositioningType {
    Gps,
    RtkBaseStation,
    QianXun,
}

impl PositioningType {
    const NAMES: [(&'static str, Self); 3] = [
        ("GPS", Self::Gps),
        ("RTK", Self::RtkBaseStation),
        ("Qianxun", Self::QianXun),
    ];

    pub fn parse(name: &str) -> Result<Self> {
        parse_option("positioning type", name, &Self::NAMES)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gps => "GPS",
            Self::RtkBaseStation => "RTKBaseStation",
            Self::QianXun => "QianXun",
        }
    }
}

/// Reference surface for waypoint heights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightMode {
    RelativeToStartPoint,
    Egm96,
    AboveGroundLevel,
}

impl HeightMode {
    const NAMES: [(&'static str, Self); 3] = [
        ("relative", Self::RelativeToStartPoint),
        ("egm96", Self::Egm96),
        ("agl", Self::AboveGroundLevel),
    ];

    pub fn parse(name: &str) -> Result<Self> {
        parse_option("height mode", name, &Self::NAMES)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RelativeToStartPoint => "relativeToStartPoint",
            Self::Egm96 => "EGM96",
            Self::AboveGroundLevel => "aboveGroundLevel",
        }
    }
}

// =============================================================================
// MISSION CONFIGURATION
// =============================================================================

/// Mission-wide flight controller settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionConfig {
    pub fly_to_wayline_mode: FlyToWaylineMode,
    pub finish_action: FinishAction,
    pub rc_lost_action: RcLostAction,
    /// Climb height before heading to the first waypoint, meters
    pub takeoff_security_height: f64,
    pub positioning: PositioningType,
    pub height_mode: HeightMode,
    /// Index of the gimbal mount used by camera and gimbal actions
    pub payload_position: u8,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            fly_to_wayline_mode: FlyToWaylineMode::Safely,
            finish_action: FinishAction::GoHome,
            rc_lost_action: RcLostAction::Continue,
            takeoff_security_height: 20.0,
            positioning: PositioningType::Gps,
            height_mode: HeightMode::RelativeToStartPoint,
            payload_position: 0,
        }
    }
}

// =============================================================================
// ENTITY TYPES
// =============================================================================

/// Waypoint entity - one stop of the flight path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,

    /// Overrides the mission default altitude, meters
    pub height: Option<f64>,
    /// Overrides the mission default speed, m/s
    pub speed: Option<f64>,
    /// Overrides the mission default turn mode
    pub turn_mode: Option<TurnMode>,

    /// Executed in order on arrival
    pub actions: Vec<Action>,
}

impl Waypoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            height: None,
            speed: None,
            turn_mode: None,
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn effective_height(&self, mission: &Mission) -> f64 {
        self.height.unwrap_or(mission.default_altitude)
    }

    pub fn effective_speed(&self, mission: &Mission) -> f64 {
        self.speed.unwrap_or(mission.default_speed)
    }

    pub fn effective_turn_mode(&self, mission: &Mission) -> TurnMode {
        self.turn_mode.unwrap_or(mission.default_turn_mode)
    }

    /// Great-circle distance to another waypoint (Haversine formula)
    #[must_use]
    pub fn distance_to_m(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

/// Mission entity - the complete flight plan for one flight
///
/// Waypoints are append-only. Defaults are inherited by waypoints that do
/// not override them; changing a default never alters a waypoint that
/// already exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mission {
    pub mission_id: Uuid,
    pub vehicle_model: String,
    pub pilot_name: String,
    pub mission_name: String,
    pub payload_model: Option<PayloadModel>,
    pub config: MissionConfig,
    pub created_at: DateTime<Utc>,

    default_speed: f64,
    default_altitude: f64,
    default_turn_mode: TurnMode,

    waypoints: Vec<Waypoint>,
    next_action_id: u32,
}

impl Mission {
    pub const DEFAULT_NAME: &'static str = "Untitled Mission";
    pub const FALLBACK_SPEED: f64 = 10.0;
    pub const FALLBACK_ALTITUDE: f64 = 100.0;

    /// Create an empty mission. Defaults come from the fallback constants
    /// until [`Mission::apply_vehicle_defaults`] is called.
    pub fn new(vehicle_model: impl Into<String>, pilot_name: impl Into<String>) -> Self {
        Self {
            mission_id: Uuid::new_v4(),
            vehicle_model: vehicle_model.into(),
            pilot_name: pilot_name.into(),
            mission_name: Self::DEFAULT_NAME.to_string(),
            payload_model: None,
            config: MissionConfig::default(),
            created_at: Utc::now(),
            default_speed: Self::FALLBACK_SPEED,
            default_altitude: Self::FALLBACK_ALTITUDE,
            default_turn_mode: TurnMode::TurnAtPoint,
            waypoints: Vec::new(),
            next_action_id: 0,
        }
    }

    /// Seed speed, altitude and take-off height from a vehicle's defaults.
    pub fn apply_vehicle_defaults(&mut self, vehicle: &VehicleModel) {
        self.set_default_speed(vehicle.default_speed);
        self.set_default_altitude(vehicle.default_altitude);
        self.config.takeoff_security_height = vehicle.takeoff_security_height;
    }

    pub const fn default_speed(&self) -> f64 {
        self.default_speed
    }

    pub const fn default_altitude(&self) -> f64 {
        self.default_altitude
    }

    pub const fn default_turn_mode(&self) -> TurnMode {
        self.default_turn_mode
    }

    /// Change the default speed for waypoints created from now on.
    pub fn set_default_speed(&mut self, speed: f64) {
        let previous = self.default_speed;
        for waypoint in &mut self.waypoints {
            waypoint.speed.get_or_insert(previous);
        }
        self.default_speed = speed;
    }

    /// Change the default altitude for waypoints created from now on.
    pub fn set_default_altitude(&mut self, altitude: f64) {
        let previous = self.default_altitude;
        for waypoint in &mut self.waypoints {
            waypoint.height.get_or_insert(previous);
        }
        self.default_altitude = altitude;
    }

    /// Change the default turn mode for waypoints created from now on.
    pub fn set_default_turn_mode(&mut self, turn_mode: TurnMode) {
        let previous = self.default_turn_mode;
        for waypoint in &mut self.waypoints {
            waypoint.turn_mode.get_or_insert(previous);
        }
        self.default_turn_mode = turn_mode;
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn waypoint_mut(&mut self, index: usize) -> Result<&mut Waypoint> {
        let count = self.waypoints.len();
        self.waypoints
            .get_mut(index)
            .ok_or(DomainError::WaypointIndex { index, count })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Append a waypoint and return its index.
    ///
    /// Actions already attached to the waypoint keep their identifiers; the
    /// mission counter moves past the largest one.
    pub fn push_waypoint(&mut self, waypoint: Waypoint) -> usize {
        if let Some(max_id) = waypoint.actions.iter().map(|action| action.id).max() {
            self.next_action_id = self.next_action_id.max(max_id.saturating_add(1));
        }
        self.waypoints.push(waypoint);
        self.waypoints.len() - 1
    }

    /// Append an action to a waypoint, assigning the next mission-scope id.
    pub fn push_action(&mut self, index: usize, kind: ActionKind) -> Result<u32> {
        let id = self.next_action_id;
        let next = id.checked_add(1).ok_or(DomainError::ActionIdOverflow)?;
        self.waypoint_mut(index)?.actions.push(Action::new(id, kind));
        self.next_action_id = next;
        Ok(id)
    }

    /// All actions in execution order, paired with their waypoint index
    pub fn actions(&self) -> impl Iterator<Item = (usize, &Action)> {
        self.waypoints
            .iter()
            .enumerate()
            .flat_map(|(index, waypoint)| waypoint.actions.iter().map(move |action| (index, action)))
    }

    pub fn action_count(&self) -> usize {
        self.waypoints.iter().map(|waypoint| waypoint.actions.len()).sum()
    }

    /// Total path length through all waypoints, meters
    pub fn route_distance_m(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance_to_m(&pair[1]))
            .sum()
    }

    /// Estimated flight time: each leg at the arrival waypoint's speed plus
    /// time-consuming actions.
    pub fn estimated_duration_s(&self) -> f64 {
        let travel: f64 = self
            .waypoints
            .windows(2)
            .map(|pair| {
                let speed = pair[1].effective_speed(self);
                if speed > 0.0 {
                    pair[0].distance_to_m(&pair[1]) / speed
                } else {
                    0.0
                }
            })
            .sum();

        let actions: f64 = self
            .actions()
            .filter_map(|(_, action)| action.kind.duration_seconds())
            .sum();

        travel + actions
    }
}
