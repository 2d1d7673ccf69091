//! Fluent mission builder.
//!
//! [`DroneTask`] owns one in-progress [`Mission`] and a cursor to the
//! waypoint most recently created by [`DroneTask::fly_to`]. Waypoint-scope
//! settings and actions always target that waypoint.
//!
//! ```no_run
//! use wayline_planner::DroneTask;
//!
//! # fn main() -> wayline_planner::Result<()> {
//! let mut task = DroneTask::new("M350", "Pilot A");
//! task.name("Roof inspection")
//!     .speed(8.0)
//!     .altitude(75.0)
//!     .fly_to(37.7749, -122.4194)
//!     .take_photo("p0")?
//!     .fly_to(37.7750, -122.4195)
//!     .gimbal_down(45.0)?
//!     .take_photo("p1")?;
//! task.to_kmz("roof.kmz")?;
//! # Ok(())
//! # }
//! ```

use crate::error::{PlannerError, Result};
use std::path::Path;
use wayline_domain::{
    normalize_heading, validate, ActionKind, ApprovedMission, CapabilityRegistry, FinishAction,
    HeightMode, Mission, PayloadModel, PositioningType, RcLostAction, TurnMode, Waypoint,
};
use wayline_kmz::MissionDocuments;

/// Waypoint-scope `turn_mode` value that clears the override
const INHERIT_TURN_MODE: &str = "default";

/// Stateful mission accumulator
#[derive(Debug, Clone)]
pub struct DroneTask<'r> {
    registry: &'r CapabilityRegistry,
    mission: Mission,
    current: Option<usize>,
}

impl DroneTask<'static> {
    /// Start a mission for a built-in vehicle model.
    ///
    /// An unknown model is not rejected here; `build()` reports it.
    pub fn new(vehicle_model: &str, pilot_name: &str) -> Self {
        DroneTask::with_registry(CapabilityRegistry::builtin(), vehicle_model, pilot_name)
    }
}

impl<'r> DroneTask<'r> {
    /// Start a mission resolved against a custom registry.
    pub fn with_registry(
        registry: &'r CapabilityRegistry,
        vehicle_model: &str,
        pilot_name: &str,
    ) -> Self {
        let mut mission = Mission::new(vehicle_model, pilot_name);
        if let Ok(vehicle) = registry.lookup(vehicle_model) {
            mission.apply_vehicle_defaults(vehicle);
        }

        tracing::debug!(
            mission_id = %mission.mission_id,
            vehicle = vehicle_model,
            "Mission started"
        );

        Self {
            registry,
            mission,
            current: None,
        }
    }

    pub const fn mission(&self) -> &Mission {
        &self.mission
    }

    /// Waypoint targeted by waypoint-scope calls
    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.current
            .and_then(|index| self.mission.waypoints().get(index))
    }

    /// File name used when no output path is given: `<mission name>.kmz`
    pub fn default_archive_name(&self) -> String {
        format!("{}.kmz", self.mission.mission_name)
    }

    // =========================================================================
    // MISSION-LEVEL SETTERS
    // =========================================================================

    pub fn name(&mut self, mission_name: &str) -> &mut Self {
        self.mission.mission_name = mission_name.to_string();
        self
    }

    /// Select the payload by canonical name, e.g. `"H20T"`.
    pub fn payload(&mut self, payload_model: &str) -> Result<&mut Self> {
        self.mission.payload_model = Some(PayloadModel::parse(payload_model)?);
        Ok(self)
    }

    /// Default speed, m/s, for waypoints created from now on
    pub fn speed(&mut self, speed: f64) -> &mut Self {
        self.mission.set_default_speed(speed);
        self
    }

    /// Default altitude, meters, for waypoints created from now on
    pub fn altitude(&mut self, altitude: f64) -> &mut Self {
        self.mission.set_default_altitude(altitude);
        self
    }

    /// Default turn mode for waypoints created from now on
    pub fn default_turn_mode(&mut self, turn_mode: &str) -> Result<&mut Self> {
        self.mission.set_default_turn_mode(TurnMode::parse(turn_mode)?);
        Ok(self)
    }

    /// `return_home`, `hover`, `land` or `restart`
    pub fn finish_action(&mut self, action: &str) -> Result<&mut Self> {
        self.mission.config.finish_action = FinishAction::parse(action)?;
        Ok(self)
    }

    /// Abort and fly home when the remote-control link is lost, instead of
    /// continuing the route.
    pub fn return_home_on_signal_loss(&mut self, enabled: bool) -> &mut Self {
        self.mission.config.rc_lost_action = if enabled {
            RcLostAction::GoHome
        } else {
            RcLostAction::Continue
        };
        self
    }

    /// `GPS`, `RTK` or `Qianxun`
    pub fn positioning(&mut self, positioning: &str) -> Result<&mut Self> {
        self.mission.config.positioning = PositioningType::parse(positioning)?;
        Ok(self)
    }

    /// `relative`, `egm96` or `agl`
    pub fn height_mode(&mut self, height_mode: &str) -> Result<&mut Self> {
        self.mission.config.height_mode = HeightMode::parse(height_mode)?;
        Ok(self)
    }

    pub fn takeoff_security_height(&mut self, height: f64) -> &mut Self {
        self.mission.config.takeoff_security_height = height;
        self
    }

    /// Gimbal mount used by camera and gimbal actions
    pub fn payload_position(&mut self, index: u8) -> &mut Self {
        self.mission.config.payload_position = index;
        self
    }

    // =========================================================================
    // FLIGHT
    // =========================================================================

    /// Append a waypoint and make it current.
    pub fn fly_to(&mut self, latitude: f64, longitude: f64) -> &mut Self {
        self.append(Waypoint::new(latitude, longitude))
    }

    /// Append a waypoint with an explicit height and make it current.
    pub fn fly_to_at(&mut self, latitude: f64, longitude: f64, height: f64) -> &mut Self {
        self.append(Waypoint::new(latitude, longitude).with_height(height))
    }

    fn append(&mut self, waypoint: Waypoint) -> &mut Self {
        let index = self.mission.push_waypoint(waypoint);
        self.current = Some(index);
        tracing::debug!(mission_id = %self.mission.mission_id, index, "Waypoint added");
        self
    }

    /// Height override for the current waypoint, meters
    pub fn height(&mut self, height: f64) -> Result<&mut Self> {
        self.current_mut("height")?.height = Some(height);
        Ok(self)
    }

    /// Speed override for the current waypoint, m/s
    pub fn waypoint_speed(&mut self, speed: f64) -> Result<&mut Self> {
        self.current_mut("waypoint_speed")?.speed = Some(speed);
        Ok(self)
    }

    /// Turn mode for the current waypoint; `"default"` inherits the mission's.
    pub fn turn_mode(&mut self, turn_mode: &str) -> Result<&mut Self> {
        let turn_mode = if turn_mode == INHERIT_TURN_MODE {
            None
        } else {
            Some(TurnMode::parse(turn_mode)?)
        };
        self.current_mut("turn_mode")?.turn_mode = turn_mode;
        Ok(self)
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    pub fn take_photo(&mut self, label: &str) -> Result<&mut Self> {
        self.push("take_photo", ActionKind::TakePhoto {
            label: label.to_string(),
        })
    }

    pub fn start_recording(&mut self) -> Result<&mut Self> {
        self.push("start_recording", ActionKind::StartRecording)
    }

    pub fn stop_recording(&mut self) -> Result<&mut Self> {
        self.push("stop_recording", ActionKind::StopRecording)
    }

    pub fn hover(&mut self, duration_seconds: f64) -> Result<&mut Self> {
        self.push("hover", ActionKind::Hover { duration_seconds })
    }

    /// Rotate the aircraft to an absolute heading, normalized to `[-180, 180)`.
    pub fn heading(&mut self, angle_degrees: f64) -> Result<&mut Self> {
        self.push("heading", ActionKind::Heading {
            angle_degrees: normalize_heading(angle_degrees),
        })
    }

    /// Absolute gimbal pitch; yaw is left untouched.
    pub fn gimbal_pitch(&mut self, pitch_degrees: f64) -> Result<&mut Self> {
        self.gimbal("gimbal_pitch", Some(pitch_degrees), None)
    }

    /// Absolute gimbal yaw; pitch is left untouched.
    pub fn gimbal_yaw(&mut self, yaw_degrees: f64) -> Result<&mut Self> {
        self.gimbal("gimbal_yaw", None, Some(yaw_degrees))
    }

    pub fn gimbal_rotate(&mut self, pitch_degrees: f64, yaw_degrees: f64) -> Result<&mut Self> {
        self.gimbal("gimbal_rotate", Some(pitch_degrees), Some(yaw_degrees))
    }

    /// Point the camera `degrees` below the horizon.
    pub fn gimbal_down(&mut self, degrees: f64) -> Result<&mut Self> {
        self.gimbal("gimbal_down", Some(-degrees.abs()), None)
    }

    /// Point the camera `degrees` above the horizon.
    pub fn gimbal_up(&mut self, degrees: f64) -> Result<&mut Self> {
        self.gimbal("gimbal_up", Some(degrees.abs()), None)
    }

    /// Level the camera.
    pub fn gimbal_front(&mut self) -> Result<&mut Self> {
        self.gimbal("gimbal_front", Some(0.0), None)
    }

    fn gimbal(
        &mut self,
        operation: &'static str,
        pitch_degrees: Option<f64>,
        yaw_degrees: Option<f64>,
    ) -> Result<&mut Self> {
        self.push(operation, ActionKind::GimbalRotate {
            pitch_degrees,
            yaw_degrees,
        })
    }

    fn push(&mut self, operation: &'static str, kind: ActionKind) -> Result<&mut Self> {
        let index = self.cursor(operation)?;
        let id = self.mission.push_action(index, kind)?;
        tracing::debug!(
            mission_id = %self.mission.mission_id,
            waypoint = index,
            action_id = id,
            operation,
            "Action added"
        );
        Ok(self)
    }

    fn cursor(&self, operation: &'static str) -> Result<usize> {
        self.current
            .ok_or(PlannerError::NoCurrentWaypoint { operation })
    }

    fn current_mut(&mut self, operation: &'static str) -> Result<&mut Waypoint> {
        let index = self.cursor(operation)?;
        Ok(self.mission.waypoint_mut(index)?)
    }

    // =========================================================================
    // FINALIZE
    // =========================================================================

    /// Validate the mission.
    ///
    /// # Errors
    ///
    /// [`PlannerError::Validation`] with every violation found.
    pub fn build(&self) -> Result<ApprovedMission<'r>> {
        let approved = validate(&self.mission, self.registry)?;
        tracing::info!(
            mission_id = %self.mission.mission_id,
            vehicle = approved.vehicle().id,
            waypoints = self.mission.len(),
            actions = self.mission.action_count(),
            distance_m = self.mission.route_distance_m(),
            "Mission built"
        );
        Ok(approved)
    }

    /// Render both documents of the validated mission.
    pub fn documents(&self) -> Result<MissionDocuments> {
        let approved = self.build()?;
        Ok(MissionDocuments::render(&approved)?)
    }

    /// Validate, render and write the KMZ archive to `path`.
    ///
    /// Nothing is written when validation fails.
    pub fn to_kmz(&self, path: impl AsRef<Path>) -> Result<()> {
        self.documents()?.write_kmz(path)?;
        Ok(())
    }

    /// Validate and render the KMZ archive in memory.
    pub fn to_kmz_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.documents()?.to_kmz_bytes()?)
    }
}
