//! JSON mission plan files.
//!
//! A plan names the vehicle, the mission-level settings and an ordered list
//! of waypoint steps. Applying it drives the same [`DroneTask`] calls a
//! program would make, so a plan is validated exactly like hand-written code.

use serde::Deserialize;
use wayline_planner::{DroneTask, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MissionPlan {
    pub vehicle: String,
    pub pilot: String,
    pub name: Option<String>,
    pub payload: Option<String>,

    /// Default speed, m/s
    pub speed: Option<f64>,
    /// Default altitude, meters
    pub altitude: Option<f64>,
    pub turn_mode: Option<String>,
    pub finish_action: Option<String>,
    #[serde(default)]
    pub return_home_on_signal_loss: bool,
    pub positioning: Option<String>,
    pub height_mode: Option<String>,
    pub takeoff_security_height: Option<f64>,
    pub payload_position: Option<u8>,

    #[serde(default)]
    pub waypoints: Vec<WaypointStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaypointStep {
    pub lat: f64,
    pub lon: f64,
    pub height: Option<f64>,
    pub speed: Option<f64>,
    pub turn_mode: Option<String>,
    #[serde(default)]
    pub actions: Vec<PlanAction>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanAction {
    TakePhoto { label: String },
    StartRecording,
    StopRecording,
    Hover { seconds: f64 },
    Heading { degrees: f64 },
    GimbalPitch { degrees: f64 },
    GimbalYaw { degrees: f64 },
    GimbalRotate { pitch: f64, yaw: f64 },
    GimbalDown { degrees: f64 },
    GimbalUp { degrees: f64 },
    GimbalFront,
}

impl MissionPlan {
    /// Replay the plan into a builder.
    ///
    /// # Errors
    ///
    /// Fails on the first unrecognised option name. Range problems are left
    /// to `build()` so they are all reported together.
    pub fn into_task(self) -> Result<DroneTask<'static>> {
        let mut task = DroneTask::new(&self.vehicle, &self.pilot);

        if let Some(name) = &self.name {
            task.name(name);
        }
        if let Some(payload) = &self.payload {
            task.payload(payload)?;
        }
        if let Some(speed) = self.speed {
            task.speed(speed);
        }
        if let Some(altitude) = self.altitude {
            task.altitude(altitude);
        }
        if let Some(turn_mode) = &self.turn_mode {
            task.default_turn_mode(turn_mode)?;
        }
        if let Some(finish_action) = &self.finish_action {
            task.finish_action(finish_action)?;
        }
        if let Some(positioning) = &self.positioning {
            task.positioning(positioning)?;
        }
        if let Some(height_mode) = &self.height_mode {
            task.height_mode(height_mode)?;
        }
        if let Some(height) = self.takeoff_security_height {
            task.takeoff_security_height(height);
        }
        if let Some(index) = self.payload_position {
            task.payload_position(index);
        }
        task.return_home_on_signal_loss(self.return_home_on_signal_loss);

        for step in &self.waypoints {
            step.apply(&mut task)?;
        }
        Ok(task)
    }
}

impl WaypointStep {
    fn apply(&self, task: &mut DroneTask<'static>) -> Result<()> {
        match self.height {
            Some(height) => task.fly_to_at(self.lat, self.lon, height),
            None => task.fly_to(self.lat, self.lon),
        };
        if let Some(speed) = self.speed {
            task.waypoint_speed(speed)?;
        }
        if let Some(turn_mode) = &self.turn_mode {
            task.turn_mode(turn_mode)?;
        }
        for action in &self.actions {
            action.apply(task)?;
        }
        Ok(())
    }
}

impl PlanAction {
    fn apply(&self, task: &mut DroneTask<'static>) -> Result<()> {
        match self {
            Self::TakePhoto { label } => task.take_photo(label)?,
            Self::StartRecording => task.start_recording()?,
            Self::StopRecording => task.stop_recording()?,
            Self::Hover { seconds } => task.hover(*seconds)?,
            Self::Heading { degrees } => task.heading(*degrees)?,
            Self::GimbalPitch { degrees } => task.gimbal_pitch(*degrees)?,
            Self::GimbalYaw { degrees } => task.gimbal_yaw(*degrees)?,
            Self::GimbalRotate { pitch, yaw } => task.gimbal_rotate(*pitch, *yaw)?,
            Self::GimbalDown { degrees } => task.gimbal_down(*degrees)?,
            Self::GimbalUp { degrees } => task.gimbal_up(*degrees)?,
            Self::GimbalFront => task.gimbal_front()?,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayline_domain::{ActionKind, FinishAction, TurnMode};

    const SURVEY: &str = r#"{
        "vehicle": "M350",
        "pilot": "Pilot A",
        "name": "Roof inspection",
        "payload": "H20T",
        "speed": 8.0,
        "altitude": 75.0,
        "turn_mode": "early_turn",
        "finish_action": "land",
        "waypoints": [
            {
                "lat": 37.7749,
                "lon": -122.4194,
                "actions": [
                    {"type": "gimbal_down", "degrees": 45},
                    {"type": "take_photo", "label": "p0"}
                ]
            },
            {
                "lat": 37.7750,
                "lon": -122.4195,
                "height": 60,
                "turn_mode": "default",
                "actions": [{"type": "hover", "seconds": 2}]
            }
        ]
    }"#;

    #[test]
    fn test_plan_replays_into_task() {
        let plan: MissionPlan = serde_json::from_str(SURVEY).unwrap();
        let task = plan.into_task().unwrap();
        let mission = task.mission();

        assert_eq!(mission.mission_name, "Roof inspection");
        assert_eq!(mission.default_turn_mode(), TurnMode::EarlyTurn);
        assert_eq!(mission.config.finish_action, FinishAction::AutoLand);
        assert_eq!(mission.len(), 2);
        assert_eq!(mission.waypoints()[1].height, Some(60.0));
        assert_eq!(
            mission.waypoints()[0].actions[0].kind,
            ActionKind::GimbalRotate {
                pitch_degrees: Some(-45.0),
                yaw_degrees: None,
            }
        );
        assert_eq!(mission.action_count(), 3);
        assert!(task.build().is_ok());
        assert_eq!(task.default_archive_name(), "Roof inspection.kmz");
    }

    #[test]
    fn test_unknown_option_rejected() {
        let plan: MissionPlan = serde_json::from_str(
            r#"{"vehicle": "M350", "pilot": "A", "finish_action": "crash"}"#,
        )
        .unwrap();
        let err = plan.into_task().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_OPTION");
    }

    #[test]
    fn test_unknown_action_type_fails_to_parse() {
        let result: std::result::Result<MissionPlan, _> = serde_json::from_str(
            r#"{"vehicle": "M350", "pilot": "A", "waypoints": [
                {"lat": 0, "lon": 0, "actions": [{"type": "barrel_roll"}]}
            ]}"#,
        );
        assert!(result.is_err());
    }
}
