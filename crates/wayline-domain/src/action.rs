//! Waypoint actions.
//!
//! An action is one discrete instruction executed when the aircraft reaches
//! a waypoint. Each instance carries a mission-scope identifier that the
//! firmware uses to correlate trigger events, so the identifier is assigned
//! once on append and never rewritten.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action kind tag, used for capability lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    TakePhoto,
    StartRecording,
    StopRecording,
    Hover,
    Heading,
    GimbalRotate,
}

impl ActionType {
    pub const ALL: [Self; 6] = [
        Self::TakePhoto,
        Self::StartRecording,
        Self::StopRecording,
        Self::Hover,
        Self::Heading,
        Self::GimbalRotate,
    ];

    /// Actuator function name understood by the flight controller
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TakePhoto => "takePhoto",
            Self::StartRecording => "startRecord",
            Self::StopRecording => "stopRecord",
            Self::Hover => "hover",
            Self::Heading => "rotateYaw",
            Self::GimbalRotate => "gimbalRotate",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action payload, one variant per supported kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Capture a still; `label` becomes the file suffix.
    TakePhoto { label: String },
    StartRecording,
    StopRecording,
    /// Hold position for the given time.
    Hover { duration_seconds: f64 },
    /// Rotate the aircraft to an absolute heading (0 = north, 90 = east).
    Heading { angle_degrees: f64 },
    /// Absolute gimbal positioning. An unset axis is left untouched.
    GimbalRotate {
        pitch_degrees: Option<f64>,
        yaw_degrees: Option<f64>,
    },
}

impl ActionKind {
    pub const fn action_type(&self) -> ActionType {
        match self {
            Self::TakePhoto { .. } => ActionType::TakePhoto,
            Self::StartRecording => ActionType::StartRecording,
            Self::StopRecording => ActionType::StopRecording,
            Self::Hover { .. } => ActionType::Hover,
            Self::Heading { .. } => ActionType::Heading,
            Self::GimbalRotate { .. } => ActionType::GimbalRotate,
        }
    }

    /// Every action kind can be executed by the flight controller.
    pub const fn is_executable(&self) -> bool {
        true
    }

    pub const fn requires_parameters(&self) -> bool {
        !matches!(self, Self::StartRecording | Self::StopRecording)
    }

    /// Time the aircraft spends executing this action, if it consumes any.
    pub const fn duration_seconds(&self) -> Option<f64> {
        match self {
            Self::Hover { duration_seconds } => Some(*duration_seconds),
            _ => None,
        }
    }
}

/// An action bound to its mission-scope identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: u32,
    pub kind: ActionKind,
}

impl Action {
    pub const fn new(id: u32, kind: ActionKind) -> Self {
        Self { id, kind }
    }

    pub const fn action_type(&self) -> ActionType {
        self.kind.action_type()
    }
}

/// Normalize a heading into the canonical `[-180, 180)` range.
///
/// `180` maps to `-180`. Non-finite input is returned unchanged and rejected
/// by validation.
#[must_use]
pub fn normalize_heading(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return degrees;
    }
    let normalized = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 180.0 {
        normalized - 360.0
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actuator_names() {
        assert_eq!(ActionType::TakePhoto.as_str(), "takePhoto");
        assert_eq!(ActionType::StartRecording.as_str(), "startRecord");
        assert_eq!(ActionType::Heading.as_str(), "rotateYaw");
    }

    #[test]
    fn test_capabilities() {
        let hover = ActionKind::Hover {
            duration_seconds: 3.0,
        };
        assert!(hover.is_executable());
        assert!(hover.requires_parameters());
        assert_eq!(hover.duration_seconds(), Some(3.0));

        assert!(!ActionKind::StartRecording.requires_parameters());
        assert_eq!(ActionKind::StopRecording.duration_seconds(), None);
    }

    #[test]
    fn test_normalize_heading_boundaries() {
        assert_eq!(normalize_heading(180.0), -180.0);
        assert_eq!(normalize_heading(-180.0), -180.0);
        assert_eq!(normalize_heading(179.5), 179.5);
        assert_eq!(normalize_heading(270.0), -90.0);
        assert_eq!(normalize_heading(-270.0), 90.0);
        assert_eq!(normalize_heading(720.0), 0.0);
        assert!(normalize_heading(f64::NAN).is_nan());
    }

    #[test]
    fn test_normalize_heading_range() {
        use fake::Fake;

        for _ in 0..1000 {
            let degrees: f64 = (-100_000.0..100_000.0).fake();
            let normalized = normalize_heading(degrees);
            assert!((-180.0..180.0).contains(&normalized), "{degrees} -> {normalized}");

            let turns = (degrees - normalized) / 360.0;
            assert!((turns - turns.round()).abs() < 1e-6, "{degrees} -> {normalized}");
        }
    }

    #[test]
    fn test_serde_tagging() {
        let kind = ActionKind::TakePhoto {
            label: "p0".to_string(),
        };
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#"{"type":"take_photo","label":"p0"}"#);

        let back: ActionKind = serde_json::from_str(r#"{"type":"start_recording"}"#).unwrap();
        assert_eq!(back, ActionKind::StartRecording);
    }
}
