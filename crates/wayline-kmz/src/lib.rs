//! # Wayline KMZ
//!
//! Renders an approved mission into its two linked documents and packages
//! them into the KMZ container flight controllers load:
//!
//! - `wpmz/template.kml` - visual document for ground-station display
//! - `wpmz/waylines.wpml` - flight-path document executed by the aircraft
//!
//! Rendering only accepts an [`ApprovedMission`], so nothing unvalidated is
//! ever written.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod archive;
mod document;
pub mod error;
pub mod format;
mod template;
mod waylines;
mod xml;

pub use error::{KmzError, Result};

use chrono::{DateTime, Utc};
use std::path::Path;
use uuid::Uuid;
use wayline_domain::ApprovedMission;

/// The rendered document pair for one mission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionDocuments {
    pub mission_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// `template.kml` contents
    pub template: String,
    /// `waylines.wpml` contents
    pub waylines: String,
}

impl MissionDocuments {
    /// Render both documents. Output is a pure function of the mission.
    pub fn render(approved: &ApprovedMission<'_>) -> Result<Self> {
        let mission = approved.mission();
        let documents = Self {
            mission_id: mission.mission_id,
            created_at: mission.created_at,
            template: template::render(approved)?,
            waylines: waylines::render(approved)?,
        };

        tracing::info!(
            mission_id = %mission.mission_id,
            waypoints = mission.len(),
            template_bytes = documents.template.len(),
            waylines_bytes = documents.waylines.len(),
            "Mission documents rendered"
        );
        Ok(documents)
    }

    /// KMZ archive bytes
    pub fn to_kmz_bytes(&self) -> Result<Vec<u8>> {
        archive::to_bytes(self)
    }

    /// Write the KMZ archive to `path`; no file is left behind on failure.
    pub fn write_kmz(&self, path: impl AsRef<Path>) -> Result<()> {
        archive::write_to_path(self, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayline_domain::{validate, ActionKind, CapabilityRegistry, Mission, Waypoint};

    fn approved_mission() -> Mission {
        let registry = CapabilityRegistry::builtin();
        let mut mission = Mission::new("M30T", "Pilot <A>");
        mission.apply_vehicle_defaults(registry.lookup("M30T").unwrap());
        mission.mission_name = "Bridge survey".to_string();

        let first = mission.push_waypoint(Waypoint::new(37.7749, -122.4194));
        mission
            .push_action(first, ActionKind::TakePhoto { label: "p0".into() })
            .unwrap();
        mission
            .push_action(
                first,
                ActionKind::GimbalRotate {
                    pitch_degrees: Some(-45.0),
                    yaw_degrees: None,
                },
            )
            .unwrap();
        let second = mission.push_waypoint(Waypoint::new(37.775, -122.4195).with_height(60.0));
        mission
            .push_action(second, ActionKind::Heading { angle_degrees: 180.0 })
            .unwrap();
        mission
    }

    fn render() -> MissionDocuments {
        let mission = approved_mission();
        let approved = validate(&mission, CapabilityRegistry::builtin()).unwrap();
        MissionDocuments::render(&approved).unwrap()
    }

    #[test]
    fn test_template_document() {
        let docs = render();
        let template = &docs.template;

        assert!(template.contains(r#"xmlns:wpml="http://www.dji.com/wpmz/1.0.3""#));
        assert!(template.contains("<wpml:author>Pilot &lt;A&gt;</wpml:author>"));
        assert!(template.contains("<wpml:droneEnumValue>67</wpml:droneEnumValue>"));
        assert!(template.contains("<wpml:droneSubEnumValue>1</wpml:droneSubEnumValue>"));
        assert!(template.contains("<wpml:payloadEnumValue>53</wpml:payloadEnumValue>"));
        assert!(template.contains("<wpml:exitOnRCLost>goContinue</wpml:exitOnRCLost>"));
        assert!(!template.contains("executeRCLostAction"));
        assert!(template.contains("<wpml:autoFlightSpeed>8</wpml:autoFlightSpeed>"));
        assert!(template.contains("<name>Waypoint 2</name>"));
        assert!(template.contains("<wpml:useGlobalHeight>0</wpml:useGlobalHeight>"));
        assert!(!template.contains("actionGroup"));
    }

    #[test]
    fn test_waylines_document() {
        let docs = render();
        let waylines = &docs.waylines;

        assert!(waylines.contains("<name>Bridge survey</name>"));
        assert!(waylines.contains("<coordinates>-122.41940000,37.77490000</coordinates>"));
        assert!(waylines.contains("<wpml:executeHeight>80</wpml:executeHeight>"));
        assert!(waylines.contains("<wpml:executeHeight>60</wpml:executeHeight>"));
        assert!(waylines.contains("<wpml:actionActuatorFunc>takePhoto</wpml:actionActuatorFunc>"));
        assert!(waylines.contains("<wpml:fileSuffix>p0</wpml:fileSuffix>"));
        assert!(waylines.contains("<wpml:gimbalPitchRotateEnable>1</wpml:gimbalPitchRotateEnable>"));
        assert!(waylines.contains("<wpml:gimbalPitchRotateAngle>-45</wpml:gimbalPitchRotateAngle>"));
        assert!(waylines.contains("<wpml:gimbalYawRotateEnable>0</wpml:gimbalYawRotateEnable>"));
        assert!(waylines.contains("<wpml:aircraftHeading>-180</wpml:aircraftHeading>"));
        assert!(waylines.contains("<wpml:actionTriggerType>reachPoint</wpml:actionTriggerType>"));

        let ids: Vec<_> = waylines
            .match_indices("<wpml:actionId>")
            .map(|(at, tag)| {
                let rest = &waylines[at + tag.len()..];
                rest[..rest.find('<').unwrap()].to_string()
            })
            .collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_waylines_globals_precede_placemarks() {
        let docs = render();
        let (globals, _) = docs.waylines.split_once("<Placemark>").unwrap();

        assert!(globals.contains("<wpml:autoFlightSpeed>8</wpml:autoFlightSpeed>"));
        assert!(globals.contains("<wpml:globalWaypointHeadingParam>"));
        assert!(globals.contains("<wpml:waypointHeadingMode>followWayline</wpml:waypointHeadingMode>"));
        assert!(globals.contains("<wpml:executeHeightMode>"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let mission = approved_mission();
        let approved = validate(&mission, CapabilityRegistry::builtin()).unwrap();
        let first = MissionDocuments::render(&approved).unwrap();
        let second = MissionDocuments::render(&approved).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_kmz_bytes().unwrap(), second.to_kmz_bytes().unwrap());
    }

    #[test]
    fn test_early_turn_damping() {
        let registry = CapabilityRegistry::builtin();
        let mut mission = Mission::new("M350", "Pilot A");
        mission.set_default_turn_mode(wayline_domain::TurnMode::EarlyTurn);
        mission.push_waypoint(Waypoint::new(0.0, 0.0));
        let approved = validate(&mission, registry).unwrap();
        let docs = MissionDocuments::render(&approved).unwrap();

        assert!(docs.waylines.contains("<wpml:waypointTurnMode>coordinateTurn</wpml:waypointTurnMode>"));
        assert!(docs.waylines.contains("<wpml:waypointTurnDampingDist>0.2</wpml:waypointTurnDampingDist>"));
    }
}
