//! Nodes shared by the template and wayline documents.

use crate::error::Result;
use crate::format::{coordinates, decimal};
use crate::xml::{XmlWriter, KML_NAMESPACE, WPML_NAMESPACE};
use wayline_domain::{normalize_heading, Action, ActionKind, ApprovedMission, TurnMode, Waypoint};

const HEADING_MODE: &str = "followWayline";
const HEADING_PATH_MODE: &str = "followBadArc";

/// Open `<kml><Document>` and write the author, timestamps and mission config.
pub(crate) fn open_document(xml: &mut XmlWriter, approved: &ApprovedMission<'_>) -> Result<()> {
    let mission = approved.mission();
    xml.open_with(
        "kml",
        &[("xmlns", KML_NAMESPACE), ("xmlns:wpml", WPML_NAMESPACE)],
    )?;
    xml.open("Document")?;

    let timestamp = mission.created_at.timestamp_millis().to_string();
    xml.wpml("author", &mission.pilot_name)?;
    xml.wpml("createTime", &timestamp)?;
    xml.wpml("updateTime", &timestamp)?;
    write_mission_config(xml, approved)
}

pub(crate) fn close_document(xml: &mut XmlWriter) -> Result<()> {
    xml.close("Document")?;
    xml.close("kml")
}

fn write_mission_config(xml: &mut XmlWriter, approved: &ApprovedMission<'_>) -> Result<()> {
    let mission = approved.mission();
    let config = &mission.config;
    let vehicle = approved.vehicle();

    xml.open_wpml("missionConfig")?;
    xml.wpml("flyToWaylineMode", config.fly_to_wayline_mode.as_str())?;
    xml.wpml("finishAction", config.finish_action.as_str())?;
    xml.wpml("exitOnRCLost", config.rc_lost_action.exit_mode())?;
    if let Some(action) = config.rc_lost_action.lost_action() {
        xml.wpml("executeRCLostAction", action)?;
    }
    xml.wpml("takeOffSecurityHeight", decimal(config.takeoff_security_height))?;
    xml.wpml("globalTransitionalSpeed", decimal(mission.default_speed()))?;

    xml.open_wpml("droneInfo")?;
    xml.wpml("droneEnumValue", vehicle.drone_enum_value.to_string())?;
    if let Some(sub) = vehicle.drone_sub_enum_value {
        xml.wpml("droneSubEnumValue", sub.to_string())?;
    }
    xml.close_wpml("droneInfo")?;

    xml.open_wpml("payloadInfo")?;
    xml.wpml("payloadEnumValue", approved.payload().enum_value().to_string())?;
    xml.wpml("payloadPositionIndex", config.payload_position.to_string())?;
    xml.close_wpml("payloadInfo")?;

    xml.close_wpml("missionConfig")
}

/// `<Point><coordinates>lon,lat</coordinates></Point>`
pub(crate) fn write_point(xml: &mut XmlWriter, waypoint: &Waypoint) -> Result<()> {
    xml.open("Point")?;
    xml.element(
        "coordinates",
        &coordinates(waypoint.latitude, waypoint.longitude),
    )?;
    xml.close("Point")
}

/// Heading follows the route; explicit yaw changes are `rotateYaw` actions.
pub(crate) fn write_heading_param(xml: &mut XmlWriter, element: &str) -> Result<()> {
    xml.open_wpml(element)?;
    xml.wpml("waypointHeadingMode", HEADING_MODE)?;
    xml.wpml("waypointHeadingPathMode", HEADING_PATH_MODE)?;
    xml.close_wpml(element)
}

pub(crate) fn write_turn_param(xml: &mut XmlWriter, turn_mode: TurnMode) -> Result<()> {
    xml.open_wpml("waypointTurnParam")?;
    xml.wpml("waypointTurnMode", turn_mode.as_str())?;
    if let Some(distance) = turn_mode.damping_distance_m() {
        xml.wpml("waypointTurnDampingDist", decimal(distance))?;
    }
    xml.close_wpml("waypointTurnParam")
}

/// One reach-point action group per waypoint, identified by the waypoint index.
pub(crate) fn write_action_group(
    xml: &mut XmlWriter,
    index: usize,
    actions: &[Action],
    payload_position: u8,
) -> Result<()> {
    if actions.is_empty() {
        return Ok(());
    }
    let index = index.to_string();

    xml.open_wpml("actionGroup")?;
    xml.wpml("actionGroupId", &index)?;
    xml.wpml("actionGroupStartIndex", &index)?;
    xml.wpml("actionGroupEndIndex", &index)?;
    xml.wpml("actionGroupMode", "sequence")?;
    xml.open_wpml("actionTrigger")?;
    xml.wpml("actionTriggerType", "reachPoint")?;
    xml.close_wpml("actionTrigger")?;

    for action in actions {
        xml.open_wpml("action")?;
        xml.wpml("actionId", action.id.to_string())?;
        xml.wpml("actionActuatorFunc", action.action_type().as_str())?;
        xml.open_wpml("actionActuatorFuncParam")?;
        write_action_params(xml, &action.kind, payload_position)?;
        xml.close_wpml("actionActuatorFuncParam")?;
        xml.close_wpml("action")?;
    }

    xml.close_wpml("actionGroup")
}

fn write_action_params(xml: &mut XmlWriter, kind: &ActionKind, payload_position: u8) -> Result<()> {
    let position = payload_position.to_string();
    match kind {
        ActionKind::TakePhoto { label } => {
            xml.wpml("payloadPositionIndex", &position)?;
            xml.wpml("fileSuffix", label)?;
            xml.wpml("useGlobalPayloadLensIndex", "0")
        }
        ActionKind::StartRecording => {
            xml.wpml("payloadPositionIndex", &position)?;
            xml.wpml("useGlobalPayloadLensIndex", "0")
        }
        ActionKind::StopRecording => xml.wpml("payloadPositionIndex", &position),
        ActionKind::Hover { duration_seconds } => {
            xml.wpml("hoverTime", decimal(*duration_seconds))
        }
        ActionKind::Heading { angle_degrees } => {
            xml.wpml("aircraftHeading", decimal(normalize_heading(*angle_degrees)))?;
            xml.wpml("aircraftPathMode", "clockwise")
        }
        ActionKind::GimbalRotate {
            pitch_degrees,
            yaw_degrees,
        } => {
            xml.wpml("payloadPositionIndex", &position)?;
            xml.wpml("gimbalHeadingYawBase", "north")?;
            xml.wpml("gimbalRotateMode", "absoluteAngle")?;
            write_gimbal_axis(xml, "Pitch", *pitch_degrees)?;
            write_gimbal_axis(xml, "Roll", None)?;
            write_gimbal_axis(xml, "Yaw", *yaw_degrees)?;
            xml.wpml("gimbalRotateTimeEnable", "0")?;
            xml.wpml("gimbalRotateTime", "0")
        }
    }
}

/// An unset axis is written disabled at zero so the firmware leaves it alone.
fn write_gimbal_axis(xml: &mut XmlWriter, axis: &str, angle: Option<f64>) -> Result<()> {
    let enabled = if angle.is_some() { "1" } else { "0" };
    xml.wpml(&format!("gimbal{axis}RotateEnable"), enabled)?;
    xml.wpml(
        &format!("gimbal{axis}RotateAngle"),
        decimal(angle.unwrap_or_default()),
    )
}
