//! Visual document (`template.kml`).
//!
//! Ground-station display only: one placemark per waypoint with its
//! coordinates, display name and the parameters it inherits or overrides.
//! Flight execution reads the wayline document instead.

use crate::document::{close_document, open_document, write_heading_param, write_point, write_turn_param};
use crate::error::Result;
use crate::format::decimal;
use crate::xml::XmlWriter;
use wayline_domain::ApprovedMission;

const TEMPLATE_TYPE: &str = "waypoint";
const TEMPLATE_ID: &str = "0";
const COORDINATE_MODE: &str = "WGS84";

pub(crate) fn render(approved: &ApprovedMission<'_>) -> Result<String> {
    let mission = approved.mission();
    let config = &mission.config;
    let mut xml = XmlWriter::new()?;

    open_document(&mut xml, approved)?;
    xml.open("Folder")?;
    xml.wpml("templateType", TEMPLATE_TYPE)?;
    xml.wpml("templateId", TEMPLATE_ID)?;

    xml.open_wpml("waylineCoordinateSysParam")?;
    xml.wpml("coordinateMode", COORDINATE_MODE)?;
    xml.wpml("heightMode", config.height_mode.as_str())?;
    xml.wpml("positioningType", config.positioning.as_str())?;
    xml.close_wpml("waylineCoordinateSysParam")?;

    xml.wpml("autoFlightSpeed", decimal(mission.default_speed()))?;
    xml.wpml("globalHeight", decimal(mission.default_altitude()))?;
    xml.wpml("gimbalPitchMode", "manual")?;
    write_heading_param(&mut xml, "globalWaypointHeadingParam")?;
    xml.wpml("globalWaypointTurnMode", mission.default_turn_mode().as_str())?;
    xml.wpml("globalUseStraightLine", "1")?;

    for (index, waypoint) in mission.waypoints().iter().enumerate() {
        let flag = |inherits: bool| if inherits { "1" } else { "0" };

        xml.open("Placemark")?;
        xml.element("name", &format!("Waypoint {}", index + 1))?;
        write_point(&mut xml, waypoint)?;
        xml.wpml("index", index.to_string())?;
        xml.wpml("height", decimal(waypoint.effective_height(mission)))?;
        xml.wpml("useGlobalHeight", flag(waypoint.height.is_none()))?;
        xml.wpml("waypointSpeed", decimal(waypoint.effective_speed(mission)))?;
        xml.wpml("useGlobalSpeed", flag(waypoint.speed.is_none()))?;
        xml.wpml("useGlobalHeadingParam", "1")?;
        if let Some(turn_mode) = waypoint.turn_mode {
            write_turn_param(&mut xml, turn_mode)?;
        }
        xml.wpml("useGlobalTurnParam", flag(waypoint.turn_mode.is_none()))?;
        xml.wpml("useStraightLine", "1")?;
        xml.close("Placemark")?;
    }

    xml.close("Folder")?;
    close_document(&mut xml)?;
    xml.finish()
}
