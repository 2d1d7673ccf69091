//! Flight-path document (`waylines.wpml`).
//!
//! Mission globals are written once on the wayline folder. Every placemark
//! value is the effective one; nothing is left for the firmware to inherit.

use crate::document::{
    close_document, open_document, write_action_group, write_heading_param, write_point,
    write_turn_param,
};
use crate::error::Result;
use crate::format::decimal;
use crate::xml::XmlWriter;
use wayline_domain::ApprovedMission;

const WAYLINE_ID: &str = "0";

pub(crate) fn render(approved: &ApprovedMission<'_>) -> Result<String> {
    let mission = approved.mission();
    let mut xml = XmlWriter::new()?;

    open_document(&mut xml, approved)?;
    xml.element("name", &mission.mission_name)?;

    xml.open("Folder")?;
    xml.wpml("templateId", "0")?;
    xml.wpml("executeHeightMode", mission.config.height_mode.as_str())?;
    xml.wpml("waylineId", WAYLINE_ID)?;
    xml.wpml("distance", decimal(mission.route_distance_m()))?;
    xml.wpml("duration", decimal(mission.estimated_duration_s()))?;
    xml.wpml("autoFlightSpeed", decimal(mission.default_speed()))?;
    write_heading_param(&mut xml, "globalWaypointHeadingParam")?;

    for (index, waypoint) in mission.waypoints().iter().enumerate() {
        xml.open("Placemark")?;
        write_point(&mut xml, waypoint)?;
        xml.wpml("index", index.to_string())?;
        xml.wpml("executeHeight", decimal(waypoint.effective_height(mission)))?;
        xml.wpml("waypointSpeed", decimal(waypoint.effective_speed(mission)))?;
        write_heading_param(&mut xml, "waypointHeadingParam")?;
        write_turn_param(&mut xml, waypoint.effective_turn_mode(mission))?;
        xml.wpml("useStraightLine", "1")?;
        write_action_group(
            &mut xml,
            index,
            &waypoint.actions,
            mission.config.payload_position,
        )?;
        xml.close("Placemark")?;
    }

    xml.close("Folder")?;
    close_document(&mut xml)?;
    xml.finish()
}
