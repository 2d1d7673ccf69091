//! kmzgen - Waypoint Mission Archive Generator
//!
//! Reads a JSON mission plan, validates it against the vehicle's capability
//! envelope and writes the KMZ archive.

mod plan;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wayline_domain::CapabilityRegistry;

use crate::plan::MissionPlan;

#[derive(Parser, Debug)]
#[command(name = "kmzgen")]
#[command(about = "Build a waypoint mission KMZ archive from a JSON mission plan")]
struct Args {
    /// Mission plan file (JSON)
    #[arg(required_unless_present = "list_models")]
    plan: Option<PathBuf>,

    /// Output archive (defaults to "<mission name>.kmz")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    /// List supported vehicle models and exit
    #[arg(long)]
    list_models: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.json)?;

    if args.list_models {
        list_models();
        return Ok(());
    }

    let plan_path = args.plan.context("No mission plan given")?;
    let text = std::fs::read_to_string(&plan_path)
        .with_context(|| format!("Failed to read {}", plan_path.display()))?;
    let plan: MissionPlan = serde_json::from_str(&text)
        .with_context(|| format!("Invalid mission plan {}", plan_path.display()))?;

    let task = plan.into_task().context("Invalid mission plan")?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(task.default_archive_name()));

    info!(
        mission_id = %task.mission().mission_id,
        plan = %plan_path.display(),
        "Building mission"
    );

    if let Err(err) = task.to_kmz(&output) {
        for violation in err.violations() {
            error!(code = violation.kind.error_code(), "{violation}");
        }
        return Err(err).with_context(|| format!("Failed to write {}", output.display()));
    }

    info!(
        output = %output.display(),
        waypoints = task.mission().len(),
        actions = task.mission().action_count(),
        "Archive ready"
    );
    Ok(())
}

fn init_logging(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("wayline=info".parse()?)
        .add_directive("kmzgen=info".parse()?);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

fn list_models() {
    for model in CapabilityRegistry::builtin().models() {
        println!(
            "{:<5} speed {} m/s, altitude {} m, gimbal pitch {}, payload {}",
            model.id, model.speed, model.altitude, model.gimbal_pitch, model.default_payload
        );
    }
}
