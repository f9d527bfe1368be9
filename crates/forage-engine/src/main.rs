//! Headless harness for the Forage simulation.
//!
//! Loads configuration, seeds a gather engine over a painted demo field,
//! walks a single gatherer across it on a simulated clock, and logs what
//! happened. Two runs with the same configuration log identical outcomes.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `forage-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Paint the demo field and create the engine
//! 4. Run the gather walk
//! 5. Log the summary and store metrics, optionally write a snapshot

mod error;
mod walk;

use std::path::Path;

use forage_core::config::ForageConfig;
use forage_core::{Clock, GatherEngine, ManualClock, SystemClock};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const CONFIG_PATH: &str = "forage-config.yaml";

/// Application entry point for the harness.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the simulated clock
/// overflows, or the snapshot cannot be written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        steps = config.harness.steps,
        step_ms = config.harness.step_ms,
        "forage-engine starting"
    );

    // 3. Paint the field and create the engine on a simulated clock that
    //    starts at the current wall time.
    let clock = ManualClock::new(SystemClock.now_ms());
    let terrain = walk::demo_field(config.world.seed, config.harness.radius);
    let mut engine = GatherEngine::from_config(terrain, &clock, &config);
    walk::log_field(&engine, config.harness.radius);

    // 4. Run the walk. The walker draws from its own stream so the engine's
    //    stream is consumed only by gathers.
    let summary = walk::run(&mut engine, &config.harness, config.world.seed.wrapping_add(1))?;

    // 5. Report.
    for (outcome, count) in &summary.outcomes {
        info!(outcome = ?outcome, count, "Outcome tally");
    }
    for (resource, units) in &summary.gathered {
        info!(%resource, units, "Gathered");
    }
    let metrics = engine.metrics();
    info!(
        camp_trips = summary.camp_trips,
        locations = metrics.total_location_states,
        active = metrics.active_locations,
        memory_estimate = metrics.memory_estimate,
        "Walk complete"
    );
    match serde_json::to_string(&metrics) {
        Ok(json) => info!(metrics = %json, "Store metrics"),
        Err(e) => warn!(error = %e, "Could not encode store metrics"),
    }

    if let Some(path) = &config.harness.snapshot_path {
        write_snapshot(&engine, path)?;
    }

    Ok(())
}

/// Load configuration from `forage-config.yaml`, falling back to defaults
/// when the file does not exist.
fn load_config() -> Result<ForageConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(ForageConfig::from_file(config_path)?)
    } else {
        let mut config = ForageConfig::default();
        config.world.apply_env_overrides()?;
        Ok(config)
    }
}

/// Write the location snapshot to `path`.
fn write_snapshot<T: forage_world::Terrain, C: Clock>(
    engine: &GatherEngine<T, C>,
    path: &str,
) -> Result<(), EngineError> {
    let snapshot = engine.serialize_location_states()?;
    std::fs::write(path, snapshot).map_err(|source| EngineError::Snapshot {
        path: path.to_owned(),
        source,
    })?;
    info!(path, "Location snapshot written");
    Ok(())
}
