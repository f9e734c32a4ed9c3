//! Rig and configuration file loading

use anyhow::{Context, Result};
use log::{debug, info};
use skel_anim::{ControllerConfig, MemoryRig};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a JSON rig description
pub fn load_rig(path: &Path) -> Result<MemoryRig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open rig file {}", path.display()))?;
    let rig: MemoryRig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse rig file {}", path.display()))?;
    rig.validate()
        .with_context(|| format!("Invalid rig file {}", path.display()))?;

    info!(
        "Loaded rig {} ({} bones, {} clips)",
        path.display(),
        rig.bones.len(),
        rig.clips.len()
    );
    Ok(rig)
}

/// Load a JSON controller configuration, or the defaults when no path is given
///
/// Fields missing from the file keep their default values.
pub fn load_config(path: Option<&Path>) -> Result<ControllerConfig> {
    let Some(path) = path else {
        return Ok(ControllerConfig::default());
    };

    let file = File::open(path)
        .with_context(|| format!("Failed to open config file {}", path.display()))?;
    let config: ControllerConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    debug!("Loaded config {}: {:?}", path.display(), config);
    Ok(config)
}
