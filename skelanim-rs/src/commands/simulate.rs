//! `simulate` command: run the controller headless over a rig

use anyhow::{Context, Result};
use clap::Args;
use log::info;
use serde::Serialize;
use skel_anim::{
    AnimationController, MATRIX_FLOATS, MemoryRig, RecordingRenderer, ScriptedInput, Simulation,
    SimulationHost,
};
use std::path::PathBuf;

use crate::utils::{format_row, load_config, load_rig};

#[derive(Args)]
pub struct SimulateArgs {
    /// Path to the JSON rig file
    pub rig: PathBuf,

    /// Number of updates to run
    #[arg(short, long, default_value_t = 60)]
    pub frames: usize,

    /// Seconds per update
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Clip to start on instead of the configured walk clip
    #[arg(short, long)]
    pub clip: Option<String>,

    /// Key press as FRAME:KEY, zero-based (can be repeated)
    #[arg(short, long = "press", value_parser = parse_press)]
    pub presses: Vec<(usize, char)>,

    /// JSON controller configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    frames: usize,
    delta_time: f32,
    active_clip: String,
    loaded_clips: Vec<String>,
    key_count: usize,
    elapsed_time: f32,
    speed: f32,
    speed_factor: f32,
    debug_draw: bool,
    pose_submissions: usize,
    debug_lines: usize,
    bones: Vec<BoneReport>,
}

#[derive(Debug, Serialize)]
struct BoneReport {
    name: String,
    /// Row-major 4x4
    skinning: Vec<f32>,
}

/// Parse a `FRAME:KEY` press
pub fn parse_press(value: &str) -> Result<(usize, char), String> {
    let (frame, key) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:KEY, got '{value}'"))?;
    let frame = frame
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid frame '{frame}': {e}"))?;

    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(key), None) => Ok((frame, key)),
        _ => Err(format!("key must be a single character, got '{key}'")),
    }
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let rig = load_rig(&args.rig)?;
    let config = load_config(args.config.as_deref())?;

    let controller = match &args.clip {
        Some(clip) => AnimationController::with_initial_clip(config, clip.as_str()),
        None => AnimationController::new(config),
    };
    let input = ScriptedInput::from_presses(&args.presses);

    let mut host: RigHost = SimulationHost::new(
        controller,
        rig.clone(),
        rig,
        input,
        RecordingRenderer::new(),
    );
    host.init()
        .with_context(|| format!("Failed to initialize controller for {}", args.rig.display()))?;
    host.run_frames(args.frames, args.dt)
        .with_context(|| format!("Simulation failed after {} frames", host.frames()))?;
    info!("Simulated {} frames of {}s", host.frames(), args.dt);

    let report = build_report(&host, args.dt);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

type RigHost = SimulationHost<MemoryRig, MemoryRig, ScriptedInput, RecordingRenderer>;

fn build_report(host: &RigHost, delta_time: f32) -> SimulationReport {
    let controller = host.controller();
    let bones = controller
        .hierarchy()
        .iter()
        .zip(controller.skinning_matrices().chunks_exact(MATRIX_FLOATS))
        .map(|(bone, matrix)| BoneReport {
            name: bone.name.clone(),
            skinning: matrix.to_vec(),
        })
        .collect();

    SimulationReport {
        frames: host.frames(),
        delta_time,
        active_clip: controller.active_clip().to_string(),
        loaded_clips: controller.clip_names().map(String::from).collect(),
        key_count: controller.current_key_count(),
        elapsed_time: controller.elapsed_time(),
        speed: controller.animation_speed(),
        speed_factor: controller.animation_factor_speed(),
        debug_draw: controller.debug_draw_enabled(),
        pose_submissions: host.renderer().pose_submissions(),
        debug_lines: host.renderer().lines().len(),
        bones,
    }
}

fn print_report(report: &SimulationReport) {
    println!("=== Simulation ===");
    println!("Frames: {} (dt {:.4}s)", report.frames, report.delta_time);
    println!("Active clip: {} ({} keys)", report.active_clip, report.key_count);
    println!("Loaded clips: {}", report.loaded_clips.join(", "));
    println!("Elapsed time: {:.3} frames", report.elapsed_time);
    println!("Speed: {:.3} x factor {:.3}", report.speed, report.speed_factor);
    println!("Debug draw: {}", if report.debug_draw { "on" } else { "off" });
    println!(
        "Submitted: {} poses, {} debug lines",
        report.pose_submissions, report.debug_lines
    );

    println!("\n=== Skinning Matrices (row-major) ===");
    for (index, bone) in report.bones.iter().enumerate() {
        println!("[{}] {}", index, bone.name);
        for row in bone.skinning.chunks_exact(4) {
            println!("  {}", format_row(row));
        }
    }
}
