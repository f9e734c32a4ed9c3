//! Controller configuration

use glam::Vec3;

use crate::hierarchy::DEFAULT_IK_MARKER;

/// Default name of the walk clip
pub const DEFAULT_WALK_CLIP: &str = "ThirdPersonWalk.anim";
/// Default name of the run clip
pub const DEFAULT_RUN_CLIP: &str = "ThirdPersonRun.anim";

/// Discrete commands read from the input source each update
///
/// Listed in polling priority: the first pressed command wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlCommand {
    SwitchToRun,
    SwitchToWalk,
    IncreaseFactor,
    DecreaseFactor,
    ResetFactor,
    ToggleDebugDraw,
}

impl ControlCommand {
    /// All commands in polling order
    pub const ALL: [Self; 6] = [
        Self::SwitchToRun,
        Self::SwitchToWalk,
        Self::IncreaseFactor,
        Self::DecreaseFactor,
        Self::ResetFactor,
        Self::ToggleDebugDraw,
    ];
}

/// Key assigned to each [`ControlCommand`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct KeyBindings {
    pub switch_to_run: char,
    pub switch_to_walk: char,
    pub increase_factor: char,
    pub decrease_factor: char,
    pub reset_factor: char,
    pub toggle_debug_draw: char,
}

impl KeyBindings {
    pub fn key_for(&self, command: ControlCommand) -> char {
        match command {
            ControlCommand::SwitchToRun => self.switch_to_run,
            ControlCommand::SwitchToWalk => self.switch_to_walk,
            ControlCommand::IncreaseFactor => self.increase_factor,
            ControlCommand::DecreaseFactor => self.decrease_factor,
            ControlCommand::ResetFactor => self.reset_factor,
            ControlCommand::ToggleDebugDraw => self.toggle_debug_draw,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            switch_to_run: 'R',
            switch_to_walk: 'Z',
            increase_factor: '1',
            decrease_factor: '2',
            reset_factor: '3',
            toggle_debug_draw: 'B',
        }
    }
}

/// Debug line submission settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DebugDrawConfig {
    /// Draw the per-bone skeleton lines (axes are always drawn)
    pub enabled: bool,
    /// Length of each world axis line from the origin
    pub axis_length: f32,
    pub bone_color: Vec3,
    /// Added to the Y coordinate of both endpoints of every bone line
    pub vertical_offset: f32,
}

impl Default for DebugDrawConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            axis_length: 100.0,
            bone_color: Vec3::new(0.6, 0.4, 0.0),
            vertical_offset: -15.0,
        }
    }
}

/// Settings for an [`AnimationController`](crate::AnimationController)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ControllerConfig {
    pub walk_clip: String,
    pub run_clip: String,
    /// Frames advanced per second of simulated time
    pub speed: f32,
    /// Initial multiplier on `speed`
    pub speed_factor: f32,
    /// Ceiling applied by the increase command
    pub max_speed_factor: f32,
    /// Floor applied by the decrease command
    pub min_speed_factor: f32,
    /// Bones whose name contains this substring are left out of the hierarchy
    pub ik_marker: String,
    pub key_bindings: KeyBindings,
    pub debug_draw: DebugDrawConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            walk_clip: DEFAULT_WALK_CLIP.to_string(),
            run_clip: DEFAULT_RUN_CLIP.to_string(),
            speed: 10.0,
            speed_factor: 1.0,
            max_speed_factor: 25.0,
            min_speed_factor: 0.0,
            ik_marker: DEFAULT_IK_MARKER.to_string(),
            key_bindings: KeyBindings::default(),
            debug_draw: DebugDrawConfig::default(),
        }
    }
}
