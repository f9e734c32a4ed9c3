//! Per-frame animation driver
//!
//! The [`AnimationController`] owns the bone hierarchy and the loaded clips.
//! Each update it advances time, applies at most one input command, samples
//! the active clip for every non-root bone in storage order, derives the
//! skinning matrices and hands them to the renderer.
//!
//! Clip selection is a small state machine: one state per loaded clip name,
//! switched only by input commands (or [`AnimationController::play`]), never
//! by elapsed time. Every switch restarts the clip from time zero.

use std::collections::BTreeMap;

use log::{debug, info, trace};

use crate::bone::Bone;
use crate::clip::AnimationClip;
use crate::config::{ControlCommand, ControllerConfig};
use crate::debug_draw;
use crate::error::{AnimError, Result};
use crate::hierarchy::BoneHierarchy;
use crate::sampling::{self, FrameWindow};
use crate::source::{AnimationSource, InputSource, Renderer, SkeletonSource};

/// Floats per skinning matrix in the flattened buffer
pub const MATRIX_FLOATS: usize = 16;

/// Speed factor restored by the reset command
pub const DEFAULT_SPEED_FACTOR: f32 = 1.0;

/// Skeleton animation controller
#[derive(Debug, Clone)]
pub struct AnimationController {
    config: ControllerConfig,
    hierarchy: BoneHierarchy,
    clips: BTreeMap<String, AnimationClip>,
    active_clip: String,
    elapsed_time: f32,
    speed: f32,
    speed_factor: f32,
    current_key_count: usize,
    skinning: Vec<f32>,
    initialized: bool,
}

impl AnimationController {
    /// Create a controller that starts on the walk clip
    pub fn new(config: ControllerConfig) -> Self {
        let initial = config.walk_clip.clone();
        Self::with_initial_clip(config, initial)
    }

    /// Create a controller that starts on `clip_name`
    ///
    /// The clip is loaded alongside the walk and run clips during `init`.
    pub fn with_initial_clip(config: ControllerConfig, clip_name: impl Into<String>) -> Self {
        Self {
            speed: config.speed,
            speed_factor: config.speed_factor,
            config,
            hierarchy: BoneHierarchy::default(),
            clips: BTreeMap::new(),
            active_clip: clip_name.into(),
            elapsed_time: 0.0,
            current_key_count: 0,
            skinning: Vec::new(),
            initialized: false,
        }
    }

    /// Build the skeleton and sample every clip from the sources
    pub fn init(
        &mut self,
        skeleton: &dyn SkeletonSource,
        animations: &dyn AnimationSource,
    ) -> Result<()> {
        self.initialized = false;
        self.hierarchy = BoneHierarchy::build(skeleton, &self.config.ik_marker)?;
        self.hierarchy.link();

        let mut names = vec![self.active_clip.clone()];
        for name in [&self.config.walk_clip, &self.config.run_clip] {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }

        self.clips.clear();
        for name in names {
            let clip = self.load_clip(&name, animations)?;
            self.clips.insert(name, clip);
        }

        self.current_key_count = self
            .clips
            .get(&self.active_clip)
            .map_or(0, AnimationClip::key_count);
        self.skinning = vec![0.0; self.hierarchy.len() * MATRIX_FLOATS];
        self.write_skinning();
        self.initialized = true;

        info!(
            "Initialized controller: {} bones, {} clips, active '{}' ({} keys)",
            self.hierarchy.len(),
            self.clips.len(),
            self.active_clip,
            self.current_key_count
        );
        Ok(())
    }

    fn load_clip(&self, name: &str, animations: &dyn AnimationSource) -> Result<AnimationClip> {
        let mut clip = AnimationClip::new();
        clip.set_key_count(animations.clip_key_count(name));
        clip.set_bone_count(self.hierarchy.len());

        for (slot, bone) in self.hierarchy.iter().enumerate() {
            for frame in 0..clip.key_count() {
                let (position, rotation) =
                    animations.clip_bone_local_transform(name, bone.source_index, frame);
                clip.add_frame(slot, position, rotation);
            }
        }

        clip.validate().map_err(|e| match e {
            AnimError::Configuration(message) => {
                AnimError::configuration(format!("clip '{}': {}", name, message))
            }
            other => other,
        })?;
        debug!("Loaded clip '{}' with {} keys", name, clip.key_count());
        Ok(clip)
    }

    /// Advance the simulation by `delta_time` seconds
    ///
    /// On error the frame is abandoned: matrices may be partially updated and
    /// nothing is submitted to the renderer.
    pub fn update(
        &mut self,
        delta_time: f32,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        if !self.initialized {
            return Err(AnimError::configuration("update called before init"));
        }

        self.elapsed_time += delta_time * self.speed * self.speed_factor;

        input.begin_frame();
        self.apply_input(delta_time, input)?;

        self.apply_pose()?;
        self.write_skinning();
        renderer.submit_skinning_pose(&self.skinning, self.hierarchy.len());

        debug_draw::draw_axes(renderer, &self.config.debug_draw);
        if self.config.debug_draw.enabled {
            debug_draw::draw_skeleton(renderer, &self.hierarchy, &self.config.debug_draw);
        }

        trace!(
            "Frame done: clip '{}' elapsed {:.3} factor {:.3}",
            self.active_clip, self.elapsed_time, self.speed_factor
        );
        Ok(())
    }

    fn apply_input(&mut self, delta_time: f32, input: &dyn InputSource) -> Result<()> {
        let bindings = &self.config.key_bindings;
        let Some(command) = ControlCommand::ALL
            .into_iter()
            .find(|&command| input.is_key_pressed(bindings.key_for(command)))
        else {
            return Ok(());
        };

        match command {
            ControlCommand::SwitchToRun => {
                let run = self.config.run_clip.clone();
                self.play(&run)?;
            }
            ControlCommand::SwitchToWalk => {
                let walk = self.config.walk_clip.clone();
                self.play(&walk)?;
            }
            ControlCommand::IncreaseFactor => {
                self.speed_factor += self.speed_factor * delta_time;
                if self.speed_factor > self.config.max_speed_factor {
                    self.speed_factor = self.config.max_speed_factor;
                }
                debug!("Speed factor raised to {:.3}", self.speed_factor);
            }
            ControlCommand::DecreaseFactor => {
                self.speed_factor -= self.speed_factor * delta_time;
                if self.speed_factor < self.config.min_speed_factor {
                    self.speed_factor = self.config.min_speed_factor;
                }
                debug!("Speed factor lowered to {:.3}", self.speed_factor);
            }
            ControlCommand::ResetFactor => {
                self.speed_factor = DEFAULT_SPEED_FACTOR;
                debug!("Speed factor reset");
            }
            ControlCommand::ToggleDebugDraw => {
                self.config.debug_draw.enabled = !self.config.debug_draw.enabled;
                let state = if self.config.debug_draw.enabled { "on" } else { "off" };
                debug!("Skeleton lines {}", state);
            }
        }
        Ok(())
    }

    fn apply_pose(&mut self) -> Result<()> {
        let clip = self
            .clips
            .get(&self.active_clip)
            .ok_or_else(|| AnimError::UnknownClip(self.active_clip.clone()))?;
        if clip.bone_count() != self.hierarchy.len() {
            return Err(AnimError::configuration(format!(
                "clip '{}' covers {} bones, hierarchy has {}",
                self.active_clip,
                clip.bone_count(),
                self.hierarchy.len()
            )));
        }

        let window = FrameWindow::at(self.elapsed_time, self.current_key_count)?;

        for index in 0..self.hierarchy.len() {
            if self.hierarchy.bones()[index].is_root() {
                continue;
            }
            let key = sampling::sample(clip, index, window)?;
            self.hierarchy
                .set_anim_pose(index, key.position, key.rotation)?;
        }
        Ok(())
    }

    fn write_skinning(&mut self) {
        for (bone, out) in self
            .hierarchy
            .iter()
            .zip(self.skinning.chunks_exact_mut(MATRIX_FLOATS))
        {
            // glam is column-major; the renderer takes row-major
            let matrix = bone.transform.skinning_matrix().transpose();
            out.copy_from_slice(&matrix.to_cols_array());
        }
    }

    /// Make `clip_name` the active clip and restart it from time zero
    pub fn play(&mut self, clip_name: &str) -> Result<()> {
        let clip = self
            .clips
            .get(clip_name)
            .ok_or_else(|| AnimError::UnknownClip(clip_name.to_string()))?;
        self.current_key_count = clip.key_count();
        self.active_clip = clip_name.to_string();
        self.elapsed_time = 0.0;
        debug!(
            "Switched to clip '{}' ({} keys)",
            clip_name, self.current_key_count
        );
        Ok(())
    }

    /// Jump to an elapsed time, in frames, within the active clip
    pub fn seek(&mut self, elapsed_time: f32) {
        self.elapsed_time = elapsed_time;
    }

    pub fn animation_speed(&self) -> f32 {
        self.speed
    }

    pub fn set_animation_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn animation_factor_speed(&self) -> f32 {
        self.speed_factor
    }

    /// Unclamped; only the input commands clamp the factor
    pub fn set_animation_factor_speed(&mut self, factor: f32) {
        self.speed_factor = factor;
    }

    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.hierarchy.find_by_name(name)
    }

    pub fn active_clip(&self) -> &str {
        &self.active_clip
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    pub fn current_key_count(&self) -> usize {
        self.current_key_count
    }

    /// Flattened row-major skinning matrices, 16 floats per bone
    pub fn skinning_matrices(&self) -> &[f32] {
        &self.skinning
    }

    pub fn hierarchy(&self) -> &BoneHierarchy {
        &self.hierarchy
    }

    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    pub fn debug_draw_enabled(&self) -> bool {
        self.config.debug_draw.enabled
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}
