//! In-memory collaborators
//!
//! [`MemoryRig`] serves a skeleton and its clips from plain data and
//! implements both source traits. [`ScriptedInput`] replays a per-frame list
//! of pressed keys and [`RecordingRenderer`] keeps whatever was submitted.
//! Together they let the controller run headless.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use log::trace;

use crate::clip::Keyframe;
use crate::error::{AnimError, Result};
use crate::source::{AnimationSource, InputSource, Renderer, SkeletonSource};

/// Bone entry of a [`MemoryRig`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct RigBone {
    pub name: String,
    /// Parent in rig numbering, `None` for roots
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub parent: Option<usize>,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub position: Vec3,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub rotation: Quat,
}

/// Clip entry of a [`MemoryRig`]
///
/// `tracks[bone][frame]`, in rig bone numbering. Samples that are not
/// present read back as the identity pose. A track is either empty or holds
/// exactly `key_count` samples, see [`MemoryRig::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct RigClip {
    pub key_count: usize,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub tracks: Vec<Vec<Keyframe>>,
}

impl RigClip {
    pub fn new(key_count: usize) -> Self {
        Self {
            key_count,
            tracks: Vec::new(),
        }
    }

    /// Store a sample, growing the tracks as needed
    pub fn set_sample(&mut self, bone: usize, frame: usize, keyframe: Keyframe) {
        if self.tracks.len() <= bone {
            self.tracks.resize_with(bone + 1, Vec::new);
        }
        let track = &mut self.tracks[bone];
        if track.len() <= frame {
            track.resize(frame + 1, Keyframe::IDENTITY);
        }
        track[frame] = keyframe;
    }

    pub fn sample(&self, bone: usize, frame: usize) -> Option<Keyframe> {
        self.tracks.get(bone)?.get(frame).copied()
    }
}

/// Skeleton and clips held in memory
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryRig {
    pub bones: Vec<RigBone>,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub clips: BTreeMap<String, RigClip>,
}

impl MemoryRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bone and return its rig index
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<usize>,
        position: Vec3,
        rotation: Quat,
    ) -> usize {
        self.bones.push(RigBone {
            name: name.into(),
            parent,
            position,
            rotation,
        });
        self.bones.len() - 1
    }

    /// Insert (or replace) a clip and return it for filling in samples
    pub fn add_clip(&mut self, name: impl Into<String>, key_count: usize) -> &mut RigClip {
        let name = name.into();
        self.clips.insert(name.clone(), RigClip::new(key_count));
        self.clips.entry(name).or_default()
    }

    /// Insert (or replace) a clip whose every sample is the identity pose
    pub fn add_uniform_clip(&mut self, name: impl Into<String>, key_count: usize) {
        self.add_clip(name, key_count);
    }

    pub fn clip(&self, name: &str) -> Option<&RigClip> {
        self.clips.get(name)
    }

    pub fn clip_mut(&mut self, name: &str) -> Option<&mut RigClip> {
        self.clips.get_mut(name)
    }

    /// Check that every clip track is empty or holds exactly `key_count`
    /// samples, and that no clip has tracks for bones the rig lacks
    pub fn validate(&self) -> Result<()> {
        for (name, clip) in &self.clips {
            if clip.tracks.len() > self.bones.len() {
                return Err(AnimError::configuration(format!(
                    "clip '{}' has {} tracks but the rig has {} bones",
                    name,
                    clip.tracks.len(),
                    self.bones.len()
                )));
            }
            for (bone, track) in clip.tracks.iter().enumerate() {
                if !track.is_empty() && track.len() != clip.key_count {
                    return Err(AnimError::configuration(format!(
                        "clip '{}' bone {} has {} samples, expected {}",
                        name,
                        bone,
                        track.len(),
                        clip.key_count
                    )));
                }
            }
        }
        Ok(())
    }
}

impl SkeletonSource for MemoryRig {
    fn bone_count(&self) -> usize {
        self.bones.len()
    }

    fn bone_name(&self, index: usize) -> String {
        self.bones
            .get(index)
            .map(|bone| bone.name.clone())
            .unwrap_or_default()
    }

    fn bone_parent_index(&self, index: usize) -> i32 {
        self.bones
            .get(index)
            .and_then(|bone| bone.parent)
            .map_or(-1, |parent| parent as i32)
    }

    fn bone_bind_local_transform(&self, index: usize) -> (Vec3, Quat) {
        self.bones
            .get(index)
            .map_or((Vec3::ZERO, Quat::IDENTITY), |bone| {
                (bone.position, bone.rotation)
            })
    }
}

impl AnimationSource for MemoryRig {
    fn clip_key_count(&self, clip_name: &str) -> usize {
        self.clips.get(clip_name).map_or(0, |clip| clip.key_count)
    }

    fn clip_bone_local_transform(
        &self,
        clip_name: &str,
        bone_index: usize,
        frame_index: usize,
    ) -> (Vec3, Quat) {
        let keyframe = self
            .clips
            .get(clip_name)
            .and_then(|clip| clip.sample(bone_index, frame_index))
            .unwrap_or_else(|| {
                trace!(
                    "No sample for '{}' bone {} frame {}, using identity",
                    clip_name, bone_index, frame_index
                );
                Keyframe::IDENTITY
            });
        (keyframe.position, keyframe.rotation)
    }
}

/// Input source replaying one set of pressed keys per frame
///
/// Frames past the end of the script have no keys pressed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<Vec<char>>,
    current: Option<usize>,
}

impl ScriptedInput {
    pub fn new(frames: Vec<Vec<char>>) -> Self {
        Self {
            frames,
            current: None,
        }
    }

    /// Hold the same keys for `frames` frames
    pub fn repeat(keys: Vec<char>, frames: usize) -> Self {
        Self::new(vec![keys; frames])
    }

    /// Build a script from `(frame, key)` presses
    pub fn from_presses(presses: &[(usize, char)]) -> Self {
        let mut input = Self::default();
        for &(frame, key) in presses {
            input.press(frame, key);
        }
        input
    }

    /// Add a key press on a zero-based frame
    pub fn press(&mut self, frame: usize, key: char) {
        if self.frames.len() <= frame {
            self.frames.resize_with(frame + 1, Vec::new);
        }
        self.frames[frame].push(key);
    }

    /// Zero-based frame currently being polled
    pub fn frame(&self) -> Option<usize> {
        self.current
    }
}

impl InputSource for ScriptedInput {
    fn begin_frame(&mut self) {
        self.current = Some(self.current.map_or(0, |frame| frame + 1));
    }

    fn is_key_pressed(&self, key: char) -> bool {
        self.current
            .and_then(|frame| self.frames.get(frame))
            .is_some_and(|keys| keys.contains(&key))
    }
}

/// A line submitted to a [`RecordingRenderer`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Vec3,
}

/// Renderer that keeps submitted lines and the latest skinning pose
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    lines: Vec<DebugLine>,
    pose: Vec<f32>,
    pose_bone_count: usize,
    pose_submissions: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    /// Forget recorded lines; the last pose is kept
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn last_pose(&self) -> &[f32] {
        &self.pose
    }

    pub fn pose_bone_count(&self) -> usize {
        self.pose_bone_count
    }

    pub fn pose_submissions(&self) -> usize {
        self.pose_submissions
    }

    /// Row-major matrix of one bone from the last pose
    pub fn bone_matrix(&self, bone: usize) -> Option<[f32; 16]> {
        let start = bone * 16;
        let floats = self.pose.get(start..start + 16)?;
        let mut matrix = [0.0; 16];
        matrix.copy_from_slice(floats);
        Some(matrix)
    }
}

impl Renderer for RecordingRenderer {
    fn submit_line(&mut self, start: Vec3, end: Vec3, color: Vec3) {
        self.lines.push(DebugLine { start, end, color });
    }

    fn submit_skinning_pose(&mut self, matrices: &[f32], bone_count: usize) {
        self.pose.clear();
        self.pose.extend_from_slice(matrices);
        self.pose_bone_count = bone_count;
        self.pose_submissions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rig_as_skeleton_source() {
        let mut rig = MemoryRig::new();
        let root = rig.add_bone("root", None, Vec3::ZERO, Quat::IDENTITY);
        rig.add_bone("leaf", Some(root), Vec3::X, Quat::IDENTITY);

        assert_eq!(rig.bone_count(), 2);
        assert_eq!(rig.bone_name(1), "leaf");
        assert_eq!(rig.bone_parent_index(0), -1);
        assert_eq!(rig.bone_parent_index(1), 0);
        assert_eq!(rig.bone_bind_local_transform(1).0, Vec3::X);
    }

    #[test]
    fn test_missing_samples_read_as_identity() {
        let mut rig = MemoryRig::new();
        rig.add_clip("idle", 3)
            .set_sample(1, 2, Keyframe::new(Vec3::Y, Quat::IDENTITY));

        assert_eq!(rig.clip_key_count("idle"), 3);
        assert_eq!(rig.clip_key_count("nope"), 0);
        assert_eq!(rig.clip_bone_local_transform("idle", 1, 2).0, Vec3::Y);
        assert_eq!(rig.clip_bone_local_transform("idle", 1, 0).0, Vec3::ZERO);
        assert_eq!(rig.clip_bone_local_transform("idle", 0, 0).1, Quat::IDENTITY);
    }

    #[test]
    fn test_validate_track_lengths() {
        let mut rig = MemoryRig::new();
        let root = rig.add_bone("root", None, Vec3::ZERO, Quat::IDENTITY);
        rig.add_bone("leaf", Some(root), Vec3::X, Quat::IDENTITY);
        rig.add_uniform_clip("idle", 4);
        rig.add_clip("walk", 2)
            .set_sample(1, 1, Keyframe::new(Vec3::Y, Quat::IDENTITY));
        assert!(rig.validate().is_ok());

        // Two keys declared, three stored
        rig.clip_mut("walk")
            .unwrap()
            .set_sample(1, 2, Keyframe::IDENTITY);
        let err = rig.validate().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ConfigurationError);
        assert!(err.to_string().contains("clip 'walk' bone 1 has 3 samples, expected 2"));

        let mut rig = MemoryRig::new();
        rig.add_clip("walk", 1).set_sample(0, 0, Keyframe::IDENTITY);
        assert!(rig.validate().is_err());
    }

    #[test]
    fn test_scripted_input_advances_per_frame() {
        let mut input = ScriptedInput::from_presses(&[(0, 'R'), (2, '1'), (2, 'B')]);
        assert!(!input.is_key_pressed('R'));

        input.begin_frame();
        assert!(input.is_key_pressed('R'));
        input.begin_frame();
        assert!(!input.is_key_pressed('R'));
        input.begin_frame();
        assert!(input.is_key_pressed('1') && input.is_key_pressed('B'));
        input.begin_frame();
        assert_eq!(input.frame(), Some(3));
        assert!(!input.is_key_pressed('1'));
    }

    #[test]
    fn test_recording_renderer() {
        let mut renderer = RecordingRenderer::new();
        renderer.submit_line(Vec3::ZERO, Vec3::X, Vec3::ONE);
        renderer.submit_skinning_pose(&[1.0; 32], 2);

        assert_eq!(renderer.lines().len(), 1);
        assert_eq!(renderer.pose_bone_count(), 2);
        assert_eq!(renderer.bone_matrix(1), Some([1.0; 16]));
        assert_eq!(renderer.bone_matrix(2), None);

        renderer.clear();
        assert!(renderer.lines().is_empty());
        assert_eq!(renderer.pose_submissions(), 1);
    }
}
