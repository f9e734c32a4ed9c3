//! Keyframe store for one animation clip
//!
//! Samples are stored per bone, in frame order. Retrieval is positional: the
//! n-th sample appended for a bone is frame n. The configured key and bone
//! counts are declared up front and are not derived from what was stored.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};

use crate::error::{AnimError, Result};

/// One sampled local pose
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyframe {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Keyframe {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

impl Default for Keyframe {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-bone keyframe sequences of a clip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationClip {
    key_count: usize,
    bone_count: usize,
    samples: BTreeMap<usize, Vec<Keyframe>>,
}

impl AnimationClip {
    /// Create an empty clip
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_count(&mut self, key_count: usize) {
        self.key_count = key_count;
    }

    pub fn set_bone_count(&mut self, bone_count: usize) {
        self.bone_count = bone_count;
    }

    /// Configured number of frames
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Configured number of bones
    pub fn bone_count(&self) -> usize {
        self.bone_count
    }

    /// Append the next frame for a bone
    pub fn add_frame(&mut self, bone: usize, position: Vec3, rotation: Quat) {
        self.samples
            .entry(bone)
            .or_default()
            .push(Keyframe::new(position, rotation));
    }

    /// Replace an already stored frame
    pub fn update_frame(
        &mut self,
        bone: usize,
        frame: usize,
        position: Vec3,
        rotation: Quat,
    ) -> Result<()> {
        let track = self
            .samples
            .get_mut(&bone)
            .ok_or(AnimError::UnknownBone { bone })?;
        let stored = track.len();
        let slot = track.get_mut(frame).ok_or(AnimError::FrameOutOfRange {
            bone,
            frame,
            stored,
        })?;
        *slot = Keyframe::new(position, rotation);
        Ok(())
    }

    /// Stored sample of `bone` at `frame`
    pub fn frame(&self, bone: usize, frame: usize) -> Result<Keyframe> {
        let track = self
            .samples
            .get(&bone)
            .ok_or(AnimError::UnknownBone { bone })?;
        track
            .get(frame)
            .copied()
            .ok_or(AnimError::FrameOutOfRange {
                bone,
                frame,
                stored: track.len(),
            })
    }

    /// Number of samples actually stored for a bone
    pub fn stored_frames(&self, bone: usize) -> usize {
        self.samples.get(&bone).map_or(0, Vec::len)
    }

    /// Check that every configured bone holds exactly `key_count` samples
    pub fn validate(&self) -> Result<()> {
        if self.key_count == 0 {
            return Err(AnimError::configuration("clip has no keys"));
        }
        for bone in 0..self.bone_count {
            let stored = self.stored_frames(bone);
            if stored != self.key_count {
                return Err(AnimError::configuration(format!(
                    "bone {} holds {} samples, clip declares {} keys",
                    bone, stored, self.key_count
                )));
            }
        }
        Ok(())
    }
}
