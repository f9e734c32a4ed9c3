//! Collaborators consumed by the controller
//!
//! These traits stand in for the host engine: where the skeleton and the
//! decoded keyframes come from, how key state is polled, and where debug
//! lines and skinning matrices are submitted.

use glam::{Quat, Vec3};

/// Source of the skeleton description, in its own bone numbering
pub trait SkeletonSource {
    fn bone_count(&self) -> usize;

    fn bone_name(&self, index: usize) -> String;

    /// Parent bone index, `-1` for roots
    fn bone_parent_index(&self, index: usize) -> i32;

    /// Bind-pose local position and rotation
    fn bone_bind_local_transform(&self, index: usize) -> (Vec3, Quat);
}

/// Source of decoded keyframe samples
pub trait AnimationSource {
    fn clip_key_count(&self, clip_name: &str) -> usize;

    /// Local position and rotation of `bone_index` (skeleton source numbering)
    /// at `frame_index`
    fn clip_bone_local_transform(
        &self,
        clip_name: &str,
        bone_index: usize,
        frame_index: usize,
    ) -> (Vec3, Quat);
}

/// Key state polling
pub trait InputSource {
    /// Called once at the start of every controller update, before any key
    /// is polled
    fn begin_frame(&mut self) {}

    fn is_key_pressed(&self, key: char) -> bool;
}

/// Render submission
pub trait Renderer {
    fn submit_line(&mut self, start: Vec3, end: Vec3, color: Vec3);

    /// `matrices` holds `bone_count * 16` floats, row-major per bone
    fn submit_skinning_pose(&mut self, matrices: &[f32], bone_count: usize);
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn begin_frame(&mut self) {
        (**self).begin_frame();
    }

    fn is_key_pressed(&self, key: char) -> bool {
        (**self).is_key_pressed(key)
    }
}

impl<T: Renderer + ?Sized> Renderer for &mut T {
    fn submit_line(&mut self, start: Vec3, end: Vec3, color: Vec3) {
        (**self).submit_line(start, end, color);
    }

    fn submit_skinning_pose(&mut self, matrices: &[f32], bone_count: usize) {
        (**self).submit_skinning_pose(matrices, bone_count);
    }
}

/// Input source with no keys ever pressed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn is_key_pressed(&self, _key: char) -> bool {
        false
    }
}
