//! Bind-pose and animated-pose matrices for a single bone
//!
//! A [`Transform`] keeps two parallel matrix chains:
//!
//! - the bind pose: `world_bind = parent.world_bind * local_bind`
//! - the animated pose: `world_anim = parent.world_anim * local_bind * local_anim`
//!
//! The animated local matrix is a delta applied on top of the bind local
//! matrix, never a replacement for it. Parent links are indices into the
//! owning hierarchy; every method that needs the parent's matrices takes the
//! parent transform as an argument, so callers must pass the transform that
//! lives at [`Transform::parent`].

use glam::{Mat4, Quat, Vec3};

/// Matrix state of one bone (all matrices column-major)
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    local_bind: Mat4,
    world_bind: Mat4,
    inverse_world_bind: Mat4,
    local_anim: Mat4,
    world_anim: Mat4,
    parent: Option<usize>,
}

impl Transform {
    /// Transform with every matrix set to identity and no parent
    pub fn new() -> Self {
        Self {
            local_bind: Mat4::IDENTITY,
            world_bind: Mat4::IDENTITY,
            inverse_world_bind: Mat4::IDENTITY,
            local_anim: Mat4::IDENTITY,
            world_anim: Mat4::IDENTITY,
            parent: None,
        }
    }

    /// Set the bind-pose local transform and recompute the world bind matrices
    pub fn set_bind_pose(
        &mut self,
        local_position: Vec3,
        local_rotation: Quat,
        parent: Option<&Transform>,
    ) {
        self.local_bind =
            Mat4::from_scale_rotation_translation(Vec3::ONE, local_rotation, local_position);
        self.init_skeleton(parent);
    }

    /// Recompute `world_bind` and its inverse from the current parent
    ///
    /// Must run parent-first across a hierarchy: the parent's `world_bind`
    /// is read as-is.
    pub fn init_skeleton(&mut self, parent: Option<&Transform>) {
        self.world_bind = match parent {
            Some(parent) => parent.world_bind * self.local_bind,
            None => self.local_bind,
        };
        self.inverse_world_bind = self.world_bind.inverse();
    }

    /// Link this transform under the transform stored at `parent_index`
    pub fn set_parent(&mut self, parent_index: usize, parent: &Transform) {
        self.parent = Some(parent_index);
        self.init_skeleton(Some(parent));
    }

    /// Set the animated local delta and recompute `world_anim`
    ///
    /// Reads the parent's `world_anim`, so parents must be updated first
    /// within a frame.
    pub fn set_anim_pose(
        &mut self,
        local_position: Vec3,
        local_rotation: Quat,
        parent: Option<&Transform>,
    ) {
        self.local_anim =
            Mat4::from_scale_rotation_translation(Vec3::ONE, local_rotation, local_position);
        self.update_anim_matrices(parent);
    }

    /// Recompute `world_anim` from the stored local matrices
    pub fn update_anim_matrices(&mut self, parent: Option<&Transform>) {
        let local = self.local_bind * self.local_anim;
        self.world_anim = match parent {
            Some(parent) => parent.world_anim * local,
            None => local,
        };
    }

    /// Matrix mapping bind-pose model space to the current animated pose
    pub fn skinning_matrix(&self) -> Mat4 {
        self.world_anim * self.inverse_world_bind
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn local_bind_matrix(&self) -> &Mat4 {
        &self.local_bind
    }

    pub fn world_bind_matrix(&self) -> &Mat4 {
        &self.world_bind
    }

    pub fn inverse_world_bind_matrix(&self) -> &Mat4 {
        &self.inverse_world_bind
    }

    pub fn local_anim_matrix(&self) -> &Mat4 {
        &self.local_anim
    }

    pub fn world_anim_matrix(&self) -> &Mat4 {
        &self.world_anim
    }

    pub fn local_position(&self) -> Vec3 {
        translation_of(&self.local_bind)
    }

    pub fn world_position(&self) -> Vec3 {
        translation_of(&self.world_bind)
    }

    pub fn local_rotation(&self) -> Quat {
        rotation_of(&self.local_bind)
    }

    pub fn world_rotation(&self) -> Quat {
        rotation_of(&self.world_bind)
    }

    pub fn local_anim_position(&self) -> Vec3 {
        translation_of(&self.local_anim)
    }

    pub fn world_anim_position(&self) -> Vec3 {
        translation_of(&self.world_anim)
    }

    pub fn local_anim_rotation(&self) -> Quat {
        rotation_of(&self.local_anim)
    }

    pub fn world_anim_rotation(&self) -> Quat {
        rotation_of(&self.world_anim)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Bind matrices only; the animated pose is per-frame state
impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.local_bind == other.local_bind && self.world_bind == other.world_bind
    }
}

fn translation_of(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

// The upper 3x3 block is orthonormal for every matrix built here (unit scale).
fn rotation_of(m: &Mat4) -> Quat {
    Quat::from_mat4(m)
}
