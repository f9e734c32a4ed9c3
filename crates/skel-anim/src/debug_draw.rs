//! Debug line output for the animated skeleton

use glam::Vec3;

use crate::config::DebugDrawConfig;
use crate::hierarchy::BoneHierarchy;
use crate::source::Renderer;

/// Draw the three world axes from the origin in red, green and blue
pub fn draw_axes(renderer: &mut dyn Renderer, config: &DebugDrawConfig) {
    let length = config.axis_length;
    renderer.submit_line(Vec3::ZERO, Vec3::X * length, Vec3::X);
    renderer.submit_line(Vec3::ZERO, Vec3::Y * length, Vec3::Y);
    renderer.submit_line(Vec3::ZERO, Vec3::Z * length, Vec3::Z);
}

/// Draw one line per non-root bone, from its parent's animated position to its own
pub fn draw_skeleton(
    renderer: &mut dyn Renderer,
    hierarchy: &BoneHierarchy,
    config: &DebugDrawConfig,
) {
    let offset = Vec3::new(0.0, config.vertical_offset, 0.0);

    for bone in hierarchy {
        let Some(parent) = bone.parent().and_then(|p| hierarchy.get(p)) else {
            continue;
        };
        let start = parent.transform.world_anim_position() + offset;
        let end = bone.transform.world_anim_position() + offset;
        renderer.submit_line(start, end, config.bone_color);
    }
}
