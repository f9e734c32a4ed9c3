//! Skeletal animation core
//!
//! Builds a bone hierarchy from a [`SkeletonSource`], samples keyframe clips
//! from an [`AnimationSource`] and derives one skinning matrix per bone each
//! frame. Rendering and key polling are left to the host through the
//! [`Renderer`] and [`InputSource`] traits.
//!
//! ```
//! use glam::{Quat, Vec3};
//! use skel_anim::{AnimationController, ControllerConfig, MemoryRig, NoInput, RecordingRenderer};
//!
//! let mut rig = MemoryRig::new();
//! let root = rig.add_bone("root", None, Vec3::ZERO, Quat::IDENTITY);
//! rig.add_bone("spine", Some(root), Vec3::Y, Quat::IDENTITY);
//! rig.add_uniform_clip("walk", 8);
//! rig.add_uniform_clip("run", 8);
//!
//! let config = ControllerConfig {
//!     walk_clip: "walk".into(),
//!     run_clip: "run".into(),
//!     ..ControllerConfig::default()
//! };
//! let mut controller = AnimationController::new(config);
//! controller.init(&rig, &rig)?;
//!
//! let mut renderer = RecordingRenderer::new();
//! controller.update(1.0 / 60.0, &mut NoInput, &mut renderer)?;
//! assert_eq!(renderer.pose_bone_count(), 2);
//! # Ok::<(), skel_anim::AnimError>(())
//! ```

pub mod bone;
pub mod clip;
pub mod config;
pub mod controller;
pub mod debug_draw;
pub mod error;
pub mod hierarchy;
pub mod memory;
pub mod sampling;
pub mod simulation;
pub mod source;
pub mod transform;

// Re-export common types
pub use bone::Bone;
pub use clip::{AnimationClip, Keyframe};
pub use config::{
    ControlCommand, ControllerConfig, DEFAULT_RUN_CLIP, DEFAULT_WALK_CLIP, DebugDrawConfig,
    KeyBindings,
};
pub use controller::{AnimationController, MATRIX_FLOATS};
pub use error::{AnimError, ErrorKind, Result};
pub use hierarchy::{BoneHierarchy, DEFAULT_IK_MARKER};
pub use memory::{DebugLine, MemoryRig, RecordingRenderer, RigBone, RigClip, ScriptedInput};
pub use sampling::{FrameWindow, Lerp, slerp_shortest};
pub use simulation::{Simulation, SimulationHost};
pub use source::{AnimationSource, InputSource, NoInput, Renderer, SkeletonSource};
pub use transform::Transform;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
