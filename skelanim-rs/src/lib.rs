//! skelanim CLI library
//!
//! Loads rig descriptions from JSON and drives them through the
//! `skel-anim` controller without a window.

pub mod cli;
pub mod commands;
pub mod utils;
