//! Shared utilities for the skelanim CLI

pub mod format;
pub mod rig;
pub mod table;
pub mod tree;

pub use format::*;
pub use rig::*;
pub use table::*;
pub use tree::*;
