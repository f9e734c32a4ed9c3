//! `tree` command: hierarchy rendered as a tree

use anyhow::{Context, Result};
use clap::Args;
use skel_anim::{BoneHierarchy, DEFAULT_IK_MARKER};
use std::path::PathBuf;

use crate::utils::{TreeNode, TreeOptions, hierarchy_tree, load_rig, render_tree};

#[derive(Args)]
pub struct TreeArgs {
    /// Path to the JSON rig file
    pub rig: PathBuf,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Bones whose name contains this substring are excluded (empty keeps all)
    #[arg(long, default_value = DEFAULT_IK_MARKER)]
    pub ik_marker: String,

    /// Show bind positions under each bone
    #[arg(short, long)]
    pub positions: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

pub fn execute(args: TreeArgs) -> Result<()> {
    let rig = load_rig(&args.rig)?;
    let mut hierarchy = BoneHierarchy::build(&rig, &args.ik_marker)
        .with_context(|| format!("Failed to build hierarchy from {}", args.rig.display()))?;
    hierarchy.link();

    let title = args.rig.file_name().map_or_else(
        || args.rig.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );

    let mut tree = hierarchy_tree(&title, &hierarchy);
    if !args.positions {
        strip_positions(&mut tree);
    }

    let options = TreeOptions {
        max_depth: args.depth,
        no_color: args.no_color,
        show_metadata: true,
    };
    print!("{}", render_tree(&tree, &options));
    Ok(())
}

// Keeps the summary counts on the rig node.
fn strip_positions(node: &mut TreeNode) {
    node.metadata.retain(|(key, _)| key != "local" && key != "world");
    for child in &mut node.children {
        strip_positions(child);
    }
}
