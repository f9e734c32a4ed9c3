//! `info` command: bone and clip tables for a rig

use anyhow::{Context, Result};
use clap::Args;
use skel_anim::{AnimationSource, BoneHierarchy, DEFAULT_IK_MARKER};
use std::path::PathBuf;

use crate::utils::{add_table_row, create_table, format_parent, format_quat, format_vec3, load_rig};

#[derive(Args)]
pub struct InfoArgs {
    /// Path to the JSON rig file
    pub rig: PathBuf,

    /// Bones whose name contains this substring are excluded (empty keeps all)
    #[arg(long, default_value = DEFAULT_IK_MARKER)]
    pub ik_marker: String,

    /// Also show bind rotations
    #[arg(short, long)]
    pub detailed: bool,
}

pub fn execute(args: InfoArgs) -> Result<()> {
    let rig = load_rig(&args.rig)?;
    let mut hierarchy = BoneHierarchy::build(&rig, &args.ik_marker)
        .with_context(|| format!("Failed to build hierarchy from {}", args.rig.display()))?;
    hierarchy.link();

    println!("Rig: {}", args.rig.display());
    println!(
        "Bones: {} ({} in file, {} excluded)",
        hierarchy.len(),
        rig.bones.len(),
        hierarchy.excluded().len()
    );

    let mut headers = vec!["Index", "Name", "Source", "Parent", "Children", "World Position"];
    if args.detailed {
        headers.push("World Rotation");
    }
    let mut table = create_table(headers);
    for (index, bone) in hierarchy.iter().enumerate() {
        let mut cells = vec![
            index.to_string(),
            bone.name.clone(),
            bone.source_index.to_string(),
            format_parent(bone.parent()),
            bone.children().len().to_string(),
            format_vec3(bone.transform.world_position()),
        ];
        if args.detailed {
            cells.push(format_quat(bone.transform.world_rotation()));
        }
        add_table_row(&mut table, cells);
    }
    table.printstd();

    if !hierarchy.excluded().is_empty() {
        println!("\nExcluded: {}", hierarchy.excluded().join(", "));
    }

    println!("\nClips: {}", rig.clips.len());
    if !rig.clips.is_empty() {
        let mut table = create_table(vec!["Name", "Keys", "Tracks"]);
        for (name, clip) in &rig.clips {
            add_table_row(
                &mut table,
                vec![
                    name.clone(),
                    rig.clip_key_count(name).to_string(),
                    clip.tracks.len().to_string(),
                ],
            );
        }
        table.printstd();
    }

    Ok(())
}
