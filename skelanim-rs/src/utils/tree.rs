//! Tree rendering for bone hierarchies

use console::Style;
use skel_anim::BoneHierarchy;

use super::format::format_vec3;

/// A node in a rendered tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub children: Vec<TreeNode>,
    pub metadata: Vec<(String, String)>,
}

/// Kinds of nodes in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Rig,
    Root,
    Bone,
    Leaf,
    Excluded,
}

/// Options for tree rendering
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            no_color: false,
            show_metadata: true,
        }
    }
}

impl TreeNode {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            children: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add metadata, rendered in insertion order
    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.push((key.to_string(), value.into()));
        self
    }
}

impl NodeType {
    /// Marker shown before the node name
    pub fn icon(self) -> &'static str {
        match self {
            Self::Rig => "🦴",
            Self::Root => "◆",
            Self::Bone => "●",
            Self::Leaf => "○",
            Self::Excluded => "✗",
        }
    }

    /// Color style for the node name
    pub fn style(self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                Self::Rig => Style::new().bold().cyan(),
                Self::Root => Style::new().bold().yellow(),
                Self::Bone => Style::new().green(),
                Self::Leaf => Style::new().blue(),
                Self::Excluded => Style::new().dim(),
            }
        }
    }
}

/// Build a tree from a linked hierarchy
///
/// Excluded bone names are listed under a separate node after the roots.
pub fn hierarchy_tree(title: &str, hierarchy: &BoneHierarchy) -> TreeNode {
    let mut root = TreeNode::new(title, NodeType::Rig)
        .with_metadata("bones", hierarchy.len().to_string())
        .with_metadata("excluded", hierarchy.excluded().len().to_string());

    for index in hierarchy.roots() {
        root = root.add_child(bone_node(hierarchy, index));
    }

    if !hierarchy.excluded().is_empty() {
        let mut excluded = TreeNode::new("excluded", NodeType::Excluded);
        for name in hierarchy.excluded() {
            excluded = excluded.add_child(TreeNode::new(name.as_str(), NodeType::Excluded));
        }
        root = root.add_child(excluded);
    }

    root
}

fn bone_node(hierarchy: &BoneHierarchy, index: usize) -> TreeNode {
    let Some(bone) = hierarchy.get(index) else {
        return TreeNode::new(format!("#{index}"), NodeType::Excluded);
    };

    let node_type = if bone.is_root() {
        NodeType::Root
    } else if bone.is_leaf() {
        NodeType::Leaf
    } else {
        NodeType::Bone
    };

    let mut node = TreeNode::new(format!("[{}] {}", index, bone.name), node_type)
        .with_metadata("local", format_vec3(bone.transform.local_position()))
        .with_metadata("world", format_vec3(bone.transform.world_position()));

    for &child in hierarchy.children_of(index) {
        node = node.add_child(bone_node(hierarchy, child));
    }
    node
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };
    let style = node.node_type.style(options.no_color);

    output.push_str(&format!(
        "{}{}{} {}\n",
        prefix,
        connector,
        node.node_type.icon(),
        style.apply_to(&node.name)
    ));

    let new_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}{}", prefix, if is_last { "    " } else { "│   " })
    };

    if options.show_metadata {
        let meta_style = if options.no_color {
            Style::new()
        } else {
            Style::new().dim()
        };
        for (key, value) in &node.metadata {
            output.push_str(&format!(
                "{}    {}: {}\n",
                new_prefix,
                meta_style.apply_to(key),
                value
            ));
        }
    }

    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        render_node(
            child,
            output,
            &new_prefix,
            is_last_child,
            depth + 1,
            options,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use skel_anim::MemoryRig;

    fn hierarchy() -> BoneHierarchy {
        let mut rig = MemoryRig::new();
        let root = rig.add_bone("pelvis", None, Vec3::ZERO, Quat::IDENTITY);
        let spine = rig.add_bone("spine", Some(root), Vec3::Y, Quat::IDENTITY);
        rig.add_bone("head", Some(spine), Vec3::Y, Quat::IDENTITY);
        rig.add_bone("hand_ik", Some(root), Vec3::X, Quat::IDENTITY);
        let mut hierarchy = BoneHierarchy::build(&rig, "ik").unwrap();
        hierarchy.link();
        hierarchy
    }

    #[test]
    fn test_tree_rendering() {
        let tree = hierarchy_tree("rig.json", &hierarchy());
        let options = TreeOptions {
            no_color: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&tree, &options);

        assert!(output.starts_with("🦴 rig.json\n"));
        assert!(output.contains("├── ◆ [0] pelvis"));
        assert!(output.contains("│   └── ● [1] spine"));
        assert!(output.contains("│       └── ○ [2] head"));
        assert!(output.contains("world: (0.000, 2.000, 0.000)"));
        assert!(output.contains("✗ hand_ik"));
    }

    #[test]
    fn test_max_depth() {
        let tree = hierarchy_tree("rig.json", &hierarchy());
        let options = TreeOptions {
            max_depth: Some(1),
            no_color: true,
            show_metadata: false,
        };
        let output = render_tree(&tree, &options);

        assert!(output.contains("pelvis"));
        assert!(!output.contains("spine"));
        assert!(!output.contains("local:"));
    }
}
