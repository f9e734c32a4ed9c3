//! Named skeleton node

use crate::transform::Transform;

/// A bone in a [`BoneHierarchy`](crate::BoneHierarchy)
///
/// Parent and children are indices into the owning hierarchy's storage.
/// `parent_index` is assigned when the hierarchy is built (already remapped
/// into hierarchy numbering); `parent` and `children` are filled in by
/// linking.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    /// Bone name as reported by the skeleton source
    pub name: String,
    /// Position of this bone in the skeleton source's numbering
    pub source_index: usize,
    /// Parent slot in the hierarchy, `None` for roots
    pub parent_index: Option<usize>,
    /// Bind and animated matrices
    pub transform: Transform,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

impl Bone {
    /// Create an unlinked bone
    pub fn new(name: impl Into<String>, source_index: usize, parent_index: Option<usize>) -> Self {
        Self {
            name: name.into(),
            source_index,
            parent_index,
            transform: Transform::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Linked parent slot
    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Linked child slots, in storage order
    #[inline]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_index.is_none()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
