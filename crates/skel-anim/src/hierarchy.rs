//! Skeleton storage and parent/child linkage
//!
//! Bones live in a single `Vec` in parent-before-child order. Every link is
//! an index into that `Vec`, so any pass in storage order visits a parent
//! before its children.
//!
//! Bones whose name contains the IK marker are dropped while building. The
//! skeleton source reports parents in its own (unfiltered) numbering, so the
//! builder keeps a source-to-slot table and remaps every parent through it.
//! A bone whose parent was dropped is dropped as well, together with its
//! whole subtree.

use glam::{Quat, Vec3};
use log::{debug, info, warn};

use crate::bone::Bone;
use crate::error::{AnimError, Result};
use crate::source::SkeletonSource;

/// Default substring marking bones excluded from the hierarchy
pub const DEFAULT_IK_MARKER: &str = "ik";

/// Ordered, linked collection of bones
#[derive(Debug, Clone, Default)]
pub struct BoneHierarchy {
    bones: Vec<Bone>,
    excluded: Vec<String>,
}

impl BoneHierarchy {
    /// Build the bone list from a skeleton source
    ///
    /// The result is not linked yet; call [`BoneHierarchy::link`] before
    /// reading world matrices.
    pub fn build(source: &dyn SkeletonSource, ik_marker: &str) -> Result<Self> {
        let count = source.bone_count();
        let mut slots: Vec<Option<usize>> = vec![None; count];
        let mut bones = Vec::with_capacity(count);
        let mut excluded = Vec::new();

        for index in 0..count {
            let name = source.bone_name(index);
            if !ik_marker.is_empty() && name.contains(ik_marker) {
                debug!("Excluding IK bone '{}' ({})", name, index);
                excluded.push(name);
                continue;
            }

            let raw_parent = source.bone_parent_index(index);
            let parent_index = if raw_parent < 0 {
                None
            } else {
                let parent = raw_parent as usize;
                if parent >= index {
                    return Err(AnimError::configuration(format!(
                        "bone '{}' ({}) references parent {} which does not precede it",
                        name, index, parent
                    )));
                }
                match slots[parent] {
                    Some(slot) => Some(slot),
                    None => {
                        warn!(
                            "Dropping bone '{}' ({}): parent {} was excluded",
                            name, index, parent
                        );
                        excluded.push(name);
                        continue;
                    }
                }
            };

            let (position, rotation) = source.bone_bind_local_transform(index);
            let mut bone = Bone::new(name, index, parent_index);
            bone.transform.set_bind_pose(position, rotation, None);

            slots[index] = Some(bones.len());
            bones.push(bone);
        }

        if bones.is_empty() {
            return Err(AnimError::configuration(format!(
                "skeleton has no usable bones ({} reported, {} excluded)",
                count,
                excluded.len()
            )));
        }

        info!(
            "Built hierarchy with {} bones ({} excluded)",
            bones.len(),
            excluded.len()
        );

        Ok(Self { bones, excluded })
    }

    /// Resolve parent/child links and compute the bind pose top-down
    ///
    /// Also resets every bone's animated pose to the identity delta, so roots
    /// (which are never animated) sit at their bind pose.
    pub fn link(&mut self) {
        for bone in &mut self.bones {
            bone.parent = None;
            bone.children.clear();
        }

        for index in 0..self.bones.len() {
            if let Some(parent) = self.bones[index].parent_index {
                self.bones[index].parent = Some(parent);
                self.bones[parent].children.push(index);
            }
        }

        for index in 0..self.bones.len() {
            let (bone, parent) = self.split_parent(index);
            match (bone.parent, parent) {
                (Some(parent_index), Some(parent)) => {
                    bone.transform.set_parent(parent_index, &parent.transform);
                }
                _ => bone.transform.init_skeleton(None),
            }
            bone.transform
                .set_anim_pose(Vec3::ZERO, Quat::IDENTITY, parent.map(|p| &p.transform));
        }
    }

    /// Apply an animated local pose to one bone
    ///
    /// The parent's animated pose must already be current for this frame.
    pub fn set_anim_pose(&mut self, index: usize, position: Vec3, rotation: Quat) -> Result<()> {
        if index >= self.bones.len() {
            return Err(AnimError::UnknownBone { bone: index });
        }
        let (bone, parent) = self.split_parent(index);
        bone.transform
            .set_anim_pose(position, rotation, parent.map(|p| &p.transform));
        Ok(())
    }

    /// First bone with exactly this name
    pub fn find_by_name(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|bone| bone.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bone> {
        self.bones.iter()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Slots of all root bones
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, bone)| bone.is_root())
            .map(|(index, _)| index)
    }

    pub fn children_of(&self, index: usize) -> &[usize] {
        self.bones
            .get(index)
            .map_or(&[][..], |bone| bone.children())
    }

    /// Names of bones left out by IK exclusion, including orphaned descendants
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    // Parents always precede children, so the parent sits in the left half.
    fn split_parent(&mut self, index: usize) -> (&mut Bone, Option<&Bone>) {
        let parent_index = self.bones[index].parent_index;
        let (head, tail) = self.bones.split_at_mut(index);
        let parent = parent_index.map(|p| &head[p]);
        (&mut tail[0], parent)
    }
}

impl<'a> IntoIterator for &'a BoneHierarchy {
    type Item = &'a Bone;
    type IntoIter = std::slice::Iter<'a, Bone>;

    fn into_iter(self) -> Self::IntoIter {
        self.bones.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use glam::Mat4;

    struct TestSkeleton(Vec<(&'static str, i32, Vec3)>);

    impl SkeletonSource for TestSkeleton {
        fn bone_count(&self) -> usize {
            self.0.len()
        }

        fn bone_name(&self, index: usize) -> String {
            self.0[index].0.to_string()
        }

        fn bone_parent_index(&self, index: usize) -> i32 {
            self.0[index].1
        }

        fn bone_bind_local_transform(&self, index: usize) -> (Vec3, Quat) {
            (self.0[index].2, Quat::IDENTITY)
        }
    }

    fn chain() -> TestSkeleton {
        TestSkeleton(vec![
            ("root", -1, Vec3::ZERO),
            ("spine", 0, Vec3::Y),
            ("head", 1, Vec3::Y),
            ("arm", 1, Vec3::X),
        ])
    }

    #[test]
    fn test_build_and_link() {
        let mut hierarchy = BoneHierarchy::build(&chain(), DEFAULT_IK_MARKER).unwrap();
        hierarchy.link();

        assert_eq!(hierarchy.len(), 4);
        assert_eq!(hierarchy.children_of(1), &[2, 3]);
        assert_eq!(hierarchy.get(2).unwrap().parent(), Some(1));
        assert_eq!(hierarchy.roots().collect::<Vec<_>>(), vec![0]);

        let head = hierarchy.find_by_name("head").unwrap();
        assert!((head.transform.world_position() - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_world_bind_is_parent_times_local() {
        let mut hierarchy = BoneHierarchy::build(&chain(), DEFAULT_IK_MARKER).unwrap();
        hierarchy.link();

        for bone in &hierarchy {
            let t = &bone.transform;
            if let Some(parent) = bone.parent() {
                let parent = &hierarchy.get(parent).unwrap().transform;
                let expected = *parent.world_bind_matrix() * *t.local_bind_matrix();
                assert!(t.world_bind_matrix().abs_diff_eq(expected, 1e-6));
            }
            let product = *t.inverse_world_bind_matrix() * *t.world_bind_matrix();
            assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-5));
        }
    }

    #[test]
    fn test_ik_bones_are_remapped_out() {
        let skeleton = TestSkeleton(vec![
            ("root", -1, Vec3::ZERO),
            ("foot_ik", 0, Vec3::X),
            ("thigh", 0, Vec3::Y),
            ("shin", 2, Vec3::Y),
        ]);
        let mut hierarchy = BoneHierarchy::build(&skeleton, DEFAULT_IK_MARKER).unwrap();
        hierarchy.link();

        assert_eq!(hierarchy.len(), 3);
        assert!(hierarchy.find_by_name("foot_ik").is_none());
        // shin's source parent 2 must land on thigh's slot (1), not on slot 2
        let shin = hierarchy.find_by_name("shin").unwrap();
        assert_eq!(shin.source_index, 3);
        assert_eq!(shin.parent_index, Some(1));
        assert_eq!(hierarchy.get(1).unwrap().name, "thigh");
        assert_eq!(hierarchy.excluded(), &["foot_ik".to_string()]);
    }

    #[test]
    fn test_children_of_excluded_bone_are_dropped() {
        let skeleton = TestSkeleton(vec![
            ("root", -1, Vec3::ZERO),
            ("hand_ik", 0, Vec3::X),
            ("hand_ik_target", 1, Vec3::X),
            ("pole", 1, Vec3::Y),
            ("neck", 0, Vec3::Y),
        ]);
        let hierarchy = BoneHierarchy::build(&skeleton, DEFAULT_IK_MARKER).unwrap();

        let names: Vec<_> = hierarchy.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["root", "neck"]);
        assert_eq!(hierarchy.excluded().len(), 3);
    }

    #[test]
    fn test_zero_usable_bones() {
        let skeleton = TestSkeleton(vec![("ik_root", -1, Vec3::ZERO)]);
        let err = BoneHierarchy::build(&skeleton, DEFAULT_IK_MARKER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);

        let err = BoneHierarchy::build(&TestSkeleton(vec![]), DEFAULT_IK_MARKER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
    }

    #[test]
    fn test_forward_parent_reference_rejected() {
        let skeleton = TestSkeleton(vec![("a", 1, Vec3::ZERO), ("b", -1, Vec3::ZERO)]);
        let err = BoneHierarchy::build(&skeleton, DEFAULT_IK_MARKER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
    }

    #[test]
    fn test_empty_marker_keeps_everything() {
        let skeleton = TestSkeleton(vec![("ik", -1, Vec3::ZERO)]);
        let hierarchy = BoneHierarchy::build(&skeleton, "").unwrap();
        assert_eq!(hierarchy.len(), 1);
    }

    #[test]
    fn test_set_anim_pose_unknown_bone() {
        let mut hierarchy = BoneHierarchy::build(&chain(), DEFAULT_IK_MARKER).unwrap();
        hierarchy.link();
        let err = hierarchy
            .set_anim_pose(10, Vec3::ZERO, Quat::IDENTITY)
            .unwrap_err();
        assert_eq!(err, AnimError::UnknownBone { bone: 10 });
    }

    #[test]
    fn test_find_by_name_missing() {
        let hierarchy = BoneHierarchy::build(&chain(), DEFAULT_IK_MARKER).unwrap();
        assert!(hierarchy.find_by_name("tail").is_none());
    }
}
