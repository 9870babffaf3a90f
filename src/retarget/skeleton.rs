use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::Matrix4;

// ─── Target skeleton descriptor ───────────────────────────────────────────────

/// One bone of the skeleton an animation is retargeted onto.
#[derive(Debug, Clone)]
pub struct TargetBone {
    pub name: String,
    /// Index of the parent bone within the skeleton, `None` for roots.
    pub parent: Option<usize>,
    /// Rest (bind) pose in the skeleton's own coordinate space.
    pub rest_matrix: Matrix4<f32>,
}

/// Ordered bone list describing a retarget destination.
///
/// Hosts hand one of these to the retargeter; it is read once before frame
/// processing starts and never mutated.
#[derive(Debug, Clone, Default)]
pub struct TargetSkeleton {
    pub bones: Vec<TargetBone>,
}

impl TargetSkeleton {
    /// Wrap an explicit bone list (host embedders, tests).
    pub fn from_bones(bones: Vec<TargetBone>) -> Self {
        Self { bones }
    }

    /// Parent-chain depth of a bone (roots are depth 0).
    pub fn bone_depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.bones[index].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.bones[parent].parent;
        }
        depth
    }

    /// Load the skeleton of a glTF/GLB file's skin.
    ///
    /// Uses the skin named `skin_name`, or the first skin when `None`. Bone
    /// rest matrices are the joints' world matrices; parent links are kept
    /// only between nodes that are both part of the skin.
    pub fn from_gltf(path: &Path, skin_name: Option<&str>) -> Result<Self> {
        let (document, _buffers, _images) =
            gltf::import(path).with_context(|| format!("failed to load glTF: {}", path.display()))?;

        let skin = match skin_name {
            Some(name) => document
                .skins()
                .find(|skin| skin.name() == Some(name))
                .with_context(|| format!("skin {name:?} not found in {}", path.display()))?,
            None => document
                .skins()
                .next()
                .with_context(|| format!("no skins found in {}", path.display()))?,
        };

        let node_count = document.nodes().count();
        let parent_map = collect_parent_index_map(&document);

        let mut local_matrices = vec![Matrix4::<f32>::identity(); node_count];
        for node in document.nodes() {
            local_matrices[node.index()] = node_local_matrix(&node);
        }
        let world_matrices = compute_node_world_matrices(&local_matrices, &parent_map);

        let joints: Vec<gltf::Node<'_>> = skin.joints().collect();
        let joint_slots: HashMap<usize, usize> = joints
            .iter()
            .enumerate()
            .map(|(slot, joint)| (joint.index(), slot))
            .collect();

        let bones = joints
            .iter()
            .map(|joint| TargetBone {
                name: joint.name().unwrap_or_default().to_owned(),
                parent: nearest_joint_ancestor(joint.index(), &parent_map, &joint_slots),
                rest_matrix: world_matrices[joint.index()],
            })
            .collect();

        Ok(Self { bones })
    }
}

// ─── glTF node helpers ────────────────────────────────────────────────────────

/// Child→parent node index mapping across the whole document.
fn collect_parent_index_map(document: &gltf::Document) -> HashMap<usize, usize> {
    let mut parent_map = HashMap::new();
    for parent in document.nodes() {
        for child in parent.children() {
            parent_map.insert(child.index(), parent.index());
        }
    }
    parent_map
}

fn node_local_matrix(node: &gltf::Node) -> Matrix4<f32> {
    // gltf reports column-major columns.
    let columns = node.transform().matrix();
    Matrix4::from_iterator(columns.iter().flatten().copied())
}

/// Walk up the node hierarchy to the closest ancestor that is also a joint.
fn nearest_joint_ancestor(
    node_index: usize,
    parent_map: &HashMap<usize, usize>,
    joint_slots: &HashMap<usize, usize>,
) -> Option<usize> {
    let mut current = parent_map.get(&node_index).copied();
    while let Some(ancestor) = current {
        if let Some(&slot) = joint_slots.get(&ancestor) {
            return Some(slot);
        }
        current = parent_map.get(&ancestor).copied();
    }
    None
}

/// Compute world matrices from local transforms and parent links.
fn compute_node_world_matrices(
    local_matrices: &[Matrix4<f32>],
    parent_map: &HashMap<usize, usize>,
) -> Vec<Matrix4<f32>> {
    let mut worlds = vec![Matrix4::<f32>::identity(); local_matrices.len()];
    let mut resolved = vec![false; local_matrices.len()];

    for index in 0..local_matrices.len() {
        resolve_world_matrix(index, local_matrices, parent_map, &mut worlds, &mut resolved);
    }

    worlds
}

fn resolve_world_matrix(
    index: usize,
    local_matrices: &[Matrix4<f32>],
    parent_map: &HashMap<usize, usize>,
    worlds: &mut [Matrix4<f32>],
    resolved: &mut [bool],
) {
    if resolved[index] {
        return;
    }

    let world = if let Some(parent_index) = parent_map.get(&index).copied() {
        resolve_world_matrix(parent_index, local_matrices, parent_map, worlds, resolved);
        worlds[parent_index] * local_matrices[index]
    } else {
        local_matrices[index]
    };

    worlds[index] = world;
    resolved[index] = true;
}
