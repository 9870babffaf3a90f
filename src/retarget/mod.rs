mod channels;
mod names;
mod skeleton;

use std::collections::HashMap;

use nalgebra::{Matrix4, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::import::AnimationDocument;
use crate::math::decompose_trs;

// Re-export public types for callers of this module.
pub use channels::{ChannelSink, Keyframe, KeyframeBuffer};
pub use names::strip_node_prefix;
pub use skeleton::{TargetBone, TargetSkeleton};

// ─── Report types ─────────────────────────────────────────────────────────────

/// Severity level used by retarget issues.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single non-fatal issue produced while retargeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetargetIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
}

/// Whether the retarget produced any keyframes.
///
/// A skeleton that matches none of the animation's nodes is an expected,
/// recoverable condition for the caller to surface — never an error here.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RetargetStatus {
    Retargeted,
    NothingToRetarget,
}

/// Summary returned after retargeting a document onto a skeleton.
#[derive(Debug, Clone, Serialize)]
pub struct RetargetReport {
    pub status: RetargetStatus,
    /// Matched `(node name, bone name)` pairs, root-to-leaf.
    pub bound_bones: Vec<(String, String)>,
    /// Document nodes with no matching bone; common with partial skeletons.
    pub unmatched_nodes: Vec<String>,
    pub frame_count: usize,
    pub issues: Vec<RetargetIssue>,
}

// ─── Options ──────────────────────────────────────────────────────────────────

/// Host-specific configuration for the retargeting stage.
#[derive(Debug, Clone, Copy)]
pub struct RetargetOptions {
    /// Correction applied to parentless nodes' transforms, for hosts whose
    /// default forward axis differs from the animation's authoring space.
    pub forward_rotation: UnitQuaternion<f32>,
}

impl Default for RetargetOptions {
    fn default() -> Self {
        Self {
            forward_rotation: UnitQuaternion::identity(),
        }
    }
}

// ─── Retargeting ──────────────────────────────────────────────────────────────

struct RetargetBinding {
    node_index: usize,
    bone_index: usize,
    /// Inverse of the bone's parent-relative bind matrix, reused every frame.
    bind_relative_inv: Matrix4<f32>,
}

/// Map an animation document onto a target skeleton and emit per-frame
/// decomposed keyframes through `sink`.
///
/// Nodes and bones are matched by normalized name (`normalize` strips the
/// cosmetic prefixes the caller cares about). Unmatched nodes are skipped.
/// Per matched bone, the delta between its parent-relative bind pose and the
/// imported transform is decomposed into translation, rotation and per-axis
/// scale for every frame.
pub fn retarget_animation(
    document: &AnimationDocument,
    skeleton: &TargetSkeleton,
    normalize: &dyn Fn(&str) -> String,
    options: &RetargetOptions,
    sink: &mut dyn ChannelSink,
) -> RetargetReport {
    let mut issues = Vec::new();

    // Later bones win on duplicate normalized names, matching host lookups.
    let mut bone_lookup = HashMap::<String, usize>::new();
    for (index, bone) in skeleton.bones.iter().enumerate() {
        bone_lookup.insert(normalize(&bone.name), index);
    }

    let mut matched = Vec::<(usize, usize)>::new();
    let mut unmatched_nodes = Vec::new();
    for &node_index in &document.hierarchy_order {
        let node = &document.nodes[node_index];
        match bone_lookup.get(&normalize(&node.name)) {
            Some(&bone_index) => matched.push((node_index, bone_index)),
            None => unmatched_nodes.push(node.name.clone()),
        }
    }

    if matched.is_empty() {
        tracing::info!(
            document = %document.name,
            "no animation nodes matched the target skeleton"
        );
        return RetargetReport {
            status: RetargetStatus::NothingToRetarget,
            bound_bones: Vec::new(),
            unmatched_nodes,
            frame_count: document.frame_count,
            issues,
        };
    }

    // Root-to-leaf over the target skeleton; bind poses are static, so each
    // bone's parent-relative bind matrix only needs the parent's rest pose.
    matched.sort_by_key(|&(_, bone_index)| skeleton.bone_depth(bone_index));

    let bindings: Vec<RetargetBinding> = matched
        .iter()
        .map(|&(node_index, bone_index)| {
            let bone = &skeleton.bones[bone_index];
            let bind_relative = match bone.parent {
                Some(parent) => {
                    invert_or_warn(&skeleton.bones[parent].rest_matrix, &bone.name, &mut issues)
                        * bone.rest_matrix
                }
                None => bone.rest_matrix,
            };

            RetargetBinding {
                node_index,
                bone_index,
                bind_relative_inv: invert_or_warn(&bind_relative, &bone.name, &mut issues),
            }
        })
        .collect();

    let forward_matrix = options.forward_rotation.to_homogeneous();
    for (frame_index, frame) in document.frames.iter().enumerate() {
        for binding in &bindings {
            let mut imported = frame.transforms[binding.node_index].to_matrix();
            if document.nodes[binding.node_index].parent.is_none() {
                imported = forward_matrix * imported;
            }

            let delta = binding.bind_relative_inv * imported;
            let (translation, rotation, scale) = decompose_trs(&delta);
            sink.write_keyframe(binding.bone_index, frame_index, translation, rotation, scale);
        }
    }

    let bound_bones = bindings
        .iter()
        .map(|binding| {
            (
                document.nodes[binding.node_index].name.clone(),
                skeleton.bones[binding.bone_index].name.clone(),
            )
        })
        .collect();

    tracing::debug!(
        document = %document.name,
        bound = bindings.len(),
        skipped = unmatched_nodes.len(),
        frames = document.frame_count,
        "retargeted animation"
    );

    RetargetReport {
        status: RetargetStatus::Retargeted,
        bound_bones,
        unmatched_nodes,
        frame_count: document.frame_count,
        issues,
    }
}

/// Invert a matrix, recording a warning and falling back to identity when it
/// is singular. A degenerate bind pose must not abort the import.
fn invert_or_warn(
    matrix: &Matrix4<f32>,
    bone_name: &str,
    issues: &mut Vec<RetargetIssue>,
) -> Matrix4<f32> {
    match matrix.try_inverse() {
        Some(inverse) => inverse,
        None => {
            issues.push(RetargetIssue {
                severity: Severity::Warning,
                code: "DEGENERATE_BIND_MATRIX".to_string(),
                message: format!(
                    "bind matrix for bone '{bone_name}' is not invertible; using identity"
                ),
            });
            Matrix4::identity()
        }
    }
}
