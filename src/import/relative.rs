use super::types::{FrameData, Node};

// ─── Parent-relative rewrite ──────────────────────────────────────────────────

/// Rewrite every frame's absolute transforms as parent-relative ones.
///
/// Applies only to the modern layout — legacy files are parent-relative at
/// the source level already, and converting them again would double-apply the
/// parent inversion.
///
/// Walks the hierarchy-adjacent order in reverse so every node is rewritten
/// before its parent is. Children therefore always read their parent's
/// still-absolute transform, and a parent's own rewrite cannot corrupt its
/// descendants.
pub(super) fn make_parent_relative(frames: &mut [FrameData], nodes: &[Node], order: &[usize]) {
    for frame in frames {
        for &index in order.iter().rev() {
            let Some(parent) = nodes[index].parent else {
                continue;
            };
            let parent_transform = frame.transforms[parent];
            frame.transforms[index] = parent_transform
                .inverse_safe()
                .compose(&frame.transforms[index]);
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{UnitQuaternion, Vector3};

    use crate::math::Transform;

    use super::super::types::Node;
    use super::*;

    fn node(name: &str, parent: Option<usize>) -> Node {
        let mut node = Node::new(name.to_owned());
        node.parent = parent;
        node.parent_index = parent.map_or(-1, |index| index as i32);
        node
    }

    fn pose(x: f32, y: f32, z: f32) -> Transform {
        Transform {
            translation: Vector3::new(x, y, z),
            rotation: UnitQuaternion::identity(),
            scale: 1.0,
        }
    }

    #[test]
    fn given_root_only_document_when_converting_then_root_is_untouched() {
        let nodes = vec![node("root", None)];
        let original = Transform {
            translation: Vector3::new(1.0, 2.0, 3.0),
            rotation: UnitQuaternion::from_euler_angles(0.4, 0.0, 0.1),
            scale: 2.0,
        };
        let mut frames = vec![FrameData {
            transforms: vec![original],
        }];

        // Idempotent on roots no matter how often it runs.
        make_parent_relative(&mut frames, &nodes, &[0]);
        make_parent_relative(&mut frames, &nodes, &[0]);

        assert_eq!(frames[0].transforms[0], original);
    }

    #[test]
    fn given_parented_chain_when_converting_then_children_become_relative() {
        let nodes = vec![node("root", None), node("limb", Some(0))];
        let mut frames = vec![FrameData {
            transforms: vec![pose(0.0, 1.0, 0.0), pose(2.0, 1.0, 0.0)],
        }];

        make_parent_relative(&mut frames, &nodes, &[0, 1]);

        assert_eq!(frames[0].transforms[0], pose(0.0, 1.0, 0.0));
        let relative = frames[0].transforms[1];
        assert!((relative.translation - Vector3::new(2.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn given_three_level_chain_when_converting_then_grandchild_uses_absolute_parent() {
        let nodes = vec![
            node("root", None),
            node("mid", Some(0)),
            node("tip", Some(1)),
        ];
        let mut frames = vec![FrameData {
            transforms: vec![pose(0.0, 1.0, 0.0), pose(0.0, 2.0, 0.0), pose(0.0, 4.0, 0.0)],
        }];

        make_parent_relative(&mut frames, &nodes, &[0, 1, 2]);

        // Each delta is against the parent's pre-rewrite absolute transform.
        assert!((frames[0].transforms[1].translation - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        assert!((frames[0].transforms[2].translation - Vector3::new(0.0, 2.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn given_degenerate_parent_scale_when_converting_then_child_passes_through() {
        let nodes = vec![node("root", None), node("limb", Some(0))];
        let mut degenerate_root = pose(5.0, 0.0, 0.0);
        degenerate_root.scale = 0.0;
        let child = pose(1.0, 2.0, 3.0);
        let mut frames = vec![FrameData {
            transforms: vec![degenerate_root, child],
        }];

        make_parent_relative(&mut frames, &nodes, &[0, 1]);

        // Identity fallback: the child keeps its absolute transform.
        assert_eq!(frames[0].transforms[1], child);
    }
}
