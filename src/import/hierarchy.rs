use crate::error::ImportError;

use super::types::{FormatVariant, Node};

// ─── Parent resolution ────────────────────────────────────────────────────────

/// Populate `parent` on every node.
///
/// Modern files carry parent indices directly. Legacy files store the tree as
/// (first-child, next-sibling) pointers and the parent indices are derived by
/// a depth-first walk from node 0. A visited guard turns cycles — which would
/// otherwise recurse forever — and unreachable nodes into loud failures.
pub(super) fn resolve_parents(
    nodes: &mut [Node],
    variant: FormatVariant,
) -> Result<(), ImportError> {
    if variant == FormatVariant::Legacy && !nodes.is_empty() {
        let mut visited = vec![false; nodes.len()];
        assign_parents_from_child_sibling(nodes, &mut visited, 0, -1)?;

        if let Some(index) = visited.iter().position(|seen| !seen) {
            return Err(ImportError::Hierarchy {
                detail: format!(
                    "node {index} ({:?}) is not reachable from the root",
                    nodes[index].name
                ),
            });
        }
    }

    for index in 0..nodes.len() {
        let parent_index = nodes[index].parent_index;
        if parent_index > -1 {
            let parent = parent_index as usize;
            if parent >= nodes.len() {
                return Err(ImportError::Hierarchy {
                    detail: format!(
                        "node {index} ({:?}) has parent index {parent_index} but only {} nodes exist",
                        nodes[index].name,
                        nodes.len()
                    ),
                });
            }
            nodes[index].parent = Some(parent);
        }
    }

    Ok(())
}

/// Depth-first reconstruction of an n-ary tree from its binary
/// (child-pointer, sibling-pointer) representation.
///
/// The child branch inherits the current node as parent; the sibling branch
/// inherits the *original* parent — siblings share a parent, they are not
/// each other's parent.
fn assign_parents_from_child_sibling(
    nodes: &mut [Node],
    visited: &mut [bool],
    index: i32,
    parent_index: i32,
) -> Result<(), ImportError> {
    if index == -1 {
        return Ok(());
    }

    if index < 0 || index as usize >= nodes.len() {
        return Err(ImportError::Hierarchy {
            detail: format!(
                "child/sibling index {index} is out of range for {} nodes",
                nodes.len()
            ),
        });
    }

    let current = index as usize;
    if visited[current] {
        return Err(ImportError::Hierarchy {
            detail: format!(
                "cycle detected at node {current} ({:?})",
                nodes[current].name
            ),
        });
    }
    visited[current] = true;

    nodes[current].parent_index = parent_index;
    let child_index = nodes[current].child_index;
    let sibling_index = nodes[current].sibling_index;

    assign_parents_from_child_sibling(nodes, visited, child_index, index)?;
    assign_parents_from_child_sibling(nodes, visited, sibling_index, parent_index)
}

// ─── Hierarchy-adjacent ordering ──────────────────────────────────────────────

/// Node indices stably sorted by `parent_index + 1` (roots first).
///
/// Not a full topological sort, but since parents are declared before their
/// children every child sorts after its parent — which is all the
/// relative-space rewrite needs.
pub(super) fn hierarchy_order(nodes: &[Node]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by_key(|&index| nodes[index].parent_index + 1);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_node(name: &str, child_index: i32, sibling_index: i32) -> Node {
        let mut node = Node::new(name.to_owned());
        node.child_index = child_index;
        node.sibling_index = sibling_index;
        node
    }

    fn modern_node(name: &str, parent_index: i32) -> Node {
        let mut node = Node::new(name.to_owned());
        node.parent_index = parent_index;
        node
    }

    #[test]
    fn given_child_link_when_resolving_then_second_node_is_parented() {
        let mut nodes = vec![legacy_node("root", 1, -1), legacy_node("limb", -1, -1)];
        resolve_parents(&mut nodes, FormatVariant::Legacy).expect("well-formed tree");

        assert_eq!(nodes[0].parent, None);
        assert_eq!(nodes[1].parent, Some(0));
    }

    #[test]
    fn given_sibling_link_when_resolving_then_both_nodes_are_roots() {
        let mut nodes = vec![legacy_node("root", -1, 1), legacy_node("other", -1, -1)];
        resolve_parents(&mut nodes, FormatVariant::Legacy).expect("well-formed tree");

        assert_eq!(nodes[0].parent, None);
        assert_eq!(nodes[1].parent, None);
    }

    #[test]
    fn given_equivalent_encodings_when_resolving_then_parents_match() {
        // root -> {spine -> head, thigh}
        let mut legacy = vec![
            legacy_node("root", 1, -1),
            legacy_node("spine", 2, 3),
            legacy_node("head", -1, -1),
            legacy_node("thigh", -1, -1),
        ];
        let mut modern = vec![
            modern_node("root", -1),
            modern_node("spine", 0),
            modern_node("head", 1),
            modern_node("thigh", 0),
        ];

        resolve_parents(&mut legacy, FormatVariant::Legacy).expect("well-formed tree");
        resolve_parents(&mut modern, FormatVariant::Modern).expect("well-formed table");

        for (left, right) in legacy.iter().zip(modern.iter()) {
            assert_eq!(left.parent, right.parent, "node {:?}", left.name);
        }
    }

    #[test]
    fn given_cyclic_links_when_resolving_then_error_is_raised_instead_of_hanging() {
        let mut nodes = vec![legacy_node("a", 1, -1), legacy_node("b", 0, -1)];
        match resolve_parents(&mut nodes, FormatVariant::Legacy) {
            Err(ImportError::Hierarchy { detail }) => assert!(detail.contains("cycle")),
            other => panic!("expected hierarchy error, got {other:?}"),
        }
    }

    #[test]
    fn given_unreachable_node_when_resolving_then_error_is_raised() {
        let mut nodes = vec![legacy_node("root", -1, -1), legacy_node("island", -1, -1)];
        match resolve_parents(&mut nodes, FormatVariant::Legacy) {
            Err(ImportError::Hierarchy { detail }) => assert!(detail.contains("not reachable")),
            other => panic!("expected hierarchy error, got {other:?}"),
        }
    }

    #[test]
    fn given_out_of_range_parent_when_resolving_then_error_is_raised() {
        let mut nodes = vec![modern_node("root", -1), modern_node("limb", 7)];
        assert!(matches!(
            resolve_parents(&mut nodes, FormatVariant::Modern),
            Err(ImportError::Hierarchy { .. })
        ));
    }

    #[test]
    fn given_resolved_nodes_when_ordering_then_children_follow_parents() {
        let mut nodes = vec![
            modern_node("root", -1),
            modern_node("spine", 0),
            modern_node("head", 1),
            modern_node("thigh", 0),
        ];
        resolve_parents(&mut nodes, FormatVariant::Modern).expect("well-formed table");

        let order = hierarchy_order(&nodes);
        assert_eq!(order, vec![0, 1, 3, 2]);

        let position = |index: usize| order.iter().position(|&i| i == index).unwrap();
        for (index, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                assert!(position(parent) < position(index), "node {:?}", node.name);
            }
        }
    }
}
