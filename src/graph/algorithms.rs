//! Navigation helpers over the containment and use relations.
//!
//! Thin wrappers over the store's adjacency indexes plus a containment-tree
//! consistency check used by the integration suites.

use crate::graph::{CrossGraph, EdgeLabel, NodeKey, NodeKind};
use std::collections::HashSet;

/// The unique `Has` parent of a node, if any.
///
/// A well-formed graph gives every non-root, non-sink node exactly one parent;
/// this returns the first when the graph is malformed.
pub fn parent(graph: &CrossGraph, key: &NodeKey) -> Option<NodeKey> {
    graph.predecessors(key, EdgeLabel::Has).into_iter().next()
}

/// The entities contained in a node (a file's definitions, a type's fields).
pub fn children(graph: &CrossGraph, key: &NodeKey) -> Vec<NodeKey> {
    graph.successors(key, EdgeLabel::Has)
}

/// The entities that use a node.
pub fn users(graph: &CrossGraph, key: &NodeKey) -> Vec<NodeKey> {
    graph.predecessors(key, EdgeLabel::Use)
}

/// The entities a node uses.
pub fn use_targets(graph: &CrossGraph, key: &NodeKey) -> Vec<NodeKey> {
    graph.successors(key, EdgeLabel::Use)
}

/// Check containment-tree consistency.
///
/// Every node other than the root and the synthetic sinks must have exactly
/// one incoming `Has` edge, and following parents from any node must reach the
/// root without revisiting a node. Returns a description of each violation;
/// empty means consistent.
pub fn check_containment(graph: &CrossGraph) -> Vec<String> {
    let mut violations = Vec::new();

    for node in graph.nodes() {
        let key = &node.key;
        if key.kind == NodeKind::Root || key.kind.is_sink() {
            continue;
        }
        let parents = graph.predecessors(key, EdgeLabel::Has);
        if parents.len() != 1 {
            violations.push(format!(
                "{key} has {} containment parents, expected 1",
                parents.len()
            ));
            continue;
        }

        let mut seen: HashSet<NodeKey> = HashSet::new();
        let mut cursor = key.clone();
        loop {
            if !seen.insert(cursor.clone()) {
                violations.push(format!("containment cycle through {key}"));
                break;
            }
            match parent(graph, &cursor) {
                Some(up) => cursor = up,
                None => {
                    if cursor.kind != NodeKind::Root {
                        violations.push(format!("{key} is not rooted (stops at {cursor})"));
                    }
                    break;
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, kind: NodeKind) -> NodeKey {
        NodeKey::new(name, kind)
    }

    fn sample_graph() -> CrossGraph {
        let mut g = CrossGraph::new();
        g.add_node(key("a.c", NodeKind::File));
        g.add_node(key("f", NodeKind::Function));
        g.add_node(key("x", NodeKind::Global));
        g.add_edge(&CrossGraph::root(), &key("a.c", NodeKind::File), EdgeLabel::Has)
            .unwrap();
        g.add_edge(
            &key("a.c", NodeKind::File),
            &key("f", NodeKind::Function),
            EdgeLabel::Has,
        )
        .unwrap();
        g.add_edge(
            &key("a.c", NodeKind::File),
            &key("x", NodeKind::Global),
            EdgeLabel::Has,
        )
        .unwrap();
        g.add_edge(
            &key("f", NodeKind::Function),
            &key("x", NodeKind::Global),
            EdgeLabel::Use,
        )
        .unwrap();
        g
    }

    #[test]
    fn test_parent_and_children() {
        let g = sample_graph();
        assert_eq!(
            parent(&g, &key("f", NodeKind::Function)),
            Some(key("a.c", NodeKind::File))
        );
        let mut kids = children(&g, &key("a.c", NodeKind::File));
        kids.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            kids,
            vec![key("f", NodeKind::Function), key("x", NodeKind::Global)]
        );
    }

    #[test]
    fn test_users_and_targets() {
        let g = sample_graph();
        assert_eq!(
            users(&g, &key("x", NodeKind::Global)),
            vec![key("f", NodeKind::Function)]
        );
        assert_eq!(
            use_targets(&g, &key("f", NodeKind::Function)),
            vec![key("x", NodeKind::Global)]
        );
    }

    #[test]
    fn test_check_containment_clean() {
        let g = sample_graph();
        assert!(check_containment(&g).is_empty());
    }

    #[test]
    fn test_check_containment_orphan() {
        let mut g = sample_graph();
        g.add_node(key("orphan", NodeKind::Function));
        let violations = check_containment(&g);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("orphan (Function)"));
    }

    #[test]
    fn test_check_containment_ignores_sinks() {
        let mut g = sample_graph();
        g.add_node(key("DUPE", NodeKind::Dupe));
        g.add_node(key("NOT_FOUND", NodeKind::NotFound));
        assert!(check_containment(&g).is_empty());
    }
}
