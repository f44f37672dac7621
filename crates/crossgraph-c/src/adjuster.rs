//! Post-pass: propagate users of each definition onto its declaration
//! counterpart.
//!
//! A consumer that navigates by declaration (prototype, extern global,
//! typedef) sees no callers otherwise: all use edges point at the definition.
//! This pass binds each declaration to its definition with a def-to-decl use
//! edge and mirrors every user of the definition onto the declaration.

use crate::symbols::{Tables, STRUCT_PREFIX, TYPEDEF_PREFIX};
use crossgraph::{CrossGraph, EdgeLabel, NodeKey, NodeKind};

/// For each declaration node with a matching definition, add a use edge from
/// the definition to the declaration, plus one from every use-predecessor of
/// the definition.
///
/// Declaration/definition pairings: prototype to function, extern global to
/// global, typedef `T__x` to struct tag `S__x`. Duplicates stay out of the
/// propagation entirely. Running this twice yields the same graph as running
/// it once.
pub fn propagate_users_to_decls(graph: &mut CrossGraph, tables: &Tables) -> crossgraph::Result<()> {
    let pairs: Vec<(NodeKey, NodeKey)> = graph
        .nodes()
        .filter_map(|node| {
            let decl = node.key.clone();
            let def = match decl.kind {
                NodeKind::Prototype => NodeKey::new(decl.name.clone(), NodeKind::Function),
                NodeKind::GlobalExtern => NodeKey::new(decl.name.clone(), NodeKind::Global),
                NodeKind::Type => {
                    let tag = decl.name.strip_prefix(TYPEDEF_PREFIX)?;
                    NodeKey::new(format!("{STRUCT_PREFIX}{tag}"), NodeKind::Type)
                }
                _ => return None,
            };
            Some((decl, def))
        })
        .collect();

    for (decl, def) in pairs {
        if !graph.has_node(&def) || tables.is_dupe(&decl) || tables.is_dupe(&def) {
            continue;
        }
        graph.add_edge(&def, &decl, EdgeLabel::Use)?;
        for user in graph.predecessors(&def, EdgeLabel::Use) {
            if tables.is_dupe(&user) {
                continue;
            }
            graph.add_edge(&user, &decl, EdgeLabel::Use)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, kind: NodeKind) -> NodeKey {
        NodeKey::new(name, kind)
    }

    fn graph_with_proto_and_def() -> CrossGraph {
        let mut g = CrossGraph::new();
        g.add_node(key("f", NodeKind::Function));
        g.add_node(key("f", NodeKind::Prototype));
        g.add_node(key("caller", NodeKind::Function));
        g.add_edge(
            &key("caller", NodeKind::Function),
            &key("f", NodeKind::Function),
            EdgeLabel::Use,
        )
        .unwrap();
        g
    }

    #[test]
    fn test_propagates_users_to_prototype() {
        let mut g = graph_with_proto_and_def();
        propagate_users_to_decls(&mut g, &Tables::new()).unwrap();

        assert!(g.has_edge(
            &key("f", NodeKind::Function),
            &key("f", NodeKind::Prototype),
            EdgeLabel::Use
        ));
        assert!(g.has_edge(
            &key("caller", NodeKind::Function),
            &key("f", NodeKind::Prototype),
            EdgeLabel::Use
        ));
    }

    #[test]
    fn test_idempotent() {
        let mut g = graph_with_proto_and_def();
        propagate_users_to_decls(&mut g, &Tables::new()).unwrap();
        let edges_once = g.stats().edges;
        propagate_users_to_decls(&mut g, &Tables::new()).unwrap();
        assert_eq!(g.stats().edges, edges_once);
    }

    #[test]
    fn test_typedef_pairs_with_struct_tag() {
        let mut g = CrossGraph::new();
        g.add_node(key("S__p", NodeKind::Type));
        g.add_node(key("T__p", NodeKind::Type));
        g.add_node(key("f", NodeKind::Function));
        g.add_edge(
            &key("f", NodeKind::Function),
            &key("S__p", NodeKind::Type),
            EdgeLabel::Use,
        )
        .unwrap();

        propagate_users_to_decls(&mut g, &Tables::new()).unwrap();
        assert!(g.has_edge(
            &key("f", NodeKind::Function),
            &key("T__p", NodeKind::Type),
            EdgeLabel::Use
        ));
        assert!(g.has_edge(
            &key("S__p", NodeKind::Type),
            &key("T__p", NodeKind::Type),
            EdgeLabel::Use
        ));
    }

    #[test]
    fn test_decl_without_definition_untouched() {
        let mut g = CrossGraph::new();
        g.add_node(key("lonely", NodeKind::Prototype));
        propagate_users_to_decls(&mut g, &Tables::new()).unwrap();
        assert_eq!(g.stats().use_edges, 0);
    }

    #[test]
    fn test_dupes_stay_out() {
        let mut g = graph_with_proto_and_def();
        let mut tables = Tables::new();
        tables.mark_dupe(key("f", NodeKind::Prototype));
        propagate_users_to_decls(&mut g, &tables).unwrap();
        assert_eq!(g.stats().use_edges, 1); // only the pre-existing caller edge
    }
}
