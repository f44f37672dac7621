//! The code graph store: name+kind addressed nodes and labelled edges.

use super::types::{Edge, EdgeId, EdgeLabel, Node, NodeId, NodeInfo, NodeKey, NodeKind};
use crate::error::{GraphError, Result};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// The code graph built by the cross-reference engine.
///
/// Nodes are addressed externally by [`NodeKey`] (name, kind) and internally by
/// a dense monotonic [`NodeId`]. Adjacency indexes per direction give O(1)
/// neighbour enumeration. The store is a labelled multigraph, except that
/// adding an edge with the same endpoints and label twice is a no-op; this
/// keeps post-passes idempotent.
///
/// The store is mutable during a build and handed to the consumer by value
/// afterwards.
#[derive(Debug)]
pub struct CrossGraph {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    index: HashMap<NodeKey, NodeId>,
    adjacency_out: HashMap<NodeId, HashSet<EdgeId>>,
    adjacency_in: HashMap<NodeId, HashSet<EdgeId>>,
    node_counter: NodeId,
    edge_counter: EdgeId,
    gensym_counter: u64,
}

/// Aggregate node and edge counts, for progress reporting and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    /// Total node count
    pub nodes: usize,
    /// Total edge count
    pub edges: usize,
    /// Containment edge count
    pub has_edges: usize,
    /// Use edge count
    pub use_edges: usize,
}

impl Default for CrossGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossGraph {
    /// The root of the containment tree.
    pub fn root() -> NodeKey {
        NodeKey::new("/", NodeKind::Root)
    }

    /// Create an empty graph holding only the root node.
    pub fn new() -> Self {
        let mut graph = Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            index: HashMap::new(),
            adjacency_out: HashMap::new(),
            adjacency_in: HashMap::new(),
            node_counter: 0,
            edge_counter: 0,
            gensym_counter: 0,
        };
        graph.add_node(Self::root());
        graph
    }

    fn next_node_id(&mut self) -> NodeId {
        let id = self.node_counter;
        self.node_counter += 1;
        id
    }

    fn next_edge_id(&mut self) -> EdgeId {
        let id = self.edge_counter;
        self.edge_counter += 1;
        id
    }

    /// Generate a unique name `s__<counter>`.
    ///
    /// The counter is store-wide and monotonic, so collisions are impossible
    /// and independent builds start from zero.
    pub fn gensym(&mut self, s: &str) -> String {
        self.gensym_counter += 1;
        format!("{s}__{}", self.gensym_counter)
    }

    /// Add a node to the graph.
    ///
    /// Idempotent: adding an existing key is a no-op returning the existing id.
    pub fn add_node(&mut self, key: NodeKey) -> NodeId {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.next_node_id();
        debug!("Adding node: id={id}, key={key}");
        self.index.insert(key.clone(), id);
        self.nodes.insert(id, Node::new(id, key));
        id
    }

    /// Check whether a node exists.
    pub fn has_node(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    /// Look up the internal id of a node.
    pub fn node_id(&self, key: &NodeKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Look up the key of a node by internal id.
    pub fn node_key(&self, id: NodeId) -> Option<&NodeKey> {
        self.nodes.get(&id).map(|n| &n.key)
    }

    /// Add an edge between two existing nodes.
    ///
    /// Idempotent per (source, target, label): re-adding returns the existing
    /// edge id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EndpointMissing`] if either endpoint is absent.
    pub fn add_edge(&mut self, src: &NodeKey, dst: &NodeKey, label: EdgeLabel) -> Result<EdgeId> {
        let source_id = self.node_id(src).ok_or_else(|| GraphError::EndpointMissing {
            source_node: src.to_string(),
            endpoint: src.to_string(),
            label: label.to_string(),
        })?;
        let target_id = self.node_id(dst).ok_or_else(|| GraphError::EndpointMissing {
            source_node: src.to_string(),
            endpoint: dst.to_string(),
            label: label.to_string(),
        })?;

        if let Some(existing) = self.find_edge(source_id, target_id, label) {
            trace!("Edge already present: {src} -{label}-> {dst}");
            return Ok(existing);
        }

        let edge_id = self.next_edge_id();
        debug!("Adding edge: {src} -{label}-> {dst}");
        self.edges
            .insert(edge_id, Edge::new(edge_id, source_id, target_id, label));
        self.adjacency_out
            .entry(source_id)
            .or_default()
            .insert(edge_id);
        self.adjacency_in
            .entry(target_id)
            .or_default()
            .insert(edge_id);
        Ok(edge_id)
    }

    fn find_edge(&self, source_id: NodeId, target_id: NodeId, label: EdgeLabel) -> Option<EdgeId> {
        let out = self.adjacency_out.get(&source_id)?;
        out.iter().copied().find(|eid| {
            self.edges
                .get(eid)
                .is_some_and(|e| e.target_id == target_id && e.label == label)
        })
    }

    /// Check whether an edge with the given endpoints and label exists.
    pub fn has_edge(&self, src: &NodeKey, dst: &NodeKey, label: EdgeLabel) -> bool {
        match (self.node_id(src), self.node_id(dst)) {
            (Some(s), Some(t)) => self.find_edge(s, t, label).is_some(),
            _ => false,
        }
    }

    /// Attach metadata to a node. One-shot: a second attach is an error.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node is absent, or
    /// [`GraphError::InfoAlreadyAttached`] on a second attach.
    pub fn attach_info(&mut self, key: &NodeKey, info: NodeInfo) -> Result<()> {
        let id = self.node_id(key).ok_or_else(|| GraphError::NodeNotFound {
            node: key.to_string(),
        })?;
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| GraphError::NodeNotFound {
                node: key.to_string(),
            })?;
        if node.info.is_some() {
            return Err(GraphError::InfoAlreadyAttached {
                node: key.to_string(),
            });
        }
        node.info = Some(info);
        Ok(())
    }

    /// Read back the metadata attached to a node.
    pub fn node_info(&self, key: &NodeKey) -> Option<&NodeInfo> {
        let id = self.node_id(key)?;
        self.nodes.get(&id)?.info.as_ref()
    }

    /// Enumerate the sources of edges with the given label pointing at `key`.
    pub fn predecessors(&self, key: &NodeKey, label: EdgeLabel) -> Vec<NodeKey> {
        let Some(id) = self.node_id(key) else {
            return Vec::new();
        };
        let Some(in_edges) = self.adjacency_in.get(&id) else {
            return Vec::new();
        };
        in_edges
            .iter()
            .filter_map(|eid| self.edges.get(eid))
            .filter(|e| e.label == label)
            .filter_map(|e| self.node_key(e.source_id).cloned())
            .collect()
    }

    /// Enumerate the targets of edges with the given label leaving `key`.
    pub fn successors(&self, key: &NodeKey, label: EdgeLabel) -> Vec<NodeKey> {
        let Some(id) = self.node_id(key) else {
            return Vec::new();
        };
        let Some(out_edges) = self.adjacency_out.get(&id) else {
            return Vec::new();
        };
        out_edges
            .iter()
            .filter_map(|eid| self.edges.get(eid))
            .filter(|e| e.label == label)
            .filter_map(|e| self.node_key(e.target_id).cloned())
            .collect()
    }

    /// Delete each listed sink node if and only if it has zero incident edges
    /// of any label. Idempotent.
    pub fn remove_empty(&mut self, sinks: &[NodeKey]) {
        for key in sinks {
            let Some(id) = self.node_id(key) else {
                continue;
            };
            let incident = self.adjacency_out.get(&id).map_or(0, HashSet::len)
                + self.adjacency_in.get(&id).map_or(0, HashSet::len);
            if incident == 0 {
                debug!("Removing empty sink: {key}");
                self.index.remove(key);
                self.nodes.remove(&id);
                self.adjacency_out.remove(&id);
                self.adjacency_in.remove(&id);
            }
        }
    }

    /// Ensure `Dir` nodes exist for every ancestor directory of a
    /// repository-relative file path, each with a `Has` edge from its parent
    /// (the outermost from the root). Returns the key of the innermost
    /// directory, or the root for a top-level file.
    ///
    /// Paths use `/` separators regardless of platform.
    pub fn create_intermediate_dirs(&mut self, path: &str) -> NodeKey {
        let mut parent = Self::root();
        let Some((dir, _file)) = path.rsplit_once('/') else {
            return parent;
        };
        let mut prefix = String::new();
        for component in dir.split('/').filter(|c| !c.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(component);
            let key = NodeKey::new(prefix.clone(), NodeKind::Dir);
            if !self.has_node(&key) {
                self.add_node(key.clone());
                // Dir nodes are created in path order, so the parent edge can
                // never fail here.
                let _ = self.add_edge(&parent, &key, EdgeLabel::Has);
            }
            parent = key;
        }
        parent
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over all edges.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Iterate over all edges as (source, target, label) key triples.
    pub fn edge_keys(&self) -> impl Iterator<Item = (&NodeKey, &NodeKey, EdgeLabel)> {
        self.edges.values().filter_map(|e| {
            let src = self.node_key(e.source_id)?;
            let dst = self.node_key(e.target_id)?;
            Some((src, dst, e.label))
        })
    }

    /// Aggregate node and edge counts.
    pub fn stats(&self) -> GraphStats {
        let has_edges = self
            .edges
            .values()
            .filter(|e| e.label == EdgeLabel::Has)
            .count();
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            has_edges,
            use_edges: self.edges.len() - has_edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::SourceLoc;

    fn key(name: &str, kind: NodeKind) -> NodeKey {
        NodeKey::new(name, kind)
    }

    #[test]
    fn test_add_node_idempotent() {
        let mut g = CrossGraph::new();
        let a = g.add_node(key("f", NodeKind::Function));
        let b = g.add_node(key("f", NodeKind::Function));
        assert_eq!(a, b);
        assert_eq!(g.stats().nodes, 2); // root + f
    }

    #[test]
    fn test_same_name_different_kind_are_distinct() {
        let mut g = CrossGraph::new();
        let a = g.add_node(key("f", NodeKind::Function));
        let b = g.add_node(key("f", NodeKind::Prototype));
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let mut g = CrossGraph::new();
        g.add_node(key("f", NodeKind::Function));
        let err = g
            .add_edge(
                &key("f", NodeKind::Function),
                &key("g", NodeKind::Function),
                EdgeLabel::Use,
            )
            .unwrap_err();
        assert!(err.to_string().contains("g (Function)"));
    }

    #[test]
    fn test_add_edge_idempotent() {
        let mut g = CrossGraph::new();
        g.add_node(key("f", NodeKind::Function));
        g.add_node(key("x", NodeKind::Global));
        let e1 = g
            .add_edge(
                &key("f", NodeKind::Function),
                &key("x", NodeKind::Global),
                EdgeLabel::Use,
            )
            .unwrap();
        let e2 = g
            .add_edge(
                &key("f", NodeKind::Function),
                &key("x", NodeKind::Global),
                EdgeLabel::Use,
            )
            .unwrap();
        assert_eq!(e1, e2);
        assert_eq!(g.stats().use_edges, 1);
    }

    #[test]
    fn test_attach_info_one_shot() {
        let mut g = CrossGraph::new();
        g.add_node(key("x", NodeKind::Global));
        let info = NodeInfo::new(SourceLoc::new("a.c", 1, 0));
        g.attach_info(&key("x", NodeKind::Global), info.clone())
            .unwrap();
        let err = g.attach_info(&key("x", NodeKind::Global), info).unwrap_err();
        assert!(matches!(err, GraphError::InfoAlreadyAttached { .. }));
        assert!(g.node_info(&key("x", NodeKind::Global)).is_some());
    }

    #[test]
    fn test_predecessors_by_label() {
        let mut g = CrossGraph::new();
        g.add_node(key("a.c", NodeKind::File));
        g.add_node(key("f", NodeKind::Function));
        g.add_node(key("x", NodeKind::Global));
        g.add_edge(
            &key("a.c", NodeKind::File),
            &key("f", NodeKind::Function),
            EdgeLabel::Has,
        )
        .unwrap();
        g.add_edge(
            &key("f", NodeKind::Function),
            &key("x", NodeKind::Global),
            EdgeLabel::Use,
        )
        .unwrap();

        let users = g.predecessors(&key("x", NodeKind::Global), EdgeLabel::Use);
        assert_eq!(users, vec![key("f", NodeKind::Function)]);
        assert!(g
            .predecessors(&key("x", NodeKind::Global), EdgeLabel::Has)
            .is_empty());
    }

    #[test]
    fn test_remove_empty_only_when_edge_free() {
        let mut g = CrossGraph::new();
        let dupe = key("DUPE", NodeKind::Dupe);
        let not_found = key("NOT_FOUND", NodeKind::NotFound);
        g.add_node(dupe.clone());
        g.add_node(not_found.clone());
        g.add_node(key("f", NodeKind::Function));
        g.add_edge(&key("f", NodeKind::Function), &dupe, EdgeLabel::Use)
            .unwrap();

        g.remove_empty(&[dupe.clone(), not_found.clone()]);
        assert!(g.has_node(&dupe));
        assert!(!g.has_node(&not_found));

        // Idempotent.
        g.remove_empty(&[dupe.clone(), not_found]);
        assert!(g.has_node(&dupe));
    }

    #[test]
    fn test_create_intermediate_dirs() {
        let mut g = CrossGraph::new();
        let innermost = g.create_intermediate_dirs("a/b/c/f.c");
        assert_eq!(innermost, key("a/b/c", NodeKind::Dir));
        assert!(g.has_node(&key("a", NodeKind::Dir)));
        assert!(g.has_node(&key("a/b", NodeKind::Dir)));
        assert!(g.has_edge(&CrossGraph::root(), &key("a", NodeKind::Dir), EdgeLabel::Has));
        assert!(g.has_edge(
            &key("a", NodeKind::Dir),
            &key("a/b", NodeKind::Dir),
            EdgeLabel::Has
        ));

        // Second file under the same tree reuses the dirs.
        let again = g.create_intermediate_dirs("a/b/c/g.c");
        assert_eq!(again, key("a/b/c", NodeKind::Dir));
        assert_eq!(
            g.successors(&key("a", NodeKind::Dir), EdgeLabel::Has).len(),
            1
        );
    }

    #[test]
    fn test_create_intermediate_dirs_top_level_file() {
        let mut g = CrossGraph::new();
        assert_eq!(g.create_intermediate_dirs("main.c"), CrossGraph::root());
    }

    #[test]
    fn test_gensym_monotonic() {
        let mut g = CrossGraph::new();
        assert_eq!(g.gensym("x"), "x__1");
        assert_eq!(g.gensym("x"), "x__2");
        assert_eq!(g.gensym("y"), "y__3");

        // Fresh store, fresh counter.
        let mut g2 = CrossGraph::new();
        assert_eq!(g2.gensym("x"), "x__1");
    }
}
