//! # crossgraph
//!
//! A code graph store for static cross-referencing of C source trees.
//!
//! The graph is a labelled directed multigraph whose nodes are source entities
//! (files, directories, functions, prototypes, globals, types, fields, enum
//! constructors, constants, macros) and whose edges encode either containment
//! (`Has`: a file contains a function, a struct contains a field) or use
//! (`Use`: a function uses a global, a type references another type).
//!
//! ## Core Principles
//!
//! - **Parser Agnostic**: the store never looks at source text; builders feed
//!   it nodes and edges
//! - **Name Addressed**: nodes are looked up by (name, kind), the way a
//!   cross-referencer resolves symbols
//! - **Zero Magic**: explicit over implicit, always
//!
//! ## Example
//!
//! ```rust
//! use crossgraph::{CrossGraph, EdgeLabel, NodeKey, NodeKind};
//!
//! let mut graph = CrossGraph::new();
//! let dir = graph.create_intermediate_dirs("lib/util.c");
//! let file = NodeKey::new("lib/util.c", NodeKind::File);
//! let func = NodeKey::new("parse_line", NodeKind::Function);
//!
//! graph.add_node(file.clone());
//! graph.add_node(func.clone());
//! graph.add_edge(&dir, &file, EdgeLabel::Has).unwrap();
//! graph.add_edge(&file, &func, EdgeLabel::Has).unwrap();
//! assert!(graph.has_node(&func));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod graph;

// Re-export main types
pub use error::{GraphError, Result};
pub use graph::{
    CrossGraph, Edge, EdgeId, EdgeLabel, GraphStats, Node, NodeId, NodeInfo, NodeKey, NodeKind,
    NodeProp, SourceLoc,
};
