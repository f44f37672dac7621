//! Core graph types and operations.
//!
//! This module defines the fundamental building blocks:
//! - [`NodeKey`]: The external (name, kind) address of a code entity
//! - [`Edge`]: Directed `Has`/`Use` relationships between nodes
//! - [`CrossGraph`]: The graph store itself

pub mod algorithms;
mod store;
mod types;

pub use store::{CrossGraph, GraphStats};
pub use types::{
    Edge, EdgeId, EdgeLabel, Node, NodeId, NodeInfo, NodeKey, NodeKind, NodeProp, SourceLoc,
};
