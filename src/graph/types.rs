//! Core graph types: node keys, kinds, edges, and node info.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unique identifier for a node (monotonic counter).
pub type NodeId = u64;

/// Unique identifier for an edge (monotonic counter).
pub type EdgeId = u64;

/// Kind of a source entity in the code graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of the containment tree
    Root,
    /// Source directory
    Dir,
    /// Source file
    File,
    /// Function definition
    Function,
    /// Function prototype (declaration without body)
    Prototype,
    /// Global variable definition
    Global,
    /// Extern global declaration
    GlobalExtern,
    /// Struct, union, enum, or typedef (flattened tag spaces, see [`NodeKey`])
    Type,
    /// Struct or union member
    Field,
    /// Enum constructor
    Constructor,
    /// `#define` of a constant
    Constant,
    /// Function-like macro
    Macro,
    /// Sink for unresolved references
    NotFound,
    /// Sink for duplicate definitions
    Dupe,
    /// Sink for parse problems
    Pb,
}

impl NodeKind {
    /// Whether this kind is a synthetic sink rather than a real source entity.
    pub fn is_sink(self) -> bool {
        matches!(self, NodeKind::NotFound | NodeKind::Dupe | NodeKind::Pb)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeKind::Root => "Root",
            NodeKind::Dir => "Dir",
            NodeKind::File => "File",
            NodeKind::Function => "Function",
            NodeKind::Prototype => "Prototype",
            NodeKind::Global => "Global",
            NodeKind::GlobalExtern => "GlobalExtern",
            NodeKind::Type => "Type",
            NodeKind::Field => "Field",
            NodeKind::Constructor => "Constructor",
            NodeKind::Constant => "Constant",
            NodeKind::Macro => "Macro",
            NodeKind::NotFound => "NotFound",
            NodeKind::Dupe => "Dupe",
            NodeKind::Pb => "Pb",
        };
        write!(f, "{s}")
    }
}

/// Label of an edge in the code graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeLabel {
    /// Containment: parent entity has child entity (dir has file, file has function, type has field)
    Has,
    /// Reference: referrer entity uses referent entity
    Use,
}

impl std::fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeLabel::Has => write!(f, "Has"),
            EdgeLabel::Use => write!(f, "Use"),
        }
    }
}

/// The external address of a node: its name plus its kind.
///
/// Names live in a single flat namespace per kind. C's separate tag spaces for
/// structs, unions, enums and typedefs are flattened into [`NodeKind::Type`]
/// with a textual prefix (`S__`, `U__`, `E__`, `T__`); fields are named
/// `<owner>.<field>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    /// Entity name as it appears in the graph (possibly gensym-renamed)
    pub name: String,
    /// Kind of entity
    pub kind: NodeKind,
}

impl NodeKey {
    /// Create a node key.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// A position in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLoc {
    /// Repository-relative path of the file
    pub file: PathBuf,
    /// 1-based line number
    pub line: u32,
    /// 0-based column number
    pub col: u32,
}

impl SourceLoc {
    /// Create a source location.
    pub fn new(file: impl Into<PathBuf>, line: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }
}

impl std::fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.col)
    }
}

/// Property flag attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeProp {
    /// Entity was declared with `static` storage
    Static,
    /// Entity name was gensym-renamed to keep file-local scoping
    Renamed,
}

/// Metadata attached to a real (non-sink) node: where it was defined, its
/// serialized type signature, and property flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Defining source location
    pub loc: SourceLoc,
    /// Serialized type signature, when the defining form carries a type
    pub signature: Option<String>,
    /// Property flags
    pub props: Vec<NodeProp>,
}

impl NodeInfo {
    /// Create node info with only a source location.
    pub fn new(loc: SourceLoc) -> Self {
        Self {
            loc,
            signature: None,
            props: Vec::new(),
        }
    }

    /// Builder pattern: set the serialized type signature.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Builder pattern: add a property flag.
    pub fn with_prop(mut self, prop: NodeProp) -> Self {
        self.props.push(prop);
        self
    }
}

/// A node in the code graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier (assigned by the store)
    pub id: NodeId,
    /// External address (name, kind)
    pub key: NodeKey,
    /// Attached metadata, set once after creation
    pub info: Option<NodeInfo>,
}

impl Node {
    /// Create a new node (ID is assigned by the store).
    pub fn new(id: NodeId, key: NodeKey) -> Self {
        Self {
            id,
            key,
            info: None,
        }
    }
}

/// A directed labelled edge in the code graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier (assigned by the store)
    pub id: EdgeId,
    /// Source node ID
    pub source_id: NodeId,
    /// Target node ID
    pub target_id: NodeId,
    /// Containment or use
    pub label: EdgeLabel,
}

impl Edge {
    /// Create a new edge (ID is assigned by the store).
    pub fn new(id: EdgeId, source_id: NodeId, target_id: NodeId, label: EdgeLabel) -> Self {
        Self {
            id,
            source_id,
            target_id,
            label,
        }
    }
}
