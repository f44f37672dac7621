//! Error types for graph operations.
//!
//! All fallible operations return [`Result<T>`] with context-rich error messages.

use thiserror::Error;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error type for all graph store operations.
///
/// Errors are designed to fail fast and provide clear context about what went wrong.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Node not found in the graph
    #[error("Node not found: {node}")]
    NodeNotFound {
        /// Display form of the missing node key
        node: String,
    },

    /// An edge endpoint is missing from the graph
    #[error("Missing {label} edge endpoint: {endpoint} (from {source_node})")]
    EndpointMissing {
        /// Display form of the source node key
        source_node: String,
        /// Display form of the missing endpoint key
        endpoint: String,
        /// Edge label being added
        label: String,
    },

    /// Node info was already attached to this node
    #[error("Node info already attached: {node}")]
    InfoAlreadyAttached {
        /// Display form of the node key
        node: String,
    },

    /// Invalid operation (programmer error)
    #[error("Invalid graph operation: {message}")]
    InvalidOperation {
        /// Description of what went wrong
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_not_found_error() {
        let err = GraphError::NodeNotFound {
            node: "main (Function)".to_string(),
        };
        assert_eq!(err.to_string(), "Node not found: main (Function)");
    }

    #[test]
    fn test_endpoint_missing_error() {
        let err = GraphError::EndpointMissing {
            source_node: "f (Function)".to_string(),
            endpoint: "g (Function)".to_string(),
            label: "Use".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing Use edge endpoint: g (Function) (from f (Function))"
        );
    }
}
