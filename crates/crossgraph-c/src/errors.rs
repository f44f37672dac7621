use crossgraph_ast::ParseError;
use thiserror::Error;

/// Errors that abort a cross-reference build.
///
/// Diagnostics (duplicates, typedef conflicts, unresolved references) are not
/// errors; they go to the build log and the build continues. These variants
/// are the genuinely fatal cases.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The external parser failed; timeouts propagate unchanged
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A graph store operation failed
    #[error(transparent)]
    Graph(#[from] crossgraph::GraphError),

    /// The walker's current node vanished from the graph (programmer error)
    #[error("Current node missing from graph in {file}: {node}")]
    MissingCurrent {
        /// Repository-relative path of the file being walked
        file: String,
        /// Display form of the missing node key
        node: String,
    },

    /// A duplicate definition was seen for a kind that can never legally
    /// collide (programmer error)
    #[error("Unexpected duplicate for {node} in {file}")]
    UnexpectedDuplicate {
        /// Repository-relative path of the file being walked
        file: String,
        /// Display form of the colliding node key
        node: String,
    },

    /// Could not create the build log at the analysis root
    #[error("Cannot open build log: {0}")]
    Log(#[from] std::io::Error),
}

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;
