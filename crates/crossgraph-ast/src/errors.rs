use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing a translation unit.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Failed to read the file
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// Syntax error in source code
    #[error("Syntax error in {0}:{1}:{2}: {3}")]
    Syntax(PathBuf, u32, u32, String),

    /// Parsing exceeded its time limit. This variant propagates unchanged
    /// through the builder.
    #[error("Parsing {0} exceeded timeout")]
    Timeout(PathBuf),

    /// Any other parser failure
    #[error("Parse error in {0}: {1}")]
    Other(PathBuf, String),
}

impl ParseError {
    /// Whether this is the timeout signal.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ParseError::Timeout(_))
    }

    /// The file the parser was working on.
    pub fn path(&self) -> &PathBuf {
        match self {
            ParseError::Io(p, _)
            | ParseError::Syntax(p, _, _, _)
            | ParseError::Timeout(p)
            | ParseError::Other(p, _) => p,
        }
    }
}

/// Result type for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_detection() {
        let err = ParseError::Timeout(PathBuf::from("slow.c"));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Parsing slow.c exceeded timeout");

        let err = ParseError::Other(PathBuf::from("bad.c"), "oops".to_string());
        assert!(!err.is_timeout());
        assert_eq!(err.path(), &PathBuf::from("bad.c"));
    }
}
