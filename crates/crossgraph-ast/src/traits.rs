use crate::ast::TranslationUnit;
use crate::errors::ParseError;
use std::path::Path;

/// The external C parser contract.
///
/// The cross-reference engine never parses text itself; it asks an
/// implementation of this trait for the abstract syntax forest of each file.
/// Real implementations wrap an actual C front end; tests use a stub backed by
/// pre-built [`TranslationUnit`] values.
pub trait UnitParser {
    /// Parse one source file.
    ///
    /// `show_errors` controls whether the parser reports recoverable syntax
    /// problems on its own channel; the engine passes it through from its
    /// verbosity setting.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Timeout`] when the file exceeds the parser's time
    /// limit (the engine propagates this unchanged) or any other
    /// [`ParseError`] for failures.
    fn parse(&self, path: &Path, show_errors: bool) -> Result<TranslationUnit, ParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_object_safe() {
        fn _accept_trait_object(_parser: &dyn UnitParser) {}
    }
}
