//! The build diagnostics log.
//!
//! Duplicate reports, typedef conflicts and unresolved-reference warnings go
//! to a line-oriented file at the analysis root, flushed per write so the
//! diagnostics survive a crash mid-build. Every line is mirrored to the `log`
//! facade at warn level.

use crossgraph_ast::ParseError;
use log::warn;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the diagnostics log, created at the analysis root.
pub const LOG_FILE_NAME: &str = "pfff.log";

/// Append-only diagnostics writer.
pub struct BuildLog {
    file: File,
    path: PathBuf,
    reported_parse_failures: HashSet<PathBuf>,
}

impl BuildLog {
    /// Create (truncating) the log file at `root`.
    pub fn open(root: &Path) -> std::io::Result<Self> {
        let path = root.join(LOG_FILE_NAME);
        let file = File::create(&path)?;
        Ok(Self {
            file,
            path,
            reported_parse_failures: HashSet::new(),
        })
    }

    /// Where the log file lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one diagnostic line and flush.
    ///
    /// Diagnostics are best-effort: a failing write never aborts the build.
    pub fn line(&mut self, msg: &str) {
        warn!("{msg}");
        let _ = writeln!(self.file, "{msg}");
        let _ = self.file.flush();
    }

    /// Report a parse failure, at most once per file.
    pub fn parse_failure(&mut self, file: &Path, err: &ParseError) {
        if self.reported_parse_failures.insert(file.to_path_buf()) {
            self.line(&format!("PARSE ERROR: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_are_flushed_immediately() {
        let dir = TempDir::new().unwrap();
        let mut log = BuildLog::open(dir.path()).unwrap();
        log.line("DUPE entity: shared (Function)");
        log.line("Lookup failure on ghost (Global)");

        // Read back without dropping the writer: flushed per write.
        let contents = std::fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert_eq!(
            contents,
            "DUPE entity: shared (Function)\nLookup failure on ghost (Global)\n"
        );
    }

    #[test]
    fn test_parse_failures_deduplicated() {
        let dir = TempDir::new().unwrap();
        let mut log = BuildLog::open(dir.path()).unwrap();
        let err = ParseError::Other(PathBuf::from("bad.c"), "unbalanced braces".to_string());
        log.parse_failure(Path::new("bad.c"), &err);
        log.parse_failure(Path::new("bad.c"), &err);

        let contents = std::fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
