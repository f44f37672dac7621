//! Source file classification and repository-relative paths.

use std::path::Path;

/// Marker in a path identifying stub files whose unresolved references are
/// expected and dropped silently.
pub const EXTERNAL_MARKER: &str = "EXTERNAL";

/// Whether a file is a header or a source file.
///
/// Several scoping rules differ between the two: statics rename only in
/// source files, and an uninitialized storage-less global in a header is an
/// extern declaration rather than a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.c` file, or any unrecognized extension
    Source,
    /// `.h` file
    Header,
}

impl FileKind {
    /// Classify a file by extension. Anything that is not `.h` counts as
    /// source.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("h") => FileKind::Header,
            _ => FileKind::Source,
        }
    }
}

/// The repository-relative form of `file`, with `/` separators.
///
/// Files outside `root` keep their full path.
pub fn readable_path(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    let joined = rel
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    if rel.is_absolute() {
        format!("/{joined}")
    } else {
        joined
    }
}
