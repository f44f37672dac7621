use serde::{Deserialize, Serialize};

/// Configuration for the cross-reference build.
///
/// All flags are orthogonal; [`BuildConfig::default`] matches the behaviour a
/// consumer navigating definitions expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Emit use edges from entities to the named types they mention
    pub types_dependencies: bool,

    /// Reserved: emit use edges for record field accesses. Field selectors
    /// currently produce no edges, so this flag gates nothing yet.
    pub fields_dependencies: bool,

    /// Target typedef nodes directly instead of collapsing a typedef
    /// reference to its ultimate struct/union/enum tag
    pub typedefs_dependencies: bool,

    /// Run the post-pass that propagates users of each definition onto its
    /// declaration counterpart (prototype, extern global, typedef)
    pub propagate_deps_def_to_decl: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            types_dependencies: true,
            fields_dependencies: true,
            typedefs_dependencies: false,
            propagate_deps_def_to_decl: false,
        }
    }
}

impl BuildConfig {
    /// Builder pattern: set `typedefs_dependencies`.
    pub fn with_typedefs_dependencies(mut self, enabled: bool) -> Self {
        self.typedefs_dependencies = enabled;
        self
    }

    /// Builder pattern: set `types_dependencies`.
    pub fn with_types_dependencies(mut self, enabled: bool) -> Self {
        self.types_dependencies = enabled;
        self
    }

    /// Builder pattern: set `propagate_deps_def_to_decl`.
    pub fn with_propagate_deps_def_to_decl(mut self, enabled: bool) -> Self {
        self.propagate_deps_def_to_decl = enabled;
        self
    }
}
