//! # crossgraph-c
//!
//! Two-pass cross-reference builder for C: consumes parsed translation units
//! and produces a [`crossgraph::CrossGraph`] whose nodes are source entities
//! and whose edges are containment (`Has`) and references (`Use`).
//!
//! ## How it works
//!
//! - **Pass 1 (defs)** walks every translation unit creating definition
//!   nodes, containment edges and the side tables: per-file static-scope
//!   rename maps, the global typedef map, the struct field map and the
//!   duplicate registry.
//! - **Pass 2 (uses)** re-runs the same traversal, now descending into
//!   bodies, initializers and type references, resolving names through the
//!   tables, with a "rekind" fallback trying the prototype kind for an
//!   unresolved function and the extern kind for an unresolved global.
//! - The optional **adjuster** propagates users of each definition onto its
//!   declaration counterpart, and edge-free sink nodes are pruned.
//!
//! Duplicate definitions across translation units are detected, logged and
//! quarantined rather than corrupting the graph; `static` file-local entities
//! are disambiguated by gensym renaming so two files can each define their
//! own `static int x` without collision.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use crossgraph_c::{BuildConfig, XrefBuilder};
//! # use crossgraph_ast::{TranslationUnit, UnitParser, ParseError};
//! # use std::path::{Path, PathBuf};
//! # struct CFrontEnd;
//! # impl UnitParser for CFrontEnd {
//! #     fn parse(&self, path: &Path, _: bool) -> Result<TranslationUnit, ParseError> {
//! #         Ok(TranslationUnit { path: path.to_path_buf(), toplevels: vec![] })
//! #     }
//! # }
//!
//! let parser = CFrontEnd;
//! let files = vec![PathBuf::from("/repo/main.c"), PathBuf::from("/repo/util.h")];
//! let graph = XrefBuilder::new("/repo")
//!     .with_config(BuildConfig::default().with_propagate_deps_def_to_decl(true))
//!     .build(&parser, &files)?;
//!
//! println!("{} nodes", graph.stats().nodes);
//! # Ok::<(), crossgraph_c::BuildError>(())
//! ```

pub mod adjuster;
mod build_log;
pub mod config;
mod errors;
pub mod files;
pub mod hooks;
mod resolver;
pub mod symbols;
mod walker;

mod builder;

pub use build_log::{BuildLog, LOG_FILE_NAME};
pub use builder::XrefBuilder;
pub use config::BuildConfig;
pub use errors::{BuildError, BuildResult};
pub use files::{readable_path, FileKind, EXTERNAL_MARKER};
pub use hooks::{UseContext, UseHookFn};
pub use symbols::Tables;
pub use walker::Phase;
