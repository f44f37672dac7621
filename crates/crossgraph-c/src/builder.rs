//! The build driver: parse every file, run the definition pass, the use
//! pass, the adjuster, and sink pruning.

use crate::adjuster::propagate_users_to_decls;
use crate::build_log::BuildLog;
use crate::config::BuildConfig;
use crate::errors::{BuildError, BuildResult};
use crate::files::{readable_path, FileKind, EXTERNAL_MARKER};
use crate::hooks::UseHookFn;
use crate::symbols::Tables;
use crate::walker::{Phase, Walker};
use crossgraph::{CrossGraph, NodeKey, NodeKind};
use crossgraph_ast::UnitParser;
use log::info;
use std::path::PathBuf;

/// Builds a cross-reference graph from a set of C files.
///
/// One builder value owns the configuration and the use-edge hook for one
/// build; [`XrefBuilder::build`] consumes it and returns the finished graph.
///
/// # Example
///
/// ```rust,no_run
/// use crossgraph_c::XrefBuilder;
/// # use crossgraph_ast::{TranslationUnit, UnitParser, ParseError};
/// # use std::path::{Path, PathBuf};
/// # struct MyParser;
/// # impl UnitParser for MyParser {
/// #     fn parse(&self, path: &Path, _: bool) -> Result<TranslationUnit, ParseError> {
/// #         Ok(TranslationUnit { path: path.to_path_buf(), toplevels: vec![] })
/// #     }
/// # }
///
/// let parser = MyParser;
/// let files = vec![PathBuf::from("/repo/lib/util.c")];
/// let graph = XrefBuilder::new("/repo").build(&parser, &files)?;
/// # Ok::<(), crossgraph_c::BuildError>(())
/// ```
pub struct XrefBuilder {
    root: PathBuf,
    config: BuildConfig,
    verbose: bool,
    hook: Option<Box<UseHookFn>>,
}

impl XrefBuilder {
    /// Create a builder rooted at the directory all file paths are made
    /// relative to. The build log is written there.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: BuildConfig::default(),
            verbose: false,
            hook: None,
        }
    }

    /// Builder pattern: replace the configuration.
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder pattern: emit progress ticks and pass error reporting through
    /// to the parser.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Builder pattern: register the observer invoked on each use edge.
    pub fn with_use_hook(mut self, hook: Box<UseHookFn>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// The synthetic sink nodes seeded into every build and pruned at the end
    /// when edge-free.
    pub fn sink_nodes() -> [NodeKey; 3] {
        [
            NodeKey::new("NOT_FOUND", NodeKind::NotFound),
            NodeKey::new("DUPE", NodeKind::Dupe),
            NodeKey::new("PB", NodeKind::Pb),
        ]
    }

    /// Run the build: parse all files, then the definition pass over every
    /// unit, then the use pass, then the adjuster (when configured), then
    /// sink pruning.
    ///
    /// # Errors
    ///
    /// Parser timeouts propagate unchanged. Any other parse failure is logged
    /// once and returned. Diagnostics (duplicates, conflicts, unresolved
    /// references) go to the build log and never fail the build.
    pub fn build(mut self, parser: &dyn UnitParser, files: &[PathBuf]) -> BuildResult<CrossGraph> {
        let mut graph = CrossGraph::new();
        for sink in Self::sink_nodes() {
            graph.add_node(sink);
        }
        let mut tables = Tables::new();
        let mut log = BuildLog::open(&self.root)?;

        let mut units = Vec::with_capacity(files.len());
        for file in files {
            if self.verbose {
                info!("parsing {}", file.display());
            }
            match parser.parse(file, self.verbose) {
                Ok(unit) => units.push(unit),
                Err(err) if err.is_timeout() => return Err(BuildError::Parse(err)),
                Err(err) => {
                    log.parse_failure(file, &err);
                    return Err(BuildError::Parse(err));
                }
            }
        }

        for phase in [Phase::Defs, Phase::Uses] {
            for unit in &units {
                if self.verbose {
                    info!("{phase:?} pass: {}", unit.path.display());
                }
                let readable = readable_path(&self.root, &unit.path);
                let mut walker = Walker {
                    graph: &mut graph,
                    tables: &mut tables,
                    log: &mut log,
                    config: &self.config,
                    hook: self.hook.as_deref_mut(),
                    phase,
                    file_kind: FileKind::from_path(&unit.path),
                    in_external: readable.contains(EXTERNAL_MARKER),
                    readable,
                    locals: Vec::new(),
                };
                walker.unit(unit)?;
            }
        }

        if self.config.propagate_deps_def_to_decl {
            propagate_users_to_decls(&mut graph, &tables)?;
        }
        graph.remove_empty(&Self::sink_nodes());

        if self.verbose {
            let stats = graph.stats();
            info!(
                "graph built: {} nodes, {} has edges, {} use edges",
                stats.nodes, stats.has_edges, stats.use_edges
            );
        }
        Ok(graph)
    }
}
