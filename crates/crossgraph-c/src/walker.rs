//! The traversal skeleton shared by both passes.
//!
//! One family of mutually recursive methods walks toplevels, statements,
//! expressions and types. The definition pass creates nodes and containment
//! edges and populates the side tables; the use pass re-runs the same
//! skeleton, descending into bodies and initializers and emitting use edges
//! through the resolver. `Scope` is the small environment cloned whenever a
//! child scope needs a different `current` node; everything mutable lives on
//! the walker itself.

use crate::build_log::BuildLog;
use crate::config::BuildConfig;
use crate::errors::{BuildError, BuildResult};
use crate::files::FileKind;
use crate::hooks::UseHookFn;
use crate::symbols::{self, Tables};
use crossgraph::{CrossGraph, EdgeLabel, NodeInfo, NodeKey, NodeKind, NodeProp, SourceLoc};
use crossgraph_ast::{
    Define, EnumDef, Expr, FunctionDef, Ident, MacroBody, MacroDef, Prototype, Stmt, Storage,
    StructDef, SwitchCase, Toplevel, TranslationUnit, TypedefDef, VarDecl,
};

/// Which pass is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Pass 1: create definition nodes, containment edges, side tables
    Defs,
    /// Pass 2: emit use edges between already-defined nodes
    Uses,
}

/// Environment threaded down the recursion; cloned when a child scope needs
/// an altered `current`.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    /// The node use edges are emitted from
    pub current: NodeKey,
    /// Inside either side of an assignment expression
    pub in_assign: bool,
}

impl Scope {
    fn at(&self, current: NodeKey) -> Scope {
        Scope {
            current,
            in_assign: self.in_assign,
        }
    }
}

/// One pass over one translation unit.
pub(crate) struct Walker<'a> {
    pub graph: &'a mut CrossGraph,
    pub tables: &'a mut Tables,
    pub log: &'a mut BuildLog,
    pub config: &'a BuildConfig,
    pub hook: Option<&'a mut UseHookFn>,
    pub phase: Phase,
    /// Repository-relative path of the file being walked
    pub readable: String,
    pub file_kind: FileKind,
    /// The file is a stub under the EXTERNAL marker
    pub in_external: bool,
    /// In-scope local names; reset at each definition entry, suppresses uses
    pub locals: Vec<String>,
}

impl<'a> Walker<'a> {
    /// Walk one translation unit. In the definition pass this also creates
    /// the file node and its directory chain.
    pub fn unit(&mut self, unit: &TranslationUnit) -> BuildResult<()> {
        let file_key = NodeKey::new(self.readable.clone(), NodeKind::File);
        if self.phase == Phase::Defs {
            let dir = self.graph.create_intermediate_dirs(&self.readable);
            self.graph.add_node(file_key.clone());
            self.graph.add_edge(&dir, &file_key, EdgeLabel::Has)?;
            self.graph.attach_info(
                &file_key,
                NodeInfo::new(SourceLoc::new(self.readable.clone(), 1, 0)),
            )?;
        }
        let scope = Scope {
            current: file_key,
            in_assign: false,
        };
        for top in &unit.toplevels {
            self.toplevel(&scope, top)?;
        }
        Ok(())
    }

    fn toplevel(&mut self, scope: &Scope, top: &Toplevel) -> BuildResult<()> {
        match top {
            Toplevel::Define(d) => self.define(scope, d),
            Toplevel::Macro(m) => self.macro_def(scope, m),
            Toplevel::Include(_) => Ok(()),
            Toplevel::Struct(s) => self.struct_def(scope, s),
            Toplevel::Enum(e) => self.enum_def(scope, e),
            Toplevel::Typedef(t) => self.typedef_def(scope, t),
            Toplevel::Func(f) => self.func_def(scope, f),
            Toplevel::Proto(p) => self.prototype(scope, p),
            Toplevel::Global(v) => self.global(scope, v),
        }
    }

    fn define(&mut self, scope: &Scope, d: &Define) -> BuildResult<()> {
        let key = NodeKey::new(d.name.name.clone(), NodeKind::Constant);
        let scope = self.add_node_and_has_edge(scope, key, NodeInfo::new(d.name.loc.clone()))?;
        if self.phase == Phase::Uses {
            self.locals.clear();
            if let Some(body) = &d.body {
                self.expr(&scope, body)?;
            }
        }
        Ok(())
    }

    fn macro_def(&mut self, scope: &Scope, m: &MacroDef) -> BuildResult<()> {
        let key = NodeKey::new(m.name.name.clone(), NodeKind::Macro);
        let scope = self.add_node_and_has_edge(scope, key, NodeInfo::new(m.name.loc.clone()))?;
        if self.phase == Phase::Uses {
            // Macro parameters behave like function parameters in the body.
            self.locals = m.params.iter().map(|p| p.name.clone()).collect();
            match &m.body {
                Some(MacroBody::Expr(e)) => self.expr(&scope, e)?,
                Some(MacroBody::Stmt(s)) => self.stmt(&scope, s)?,
                None => {}
            }
        }
        Ok(())
    }

    fn func_def(&mut self, scope: &Scope, f: &FunctionDef) -> BuildResult<()> {
        let renames = self.file_kind == FileKind::Source
            && (f.storage == Storage::Static || f.name.name == "main");
        let name = self.def_name(&f.name, renames);
        let mut info =
            NodeInfo::new(f.name.loc.clone()).with_signature(f.func_type().signature());
        if f.storage == Storage::Static {
            info = info.with_prop(NodeProp::Static);
        }
        if renames {
            info = info.with_prop(NodeProp::Renamed);
        }
        let scope =
            self.add_node_and_has_edge(scope, NodeKey::new(name, NodeKind::Function), info)?;
        if self.phase == Phase::Uses {
            self.locals = f
                .params
                .iter()
                .filter_map(|p| p.name.as_ref())
                .map(|i| i.name.clone())
                .collect();
            self.walk_type(&scope, &f.ret)?;
            for param in &f.params {
                self.walk_type(&scope, &param.ty)?;
            }
            for st in &f.body {
                self.stmt(&scope, st)?;
            }
        }
        Ok(())
    }

    fn prototype(&mut self, scope: &Scope, p: &Prototype) -> BuildResult<()> {
        // A static prototype in a source file has no matching node: the
        // definition it declares is gensym-renamed, so emitting the prototype
        // would create a phantom entity.
        if p.storage == Storage::Static && self.file_kind == FileKind::Source {
            return Ok(());
        }
        let key = NodeKey::new(p.name.name.clone(), NodeKind::Prototype);
        let info = NodeInfo::new(p.name.loc.clone()).with_signature(p.func_type().signature());
        let scope = self.add_node_and_has_edge(scope, key, info)?;
        if self.phase == Phase::Uses {
            self.locals.clear();
            self.walk_type(&scope, &p.ret)?;
            for param in &p.params {
                self.walk_type(&scope, &param.ty)?;
            }
        }
        Ok(())
    }

    fn global(&mut self, scope: &Scope, v: &VarDecl) -> BuildResult<()> {
        let has_init = v.init.is_some();
        let (kind, renames) = match (v.storage, self.file_kind) {
            (Storage::Extern, _) => (NodeKind::GlobalExtern, false),
            (Storage::Default, FileKind::Header) if has_init => {
                if self.phase == Phase::Defs {
                    self.log.line(&format!(
                        "Initialized global in header, definition should move to a source file: {} (in {})",
                        v.name.as_str(),
                        self.readable
                    ));
                }
                (NodeKind::Global, false)
            }
            (Storage::Default, FileKind::Header) => (NodeKind::GlobalExtern, false),
            (Storage::Static, FileKind::Source) => (NodeKind::Global, true),
            (Storage::Static, FileKind::Header) => (NodeKind::Global, false),
            (Storage::Default, FileKind::Source) => (NodeKind::Global, false),
        };
        let name = self.def_name(&v.name, renames);
        let mut info = NodeInfo::new(v.name.loc.clone()).with_signature(v.ty.signature());
        if v.storage == Storage::Static {
            info = info.with_prop(NodeProp::Static);
        }
        if renames {
            info = info.with_prop(NodeProp::Renamed);
        }
        let scope = self.add_node_and_has_edge(scope, NodeKey::new(name, kind), info)?;
        if self.phase == Phase::Uses {
            self.locals.clear();
            self.walk_type(&scope, &v.ty)?;
            if let Some(init) = &v.init {
                self.expr(&scope, init)?;
            }
        }
        Ok(())
    }

    fn struct_def(&mut self, scope: &Scope, s: &StructDef) -> BuildResult<()> {
        let prefixed = symbols::su_tag(s.su, s.name.as_str());
        let key = NodeKey::new(prefixed.clone(), NodeKind::Type);
        let scope = self.add_node_and_has_edge(scope, key, NodeInfo::new(s.name.loc.clone()))?;
        if self.phase == Phase::Defs {
            let names = s
                .fields
                .iter()
                .filter_map(|f| f.name.as_ref())
                .map(|i| i.name.clone())
                .collect();
            self.tables.record_fields(&prefixed, names);
        }
        for field in &s.fields {
            match &field.name {
                Some(ident) => {
                    let fkey = NodeKey::new(
                        format!("{prefixed}.{}", ident.as_str()),
                        NodeKind::Field,
                    );
                    let finfo =
                        NodeInfo::new(ident.loc.clone()).with_signature(field.ty.signature());
                    let fscope = self.add_node_and_has_edge(&scope, fkey, finfo)?;
                    if self.phase == Phase::Uses {
                        self.walk_type(&fscope, &field.ty)?;
                    }
                }
                // Anonymous member: descend into its type only.
                None => {
                    if self.phase == Phase::Uses {
                        self.walk_type(&scope, &field.ty)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn enum_def(&mut self, scope: &Scope, e: &EnumDef) -> BuildResult<()> {
        let key = NodeKey::new(symbols::enum_tag(e.name.as_str()), NodeKind::Type);
        let scope = self.add_node_and_has_edge(scope, key, NodeInfo::new(e.name.loc.clone()))?;
        for constant in &e.constants {
            let renames = self.file_kind == FileKind::Source;
            let name = self.def_name(&constant.name, renames);
            let mut info = NodeInfo::new(constant.name.loc.clone());
            if renames {
                info = info.with_prop(NodeProp::Renamed);
            }
            let cscope =
                self.add_node_and_has_edge(&scope, NodeKey::new(name, NodeKind::Constant), info)?;
            if self.phase == Phase::Uses {
                self.locals.clear();
                if let Some(value) = &constant.value {
                    self.expr(&cscope, value)?;
                }
            }
        }
        Ok(())
    }

    fn typedef_def(&mut self, scope: &Scope, td: &TypedefDef) -> BuildResult<()> {
        let key = NodeKey::new(symbols::typedef_tag(td.name.as_str()), NodeKind::Type);
        match self.phase {
            Phase::Defs => {
                if let Some(existing) = self.tables.typedef(td.name.as_str()) {
                    // Re-definition with the same shape is silent; a conflict
                    // is logged and the first binding kept.
                    if !existing.same_shape(&td.ty) {
                        let msg = format!(
                            "conflicting typedefs for {}: {} vs {} (in {})",
                            td.name.as_str(),
                            existing.signature(),
                            td.ty.signature(),
                            self.readable
                        );
                        self.log.line(&msg);
                    }
                    return Ok(());
                }
                self.tables.record_typedef(td.name.as_str(), td.ty.clone());
                let info =
                    NodeInfo::new(td.name.loc.clone()).with_signature(td.ty.signature());
                self.add_node_and_has_edge(scope, key, info)?;
                Ok(())
            }
            Phase::Uses => {
                // Only the canonical (first) binding walks its body, and only
                // when typedef nodes participate in the graph at all.
                let canonical = self
                    .tables
                    .typedef(td.name.as_str())
                    .is_some_and(|t| t.same_shape(&td.ty));
                if self.config.typedefs_dependencies && canonical {
                    let tscope = scope.at(key);
                    self.walk_type(&tscope, &td.ty)?;
                }
                Ok(())
            }
        }
    }

    /// The graph name of a definition: a fresh gensym recorded in the rename
    /// map when static-scope renaming applies, the recorded or original name
    /// otherwise.
    fn def_name(&mut self, ident: &Ident, renames: bool) -> String {
        if renames && self.phase == Phase::Defs {
            let fresh = self.graph.gensym(ident.as_str());
            self.tables
                .record_rename(&self.readable, ident.as_str(), &fresh);
            fresh
        } else {
            self.tables.graph_name(&self.readable, ident.as_str())
        }
    }

    /// Create a definition node with a containment edge from the current
    /// node, or handle the duplicate if the key already exists. In the use
    /// pass this only moves `current`. Either way the returned scope descends
    /// into the definition.
    fn add_node_and_has_edge(
        &mut self,
        scope: &Scope,
        key: NodeKey,
        info: NodeInfo,
    ) -> BuildResult<Scope> {
        if self.phase == Phase::Defs {
            if self.graph.has_node(&key) {
                self.duplicate(scope, &key)?;
            } else {
                if !self.graph.has_node(&scope.current) {
                    return Err(BuildError::MissingCurrent {
                        file: self.readable.clone(),
                        node: scope.current.to_string(),
                    });
                }
                self.graph.add_node(key.clone());
                self.graph.add_edge(&scope.current, &key, EdgeLabel::Has)?;
                self.graph.attach_info(&key, info)?;
                if self.tables.is_dupe(&scope.current) {
                    self.tables.mark_dupe(key.clone());
                }
            }
        }
        Ok(scope.at(key))
    }

    fn duplicate(&mut self, scope: &Scope, key: &NodeKey) -> BuildResult<()> {
        // A child of an already-reported duplicate is marked without noise.
        if self.tables.is_dupe(&scope.current) {
            self.tables.mark_dupe(key.clone());
            return Ok(());
        }
        match key.kind {
            NodeKind::Function
            | NodeKind::Global
            | NodeKind::Constructor
            | NodeKind::Type
            | NodeKind::Field
            | NodeKind::Constant
            | NodeKind::Macro => {
                if self.in_external {
                    return Ok(());
                }
                let orig = self
                    .graph
                    .node_info(key)
                    .map(|i| i.loc.file.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!(
                    "DUPE entity: {key}, orig = {orig}, dupe = {}",
                    self.readable
                );
                self.log.line(&msg);
                self.tables.mark_dupe(key.clone());
                Ok(())
            }
            // Repeated declarations are common and expected.
            NodeKind::Prototype | NodeKind::GlobalExtern => {
                self.tables.mark_dupe(key.clone());
                Ok(())
            }
            _ => Err(BuildError::UnexpectedDuplicate {
                file: self.readable.clone(),
                node: key.to_string(),
            }),
        }
    }

    /// Walk a statement. Statements emit nothing themselves; they are walked
    /// only to reach declarations and expressions.
    pub(crate) fn stmt(&mut self, scope: &Scope, st: &Stmt) -> BuildResult<()> {
        match st {
            Stmt::Expr(e) => self.expr(scope, e),
            Stmt::Block(stmts) => {
                for s in stmts {
                    self.stmt(scope, s)?;
                }
                Ok(())
            }
            Stmt::If(cond, then, otherwise) => {
                self.expr(scope, cond)?;
                self.stmt(scope, then)?;
                if let Some(e) = otherwise {
                    self.stmt(scope, e)?;
                }
                Ok(())
            }
            Stmt::While(cond, body) => {
                self.expr(scope, cond)?;
                self.stmt(scope, body)
            }
            Stmt::DoWhile(body, cond) => {
                self.stmt(scope, body)?;
                self.expr(scope, cond)
            }
            Stmt::For(init, cond, step, body) => {
                for e in [init, cond, step] {
                    if let Some(e) = e {
                        self.expr(scope, e)?;
                    }
                }
                self.stmt(scope, body)
            }
            Stmt::Switch(subject, cases) => {
                self.expr(scope, subject)?;
                for case in cases {
                    match case {
                        SwitchCase::Case(value, stmts) => {
                            self.expr(scope, value)?;
                            for s in stmts {
                                self.stmt(scope, s)?;
                            }
                        }
                        SwitchCase::Default(stmts) => {
                            for s in stmts {
                                self.stmt(scope, s)?;
                            }
                        }
                    }
                }
                Ok(())
            }
            Stmt::Return(value) => {
                if let Some(v) = value {
                    self.expr(scope, v)?;
                }
                Ok(())
            }
            Stmt::Label(_, inner) => self.stmt(scope, inner),
            Stmt::Goto(_) | Stmt::Break | Stmt::Continue => Ok(()),
            Stmt::Locals(decls) => {
                for decl in decls {
                    if decl.storage != Storage::Extern {
                        self.locals.push(decl.name.name.clone());
                    }
                    self.walk_type(scope, &decl.ty)?;
                    if let Some(init) = &decl.init {
                        self.expr(scope, init)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Walk an expression, classifying identifier references.
    pub(crate) fn expr(&mut self, scope: &Scope, e: &Expr) -> BuildResult<()> {
        match e {
            Expr::Literal(_) => Ok(()),
            Expr::Id(ident) => {
                if self.locals.contains(&ident.name) {
                    return Ok(());
                }
                let name = self.tables.graph_name(&self.readable, ident.as_str());
                let kind = if crate::resolver::looks_like_macro(ident.as_str()) {
                    NodeKind::Constant
                } else {
                    NodeKind::Global
                };
                self.add_use_edge(scope, &name, &ident.loc, kind)
            }
            Expr::Call(callee, args) => {
                match callee.as_ref() {
                    // Call through a local function pointer: no edge.
                    Expr::Id(ident) if self.locals.contains(&ident.name) => {}
                    Expr::Id(ident) => {
                        let name = self.tables.graph_name(&self.readable, ident.as_str());
                        let kind = if crate::resolver::looks_like_macro(ident.as_str()) {
                            NodeKind::Macro
                        } else {
                            NodeKind::Function
                        };
                        self.add_use_edge(scope, &name, &ident.loc, kind)?;
                    }
                    other => self.expr(scope, other)?,
                }
                for arg in args {
                    self.expr(scope, arg)?;
                }
                Ok(())
            }
            Expr::Assign(lhs, rhs) => {
                let scope = Scope {
                    current: scope.current.clone(),
                    in_assign: true,
                };
                self.expr(&scope, lhs)?;
                self.expr(&scope, rhs)
            }
            // The field selector is unresolved for now; only the qualifier is
            // walked.
            Expr::Field(qualifier, _) | Expr::Arrow(qualifier, _) => self.expr(scope, qualifier),
            Expr::Index(base, index) => {
                self.expr(scope, base)?;
                self.expr(scope, index)
            }
            Expr::Unary(_, operand) => self.expr(scope, operand),
            Expr::Binary(lhs, _, rhs) => {
                self.expr(scope, lhs)?;
                self.expr(scope, rhs)
            }
            Expr::Ternary(cond, then, otherwise) => {
                self.expr(scope, cond)?;
                self.expr(scope, then)?;
                self.expr(scope, otherwise)
            }
            Expr::Cast(ty, operand) => {
                self.walk_type(scope, ty)?;
                self.expr(scope, operand)
            }
            Expr::SizeOfExpr(operand) => self.expr(scope, operand),
            Expr::SizeOfType(ty) => self.walk_type(scope, ty),
            Expr::InitList(items) => {
                for item in items {
                    self.expr(scope, item)?;
                }
                Ok(())
            }
            Expr::Comma(first, second) => {
                self.expr(scope, first)?;
                self.expr(scope, second)
            }
        }
    }
}
