//! Reference resolution: lookup, rekind fallback, and type references.

use crate::errors::{BuildError, BuildResult};
use crate::hooks::UseContext;
use crate::symbols::{self, expand_typedefs};
use crate::walker::{Scope, Walker};
use crossgraph::{EdgeLabel, NodeKey, NodeKind, SourceLoc};
use crossgraph_ast::Type;
use regex::Regex;
use std::sync::LazyLock;

static MACRO_SHAPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("macro-shape pattern compiles"));

/// Identifiers excluded from use emission: vendor tagging macros that look
/// like references but never resolve to anything useful.
const FALSE_POSITIVE_TOKENS: &[&str] = &["USED", "SET"];

/// The "looks like macro" heuristic: all-caps with underscores and digits.
pub(crate) fn looks_like_macro(name: &str) -> bool {
    MACRO_SHAPED.is_match(name)
}

impl<'a> Walker<'a> {
    /// Emit a use edge from the current node to `(name, kind)`.
    ///
    /// Edges involving a duplicate are dropped with a diagnostic; an
    /// unresolved target is retried under an adjacent kind (prototype for a
    /// function, extern for a global) before being reported as a lookup failure.
    /// Stub files under the EXTERNAL marker fail silently.
    pub(crate) fn add_use_edge(
        &mut self,
        scope: &Scope,
        name: &str,
        loc: &SourceLoc,
        kind: NodeKind,
    ) -> BuildResult<()> {
        let src = &scope.current;
        let dst = NodeKey::new(name, kind);

        if self.tables.is_dupe(src) || self.tables.is_dupe(&dst) {
            self.log
                .line(&format!("skipping edge involving dupe: {src} -Use-> {dst}"));
            return Ok(());
        }
        if FALSE_POSITIVE_TOKENS.contains(&name) {
            return Ok(());
        }
        if !self.graph.has_node(src) {
            return Err(BuildError::MissingCurrent {
                file: self.readable.clone(),
                node: src.to_string(),
            });
        }
        if self.graph.has_node(&dst) {
            self.graph.add_edge(src, &dst, EdgeLabel::Use)?;
            if let Some(hook) = self.hook.as_mut() {
                hook(UseContext::NoCtx, scope.in_assign, src, &dst, &*self.graph);
            }
            return Ok(());
        }

        match kind {
            NodeKind::Function => self.add_use_edge(scope, name, loc, NodeKind::Prototype),
            NodeKind::Global => self.add_use_edge(scope, name, loc, NodeKind::GlobalExtern),
            _ if self.in_external => Ok(()),
            _ => {
                self.log.line(&format!("Lookup failure on {dst} ({loc})"));
                Ok(())
            }
        }
    }

    /// Walk a type, emitting use edges to the named tags and typedefs it
    /// mentions. With `typedefs_dependencies` off, typedef names are first
    /// expanded to their ultimate tags; a self-referential or unknown typedef
    /// stays put and is targeted directly.
    pub(crate) fn walk_type(&mut self, scope: &Scope, ty: &Type) -> BuildResult<()> {
        if !self.config.types_dependencies {
            return Ok(());
        }
        let ty = if self.config.typedefs_dependencies {
            ty.clone()
        } else {
            expand_typedefs(self.tables, ty)
        };
        self.type_refs(scope, &ty)
    }

    fn type_refs(&mut self, scope: &Scope, ty: &Type) -> BuildResult<()> {
        match ty {
            Type::Base(_) => Ok(()),
            Type::Pointer(inner) => self.type_refs(scope, inner),
            Type::Array(size, inner) => {
                if let Some(size) = size {
                    self.expr(scope, size)?;
                }
                self.type_refs(scope, inner)
            }
            Type::Function(ft) => {
                self.type_refs(scope, &ft.ret)?;
                for param in &ft.params {
                    self.type_refs(scope, &param.ty)?;
                }
                Ok(())
            }
            Type::StructName(su, name) => {
                let tag = symbols::su_tag(*su, name.as_str());
                self.add_use_edge(scope, &tag, &name.loc, NodeKind::Type)
            }
            Type::EnumName(name) => {
                let tag = symbols::enum_tag(name.as_str());
                self.add_use_edge(scope, &tag, &name.loc, NodeKind::Type)
            }
            Type::TypedefName(name) => {
                let tag = symbols::typedef_tag(name.as_str());
                self.add_use_edge(scope, &tag, &name.loc, NodeKind::Type)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_shaped_names() {
        assert!(looks_like_macro("MAX"));
        assert!(looks_like_macro("DO"));
        assert!(looks_like_macro("BUF_SIZE_2"));
        assert!(looks_like_macro("RED__3"));
    }

    #[test]
    fn test_non_macro_shaped_names() {
        assert!(!looks_like_macro("max"));
        assert!(!looks_like_macro("BufSize"));
        assert!(!looks_like_macro("x"));
        assert!(!looks_like_macro("_reserved"));
        assert!(!looks_like_macro(""));
    }

    #[test]
    fn test_false_positive_tokens() {
        assert!(FALSE_POSITIVE_TOKENS.contains(&"USED"));
        assert!(FALSE_POSITIVE_TOKENS.contains(&"SET"));
    }
}
