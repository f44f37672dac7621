//! Shared symbol tables populated during the definition pass and read by the
//! use pass.

use crossgraph::NodeKey;
use crossgraph_ast::{SuKind, Type};
use std::collections::{HashMap, HashSet};

/// Prefix flattening the struct tag space into the `Type` kind.
pub const STRUCT_PREFIX: &str = "S__";
/// Prefix flattening the union tag space into the `Type` kind.
pub const UNION_PREFIX: &str = "U__";
/// Prefix flattening the enum tag space into the `Type` kind.
pub const ENUM_PREFIX: &str = "E__";
/// Prefix flattening the typedef namespace into the `Type` kind.
pub const TYPEDEF_PREFIX: &str = "T__";

/// Graph name of a struct or union tag.
pub fn su_tag(su: SuKind, name: &str) -> String {
    match su {
        SuKind::Struct => format!("{STRUCT_PREFIX}{name}"),
        SuKind::Union => format!("{UNION_PREFIX}{name}"),
    }
}

/// Graph name of an enum tag.
pub fn enum_tag(name: &str) -> String {
    format!("{ENUM_PREFIX}{name}")
}

/// Graph name of a typedef.
pub fn typedef_tag(name: &str) -> String {
    format!("{TYPEDEF_PREFIX}{name}")
}

/// The side tables of one build.
///
/// All four tables are written during the definition pass only; the use pass
/// and the adjuster read them.
#[derive(Default)]
pub struct Tables {
    /// Per-file rename maps: repository-relative path, then original name
    /// to gensym-renamed graph name
    renames: HashMap<String, HashMap<String, String>>,
    /// Typedef name to aliased type; first binding wins on conflict
    typedefs: HashMap<String, Type>,
    /// Prefixed tag name (`S__point`) to field names in declaration order
    fields: HashMap<String, Vec<String>>,
    /// Nodes marked as duplicate definitions
    dupes: HashSet<NodeKey>,
}

impl Tables {
    /// Fresh empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a static-scope rename for a file-local entity.
    pub fn record_rename(&mut self, readable: &str, original: &str, renamed: &str) {
        self.renames
            .entry(readable.to_string())
            .or_default()
            .insert(original.to_string(), renamed.to_string());
    }

    /// The graph name of `original` within `readable`: the recorded rename if
    /// one exists, the original otherwise.
    pub fn graph_name(&self, readable: &str, original: &str) -> String {
        self.renames
            .get(readable)
            .and_then(|m| m.get(original))
            .cloned()
            .unwrap_or_else(|| original.to_string())
    }

    /// Record a typedef binding. Returns the existing binding when one is
    /// already present (first binding wins); the caller decides whether that
    /// is a silent re-definition or a conflict worth logging.
    pub fn record_typedef(&mut self, name: &str, ty: Type) -> Option<&Type> {
        match self.typedefs.entry(name.to_string()) {
            std::collections::hash_map::Entry::Occupied(e) => Some(e.into_mut()),
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(ty);
                None
            }
        }
    }

    /// Look up a typedef binding.
    pub fn typedef(&self, name: &str) -> Option<&Type> {
        self.typedefs.get(name)
    }

    /// Record the field names of a struct/union tag. First definition wins.
    pub fn record_fields(&mut self, prefixed_tag: &str, field_names: Vec<String>) {
        self.fields
            .entry(prefixed_tag.to_string())
            .or_insert(field_names);
    }

    /// The recorded field names of a tag.
    pub fn fields_of(&self, prefixed_tag: &str) -> Option<&[String]> {
        self.fields.get(prefixed_tag).map(Vec::as_slice)
    }

    /// Mark a node as a duplicate definition.
    pub fn mark_dupe(&mut self, key: NodeKey) {
        self.dupes.insert(key);
    }

    /// Whether a node is marked duplicate.
    pub fn is_dupe(&self, key: &NodeKey) -> bool {
        self.dupes.contains(key)
    }
}

/// Recursively expand typedef names inside a type to their ultimate tags.
///
/// A self-referential binding (e.g. `typedef enum { ... } X` where the alias
/// expands to itself) and an unknown typedef name are left in place so the
/// caller targets the typedef node directly. Chains are followed through
/// pointers, arrays and function shapes; a cycle among typedefs stops at the
/// first revisited name.
pub fn expand_typedefs(tables: &Tables, ty: &Type) -> Type {
    let mut seen = HashSet::new();
    expand(tables, ty, &mut seen)
}

fn expand(tables: &Tables, ty: &Type, seen: &mut HashSet<String>) -> Type {
    match ty {
        Type::TypedefName(name) => match tables.typedef(name.as_str()) {
            Some(target) if !target.same_shape(ty) && seen.insert(name.name.clone()) => {
                expand(tables, target, seen)
            }
            _ => ty.clone(),
        },
        Type::Pointer(inner) => Type::Pointer(Box::new(expand(tables, inner, seen))),
        Type::Array(size, inner) => {
            Type::Array(size.clone(), Box::new(expand(tables, inner, seen)))
        }
        Type::Function(ft) => {
            let mut ft = (**ft).clone();
            ft.ret = expand(tables, &ft.ret, seen);
            for param in &mut ft.params {
                param.ty = expand(tables, &param.ty, seen);
            }
            Type::Function(Box::new(ft))
        }
        Type::Base(_) | Type::StructName(_, _) | Type::EnumName(_) => ty.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossgraph::{NodeKind, SourceLoc};
    use crossgraph_ast::{Ident, SuKind};

    fn loc() -> SourceLoc {
        SourceLoc::new("t.h", 1, 0)
    }

    fn typedef_name(s: &str) -> Type {
        Type::TypedefName(Ident::new(s, loc()))
    }

    fn struct_name(s: &str) -> Type {
        Type::StructName(SuKind::Struct, Ident::new(s, loc()))
    }

    #[test]
    fn test_rename_scoped_per_file() {
        let mut tables = Tables::new();
        tables.record_rename("a.c", "x", "x__1");
        assert_eq!(tables.graph_name("a.c", "x"), "x__1");
        assert_eq!(tables.graph_name("b.c", "x"), "x");
        assert_eq!(tables.graph_name("a.c", "y"), "y");
    }

    #[test]
    fn test_typedef_first_binding_wins() {
        let mut tables = Tables::new();
        assert!(tables.record_typedef("T", struct_name("P")).is_none());
        let existing = tables.record_typedef("T", struct_name("Q")).unwrap();
        assert!(existing.same_shape(&struct_name("P")));
        assert!(tables.typedef("T").unwrap().same_shape(&struct_name("P")));
    }

    #[test]
    fn test_expand_follows_chain_to_tag() {
        let mut tables = Tables::new();
        tables.record_typedef("T", struct_name("P"));
        tables.record_typedef("TT", typedef_name("T"));

        let expanded = expand_typedefs(&tables, &typedef_name("TT"));
        assert!(expanded.same_shape(&struct_name("P")));
    }

    #[test]
    fn test_expand_through_pointer() {
        let mut tables = Tables::new();
        tables.record_typedef("PP", Type::Pointer(Box::new(struct_name("P"))));

        let expanded = expand_typedefs(&tables, &typedef_name("PP"));
        assert_eq!(expanded.signature(), "struct P *");
    }

    #[test]
    fn test_expand_self_referential_stays_put() {
        let mut tables = Tables::new();
        tables.record_typedef("X", typedef_name("X"));

        let expanded = expand_typedefs(&tables, &typedef_name("X"));
        assert!(expanded.same_shape(&typedef_name("X")));
    }

    #[test]
    fn test_expand_unknown_name_stays_put() {
        let tables = Tables::new();
        let expanded = expand_typedefs(&tables, &typedef_name("mystery"));
        assert!(expanded.same_shape(&typedef_name("mystery")));
    }

    #[test]
    fn test_expand_cycle_terminates() {
        let mut tables = Tables::new();
        tables.record_typedef("A", typedef_name("B"));
        tables.record_typedef("B", typedef_name("A"));

        let expanded = expand_typedefs(&tables, &typedef_name("A"));
        assert!(matches!(expanded, Type::TypedefName(_)));
    }

    #[test]
    fn test_fields_first_definition_wins() {
        let mut tables = Tables::new();
        tables.record_fields("S__p", vec!["x".to_string(), "y".to_string()]);
        tables.record_fields("S__p", vec!["z".to_string()]);
        assert_eq!(
            tables.fields_of("S__p").unwrap(),
            &["x".to_string(), "y".to_string()]
        );
    }

    #[test]
    fn test_dupe_marking() {
        let mut tables = Tables::new();
        let key = NodeKey::new("shared", NodeKind::Function);
        assert!(!tables.is_dupe(&key));
        tables.mark_dupe(key.clone());
        assert!(tables.is_dupe(&key));
    }
}
