//! # crossgraph-ast
//!
//! The C abstract syntax tree consumed by the crossgraph engine, plus the
//! contract for the external parser that produces it.
//!
//! The AST is one sum type per syntactic category (toplevel, statement,
//! expression, type) so the engine's walkers pattern-match exhaustively.
//! Identifiers carry [`crossgraph::SourceLoc`] positions; types render to
//! compact signatures via [`Type::signature`] for storage as node info.
//!
//! ## Example
//!
//! ```rust
//! use crossgraph::SourceLoc;
//! use crossgraph_ast::{Ident, SuKind, Type};
//!
//! let ty = Type::Pointer(Box::new(Type::StructName(
//!     SuKind::Struct,
//!     Ident::new("point", SourceLoc::new("geo.h", 3, 8)),
//! )));
//! assert_eq!(ty.signature(), "struct point *");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod ast;
pub mod errors;
pub mod traits;

pub use ast::{
    BinOp, Define, EnumConstant, EnumDef, Expr, FieldDef, FunctionDef, FunctionType, Ident,
    Include, Literal, MacroBody, MacroDef, Parameter, Prototype, Stmt, Storage, StructDef, SuKind,
    SwitchCase, Toplevel, TranslationUnit, Type, TypedefDef, UnOp, VarDecl,
};
pub use errors::{ParseError, ParseResult};
pub use traits::UnitParser;
