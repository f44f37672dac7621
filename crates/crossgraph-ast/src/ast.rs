//! The C abstract syntax tree consumed by the cross-reference engine.
//!
//! This is a distilled AST: one sum type per syntactic category (toplevel,
//! statement, expression, type), the shape a best-effort cross-referencer
//! needs rather than everything a compiler front end tracks. Preprocessor
//! constructs survive as [`Toplevel::Define`], [`Toplevel::Macro`] and
//! [`Toplevel::Include`]; conditional compilation does not. Struct, union and
//! enum definitions appear hoisted at toplevel, the way the external parser
//! delivers them.

use crossgraph::SourceLoc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An identifier with its source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    /// The identifier text
    pub name: String,
    /// Where it appears
    pub loc: SourceLoc,
}

impl Ident {
    /// Create an identifier.
    pub fn new(name: impl Into<String>, loc: SourceLoc) -> Self {
        Self {
            name: name.into(),
            loc,
        }
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

/// C storage class, as far as the cross-referencer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Storage {
    /// No storage-class specifier
    Default,
    /// `static`
    Static,
    /// `extern`
    Extern,
}

/// Struct-or-union discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuKind {
    /// `struct`
    Struct,
    /// `union`
    Union,
}

/// A C type reference or shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    /// Builtin or otherwise unnamed base type (`int`, `unsigned long`, ...)
    Base(String),
    /// Pointer to a type
    Pointer(Box<Type>),
    /// Array of a type, with an optional size expression
    Array(Option<Box<Expr>>, Box<Type>),
    /// Function type
    Function(Box<FunctionType>),
    /// Reference to a struct or union tag (`struct foo`)
    StructName(SuKind, Ident),
    /// Reference to an enum tag (`enum color`)
    EnumName(Ident),
    /// Reference to a typedef name
    TypedefName(Ident),
}

/// Return and parameter types of a function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionType {
    /// Return type
    pub ret: Type,
    /// Parameters in declaration order
    pub params: Vec<Parameter>,
}

/// A function parameter. Abstract declarators have no name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name, absent in abstract declarators
    pub name: Option<Ident>,
    /// Parameter type
    pub ty: Type,
}

impl Type {
    /// Render a compact C-flavoured signature, e.g. `int *`,
    /// `struct point[4]`, `void (int, char *)`.
    ///
    /// The rendering carries no source locations, so two structurally equal
    /// types render identically regardless of where they were written.
    pub fn signature(&self) -> String {
        match self {
            Type::Base(s) => s.clone(),
            Type::Pointer(t) => format!("{} *", t.signature()),
            Type::Array(size, t) => match size.as_deref().and_then(Expr::as_int_literal) {
                Some(n) => format!("{}[{n}]", t.signature()),
                None => format!("{}[]", t.signature()),
            },
            Type::Function(ft) => ft.signature(),
            Type::StructName(SuKind::Struct, n) => format!("struct {}", n.as_str()),
            Type::StructName(SuKind::Union, n) => format!("union {}", n.as_str()),
            Type::EnumName(n) => format!("enum {}", n.as_str()),
            Type::TypedefName(n) => n.as_str().to_string(),
        }
    }

    /// Structural equality, ignoring source locations.
    pub fn same_shape(&self, other: &Type) -> bool {
        self.signature() == other.signature()
    }
}

impl FunctionType {
    /// Render the signature, e.g. `int (int, char *)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.ty.signature()).collect();
        format!("{} ({})", self.ret.signature(), params.join(", "))
    }
}

/// A literal constant. The text is kept verbatim; the engine never evaluates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Integer literal
    Int(String),
    /// Floating-point literal
    Float(String),
    /// Character literal
    Char(String),
    /// String literal
    Str(String),
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum UnOp {
    Neg,
    Not,
    BitNot,
    Deref,
    AddrOf,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// A C expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Literal constant
    Literal(Literal),
    /// Identifier reference: local, global, constant, enum constructor
    Id(Ident),
    /// Call with callee expression and arguments
    Call(Box<Expr>, Vec<Expr>),
    /// Assignment (plain or compound); left- and right-hand sides
    Assign(Box<Expr>, Box<Expr>),
    /// `e.field`
    Field(Box<Expr>, Ident),
    /// `e->field`
    Arrow(Box<Expr>, Ident),
    /// `e[i]`
    Index(Box<Expr>, Box<Expr>),
    /// Unary operation
    Unary(UnOp, Box<Expr>),
    /// Binary operation
    Binary(Box<Expr>, BinOp, Box<Expr>),
    /// `c ? t : e`
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
    /// `(ty) e`
    Cast(Type, Box<Expr>),
    /// `sizeof e`
    SizeOfExpr(Box<Expr>),
    /// `sizeof (ty)`
    SizeOfType(Type),
    /// Brace initializer list
    InitList(Vec<Expr>),
    /// Comma expression
    Comma(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// The value of an integer literal, if this expression is one.
    pub fn as_int_literal(&self) -> Option<&str> {
        match self {
            Expr::Literal(Literal::Int(s)) => Some(s),
            _ => None,
        }
    }
}

/// A C statement. Statements carry no cross-reference information themselves;
/// they are walked only to reach declarations and expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Expression statement
    Expr(Expr),
    /// `{ ... }`
    Block(Vec<Stmt>),
    /// `if` with optional `else`
    If(Expr, Box<Stmt>, Option<Box<Stmt>>),
    /// `while`
    While(Expr, Box<Stmt>),
    /// `do ... while`
    DoWhile(Box<Stmt>, Expr),
    /// `for` with optional init/cond/step expressions
    For(Option<Expr>, Option<Expr>, Option<Expr>, Box<Stmt>),
    /// `switch` over labelled cases
    Switch(Expr, Vec<SwitchCase>),
    /// `return` with optional value
    Return(Option<Expr>),
    /// Labelled statement
    Label(Ident, Box<Stmt>),
    /// `goto`
    Goto(Ident),
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// Block-local variable declarations
    Locals(Vec<VarDecl>),
}

/// One arm of a `switch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SwitchCase {
    /// `case expr: stmts`
    Case(Expr, Vec<Stmt>),
    /// `default: stmts`
    Default(Vec<Stmt>),
}

/// A variable declaration, at file scope (global) or block scope (local).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    /// Declared name
    pub name: Ident,
    /// Storage class
    pub storage: Storage,
    /// Declared type
    pub ty: Type,
    /// Initializer, if any
    pub init: Option<Expr>,
}

/// A function definition (with body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    /// Function name
    pub name: Ident,
    /// Storage class
    pub storage: Storage,
    /// Return type
    pub ret: Type,
    /// Parameters
    pub params: Vec<Parameter>,
    /// Body statements
    pub body: Vec<Stmt>,
}

impl FunctionDef {
    /// The function's type, assembled from return type and parameters.
    pub fn func_type(&self) -> FunctionType {
        FunctionType {
            ret: self.ret.clone(),
            params: self.params.clone(),
        }
    }
}

/// A function prototype (declaration without body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prototype {
    /// Declared name
    pub name: Ident,
    /// Storage class
    pub storage: Storage,
    /// Return type
    pub ret: Type,
    /// Parameters
    pub params: Vec<Parameter>,
}

impl Prototype {
    /// The declared function type.
    pub fn func_type(&self) -> FunctionType {
        FunctionType {
            ret: self.ret.clone(),
            params: self.params.clone(),
        }
    }
}

/// A struct or union definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    /// Tag name
    pub name: Ident,
    /// Struct or union
    pub su: SuKind,
    /// Members in declaration order
    pub fields: Vec<FieldDef>,
}

/// A struct or union member. Anonymous members (unnamed bitfields, anonymous
/// substructs) have no name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Member name, if any
    pub name: Option<Ident>,
    /// Member type
    pub ty: Type,
}

/// An enum definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Tag name
    pub name: Ident,
    /// Enumerators in declaration order
    pub constants: Vec<EnumConstant>,
}

/// One enumerator of an enum definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConstant {
    /// Enumerator name
    pub name: Ident,
    /// Explicit value expression, if any
    pub value: Option<Expr>,
}

/// A typedef.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedefDef {
    /// Defined name
    pub name: Ident,
    /// Aliased type
    pub ty: Type,
}

/// `#define NAME value`: an object-like macro defining a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Define {
    /// Constant name
    pub name: Ident,
    /// Body expression, when the parser could make sense of it
    pub body: Option<Expr>,
}

/// `#define NAME(args) body`: a function-like macro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroDef {
    /// Macro name
    pub name: Ident,
    /// Macro parameters
    pub params: Vec<Ident>,
    /// Body, when the parser could make sense of it
    pub body: Option<MacroBody>,
}

/// The body of a function-like macro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MacroBody {
    /// Expression-shaped body
    Expr(Expr),
    /// Statement-shaped body
    Stmt(Stmt),
}

/// `#include` directive. Recorded by the parser, ignored by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Include {
    /// Included path as written, without the quotes/brackets
    pub path: String,
}

/// One top-level form of a translation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Toplevel {
    /// Object-like `#define`
    Define(Define),
    /// Function-like macro
    Macro(MacroDef),
    /// `#include`
    Include(Include),
    /// Struct or union definition
    Struct(StructDef),
    /// Enum definition
    Enum(EnumDef),
    /// Typedef
    Typedef(TypedefDef),
    /// Function definition
    Func(FunctionDef),
    /// Function prototype
    Proto(Prototype),
    /// File-scope variable
    Global(VarDecl),
}

/// One parsed source file: the abstract syntax forest the builder traverses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Absolute path of the source file
    pub path: PathBuf,
    /// Top-level forms in source order
    pub toplevels: Vec<Toplevel>,
}
