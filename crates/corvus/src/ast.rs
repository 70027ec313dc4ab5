//! The AST shape produced by the parser and consumed by the elaborator.
//!
//! # File structure
//! A [`Source`] is one parsed file: a package declaration, its imports, and
//! a flat sequence of top-level [`Definition`]s.
//!
//! # Declarations
//! [`RecordDefinition`] and [`InterfaceDefinition`] carry an optional
//! [`TypeParameters`] list, member lists, and (records only) a header list
//! of `is Interface[args]` constraints.
//!
//! # Expressions
//! [`ExpressionAst`] is deliberately *not* a precedence tree: it is a head
//! atom plus a flat list of `(operator, atom)` pairs, exactly as the parser
//! produces it. `elab::precedence` rebuilds this into a tree before
//! type-checking — see `spec.md` §4.7 / §9.
//!
//! # Statements
//! `var`, `return`, `if`/`else if`/`else`, and `unreachable`.
//!
//! # Types
//! `This`, `String`, `Int`, `Boolean`, type variables, and `pkg.Name[args]`.

use crate::nom_tools::SourceLocation;

#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub value: T,
    pub location: SourceLocation,
}

impl<T> Spanned<T> {
    pub fn new(value: T, location: SourceLocation) -> Self {
        Self { value, location }
    }
}

#[derive(Debug, Clone)]
pub struct Source {
    pub package: Spanned<String>,
    pub imports: Vec<ImportAst>,
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone)]
pub enum ImportAst {
    /// `import pkg;`
    Package { name: String, location: SourceLocation },
    /// `import pkg.Name;`
    Entity { package: String, name: String, location: SourceLocation },
}

impl ImportAst {
    pub fn location(&self) -> SourceLocation {
        match self {
            ImportAst::Package { location, .. } => *location,
            ImportAst::Entity { location, .. } => *location,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Definition {
    Record(RecordDefinition),
    Interface(InterfaceDefinition),
}

impl Definition {
    pub fn name(&self) -> &Spanned<String> {
        match self {
            Definition::Record(r) => &r.name,
            Definition::Interface(i) => &i.name,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Definition::Record(r) => r.location,
            Definition::Interface(i) => i.location,
        }
    }
}

/// `[#T, #U | #T is Interface[args], ...]` on a definition.
#[derive(Debug, Clone, Default)]
pub struct TypeParametersAst {
    pub parameters: Vec<Spanned<String>>,
    pub constraints: Vec<ConstraintAst>,
}

/// One `#T is InterfaceName[args]` clause, either attached to a type
/// parameter list or (as `ConstraintHeaderAst`) to a record header.
#[derive(Debug, Clone)]
pub struct ConstraintAst {
    pub subject: TypeAst,
    pub interface: PathAst,
    pub arguments: Vec<TypeAst>,
    pub location: SourceLocation,
}

/// `record B is Good {}` / `record B is Good[Int] {}`.
#[derive(Debug, Clone)]
pub struct ConstraintHeaderAst {
    pub interface: PathAst,
    pub arguments: Vec<TypeAst>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct PathAst {
    pub package: Option<Spanned<String>>,
    pub name: Spanned<String>,
}

#[derive(Debug, Clone)]
pub enum TypeAst {
    This(SourceLocation),
    StringKw(SourceLocation),
    IntKw(SourceLocation),
    BooleanKw(SourceLocation),
    Variable(Spanned<String>),
    Named {
        path: PathAst,
        arguments: Vec<TypeAst>,
        location: SourceLocation,
    },
}

impl TypeAst {
    pub fn location(&self) -> SourceLocation {
        match self {
            TypeAst::This(l) | TypeAst::StringKw(l) | TypeAst::IntKw(l) | TypeAst::BooleanKw(l) => *l,
            TypeAst::Variable(v) => v.location,
            TypeAst::Named { location, .. } => *location,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordDefinition {
    pub name: Spanned<String>,
    pub type_parameters: Option<TypeParametersAst>,
    pub header_constraints: Vec<ConstraintHeaderAst>,
    pub fields: Vec<FieldAst>,
    pub functions: Vec<FnSignatureAst>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct InterfaceDefinition {
    pub name: Spanned<String>,
    pub type_parameters: Option<TypeParametersAst>,
    pub functions: Vec<FnSignatureAst>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct FieldAst {
    pub name: Spanned<String>,
    pub ty: TypeAst,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct ParameterAst {
    pub name: Spanned<String>,
    pub ty: TypeAst,
}

#[derive(Debug, Clone)]
pub struct FnSignatureAst {
    pub proof: bool,
    pub name: Spanned<String>,
    pub parameters: Vec<ParameterAst>,
    pub returns: Vec<TypeAst>,
    pub requires: Vec<ExpressionAst>,
    pub ensures: Vec<ExpressionAst>,
    pub body: Option<Vec<StatementAst>>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub enum StatementAst {
    Var {
        names: Vec<Spanned<String>>,
        types: Vec<Option<TypeAst>>,
        values: Vec<ExpressionAst>,
        location: SourceLocation,
    },
    Return {
        values: Vec<ExpressionAst>,
        location: SourceLocation,
    },
    If {
        branches: Vec<IfBranchAst>,
        else_block: Option<Vec<StatementAst>>,
        location: SourceLocation,
    },
    Unreachable {
        location: SourceLocation,
    },
}

#[derive(Debug, Clone)]
pub struct IfBranchAst {
    pub condition: ExpressionAst,
    pub body: Vec<StatementAst>,
}

/// Flat operand/operator list, exactly as produced by the parser. See the
/// module doc and `spec.md` §4.7 — `elab::precedence` turns this into a
/// tree before any type-checking happens.
#[derive(Debug, Clone)]
pub struct ExpressionAst {
    pub head: Box<ExpressionAtomAst>,
    pub tail: Vec<(OperatorAst, ExpressionAtomAst)>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorAst {
    Implies,
    And,
    Or,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Neq,
    Add,
    Sub,
}

#[derive(Debug, Clone)]
pub enum ExpressionAtomAst {
    Identifier(Spanned<String>),
    IntLiteral(Spanned<i64>),
    StringLiteral(Spanned<String>),
    BoolLiteral(Spanned<bool>),
    Paren(Box<ExpressionAst>),
    /// `return` used as a value, only legal inside an `ensures` clause.
    Return(SourceLocation),
    StaticCall {
        ty: TypeAst,
        method: Spanned<String>,
        arguments: Vec<ExpressionAst>,
        location: SourceLocation,
    },
    FieldAccess {
        base: Box<ExpressionAtomAst>,
        name: Spanned<String>,
        location: SourceLocation,
    },
    MethodAccess {
        base: Box<ExpressionAtomAst>,
        name: Spanned<String>,
        arguments: Vec<ExpressionAst>,
        location: SourceLocation,
    },
    RecordLiteral {
        ty: TypeAst,
        fields: Vec<(Spanned<String>, ExpressionAst)>,
        location: SourceLocation,
    },
}

impl ExpressionAtomAst {
    pub fn location(&self) -> SourceLocation {
        match self {
            ExpressionAtomAst::Identifier(s) => s.location,
            ExpressionAtomAst::IntLiteral(s) => s.location,
            ExpressionAtomAst::StringLiteral(s) => s.location,
            ExpressionAtomAst::BoolLiteral(s) => s.location,
            ExpressionAtomAst::Paren(e) => e.location,
            ExpressionAtomAst::Return(l) => *l,
            ExpressionAtomAst::StaticCall { location, .. }
            | ExpressionAtomAst::FieldAccess { location, .. }
            | ExpressionAtomAst::MethodAccess { location, .. }
            | ExpressionAtomAst::RecordLiteral { location, .. } => *location,
        }
    }
}
