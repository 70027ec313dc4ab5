//! The IR data model: types, operations, and the assembled program handed
//! to the downstream verifier. See `spec.md` §3.

use indexmap::IndexMap;

/// `spec.md` §3: primitive `{Int|Boolean|Bytes}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Boolean,
    Bytes,
}

/// Two `IrType`s are equal iff structurally identical after substitution —
/// `#[derive(PartialEq)]` gives exactly that, since type variables compare
/// by id and compounds compare by `(record_id, type_arguments)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrType {
    Primitive(PrimitiveType),
    Compound { record_id: String, type_arguments: Vec<IrType> },
    TypeVar(usize),
}

impl std::fmt::Display for IrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrType::Primitive(PrimitiveType::Int) => write!(f, "Int"),
            IrType::Primitive(PrimitiveType::Boolean) => write!(f, "Boolean"),
            IrType::Primitive(PrimitiveType::Bytes) => write!(f, "String"),
            IrType::TypeVar(id) => write!(f, "#{id}"),
            IrType::Compound { record_id, type_arguments } if type_arguments.is_empty() => write!(f, "{record_id}"),
            IrType::Compound { record_id, type_arguments } => {
                write!(f, "{record_id}[")?;
                for (i, arg) in type_arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl IrType {
    pub fn is_compound(&self) -> bool {
        matches!(self, IrType::Compound { .. })
    }

    /// Substitutes type variables by position, the way call-site and
    /// constraint checking both need to (`spec.md` §4.4/§4.6).
    pub fn substitute(&self, table: &[IrType]) -> IrType {
        match self {
            IrType::Primitive(p) => IrType::Primitive(*p),
            IrType::TypeVar(id) => table.get(*id).cloned().unwrap_or_else(|| IrType::TypeVar(*id)),
            IrType::Compound { record_id, type_arguments } => IrType::Compound {
                record_id: record_id.clone(),
                type_arguments: type_arguments.iter().map(|t| t.substitute(table)).collect(),
            },
        }
    }
}

/// Positional index into a function's flat, append-only variable stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

#[derive(Debug, Clone)]
pub enum ConstValue {
    Int(i64),
    Bytes(String),
    Boolean(bool),
}

/// `spec.md` §3: variable declaration, constant, assignment, static call,
/// foreign call, branch, return, unreachable.
#[derive(Debug, Clone)]
pub enum Op {
    Var { id: VarId, ty: IrType },
    Const { id: VarId, value: ConstValue },
    Assign { dst: VarId, src: VarId },
    StaticCall {
        results: Vec<VarId>,
        function: String,
        type_arguments: Vec<IrType>,
        arguments: Vec<VarId>,
    },
    ForeignCall {
        results: Vec<VarId>,
        name: &'static str,
        arguments: Vec<VarId>,
    },
    Branch {
        condition: VarId,
        true_block: Vec<Op>,
        false_block: Vec<Op>,
    },
    Return { values: Vec<VarId> },
    Unreachable { kind: &'static str },
}

impl Op {
    /// Whether this op unconditionally ends its containing block.
    pub fn terminates(&self) -> bool {
        matches!(self, Op::Return { .. } | Op::Unreachable { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintBinding {
    pub interface_id: String,
    pub subjects: Vec<IrType>,
    pub location: crate::nom_tools::SourceLocation,
}

/// A `requires`/`ensures` clause lowered to a block with a distinguished
/// boolean-valued result variable.
#[derive(Debug, Clone)]
pub struct ContractBlock {
    pub ops: Vec<Op>,
    pub result: VarId,
}

#[derive(Debug, Clone)]
pub struct IrFunctionSignature {
    pub type_parameter_names: Vec<String>,
    pub constraint_parameters: Vec<ConstraintBinding>,
    pub parameters: Vec<(String, IrType)>,
    pub return_types: Vec<IrType>,
    pub preconditions: Vec<ContractBlock>,
    pub postconditions: Vec<ContractBlock>,
}

#[derive(Debug, Clone)]
pub struct IrFunction {
    pub signature: IrFunctionSignature,
    /// `None` for interface member signatures, which have no body.
    pub body: Option<Vec<Op>>,
}

#[derive(Debug, Clone)]
pub struct IrRecord {
    pub type_parameter_names: Vec<String>,
    pub fields: IndexMap<String, IrType>,
}

#[derive(Debug, Clone)]
pub struct IrInterface {
    pub type_parameter_names: Vec<String>,
    pub signatures: IndexMap<String, IrFunctionSignature>,
}

#[derive(Debug, Clone, Copy)]
pub struct ForeignSignatureSemantics {
    pub eq: bool,
}

#[derive(Debug, Clone)]
pub struct ForeignSignature {
    pub parameters: Vec<IrType>,
    pub returns: Vec<IrType>,
    pub semantics: ForeignSignatureSemantics,
}

/// `spec.md` §6: exactly `Int==`, `Int+`, `Int-`.
pub fn foreign_signatures() -> IndexMap<&'static str, ForeignSignature> {
    let mut table = IndexMap::new();
    table.insert(
        "Int==",
        ForeignSignature {
            parameters: vec![IrType::Primitive(PrimitiveType::Int), IrType::Primitive(PrimitiveType::Int)],
            returns: vec![IrType::Primitive(PrimitiveType::Boolean)],
            semantics: ForeignSignatureSemantics { eq: true },
        },
    );
    table.insert(
        "Int+",
        ForeignSignature {
            parameters: vec![IrType::Primitive(PrimitiveType::Int), IrType::Primitive(PrimitiveType::Int)],
            returns: vec![IrType::Primitive(PrimitiveType::Int)],
            semantics: ForeignSignatureSemantics { eq: false },
        },
    );
    table.insert(
        "Int-",
        ForeignSignature {
            parameters: vec![IrType::Primitive(PrimitiveType::Int), IrType::Primitive(PrimitiveType::Int)],
            returns: vec![IrType::Primitive(PrimitiveType::Int)],
            semantics: ForeignSignatureSemantics { eq: false },
        },
    );
    table
}

/// `spec.md` §3: the fully assembled output of `compile_sources`.
#[derive(Debug, Clone)]
pub struct IrProgram {
    pub functions: IndexMap<String, IrFunction>,
    pub records: IndexMap<String, IrRecord>,
    pub interfaces: IndexMap<String, IrInterface>,
    pub foreign_signatures: IndexMap<&'static str, ForeignSignature>,
    /// Initially empty per `spec.md` §3; populated by the (out of scope)
    /// downstream verifier/lowering stage.
    pub vtable_factories: IndexMap<String, ()>,
}
