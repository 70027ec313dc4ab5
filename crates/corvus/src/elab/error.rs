//! The semantic error taxonomy from `spec.md` §7. Each variant is its own
//! struct (teacher's pattern in `tir/error.rs`): `thiserror::Error` gives
//! the `Display` message, `CorvusError` gives the `miette`/`codespan`
//! diagnostic (labeled spans, help text, source snippet).
//!
//! Internal consistency faults (`spec.md` §7: "these should be unreachable
//! if invariants hold") are a separate, non-diagnostic variant: `Ice`.

use std::ops::Range;

use corvus_macros::CorvusError;
use corvus_macros_core::SourceCode;

macro_rules! simple_error {
    ($name:ident, $msg:literal, $code:literal, $help:literal $(, $field:ident : $ty:ty)* $(,)?) => {
        #[derive(Clone, Debug, thiserror::Error, CorvusError)]
        #[error($msg)]
        #[diagnostic(code($code), help($help))]
        pub struct $name {
            $(pub $field: $ty,)*
            #[label("here")]
            pub position: Range<usize>,
            #[source_code]
            pub code: SourceCode,
        }
    };
}

simple_error!(EntityRedefined, "'{name}' is already defined", "corvus::entity_redefined", "remove or rename one of the definitions", name: String, existing_position: Range<usize>);
simple_error!(NoSuchPackage, "no such package '{package}'", "corvus::no_such_package", "check the package name", package: String);
simple_error!(NoSuchEntity, "no such entity '{name}'", "corvus::no_such_entity", "check the entity name and its package", name: String);
simple_error!(NamespaceAlreadyDefined, "namespace '{name}' is already imported", "corvus::namespace_already_defined", "remove the duplicate import", name: String, existing_position: Range<usize>);
simple_error!(SelfImportNotAllowed, "cannot import '{name}', the current package", "corvus::self_import_not_allowed", "remove the redundant self-import", name: String);
simple_error!(InvalidThisType, "'This' is not valid outside an interface", "corvus::invalid_this_type", "use the interface's 'This' only inside interface bodies");
simple_error!(MemberRedefined, "member '{name}' is already defined", "corvus::member_redefined", "fields and functions share one namespace per record", name: String, existing_position: Range<usize>);
simple_error!(TypeVariableRedefined, "type variable '{name}' is already declared", "corvus::type_variable_redefined", "rename one of the type parameters", name: String, existing_position: Range<usize>);
simple_error!(NoSuchTypeVariable, "no such type variable '{name}'", "corvus::no_such_type_variable", "declare '{name}' in the enclosing type-parameter list", name: String);
simple_error!(NonTypeEntityUsedAsType, "'{name}' is an interface and cannot be used as a type", "corvus::non_type_entity_used_as_type", "use a record type here instead", name: String);
simple_error!(TypeUsedAsConstraint, "'{name}' is not an interface and cannot constrain a type parameter", "corvus::type_used_as_constraint", "constraints must name an interface", name: String);
simple_error!(VariableRedefined, "variable '{name}' is already defined in this scope", "corvus::variable_redefined", "rename one of the variables", name: String, existing_position: Range<usize>);
simple_error!(VariableNotDefined, "no such variable '{name}'", "corvus::variable_not_defined", "declare '{name}' with 'var' before using it", name: String);
simple_error!(MultiExpressionGrouped, "a {grouping} expression must produce exactly one value", "corvus::multi_expression_grouped", "wrap the expression or split it into a 'var' statement", grouping: String);
simple_error!(ValueCountMismatch, "expected {expected} value(s), found {actual}", "corvus::value_count_mismatch", "match the number of values on both sides", expected: usize, actual: usize);
simple_error!(TypeMismatch, "expected type '{expected}', found '{actual}'", "corvus::type_mismatch", "change the expression's type or the declared type", expected: String, actual: String);
simple_error!(FieldAccessOnNonCompound, "field access requires a record-typed value", "corvus::field_access_on_non_compound", "only record values have fields");
simple_error!(MethodAccessOnNonCompound, "method access requires a record-typed value", "corvus::method_access_on_non_compound", "only record values have methods");
simple_error!(BooleanTypeExpected, "a {reason} expression must have type Boolean", "corvus::boolean_type_expected", "compare or negate to produce a Boolean");
simple_error!(TypeDoesNotProvideOperator, "type '{ty}' does not provide operator '{operator}'", "corvus::type_does_not_provide_operator", "only Int provides '==', '+', and '-'", operator: String, ty: String);
simple_error!(OperatorTypeMismatch, "operand types do not match for operator '{operator}'", "corvus::operator_type_mismatch", "both operands of '{operator}' must share a type", operator: String);
simple_error!(CallOnNonCompound, "static call target must be a record type", "corvus::call_on_non_compound", "call methods on a record type");
simple_error!(NoSuchFn, "no such function '{name}'", "corvus::no_such_fn", "check the function name on the target record", name: String);
simple_error!(OperationRequiresParenthesization, "operator expression is {reason}; add parentheses", "corvus::operation_requires_parenthesization", "group the operators explicitly with parentheses", reason: String);
simple_error!(RecursivePrecondition, "precondition recurses into its own function", "corvus::recursive_precondition", "break the cycle by simplifying the precondition");
simple_error!(ReturnExpressionUsedOutsideEnsures, "'return' can only be used as a value inside 'ensures'", "corvus::return_expression_used_outside_ensures", "move this expression into an 'ensures' clause");
simple_error!(NonCompoundInRecordLiteral, "record literal target must be a record type", "corvus::non_compound_in_record_literal", "use a record type as the literal's target");
simple_error!(FieldRepeatedInRecordLiteral, "field '{name}' is initialized more than once", "corvus::field_repeated_in_record_literal", "remove the duplicate field initializer", name: String, existing_position: Range<usize>);
simple_error!(NoSuchField, "no such field '{name}'", "corvus::no_such_field", "check the field name on the target record", name: String);
simple_error!(UninitializedField, "field '{name}' is never initialized", "corvus::uninitialized_field", "add an initializer for every declared field", name: String);
simple_error!(TypeParameterCountMismatch, "expected {expected} type argument(s), found {actual}", "corvus::type_parameter_count_mismatch", "match the entity's declared type-parameter count", expected: usize, actual: usize);

/// `TypesDontSatisfyConstraint` carries two locations that are rarely in
/// the same file region as each other, so both are surfaced as labels.
#[derive(Clone, Debug, thiserror::Error, CorvusError)]
#[error("'{subject}' does not satisfy constraint '{interface}'")]
#[diagnostic(code("corvus::types_dont_satisfy_constraint"), help("implement the interface on '{subject}' or add the constraint to the enclosing scope"))]
pub struct TypesDontSatisfyConstraint {
    pub subject: String,
    pub interface: String,
    #[label("constraint required here")]
    pub position: Range<usize>,
    #[label("constraint declared here")]
    pub declared_position: Range<usize>,
    #[source_code]
    pub code: SourceCode,
}

/// All user-visible semantic failures, plus internal consistency faults
/// (`spec.md` §7) which are not part of this taxonomy and carry no
/// diagnostic metadata.
#[derive(Clone, Debug, thiserror::Error)]
pub enum SemanticError {
    #[error(transparent)]
    EntityRedefined(#[from] EntityRedefined),
    #[error(transparent)]
    NoSuchPackage(#[from] NoSuchPackage),
    #[error(transparent)]
    NoSuchEntity(#[from] NoSuchEntity),
    #[error(transparent)]
    NamespaceAlreadyDefined(#[from] NamespaceAlreadyDefined),
    #[error(transparent)]
    SelfImportNotAllowed(#[from] SelfImportNotAllowed),
    #[error(transparent)]
    InvalidThisType(#[from] InvalidThisType),
    #[error(transparent)]
    MemberRedefined(#[from] MemberRedefined),
    #[error(transparent)]
    TypeVariableRedefined(#[from] TypeVariableRedefined),
    #[error(transparent)]
    NoSuchTypeVariable(#[from] NoSuchTypeVariable),
    #[error(transparent)]
    NonTypeEntityUsedAsType(#[from] NonTypeEntityUsedAsType),
    #[error(transparent)]
    TypeUsedAsConstraint(#[from] TypeUsedAsConstraint),
    #[error(transparent)]
    VariableRedefined(#[from] VariableRedefined),
    #[error(transparent)]
    VariableNotDefined(#[from] VariableNotDefined),
    #[error(transparent)]
    MultiExpressionGrouped(#[from] MultiExpressionGrouped),
    #[error(transparent)]
    ValueCountMismatch(#[from] ValueCountMismatch),
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),
    #[error(transparent)]
    FieldAccessOnNonCompound(#[from] FieldAccessOnNonCompound),
    #[error(transparent)]
    MethodAccessOnNonCompound(#[from] MethodAccessOnNonCompound),
    #[error(transparent)]
    BooleanTypeExpected(#[from] BooleanTypeExpected),
    #[error(transparent)]
    TypeDoesNotProvideOperator(#[from] TypeDoesNotProvideOperator),
    #[error(transparent)]
    OperatorTypeMismatch(#[from] OperatorTypeMismatch),
    #[error(transparent)]
    CallOnNonCompound(#[from] CallOnNonCompound),
    #[error(transparent)]
    NoSuchFn(#[from] NoSuchFn),
    #[error(transparent)]
    OperationRequiresParenthesization(#[from] OperationRequiresParenthesization),
    #[error(transparent)]
    RecursivePrecondition(#[from] RecursivePrecondition),
    #[error(transparent)]
    ReturnExpressionUsedOutsideEnsures(#[from] ReturnExpressionUsedOutsideEnsures),
    #[error(transparent)]
    TypesDontSatisfyConstraint(#[from] TypesDontSatisfyConstraint),
    #[error(transparent)]
    NonCompoundInRecordLiteral(#[from] NonCompoundInRecordLiteral),
    #[error(transparent)]
    FieldRepeatedInRecordLiteral(#[from] FieldRepeatedInRecordLiteral),
    #[error(transparent)]
    NoSuchField(#[from] NoSuchField),
    #[error(transparent)]
    UninitializedField(#[from] UninitializedField),
    #[error(transparent)]
    TypeParameterCountMismatch(#[from] TypeParameterCountMismatch),
    /// Internal consistency fault: an invariant from `spec.md` §3 was
    /// violated. Should be unreachable; never constructed from user input.
    #[error("ICE: {0}")]
    Ice(String),
}

pub type SemanticResult<T> = Result<T, SemanticError>;
