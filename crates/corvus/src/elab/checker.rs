//! The expression/statement checker (`spec.md` §4.6) and logical-operator
//! lowering (§4.8). Everything here appends to a per-block `Vec<Op>` under
//! a shared [`VariableStack`].

use crate::ast::{ExpressionAst, ExpressionAtomAst, IfBranchAst, OperatorAst, StatementAst};
use crate::elab::context::{ProgramContext, SourceContext};
use crate::elab::error::*;
use crate::elab::ir::{ConstValue, ContractBlock, IrType, Op, PrimitiveType, VarId};
use crate::elab::precedence::{build_tree, ExprTree};
use crate::elab::scope::TypeScope;
use crate::elab::types::{self, Mode};
use crate::elab::variables::VariableStack;
use crate::nom_tools::SourceLocation;

/// The read-only half of a function body's checking context — the mutable
/// half ([`VariableStack`], the `Vec<Op>` being built) is threaded
/// separately since different subtrees (branch arms, contract clauses)
/// need their own block.
pub struct FnCheckCtx<'a> {
    pub scope: &'a TypeScope,
    pub source_context: &'a SourceContext,
    pub program: &'a ProgramContext,
    pub return_types: &'a [IrType],
    pub in_ensures: bool,
    /// Pre-declared temporaries standing in for the synthetic return tuple,
    /// valid only when `in_ensures` — what the `return` keyword evaluates
    /// to inside an `ensures` clause (`spec.md` §4.6/§4.9).
    pub return_temps: Vec<(VarId, IrType)>,
}

fn operator_symbol(op: OperatorAst) -> &'static str {
    match op {
        OperatorAst::Implies => "implies",
        OperatorAst::And => "and",
        OperatorAst::Or => "or",
        OperatorAst::Lt => "<",
        OperatorAst::Gt => ">",
        OperatorAst::Le => "<=",
        OperatorAst::Ge => ">=",
        OperatorAst::Eq => "==",
        OperatorAst::Neq => "!=",
        OperatorAst::Add => "+",
        OperatorAst::Sub => "-",
    }
}

/// Opens a fresh lexical block, runs every statement in it, and returns the
/// ops it accumulated. Used for function bodies and each `if`/`else` arm.
pub fn check_block(stmts: &[StatementAst], ctx: &FnCheckCtx, vars: &mut VariableStack) -> SemanticResult<Vec<Op>> {
    vars.open_block();
    let mut ops = Vec::new();
    for stmt in stmts {
        check_statement(stmt, ctx, vars, &mut ops)?;
    }
    vars.close_block();
    Ok(ops)
}

pub fn check_statement(stmt: &StatementAst, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>) -> SemanticResult<()> {
    match stmt {
        StatementAst::Var { names, types, values, location } => check_var(names, types, values, *location, ctx, vars, ops),
        StatementAst::Return { values, location } => check_return(values, *location, ctx, vars, ops),
        StatementAst::If { branches, else_block, .. } => {
            let chain = compile_if_chain(branches, else_block.as_deref(), ctx, vars)?;
            ops.extend(chain);
            Ok(())
        }
        StatementAst::Unreachable { .. } => {
            ops.push(Op::Unreachable { kind: "explicit" });
            Ok(())
        }
    }
}

fn check_var(names: &[crate::ast::Spanned<String>], types: &[Option<crate::ast::TypeAst>], values: &[ExpressionAst], location: crate::nom_tools::SourceLocation, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>) -> SemanticResult<()> {
    let mut flattened = Vec::new();
    for value in values {
        flattened.extend(compile_expression(value, ctx, vars, ops)?);
    }
    if flattened.len() != names.len() {
        return Err(SemanticError::from(ValueCountMismatch {
            expected: names.len(),
            actual: flattened.len(),
            position: location.range(),
            code: ctx.program.source_code(location.file_id),
        }));
    }

    for (i, name) in names.iter().enumerate() {
        if vars.is_active(&name.value) {
            let (_, _, existing_location) = vars.lookup(&name.value).expect("is_active implies lookup succeeds");
            return Err(SemanticError::from(VariableRedefined {
                name: name.value.clone(),
                existing_position: existing_location.range(),
                position: name.location.range(),
                code: ctx.program.source_code(name.location.file_id),
            }));
        }

        let (src_id, rhs_ty) = flattened[i].clone();
        let declared_ty = match &types[i] {
            Some(ty_ast) => {
                let declared = types::compile_type(ty_ast, ctx.scope, ctx.source_context, ctx.program, Mode::Check)?;
                if declared != rhs_ty {
                    return Err(SemanticError::from(TypeMismatch {
                        expected: declared.to_string(),
                        actual: rhs_ty.to_string(),
                        position: ty_ast.location().range(),
                        code: ctx.program.source_code(ty_ast.location().file_id),
                    }));
                }
                declared
            }
            None => rhs_ty,
        };

        let dst_id = vars.declare(name.value.clone(), declared_ty.clone(), name.location);
        ops.push(Op::Var { id: dst_id, ty: declared_ty });
        ops.push(Op::Assign { dst: dst_id, src: src_id });
    }

    Ok(())
}

fn check_return(values: &[ExpressionAst], location: crate::nom_tools::SourceLocation, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>) -> SemanticResult<()> {
    let mut flattened = Vec::new();
    for value in values {
        flattened.extend(compile_expression(value, ctx, vars, ops)?);
    }
    if flattened.len() != ctx.return_types.len() {
        return Err(SemanticError::from(ValueCountMismatch {
            expected: ctx.return_types.len(),
            actual: flattened.len(),
            position: location.range(),
            code: ctx.program.source_code(location.file_id),
        }));
    }
    for (expected, (_, actual)) in ctx.return_types.iter().zip(flattened.iter()) {
        if expected != actual {
            return Err(SemanticError::from(TypeMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
                position: location.range(),
                code: ctx.program.source_code(location.file_id),
            }));
        }
    }
    ops.push(Op::Return { values: flattened.into_iter().map(|(id, _)| id).collect() });
    Ok(())
}

fn compile_condition(expr: &ExpressionAst, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>, reason: &str) -> SemanticResult<VarId> {
    let values = compile_expression(expr, ctx, vars, ops)?;
    if values.len() != 1 {
        return Err(SemanticError::from(MultiExpressionGrouped {
            grouping: reason.to_string(),
            position: expr.location.range(),
            code: ctx.program.source_code(expr.location.file_id),
        }));
    }
    let (id, ty) = &values[0];
    if *ty != IrType::Primitive(PrimitiveType::Boolean) {
        return Err(SemanticError::from(BooleanTypeExpected {
            reason: reason.to_string(),
            position: expr.location.range(),
            code: ctx.program.source_code(expr.location.file_id),
        }));
    }
    Ok(*id)
}

fn compile_if_chain(branches: &[IfBranchAst], else_block: Option<&[StatementAst]>, ctx: &FnCheckCtx, vars: &mut VariableStack) -> SemanticResult<Vec<Op>> {
    let (first, rest) = branches.split_first().expect("an if statement always has at least one branch");
    let mut block = Vec::new();
    let condition = compile_condition(&first.condition, ctx, vars, &mut block, "if")?;
    let true_block = check_block(&first.body, ctx, vars)?;
    let false_block = if !rest.is_empty() {
        compile_if_chain(rest, else_block, ctx, vars)?
    } else {
        match else_block {
            Some(stmts) => check_block(stmts, ctx, vars)?,
            None => Vec::new(),
        }
    };
    block.push(Op::Branch { condition, true_block, false_block });
    Ok(block)
}

/// Rebuilds `expr`'s flat operator list into a tree, then lowers it.
/// Returns the list of `(value, type)` this expression evaluates to — more
/// than one only for a static call with multiple declared return types.
pub fn compile_expression(expr: &ExpressionAst, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>) -> SemanticResult<Vec<(VarId, IrType)>> {
    let tree = build_tree(expr, ctx.program)?;
    compile_tree(&tree, ctx, vars, ops)
}

fn compile_tree(tree: &ExprTree, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>) -> SemanticResult<Vec<(VarId, IrType)>> {
    match tree {
        ExprTree::Atom(atom) => compile_atom(atom, ctx, vars, ops),
        ExprTree::Binary { op, left, right } => compile_binary(*op, left, right, ctx, vars, ops),
    }
}

fn compile_atom(atom: &ExpressionAtomAst, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>) -> SemanticResult<Vec<(VarId, IrType)>> {
    match atom {
        ExpressionAtomAst::Identifier(name) => match vars.lookup(&name.value) {
            Some((id, ty, _)) => Ok(vec![(id, ty.clone())]),
            None => Err(SemanticError::from(VariableNotDefined {
                name: name.value.clone(),
                position: name.location.range(),
                code: ctx.program.source_code(name.location.file_id),
            })),
        },
        ExpressionAtomAst::IntLiteral(value) => {
            let id = vars.declare_temp(IrType::Primitive(PrimitiveType::Int), value.location);
            ops.push(Op::Const { id, value: ConstValue::Int(value.value) });
            Ok(vec![(id, IrType::Primitive(PrimitiveType::Int))])
        }
        ExpressionAtomAst::StringLiteral(value) => {
            let id = vars.declare_temp(IrType::Primitive(PrimitiveType::Bytes), value.location);
            ops.push(Op::Const { id, value: ConstValue::Bytes(value.value.clone()) });
            Ok(vec![(id, IrType::Primitive(PrimitiveType::Bytes))])
        }
        ExpressionAtomAst::BoolLiteral(value) => {
            let id = vars.declare_temp(IrType::Primitive(PrimitiveType::Boolean), value.location);
            ops.push(Op::Const { id, value: ConstValue::Boolean(value.value) });
            Ok(vec![(id, IrType::Primitive(PrimitiveType::Boolean))])
        }
        ExpressionAtomAst::Paren(inner) => {
            let values = compile_expression(inner, ctx, vars, ops)?;
            if values.len() != 1 {
                return Err(SemanticError::from(MultiExpressionGrouped {
                    grouping: "parenthesized".to_string(),
                    position: inner.location.range(),
                    code: ctx.program.source_code(inner.location.file_id),
                }));
            }
            Ok(values)
        }
        ExpressionAtomAst::Return(location) => {
            if !ctx.in_ensures {
                return Err(SemanticError::from(ReturnExpressionUsedOutsideEnsures {
                    position: location.range(),
                    code: ctx.program.source_code(location.file_id),
                }));
            }
            Ok(ctx.return_temps.clone())
        }
        ExpressionAtomAst::StaticCall { ty, method, arguments, location } => compile_static_call(ty, method, arguments, *location, ctx, vars, ops),
        ExpressionAtomAst::FieldAccess { base, name, location } => {
            let base_values = compile_atom(base, ctx, vars, ops)?;
            if base_values.len() != 1 {
                return Err(SemanticError::from(MultiExpressionGrouped {
                    grouping: "field".to_string(),
                    position: location.range(),
                    code: ctx.program.source_code(location.file_id),
                }));
            }
            let (_, base_ty) = &base_values[0];
            let record_id = match base_ty {
                IrType::Compound { record_id, .. } => record_id.clone(),
                _ => {
                    return Err(SemanticError::from(FieldAccessOnNonCompound {
                        position: location.range(),
                        code: ctx.program.source_code(location.file_id),
                    }))
                }
            };
            let entity = ctx.program.entities_by_canonical.get(&record_id).ok_or_else(|| SemanticError::Ice(format!("'{record_id}' resolved as a field-access base but has no entity entry")))?;
            if !entity.fields.contains_key(&name.value) {
                return Err(SemanticError::from(NoSuchField {
                    name: name.value.clone(),
                    position: name.location.range(),
                    code: ctx.program.source_code(name.location.file_id),
                }));
            }
            Err(SemanticError::Ice(format!("lowering '{record_id}.{}' field access is not implemented", name.value)))
        }
        ExpressionAtomAst::MethodAccess { base, name, arguments, location } => {
            let base_values = compile_atom(base, ctx, vars, ops)?;
            if base_values.len() != 1 {
                return Err(SemanticError::from(MultiExpressionGrouped {
                    grouping: "method".to_string(),
                    position: location.range(),
                    code: ctx.program.source_code(location.file_id),
                }));
            }
            let (_, base_ty) = &base_values[0];
            let record_id = match base_ty {
                IrType::Compound { record_id, .. } => record_id.clone(),
                _ => {
                    return Err(SemanticError::from(MethodAccessOnNonCompound {
                        position: location.range(),
                        code: ctx.program.source_code(location.file_id),
                    }))
                }
            };
            let entity = ctx.program.entities_by_canonical.get(&record_id).ok_or_else(|| SemanticError::Ice(format!("'{record_id}' resolved as a method-access base but has no entity entry")))?;
            if !entity.functions.contains_key(&name.value) {
                return Err(SemanticError::from(NoSuchFn {
                    name: name.value.clone(),
                    position: name.location.range(),
                    code: ctx.program.source_code(name.location.file_id),
                }));
            }
            for argument in arguments {
                compile_expression(argument, ctx, vars, ops)?;
            }
            Err(SemanticError::Ice(format!("lowering '{record_id}.{}' method dispatch is not implemented", name.value)))
        }
        ExpressionAtomAst::RecordLiteral { ty, fields, location } => {
            let elaborated = types::compile_type(ty, ctx.scope, ctx.source_context, ctx.program, Mode::Check)?;
            let record_id = match &elaborated {
                IrType::Compound { record_id, .. } => record_id.clone(),
                _ => {
                    return Err(SemanticError::from(NonCompoundInRecordLiteral {
                        position: location.range(),
                        code: ctx.program.source_code(location.file_id),
                    }))
                }
            };
            let entity = ctx.program.entities_by_canonical.get(&record_id).ok_or_else(|| SemanticError::Ice(format!("'{record_id}' resolved as a record-literal target but has no entity entry")))?;

            let mut seen: indexmap::IndexMap<String, crate::nom_tools::SourceLocation> = indexmap::IndexMap::new();
            for (field_name, value_expr) in fields {
                if let Some(existing) = seen.get(&field_name.value) {
                    return Err(SemanticError::from(FieldRepeatedInRecordLiteral {
                        name: field_name.value.clone(),
                        existing_position: existing.range(),
                        position: field_name.location.range(),
                        code: ctx.program.source_code(field_name.location.file_id),
                    }));
                }
                if !entity.fields.contains_key(&field_name.value) {
                    return Err(SemanticError::from(NoSuchField {
                        name: field_name.value.clone(),
                        position: field_name.location.range(),
                        code: ctx.program.source_code(field_name.location.file_id),
                    }));
                }
                seen.insert(field_name.value.clone(), field_name.location);
                compile_expression(value_expr, ctx, vars, ops)?;
            }
            for field_name in entity.fields.keys() {
                if !seen.contains_key(field_name) {
                    return Err(SemanticError::from(UninitializedField {
                        name: field_name.clone(),
                        position: location.range(),
                        code: ctx.program.source_code(location.file_id),
                    }));
                }
            }

            Err(SemanticError::Ice(format!("lowering a '{record_id}' record literal is not implemented")))
        }
    }
}

fn compile_static_call(ty: &crate::ast::TypeAst, method: &crate::ast::Spanned<String>, arguments: &[ExpressionAst], location: crate::nom_tools::SourceLocation, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>) -> SemanticResult<Vec<(VarId, IrType)>> {
    let elaborated = types::compile_type(ty, ctx.scope, ctx.source_context, ctx.program, Mode::Check)?;
    let (record_id, type_arguments) = match elaborated {
        IrType::Compound { record_id, type_arguments } => (record_id, type_arguments),
        _ => {
            return Err(SemanticError::from(CallOnNonCompound {
                position: location.range(),
                code: ctx.program.source_code(location.file_id),
            }))
        }
    };

    let entity = ctx.program.entities_by_canonical.get(&record_id).ok_or_else(|| SemanticError::Ice(format!("'{record_id}' resolved as a static-call target but has no entity entry")))?;
    let member = entity.functions.get(&method.value).ok_or_else(|| {
        SemanticError::from(NoSuchFn {
            name: method.value.clone(),
            position: method.location.range(),
            code: ctx.program.source_code(method.location.file_id),
        })
    })?;
    let signature = member.signature.as_ref().ok_or_else(|| SemanticError::Ice(format!("'{record_id}.{}' has no signature after member collection", method.value)))?;

    let mut call_args = Vec::new();
    for argument in arguments {
        call_args.extend(compile_expression(argument, ctx, vars, ops)?);
    }
    if call_args.len() != signature.parameters.len() {
        return Err(SemanticError::from(ValueCountMismatch {
            expected: signature.parameters.len(),
            actual: call_args.len(),
            position: location.range(),
            code: ctx.program.source_code(location.file_id),
        }));
    }

    for ((_, expected_ty), (_, actual_ty)) in signature.parameters.iter().zip(call_args.iter()) {
        let expected = expected_ty.substitute(&type_arguments);
        if expected != *actual_ty {
            return Err(SemanticError::from(TypeMismatch {
                expected: expected.to_string(),
                actual: actual_ty.to_string(),
                position: location.range(),
                code: ctx.program.source_code(location.file_id),
            }));
        }
    }

    let argument_ids: Vec<VarId> = call_args.into_iter().map(|(id, _)| id).collect();
    let function_id = format!("{record_id}.{}", method.value);
    let mut results = Vec::new();
    for return_ty in &signature.return_types {
        let substituted = return_ty.substitute(&type_arguments);
        let id = vars.declare_temp(substituted.clone(), location);
        results.push((id, substituted));
    }
    ops.push(Op::StaticCall {
        results: results.iter().map(|(id, _)| *id).collect(),
        function: function_id,
        type_arguments,
        arguments: argument_ids,
    });
    Ok(results)
}

fn compile_binary(op: OperatorAst, left: &ExprTree, right: &ExprTree, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>) -> SemanticResult<Vec<(VarId, IrType)>> {
    match op {
        OperatorAst::And | OperatorAst::Or | OperatorAst::Implies => {
            let id = compile_logical(op, left, right, ctx, vars, ops)?;
            Ok(vec![(id, IrType::Primitive(PrimitiveType::Boolean))])
        }
        _ => compile_arithmetic(op, left, right, ctx, vars, ops),
    }
}

fn require_boolean(values: Vec<(VarId, IrType)>, ctx: &FnCheckCtx, location: crate::nom_tools::SourceLocation) -> SemanticResult<VarId> {
    if values.len() != 1 {
        return Err(SemanticError::from(MultiExpressionGrouped {
            grouping: "operator".to_string(),
            position: location.range(),
            code: ctx.program.source_code(location.file_id),
        }));
    }
    let (id, ty) = &values[0];
    if *ty != IrType::Primitive(PrimitiveType::Boolean) {
        return Err(SemanticError::from(BooleanTypeExpected {
            reason: "operator".to_string(),
            position: location.range(),
            code: ctx.program.source_code(location.file_id),
        }));
    }
    Ok(*id)
}

/// `spec.md` §4.8: `and`/`or`/`implies` lower to a short-circuiting
/// `op-branch` on a pre-declared boolean temporary. Evaluating the right
/// operand always happens inside its own block so its temporaries do not
/// leak past the branch.
fn compile_logical(op: OperatorAst, left: &ExprTree, right: &ExprTree, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>) -> SemanticResult<VarId> {
    let left_location = left.location();
    let right_location = right.location();
    let left_values = compile_tree(left, ctx, vars, ops)?;
    let left_id = require_boolean(left_values, ctx, left_location)?;
    let result = vars.declare_temp(IrType::Primitive(PrimitiveType::Boolean), left_location);

    let mut eval_right = |vars: &mut VariableStack| -> SemanticResult<Vec<Op>> {
        vars.open_block();
        let mut block = Vec::new();
        let right_values = compile_tree(right, ctx, vars, &mut block)?;
        let right_id = require_boolean(right_values, ctx, right_location)?;
        block.push(Op::Assign { dst: result, src: right_id });
        vars.close_block();
        Ok(block)
    };

    let (true_block, false_block) = match op {
        OperatorAst::Or => (vec![Op::Assign { dst: result, src: left_id }], eval_right(vars)?),
        OperatorAst::And => (eval_right(vars)?, vec![Op::Assign { dst: result, src: left_id }]),
        OperatorAst::Implies => {
            let true_side = eval_right(vars)?;
            let const_id = vars.declare_temp(IrType::Primitive(PrimitiveType::Boolean), left_location);
            let false_side = vec![Op::Const { id: const_id, value: ConstValue::Boolean(true) }, Op::Assign { dst: result, src: const_id }];
            (true_side, false_side)
        }
        _ => unreachable!("compile_logical only handles and/or/implies"),
    };

    ops.push(Op::Branch { condition: left_id, true_block, false_block });
    Ok(result)
}

/// `spec.md` §4.8: arithmetic/comparison dispatch on the left operand's
/// type. Only `Int==`, `Int+`, `Int-` exist as foreign functions — every
/// other operator/type combination is unimplemented by design (`spec.md`
/// §6: "a standard library beyond three integer/boolean built-in
/// operators" is a non-goal).
fn compile_arithmetic(op: OperatorAst, left: &ExprTree, right: &ExprTree, ctx: &FnCheckCtx, vars: &mut VariableStack, ops: &mut Vec<Op>) -> SemanticResult<Vec<(VarId, IrType)>> {
    let left_location = left.location();
    let right_location = right.location();
    let combined = SourceLocation {
        file_id: left_location.file_id,
        offset: left_location.offset,
        length: (right_location.offset + right_location.length).saturating_sub(left_location.offset),
    };

    let left_values = compile_tree(left, ctx, vars, ops)?;
    if left_values.len() != 1 {
        return Err(SemanticError::from(MultiExpressionGrouped {
            grouping: "operator".to_string(),
            position: left_location.range(),
            code: ctx.program.source_code(left_location.file_id),
        }));
    }
    let (left_id, left_ty) = left_values[0].clone();

    let right_values = compile_tree(right, ctx, vars, ops)?;
    if right_values.len() != 1 {
        return Err(SemanticError::from(MultiExpressionGrouped {
            grouping: "operator".to_string(),
            position: right_location.range(),
            code: ctx.program.source_code(right_location.file_id),
        }));
    }
    let (right_id, right_ty) = right_values[0].clone();

    let foreign_name: &'static str = match (op, &left_ty) {
        (OperatorAst::Eq, IrType::Primitive(PrimitiveType::Int)) => "Int==",
        (OperatorAst::Add, IrType::Primitive(PrimitiveType::Int)) => "Int+",
        (OperatorAst::Sub, IrType::Primitive(PrimitiveType::Int)) => "Int-",
        _ => {
            return Err(SemanticError::from(TypeDoesNotProvideOperator {
                operator: operator_symbol(op).to_string(),
                ty: left_ty.to_string(),
                position: combined.range(),
                code: ctx.program.source_code(combined.file_id),
            }))
        }
    };

    if right_ty != left_ty {
        return Err(SemanticError::from(OperatorTypeMismatch {
            operator: operator_symbol(op).to_string(),
            position: combined.range(),
            code: ctx.program.source_code(combined.file_id),
        }));
    }

    let result_ty = if foreign_name == "Int==" { IrType::Primitive(PrimitiveType::Boolean) } else { IrType::Primitive(PrimitiveType::Int) };
    let result_id = vars.declare_temp(result_ty.clone(), combined);
    ops.push(Op::ForeignCall { results: vec![result_id], name: foreign_name, arguments: vec![left_id, right_id] });
    Ok(vec![(result_id, result_ty)])
}

/// Compiles a single `requires`/`ensures` clause into a block with a
/// distinguished boolean result (`spec.md` §4.9).
pub fn compile_contract(expr: &ExpressionAst, ctx: &FnCheckCtx, vars: &mut VariableStack) -> SemanticResult<ContractBlock> {
    vars.open_block();
    let mut ops = Vec::new();
    let result = (|| {
        let values = compile_expression(expr, ctx, vars, &mut ops)?;
        if values.len() != 1 {
            return Err(SemanticError::from(MultiExpressionGrouped {
                grouping: "contract".to_string(),
                position: expr.location.range(),
                code: ctx.program.source_code(expr.location.file_id),
            }));
        }
        let (id, ty) = &values[0];
        if *ty != IrType::Primitive(PrimitiveType::Boolean) {
            return Err(SemanticError::from(BooleanTypeExpected {
                reason: "contract".to_string(),
                position: expr.location.range(),
                code: ctx.program.source_code(expr.location.file_id),
            }));
        }
        Ok(*id)
    })();
    vars.close_block();
    result.map(|id| ContractBlock { ops, result: id })
}
