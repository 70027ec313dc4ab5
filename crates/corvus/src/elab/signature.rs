//! The signature and body assembler, `spec.md` §4.9. Turns one
//! `FnSignatureAst` (record function or interface member) into an
//! `IrFunctionSignature` plus, for record functions, a checked `IrFunction`
//! body.

use crate::ast::FnSignatureAst;
use crate::elab::checker::{check_block, compile_contract, FnCheckCtx};
use crate::elab::context::{ProgramContext, SourceContext};
use crate::elab::error::SemanticResult;
use crate::elab::ir::{ContractBlock, IrFunction, IrFunctionSignature, Op};
use crate::elab::scope::TypeScope;
use crate::elab::types::{self, Mode};
use crate::elab::variables::VariableStack;

/// Elaborates a function's parameters and return types only — used in
/// Pass 2 (`Mode::Skip`) to populate `FunctionMember::signature` before
/// constraint checking is possible, and re-run in Pass 3 (`Mode::Check`).
pub fn compile_signature_shape(ast: &FnSignatureAst, scope: &TypeScope, source_context: &SourceContext, program: &ProgramContext, mode: Mode) -> SemanticResult<(Vec<(String, crate::elab::ir::IrType)>, Vec<crate::elab::ir::IrType>)> {
    let mut parameters = Vec::with_capacity(ast.parameters.len());
    for parameter in &ast.parameters {
        let ty = types::compile_type(&parameter.ty, scope, source_context, program, mode)?;
        parameters.push((parameter.name.value.clone(), ty));
    }
    let mut returns = Vec::with_capacity(ast.returns.len());
    for return_ty in &ast.returns {
        returns.push(types::compile_type(return_ty, scope, source_context, program, mode)?);
    }
    Ok((parameters, returns))
}

/// Full Pass 3 elaboration of one function: re-elaborates the shape in
/// `check` mode, declares parameters on a fresh `VariableStack`, compiles
/// `requires`/`ensures`, and — for record functions — the body, appending
/// a synthetic `op-unreachable` if control falls off the end.
pub fn compile_function(ast: &FnSignatureAst, scope: &TypeScope, source_context: &SourceContext, program: &ProgramContext, has_body: bool) -> SemanticResult<IrFunction> {
    let (parameters, return_types) = compile_signature_shape(ast, scope, source_context, program, Mode::Check)?;

    let mut vars = VariableStack::new();
    vars.open_block();
    for (parameter_ast, (name, ty)) in ast.parameters.iter().zip(parameters.iter()) {
        vars.declare(name.clone(), ty.clone(), parameter_ast.name.location);
    }

    let return_temps: Vec<(crate::elab::ir::VarId, crate::elab::ir::IrType)> = return_types.iter().map(|ty| (vars.declare_temp(ty.clone(), ast.location), ty.clone())).collect();

    let preconditions = compile_contracts(&ast.requires, scope, source_context, program, &return_types, false, &return_temps, &mut vars)?;
    let postconditions = compile_contracts(&ast.ensures, scope, source_context, program, &return_types, true, &return_temps, &mut vars)?;

    let signature = IrFunctionSignature {
        type_parameter_names: scope.debug_names.clone(),
        constraint_parameters: scope.constraints.clone(),
        parameters,
        return_types: return_types.clone(),
        preconditions,
        postconditions,
    };

    let body = if has_body {
        let ctx = FnCheckCtx {
            scope,
            source_context,
            program,
            return_types: &return_types,
            in_ensures: false,
            return_temps: Vec::new(),
        };
        let stmts = ast.body.as_deref().unwrap_or(&[]);
        let mut ops = check_block(stmts, &ctx, &mut vars)?;
        if ops.last().map(|op| !op.terminates()).unwrap_or(true) {
            ops.push(Op::Unreachable { kind: "return" });
        }
        Some(ops)
    } else {
        None
    };
    vars.close_block();

    Ok(IrFunction { signature, body })
}

fn compile_contracts(
    clauses: &[crate::ast::ExpressionAst],
    scope: &TypeScope,
    source_context: &SourceContext,
    program: &ProgramContext,
    return_types: &[crate::elab::ir::IrType],
    in_ensures: bool,
    return_temps: &[(crate::elab::ir::VarId, crate::elab::ir::IrType)],
    vars: &mut VariableStack,
) -> SemanticResult<Vec<ContractBlock>> {
    let ctx = FnCheckCtx {
        scope,
        source_context,
        program,
        return_types,
        in_ensures,
        return_temps: return_temps.to_vec(),
    };
    clauses.iter().map(|clause| compile_contract(clause, &ctx, vars)).collect()
}
