//! The three-pass elaborator, `spec.md` §3/§4.
//!
//! Pass 1 ([`entity::collect_entities`]) registers every top-level
//! definition's canonical name. Pass 2 ([`entity::resolve_source_contexts`],
//! [`entity::collect_members`]) resolves imports and elaborates every
//! entity's type parameters, fields, and function shapes in
//! [`types::Mode::Skip`]. Pass 3 ([`compile_sources`]'s own loop over
//! [`signature::compile_function`]) re-elaborates everything in
//! [`types::Mode::Check`], now that constraint satisfaction can be
//! evaluated, and checks every function body.

pub mod checker;
pub mod context;
pub mod entity;
pub mod error;
pub mod ir;
pub mod precedence;
pub mod scope;
pub mod signature;
pub mod types;
pub mod variables;

use indexmap::IndexMap;
use log::debug;

use crate::ast::Definition;
use crate::elab::context::{EntityKind, ProgramContext};
use crate::elab::error::SemanticResult;
use crate::elab::ir::{IrInterface, IrProgram, IrRecord};
use crate::file::SourceFile;
use crate::parser::parse_sources;

/// Parses and elaborates a set of files into an [`IrProgram`]. This is the
/// crate's single public entry point.
pub fn compile_sources(files: &[SourceFile]) -> Result<IrProgram, crate::error::CompileError> {
    let sources = parse_sources(files)?;
    let program = elaborate(files, &sources)?;
    Ok(program)
}

fn elaborate(files: &[SourceFile], sources: &[crate::ast::Source]) -> SemanticResult<IrProgram> {
    let mut program = ProgramContext::new();

    debug!("pass 1: collecting {} entities across {} files", sources.iter().map(|s| s.definitions.len()).sum::<usize>(), files.len());
    let defs_by_canonical = entity::collect_entities(files, sources, &mut program)?;

    debug!("pass 2: resolving source contexts and collecting members");
    entity::resolve_source_contexts(files, sources, &mut program)?;
    entity::collect_members(&defs_by_canonical, &mut program)?;

    program.has_collected_members = true;

    debug!("pass 3: checking bodies and re-elaborating in check mode");
    assemble(&defs_by_canonical, &program)
}

fn assemble(defs_by_canonical: &IndexMap<String, Definition>, program: &ProgramContext) -> SemanticResult<IrProgram> {
    let mut functions = IndexMap::new();
    let mut records = IndexMap::new();
    let mut interfaces = IndexMap::new();

    for (canonical, def) in defs_by_canonical {
        let entity = program.entities_by_canonical.get(canonical).expect("assembled from the same canonical-name set as pass 1/2");
        let source_context = program.source_contexts.get(&entity.source_id).cloned().unwrap_or_default();

        match entity.kind {
            EntityKind::Record => {
                let fields = entity.fields.iter().map(|(name, field)| (name.clone(), field.ty.clone())).collect();
                records.insert(
                    canonical.clone(),
                    IrRecord {
                        type_parameter_names: entity.scope.debug_names.clone(),
                        fields,
                    },
                );

                for fn_ast in entity_functions(def) {
                    let has_body = fn_ast.body.is_some();
                    let ir_function = signature::compile_function(fn_ast, &entity.scope, &source_context, program, has_body)?;
                    let function_id = format!("{canonical}.{}", fn_ast.name.value);
                    functions.insert(function_id, ir_function);
                }
            }
            EntityKind::Interface => {
                let mut signatures = IndexMap::new();
                for fn_ast in entity_functions(def) {
                    let ir_function = signature::compile_function(fn_ast, &entity.scope, &source_context, program, false)?;
                    signatures.insert(fn_ast.name.value.clone(), ir_function.signature);
                }
                interfaces.insert(
                    canonical.clone(),
                    IrInterface {
                        type_parameter_names: entity.scope.debug_names.clone(),
                        signatures,
                    },
                );
            }
        }
    }

    Ok(IrProgram {
        functions,
        records,
        interfaces,
        foreign_signatures: ir::foreign_signatures(),
        vtable_factories: IndexMap::new(),
    })
}

/// Shared by `assemble` to pull the raw function list back out of a
/// [`Definition`] regardless of whether it is a record or interface.
fn entity_functions(def: &Definition) -> &[crate::ast::FnSignatureAst] {
    match def {
        Definition::Record(r) => &r.functions,
        Definition::Interface(i) => &i.functions,
    }
}
