//! Pass 1 (entity collection) and Pass 2 (source-context resolution plus
//! member collection), `spec.md` §4.2 / §4.5.

use indexmap::IndexMap;

use crate::ast::{ConstraintHeaderAst, Definition, FieldAst, FnSignatureAst, ImportAst, Source, TypeParametersAst};
use crate::elab::context::{EntityDef, EntityKind, FieldDef, FunctionMember, ProgramContext, SourceContext};
use crate::elab::error::*;
use crate::elab::ir::{IrFunctionSignature, IrType};
use crate::elab::signature::compile_signature_shape;
use crate::elab::types::{self, Mode};
use crate::file::SourceFile;

fn type_parameters(def: &Definition) -> Option<&TypeParametersAst> {
    match def {
        Definition::Record(r) => r.type_parameters.as_ref(),
        Definition::Interface(i) => i.type_parameters.as_ref(),
    }
}

fn header_constraints(def: &Definition) -> &[ConstraintHeaderAst] {
    match def {
        Definition::Record(r) => &r.header_constraints,
        Definition::Interface(_) => &[],
    }
}

fn fields(def: &Definition) -> &[FieldAst] {
    match def {
        Definition::Record(r) => &r.fields,
        Definition::Interface(_) => &[],
    }
}

fn functions(def: &Definition) -> &[FnSignatureAst] {
    match def {
        Definition::Record(r) => &r.functions,
        Definition::Interface(i) => &i.functions,
    }
}

/// Pass 1: registers every file and every top-level definition's canonical
/// name (`package.Name`), rejecting duplicates within a package. Returns the
/// canonical-name → `Definition` map the later passes key off of, since
/// `EntityDef` does not itself retain the raw function ASTs.
pub fn collect_entities(files: &[SourceFile], sources: &[Source], program: &mut ProgramContext) -> SemanticResult<IndexMap<String, Definition>> {
    let mut defs_by_canonical = IndexMap::new();

    for file in files {
        program.files.insert(file.id.0, file.clone());
    }

    for (file, source) in files.iter().zip(sources.iter()) {
        let package = &source.package.value;
        for def in &source.definitions {
            let name = &def.name().value;
            let canonical = format!("{package}.{name}");

            if let Some(existing) = program.entities_by_canonical.get(&canonical) {
                return Err(SemanticError::from(EntityRedefined {
                    name: name.clone(),
                    existing_position: existing.location.range(),
                    position: def.location().range(),
                    code: program.source_code(def.location().file_id),
                }));
            }

            let entity = match def {
                Definition::Record(r) => EntityDef::new_record(canonical.clone(), file.id.0, r.location),
                Definition::Interface(i) => EntityDef::new_interface(canonical.clone(), file.id.0, i.location),
            };
            program.register_canonical(package, name, canonical.clone());
            program.entities_by_canonical.insert(canonical.clone(), entity);
            defs_by_canonical.insert(canonical, def.clone());
        }
    }

    Ok(defs_by_canonical)
}

/// Pass 2a, `spec.md` §4.2: for each file, seeds `entity_aliases` from its
/// own package, then folds in `import pkg;` (→ `namespaces`) and
/// `import pkg.Name;` (→ `entity_aliases`) declarations.
pub fn resolve_source_contexts(files: &[SourceFile], sources: &[Source], program: &mut ProgramContext) -> SemanticResult<()> {
    for (file, source) in files.iter().zip(sources.iter()) {
        let mut ctx = SourceContext::default();
        let package = &source.package.value;

        if let Some(own_names) = program.canonical_by_qualified_name.get(package) {
            for (name, canonical) in own_names {
                let location = program.entities_by_canonical.get(canonical).map(|e| e.location).unwrap_or(source.package.location);
                ctx.entity_aliases.insert(name.clone(), (canonical.clone(), location));
            }
        }

        for import in &source.imports {
            match import {
                ImportAst::Package { name, location } => {
                    if name == package {
                        return Err(SemanticError::from(SelfImportNotAllowed {
                            name: name.clone(),
                            position: location.range(),
                            code: program.source_code(location.file_id),
                        }));
                    }
                    if let Some((_, existing_location)) = ctx.namespaces.get(name) {
                        return Err(SemanticError::from(NamespaceAlreadyDefined {
                            name: name.clone(),
                            existing_position: existing_location.range(),
                            position: location.range(),
                            code: program.source_code(location.file_id),
                        }));
                    }
                    ctx.namespaces.insert(name.clone(), (name.clone(), *location));
                }
                ImportAst::Entity { package: pkg, name, location } => {
                    let canonical = match program.resolve_in_package(pkg, name) {
                        Some(canonical) => canonical.to_string(),
                        None => {
                            return if program.canonical_by_qualified_name.contains_key(pkg) {
                                Err(SemanticError::from(NoSuchEntity {
                                    name: name.clone(),
                                    position: location.range(),
                                    code: program.source_code(location.file_id),
                                }))
                            } else {
                                Err(SemanticError::from(NoSuchPackage {
                                    package: pkg.clone(),
                                    position: location.range(),
                                    code: program.source_code(location.file_id),
                                }))
                            };
                        }
                    };

                    if let Some((_, existing_location)) = ctx.entity_aliases.get(name) {
                        return Err(SemanticError::from(EntityRedefined {
                            name: name.clone(),
                            existing_position: existing_location.range(),
                            position: location.range(),
                            code: program.source_code(location.file_id),
                        }));
                    }
                    ctx.entity_aliases.insert(name.clone(), (canonical, *location));
                }
            }
        }

        program.source_contexts.insert(file.id.0, ctx);
    }
    Ok(())
}

/// Pass 2b, `spec.md` §4.5: installs each entity's type parameters and
/// constraints, then its fields and functions, in `Mode::Skip` — constraint
/// satisfaction is not checked until Pass 3, once every entity's shape is
/// known.
pub fn collect_members(defs_by_canonical: &IndexMap<String, Definition>, program: &mut ProgramContext) -> SemanticResult<()> {
    let canonical_names: Vec<String> = program.entities_by_canonical.keys().cloned().collect();

    for canonical in canonical_names {
        let mut entity = program.entities_by_canonical.get(&canonical).expect("collected in pass 1").clone();
        let def = defs_by_canonical.get(&canonical).expect("every entity came from a definition");
        let source_context = program.source_contexts.get(&entity.source_id).cloned().unwrap_or_default();

        if let Some(type_params) = type_parameters(def) {
            for param in &type_params.parameters {
                if entity.scope.lookup_variable(&param.value).is_some() {
                    return Err(SemanticError::from(TypeVariableRedefined {
                        name: param.value.clone(),
                        existing_position: entity.location.range(),
                        position: param.location.range(),
                        code: program.source_code(param.location.file_id),
                    }));
                }
                entity.scope.declare_variable(param.value.clone(), param.location);
            }
            for constraint in &type_params.constraints {
                let binding = types::compile_constraint(constraint, &entity.scope, &source_context, program, Mode::Skip)?;
                entity.scope.constraints.push(binding);
            }
        }

        let self_type = IrType::Compound {
            record_id: entity.canonical_name.clone(),
            type_arguments: (0..entity.scope.debug_names.len()).map(IrType::TypeVar).collect(),
        };
        for header in header_constraints(def) {
            let binding = types::compile_header_constraint(header, self_type.clone(), &entity.scope, &source_context, program, Mode::Skip)?;
            entity.header_constraints.push(binding);
        }

        for field in fields(def) {
            if let Some(existing) = entity.functions.get(&field.name.value) {
                return Err(SemanticError::from(MemberRedefined {
                    name: field.name.value.clone(),
                    existing_position: existing.location.range(),
                    position: field.location.range(),
                    code: program.source_code(field.location.file_id),
                }));
            }
            let ty = types::compile_type(&field.ty, &entity.scope, &source_context, program, Mode::Skip)?;
            if let Err(duplicate) = entity.fields.validate_insert(field.name.value.clone(), FieldDef { ast_ty: field.ty.clone(), ty, location: field.location }) {
                return Err(SemanticError::from(MemberRedefined {
                    name: field.name.value.clone(),
                    existing_position: duplicate.existing_location.range(),
                    position: duplicate.new_location.range(),
                    code: program.source_code(duplicate.new_location.file_id),
                }));
            }
        }

        for function in functions(def) {
            if let Some(existing) = entity.fields.get(&function.name.value) {
                return Err(SemanticError::from(MemberRedefined {
                    name: function.name.value.clone(),
                    existing_position: existing.location.range(),
                    position: function.location.range(),
                    code: program.source_code(function.location.file_id),
                }));
            }
            let (parameters, return_types) = compile_signature_shape(function, &entity.scope, &source_context, program, Mode::Skip)?;
            let signature = IrFunctionSignature {
                type_parameter_names: entity.scope.debug_names.clone(),
                constraint_parameters: entity.scope.constraints.clone(),
                parameters,
                return_types,
                preconditions: Vec::new(),
                postconditions: Vec::new(),
            };
            let function_id = format!("{canonical}.{}", function.name.value);
            if let Err(duplicate) = entity.functions.validate_insert(
                function.name.value.clone(),
                FunctionMember {
                    ast: std::rc::Rc::new(function.clone()),
                    function_id,
                    signature: Some(signature),
                    location: function.location,
                },
            ) {
                return Err(SemanticError::from(MemberRedefined {
                    name: function.name.value.clone(),
                    existing_position: duplicate.existing_location.range(),
                    position: duplicate.new_location.range(),
                    code: program.source_code(duplicate.new_location.file_id),
                }));
            }
        }

        program.entities_by_canonical.insert(canonical, entity);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileId;
    use crate::parser::parse_sources;

    fn file(name: &str, code: &str, id: usize) -> SourceFile {
        SourceFile::new(FileId(id), name.to_string(), code.to_string())
    }

    #[test]
    fn collect_entities_rejects_duplicate_names_in_one_package() {
        let files = vec![file("a.tmu", "package example; record A { }", 0), file("b.tmu", "package example; record A { }", 1)];
        let sources = parse_sources(&files).unwrap();
        let mut program = ProgramContext::new();
        let err = collect_entities(&files, &sources, &mut program).unwrap_err();
        assert!(matches!(err, SemanticError::EntityRedefined(_)));
    }

    #[test]
    fn resolve_source_contexts_rejects_importing_the_current_package() {
        let files = vec![file("a.tmu", "package example; import example; record A { }", 0)];
        let sources = parse_sources(&files).unwrap();
        let mut program = ProgramContext::new();
        collect_entities(&files, &sources, &mut program).unwrap();
        let err = resolve_source_contexts(&files, &sources, &mut program).unwrap_err();
        assert!(matches!(err, SemanticError::SelfImportNotAllowed(_)));
    }

    #[test]
    fn resolve_source_contexts_sees_own_package_without_import() {
        let files = vec![file("a.tmu", "package example; record A { }", 0), file("b.tmu", "package example; record B { a: example.A; }", 1)];
        let sources = parse_sources(&files).unwrap();
        let mut program = ProgramContext::new();
        let defs = collect_entities(&files, &sources, &mut program).unwrap();
        resolve_source_contexts(&files, &sources, &mut program).unwrap();
        assert!(program.source_contexts.get(&1).unwrap().entity_aliases.contains_key("A"));

        collect_members(&defs, &mut program).unwrap();
        let b = program.entities_by_canonical.get("example.B").unwrap();
        assert_eq!(b.fields.get("a").unwrap().ty, IrType::Compound { record_id: "example.A".to_string(), type_arguments: Vec::new() });
    }

    #[test]
    fn collect_members_rejects_field_and_function_sharing_a_name() {
        let files = vec![file("a.tmu", "package example; record A { x: Int; fn x(): Int { return 1; } }", 0)];
        let sources = parse_sources(&files).unwrap();
        let mut program = ProgramContext::new();
        let defs = collect_entities(&files, &sources, &mut program).unwrap();
        resolve_source_contexts(&files, &sources, &mut program).unwrap();
        let err = collect_members(&defs, &mut program).unwrap_err();
        assert!(matches!(err, SemanticError::MemberRedefined(_)));
    }
}
