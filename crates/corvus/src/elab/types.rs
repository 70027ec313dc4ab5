//! The type elaborator (`compileType`, `spec.md` §4.3) and the constraint
//! compiler/checker (§4.4).

use crate::ast::{ConstraintAst, ConstraintHeaderAst, PathAst, TypeAst};
use crate::elab::context::{EntityKind, ProgramContext, SourceContext};
use crate::elab::error::*;
use crate::elab::ir::{ConstraintBinding, IrType, PrimitiveType};
use crate::elab::scope::TypeScope;

/// Gates constraint checking on type arguments. `spec.md` §3: calling
/// `compile_type` in the wrong mode for the current pass is an internal
/// consistency fault, not a semantic error — callers are responsible for
/// picking the mode that matches `program.has_collected_members`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Check,
    Skip,
}

fn resolve_entity_path(path: &PathAst, source_context: &SourceContext, program: &ProgramContext) -> SemanticResult<(String, EntityKind)> {
    let canonical = match &path.package {
        Some(pkg) => program
            .resolve_in_package(&pkg.value, &path.name.value)
            .ok_or_else(|| {
                if program.canonical_by_qualified_name.contains_key(&pkg.value) {
                    SemanticError::from(NoSuchEntity {
                        name: path.name.value.clone(),
                        position: path.name.location.range(),
                        code: program.source_code(path.name.location.file_id),
                    })
                } else {
                    SemanticError::from(NoSuchPackage {
                        package: pkg.value.clone(),
                        position: pkg.location.range(),
                        code: program.source_code(pkg.location.file_id),
                    })
                }
            })?
            .to_string(),
        None => source_context
            .entity_aliases
            .get(&path.name.value)
            .map(|(canonical, _)| canonical.clone())
            .ok_or_else(|| {
                SemanticError::from(NoSuchEntity {
                    name: path.name.value.clone(),
                    position: path.name.location.range(),
                    code: program.source_code(path.name.location.file_id),
                })
            })?,
    };

    let entity = program.entities_by_canonical.get(&canonical).ok_or_else(|| SemanticError::Ice(format!("canonical name '{canonical}' has no registered entity")))?;
    Ok((canonical, entity.kind))
}

/// Maps an AST type to an IR type under `scope`/`source_context`, per the
/// table in `spec.md` §4.3.
pub fn compile_type(ast: &TypeAst, scope: &TypeScope, source_context: &SourceContext, program: &ProgramContext, mode: Mode) -> SemanticResult<IrType> {
    match ast {
        TypeAst::This(location) => scope.this_type.map(IrType::TypeVar).ok_or_else(|| {
            SemanticError::from(InvalidThisType {
                position: location.range(),
                code: program.source_code(location.file_id),
            })
        }),
        TypeAst::StringKw(_) => Ok(IrType::Primitive(PrimitiveType::Bytes)),
        TypeAst::IntKw(_) => Ok(IrType::Primitive(PrimitiveType::Int)),
        TypeAst::BooleanKw(_) => Ok(IrType::Primitive(PrimitiveType::Boolean)),
        TypeAst::Variable(name) => scope.lookup_variable(&name.value).map(IrType::TypeVar).ok_or_else(|| {
            SemanticError::from(NoSuchTypeVariable {
                name: name.value.clone(),
                position: name.location.range(),
                code: program.source_code(name.location.file_id),
            })
        }),
        TypeAst::Named { path, arguments, location } => {
            let (canonical, kind) = resolve_entity_path(path, source_context, program)?;
            if kind == EntityKind::Interface {
                return Err(SemanticError::from(NonTypeEntityUsedAsType {
                    name: path.name.value.clone(),
                    position: location.range(),
                    code: program.source_code(location.file_id),
                }));
            }
            let entity = program.entities_by_canonical.get(&canonical).ok_or_else(|| SemanticError::Ice(format!("canonical name '{canonical}' has no registered entity")))?;

            let expected = entity.scope.debug_names.len();
            if arguments.len() != expected {
                return Err(SemanticError::from(TypeParameterCountMismatch {
                    expected,
                    actual: arguments.len(),
                    position: location.range(),
                    code: program.source_code(location.file_id),
                }));
            }

            let elaborated_arguments = arguments.iter().map(|arg| compile_type(arg, scope, source_context, program, mode)).collect::<SemanticResult<Vec<_>>>()?;

            if mode == Mode::Check {
                for constraint in &entity.scope.constraints {
                    let subjects: Vec<IrType> = constraint.subjects.iter().map(|s| s.substitute(&elaborated_arguments)).collect();
                    let needed = ConstraintBinding {
                        interface_id: constraint.interface_id.clone(),
                        subjects,
                        location: constraint.location,
                    };
                    if !constraint_satisfied(&needed, scope, program) {
                        return Err(SemanticError::from(TypesDontSatisfyConstraint {
                            subject: needed.subjects.first().map(|t| t.to_string()).unwrap_or_default(),
                            interface: needed.interface_id.clone(),
                            position: location.range(),
                            declared_position: constraint.location.range(),
                            code: program.source_code(location.file_id),
                        }));
                    }
                }
            }

            Ok(IrType::Compound { record_id: canonical, type_arguments: elaborated_arguments })
        }
    }
}

/// `spec.md` §4.4: is there an available declaration whose substituted
/// subjects structurally equal the needed subjects? Searches (a) the
/// ambient `TypeScope`'s own constraint list, then (b) the header
/// constraints of the needed constraint's primary subject, if it resolves
/// to a record entity.
pub fn constraint_satisfied(needed: &ConstraintBinding, scope: &TypeScope, program: &ProgramContext) -> bool {
    if scope.constraints.iter().any(|c| c.interface_id == needed.interface_id && c.subjects == needed.subjects) {
        return true;
    }

    if let Some(IrType::Compound { record_id, type_arguments }) = needed.subjects.first() {
        if let Some(entity) = program.entities_by_canonical.get(record_id) {
            for header in &entity.header_constraints {
                if header.interface_id != needed.interface_id {
                    continue;
                }
                let substituted: Vec<IrType> = header.subjects.iter().map(|s| s.substitute(type_arguments)).collect();
                if substituted == needed.subjects {
                    return true;
                }
            }
        }
    }

    false
}

/// Elaborates `subject is InterfaceName[args]`. `mode` is `Skip` when
/// called from the member collector (Pass 2) and `Check` when re-elaborated
/// in Pass 3.
pub fn compile_constraint(ast: &ConstraintAst, scope: &TypeScope, source_context: &SourceContext, program: &ProgramContext, mode: Mode) -> SemanticResult<ConstraintBinding> {
    let (interface_canonical, kind) = resolve_entity_path(&ast.interface, source_context, program)?;
    if kind != EntityKind::Interface {
        return Err(SemanticError::from(TypeUsedAsConstraint {
            name: ast.interface.name.value.clone(),
            position: ast.location.range(),
            code: program.source_code(ast.location.file_id),
        }));
    }

    let subject = compile_type(&ast.subject, scope, source_context, program, mode)?;
    let mut subjects = vec![subject];
    for argument in &ast.arguments {
        subjects.push(compile_type(argument, scope, source_context, program, mode)?);
    }

    Ok(ConstraintBinding {
        interface_id: interface_canonical,
        subjects,
        location: ast.location,
    })
}

/// Elaborates a record-header `is Interface[args]` clause. `self_type` is
/// the record's own `IrType::Compound`, built from its canonical name and
/// its type parameters as `TypeVar`s in declaration order — it stands in
/// for `#T is Interface[args]`'s explicit subject, which header syntax
/// omits (it is always the record itself).
pub fn compile_header_constraint(ast: &ConstraintHeaderAst, self_type: IrType, scope: &TypeScope, source_context: &SourceContext, program: &ProgramContext, mode: Mode) -> SemanticResult<ConstraintBinding> {
    let (interface_canonical, kind) = resolve_entity_path(&ast.interface, source_context, program)?;
    if kind != EntityKind::Interface {
        return Err(SemanticError::from(TypeUsedAsConstraint {
            name: ast.interface.name.value.clone(),
            position: ast.location.range(),
            code: program.source_code(ast.location.file_id),
        }));
    }

    let mut subjects = vec![self_type];
    for argument in &ast.arguments {
        subjects.push(compile_type(argument, scope, source_context, program, mode)?);
    }

    Ok(ConstraintBinding {
        interface_id: interface_canonical,
        subjects,
        location: ast.location,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elab::context::EntityDef;
    use crate::elab::ir::PrimitiveType;
    use crate::nom_tools::SourceLocation;

    fn loc() -> SourceLocation {
        SourceLocation::synthetic()
    }

    #[test]
    fn compile_type_keyword_int() {
        let scope = TypeScope::for_record();
        let source_context = SourceContext::default();
        let program = ProgramContext::new();
        let result = compile_type(&TypeAst::IntKw(loc()), &scope, &source_context, &program, Mode::Skip).unwrap();
        assert_eq!(result, IrType::Primitive(PrimitiveType::Int));
    }

    #[test]
    fn compile_type_this_outside_interface_fails() {
        let scope = TypeScope::for_record();
        let source_context = SourceContext::default();
        let program = ProgramContext::new();
        let err = compile_type(&TypeAst::This(loc()), &scope, &source_context, &program, Mode::Skip).unwrap_err();
        assert!(matches!(err, SemanticError::InvalidThisType(_)));
    }

    #[test]
    fn constraint_satisfied_via_record_header() {
        let mut program = ProgramContext::new();
        let mut b = EntityDef::new_record("example.B".to_string(), 0, loc(), Vec::new(), Vec::new());
        let b_type = IrType::Compound { record_id: "example.B".to_string(), type_arguments: Vec::new() };
        b.header_constraints.push(ConstraintBinding {
            interface_id: "example.Good".to_string(),
            subjects: vec![b_type.clone()],
            location: loc(),
        });
        program.entities_by_canonical.insert("example.B".to_string(), b);

        let needed = ConstraintBinding {
            interface_id: "example.Good".to_string(),
            subjects: vec![b_type],
            location: loc(),
        };
        let scope = TypeScope::for_record();
        assert!(constraint_satisfied(&needed, &scope, &program));
    }

    #[test]
    fn constraint_not_satisfied_for_bare_int() {
        let program = ProgramContext::new();
        let needed = ConstraintBinding {
            interface_id: "example.Good".to_string(),
            subjects: vec![IrType::Primitive(PrimitiveType::Int)],
            location: loc(),
        };
        let scope = TypeScope::for_record();
        assert!(!constraint_satisfied(&needed, &scope, &program));
    }
}
