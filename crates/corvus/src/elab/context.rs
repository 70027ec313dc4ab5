//! `ProgramContext`, `SourceContext`, and `EntityDef` — the mutable state
//! shared by all three passes. `spec.md` §3.

use std::rc::Rc;

use indexmap::IndexMap;

use corvus_macros_core::SourceCode;

use crate::ast::{FnSignatureAst, TypeAst};
use crate::elab::ir::{ConstraintBinding, IrFunctionSignature, IrType};
use crate::elab::scope::TypeScope;
use crate::file::SourceFile;
use crate::map::{OrderedMap, ValueTrait};
use crate::nom_tools::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Record,
    Interface,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub ast_ty: TypeAst,
    pub ty: IrType,
    pub location: SourceLocation,
}

impl ValueTrait for FieldDef {
    fn location(&self) -> SourceLocation {
        self.location
    }
}

/// A function or interface-method member. `signature` holds the
/// parameter/return types as elaborated so far: `skip`-mode after Pass 2,
/// replaced with the `check`-mode result during Pass 3.
#[derive(Debug, Clone)]
pub struct FunctionMember {
    pub ast: Rc<FnSignatureAst>,
    pub function_id: String,
    pub signature: Option<IrFunctionSignature>,
    pub location: SourceLocation,
}

impl ValueTrait for FunctionMember {
    fn location(&self) -> SourceLocation {
        self.location
    }
}

#[derive(Debug, Clone)]
pub struct EntityDef {
    pub kind: EntityKind,
    pub canonical_name: String,
    pub source_id: usize,
    pub location: SourceLocation,
    pub scope: TypeScope,
    pub fields: OrderedMap<String, FieldDef>,
    pub functions: OrderedMap<String, FunctionMember>,
    pub header_constraints: Vec<ConstraintBinding>,
}

impl EntityDef {
    pub fn new_record(canonical_name: String, source_id: usize, location: SourceLocation) -> Self {
        EntityDef {
            kind: EntityKind::Record,
            canonical_name,
            source_id,
            location,
            scope: TypeScope::for_record(),
            fields: OrderedMap::new(),
            functions: OrderedMap::new(),
            header_constraints: Vec::new(),
        }
    }

    pub fn new_interface(canonical_name: String, source_id: usize, location: SourceLocation) -> Self {
        EntityDef {
            kind: EntityKind::Interface,
            canonical_name,
            source_id,
            location,
            scope: TypeScope::for_interface(),
            fields: OrderedMap::new(),
            functions: OrderedMap::new(),
            header_constraints: Vec::new(),
        }
    }
}

/// One per source file. Built in Pass 2, read-only afterward.
#[derive(Debug, Clone, Default)]
pub struct SourceContext {
    pub entity_aliases: IndexMap<String, (String, SourceLocation)>,
    pub namespaces: IndexMap<String, (String, SourceLocation)>,
}

/// Shared mutable state for all three passes. Created at the start of
/// Pass 1, discarded once `compile_sources` returns the assembled
/// `IrProgram`.
#[derive(Debug, Default)]
pub struct ProgramContext {
    pub canonical_by_qualified_name: IndexMap<String, IndexMap<String, String>>,
    pub entities_by_canonical: IndexMap<String, EntityDef>,
    pub source_contexts: IndexMap<usize, SourceContext>,
    /// One-shot monotonic flag: false through Pass 2, flips to true before
    /// Pass 3 starts. Gates constraint checking in `compile_type`.
    pub has_collected_members: bool,
    /// Kept alongside the context purely so diagnostics can attach a source
    /// snippet without every call site threading the original files through.
    pub files: IndexMap<usize, SourceFile>,
}

impl ProgramContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_canonical(&mut self, package: &str, name: &str, canonical_name: String) {
        self.canonical_by_qualified_name.entry(package.to_string()).or_default().insert(name.to_string(), canonical_name);
    }

    pub fn resolve_in_package(&self, package: &str, name: &str) -> Option<&str> {
        self.canonical_by_qualified_name.get(package).and_then(|names| names.get(name)).map(|s| s.as_str())
    }

    /// Builds the `#[source_code]` payload for a diagnostic anchored in
    /// `file_id`. `spec.md` §4.10: diagnostic construction is eager, so this
    /// clones the file text at the point of failure rather than sooner.
    pub fn source_code(&self, file_id: usize) -> SourceCode {
        match self.files.get(&file_id) {
            Some(file) => SourceCode {
                source: file.code().to_string(),
                name: file.name().to_string(),
            },
            None => SourceCode { source: String::new(), name: "<unknown>".to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nom_tools::SourceLocation;

    #[test]
    fn entity_def_record_has_no_this_type() {
        let entity = EntityDef::new_record("example.A".to_string(), 0, SourceLocation::synthetic());
        assert_eq!(entity.scope.this_type, None);
        assert!(entity.scope.debug_names.is_empty());
    }

    #[test]
    fn entity_def_interface_seeds_this_at_zero() {
        let entity = EntityDef::new_interface("example.Good".to_string(), 0, SourceLocation::synthetic());
        assert_eq!(entity.scope.this_type, Some(0));
        assert_eq!(entity.scope.debug_names, vec!["This".to_string()]);
    }

    #[test]
    fn program_context_resolves_registered_canonical_names() {
        let mut context = ProgramContext::new();
        context.register_canonical("example", "A", "example.A".to_string());
        assert_eq!(context.resolve_in_package("example", "A"), Some("example.A"));
        assert_eq!(context.resolve_in_package("example", "B"), None);
    }
}
