//! `TypeScope` — the set of type variables and constraints visible inside
//! one entity or function signature. `spec.md` §3.

use indexmap::IndexMap;

use crate::elab::ir::ConstraintBinding;
use crate::nom_tools::SourceLocation;

#[derive(Debug, Clone)]
pub struct TypeScope {
    /// `Some(0)` inside interfaces, `None` inside records (`spec.md` §3,
    /// §4.1: "the distinguished `This` type in an interface's scope is
    /// the type-variable with id 0").
    pub this_type: Option<usize>,
    pub variables: IndexMap<String, (usize, SourceLocation)>,
    pub debug_names: Vec<String>,
    pub constraints: Vec<ConstraintBinding>,
}

impl TypeScope {
    pub fn for_record() -> Self {
        TypeScope {
            this_type: None,
            variables: IndexMap::new(),
            debug_names: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn for_interface() -> Self {
        TypeScope {
            this_type: Some(0),
            variables: IndexMap::new(),
            debug_names: vec!["This".to_string()],
            constraints: Vec::new(),
        }
    }

    /// A fresh child scope for one function signature, inheriting `This`
    /// (if any) but starting its own type-variable numbering after it —
    /// function-level `#T`s are distinct from the entity's own.
    pub fn child(&self) -> Self {
        TypeScope {
            this_type: self.this_type,
            variables: self.variables.clone(),
            debug_names: self.debug_names.clone(),
            constraints: self.constraints.clone(),
        }
    }

    /// Declares a new type variable, assigning it the next id in order —
    /// `spec.md` §4.3: "ids are assigned in declaration order starting
    /// from the scope's current `typeVariableDebugNames` length".
    pub fn declare_variable(&mut self, name: String, location: SourceLocation) -> usize {
        let id = self.debug_names.len();
        self.debug_names.push(name.clone());
        self.variables.insert(name, (id, location));
        id
    }

    pub fn lookup_variable(&self, name: &str) -> Option<usize> {
        self.variables.get(name).map(|(id, _)| *id)
    }
}
