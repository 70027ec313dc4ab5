//! `VariableStack` — the scoped, append-only variable table each function
//! body is checked against. `spec.md` §3.

use indexmap::IndexMap;

use crate::elab::ir::{IrType, VarId};
use crate::nom_tools::SourceLocation;

#[derive(Debug, Clone)]
struct VarEntry {
    ty: IrType,
    location: SourceLocation,
}

/// A scoped ordered mapping from variable name to `{id, type, location}`.
/// Ids are dense `[0..n)` in declaration order and never reused —
/// `closeBlock` hides the names a block introduced without rewinding the
/// id counter, so any `VarId` emitted earlier stays valid.
#[derive(Debug, Clone, Default)]
pub struct VariableStack {
    entries: Vec<VarEntry>,
    active: IndexMap<String, usize>,
    block_added: Vec<Vec<String>>,
    tmp_counter: usize,
}

impl VariableStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_block(&mut self) {
        self.block_added.push(Vec::new());
    }

    /// Removes every name introduced since the matching `open_block`. Does
    /// not shrink `entries` — ids already handed out as `VarId`s remain
    /// valid, they are simply no longer reachable by name.
    pub fn close_block(&mut self) {
        if let Some(names) = self.block_added.pop() {
            for name in names {
                self.active.shift_remove(&name);
            }
        }
    }

    pub fn declare(&mut self, name: String, ty: IrType, location: SourceLocation) -> VarId {
        let id = self.entries.len();
        self.entries.push(VarEntry { ty, location });
        if let Some(frame) = self.block_added.last_mut() {
            frame.push(name.clone());
        }
        self.active.insert(name, id);
        VarId(id)
    }

    /// A synthesized `$0`, `$1`, ... temporary — guaranteed not to collide
    /// with any name a user can write.
    pub fn declare_temp(&mut self, ty: IrType, location: SourceLocation) -> VarId {
        let name = format!("${}", self.tmp_counter);
        self.tmp_counter += 1;
        self.declare(name, ty, location)
    }

    pub fn lookup(&self, name: &str) -> Option<(VarId, &IrType, SourceLocation)> {
        self.active.get(name).map(|&id| {
            let entry = &self.entries[id];
            (VarId(id), &entry.ty, entry.location)
        })
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains_key(name)
    }

    pub fn type_of(&self, id: VarId) -> &IrType {
        &self.entries[id.0].ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elab::ir::PrimitiveType;

    fn loc() -> SourceLocation {
        SourceLocation::synthetic()
    }

    #[test]
    fn declarations_are_dense_and_ordered() {
        let mut stack = VariableStack::new();
        let a = stack.declare("a".to_string(), IrType::Primitive(PrimitiveType::Int), loc());
        let b = stack.declare("b".to_string(), IrType::Primitive(PrimitiveType::Boolean), loc());
        assert_eq!(a, VarId(0));
        assert_eq!(b, VarId(1));
    }

    #[test]
    fn closing_a_block_hides_its_names_but_keeps_ids_dense() {
        let mut stack = VariableStack::new();
        stack.declare("outer".to_string(), IrType::Primitive(PrimitiveType::Int), loc());
        stack.open_block();
        stack.declare("inner".to_string(), IrType::Primitive(PrimitiveType::Int), loc());
        assert!(stack.is_active("inner"));
        stack.close_block();
        assert!(!stack.is_active("inner"));
        assert!(stack.is_active("outer"));

        let next = stack.declare("after".to_string(), IrType::Primitive(PrimitiveType::Int), loc());
        assert_eq!(next, VarId(2));
    }

    #[test]
    fn temp_names_never_collide_with_user_names() {
        let mut stack = VariableStack::new();
        let tmp = stack.declare_temp(IrType::Primitive(PrimitiveType::Int), loc());
        assert_eq!(tmp, VarId(0));
        assert!(stack.is_active("$0"));
        assert!(!stack.is_active("0"));
    }
}
