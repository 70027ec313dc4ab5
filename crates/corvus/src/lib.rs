//! `corvus` — a parser and three-pass semantic elaborator for the small
//! contract-bearing language described in `spec.md`. Turns source text into
//! a checked [`elab::ir::IrProgram`] ready for a downstream verifier.
//!
//! # Layout
//! - [`ast`] — the parser's output shape.
//! - [`parser`] — `nom`-based grammar, treated as an external collaborator.
//! - [`elab`] — the elaborator: entity collection, type/constraint
//!   checking, expression/statement lowering, and IR assembly.
//! - [`error`] — syntax errors and diagnostic rendering shared by both
//!   stages.

pub mod ast;
pub mod elab;
pub mod error;
pub mod file;
pub mod map;
pub mod nom_tools;
pub mod parser;

pub use elab::ir::IrProgram;
pub use error::CompileError;
pub use file::SourceFile;

/// Parses and elaborates `files` into an [`IrProgram`]. The single public
/// entry point into this crate.
pub fn compile_sources(files: &[SourceFile]) -> Result<IrProgram, CompileError> {
    elab::compile_sources(files)
}
