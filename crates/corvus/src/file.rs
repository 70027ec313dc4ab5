//! Source file storage.

use std::sync::Arc;

/// Stable identifier for a source file within a single [`crate::compile_sources`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub usize);

/// One parsed input file: a display name plus its text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub name: Arc<String>,
    pub code: Arc<String>,
}

impl SourceFile {
    pub fn new(id: FileId, name: String, code: String) -> Self {
        Self {
            id,
            name: Arc::new(name),
            code: Arc::new(code),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}
