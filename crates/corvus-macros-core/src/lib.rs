//! Core types and traits shared by the corvus diagnostic derive macros.

use std::fmt::{Display, Formatter};

pub mod traits;

/// Source text plus a display name, carried alongside an error so a
/// reporter can render a snippet without re-reading the file.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceCode {
    pub source: String,
    pub name: String,
}

impl Display for SourceCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}
