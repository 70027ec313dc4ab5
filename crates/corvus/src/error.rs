//! Parser-level failures and diagnostic rendering.
//!
//! Semantic errors (the enumerated list in `spec.md` §7) live in
//! [`crate::elab::error`]; this module only covers syntax errors produced
//! while turning source text into an AST, plus the `codespan-reporting`
//! bridge used to render either kind of diagnostic to a terminal.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::{self, termcolor::Buffer};
use corvus_macros::CorvusError;
use corvus_macros_core::SourceCode;
use corvus_macros_core::traits::CorvusErrorTrait;
use nom::error::VerboseError;

use crate::nom_tools::{NomSpan, SourceLocation};

pub type ParseResult<'base, O> = Result<(NomSpan<'base>, O), nom::Err<VerboseError<NomSpan<'base>>>>;

/// A single failed parse over one source file.
#[derive(Clone, Debug, thiserror::Error, CorvusError)]
#[error("failed to parse source")]
#[diagnostic(code("corvus::error::syntax_error"), help("check the grammar near the reported position"))]
pub struct SyntaxError {
    #[label("parsing stopped here")]
    pub position: std::ops::Range<usize>,
    #[source_code]
    pub code: SourceCode,
    pub message: String,
}

/// Converts the innermost `nom` failure context into a [`SyntaxError`].
pub fn handle_parser<'base>(input: NomSpan<'base>, err: nom::Err<VerboseError<NomSpan<'base>>>, source_name: &str, source_text: &str) -> SyntaxError {
    let (position, message) = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => match e.errors.first() {
            Some((span, kind)) => {
                let offset = span.location_offset();
                (offset..(offset + span.fragment().len().max(1)), format!("{kind:?}"))
            }
            None => (0..input.fragment().len().min(1), "unknown parse error".to_string()),
        },
        nom::Err::Incomplete(_) => (0..0, "incomplete input".to_string()),
    };

    SyntaxError {
        position,
        code: SourceCode {
            source: source_text.to_string(),
            name: source_name.to_string(),
        },
        message,
    }
}

/// Renders any `CorvusErrorTrait` implementor into a human-readable report
/// using `codespan-reporting`, the way the teacher's `ReportGenerator` does.
pub fn render_diagnostic(error: &dyn CorvusErrorTrait) -> String {
    let mut files = SimpleFiles::new();
    let mut diagnostic = Diagnostic::error().with_message(error.to_string());

    if let Some(code) = error.source_code() {
        let file_id = files.add(code.name.clone(), code.source.clone());
        if let Some(labels) = error.labels() {
            diagnostic = diagnostic.with_labels(
                labels
                    .into_iter()
                    .map(|label| Label::primary(file_id, label.position).with_message(label.label))
                    .collect(),
            );
        }
    }

    if let Some(help) = error.help() {
        diagnostic = diagnostic.with_notes(vec![help.to_string()]);
    }

    let mut buffer = Buffer::no_color();
    let config = term::Config::default();
    let _ = term::emit(&mut buffer, &config, &files, &diagnostic);
    String::from_utf8_lossy(buffer.as_slice()).into_owned()
}

/// Either stage of `compile_sources` can fail: parsing into an AST, or
/// elaborating the AST into IR. Kept as one enum so the public entry point
/// has a single error type.
#[derive(Clone, Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Semantic(#[from] crate::elab::error::SemanticError),
}
