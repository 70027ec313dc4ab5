//! Turns source text into the AST of [`crate::ast`]. Treated by the
//! elaborator as an external collaborator (`spec.md` §1) — this module
//! exists so the crate is end-to-end runnable, but none of its internals
//! are referenced by `elab`.

pub mod common;
pub mod definition;
pub mod expression;
pub mod statement;
pub mod type_ref;

use nom::error::ParseError;
use nom::multi::many0;
use nom::sequence::{preceded, terminated};

use crate::ast::{ImportAst, Source};
use crate::error::SyntaxError;
use crate::file::SourceFile;
use crate::nom_tools::{NomSpan, Span, SourceLocation, State};
use common::{identifier, keyword, symbol_char, PResult};

fn span_of(start: NomSpan, end: NomSpan) -> SourceLocation {
    let start_span: Span = start.into();
    SourceLocation {
        file_id: start_span.file.0,
        offset: start_span.position.start,
        length: end.location_offset() - start_span.position.start,
    }
}

fn package_declaration(input: NomSpan) -> PResult<crate::ast::Spanned<String>> {
    preceded(keyword("package"), terminated(identifier, symbol_char(';')))(input)
}

fn package_import(input: NomSpan) -> PResult<ImportAst> {
    let start = input;
    let (input, package) = identifier(input)?;
    match symbol_char('.')(input) {
        Ok((input, _)) => {
            let (input, name) = identifier(input)?;
            let (input, _) = symbol_char(';')(input)?;
            let location = span_of(start, input);
            Ok((
                input,
                ImportAst::Entity {
                    package: package.value,
                    name: name.value,
                    location,
                },
            ))
        }
        Err(_) => {
            let (input, _) = symbol_char(';')(input)?;
            let location = span_of(start, input);
            Ok((input, ImportAst::Package { name: package.value, location }))
        }
    }
}

fn import_statement(input: NomSpan) -> PResult<ImportAst> {
    preceded(keyword("import"), package_import)(input)
}

fn source(input: NomSpan) -> PResult<Source> {
    let (input, package) = package_declaration(input)?;
    let (input, imports) = many0(import_statement)(input)?;
    let (input, definitions) = many0(definition::definition)(input)?;
    Ok((
        input,
        Source {
            package,
            imports,
            definitions,
        },
    ))
}

/// Parses every source file, stopping at the first syntax error.
pub fn parse_sources(files: &[SourceFile]) -> Result<Vec<Source>, SyntaxError> {
    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        sources.push(parse_one(file)?);
    }
    Ok(sources)
}

fn parse_one(file: &SourceFile) -> Result<Source, SyntaxError> {
    let state = State { file: file.id };
    let input = NomSpan::new_extra(file.code.as_str(), state);
    match common::ws(source)(input) {
        Ok((rest, parsed)) => {
            if !rest.fragment().trim().is_empty() {
                return Err(crate::error::handle_parser(
                    input,
                    nom::Err::Error(nom::error::VerboseError::from_error_kind(rest, nom::error::ErrorKind::Eof)),
                    file.name(),
                    file.code(),
                ));
            }
            Ok(parsed)
        }
        Err(err) => Err(crate::error::handle_parser(input, err, file.name(), file.code())),
    }
}
