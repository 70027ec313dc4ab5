//! Type references, type-parameter lists, and constraint clauses:
//! `This`, `String`, `Int`, `Boolean`, `#T`, `pkg.Name[args]`.

use nom::branch::alt;
use nom::combinator::{map, opt};
use nom::sequence::{pair, preceded, tuple};

use crate::ast::{ConstraintAst, ConstraintHeaderAst, PathAst, TypeAst, TypeParametersAst};
use crate::nom_tools::Span;
use crate::parser::common::{comma_list0, identifier, keyword, symbol_char, PResult};

/// `#T` — a reference to (or declaration of) a type variable.
fn type_variable(input: crate::nom_tools::NomSpan) -> PResult<TypeAst> {
    map(preceded(symbol_char('#'), identifier), TypeAst::Variable)(input)
}

fn path(input: crate::nom_tools::NomSpan) -> PResult<PathAst> {
    let (input, first) = identifier(input)?;
    match symbol_char('.')(input) {
        Ok((rest, _)) => {
            let (rest, name) = identifier(rest)?;
            Ok((rest, PathAst { package: Some(first), name }))
        }
        Err(_) => Ok((input, PathAst { package: None, name: first })),
    }
}

fn type_arguments(input: crate::nom_tools::NomSpan) -> PResult<Vec<TypeAst>> {
    map(opt(preceded(symbol_char('['), nom::sequence::terminated(comma_list0(type_ref), symbol_char(']')))), |args| args.unwrap_or_default())(input)
}

fn named_type(input: crate::nom_tools::NomSpan) -> PResult<TypeAst> {
    let start = input;
    let (input, path) = path(input)?;
    let (input, arguments) = type_arguments(input)?;
    let start_span: Span = start.into();
    let location = crate::nom_tools::SourceLocation {
        file_id: start_span.file.0,
        offset: path.package.as_ref().map(|p| p.location.offset).unwrap_or(path.name.location.offset),
        length: (input.location_offset()) - start_span.position.start,
    };
    Ok((input, TypeAst::Named { path, arguments, location }))
}

pub fn type_ref(input: crate::nom_tools::NomSpan) -> PResult<TypeAst> {
    alt((
        map(keyword("This"), |s| TypeAst::This(s.to_location())),
        map(keyword("String"), |s| TypeAst::StringKw(s.to_location())),
        map(keyword("Int"), |s| TypeAst::IntKw(s.to_location())),
        map(keyword("Boolean"), |s| TypeAst::BooleanKw(s.to_location())),
        type_variable,
        named_type,
    ))(input)
}

/// `#T is Good[Int]`
fn constraint(input: crate::nom_tools::NomSpan) -> PResult<ConstraintAst> {
    let start = input;
    let (input, subject) = type_variable(input)?;
    let (input, _) = keyword("is")(input)?;
    let (input, interface) = path(input)?;
    let (input, arguments) = type_arguments(input)?;
    let start_span: Span = start.into();
    let location = crate::nom_tools::SourceLocation {
        file_id: start_span.file.0,
        offset: start_span.position.start,
        length: input.location_offset() - start_span.position.start,
    };
    Ok((input, ConstraintAst { subject, interface, arguments, location }))
}

/// `[#T, #U | #T is Good, #U is Fine[Int]]`
pub fn type_parameters(input: crate::nom_tools::NomSpan) -> PResult<TypeParametersAst> {
    map(
        opt(preceded(
            symbol_char('['),
            nom::sequence::terminated(
                tuple((comma_list0(preceded(symbol_char('#'), identifier)), opt(preceded(symbol_char('|'), comma_list0(constraint))))),
                symbol_char(']'),
            ),
        )),
        |result| match result {
            Some((parameters, constraints)) => TypeParametersAst {
                parameters,
                constraints: constraints.unwrap_or_default(),
            },
            None => TypeParametersAst::default(),
        },
    )(input)
}

/// `is Good` / `is Good[Int], Fine` on a record header.
pub fn header_constraints(input: crate::nom_tools::NomSpan) -> PResult<Vec<ConstraintHeaderAst>> {
    map(opt(preceded(keyword("is"), comma_list0(header_constraint))), |v| v.unwrap_or_default())(input)
}

fn header_constraint(input: crate::nom_tools::NomSpan) -> PResult<ConstraintHeaderAst> {
    let start = input;
    let (input, interface) = path(input)?;
    let (input, arguments) = type_arguments(input)?;
    let start_span: Span = start.into();
    let location = crate::nom_tools::SourceLocation {
        file_id: start_span.file.0,
        offset: start_span.position.start,
        length: input.location_offset() - start_span.position.start,
    };
    Ok((input, ConstraintHeaderAst { interface, arguments, location }))
}

pub fn parameter_list<'base>(input: crate::nom_tools::NomSpan<'base>) -> PResult<'base, Vec<(crate::ast::Spanned<String>, TypeAst)>> {
    comma_list0(pair(identifier, preceded(symbol_char(':'), type_ref)))(input)
}
