//! Top-level declarations: records, interfaces, fields, function
//! signatures with `requires`/`ensures` contract clauses.

use nom::branch::alt;
use nom::combinator::{map, opt};
use nom::multi::many0;
use nom::sequence::{pair, preceded, terminated};

use crate::ast::{Definition, FieldAst, FnSignatureAst, InterfaceDefinition, ParameterAst, RecordDefinition};
use crate::nom_tools::{NomSpan, Span, SourceLocation};
use crate::parser::common::{identifier, keyword, symbol_char, PResult};
use crate::parser::expression::expression;
use crate::parser::statement::statement;
use crate::parser::type_ref::{header_constraints, type_parameters, type_ref};

fn span_of(start: NomSpan, end: NomSpan) -> SourceLocation {
    let start_span: Span = start.into();
    SourceLocation {
        file_id: start_span.file.0,
        offset: start_span.position.start,
        length: end.location_offset() - start_span.position.start,
    }
}

fn parameters(input: NomSpan) -> PResult<Vec<ParameterAst>> {
    preceded(
        symbol_char('('),
        terminated(
            crate::parser::common::comma_list0(alt((
                map(keyword("this"), |s| ParameterAst {
                    name: crate::ast::Spanned::new("this".to_string(), s.to_location()),
                    ty: crate::ast::TypeAst::This(s.to_location()),
                }),
                map(pair(identifier, preceded(symbol_char(':'), type_ref)), |(name, ty)| ParameterAst { name, ty }),
            ))),
            symbol_char(')'),
        ),
    )(input)
}

fn returns(input: NomSpan) -> PResult<Vec<crate::ast::TypeAst>> {
    alt((
        map(keyword("Unit"), |_| Vec::new()),
        crate::parser::common::comma_list0(type_ref),
    ))(input)
}

fn fn_signature(input: NomSpan) -> PResult<FnSignatureAst> {
    let start = input;
    let (input, proof) = map(opt(keyword("proof")), |p| p.is_some())(input)?;
    let (input, _) = keyword("fn")(input)?;
    let (input, name) = identifier(input)?;
    let (input, parameters) = parameters(input)?;
    let (input, _) = symbol_char(':')(input)?;
    let (input, returns) = returns(input)?;

    let (input, requires) = many0(preceded(keyword("requires"), terminated(expression, symbol_char(';'))))(input)?;
    let (input, ensures) = many0(preceded(keyword("ensures"), terminated(expression, symbol_char(';'))))(input)?;

    let (input, body) = alt((
        map(
            preceded(symbol_char('{'), terminated(many0(statement), symbol_char('}'))),
            Some,
        ),
        map(symbol_char(';'), |_| None),
    ))(input)?;

    let location = span_of(start, input);
    Ok((
        input,
        FnSignatureAst {
            proof,
            name,
            parameters,
            returns,
            requires,
            ensures,
            body,
            location,
        },
    ))
}

fn field(input: NomSpan) -> PResult<FieldAst> {
    let start = input;
    let (input, name) = identifier(input)?;
    let (input, ty) = preceded(symbol_char(':'), type_ref)(input)?;
    let (input, _) = symbol_char(';')(input)?;
    let location = span_of(start, input);
    Ok((input, FieldAst { name, ty, location }))
}

enum Member {
    Field(FieldAst),
    Function(FnSignatureAst),
}

fn member(input: NomSpan) -> PResult<Member> {
    alt((map(fn_signature, Member::Function), map(field, Member::Field)))(input)
}

fn record_definition(input: NomSpan) -> PResult<RecordDefinition> {
    let start = input;
    let (input, _) = keyword("record")(input)?;
    let (input, name) = identifier(input)?;
    let (input, type_parameters) = type_parameters(input)?;
    let (input, header_constraints) = header_constraints(input)?;
    let (input, members) = preceded(symbol_char('{'), terminated(many0(member), symbol_char('}')))(input)?;

    let mut fields = Vec::new();
    let mut functions = Vec::new();
    for m in members {
        match m {
            Member::Field(f) => fields.push(f),
            Member::Function(f) => functions.push(f),
        }
    }

    let location = span_of(start, input);
    Ok((
        input,
        RecordDefinition {
            name,
            type_parameters: Some(type_parameters).filter(|t| !t.parameters.is_empty() || !t.constraints.is_empty()),
            header_constraints,
            fields,
            functions,
            location,
        },
    ))
}

fn interface_definition(input: NomSpan) -> PResult<InterfaceDefinition> {
    let start = input;
    let (input, _) = keyword("interface")(input)?;
    let (input, name) = identifier(input)?;
    let (input, type_parameters) = type_parameters(input)?;
    let (input, functions) = preceded(symbol_char('{'), terminated(many0(fn_signature), symbol_char('}')))(input)?;
    let location = span_of(start, input);
    Ok((
        input,
        InterfaceDefinition {
            name,
            type_parameters: Some(type_parameters).filter(|t| !t.parameters.is_empty() || !t.constraints.is_empty()),
            functions,
            location,
        },
    ))
}

pub fn definition(input: NomSpan) -> PResult<Definition> {
    alt((map(record_definition, Definition::Record), map(interface_definition, Definition::Interface)))(input)
}
