//! Expression grammar. Produces a flat `(operator, atom)*` list — the
//! parser never applies precedence; `elab::precedence` does that later.

use nom::branch::alt;
use nom::combinator::{map, opt, peek, value};
use nom::error::ParseError;
use nom::multi::many0;
use nom::sequence::{pair, preceded, terminated};

use crate::ast::{ExpressionAst, ExpressionAtomAst, OperatorAst, Spanned};
use crate::nom_tools::{NomSpan, Span, SourceLocation};
use crate::parser::common::{comma_list0, identifier, keyword, looks_like_type_name, peek_identifier, symbol, symbol_char, PResult};
use crate::parser::type_ref::type_ref;

fn span_of(start: NomSpan, end: NomSpan) -> SourceLocation {
    let start_span: Span = start.into();
    SourceLocation {
        file_id: start_span.file.0,
        offset: start_span.position.start,
        length: end.location_offset() - start_span.position.start,
    }
}

fn operator(input: NomSpan) -> PResult<OperatorAst> {
    alt((
        value(OperatorAst::Implies, keyword("implies")),
        value(OperatorAst::And, keyword("and")),
        value(OperatorAst::Or, keyword("or")),
        value(OperatorAst::Le, symbol("<=")),
        value(OperatorAst::Ge, symbol(">=")),
        value(OperatorAst::Eq, symbol("==")),
        value(OperatorAst::Neq, symbol("!=")),
        value(OperatorAst::Lt, symbol_char('<')),
        value(OperatorAst::Gt, symbol_char('>')),
        value(OperatorAst::Add, symbol_char('+')),
        value(OperatorAst::Sub, symbol_char('-')),
    ))(input)
}

fn call_arguments(input: NomSpan) -> PResult<Vec<ExpressionAst>> {
    preceded(symbol_char('('), terminated(comma_list0(expression), symbol_char(')')))(input)
}

/// `Type.method(args)` — only tried when the leading name looks like a
/// type (capitalized), per this parser's naming convention.
fn static_call_or_record_literal(input: NomSpan) -> PResult<ExpressionAtomAst> {
    let start = input;
    let (_, probe) = peek_identifier(input)?;
    if !looks_like_type_name(&probe.value) {
        return Err(nom::Err::Error(nom::error::VerboseError::from_error_kind(input, nom::error::ErrorKind::Verify)));
    }

    let (input, ty) = type_ref(input)?;
    if let Ok((input, _)) = symbol_char('{')(input) {
        let (input, fields) = comma_list0(pair(identifier, preceded(symbol_char('='), expression)))(input)?;
        let (input, _) = symbol_char('}')(input)?;
        let location = span_of(start, input);
        return Ok((input, ExpressionAtomAst::RecordLiteral { ty, fields, location }));
    }

    let (input, _) = crate::parser::common::dot(input)?;
    let (input, method) = identifier(input)?;
    let (input, arguments) = call_arguments(input)?;
    let location = span_of(start, input);
    Ok((input, ExpressionAtomAst::StaticCall { ty, method, arguments, location }))
}

fn primary(input: NomSpan) -> PResult<ExpressionAtomAst> {
    let start = input;
    alt((
        static_call_or_record_literal,
        map(keyword("return"), |s| ExpressionAtomAst::Return(s.to_location())),
        map(keyword("true"), |s| ExpressionAtomAst::BoolLiteral(Spanned::new(true, s.to_location()))),
        map(keyword("false"), |s| ExpressionAtomAst::BoolLiteral(Spanned::new(false, s.to_location()))),
        int_literal,
        string_literal,
        map(preceded(symbol_char('('), terminated(expression, symbol_char(')'))), |e| ExpressionAtomAst::Paren(Box::new(e))),
        map(identifier, ExpressionAtomAst::Identifier),
    ))(input)
    .map(|(rest, atom)| (rest, (start, atom)))
    .and_then(|(rest, (start, atom))| postfix(rest, start, atom))
}

fn postfix<'base>(input: NomSpan<'base>, start: NomSpan<'base>, mut atom: ExpressionAtomAst) -> PResult<'base, ExpressionAtomAst> {
    let mut rest = input;
    loop {
        match crate::parser::common::dot(rest) {
            Ok((next, _)) => {
                let (next, name) = identifier(next)?;
                match peek(symbol_char('('))(next) {
                    Ok(_) => {
                        let (next, arguments) = call_arguments(next)?;
                        let location = span_of(start, next);
                        atom = ExpressionAtomAst::MethodAccess {
                            base: Box::new(atom),
                            name,
                            arguments,
                            location,
                        };
                        rest = next;
                    }
                    Err(_) => {
                        let location = span_of(start, next);
                        atom = ExpressionAtomAst::FieldAccess {
                            base: Box::new(atom),
                            name,
                            location,
                        };
                        rest = next;
                    }
                }
            }
            Err(_) => break,
        }
    }
    Ok((rest, atom))
}

fn int_literal(input: NomSpan) -> PResult<ExpressionAtomAst> {
    use nom::character::complete::digit1;
    crate::parser::common::ws(map(digit1, move |s: NomSpan| {
        let span: Span = s.into();
        ExpressionAtomAst::IntLiteral(Spanned::new(span.text.parse().unwrap_or(0), span.to_location()))
    }))(input)
}

fn string_literal(input: NomSpan) -> PResult<ExpressionAtomAst> {
    use nom::bytes::complete::{is_not, tag};
    crate::parser::common::ws(map(
        nom::sequence::delimited(tag("\""), nom::combinator::recognize(opt(is_not("\""))), tag("\"")),
        |s: NomSpan| {
            let span: Span = s.into();
            ExpressionAtomAst::StringLiteral(Spanned::new(span.text.to_string(), span.to_location()))
        },
    ))(input)
}

pub fn expression(input: NomSpan) -> PResult<ExpressionAst> {
    let start = input;
    let (input, head) = primary(input)?;
    let (input, tail) = many0(pair(operator, primary))(input)?;
    let location = span_of(start, input);
    Ok((
        input,
        ExpressionAst {
            head: Box::new(head),
            tail,
            location,
        },
    ))
}
