//! Statement grammar: `var`, `return`, `if`/`else if`/`else`, `unreachable`.

use nom::branch::alt;
use nom::combinator::{map, opt};
use nom::multi::many0;
use nom::sequence::{pair, preceded, terminated};

use crate::ast::{IfBranchAst, StatementAst};
use crate::nom_tools::{NomSpan, Span, SourceLocation};
use crate::parser::common::{comma_list0, identifier, keyword, symbol_char, PResult};
use crate::parser::expression::expression;
use crate::parser::type_ref::type_ref;

fn span_of(start: NomSpan, end: NomSpan) -> SourceLocation {
    let start_span: Span = start.into();
    SourceLocation {
        file_id: start_span.file.0,
        offset: start_span.position.start,
        length: end.location_offset() - start_span.position.start,
    }
}

fn var_statement(input: NomSpan) -> PResult<StatementAst> {
    let start = input;
    let (input, _) = keyword("var")(input)?;
    let (input, bindings) = comma_list0(pair(identifier, opt(preceded(symbol_char(':'), type_ref))))(input)?;
    let (input, _) = symbol_char('=')(input)?;
    let (input, values) = comma_list0(expression)(input)?;
    let (input, _) = symbol_char(';')(input)?;
    let location = span_of(start, input);
    let (names, types) = bindings.into_iter().unzip();
    Ok((
        input,
        StatementAst::Var {
            names,
            types,
            values,
            location,
        },
    ))
}

fn return_statement(input: NomSpan) -> PResult<StatementAst> {
    let start = input;
    let (input, _) = keyword("return")(input)?;
    let (input, values) = comma_list0(expression)(input)?;
    let (input, _) = symbol_char(';')(input)?;
    let location = span_of(start, input);
    Ok((input, StatementAst::Return { values, location }))
}

fn unreachable_statement(input: NomSpan) -> PResult<StatementAst> {
    let start = input;
    let (input, _) = keyword("unreachable")(input)?;
    let (input, _) = symbol_char(';')(input)?;
    let location = span_of(start, input);
    Ok((input, StatementAst::Unreachable { location }))
}

fn block(input: NomSpan) -> PResult<Vec<StatementAst>> {
    preceded(symbol_char('{'), terminated(many0(statement), symbol_char('}')))(input)
}

fn if_statement(input: NomSpan) -> PResult<StatementAst> {
    let start = input;
    let (input, _) = keyword("if")(input)?;
    let (input, condition) = expression(input)?;
    let (input, body) = block(input)?;
    let mut branches = vec![IfBranchAst { condition, body }];

    let mut rest = input;
    let mut else_block = None;
    loop {
        match keyword("else")(rest) {
            Ok((next, _)) => match keyword("if")(next) {
                Ok((next, _)) => {
                    let (next, condition) = expression(next)?;
                    let (next, body) = block(next)?;
                    branches.push(IfBranchAst { condition, body });
                    rest = next;
                }
                Err(_) => {
                    let (next, body) = block(next)?;
                    else_block = Some(body);
                    rest = next;
                    break;
                }
            },
            Err(_) => break,
        }
    }

    let location = span_of(start, rest);
    Ok((
        rest,
        StatementAst::If {
            branches,
            else_block,
            location,
        },
    ))
}

pub fn statement(input: NomSpan) -> PResult<StatementAst> {
    alt((var_statement, return_statement, unreachable_statement, if_statement))(input)
}
