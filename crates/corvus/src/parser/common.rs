//! Identifiers, keywords, and whitespace handling shared by every grammar
//! rule in this parser.

use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{map, peek, recognize, verify};
use nom::error::{context, VerboseError};
use nom::sequence::{delimited, pair};
use nom::IResult;

use crate::ast::Spanned;
use crate::nom_tools::{NomSpan, Span};

pub type PResult<'base, O> = IResult<NomSpan<'base>, O, VerboseError<NomSpan<'base>>>;

const KEYWORDS: &[&str] = &[
    "package", "import", "record", "interface", "is", "fn", "proof", "requires", "ensures", "var", "return", "if", "else", "unreachable", "This", "String",
    "Int", "Boolean", "Unit", "true", "false", "and", "or", "implies", "this",
];

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Strips leading/trailing whitespace and comments around a rule.
pub fn ws<'base, O, F>(mut inner: F) -> impl FnMut(NomSpan<'base>) -> PResult<'base, O>
where
    F: nom::Parser<NomSpan<'base>, O, VerboseError<NomSpan<'base>>>,
{
    move |input| delimited(multispace0, |i| inner.parse(i), multispace0).parse(input)
}

fn raw_identifier(input: NomSpan) -> PResult<NomSpan> {
    recognize(pair(take_while1(is_ident_start), take_while(is_ident_continue)))(input)
}

/// Any identifier that is not a reserved keyword.
pub fn identifier(input: NomSpan) -> PResult<Spanned<String>> {
    context(
        "identifier",
        ws(map(verify(raw_identifier, |s: &NomSpan| !KEYWORDS.contains(&*s.fragment())), |s: NomSpan| {
            let span: Span = s.into();
            Spanned::new(span.text.to_string(), span.to_location())
        })),
    )(input)
}

/// True if the first character of `name` is uppercase — this parser's
/// convention for telling entity names (`Record`, `Good`) apart from
/// variable/field/method names (`record`, `good`) at parse time.
pub fn looks_like_type_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

pub fn keyword<'base>(word: &'static str) -> impl FnMut(NomSpan<'base>) -> PResult<'base, Span<'base>> {
    move |input| {
        ws(map(
            recognize(verify(raw_identifier, move |s: &NomSpan| *s.fragment() == word)),
            |s: NomSpan<'base>| s.into(),
        ))(input)
    }
}

pub fn symbol<'base>(sym: &'static str) -> impl FnMut(NomSpan<'base>) -> PResult<'base, Span<'base>> {
    move |input| ws(map(tag(sym), |s: NomSpan<'base>| s.into()))(input)
}

pub fn symbol_char<'base>(c: char) -> impl FnMut(NomSpan<'base>) -> PResult<'base, Span<'base>> {
    move |input| ws(map(recognize(char(c)), |s: NomSpan<'base>| s.into()))(input)
}

/// Peeks at the next identifier without consuming input; used to decide
/// between grammar alternatives that share a prefix.
pub fn peek_identifier(input: NomSpan) -> PResult<Spanned<String>> {
    peek(identifier)(input)
}

pub fn dot(input: NomSpan) -> PResult<Span> {
    symbol_char('.')(input)
}

pub fn comma_list0<'base, O, F>(mut item: F) -> impl FnMut(NomSpan<'base>) -> PResult<'base, Vec<O>>
where
    F: nom::Parser<NomSpan<'base>, O, VerboseError<NomSpan<'base>>>,
{
    move |input| {
        let mut results = Vec::new();
        let mut rest = input;
        loop {
            match item.parse(rest) {
                Ok((next, value)) => {
                    results.push(value);
                    rest = next;
                    match symbol_char(',')(rest) {
                        Ok((next, _)) => rest = next,
                        Err(_) => break,
                    }
                }
                Err(_) => break,
            }
        }
        Ok((rest, results))
    }
}
