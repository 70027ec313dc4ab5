//! Shared nom plumbing: the located-span type threaded through the parser,
//! and the conversion into the flat [`SourceLocation`] the elaborator and
//! diagnostics deal in.

use std::ops::Range;

use nom::character::complete::multispace0;
use nom::sequence::delimited;
use nom::{IResult, Parser};
use nom_locate::LocatedSpan;

use crate::file::FileId;

/// Per-file parse state carried by every [`NomSpan`]. Only `file` takes part
/// in equality: two spans pointing at the same file compare equal-ish even
/// after the underlying indexer ticks forward.
#[derive(Debug, Clone)]
pub struct State {
    pub file: FileId,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
    }
}
impl Eq for State {}

pub type NomSpan<'base> = LocatedSpan<&'base str, State>;

/// A resolved slice of source text: the text itself, its byte range, and
/// which file it came from. Cheap to clone — it borrows `'base` from the
/// original source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'base> {
    pub text: &'base str,
    pub position: Range<usize>,
    pub file: FileId,
}

impl<'base> Span<'base> {
    pub fn to_location(&self) -> SourceLocation {
        SourceLocation {
            file_id: self.file.0,
            offset: self.position.start,
            length: self.position.end.saturating_sub(self.position.start),
        }
    }
}

impl<'base> From<NomSpan<'base>> for Span<'base> {
    fn from(value: NomSpan<'base>) -> Self {
        let start = value.location_offset();
        Span {
            text: value.fragment(),
            position: start..(start + value.fragment().len()),
            file: value.extra.file,
        }
    }
}

impl std::fmt::Display for Span<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A location in source, independent of any borrowed text — what gets
/// stored on IR nodes and diagnostics after parsing finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file_id: usize,
    pub offset: usize,
    pub length: usize,
}

impl SourceLocation {
    pub fn range(&self) -> Range<usize> {
        self.offset..(self.offset + self.length)
    }

    pub fn synthetic() -> Self {
        SourceLocation { file_id: usize::MAX, offset: 0, length: 0 }
    }
}

impl From<&Span<'_>> for SourceLocation {
    fn from(span: &Span<'_>) -> Self {
        span.to_location()
    }
}

/// Strips leading/trailing whitespace around a combinator, the way every
/// grammar rule in this parser wants to.
pub fn cleanup<'base, O, F>(mut inner: F) -> impl FnMut(NomSpan<'base>) -> IResult<NomSpan<'base>, O>
where
    F: Parser<NomSpan<'base>, O, nom::error::VerboseError<NomSpan<'base>>>,
{
    move |input: NomSpan<'base>| delimited(multispace0, |i| inner.parse(i), multispace0).parse(input)
}
