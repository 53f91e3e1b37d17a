//! The error types that are shared by the parser, the converters and the
//! printer.

use crate::gv::parser::ast::Location;
use std::fmt;
use thiserror::Error;

/// The generic Error type, which covers all of the errors that the pipeline
/// (parse, convert, print) can return.
///
/// None of these errors are retried internally. An operation either produces
/// a complete tree (or model, or string) or fails as a whole.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The DOT text is malformed. Carries the location of the offending token
    /// and the set of tokens that would have been accepted there.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The AST builder created more nodes than it is allowed to. Either raise
    /// the limit or reject the input.
    #[error("the AST node limit of {limit} was exceeded")]
    NodeCountExceeded {
        /// The configured ceiling.
        limit: usize,
    },

    /// An edge was constructed with fewer than two usable targets.
    #[error("an edge requires at least two targets, found {found}")]
    InvalidEdgeTargets {
        /// The number of usable targets that were passed in.
        found: usize,
    },

    /// No plugin accepted the node (or model) handed to a converter or to the
    /// printer, or a plugin returned a node of the wrong shape.
    #[error("conversion failed: {0}")]
    Conversion(String),
}

/// Result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Creates a conversion error from the string \p msg.
pub(crate) fn conversion_error<T>(msg: impl Into<String>) -> Result<T> {
    Result::Err(Error::Conversion(msg.into()))
}

/// Describes one kind of token that the parser would have accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// A fixed piece of text, such as `{` or `digraph`.
    Literal(String),
    /// A class of tokens, such as "identifier".
    Class(String),
    /// Any character.
    Any,
    /// The end of the input.
    End,
    /// Anything else, described in words.
    Other(String),
}

impl Expectation {
    pub fn literal(s: &str) -> Self {
        Expectation::Literal(s.to_string())
    }
    pub fn class(s: &str) -> Self {
        Expectation::Class(s.to_string())
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Literal(s) => write!(f, "\"{}\"", s),
            Expectation::Class(s) => write!(f, "{}", s),
            Expectation::Any => write!(f, "any character"),
            Expectation::End => write!(f, "end of input"),
            Expectation::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A located parse error.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "{}{}:{}: {message}",
    filename_prefix(.filename),
    .location.start.line,
    .location.start.column
)]
pub struct SyntaxError {
    /// Human readable description of the problem.
    pub message: String,
    /// The tokens that would have been accepted at this location.
    pub expected: Vec<Expectation>,
    /// The text that was found instead, or None at the end of the input.
    pub found: Option<String>,
    /// Where the problem is.
    pub location: Location,
    /// The name of the file that was parsed, if one was given.
    pub filename: Option<String>,
}

fn filename_prefix(filename: &Option<String>) -> String {
    match filename {
        Option::Some(name) => format!("{}:", name),
        Option::None => String::new(),
    }
}

impl SyntaxError {
    pub fn new(
        expected: Vec<Expectation>,
        found: Option<String>,
        location: Location,
    ) -> Self {
        let message = describe(&expected, &found);
        Self {
            message,
            expected,
            found,
            location,
            filename: Option::None,
        }
    }

    /// Renders the line of \p source that contains the error, with a '^'
    /// marker below the offending column.
    pub fn snippet(&self, source: &str) -> String {
        let line_no = self.location.start.line;
        let line = source.lines().nth(line_no.saturating_sub(1)).unwrap_or("");
        // Columns are 1-based; the marker goes under the first bad char.
        let pad = " ".repeat(self.location.start.column.saturating_sub(1));
        format!("{:>4} | {}\n     | {}^", line_no, line, pad)
    }
}

fn describe(expected: &[Expectation], found: &Option<String>) -> String {
    let mut names: Vec<String> =
        expected.iter().map(|e| e.to_string()).collect();
    names.sort();
    names.dedup();
    let expected = match names.len() {
        0 => "end of input".to_string(),
        1 => names[0].clone(),
        n => format!("{} or {}", names[..n - 1].join(", "), names[n - 1]),
    };
    let found = match found {
        Option::Some(text) => format!("\"{}\"", text),
        Option::None => "end of input".to_string(),
    };
    format!("Expected {} but {} found.", expected, found)
}

#[test]
fn test_syntax_error_message() {
    use crate::gv::parser::ast::Position;
    let pos = Position::new(4, 1, 5);
    let err = SyntaxError::new(
        vec![Expectation::literal("{"), Expectation::class("identifier")],
        Option::Some("]".to_string()),
        Location::new(pos, Position::new(5, 1, 6)),
    );
    assert_eq!(err.message, "Expected \"{\" or identifier but \"]\" found.");
    assert_eq!(err.to_string(), "1:5: Expected \"{\" or identifier but \"]\" found.");
    assert_eq!(err.snippet("abc ]"), "   1 | abc ]\n     |     ^");
}
