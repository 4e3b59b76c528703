use std::fmt;

use derive_more::{Display, From};

use telemetry::IsErr;

use crate::expression::{BracketStyle, Function, Token};

#[derive(Debug, Clone, PartialEq, Display)]
#[display(fmt = "Unrecognised character {:?} at offset {}", character, position)]
pub struct LexError {
    pub position: usize,
    pub character: char,
}

impl std::error::Error for LexError {}

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    UnexpectedEnd,
    UnexpectedToken(Token),
    MismatchedBracket {
        expected: BracketStyle,
        found: BracketStyle,
    },
    UnclosedBracket(BracketStyle),
    UnmatchedBracket(BracketStyle),
    EmptyGroup,
    UnknownIdentifier(String),
    MissingArguments(Function),
    Arity {
        function: Function,
        expected: usize,
        found: usize,
    },
    TrailingTokens,
    TooDeep,
    TooLarge,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd => f.write_str("unexpected end of expression"),
            Self::UnexpectedToken(token) => write!(f, "unexpected token \"{}\"", token),
            Self::MismatchedBracket { expected, found } => write!(
                f,
                "expected \"{}\" but found \"{}\"",
                expected.close(),
                found.close()
            ),
            Self::UnclosedBracket(style) => write!(f, "unclosed \"{}\"", style.open()),
            Self::UnmatchedBracket(style) => write!(f, "unmatched \"{}\"", style.close()),
            Self::EmptyGroup => f.write_str("empty grouping"),
            Self::UnknownIdentifier(name) => write!(f, "unknown identifier \"{}\"", name),
            Self::MissingArguments(function) => {
                write!(f, "{} requires a bracketed argument", function)
            }
            Self::Arity {
                function,
                expected,
                found,
            } => write!(
                f,
                "{} takes {} argument(s) but {} were supplied",
                function,
                expected,
                found
            ),
            Self::TrailingTokens => f.write_str("unexpected tokens after expression"),
            Self::TooDeep => f.write_str("expression nested too deeply"),
            Self::TooLarge => f.write_str("expression too long"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Display)]
#[display(fmt = "Syntax error at token {}: {}", position, kind)]
pub struct SyntaxError {
    /// Index of the offending token, or the token count when input ended early
    pub position: usize,
    pub kind: SyntaxErrorKind,
}

impl std::error::Error for SyntaxError {}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum DomainError {
    #[display(fmt = "Division by zero")]
    DivisionByZero,

    #[display(fmt = "Square root of negative number {}", _0)]
    NegativeSqrt(f64),

    #[display(fmt = "Logarithm of non-positive number {}", _0)]
    NonPositiveLog(f64),

    #[display(fmt = "{} takes {} argument(s) but {} were supplied", _0, _1, _2)]
    Arity(Function, usize, usize),

    #[display(fmt = "Result is not a real number")]
    NotANumber,

    #[display(fmt = "Result out of range")]
    Overflow,
}

impl std::error::Error for DomainError {}

#[derive(Debug, Clone, PartialEq, Display, From)]
pub enum CalcError {
    #[display(fmt = "{}", _0)]
    Lex(LexError),

    #[display(fmt = "{}", _0)]
    Syntax(SyntaxError),

    #[display(fmt = "{}", _0)]
    Domain(DomainError),
}

impl std::error::Error for CalcError {}

impl IsErr for CalcError {}
