use std::f64::consts;
use std::fmt;

use strum_macros::{AsRefStr, Display, EnumString};

pub use eval::evaluate;
pub use lexer::{plain_number, tokenize};
pub use parser::parse;

mod eval;
mod lexer;
mod parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }
}

/// The three grouping delimiter families. They group identically but a
/// grouping must be closed with the style it was opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketStyle {
    Paren,
    Square,
    Curly,
}

impl BracketStyle {
    pub fn open(self) -> char {
        match self {
            Self::Paren => '(',
            Self::Square => '[',
            Self::Curly => '{',
        }
    }

    pub fn close(self) -> char {
        match self {
            Self::Paren => ')',
            Self::Square => ']',
            Self::Curly => '}',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    Identifier(String),
    LeftBracket(BracketStyle),
    RightBracket(BracketStyle),
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(v) => write!(f, "{}", v),
            Token::Operator(op) => f.write_str(op.symbol()),
            Token::Identifier(name) => f.write_str(name),
            Token::LeftBracket(style) => write!(f, "{}", style.open()),
            Token::RightBracket(style) => write!(f, "{}", style.close()),
            Token::Comma => f.write_str(","),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Self::Pi => consts::PI,
            Self::E => consts::E,
        }
    }
}

/// Functions callable from an expression. Trigonometric functions take
/// their argument in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Log,
    Sqrt,
    Exp,
    Abs,
}

impl Function {
    pub fn arity(self) -> usize {
        1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    Constant(Constant),
    UnaryOp(UnaryOp, Box<Expr>),
    BinaryOp(Operator, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

impl Expr {
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::UnaryOp(op, Box::new(operand))
    }

    pub fn binary(op: Operator, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp(op, Box::new(left), Box::new(right))
    }
}
