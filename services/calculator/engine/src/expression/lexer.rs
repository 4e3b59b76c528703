use nom::IResult;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit0, digit1},
    combinator::{map, map_res, opt, recognize},
    sequence::pair,
};

use crate::error::LexError;

use super::{BracketStyle, Operator, Token};

fn parse_number(i: &str) -> IResult<&str, Token> {
    let integral = recognize(pair(digit1, opt(pair(char('.'), digit0))));
    let fractional = recognize(pair(char('.'), digit1));

    map_res(alt((integral, fractional)), |digit_str: &str| {
        digit_str.parse().map(Token::Number)
    })(i)
}

fn parse_identifier(i: &str) -> IResult<&str, Token> {
    map(take_while1(|c: char| c.is_ascii_alphabetic()), |name: &str| {
        Token::Identifier(name.to_string())
    })(i)
}

fn parse_operator(i: &str) -> IResult<&str, Token> {
    let op = alt((
        map(alt((tag("**"), tag("^"))), |_| Operator::Pow),
        map(char('+'), |_| Operator::Add),
        map(char('-'), |_| Operator::Sub),
        map(char('*'), |_| Operator::Mul),
        map(char('/'), |_| Operator::Div),
    ));

    map(op, Token::Operator)(i)
}

fn parse_punctuation(i: &str) -> IResult<&str, Token> {
    alt((
        map(char('('), |_| Token::LeftBracket(BracketStyle::Paren)),
        map(char(')'), |_| Token::RightBracket(BracketStyle::Paren)),
        map(char('['), |_| Token::LeftBracket(BracketStyle::Square)),
        map(char(']'), |_| Token::RightBracket(BracketStyle::Square)),
        map(char('{'), |_| Token::LeftBracket(BracketStyle::Curly)),
        map(char('}'), |_| Token::RightBracket(BracketStyle::Curly)),
        map(char(','), |_| Token::Comma),
    ))(i)
}

fn parse_token(i: &str) -> IResult<&str, Token> {
    alt((
        parse_number,
        parse_identifier,
        parse_operator,
        parse_punctuation,
    ))(i)
}

/// Splits `input` into tokens, skipping whitespace between them.
///
/// Identifiers are not validated here, an unknown name only fails once the
/// token sequence is parsed.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut remaining = input.trim_start();

    while let Some(character) = remaining.chars().next() {
        match parse_token(remaining) {
            Ok((rest, token)) => {
                tokens.push(token);
                remaining = rest.trim_start();
            }
            Err(_) => {
                return Err(LexError {
                    position: input.len() - remaining.len(),
                    character,
                })
            }
        }
    }

    Ok(tokens)
}

/// Returns the value of `input` if it is a single number with an optional
/// leading sign, as accepted by the memory buttons.
pub fn plain_number(input: &str) -> Option<f64> {
    let tokens = tokenize(input).ok()?;
    let value = match tokens.as_slice() {
        [Token::Number(v)] => *v,
        [Token::Operator(Operator::Add), Token::Number(v)] => *v,
        [Token::Operator(Operator::Sub), Token::Number(v)] => -*v,
        _ => return None,
    };
    Some(value).filter(|v| v.is_finite())
}
