use std::str::FromStr;

use crate::error::{SyntaxError, SyntaxErrorKind};

use super::{BracketStyle, Constant, Expr, Function, Operator, Token, UnaryOp};

/// Deepest nesting of groupings, unary signs and exponents accepted
const MAX_DEPTH: usize = 256;

/// Most operator and call nodes a single expression may contain
const MAX_NODES: usize = 1024;

/// Recursive descent over a token slice.
///
/// Each precedence level folds its operands left to right, except power which
/// recurses on its right operand. Recursion and tree size are capped so the
/// parse, the evaluation and the drop of the tree all stay within the stack.
struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    closers: Vec<BracketStyle>,
    depth: usize,
    nodes: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            position: 0,
            closers: Vec::new(),
            depth: 0,
            nodes: 0,
        }
    }

    fn descend(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(SyntaxErrorKind::TooDeep));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn node(&mut self) -> Result<(), SyntaxError> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return Err(self.error(SyntaxErrorKind::TooLarge));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError {
            position: self.position,
            kind,
        }
    }

    fn unexpected(&self) -> SyntaxError {
        match self.peek() {
            Some(token) => self.error(SyntaxErrorKind::UnexpectedToken(token.clone())),
            None => self.error(SyntaxErrorKind::UnexpectedEnd),
        }
    }

    fn next_operator(&mut self, accepted: &[Operator]) -> Option<Operator> {
        match self.peek() {
            Some(Token::Operator(op)) if accepted.contains(op) => {
                self.position += 1;
                Some(*op)
            }
            _ => None,
        }
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.term()?;
        while let Some(op) = self.next_operator(&[Operator::Add, Operator::Sub]) {
            self.node()?;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.power()?;
        while let Some(op) = self.next_operator(&[Operator::Mul, Operator::Div]) {
            self.node()?;
            let rhs = self.power()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn power(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.unary()?;
        match self.next_operator(&[Operator::Pow]) {
            Some(op) => {
                self.node()?;
                self.descend()?;
                let exponent = self.power()?;
                self.ascend();
                Ok(Expr::binary(op, base, exponent))
            }
            None => Ok(base),
        }
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        let op = match self.next_operator(&[Operator::Sub, Operator::Add]) {
            Some(Operator::Sub) => UnaryOp::Neg,
            Some(_) => UnaryOp::Plus,
            None => return self.primary(),
        };

        self.node()?;
        self.descend()?;
        let operand = self.unary()?;
        self.ascend();
        Ok(Expr::unary(op, operand))
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.position;
        match self.peek() {
            Some(Token::Number(v)) => {
                self.position += 1;
                Ok(Expr::Literal(*v))
            }
            Some(Token::Identifier(name)) => {
                self.position += 1;
                self.identifier(start, name)
            }
            Some(Token::LeftBracket(style)) => {
                self.position += 1;
                self.grouping(*style)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn identifier(&mut self, start: usize, name: &str) -> Result<Expr, SyntaxError> {
        if let Ok(constant) = Constant::from_str(name) {
            return Ok(Expr::Constant(constant));
        }

        let function = Function::from_str(name).map_err(|_| SyntaxError {
            position: start,
            kind: SyntaxErrorKind::UnknownIdentifier(name.to_string()),
        })?;

        let style = match self.peek() {
            Some(Token::LeftBracket(style)) => *style,
            _ => return Err(self.error(SyntaxErrorKind::MissingArguments(function))),
        };
        self.position += 1;

        self.node()?;
        let args = self.arguments(style)?;
        if args.len() != function.arity() {
            return Err(SyntaxError {
                position: start,
                kind: SyntaxErrorKind::Arity {
                    function,
                    expected: function.arity(),
                    found: args.len(),
                },
            });
        }
        Ok(Expr::Call(function, args))
    }

    /// Parses the body of a grouping whose opener has been consumed
    fn grouping(&mut self, style: BracketStyle) -> Result<Expr, SyntaxError> {
        self.descend()?;
        self.closers.push(style);
        if let Some(Token::RightBracket(_)) = self.peek() {
            let position = self.position;
            self.close()?;
            return Err(SyntaxError {
                position,
                kind: SyntaxErrorKind::EmptyGroup,
            });
        }

        let inner = self.expression()?;
        self.close()?;
        self.ascend();
        Ok(inner)
    }

    /// Parses comma separated function arguments whose opener has been consumed
    fn arguments(&mut self, style: BracketStyle) -> Result<Vec<Expr>, SyntaxError> {
        self.descend()?;
        self.closers.push(style);
        if let Some(Token::RightBracket(_)) = self.peek() {
            self.close()?;
            self.ascend();
            return Ok(Vec::new());
        }

        let mut args = vec![self.expression()?];
        while let Some(Token::Comma) = self.peek() {
            self.position += 1;
            args.push(self.expression()?);
        }
        self.close()?;
        self.ascend();
        Ok(args)
    }

    fn close(&mut self) -> Result<(), SyntaxError> {
        let expected = match self.closers.pop() {
            Some(expected) => expected,
            None => return Err(self.unexpected()),
        };

        match self.peek() {
            Some(Token::RightBracket(found)) if *found == expected => {
                self.position += 1;
                Ok(())
            }
            Some(Token::RightBracket(found)) => Err(self.error(SyntaxErrorKind::MismatchedBracket {
                expected,
                found: *found,
            })),
            Some(_) => Err(self.unexpected()),
            None => Err(self.error(SyntaxErrorKind::UnclosedBracket(expected))),
        }
    }
}

/// Builds an expression tree from `tokens`, requiring every token to be
/// consumed.
pub fn parse(tokens: &[Token]) -> Result<Expr, SyntaxError> {
    let mut parser = Parser::new(tokens);
    let expr = parser.expression()?;

    match parser.advance() {
        None => Ok(expr),
        Some(Token::RightBracket(style)) => Err(SyntaxError {
            position: parser.position - 1,
            kind: SyntaxErrorKind::UnmatchedBracket(*style),
        }),
        Some(_) => Err(SyntaxError {
            position: parser.position - 1,
            kind: SyntaxErrorKind::TrailingTokens,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::expression::tokenize;

    use super::*;

    fn parse_str(input: &str) -> Result<Expr, Box<dyn std::error::Error>> {
        Ok(parse(&tokenize(input)?)?)
    }

    fn syntax_error(input: &str) -> SyntaxError {
        let tokens = tokenize(input).expect("input should lex");
        parse(&tokens).expect_err("input should not parse")
    }

    fn lit(v: f64) -> Expr {
        Expr::Literal(v)
    }

    #[test]
    fn test_precedence() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            parse_str("1+2*3")?,
            Expr::binary(
                Operator::Add,
                lit(1.0),
                Expr::binary(Operator::Mul, lit(2.0), lit(3.0))
            )
        );
        assert_eq!(
            parse_str("8-4-2")?,
            Expr::binary(
                Operator::Sub,
                Expr::binary(Operator::Sub, lit(8.0), lit(4.0)),
                lit(2.0)
            )
        );
        assert_eq!(
            parse_str("2^3^2")?,
            Expr::binary(
                Operator::Pow,
                lit(2.0),
                Expr::binary(Operator::Pow, lit(3.0), lit(2.0))
            )
        );
        Ok(())
    }

    #[test]
    fn test_unary_binds_tighter_than_power() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            parse_str("-2^2")?,
            Expr::binary(
                Operator::Pow,
                Expr::unary(UnaryOp::Neg, lit(2.0)),
                lit(2.0)
            )
        );
        assert_eq!(
            parse_str("2^-1")?,
            Expr::binary(
                Operator::Pow,
                lit(2.0),
                Expr::unary(UnaryOp::Neg, lit(1.0))
            )
        );
        assert_eq!(
            parse_str("3--2")?,
            Expr::binary(
                Operator::Sub,
                lit(3.0),
                Expr::unary(UnaryOp::Neg, lit(2.0))
            )
        );
        Ok(())
    }

    #[test]
    fn test_groupings_and_calls() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            parse_str("{[(1+2)]}*pi")?,
            Expr::binary(
                Operator::Mul,
                Expr::binary(Operator::Add, lit(1.0), lit(2.0)),
                Expr::Constant(Constant::Pi)
            )
        );
        assert_eq!(
            parse_str("sqrt[abs{-16}]")?,
            Expr::Call(
                Function::Sqrt,
                vec![Expr::Call(
                    Function::Abs,
                    vec![Expr::unary(UnaryOp::Neg, lit(16.0))]
                )]
            )
        );
        Ok(())
    }

    #[test]
    fn test_bracket_errors() {
        assert_eq!(
            syntax_error("(3+4]"),
            SyntaxError {
                position: 4,
                kind: SyntaxErrorKind::MismatchedBracket {
                    expected: BracketStyle::Paren,
                    found: BracketStyle::Square,
                },
            }
        );
        assert_eq!(
            syntax_error("(3+4").kind,
            SyntaxErrorKind::UnclosedBracket(BracketStyle::Paren)
        );
        assert_eq!(
            syntax_error("3+4}"),
            SyntaxError {
                position: 3,
                kind: SyntaxErrorKind::UnmatchedBracket(BracketStyle::Curly),
            }
        );
        assert_eq!(syntax_error("2*[]").kind, SyntaxErrorKind::EmptyGroup);
        assert_eq!(
            syntax_error("(]").kind,
            SyntaxErrorKind::MismatchedBracket {
                expected: BracketStyle::Paren,
                found: BracketStyle::Square,
            }
        );
    }

    #[test]
    fn test_identifier_errors() {
        assert_eq!(
            syntax_error("1+foo(1)"),
            SyntaxError {
                position: 2,
                kind: SyntaxErrorKind::UnknownIdentifier("foo".to_string()),
            }
        );
        assert_eq!(
            syntax_error("sin 30").kind,
            SyntaxErrorKind::MissingArguments(Function::Sin)
        );
        assert_eq!(
            syntax_error("log(1,2)").kind,
            SyntaxErrorKind::Arity {
                function: Function::Log,
                expected: 1,
                found: 2,
            }
        );
        assert_eq!(
            syntax_error("cos()").kind,
            SyntaxErrorKind::Arity {
                function: Function::Cos,
                expected: 1,
                found: 0,
            }
        );
    }

    #[test]
    fn test_malformed_sequences() {
        assert_eq!(syntax_error("").kind, SyntaxErrorKind::UnexpectedEnd);
        assert_eq!(syntax_error("3+").kind, SyntaxErrorKind::UnexpectedEnd);
        assert_eq!(
            syntax_error("3*/2").kind,
            SyntaxErrorKind::UnexpectedToken(Token::Operator(Operator::Div))
        );
        assert_eq!(
            syntax_error("(1,2)").kind,
            SyntaxErrorKind::UnexpectedToken(Token::Comma)
        );
        assert_eq!(
            syntax_error("2pi"),
            SyntaxError {
                position: 1,
                kind: SyntaxErrorKind::TrailingTokens,
            }
        );
        assert_eq!(syntax_error("2(3)").kind, SyntaxErrorKind::TrailingTokens);
        assert_eq!(syntax_error("1.2.3").kind, SyntaxErrorKind::TrailingTokens);
    }

    #[test]
    fn test_nesting_limit() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(syntax_error(&"(".repeat(10_000)).kind, SyntaxErrorKind::TooDeep);
        assert_eq!(
            syntax_error(&format!("{}1{}", "(".repeat(1000), ")".repeat(1000))).kind,
            SyntaxErrorKind::TooDeep
        );
        assert_eq!(
            syntax_error(&format!("{}1", "-".repeat(200_000))).kind,
            SyntaxErrorKind::TooDeep
        );
        assert_eq!(
            syntax_error(&format!("2{}", "^2".repeat(1000))).kind,
            SyntaxErrorKind::TooDeep
        );
        assert_eq!(
            syntax_error(&format!("{}0{}", "sqrt(".repeat(1000), ")".repeat(1000))).kind,
            SyntaxErrorKind::TooDeep
        );

        let nested = format!("{}1{}", "[".repeat(200), "]".repeat(200));
        assert_eq!(parse_str(&nested)?, lit(1.0));
        Ok(())
    }

    #[test]
    fn test_size_limit() {
        assert_eq!(
            syntax_error(&format!("1{}", "+1".repeat(100_000))).kind,
            SyntaxErrorKind::TooLarge
        );
        assert!(parse_str(&format!("1{}", "*1".repeat(500))).is_ok());
    }
}
