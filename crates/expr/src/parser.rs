//! Recursive descent parser for the formula grammar.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('^' unary)?
//! primary := number | 'x' | name '(' args? ')' | '(' expr ')'
//! args    := expr (',' expr)*
//! ```
//!
//! Names are resolved while parsing, so a successfully parsed tree only
//! refers to the variable and whitelisted functions.

use crate::{
    BinaryOp, EvaluationError, Expr, Function, UnaryOp, VARIABLE,
    token::{Spanned, Token, tokenize},
};

/// Parses formula source into an expression tree.
pub(crate) fn parse(source: &str) -> Result<Expr, EvaluationError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };

    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(spanned) => Err(unexpected("end of formula", spanned)),
    }
}

struct Parser<'src> {
    tokens: Vec<Spanned<'src>>,
    pos: usize,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Option<Spanned<'src>> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Spanned<'src>> {
        let next = self.peek();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    /// Consumes the next token if it equals `token`.
    fn eat(&mut self, token: Token<'src>) -> bool {
        if self.peek().is_some_and(|spanned| spanned.token == token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token<'src>, expected: &'static str) -> Result<(), EvaluationError> {
        match self.advance() {
            Some(spanned) if spanned.token == token => Ok(()),
            Some(spanned) => Err(unexpected(expected, spanned)),
            None => Err(EvaluationError::UnexpectedEnd { expected }),
        }
    }

    fn expr(&mut self) -> Result<Expr, EvaluationError> {
        let mut lhs = self.term()?;
        loop {
            let op = if self.eat(Token::Plus) {
                BinaryOp::Add
            } else if self.eat(Token::Minus) {
                BinaryOp::Sub
            } else {
                return Ok(lhs);
            };
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr, EvaluationError> {
        let mut lhs = self.unary()?;
        loop {
            let op = if self.eat(Token::Star) {
                BinaryOp::Mul
            } else if self.eat(Token::Slash) {
                BinaryOp::Div
            } else {
                return Ok(lhs);
            };
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> Result<Expr, EvaluationError> {
        let op = if self.eat(Token::Minus) {
            UnaryOp::Neg
        } else if self.eat(Token::Plus) {
            UnaryOp::Plus
        } else {
            return self.power();
        };
        let operand = Box::new(self.unary()?);
        Ok(Expr::Unary { op, operand })
    }

    fn power(&mut self) -> Result<Expr, EvaluationError> {
        let base = self.primary()?;
        if self.eat(Token::Caret) {
            let exponent = self.unary()?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, EvaluationError> {
        const EXPECTED: &str = "a number, 'x', a function call, or '('";

        let Some(spanned) = self.advance() else {
            return Err(EvaluationError::UnexpectedEnd { expected: EXPECTED });
        };

        match spanned.token {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::LeftParen => {
                let inner = self.expr()?;
                self.expect(Token::RightParen, "')'")?;
                Ok(inner)
            }
            Token::Ident(name) if self.eat(Token::LeftParen) => self.call(name),
            Token::Ident(name) if name == VARIABLE => Ok(Expr::Variable),
            Token::Ident(name) => Err(EvaluationError::UnknownName {
                name: name.to_owned(),
            }),
            _ => Err(unexpected(EXPECTED, spanned)),
        }
    }

    /// Parses a call after its opening parenthesis.
    fn call(&mut self, name: &str) -> Result<Expr, EvaluationError> {
        let function = Function::lookup(name).ok_or_else(|| EvaluationError::UnknownFunction {
            name: name.to_owned(),
        })?;

        let mut args = Vec::new();
        if !self.eat(Token::RightParen) {
            loop {
                args.push(self.expr()?);
                if self.eat(Token::Comma) {
                    continue;
                }
                self.expect(Token::RightParen, "',' or ')'")?;
                break;
            }
        }

        let arity = function.arity();
        if !arity.accepts(args.len()) {
            return Err(EvaluationError::WrongArity {
                function: function.name(),
                expected: arity,
                found: args.len(),
            });
        }

        Ok(Expr::Call { function, args })
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn unexpected(expected: &'static str, spanned: Spanned<'_>) -> EvaluationError {
    EvaluationError::UnexpectedToken {
        expected,
        found: spanned.token.to_string(),
        offset: spanned.offset,
    }
}
