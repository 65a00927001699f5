//! Parameter expression parsing.
//!
//! Binary operators are parsed by precedence climbing over the table in
//! [`binary_operator`]. Every operator listed there is folded by
//! [`Expression::as_f64`].

use super::Parser;
use crate::ast::{BinOp, Expression};
use crate::error::TranslateResult;
use crate::lexer::Token;

/// Binding strength and associativity of an infix operator.
struct Infix {
    op: BinOp,
    precedence: u8,
    right_assoc: bool,
}

/// `+ -` bind loosest, then `* / %`, then `**` (also written `^`).
fn binary_operator(token: &Token) -> Option<Infix> {
    let (op, precedence) = match token {
        Token::Plus => (BinOp::Add, 1),
        Token::Minus => (BinOp::Sub, 1),
        Token::Star => (BinOp::Mul, 2),
        Token::Slash => (BinOp::Div, 2),
        Token::Percent => (BinOp::Mod, 2),
        Token::Power | Token::Caret => (BinOp::Pow, 3),
        _ => return None,
    };
    Some(Infix {
        op,
        precedence,
        right_assoc: op == BinOp::Pow,
    })
}

impl Parser {
    pub(super) fn parse_expression(&mut self) -> TranslateResult<Expression> {
        self.parse_infix(1)
    }

    fn parse_infix(&mut self, min_precedence: u8) -> TranslateResult<Expression> {
        let mut left = self.parse_signed()?;

        while let Some(infix) = self.peek().and_then(binary_operator) {
            if infix.precedence < min_precedence {
                break;
            }
            self.advance();

            let next = if infix.right_assoc {
                infix.precedence
            } else {
                infix.precedence + 1
            };
            let right = self.parse_infix(next)?;
            left = Expression::BinOp {
                left: Box::new(left),
                op: infix.op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Leading `-`/`+` signs; `+` is dropped.
    fn parse_signed(&mut self) -> TranslateResult<Expression> {
        let mut negations = 0usize;
        loop {
            if self.consume(&Token::Minus) {
                negations += 1;
            } else if !self.consume(&Token::Plus) {
                break;
            }
        }

        let mut expr = self.parse_atom()?;
        for _ in 0..negations {
            expr = Expression::Neg(Box::new(expr));
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> TranslateResult<Expression> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error("expression"));
        };

        let expr = match token {
            // Literal text is kept for verbatim rendering.
            Token::IntLiteral(text) | Token::FloatLiteral(text) => Expression::Number(text),
            Token::Pi => Expression::Pi,
            Token::Tau => Expression::Tau,
            Token::Euler => Expression::Euler,
            Token::Identifier(name) => {
                self.advance();
                if !self.consume(&Token::LParen) {
                    return Ok(Expression::Identifier(name));
                }
                let args = self.parse_expression_list()?;
                self.expect(Token::RParen)?;
                return Ok(Expression::FnCall { name, args });
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(Token::RParen)?;
                return Ok(Expression::Paren(Box::new(inner)));
            }
            _ => return Err(self.error("expression")),
        };

        self.advance();
        Ok(expr)
    }

    /// Comma-separated arguments up to (not including) `)`; may be empty.
    pub(super) fn parse_expression_list(&mut self) -> TranslateResult<Vec<Expression>> {
        let mut exprs = Vec::new();
        if self.check(&Token::RParen) {
            return Ok(exprs);
        }
        loop {
            exprs.push(self.parse_expression()?);
            if !self.consume(&Token::Comma) {
                return Ok(exprs);
            }
        }
    }
}
