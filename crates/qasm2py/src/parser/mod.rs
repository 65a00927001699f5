//! Parser for preprocessed QASM statements.

mod expression;
mod statement;

use tracing::debug;

use crate::ast::{Program, Statement};
use crate::error::{TranslateError, TranslateResult};
use crate::lexer::{SpannedToken, Token, tokenize};
use crate::preprocess::{QasmVersion, SourceStatement};

/// Parse preprocessed (and sanitized) statements into a [`Program`].
pub fn parse_program(
    version: QasmVersion,
    statements: &[SourceStatement],
) -> TranslateResult<Program> {
    let statements = statements
        .iter()
        .map(|statement| parse_source_statement(version, statement))
        .collect::<TranslateResult<Vec<_>>>()?;

    debug!(statements = statements.len(), "Parsed program");
    Ok(Program {
        version,
        statements,
    })
}

/// Parse a single statement into its syntax tree form.
pub fn parse_source_statement(
    version: QasmVersion,
    statement: &SourceStatement,
) -> TranslateResult<Statement> {
    let kind = match statement {
        SourceStatement::Simple { text, line } => {
            Parser::new(text, *line, version)?.parse_statement()?
        }
        SourceStatement::Block { header, body, line } => {
            Parser::new(header, *line, version)?.parse_block(body)?
        }
    };
    Ok(Statement {
        line: statement.line(),
        kind,
    })
}

/// Parser state for one statement.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    pub(super) line: usize,
    pub(super) version: QasmVersion,
}

impl Parser {
    /// Create a new parser over the text of one statement.
    fn new(text: &str, line: usize, version: QasmVersion) -> TranslateResult<Self> {
        let mut tokens = Vec::new();

        for result in tokenize(text) {
            match result {
                Ok(t) => tokens.push(t),
                Err((_, message)) => return Err(TranslateError::LexerError { line, message }),
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            line,
            version,
        })
    }

    /// Check if we've reached the end of the statement.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Build a syntax error for the current position.
    pub(super) fn error(&self, expected: &str) -> TranslateError {
        TranslateError::Syntax {
            line: self.line,
            expected: expected.into(),
            found: self
                .peek()
                .map_or_else(|| "end of statement".into(), ToString::to_string),
        }
    }

    /// Build an unsupported-construct error.
    pub(super) fn unsupported(&self, construct: impl Into<String>) -> TranslateError {
        TranslateError::Unsupported {
            line: self.line,
            construct: construct.into(),
        }
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> TranslateResult<()> {
        if self.check(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("'{expected}'")))
        }
    }

    /// Expect the statement to be fully consumed.
    pub(super) fn expect_end(&self) -> TranslateResult<()> {
        if self.is_eof() {
            Ok(())
        } else {
            Err(self.error("end of statement"))
        }
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Parse identifier list.
    pub(super) fn parse_identifier_list(&mut self) -> TranslateResult<Vec<String>> {
        let mut ids = vec![self.parse_identifier()?];
        while self.consume(&Token::Comma) {
            ids.push(self.parse_identifier()?);
        }
        Ok(ids)
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> TranslateResult<String> {
        match self.peek() {
            Some(Token::Identifier(s)) => {
                let s = s.clone();
                self.pos += 1;
                Ok(s)
            }
            _ => Err(self.error("identifier")),
        }
    }

    /// Parse a non-negative integer literal.
    pub(super) fn parse_int_literal(&mut self) -> TranslateResult<u32> {
        match self.peek() {
            Some(Token::IntLiteral(s)) => {
                let value = s.parse().map_err(|_| self.error("integer below 2^32"))?;
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.error("integer")),
        }
    }

    /// Parse a `[n]` register size; zero-sized registers are rejected.
    pub(super) fn parse_size(&mut self) -> TranslateResult<u32> {
        self.expect(Token::LBracket)?;
        let size = self.parse_int_literal()?;
        if size == 0 {
            return Err(TranslateError::Syntax {
                line: self.line,
                expected: "positive register size".into(),
                found: "0".into(),
            });
        }
        self.expect(Token::RBracket)?;
        Ok(size)
    }
}
