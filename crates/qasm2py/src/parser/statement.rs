//! Statement parsing.

use super::Parser;
use crate::ast::{GateCall, GateDef, Operand, StatementKind};
use crate::error::{TranslateError, TranslateResult};
use crate::lexer::Token;
use crate::preprocess::{QasmVersion, SourceStatement};

impl Parser {
    /// Parse a `;`-terminated statement.
    pub(super) fn parse_statement(&mut self) -> TranslateResult<StatementKind> {
        let token = self.peek().cloned().ok_or_else(|| self.error("statement"))?;

        let kind = match token {
            Token::Qubit | Token::Bit if self.version == QasmVersion::V2 => {
                return Err(self.error("qreg or creg declaration"));
            }
            Token::Qubit => self.parse_qasm3_decl(true)?,
            Token::Bit => self.parse_qasm3_decl(false)?,
            Token::Qreg => self.parse_qasm2_decl(true)?,
            Token::Creg => self.parse_qasm2_decl(false)?,
            Token::Measure => self.parse_measure()?,
            Token::Reset => self.parse_reset()?,
            Token::Barrier => self.parse_barrier()?,
            Token::Identifier(_) => self.parse_identifier_statement()?,
            Token::Gate => return Err(self.error("gate definition with a '{ ... }' body")),
            Token::Opaque => return Err(self.unsupported("opaque gate declaration")),
            Token::If | Token::Else | Token::For | Token::While | Token::Def => {
                return Err(self.unsupported(format!("'{token}' control flow")));
            }
            Token::Int
            | Token::Uint
            | Token::Float
            | Token::Angle
            | Token::Bool
            | Token::Const
            | Token::Let
            | Token::Input
            | Token::Output => {
                return Err(self.unsupported(format!("classical '{token}' declaration")));
            }
            Token::Delay => return Err(self.unsupported("delay")),
            _ => return Err(self.error("statement")),
        };

        self.expect_end()?;
        Ok(kind)
    }

    /// Parse a `<header> { <body> }` block. Only gate definitions are accepted.
    pub(super) fn parse_block(&mut self, body: &[SourceStatement]) -> TranslateResult<StatementKind> {
        match self.peek().cloned() {
            Some(Token::Gate) => self.parse_gate_def(body),
            Some(token) => Err(self.unsupported(format!("'{token}' block"))),
            None => Err(self.unsupported("nested scope")),
        }
    }

    /// `qubit[n] name` / `qubit name` / `bit[n] name` / `bit name`
    fn parse_qasm3_decl(&mut self, quantum: bool) -> TranslateResult<StatementKind> {
        self.advance();

        let size = if self.check(&Token::LBracket) {
            self.parse_size()?
        } else {
            1
        };
        let name = self.parse_identifier()?;

        Ok(declaration(quantum, name, size))
    }

    /// `qreg name[n]` / `creg name[n]`
    fn parse_qasm2_decl(&mut self, quantum: bool) -> TranslateResult<StatementKind> {
        self.advance();

        let name = self.parse_identifier()?;
        let size = if self.check(&Token::LBracket) {
            self.parse_size()?
        } else {
            1
        };

        Ok(declaration(quantum, name, size))
    }

    /// `measure q[j] -> c[i]`
    fn parse_measure(&mut self) -> TranslateResult<StatementKind> {
        self.expect(Token::Measure)?;
        let qubits = self.parse_operands()?;
        self.expect(Token::Arrow)?;
        let bits = self.parse_operands()?;
        Ok(StatementKind::Measure { qubits, bits })
    }

    fn parse_reset(&mut self) -> TranslateResult<StatementKind> {
        self.expect(Token::Reset)?;
        let qubits = self.parse_operands()?;
        Ok(StatementKind::Reset { qubits })
    }

    fn parse_barrier(&mut self) -> TranslateResult<StatementKind> {
        self.expect(Token::Barrier)?;
        let qubits = if self.is_eof() {
            vec![]
        } else {
            self.parse_operands()?
        };
        Ok(StatementKind::Barrier { qubits })
    }

    /// `gate name(params) a, b { ... }`
    fn parse_gate_def(&mut self, body: &[SourceStatement]) -> TranslateResult<StatementKind> {
        self.expect(Token::Gate)?;
        let name = self.parse_identifier()?;

        let params = if self.consume(&Token::LParen) {
            let p = if self.check(&Token::RParen) {
                vec![]
            } else {
                self.parse_identifier_list()?
            };
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        let qubits = self.parse_identifier_list()?;
        self.expect_end()?;

        let body = body
            .iter()
            .map(|statement| self.parse_gate_body_statement(statement))
            .collect::<TranslateResult<Vec<_>>>()?;

        Ok(StatementKind::GateDef(GateDef {
            name,
            params,
            qubits,
            body,
        }))
    }

    /// Gate bodies hold gate calls on bare formals only.
    fn parse_gate_body_statement(&self, statement: &SourceStatement) -> TranslateResult<GateCall> {
        let (text, line) = match statement {
            SourceStatement::Simple { text, line } => (text, *line),
            SourceStatement::Block { line, .. } => {
                return Err(TranslateError::Unsupported {
                    line: *line,
                    construct: "nested block in gate body".into(),
                });
            }
        };

        let mut parser = Parser::new(text, line, self.version)?;
        match parser.parse_statement()? {
            StatementKind::Gate(call) if call.qubits.iter().all(|q| q.index.is_none()) => Ok(call),
            _ => Err(TranslateError::Syntax {
                line,
                expected: "gate call on formal qubits".into(),
                found: text.clone(),
            }),
        }
    }

    /// Statement starting with an identifier: a gate call or `c = measure q`.
    fn parse_identifier_statement(&mut self) -> TranslateResult<StatementKind> {
        let name = self.parse_identifier()?;

        if self.check(&Token::Eq) || self.check(&Token::LBracket) {
            return self.parse_assignment(name);
        }

        self.parse_gate_call(name)
    }

    /// `c[i] = measure q[j]` or `c = measure q`
    fn parse_assignment(&mut self, target: String) -> TranslateResult<StatementKind> {
        let index = if self.consume(&Token::LBracket) {
            let idx = self.parse_int_literal()?;
            self.expect(Token::RBracket)?;
            Some(idx)
        } else {
            None
        };

        self.expect(Token::Eq)?;

        if !self.consume(&Token::Measure) {
            return Err(self.unsupported("classical assignment"));
        }

        let qubits = self.parse_operands()?;
        Ok(StatementKind::Measure {
            qubits,
            bits: vec![Operand {
                register: target,
                index,
            }],
        })
    }

    /// `name(params) q[0], q[1]`
    fn parse_gate_call(&mut self, name: String) -> TranslateResult<StatementKind> {
        let params = if self.consume(&Token::LParen) {
            let p = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        let qubits = self.parse_operands()?;

        Ok(StatementKind::Gate(GateCall {
            name,
            params,
            qubits,
            line: self.line,
        }))
    }

    /// Parse a comma-separated operand list.
    fn parse_operands(&mut self) -> TranslateResult<Vec<Operand>> {
        let mut refs = vec![self.parse_operand()?];
        while self.consume(&Token::Comma) {
            refs.push(self.parse_operand()?);
        }
        Ok(refs)
    }

    /// Parse `q` or `q[i]`.
    fn parse_operand(&mut self) -> TranslateResult<Operand> {
        let register = self.parse_identifier()?;

        if self.consume(&Token::LBracket) {
            let index = self.parse_int_literal()?;
            if self.check(&Token::Colon) || self.check(&Token::Comma) {
                return Err(self.unsupported("register slice or index set"));
            }
            self.expect(Token::RBracket)?;
            Ok(Operand::single(register, index))
        } else {
            Ok(Operand::register(register))
        }
    }
}

fn declaration(quantum: bool, name: String, size: u32) -> StatementKind {
    if quantum {
        StatementKind::QubitDecl { name, size }
    } else {
        StatementKind::BitDecl { name, size }
    }
}
