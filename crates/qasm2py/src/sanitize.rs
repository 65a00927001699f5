//! Gate-modifier stripping.
//!
//! `ctrl @`, `negctrl @`, `inv @` and `pow(k) @` prefixes are removed and the
//! bare gate invocation is kept. The modifier semantics are discarded, not
//! applied: `ctrl @ x a, b;` becomes `x a, b;`. This is a lossy
//! transformation and is logged as a warning.

use logos::Logos;
use tracing::warn;

use crate::lexer::Token;
use crate::preprocess::SourceStatement;

/// Remove any leading chain of gate modifiers from a statement.
///
/// Statements without modifiers are returned unchanged, so applying this
/// function twice gives the same result as applying it once.
pub fn strip_modifiers(statement: &str) -> &str {
    let mut rest = statement;
    while let Some(len) = modifier_prefix_len(rest) {
        rest = rest[len..].trim_start();
    }
    rest
}

/// Byte length of a single leading `<modifier> @` prefix, if present.
fn modifier_prefix_len(text: &str) -> Option<usize> {
    let mut lexer = Token::lexer(text);

    let takes_argument = match lexer.next()?.ok()? {
        Token::Identifier(name) => match name.as_str() {
            "ctrl" | "negctrl" | "pow" => true,
            "inv" => false,
            _ => return None,
        },
        _ => return None,
    };

    let mut token = lexer.next()?.ok()?;
    if token == Token::LParen {
        if !takes_argument {
            return None;
        }
        let mut depth = 1_usize;
        while depth > 0 {
            match lexer.next()?.ok()? {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                _ => {}
            }
        }
        token = lexer.next()?.ok()?;
    }

    (token == Token::At).then(|| lexer.span().end)
}

/// Strip modifiers from every statement, including gate-body statements.
///
/// Returns the sanitized statements and the number of statements that
/// had modifiers removed.
pub fn sanitize(statements: Vec<SourceStatement>) -> (Vec<SourceStatement>, usize) {
    let mut stripped = 0;
    let statements = sanitize_all(statements, &mut stripped);
    if stripped > 0 {
        warn!(
            stripped,
            "Gate modifiers (ctrl/negctrl/inv/pow) were dropped; the base gates are emitted unmodified"
        );
    }
    (statements, stripped)
}

fn sanitize_all(statements: Vec<SourceStatement>, stripped: &mut usize) -> Vec<SourceStatement> {
    statements
        .into_iter()
        .map(|statement| match statement {
            SourceStatement::Simple { text, line } => {
                let bare = strip_modifiers(&text);
                if bare.len() == text.len() {
                    SourceStatement::Simple { text, line }
                } else {
                    *stripped += 1;
                    SourceStatement::Simple {
                        text: bare.to_string(),
                        line,
                    }
                }
            }
            SourceStatement::Block { header, body, line } => SourceStatement::Block {
                header,
                body: sanitize_all(body, stripped),
                line,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ctrl() {
        assert_eq!(strip_modifiers("ctrl @ cx b, e"), "cx b, e");
        assert_eq!(strip_modifiers("ctrl(2) @ ccx a, b, c"), "ccx a, b, c");
        assert_eq!(strip_modifiers("negctrl @ x q[0], q[1]"), "x q[0], q[1]");
    }

    #[test]
    fn test_strip_inv_and_pow() {
        assert_eq!(strip_modifiers("inv @ x q[0]"), "x q[0]");
        assert_eq!(strip_modifiers("pow(3) @ rz(0.1) q[0]"), "rz(0.1) q[0]");
        assert_eq!(strip_modifiers("pow(-1) @ s q[0]"), "s q[0]");
    }

    #[test]
    fn test_strip_chain() {
        assert_eq!(
            strip_modifiers("inv @ ctrl(2) @ negctrl @ rx(pi/2) a, b, c, d"),
            "rx(pi/2) a, b, c, d"
        );
    }

    #[test]
    fn test_no_modifier_unchanged() {
        assert_eq!(strip_modifiers("cx q[0], q[1]"), "cx q[0], q[1]");
        assert_eq!(strip_modifiers("ctrlx q[0]"), "ctrlx q[0]");
        assert_eq!(strip_modifiers("inv(2) @ x q[0]"), "inv(2) @ x q[0]");
        assert_eq!(strip_modifiers("c[0] = measure q[0]"), "c[0] = measure q[0]");
    }

    #[test]
    fn test_idempotent() {
        for s in ["ctrl @ cx a, b", "inv @ pow(2) @ h q", "h q[0]", "ctrl(2) @ ccx a, b, c"] {
            let once = strip_modifiers(s);
            assert_eq!(strip_modifiers(once), once);
        }
    }

    #[test]
    fn test_sanitize_gate_body() {
        let statements = vec![
            SourceStatement::Block {
                header: "gate g a, b, c".into(),
                body: vec![
                    SourceStatement::Simple {
                        text: "ctrl @ cx a, b".into(),
                        line: 2,
                    },
                    SourceStatement::Simple {
                        text: "ctrl(2) @ ccx a, b, c".into(),
                        line: 3,
                    },
                ],
                line: 1,
            },
            SourceStatement::Simple {
                text: "g q[0], q[1], q[2]".into(),
                line: 5,
            },
        ];

        let (sanitized, stripped) = sanitize(statements);
        assert_eq!(stripped, 2);
        let SourceStatement::Block { body, .. } = &sanitized[0] else {
            panic!("expected block");
        };
        assert_eq!(
            body[1],
            SourceStatement::Simple {
                text: "ccx a, b, c".into(),
                line: 3,
            }
        );
    }
}
