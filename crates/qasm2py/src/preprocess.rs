//! Source preprocessing: comment removal, whitespace normalization and
//! statement splitting.
//!
//! The preprocessor works on raw text and knows nothing about gates or
//! registers. It produces one [`SourceStatement`] per `;`-terminated
//! statement, keeping `{ ... }` blocks together with their header and
//! splitting the block body into sub-statements.

use logos::Logos;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TranslateError, TranslateResult};

/// `OpenQASM` language version of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QasmVersion {
    /// `OPENQASM 2.x;`
    V2,
    /// `OPENQASM 3.x;` (also assumed when the header is missing).
    V3,
}

impl std::fmt::Display for QasmVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QasmVersion::V2 => write!(f, "2"),
            QasmVersion::V3 => write!(f, "3"),
        }
    }
}

/// One statement of normalized source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceStatement {
    /// A `;`-terminated statement, without the terminator.
    Simple { text: String, line: usize },
    /// A `<header> { <body> }` block.
    Block {
        header: String,
        body: Vec<SourceStatement>,
        line: usize,
    },
}

impl SourceStatement {
    /// Line on which the statement starts (1-based).
    pub fn line(&self) -> usize {
        match self {
            SourceStatement::Simple { line, .. } | SourceStatement::Block { line, .. } => *line,
        }
    }
}

/// Output of [`preprocess`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preprocessed {
    pub version: QasmVersion,
    pub statements: Vec<SourceStatement>,
}

/// Raw chunks of QASM text.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Chunk {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    BlockComment,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r#""[^"]*""#)]
    Str,

    #[token(";")]
    Semicolon,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("/")]
    Slash,

    #[regex(r#"[^ \t\r\n\f;{}"/]+"#)]
    Text,
}

/// Maps byte offsets to 1-based line numbers.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

/// Statement text being accumulated, with whitespace collapsed.
#[derive(Default)]
struct PendingText {
    text: String,
    line: Option<usize>,
    space: bool,
}

impl PendingText {
    fn push(&mut self, fragment: &str, line: usize) {
        if self.line.is_none() {
            self.line = Some(line);
        } else if self.space {
            self.text.push(' ');
        }
        self.space = false;
        self.text.push_str(fragment);
    }

    fn space(&mut self) {
        self.space = true;
    }

    fn take(&mut self) -> Option<(String, usize)> {
        let line = self.line.take()?;
        self.space = false;
        Some((std::mem::take(&mut self.text), line))
    }
}

struct Splitter<'a> {
    source: &'a str,
    lexer: logos::Lexer<'a, Chunk>,
    lines: LineIndex,
}

impl<'a> Splitter<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            lexer: Chunk::lexer(source),
            lines: LineIndex::new(source),
        }
    }

    /// Split statements until the end of input (`open == None`) or the `}`
    /// closing the block opened on line `open`.
    fn split(&mut self, open: Option<usize>) -> TranslateResult<Vec<SourceStatement>> {
        let mut statements = Vec::new();
        let mut pending = PendingText::default();

        while let Some(result) = self.lexer.next() {
            let span = self.lexer.span();
            let line = self.lines.line_of(span.start);
            let chunk = result.map_err(|()| TranslateError::MalformedSource {
                line,
                message: format!("unterminated literal '{}'", &self.source[span.clone()]),
            })?;

            match chunk {
                Chunk::LineComment | Chunk::BlockComment | Chunk::Whitespace => pending.space(),
                Chunk::Str | Chunk::Slash | Chunk::Text => {
                    pending.push(&self.source[span], line);
                }
                Chunk::Semicolon => {
                    // Empty statements (`;;`, `};`) are dropped.
                    if let Some((text, line)) = pending.take() {
                        statements.push(SourceStatement::Simple { text, line });
                    }
                }
                Chunk::LBrace => {
                    let (header, line) = pending.take().unwrap_or((String::new(), line));
                    let body = self.split(Some(line))?;
                    statements.push(SourceStatement::Block { header, body, line });
                }
                Chunk::RBrace => {
                    if open.is_none() {
                        return Err(TranslateError::MalformedSource {
                            line,
                            message: "unmatched '}'".into(),
                        });
                    }
                    if let Some((text, line)) = pending.take() {
                        return Err(TranslateError::MalformedSource {
                            line,
                            message: format!("missing ';' after '{text}'"),
                        });
                    }
                    return Ok(statements);
                }
            }
        }

        if let Some(line) = open {
            return Err(TranslateError::MalformedSource {
                line,
                message: "unclosed '{'".into(),
            });
        }
        if let Some((text, line)) = pending.take() {
            return Err(TranslateError::MalformedSource {
                line,
                message: format!("missing ';' after '{text}'"),
            });
        }
        Ok(statements)
    }
}

/// Split QASM source into normalized statements.
///
/// Comments and `include` statements are removed and the `OPENQASM`
/// header is consumed to determine the version.
pub fn preprocess(source: &str) -> TranslateResult<Preprocessed> {
    let raw = Splitter::new(source).split(None)?;

    let mut version = None;
    let mut statements = Vec::with_capacity(raw.len());

    for (position, statement) in raw.into_iter().enumerate() {
        if let SourceStatement::Simple { text, line } = &statement {
            if let Some(rest) = strip_keyword(text, "OPENQASM") {
                if position != 0 {
                    return Err(TranslateError::Syntax {
                        line: *line,
                        expected: "OPENQASM header as the first statement".into(),
                        found: text.clone(),
                    });
                }
                version = Some(parse_version(rest)?);
                continue;
            }
            if strip_keyword(text, "include").is_some() {
                continue;
            }
        }
        statements.push(statement);
    }

    let version = version.unwrap_or(QasmVersion::V3);
    debug!(%version, statements = statements.len(), "Preprocessed source");

    Ok(Preprocessed {
        version,
        statements,
    })
}

/// Strip a leading keyword, requiring a word boundary after it.
fn strip_keyword<'t>(text: &'t str, keyword: &str) -> Option<&'t str> {
    let rest = text.strip_prefix(keyword)?;
    match rest.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => None,
        _ => Some(rest.trim_start()),
    }
}

fn parse_version(text: &str) -> TranslateResult<QasmVersion> {
    let major = text.split('.').next().unwrap_or_default();
    let minor_ok = text
        .split_once('.')
        .is_none_or(|(_, minor)| !minor.is_empty() && minor.chars().all(|c| c.is_ascii_digit()));

    match major {
        "2" if minor_ok => Ok(QasmVersion::V2),
        "3" if minor_ok => Ok(QasmVersion::V3),
        _ => Err(TranslateError::InvalidVersion(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(text: &str, line: usize) -> SourceStatement {
        SourceStatement::Simple {
            text: text.into(),
            line,
        }
    }

    #[test]
    fn test_split_statements() {
        let pre = preprocess("OPENQASM 3; qubit[2] q; h q[0]; cx q[0], q[1];").unwrap();
        assert_eq!(pre.version, QasmVersion::V3);
        assert_eq!(
            pre.statements,
            vec![
                simple("qubit[2] q", 1),
                simple("h q[0]", 1),
                simple("cx q[0], q[1]", 1),
            ]
        );
    }

    #[test]
    fn test_comments_and_includes_removed() {
        let source = r#"OPENQASM 2.0;
include "qelib1.inc";
// a comment
qreg q[1]; /* block
comment */ h   q[0];
"#;
        let pre = preprocess(source).unwrap();
        assert_eq!(pre.version, QasmVersion::V2);
        assert_eq!(pre.statements, vec![simple("qreg q[1]", 4), simple("h q[0]", 5)]);
    }

    #[test]
    fn test_whitespace_normalized() {
        let pre = preprocess("OPENQASM 3;\ncx\tq[0],\n    q[1];").unwrap();
        assert_eq!(pre.statements, vec![simple("cx q[0], q[1]", 2)]);
    }

    #[test]
    fn test_gate_block_split() {
        let source = "OPENQASM 3;\ngate bell a, b {\n  h a;\n  cx a, b;\n}\n";
        let pre = preprocess(source).unwrap();
        assert_eq!(
            pre.statements,
            vec![SourceStatement::Block {
                header: "gate bell a, b".into(),
                body: vec![simple("h a", 3), simple("cx a, b", 4)],
                line: 2,
            }]
        );
    }

    #[test]
    fn test_missing_header_defaults_to_v3() {
        let pre = preprocess("qubit q; x q;").unwrap();
        assert_eq!(pre.version, QasmVersion::V3);
        assert_eq!(pre.statements.len(), 2);
    }

    #[test]
    fn test_unclosed_brace() {
        let err = preprocess("OPENQASM 3;\ngate g a {\n h a;\n").unwrap_err();
        assert!(matches!(err, TranslateError::MalformedSource { line: 2, .. }));
    }

    #[test]
    fn test_unmatched_closing_brace() {
        let err = preprocess("OPENQASM 3; h q[0]; }").unwrap_err();
        assert!(matches!(err, TranslateError::MalformedSource { .. }));
    }

    #[test]
    fn test_missing_terminator() {
        let err = preprocess("OPENQASM 3; qubit q; h q").unwrap_err();
        assert!(matches!(err, TranslateError::MalformedSource { .. }));

        let err = preprocess("OPENQASM 3; gate g a { h a }").unwrap_err();
        assert!(matches!(err, TranslateError::MalformedSource { .. }));
    }

    #[test]
    fn test_invalid_version() {
        let err = preprocess("OPENQASM 4.0; qubit q;").unwrap_err();
        assert_eq!(err, TranslateError::InvalidVersion("4.0".into()));
    }

    #[test]
    fn test_header_not_first() {
        let err = preprocess("qubit q; OPENQASM 3;").unwrap_err();
        assert!(matches!(err, TranslateError::Syntax { .. }));
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(5), 3);
        assert_eq!(index.line_of(6), 4);
    }
}
