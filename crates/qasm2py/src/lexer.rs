//! Token lexer for single QASM statements.

use logos::Logos;

/// Tokens for `OpenQASM` 2 and 3 statements.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    // Keywords
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qubit")]
    Qubit,

    #[token("bit")]
    Bit,

    #[token("qreg")]
    Qreg,

    #[token("creg")]
    Creg,

    #[token("gate")]
    Gate,

    #[token("opaque")]
    Opaque,

    #[token("def")]
    Def,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("for")]
    For,

    #[token("while")]
    While,

    #[token("measure")]
    Measure,

    #[token("reset")]
    Reset,

    #[token("barrier")]
    Barrier,

    #[token("delay")]
    Delay,

    #[token("int")]
    Int,

    #[token("uint")]
    Uint,

    #[token("float")]
    Float,

    #[token("angle")]
    Angle,

    #[token("bool")]
    Bool,

    #[token("const")]
    Const,

    #[token("let")]
    Let,

    #[token("input")]
    Input,

    #[token("output")]
    Output,

    // Constants
    #[token("pi")]
    #[token("π")]
    Pi,

    #[token("tau")]
    #[token("τ")]
    Tau,

    #[token("euler")]
    #[token("ℇ")]
    Euler,

    // Literals keep their source text so angles can be emitted unmodified.
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().to_string())]
    FloatLiteral(String),

    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    IntLiteral(String),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    StringLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators and punctuation
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("**")]
    Power,

    #[token("^")]
    Caret,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    LtEq,

    #[token(">")]
    Gt,

    #[token(">=")]
    GtEq,

    #[token("=")]
    Eq,

    #[token("->")]
    Arrow,

    #[token("@")]
    At,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenQasm => write!(f, "OPENQASM"),
            Token::Include => write!(f, "include"),
            Token::Qubit => write!(f, "qubit"),
            Token::Bit => write!(f, "bit"),
            Token::Qreg => write!(f, "qreg"),
            Token::Creg => write!(f, "creg"),
            Token::Gate => write!(f, "gate"),
            Token::Opaque => write!(f, "opaque"),
            Token::Def => write!(f, "def"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::For => write!(f, "for"),
            Token::While => write!(f, "while"),
            Token::Measure => write!(f, "measure"),
            Token::Reset => write!(f, "reset"),
            Token::Barrier => write!(f, "barrier"),
            Token::Delay => write!(f, "delay"),
            Token::Int => write!(f, "int"),
            Token::Uint => write!(f, "uint"),
            Token::Float => write!(f, "float"),
            Token::Angle => write!(f, "angle"),
            Token::Bool => write!(f, "bool"),
            Token::Const => write!(f, "const"),
            Token::Let => write!(f, "let"),
            Token::Input => write!(f, "input"),
            Token::Output => write!(f, "output"),
            Token::Pi => write!(f, "pi"),
            Token::Tau => write!(f, "tau"),
            Token::Euler => write!(f, "euler"),
            Token::FloatLiteral(s) | Token::IntLiteral(s) | Token::Identifier(s) => {
                write!(f, "{s}")
            }
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Power => write!(f, "**"),
            Token::Caret => write!(f, "^"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::LtEq => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::GtEq => write!(f, ">="),
            Token::Eq => write!(f, "="),
            Token::Arrow => write!(f, "->"),
            Token::At => write!(f, "@"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A token with its span information.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: std::ops::Range<usize>,
}

/// Tokenize a single statement.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, (std::ops::Range<usize>, String)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        if let Ok(token) = result {
            tokens.push(Ok(SpannedToken { token, span }));
        } else {
            let slice = &source[span.clone()];
            tokens.push(Err((span, format!("Invalid token: '{slice}'"))));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        tokenize(source)
            .into_iter()
            .filter_map(Result::ok)
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_version_header() {
        let tokens = lex("OPENQASM 3.0;");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::OpenQasm);
        assert_eq!(tokens[1], Token::FloatLiteral("3.0".into()));
        assert_eq!(tokens[2], Token::Semicolon);
    }

    #[test]
    fn test_qasm2_declaration() {
        let tokens = lex("qreg q[2]");
        assert_eq!(tokens[0], Token::Qreg);
        assert_eq!(tokens[1], Token::Identifier("q".into()));
        assert_eq!(tokens[2], Token::LBracket);
        assert_eq!(tokens[3], Token::IntLiteral("2".into()));
        assert_eq!(tokens[4], Token::RBracket);
    }

    #[test]
    fn test_literal_text_is_preserved() {
        let tokens = lex("rx(1.5707) q[0]");
        assert_eq!(tokens[2], Token::FloatLiteral("1.5707".into()));

        let tokens = lex("rz(.25e-1) q[0]");
        assert_eq!(tokens[2], Token::FloatLiteral(".25e-1".into()));
    }

    #[test]
    fn test_modifier_tokens() {
        let tokens = lex("ctrl(2) @ ccx a, b, c");
        assert_eq!(tokens[0], Token::Identifier("ctrl".into()));
        assert_eq!(tokens[1], Token::LParen);
        assert_eq!(tokens[3], Token::RParen);
        assert_eq!(tokens[4], Token::At);
        assert_eq!(tokens[5], Token::Identifier("ccx".into()));
    }

    #[test]
    fn test_measure_arrow() {
        let tokens = lex("measure q[0] -> c[0]");
        assert_eq!(tokens[0], Token::Measure);
        assert_eq!(tokens[5], Token::Arrow);
    }

    #[test]
    fn test_invalid_character() {
        let results = tokenize("h q[0] $");
        assert!(results.iter().any(Result::is_err));
    }
}
