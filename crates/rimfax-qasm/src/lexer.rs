//! Lexer for the OpenQASM 3 subset.

use logos::Logos;

/// Tokens for the OpenQASM 3 subset.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
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

    #[token("measure")]
    Measure,

    #[token("reset")]
    Reset,

    #[token("barrier")]
    Barrier,

    // Constants
    #[token("pi")]
    Pi,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLit(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLit(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    StringLit(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Punctuation
    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("=")]
    Equals,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,
}

/// Tokenize a source string, reporting the byte offset of any bad character.
pub fn tokenize(source: &str) -> Result<Vec<(Token, std::ops::Range<usize>)>, usize> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(lexer.span().start),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_gate_statement() {
        let tokens = tokenize("rx(pi/2) q[0];").unwrap();
        let kinds: Vec<_> = tokens.into_iter().map(|(t, _)| t).collect();
        assert_eq!(kinds[0], Token::Identifier("rx".into()));
        assert_eq!(kinds[1], Token::LParen);
        assert_eq!(kinds[2], Token::Pi);
        assert_eq!(kinds[3], Token::Slash);
        assert_eq!(kinds[4], Token::IntLit(2));
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = tokenize("// line comment\n/* block */ h q;").unwrap();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_bad_character() {
        assert_eq!(tokenize("h q[0]; @").unwrap_err(), 8);
    }
}
