use crate::analysis::tokenizer::word_tokenize;

/// The Boolean query lexer. Splits on whitespace, treating `(`/`)` as
/// their own tokens regardless of surrounding whitespace, and classifies
/// the literal keywords `AND`/`OR`/`NOT` (case-sensitive, as
/// `expression_eval.py`'s `lexer` compares against the exact `TokenType`
/// values). Everything else is a whitespace-delimited chunk that is then
/// run back through [`word_tokenize`], the same word tokenizer the
/// corpus stream uses, so a term with internal punctuation (`U.S.`)
/// splits exactly the way it would have at index time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Term,
    And,
    Or,
    Not,
    LParen,
    RParen,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

pub fn tokenize(expr: &str) -> Vec<Token> {
    let mut raw = Vec::new();
    let mut buf = String::new();

    for c in expr.chars() {
        if c == '(' || c == ')' {
            if !buf.is_empty() {
                raw.push(std::mem::take(&mut buf));
            }
            raw.push(c.to_string());
        } else if c.is_whitespace() {
            if !buf.is_empty() {
                raw.push(std::mem::take(&mut buf));
            }
        } else {
            buf.push(c);
        }
    }
    if !buf.is_empty() {
        raw.push(buf);
    }

    let mut tokens = Vec::new();
    for text in raw {
        let kind = match text.as_str() {
            "AND" => Some(TokenKind::And),
            "OR" => Some(TokenKind::Or),
            "NOT" => Some(TokenKind::Not),
            "(" => Some(TokenKind::LParen),
            ")" => Some(TokenKind::RParen),
            _ => None,
        };
        match kind {
            Some(kind) => tokens.push(Token { kind, text }),
            None => {
                for word in word_tokenize(&text) {
                    tokens.push(Token { kind: TokenKind::Term, text: word });
                }
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: "##EOF##".to_string(),
    });
    tokens
}
