use crate::core::error::{Error, ErrorKind, Result};
use crate::query::ast::{BinOpKind, Node};
use crate::query::lexer::{tokenize, Token, TokenKind};

/// Recursive-descent parser for the Boolean query grammar, ported from
/// `expression_eval.py`'s `Parser`.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(expr: &str) -> Self {
        Parser {
            tokens: tokenize(expr),
            pos: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Node> {
        let node = self.expression()?;
        if self.current().kind != TokenKind::Eof {
            return Err(Error::new(
                ErrorKind::QueryParse,
                format!("unexpected trailing token '{}'", self.current().text),
            ));
        }
        Ok(node)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn ingest(&mut self, kind: TokenKind) -> Result<()> {
        if self.current().kind == kind {
            self.pos += 1;
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::QueryParse,
                format!("expected {:?}, found '{}'", kind, self.current().text),
            ))
        }
    }

    /// `expr : conj (OR conj)*`
    fn expression(&mut self) -> Result<Node> {
        let mut node = self.conjunction()?;
        while self.current().kind == TokenKind::Or {
            self.pos += 1;
            let rhs = self.conjunction()?;
            node = Node::BinOp(BinOpKind::Or, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    /// `conj : atom (AND atom)*`
    fn conjunction(&mut self) -> Result<Node> {
        let mut node = self.atom()?;
        while self.current().kind == TokenKind::And {
            self.pos += 1;
            let rhs = self.atom()?;
            node = Node::BinOp(BinOpKind::And, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    /// `atom : NOT atom | TERM | '(' expr ')'`
    fn atom(&mut self) -> Result<Node> {
        match self.current().kind {
            TokenKind::Not => {
                self.pos += 1;
                Ok(Node::Not(Box::new(self.atom()?)))
            }
            TokenKind::Term => {
                let text = self.current().text.clone();
                self.pos += 1;
                Ok(Node::Term(text))
            }
            TokenKind::LParen => {
                self.pos += 1;
                let node = self.expression()?;
                self.ingest(TokenKind::RParen)?;
                Ok(node)
            }
            _ => Err(Error::new(
                ErrorKind::QueryParse,
                format!("unexpected token '{}'", self.current().text),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_bare_term() {
        let node = Parser::new("cat").parse().unwrap();
        assert_eq!(node, Node::Term("cat".to_string()));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let node = Parser::new("a OR b AND c").parse().unwrap();
        assert_eq!(
            node,
            Node::BinOp(
                BinOpKind::Or,
                Box::new(Node::Term("a".to_string())),
                Box::new(Node::BinOp(
                    BinOpKind::And,
                    Box::new(Node::Term("b".to_string())),
                    Box::new(Node::Term("c".to_string())),
                )),
            )
        );
    }

    #[test]
    fn parens_override_precedence() {
        let node = Parser::new("(a OR b) AND c").parse().unwrap();
        assert_eq!(
            node,
            Node::BinOp(
                BinOpKind::And,
                Box::new(Node::BinOp(
                    BinOpKind::Or,
                    Box::new(Node::Term("a".to_string())),
                    Box::new(Node::Term("b".to_string())),
                )),
                Box::new(Node::Term("c".to_string())),
            )
        );
    }

    #[test]
    fn not_binds_to_the_next_atom_only() {
        let node = Parser::new("NOT a AND b").parse().unwrap();
        assert_eq!(
            node,
            Node::BinOp(
                BinOpKind::And,
                Box::new(Node::Not(Box::new(Node::Term("a".to_string())))),
                Box::new(Node::Term("b".to_string())),
            )
        );
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert!(Parser::new("(a OR b").parse().is_err());
        assert!(Parser::new("a OR b)").parse().is_err());
    }
}
