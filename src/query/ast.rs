#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    And,
    Or,
}

/// Grammar: `expr : conj (OR conj)*`, `conj : atom (AND
/// atom)*`, `atom : NOT atom | TERM | '(' expr ')'`. Mirrors
/// `expression_eval.py`'s `BinOp`/`Term`/`UnaryOp` parse-tree nodes as one
/// enum rather than three classes plus an `isinstance` dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    BinOp(BinOpKind, Box<Node>, Box<Node>),
    Not(Box<Node>),
    Term(String),
}
