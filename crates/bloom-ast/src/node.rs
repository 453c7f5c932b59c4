//! Rule-block syntax tree.
//!
//! A closed set of node variants covering what a rule block can contain. The
//! front end that produces these trees is external; this module only fixes
//! their shape. Operators are plain calls: `a <= b` is a call of method `<=`
//! on receiver `a` with one argument `b`, and unary operators are calls with
//! a receiver and no arguments (`-@`, `+@`, `~`).

use serde::{Deserialize, Serialize};

/// One node of a rule-block syntax tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum AstNode {
    /// A method definition; the root of every rule block.
    Definition {
        name: String,
        #[serde(default)]
        params: Vec<String>,
        body: Vec<AstNode>,
    },
    /// The lexical scope wrapping a definition's body.
    Scope { body: Box<AstNode> },
    /// A flat statement sequence.
    Block { statements: Vec<AstNode> },
    /// A method call, operator application or bare collection reference.
    Call {
        #[serde(default)]
        receiver: Option<Box<AstNode>>,
        method: String,
        #[serde(default)]
        args: Vec<AstNode>,
    },
    /// A call with an attached code block, e.g. `edge.map { |e| e }`.
    Iter {
        call: Box<AstNode>,
        #[serde(default)]
        params: Vec<String>,
        body: Vec<AstNode>,
    },
    /// Local assignment `name = value`.
    Assign { name: String, value: Box<AstNode> },
    /// A local variable or block parameter.
    Ident { name: String },
    /// A literal, kept as its source text.
    Literal { text: String },
    Array { items: Vec<AstNode> },
    /// A construct the front end could not classify.
    Opaque { tag: String },
}

impl AstNode {
    // ── Constructors ─────────────────────────────────────────────────

    /// A bare reference such as `pipe`.
    pub fn collection(name: impl Into<String>) -> Self {
        Self::Call {
            receiver: None,
            method: name.into(),
            args: Vec::new(),
        }
    }

    pub fn call(receiver: Option<AstNode>, method: impl Into<String>, args: Vec<AstNode>) -> Self {
        Self::Call {
            receiver: receiver.map(Box::new),
            method: method.into(),
            args,
        }
    }

    /// `receiver.method` with no arguments.
    pub fn method(receiver: AstNode, method: impl Into<String>) -> Self {
        Self::call(Some(receiver), method, Vec::new())
    }

    /// A unary operator such as `-@` applied to `operand`.
    pub fn unary(method: impl Into<String>, operand: AstNode) -> Self {
        Self::call(Some(operand), method, Vec::new())
    }

    /// A binary operator statement `lhs op rhs`.
    pub fn binary(lhs: AstNode, op: impl Into<String>, rhs: AstNode) -> Self {
        Self::call(Some(lhs), op, vec![rhs])
    }

    /// `target <= body`.
    pub fn deductive(target: impl Into<String>, body: AstNode) -> Self {
        Self::binary(Self::collection(target), "<=", body)
    }

    /// `target <X body`, encoded the way the front end tokenizes it: binary
    /// `<` whose operand is the unary `tail` applied to `body`.
    pub fn superator(target: impl Into<String>, tail: impl Into<String>, body: AstNode) -> Self {
        Self::binary(Self::collection(target), "<", Self::unary(tail, body))
    }

    pub fn iter(call: AstNode, params: &[&str], body: Vec<AstNode>) -> Self {
        Self::Iter {
            call: Box::new(call),
            params: params.iter().map(|p| p.to_string()).collect(),
            body,
        }
    }

    pub fn assign(name: impl Into<String>, value: AstNode) -> Self {
        Self::Assign {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident { name: name.into() }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal { text: text.into() }
    }

    pub fn array(items: Vec<AstNode>) -> Self {
        Self::Array { items }
    }

    /// A well-formed rule block: definition → scope → block → statements.
    pub fn rule_block(name: impl Into<String>, statements: Vec<AstNode>) -> Self {
        Self::Definition {
            name: name.into(),
            params: Vec::new(),
            body: vec![Self::Scope {
                body: Box::new(Self::Block { statements }),
            }],
        }
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Short tag naming the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Definition { .. } => "definition",
            Self::Scope { .. } => "scope",
            Self::Block { .. } => "block",
            Self::Call { .. } => "call",
            Self::Iter { .. } => "iter",
            Self::Assign { .. } => "assign",
            Self::Ident { .. } => "ident",
            Self::Literal { .. } => "literal",
            Self::Array { .. } => "array",
            Self::Opaque { .. } => "opaque",
        }
    }

    /// The name this node refers to if it is a bare, argument-less,
    /// receiver-less call.
    pub fn as_bare_name(&self) -> Option<&str> {
        match self {
            Self::Call {
                receiver: None,
                method,
                args,
            } if args.is_empty() => Some(method.as_str()),
            _ => None,
        }
    }

    /// Direct children, in source order.
    pub fn children(&self) -> Vec<&AstNode> {
        match self {
            Self::Definition { body, .. } => body.iter().collect(),
            Self::Scope { body } => vec![body.as_ref()],
            Self::Block { statements } => statements.iter().collect(),
            Self::Call { receiver, args, .. } => {
                receiver.iter().map(|r| r.as_ref()).chain(args.iter()).collect()
            }
            Self::Iter { call, body, .. } => {
                std::iter::once(call.as_ref()).chain(body.iter()).collect()
            }
            Self::Assign { value, .. } => vec![value.as_ref()],
            Self::Array { items } => items.iter().collect(),
            Self::Ident { .. } | Self::Literal { .. } | Self::Opaque { .. } => Vec::new(),
        }
    }
}
