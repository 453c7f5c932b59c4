//! Rule-block grammar validation.
//!
//! A rule block must be a definition wrapping one scope whose body is a
//! flat statement sequence. Every statement has the form `lhs <op> rhs`:
//!
//! - `lhs` is a bare reference to a declared collection;
//! - `op` is `<=` (deductive) or `<` (any superator);
//! - for `<`, the single right operand is a unary call whose method is a
//!   superator tail (`~`, `-@`, `+@`) and whose only operand is the rule
//!   body.
//!
//! Checks run top to bottom and stop at the first failure. Doubled tails
//! such as `<--` arrive as a unary call nested inside the body and are not
//! detected here.

use bloom_ast::AstNode;
use bloom_types::{Catalog, Operator, Superator};

// ── Violations ───────────────────────────────────────────────────────

/// Why a rule block was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// Root is not a definition wrapping exactly one scope.
    NotRuleBlock,
    /// Scope body is not a flat statement sequence.
    MalformedBody,
    /// Statement is not a binary call `lhs <op> rhs`.
    MalformedStatement,
    /// A plain `=` assignment where a rule operator was meant.
    IllegalAssignment,
    /// The target collection was never declared.
    UnknownCollection(String),
    /// The statement operator is not one of `<=`, `<` or `=`.
    IllegalOperator(String),
    /// The right operand of `<` is not a well-formed superator tail.
    MalformedSuperator,
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRuleBlock => write!(f, "not a rule block"),
            Self::MalformedBody => write!(f, "Parse error: body is not a statement sequence"),
            Self::MalformedStatement => write!(f, "Parse error: expected `lhs <op> rhs`"),
            Self::IllegalAssignment => write!(f, "Illegal operator: '='"),
            Self::UnknownCollection(name) => write!(f, "Table does not exist: '{}'", name),
            Self::IllegalOperator(op) => write!(f, "Illegal operator: '{}'", op),
            Self::MalformedSuperator => write!(f, "Parse error: malformed superator"),
        }
    }
}

/// A rejected rule block: the first offending node and the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarViolation {
    pub node: AstNode,
    pub kind: ViolationKind,
}

impl GrammarViolation {
    fn new(node: &AstNode, kind: ViolationKind) -> Self {
        Self {
            node: node.clone(),
            kind,
        }
    }

    pub fn reason(&self) -> String {
        self.kind.to_string()
    }
}

// ── Accepted Shapes ──────────────────────────────────────────────────

/// One statement that passed validation.
#[derive(Clone, Debug)]
pub struct RuleStatement<'a> {
    /// The whole statement.
    pub node: &'a AstNode,
    pub target: &'a str,
    pub operator: Operator,
    /// The right-hand expression with any superator tail unwrapped.
    pub body: &'a AstNode,
}

/// A rule block that passed validation.
#[derive(Clone, Debug)]
pub struct ValidatedBlock<'a> {
    pub name: &'a str,
    pub statements: Vec<RuleStatement<'a>>,
}

// ── Validation ───────────────────────────────────────────────────────

/// Check a rule-block tree against the rule grammar.
pub fn validate<'a>(
    ast: &'a AstNode,
    catalog: &Catalog,
) -> Result<ValidatedBlock<'a>, GrammarViolation> {
    let (name, scope_body) = match ast {
        AstNode::Definition { name, body, .. } => match body.as_slice() {
            [AstNode::Scope { body }] => (name.as_str(), body.as_ref()),
            _ => return Err(GrammarViolation::new(ast, ViolationKind::NotRuleBlock)),
        },
        _ => return Err(GrammarViolation::new(ast, ViolationKind::NotRuleBlock)),
    };

    let statements = match scope_body {
        AstNode::Block { statements } => statements,
        _ => return Err(GrammarViolation::new(ast, ViolationKind::MalformedBody)),
    };

    let statements = statements
        .iter()
        .map(|stmt| validate_statement(stmt, catalog))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedBlock { name, statements })
}

fn validate_statement<'a>(
    stmt: &'a AstNode,
    catalog: &Catalog,
) -> Result<RuleStatement<'a>, GrammarViolation> {
    let (lhs, op, rhs) = match stmt {
        AstNode::Assign { .. } => {
            return Err(GrammarViolation::new(stmt, ViolationKind::IllegalAssignment))
        }
        AstNode::Call {
            receiver: Some(lhs),
            method,
            args,
        } if args.len() == 1 => (lhs.as_ref(), method.as_str(), &args[0]),
        _ => return Err(GrammarViolation::new(stmt, ViolationKind::MalformedStatement)),
    };

    let target = lhs
        .as_bare_name()
        .ok_or_else(|| GrammarViolation::new(stmt, ViolationKind::MalformedStatement))?;
    if !catalog.contains(target) {
        return Err(GrammarViolation::new(
            stmt,
            ViolationKind::UnknownCollection(target.to_string()),
        ));
    }

    match op {
        "<=" => Ok(RuleStatement {
            node: stmt,
            target,
            operator: Operator::Deductive,
            body: rhs,
        }),
        "<" => {
            let (superator, body) = unwrap_superator(rhs)
                .ok_or_else(|| GrammarViolation::new(stmt, ViolationKind::MalformedSuperator))?;
            Ok(RuleStatement {
                node: stmt,
                target,
                operator: Operator::Temporal(superator),
                body,
            })
        }
        other => Err(GrammarViolation::new(
            stmt,
            ViolationKind::IllegalOperator(other.to_string()),
        )),
    }
}

/// Split `tail(body)` into the superator and its single operand.
fn unwrap_superator(rhs: &AstNode) -> Option<(Superator, &AstNode)> {
    match rhs {
        AstNode::Call {
            receiver: Some(body),
            method,
            args,
        } if args.is_empty() => Superator::from_tail(method).map(|s| (s, body.as_ref())),
        _ => None,
    }
}
