//! Dependency facts of one rule.
//!
//! Every declared collection referenced on a rule's right-hand side becomes
//! one edge into the rule's target. Names bound as iterator parameters are
//! locals, never collections, inside their block.

use std::collections::BTreeSet;

use bloom_ast::AstNode;
use bloom_types::{Catalog, DependencyEdge, Operator, Qualifier, RuleId};

/// Method whose arguments are read under negation.
const ANTI_JOIN: &str = "notin";

/// Collect the dependency edges of one accepted statement.
pub fn emit_edges(
    rule_id: RuleId,
    target: &str,
    operator: Operator,
    body: &AstNode,
    catalog: &Catalog,
) -> Vec<DependencyEdge> {
    let base = match operator {
        Operator::Deductive => Qualifier::Plain,
        Operator::Temporal(s) => s.qualifier(),
    };

    let mut refs = Vec::new();
    let mut scope = Vec::new();
    collect(body, base, catalog, &mut scope, &mut refs);

    let mut seen = BTreeSet::new();
    refs.into_iter()
        .filter(|(source, qualifier)| seen.insert((source.clone(), *qualifier)))
        .map(|(source, qualifier)| DependencyEdge {
            source,
            target: target.to_string(),
            rule_id,
            qualifier,
            operator,
        })
        .collect()
}

fn collect<'a>(
    node: &'a AstNode,
    qualifier: Qualifier,
    catalog: &Catalog,
    scope: &mut Vec<&'a str>,
    out: &mut Vec<(String, Qualifier)>,
) {
    match node {
        AstNode::Call {
            receiver: None,
            method,
            args,
        } if args.is_empty() => {
            if catalog.contains(method) && !scope.contains(&method.as_str()) {
                out.push((method.clone(), qualifier));
            }
        }
        AstNode::Call {
            receiver,
            method,
            args,
        } => {
            if let Some(receiver) = receiver {
                collect(receiver, qualifier, catalog, scope, out);
            }
            let arg_qualifier = if method == ANTI_JOIN {
                Qualifier::Negated
            } else {
                qualifier
            };
            for arg in args {
                collect(arg, arg_qualifier, catalog, scope, out);
            }
        }
        AstNode::Iter { call, params, body } => {
            collect(call, qualifier, catalog, scope, out);
            let depth = scope.len();
            scope.extend(params.iter().map(String::as_str));
            for stmt in body {
                collect(stmt, qualifier, catalog, scope, out);
            }
            scope.truncate(depth);
        }
        other => {
            for child in other.children() {
                collect(child, qualifier, catalog, scope, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_types::{CollectionDecl, Superator};

    fn catalog() -> Catalog {
        Catalog::new()
            .with(CollectionDecl::table("edge"))
            .with(CollectionDecl::table("link"))
            .with(CollectionDecl::table("pipe"))
            .with(CollectionDecl::table("pipe_out"))
            .with(CollectionDecl::channel("pipe_chan"))
    }

    fn sources(edges: &[DependencyEdge]) -> Vec<(&str, Qualifier)> {
        edges.iter().map(|e| (e.source.as_str(), e.qualifier)).collect()
    }

    #[test]
    fn iterator_body_yields_single_plain_edge() {
        let body = AstNode::iter(
            AstNode::method(AstNode::collection("edge"), "map"),
            &["e"],
            vec![AstNode::ident("e")],
        );
        let edges = emit_edges(RuleId(0), "link", Operator::Deductive, &body, &catalog());
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "edge");
        assert_eq!(edges[0].target, "link");
        assert_eq!(edges[0].qualifier, Qualifier::Plain);
        assert_eq!(edges[0].rule_id, RuleId(0));
    }

    #[test]
    fn superator_qualifies_references() {
        let body = AstNode::collection("pipe");
        let op = Operator::Temporal(Superator::Plus);
        let edges = emit_edges(RuleId(3), "pipe_out", op, &body, &catalog());
        assert_eq!(sources(&edges), vec![("pipe", Qualifier::Persisted)]);
        assert_eq!(edges[0].operator, op);

        let op = Operator::Temporal(Superator::Tilde);
        let edges = emit_edges(RuleId(4), "pipe_chan", op, &body, &catalog());
        assert_eq!(sources(&edges), vec![("pipe", Qualifier::Negated)]);
    }

    #[test]
    fn notin_arguments_are_negated() {
        let body = AstNode::call(
            Some(AstNode::collection("pipe")),
            "notin",
            vec![AstNode::collection("pipe_out")],
        );
        let edges = emit_edges(RuleId(0), "link", Operator::Deductive, &body, &catalog());
        assert_eq!(
            sources(&edges),
            vec![("pipe", Qualifier::Plain), ("pipe_out", Qualifier::Negated)]
        );
    }

    #[test]
    fn undeclared_names_are_not_references() {
        let body = AstNode::call(
            Some(AstNode::collection("edge")),
            "join",
            vec![AstNode::collection("helper"), AstNode::literal("1")],
        );
        let edges = emit_edges(RuleId(0), "link", Operator::Deductive, &body, &catalog());
        assert_eq!(sources(&edges), vec![("edge", Qualifier::Plain)]);
    }

    #[test]
    fn duplicate_references_collapse() {
        let body = AstNode::call(
            Some(AstNode::collection("edge")),
            "join",
            vec![AstNode::collection("edge")],
        );
        let edges = emit_edges(RuleId(0), "link", Operator::Deductive, &body, &catalog());
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn same_source_under_two_qualifiers_is_two_edges() {
        let body = AstNode::call(
            Some(AstNode::collection("pipe")),
            "notin",
            vec![AstNode::collection("pipe")],
        );
        let edges = emit_edges(RuleId(0), "link", Operator::Deductive, &body, &catalog());
        assert_eq!(
            sources(&edges),
            vec![("pipe", Qualifier::Plain), ("pipe", Qualifier::Negated)]
        );
    }

    #[test]
    fn block_parameters_shadow_collections() {
        // pipe.map { |edge| edge }: the inner `edge` is the parameter.
        let body = AstNode::iter(
            AstNode::method(AstNode::collection("pipe"), "map"),
            &["edge"],
            vec![AstNode::collection("edge")],
        );
        let edges = emit_edges(RuleId(0), "link", Operator::Deductive, &body, &catalog());
        assert_eq!(sources(&edges), vec![("pipe", Qualifier::Plain)]);
    }

    #[test]
    fn references_inside_arrays_and_iterators_are_found() {
        let body = AstNode::iter(
            AstNode::method(AstNode::collection("pipe"), "map"),
            &["p"],
            vec![AstNode::array(vec![
                AstNode::method(AstNode::ident("p"), "dst"),
                AstNode::method(AstNode::collection("edge"), "first"),
            ])],
        );
        let edges = emit_edges(RuleId(0), "link", Operator::Deductive, &body, &catalog());
        assert_eq!(
            sources(&edges),
            vec![("pipe", Qualifier::Plain), ("edge", Qualifier::Plain)]
        );
    }
}
