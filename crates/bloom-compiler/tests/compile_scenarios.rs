//! End-to-end compile scenarios over small rule hierarchies.

use bloom_analysis::FixedStratifier;
use bloom_ast::{AstNode, InMemoryAstSource};
use bloom_compiler::{CompileError, RuleCompiler};
use bloom_types::{
    Ancestry, CapabilityFact, Catalog, CollectionDecl, CompilerConfig, Operator, ProgramSpec,
    Qualifier, RuleId, StratumAssignment, Superator, UnderspecifiedWarning,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn catalog(names: &[&str]) -> Catalog {
    names
        .iter()
        .fold(Catalog::new(), |c, n| c.with(CollectionDecl::table(*n)))
}

fn single_type(name: &str, names: &[&str], blocks: &[&str]) -> ProgramSpec {
    blocks.iter().fold(
        ProgramSpec::new(name, Ancestry::from_general_to_specific([name]), catalog(names)),
        |spec, b| spec.declare_block(*b),
    )
}

fn edge_map() -> AstNode {
    AstNode::iter(
        AstNode::method(AstNode::collection("edge"), "map"),
        &["e"],
        vec![AstNode::ident("e")],
    )
}

fn grammar_reason(err: CompileError) -> String {
    match err {
        CompileError::Grammar { reason, .. } => reason,
        other => panic!("expected grammar error, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn mapped_rule_lands_in_its_stratum() {
    let spec = single_type("Paths", &["edge", "link"], &["rules"]);
    let source = InMemoryAstSource::new().with_block(
        "Paths",
        "rules",
        AstNode::rule_block("rules", vec![AstNode::deductive("link", edge_map())]),
    );
    let stratifier = FixedStratifier::new(StratumAssignment::from_strata([("link", 2)]));

    let program = RuleCompiler::new()
        .with_stratifier(Box::new(stratifier))
        .compile(&spec, &source)
        .unwrap();

    assert_eq!(program.edges.len(), 1);
    let e = &program.edges[0];
    assert_eq!((e.source.as_str(), e.target.as_str()), ("edge", "link"));
    assert_eq!(e.qualifier, Qualifier::Plain);
    assert_eq!(e.rule_id, program.rules[0].id);

    assert_eq!(program.strata.len(), 4);
    assert_eq!(
        program.strata.group(2).unwrap().rendered(),
        vec!["link <= edge.map { |e| e }"]
    );
}

#[test]
fn plain_assignment_is_rejected() {
    let spec = single_type("P", &["y"], &["rules"]);
    let source = InMemoryAstSource::new().with_block(
        "P",
        "rules",
        AstNode::rule_block("rules", vec![AstNode::assign("x", AstNode::collection("y"))]),
    );
    let err = RuleCompiler::new().compile(&spec, &source).unwrap_err();
    assert_eq!(err.block(), Some("rules"));
    assert_eq!(grammar_reason(err), "Illegal operator: '='");
}

#[test]
fn undeclared_target_is_rejected() {
    let spec = single_type("P", &["foo"], &["rules"]);
    let source = InMemoryAstSource::new().with_block(
        "P",
        "rules",
        AstNode::rule_block("rules", vec![AstNode::deductive("ghost", AstNode::collection("foo"))]),
    );
    let err = RuleCompiler::new().compile(&spec, &source).unwrap_err();
    assert_eq!(grammar_reason(err), "Table does not exist: 'ghost'");
}

#[test]
fn derived_block_replaces_base_block() {
    let spec = ProgramSpec::new(
        "Derived",
        Ancestry::from_specific_to_general(["Derived", "Base"]),
        catalog(&["a", "b", "c"]),
    )
    .declare_block("foo");
    let source = InMemoryAstSource::new()
        .with_block(
            "Base",
            "foo",
            AstNode::rule_block("foo", vec![AstNode::deductive("a", AstNode::collection("b"))]),
        )
        .with_block(
            "Derived",
            "foo",
            AstNode::rule_block("foo", vec![AstNode::deductive("a", AstNode::collection("c"))]),
        );

    let program = RuleCompiler::new().compile(&spec, &source).unwrap();
    let texts: Vec<_> = program.rules.iter().map(|r| r.source_text.as_str()).collect();
    assert_eq!(texts, vec!["a <= c"]);
    assert!(program.edges.iter().all(|e| e.source == "c"));
    assert_eq!(program.strata.rule_count(), 1);
}

#[test]
fn temporal_rules_go_to_last_group() {
    let spec = single_type("Pipes", &["pipe", "pipe_out", "pipe_chan", "link", "edge"], &["snd", "done"]);
    let source = InMemoryAstSource::new()
        .with_block(
            "Pipes",
            "snd",
            AstNode::rule_block(
                "snd",
                vec![
                    AstNode::superator("pipe_chan", "~", AstNode::collection("pipe")),
                    AstNode::deductive("link", AstNode::collection("edge")),
                ],
            ),
        )
        .with_block(
            "Pipes",
            "done",
            AstNode::rule_block(
                "done",
                vec![
                    AstNode::superator("pipe_out", "+@", AstNode::collection("pipe")),
                    AstNode::superator("pipe", "-@", AstNode::collection("pipe_out")),
                ],
            ),
        );
    let stratifier = FixedStratifier::new(StratumAssignment::from_strata([("link", 1), ("pipe_out", 1)]));

    let program = RuleCompiler::new()
        .with_stratifier(Box::new(stratifier))
        .compile(&spec, &source)
        .unwrap();

    let last = program.strata.temporal_index().unwrap();
    assert_eq!(last, 2);
    for rule in &program.rules {
        let at = program.strata.position_of(&rule.source_text).unwrap();
        match rule.operator {
            Operator::Temporal(_) => assert_eq!(at, last),
            Operator::Deductive => assert_eq!(at, 1),
        }
    }
    assert_eq!(
        program.strata.group(last).unwrap().rendered(),
        vec!["pipe_chan <~ pipe", "pipe_out <+ pipe", "pipe <- pipe_out"]
    );
}

#[test]
fn recompiling_gives_identical_output() {
    let spec = single_type("P", &["edge", "link", "pipe", "pipe_out"], &["a", "b"]);
    let source = InMemoryAstSource::new()
        .with_block(
            "P",
            "a",
            AstNode::rule_block("a", vec![AstNode::deductive("link", edge_map())]),
        )
        .with_block(
            "P",
            "b",
            AstNode::rule_block(
                "b",
                vec![AstNode::superator("pipe_out", "+@", AstNode::collection("pipe"))],
            ),
        );
    let compiler = RuleCompiler::new();
    let first = compiler.compile(&spec, &source).unwrap();
    let second = compiler.compile(&spec, &source).unwrap();
    assert_eq!(first.rules, second.rules);
    assert_eq!(first.edges, second.edges);
    assert_eq!(first.strata, second.strata);
    assert_eq!(first.rules[0].id, RuleId(0));
}

#[test]
fn async_then_negated_path_warns_unless_midpoint_is_a_boundary() {
    // b <+ a   (temporal)
    // c <= x.notin(b)   (b read under negation)
    let spec = single_type("Flow", &["a", "b", "c", "x"], &["rules"]);
    let source = InMemoryAstSource::new().with_block(
        "Flow",
        "rules",
        AstNode::rule_block(
            "rules",
            vec![
                AstNode::superator("b", "+@", AstNode::collection("a")),
                AstNode::deductive(
                    "c",
                    AstNode::call(
                        Some(AstNode::collection("x")),
                        "notin",
                        vec![AstNode::collection("b")],
                    ),
                ),
            ],
        ),
    );

    let compiler = RuleCompiler::new();
    let open = compiler.compile(&spec, &source).unwrap();
    assert_eq!(
        open.diagnostics.underspecified,
        vec![UnderspecifiedWarning::new("a", "c")]
    );
    assert_eq!(open.assignment.stratum_of("c"), Some(1));

    let guarded = spec.clone().with_capability(CapabilityFact::new("b"));
    let closed = compiler.compile(&guarded, &source).unwrap();
    assert!(closed.diagnostics.underspecified.is_empty());
}

#[test]
fn tilde_rule_alone_is_underspecified() {
    let spec = single_type("Chan", &["pipe", "pipe_chan"], &["snd"]);
    let source = InMemoryAstSource::new().with_block(
        "Chan",
        "snd",
        AstNode::rule_block(
            "snd",
            vec![AstNode::superator("pipe_chan", "~", AstNode::collection("pipe"))],
        ),
    );
    let program = RuleCompiler::new().compile(&spec, &source).unwrap();
    assert_eq!(program.edges[0].operator, Operator::Temporal(Superator::Tilde));
    assert_eq!(
        program.diagnostics.underspecified,
        vec![UnderspecifiedWarning::new("pipe", "pipe_chan")]
    );
}

#[test]
fn cycle_through_negation_is_reported_not_fatal() {
    // a <= b.notin(a)
    let spec = single_type("Loop", &["a", "b"], &["rules"]);
    let source = InMemoryAstSource::new().with_block(
        "Loop",
        "rules",
        AstNode::rule_block(
            "rules",
            vec![AstNode::deductive(
                "a",
                AstNode::call(
                    Some(AstNode::collection("b")),
                    "notin",
                    vec![AstNode::collection("a")],
                ),
            )],
        ),
    );
    let program = RuleCompiler::new().compile(&spec, &source).unwrap();
    assert_eq!(program.diagnostics.cycles.len(), 1);
    assert!(program.diagnostics.cycles[0].through_negation);
    assert_eq!(program.strata.rule_count(), 1);
}

#[test]
fn program_without_rules_has_three_empty_groups() {
    let spec = single_type("Empty", &["a"], &["rules"]);
    let program = RuleCompiler::new()
        .compile(&spec, &InMemoryAstSource::new())
        .unwrap();
    assert!(program.rules.is_empty());
    assert_eq!(program.assignment.top, None);
    assert_eq!(program.strata.len(), 3);
    assert_eq!(program.strata.rule_count(), 0);
}

#[test]
fn failing_block_aborts_whole_compile() {
    let spec = single_type("P", &["a", "b"], &["good", "bad"]);
    let source = InMemoryAstSource::new()
        .with_block(
            "P",
            "good",
            AstNode::rule_block("good", vec![AstNode::deductive("a", AstNode::collection("b"))]),
        )
        .with_block(
            "P",
            "bad",
            AstNode::rule_block(
                "bad",
                vec![AstNode::binary(AstNode::collection("a"), "<<", AstNode::collection("b"))],
            ),
        );
    let dir = tempfile::tempdir().unwrap();
    let config = CompilerConfig {
        dump_rewrite: true,
        dump_dir: dir.path().to_path_buf(),
        ..CompilerConfig::default()
    };
    let err = RuleCompiler::with_config(config)
        .compile(&spec, &source)
        .unwrap_err();
    assert_eq!(err.block(), Some("bad"));
    assert_eq!(
        err.to_string(),
        "Illegal operator: '<<' in rule block \"bad\"\nCode: a << b"
    );
    assert!(!dir.path().join("P_rewritten.txt").exists());
}

#[test]
fn rounds_setting_bounds_the_analysis() {
    // a -> n1 -> ... -> n8 -> z, temporal first hop, negated last hop.
    let mut names = vec!["a".to_string(), "z".to_string()];
    names.extend((1..=8).map(|i| format!("n{}", i)));
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let spec = single_type("Chain", &refs, &["rules"]);

    let mut stmts = vec![AstNode::superator("n1", "+@", AstNode::collection("a"))];
    for i in 1..8 {
        stmts.push(AstNode::deductive(
            format!("n{}", i + 1),
            AstNode::collection(format!("n{}", i)),
        ));
    }
    stmts.push(AstNode::deductive(
        "z",
        AstNode::call(
            Some(AstNode::collection("a")),
            "notin",
            vec![AstNode::collection("n8")],
        ),
    ));
    let source =
        InMemoryAstSource::new().with_block("Chain", "rules", AstNode::rule_block("rules", stmts));

    let target = UnderspecifiedWarning::new("a", "z");
    let default = RuleCompiler::new().compile(&spec, &source).unwrap();
    assert!(!default.diagnostics.underspecified.contains(&target));

    let deeper = RuleCompiler::with_config(CompilerConfig {
        analysis_rounds: 4,
        ..CompilerConfig::default()
    })
    .compile(&spec, &source)
    .unwrap();
    assert!(deeper.diagnostics.underspecified.contains(&target));
}
