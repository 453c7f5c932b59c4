//! Rule compiler orchestrator.
//!
//! `RuleCompiler` drives the full pipeline for one program:
//! extract rules across the ancestry → stratify → assemble groups →
//! analyze dataflow → optionally dump the rewrite.

use bloom_analysis::{DatalogStratifier, DependencyAnalyzer, MonotonicityAnalyzer, Stratifier};
use bloom_ast::AstSource;
use bloom_types::{CompiledProgram, CompilerConfig, Diagnostics, ProgramSpec, RuleId};
use tracing::{info, info_span, warn};

use crate::assembler::assemble;
use crate::bridge::AnalysisBridge;
use crate::dump::write_dump;
use crate::error::CompileResult;
use crate::extractor::{Extraction, RuleExtractor};

// ── Rule Compiler ────────────────────────────────────────────────────

/// Compiles the rule blocks of a program into a stratified program.
///
/// Holds no per-compile state; one compiler can compile any number of
/// programs, and compiling the same program twice gives the same result.
pub struct RuleCompiler {
    config: CompilerConfig,
    stratifier: Box<dyn Stratifier>,
    analyzer: Box<dyn DependencyAnalyzer>,
}

impl RuleCompiler {
    /// Create a compiler with default configuration and the reference
    /// stratifier and analyzer.
    pub fn new() -> Self {
        Self::with_config(CompilerConfig::default())
    }

    /// Create with a specific configuration.
    pub fn with_config(config: CompilerConfig) -> Self {
        Self {
            config,
            stratifier: Box::new(DatalogStratifier::new()),
            analyzer: Box::new(MonotonicityAnalyzer::new()),
        }
    }

    /// Replace the stratifier.
    pub fn with_stratifier(mut self, stratifier: Box<dyn Stratifier>) -> Self {
        self.stratifier = stratifier;
        self
    }

    /// Replace the dependency analyzer.
    pub fn with_analyzer(mut self, analyzer: Box<dyn DependencyAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Access the current configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Extract and validate every rule block without stratifying.
    pub fn check(&self, spec: &ProgramSpec, source: &dyn AstSource) -> CompileResult<Extraction> {
        RuleExtractor::new(source, &spec.collections)
            .with_ast_logging(self.config.dump_ast)
            .extract(
                &spec.ancestry,
                &spec.rule_blocks,
                RuleId(self.config.first_rule_id),
            )
    }

    /// Compile a program.
    pub fn compile(
        &self,
        spec: &ProgramSpec,
        source: &dyn AstSource,
    ) -> CompileResult<CompiledProgram> {
        let span = info_span!("compile", program = %spec.name);
        let _guard = span.enter();

        // Step 1: Extract and validate
        let extraction = self.check(spec, source)?;

        // Step 2: Stratify
        let assignment = self.stratifier.stratify(&extraction.edges)?;
        for cycle in &assignment.cycles {
            if cycle.through_negation {
                warn!(
                    members = ?cycle.members,
                    stratifier = self.stratifier.name(),
                    "Dependency cycle through negation"
                );
            }
        }

        // Step 3: Assemble groups
        let strata = assemble(&extraction.rules, &assignment, spec.collections.len())?;

        // Step 4: Analyze dataflow
        let underspecified = AnalysisBridge::new(self.analyzer.as_ref(), self.config.analysis_rounds)
            .run(&extraction.edges, &spec.capabilities);

        // Step 5: Dump
        let dump_path = if self.config.dump_rewrite {
            Some(write_dump(&self.config.dump_dir, &spec.name, &strata)?)
        } else {
            None
        };

        let program = CompiledProgram {
            name: spec.name.clone(),
            rules: extraction.rules,
            edges: extraction.edges,
            diagnostics: Diagnostics {
                cycles: assignment.cycles.clone(),
                underspecified,
            },
            assignment,
            strata,
            dump_path,
        };

        info!(summary = %program.summary(), "Program compiled");
        Ok(program)
    }
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_analysis::FixedStratifier;
    use bloom_ast::{AstNode, InMemoryAstSource};
    use bloom_types::{Ancestry, Catalog, CollectionDecl, StratumAssignment};

    fn spec() -> ProgramSpec {
        let catalog = Catalog::new()
            .with(CollectionDecl::table("edge"))
            .with(CollectionDecl::table("link"))
            .with(CollectionDecl::table("pipe"))
            .with(CollectionDecl::table("pipe_out"));
        ProgramSpec::new("Net", Ancestry::from_general_to_specific(["Net"]), catalog)
            .declare_block("rules")
    }

    fn source() -> InMemoryAstSource {
        InMemoryAstSource::new().with_block(
            "Net",
            "rules",
            AstNode::rule_block(
                "rules",
                vec![
                    AstNode::deductive("link", AstNode::collection("edge")),
                    AstNode::superator("pipe_out", "+@", AstNode::collection("pipe")),
                ],
            ),
        )
    }

    #[test]
    fn default_compiler() {
        let c = RuleCompiler::default();
        assert_eq!(c.config().analysis_rounds, 3);
    }

    #[test]
    fn compile_end_to_end() {
        let program = RuleCompiler::new().compile(&spec(), &source()).unwrap();
        assert_eq!(program.name, "Net");
        assert_eq!(program.rules.len(), 2);
        // Only stratum 0 is used: one deductive group plus the temporal one.
        assert_eq!(program.assignment.top, Some(0));
        assert_eq!(program.strata.len(), 2);
        assert_eq!(program.strata.position_of("link <= edge"), Some(0));
        assert_eq!(program.strata.position_of("pipe_out <+ pipe"), Some(1));
        assert!(program.diagnostics.is_clean());
        assert!(program.dump_path.is_none());
    }

    #[test]
    fn custom_stratifier_is_used() {
        let fixed = FixedStratifier::new(StratumAssignment::from_strata([("link", 2)]));
        let program = RuleCompiler::new()
            .with_stratifier(Box::new(fixed))
            .compile(&spec(), &source())
            .unwrap();
        assert_eq!(program.strata.len(), 4);
        assert_eq!(program.strata.position_of("link <= edge"), Some(2));
        assert_eq!(program.strata.position_of("pipe_out <+ pipe"), Some(3));
    }

    #[test]
    fn first_rule_id_is_configurable() {
        let config = CompilerConfig {
            first_rule_id: 100,
            ..CompilerConfig::default()
        };
        let checked = RuleCompiler::with_config(config).check(&spec(), &source()).unwrap();
        assert_eq!(checked.rules[0].id, RuleId(100));
        assert_eq!(checked.next_id, RuleId(102));
    }

    #[test]
    fn dump_is_written_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = CompilerConfig {
            dump_rewrite: true,
            dump_dir: dir.path().to_path_buf(),
            ..CompilerConfig::default()
        };
        let program = RuleCompiler::with_config(config)
            .compile(&spec(), &source())
            .unwrap();
        let path = program.dump_path.unwrap();
        assert_eq!(path, dir.path().join("Net_rewritten.txt"));
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "Declarations:\nR[0]:\nlink <= edge\nR[1]:\npipe_out <+ pipe\n"
        );
    }
}
