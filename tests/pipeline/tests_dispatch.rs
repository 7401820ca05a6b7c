use reshape::pipeline::{DocumentError, DocumentOutcome};
use reshape::rules::{PathScope, RuleError, RuleSet};
use reshape::syntax::YamlCodec;
use reshape::{Document, Pipeline, RulesConfig};

use crate::helpers::fixtures::{
    FaultingRule, MAILER_CONFIG, MAILER_SOURCE, MAILER_SOURCE_REWRITTEN, PanickingRule,
    SESSION_YAML, TouchRule, UNRELATED_SOURCE,
};
use crate::helpers::sexp_codec::SexpCodec;

fn sexp_scope() -> PathScope {
    PathScope::new(["**/*.sexp"]).unwrap()
}

fn mailer_pipeline() -> Pipeline {
    let config = RulesConfig::from_yaml(MAILER_CONFIG).unwrap().build().unwrap();
    Pipeline::new(config.rules)
        .with_codec(sexp_scope(), SexpCodec)
        .with_codec(PathScope::new(["**/*.yaml"]).unwrap(), YamlCodec)
}

#[test]
fn rename_feeds_later_argument_replacement() {
    let pipeline = mailer_pipeline();
    let result = pipeline.process(&Document::new("src/Jobs/Mailer.sexp", MAILER_SOURCE));

    assert_eq!(result.outcome, DocumentOutcome::Mutated);
    assert!(result.changed);
    assert_eq!(result.rules_applied, ["mail-namespace", "client-mode"]);
    assert_eq!(result.output.as_deref(), Some(MAILER_SOURCE_REWRITTEN));
}

#[test]
fn second_pass_over_rewritten_output_changes_nothing() {
    let pipeline = mailer_pipeline();
    let first = pipeline.process(&Document::new("src/Jobs/Mailer.sexp", MAILER_SOURCE));
    let output = first.output.unwrap();

    let second = pipeline.process(&Document::new("src/Jobs/Mailer.sexp", output));
    assert_eq!(second.outcome, DocumentOutcome::Unchanged);
    assert!(second.rules_applied.is_empty());
    assert!(second.output.is_none());
}

#[test]
fn documents_outside_every_scope_are_not_loaded() {
    let pipeline = mailer_pipeline();
    // Not valid s-expression text: loading it would fail.
    let result = pipeline.process(&Document::new("docs/readme.sexp", "not a tree"));
    assert_eq!(result.outcome, DocumentOutcome::Unchanged);
    assert!(!result.has_errors());
}

#[test]
fn unchanged_document_is_not_serialized() {
    let pipeline = mailer_pipeline();
    let result = pipeline.process(&Document::new("src/Http/Routes.sexp", UNRELATED_SOURCE));
    assert_eq!(result.outcome, DocumentOutcome::Unchanged);
    assert!(result.output.is_none());
}

#[test]
fn document_without_codec_is_an_error() {
    let rules = RuleSet::new().with(PathScope::everywhere(), TouchRule("touch"));
    let pipeline = Pipeline::new(rules).with_codec(sexp_scope(), SexpCodec);

    let result = pipeline.process(&Document::new("src/app.php", "<?php"));
    assert_eq!(result.outcome, DocumentOutcome::Failed);
    assert!(matches!(result.errors[..], [DocumentError::NoCodec]));
}

#[test]
fn load_error_is_recorded_per_document() {
    let rules = RuleSet::new().with(PathScope::everywhere(), TouchRule("touch"));
    let pipeline = Pipeline::new(rules).with_codec(sexp_scope(), SexpCodec);

    let report = pipeline.run([
        Document::new("a.sexp", "(source-file"),
        Document::new("b.sexp", "(source-file)"),
    ]);
    assert!(matches!(report.results[0].errors[..], [DocumentError::Load(_)]));
    assert_eq!(report.results[1].outcome, DocumentOutcome::Mutated);
}

#[test]
fn faulting_rule_discards_document_and_batch_continues() {
    let rules = RuleSet::new()
        .with(PathScope::everywhere(), TouchRule("before"))
        .with(PathScope::new(["bad/**"]).unwrap(), FaultingRule)
        .with(PathScope::everywhere(), TouchRule("after"));
    let pipeline = Pipeline::new(rules).with_codec(sexp_scope(), SexpCodec);

    let report = pipeline.run([
        Document::new("bad/one.sexp", "(source-file)"),
        Document::new("good/two.sexp", "(source-file)"),
    ]);

    let bad = &report.results[0];
    assert_eq!(bad.outcome, DocumentOutcome::Failed);
    assert!(!bad.changed);
    assert!(bad.output.is_none());
    assert_eq!(bad.rules_applied, ["before"]);
    match &bad.errors[..] {
        [DocumentError::Rule { rule, source }] => {
            assert_eq!(rule, "faulting");
            assert_eq!(source, &RuleError::fault("cannot rewrite"));
        }
        other => panic!("unexpected errors: {other:?}"),
    }

    let good = &report.results[1];
    assert_eq!(good.outcome, DocumentOutcome::Mutated);
    assert_eq!(good.rules_applied, ["before", "after"]);

    let summary = report.summary();
    assert_eq!((summary.total, summary.changed, summary.errored), (2, 1, 1));
    assert_eq!(report.changed().count(), 1);
}

#[test]
fn panicking_rule_is_reported_as_fault() {
    let rules = RuleSet::new().with(PathScope::everywhere(), PanickingRule);
    let pipeline = Pipeline::new(rules).with_codec(sexp_scope(), SexpCodec);

    let report = pipeline.run([
        Document::new("one.sexp", "(source-file)"),
        Document::new("two.sexp", "(source-file)"),
    ]);
    for result in &report.results {
        match &result.errors[..] {
            [DocumentError::Rule {
                source: RuleError::Panicked(message),
                ..
            }] => assert_eq!(message, "rule body exploded"),
            other => panic!("unexpected errors: {other:?}"),
        }
    }
    assert_eq!(report.summary().errored, 2);
}

#[test]
fn parallel_run_keeps_input_order() {
    let pipeline = mailer_pipeline();
    let documents: Vec<Document> = (0..32)
        .map(|i| {
            let text = if i % 2 == 0 { MAILER_SOURCE } else { UNRELATED_SOURCE };
            Document::new(format!("src/Jobs/File{i}.sexp"), text)
        })
        .collect();

    let sequential = pipeline.run(documents.clone());
    let parallel = pipeline.run_parallel(&documents);

    assert_eq!(parallel.summary(), sequential.summary());
    for (i, (p, s)) in parallel.results.iter().zip(&sequential.results).enumerate() {
        assert_eq!(p.path, documents[i].path);
        assert_eq!(p.outcome, s.outcome);
        assert_eq!(p.output, s.output);
    }
    assert_eq!(parallel.summary().changed, 16);
}

#[test]
fn report_json_lists_summary_and_errors() {
    let rules = RuleSet::new().with(PathScope::everywhere(), FaultingRule);
    let pipeline = Pipeline::new(rules).with_codec(sexp_scope(), SexpCodec);
    let report = pipeline.run([Document::new("x.sexp", "(source-file)")]);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["summary"]["errored"], 1);
    assert_eq!(json["results"][0]["outcome"], "failed");
    assert_eq!(
        json["results"][0]["errors"][0],
        "rule `faulting` failed: cannot rewrite"
    );
}

#[test]
fn yaml_document_runs_through_scoped_rules() {
    let pipeline = mailer_pipeline();
    let report = pipeline.run([
        Document::new("config/packages/framework.yaml", SESSION_YAML),
        Document::new("src/Jobs/Mailer.sexp", MAILER_SOURCE),
    ]);
    assert_eq!(report.results[0].rules_applied, ["session-handler"]);
    assert_eq!(
        report.results[1].rules_applied,
        ["mail-namespace", "client-mode"]
    );
}
