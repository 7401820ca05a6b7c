use std::io::Write;
use std::sync::Arc;

use reshape::config::ConfigError;
use reshape::matching::{RenameError, ReplacementError, StaticSignatureProvider};
use reshape::rules::KeyRenameError;
use reshape::{Document, Pipeline, RulesConfig};
use rstest::rstest;

use crate::helpers::fixtures::{MAILER_CONFIG, MAILER_SOURCE};
use crate::helpers::sexp_codec::SexpCodec;

fn build(yaml: &str) -> Result<reshape::Configuration, ConfigError> {
    RulesConfig::from_yaml(yaml)?.build()
}

#[test]
fn mailer_config_builds_in_declared_order() {
    let config = build(MAILER_CONFIG).unwrap();
    assert_eq!(
        config.rules.ids(),
        ["mail-namespace", "client-mode", "session-handler"]
    );
    assert!(config.exclude.is_empty());
    assert_eq!(config.constants.len(), 1);
}

#[rstest]
#[case::empty_id("rules:\n  - id: ' '\n    kind: rename_namespace\n    renames: {A: B}\n")]
#[case::duplicate_id(
    "rules:\n  - id: r\n    kind: rename_namespace\n    renames: {A: B}\n  - id: r\n    kind: rename_namespace\n    renames: {C: D}\n"
)]
#[case::empty_renames("rules:\n  - id: r\n    kind: rename_namespace\n    renames: {}\n")]
#[case::empty_replacements("rules:\n  - id: r\n    kind: replace_argument\n    replacements: []\n")]
fn structural_problems_are_invalid_rules(#[case] yaml: &str) {
    assert!(matches!(build(yaml), Err(ConfigError::InvalidRule(_))));
}

#[test]
fn bad_names_are_rejected() {
    let yaml = "rules:\n  - id: r\n    kind: rename_namespace\n    renames: {'App\\\\Mail': B}\n";
    assert!(matches!(build(yaml), Err(ConfigError::Name { .. })));
}

#[test]
fn self_governing_rename_is_rejected() {
    let yaml = "rules:\n  - id: r\n    kind: rename_namespace\n    renames: {App: 'App\\Legacy'}\n";
    match build(yaml) {
        Err(ConfigError::Rename { rule, source }) => {
            assert_eq!(rule, "r");
            assert!(matches!(source, RenameError::SelfGoverning { .. }));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn no_op_replacement_is_rejected() {
    let yaml = r#"
rules:
  - id: r
    kind: replace_argument
    replacements:
      - { callee: F, method: run, arg: mode, old: 1, new: 1 }
"#;
    assert!(matches!(
        build(yaml),
        Err(ConfigError::Replacement {
            source: ReplacementError::NoOp(_),
            ..
        })
    ));
}

#[test]
fn int_and_float_replacement_values_differ() {
    let yaml = r#"
rules:
  - id: r
    kind: replace_argument
    replacements:
      - { callee: F, method: run, arg: mode, old: 1, new: 1.0 }
"#;
    assert!(build(yaml).is_ok());
}

#[test]
fn bad_key_rename_is_rejected() {
    let yaml = "rules:\n  - id: r\n    kind: rename_config_key\n    keys: {'a..b': c}\n";
    assert!(matches!(
        build(yaml),
        Err(ConfigError::KeyRename {
            source: KeyRenameError::EmptySegment(_),
            ..
        })
    ));
}

#[rstest]
#[case::path_glob("rules:\n  - id: r\n    kind: rename_namespace\n    paths: ['src/[']\n    renames: {A: B}\n")]
fn bad_path_glob_is_rejected(#[case] yaml: &str) {
    assert!(matches!(build(yaml), Err(ConfigError::InvalidPattern { .. })));
}

#[rstest]
#[case::unknown_top_level_key("rule: []\n")]
#[case::unknown_kind("rules:\n  - id: r\n    kind: delete_everything\n")]
#[case::not_yaml("rules: [")]
#[case::misspelled_paths(
    "rules:\n  - id: r\n    kind: rename_namespace\n    path: ['src/**/*.php']\n    renames: {A: B}\n"
)]
#[case::body_of_another_kind(
    "rules:\n  - id: r\n    kind: rename_namespace\n    renames: {A: B}\n    keys: {a: b}\n"
)]
#[case::missing_body("rules:\n  - id: r\n    kind: rename_config_key\n")]
fn malformed_documents_are_parse_errors(#[case] yaml: &str) {
    assert!(matches!(RulesConfig::from_yaml(yaml), Err(ConfigError::Parse(_))));
}

#[test]
fn config_file_format_follows_extension() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("rules.yaml");
    std::fs::write(&yaml_path, MAILER_CONFIG).unwrap();
    assert_eq!(RulesConfig::from_file(&yaml_path).unwrap().rules.len(), 3);

    let json_path = dir.path().join("rules.json");
    let mut file = std::fs::File::create(&json_path).unwrap();
    writeln!(
        file,
        r#"{{"rules": [{{"id": "r", "kind": "rename_namespace", "renames": {{"A": "B"}}}}]}}"#
    )
    .unwrap();
    assert_eq!(RulesConfig::from_file(&json_path).unwrap().rules.len(), 1);

    assert!(matches!(
        RulesConfig::from_file(dir.path().join("missing.yaml")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn injected_signatures_replace_declared_ones() {
    // Without a signature for the renamed client only the named
    // argument can be rewritten.
    let config = RulesConfig::from_yaml(MAILER_CONFIG)
        .unwrap()
        .build_with(Arc::new(StaticSignatureProvider::new()))
        .unwrap();
    let pipeline = Pipeline::new(config.rules).with_codec(Default::default(), SexpCodec);
    let result = pipeline.process(&Document::new("src/Jobs/Mailer.sexp", MAILER_SOURCE));
    let output = result.output.unwrap();

    assert!(output.contains(r#"(arg (lit "smtp")) (arg (lit "old"))"#));
    assert!(output.contains(r#"(arg mode: (lit "new"))"#));
}
