use std::fs;
use std::path::{Path, PathBuf};

use reshape::project::{ProjectError, collect_documents, write_back};
use reshape::{Pipeline, RulesConfig};
use reshape::rules::PathScope;
use reshape::syntax::YamlCodec;

use crate::helpers::fixtures::{
    MAILER_CONFIG, MAILER_SOURCE, MAILER_SOURCE_REWRITTEN, SESSION_YAML, UNRELATED_SOURCE,
};
use crate::helpers::sexp_codec::SexpCodec;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/Jobs/Mailer.sexp", MAILER_SOURCE);
    write(dir.path(), "src/Http/Routes.sexp", UNRELATED_SOURCE);
    write(dir.path(), "config/framework.yaml", SESSION_YAML);
    write(dir.path(), "README.md", "# readme\n");
    dir
}

#[test]
fn documents_are_collected_sorted_and_relative() {
    let dir = project();
    let documents = collect_documents(dir.path(), &["sexp", "yaml"])
        .unwrap()
        .documents;
    let paths: Vec<PathBuf> = documents.iter().map(|d| d.path.clone()).collect();
    assert_eq!(
        paths,
        [
            PathBuf::from("config/framework.yaml"),
            PathBuf::from("src/Http/Routes.sexp"),
            PathBuf::from("src/Jobs/Mailer.sexp"),
        ]
    );
    assert_eq!(documents[2].text, MAILER_SOURCE);

    assert_eq!(collect_documents(dir.path(), &[]).unwrap().documents.len(), 4);
}

#[test]
fn unreadable_file_does_not_hide_its_neighbours() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "config/a.yaml", SESSION_YAML);
    let binary = dir.path().join("config/b.yaml");
    fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();
    write(dir.path(), "config/c.yaml", "c: 1\n");

    let discovery = collect_documents(dir.path(), &["yaml"]).unwrap();
    let paths: Vec<PathBuf> = discovery.documents.iter().map(|d| d.path.clone()).collect();
    assert_eq!(
        paths,
        [PathBuf::from("config/a.yaml"), PathBuf::from("config/c.yaml")]
    );
    match &discovery.failed[..] {
        [ProjectError::Read { path, .. }] => assert_eq!(path, &binary),
        other => panic!("unexpected failures: {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn backslash_in_file_name_is_not_a_separator() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/Old\\Name.sexp", UNRELATED_SOURCE);

    let discovery = collect_documents(dir.path(), &["sexp"]).unwrap();
    assert_eq!(
        discovery.documents[0].path,
        PathBuf::from("src/Old\\Name.sexp")
    );
    assert!(dir.path().join(&discovery.documents[0].path).is_file());
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        collect_documents(&missing, &[]),
        Err(ProjectError::NotADirectory(_))
    ));
}

#[test]
fn only_changed_documents_are_written_back() {
    let dir = project();
    let config = RulesConfig::from_yaml(MAILER_CONFIG).unwrap().build().unwrap();
    let pipeline = Pipeline::new(config.rules)
        .with_codec(PathScope::new(["**/*.sexp"]).unwrap(), SexpCodec)
        .with_codec(PathScope::new(["**/*.yaml"]).unwrap(), YamlCodec);

    let discovery = collect_documents(dir.path(), &["sexp", "yaml"]).unwrap();
    assert!(discovery.failed.is_empty());
    let documents = discovery.documents;
    let report = pipeline.run_parallel(&documents);
    let outcome = write_back(dir.path(), &report);

    assert!(outcome.failed.is_empty());
    assert_eq!(
        outcome.written,
        [
            dir.path().join("config/framework.yaml"),
            dir.path().join("src/Jobs/Mailer.sexp"),
        ]
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("src/Jobs/Mailer.sexp")).unwrap(),
        MAILER_SOURCE_REWRITTEN
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("src/Http/Routes.sexp")).unwrap(),
        UNRELATED_SOURCE
    );
    let rewritten = fs::read_to_string(dir.path().join("config/framework.yaml")).unwrap();
    assert!(rewritten.contains("handler: redis"));
}
