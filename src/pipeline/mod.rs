//! Rule dispatch over documents.
//!
//! For each document:
//!
//! ```text
//! path ──scope──▶ no rule applies ──────────────────────────▶ Unchanged
//!        │
//!        └─▶ load ─▶ rule 1 ─▶ rule 2 ─▶ … (declared order) ─┬─▶ Unchanged
//!                                                            ├─▶ serialize ─▶ Mutated
//!                                                            └─▶ fault ─────▶ Failed
//! ```
//!
//! A fault in any rule, returned or panicked, aborts the remaining rules for
//! that document and discards its tree; nothing partially rewritten is ever
//! serialized. Other documents are unaffected. Configuration is shared
//! read-only, so [`Pipeline::run_parallel`] only needs one tree per worker.

mod result;

pub use result::{BatchReport, BatchSummary, DocumentError, DocumentOutcome, DocumentResult};

use rayon::prelude::*;
use smol_str::SmolStr;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::rules::{PathScope, Rule, RuleError, RuleSet, ScopedRule};
use crate::syntax::{DocumentCodec, Tree};

/// A document handed to the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Path used for scoping, `/`-separated and usually relative.
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Applies a [`RuleSet`] to documents through registered codecs.
pub struct Pipeline {
    rules: RuleSet,
    codecs: Vec<(PathScope, Arc<dyn DocumentCodec>)>,
}

impl Pipeline {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            codecs: Vec::new(),
        }
    }

    /// Register `codec` for documents matching `scope`. The first matching
    /// registration wins.
    pub fn with_codec(mut self, scope: PathScope, codec: impl DocumentCodec + 'static) -> Self {
        self.codecs.push((scope, Arc::new(codec)));
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    fn codec_for(&self, path: &Path) -> Option<&dyn DocumentCodec> {
        self.codecs
            .iter()
            .find(|(scope, _)| scope.matches(path))
            .map(|(_, codec)| codec.as_ref())
    }

    /// Run every applicable rule on one document.
    pub fn process(&self, document: &Document) -> DocumentResult {
        let path = document.path.clone();
        let applicable: Vec<&ScopedRule> = self.rules.matching(&document.path).collect();
        if applicable.is_empty() {
            tracing::trace!("{}: no rule in scope", path.display());
            return DocumentResult::unchanged(path);
        }

        let Some(codec) = self.codec_for(&document.path) else {
            return DocumentResult::failed(path, Vec::new(), DocumentError::NoCodec);
        };
        let mut tree = match codec.load(&document.path, &document.text) {
            Ok(tree) => tree,
            Err(e) => return DocumentResult::failed(path, Vec::new(), DocumentError::Load(e)),
        };

        let mut rules_applied = Vec::new();
        for scoped in applicable {
            match apply_guarded(scoped.rule(), &mut tree) {
                Ok(true) => {
                    tracing::debug!("{}: rule `{}` changed the tree", path.display(), scoped.id());
                    rules_applied.push(SmolStr::new(scoped.id()));
                }
                Ok(false) => {}
                Err(source) => {
                    tracing::warn!(
                        "{}: rule `{}` failed, discarding document: {}",
                        path.display(),
                        scoped.id(),
                        source
                    );
                    let error = DocumentError::Rule {
                        rule: SmolStr::new(scoped.id()),
                        source,
                    };
                    return DocumentResult::failed(path, rules_applied, error);
                }
            }
        }

        if rules_applied.is_empty() {
            return DocumentResult::unchanged(path);
        }
        match codec.write(&document.path, &tree) {
            Ok(output) => DocumentResult::mutated(path, rules_applied, output),
            Err(e) => DocumentResult::failed(path, rules_applied, DocumentError::Write(e)),
        }
    }

    /// Process documents one after another, in input order.
    pub fn run(&self, documents: impl IntoIterator<Item = Document>) -> BatchReport {
        let results = documents
            .into_iter()
            .map(|document| self.process(&document))
            .collect();
        self.finish(results)
    }

    /// Process documents on the rayon pool. Results keep input order.
    pub fn run_parallel(&self, documents: &[Document]) -> BatchReport {
        let results = documents
            .par_iter()
            .map(|document| self.process(document))
            .collect();
        self.finish(results)
    }

    fn finish(&self, results: Vec<DocumentResult>) -> BatchReport {
        let report = BatchReport::new(results);
        let summary = report.summary();
        tracing::info!(
            "processed {} document(s): {} changed, {} unchanged, {} errored",
            summary.total,
            summary.changed,
            summary.unchanged,
            summary.errored
        );
        report
    }
}

/// Apply `rule`, turning a panic into [`RuleError::Panicked`].
///
/// The tree may be half-mutated after a panic; callers drop it.
fn apply_guarded(rule: &dyn Rule, tree: &mut Tree) -> Result<bool, RuleError> {
    catch_unwind(AssertUnwindSafe(|| rule.apply(tree)))
        .unwrap_or_else(|payload| Err(RuleError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
