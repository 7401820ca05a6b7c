//! Per-document results and the batch report.

use serde::{Serialize, Serializer};
use smol_str::SmolStr;
use std::path::PathBuf;
use thiserror::Error;

use crate::rules::RuleError;
use crate::syntax::CodecError;

/// Why a document could not be rewritten.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no codec handles this document")]
    NoCodec,

    #[error("cannot load document: {0}")]
    Load(#[source] CodecError),

    #[error("rule `{rule}` failed: {source}")]
    Rule {
        rule: SmolStr,
        #[source]
        source: RuleError,
    },

    #[error("cannot serialize document: {0}")]
    Write(#[source] CodecError),
}

/// Terminal state of one document pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentOutcome {
    /// No rule applied or no rule reported a change.
    Unchanged,
    /// At least one rule changed the tree and it was serialized.
    Mutated,
    /// An error was recorded; nothing is written back.
    Failed,
}

#[allow(clippy::ptr_arg)]
fn errors_as_strings<S: Serializer>(errors: &Vec<DocumentError>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(errors.iter().map(ToString::to_string))
}

/// Result of processing one document.
#[derive(Debug, Serialize)]
pub struct DocumentResult {
    pub path: PathBuf,
    pub outcome: DocumentOutcome,
    /// Whether the rewritten document should replace the original.
    pub changed: bool,
    /// Ids of rules that reported a change, in application order.
    pub rules_applied: Vec<SmolStr>,
    #[serde(serialize_with = "errors_as_strings")]
    pub errors: Vec<DocumentError>,
    /// Serialized text of a mutated document.
    #[serde(skip)]
    pub output: Option<String>,
}

impl DocumentResult {
    pub fn unchanged(path: PathBuf) -> Self {
        Self {
            path,
            outcome: DocumentOutcome::Unchanged,
            changed: false,
            rules_applied: Vec::new(),
            errors: Vec::new(),
            output: None,
        }
    }

    pub fn mutated(path: PathBuf, rules_applied: Vec<SmolStr>, output: String) -> Self {
        Self {
            path,
            outcome: DocumentOutcome::Mutated,
            changed: true,
            rules_applied,
            errors: Vec::new(),
            output: Some(output),
        }
    }

    /// A failed pass. Mutations are discarded; `rules_applied` is kept for
    /// auditing.
    pub fn failed(path: PathBuf, rules_applied: Vec<SmolStr>, error: DocumentError) -> Self {
        Self {
            path,
            outcome: DocumentOutcome::Failed,
            changed: false,
            rules_applied,
            errors: vec![error],
            output: None,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Counts over a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub errored: usize,
}

/// Ordered per-document results of a batch run.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub results: Vec<DocumentResult>,
}

impl BatchReport {
    pub fn new(results: Vec<DocumentResult>) -> Self {
        Self { results }
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.results.len(),
            ..Default::default()
        };
        for result in &self.results {
            match result.outcome {
                DocumentOutcome::Mutated => summary.changed += 1,
                DocumentOutcome::Unchanged => summary.unchanged += 1,
                DocumentOutcome::Failed => summary.errored += 1,
            }
        }
        summary
    }

    /// Results that carry errors.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentResult> {
        self.results.iter().filter(|r| r.has_errors())
    }

    /// Results whose output should be written back.
    pub fn changed(&self) -> impl Iterator<Item = &DocumentResult> {
        self.results
            .iter()
            .filter(|r| r.changed && !r.has_errors() && r.output.is_some())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Json<'a> {
            summary: BatchSummary,
            results: &'a [DocumentResult],
        }
        serde_json::to_string_pretty(&Json {
            summary: self.summary(),
            results: &self.results,
        })
    }
}
