//! # reshape-base
//!
//! Core library for narrow, rule-driven rewrites of source-code and
//! configuration trees.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! pipeline  → Rule dispatch per document, batch report
//!   ↓
//! config    → Declarative configuration → validated RuleSet
//!   ↓
//! rules     → Rule trait, path scopes, built-in rule families
//!   ↓
//! report    → Change classification, name exclusion
//!   ↓
//! matching  → Renamed scopes, value equivalence, argument slots
//!   ↓
//! syntax    → Arena tree, codec boundary, YAML codec
//!   ↓
//! base      → Primitives (SymbolName, delimiters)
//! ```
//!
//! `project` sits beside `pipeline` and handles filesystem discovery and
//! write-back.

// ============================================================================
// MODULES (dependency order: base → syntax → matching → report → rules → config → pipeline)
// ============================================================================

/// Foundation types: SymbolName, delimiters
pub mod base;

/// Syntax: arena tree, node kinds, codecs
pub mod syntax;

/// Matching primitives used from rule bodies
pub mod matching;

/// Reporting consumers: classifier, exclude filter
pub mod report;

/// Rules and rule sets
pub mod rules;

/// Declarative configuration
pub mod config;

/// Rule dispatch pipeline
pub mod pipeline;

/// Filesystem discovery and write-back
pub mod project;

// Re-export foundation types
pub use base::{NameError, SymbolName, TextRange, TextSize};
pub use config::{ConfigError, Configuration, RulesConfig};
pub use pipeline::{BatchReport, Document, DocumentResult, Pipeline};
pub use syntax::{NodeId, NodeKind, Tree};
