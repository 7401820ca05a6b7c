//! Parser/serializer boundary.
//!
//! Concrete grammars live outside this crate. A [`DocumentCodec`] turns
//! document text into a [`Tree`] and back; the pipeline only talks to this
//! trait.

use std::path::Path;
use thiserror::Error;

use super::tree::Tree;

/// Errors raised while loading or re-serializing a document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The document text could not be parsed.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// The document uses a construct this codec does not represent.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The tree handed to the serializer is not well formed.
    #[error("Malformed tree: {0}")]
    Malformed(String),
}

impl CodecError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Loads documents into trees and serializes mutated trees.
pub trait DocumentCodec: Send + Sync {
    fn load(&self, path: &Path, text: &str) -> Result<Tree, CodecError>;

    fn write(&self, path: &Path, tree: &Tree) -> Result<String, CodecError>;
}
