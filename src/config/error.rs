//! Error types for configuration loading.

use thiserror::Error;

use crate::base::NameError;
use crate::matching::{RenameError, ReplacementError};
use crate::rules::KeyRenameError;

/// Rejections raised while turning declarative configuration into rules.
///
/// All of these surface before any document is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML or JSON could not be deserialized.
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error while reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A symbol name failed validation.
    #[error("Invalid name in {context}: {source}")]
    Name {
        context: String,
        #[source]
        source: NameError,
    },

    #[error("Invalid rename table in rule `{rule}`: {source}")]
    Rename {
        rule: String,
        #[source]
        source: RenameError,
    },

    #[error("Invalid replacement in rule `{rule}`: {source}")]
    Replacement {
        rule: String,
        #[source]
        source: ReplacementError,
    },

    #[error("Invalid key rename in rule `{rule}`: {source}")]
    KeyRename {
        rule: String,
        #[source]
        source: KeyRenameError,
    },

    /// A glob or exclusion pattern did not compile.
    #[error("Invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Structural problems: empty or duplicate ids, empty rule bodies.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}

impl ConfigError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn invalid_rule(message: impl Into<String>) -> Self {
        Self::InvalidRule(message.into())
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    pub fn name(context: impl Into<String>, source: NameError) -> Self {
        Self::Name {
            context: context.into(),
            source,
        }
    }
}
