//! Hierarchical symbol names.
//!
//! A [`SymbolName`] is a validated sequence of identifier segments joined by
//! [`NAME_DELIMITER`]. Names coming out of document trees are untrusted and
//! handled as plain `&str`; configuration is always validated into a
//! `SymbolName` before any document is processed.

use smol_str::SmolStr;
use std::fmt;
use thiserror::Error;

use super::constants::NAME_DELIMITER;

/// Reasons a string is rejected as a [`SymbolName`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("symbol name is empty")]
    Empty,

    #[error("symbol name `{name}` has an empty segment")]
    EmptySegment { name: String },

    #[error("symbol name `{name}` has an invalid segment `{segment}`")]
    InvalidSegment { name: String, segment: String },
}

/// A validated hierarchical name such as `App\Service\Mailer`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolName(SmolStr);

impl SymbolName {
    /// Parse and validate a name.
    ///
    /// One leading delimiter (the fully-qualified form `\App\Foo`) is
    /// stripped.
    pub fn parse(text: &str) -> Result<Self, NameError> {
        let trimmed = text.strip_prefix(NAME_DELIMITER).unwrap_or(text);
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        for segment in trimmed.split(NAME_DELIMITER) {
            if segment.is_empty() {
                return Err(NameError::EmptySegment {
                    name: text.to_string(),
                });
            }
            if !is_identifier(segment) {
                return Err(NameError::InvalidSegment {
                    name: text.to_string(),
                    segment: segment.to_string(),
                });
            }
        }
        Ok(Self(SmolStr::new(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate the segments of this name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(NAME_DELIMITER)
    }

    /// The last segment (`Mailer` for `App\Service\Mailer`).
    pub fn short_name(&self) -> &str {
        self.0
            .rsplit(NAME_DELIMITER)
            .next()
            .unwrap_or(self.0.as_str())
    }

    /// Whether this name is governed by `prefix` (see [`is_governed_by`]).
    pub fn is_governed_by(&self, prefix: &SymbolName) -> bool {
        is_governed_by(self.as_str(), prefix.as_str())
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SymbolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for SymbolName {
    type Error = NameError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::parse(text)
    }
}

/// `name` is governed by `prefix` when it equals `prefix` or continues it
/// past a full segment boundary. `App\Serv` does not govern `App\Service`.
pub fn is_governed_by(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(NAME_DELIMITER),
        None => false,
    }
}

/// Whether `segment` is a single identifier: XID_Start or `_`, then
/// XID_Continue.
pub fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}
