//! Foundation types for the reshape toolchain.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`SymbolName`] - Validated hierarchical names (`App\Service\Mailer`)
//! - [`is_governed_by`] - Prefix-with-boundary test on raw names
//! - Domain constants (delimiters)
//!
//! This module has NO dependencies on other reshape modules.

pub mod constants;
mod name;

pub use name::{NameError, SymbolName, is_governed_by, is_identifier};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
