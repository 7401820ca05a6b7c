//! Matching and rewriting primitives used from inside rule bodies.
//!
//! - [`RenameTable`] / [`RenameTable::match_renamed_namespace`] - scoped renames
//! - [`values_equal`] / [`ValueFolder`] - conservative value equivalence
//! - [`SignatureProvider`] - injected parameter-list lookup
//! - [`ArgumentSlotResolver`] / [`ArgumentRewriter`] - argument replacement

mod arguments;
mod names;
mod signature;
mod value;

pub use arguments::{
    ArgumentRewriter, ArgumentSlot, ArgumentSlotResolver, BindingKind, ReplacementError,
    ReplacementSpec, replace_argument,
};
pub use names::{RenameEntry, RenameError, RenameTable, ResolvedRename};
pub use signature::{
    CachingSignatureProvider, Parameter, SignatureProvider, StaticSignatureProvider,
};
pub use value::{ArgumentValue, ConstantTable, ValueFolder, materialize, values_equal};
