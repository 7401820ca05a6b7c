//! Consumers for the comparison/reporting stage.
//!
//! Both are independent of the rewrite pipeline:
//! - [`classify`] - reduce a [`DiffFact`] to a [`ChangeLabel`]
//! - [`ExcludeFilter`] - drop excluded names from lists and dependency maps

mod classify;
mod exclude;

pub use classify::{ChangeLabel, ChangeTally, DiffFact, classify};
pub use exclude::ExcludeFilter;
