//! Document trees and the parser/serializer boundary.
//!
//! - [`Tree`], [`NodeId`], [`Node`] - arena tree with index links
//! - [`NodeKind`], [`Scalar`] - closed set of node kinds
//! - [`TreeBuilder`] - fluent construction
//! - [`DocumentCodec`] - external parser/serializer interface
//! - [`YamlCodec`] - codec for YAML configuration documents

mod codec;
mod kind;
mod tree;
pub mod yaml;

pub use codec::{CodecError, DocumentCodec};
pub use kind::{NodeKind, Scalar};
pub use tree::{Attributes, Node, NodeId, Tree, TreeBuilder};
pub use yaml::YamlCodec;
