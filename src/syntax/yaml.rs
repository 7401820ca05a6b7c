//! YAML configuration documents as trees.
//!
//! Mappings become `Mapping` nodes whose children are `Entry { key }` nodes,
//! each wrapping exactly one value. Mapping order is preserved in both
//! directions, so an unchanged tree re-serializes to equivalent YAML.
//! Boolean and numeric keys keep their type unless a rule renames them.

use serde_yaml::{Mapping, Number, Value};
use std::path::Path;

use super::codec::{CodecError, DocumentCodec};
use super::kind::{NodeKind, Scalar};
use super::tree::{NodeId, Tree};

/// [`DocumentCodec`] for YAML configuration files.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn load(&self, path: &Path, text: &str) -> Result<Tree, CodecError> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| CodecError::syntax(format!("{}: {e}", path.display())))?;
        value_to_tree(&value)
    }

    fn write(&self, _path: &Path, tree: &Tree) -> Result<String, CodecError> {
        let value = node_to_value(tree, tree.root())?;
        serde_yaml::to_string(&value).map_err(|e| CodecError::malformed(e.to_string()))
    }
}

/// Convert a YAML value into a tree rooted at that value.
pub fn value_to_tree(value: &Value) -> Result<Tree, CodecError> {
    let mut tree = Tree::new(kind_of(value)?);
    let root = tree.root();
    fill_children(&mut tree, root, value)?;
    Ok(tree)
}

fn kind_of(value: &Value) -> Result<NodeKind, CodecError> {
    Ok(match value {
        Value::Null => NodeKind::Null,
        Value::Bool(b) => NodeKind::Literal(Scalar::Bool(*b)),
        Value::Number(n) => NodeKind::Literal(number_to_scalar(n)?),
        Value::String(s) => NodeKind::Literal(Scalar::str(s.as_str())),
        Value::Sequence(_) => NodeKind::Sequence,
        Value::Mapping(_) => NodeKind::Mapping,
        Value::Tagged(tagged) => {
            return Err(CodecError::unsupported(format!(
                "tagged value {}",
                tagged.tag
            )));
        }
    })
}

fn number_to_scalar(n: &Number) -> Result<Scalar, CodecError> {
    if let Some(i) = n.as_i64() {
        Ok(Scalar::Int(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Scalar::UInt(u))
    } else {
        n.as_f64()
            .map(Scalar::Float)
            .ok_or_else(|| CodecError::unsupported(format!("number {n}")))
    }
}

fn scalar_to_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Int(i) => Value::Number((*i).into()),
        Scalar::UInt(u) => Value::Number((*u).into()),
        Scalar::Float(x) => Value::Number((*x).into()),
        Scalar::Str(s) => Value::String(s.to_string()),
    }
}

fn fill_children(tree: &mut Tree, parent: NodeId, value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Mapping(map) => {
            for (key, item) in map {
                let entry = tree.append(
                    parent,
                    NodeKind::Entry {
                        key: key_text(key)?.into(),
                    },
                );
                tree.attrs_mut(entry).typed_key = typed_key(key)?;
                let child = tree.append(entry, kind_of(item)?);
                fill_children(tree, child, item)?;
            }
        }
        Value::Sequence(items) => {
            for item in items {
                let child = tree.append(parent, kind_of(item)?);
                fill_children(tree, child, item)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn key_text(key: &Value) -> Result<String, CodecError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(CodecError::unsupported(format!(
            "non-scalar mapping key {other:?}"
        ))),
    }
}

fn typed_key(key: &Value) -> Result<Option<Scalar>, CodecError> {
    match key {
        Value::Bool(b) => Ok(Some(Scalar::Bool(*b))),
        Value::Number(n) => number_to_scalar(n).map(Some),
        _ => Ok(None),
    }
}

/// The YAML key for `entry`. A typed key is restored only while its text
/// still matches the entry's current key.
fn key_value(tree: &Tree, entry: NodeId, key: &str) -> Value {
    match &tree[entry].attrs.typed_key {
        Some(scalar) => {
            let typed = scalar_to_value(scalar);
            match key_text(&typed) {
                Ok(text) if text == key => typed,
                _ => Value::String(key.to_string()),
            }
        }
        None => Value::String(key.to_string()),
    }
}

/// Convert the subtree at `id` back into a YAML value.
pub fn node_to_value(tree: &Tree, id: NodeId) -> Result<Value, CodecError> {
    Ok(match tree.kind(id) {
        NodeKind::Null => Value::Null,
        NodeKind::Literal(scalar) => scalar_to_value(scalar),
        NodeKind::Sequence => Value::Sequence(
            tree.children(id)
                .iter()
                .map(|&child| node_to_value(tree, child))
                .collect::<Result<_, _>>()?,
        ),
        NodeKind::Mapping => {
            let mut map = Mapping::new();
            for &entry in tree.children(id) {
                let NodeKind::Entry { key } = tree.kind(entry) else {
                    return Err(CodecError::malformed(format!(
                        "mapping child is a {} node",
                        tree.kind(entry).tag()
                    )));
                };
                let value = tree
                    .only_child(entry)
                    .ok_or_else(|| CodecError::malformed(format!("entry `{key}` has no value")))?;
                map.insert(key_value(tree, entry, key), node_to_value(tree, value)?);
            }
            Value::Mapping(map)
        }
        other => {
            return Err(CodecError::unsupported(format!(
                "{} node in a configuration tree",
                other.tag()
            )));
        }
    })
}
