//! Serde schema of the declarative rule configuration.
//!
//! ```yaml
//! constants:
//!   "App\\Mode::LEGACY": "old"
//! signatures:
//!   - callee: "App\\Client"
//!     method: connect
//!     parameters: [host, mode]
//! exclude: ["*\\Tests\\*"]
//! rules:
//!   - id: mail-namespace
//!     kind: rename_namespace
//!     paths: ["src/**/*.php"]
//!     renames:
//!       "Old\\Mail": "New\\Mail"
//!   - id: client-mode
//!     kind: replace_argument
//!     replacements:
//!       - { callee: "App\\Client", method: connect, arg: mode, old: old, new: new }
//!   - id: session-handler
//!     kind: rename_config_key
//!     paths: ["config/**/*.yaml"]
//!     keys:
//!       framework.session.handler_id: handler
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use crate::matching::ArgumentValue;
use crate::syntax::Scalar;

/// Top-level configuration document.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default)]
    pub constants: IndexMap<String, RawValue>,
    #[serde(default)]
    pub signatures: Vec<SignatureConfig>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Declared parameter list of one method.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureConfig {
    pub callee: String,
    pub method: String,
    pub parameters: Vec<String>,
}

/// One rule entry. `kind` selects the body.
///
/// Unknown keys are rejected, as is a body key that belongs to another
/// kind: a misspelled `paths` must not silently widen a rule's scope.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "RawRuleConfig")]
pub struct RuleConfig {
    pub id: String,
    pub paths: Vec<String>,
    pub body: RuleBody,
}

#[derive(Clone, Debug)]
pub enum RuleBody {
    RenameNamespace {
        renames: IndexMap<String, String>,
    },
    ReplaceArgument {
        replacements: Vec<ReplacementConfig>,
    },
    RenameConfigKey {
        keys: IndexMap<String, String>,
    },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RuleKind {
    RenameNamespace,
    ReplaceArgument,
    RenameConfigKey,
}

/// Wire form of [`RuleConfig`]: every body key is optional here and
/// checked against `kind` on conversion.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRuleConfig {
    id: String,
    kind: RuleKind,
    #[serde(default)]
    paths: Vec<String>,
    renames: Option<IndexMap<String, String>>,
    replacements: Option<Vec<ReplacementConfig>>,
    keys: Option<IndexMap<String, String>>,
}

impl TryFrom<RawRuleConfig> for RuleConfig {
    type Error = String;

    fn try_from(raw: RawRuleConfig) -> Result<Self, Self::Error> {
        let RawRuleConfig {
            id,
            kind,
            paths,
            renames,
            replacements,
            keys,
        } = raw;
        let body = match (kind, renames, replacements, keys) {
            (RuleKind::RenameNamespace, Some(renames), None, None) => {
                RuleBody::RenameNamespace { renames }
            }
            (RuleKind::ReplaceArgument, None, Some(replacements), None) => {
                RuleBody::ReplaceArgument { replacements }
            }
            (RuleKind::RenameConfigKey, None, None, Some(keys)) => RuleBody::RenameConfigKey { keys },
            (kind, ..) => {
                let expected = match kind {
                    RuleKind::RenameNamespace => "renames",
                    RuleKind::ReplaceArgument => "replacements",
                    RuleKind::RenameConfigKey => "keys",
                };
                return Err(format!(
                    "rule `{id}` must set `{expected}` and no other rule body"
                ));
            }
        };
        Ok(Self { id, paths, body })
    }
}

impl RuleBody {
    pub fn kind(&self) -> &'static str {
        match self {
            RuleBody::RenameNamespace { .. } => "rename_namespace",
            RuleBody::ReplaceArgument { .. } => "replace_argument",
            RuleBody::RenameConfigKey { .. } => "rename_config_key",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplacementConfig {
    pub callee: String,
    pub method: String,
    pub arg: String,
    pub old: RawValue,
    pub new: RawValue,
}

/// A configured value: scalar, null or list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    List(Vec<RawValue>),
}

impl From<&RawValue> for ArgumentValue {
    fn from(raw: &RawValue) -> Self {
        match raw {
            RawValue::Null => ArgumentValue::Null,
            RawValue::Bool(b) => ArgumentValue::Scalar(Scalar::Bool(*b)),
            RawValue::Int(i) => ArgumentValue::Scalar(Scalar::Int(*i)),
            RawValue::UInt(u) => ArgumentValue::Scalar(Scalar::UInt(*u)),
            RawValue::Float(x) => ArgumentValue::Scalar(Scalar::Float(*x)),
            RawValue::Str(s) => ArgumentValue::str(s.as_str()),
            RawValue::List(items) => ArgumentValue::Array(items.iter().map(Into::into).collect()),
        }
    }
}
