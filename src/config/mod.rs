//! Declarative rule configuration.
//!
//! [`RulesConfig`] is the raw serde form, loaded from YAML or JSON.
//! [`RulesConfig::build`] validates it into a [`Configuration`]: an ordered
//! [`RuleSet`], an [`ExcludeFilter`] and the shared constant and signature
//! tables. Every invalid entry is rejected here, before any document is
//! processed.

mod error;
mod schema;

pub use error::ConfigError;
pub use schema::{RawValue, ReplacementConfig, RuleBody, RuleConfig, RulesConfig, SignatureConfig};

use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::Arc;

use crate::base::constants::MEMBER_DELIMITER;
use crate::base::{SymbolName, is_identifier};
use crate::matching::{
    ArgumentValue, ConstantTable, RenameEntry, RenameTable, ReplacementSpec, SignatureProvider,
    StaticSignatureProvider,
};
use crate::report::ExcludeFilter;
use crate::rules::{
    KeyRename, PathScope, RenameConfigKeyRule, RenameNamespaceRule, ReplaceArgumentRule, RuleSet,
    ScopedRule,
};

/// Validated, immutable configuration shared by every document pass.
#[derive(Debug)]
pub struct Configuration {
    pub rules: RuleSet,
    pub exclude: ExcludeFilter,
    pub constants: Arc<ConstantTable>,
}

impl RulesConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|e| ConfigError::parse(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::parse(e.to_string()))
    }

    /// Read a configuration file, choosing the format by extension
    /// (`.json` is JSON, anything else YAML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            _ => Self::from_yaml(&text),
        }
    }

    /// Validate and build using the signatures declared in this file.
    pub fn build(&self) -> Result<Configuration, ConfigError> {
        let signatures = Arc::new(self.signature_table()?);
        self.build_with(signatures)
    }

    /// Validate and build, answering signature lookups from `signatures`
    /// instead of the `signatures` section.
    pub fn build_with(
        &self,
        signatures: Arc<dyn SignatureProvider>,
    ) -> Result<Configuration, ConfigError> {
        let constants = Arc::new(self.constant_table()?);

        let exclude = ExcludeFilter::new(&self.exclude)
            .map_err(|e| ConfigError::invalid_pattern(self.exclude.join(", "), e))?;

        let mut seen = FxHashSet::default();
        let mut rules = RuleSet::new();
        for rule in &self.rules {
            let id = rule.id.trim();
            if id.is_empty() {
                return Err(ConfigError::invalid_rule(format!(
                    "a {} rule has an empty id",
                    rule.body.kind()
                )));
            }
            if !seen.insert(id.to_string()) {
                return Err(ConfigError::invalid_rule(format!("duplicate rule id `{id}`")));
            }
            let scope = PathScope::new(&rule.paths)
                .map_err(|e| ConfigError::invalid_pattern(rule.paths.join(", "), e))?;
            rules.push(build_rule(id, scope, &rule.body, &constants, &signatures)?);
        }

        tracing::debug!(
            "built {} rule(s), {} constant(s), {} exclude pattern(s)",
            rules.len(),
            constants.len(),
            exclude.patterns().len()
        );

        Ok(Configuration {
            rules,
            exclude,
            constants,
        })
    }

    fn signature_table(&self) -> Result<StaticSignatureProvider, ConfigError> {
        let mut provider = StaticSignatureProvider::new();
        for sig in &self.signatures {
            let callee = SymbolName::parse(&sig.callee)
                .map_err(|e| ConfigError::name("signatures", e))?;
            if !is_identifier(&sig.method) {
                return Err(ConfigError::invalid_rule(format!(
                    "signature of `{callee}` has invalid method `{}`",
                    sig.method
                )));
            }
            if let Some(bad) = sig.parameters.iter().find(|p| !is_identifier(p)) {
                return Err(ConfigError::invalid_rule(format!(
                    "signature of `{callee}::{}` has invalid parameter `{bad}`",
                    sig.method
                )));
            }
            provider.declare(callee.as_str(), &sig.method, sig.parameters.iter().map(String::as_str));
        }
        Ok(provider)
    }

    fn constant_table(&self) -> Result<ConstantTable, ConfigError> {
        let mut table = ConstantTable::new();
        for (name, value) in &self.constants {
            let key = normalize_constant_name(name)?;
            table.insert(key, ArgumentValue::from(value));
        }
        Ok(table)
    }
}

/// `\App\Mode::LEGACY` → `App\Mode::LEGACY`; global constants are plain
/// (possibly namespaced) names.
fn normalize_constant_name(name: &str) -> Result<String, ConfigError> {
    match name.rsplit_once(MEMBER_DELIMITER) {
        Some((class, member)) => {
            let class = SymbolName::parse(class).map_err(|e| ConfigError::name("constants", e))?;
            if !is_identifier(member) {
                return Err(ConfigError::invalid_rule(format!(
                    "constant `{name}` has invalid member `{member}`"
                )));
            }
            Ok(format!("{class}{MEMBER_DELIMITER}{member}"))
        }
        None => SymbolName::parse(name)
            .map(|n| n.to_string())
            .map_err(|e| ConfigError::name("constants", e)),
    }
}

fn build_rule(
    id: &str,
    scope: PathScope,
    body: &RuleBody,
    constants: &Arc<ConstantTable>,
    signatures: &Arc<dyn SignatureProvider>,
) -> Result<ScopedRule, ConfigError> {
    Ok(match body {
        RuleBody::RenameNamespace { renames } => {
            if renames.is_empty() {
                return Err(ConfigError::invalid_rule(format!("rule `{id}` has no renames")));
            }
            let entries = renames
                .iter()
                .map(|(old, new)| {
                    let context = format!("rule `{id}`");
                    Ok(RenameEntry {
                        old_name: SymbolName::parse(old)
                            .map_err(|e| ConfigError::name(context.clone(), e))?,
                        new_name: SymbolName::parse(new)
                            .map_err(|e| ConfigError::name(context, e))?,
                    })
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            let table = RenameTable::new(entries).map_err(|source| ConfigError::Rename {
                rule: id.to_string(),
                source,
            })?;
            ScopedRule::new(scope, RenameNamespaceRule::new(id, table))
        }
        RuleBody::ReplaceArgument { replacements } => {
            if replacements.is_empty() {
                return Err(ConfigError::invalid_rule(format!(
                    "rule `{id}` has no replacements"
                )));
            }
            let specs = replacements
                .iter()
                .map(|r| {
                    let callee = SymbolName::parse(&r.callee)
                        .map_err(|e| ConfigError::name(format!("rule `{id}`"), e))?;
                    ReplacementSpec::new(
                        callee,
                        &r.method,
                        &r.arg,
                        ArgumentValue::from(&r.old),
                        ArgumentValue::from(&r.new),
                    )
                    .map_err(|source| ConfigError::Replacement {
                        rule: id.to_string(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            ScopedRule::new(
                scope,
                ReplaceArgumentRule::new(id, specs, constants.clone(), signatures.clone()),
            )
        }
        RuleBody::RenameConfigKey { keys } => {
            if keys.is_empty() {
                return Err(ConfigError::invalid_rule(format!("rule `{id}` has no keys")));
            }
            let renames = keys
                .iter()
                .map(|(path, new_key)| {
                    KeyRename::new(path, new_key).map_err(|source| ConfigError::KeyRename {
                        rule: id.to_string(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            ScopedRule::new(scope, RenameConfigKeyRule::new(id, renames))
        }
    })
}
