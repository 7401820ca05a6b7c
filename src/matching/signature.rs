//! Declared parameter lists for callees.
//!
//! Slot resolution never inspects code it is not given. Parameter names come
//! from an injected [`SignatureProvider`]; "unresolvable" is an ordinary
//! answer and makes positional resolution a non-match.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::sync::Arc;

/// One declared parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: SmolStr,
    pub position: usize,
}

/// Answers "what are the declared parameters of `method` on `callee`".
pub trait SignatureProvider: Send + Sync {
    /// Ordered parameters, or `None` when the signature is unknown.
    fn resolve_parameters(&self, callee: &str, method: &str) -> Option<Arc<[Parameter]>>;
}

type SignatureKey = (SmolStr, SmolStr);

fn key(callee: &str, method: &str) -> SignatureKey {
    (
        SmolStr::new(callee.trim_start_matches(crate::base::constants::NAME_DELIMITER)),
        SmolStr::new(method),
    )
}

/// Signatures declared up front, typically from configuration.
#[derive(Clone, Debug, Default)]
pub struct StaticSignatureProvider {
    signatures: FxHashMap<SignatureKey, Arc<[Parameter]>>,
}

impl StaticSignatureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the parameters of `callee::method` in order.
    pub fn declare<I, S>(&mut self, callee: &str, method: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let params: Arc<[Parameter]> = names
            .into_iter()
            .enumerate()
            .map(|(position, name)| Parameter {
                name: name.into(),
                position,
            })
            .collect();
        self.signatures.insert(key(callee, method), params);
    }

    pub fn with<I, S>(mut self, callee: &str, method: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.declare(callee, method, names);
        self
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl SignatureProvider for StaticSignatureProvider {
    fn resolve_parameters(&self, callee: &str, method: &str) -> Option<Arc<[Parameter]>> {
        self.signatures.get(&key(callee, method)).cloned()
    }
}

/// Memoizes an expensive provider. Negative answers are cached as well.
pub struct CachingSignatureProvider<P> {
    inner: P,
    cache: RwLock<FxHashMap<SignatureKey, Option<Arc<[Parameter]>>>>,
}

impl<P: SignatureProvider> CachingSignatureProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Number of memoized lookups, hits and misses alike.
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }
}

impl<P: SignatureProvider> SignatureProvider for CachingSignatureProvider<P> {
    fn resolve_parameters(&self, callee: &str, method: &str) -> Option<Arc<[Parameter]>> {
        let k = key(callee, method);
        if let Some(hit) = self.cache.read().get(&k) {
            return hit.clone();
        }
        let answer = self.inner.resolve_parameters(callee, method);
        self.cache.write().insert(k, answer.clone());
        answer
    }
}
