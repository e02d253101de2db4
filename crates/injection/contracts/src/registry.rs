//! Contract registry.
//!
//! The ordered contract → implementation mapping one build call hands to the
//! composition root.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use injection_types::TypeName;
use serde::Serialize;

use crate::emit::{GeneratedSource, SourceEmitter};
use crate::synthesizer::ImplementationType;
use crate::types::{BatchId, ImplementationId};

/// Ordered mapping from contract to synthesized implementation.
#[derive(Clone, Debug, Default)]
pub struct ContractRegistry {
    batch: Option<BatchId>,
    namespace: Option<String>,
    entries: Vec<Arc<ImplementationType>>,
    index: HashMap<TypeName, usize>,
    built_at: Option<DateTime<Utc>>,
}

impl ContractRegistry {
    /// A registry produced by a build that found nothing to synthesize.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(batch: BatchId, namespace: impl Into<String>) -> Self {
        Self {
            batch: Some(batch),
            namespace: Some(namespace.into()),
            entries: Vec::new(),
            index: HashMap::new(),
            built_at: Some(Utc::now()),
        }
    }

    /// Bind a contract. Contracts are unique within one build.
    pub(crate) fn insert(&mut self, implementation: Arc<ImplementationType>) {
        let contract = implementation.contract().clone();
        debug_assert!(
            !self.index.contains_key(&contract),
            "contract <{contract}> bound twice in one build"
        );
        self.index.insert(contract, self.entries.len());
        self.entries.push(implementation);
    }

    /// Batch identity of the build, if anything was synthesized.
    pub fn batch(&self) -> Option<BatchId> {
        self.batch
    }

    /// Namespace holding the synthesized types, if anything was synthesized.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// When the registry was built, if anything was synthesized.
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    /// Implementation bound to `contract`.
    pub fn get(&self, contract: &TypeName) -> Option<&Arc<ImplementationType>> {
        self.index.get(contract).map(|&i| &self.entries[i])
    }

    /// Whether `contract` is bound.
    pub fn contains(&self, contract: &TypeName) -> bool {
        self.index.contains_key(contract)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bindings in synthesis order.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeName, &Arc<ImplementationType>)> {
        self.entries.iter().map(|i| (i.contract(), i))
    }

    /// Bound contracts in synthesis order.
    pub fn contracts(&self) -> impl Iterator<Item = &TypeName> {
        self.entries.iter().map(|i| i.contract())
    }

    /// Rendered source of every binding, led by the shared prelude module.
    ///
    /// Empty unless the build was configured to emit source.
    pub fn sources(&self) -> Vec<GeneratedSource> {
        let rendered: Vec<GeneratedSource> = self
            .entries
            .iter()
            .filter_map(|i| i.source().cloned())
            .collect();
        if rendered.is_empty() {
            return rendered;
        }
        std::iter::once(SourceEmitter::new().prelude())
            .chain(rendered)
            .collect()
    }

    /// Serializable description of every binding.
    pub fn manifest(&self) -> RegistryManifest {
        RegistryManifest {
            batch: self.batch,
            namespace: self.namespace.clone(),
            bindings: self
                .entries
                .iter()
                .map(|i| BindingManifest {
                    contract: i.contract().clone(),
                    implementation: i.name().to_string(),
                    implementation_id: i.id(),
                    parameters: i.properties().map(|p| p.name.clone()).collect(),
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ContractRegistry {
    type Item = (&'a TypeName, &'a Arc<ImplementationType>);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Serializable summary of a registry.
#[derive(Clone, Debug, Serialize)]
pub struct RegistryManifest {
    /// Batch identity of the build.
    pub batch: Option<BatchId>,
    /// Namespace of the synthesized types.
    pub namespace: Option<String>,
    /// One entry per binding, in synthesis order.
    pub bindings: Vec<BindingManifest>,
}

/// Serializable summary of one binding.
#[derive(Clone, Debug, Serialize)]
pub struct BindingManifest {
    /// Bound contract.
    pub contract: TypeName,
    /// Synthesized type name.
    pub implementation: String,
    /// Synthesized type identity.
    pub implementation_id: ImplementationId,
    /// Constructor parameters in order.
    pub parameters: Vec<String>,
}
