//! Type synthesis.
//!
//! Turns a validated contract and its merged property list into a fresh
//! [`ImplementationType`]: one private write-once field per property, one
//! getter per property, one constructor taking the properties in merge order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use injection_types::{DeclarationSet, TypeName};
use tracing::debug;

use crate::config::BuilderConfig;
use crate::emit::{GeneratedSource, SourceEmitter};
use crate::error::{ConstructionError, ConstructionResult};
use crate::instance::{ContractInstance, Dependency};
use crate::types::{BatchId, ImplementationId, InjectionProperty};

// ── Implementation Type ────────────────────────────────────────────────

/// A private, write-once backing field of a synthesized type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackingField {
    /// Field name (`_<Property>`).
    pub name: String,
    /// Property the field backs.
    pub property: InjectionProperty,
    /// Service types a value may be supplied as: the declared type first, then
    /// every declared type deriving from it.
    pub accepts: Vec<TypeName>,
}

impl BackingField {
    /// Whether a value supplied as `service` may fill this field.
    pub fn admits(&self, service: &TypeName) -> bool {
        self.accepts.iter().any(|t| t == service)
    }
}

/// A synthesized implementation of one contract.
#[derive(Debug)]
pub struct ImplementationType {
    id: ImplementationId,
    batch: BatchId,
    name: String,
    contract: TypeName,
    conforms_to: Vec<TypeName>,
    fields: Vec<BackingField>,
    source: Option<GeneratedSource>,
    synthesized_at: DateTime<Utc>,
}

impl ImplementationType {
    /// Unique identity.
    pub fn id(&self) -> ImplementationId {
        self.id
    }

    /// Build call that produced this type.
    pub fn batch(&self) -> BatchId {
        self.batch
    }

    /// Fully qualified synthesized name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short synthesized name (last segment of [`name`](Self::name)).
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// The contract this type implements.
    pub fn contract(&self) -> &TypeName {
        &self.contract
    }

    /// Whether the type can be used as `ty`: the contract itself or any of its
    /// ancestors.
    pub fn implements(&self, ty: &TypeName) -> bool {
        self.conforms_to.iter().any(|t| t == ty)
    }

    /// Every type the implementation conforms to, contract first.
    pub fn conforms_to(&self) -> &[TypeName] {
        &self.conforms_to
    }

    /// Backing fields in constructor order.
    pub fn fields(&self) -> &[BackingField] {
        &self.fields
    }

    /// Properties in constructor order.
    pub fn properties(&self) -> impl Iterator<Item = &InjectionProperty> {
        self.fields.iter().map(|f| &f.property)
    }

    /// Number of constructor parameters.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Rendered Rust source, when the builder was configured to emit it.
    pub fn source(&self) -> Option<&GeneratedSource> {
        self.source.as_ref()
    }

    /// When the type was synthesized.
    pub fn synthesized_at(&self) -> DateTime<Utc> {
        self.synthesized_at
    }

    pub(crate) fn position(&self, property: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.property.name == property)
    }

    /// Run the synthesized constructor.
    ///
    /// `args` map 1:1, in merge order, to the properties. They are checked in
    /// that order and the first absent or mistyped value aborts construction;
    /// nothing is built unless every value is present.
    pub fn construct(
        self: &Arc<Self>,
        args: Vec<Option<Dependency>>,
    ) -> ConstructionResult<ContractInstance> {
        if args.len() != self.fields.len() {
            return Err(ConstructionError::ArityMismatch {
                implementation: self.name.clone(),
                expected: self.fields.len(),
                actual: args.len(),
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for (field, arg) in self.fields.iter().zip(args) {
            let property = &field.property;
            let value = arg.ok_or_else(|| ConstructionError::MissingDependency {
                property: property.name.clone(),
            })?;
            if !field.admits(value.service()) {
                return Err(ConstructionError::DependencyTypeMismatch {
                    property: property.name.clone(),
                    expected: property.ty.clone(),
                    actual: value.service().clone(),
                });
            }
            values.push(value);
        }

        Ok(ContractInstance::new(Arc::clone(self), values))
    }
}

// ── Synthesizer ────────────────────────────────────────────────────────

/// Synthesizes implementation types for one build call.
///
/// Every synthesizer mints its own batch identity and every synthesized type
/// its own implementation identity, so names never collide across calls.
pub struct Synthesizer {
    batch: BatchId,
    namespace: String,
    emitter: Option<SourceEmitter>,
}

impl Synthesizer {
    /// Create a synthesizer for types named under `prefix`.
    pub fn new(prefix: &str, config: &BuilderConfig) -> Self {
        let batch = BatchId::new();
        let namespace = format!("{}.{}_{}", prefix, config.namespace_segment.trim(), batch);
        Self {
            batch,
            namespace,
            emitter: config.emit_source.then(SourceEmitter::new),
        }
    }

    /// Batch identity of this build call.
    pub fn batch(&self) -> BatchId {
        self.batch
    }

    /// Namespace every synthesized type is placed in.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Synthesize the implementation of `contract`.
    ///
    /// `properties` must be the contract's validated merged property list.
    pub fn synthesize(
        &self,
        set: &DeclarationSet,
        contract: &TypeName,
        properties: Vec<InjectionProperty>,
    ) -> Arc<ImplementationType> {
        let id = ImplementationId::new();
        let name = format!("{}.{}_{}", self.namespace, contract.short_name(), id);

        let conforms_to = std::iter::once(contract.clone())
            .chain(set.ancestors(contract).into_iter().map(|d| d.name.clone()))
            .collect();

        let fields = properties
            .into_iter()
            .map(|property| BackingField {
                name: property.field_name(),
                accepts: assignable_to(set, &property.ty),
                property,
            })
            .collect();

        let mut implementation = ImplementationType {
            id,
            batch: self.batch,
            name,
            contract: contract.clone(),
            conforms_to,
            fields,
            source: None,
            synthesized_at: Utc::now(),
        };

        if let Some(emitter) = &self.emitter {
            implementation.source = Some(emitter.render(&implementation));
        }

        debug!(
            contract = %contract,
            implementation = %implementation.name,
            fields = implementation.fields.len(),
            "Synthesized implementation type"
        );

        Arc::new(implementation)
    }
}

/// `ty` and every declared type that derives from it.
fn assignable_to(set: &DeclarationSet, ty: &TypeName) -> Vec<TypeName> {
    std::iter::once(ty.clone())
        .chain(
            set.iter()
                .filter(|d| set.derives_from(&d.name, ty))
                .map(|d| d.name.clone()),
        )
        .collect()
}
