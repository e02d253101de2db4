//! Run-time values: dependencies and constructed contract instances.

use std::any::Any;
use std::sync::Arc;

use injection_types::TypeName;

use crate::synthesizer::ImplementationType;
use crate::types::ImplementationId;

// ── Dependency ─────────────────────────────────────────────────────────

/// A shared dependency value, tagged with the service type it is supplied as.
///
/// The composition root supplies one dependency per constructor parameter.
/// Cloning shares the underlying value.
#[derive(Clone)]
pub struct Dependency {
    service: TypeName,
    value: Arc<dyn Any + Send + Sync>,
}

impl Dependency {
    /// Wrap `value` as an implementation of `service`.
    ///
    /// Trait-object services are usually wrapped as `Arc<dyn Service>` so the
    /// consumer can resolve them back under the same type.
    pub fn new<T>(service: impl Into<TypeName>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            service: service.into(),
            value: Arc::new(value),
        }
    }

    /// Service type this value is supplied as.
    pub fn service(&self) -> &TypeName {
        &self.service
    }

    /// Borrow the value as `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Whether both handles share the same underlying value.
    pub fn same_value(&self, other: &Dependency) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.value), Arc::as_ptr(&other.value))
    }
}

impl std::fmt::Debug for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

// ── Contract Instance ──────────────────────────────────────────────────

/// A fully constructed instance of a synthesized implementation.
///
/// Only [`ImplementationType::construct`] creates instances, and only after
/// every field has a value, so an instance is never partially populated.
/// There is no way to replace a value afterwards.
#[derive(Clone, Debug)]
pub struct ContractInstance {
    implementation: Arc<ImplementationType>,
    values: Box<[Dependency]>,
}

impl ContractInstance {
    pub(crate) fn new(implementation: Arc<ImplementationType>, values: Vec<Dependency>) -> Self {
        Self {
            implementation,
            values: values.into_boxed_slice(),
        }
    }

    /// The implementation this instance was constructed from.
    pub fn implementation(&self) -> &Arc<ImplementationType> {
        &self.implementation
    }

    /// Identity of the implementation.
    pub fn implementation_id(&self) -> ImplementationId {
        self.implementation.id()
    }

    /// The contract the instance satisfies.
    pub fn contract(&self) -> &TypeName {
        self.implementation.contract()
    }

    /// Whether the instance can be used as `ty`.
    pub fn implements(&self, ty: &TypeName) -> bool {
        self.implementation.implements(ty)
    }

    /// Getter for `property`.
    pub fn get(&self, property: &str) -> Option<&Dependency> {
        self.implementation
            .position(property)
            .map(|i| &self.values[i])
    }

    /// Getter for `property`, borrowed as `T`.
    pub fn resolve<T: Any>(&self, property: &str) -> Option<&T> {
        self.get(property).and_then(Dependency::downcast_ref::<T>)
    }

    /// Property values in constructor order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Dependency)> {
        self.implementation
            .properties()
            .map(|p| p.name.as_str())
            .zip(self.values.iter())
    }
}
