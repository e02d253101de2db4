//! A minimal composition root for the integration tests.
//!
//! Binds each contract in a registry to its synthesized implementation and
//! resolves contract instances by supplying one registered service per
//! constructor parameter.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Once};

use injection_contracts::{
    ConstructionError, ContractInstance, ContractRegistry, Dependency, ImplementationType, TypeName,
};

static TRACING: Once = Once::new();

/// Route engine logs to the test writer (`RUST_LOG=debug` to see them).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug)]
pub enum ResolveError {
    UnboundContract(TypeName),
    Construction(ConstructionError),
}

#[derive(Default)]
pub struct Container {
    bindings: HashMap<TypeName, Arc<ImplementationType>>,
    services: HashMap<TypeName, Dependency>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// One binding per contract, contract → implementation.
    pub fn register_registry(&mut self, registry: &ContractRegistry) {
        for (contract, implementation) in registry {
            self.bindings.insert(contract.clone(), Arc::clone(implementation));
        }
    }

    /// Register a single-instance service.
    pub fn register_service(&mut self, service: Dependency) {
        self.services.insert(service.service().clone(), service);
    }

    pub fn resolve(&self, contract: &TypeName) -> Result<ContractInstance, ResolveError> {
        let implementation = self
            .bindings
            .get(contract)
            .ok_or_else(|| ResolveError::UnboundContract(contract.clone()))?;
        let args = implementation
            .properties()
            .map(|p| self.services.get(&p.ty).cloned())
            .collect();
        implementation.construct(args).map_err(ResolveError::Construction)
    }
}
