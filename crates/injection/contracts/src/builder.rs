//! Registry builder: the entry points.
//!
//! Pipeline, run once per call:
//! 1. Check preconditions
//! 2. Discover contracts, or validate an explicit list (purity first)
//! 3. Collect and validate every contract's merged properties
//! 4. Synthesize one implementation per contract
//! 5. Assemble the registry
//!
//! Steps 2 and 3 complete for the whole batch before anything is synthesized,
//! so a structural defect in any contract yields an error and no output.

use std::collections::HashSet;

use injection_types::{DeclarationSet, TypeName};
use tracing::{info, warn};

use crate::collector::PropertyCollector;
use crate::config::BuilderConfig;
use crate::discovery::discover_contracts;
use crate::error::{ContractError, ContractResult};
use crate::purity::PurityValidator;
use crate::registry::ContractRegistry;
use crate::synthesizer::Synthesizer;

/// Builds injection contract implementations.
pub trait InjectionContractsBuilder: Send + Sync {
    /// Discover every contract in `set` and implement it.
    ///
    /// Synthesized names are prefixed with the set's unit name.
    fn build_from_set(&self, set: &DeclarationSet) -> ContractResult<ContractRegistry>;

    /// Implement an explicit list of contracts declared in `set`.
    ///
    /// `prefix` must not be empty. The whole list is checked for purity before
    /// any other work.
    fn build_from_list(
        &self,
        prefix: &str,
        set: &DeclarationSet,
        contracts: &[TypeName],
    ) -> ContractResult<ContractRegistry>;
}

/// The standard [`InjectionContractsBuilder`].
///
/// Holds only its configuration; concurrent calls share nothing.
#[derive(Clone, Debug, Default)]
pub struct ContractsBuilder {
    config: BuilderConfig,
}

impl ContractsBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn build_core(
        &self,
        prefix: &str,
        set: &DeclarationSet,
        contracts: &[TypeName],
    ) -> ContractResult<ContractRegistry> {
        if contracts.is_empty() {
            info!(prefix, "No injection contracts to build");
            return Ok(ContractRegistry::empty());
        }

        let collector = PropertyCollector::new(self.config.trace_properties);
        let plan = contracts
            .iter()
            .map(|contract| {
                collector
                    .collect(set, contract)
                    .map(|properties| (contract, properties))
            })
            .collect::<ContractResult<Vec<_>>>()?;

        let synthesizer = Synthesizer::new(prefix.trim(), &self.config);
        let mut registry = ContractRegistry::new(synthesizer.batch(), synthesizer.namespace());
        for (contract, properties) in plan {
            registry.insert(synthesizer.synthesize(set, contract, properties));
        }

        info!(
            batch = %synthesizer.batch(),
            namespace = synthesizer.namespace(),
            contracts = registry.len(),
            "Built injection contracts"
        );
        Ok(registry)
    }
}

impl InjectionContractsBuilder for ContractsBuilder {
    fn build_from_set(&self, set: &DeclarationSet) -> ContractResult<ContractRegistry> {
        self.config.validate()?;

        discover_contracts(set)
            .and_then(|contracts| self.build_core(set.unit_name(), set, &contracts))
            .inspect_err(|e| warn!(unit = set.unit_name(), error = %e, "Injection contract build aborted"))
    }

    fn build_from_list(
        &self,
        prefix: &str,
        set: &DeclarationSet,
        contracts: &[TypeName],
    ) -> ContractResult<ContractRegistry> {
        if prefix.trim().is_empty() {
            return Err(ContractError::Precondition(
                "name prefix must not be empty".into(),
            ));
        }
        self.config.validate()?;

        validate_list(set, contracts)
            .and_then(|()| self.build_core(prefix, set, contracts))
            .inspect_err(|e| warn!(prefix, error = %e, "Injection contract build aborted"))
    }
}

fn validate_list(set: &DeclarationSet, contracts: &[TypeName]) -> ContractResult<()> {
    if let Some(unknown) = contracts.iter().find(|c| !set.contains(c)) {
        return Err(ContractError::UnknownType(unknown.clone()));
    }

    PurityValidator::validate_all(set, contracts)?;

    let mut seen = HashSet::new();
    for contract in contracts {
        if !set.is_contract(contract) {
            return Err(ContractError::NotAContract(contract.clone()));
        }
        if !seen.insert(contract) {
            return Err(ContractError::DuplicateContract(contract.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{name, scenario_set, service_x, service_y};
    use injection_types::TypeDecl;

    fn pure_set() -> DeclarationSet {
        DeclarationSet::new(
            "App",
            vec![
                TypeDecl::interface("App.IServiceX"),
                TypeDecl::interface("App.IServiceY"),
                TypeDecl::contract("App.IBase").with_dependency("Dep", "App.IServiceX"),
                TypeDecl::interface("App.IDerived")
                    .extends("App.IBase")
                    .with_dependency("Extra", "App.IServiceY"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn build_from_set_discovers_everything() {
        let registry = ContractsBuilder::new().build_from_set(&pure_set()).unwrap();
        let contracts: Vec<_> = registry.contracts().cloned().collect();
        assert_eq!(contracts, vec![name("App.IBase"), name("App.IDerived")]);
        assert!(registry.namespace().unwrap().starts_with("App.InjectionContracts_"));
    }

    #[test]
    fn build_from_set_empty_yields_empty_registry() {
        let set = DeclarationSet::new("App", vec![TypeDecl::interface("App.IService")]).unwrap();
        let registry = ContractsBuilder::new().build_from_set(&set).unwrap();
        assert!(registry.is_empty());
        assert!(registry.batch().is_none());
    }

    #[test]
    fn build_from_set_impure_aborts_batch() {
        let err = ContractsBuilder::new().build_from_set(&scenario_set()).unwrap_err();
        assert!(matches!(
            err,
            ContractError::ImpureContract { contract, .. } if contract == name("App.IBad")
        ));
    }

    #[test]
    fn build_from_list_uses_prefix() {
        let registry = ContractsBuilder::new()
            .build_from_list("Custom.Prefix", &pure_set(), &[name("App.IDerived")])
            .unwrap();
        assert_eq!(registry.len(), 1);
        let implementation = registry.get(&name("App.IDerived")).unwrap();
        assert!(implementation.name().starts_with("Custom.Prefix.InjectionContracts_"));

        let instance = implementation
            .construct(vec![Some(service_y("y")), Some(service_x("x"))])
            .unwrap();
        assert_eq!(instance.values().count(), 2);
    }

    #[test]
    fn build_from_list_empty_prefix_rejected() {
        let err = ContractsBuilder::new()
            .build_from_list(" ", &pure_set(), &[name("App.IBase")])
            .unwrap_err();
        assert!(matches!(err, ContractError::Precondition(_)));
        assert_eq!(err.to_string(), "precondition failed: name prefix must not be empty");
    }

    #[test]
    fn build_from_list_empty_prefix_rejected_even_for_empty_list() {
        let err = ContractsBuilder::new()
            .build_from_list("", &pure_set(), &[])
            .unwrap_err();
        assert!(matches!(err, ContractError::Precondition(_)));
    }

    #[test]
    fn build_from_list_empty_list_yields_empty_registry() {
        let registry = ContractsBuilder::new()
            .build_from_list("App", &pure_set(), &[])
            .unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn build_from_list_purity_checked_before_anything_else() {
        // IBad is impure; the value-typed contract after it is never collected.
        let set = DeclarationSet::new(
            "App",
            vec![
                TypeDecl::interface("App.IForeign"),
                TypeDecl::value("App.Count"),
                TypeDecl::contract("App.IValue").with_dependency("Count", "App.Count"),
                TypeDecl::contract("App.IBad").extends("App.IForeign"),
            ],
        )
        .unwrap();
        let err = ContractsBuilder::new()
            .build_from_list("App", &set, &[name("App.IValue"), name("App.IBad")])
            .unwrap_err();
        assert!(matches!(
            err,
            ContractError::ImpureContract { contract, .. } if contract == name("App.IBad")
        ));
    }

    #[test]
    fn build_from_list_property_defect_aborts_batch() {
        let set = DeclarationSet::new(
            "App",
            vec![
                TypeDecl::interface("App.IS"),
                TypeDecl::value("App.Count"),
                TypeDecl::contract("App.IGood").with_dependency("S", "App.IS"),
                TypeDecl::contract("App.IValue").with_dependency("Count", "App.Count"),
            ],
        )
        .unwrap();
        let err = ContractsBuilder::new()
            .build_from_list("App", &set, &[name("App.IGood"), name("App.IValue")])
            .unwrap_err();
        assert!(matches!(err, ContractError::ValueTypedProperty { .. }));
    }

    #[test]
    fn build_from_list_rejects_unknown_names() {
        let err = ContractsBuilder::new()
            .build_from_list("App", &pure_set(), &[name("App.INope")])
            .unwrap_err();
        assert!(matches!(err, ContractError::UnknownType(_)));
    }

    #[test]
    fn build_from_list_rejects_non_contracts() {
        let err = ContractsBuilder::new()
            .build_from_list("App", &pure_set(), &[name("App.IServiceX")])
            .unwrap_err();
        assert!(matches!(err, ContractError::NotAContract(_)));

        let err = ContractsBuilder::new()
            .build_from_list("App", &pure_set(), &[TypeName::root_marker()])
            .unwrap_err();
        assert!(matches!(err, ContractError::NotAContract(_)));
    }

    #[test]
    fn build_from_list_rejects_duplicates() {
        let err = ContractsBuilder::new()
            .build_from_list("App", &pure_set(), &[name("App.IBase"), name("App.IBase")])
            .unwrap_err();
        assert!(matches!(err, ContractError::DuplicateContract(_)));
    }

    #[test]
    fn build_from_list_accepts_nested_in_abstract() {
        // The nesting rule only applies to discovery.
        let set = DeclarationSet::new(
            "App",
            vec![
                TypeDecl::abstract_class("App.Base"),
                TypeDecl::contract("App.Base.IContract").nested_in("App.Base"),
            ],
        )
        .unwrap();
        let registry = ContractsBuilder::new()
            .build_from_list("App", &set, &[name("App.Base.IContract")])
            .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn invalid_config_is_a_configuration_error() {
        let builder = ContractsBuilder::new().with_config(BuilderConfig {
            namespace_segment: String::new(),
            ..BuilderConfig::default()
        });
        let err = builder.build_from_set(&pure_set()).unwrap_err();
        assert!(matches!(err, ContractError::Configuration(_)));
    }

    #[test]
    fn custom_namespace_segment() {
        let builder = ContractsBuilder::new().with_config(BuilderConfig {
            namespace_segment: "Deps".into(),
            ..BuilderConfig::default()
        });
        let registry = builder.build_from_set(&pure_set()).unwrap();
        assert!(registry.namespace().unwrap().starts_with("App.Deps_"));
    }

    #[test]
    fn same_contract_twice_distinct_identities() {
        let builder = ContractsBuilder::new();
        let set = pure_set();
        let first = builder.build_from_set(&set).unwrap();
        let second = builder.build_from_set(&set).unwrap();
        let a = first.get(&name("App.IBase")).unwrap();
        let b = second.get(&name("App.IBase")).unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a.name(), b.name());
        assert!(a.construct(vec![Some(service_x("a"))]).is_ok());
        assert!(b.construct(vec![Some(service_x("b"))]).is_ok());
    }

    #[test]
    fn builder_is_usable_across_threads() {
        let builder = std::sync::Arc::new(ContractsBuilder::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let builder = std::sync::Arc::clone(&builder);
                std::thread::spawn(move || {
                    let registry = builder.build_from_set(&pure_set()).unwrap();
                    registry.get(&name("App.IBase")).unwrap().id()
                })
            })
            .collect();
        let ids: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ids.len(), 4);
    }
}
