//! Property collection.
//!
//! Merges a contract's own properties with those of its ancestors and checks
//! each one: reference type, getter present, setter absent, name unique.
//! Duplicate names are always rejected, never shadowed.

use std::collections::HashMap;

use injection_types::{DeclarationSet, PropertyDecl, TypeDecl, TypeName};
use tracing::debug;

use crate::error::{ContractError, ContractResult};
use crate::types::InjectionProperty;

/// Collects and validates the merged property list of a contract.
#[derive(Clone, Copy, Debug)]
pub struct PropertyCollector {
    trace_properties: bool,
}

impl Default for PropertyCollector {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PropertyCollector {
    /// Create a collector. With `trace_properties`, each accepted property
    /// emits a debug record.
    pub fn new(trace_properties: bool) -> Self {
        Self { trace_properties }
    }

    /// Collect the merged property list of `contract`.
    ///
    /// Order: the contract's own properties, then each ancestor's, with direct
    /// ancestors first in declaration order.
    pub fn collect(
        &self,
        set: &DeclarationSet,
        contract: &TypeName,
    ) -> ContractResult<Vec<InjectionProperty>> {
        let own = set
            .get(contract)
            .ok_or_else(|| ContractError::UnknownType(contract.clone()))?;

        let declarers = std::iter::once(own).chain(set.ancestors(contract));

        let mut properties = Vec::new();
        let mut seen: HashMap<String, TypeName> = HashMap::new();

        for declarer in declarers {
            for property in &declarer.properties {
                let collected = self.check(set, contract, declarer, property, &seen)?;
                seen.insert(collected.name.clone(), collected.declared_by.clone());
                properties.push(collected);
            }
        }

        Ok(properties)
    }

    fn check(
        &self,
        set: &DeclarationSet,
        contract: &TypeName,
        declarer: &TypeDecl,
        property: &PropertyDecl,
        seen: &HashMap<String, TypeName>,
    ) -> ContractResult<InjectionProperty> {
        let is_reference = set
            .get(&property.ty)
            .is_some_and(TypeDecl::is_reference_type);
        if !is_reference {
            return Err(ContractError::ValueTypedProperty {
                property: property.name.clone(),
                declared_by: declarer.name.clone(),
            });
        }

        if !property.has_getter {
            return Err(ContractError::MissingGetter {
                property: property.name.clone(),
                declared_by: declarer.name.clone(),
            });
        }

        if property.has_setter {
            return Err(ContractError::SetterDefined {
                property: property.name.clone(),
                declared_by: declarer.name.clone(),
            });
        }

        if let Some(first) = seen.get(&property.name) {
            return Err(ContractError::DuplicateProperty {
                property: property.name.clone(),
                declared_by: declarer.name.clone(),
                first_declared_by: first.clone(),
                contract: contract.clone(),
            });
        }

        if self.trace_properties {
            debug!(
                property = %property.name,
                declared_by = %declarer.name,
                "Collected injection property"
            );
        }

        Ok(InjectionProperty {
            name: property.name.clone(),
            ty: property.ty.clone(),
            declared_by: declarer.name.clone(),
        })
    }
}
