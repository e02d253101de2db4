//! Purity validation.
//!
//! A contract is pure when every interface in its ancestry is the root marker
//! or itself derives from the root marker. A foreign interface anywhere in the
//! ancestry would leave the synthesized type with members it cannot implement.

use injection_types::{DeclarationSet, TypeName};

use crate::error::{ContractError, ContractResult};

/// Validates contracts for purity.
pub struct PurityValidator;

impl PurityValidator {
    /// Validate a single contract.
    pub fn validate(set: &DeclarationSet, contract: &TypeName) -> ContractResult<()> {
        if !set.contains(contract) {
            return Err(ContractError::UnknownType(contract.clone()));
        }

        let foreign = set
            .ancestors(contract)
            .into_iter()
            .find(|a| !a.name.is_root_marker() && !set.derives_from_root(&a.name));

        match foreign {
            Some(ancestor) => Err(ContractError::ImpureContract {
                contract: contract.clone(),
                ancestor: ancestor.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Validate every contract in order, stopping at the first impure one.
    pub fn validate_all<'a>(
        set: &DeclarationSet,
        contracts: impl IntoIterator<Item = &'a TypeName>,
    ) -> ContractResult<()> {
        contracts
            .into_iter()
            .try_for_each(|contract| Self::validate(set, contract))
    }
}
