//! Contract discovery.
//!
//! Finds every injection contract declared in a set: interfaces deriving from
//! the root marker, other than the marker itself, and not nested inside an
//! abstract type. The nesting rule serves the base/derived component idiom:
//! an abstract base component's own contract is covered by the concrete
//! subtype's contract and is never built on its own.

use injection_types::{DeclarationSet, TypeDecl, TypeName};
use tracing::debug;

use crate::error::ContractResult;
use crate::purity::PurityValidator;

/// Discover contracts in declaration order.
///
/// Every candidate is checked for purity before it is accepted; the first
/// impure candidate aborts discovery.
pub fn discover_contracts(set: &DeclarationSet) -> ContractResult<Vec<TypeName>> {
    let mut contracts = Vec::new();

    for decl in set.iter() {
        if !is_candidate(set, decl) {
            continue;
        }
        PurityValidator::validate(set, &decl.name)?;
        debug!(contract = %decl.name, "Discovered injection contract");
        contracts.push(decl.name.clone());
    }

    Ok(contracts)
}

fn is_candidate(set: &DeclarationSet, decl: &TypeDecl) -> bool {
    if !decl.is_interface() || decl.name.is_root_marker() {
        return false;
    }
    if !set.derives_from_root(&decl.name) {
        return false;
    }
    match &decl.enclosing {
        Some(enclosing) => set.get(enclosing).is_some_and(|outer| !outer.is_abstract()),
        None => true,
    }
}
