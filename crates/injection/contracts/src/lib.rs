//! # injection-contracts
//!
//! **Contract Synthesis Engine.**
//!
//! An injection contract is an interface extending the root marker and
//! declaring nothing but get-only, reference-typed dependency properties. A
//! component asks for its dependencies by taking one contract in its
//! constructor; this crate validates contracts and synthesizes, for each, a
//! concrete implementation whose single constructor accepts the dependencies
//! and rejects the first missing one.
//!
//! ## Architecture
//!
//! ```text
//! DeclarationSet                       (prefix, [TypeName])
//!     │                                        │
//!     ▼                                        ▼
//! discover_contracts ── purity ──┐   PurityValidator::validate_all
//!                                ▼             │
//!                        PropertyCollector ◄───┘
//!                                │
//!                                ▼
//!                           Synthesizer ──► SourceEmitter (optional)
//!                                │
//!                                ▼
//!                        ContractRegistry (contract → ImplementationType)
//! ```
//!
//! The registry is handed to a composition root, which constructs instances
//! with [`ImplementationType::construct`], supplying one [`Dependency`] per
//! constructor parameter.

#![deny(unsafe_code)]

pub mod builder;
pub mod collector;
pub mod config;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod instance;
pub mod purity;
pub mod registry;
pub mod synthesizer;
pub mod types;

#[cfg(test)]
mod testing;

// Re-exports
pub use builder::{ContractsBuilder, InjectionContractsBuilder};
pub use collector::PropertyCollector;
pub use config::BuilderConfig;
pub use discovery::discover_contracts;
pub use emit::{GeneratedSource, SourceEmitter, PRELUDE_MODULE};
pub use error::{ConstructionError, ConstructionResult, ContractError, ContractResult};
pub use instance::{ContractInstance, Dependency};
pub use purity::PurityValidator;
pub use registry::{BindingManifest, ContractRegistry, RegistryManifest};
pub use synthesizer::{BackingField, ImplementationType, Synthesizer};
pub use types::{BatchId, ImplementationId, InjectionProperty};

pub use injection_types::{
    DeclarationError, DeclarationSet, PropertyDecl, TypeDecl, TypeKind, TypeName, ROOT_MARKER,
};
