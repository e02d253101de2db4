//! Error types for contract building and construction.

use injection_types::{DeclarationError, TypeName};
use thiserror::Error;

/// Errors that abort a build call.
///
/// Every variant is an authoring or calling defect: a failed build never
/// returns a partial registry.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A required argument is missing or empty.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// A contract name does not resolve in the declaration set.
    #[error("type <{0}> is not declared")]
    UnknownType(TypeName),

    /// A contract extends an interface that is not an injection contract.
    #[error(
        "interface <{contract}> contains another interface in its hierarchy, which is not an injection contract descendant (<{ancestor}>)"
    )]
    ImpureContract {
        /// The offending contract.
        contract: TypeName,
        /// The foreign ancestor.
        ancestor: TypeName,
    },

    /// An explicitly listed type is not an injection contract.
    #[error("type <{0}> is not an injection contract")]
    NotAContract(TypeName),

    /// An explicitly listed contract appears more than once.
    #[error("contract <{0}> is listed more than once")]
    DuplicateContract(TypeName),

    /// A property has value semantics.
    #[error("injection property with name '{property}' in <{declared_by}> must be of a reference type")]
    ValueTypedProperty {
        /// Property name.
        property: String,
        /// Declaring contract.
        declared_by: TypeName,
    },

    /// A property has no getter.
    #[error("no property getter defined for {property} in <{declared_by}>")]
    MissingGetter {
        /// Property name.
        property: String,
        /// Declaring contract.
        declared_by: TypeName,
    },

    /// A property declares a setter.
    #[error("excess property setter defined for {property} in <{declared_by}>")]
    SetterDefined {
        /// Property name.
        property: String,
        /// Declaring contract.
        declared_by: TypeName,
    },

    /// Two properties in one contract's merged set share a name.
    #[error(
        "duplicate injection property with name '{property}' in <{declared_by}> (first declared in <{first_declared_by}>) for <{contract}>"
    )]
    DuplicateProperty {
        /// Property name.
        property: String,
        /// Contract declaring the repeat.
        declared_by: TypeName,
        /// Contract that declared the name first.
        first_declared_by: TypeName,
        /// Contract being collected.
        contract: TypeName,
    },

    /// The declaration model is malformed.
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// Builder configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Convenience result type for build operations.
pub type ContractResult<T> = Result<T, ContractError>;

/// Errors raised by a synthesized constructor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstructionError {
    /// Wrong number of constructor arguments.
    #[error("<{implementation}> expects {expected} constructor arguments, got {actual}")]
    ArityMismatch {
        /// Implementation being constructed.
        implementation: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// An argument was absent.
    #[error("value cannot be null (parameter '{property}')")]
    MissingDependency {
        /// The first property without a value.
        property: String,
    },

    /// An argument was supplied under the wrong service type.
    #[error("parameter '{property}' expects <{expected}>, got <{actual}>")]
    DependencyTypeMismatch {
        /// Property name.
        property: String,
        /// Declared property type.
        expected: TypeName,
        /// Service type of the supplied value.
        actual: TypeName,
    },
}

/// Convenience result type for construction.
pub type ConstructionResult<T> = Result<T, ConstructionError>;
