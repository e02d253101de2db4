//! Error types for the declaration model.

use thiserror::Error;

use crate::name::TypeName;

/// Errors raised while assembling a declaration set.
#[derive(Debug, Error)]
pub enum DeclarationError {
    /// The unit name is empty.
    #[error("declaration unit name must not be empty")]
    EmptyUnitName,

    /// Two declarations share a name.
    #[error("type <{0}> is declared more than once")]
    DuplicateType(TypeName),

    /// A declaration tried to redefine the root marker.
    #[error("type <{0}> is reserved and provided by every declaration set")]
    ReservedName(TypeName),

    /// A base, enclosing or property type is not declared in the set.
    #[error("type <{from}> refers to undeclared type <{reference}>")]
    UnresolvedReference {
        /// The declaration holding the reference.
        from: TypeName,
        /// The missing type.
        reference: TypeName,
    },

    /// A base list names something other than an interface.
    #[error("type <{ty}> extends <{base}>, which is not an interface")]
    NonInterfaceBase {
        /// The extending type.
        ty: TypeName,
        /// The offending base.
        base: TypeName,
    },

    /// The base-interface graph loops back on itself.
    #[error("inheritance cycle through <{0}>")]
    InheritanceCycle(TypeName),

    /// A manifest could not be parsed.
    #[error("invalid declaration manifest: {0}")]
    Manifest(String),
}

impl From<serde_json::Error> for DeclarationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Manifest(e.to_string())
    }
}

/// Convenience result type for declaration operations.
pub type DeclarationResult<T> = Result<T, DeclarationError>;
