//! Core types shared by the builder stages.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use injection_types::TypeName;

// ── Identifiers ────────────────────────────────────────────────────────

/// Identity of one build call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub Uuid);

impl BatchId {
    /// Mint a new batch identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Identity of one synthesized implementation.
///
/// Minted fresh for every synthesis, so two builds of the same contract never
/// share an implementation identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImplementationId(pub Uuid);

impl ImplementationId {
    /// Mint a new implementation identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImplementationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ImplementationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

// ── Properties ─────────────────────────────────────────────────────────

/// A validated dependency property of a contract's merged set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionProperty {
    /// Property name, unique within the merged set.
    pub name: String,
    /// Reference type of the dependency.
    #[serde(rename = "type")]
    pub ty: TypeName,
    /// Contract that declares the property.
    pub declared_by: TypeName,
}

impl InjectionProperty {
    /// Name of the private backing field for this property.
    pub fn field_name(&self) -> String {
        format!("_{}", self.name)
    }
}
