//! Type identity.

use serde::{Deserialize, Serialize};

/// Fully qualified name of the root marker interface.
///
/// Every injection contract derives from this interface, directly or through
/// other contracts. The marker itself declares nothing and is never collected
/// as a contract.
pub const ROOT_MARKER: &str = "injection.IInjectionContract";

/// Fully qualified, dot-separated identity of a declared type.
///
/// Nested declarations append their own name to the enclosing type's name
/// (`App.Widgets.Widget.IWidgetContract`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Create a type name from its fully qualified form.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The root marker's identity.
    pub fn root_marker() -> Self {
        Self(ROOT_MARKER.to_string())
    }

    /// Whether this names the root marker.
    pub fn is_root_marker(&self) -> bool {
        self.0 == ROOT_MARKER
    }

    /// Name of a type declared inside this one.
    pub fn nested(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    /// Last segment of the qualified name.
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last segment, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(ns, _)| ns)
    }

    /// The fully qualified name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
