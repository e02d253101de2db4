//! Type and property declarations.
//!
//! A [`TypeDecl`] is the metadata of one compiled type: its kind, where it is
//! nested, which interfaces it extends, and which properties it declares.

use serde::{Deserialize, Serialize};

use crate::name::TypeName;

// ── Kind ───────────────────────────────────────────────────────────────

/// Kind of a declared type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// An interface. Contracts are interfaces.
    Interface,
    /// A concrete class.
    Class,
    /// A class that cannot be instantiated on its own.
    AbstractClass,
    /// A type with value semantics (primitives, plain structs).
    Value,
}

impl TypeKind {
    /// Interfaces and abstract classes are abstract.
    pub fn is_abstract(self) -> bool {
        matches!(self, Self::Interface | Self::AbstractClass)
    }

    /// Everything except value types is handed around by reference.
    pub fn is_reference(self) -> bool {
        !matches!(self, Self::Value)
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interface => write!(f, "interface"),
            Self::Class => write!(f, "class"),
            Self::AbstractClass => write!(f, "abstract class"),
            Self::Value => write!(f, "value type"),
        }
    }
}

// ── Property ───────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

/// A property declared by a type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    /// Property name.
    pub name: String,
    /// Declared property type.
    #[serde(rename = "type")]
    pub ty: TypeName,
    /// Whether the property declares a getter.
    #[serde(default = "default_true")]
    pub has_getter: bool,
    /// Whether the property declares a setter.
    #[serde(default)]
    pub has_setter: bool,
}

impl PropertyDecl {
    /// A read-only property, the only shape a contract may declare.
    pub fn get_only(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            has_getter: true,
            has_setter: false,
        }
    }

    /// A property with both accessors.
    pub fn read_write(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            has_setter: true,
            ..Self::get_only(name, ty)
        }
    }

    /// A property with a setter only.
    pub fn write_only(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            has_getter: false,
            has_setter: true,
        }
    }
}

// ── Type ───────────────────────────────────────────────────────────────

/// Metadata of one declared type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Fully qualified name.
    pub name: TypeName,
    /// Kind of type.
    pub kind: TypeKind,
    /// Type this one is declared inside, if nested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing: Option<TypeName>,
    /// Directly extended interfaces, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<TypeName>,
    /// Declared properties, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDecl>,
}

impl TypeDecl {
    fn of_kind(name: impl Into<TypeName>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            enclosing: None,
            bases: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// A bare interface.
    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::of_kind(name, TypeKind::Interface)
    }

    /// An interface extending the root marker.
    pub fn contract(name: impl Into<TypeName>) -> Self {
        Self::interface(name).extends(TypeName::root_marker())
    }

    /// A concrete class.
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::of_kind(name, TypeKind::Class)
    }

    /// An abstract class.
    pub fn abstract_class(name: impl Into<TypeName>) -> Self {
        Self::of_kind(name, TypeKind::AbstractClass)
    }

    /// A value type.
    pub fn value(name: impl Into<TypeName>) -> Self {
        Self::of_kind(name, TypeKind::Value)
    }

    /// Add a directly extended interface.
    pub fn extends(mut self, base: impl Into<TypeName>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Mark the declaration as nested inside `enclosing`.
    pub fn nested_in(mut self, enclosing: impl Into<TypeName>) -> Self {
        self.enclosing = Some(enclosing.into());
        self
    }

    /// Declare a property.
    pub fn with_property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    /// Declare a get-only property.
    pub fn with_dependency(self, name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        self.with_property(PropertyDecl::get_only(name, ty))
    }

    /// Whether the type is an interface.
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Whether the type is abstract (interface or abstract class).
    pub fn is_abstract(&self) -> bool {
        self.kind.is_abstract()
    }

    /// Whether values of this type are references.
    pub fn is_reference_type(&self) -> bool {
        self.kind.is_reference()
    }
}
