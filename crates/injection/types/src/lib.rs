//! # injection-types
//!
//! Declaration model for injection contracts.
//!
//! Rust has no run-time reflection, so the type hierarchy an injection
//! contract builder reasons about is described explicitly:
//!
//! - [`TypeName`]: fully qualified type identity
//! - [`TypeDecl`] / [`PropertyDecl`]: metadata of one declared type
//! - [`DeclarationSet`]: a self-contained, validated compiled unit
//!
//! Every set implicitly declares the root marker ([`ROOT_MARKER`]), the empty
//! interface all injection contracts extend.

#![deny(unsafe_code)]

pub mod decl;
pub mod error;
pub mod name;
pub mod set;

pub use decl::{PropertyDecl, TypeDecl, TypeKind};
pub use error::{DeclarationError, DeclarationResult};
pub use name::{TypeName, ROOT_MARKER};
pub use set::{DeclarationManifest, DeclarationSet};
