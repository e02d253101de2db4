//! Shared fixtures for unit tests.

use std::sync::Arc;

use injection_types::{DeclarationSet, TypeDecl, TypeName};

use crate::instance::Dependency;

pub(crate) fn name(s: &str) -> TypeName {
    TypeName::new(s)
}

pub(crate) trait ServiceX: Send + Sync {
    fn label(&self) -> &str;
}

pub(crate) struct LabelledX(pub &'static str);

impl ServiceX for LabelledX {
    fn label(&self) -> &str {
        self.0
    }
}

/// A dependency supplied as `App.IServiceX`.
pub(crate) fn service_x(label: &'static str) -> Dependency {
    let value: Arc<dyn ServiceX> = Arc::new(LabelledX(label));
    Dependency::new("App.IServiceX", value)
}

/// A dependency supplied as `App.IServiceY`.
pub(crate) fn service_y(value: &'static str) -> Dependency {
    Dependency::new("App.IServiceY", value.to_string())
}

/// `IBase { Dep: IServiceX }`, `IDerived: IBase { Extra: IServiceY }`, and
/// `IBad`, a contract that also extends the foreign `IForeign`.
pub(crate) fn scenario_set() -> DeclarationSet {
    DeclarationSet::new(
        "App",
        vec![
            TypeDecl::interface("App.IServiceX"),
            TypeDecl::interface("App.IServiceY"),
            TypeDecl::interface("App.IForeign"),
            TypeDecl::value("App.Count"),
            TypeDecl::contract("App.IBase").with_dependency("Dep", "App.IServiceX"),
            TypeDecl::interface("App.IDerived")
                .extends("App.IBase")
                .with_dependency("Extra", "App.IServiceY"),
            TypeDecl::contract("App.IBad")
                .extends("App.IForeign")
                .with_dependency("Dep", "App.IServiceX"),
        ],
    )
    .expect("scenario set is coherent")
}
