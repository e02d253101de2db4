//! Source emission.
//!
//! Renders a synthesized implementation as ordinary Rust: a struct holding one
//! `Arc<dyn Service>` per property, a `new` constructor that rejects the first
//! absent argument, and one trait impl per contract in the conformance list.
//! The output is what a hand-written implementation of the contract looks like,
//! for build steps that compile contracts ahead of time.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use injection_types::TypeName;
use serde::{Deserialize, Serialize};

use crate::synthesizer::ImplementationType;

/// Rendered source of one synthesized implementation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSource {
    /// Suggested file name (`<snake_contract>_<id>.rs`).
    pub file_name: String,
    /// Rust source text.
    pub content: String,
    /// blake3 hash of `content`, hex encoded.
    pub content_hash: String,
    /// When the source was rendered.
    pub generated_at: DateTime<Utc>,
}

impl GeneratedSource {
    /// Hash source text the way [`content_hash`](Self::content_hash) is computed.
    pub fn compute_hash(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// Whether the content still matches its hash.
    pub fn verify(&self) -> bool {
        Self::compute_hash(&self.content) == self.content_hash
    }

    /// Content size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

/// Module every rendered file imports the shared [`MissingDependency`] from.
///
/// [`MissingDependency`]: SourceEmitter::prelude
pub const PRELUDE_MODULE: &str = "injection_prelude";

/// Renders implementation types as Rust source.
///
/// Declared types are referenced by path, one module per namespace segment
/// (`App.Widgets.IService` is `crate::app::widgets::IService`). Getters take
/// the identifier of the field they return.
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceEmitter;

impl SourceEmitter {
    /// Create an emitter.
    pub fn new() -> Self {
        Self
    }

    /// Render the module shared by all rendered implementations.
    pub fn prelude(&self) -> GeneratedSource {
        let mut out = String::new();
        push(&mut out, 0, "//! Shared items for synthesized injection contract implementations.");
        push(&mut out, 0, "");
        push(&mut out, 0, "/// A constructor argument was absent; holds the property name.");
        push(&mut out, 0, "#[derive(Debug, Clone, Copy, PartialEq, Eq)]");
        push(&mut out, 0, "pub struct MissingDependency(pub &'static str);");
        generated(format!("{}.rs", PRELUDE_MODULE), out)
    }

    /// Render `implementation`.
    pub fn render(&self, implementation: &ImplementationType) -> GeneratedSource {
        let ty = implementation.short_name();
        let idents = field_idents(implementation.properties().map(|p| p.name.as_str()));
        let fields: Vec<(String, &str, String)> = implementation
            .properties()
            .zip(idents)
            .map(|(p, ident)| (ident, p.name.as_str(), rust_path(&p.ty)))
            .collect();

        let mut out = String::new();
        push(&mut out, 0, &format!("//! Synthesized implementation of `{}`.", implementation.contract()));
        push(&mut out, 0, "//!");
        push(&mut out, 0, &format!("//! Batch {}. Regenerate instead of editing.", implementation.batch()));
        push(&mut out, 0, "");
        push(&mut out, 0, "use std::sync::Arc;");
        push(&mut out, 0, "");
        push(&mut out, 0, &format!("use crate::{}::MissingDependency;", PRELUDE_MODULE));
        push(&mut out, 0, "");

        // Struct
        push(&mut out, 0, "#[allow(non_camel_case_types)]");
        push(&mut out, 0, &format!("pub struct {} {{", ty));
        for (field, _, service) in &fields {
            push(&mut out, 1, &format!("{}: Arc<dyn {}>,", field, service));
        }
        push(&mut out, 0, "}");
        push(&mut out, 0, "");

        // Constructor
        push(&mut out, 0, &format!("impl {} {{", ty));
        if fields.is_empty() {
            push(&mut out, 1, "pub fn new() -> Result<Self, MissingDependency> {");
        } else {
            push(&mut out, 1, "pub fn new(");
            for (field, _, service) in &fields {
                push(&mut out, 2, &format!("{}: Option<Arc<dyn {}>>,", field, service));
            }
            push(&mut out, 1, ") -> Result<Self, MissingDependency> {");
        }
        for (field, property, _) in &fields {
            push(
                &mut out,
                2,
                &format!("let {0} = {0}.ok_or(MissingDependency(\"{1}\"))?;", field, property),
            );
        }
        let initializers: Vec<&str> = fields.iter().map(|(f, _, _)| f.as_str()).collect();
        if initializers.is_empty() {
            push(&mut out, 2, "Ok(Self {})");
        } else {
            push(&mut out, 2, &format!("Ok(Self {{ {} }})", initializers.join(", ")));
        }
        push(&mut out, 1, "}");
        push(&mut out, 0, "}");

        // One impl per conformed contract, each with the getters it declares.
        for contract in implementation.conforms_to() {
            let getters: Vec<_> = implementation
                .properties()
                .zip(&fields)
                .filter(|(p, _)| &p.declared_by == contract)
                .map(|(_, f)| f)
                .collect();
            let contract = rust_path(contract);

            push(&mut out, 0, "");
            if getters.is_empty() {
                push(&mut out, 0, &format!("impl {} for {} {{}}", contract, ty));
                continue;
            }
            push(&mut out, 0, &format!("impl {} for {} {{", contract, ty));
            for (i, (field, _, service)) in getters.iter().enumerate() {
                if i > 0 {
                    push(&mut out, 0, "");
                }
                push(&mut out, 1, &format!("fn {}(&self) -> &Arc<dyn {}> {{", field, service));
                push(&mut out, 2, &format!("&self.{}", field));
                push(&mut out, 1, "}");
            }
            push(&mut out, 0, "}");
        }

        let file_name = format!(
            "{}_{}.rs",
            to_snake_case(implementation.contract().short_name()),
            implementation.id()
        );
        generated(file_name, out)
    }
}

fn generated(file_name: String, content: String) -> GeneratedSource {
    let content_hash = GeneratedSource::compute_hash(&content);
    GeneratedSource {
        file_name,
        content,
        content_hash,
        generated_at: Utc::now(),
    }
}

fn push(out: &mut String, indent: usize, line: &str) {
    if !line.is_empty() {
        for _ in 0..indent {
            out.push_str("    ");
        }
        out.push_str(line);
    }
    out.push('\n');
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield",
];

/// Keywords that cannot be raw identifiers.
const PATH_KEYWORDS: &[&str] = &["self", "super", "crate"];

/// snake_case identifier for a name: raw-escaped if it is a keyword,
/// suffixed with `_` if it is a path keyword.
fn rust_ident(name: &str) -> String {
    let snake = to_snake_case(name);
    if PATH_KEYWORDS.contains(&snake.as_str()) {
        format!("{}_", snake)
    } else if KEYWORDS.contains(&snake.as_str()) {
        format!("r#{}", snake)
    } else {
        snake
    }
}

/// One distinct identifier per property, in order.
///
/// Names that collide once snake-cased keep the first identifier; later ones
/// take their position as a suffix.
fn field_idents<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    let mut out = Vec::new();
    for (i, name) in names.into_iter().enumerate() {
        let base = rust_ident(name);
        let mut ident = base.clone();
        let mut suffix = i;
        while taken.contains(&ident) {
            ident = format!("{}_{}", base.trim_start_matches("r#"), suffix);
            suffix += 1;
        }
        taken.insert(ident.clone());
        out.push(ident);
    }
    out
}

/// `crate::` path of a declared type.
fn rust_path(ty: &TypeName) -> String {
    let mut path = String::from("crate");
    if let Some(namespace) = ty.namespace() {
        for segment in namespace.split('.') {
            path.push_str("::");
            path.push_str(&rust_ident(segment));
        }
    }
    path.push_str("::");
    path.push_str(ty.short_name());
    path
}

/// `DependencyForBase` → `dependency_for_base`, `IServiceX` → `i_service_x`,
/// `HTTPClient` → `http_client`.
fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::PropertyCollector;
    use crate::config::BuilderConfig;
    use crate::synthesizer::Synthesizer;
    use crate::testing::{name, scenario_set};
    use injection_types::{DeclarationSet, TypeDecl};
    use std::sync::Arc;

    fn emitted_from(set: &DeclarationSet, contract: &str) -> (Arc<ImplementationType>, GeneratedSource) {
        let contract = name(contract);
        let properties = PropertyCollector::default().collect(set, &contract).unwrap();
        let implementation =
            Synthesizer::new("App", &BuilderConfig::default()).synthesize(set, &contract, properties);
        let source = SourceEmitter::new().render(&implementation);
        (implementation, source)
    }

    fn emitted(contract: &str) -> (Arc<ImplementationType>, GeneratedSource) {
        emitted_from(&scenario_set(), contract)
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("DependencyForBase"), "dependency_for_base");
        assert_eq!(to_snake_case("IServiceX"), "i_service_x");
        assert_eq!(to_snake_case("MyService1"), "my_service1");
        assert_eq!(to_snake_case("HTTPClient"), "http_client");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn keywords_are_escaped() {
        assert_eq!(rust_ident("Type"), "r#type");
        assert_eq!(rust_ident("Logger"), "logger");
    }

    #[test]
    fn path_keywords_get_plain_identifiers() {
        assert_eq!(rust_ident("Self"), "self_");
        assert_eq!(rust_ident("Super"), "super_");
        assert_eq!(rust_ident("Crate"), "crate_");
    }

    #[test]
    fn colliding_names_get_distinct_identifiers() {
        let idents = field_idents(["HttpClient", "HTTPClient", "Self", "Self_", "Type", "type"]);
        assert_eq!(
            idents,
            vec!["http_client", "http_client_1", "self_", "self__3", "r#type", "type_5"]
        );
    }

    #[test]
    fn type_paths_follow_namespaces() {
        assert_eq!(rust_path(&name("App.IServiceX")), "crate::app::IServiceX");
        assert_eq!(
            rust_path(&name("Components.WidgetBase.IWidgetBaseContract")),
            "crate::components::widget_base::IWidgetBaseContract"
        );
        assert_eq!(rust_path(&name("Loose")), "crate::Loose");
    }

    #[test]
    fn renders_struct_constructor_and_getter() {
        let (implementation, source) = emitted("App.IBase");
        let ty = implementation.short_name();
        assert!(source.content.contains("use crate::injection_prelude::MissingDependency;"));
        assert!(!source.content.contains("pub struct MissingDependency"));
        assert!(source.content.contains(&format!("pub struct {} {{", ty)));
        assert!(source.content.contains("    dep: Arc<dyn crate::app::IServiceX>,"));
        assert!(source
            .content
            .contains("        dep: Option<Arc<dyn crate::app::IServiceX>>,"));
        assert!(source
            .content
            .contains("let dep = dep.ok_or(MissingDependency(\"Dep\"))?;"));
        assert!(source.content.contains(&format!("impl crate::app::IBase for {} {{", ty)));
        assert!(source
            .content
            .contains("    fn dep(&self) -> &Arc<dyn crate::app::IServiceX> {"));
        assert!(source
            .content
            .contains(&format!("impl crate::injection::IInjectionContract for {} {{}}", ty)));
    }

    #[test]
    fn case_colliding_and_reserved_properties_render_distinctly() {
        let set = DeclarationSet::new(
            "App",
            vec![
                TypeDecl::interface("App.IService"),
                TypeDecl::contract("App.IC")
                    .with_dependency("HttpClient", "App.IService")
                    .with_dependency("HTTPClient", "App.IService")
                    .with_dependency("Self", "App.IService"),
            ],
        )
        .unwrap();
        let (_, source) = emitted_from(&set, "App.IC");
        let content = &source.content;

        assert_eq!(content.matches("    http_client: Arc<dyn crate::app::IService>,").count(), 1);
        assert_eq!(content.matches("    http_client_1: Arc<dyn crate::app::IService>,").count(), 1);
        assert!(content.contains("    self_: Arc<dyn crate::app::IService>,"));
        assert!(content.contains("let http_client_1 = http_client_1.ok_or(MissingDependency(\"HTTPClient\"))?;"));
        assert!(content.contains("let self_ = self_.ok_or(MissingDependency(\"Self\"))?;"));
        assert!(content.contains("Ok(Self { http_client, http_client_1, self_ })"));
        assert_eq!(content.matches("fn http_client(&self)").count(), 1);
        assert_eq!(content.matches("fn http_client_1(&self)").count(), 1);
        assert!(!content.contains(" self:"));
    }

    #[test]
    fn same_short_names_in_different_namespaces_stay_apart() {
        let set = DeclarationSet::new(
            "App",
            vec![
                TypeDecl::interface("App.Left.IService"),
                TypeDecl::interface("App.Right.IService"),
                TypeDecl::contract("App.Left.IC").with_dependency("Dep", "App.Left.IService"),
                TypeDecl::contract("App.Right.IC").with_dependency("Dep", "App.Right.IService"),
            ],
        )
        .unwrap();
        let (left, left_source) = emitted_from(&set, "App.Left.IC");
        let (right, right_source) = emitted_from(&set, "App.Right.IC");

        assert!(left_source.content.contains("dep: Arc<dyn crate::app::left::IService>,"));
        assert!(right_source.content.contains("dep: Arc<dyn crate::app::right::IService>,"));
        assert!(left_source
            .content
            .contains(&format!("impl crate::app::left::IC for {} {{", left.short_name())));
        assert!(right_source
            .content
            .contains(&format!("impl crate::app::right::IC for {} {{", right.short_name())));
        assert_ne!(left_source.file_name, right_source.file_name);
    }

    #[test]
    fn prelude_declares_missing_dependency_once() {
        let prelude = SourceEmitter::new().prelude();
        assert_eq!(prelude.file_name, "injection_prelude.rs");
        assert_eq!(prelude.content.matches("pub struct MissingDependency").count(), 1);
        assert!(prelude.verify());
    }

    #[test]
    fn inherited_getters_go_to_declaring_contract() {
        let (implementation, source) = emitted("App.IDerived");
        let ty = implementation.short_name();
        let derived = source
            .content
            .find(&format!("impl crate::app::IDerived for {}", ty))
            .unwrap();
        let base = source.content.find(&format!("impl crate::app::IBase for {}", ty)).unwrap();
        let extra_getter = source.content.find("fn extra(&self)").unwrap();
        let dep_getter = source.content.find("fn dep(&self)").unwrap();
        assert!(derived < extra_getter && extra_getter < base);
        assert!(base < dep_getter);
        assert!(source.content.contains("Ok(Self { extra, dep })"));
    }

    #[test]
    fn hash_and_file_name() {
        let (implementation, source) = emitted("App.IBase");
        assert!(source.verify());
        assert_eq!(source.content_hash.len(), 64);
        assert_eq!(source.file_name, format!("i_base_{}.rs", implementation.id()));
    }

    #[test]
    fn tampered_source_fails_verification() {
        let (_, mut source) = emitted("App.IBase");
        source.content.push_str("// edited\n");
        assert!(!source.verify());
    }
}
