//! Declaration sets.
//!
//! A [`DeclarationSet`] is the metadata of one compiled unit: every type it
//! declares, in authoring order, plus the root marker. Construction checks that
//! the set is self-contained and that its inheritance graph is a DAG, so the
//! traversal helpers here never meet a dangling reference or a loop.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::decl::TypeDecl;
use crate::error::{DeclarationError, DeclarationResult};
use crate::name::TypeName;

/// Serialized form of a declaration set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeclarationManifest {
    /// Name of the declaring unit.
    pub unit_name: String,
    /// Declared types, excluding the root marker.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

/// A validated, self-contained set of type declarations.
#[derive(Clone, Debug)]
pub struct DeclarationSet {
    unit_name: String,
    decls: Vec<TypeDecl>,
    index: HashMap<TypeName, usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl DeclarationSet {
    /// Assemble a declaration set.
    ///
    /// The root marker is added automatically and must not be declared.
    pub fn new(
        unit_name: impl Into<String>,
        decls: impl IntoIterator<Item = TypeDecl>,
    ) -> DeclarationResult<Self> {
        let unit_name = unit_name.into();
        if unit_name.trim().is_empty() {
            return Err(DeclarationError::EmptyUnitName);
        }

        let mut set = Self {
            unit_name,
            decls: vec![TypeDecl::interface(TypeName::root_marker())],
            index: HashMap::new(),
        };
        set.index.insert(TypeName::root_marker(), 0);

        for decl in decls {
            if decl.name.is_root_marker() {
                return Err(DeclarationError::ReservedName(decl.name));
            }
            if set.index.contains_key(&decl.name) {
                return Err(DeclarationError::DuplicateType(decl.name));
            }
            set.index.insert(decl.name.clone(), set.decls.len());
            set.decls.push(decl);
        }

        set.check_references()?;
        set.check_acyclic()?;
        Ok(set)
    }

    /// Parse a JSON manifest and assemble the set it describes.
    pub fn from_json(json: &str) -> DeclarationResult<Self> {
        let manifest: DeclarationManifest = serde_json::from_str(json)?;
        Self::from_manifest(manifest)
    }

    /// Assemble a set from an already parsed manifest.
    pub fn from_manifest(manifest: DeclarationManifest) -> DeclarationResult<Self> {
        Self::new(manifest.unit_name, manifest.types)
    }

    /// Manifest describing this set.
    pub fn to_manifest(&self) -> DeclarationManifest {
        DeclarationManifest {
            unit_name: self.unit_name.clone(),
            types: self.decls.iter().skip(1).cloned().collect(),
        }
    }

    /// Name of the declaring unit.
    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    /// Look up a declaration.
    pub fn get(&self, name: &TypeName) -> Option<&TypeDecl> {
        self.index.get(name).map(|&i| &self.decls[i])
    }

    /// Whether `name` is declared (the root marker always is).
    pub fn contains(&self, name: &TypeName) -> bool {
        self.index.contains_key(name)
    }

    /// Declarations in authoring order, root marker first.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.iter()
    }

    /// Number of declarations, including the root marker.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// A set always holds at least the root marker.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The root marker declaration.
    pub fn root_marker(&self) -> &TypeDecl {
        &self.decls[0]
    }

    /// Every interface `name` extends, directly or transitively.
    ///
    /// Direct bases come first in declaration order, then their bases level by
    /// level. Each ancestor appears once even when reachable along several
    /// paths. Unknown names have no ancestors.
    pub fn ancestors(&self, name: &TypeName) -> Vec<&TypeDecl> {
        let mut out = Vec::new();
        let mut seen: HashSet<&TypeName> = HashSet::new();
        let mut queue: VecDeque<&TypeName> = VecDeque::new();

        if let Some(decl) = self.get(name) {
            queue.extend(decl.bases.iter());
        }
        while let Some(base) = queue.pop_front() {
            if !seen.insert(base) {
                continue;
            }
            if let Some(decl) = self.get(base) {
                out.push(decl);
                queue.extend(decl.bases.iter());
            }
        }
        out
    }

    /// Whether `name` extends `ancestor`, directly or transitively.
    pub fn derives_from(&self, name: &TypeName, ancestor: &TypeName) -> bool {
        self.ancestors(name).iter().any(|d| &d.name == ancestor)
    }

    /// Whether `name` extends the root marker, directly or transitively.
    pub fn derives_from_root(&self, name: &TypeName) -> bool {
        self.derives_from(name, &TypeName::root_marker())
    }

    /// Whether `name` is an injection contract: an interface other than the
    /// root marker that derives from it.
    pub fn is_contract(&self, name: &TypeName) -> bool {
        match self.get(name) {
            Some(decl) => {
                decl.is_interface() && !name.is_root_marker() && self.derives_from_root(name)
            }
            None => false,
        }
    }

    fn check_references(&self) -> DeclarationResult<()> {
        for decl in &self.decls {
            let unresolved = |reference: &TypeName| DeclarationError::UnresolvedReference {
                from: decl.name.clone(),
                reference: reference.clone(),
            };

            for base in &decl.bases {
                let base_decl = self.get(base).ok_or_else(|| unresolved(base))?;
                if !base_decl.is_interface() {
                    return Err(DeclarationError::NonInterfaceBase {
                        ty: decl.name.clone(),
                        base: base.clone(),
                    });
                }
            }

            if let Some(enclosing) = &decl.enclosing {
                if !self.contains(enclosing) {
                    return Err(unresolved(enclosing));
                }
            }

            for property in &decl.properties {
                if !self.contains(&property.ty) {
                    return Err(unresolved(&property.ty));
                }
            }
        }
        Ok(())
    }

    fn check_acyclic(&self) -> DeclarationResult<()> {
        let mut marks: HashMap<&TypeName, Mark> = HashMap::new();
        for decl in &self.decls {
            self.visit(&decl.name, &mut marks)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        name: &'a TypeName,
        marks: &mut HashMap<&'a TypeName, Mark>,
    ) -> DeclarationResult<()> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(DeclarationError::InheritanceCycle(name.clone())),
            None => {}
        }
        marks.insert(name, Mark::Visiting);
        if let Some(decl) = self.get(name) {
            for base in &decl.bases {
                self.visit(base, marks)?;
            }
        }
        marks.insert(name, Mark::Done);
        Ok(())
    }
}
