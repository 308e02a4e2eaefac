//! The process-wide registry of candidate types.
//!
//! Built once at startup from a configured set of module manifests, read-only
//! afterward. A re-scan publishes a freshly built catalog atomically through
//! [`CatalogHandle`], so in-flight requests never observe a half-built one.

pub mod manifest;
pub mod signature;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::catalog::manifest::{scan_modules, ModuleManifest, TypeManifest};
use crate::catalog::signature::{
    is_injected_type, MethodSignature, ScalarKind, SignatureKey, INJECTED_PARAMETER_TYPES,
};
use crate::config::CatalogConfig;

/// A loaded type, keyed by its fully-qualified name.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub module: String,
    pub shape: TypeShape,
}

#[derive(Debug, Clone)]
pub enum TypeShape {
    /// Structured value type with named fields.
    Record { fields: Vec<FieldDef> },
    /// Homogeneous sequence of a named element type.
    List { element: String },
    /// Callable type; its methods feed the signature index.
    Service { methods: Vec<MethodSignature> },
    /// Host-injected type; resolvable by name but never a coercion target.
    Opaque,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
}

/// A type name resolved through the catalog.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedType<'a> {
    Scalar(ScalarKind),
    Entry(&'a CatalogEntry),
}

/// Immutable catalog of types and the signature index derived from them.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    entries: HashMap<String, CatalogEntry>,
    signatures: HashMap<SignatureKey, MethodSignature>,
    modules: Vec<String>,
}

impl TypeCatalog {
    /// Build a catalog from loaded manifests.
    ///
    /// Two phases: all type entries are inserted first (duplicate
    /// fully-qualified names resolve first-registered-module-wins), then each
    /// service method is enumerated once into the signature index. A method
    /// whose parameter type name does not itself resolve is left out of the
    /// index and logged.
    #[must_use]
    pub fn build(manifests: Vec<ModuleManifest>) -> Self {
        let mut entries: HashMap<String, CatalogEntry> = HashMap::new();

        for name in INJECTED_PARAMETER_TYPES {
            entries.insert(
                name.to_string(),
                CatalogEntry {
                    name: name.to_string(),
                    module: "host".to_string(),
                    shape: TypeShape::Opaque,
                },
            );
        }

        let mut modules = Vec::with_capacity(manifests.len());
        for manifest in &manifests {
            modules.push(manifest.name.clone());
            for declared in &manifest.types {
                let entry = CatalogEntry {
                    name: declared.name().to_string(),
                    module: manifest.name.clone(),
                    shape: shape_of(declared),
                };
                if ScalarKind::from_str(declared.name()).is_ok()
                    || entries.contains_key(declared.name())
                {
                    warn!(
                        type_name = declared.name(),
                        module = %manifest.name,
                        "type name already registered, first registration wins"
                    );
                    continue;
                }
                entries.insert(entry.name.clone(), entry);
            }
        }

        let mut catalog = Self {
            entries,
            signatures: HashMap::new(),
            modules,
        };
        catalog.signatures = catalog.index_signatures();
        catalog
    }

    /// Catalog with only the built-in scalar and host-injected types.
    #[must_use]
    pub fn builtin() -> Self {
        Self::build(Vec::new())
    }

    fn index_signatures(&self) -> HashMap<SignatureKey, MethodSignature> {
        let mut index = HashMap::new();
        for entry in self.entries.values() {
            let TypeShape::Service { methods } = &entry.shape else {
                continue;
            };
            for method in methods {
                let unresolvable: Vec<&str> = method
                    .parameters
                    .iter()
                    .map(|p| p.type_name.as_str())
                    .filter(|name| !self.is_valid_type(name))
                    .collect();
                if !unresolvable.is_empty() {
                    warn!(
                        type_name = %entry.name,
                        method = %method.name,
                        parameter_types = ?unresolvable,
                        "method references unknown parameter types, not indexed"
                    );
                    continue;
                }
                let key = SignatureKey::new(
                    &entry.name,
                    &method.name,
                    &method.parameter_type_names(),
                );
                index.entry(key).or_insert_with(|| method.clone());
            }
        }
        index
    }

    /// True if the name resolves to a built-in scalar, a host-injected type
    /// or any type exported by a loaded module.
    #[must_use]
    pub fn is_valid_type(&self, name: &str) -> bool {
        ScalarKind::from_str(name).is_ok()
            || is_injected_type(name)
            || self.entries.contains_key(name)
    }

    #[must_use]
    pub fn resolve_type(&self, name: &str) -> Option<ResolvedType<'_>> {
        if let Ok(kind) = ScalarKind::from_str(name) {
            return Some(ResolvedType::Scalar(kind));
        }
        self.entries.get(name).map(ResolvedType::Entry)
    }

    #[must_use]
    pub fn find_signature(&self, key: &SignatureKey) -> Option<&MethodSignature> {
        self.signatures.get(key)
    }

    #[must_use]
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    #[must_use]
    pub fn type_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

fn shape_of(declared: &TypeManifest) -> TypeShape {
    match declared {
        TypeManifest::Service { name, methods } => TypeShape::Service {
            methods: methods
                .iter()
                .map(|m| MethodSignature {
                    declaring_type: name.clone(),
                    name: m.name.clone(),
                    parameters: m.parameters.clone(),
                })
                .collect(),
        },
        TypeManifest::Record { fields, .. } => TypeShape::Record {
            fields: fields
                .iter()
                .map(|f| FieldDef {
                    name: f.name.clone(),
                    type_name: f.type_name.clone(),
                    nullable: f.nullable,
                })
                .collect(),
        },
        TypeManifest::List { element, .. } => TypeShape::List {
            element: element.clone(),
        },
    }
}

/// Shared, atomically replaceable handle to the current catalog.
///
/// Readers clone the inner `Arc` and keep working on a consistent snapshot;
/// a re-scan swaps the reference in one step.
#[derive(Clone)]
pub struct CatalogHandle {
    shared: Arc<RwLock<Arc<TypeCatalog>>>,
}

impl CatalogHandle {
    #[must_use]
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            shared: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    /// Snapshot of the current catalog.
    #[must_use]
    pub fn current(&self) -> Arc<TypeCatalog> {
        self.shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publish a replacement catalog.
    pub fn replace(&self, catalog: TypeCatalog) {
        let mut guard = self
            .shared
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(catalog);
    }

    /// Re-run the module scan and publish the result.
    pub fn rescan(&self, config: &CatalogConfig) -> Arc<TypeCatalog> {
        let manifests = scan_modules(config);
        let catalog = TypeCatalog::build(manifests);
        info!(
            modules = catalog.modules().len(),
            types = catalog.type_count(),
            signatures = catalog.signature_count(),
            "type catalog rebuilt"
        );
        self.replace(catalog);
        self.current()
    }
}
