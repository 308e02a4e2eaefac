use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::signature::Parameter;
use crate::config::CatalogConfig;

/// A declarative module manifest: the unit the type catalog is built from.
///
/// Manifests are JSON files naming the module, the modules it depends on,
/// and the types it exports.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleManifest {
    pub name: String,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeManifest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeManifest {
    /// A callable type exposing named methods.
    Service {
        name: String,
        #[serde(default)]
        methods: Vec<MethodManifest>,
    },
    /// A structured value type; coercion target for object-shaped values.
    Record {
        name: String,
        #[serde(default)]
        fields: Vec<FieldManifest>,
    },
    /// A homogeneous sequence type; coercion target for array-shaped values.
    List { name: String, element: String },
}

impl TypeManifest {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Service { name, .. } | Self::Record { name, .. } | Self::List { name, .. } => {
                name
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodManifest {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a single manifest file.
pub fn load_manifest(path: &Path) -> Result<ModuleManifest, ManifestError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Collect the module manifests the catalog is built from.
///
/// Loads the explicitly configured manifests first. When `include_references`
/// is set, additionally scans the module directory for `*.json` manifests
/// (skipping denylisted name prefixes), then follows every loaded manifest's
/// `requires` list until the closure is complete. Each load failure is logged
/// and the module skipped; a scan never fails as a whole.
pub fn scan_modules(config: &CatalogConfig) -> Vec<ModuleManifest> {
    let module_dir = PathBuf::from(&config.module_dir);
    let mut loaded: Vec<ModuleManifest> = Vec::new();
    let mut loaded_names: HashMap<String, PathBuf> = HashMap::new();
    let mut seen_paths: HashSet<PathBuf> = HashSet::new();

    let mut load = |path: PathBuf,
                    loaded: &mut Vec<ModuleManifest>,
                    loaded_names: &mut HashMap<String, PathBuf>,
                    seen_paths: &mut HashSet<PathBuf>| {
        if !seen_paths.insert(path.clone()) {
            return;
        }
        match load_manifest(&path) {
            Ok(manifest) => {
                if loaded_names.contains_key(&manifest.name) {
                    warn!(
                        module = %manifest.name,
                        path = %path.display(),
                        "module already loaded, skipping"
                    );
                    return;
                }
                debug!(module = %manifest.name, path = %path.display(), "loaded module manifest");
                loaded_names.insert(manifest.name.clone(), path);
                loaded.push(manifest);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping module manifest");
            }
        }
    };

    for explicit in &config.modules {
        load(
            PathBuf::from(explicit),
            &mut loaded,
            &mut loaded_names,
            &mut seen_paths,
        );
    }

    if config.include_references {
        match std::fs::read_dir(&module_dir) {
            Ok(entries) => {
                let mut paths: Vec<PathBuf> = entries
                    .filter_map(Result::ok)
                    .map(|e| e.path())
                    .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                    .filter(|p| !is_denylisted(p, &config.ignore_prefixes))
                    .collect();
                // Deterministic load order so duplicate-name tie-breaks are stable.
                paths.sort();
                for path in paths {
                    load(path, &mut loaded, &mut loaded_names, &mut seen_paths);
                }
            }
            Err(e) => {
                warn!(dir = %module_dir.display(), error = %e, "cannot scan module directory");
            }
        }
    }

    // Follow declared dependencies until no new modules are discovered.
    let mut pending: VecDeque<String> = loaded
        .iter()
        .flat_map(|m| m.requires.iter().cloned())
        .collect();
    while let Some(name) = pending.pop_front() {
        if loaded_names.contains_key(&name) {
            continue;
        }
        let path = module_dir.join(format!("{name}.json"));
        let before = loaded.len();
        load(path, &mut loaded, &mut loaded_names, &mut seen_paths);
        if loaded.len() > before {
            if let Some(manifest) = loaded.last() {
                pending.extend(manifest.requires.iter().cloned());
            }
        }
    }

    loaded
}

fn is_denylisted(path: &Path, prefixes: &[String]) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| prefixes.iter().any(|p| stem.starts_with(p.as_str())))
}
