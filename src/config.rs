use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tracing: TracingConfig,
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TracingConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

/// Where the type catalog comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Explicit manifest files to load, in order.
    #[serde(default)]
    pub modules: Vec<String>,
    /// Directory scanned for additional manifests and dependency lookups.
    #[serde(default = "default_module_dir")]
    pub module_dir: String,
    /// Also load every manifest found in `module_dir` and follow the
    /// transitive `requires` closure of everything loaded.
    #[serde(default)]
    pub include_references: bool,
    /// Manifest name prefixes excluded from the directory scan (self and
    /// host-framework internals).
    #[serde(default = "default_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            module_dir: default_module_dir(),
            include_references: false,
            ignore_prefixes: default_ignore_prefixes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Queue assigned when a save request omits one.
    #[serde(default = "default_queue")]
    pub default_queue: String,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            default_queue: default_queue(),
        }
    }
}

fn default_module_dir() -> String {
    "modules".to_string()
}

fn default_ignore_prefixes() -> Vec<String> {
    vec!["recron".to_string(), "host".to_string()]
}

fn default_queue() -> String {
    "default".to_string()
}
