use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::dispatch::DEFAULT_CGI_EXTENSION;
use crate::http::mime::{ContentTypes, DEFAULT_KEY};

/// Content types known before any configuration is read.
pub const BUILTIN_CONTENT_TYPES: &[(&str, &str)] = &[
    (DEFAULT_KEY, "text/plain"),
    ("text", "text/plain"),
    ("html", "text/html"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
];

/// Server configuration.
///
/// Every field has a default, so a YAML file only needs the keys it changes:
///
/// ```yaml
/// listen_addr: "0.0.0.0:8080"
/// root: /srv/www
/// content_types:
///   png: image/png
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Directory every request path is resolved against
    pub root: PathBuf,
    pub cgi_extension: String,
    /// Extension to MIME type overrides, applied on top of the built-ins
    pub content_types: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            root: PathBuf::from("."),
            cgi_extension: DEFAULT_CGI_EXTENSION.to_string(),
            content_types: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from the environment.
    ///
    /// `CONFIG` names an optional YAML file; `LISTEN` overrides the listen
    /// address either way.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.listen_addr = listen_addr;
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(contents: &str) -> anyhow::Result<Self> {
        // An empty document deserializes as null rather than an empty map.
        let cfg: Option<Self> = serde_yaml::from_str(contents)?;
        Ok(cfg.unwrap_or_default())
    }

    /// Builds the content-type table: built-ins first, then overrides.
    ///
    /// Fails if the result has no usable `DEFAULT` entry.
    pub fn content_type_table(&self) -> anyhow::Result<ContentTypes> {
        let builtins = BUILTIN_CONTENT_TYPES
            .iter()
            .map(|(ext, mime)| (ext.to_string(), mime.to_string()));
        let overrides = self
            .content_types
            .iter()
            .map(|(ext, mime)| (ext.clone(), mime.clone()));

        ContentTypes::from_entries(builtins.chain(overrides))
    }
}
