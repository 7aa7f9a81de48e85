//! The alias registry and its pluggable sources.
//!
//! [`AliasRegistry`] is the process-wide map from short alias name to
//! canonical destination path. It is assembled once at startup from a
//! list of [`AliasSource`]s and never mutated afterward, so request
//! handlers read it without synchronization.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::PorticoError;

/// Destination a VIP name resolves to once the prefixed alias router is
/// reached: the viewer deep link for that name.
fn vip_destination(name: &str) -> String {
    format!("/#/{name}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub destination: String,
}

#[derive(Debug, Default)]
pub struct AliasRegistry {
    entries: HashMap<String, String>,
}

impl AliasRegistry {
    /// Exact-match lookup. Case-sensitive, no wildcard aliases.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every source in order. A name registered twice, within or
    /// across sources, is a fatal startup error.
    pub async fn from_sources(
        sources: &[Box<dyn AliasSource>],
    ) -> Result<Self, PorticoError> {
        let mut registry = Self::default();
        for source in sources {
            let aliases = source.load().await?;
            tracing::debug!(
                source = source.name(),
                aliases = aliases.len(),
                "alias source loaded"
            );
            for alias in aliases {
                if registry
                    .entries
                    .insert(alias.name.clone(), alias.destination)
                    .is_some()
                {
                    return Err(PorticoError::DuplicateAlias {
                        name: alias.name,
                        source_name: source.name(),
                    });
                }
            }
        }
        Ok(registry)
    }
}

// async_trait is required here because AliasSource is used as
// Box<dyn AliasSource> and native async fn in traits (Rust 1.75+) does
// not support dyn dispatch.
#[async_trait]
pub trait AliasSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<Vec<Alias>, PorticoError>;
}

/// The reserved top-level names, each mapped through the fixed VIP
/// destination template.
pub struct VipSource {
    names: Vec<String>,
}

impl VipSource {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

#[async_trait]
impl AliasSource for VipSource {
    fn name(&self) -> &'static str {
        "vip"
    }

    async fn load(&self) -> Result<Vec<Alias>, PorticoError> {
        Ok(self
            .names
            .iter()
            .map(|name| Alias {
                name: name.clone(),
                destination: vip_destination(name),
            })
            .collect())
    }
}

/// Curated aliases from an optional `aliases.json` file (a flat
/// `{name: destination}` object) in the public asset directory. A
/// missing file yields an empty set; a malformed one aborts startup.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl AliasSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn load(&self) -> Result<Vec<Alias>, PorticoError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PorticoError::Io(e)),
        };
        let entries: HashMap<String, String> = serde_json::from_slice(&bytes)
            .map_err(|source| PorticoError::AliasFileParse {
                path: self.path.clone(),
                source,
            })?;
        Ok(entries
            .into_iter()
            .map(|(name, destination)| Alias { name, destination })
            .collect())
    }
}
