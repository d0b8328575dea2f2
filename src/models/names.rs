//! Module for mapping bird protocol names to operator friendly names and tags

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

use crate::{Error, Result};

/// One entry of `protocols.json`. Any other fields in the file are ignored.
#[derive(Debug, Clone, Deserialize)]
struct ProtocolName {
    /// Left out or empty means the protocol keeps its own name
    #[serde(default)]
    name: String,
    /// Written as `null` when a protocol has no tags
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Display name and tags of a protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayEntry<'a> {
    pub name: &'a str,
    pub tags: &'a [String],
}

impl<'a> DisplayEntry<'a> {
    /// Returns true if any of our tags is in `wanted`
    pub fn has_any_tag(&self, wanted: &[String]) -> bool {
        self.tags.iter().any(|t| wanted.contains(t))
    }
}

/// Maps bird protocol names to [DisplayEntry]s. An empty map resolves every
/// protocol to its own name.
#[derive(Debug, Default, Clone)]
pub struct NameMap {
    entries: HashMap<String, ProtocolName>,
}

impl NameMap {
    /// Loads the map from a JSON file of the form
    /// `{"<protocol>": {"name": "<display name>", "tags": ["<tag>", ...]}}`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<NameMap> {
        let path = path.as_ref();
        let name_map_error = |reason: String| Error::NameMapError {
            path: path.to_owned(),
            reason,
        };
        let contents = fs::read_to_string(path).map_err(|e| name_map_error(e.to_string()))?;
        let map = Self::from_json(&contents).map_err(|e| name_map_error(e.to_string()))?;
        log::debug!("loaded {} protocol names from {}", map.len(), path.display());
        Ok(map)
    }

    /// Parses the map from JSON text
    pub fn from_json(contents: &str) -> serde_json::Result<NameMap> {
        let entries: HashMap<String, ProtocolName> = serde_json::from_str(contents)?;
        Ok(NameMap { entries })
    }

    /// Looks up `protocol` by its exact name. Protocols we don't know about
    /// keep their own name, and get no tags. Known protocols with no display
    /// name keep their own name too.
    pub fn lookup<'a>(&'a self, protocol: &'a str) -> DisplayEntry<'a> {
        match self.entries.get(protocol) {
            Some(p) => DisplayEntry {
                name: if p.name.is_empty() { protocol } else { p.name.as_str() },
                tags: p.tags.as_deref().unwrap_or(&[]),
            },
            None => DisplayEntry {
                name: protocol,
                tags: &[],
            },
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
