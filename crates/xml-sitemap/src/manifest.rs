//! JSON manifests: declare maps, their entries and the index in one file.
//!
//! ```json
//! {
//!   "index": { "secure": false, "gzip": false },
//!   "maps": [
//!     {
//!       "name": "pages",
//!       "domain": "foobar.com",
//!       "options": { "group": "pages" },
//!       "entries": [
//!         { "target": "about", "period": "daily" },
//!         { "target": "legacy", "updated": "2011-06-01", "priority": 0.3 }
//!       ]
//!     }
//!   ],
//!   "register": [ { "map": "pages" } ]
//! }
//! ```
//!
//! When `register` is omitted every non-empty map is registered in order.

use crate::clock::Clock;
use crate::entry::EntryOptions;
use crate::error::{Result, SitemapError};
use crate::index::{Index, IndexOptions, RegisterOptions};
use crate::map::{Map, MapOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Top-level manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Index-wide defaults.
    pub index: IndexOptions,
    /// Maps to build, in order.
    pub maps: Vec<ManifestMap>,
    /// Explicit registrations. When empty, every non-empty map is registered.
    pub register: Vec<ManifestRegistration>,
}

/// One map and its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMap {
    /// Name used by `register`. Defaults to the domain.
    #[serde(default)]
    pub name: Option<String>,
    pub domain: String,
    #[serde(default)]
    pub options: MapOptions,
    /// Added in order after the automatic home entry.
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

impl ManifestMap {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.domain)
    }
}

/// A target plus its entry options, flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub target: String,
    #[serde(flatten)]
    pub options: EntryOptions,
}

/// A reference from the index to a named map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRegistration {
    /// Name of a map in `maps`.
    pub map: String,
    #[serde(flatten)]
    pub options: RegisterOptions,
}

/// Maps and index built from a manifest.
#[derive(Debug, Clone)]
pub struct SitemapSet {
    /// Built maps keyed by name, in manifest order.
    pub maps: Vec<(String, Map)>,
    /// Index holding every registration.
    pub index: Index,
}

impl SitemapSet {
    pub fn map(&self, name: &str) -> Option<&Map> {
        self.maps.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }
}

impl Manifest {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Build every map, then the index. Fails on the first invalid item.
    pub fn build(&self, clock: &dyn Clock) -> Result<SitemapSet> {
        let mut maps = Vec::with_capacity(self.maps.len());
        for declared in &self.maps {
            let mut map = Map::with_clock(&declared.domain, declared.options.clone(), clock)?;
            for entry in &declared.entries {
                map.add(&entry.target, entry.options.clone())?;
            }
            debug!(name = declared.name(), entries = map.size(), "built map from manifest");
            maps.push((declared.name().to_string(), map));
        }

        let mut index = Index::new(self.index);
        if self.register.is_empty() {
            for (name, map) in &maps {
                if map.is_empty() {
                    warn!(name = %name, "skipping empty map in index");
                    continue;
                }
                index.register(map, RegisterOptions::default())?;
            }
        } else {
            for registration in &self.register {
                let map = maps
                    .iter()
                    .find(|(name, _)| *name == registration.map)
                    .map(|(_, map)| map)
                    .ok_or_else(|| SitemapError::NotACollection(registration.map.clone()))?;
                index.register(map, registration.options)?;
            }
        }

        Ok(SitemapSet { maps, index })
    }
}
