//! Sitemap index: references to rendered maps, numbered per group.

use crate::error::{Result, SitemapError};
use crate::map::{Map, RenderToOptions};
use crate::output::{self, WriteOptions};
use crate::render::Backend;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Index-wide defaults applied to every registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// Reference maps over `https`. Default false.
    pub secure: bool,
    /// Reference the gzipped `.xml.gz` files. Default false.
    pub gzip: bool,
}

/// Per-registration overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterOptions {
    /// Overrides [`IndexOptions::secure`].
    pub secure: Option<bool>,
    /// Overrides [`IndexOptions::gzip`].
    pub gzip: Option<bool>,
    /// Name the referenced file `{group}-{offset}.xml`. When false the map's
    /// own [`Map::index_path`] is used. Default true.
    pub offsets: bool,
}

impl Default for RegisterOptions {
    fn default() -> Self {
        Self {
            secure: None,
            gzip: None,
            offsets: true,
        }
    }
}

/// One `sitemap` element of the index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    /// Absolute URL of the referenced sitemap file.
    pub location: String,
    /// Creation time of the referenced map.
    pub last_modified: DateTime<Utc>,
}

/// A `sitemapindex` document under construction.
#[derive(Debug, Clone, Default)]
pub struct Index {
    options: IndexOptions,
    entries: Vec<IndexEntry>,
    offsets: HashMap<String, usize>,
}

impl Index {
    pub fn new(options: IndexOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Reference `map` from this index and return the location recorded.
    ///
    /// The map's group counter advances by one; other groups are untouched.
    pub fn register(&mut self, map: &Map, options: RegisterOptions) -> Result<&IndexEntry> {
        if map.is_empty() {
            return Err(SitemapError::EmptyCollection);
        }

        let secure = options.secure.unwrap_or(self.options.secure);
        let gzip = options.gzip.unwrap_or(self.options.gzip);
        let offset = self.offset(map.group());

        let mut location = if options.offsets {
            map.index_url_for(offset, secure)
        } else {
            map.url_with(secure, &format!("/{}", map.index_path()))
        };
        if gzip {
            location.push_str(".gz");
        }

        debug!(group = %map.group(), offset, %location, "registered sitemap in index");
        self.entries.push(IndexEntry {
            location,
            last_modified: map.created_at(),
        });
        *self.offsets.entry(map.group().to_string()).or_insert(0) += 1;

        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Next offset that a map in `group` would be registered under.
    pub fn offset(&self, group: &str) -> usize {
        self.offsets.get(group).copied().unwrap_or(0)
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render with the canonical string backend.
    pub fn render(&self) -> String {
        crate::render::string::StringEngine.index(&self.entries)
    }

    /// Render with a specific backend.
    pub fn render_with(&self, backend: Backend) -> Result<String> {
        backend.engine().render_index(&self.entries)
    }

    /// Write the rendered index to `path`, returning the path actually written.
    pub fn render_to(&self, path: impl AsRef<Path>, options: RenderToOptions) -> Result<PathBuf> {
        output::write_document(
            path.as_ref(),
            self.render().as_bytes(),
            WriteOptions {
                overwrite: options.overwrite,
                gzip: options.gzip,
            },
        )
    }
}
