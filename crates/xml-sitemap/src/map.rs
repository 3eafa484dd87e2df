//! A sitemap for one domain: URL normalization, limits, rendering.

use crate::clock::{Clock, SystemClock};
use crate::entry::{Entry, EntryOptions};
use crate::error::{Result, SitemapError};
use crate::output::{self, WriteOptions};
use crate::render::Backend;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum number of entries a single sitemap may hold.
pub const MAX_ENTRIES: usize = 50_000;

/// Maximum length of a normalized target, in characters.
pub const MAX_TARGET_LENGTH: usize = 2048;

/// Group name used when none is given.
pub const DEFAULT_GROUP: &str = "sitemap";

/// Construction options for a [`Map`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Use `https` when qualifying relative targets. Default false.
    pub secure: bool,
    /// Insert `/` with priority 1.0 on construction. Default true.
    pub home: bool,
    /// Qualify every target under the domain, even absolute URLs. Default true.
    pub root: bool,
    /// File name prefix used by the index. Default `"sitemap"`.
    pub group: String,
    /// Creation time. Defaults to the clock's current time.
    pub time: Option<DateTime<Utc>>,
    /// Gzip the map when it is written to disk. Default false.
    pub gzip: bool,
    /// The map's own file name, used for offset-free index registration.
    /// Defaults to `{group}.xml`.
    pub index_path: Option<String>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            secure: false,
            home: true,
            root: true,
            group: DEFAULT_GROUP.to_string(),
            time: None,
            gzip: false,
            index_path: None,
        }
    }
}

/// Options for [`Map::render_to`] and [`crate::Index::render_to`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderToOptions {
    /// Replace an existing file. Default false.
    pub overwrite: bool,
    /// Gzip the document and force a `.gz` suffix. Default false.
    pub gzip: bool,
}

/// An ordered collection of entries for one domain.
#[derive(Debug, Clone)]
pub struct Map {
    domain: String,
    secure: bool,
    root: bool,
    group: String,
    created_at: DateTime<Utc>,
    gzip: bool,
    index_path: String,
    entries: Vec<Entry>,
}

impl Map {
    /// Create a map stamped with the system clock.
    pub fn new(domain: &str, options: MapOptions) -> Result<Self> {
        Self::with_clock(domain, options, &SystemClock)
    }

    /// Create a map, taking "now" from `clock` when `options.time` is unset.
    pub fn with_clock(domain: &str, options: MapOptions, clock: &dyn Clock) -> Result<Self> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(SitemapError::InvalidDomain);
        }

        let index_path = options
            .index_path
            .unwrap_or_else(|| format!("{}.xml", options.group));

        let mut map = Self {
            domain: domain.to_string(),
            secure: options.secure,
            root: options.root,
            group: options.group,
            created_at: options.time.unwrap_or_else(|| clock.now()),
            gzip: options.gzip,
            index_path,
            entries: Vec::new(),
        };

        if options.home {
            map.add("/", EntryOptions::default().priority(1.0))?;
        }

        Ok(map)
    }

    /// Populate the map inside a closure, propagating its error.
    pub fn generate<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        f(self)
    }

    /// Validate, normalize and append a target.
    pub fn add(&mut self, target: &str, options: EntryOptions) -> Result<&Entry> {
        if self.entries.len() >= MAX_ENTRIES {
            return Err(SitemapError::CapacityExceeded { limit: MAX_ENTRIES });
        }

        let target = target.trim();
        if target.is_empty() {
            return Err(SitemapError::EmptyTarget);
        }

        let url = self.process_target(target);
        let length = url.chars().count();
        if length > MAX_TARGET_LENGTH {
            return Err(SitemapError::InvalidTarget { length });
        }

        let entry = Entry::with_default_time(&url, options, self.created_at.into())?;
        debug!(domain = %self.domain, target = %entry.target(), "added sitemap entry");
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn gzip(&self) -> bool {
        self.gzip
    }

    pub fn index_path(&self) -> &str {
        &self.index_path
    }

    /// Set the file name this map is published under.
    pub fn set_index_path(&mut self, path: impl Into<String>) {
        self.index_path = path.into();
    }

    /// Absolute URL for `path` on this map's scheme and domain.
    pub fn url_for(&self, path: &str) -> String {
        self.url_with(self.secure, path)
    }

    /// Like [`Map::url_for`] with an explicit scheme choice.
    pub fn url_with(&self, secure: bool, path: &str) -> String {
        qualify(secure, &self.domain, path)
    }

    /// URL of this map's shard file at `offset` within its group.
    pub fn index_url_for(&self, offset: usize, secure: bool) -> String {
        self.url_with(secure, &format!("/{}-{}.xml", self.group, offset))
    }

    /// Render with the canonical string backend.
    pub fn render(&self) -> String {
        crate::render::string::StringEngine.urlset(&self.entries)
    }

    /// Render with a specific backend.
    pub fn render_with(&self, backend: Backend) -> Result<String> {
        backend.engine().render_urlset(&self.entries)
    }

    /// Write the rendered map to `path`, returning the path actually written.
    ///
    /// The map's own gzip policy applies when `options.gzip` is not set.
    pub fn render_to(&self, path: impl AsRef<Path>, options: RenderToOptions) -> Result<PathBuf> {
        output::write_document(
            path.as_ref(),
            self.render().as_bytes(),
            WriteOptions {
                overwrite: options.overwrite,
                gzip: options.gzip || self.gzip,
            },
        )
    }

    fn process_target(&self, target: &str) -> String {
        if !self.root && has_http_scheme(target) {
            return target.to_string();
        }
        if target.starts_with('/') {
            self.url_for(target)
        } else {
            self.url_for(&format!("/{target}"))
        }
    }
}

fn qualify(secure: bool, domain: &str, path: &str) -> String {
    let scheme = if secure { "https" } else { "http" };
    format!("{scheme}://{domain}{path}")
}

fn has_http_scheme(target: &str) -> bool {
    target
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
}
