//! # xml-sitemap
//!
//! Build sitemap (`urlset`) and sitemap-index (`sitemapindex`) documents.
//!
//! ```no_run
//! use xml_sitemap::{EntryOptions, Index, Map, MapOptions, RegisterOptions, RenderToOptions};
//!
//! let mut map = Map::new("foobar.com", MapOptions::default())?;
//! map.add("about", EntryOptions::default().period("daily"))?;
//! map.render_to("/tmp/sitemap-0.xml", RenderToOptions::default())?;
//!
//! let mut index = Index::default();
//! index.register(&map, RegisterOptions::default())?;
//! print!("{}", index.render());
//! # Ok::<(), xml_sitemap::SitemapError>(())
//! ```
//!
//! Maps hold at most 50,000 entries and targets are capped at 2,048
//! characters. Rendering never mutates, so a built map can be rendered from
//! several threads at once.

pub mod clock;
pub mod entry;
pub mod error;
pub mod index;
pub mod manifest;
pub mod map;
pub mod output;
pub mod render;
pub mod time;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entry::{ChangeFrequency, Entry, EntryOptions, Image, ImageOptions, Video, VideoOptions};
pub use error::{Result, SitemapError};
pub use index::{Index, IndexEntry, IndexOptions, RegisterOptions};
pub use manifest::{Manifest, SitemapSet};
pub use map::{Map, MapOptions, RenderToOptions, MAX_ENTRIES, MAX_TARGET_LENGTH};
pub use render::{Backend, RenderEngine};
pub use time::{TimeInput, Timestamp};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Create a map for `domain` with default options.
pub fn map(domain: &str) -> Result<Map> {
    Map::new(domain, MapOptions::default())
}

/// Create an empty index with default options.
pub fn index() -> Index {
    Index::default()
}
