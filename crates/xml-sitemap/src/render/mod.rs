//! Render engine: turns entries into `urlset` and `sitemapindex` documents.
//!
//! Three interchangeable backends implement [`RenderEngine`]:
//!
//! - [`string::StringEngine`] builds the document by hand. It is the canonical
//!   output used by [`crate::Map::render`].
//! - [`writer::WriterEngine`] streams events through `quick_xml::Writer` with
//!   two-space indentation and matches the string backend byte for byte.
//! - [`tree::TreeEngine`] builds an owned element tree first and serializes it
//!   compactly. Root attributes come out sorted by name.
//!
//! Element order and the absence policy (unset fields produce no element) live
//! here, in [`image_fields`], [`video_fields`] and [`url_tail_fields`], so every
//! backend agrees on them.

pub mod string;
pub mod tree;
pub mod writer;

use crate::entry::{Entry, Image, Video};
use crate::error::Result;
use crate::index::IndexEntry;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

pub const XML_VERSION: &str = "1.0";
pub const XML_ENCODING: &str = "UTF-8";
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Root attributes of a `urlset` document, in canonical order.
pub const MAP_SCHEMA_ATTRIBUTES: &[(&str, &str)] = &[
    (
        "xsi:schemaLocation",
        "http://www.sitemaps.org/schemas/sitemap/0.9 http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd",
    ),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xmlns:image", "http://www.google.com/schemas/sitemap-image/1.1"),
    ("xmlns:video", "http://www.google.com/schemas/sitemap-video/1.1"),
    ("xmlns", "http://www.sitemaps.org/schemas/sitemap/0.9"),
];

/// Root attributes of a `sitemapindex` document, in canonical order.
pub const INDEX_SCHEMA_ATTRIBUTES: &[(&str, &str)] = &[
    (
        "xsi:schemaLocation",
        "http://www.sitemaps.org/schemas/sitemap/0.9 http://www.sitemaps.org/schemas/sitemap/0.9/siteindex.xsd",
    ),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xmlns", "http://www.sitemaps.org/schemas/sitemap/0.9"),
];

/// A serialization strategy for sitemap documents.
pub trait RenderEngine: Send + Sync {
    /// Short backend name, for logs and error messages.
    fn name(&self) -> &'static str;

    /// Render a `urlset` document from entries in insertion order.
    fn render_urlset(&self, entries: &[Entry]) -> Result<String>;

    /// Render a `sitemapindex` document from index entries in order.
    fn render_index(&self, entries: &[IndexEntry]) -> Result<String>;
}

/// Selects one of the built-in render engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    String,
    Writer,
    Tree,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::String, Backend::Writer, Backend::Tree];

    pub fn engine(&self) -> &'static dyn RenderEngine {
        match self {
            Backend::String => &string::StringEngine,
            Backend::Writer => &writer::WriterEngine,
            Backend::Tree => &tree::TreeEngine,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.engine().name())
    }
}

/// One leaf element: name, optional fixed attribute, text.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    pub name: &'static str,
    pub attribute: Option<(&'static str, &'static str)>,
    pub value: Cow<'a, str>,
}

impl<'a> Field<'a> {
    fn new(name: &'static str, value: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name,
            attribute: None,
            value: value.into(),
        }
    }

    fn with_attribute(mut self, key: &'static str, value: &'static str) -> Self {
        self.attribute = Some((key, value));
        self
    }
}

/// Escape text for element content. Every backend goes through this.
pub fn escape(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Format a decimal the way sitemap consumers expect: `1.0`, `0.5`, `9.99`.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Push `value` as a text field unless it is unset or empty.
fn push_text<'a>(fields: &mut Vec<Field<'a>>, name: &'static str, value: &'a Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
        fields.push(Field::new(name, value));
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Children of `image:image`: loc, caption, title, license, geo_location.
pub fn image_fields(image: &Image) -> Vec<Field<'_>> {
    let mut fields = vec![Field::new("image:loc", image.location.as_str())];
    let optional = [
        ("image:caption", &image.caption),
        ("image:title", &image.title),
        ("image:license", &image.license),
        ("image:geo_location", &image.geo_location),
    ];
    for (name, value) in optional {
        push_text(&mut fields, name, value);
    }
    fields
}

/// Children of `video:video`, skipping unset fields.
///
/// Callers check [`Video::is_renderable`] first.
pub fn video_fields(video: &Video) -> Vec<Field<'_>> {
    let mut fields = Vec::new();

    push_text(&mut fields, "video:thumbnail_loc", &video.thumbnail_location);
    push_text(&mut fields, "video:title", &video.title);
    push_text(&mut fields, "video:description", &video.description);
    push_text(&mut fields, "video:content_loc", &video.content_location);
    push_text(&mut fields, "video:player_loc", &video.player_location);
    if let Some(duration) = video.duration {
        fields.push(Field::new("video:duration", duration.to_string()));
    }
    if let Some(ref date) = video.expiration_date {
        fields.push(Field::new("video:expiration_date", date.lastmod_value()));
    }
    if let Some(rating) = video.rating {
        fields.push(Field::new("video:rating", format_decimal(rating)));
    }
    if let Some(count) = video.view_count {
        fields.push(Field::new("video:view_count", count.to_string()));
    }
    if let Some(ref date) = video.publication_date {
        fields.push(Field::new("video:publication_date", date.lastmod_value()));
    }
    if let Some(flag) = video.family_friendly {
        fields.push(Field::new("video:family_friendly", yes_no(flag)));
    }
    push_text(&mut fields, "video:category", &video.category);
    if let Some(restriction) = video.restriction.as_deref().filter(|r| !r.is_empty()) {
        fields.push(
            Field::new("video:restriction", restriction)
                .with_attribute("relationship", "allow"),
        );
    }
    push_text(&mut fields, "video:gallery_loc", &video.gallery_location);
    if let Some(price) = video.price {
        fields.push(
            Field::new("video:price", format_decimal(price)).with_attribute("currency", "USD"),
        );
    }
    if let Some(flag) = video.requires_subscription {
        fields.push(Field::new("video:requires_subscription", yes_no(flag)));
    }
    push_text(&mut fields, "video:uploader", &video.uploader);
    if let Some(platform) = video.platform.as_deref().filter(|p| !p.is_empty()) {
        fields.push(Field::new("video:platform", platform).with_attribute("relationship", "allow"));
    }
    if let Some(flag) = video.live {
        fields.push(Field::new("video:live", yes_no(flag)));
    }
    fields
}

/// The trailing `lastmod`, `changefreq`, `priority` of a `url` element.
pub fn url_tail_fields(entry: &Entry) -> [Field<'_>; 3] {
    [
        Field::new("lastmod", entry.updated().lastmod_value()),
        Field::new("changefreq", entry.change_frequency().as_str()),
        Field::new("priority", format_decimal(entry.priority())),
    ]
}

/// The `loc` and `lastmod` of one `sitemap` element.
pub fn index_fields(entry: &IndexEntry) -> [Field<'_>; 2] {
    [
        Field::new("loc", entry.location.as_str()),
        Field::new("lastmod", crate::time::format_utc(&entry.last_modified)),
    ]
}
