//! Canonical backend: plain string concatenation.

use super::{
    escape, image_fields, index_fields, url_tail_fields, video_fields, Field, RenderEngine,
    INDEX_SCHEMA_ATTRIBUTES, MAP_SCHEMA_ATTRIBUTES, XML_DECLARATION,
};
use crate::entry::Entry;
use crate::error::Result;
use crate::index::IndexEntry;

/// Builds documents with `String::push_str`. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringEngine;

impl StringEngine {
    pub fn urlset(&self, entries: &[Entry]) -> String {
        let mut out = open_document("urlset", MAP_SCHEMA_ATTRIBUTES);

        for entry in entries {
            out.push_str("  <url>\n");
            push_field(&mut out, 4, &Field::new("loc", entry.target()));

            if let Some(image) = entry.image() {
                out.push_str("    <image:image>\n");
                for field in image_fields(image) {
                    push_field(&mut out, 6, &field);
                }
                out.push_str("    </image:image>\n");
            }

            if let Some(video) = entry.renderable_video() {
                out.push_str("    <video:video>\n");
                for field in video_fields(video) {
                    push_field(&mut out, 6, &field);
                }
                out.push_str("    </video:video>\n");
            }

            for field in url_tail_fields(entry) {
                push_field(&mut out, 4, &field);
            }
            out.push_str("  </url>\n");
        }

        out.push_str("</urlset>\n");
        out
    }

    pub fn index(&self, entries: &[IndexEntry]) -> String {
        let mut out = open_document("sitemapindex", INDEX_SCHEMA_ATTRIBUTES);

        for entry in entries {
            out.push_str("  <sitemap>\n");
            for field in index_fields(entry) {
                push_field(&mut out, 4, &field);
            }
            out.push_str("  </sitemap>\n");
        }

        out.push_str("</sitemapindex>\n");
        out
    }
}

impl RenderEngine for StringEngine {
    fn name(&self) -> &'static str {
        "string"
    }

    fn render_urlset(&self, entries: &[Entry]) -> Result<String> {
        Ok(self.urlset(entries))
    }

    fn render_index(&self, entries: &[IndexEntry]) -> Result<String> {
        Ok(self.index(entries))
    }
}

fn open_document(root: &str, attributes: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    out.push('<');
    out.push_str(root);
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out.push_str(">\n");
    out
}

fn push_field(out: &mut String, indent: usize, field: &Field<'_>) {
    out.extend(std::iter::repeat(' ').take(indent));
    out.push('<');
    out.push_str(field.name);
    if let Some((key, value)) = field.attribute {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out.push('>');
    out.push_str(&escape(&field.value));
    out.push_str("</");
    out.push_str(field.name);
    out.push_str(">\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::entry::{EntryOptions, ImageOptions};
    use crate::map::{Map, MapOptions};
    use chrono::{TimeZone, Utc};

    fn map() -> Map {
        let clock = FixedClock(Utc.with_ymd_and_hms(2011, 6, 1, 0, 0, 1).unwrap());
        Map::with_clock("foobar.com", MapOptions::default(), &clock).unwrap()
    }

    #[test]
    fn test_single_entry_layout() {
        let out = StringEngine.urlset(map().entries());
        let expected = concat!(
            "  <url>\n",
            "    <loc>http://foobar.com/</loc>\n",
            "    <lastmod>2011-06-01T00:00:01Z</lastmod>\n",
            "    <changefreq>weekly</changefreq>\n",
            "    <priority>1.0</priority>\n",
            "  </url>\n",
            "</urlset>\n",
        );
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xsi:schemaLocation="));
        assert!(out.ends_with(expected), "{out}");
    }

    #[test]
    fn test_escapes_text() {
        let mut map = map();
        map.add(
            "search?q=a&b=<c>",
            EntryOptions::default().image(ImageOptions {
                location: Some("http://foobar.com/i.jpg".into()),
                caption: Some("Tom & \"Jerry\"".into()),
                ..Default::default()
            }),
        )
        .unwrap();
        let out = StringEngine.urlset(map.entries());
        assert!(out.contains("<loc>http://foobar.com/search?q=a&amp;b=&lt;c&gt;</loc>"));
        assert!(out.contains("<image:caption>Tom &amp; &quot;Jerry&quot;</image:caption>"));
    }

    #[test]
    fn test_empty_index() {
        let out = StringEngine.index(&[]);
        assert!(out.ends_with("xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n</sitemapindex>\n"));
    }
}
