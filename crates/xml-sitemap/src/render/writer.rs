//! Event-writer backend on top of `quick_xml::Writer`.

use super::{
    escape, image_fields, index_fields, url_tail_fields, video_fields, Field, RenderEngine,
    INDEX_SCHEMA_ATTRIBUTES, MAP_SCHEMA_ATTRIBUTES, XML_ENCODING, XML_VERSION,
};
use crate::entry::Entry;
use crate::error::Result;
use crate::index::IndexEntry;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

type XmlWriter = Writer<Vec<u8>>;

/// Streams start/text/end events with two-space indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriterEngine;

impl RenderEngine for WriterEngine {
    fn name(&self) -> &'static str {
        "writer"
    }

    fn render_urlset(&self, entries: &[Entry]) -> Result<String> {
        let mut writer = open_document("urlset", MAP_SCHEMA_ATTRIBUTES)?;

        for entry in entries {
            start(&mut writer, "url")?;
            write_field(&mut writer, &Field::new("loc", entry.target()))?;

            if let Some(image) = entry.image() {
                start(&mut writer, "image:image")?;
                for field in image_fields(image) {
                    write_field(&mut writer, &field)?;
                }
                end(&mut writer, "image:image")?;
            }

            if let Some(video) = entry.renderable_video() {
                start(&mut writer, "video:video")?;
                for field in video_fields(video) {
                    write_field(&mut writer, &field)?;
                }
                end(&mut writer, "video:video")?;
            }

            for field in url_tail_fields(entry) {
                write_field(&mut writer, &field)?;
            }
            end(&mut writer, "url")?;
        }

        close_document(writer, "urlset")
    }

    fn render_index(&self, entries: &[IndexEntry]) -> Result<String> {
        let mut writer = open_document("sitemapindex", INDEX_SCHEMA_ATTRIBUTES)?;

        for entry in entries {
            start(&mut writer, "sitemap")?;
            for field in index_fields(entry) {
                write_field(&mut writer, &field)?;
            }
            end(&mut writer, "sitemap")?;
        }

        close_document(writer, "sitemapindex")
    }
}

fn open_document(root: &str, attributes: &[(&str, &str)]) -> Result<XmlWriter> {
    let mut writer = Writer::new_with_indent(Vec::with_capacity(1024), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new(
        XML_VERSION,
        Some(XML_ENCODING),
        None,
    )))?;

    let mut root_start = BytesStart::new(root);
    for attribute in attributes {
        root_start.push_attribute(*attribute);
    }
    writer.write_event(Event::Start(root_start))?;
    Ok(writer)
}

fn close_document(mut writer: XmlWriter, root: &str) -> Result<String> {
    end(&mut writer, root)?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8(bytes)?)
}

fn start(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_field(writer: &mut XmlWriter, field: &Field<'_>) -> Result<()> {
    let mut element = BytesStart::new(field.name);
    if let Some(attribute) = field.attribute {
        element.push_attribute(attribute);
    }
    writer.write_event(Event::Start(element))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape(&field.value))))?;
    end(writer, field.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::entry::{EntryOptions, ImageOptions};
    use crate::map::{Map, MapOptions};
    use crate::render::string::StringEngine;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_documents_match_string_backend() {
        assert_eq!(
            WriterEngine.render_urlset(&[]).unwrap(),
            StringEngine.urlset(&[])
        );
        assert_eq!(
            WriterEngine.render_index(&[]).unwrap(),
            StringEngine.index(&[])
        );
    }

    #[test]
    fn test_multibyte_text_survives() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2011, 6, 1, 0, 0, 1).unwrap());
        let mut map = Map::with_clock("foobar.com", MapOptions::default(), &clock).unwrap();
        map.add(
            "café/ünïcode",
            EntryOptions::default().image(ImageOptions {
                location: Some("http://foobar.com/日本.jpg".into()),
                caption: Some("Crème brûlée".into()),
                ..Default::default()
            }),
        )
        .unwrap();

        let out = WriterEngine.render_urlset(map.entries()).unwrap();
        assert!(out.contains("<image:caption>Crème brûlée</image:caption>"));
        assert_eq!(out, StringEngine.urlset(map.entries()));
    }
}
