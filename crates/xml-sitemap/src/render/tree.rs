//! Tree backend: build the whole document as owned nodes, then serialize.

use super::{
    escape, image_fields, index_fields, url_tail_fields, video_fields, Field, RenderEngine,
    INDEX_SCHEMA_ATTRIBUTES, MAP_SCHEMA_ATTRIBUTES, XML_ENCODING, XML_VERSION,
};
use crate::entry::Entry;
use crate::error::Result;
use crate::index::IndexEntry;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::BTreeMap;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with name-ordered attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Child elements with the given name.
    pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter_map(move |node| match node {
            Node::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write(writer)?,
                Node::Text(text) => {
                    writer.write_event(Event::Text(BytesText::from_escaped(escape(text))))?
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

impl From<&Field<'_>> for Element {
    fn from(field: &Field<'_>) -> Self {
        let mut element = Element::new(field.name).text(field.value.as_ref());
        if let Some((key, value)) = field.attribute {
            element = element.attribute(key, value);
        }
        element
    }
}

fn root(name: &str, attributes: &[(&str, &str)]) -> Element {
    attributes
        .iter()
        .fold(Element::new(name), |root, (key, value)| root.attribute(*key, *value))
}

fn with_fields<'a>(parent: Element, fields: impl IntoIterator<Item = Field<'a>>) -> Element {
    fields
        .into_iter()
        .fold(parent, |parent, field| parent.child(Element::from(&field)))
}

/// Build the `urlset` tree for a list of entries.
pub fn urlset_tree(entries: &[Entry]) -> Element {
    entries.iter().fold(root("urlset", MAP_SCHEMA_ATTRIBUTES), |urlset, entry| {
        let mut url = Element::new("url").child(Element::from(&Field::new("loc", entry.target())));
        if let Some(image) = entry.image() {
            url = url.child(with_fields(Element::new("image:image"), image_fields(image)));
        }
        if let Some(video) = entry.renderable_video() {
            url = url.child(with_fields(Element::new("video:video"), video_fields(video)));
        }
        urlset.child(with_fields(url, url_tail_fields(entry)))
    })
}

/// Build the `sitemapindex` tree for a list of index entries.
pub fn index_tree(entries: &[IndexEntry]) -> Element {
    entries
        .iter()
        .fold(root("sitemapindex", INDEX_SCHEMA_ATTRIBUTES), |index, entry| {
            index.child(with_fields(Element::new("sitemap"), index_fields(entry)))
        })
}

/// Serialize a tree compactly, with a declaration line and trailing newline.
pub fn serialize(root: &Element) -> Result<String> {
    let mut writer = Writer::new(Vec::with_capacity(1024));
    writer.write_event(Event::Decl(BytesDecl::new(
        XML_VERSION,
        Some(XML_ENCODING),
        None,
    )))?;
    writer.get_mut().push(b'\n');
    root.write(&mut writer)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Builds a [`Element`] tree and serializes it without indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeEngine;

impl RenderEngine for TreeEngine {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn render_urlset(&self, entries: &[Entry]) -> Result<String> {
        serialize(&urlset_tree(entries))
    }

    fn render_index(&self, entries: &[IndexEntry]) -> Result<String> {
        serialize(&index_tree(entries))
    }
}
