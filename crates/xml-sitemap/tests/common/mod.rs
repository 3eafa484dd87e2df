//! Shared helpers for the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::PathBuf;
use xml_sitemap::{EntryOptions, FixedClock, Map, MapOptions};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2011, 6, 1, 0, 0, 1).unwrap()
}

pub fn clock() -> FixedClock {
    FixedClock(base_time())
}

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

/// `foobar.com` map created at the base time with `about` added.
pub fn about_map(options: MapOptions) -> Map {
    let mut map = Map::with_clock("foobar.com", options, &clock()).unwrap();
    map.add("about", EntryOptions::default()).unwrap();
    map
}

/// A parsed XML event, with attributes sorted and text unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Start(String, Vec<(String, String)>),
    Text(String),
    End(String),
}

fn start_node(e: &BytesStart<'_>) -> XmlNode {
    let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
    let mut attributes: Vec<(String, String)> = e
        .attributes()
        .map(|a| {
            let a = a.unwrap();
            (
                String::from_utf8(a.key.as_ref().to_vec()).unwrap(),
                a.unescape_value().unwrap().into_owned(),
            )
        })
        .collect();
    attributes.sort();
    XmlNode::Start(name, attributes)
}

/// Parse a document into a flat event list, ignoring formatting.
pub fn xml_nodes(xml: &str) -> Vec<XmlNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut nodes = Vec::new();

    loop {
        match reader.read_event().unwrap() {
            Event::Start(ref e) => nodes.push(start_node(e)),
            Event::Empty(ref e) => {
                let start = start_node(e);
                if let XmlNode::Start(ref name, _) = start {
                    let name = name.clone();
                    nodes.push(start);
                    nodes.push(XmlNode::End(name));
                }
            }
            Event::Text(ref e) => nodes.push(XmlNode::Text(e.unescape().unwrap().into_owned())),
            Event::End(ref e) => nodes.push(XmlNode::End(
                String::from_utf8(e.name().as_ref().to_vec()).unwrap(),
            )),
            Event::Eof => break,
            _ => {}
        }
    }

    nodes
}

/// Text of every element called `name`, unescaped.
pub fn texts_of(xml: &str, name: &str) -> Vec<String> {
    let nodes = xml_nodes(xml);
    nodes
        .windows(2)
        .filter_map(|pair| match pair {
            [XmlNode::Start(n, _), XmlNode::Text(t)] if n == name => Some(t.clone()),
            _ => None,
        })
        .collect()
}
