//! Error type shared by every sitemap operation.

use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Errors raised while building, rendering or writing sitemaps.
///
/// Every validation error is raised before any state is touched, so a failed
/// `add` or `register` leaves the map or index exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    #[error("domain required")]
    InvalidDomain,

    #[error("target is empty")]
    EmptyTarget,

    #[error("target can't be longer than 2,048 characters (got {length})")]
    InvalidTarget { length: usize },

    #[error("only up to {limit} records allowed")]
    CapacityExceeded { limit: usize },

    #[error("time, date, or ISO8601 string required for {field}")]
    InvalidTimeType { field: &'static str },

    #[error("string provided to {field} did not match ISO8601 standard: {value:?}")]
    InvalidTimeFormat { field: &'static str, value: String },

    #[error("invalid period value '{0}'")]
    InvalidPeriod(String),

    #[error("not a sitemap: {0}")]
    NotACollection(String),

    #[error("map is empty")]
    EmptyCollection,

    #[error("file already exists and not overwritable: {}", .0.display())]
    FileExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML writer error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("rendered document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
