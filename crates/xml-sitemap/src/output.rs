//! Write rendered documents to disk, optionally gzipped.

use crate::error::{Result, SitemapError};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// How a document is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Replace an existing file instead of failing with `FileExists`.
    pub overwrite: bool,
    /// Gzip the bytes and make sure the path ends in `.gz`.
    pub gzip: bool,
}

/// Write `bytes` to `path` and return the path actually written.
pub fn write_document(path: &Path, bytes: &[u8], options: WriteOptions) -> Result<PathBuf> {
    let path = if options.gzip {
        with_gz_suffix(path)
    } else {
        path.to_path_buf()
    };

    // create_new makes the existence check and the create one atomic step.
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .create_new(!options.overwrite)
        .open(&path);
    let mut file = match file {
        Ok(file) => BufWriter::new(file),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            return Err(SitemapError::FileExists(path));
        }
        Err(err) => return Err(err.into()),
    };
    if options.gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(bytes)?;
        encoder.finish()?.flush()?;
    } else {
        file.write_all(bytes)?;
        file.flush()?;
    }

    info!(
        path = %path.display(),
        bytes = bytes.len(),
        gzip = options.gzip,
        "wrote sitemap document"
    );
    Ok(path)
}

/// Read back a gzipped document.
pub fn read_gzip(path: &Path) -> Result<String> {
    let mut contents = String::new();
    GzDecoder::new(File::open(path)?).read_to_string(&mut contents)?;
    Ok(contents)
}

/// Append `.gz` unless the path already ends with it (any case).
pub fn with_gz_suffix(path: &Path) -> PathBuf {
    let has_suffix = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if has_suffix {
        return path.to_path_buf();
    }
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".gz");
    PathBuf::from(raw)
}
