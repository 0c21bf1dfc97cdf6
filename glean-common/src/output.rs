//! JSON output documents.
//!
//! Every pipeline ends by writing one array to disk, indented with four
//! spaces. Non-ASCII text is written as UTF-8, never `\uXXXX` escapes.
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize output for {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialize `value` with a four-space indent.
pub fn to_pretty_bytes<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Write `value` to `path`, replacing any existing file.
pub fn write_json_pretty<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let bytes = to_pretty_bytes(value).map_err(|source| OutputError::Json {
        path: label.clone(),
        source,
    })?;

    let file = File::create(path).map_err(|source| OutputError::Io {
        path: label.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .and_then(|_| writer.flush())
        .map_err(|source| OutputError::Io {
            path: label.clone(),
            source,
        })?;

    tracing::debug!(path = %label, bytes = bytes.len(), "output.written");
    Ok(())
}
