use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors while reading the logistics file.  Anything after a
/// successful load degrades to missing values instead of failing.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("expected a JSON array of objects (records orientation)")]
    NotRecords,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}
