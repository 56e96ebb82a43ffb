use std::io;
use std::path::PathBuf;

use thiserror::Error;

use bencode::BencodeError;

use crate::file::SchemaError;

#[derive(Error, Debug)]
pub enum MetainfoError {
    #[error("Bencode error: {0}")]
    Decode(#[from] BencodeError),
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Resource error: {0}")]
    Resource(#[from] io::Error),
}

/// A [`MetainfoError`] tagged with the operation that failed and, when the
/// input came from disk, the file it was read from.
#[derive(Error, Debug)]
#[error("{op}: unable to load {source_name}: {source}")]
pub struct ReadError {
    pub op: &'static str,
    pub path: Option<PathBuf>,
    source_name: String,
    #[source]
    pub source: MetainfoError,
}

impl ReadError {
    pub(crate) fn new(op: &'static str, path: Option<PathBuf>, source: impl Into<MetainfoError>) -> Self {
        let source_name = match &path {
            Some(path) => path.display().to_string(),
            None => "reader".to_string(),
        };
        Self {
            op,
            path,
            source_name,
            source: source.into(),
        }
    }
}
