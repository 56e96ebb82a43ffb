use std::fmt::{Display, Formatter};

use thiserror::Error;
use tracing::{debug, warn};

use bencode::{BencodeDict, Value};

use crate::file::{File, Info, InfoCommon, Metainfo, MultiFileInfo, SingleFileInfo};
use crate::util::{is_hex_md5, Sha1, SHA1_LEN};

type Result<T> = std::result::Result<T, SchemaError>;

const INFO_FIELD: &str = "info";
const ANNOUNCE_FIELD: &str = "announce";
const ANNOUNCE_LIST_FIELD: &str = "announce-list";
const CREATION_DATE_FIELD: &str = "creation date";
const COMMENT_FIELD: &str = "comment";
const CREATED_BY_FIELD: &str = "created by";
const ENCODING_FIELD: &str = "encoding";

const PIECE_LENGTH_FIELD: &str = "piece length";
const PIECES_FIELD: &str = "pieces";
const PRIVATE_FIELD: &str = "private";
const NAME_FIELD: &str = "name";
const LENGTH_FIELD: &str = "length";
const MD5SUM_FIELD: &str = "md5sum";
const FILES_FIELD: &str = "files";
const PATH_FIELD: &str = "path";

/// Dotted location of a field inside the document, e.g. `info.files[2].path`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{key}", self.0))
        }
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("{0}: missing required field")]
    MissingField(FieldPath),
    #[error("{path}: expected {expected}, got {actual}")]
    WrongType {
        path: FieldPath,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("{path}: {reason}")]
    InvalidValue { path: FieldPath, reason: String },
}

impl SchemaError {
    pub fn path(&self) -> &FieldPath {
        match self {
            SchemaError::MissingField(path) => path,
            SchemaError::WrongType { path, .. } => path,
            SchemaError::InvalidValue { path, .. } => path,
        }
    }

    pub(crate) fn wrong_type(path: &FieldPath, expected: &'static str, actual: &Value) -> Self {
        SchemaError::WrongType {
            path: path.clone(),
            expected,
            actual: actual.name(),
        }
    }

    fn invalid(path: &FieldPath, reason: impl Into<String>) -> Self {
        SchemaError::InvalidValue {
            path: path.clone(),
            reason: reason.into(),
        }
    }
}

/// Maps a decoded document onto [`Metainfo`].
///
/// Fields are checked in a fixed order and the first violation is returned.
pub fn parse(value: &Value) -> Result<Metainfo> {
    let root = FieldPath::root();
    let dict = dictionary(value, &root)?;

    let info = required(dict, &root, INFO_FIELD, parse_info)?;
    let announce = required(dict, &root, ANNOUNCE_FIELD, string)?;
    let announce_list = optional(dict, &root, ANNOUNCE_LIST_FIELD, announce_list)?;
    let creation_date = optional(dict, &root, CREATION_DATE_FIELD, integer)?;
    let comment = optional(dict, &root, COMMENT_FIELD, string)?;
    let created_by = optional(dict, &root, CREATED_BY_FIELD, string)?;
    let encoding = optional(dict, &root, ENCODING_FIELD, string)?;

    Ok(Metainfo {
        info,
        announce,
        announce_list,
        creation_date,
        comment,
        created_by,
        encoding,
    })
}

fn parse_info(value: &Value, path: &FieldPath) -> Result<Info> {
    let dict = dictionary(value, path)?;

    let common = InfoCommon {
        piece_length: required(dict, path, PIECE_LENGTH_FIELD, positive)?,
        pieces: required(dict, path, PIECES_FIELD, pieces)?,
        private: optional(dict, path, PRIVATE_FIELD, private)?,
    };

    if dict.contains_key(LENGTH_FIELD.as_bytes()) {
        debug!(field = %path, "length present, single file layout");
        Ok(Info::SingleFile(SingleFileInfo {
            common,
            name: required(dict, path, NAME_FIELD, string)?,
            length: required(dict, path, LENGTH_FIELD, non_negative)?,
            md5sum: optional(dict, path, MD5SUM_FIELD, md5sum)?,
        }))
    } else {
        debug!(field = %path, "length absent, multi file layout");
        Ok(Info::MultiFile(MultiFileInfo {
            common,
            name: required(dict, path, NAME_FIELD, string)?,
            files: files(dict, path)?,
        }))
    }
}

// Absent, non-list and empty `files` are all reported as a missing field.
fn files(info: &BencodeDict, path: &FieldPath) -> Result<Vec<File>> {
    let path = path.key(FILES_FIELD);
    match info.get(FILES_FIELD.as_bytes()) {
        Some(Value::List(files)) if !files.is_empty() => files
            .iter()
            .enumerate()
            .map(|(index, file)| parse_file(file, &path.index(index)))
            .collect(),
        Some(other) => {
            debug!(field = %path, kind = other.name(), "files is not a non-empty list");
            Err(SchemaError::MissingField(path))
        }
        None => Err(SchemaError::MissingField(path)),
    }
}

fn parse_file(value: &Value, path: &FieldPath) -> Result<File> {
    let dict = dictionary(value, path)?;
    Ok(File {
        length: required(dict, path, LENGTH_FIELD, non_negative)?,
        md5sum: optional(dict, path, MD5SUM_FIELD, md5sum)?,
        path: required(dict, path, PATH_FIELD, path_segments)?,
    })
}

fn path_segments(value: &Value, path: &FieldPath) -> Result<Vec<String>> {
    let list = list(value, path)?;
    if list.is_empty() {
        return Err(SchemaError::invalid(path, "must contain at least one segment"));
    }
    list.iter()
        .enumerate()
        .map(|(index, segment)| string(segment, &path.index(index)))
        .collect()
}

fn announce_list(value: &Value, path: &FieldPath) -> Result<Vec<Vec<String>>> {
    list(value, path)?
        .iter()
        .enumerate()
        .map(|(index, tier)| -> Result<Vec<String>> {
            let path = path.index(index);
            let tier = list(tier, &path)?;
            if tier.is_empty() {
                return Err(SchemaError::invalid(&path, "tier must not be empty"));
            }
            tier.iter()
                .enumerate()
                .map(|(index, url)| string(url, &path.index(index)))
                .collect()
        })
        .collect()
}

fn pieces(value: &Value, path: &FieldPath) -> Result<Vec<Sha1>> {
    let bytes = bytes(value, path)?;
    if bytes.len() % SHA1_LEN != 0 {
        return Err(SchemaError::invalid(
            path,
            format!("length {} is not a multiple of {SHA1_LEN}", bytes.len()),
        ));
    }
    Ok(bytes
        .chunks_exact(SHA1_LEN)
        .map(|chunk| {
            let mut hash: Sha1 = [0; SHA1_LEN];
            hash.copy_from_slice(chunk);
            hash
        })
        .collect())
}

fn private(value: &Value, path: &FieldPath) -> Result<i64> {
    let flag = integer(value, path)?;
    if flag != 0 && flag != 1 {
        warn!(field = %path, flag, "private flag is neither 0 nor 1");
    }
    Ok(flag)
}

// A malformed checksum is kept as-is, it never fails the parse.
fn md5sum(value: &Value, path: &FieldPath) -> Result<String> {
    let checksum = string(value, path)?;
    if !is_hex_md5(&checksum) {
        warn!(field = %path, checksum = %checksum, "md5sum is not 32 hex characters");
    }
    Ok(checksum)
}

fn required<'a, T>(
    dict: &'a BencodeDict,
    path: &FieldPath,
    key: &str,
    extract: impl FnOnce(&'a Value, &FieldPath) -> Result<T>,
) -> Result<T> {
    let path = path.key(key);
    match dict.get(key.as_bytes()) {
        Some(value) => extract(value, &path),
        None => Err(SchemaError::MissingField(path)),
    }
}

fn optional<'a, T>(
    dict: &'a BencodeDict,
    path: &FieldPath,
    key: &str,
    extract: impl FnOnce(&'a Value, &FieldPath) -> Result<T>,
) -> Result<Option<T>> {
    dict.get(key.as_bytes())
        .map(|value| extract(value, &path.key(key)))
        .transpose()
}

fn dictionary<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a BencodeDict> {
    match value {
        Value::Dict(dict) => Ok(dict),
        other => Err(SchemaError::wrong_type(path, Value::dictionary_name(), other)),
    }
}

fn list<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a [Value]> {
    match value {
        Value::List(list) => Ok(list),
        other => Err(SchemaError::wrong_type(path, Value::list_name(), other)),
    }
}

fn bytes<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a [u8]> {
    match value {
        Value::String(bytes) => Ok(bytes),
        other => Err(SchemaError::wrong_type(path, Value::string_name(), other)),
    }
}

fn string(value: &Value, path: &FieldPath) -> Result<String> {
    let bytes = bytes(value, path)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| SchemaError::invalid(path, format!("invalid UTF-8: {}", e.utf8_error())))
}

fn integer(value: &Value, path: &FieldPath) -> Result<i64> {
    match value {
        Value::Int(int) => Ok(*int),
        other => Err(SchemaError::wrong_type(path, Value::integer_name(), other)),
    }
}

fn non_negative(value: &Value, path: &FieldPath) -> Result<u64> {
    let int = integer(value, path)?;
    u64::try_from(int).map_err(|_| SchemaError::invalid(path, format!("{int} is negative")))
}

fn positive(value: &Value, path: &FieldPath) -> Result<u64> {
    match non_negative(value, path)? {
        0 => Err(SchemaError::invalid(path, "must be positive")),
        int => Ok(int),
    }
}
