use std::fmt::{Debug, Display, Formatter};

use sha1::Digest;

use bencode::Value;

use crate::file::{FieldPath, SchemaError};
use crate::util::Sha1;

const INFO_KEY: &[u8] = b"info";

/// SHA-1 of the encoded `info` dictionary, exactly as it appears in the file.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash(Sha1);

impl InfoHash {
    pub fn new(hash: Sha1) -> Self {
        Self(hash)
    }

    /// Hashes the bytes of `data` that encoded the `info` value of `document`.
    ///
    /// `document` must be the value decoded from `data`; values built by hand
    /// carry no byte spans.
    pub fn from_document(data: &[u8], document: &Value) -> Result<Self, SchemaError> {
        let root = FieldPath::root();
        let Value::Dict(dict) = document else {
            return Err(SchemaError::wrong_type(&root, Value::dictionary_name(), document));
        };
        let span = dict
            .raw_span(INFO_KEY)
            .ok_or_else(|| SchemaError::MissingField(root.key("info")))?;
        let raw_info = data.get(span).ok_or_else(|| SchemaError::InvalidValue {
            path: root.key("info"),
            reason: "byte span lies outside the input".to_string(),
        })?;
        Ok(Self::digest(raw_info))
    }

    pub fn digest(raw_info: &[u8]) -> Self {
        Self(sha1::Sha1::digest(raw_info).into())
    }

    pub fn as_bytes(&self) -> &Sha1 {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for InfoHash {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl From<Sha1> for InfoHash {
    fn from(value: Sha1) -> Self {
        Self(value)
    }
}

impl Display for InfoHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for InfoHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "InfoHash({})", self.to_hex())
    }
}
