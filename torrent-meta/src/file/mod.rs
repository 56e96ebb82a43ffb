use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::util::Sha1;

mod error;
mod info_hash;
mod parse;
mod read;

pub use error::{MetainfoError, ReadError};
pub use info_hash::InfoHash;
pub use parse::{parse, FieldPath, SchemaError};
pub use read::{from_bytes, from_reader, read};

/// A parsed metainfo document together with its info hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentFile {
    pub metainfo: Metainfo,
    pub info_hash: InfoHash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metainfo {
    pub info: Info,
    pub announce: String,
    /// Tiers of fallback trackers, tried in order.
    pub announce_list: Option<Vec<Vec<String>>>,
    /// Seconds since the Unix epoch.
    pub creation_date: Option<i64>,
    pub comment: Option<String>,
    pub created_by: Option<String>,
    pub encoding: Option<String>,
}

/// Fields shared by both layouts of the info dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoCommon {
    pub piece_length: u64,
    pub pieces: Vec<Sha1>,
    pub private: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Info {
    SingleFile(SingleFileInfo),
    MultiFile(MultiFileInfo),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleFileInfo {
    pub common: InfoCommon,
    pub name: String,
    pub length: u64,
    pub md5sum: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiFileInfo {
    pub common: InfoCommon,
    /// Name of the top-level directory.
    pub name: String,
    pub files: Vec<File>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub length: u64,
    pub md5sum: Option<String>,
    /// Path components from the torrent directory down to the file name.
    pub path: Vec<String>,
}

impl Metainfo {
    /// Every tracker url: `announce` first, then the announce-list tiers in
    /// order, without duplicates.
    pub fn trackers(&self) -> Vec<&str> {
        let mut trackers = vec![self.announce.as_str()];
        let tiers = self.announce_list.iter().flatten().flatten();
        for tracker in tiers {
            if !trackers.contains(&tracker.as_str()) {
                trackers.push(tracker.as_str());
            }
        }
        trackers
    }

    pub fn creation_time(&self) -> Option<SystemTime> {
        let seconds = self.creation_date?;
        let offset = Duration::from_secs(seconds.unsigned_abs());
        if seconds >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }
}

impl Info {
    pub fn common(&self) -> &InfoCommon {
        match self {
            Info::SingleFile(info) => &info.common,
            Info::MultiFile(info) => &info.common,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Info::SingleFile(info) => &info.name,
            Info::MultiFile(info) => &info.name,
        }
    }

    /// Sum of all file lengths in bytes.
    pub fn total_length(&self) -> u64 {
        match self {
            Info::SingleFile(info) => info.length,
            Info::MultiFile(info) => info.files.iter().map(|file| file.length).sum(),
        }
    }

    pub fn is_private(&self) -> bool {
        self.common().private == Some(1)
    }
}

impl InfoCommon {
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn piece_hash(&self, index: usize) -> Option<&Sha1> {
        self.pieces.get(index)
    }
}

impl File {
    pub fn path_buf(&self) -> PathBuf {
        self.path.iter().collect()
    }
}
