use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use bencode::{BencodeError, ErrorKind, Limits};

use crate::file::{parse, InfoHash, MetainfoError, ReadError, TorrentFile};

/// Decodes, validates and hashes a metainfo document held in memory.
pub fn from_bytes(data: &[u8], limits: Limits) -> Result<TorrentFile, MetainfoError> {
    let value = bencode::from_slice_with_limits(data, limits)?;
    let metainfo = parse(&value)?;
    let info_hash = InfoHash::from_document(data, &value)?;
    Ok(TorrentFile {
        metainfo,
        info_hash,
    })
}

/// Reads a whole document from `reader`, refusing more than `limits.max_len`
/// bytes.
pub fn from_reader<R: Read>(reader: R, limits: Limits) -> Result<TorrentFile, ReadError> {
    const OP: &str = "file.from_reader";
    let data = read_limited(reader, limits).map_err(|e| ReadError::new(OP, None, e))?;
    from_bytes(&data, limits).map_err(|e| ReadError::new(OP, None, e))
}

/// Opens and parses the file at `path`. The handle is closed before parsing
/// starts, whether or not reading succeeded.
pub fn read(path: impl AsRef<Path>, limits: Limits) -> Result<TorrentFile, ReadError> {
    const OP: &str = "file.read";
    let path = path.as_ref();
    debug!(path = %path.display(), "reading metainfo");

    let data = fs::File::open(path)
        .map_err(MetainfoError::from)
        .and_then(|file| read_limited(file, limits))
        .map_err(|e| ReadError::new(OP, Some(path.to_path_buf()), e))?;

    let torrent =
        from_bytes(&data, limits).map_err(|e| ReadError::new(OP, Some(path.to_path_buf()), e))?;
    info!(
        path = %path.display(),
        info_hash = %torrent.info_hash,
        name = torrent.metainfo.info.name(),
        "parsed metainfo"
    );
    Ok(torrent)
}

fn read_limited<R: Read>(reader: R, limits: Limits) -> Result<Vec<u8>, MetainfoError> {
    let mut data = Vec::new();
    let ceiling = u64::try_from(limits.max_len).unwrap_or(u64::MAX).saturating_add(1);
    reader.take(ceiling).read_to_end(&mut data)?;
    if data.len() > limits.max_len {
        let kind = ErrorKind::InputTooLarge(limits.max_len);
        return Err(BencodeError::new(limits.max_len, kind).into());
    }
    Ok(data)
}
