use std::fmt::{Display, Formatter};
use std::net::IpAddr;

use percent_encoding::{percent_encode, NON_ALPHANUMERIC};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::file::{InfoHash, TorrentFile};
use crate::peer::PeerId;
use crate::tracker::TrackerError::UnsupportedProtocol;

type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Invalid announce url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unsupported protocol {0}")]
    UnsupportedProtocol(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    Started,
    Stopped,
    Completed,
}

impl Display for TrackerEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let string = match self {
            TrackerEvent::Started => "started",
            TrackerEvent::Stopped => "stopped",
            TrackerEvent::Completed => "completed",
        };
        write!(f, "{string}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Verbose,
    NoPeerId,
    Compact,
}

/// Transfer counters reported to the tracker, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub uploaded: u64,
    pub downloaded: u64,
    pub left: u64,
}

/// Query parameters of an HTTP announce request.
#[derive(Debug, Clone)]
pub struct AnnounceParameters<'a> {
    info_hash: &'a InfoHash,
    peer_id: &'a PeerId,
    port: u16,
    progress: Progress,
    request_mode: RequestMode,
    event: Option<TrackerEvent>,
    num_want: Option<usize>,
    ip: Option<IpAddr>,
}

impl<'a> AnnounceParameters<'a> {
    pub fn new(info_hash: &'a InfoHash, peer_id: &'a PeerId) -> Self {
        Self {
            info_hash,
            peer_id,
            port: 0,
            progress: Progress::default(),
            request_mode: RequestMode::Verbose,
            event: None,
            num_want: None,
            ip: None,
        }
    }

    /// Parameters for a client that has nothing yet: the whole content is left.
    pub fn for_torrent(torrent: &'a TorrentFile, peer_id: &'a PeerId) -> Self {
        let mut params = Self::new(&torrent.info_hash, peer_id);
        params.progress.left = torrent.metainfo.info.total_length();
        params
    }

    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    pub fn set_progress(&mut self, progress: Progress) -> &mut Self {
        self.progress = progress;
        self
    }

    pub fn set_request_mode(&mut self, request_mode: RequestMode) -> &mut Self {
        self.request_mode = request_mode;
        self
    }

    pub fn set_event(&mut self, event: TrackerEvent) -> &mut Self {
        self.event = Some(event);
        self
    }

    pub fn set_num_want(&mut self, num_want: usize) -> &mut Self {
        self.num_want = Some(num_want);
        self
    }

    pub fn set_ip(&mut self, ip: IpAddr) -> &mut Self {
        self.ip = Some(ip);
        self
    }

    /// Every textual parameter in request order. The binary `info_hash` and
    /// `peer_id` are not included.
    fn text_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("port", self.port.to_string()),
            ("uploaded", self.progress.uploaded.to_string()),
            ("downloaded", self.progress.downloaded.to_string()),
            ("left", self.progress.left.to_string()),
        ];
        match self.request_mode {
            RequestMode::Verbose => {}
            RequestMode::NoPeerId => pairs.push(("no_peer_id", "1".to_string())),
            RequestMode::Compact => pairs.push(("compact", "1".to_string())),
        }
        pairs.extend(self.event.map(|event| ("event", event.to_string())));
        pairs.extend(self.num_want.map(|num_want| ("numwant", num_want.to_string())));
        pairs.extend(self.ip.map(|ip| ("ip", ip.to_string())));
        pairs
    }
}

/// Builds the GET url for announcing to `announce`. A query already present in
/// the tracker url stays in front of the announce parameters.
pub fn announce_url(announce: &str, params: &AnnounceParameters) -> Result<Url> {
    let mut url = Url::parse(announce)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(UnsupportedProtocol(url.scheme().to_string()));
    }

    // form encoding would mangle raw bytes, so these two are escaped here
    let binary = format!(
        "info_hash={}&peer_id={}",
        percent_encode(params.info_hash.as_ref(), NON_ALPHANUMERIC),
        percent_encode(params.peer_id.as_ref(), NON_ALPHANUMERIC),
    );
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{binary}"),
        _ => binary,
    };
    url.set_query(Some(query.as_str()));
    url.query_pairs_mut().extend_pairs(params.text_pairs());

    debug!(url = %url, "built announce url");
    Ok(url)
}
