use std::io;
use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::file::InfoHash;
use crate::peer::handshake::HandshakeError::{
    EmptyProtocolString, InfoHashMismatch, MessageLength, ProtocolString, ProtocolStringTooLong,
};
use crate::peer::{PeerId, PEER_ID_LEN};
use crate::util::SHA1_LEN;

type Result<T> = std::result::Result<T, HandshakeError>;

pub static BIT_TORRENT_PROTOCOL_STRING: &[u8; 19] = b"BitTorrent protocol";

pub const RESERVED_LEN: usize = 8;

/// Bytes following the protocol string: reserved, info hash, peer id.
const FIXED_TAIL_LEN: usize = RESERVED_LEN + SHA1_LEN + PEER_ID_LEN;

#[derive(Error, Debug)]
pub enum HandshakeError {
    #[error("Protocol string(pstr) must not be empty")]
    EmptyProtocolString,
    #[error("Protocol string(pstr) is {0} bytes long, at most 255 fit the length prefix")]
    ProtocolStringTooLong(usize),
    #[error("Invalid handshake length, expected {expected} bytes, but got {actual}")]
    MessageLength { expected: usize, actual: usize },
    #[error("Unexpected protocol string, expected {expected:?}, but got {actual:?}")]
    ProtocolString { expected: String, actual: String },
    #[error("Peer answered for info hash {actual}, expected {expected}")]
    InfoHashMismatch { expected: InfoHash, actual: InfoHash },
    #[error(transparent)]
    IoKind(#[from] io::Error),
}

/// `<pstrlen><pstr><reserved><info_hash><peer_id>`, the first message each side
/// sends on a new peer connection.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct HandshakeMessage {
    protocol: Vec<u8>,
    reserved: [u8; RESERVED_LEN],
    info_hash: InfoHash,
    peer_id: PeerId,
}

impl HandshakeMessage {
    /// Standard `BitTorrent protocol` handshake with all reserved bits clear.
    pub fn new(info_hash: InfoHash, peer_id: PeerId) -> Self {
        Self {
            protocol: BIT_TORRENT_PROTOCOL_STRING.to_vec(),
            reserved: [0; RESERVED_LEN],
            info_hash,
            peer_id,
        }
    }

    pub fn with_protocol(
        protocol: impl Into<Vec<u8>>,
        reserved: [u8; RESERVED_LEN],
        info_hash: InfoHash,
        peer_id: PeerId,
    ) -> Result<Self> {
        let protocol = protocol.into();
        match protocol.len() {
            0 => Err(EmptyProtocolString),
            len if len > usize::from(u8::MAX) => Err(ProtocolStringTooLong(len)),
            _ => Ok(Self {
                protocol,
                reserved,
                info_hash,
                peer_id,
            }),
        }
    }

    pub fn protocol(&self) -> &[u8] {
        &self.protocol
    }

    pub fn reserved(&self) -> &[u8; RESERVED_LEN] {
        &self.reserved
    }

    pub fn info_hash(&self) -> &InfoHash {
        &self.info_hash
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    /// Encoded size, 68 bytes for the standard protocol string.
    pub fn encoded_len(&self) -> usize {
        1 + self.protocol.len() + FIXED_TAIL_LEN
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut bytes = BytesMut::with_capacity(self.encoded_len());
        // with_protocol keeps the length within u8
        bytes.put_u8(self.protocol.len() as u8);
        bytes.put_slice(&self.protocol);
        bytes.put_slice(&self.reserved);
        bytes.put_slice(self.info_hash.as_ref());
        bytes.put_slice(self.peer_id.as_ref());
        bytes.freeze()
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let mut buf = raw;
        if !buf.has_remaining() {
            return Err(MessageLength {
                expected: 1 + BIT_TORRENT_PROTOCOL_STRING.len() + FIXED_TAIL_LEN,
                actual: 0,
            });
        }
        let pstr_len = usize::from(buf.get_u8());
        if pstr_len == 0 {
            return Err(EmptyProtocolString);
        }
        let expected = 1 + pstr_len + FIXED_TAIL_LEN;
        if raw.len() != expected {
            return Err(MessageLength {
                expected,
                actual: raw.len(),
            });
        }

        let protocol = buf.copy_to_bytes(pstr_len).to_vec();
        let mut reserved = [0; RESERVED_LEN];
        buf.copy_to_slice(&mut reserved);
        let mut info_hash = [0; SHA1_LEN];
        buf.copy_to_slice(&mut info_hash);
        let mut peer_id = [0; PEER_ID_LEN];
        buf.copy_to_slice(&mut peer_id);

        Ok(Self {
            protocol,
            reserved,
            info_hash: InfoHash::new(info_hash),
            peer_id: PeerId::new(peer_id),
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Reads exactly one handshake: the length prefix first, then the rest.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut pstr_len = [0; 1];
        reader.read_exact(&mut pstr_len)?;
        let mut raw = vec![0; 1 + usize::from(pstr_len[0]) + FIXED_TAIL_LEN];
        raw[0] = pstr_len[0];
        reader.read_exact(&mut raw[1..])?;
        Self::from_bytes(&raw)
    }

    /// Checks a received handshake against what this side sent.
    pub fn verify(&self, sent: &HandshakeMessage) -> Result<()> {
        if self.protocol != sent.protocol {
            return Err(ProtocolString {
                expected: String::from_utf8_lossy(&sent.protocol).to_string(),
                actual: String::from_utf8_lossy(&self.protocol).to_string(),
            });
        }
        if self.info_hash != sent.info_hash {
            return Err(InfoHashMismatch {
                expected: sent.info_hash,
                actual: self.info_hash,
            });
        }
        Ok(())
    }
}
