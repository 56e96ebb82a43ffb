use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;

use rand::RngCore;

pub mod handshake;

pub const PEER_ID_LEN: usize = 20;

/// Client prefix in the Azureus style: `-` + two letter client code +
/// four digit version + `-`.
pub const CLIENT_PREFIX: &[u8; 8] = b"-VM0001-";

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PeerId([u8; PEER_ID_LEN]);

impl PeerId {
    pub fn new(peer_id: [u8; PEER_ID_LEN]) -> Self {
        Self(peer_id)
    }

    /// Twenty bytes from the thread-local CSPRNG.
    pub fn random() -> Self {
        let mut peer_id = [0; PEER_ID_LEN];
        rand::thread_rng().fill_bytes(&mut peer_id);
        Self::new(peer_id)
    }

    /// [`CLIENT_PREFIX`] followed by random bytes.
    pub fn with_client_prefix() -> Self {
        let mut peer_id = [0; PEER_ID_LEN];
        peer_id[..CLIENT_PREFIX.len()].copy_from_slice(CLIENT_PREFIX);
        rand::thread_rng().fill_bytes(&mut peer_id[CLIENT_PREFIX.len()..]);
        Self::new(peer_id)
    }
}

impl Borrow<[u8]> for PeerId {
    fn borrow(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl AsRef<[u8]> for PeerId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl Deref for PeerId {
    type Target = [u8; PEER_ID_LEN];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new([0; PEER_ID_LEN])
    }
}

impl Debug for PeerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PeerId({})", String::from_utf8_lossy(&self.0).escape_debug())
    }
}

#[cfg(test)]
mod tests {
    use crate::peer::{PeerId, CLIENT_PREFIX};

    #[test]
    fn random_ids_differ() {
        assert_ne!(PeerId::random(), PeerId::random());
    }

    #[test]
    fn prefixed_id_starts_with_client_prefix() {
        let first = PeerId::with_client_prefix();
        let second = PeerId::with_client_prefix();
        assert_eq!(&first[..8], CLIENT_PREFIX.as_slice());
        assert_ne!(first, second);
    }

    #[test]
    fn default_is_zeroed() {
        assert_eq!(PeerId::default().as_ref(), [0u8; 20].as_slice());
    }
}
