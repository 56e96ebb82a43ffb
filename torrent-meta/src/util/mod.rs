pub type Sha1 = [u8; 20];

pub const SHA1_LEN: usize = 20;

/// Whether `text` looks like an MD5 digest written as 32 hex characters.
pub fn is_hex_md5(text: &str) -> bool {
    text.len() == 32 && hex::decode(text).is_ok()
}
