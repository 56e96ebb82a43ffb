use std::path::PathBuf;

use clap::Parser;

use bencode::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_LEN};

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    pub torrent_file: PathBuf,

    /// Deepest nesting of lists and dictionaries accepted by the decoder
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Largest metainfo file accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LEN)]
    pub max_size: usize,

    /// Port reported in the announce url
    #[arg(long, default_value_t = 6881)]
    pub port: u16,

    /// Print the announce url a fresh client would request
    #[arg(long)]
    pub announce: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn limits(&self) -> bencode::Limits {
        bencode::Limits {
            max_depth: self.max_depth,
            max_len: self.max_size,
        }
    }
}
