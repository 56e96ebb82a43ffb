use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use torrent_meta::file;
use torrent_meta::peer::PeerId;
use torrent_meta::tracker::{announce_url, AnnounceParameters, RequestMode, TrackerEvent};

mod cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Args::parse();
    init_logging(cli.verbose);

    let torrent = file::read(&cli.torrent_file, cli.limits())
        .with_context(|| format!("failed to load {}", cli.torrent_file.display()))?;
    println!("{:#?}", torrent.metainfo);
    println!("info hash: {}", torrent.info_hash);

    if cli.announce {
        let peer_id = PeerId::with_client_prefix();
        let mut params = AnnounceParameters::for_torrent(&torrent, &peer_id);
        params
            .set_port(cli.port)
            .set_request_mode(RequestMode::Compact)
            .set_event(TrackerEvent::Started);
        let url = announce_url(&torrent.metainfo.announce, &params)
            .context("failed to build announce url")?;
        println!("announce: {url}");
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
