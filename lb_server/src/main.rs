//! LAN blackjack host.
//!
//! Binds a TCP listener on an ephemeral port, announces it over UDP
//! broadcast once a second, and deals rounds to every player that
//! connects, up to eight tables at once.

use anyhow::Error;
use ctrlc::set_handler;
use lan_blackjack::{DEFAULT_CONFIG_PATH, ProtocolConfig, server::GameServer};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Host a blackjack table on the local network

USAGE:
  lb_server NAME

ARGS:
  NAME                     Display name announced to players (at most 32 bytes)

FLAGS:
  -h, --help               Print help information
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let name: String = pargs.free_from_str()?;
    let leftover = pargs.finish();
    if !leftover.is_empty() {
        anyhow::bail!("unexpected arguments: {leftover:?}");
    }

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();

    let config = ProtocolConfig::load(DEFAULT_CONFIG_PATH)?;
    let server = GameServer::bind(name.as_str(), config).await?;
    info!(
        "Hosting '{name}' on port {}. Press Ctrl+C to stop.",
        server.local_addr()?.port()
    );
    server.run().await?;

    Ok(())
}
