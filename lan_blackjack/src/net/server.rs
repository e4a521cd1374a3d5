//! Host loop: announce the table over UDP, accept TCP connections, and
//! run each accepted player in its own task.
//!
//! Admission is a counting limit of [`MAX_SESSIONS`] concurrent games. A
//! slot is claimed before the next connection is accepted, so players
//! beyond the limit wait in the listen backlog instead of being turned
//! away; each slot is returned when its session task ends, however it
//! ends.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::config::ProtocolConfig;

use super::discovery::OfferBroadcaster;
use super::messages::Offer;
use super::session::Session;

/// Most game sessions the host runs at once.
pub const MAX_SESSIONS: usize = 8;

/// A bound blackjack host, ready to announce itself and deal.
pub struct GameServer {
    listener: TcpListener,
    limiter: Arc<Semaphore>,
    config: ProtocolConfig,
    name: String,
}

impl GameServer {
    /// Bind the game listener on an ephemeral port.
    ///
    /// # Errors
    ///
    /// Fails if no TCP socket can be bound.
    pub async fn bind(name: impl Into<String>, config: ProtocolConfig) -> io::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        Ok(Self {
            listener,
            limiter: Arc::new(Semaphore::new(MAX_SESSIONS)),
            config,
            name: name.into(),
        })
    }

    /// Address the host accepts game connections on.
    ///
    /// # Errors
    ///
    /// Fails if the listener's local address cannot be read.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Announce the table and serve players until the process stops.
    ///
    /// # Errors
    ///
    /// Fails if the announcement socket cannot be set up.
    pub async fn run(self) -> io::Result<()> {
        let port = self.local_addr()?.port();
        let offer = Offer {
            port,
            name: self.name.clone(),
        };
        let broadcaster = OfferBroadcaster::bind(&offer, &self.config).await?;
        tokio::spawn(broadcaster.run());

        log::info!("accepting game connections on port {port}");
        loop {
            let permit = match self.limiter.clone().acquire_owned().await {
                Ok(permit) => permit,
                // The limiter is never closed while the server runs.
                Err(_) => break,
            };
            // Transient accept failures, like a connection aborted while
            // queued, must not stop the host.
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(error) => {
                    log::warn!("failed to accept a connection: {error}");
                    continue;
                }
            };
            log::info!("connection from {addr}");

            let config = self.config;
            tokio::spawn(async move {
                serve_connection(stream, config).await;
                drop(permit);
            });
        }
        Ok(())
    }
}

/// Handshake and play out one connection. Protocol failures are logged
/// and end the connection without a response.
async fn serve_connection(stream: TcpStream, config: ProtocolConfig) {
    let session = match Session::handshake(stream, config).await {
        Ok(session) => session,
        Err(error) => {
            log::warn!("dropping connection before handshake: {error}");
            return;
        }
    };

    let player = session.player().to_string();
    log::info!("{player} joined for {} round(s)", session.rounds());
    match session.run().await {
        Ok(()) => log::info!("{player} finished"),
        Err(error) => log::warn!("{player} left early: {error}"),
    }
}
