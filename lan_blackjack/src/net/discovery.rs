//! LAN discovery: offer broadcasting on the host, offer listening on the
//! client.
//!
//! The host sends one offer datagram per second to the subnet broadcast
//! address. No acknowledgment exists; the periodic repeat is the only
//! delivery mechanism. Clients bind the same well-known port, skip
//! anything that does not decode as an offer, and take the first one
//! that does.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use tokio::time::{Duration, interval};

use crate::config::ProtocolConfig;

use super::errors::ProtocolError;
use super::messages::{OFFER_SIZE, Offer};

/// UDP port offers are broadcast to and discovered on.
pub const DISCOVERY_PORT: u16 = 13122;

/// Time between offer broadcasts.
pub const BROADCAST_INTERVAL: Duration = Duration::from_secs(1);

/// Periodically announces a host over UDP broadcast.
pub struct OfferBroadcaster {
    socket: tokio::net::UdpSocket,
    frame: [u8; OFFER_SIZE],
    name: String,
}

impl OfferBroadcaster {
    /// Open a broadcast-capable socket and pre-encode the offer.
    ///
    /// # Errors
    ///
    /// Fails if the socket cannot be opened or put into broadcast mode.
    pub async fn bind(offer: &Offer, config: &ProtocolConfig) -> io::Result<Self> {
        let socket = tokio::net::UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.set_broadcast(true)?;
        Ok(Self {
            socket,
            frame: offer.encode(config),
            name: offer.name.clone(),
        })
    }

    /// Broadcast the offer once per [`BROADCAST_INTERVAL`] until the task
    /// is dropped. Send failures are logged and tolerated; the next tick
    /// repeats the offer anyway.
    pub async fn run(self) {
        let target = SocketAddr::from((Ipv4Addr::BROADCAST, DISCOVERY_PORT));
        log::info!(
            "announcing '{}' to {target} every {}s",
            self.name,
            BROADCAST_INTERVAL.as_secs()
        );

        let mut tick = interval(BROADCAST_INTERVAL);
        loop {
            tick.tick().await;
            if let Err(error) = self.socket.send_to(&self.frame, target).await {
                log::warn!("offer broadcast failed: {error}");
            }
        }
    }
}

/// A host learned from a broadcast offer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiscoveredHost {
    /// Advertised host name.
    pub name: String,
    /// Game endpoint: the datagram's source address paired with the
    /// offered TCP port.
    pub addr: SocketAddr,
}

/// Block until a well-formed offer arrives on the discovery port.
///
/// Datagrams that fail to decode, including those with a foreign magic
/// value, are logged and skipped; listening continues. The first offer
/// that decodes wins.
///
/// # Errors
///
/// Fails if the discovery port cannot be bound or a receive fails.
pub fn listen_for_offer(config: &ProtocolConfig) -> Result<DiscoveredHost, ProtocolError> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, DISCOVERY_PORT))?;
    log::info!("listening for offers on port {DISCOVERY_PORT}");

    loop {
        let mut buf = [0u8; OFFER_SIZE];
        let (len, from) = socket.recv_from(&mut buf)?;
        match Offer::decode(&buf[..len], config) {
            Ok(offer) => {
                log::info!("discovered {offer} at {}", from.ip());
                return Ok(DiscoveredHost {
                    addr: SocketAddr::new(from.ip(), offer.port),
                    name: offer.name,
                });
            }
            Err(error) => {
                log::debug!("ignoring datagram from {from}: {error}");
            }
        }
    }
}
