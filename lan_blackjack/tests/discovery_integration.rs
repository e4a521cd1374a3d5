/// Integration tests for offer discovery
///
/// The listener binds the fixed discovery port, so these tests are
/// serialized. Offers are fed to it as plain datagrams on loopback and
/// resent until the listener reports in, which rides out the window
/// before its socket is bound.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use lan_blackjack::{
    ProtocolConfig,
    discovery::{self, DISCOVERY_PORT, DiscoveredHost},
    messages::Offer,
};
use serial_test::serial;

/// Listen in a background thread until an offer with `expected` as its
/// host name arrives. Announcements from concurrently running server
/// tests carry other names and are skipped.
fn listen_for_named(expected: &'static str) -> mpsc::Receiver<DiscoveredHost> {
    let (tx, rx) = mpsc::channel();
    let config = ProtocolConfig::default();
    thread::spawn(move || {
        loop {
            match discovery::listen_for_offer(&config) {
                Ok(host) if host.name == expected => {
                    let _ = tx.send(host);
                    return;
                }
                Ok(_) => continue,
                Err(_) => return,
            }
        }
    });
    rx
}

fn send_until_received(frames: &[Vec<u8>], rx: &mpsc::Receiver<DiscoveredHost>) -> DiscoveredHost {
    let sender = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let target = SocketAddr::from((Ipv4Addr::LOCALHOST, DISCOVERY_PORT));
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        for frame in frames {
            sender.send_to(frame, target).unwrap();
        }
        match rx.recv_timeout(Duration::from_millis(25)) {
            Ok(host) => return host,
            Err(_) => assert!(Instant::now() < deadline, "listener never accepted an offer"),
        }
    }
}

#[test]
#[serial]
fn test_listener_skips_foreign_datagrams() {
    let config = ProtocolConfig::default();
    let rx = listen_for_named("Lighthouse");

    let offer = Offer {
        port: 4321,
        name: "Lighthouse".to_string(),
    };
    let frame = offer.encode(&config).to_vec();
    let mut foreign_magic = frame.clone();
    foreign_magic[0] ^= 0xff;

    // Garbage and a foreign magic value ahead of every good offer; the
    // listener must ride them out and land on the well-formed one.
    let host = send_until_received(&[b"not an offer".to_vec(), foreign_magic, frame], &rx);

    assert_eq!(host.name, "Lighthouse");
    assert_eq!(host.addr, SocketAddr::from((Ipv4Addr::LOCALHOST, 4321)));
}

#[test]
#[serial]
fn test_oversized_datagram_decodes_as_an_offer() {
    let config = ProtocolConfig::default();
    let rx = listen_for_named("Tailed");

    let offer = Offer {
        port: 5555,
        name: "Tailed".to_string(),
    };
    let mut padded = offer.encode(&config).to_vec();
    padded.extend_from_slice(&[0xaa; 21]);

    // Only the leading offer-sized prefix of a datagram is read.
    let host = send_until_received(&[padded], &rx);

    assert_eq!(host.name, "Tailed");
    assert_eq!(host.addr.port(), 5555);
}
