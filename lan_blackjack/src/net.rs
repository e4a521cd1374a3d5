//! Networking layer for host-client play over the LAN.
//!
//! Discovery runs over UDP broadcast and game sessions over TCP, with a
//! fixed-size binary frame per message. The host side is async on
//! `tokio`; the client side blocks on plain `std::net` sockets.

/// Blocking client for discovering a host and playing rounds.
pub mod client;

/// UDP offer broadcasting and discovery listening.
pub mod discovery;

/// Error types shared across the networking layer.
pub mod errors;

/// Fixed-size wire messages and their binary codec.
pub mod messages;

/// Async host: admission control, accept loop, and session tasks.
pub mod server;

/// One accepted connection's handshake and round loop.
pub mod session;

/// Helpers for reading and writing whole frames.
pub mod utils;
