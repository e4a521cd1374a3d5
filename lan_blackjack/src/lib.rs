//! # LAN Blackjack
//!
//! A LAN-discoverable blackjack host and client built on a small binary
//! wire protocol.
//!
//! A host announces its table by UDP broadcast once a second. Players on
//! the same network pick up the offer, connect over TCP, and request a
//! number of rounds. Each round is ace-high blackjack: an opening deal,
//! hit or stand decisions, and the dealer drawing to seventeen. Every
//! card crosses the wire as a fixed-size card event, and the final event
//! of a round carries its result code.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, decks, hands, and the single-round game engine
//! - [`net`]: Discovery broadcasts, the wire codec, and the host and
//!   client session loops
//! - [`config`]: Protocol constants and their on-disk format
//!
//! ## Example
//!
//! ```
//! use lan_blackjack::{Game, GameError, Outcome};
//!
//! let mut game = Game::new();
//! let deal = game.start()?;
//! println!("dealer shows {}", deal.dealer_upcard);
//!
//! // Stand straight away and see how the dealer fares.
//! game.player_stand()?;
//! match game.result() {
//!     Outcome::Win => println!("player wins"),
//!     Outcome::Loss => println!("dealer wins"),
//!     Outcome::Tie => println!("push"),
//! }
//! # Ok::<(), GameError>(())
//! ```

/// Networking components: discovery, wire codec, host, and client.
pub mod net;
pub use net::{
    client::{GameClient, RoundSummary},
    discovery, errors, messages, server, session, utils,
};

/// Core game logic and entities.
pub mod game;
pub use game::{Card, Deck, Game, GameError, Hand, OpeningDeal, Outcome, Shape};

/// Protocol constants and the configuration file they load from.
pub mod config;
pub use config::{DEFAULT_CONFIG_PATH, ProtocolConfig};
