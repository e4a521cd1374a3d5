//! Blocking game client: find a host on the LAN, request a run of
//! rounds, and play them out one decision at a time.
//!
//! The client owns no rendering or input policy. [`GameClient::play_round`]
//! calls back into the caller whenever a decision is due and hands it the
//! round state gathered so far, so a terminal front end (or any other
//! consumer) decides how to show cards and pick hit or stand.

use std::net::{SocketAddr, TcpStream};

use crate::config::ProtocolConfig;
use crate::game::entities::Card;
use crate::game::round::Outcome;

use super::discovery::{self, DiscoveredHost};
use super::errors::ProtocolError;
use super::messages::{CARD_EVENT_SIZE, CardEvent, Decision, Request};
use super::utils::{read_fixed, write_fixed};

/// Everything one round has produced so far, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RoundSummary {
    /// Cards dealt to the player, opening pair first.
    pub player_cards: Vec<Card>,
    /// The dealer card shown with the opening deal.
    pub dealer_upcard: Option<Card>,
    /// Dealer cards revealed after the player stands.
    pub dealer_cards: Vec<Card>,
    /// Set once the final card event resolves the round.
    pub outcome: Option<Outcome>,
}

/// A connected player on the host's table.
pub struct GameClient {
    /// Display name sent in the play request.
    pub name: String,
    stream: TcpStream,
    config: ProtocolConfig,
}

impl GameClient {
    /// Block until a host announces itself on the discovery port.
    ///
    /// # Errors
    ///
    /// Fails only if the discovery socket cannot be opened or read.
    pub fn discover(config: &ProtocolConfig) -> Result<DiscoveredHost, ProtocolError> {
        discovery::listen_for_offer(config)
    }

    /// Connect to a discovered host and send the play request.
    ///
    /// # Errors
    ///
    /// Fails if the TCP connection or the request write fails.
    pub fn connect(
        addr: SocketAddr,
        name: &str,
        rounds: u8,
        config: &ProtocolConfig,
    ) -> Result<Self, ProtocolError> {
        let stream = TcpStream::connect(addr)?;
        let mut client = Self {
            name: name.to_string(),
            stream,
            config: *config,
        };
        let request = Request {
            rounds,
            name: client.name.clone(),
        };
        write_fixed(&mut client.stream, &request.encode(&client.config))?;
        Ok(client)
    }

    /// Play one round against the host.
    ///
    /// Receives the opening deal, then alternates between asking `decide`
    /// for the next move and applying the host's card events, until an
    /// event carries the round result. `decide` sees the state gathered
    /// so far each time it runs.
    ///
    /// # Errors
    ///
    /// Fails if the host disconnects or sends an unreadable event;
    /// [`ProtocolError::PeerDisconnected`] on a closed connection.
    pub fn play_round(
        &mut self,
        mut decide: impl FnMut(&RoundSummary) -> Decision,
    ) -> Result<RoundSummary, ProtocolError> {
        let mut summary = RoundSummary::default();

        for _ in 0..2 {
            let event = self.read_event()?;
            summary.player_cards.push(event.card);
        }
        let event = self.read_event()?;
        summary.dealer_upcard = Some(event.card);

        loop {
            let decision = decide(&summary);
            self.send_decision(decision)?;
            match decision {
                Decision::Hit => {
                    let event = self.read_event()?;
                    summary.player_cards.push(event.card);
                    if let Some(outcome) = event.result.outcome() {
                        summary.outcome = Some(outcome);
                        return Ok(summary);
                    }
                }
                Decision::Stand => loop {
                    let event = self.read_event()?;
                    summary.dealer_cards.push(event.card);
                    if let Some(outcome) = event.result.outcome() {
                        summary.outcome = Some(outcome);
                        return Ok(summary);
                    }
                },
            }
        }
    }

    /// Read and decode the next card event from the host.
    ///
    /// # Errors
    ///
    /// Fails on a short read or a frame that does not decode.
    pub fn read_event(&mut self) -> Result<CardEvent, ProtocolError> {
        let mut buf = [0u8; CARD_EVENT_SIZE];
        read_fixed(&mut self.stream, &mut buf)?;
        CardEvent::decode(&buf, &self.config)
    }

    /// Send one decision line to the host.
    ///
    /// # Errors
    ///
    /// Fails if the write fails.
    pub fn send_decision(&mut self, decision: Decision) -> Result<(), ProtocolError> {
        let line = format!("{decision}\n");
        write_fixed(&mut self.stream, line.as_bytes())
    }
}
