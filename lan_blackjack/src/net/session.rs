//! Host-side game session: one connection, one player, a run of rounds.
//!
//! A session begins with the handshake that reads the client's play
//! request and then works through the requested rounds. Each round is a
//! fresh [`Game`]: deal three card events, then answer hit and stand
//! decisions until the round resolves. The final event of a round carries
//! its result code; every earlier event carries `Continue`.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::config::ProtocolConfig;
use crate::game::entities::GameError;
use crate::game::round::Game;

use super::errors::ProtocolError;
use super::messages::{CardEvent, Decision, REQUEST_SIZE, Request, ResultCode};

/// Most bytes one decision line may hold; prevents unbounded buffering
/// of a line that never ends.
const MAX_DECISION_LINE: u64 = 64;

/// Session-fatal failures: the protocol broke or the deck ran dry.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl From<io::Error> for SessionError {
    fn from(error: io::Error) -> Self {
        Self::Protocol(ProtocolError::from(error))
    }
}

/// Drives the card game for a single accepted connection.
pub struct Session {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    config: ProtocolConfig,
    player: String,
    rounds: u8,
}

impl Session {
    /// Read and validate the one play request every connection starts
    /// with.
    ///
    /// # Errors
    ///
    /// A short read or a request with a foreign magic value is an error;
    /// callers drop the connection without responding.
    pub async fn handshake(
        stream: TcpStream,
        config: ProtocolConfig,
    ) -> Result<Self, ProtocolError> {
        let (read_half, write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        let mut buf = [0u8; REQUEST_SIZE];
        reader.read_exact(&mut buf).await?;
        let request = Request::decode(&buf, &config)?;

        Ok(Self {
            reader,
            writer: write_half,
            config,
            player: request.name,
            rounds: request.rounds,
        })
    }

    /// Player name from the handshake.
    pub fn player(&self) -> &str {
        &self.player
    }

    /// Rounds requested in the handshake.
    pub fn rounds(&self) -> u8 {
        self.rounds
    }

    /// Play every requested round in order, then let the connection drop.
    ///
    /// # Errors
    ///
    /// Stops at the first session-fatal error; recoverable invalid
    /// decisions never surface here.
    pub async fn run(mut self) -> Result<(), SessionError> {
        for round in 1..=self.rounds {
            log::info!("player {}: round {round}/{}", self.player, self.rounds);
            self.play_round().await?;
        }
        Ok(())
    }

    async fn play_round(&mut self) -> Result<(), SessionError> {
        let mut game = Game::new();

        let deal = game.start()?;
        for card in deal.player {
            self.send_event(CardEvent {
                result: ResultCode::Continue,
                card,
            })
            .await?;
        }
        self.send_event(CardEvent {
            result: ResultCode::Continue,
            card: deal.dealer_upcard,
        })
        .await?;

        loop {
            match self.read_decision().await? {
                Decision::Hit => {
                    let card = game.player_hit()?;
                    if game.is_finished() {
                        let outcome = game.result();
                        self.send_event(CardEvent {
                            result: outcome.into(),
                            card,
                        })
                        .await?;
                        log::info!("player {} busts: {outcome}", self.player);
                        return Ok(());
                    }
                    self.send_event(CardEvent {
                        result: ResultCode::Continue,
                        card,
                    })
                    .await?;
                }
                Decision::Stand => {
                    let revealed = game.player_stand()?;
                    let outcome = game.result();
                    let last = revealed.len().saturating_sub(1);
                    for (idx, card) in revealed.into_iter().enumerate() {
                        let result = if idx == last {
                            ResultCode::from(outcome)
                        } else {
                            ResultCode::Continue
                        };
                        self.send_event(CardEvent { result, card }).await?;
                    }
                    log::info!("player {} stands: {outcome}", self.player);
                    return Ok(());
                }
            }
        }
    }

    /// Read decision lines until one parses. Unrecognized tokens are
    /// logged and read again without consuming the player's turn; a
    /// closed connection or a line past [`MAX_DECISION_LINE`] bytes ends
    /// the session.
    async fn read_decision(&mut self) -> Result<Decision, ProtocolError> {
        loop {
            let mut line = String::new();
            let read = (&mut self.reader)
                .take(MAX_DECISION_LINE)
                .read_line(&mut line)
                .await?;
            if read == 0 {
                return Err(ProtocolError::PeerDisconnected);
            }
            if !line.ends_with('\n') && read as u64 == MAX_DECISION_LINE {
                return Err(ProtocolError::malformed(format!(
                    "decision line exceeds {MAX_DECISION_LINE} bytes"
                )));
            }
            match line.trim_end_matches(['\r', '\n']).parse::<Decision>() {
                Ok(decision) => return Ok(decision),
                Err(error) => log::warn!("player {}: {error}", self.player),
            }
        }
    }

    async fn send_event(&mut self, event: CardEvent) -> Result<(), ProtocolError> {
        log::debug!("player {}: sending {event}", self.player);
        let frame = event.encode(&self.config);
        self.writer.write_all(&frame).await?;
        Ok(())
    }
}
