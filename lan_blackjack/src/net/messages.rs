//! Fixed-layout wire messages for discovery and play.
//!
//! Three message shapes cross the network, all big-endian with no framing
//! beyond their fixed sizes: the UDP [`Offer`] broadcast, the one-shot
//! [`Request`] a client sends after connecting, and the [`CardEvent`] the
//! host sends for every dealt or revealed card. Player decisions travel
//! the other way as newline-terminated [`Decision`] tokens.

use std::fmt;
use std::str::FromStr;

use crate::config::ProtocolConfig;
use crate::game::entities::{Card, Shape};
use crate::game::round::Outcome;

use super::errors::ProtocolError;

/// Wire size of an offer datagram.
pub const OFFER_SIZE: usize = 39;

/// Wire size of a play request.
pub const REQUEST_SIZE: usize = 38;

/// Wire size of a card event.
pub const CARD_EVENT_SIZE: usize = 9;

/// Wire size of the null-padded name field in offers and requests.
pub const NAME_LEN: usize = 32;

/// Round status carried by every card event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResultCode {
    /// The round continues; more messages follow.
    Continue,
    Tie,
    Loss,
    Win,
}

impl ResultCode {
    pub fn code(self) -> u8 {
        match self {
            Self::Continue => 0,
            Self::Tie => 1,
            Self::Loss => 2,
            Self::Win => 3,
        }
    }

    /// Decode a wire code.
    ///
    /// # Errors
    ///
    /// Codes outside 0-3 are malformed.
    pub fn from_code(code: u8) -> Result<Self, ProtocolError> {
        match code {
            0 => Ok(Self::Continue),
            1 => Ok(Self::Tie),
            2 => Ok(Self::Loss),
            3 => Ok(Self::Win),
            other => Err(ProtocolError::malformed(format!(
                "result code {other} is outside 0-3"
            ))),
        }
    }

    /// The round outcome this code announces, if the round is over.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Continue => None,
            Self::Tie => Some(Outcome::Tie),
            Self::Loss => Some(Outcome::Loss),
            Self::Win => Some(Outcome::Win),
        }
    }
}

impl From<Outcome> for ResultCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Tie => Self::Tie,
            Outcome::Loss => Self::Loss,
            Outcome::Win => Self::Win,
        }
    }
}

/// A player's move, sent as a newline-terminated token.
///
/// The wire tokens are exactly `Hit` and `Stand`, case-sensitive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    Hit,
    Stand,
}

impl Decision {
    pub fn token(self) -> &'static str {
        match self {
            Self::Hit => "Hit",
            Self::Stand => "Stand",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Decision {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Hit" => Ok(Self::Hit),
            "Stand" => Ok(Self::Stand),
            other => Err(ProtocolError::InvalidDecision {
                token: other.to_string(),
            }),
        }
    }
}

/// Host announcement broadcast over UDP while the server runs.
///
/// Layout: magic `u32` | offer type `u8` | TCP port `u16` | name, 32 bytes
/// null-padded UTF-8.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Offer {
    /// TCP port the host accepts game connections on.
    pub port: u16,
    /// Host display name.
    pub name: String,
}

impl Offer {
    pub fn encode(&self, config: &ProtocolConfig) -> [u8; OFFER_SIZE] {
        let mut buf = [0u8; OFFER_SIZE];
        buf[0..4].copy_from_slice(&config.magic_cookie.to_be_bytes());
        buf[4] = config.msg_type_offer;
        buf[5..7].copy_from_slice(&self.port.to_be_bytes());
        buf[7..OFFER_SIZE].copy_from_slice(&pack_name(&self.name));
        buf
    }

    /// Decode an offer from the leading [`OFFER_SIZE`] bytes of `buf`.
    ///
    /// # Errors
    ///
    /// Malformed if the buffer is undersized, the magic value or type tag
    /// does not match `config`, or the name is not UTF-8.
    pub fn decode(buf: &[u8], config: &ProtocolConfig) -> Result<Self, ProtocolError> {
        check_header(buf, OFFER_SIZE, config.msg_type_offer, config)?;
        let port = u16::from_be_bytes([buf[5], buf[6]]);
        let name = unpack_name(&buf[7..OFFER_SIZE])?;
        Ok(Self { port, name })
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} on port {}", self.name, self.port)
    }
}

/// Client play request, sent exactly once per connection.
///
/// Layout: magic `u32` | request type `u8` | rounds `u8` | name, 32 bytes
/// null-padded UTF-8.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    /// Number of rounds the player wants to play.
    pub rounds: u8,
    /// Player display name.
    pub name: String,
}

impl Request {
    pub fn encode(&self, config: &ProtocolConfig) -> [u8; REQUEST_SIZE] {
        let mut buf = [0u8; REQUEST_SIZE];
        buf[0..4].copy_from_slice(&config.magic_cookie.to_be_bytes());
        buf[4] = config.msg_type_request;
        buf[5] = self.rounds;
        buf[6..REQUEST_SIZE].copy_from_slice(&pack_name(&self.name));
        buf
    }

    /// Decode a request from the leading [`REQUEST_SIZE`] bytes of `buf`.
    ///
    /// # Errors
    ///
    /// Malformed on an undersized buffer, a foreign magic value, a wrong
    /// type tag, or a non-UTF-8 name. The host drops such connections
    /// without a response.
    pub fn decode(buf: &[u8], config: &ProtocolConfig) -> Result<Self, ProtocolError> {
        check_header(buf, REQUEST_SIZE, config.msg_type_request, config)?;
        let rounds = buf[5];
        let name = unpack_name(&buf[6..REQUEST_SIZE])?;
        Ok(Self { rounds, name })
    }
}

/// One dealt or revealed card, paired with the round status after it.
///
/// Layout: magic `u32` | payload type `u8` | result `u8` | rank `u16` |
/// shape `u8`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CardEvent {
    pub result: ResultCode,
    pub card: Card,
}

impl CardEvent {
    pub fn encode(&self, config: &ProtocolConfig) -> [u8; CARD_EVENT_SIZE] {
        let mut buf = [0u8; CARD_EVENT_SIZE];
        buf[0..4].copy_from_slice(&config.magic_cookie.to_be_bytes());
        buf[4] = config.msg_type_payload;
        buf[5] = self.result.code();
        buf[6..8].copy_from_slice(&u16::from(self.card.rank()).to_be_bytes());
        buf[8] = self.card.shape().code();
        buf
    }

    /// Decode a card event from the leading [`CARD_EVENT_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Malformed on a bad header, a result code outside 0-3, a rank
    /// outside 1-13, or a shape outside 0-3.
    pub fn decode(buf: &[u8], config: &ProtocolConfig) -> Result<Self, ProtocolError> {
        check_header(buf, CARD_EVENT_SIZE, config.msg_type_payload, config)?;
        let result = ResultCode::from_code(buf[5])?;
        let rank = u16::from_be_bytes([buf[6], buf[7]]);
        let rank = u8::try_from(rank)
            .map_err(|_| ProtocolError::malformed(format!("rank {rank} is outside 1-13")))?;
        let shape =
            Shape::from_code(buf[8]).map_err(|error| ProtocolError::malformed(error.to_string()))?;
        let card =
            Card::new(rank, shape).map_err(|error| ProtocolError::malformed(error.to_string()))?;
        Ok(Self { result, card })
    }
}

impl fmt::Display for CardEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.card)
    }
}

/// Validate the size, magic value, and type tag common to every message.
fn check_header(
    buf: &[u8],
    size: usize,
    msg_type: u8,
    config: &ProtocolConfig,
) -> Result<(), ProtocolError> {
    if buf.len() < size {
        return Err(ProtocolError::malformed(format!(
            "message is {} bytes, expected {size}",
            buf.len()
        )));
    }
    let magic = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if magic != config.magic_cookie {
        return Err(ProtocolError::malformed(format!(
            "magic value {magic:#010x} does not match"
        )));
    }
    if buf[4] != msg_type {
        return Err(ProtocolError::malformed(format!(
            "unexpected message type {:#04x}",
            buf[4]
        )));
    }
    Ok(())
}

/// Pack a display name into the fixed wire field, truncating at a
/// character boundary when it is longer than [`NAME_LEN`] bytes and
/// right-padding with NULs otherwise.
fn pack_name(name: &str) -> [u8; NAME_LEN] {
    let mut field = [0u8; NAME_LEN];
    let mut end = name.len().min(NAME_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    field[..end].copy_from_slice(&name.as_bytes()[..end]);
    field
}

/// Strip trailing NUL padding and decode the name as UTF-8.
fn unpack_name(field: &[u8]) -> Result<String, ProtocolError> {
    let unpadded = match field.iter().rposition(|&byte| byte != 0) {
        Some(last) => &field[..=last],
        None => &[],
    };
    match std::str::from_utf8(unpadded) {
        Ok(name) => Ok(name.to_string()),
        Err(_) => Err(ProtocolError::malformed("name is not valid UTF-8")),
    }
}
