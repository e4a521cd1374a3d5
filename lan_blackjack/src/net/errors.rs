//! Protocol error types shared by the host and client sides.

use std::io;
use thiserror::Error;

/// Errors raised while speaking the discovery and game protocols.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The bytes on the wire do not form a valid message. The message is
    /// dropped and the connection it arrived on is finished.
    #[error("malformed message: {reason}")]
    MalformedMessage { reason: String },

    /// The peer closed the connection, possibly mid-message. A partial
    /// read is never surfaced as a value.
    #[error("peer disconnected")]
    PeerDisconnected,

    /// The peer sent a decision token that is neither `Hit` nor `Stand`.
    /// Recoverable: the decision is simply read again.
    #[error("invalid decision {token:?}")]
    InvalidDecision { token: String },

    /// Any other socket failure.
    #[error("socket error: {0}")]
    Io(io::Error),
}

impl ProtocolError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => Self::PeerDisconnected,
            _ => Self::Io(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_eof_maps_to_peer_disconnected() {
        let error = io::Error::new(io::ErrorKind::UnexpectedEof, "early eof");
        assert!(matches!(
            ProtocolError::from(error),
            ProtocolError::PeerDisconnected
        ));
    }

    #[test]
    fn test_other_io_errors_stay_io() {
        let error = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(ProtocolError::from(error), ProtocolError::Io(_)));
    }
}
