//! Fixed-size framing over blocking byte streams.
//!
//! Every protocol message has a fixed wire size, so framing is a single
//! `read_exact` into a caller-sized buffer. A stream that ends before the
//! buffer fills is a peer disconnect, never a short message.

use std::io::{Read, Write};

use super::errors::ProtocolError;

/// Fill `buf` completely from `reader`.
///
/// # Errors
///
/// Returns [`ProtocolError::PeerDisconnected`] if the stream ends early
/// and [`ProtocolError::Io`] for other socket failures.
pub fn read_fixed<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), ProtocolError> {
    reader.read_exact(buf)?;
    Ok(())
}

/// Write `frame` in one chunk.
///
/// # Errors
///
/// Returns [`ProtocolError::Io`] if the write fails.
pub fn write_fixed<W: Write>(writer: &mut W, frame: &[u8]) -> Result<(), ProtocolError> {
    writer.write_all(frame)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::{TcpListener, TcpStream};

    use super::{ProtocolError, read_fixed, write_fixed};
    use crate::net::messages::CARD_EVENT_SIZE;

    fn setup() -> (TcpStream, TcpStream) {
        let server = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let (stream, _) = server.accept().unwrap();
        (client, stream)
    }

    #[test]
    fn test_write_and_read_full_frame() {
        let (mut client, mut stream) = setup();
        let frame = [7u8; CARD_EVENT_SIZE];
        assert!(write_fixed(&mut stream, &frame).is_ok());
        let mut buf = [0u8; CARD_EVENT_SIZE];
        assert!(read_fixed(&mut client, &mut buf).is_ok());
        assert_eq!(buf, frame);
    }

    #[test]
    fn test_partial_frame_then_close_is_disconnect() {
        // Five bytes of a nine-byte card event must never surface as a
        // five-byte card.
        let (mut client, mut stream) = setup();
        assert!(stream.write_all(&[1, 2, 3, 4, 5]).is_ok());
        drop(stream);

        let mut buf = [0u8; CARD_EVENT_SIZE];
        assert!(matches!(
            read_fixed(&mut client, &mut buf),
            Err(ProtocolError::PeerDisconnected)
        ));
    }

    #[test]
    fn test_immediate_close_is_disconnect() {
        let (mut client, stream) = setup();
        drop(stream);

        let mut buf = [0u8; CARD_EVENT_SIZE];
        assert!(matches!(
            read_fixed(&mut client, &mut buf),
            Err(ProtocolError::PeerDisconnected)
        ));
    }

    #[test]
    fn test_frames_arrive_in_order() {
        let (mut client, mut stream) = setup();
        for value in 0u8..4 {
            assert!(write_fixed(&mut stream, &[value; CARD_EVENT_SIZE]).is_ok());
        }
        for value in 0u8..4 {
            let mut buf = [0u8; CARD_EVENT_SIZE];
            assert!(read_fixed(&mut client, &mut buf).is_ok());
            assert_eq!(buf, [value; CARD_EVENT_SIZE]);
        }
    }
}
