//! Line framing for the PJLink wire format.
//!
//! Every frame in either direction is a single ASCII line terminated by a
//! carriage return. [`encode`] and [`decode`] work on single frames,
//! [`PjlinkCodec`] splits a TCP byte stream into frames for
//! [`tokio_util::codec::Framed`].

use bytes::{Buf, BytesMut};

use crate::error::Error;

pub const TERMINATOR: u8 = b'\r';

/// Longest frame we accept from a device. Class 1 responses are well below this.
pub const MAX_FRAME_LEN: usize = 256;

/// Appends the terminator and returns the frame bytes.
pub fn encode(command: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(command.len() + 1);
    frame.extend(command.chars().map(ascii_byte));
    frame.push(TERMINATOR);
    frame
}

/// Returns the first frame in `bytes`, without its terminator.
pub fn decode(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .position(|&b| b == TERMINATOR)
        .unwrap_or(bytes.len());
    bytes[..end].iter().map(|&b| ascii_char(b)).collect()
}

fn ascii_byte(c: char) -> u8 {
    if c.is_ascii() {
        c as u8
    } else {
        b'?'
    }
}

fn ascii_char(b: u8) -> char {
    if b.is_ascii() {
        b as char
    } else {
        '?'
    }
}

#[derive(Debug, Clone)]
pub struct PjlinkCodec {
    max_len: usize,
    // bytes already scanned for a terminator
    next_index: usize,
}

impl PjlinkCodec {
    pub fn new() -> Self {
        Self::with_max_length(MAX_FRAME_LEN)
    }

    pub fn with_max_length(max_len: usize) -> Self {
        Self {
            max_len,
            next_index: 0,
        }
    }
}

impl Default for PjlinkCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl tokio_util::codec::Decoder for PjlinkCodec {
    type Item = String;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // some devices send "\r\n"; drop the stray newline left over from the previous frame
        while self.next_index == 0 && src.first() == Some(&b'\n') {
            src.advance(1);
        }

        let pos = src[self.next_index..]
            .iter()
            .position(|&b| b == TERMINATOR)
            .map(|p| p + self.next_index);

        match pos {
            Some(pos) if pos <= self.max_len => {
                self.next_index = 0;
                let frame = src.split_to(pos + 1);
                let line = decode(&frame);
                tracing::trace!(frame = %line, "decoded frame");
                Ok(Some(line))
            }
            Some(_) => Err(Error::Protocol(format!(
                "frame exceeds {} bytes",
                self.max_len
            ))),
            None if src.len() > self.max_len => Err(Error::Protocol(format!(
                "frame exceeds {} bytes",
                self.max_len
            ))),
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                // a peer closing mid-frame is not a frame
                src.clear();
                self.next_index = 0;
                Ok(None)
            }
        }
    }
}

impl tokio_util::codec::Encoder<String> for PjlinkCodec {
    type Error = Error;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&encode(&item));
        Ok(())
    }
}
