//! Line-delimited JSON framing used on the TCP channel.
//!
//! Each message is a single JSON object followed by `\n`. Blank lines are ignored
//! on read so hand-typed sessions (e.g. via `nc`) stay usable.
//!
//! Lines are read as raw bytes and capped at [`MAX_LINE_BYTES`]; a longer line is
//! discarded up to its newline and surfaces as [`Frame::Oversized`], so a peer
//! can never make the reader buffer more than one capped line.
use std::io::{BufRead, Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::TickerError;

/// Longest line accepted on read, newline excluded.
pub const MAX_LINE_BYTES: usize = 16 * 1024;

/// One line taken off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A non-blank line, surrounding whitespace trimmed.
    Line(Vec<u8>),
    /// A line longer than [`MAX_LINE_BYTES`]; its bytes were dropped.
    Oversized,
}

impl Frame {
    /// Decode the frame as one JSON message.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, TickerError> {
        match self {
            Frame::Line(bytes) => decode(bytes),
            Frame::Oversized => Err(TickerError::Protocol(format!(
                "line longer than {} bytes",
                MAX_LINE_BYTES
            ))),
        }
    }
}

/// Encode `message` as one JSON line and flush the writer.
pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<(), TickerError> {
    serde_json::to_writer(&mut *writer, message)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read the next non-blank line from `reader`.
///
/// Returns `Ok(None)` at end of stream. Only I/O failures are errors; bytes that
/// are not UTF-8 or not JSON are left for [`Frame::decode`] to reject.
pub fn read_frame<R: BufRead>(reader: &mut R) -> Result<Option<Frame>, TickerError> {
    let mut line = Vec::new();
    loop {
        line.clear();
        let limit = MAX_LINE_BYTES as u64 + 1;
        if reader.by_ref().take(limit).read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        if line.len() > MAX_LINE_BYTES && line.last() != Some(&b'\n') {
            reader.skip_until(b'\n')?;
            return Ok(Some(Frame::Oversized));
        }
        let trimmed = line.trim_ascii();
        if !trimmed.is_empty() {
            return Ok(Some(Frame::Line(trimmed.to_vec())));
        }
    }
}

/// Decode a single line produced by [`read_frame`].
///
/// The error names what is wrong and where, without echoing the line back.
pub fn decode<T: DeserializeOwned>(line: &[u8]) -> Result<T, TickerError> {
    serde_json::from_slice(line).map_err(|e| TickerError::Protocol(e.to_string()))
}

/// Read and decode the next message. Returns `Ok(None)` at end of stream.
pub fn read_message<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> Result<Option<T>, TickerError> {
    read_frame(reader)?.map(|frame| frame.decode()).transpose()
}
