//! Line-framed I/O for the admin protocol.
//!
//! The protocol is strictly line oriented: one newline-terminated command
//! out, one or more newline-terminated reply lines back. Commands must be
//! fully on the wire before the matching read is attempted, so every write
//! flushes immediately.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{Error, Result};

/// Default buffer size for reading.
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Maximum line length to prevent memory exhaustion.
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Buffered line reader/writer over a byte stream.
pub struct LineStream<S> {
    reader: BufReader<S>,
    write_buffer: BytesMut,
}

impl<S> LineStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new line stream.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::with_capacity(DEFAULT_BUFFER_SIZE, stream),
            write_buffer: BytesMut::with_capacity(DEFAULT_BUFFER_SIZE),
        }
    }

    /// Reads one reply line, without its terminator.
    ///
    /// Both CRLF and bare LF terminators are accepted. End-of-stream or an
    /// I/O failure before a terminator arrives is [`Error::NoServerResponse`]:
    /// the reply the protocol promised never came.
    pub async fn read_line(&mut self) -> Result<String> {
        let mut line = Vec::new();

        loop {
            let buf = self
                .reader
                .fill_buf()
                .await
                .map_err(|e| Error::NoServerResponse(e.to_string()))?;
            if buf.is_empty() {
                return Err(Error::NoServerResponse("connection closed".to_string()));
            }

            if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&buf[..pos]);
                self.reader.consume(pos + 1);
                break;
            }

            let len = buf.len();
            line.extend_from_slice(buf);
            self.reader.consume(len);

            if line.len() > MAX_LINE_LENGTH {
                return Err(Error::Parse("line too long".to_string()));
            }
        }

        if line.last() == Some(&b'\r') {
            line.pop();
        }

        String::from_utf8(line).map_err(|e| Error::Parse(format!("non-UTF-8 reply: {e}")))
    }

    /// Writes one command line followed by CRLF and flushes immediately.
    pub async fn write_line(&mut self, text: &str) -> Result<()> {
        self.write_buffer.clear();
        self.write_buffer.extend_from_slice(text.as_bytes());
        self.write_buffer.extend_from_slice(b"\r\n");

        let stream = self.reader.get_mut();
        stream
            .write_all(&self.write_buffer)
            .await
            .map_err(io_to_stream_error)?;
        stream.flush().await.map_err(io_to_stream_error)?;

        Ok(())
    }

    /// Gets a reference to the underlying stream.
    pub fn get_ref(&self) -> &S {
        self.reader.get_ref()
    }

    /// Consumes the line stream and returns the inner stream.
    ///
    /// Note: Any buffered data will be lost.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

fn io_to_stream_error(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::BrokenPipe || e.kind() == io::ErrorKind::NotConnected {
        Error::NoServerStream
    } else {
        Error::NoServerResponse(e.to_string())
    }
}
