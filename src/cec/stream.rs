//! CEC daemon output stream
//!
//! Spawns `cec-client` with its stdout piped and exposes the output as a
//! `Stream` of lines. The child is killed when the stream is dropped.

use crate::mapping::config::DaemonSettings;
use bytes::BytesMut;
use futures::stream::{Stream, StreamExt};
use log::{debug, info};
use std::io;
use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::process::{Child, ChildStdout, Command};
use tokio_util::codec::{Decoder, FramedRead};

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Failed to spawn CEC daemon '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("CEC daemon stdout is not piped")]
    NoStdout,

    #[error("Failed to read from CEC daemon: {0}")]
    Io(#[from] io::Error),
}

/// Newline-delimited decoder.
///
/// Strips the line terminator (`\n` or `\r\n`) and replaces invalid UTF-8
/// instead of failing, so one garbled line never ends the stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct CecLineCodec {
    /// Bytes already searched for a newline
    next_index: usize,
}

impl CecLineCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

impl Decoder for CecLineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        let newline = buf[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.next_index + offset);

        match newline {
            Some(end) => {
                self.next_index = 0;
                let line = buf.split_to(end + 1);
                Ok(Some(to_text(&line[..end])))
            }
            None => {
                self.next_index = buf.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        if buf.is_empty() {
            return Ok(None);
        }
        // Unterminated last line
        self.next_index = 0;
        let rest = buf.split();
        Ok(Some(to_text(&rest)))
    }
}

/// Line stream over any async reader.
pub fn line_stream<R>(reader: R) -> impl Stream<Item = Result<String, StreamError>> + Unpin
where
    R: AsyncRead + Unpin,
{
    FramedRead::new(reader, CecLineCodec::new()).map(|line| line.map_err(StreamError::from))
}

/// Running CEC daemon and the lines it prints.
pub struct CecEventStream {
    /// Killed on drop
    _child: Child,
    lines: FramedRead<ChildStdout, CecLineCodec>,
}

impl CecEventStream {
    /// Start the daemon described by `settings`.
    pub fn spawn(settings: &DaemonSettings) -> Result<Self, StreamError> {
        info!("Starting CEC daemon: {} {}", settings.command, settings.args.join(" "));

        let mut child = Command::new(&settings.command)
            .args(&settings.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| StreamError::Spawn {
                command: settings.command.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or(StreamError::NoStdout)?;
        debug!("CEC daemon pid: {:?}", child.id());

        Ok(Self {
            _child: child,
            lines: FramedRead::new(stdout, CecLineCodec::new()),
        })
    }
}

impl Stream for CecEventStream {
    type Item = Result<String, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        Pin::new(&mut this.lines)
            .poll_next(cx)
            .map(|item| item.map(|line| line.map_err(StreamError::from)))
    }
}
