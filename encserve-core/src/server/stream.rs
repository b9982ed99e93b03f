use std::io;
use std::mem;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use tokio::sync::mpsc;

use crate::response::ResponseSink;

/// What the blocking handler thread hands to the async response writer.
#[derive(Debug)]
pub(crate) enum Frame {
    Head(StatusCode, HeaderMap),
    Body(Bytes),
}

/// A [`ResponseSink`] that forwards the response, piece by piece, over a
/// bounded channel.
///
/// Must be used from a blocking thread: sends block while the channel is
/// full. Once the receiver is gone body writes fail with `BrokenPipe`.
pub(crate) struct ChannelSink {
    headers: HeaderMap,
    committed: bool,
    tx: mpsc::Sender<Frame>,
}

impl ChannelSink {
    pub(crate) fn new(tx: mpsc::Sender<Frame>) -> Self {
        Self {
            headers: HeaderMap::new(),
            committed: false,
            tx,
        }
    }

    /// Commit `200 OK` if the handler never wrote anything.
    pub(crate) fn finish(mut self) {
        if !self.committed {
            self.write_status(StatusCode::OK);
        }
    }

    fn send(&self, frame: Frame) -> io::Result<()> {
        self.tx
            .blocking_send(frame)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "client went away"))
    }
}

impl ResponseSink for ChannelSink {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        if self.committed {
            tracing::debug!(%status, "superfluous status write ignored");
            return;
        }
        self.committed = true;

        let headers = mem::take(&mut self.headers);
        if self.send(Frame::Head(status, headers)).is_err() {
            tracing::debug!(%status, "response dropped before headers were sent");
        }
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.committed {
            self.write_status(StatusCode::OK);
        }
        if buf.is_empty() {
            return Ok(0);
        }
        self.send(Frame::Body(Bytes::copy_from_slice(buf)))?;
        Ok(buf.len())
    }
}
