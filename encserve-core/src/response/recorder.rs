use std::io;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Response, StatusCode};

use crate::response::ResponseSink;

/// In-memory sink that records what a handler sent.
///
/// Headers are snapshotted when the status is committed, the way a network
/// sink would have transmitted them; later mutations through
/// [`ResponseSink::headers_mut`] are not part of the recorded response.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    headers: HeaderMap,
    status: Option<StatusCode>,
    sent_headers: Option<HeaderMap>,
    body: BytesMut,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed status, or `200 OK` if the handler never wrote anything.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    /// Headers as transmitted (or as they stand, if nothing was committed).
    pub fn headers(&self) -> &HeaderMap {
        self.sent_headers.as_ref().unwrap_or(&self.headers)
    }

    /// Convenience accessor for a single header as a string.
    pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.headers().get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> Response<Bytes> {
        let status = self.status();
        let headers = self.sent_headers.unwrap_or(self.headers);

        let mut response = Response::new(self.body.freeze());
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl ResponseSink for ResponseRecorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        if self.status.is_some() {
            tracing::debug!(%status, "superfluous status write ignored");
            return;
        }
        self.status = Some(status);
        self.sent_headers = Some(self.headers.clone());
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.write_status(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}
