use std::io::{self, Read};

use http::{HeaderMap, StatusCode};

use crate::response::ResponseSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing committed yet; headers live in the private buffer.
    Buffering,
    /// Status forwarded; headers go straight to the wrapped sink.
    Committed,
    /// The attempt answered 404; nothing reaches the wrapped sink.
    Suppressed,
}

/// Holds back status and headers until the outcome of an attempt is known.
///
/// A `404 Not Found` commit suppresses the whole attempt: buffered headers are
/// dropped and every later write is swallowed while reporting success, so the
/// caller can try something else on the same sink. Any other status flushes
/// the buffered headers into the wrapped sink and passes everything through.
pub struct DeferredHeaders<'a> {
    inner: &'a mut dyn ResponseSink,
    pending: HeaderMap,
    phase: Phase,
}

impl<'a> DeferredHeaders<'a> {
    pub fn new(inner: &'a mut dyn ResponseSink) -> Self {
        Self {
            inner,
            pending: HeaderMap::new(),
            phase: Phase::Buffering,
        }
    }

    /// True once the attempt committed a `404 Not Found`.
    pub fn is_suppressed(&self) -> bool {
        self.phase == Phase::Suppressed
    }

    pub fn is_committed(&self) -> bool {
        self.phase != Phase::Buffering
    }

    fn commit_if_buffering(&mut self) {
        if self.phase == Phase::Buffering {
            self.write_status(StatusCode::OK);
        }
    }
}

impl ResponseSink for DeferredHeaders<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        match self.phase {
            Phase::Committed => self.inner.headers_mut(),
            Phase::Buffering | Phase::Suppressed => &mut self.pending,
        }
    }

    fn write_status(&mut self, status: StatusCode) {
        if self.phase != Phase::Buffering {
            return;
        }

        if status == StatusCode::NOT_FOUND {
            self.phase = Phase::Suppressed;
            self.pending.clear();
            return;
        }

        self.phase = Phase::Committed;
        let pending = std::mem::take(&mut self.pending);
        let headers = self.inner.headers_mut();
        for (name, value) in pending.iter() {
            headers.append(name.clone(), value.clone());
        }
        self.inner.write_status(status);
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.commit_if_buffering();
        if self.phase == Phase::Suppressed {
            return Ok(buf.len());
        }
        self.inner.write_body(buf)
    }

    fn copy_from(&mut self, src: &mut dyn Read) -> io::Result<u64> {
        self.commit_if_buffering();
        if self.phase == Phase::Suppressed {
            return io::copy(src, &mut io::sink());
        }
        self.inner.copy_from(src)
    }
}
