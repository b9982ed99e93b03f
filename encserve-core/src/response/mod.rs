mod recorder;

pub use recorder::ResponseRecorder;

use std::io::{self, Read, Write};

use http::{HeaderMap, StatusCode};

const COPY_CHUNK_SIZE: usize = 32 * 1024;

/// The capability a handler writes its response into.
///
/// Status and headers are committed by the first `write_status` call, or
/// implicitly (as `200 OK`) by the first body write. Header mutations after
/// the commit are not transmitted.
pub trait ResponseSink {
    /// Mutable access to the headers that will accompany the status line.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Commit the status code and headers. Calls after the first are ignored.
    fn write_status(&mut self, status: StatusCode);

    /// Write body bytes, committing `200 OK` first if nothing was committed yet.
    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Copy a whole reader into the body.
    ///
    /// Sinks with a faster path than chunked `write_body` calls override this.
    fn copy_from(&mut self, src: &mut dyn Read) -> io::Result<u64> {
        let mut buf = vec![0u8; COPY_CHUNK_SIZE];
        let mut copied = 0u64;

        loop {
            let n = match src.read(&mut buf) {
                Ok(0) => return Ok(copied),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            write_all_body(self, &buf[..n])?;
            copied += n as u64;
        }
    }
}

/// Write the whole buffer, retrying on short writes.
pub fn write_all_body<S: ResponseSink + ?Sized>(sink: &mut S, mut buf: &[u8]) -> io::Result<()> {
    while !buf.is_empty() {
        match sink.write_body(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "response sink accepted no bytes",
                ));
            }
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Adapts a [`ResponseSink`] to [`std::io::Write`].
pub struct BodyWriter<'a> {
    sink: &'a mut dyn ResponseSink,
}

impl<'a> BodyWriter<'a> {
    pub fn new(sink: &'a mut dyn ResponseSink) -> Self {
        Self { sink }
    }

    pub fn sink(&mut self) -> &mut dyn ResponseSink {
        &mut *self.sink
    }
}

impl Write for BodyWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write_body(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
