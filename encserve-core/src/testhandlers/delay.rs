use std::time::Duration;

use http::Request;

use crate::handler::Handler;
use crate::response::ResponseSink;
use crate::testhandlers::{parse_duration, query_values};

type Sleeper = Box<dyn Fn(Duration) + Send + Sync>;

/// Delays the wrapped handler by the `delay` query parameter.
///
/// A missing, empty, malformed or negative value means no delay. Only the
/// first `delay` parameter counts.
pub struct Delay<H> {
    inner: H,
    sleep: Sleeper,
}

impl<H: Handler> Delay<H> {
    pub fn new(inner: H) -> Self {
        Self::with_sleeper(inner, std::thread::sleep)
    }

    /// Use `sleep` instead of blocking the current thread.
    pub fn with_sleeper(inner: H, sleep: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        Self {
            inner,
            sleep: Box::new(sleep),
        }
    }

    fn requested_delay(req: &Request<()>) -> Option<Duration> {
        let values = query_values(req, "delay");
        let value = values.first().filter(|v| !v.is_empty())?;

        match parse_duration(value) {
            Ok(delay) => Some(delay),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring delay parameter");
                None
            }
        }
    }
}

impl<H: Handler> Handler for Delay<H> {
    fn serve(&self, req: &Request<()>, sink: &mut dyn ResponseSink) {
        if let Some(delay) = Self::requested_delay(req) {
            tracing::debug!(?delay, "delaying response");
            (self.sleep)(delay);
        }
        self.inner.serve(req, sink);
    }
}
