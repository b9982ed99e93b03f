use http::Request;

use crate::response::ResponseSink;

/// Something that answers a request by writing into a [`ResponseSink`].
///
/// Handlers own their error reporting: failures become error statuses on the
/// sink, so there is nothing to return.
pub trait Handler: Send + Sync {
    fn serve(&self, req: &Request<()>, sink: &mut dyn ResponseSink);
}

impl<F> Handler for F
where
    F: Fn(&Request<()>, &mut dyn ResponseSink) + Send + Sync,
{
    fn serve(&self, req: &Request<()>, sink: &mut dyn ResponseSink) {
        self(req, sink)
    }
}
