//! Handler wrappers for test servers, driven by the query string.
//!
//! Neither is meant for production traffic: they let a test ask the server
//! to slow down (`?delay=250ms`) or to add response headers
//! (`?header=x-foo:bar`).

mod delay;
mod duration;
mod headers;

pub use delay::Delay;
pub use duration::{DurationError, parse_duration};
pub use headers::AddHeaders;

use std::borrow::Cow;

use http::Request;

/// All values of a query parameter, in order.
fn query_values<'a>(req: &'a Request<()>, name: &str) -> Vec<Cow<'a, str>> {
    let Some(query) = req.uri().query() else {
        return Vec::new();
    };

    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value)
        .collect()
}
