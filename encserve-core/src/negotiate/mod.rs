//! Content-encoding negotiation for precompressed static files.
//!
//! [`NegotiatingFileServer`] serves `foo.html.br` / `foo.html.gz` in place of
//! `foo.html` when the client accepts them, without compressing anything at
//! request time. It does so by composing two sink decorators around the
//! plain file server:
//!
//! - [`DeferredHeaders`] decides *whether* an attempt reaches the client: a
//!   404 from the file server silently discards the attempt.
//! - [`EncodingHeaders`] decides *which headers* accompany a successful one.
//!
//! [`negotiated_writer`] covers generated bodies, where no precompressed
//! variant can exist.

mod deferred;
mod encoding;
mod handler;
mod inject;
mod token;
mod writer;

#[cfg(test)]
mod tests;

pub use deferred::DeferredHeaders;
pub use encoding::Encoding;
pub use handler::NegotiatingFileServer;
pub use inject::EncodingHeaders;
pub use token::has_token;
pub use writer::{NegotiatedWriter, negotiated_writer};
