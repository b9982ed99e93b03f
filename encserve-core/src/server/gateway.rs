use std::sync::Arc;

use async_trait::async_trait;
use http::{HeaderMap, Request, StatusCode};
use pingora::prelude::*;
use pingora_http::ResponseHeader;
use tokio::sync::mpsc;

use crate::handler::Handler;
use crate::server::stream::{ChannelSink, Frame};

/// Frames buffered between the handler thread and the connection.
const CHANNEL_DEPTH: usize = 8;

/// Pingora front for a [`Handler`].
///
/// Every request is answered in `request_filter`; there is no upstream. The
/// handler does blocking file I/O, so it runs on Tokio's blocking pool and
/// streams its response back through a channel.
pub struct StaticGateway {
    handler: Arc<dyn Handler>,
}

impl StaticGateway {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl ProxyHttp for StaticGateway {
    type CTX = ();

    fn new_ctx(&self) -> Self::CTX {}

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        Err(Error::new(Custom("static server has no upstream")))
    }

    async fn request_filter(&self, session: &mut Session, _ctx: &mut Self::CTX) -> Result<bool> {
        let req_header = session.req_header();
        let mut request = Request::new(());
        *request.method_mut() = req_header.method.clone();
        *request.uri_mut() = req_header.uri.clone();
        *request.headers_mut() = req_header.headers.clone();

        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let (tx, mut rx) = mpsc::channel(CHANNEL_DEPTH);
        let handler = Arc::clone(&self.handler);
        let task = tokio::task::spawn_blocking(move || {
            let mut sink = ChannelSink::new(tx);
            handler.serve(&request, &mut sink);
            sink.finish();
        });

        let mut status = None;
        while let Some(frame) = rx.recv().await {
            match frame {
                Frame::Head(s, headers) => {
                    let resp = response_header(s, &headers)?;
                    session.write_response_header(Box::new(resp), false).await?;
                    status = Some(s);
                }
                Frame::Body(bytes) => {
                    session.write_response_body(Some(bytes), false).await?;
                }
            }
        }

        if let Err(e) = task.await {
            tracing::error!(error = %e, %method, %path, "handler failed");
            if status.is_none() {
                session
                    .respond_error(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
                    .await?;
                return Ok(true);
            }
        }

        // End-of-stream.
        session.write_response_body(None, true).await?;

        tracing::info!(
            %method,
            %path,
            status = status.map(|s| s.as_u16()),
            "request served"
        );
        Ok(true)
    }
}

fn response_header(status: StatusCode, headers: &HeaderMap) -> Result<ResponseHeader> {
    let mut resp = ResponseHeader::build(status, Some(headers.len()))?;

    for (name, value) in headers {
        resp.append_header(name.clone(), value.clone())?;
    }

    Ok(resp)
}
