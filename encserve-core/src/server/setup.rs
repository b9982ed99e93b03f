use std::sync::Arc;

use anyhow::{Result, anyhow};
use pingora::prelude::*;
use pingora::server::Server;
use pingora::server::configuration::ServerConf;

use crate::conf::EncserveConfig;
use crate::handler::Handler;
use crate::negotiate::NegotiatingFileServer;
use crate::server::StaticGateway;
use crate::static_files::{DiskRoot, FileServer};
use crate::testhandlers::{AddHeaders, Delay};

/// Run the Pingora server with the given configuration.
pub fn run(config: EncserveConfig) -> Result<()> {
    let server = build_pingora_server(&config)?;

    tracing::info!(
        listen = %config.server.listen,
        root = %config.static_files.root.display(),
        "serving static files"
    );
    server.run_forever();
}

/// Assemble the handler stack: the negotiating file server, optionally
/// wrapped by the test handlers (`AddHeaders` outermost).
pub fn build_handler(config: &EncserveConfig) -> Arc<dyn Handler> {
    let files = FileServer::new(DiskRoot::new(&config.static_files.root))
        .with_directory_listing(config.static_files.directory_listing);
    let negotiating = NegotiatingFileServer::new(files);

    let tests = &config.test_handlers;
    match (tests.add_headers, tests.delay) {
        (true, true) => Arc::new(AddHeaders::new(Delay::new(negotiating))),
        (true, false) => Arc::new(AddHeaders::new(negotiating)),
        (false, true) => Arc::new(Delay::new(negotiating)),
        (false, false) => Arc::new(negotiating),
    }
}

/// Build the Pingora server.
pub fn build_pingora_server(config: &EncserveConfig) -> Result<Server> {
    let mut server = if let Some(threads) = config.server.threads {
        tracing::debug!(
            threads,
            "Creating Pingora server with overridden worker threads"
        );
        let mut conf = ServerConf::new()
            .ok_or_else(|| anyhow!("could not construct pingora server configuration"))?;
        conf.threads = threads;
        Server::new_with_opt_and_conf(None, conf)
    } else {
        // "None" is required here to truly tell Pingora to use its default settings.
        Server::new(None)?
    };

    server.bootstrap();

    let gateway = StaticGateway::new(build_handler(config));

    let mut svc = http_proxy_service(&server.configuration, gateway);
    svc.add_tcp(&config.server.listen);

    server.add_service(svc);

    Ok(server)
}
