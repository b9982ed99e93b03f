use crate::harness::{CapturedEvent, init_test_tracing, write_site};
use encserve_core::conf::{EncserveConfig, ServerConfig, StaticConfig, TestHandlersConfig};
use encserve_core::server::build_pingora_server;
use reqwest::blocking::{Client, RequestBuilder};
use std::net::TcpStream;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Handle to a running encserve test server.
pub struct TestServer {
    base_url: String,
    client: Client,
    root: TempDir,
}

impl TestServer {
    /// Start a server over a fresh copy of the test site, with both test
    /// handlers enabled.
    pub fn start() -> Self {
        Self::start_with(TestHandlersConfig {
            delay: true,
            add_headers: true,
        })
    }

    /// Start a server over a fresh copy of the test site.
    ///
    /// The port is allocated dynamically, so this is parallel-safe.
    pub fn start_with(test_handlers: TestHandlersConfig) -> Self {
        // Initialize tracing (this must happen first).
        init_test_tracing(events());

        let root = tempfile::tempdir().expect("failed to create site directory");
        write_site(root.path());

        let listen_port = free_port();
        let cfg = EncserveConfig {
            server: ServerConfig {
                listen: format!("127.0.0.1:{listen_port}"),
                threads: Some(1),
            },
            static_files: StaticConfig {
                root: root.path().to_path_buf(),
                directory_listing: true,
            },
            test_handlers,
        };

        let server = build_pingora_server(&cfg).expect("failed to build encserve server");

        // Run server in background thread
        thread::spawn(move || {
            server.run_forever();
        });

        let base_url = format!("http://127.0.0.1:{listen_port}");

        // Wait for server to accept connections
        wait_for_server(&base_url);

        // Redirects and compressed bodies are asserted on as sent.
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build client");

        Self {
            base_url,
            client,
            root,
        }
    }

    /// Convenience helper for GET requests.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    pub fn head(&self, path: &str) -> RequestBuilder {
        self.client.head(format!("{}{}", self.base_url, path))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The directory being served; tests may add files to it.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Events captured from all servers in this test binary.
    pub fn events(&self) -> Vec<CapturedEvent> {
        events().lock().unwrap().clone()
    }
}

/// Poll until the server responds (or panic).
fn wait_for_server(listen_addr: &str) {
    let addr = listen_addr.strip_prefix("http://").unwrap_or(listen_addr);

    let deadline = Instant::now() + Duration::from_secs(2);

    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("server failed to start at {}", listen_addr);
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();

fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}

/// Allocate a free port on localhost.
/// This is required to avoid port collisions when running tests in parallel.
fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
