mod capture;
mod server;
mod site;

pub use capture::{CapturedEvent, init_test_tracing};
pub use server::TestServer;
pub use site::{SITE, write_site};
