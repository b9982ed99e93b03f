mod gateway;
pub mod setup;
mod stream;

pub use gateway::StaticGateway;
pub use setup::{build_handler, build_pingora_server, run};
