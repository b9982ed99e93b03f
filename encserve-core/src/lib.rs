pub mod cli;
pub mod conf;
pub mod handler;
pub mod logging;
pub mod negotiate;
pub mod precompress;
pub mod response;
pub mod server;
pub mod static_files;
pub mod testhandlers;
