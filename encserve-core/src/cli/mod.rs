mod check;
mod dump;
mod precompress;

pub use check::{check, config_error_hint};
pub use dump::dump;
pub use precompress::precompress;
