//! Connection management: stream types, line framing, configuration.

mod config;
mod line;
mod stream;

pub use config::{Config, ConfigBuilder, Security};
pub use line::LineStream;
pub use stream::{AdminStream, connect_plain, connect_tls, create_tls_connector};
