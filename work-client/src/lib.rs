pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod log;
pub mod record;
pub mod sink;

pub use error::Error;
