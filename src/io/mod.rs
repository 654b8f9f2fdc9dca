pub mod config_io;
pub mod logging;
pub mod shell;

pub use config_io::{ConfigError, ConfigStore};
