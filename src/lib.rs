mod command;
mod config;
mod error;

pub use command::Command;
pub use config::Config;
pub use error::{Error, Result};
