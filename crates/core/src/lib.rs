pub mod config;
pub mod error;

pub use config::{Config, ToolPaths};
pub use error::*;
