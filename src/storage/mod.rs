//! Input handling: configuration file and task file

pub mod config;
pub mod tasks;

pub use config::{ApiCredentials, Config, ConfigError, LabelRule};
pub use tasks::{TaskFileError, TaskReader, TaskRow};
