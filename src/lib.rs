pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, ReqwestTransport};
pub use config::toml_config::TomlConfig;
pub use crate::core::{etl::EtlEngine, processor::BatchProcessor};
pub use domain::model::{InputItem, ItemParameters, OutputRecord, PairedItem};
pub use utils::error::{EtlError, Result};
