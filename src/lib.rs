pub mod config;
pub mod core;
pub mod deploy;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use config::CliConfig;
pub use core::{engine::BundleEngine, pipeline::IconPipeline};
pub use utils::error::{BundleError, Result};
