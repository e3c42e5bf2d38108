pub mod encoder;
pub mod engine;
pub mod groups;
pub mod pipeline;
pub mod plan;

pub use crate::domain::model::{CssArtifact, IconFile, IconPair, IconSet, OutputType};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
