use crate::core::groups::GroupRules;
use crate::domain::model::{CssArtifact, IconPair};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Recursively lists regular files under the root, as sorted
    /// root-relative paths with `/` separators.
    fn list_files(&self) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn sources_suffix(&self) -> &str;
    fn types(&self) -> &[String];
    fn target_template(&self) -> &str;
    fn group_rules(&self) -> Result<Option<GroupRules>>;
    fn selector_prefix(&self) -> Option<&str>;
    fn fallback_prefix(&self) -> Option<&str>;
    fn svg_to_base64(&self) -> bool;
    fn max_data_uri_size(&self) -> Option<usize>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn collect(&self) -> Result<Vec<IconPair>>;
    async fn render(&self, pairs: Vec<IconPair>) -> Result<Vec<CssArtifact>>;
    async fn write(&self, artifacts: Vec<CssArtifact>) -> Result<Vec<String>>;
}
