pub mod cli;
pub mod toml_config;

use crate::core::groups::GroupRules;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_output_types, validate_target_template, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "icon-bundler"),
    command(about = "Collects icon files and generates CSS with embedded or linked icons")
)]
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory scanned for icon source files
    #[cfg_attr(feature = "cli", arg(long, default_value = "."))]
    pub source_path: String,

    /// Directory the generated CSS targets are written to
    #[cfg_attr(feature = "cli", arg(long, default_value = "./build"))]
    pub output_path: String,

    /// Source suffix marking icon files (e.g. "icon" for *.icon.svg)
    #[cfg_attr(feature = "cli", arg(long))]
    pub sources_suffix: String,

    /// Output types to generate: v, b, combo, ie, ie6
    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ','))]
    pub types: Vec<String>,

    /// Target template, e.g. "icons.{type}.{group}.css"
    #[cfg_attr(feature = "cli", arg(long))]
    pub target: String,

    /// JSON object of group name to marker, e.g. '{"extra":".extra-icon","main":null}'
    #[cfg_attr(feature = "cli", arg(long))]
    pub split_by_groups: Option<String>,

    /// Selector prefix prepended to every icon class
    #[cfg_attr(feature = "cli", arg(long))]
    pub selector_prefix: Option<String>,

    /// Selector prefix for combo link fallbacks
    #[cfg_attr(feature = "cli", arg(long))]
    pub fallback_prefix: Option<String>,

    /// Encode SVG vectors as base64 instead of URL-encoding
    #[cfg_attr(feature = "cli", arg(long))]
    pub svg_to_base64: bool,

    /// Upper bound for one base64 data URI
    #[cfg_attr(feature = "cli", arg(long))]
    pub max_data_uri_size: Option<usize>,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable system monitoring"))]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn source_path(&self) -> &str {
        &self.source_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn sources_suffix(&self) -> &str {
        &self.sources_suffix
    }

    fn types(&self) -> &[String] {
        &self.types
    }

    fn target_template(&self) -> &str {
        &self.target
    }

    fn group_rules(&self) -> Result<Option<GroupRules>> {
        self.split_by_groups
            .as_deref()
            .map(GroupRules::from_json)
            .transpose()
    }

    fn selector_prefix(&self) -> Option<&str> {
        self.selector_prefix.as_deref()
    }

    fn fallback_prefix(&self) -> Option<&str> {
        self.fallback_prefix.as_deref()
    }

    fn svg_to_base64(&self) -> bool {
        self.svg_to_base64
    }

    fn max_data_uri_size(&self) -> Option<usize> {
        self.max_data_uri_size
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("sources_suffix", &self.sources_suffix)?;
        validate_output_types("types", &self.types)?;

        let groups = self.group_rules()?;
        validate_target_template(
            "target",
            &self.target,
            self.types.len(),
            groups.map(|rules| !rules.is_empty()).unwrap_or(false),
        )?;

        validate_non_empty_string("source_path", &self.source_path)?;
        validate_non_empty_string("output_path", &self.output_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CliConfig {
        CliConfig {
            source_path: ".".to_string(),
            output_path: "./build".to_string(),
            sources_suffix: "icon".to_string(),
            types: vec!["v".to_string(), "b".to_string()],
            target: "icons.{type}.css".to_string(),
            split_by_groups: None,
            selector_prefix: None,
            fallback_prefix: None,
            svg_to_base64: false,
            max_data_uri_size: None,
            verbose: false,
            monitor: false,
        }
    }

    #[test]
    fn test_valid_cli_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_invalid_group_json_is_rejected() {
        let mut config = config();
        config.split_by_groups = Some("not-json".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_groups_require_placeholder() {
        let mut config = config();
        config.split_by_groups = Some(r#"{"extra": ".extra-icon", "main": null}"#.to_string());
        assert!(config.validate().is_err());

        config.target = "icons.{type}.{group}.css".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let mut config = config();
        config.types = vec!["gif".to_string()];
        assert!(config.validate().is_err());
    }
}
