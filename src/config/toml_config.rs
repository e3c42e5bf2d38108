use crate::core::groups::GroupRules;
use crate::core::ConfigProvider;
use crate::utils::error::{BundleError, Result};
use crate::utils::validation::{
    validate_output_types, validate_positive_number, validate_required_field,
    validate_target_template, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bundle: BundleSection,
    pub css: Option<CssSection>,
    pub monitoring: Option<MonitoringSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleSection {
    pub source_path: Option<String>,
    pub output_path: Option<String>,
    pub sources_suffix: Option<String>,
    pub types: Option<Vec<String>>,
    pub target: Option<String>,
    /// Group name → marker; an empty marker means the default group.
    pub groups: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CssSection {
    pub selector_prefix: Option<String>,
    pub fallback_prefix: Option<String>,
    pub svg_to_base64: Option<bool>,
    pub max_data_uri_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BundleError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BundleError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ICON_OUTPUT})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_required_field("bundle.sources_suffix", &self.bundle.sources_suffix)?;
        let types = validate_required_field("bundle.types", &self.bundle.types)?;
        validate_output_types("bundle.types", types)?;
        let target = validate_required_field("bundle.target", &self.bundle.target)?;

        let has_groups = self
            .bundle
            .groups
            .as_ref()
            .map(|groups| !groups.is_empty())
            .unwrap_or(false);
        validate_target_template("bundle.target", target, types.len(), has_groups)?;

        if let Some(max) = self.css.as_ref().and_then(|css| css.max_data_uri_size) {
            validate_positive_number("css.max_data_uri_size", max, 1)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source_path(&self) -> &str {
        self.bundle.source_path.as_deref().unwrap_or(".")
    }

    fn output_path(&self) -> &str {
        self.bundle.output_path.as_deref().unwrap_or("./build")
    }

    fn sources_suffix(&self) -> &str {
        self.bundle.sources_suffix.as_deref().unwrap_or_default()
    }

    fn types(&self) -> &[String] {
        self.bundle.types.as_deref().unwrap_or(&[])
    }

    fn target_template(&self) -> &str {
        self.bundle.target.as_deref().unwrap_or_default()
    }

    fn group_rules(&self) -> Result<Option<GroupRules>> {
        Ok(self.bundle.groups.as_ref().map(GroupRules::from_table))
    }

    fn selector_prefix(&self) -> Option<&str> {
        self.css.as_ref().and_then(|css| css.selector_prefix.as_deref())
    }

    fn fallback_prefix(&self) -> Option<&str> {
        self.css.as_ref().and_then(|css| css.fallback_prefix.as_deref())
    }

    fn svg_to_base64(&self) -> bool {
        self.css
            .as_ref()
            .and_then(|css| css.svg_to_base64)
            .unwrap_or(false)
    }

    fn max_data_uri_size(&self) -> Option<usize> {
        self.css.as_ref().and_then(|css| css.max_data_uri_size)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[bundle]
source_path = "./blocks"
output_path = "./build"
sources_suffix = "icon"
types = ["v", "b"]
target = "icons.{type}.css"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.sources_suffix(), "icon");
        assert_eq!(config.types(), &["v".to_string(), "b".to_string()]);
        assert_eq!(config.target_template(), "icons.{type}.css");
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[bundle]
sources_suffix = "icon"
types = ["combo"]
target = "icons.{group}.css"

[bundle.groups]
extra = ".extra-icon"
main = ""

[css]
selector_prefix = ".b-ico-"
fallback_prefix = ".no-svg"
svg_to_base64 = true
max_data_uri_size = 16000

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.monitoring_enabled());
        assert_eq!(config.selector_prefix(), Some(".b-ico-"));
        assert_eq!(config.max_data_uri_size(), Some(16000));
        assert!(config.svg_to_base64());

        let rules = config.group_rules().unwrap().unwrap();
        assert!(rules.matches("extra", "a.extra-icon.png"));
        assert!(rules.matches("main", "a.icon.png"));
    }

    #[test]
    fn test_missing_required_option() {
        let toml_content = r#"
[bundle]
types = ["v"]
target = "icons.css"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, BundleError::MissingConfigError { ref field } if field == "bundle.sources_suffix")
        );
    }

    #[test]
    fn test_groups_without_placeholder_rejected() {
        let toml_content = r#"
[bundle]
sources_suffix = "icon"
types = ["v"]
target = "icons.css"

[bundle.groups]
extra = ".extra-icon"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ICON_TEST_OUTPUT", "./from-env");

        let toml_content = r#"
[bundle]
output_path = "${ICON_TEST_OUTPUT}"
sources_suffix = "icon"
types = ["v"]
target = "icons.css"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "./from-env");

        std::env::remove_var("ICON_TEST_OUTPUT");
    }

    #[test]
    fn test_unknown_env_var_left_as_is() {
        let toml_content = r#"
[bundle]
output_path = "${ICON_TEST_MISSING_VAR}"
sources_suffix = "icon"
types = ["v"]
target = "icons.css"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "${ICON_TEST_MISSING_VAR}");
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[bundle]
sources_suffix = "icon"
types = ["ie"]
target = "icons.css"
"#
        )
        .unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.types(), &["ie".to_string()]);
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        let err = TomlConfig::from_toml_str("not [valid toml").unwrap_err();
        assert!(
            matches!(err, BundleError::ConfigValidationError { ref field, .. } if field == "toml_parsing")
        );
    }
}
