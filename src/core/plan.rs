use crate::core::encoder::{
    CssEncoder, DEFAULT_FALLBACK_PREFIX, DEFAULT_MAX_DATA_URI_SIZE, DEFAULT_SELECTOR_PREFIX,
};
use crate::core::groups::GroupRules;
use crate::domain::model::OutputType;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_target_template};

/// A `ConfigProvider` resolved into an executable bundle plan: parsed types,
/// group rules and defaults applied.
#[derive(Debug, Clone)]
pub struct BundlePlan {
    pub sources_suffix: String,
    pub types: Vec<OutputType>,
    pub target_template: String,
    pub groups: Option<GroupRules>,
    pub selector_prefix: String,
    pub fallback_prefix: String,
    pub svg_to_base64: bool,
    pub max_data_uri_size: usize,
}

impl BundlePlan {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        validate_non_empty_string("sources_suffix", config.sources_suffix())?;

        let types = config
            .types()
            .iter()
            .map(|value| OutputType::parse(value))
            .collect::<Result<Vec<_>>>()?;
        if types.is_empty() {
            return Err(crate::utils::error::BundleError::MissingConfigError {
                field: "types".to_string(),
            });
        }

        let groups = config.group_rules()?.filter(|rules| !rules.is_empty());

        validate_target_template(
            "target",
            config.target_template(),
            types.len(),
            groups.is_some(),
        )?;

        Ok(Self {
            sources_suffix: config.sources_suffix().to_string(),
            types,
            target_template: config.target_template().to_string(),
            groups,
            selector_prefix: config
                .selector_prefix()
                .unwrap_or(DEFAULT_SELECTOR_PREFIX)
                .to_string(),
            fallback_prefix: config
                .fallback_prefix()
                .unwrap_or(DEFAULT_FALLBACK_PREFIX)
                .to_string(),
            svg_to_base64: config.svg_to_base64(),
            max_data_uri_size: config
                .max_data_uri_size()
                .unwrap_or(DEFAULT_MAX_DATA_URI_SIZE),
        })
    }

    pub fn encoder(&self) -> CssEncoder {
        CssEncoder::new(
            &self.selector_prefix,
            &self.fallback_prefix,
            &self.sources_suffix,
            self.svg_to_base64,
            self.max_data_uri_size,
        )
    }

    /// True when any requested type embeds file contents.
    pub fn needs_file_data(&self) -> bool {
        self.types.iter().any(OutputType::needs_file_data)
    }

    /// The group axis: one `None` entry when grouping is off.
    pub fn group_names(&self) -> Vec<Option<String>> {
        match &self.groups {
            Some(rules) => rules.group_names().map(|n| Some(n.to_string())).collect(),
            None => vec![None],
        }
    }

    /// Expands the target template for one (type, group) pair.
    pub fn target_for(&self, ty: OutputType, group: Option<&str>) -> String {
        let mut target = self.target_template.replace("{type}", ty.as_str());
        if let Some(group) = group {
            target = target.replace("{group}", group);
        }
        target
    }

    /// Every target this plan produces, in generation order.
    pub fn all_targets(&self) -> Vec<String> {
        let mut targets = Vec::new();
        for ty in &self.types {
            for group in self.group_names() {
                targets.push(self.target_for(*ty, group.as_deref()));
            }
        }
        targets
    }
}
