use crate::domain::model::OutputType;
use crate::utils::error::{BundleError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BundleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| BundleError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(BundleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_output_types(field_name: &str, types: &[String]) -> Result<()> {
    if types.is_empty() {
        return Err(BundleError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    for value in types {
        OutputType::parse(value)?;
    }
    Ok(())
}

/// Checks the target template carries the placeholders the run needs.
pub fn validate_target_template(
    field_name: &str,
    template: &str,
    type_count: usize,
    has_groups: bool,
) -> Result<()> {
    validate_non_empty_string(field_name, template)?;

    if has_groups && !template.contains("{group}") {
        return Err(BundleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: template.to_string(),
            reason:
                "if splitByGroups option is defined, then you need to use {group} placeholder in target option"
                    .to_string(),
        });
    }

    if type_count > 1 && !template.contains("{type}") {
        return Err(BundleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: template.to_string(),
            reason: "multiple types need the {type} placeholder to avoid overwriting targets"
                .to_string(),
        });
    }

    Ok(())
}
