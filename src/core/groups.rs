use crate::utils::error::{BundleError, Result};
use regex::Regex;
use std::collections::BTreeMap;

/// Group name → optional marker substring (e.g. `extra → .extra-icon`).
///
/// A marked group collects files whose name carries the marker on word
/// boundaries. A markerless group is the default bucket: it collects every
/// file no configured marker matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRules {
    rules: BTreeMap<String, Option<String>>,
}

impl GroupRules {
    pub fn new(rules: BTreeMap<String, Option<String>>) -> Self {
        Self { rules }
    }

    /// Parses the CLI option form: a JSON object whose values are marker
    /// strings or `null` for the default group.
    pub fn from_json(value: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(value)?;
        let object = parsed
            .as_object()
            .ok_or_else(|| BundleError::InvalidConfigValueError {
                field: "split_by_groups".to_string(),
                value: value.to_string(),
                reason: "Expected a JSON object of group name to marker (or null)".to_string(),
            })?;

        let mut rules = BTreeMap::new();
        for (name, marker) in object {
            let marker = match marker {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) if s.is_empty() => None,
                serde_json::Value::String(s) => Some(s.clone()),
                other => {
                    return Err(BundleError::InvalidConfigValueError {
                        field: "split_by_groups".to_string(),
                        value: other.to_string(),
                        reason: format!("Marker for group \"{}\" must be a string or null", name),
                    })
                }
            };
            rules.insert(name.clone(), marker);
        }
        Ok(Self { rules })
    }

    /// TOML table form: an empty marker string means the default group.
    pub fn from_table(table: &BTreeMap<String, String>) -> Self {
        let rules = table
            .iter()
            .map(|(name, marker)| {
                let marker = if marker.is_empty() {
                    None
                } else {
                    Some(marker.clone())
                };
                (name.clone(), marker)
            })
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    fn markers(&self) -> impl Iterator<Item = &str> {
        self.rules.values().filter_map(|m| m.as_deref())
    }

    /// Whether `file_name` falls into the given group.
    pub fn matches(&self, group_name: &str, file_name: &str) -> bool {
        match self.rules.get(group_name) {
            Some(Some(marker)) => marker_matches(marker, file_name),
            // Markerless group: only files no marker claims.
            Some(None) => !self.markers().any(|m| marker_matches(m, file_name)),
            None => false,
        }
    }
}

fn marker_matches(marker: &str, file_name: &str) -> bool {
    let pattern = format!(r"\b{}\b", regex::escape(marker));
    // Escaped markers always compile.
    Regex::new(&pattern).unwrap().is_match(file_name)
}
