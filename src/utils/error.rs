use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Can't read file \"{path}\": {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't write target \"{target}\": {source}")]
    FileWriteError {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing required option: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value \"{value}\" for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Unknown target type \"{0}\"")]
    UnknownTargetType(String),

    #[error("Max DataURI length was exceeded on file \"{filename}\" ({size} > {limit})")]
    DataUriTooLarge {
        filename: String,
        size: usize,
        limit: usize,
    },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },

    #[error("External command \"{command}\" failed: {message}")]
    CommandError { command: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Source,
    Encoding,
    Output,
    External,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BundleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. }
            | Self::UnknownTargetType(_)
            | Self::JsonError(_) => ErrorCategory::Config,
            Self::FileReadError { .. } => ErrorCategory::Source,
            Self::DataUriTooLarge { .. } | Self::ProcessingError { .. } => ErrorCategory::Encoding,
            Self::FileWriteError { .. } => ErrorCategory::Output,
            Self::CommandError { .. } => ErrorCategory::External,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. }
            | Self::UnknownTargetType(_)
            | Self::JsonError(_)
            | Self::DataUriTooLarge { .. }
            | Self::ProcessingError { .. } => ErrorSeverity::High,
            Self::CommandError { .. } => ErrorSeverity::Medium,
            Self::FileReadError { .. } | Self::FileWriteError { .. } | Self::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingConfigError { field } => {
                format!("Provide the \"{}\" option via CLI flag or config file", field)
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Check the \"{}\" option value and fix its format", field)
            }
            Self::ConfigValidationError { .. } => {
                "Check the configuration file syntax and section names".to_string()
            }
            Self::UnknownTargetType(_) => {
                "Use one of the supported types: v, b, combo, ie, ie6".to_string()
            }
            Self::DataUriTooLarge { filename, .. } => format!(
                "Optimize \"{}\" or raise max_data_uri_size if the payload is expected",
                filename
            ),
            Self::FileReadError { path, .. } => {
                format!("Check that \"{}\" exists and is readable", path)
            }
            Self::FileWriteError { target, .. } => {
                format!("Check permissions for the output path of \"{}\"", target)
            }
            Self::JsonError(_) => "Check the split_by_groups JSON object syntax".to_string(),
            Self::ProcessingError { .. } => "Re-run with --verbose for details".to_string(),
            Self::CommandError { command, .. } => {
                format!("Check that \"{}\" is installed and on PATH", command)
            }
            Self::IoError(_) => "Check disk space and filesystem permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::Source => format!("Source file problem: {}", self),
            ErrorCategory::Encoding => format!("Icon encoding problem: {}", self),
            ErrorCategory::Output => format!("Output problem: {}", self),
            ErrorCategory::External => format!("External tool problem: {}", self),
            ErrorCategory::System => format!("System problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = BundleError::MissingConfigError {
            field: "sources_suffix".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(err.recovery_suggestion().contains("sources_suffix"));
    }

    #[test]
    fn test_oversized_data_uri_message() {
        let err = BundleError::DataUriTooLarge {
            filename: "mail.icon.png".to_string(),
            size: 40000,
            limit: 32000,
        };
        assert_eq!(
            err.to_string(),
            "Max DataURI length was exceeded on file \"mail.icon.png\" (40000 > 32000)"
        );
        assert_eq!(err.category(), ErrorCategory::Encoding);
    }

    #[test]
    fn test_file_read_error_wraps_path() {
        let err = BundleError::FileReadError {
            path: "icons/a.icon.svg".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("icons/a.icon.svg"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
