use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Input file is missing required column '{column}'")]
    MissingColumnError { column: String },

    #[error("Number pool exhausted: cannot assign a unique number to '{name}' ({assigned} of {capacity} numbers already taken)")]
    NumberPoolExhausted {
        name: String,
        assigned: usize,
        capacity: usize,
    },

    #[error("No valid {what} found in input")]
    EmptyResult { what: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::CsvError(_) | EtlError::MissingColumnError { .. } => ErrorCategory::Input,
            EtlError::TomlError(_)
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::NumberPoolExhausted { .. } | EtlError::EmptyResult { .. } => {
                ErrorCategory::Processing
            }
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::EmptyResult { .. } => ErrorSeverity::Low,
            EtlError::CsvError(_) => ErrorSeverity::Medium,
            EtlError::MissingColumnError { .. }
            | EtlError::TomlError(_)
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::NumberPoolExhausted { .. } => ErrorSeverity::High,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::CsvError(_) => {
                "Re-export the sheet as CSV and check for unbalanced quotes".to_string()
            }
            EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Check that the input path exists and is spelled correctly".to_string()
            }
            EtlError::IoError(_) => "Check file permissions and free disk space".to_string(),
            EtlError::SerializationError(_) => "Check the --report path".to_string(),
            EtlError::TomlError(_) => "Fix the syntax of the --config file".to_string(),
            EtlError::ConfigValidationError { field, .. }
            | EtlError::InvalidConfigValueError { field, .. } => {
                format!("Correct '{}' in the configuration", field)
            }
            EtlError::MissingColumnError { column } => format!(
                "Make sure the form export has a '{}' column, or remap it in --config",
                column
            ),
            EtlError::NumberPoolExhausted { capacity, .. } => format!(
                "Split the roster: at most {} people can get unique numbers",
                capacity
            ),
            EtlError::EmptyResult { .. } => {
                "Check that the input has rows with the expected fields filled in".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("File not found: {}", e)
            }
            EtlError::EmptyResult { what } => format!("No valid {} found!", what),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
