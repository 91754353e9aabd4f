use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Pattern compilation failed: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Report writing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Backup archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Pass '{stage}' failed: {details}")]
    PassError { stage: String, details: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Config,
    Processing,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MigrateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MigrateError::IoError(_) | MigrateError::ZipError(_) => ErrorCategory::Io,
            MigrateError::ConfigError { .. }
            | MigrateError::MissingConfigError { .. }
            | MigrateError::InvalidConfigValueError { .. }
            | MigrateError::TomlError(_) => ErrorCategory::Config,
            MigrateError::ValidationError { .. } => ErrorCategory::Validation,
            _ => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 文件讀寫失敗會讓整個語料庫狀態不可信，視為致命
            MigrateError::IoError(_) => ErrorSeverity::Critical,
            MigrateError::RegexError(_) => ErrorSeverity::Critical,
            MigrateError::PassError { .. } | MigrateError::ProcessingError { .. } => {
                ErrorSeverity::High
            }
            MigrateError::ConfigError { .. }
            | MigrateError::MissingConfigError { .. }
            | MigrateError::InvalidConfigValueError { .. }
            | MigrateError::TomlError(_)
            | MigrateError::ValidationError { .. } => ErrorSeverity::Medium,
            MigrateError::SerializationError(_)
            | MigrateError::CsvError(_)
            | MigrateError::ZipError(_) => ErrorSeverity::Low,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MigrateError::IoError(_) => {
                "Check that the target and legacy roots exist and are writable".to_string()
            }
            MigrateError::RegexError(_) => {
                "A rewrite rule pattern failed to compile; this is a packaging defect".to_string()
            }
            MigrateError::TomlError(_) => {
                "Check the config file syntax against the documented format".to_string()
            }
            MigrateError::ConfigError { .. }
            | MigrateError::MissingConfigError { .. }
            | MigrateError::InvalidConfigValueError { .. }
            | MigrateError::ValidationError { .. } => {
                "Fix the configuration value and re-run".to_string()
            }
            MigrateError::PassError { stage, .. } => {
                format!("Inspect the corpus state, then re-run with --pass {}", stage)
            }
            MigrateError::CsvError(_) => {
                "The rewrites completed; re-run to regenerate the report".to_string()
            }
            MigrateError::ZipError(_) => {
                "Backup archive could not be written; free disk space and re-run with --backup"
                    .to_string()
            }
            _ => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MigrateError::IoError(e) => format!("A file could not be read or written: {}", e),
            MigrateError::PassError { stage, details } => {
                format!("Migration pass '{}' failed: {}", stage, details)
            }
            MigrateError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' is not a valid {}: {}", value, field, reason),
            MigrateError::MissingConfigError { field } => {
                format!("The configuration field '{}' is required", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
