use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Palette request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration parsing failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Palette error: {message}")]
    PaletteError { message: String },

    #[error("Palette has no tokens to match against")]
    EmptyPalette,

    #[error("Duplicate token name in palette: {name}")]
    DuplicateToken { name: String },

    #[error("Document error: {message}")]
    DocumentError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Palette,
    Document,
    Network,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AuditError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuditError::ConfigError { .. }
            | AuditError::ConfigValidationError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AuditError::PaletteError { .. }
            | AuditError::EmptyPalette
            | AuditError::DuplicateToken { .. } => ErrorCategory::Palette,
            AuditError::DocumentError { .. } | AuditError::SerializationError(_) => {
                ErrorCategory::Document
            }
            AuditError::HttpError(_) => ErrorCategory::Network,
            AuditError::ZipError(_) | AuditError::CsvError(_) | AuditError::IoError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Palette | ErrorCategory::Document => {
                ErrorSeverity::High
            }
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AuditError::HttpError(_) => {
                "Check the palette URL and network connectivity, then retry the scan"
            }
            AuditError::EmptyPalette => "Add at least one token to the palette file",
            AuditError::DuplicateToken { .. } => "Give every token in the palette a unique name",
            AuditError::PaletteError { .. } => {
                "Make sure the palette is JSON shaped like {\"tokens\": {\"name\": {\"value\": \"#RRGGBB\"}}}"
            }
            AuditError::DocumentError { .. } | AuditError::SerializationError(_) => {
                "Export the document again and make sure it is valid JSON"
            }
            AuditError::MissingConfigError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::ConfigValidationError { .. }
            | AuditError::ConfigError { .. } => "Review the command line flags or the TOML file",
            AuditError::IoError(_) | AuditError::CsvError(_) | AuditError::ZipError(_) => {
                "Check that the output directory exists and is writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Palette => format!("Could not load the token palette: {}", self),
            ErrorCategory::Document => format!("Could not read the design document: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Output => format!("Could not write the scan report: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
