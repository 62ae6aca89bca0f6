use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpaError {
    #[error("Invalid grade label '{label}'")]
    InvalidGradeLabel { label: String },

    #[error("Unknown subject code '{code}'")]
    UnknownSubjectCode { code: String },

    #[error("Duplicate subject code '{code}' in catalog")]
    DuplicateSubjectCode { code: String },

    #[error(
        "Subject '{code}' has invalid credits {credits}: credits must be between 1 and {max}",
        max = crate::domain::model::MAX_CREDITS
    )]
    InvalidCredits { code: String, credits: u32 },

    #[error(
        "Grade '{label}' has invalid point {point}: grade points must be between 1 and {max}",
        max = crate::domain::model::MAX_GRADE_POINT
    )]
    InvalidGradePoint { label: String, point: u32 },

    #[error("Duplicate grade label '{label}' in grade scale")]
    DuplicateGradeLabel { label: String },

    #[error("Catalog is empty: {message}")]
    EmptyCatalog { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration field '{field}'")]
    MissingConfigError { field: String },

    #[error("Could not parse '{input}': {reason}")]
    ParseError { input: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Catalog,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl GpaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GpaError::InvalidGradeLabel { .. }
            | GpaError::UnknownSubjectCode { .. }
            | GpaError::ParseError { .. } => ErrorCategory::Input,
            GpaError::DuplicateSubjectCode { .. }
            | GpaError::InvalidCredits { .. }
            | GpaError::InvalidGradePoint { .. }
            | GpaError::DuplicateGradeLabel { .. }
            | GpaError::EmptyCatalog { .. } => ErrorCategory::Catalog,
            GpaError::InvalidConfigValueError { .. }
            | GpaError::ConfigValidationError { .. }
            | GpaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GpaError::IoError(_) | GpaError::SerializationError(_) | GpaError::CsvError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Catalog | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Short message suitable for printing to the terminal.
    pub fn user_friendly_message(&self) -> String {
        match self {
            GpaError::InvalidGradeLabel { label } => {
                format!("'{}' is not a grade on this scale", label)
            }
            GpaError::UnknownSubjectCode { code } => {
                format!("Subject '{}' is not part of this catalog", code)
            }
            GpaError::IoError(e) => format!("Could not read or write a file: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Input => match self {
                GpaError::InvalidGradeLabel { .. } => {
                    "Use one of the labels listed by the 'grades' command, or an empty label to clear"
                        .to_string()
                }
                GpaError::UnknownSubjectCode { .. } => {
                    "Check the subject code against the catalog, or drop --strict".to_string()
                }
                _ => "Grades are given as CODE=LABEL, e.g. AD3501=O".to_string(),
            },
            ErrorCategory::Catalog => {
                "Fix the catalog so subject codes are unique and credits and points are in range"
                    .to_string()
            }
            ErrorCategory::Configuration => {
                "Check the command-line flags and the catalog file fields".to_string()
            }
            ErrorCategory::System => "Check file paths and permissions, then retry".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GpaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_medium_severity() {
        let err = GpaError::InvalidGradeLabel {
            label: "C".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("'C'"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err: GpaError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_catalog_errors_are_high_severity() {
        let err = GpaError::DuplicateSubjectCode {
            code: "AD3501".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("unique"));
    }

    #[test]
    fn test_out_of_range_credits_message() {
        let err = GpaError::InvalidCredits {
            code: "AD3501".to_string(),
            credits: 3_000_000_000,
        };
        assert_eq!(
            err.to_string(),
            "Subject 'AD3501' has invalid credits 3000000000: credits must be between 1 and 1000"
        );
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
