pub mod catalog;

use crate::core::report::ReportFormat;
use crate::domain::ports::{ReferenceCatalog, RegistryProvider};
use crate::domain::registry::GradeRegistry;
use crate::utils::error::{GpaError, Result};
use crate::utils::validation::{validate_one_of, validate_path, Validate};
use catalog::TomlCatalog;

#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "gpa-tracker"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Credit-weighted GPA calculator for a semester of subjects")
)]
pub struct CliConfig {
    /// TOML catalog of subjects and grades (built-in catalog when omitted)
    #[cfg_attr(feature = "cli", arg(long))]
    pub catalog: Option<String>,

    /// Grade assignments as CODE=LABEL; an empty LABEL clears the subject
    #[cfg_attr(feature = "cli", arg(short, long = "grade", value_delimiter = ','))]
    pub grades: Vec<String>,

    /// Output format: table, json or csv
    #[cfg_attr(feature = "cli", arg(long, default_value = "table"))]
    pub format: String,

    /// Read commands from stdin after applying --grade
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub interactive: bool,

    /// Reject subject codes that are not in the catalog
    #[cfg_attr(feature = "cli", arg(long))]
    pub strict: bool,

    /// Emit logs as JSON
    #[cfg_attr(feature = "cli", arg(long))]
    pub log_json: bool,

    #[cfg_attr(feature = "cli", arg(short, long, help = "Enable verbose output"))]
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            grades: Vec::new(),
            format: "table".to_string(),
            interactive: false,
            strict: false,
            log_json: false,
            verbose: false,
        }
    }
}

impl CliConfig {
    pub fn report_format(&self) -> Result<ReportFormat> {
        self.format.parse()
    }

    pub fn grade_assignments(&self) -> Result<Vec<(String, String)>> {
        self.grades
            .iter()
            .map(|raw| parse_grade_assignment(raw))
            .collect()
    }

    pub fn load_registry(&self) -> Result<GradeRegistry> {
        match &self.catalog {
            Some(path) => {
                tracing::info!("Loading catalog from {}", path);
                TomlCatalog::from_file(path)?.registry()
            }
            None => ReferenceCatalog.registry(),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.catalog {
            validate_path("catalog", path)?;
        }
        validate_one_of("format", &self.format.to_ascii_lowercase(), &ReportFormat::NAMES)?;
        self.grade_assignments()?;
        Ok(())
    }
}

/// Splits `CODE=LABEL`. The label may be empty.
pub fn parse_grade_assignment(raw: &str) -> Result<(String, String)> {
    let (code, label) = raw.split_once('=').ok_or_else(|| GpaError::ParseError {
        input: raw.to_string(),
        reason: "expected CODE=LABEL".to_string(),
    })?;

    let code = code.trim();
    if code.is_empty() {
        return Err(GpaError::ParseError {
            input: raw.to_string(),
            reason: "subject code is empty".to_string(),
        });
    }

    Ok((code.to_string(), label.trim().to_string()))
}
