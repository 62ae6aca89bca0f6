use crate::domain::model::{GradeEntry, GradeScale, Subject, MAX_CREDITS, MAX_GRADE_POINT};
use crate::domain::ports::RegistryProvider;
use crate::domain::registry::{GradeRegistry, DEFAULT_SEMESTER};
use crate::utils::error::{GpaError, Result};
use crate::utils::validation::{
    find_duplicate, validate_non_empty_string, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlCatalog {
    pub catalog: CatalogMeta,
    pub subjects: Vec<Subject>,
    pub grades: Vec<GradeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogMeta {
    pub name: String,
    pub semester: Option<String>,
}

impl TomlCatalog {
    /// 從 TOML 檔案載入目錄
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GpaError::IoError)?;
        tracing::debug!("Loaded catalog file {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GpaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SEMESTER})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").unwrap_or_else(|e| unreachable!("static regex: {e}"))
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn semester(&self) -> &str {
        self.catalog.semester.as_deref().unwrap_or(DEFAULT_SEMESTER)
    }

    pub fn into_registry(self) -> Result<GradeRegistry> {
        self.validate()?;
        let semester = self.semester().to_string();
        let scale = GradeScale::new(self.grades.into_iter().map(|g| (g.label, g.point)))?;
        GradeRegistry::named(self.catalog.name, semester, self.subjects, scale)
    }
}

impl Validate for TomlCatalog {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("catalog.name", &self.catalog.name)?;

        if self.subjects.is_empty() {
            return Err(GpaError::MissingConfigError {
                field: "subjects".to_string(),
            });
        }
        if self.grades.is_empty() {
            return Err(GpaError::MissingConfigError {
                field: "grades".to_string(),
            });
        }

        for subject in &self.subjects {
            validate_non_empty_string("subjects.code", &subject.code)?;
            validate_range("subjects.credits", subject.credits, 1, MAX_CREDITS).map_err(|_| {
                GpaError::InvalidCredits {
                    code: subject.code.clone(),
                    credits: subject.credits,
                }
            })?;
        }
        if let Some(code) = find_duplicate(self.subjects.iter().map(|s| s.code.as_str())) {
            return Err(GpaError::DuplicateSubjectCode {
                code: code.to_string(),
            });
        }

        for grade in &self.grades {
            validate_non_empty_string("grades.label", &grade.label)?;
            validate_range("grades.point", grade.point, 1, MAX_GRADE_POINT).map_err(|_| {
                GpaError::InvalidGradePoint {
                    label: grade.label.clone(),
                    point: grade.point,
                }
            })?;
        }

        Ok(())
    }
}

impl RegistryProvider for TomlCatalog {
    fn registry(&self) -> Result<GradeRegistry> {
        self.clone().into_registry()
    }
}
