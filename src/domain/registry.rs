use crate::domain::model::{GradeScale, Subject, MAX_CREDITS};
use crate::utils::error::{GpaError, Result};
use crate::utils::validation::find_duplicate;

pub const DEFAULT_CATALOG_NAME: &str = "Academic Performance Tracker";

/// Label used when a catalog does not name its semester.
pub const DEFAULT_SEMESTER: &str = "Semester 5";

/// Immutable catalog of subjects and the grade scale they are marked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRegistry {
    name: String,
    semester: String,
    subjects: Vec<Subject>,
    scale: GradeScale,
    total_credits: u32,
}

impl GradeRegistry {
    pub fn new(subjects: Vec<Subject>, scale: GradeScale) -> Result<Self> {
        Self::named(DEFAULT_CATALOG_NAME, DEFAULT_SEMESTER, subjects, scale)
    }

    pub fn named(
        name: impl Into<String>,
        semester: impl Into<String>,
        subjects: Vec<Subject>,
        scale: GradeScale,
    ) -> Result<Self> {
        if subjects.is_empty() {
            return Err(GpaError::EmptyCatalog {
                message: "catalog has no subjects".to_string(),
            });
        }

        for subject in &subjects {
            if subject.code.trim().is_empty() {
                return Err(GpaError::InvalidConfigValueError {
                    field: "subjects.code".to_string(),
                    value: subject.code.clone(),
                    reason: "Subject code cannot be empty".to_string(),
                });
            }
            if subject.credits == 0 || subject.credits > MAX_CREDITS {
                return Err(GpaError::InvalidCredits {
                    code: subject.code.clone(),
                    credits: subject.credits,
                });
            }
        }

        if let Some(code) = find_duplicate(subjects.iter().map(|s| s.code.as_str())) {
            return Err(GpaError::DuplicateSubjectCode {
                code: code.to_string(),
            });
        }

        if !scale.is_injective() {
            tracing::warn!(
                "Grade scale maps several labels to points {:?}; redisplay shows the first label listed",
                scale.ambiguous_points()
            );
        }

        let total_credits = subjects
            .iter()
            .try_fold(0u32, |total, s| total.checked_add(s.credits))
            .ok_or_else(|| GpaError::InvalidConfigValueError {
                field: "subjects.credits".to_string(),
                value: subjects.len().to_string(),
                reason: "Total credits exceed the supported range".to_string(),
            })?;

        Ok(Self {
            name: name.into(),
            semester: semester.into(),
            subjects,
            scale,
            total_credits,
        })
    }

    /// The built-in 8-subject, 21-credit catalog.
    pub fn reference() -> Self {
        let subjects = vec![
            Subject::new("AD3501", 3),
            Subject::new("AD3511", 2),
            Subject::new("AD3512", 2),
            Subject::new("CCS334", 3),
            Subject::new("CCS335", 3),
            Subject::new("CS3551", 3),
            Subject::new("CCW331", 3),
            Subject::new("CW3551", 3),
        ];
        let scale = GradeScale::new([("O", 10), ("A+", 9), ("A", 8), ("B+", 7), ("B", 6)])
            .unwrap_or_else(|e| unreachable!("reference grade scale is valid: {e}"));

        Self::new(subjects, scale)
            .unwrap_or_else(|e| unreachable!("reference catalog is valid: {e}"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn semester(&self) -> &str {
        &self.semester
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn subject(&self, code: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.subject(code).is_some()
    }

    pub fn scale(&self) -> &GradeScale {
        &self.scale
    }

    pub fn total_credits(&self) -> u32 {
        self.total_credits
    }
}

impl Default for GradeRegistry {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_catalog() {
        let registry = GradeRegistry::reference();
        assert_eq!(registry.subjects().len(), 8);
        assert_eq!(registry.total_credits(), 21);
        assert_eq!(registry.subjects()[0].code, "AD3501");
        assert_eq!(registry.subject("AD3511").map(|s| s.credits), Some(2));
        assert_eq!(registry.semester(), DEFAULT_SEMESTER);
        assert_eq!(registry.name(), DEFAULT_CATALOG_NAME);
        assert!(!registry.contains("XX0000"));
    }

    #[test]
    fn test_rejects_duplicate_codes() {
        let scale = GradeScale::new([("O", 10)]).unwrap();
        let result = GradeRegistry::new(
            vec![Subject::new("AD3501", 3), Subject::new("AD3501", 2)],
            scale,
        );
        assert!(matches!(
            result,
            Err(GpaError::DuplicateSubjectCode { code }) if code == "AD3501"
        ));
    }

    #[test]
    fn test_rejects_zero_credits_and_empty_catalog() {
        let scale = GradeScale::new([("O", 10)]).unwrap();
        assert!(matches!(
            GradeRegistry::new(vec![Subject::new("AD3501", 0)], scale.clone()),
            Err(GpaError::InvalidCredits { .. })
        ));
        assert!(matches!(
            GradeRegistry::new(vec![], scale.clone()),
            Err(GpaError::EmptyCatalog { .. })
        ));
        assert!(GradeRegistry::new(vec![Subject::new("  ", 3)], scale).is_err());
    }

    #[test]
    fn test_rejects_credits_above_bound() {
        let scale = GradeScale::new([("O", 10)]).unwrap();
        let result = GradeRegistry::new(
            vec![
                Subject::new("AD3501", 3_000_000_000),
                Subject::new("AD3511", 3_000_000_000),
            ],
            scale.clone(),
        );
        assert!(matches!(
            result,
            Err(GpaError::InvalidCredits { credits: 3_000_000_000, .. })
        ));

        let registry =
            GradeRegistry::new(vec![Subject::new("AD3501", MAX_CREDITS)], scale).unwrap();
        assert_eq!(registry.total_credits(), MAX_CREDITS);
    }

    #[test]
    fn test_accepts_non_injective_scale() {
        let scale = GradeScale::new([("S", 10), ("O", 10)]).unwrap();
        let registry = GradeRegistry::new(vec![Subject::new("AD3501", 3)], scale).unwrap();
        assert!(!registry.scale().is_injective());
    }
}
