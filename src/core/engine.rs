use crate::domain::model::{Gpa, GpaSummary, Subject};
use crate::domain::registry::GradeRegistry;
use crate::utils::error::{GpaError, Result};
use std::collections::HashMap;

/// Label that clears a subject's grade.
pub const NO_GRADE: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Assigned { point: u32 },
    Cleared,
    /// The code is not in the catalog. The value is stored but never read.
    Ignored,
}

/// Holds the grade chosen for each subject and derives the GPA from it.
#[derive(Debug, Clone)]
pub struct GpaEngine {
    registry: GradeRegistry,
    selection: HashMap<String, u32>,
}

impl GpaEngine {
    pub fn new(registry: GradeRegistry) -> Self {
        Self {
            registry,
            selection: HashMap::new(),
        }
    }

    /// Sets or clears the grade for `code`.
    ///
    /// An empty label clears the subject. Any other label must be on the
    /// grade scale, otherwise `InvalidGradeLabel` is returned and the
    /// selection is left untouched. Codes outside the catalog are accepted
    /// and have no effect on the GPA.
    pub fn set_grade(&mut self, code: &str, label: &str) -> Result<SetOutcome> {
        let point = if label == NO_GRADE {
            None
        } else {
            let point = self.registry.scale().point_for(label).ok_or_else(|| {
                GpaError::InvalidGradeLabel {
                    label: label.to_string(),
                }
            })?;
            Some(point)
        };

        let known = self.registry.contains(code);
        match point {
            Some(point) => {
                debug_assert!(self.registry.scale().contains_point(point));
                self.selection.insert(code.to_string(), point);
            }
            None => {
                self.selection.remove(code);
            }
        }

        if !known {
            tracing::warn!("Ignoring grade for unknown subject code '{}'", code);
            return Ok(SetOutcome::Ignored);
        }

        tracing::debug!(
            "Subject {} set to {:?}; GPA now {}",
            code,
            point,
            self.compute_gpa()
        );

        Ok(match point {
            Some(point) => SetOutcome::Assigned { point },
            None => SetOutcome::Cleared,
        })
    }

    /// Like `set_grade`, but rejects codes that are not in the catalog.
    pub fn set_grade_strict(&mut self, code: &str, label: &str) -> Result<SetOutcome> {
        if !self.registry.contains(code) {
            return Err(GpaError::UnknownSubjectCode {
                code: code.to_string(),
            });
        }
        self.set_grade(code, label)
    }

    pub fn compute_gpa(&self) -> Gpa {
        let (points, credits) = self.graded_subjects().fold(
            (0u64, 0u64),
            |(points, credits), (subject, point)| {
                let weight = u64::from(subject.credits);
                (points + weight * u64::from(point), credits + weight)
            },
        );
        Gpa::from_totals(points, credits)
    }

    pub fn graded_count(&self) -> usize {
        self.graded_subjects().count()
    }

    pub fn graded_credits(&self) -> u32 {
        self.graded_subjects().map(|(subject, _)| subject.credits).sum()
    }

    pub fn total_credits(&self) -> u32 {
        self.registry.total_credits()
    }

    pub fn label_for_point(&self, point: u32) -> Option<&str> {
        self.registry.scale().label_for(point)
    }

    /// Letter label currently selected for `code`, if any.
    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.selected_point(code)
            .and_then(|point| self.label_for_point(point))
    }

    pub fn selected_point(&self, code: &str) -> Option<u32> {
        self.selection.get(code).copied()
    }

    pub fn subjects(&self) -> &[Subject] {
        self.registry.subjects()
    }

    pub fn registry(&self) -> &GradeRegistry {
        &self.registry
    }

    pub fn summary(&self) -> GpaSummary {
        GpaSummary {
            gpa: self.compute_gpa(),
            graded_subjects: self.graded_count(),
            total_subjects: self.registry.subjects().len(),
            graded_credits: self.graded_credits(),
            total_credits: self.total_credits(),
        }
    }

    // Registry order; stray codes in the selection are never visited.
    fn graded_subjects(&self) -> impl Iterator<Item = (&Subject, u32)> + '_ {
        self.registry
            .subjects()
            .iter()
            .filter_map(|subject| self.selected_point(&subject.code).map(|p| (subject, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GradeScale;

    fn engine() -> GpaEngine {
        GpaEngine::new(GradeRegistry::reference())
    }

    #[test]
    fn test_empty_selection_is_zero() {
        let engine = engine();
        assert_eq!(engine.compute_gpa(), Gpa::ZERO);
        assert_eq!(engine.compute_gpa().to_string(), "0.00");
        assert_eq!(engine.graded_count(), 0);
        assert_eq!(engine.total_credits(), 21);
    }

    #[test]
    fn test_single_subject() {
        let mut engine = engine();
        let outcome = engine.set_grade("AD3501", "O").unwrap();
        assert_eq!(outcome, SetOutcome::Assigned { point: 10 });
        assert_eq!(engine.compute_gpa().to_string(), "10.00");
        assert_eq!(engine.graded_count(), 1);
        assert_eq!(engine.graded_credits(), 3);
    }

    #[test]
    fn test_weighted_average_over_mixed_credits() {
        let mut engine = engine();
        engine.set_grade("AD3501", "O").unwrap(); // 3 * 10
        engine.set_grade("AD3511", "A+").unwrap(); // 2 * 9
        engine.set_grade("AD3512", "B").unwrap(); // 2 * 6
        // 60 / 7 = 8.571..
        assert_eq!(engine.compute_gpa().to_string(), "8.57");
    }

    #[test]
    fn test_overwrite_replaces_previous_grade() {
        let mut engine = engine();
        engine.set_grade("AD3501", "O").unwrap();
        engine.set_grade("AD3501", "B").unwrap();
        assert_eq!(engine.selected_point("AD3501"), Some(6));
        assert_eq!(engine.compute_gpa().to_string(), "6.00");
        assert_eq!(engine.graded_count(), 1);
    }

    #[test]
    fn test_clear_removes_contribution() {
        let mut engine = engine();
        engine.set_grade("AD3501", "O").unwrap();
        engine.set_grade("CS3551", "A").unwrap();
        assert_eq!(engine.graded_count(), 2);

        let outcome = engine.set_grade("AD3501", NO_GRADE).unwrap();
        assert_eq!(outcome, SetOutcome::Cleared);
        assert_eq!(engine.graded_count(), 1);
        assert_eq!(engine.compute_gpa().to_string(), "8.00");
        assert_eq!(engine.label_for("AD3501"), None);
    }

    #[test]
    fn test_invalid_label_leaves_selection_unchanged() {
        let mut engine = engine();
        engine.set_grade("AD3501", "A").unwrap();
        let err = engine.set_grade("AD3501", "C").unwrap_err();
        assert!(matches!(err, GpaError::InvalidGradeLabel { label } if label == "C"));
        assert_eq!(engine.selected_point("AD3501"), Some(8));
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let mut engine = engine();
        assert!(engine.set_grade("AD3501", "a+").is_err());
        assert!(engine.set_grade("AD3501", " O").is_err());
    }

    #[test]
    fn test_unknown_code_is_inert() {
        let mut engine = engine();
        let outcome = engine.set_grade("XX9999", "O").unwrap();
        assert_eq!(outcome, SetOutcome::Ignored);
        assert_eq!(engine.graded_count(), 0);
        assert_eq!(engine.compute_gpa(), Gpa::ZERO);
    }

    #[test]
    fn test_strict_rejects_unknown_code() {
        let mut engine = engine();
        let err = engine.set_grade_strict("XX9999", "O").unwrap_err();
        assert!(matches!(err, GpaError::UnknownSubjectCode { .. }));
        assert!(engine.set_grade_strict("AD3501", "O").is_ok());
    }

    #[test]
    fn test_label_redisplay() {
        let mut engine = engine();
        engine.set_grade("CCS334", "B+").unwrap();
        assert_eq!(engine.label_for("CCS334"), Some("B+"));
        assert_eq!(engine.label_for_point(9), Some("A+"));
        assert_eq!(engine.label_for_point(4), None);
    }

    #[test]
    fn test_engines_are_independent() {
        let mut first = engine();
        let second = engine();
        first.set_grade("AD3501", "O").unwrap();
        assert_eq!(first.graded_count(), 1);
        assert_eq!(second.graded_count(), 0);
    }

    #[test]
    fn test_custom_registry() {
        let scale = GradeScale::new([("P", 4), ("F", 1)]).unwrap();
        let registry =
            GradeRegistry::new(vec![Subject::new("M1", 4), Subject::new("M2", 1)], scale)
                .unwrap();
        let mut engine = GpaEngine::new(registry);
        engine.set_grade("M1", "P").unwrap();
        engine.set_grade("M2", "F").unwrap();
        // 17 / 5
        assert_eq!(engine.compute_gpa().to_string(), "3.40");
        assert_eq!(engine.summary().total_credits, 5);
    }
}
