use crate::utils::error::{GpaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on a subject's credits.
pub const MAX_CREDITS: u32 = 1_000;

/// Upper bound on a grade's point value.
pub const MAX_GRADE_POINT: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub code: String,
    pub credits: u32,
}

impl Subject {
    pub fn new(code: impl Into<String>, credits: u32) -> Self {
        Self {
            code: code.into(),
            credits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub label: String,
    pub point: u32,
}

/// Ordered list of letter grades and their points.
///
/// Forward (label -> point) and reverse (point -> label) lookups read the
/// same list. When two labels share a point the reverse lookup returns the
/// one listed first; `is_injective` tells callers whether that can happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeScale {
    entries: Vec<GradeEntry>,
}

impl GradeScale {
    pub fn new<I, L>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, u32)>,
        L: Into<String>,
    {
        let mut scale: Vec<GradeEntry> = Vec::new();
        for (label, point) in entries {
            let label = label.into();
            if label.trim().is_empty() {
                return Err(GpaError::InvalidConfigValueError {
                    field: "grades.label".to_string(),
                    value: label,
                    reason: "Grade label cannot be empty".to_string(),
                });
            }
            if point == 0 || point > MAX_GRADE_POINT {
                return Err(GpaError::InvalidGradePoint { label, point });
            }
            if scale.iter().any(|entry| entry.label == label) {
                return Err(GpaError::DuplicateGradeLabel { label });
            }
            scale.push(GradeEntry { label, point });
        }

        if scale.is_empty() {
            return Err(GpaError::EmptyCatalog {
                message: "grade scale has no grades".to_string(),
            });
        }

        Ok(Self { entries: scale })
    }

    pub fn point_for(&self, label: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.point)
    }

    pub fn label_for(&self, point: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.point == point)
            .map(|entry| entry.label.as_str())
    }

    pub fn contains_point(&self, point: u32) -> bool {
        self.entries.iter().any(|entry| entry.point == point)
    }

    pub fn max_point(&self) -> u32 {
        self.entries.iter().map(|entry| entry.point).max().unwrap_or(0)
    }

    pub fn is_injective(&self) -> bool {
        self.ambiguous_points().is_empty()
    }

    /// Points that more than one label maps to, in scale order.
    pub fn ambiguous_points(&self) -> Vec<u32> {
        let mut ambiguous = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let repeated = self.entries[..i].iter().any(|e| e.point == entry.point);
            if repeated && !ambiguous.contains(&entry.point) {
                ambiguous.push(entry.point);
            }
        }
        ambiguous
    }

    pub fn entries(&self) -> &[GradeEntry] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }
}

/// Credit-weighted average held as an exact number of hundredths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gpa {
    hundredths: u64,
}

impl Gpa {
    pub const ZERO: Gpa = Gpa { hundredths: 0 };

    /// Rounds `points / credits` half-up to two decimals. Zero credits gives 0.00.
    pub fn from_totals(points: u64, credits: u64) -> Self {
        if credits == 0 {
            return Self::ZERO;
        }
        let (points, credits) = (u128::from(points), u128::from(credits));
        let hundredths = (2 * 100 * points + credits) / (2 * credits);
        Self {
            hundredths: u64::try_from(hundredths).unwrap_or(u64::MAX),
        }
    }

    pub fn hundredths(&self) -> u64 {
        self.hundredths
    }

    pub fn as_f64(&self) -> f64 {
        self.hundredths as f64 / 100.0
    }
}

impl fmt::Display for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

impl Serialize for Gpa {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpaSummary {
    pub gpa: Gpa,
    pub graded_subjects: usize,
    pub total_subjects: usize,
    pub graded_credits: u32,
    pub total_credits: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_scale() -> GradeScale {
        GradeScale::new([("O", 10), ("A+", 9), ("A", 8), ("B+", 7), ("B", 6)]).unwrap()
    }

    #[test]
    fn test_forward_and_reverse_lookup() {
        let scale = reference_scale();
        assert_eq!(scale.point_for("A+"), Some(9));
        assert_eq!(scale.point_for("C"), None);
        assert_eq!(scale.label_for(7), Some("B+"));
        assert_eq!(scale.label_for(5), None);
        assert_eq!(scale.max_point(), 10);
        assert!(scale.is_injective());
    }

    #[test]
    fn test_reverse_lookup_prefers_first_label_when_ambiguous() {
        let scale = GradeScale::new([("S", 10), ("O", 10), ("A", 8)]).unwrap();
        assert!(!scale.is_injective());
        assert_eq!(scale.ambiguous_points(), vec![10]);
        assert_eq!(scale.label_for(10), Some("S"));
    }

    #[test]
    fn test_scale_rejects_bad_entries() {
        assert!(matches!(
            GradeScale::new([("O", 0)]),
            Err(GpaError::InvalidGradePoint { .. })
        ));
        assert!(matches!(
            GradeScale::new([("A", 8), ("A", 9)]),
            Err(GpaError::DuplicateGradeLabel { .. })
        ));
        assert!(GradeScale::new([(" ", 8)]).is_err());
        assert!(matches!(
            GradeScale::new([("O", 1_000_000_000)]),
            Err(GpaError::InvalidGradePoint { point: 1_000_000_000, .. })
        ));
        assert!(GradeScale::new([("O", MAX_GRADE_POINT)]).is_ok());
        assert!(matches!(
            GradeScale::new(Vec::<(String, u32)>::new()),
            Err(GpaError::EmptyCatalog { .. })
        ));
    }

    #[test]
    fn test_gpa_rounds_half_up() {
        assert_eq!(Gpa::from_totals(0, 0).to_string(), "0.00");
        assert_eq!(Gpa::from_totals(30, 3).to_string(), "10.00");
        // 65 / 8 = 8.125
        assert_eq!(Gpa::from_totals(65, 8).to_string(), "8.13");
        // 50 / 6 = 8.333..
        assert_eq!(Gpa::from_totals(50, 6).to_string(), "8.33");
        // 53 / 6 = 8.8333..
        assert_eq!(Gpa::from_totals(53, 6).hundredths(), 883);
        assert_eq!(Gpa::from_totals(48, 5).as_f64(), 9.6);
    }

    #[test]
    fn test_gpa_from_large_totals_does_not_overflow() {
        let points = u64::from(MAX_CREDITS) * u64::from(MAX_GRADE_POINT) * 1_000_000;
        let credits = u64::from(MAX_CREDITS) * 1_000_000;
        assert_eq!(Gpa::from_totals(points, credits).to_string(), "1000.00");
        assert_eq!(Gpa::from_totals(u64::MAX, 1).hundredths(), u64::MAX);
    }

    #[test]
    fn test_gpa_serializes_as_fixed_string() {
        let json = serde_json::to_string(&Gpa::from_totals(21, 3)).unwrap();
        assert_eq!(json, "\"7.00\"");
    }
}
