use crate::core::engine::GpaEngine;
use crate::domain::model::GpaSummary;
use crate::utils::error::{GpaError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl ReportFormat {
    pub const NAMES: [&'static str; 3] = ["table", "json", "csv"];
}

impl FromStr for ReportFormat {
    type Err = GpaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(GpaError::InvalidConfigValueError {
                field: "format".to_string(),
                value: s.to_string(),
                reason: format!("Allowed values: {}", Self::NAMES.join(", ")),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectRow {
    pub code: String,
    pub credits: u32,
    pub grade: Option<String>,
    pub point: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeReport {
    pub catalog: String,
    pub semester: String,
    pub generated_at: DateTime<Utc>,
    pub subjects: Vec<SubjectRow>,
    pub summary: GpaSummary,
}

impl GradeReport {
    pub fn from_engine(engine: &GpaEngine) -> Self {
        let subjects = engine
            .subjects()
            .iter()
            .map(|subject| SubjectRow {
                code: subject.code.clone(),
                credits: subject.credits,
                grade: engine.label_for(&subject.code).map(str::to_string),
                point: engine.selected_point(&subject.code),
            })
            .collect();

        Self {
            catalog: engine.registry().name().to_string(),
            semester: engine.registry().semester().to_string(),
            generated_at: Utc::now(),
            subjects,
            summary: engine.summary(),
        }
    }
}

pub fn render(engine: &GpaEngine, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Table => Ok(render_table(engine)),
        ReportFormat::Json => render_json(engine),
        ReportFormat::Csv => render_csv(engine),
    }
}

pub fn render_table(engine: &GpaEngine) -> String {
    let mut out = String::new();
    let registry = engine.registry();
    let scale_max = registry.scale().max_point();

    let _ = writeln!(out, "{} - {}", registry.name(), registry.semester());
    let _ = writeln!(out, "{:<12} {:>7}  {}", "SUBJECT", "CREDITS", "GRADE");
    for subject in engine.subjects() {
        let grade = match (engine.label_for(&subject.code), engine.selected_point(&subject.code)) {
            (Some(label), Some(point)) => format!("{} - {} points", label, point),
            _ => "-".to_string(),
        };
        let _ = writeln!(out, "{:<12} {:>7}  {}", subject.code, subject.credits, grade);
    }

    let summary = engine.summary();
    let _ = writeln!(out);
    let _ = writeln!(out, "Current GPA:     {} (out of {}.00)", summary.gpa, scale_max);
    let _ = writeln!(out, "Total Subjects:  {}", summary.total_subjects);
    let _ = writeln!(out, "Total Credits:   {}", summary.total_credits);
    let _ = writeln!(out, "Graded Subjects: {}", summary.graded_subjects);
    out
}

pub fn render_json(engine: &GpaEngine) -> Result<String> {
    let report = GradeReport::from_engine(engine);
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn render_csv(engine: &GpaEngine) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["code", "credits", "grade", "point"])?;

    for row in GradeReport::from_engine(engine).subjects {
        writer.write_record([
            row.code,
            row.credits.to_string(),
            row.grade.unwrap_or_default(),
            row.point.map(|p| p.to_string()).unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| GpaError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| GpaError::ParseError {
        input: "csv output".to_string(),
        reason: e.to_string(),
    })
}
