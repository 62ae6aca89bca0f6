pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::app::session::Session;
pub use crate::config::{catalog::TomlCatalog, CliConfig};
pub use crate::core::{
    engine::{GpaEngine, SetOutcome, NO_GRADE},
    report::ReportFormat,
};
pub use crate::domain::{
    model::{Gpa, GpaSummary, GradeScale, Subject},
    ports::{ReferenceCatalog, RegistryProvider},
    registry::GradeRegistry,
};
pub use crate::utils::error::{GpaError, Result};
