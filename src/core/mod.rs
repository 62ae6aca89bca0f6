pub mod engine;
pub mod report;

pub use crate::domain::model::{Gpa, GpaSummary, GradeScale, Subject};
pub use crate::domain::ports::RegistryProvider;
pub use crate::domain::registry::GradeRegistry;
pub use crate::utils::error::Result;
