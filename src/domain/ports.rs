use crate::domain::registry::GradeRegistry;
use crate::utils::error::Result;

/// Source of the subject catalog an engine is built over.
pub trait RegistryProvider {
    fn registry(&self) -> Result<GradeRegistry>;
}

/// Provides the built-in catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceCatalog;

impl RegistryProvider for ReferenceCatalog {
    fn registry(&self) -> Result<GradeRegistry> {
        Ok(GradeRegistry::reference())
    }
}
