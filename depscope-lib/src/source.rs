use crate::error::SourceError;

/// A provider of package dependency lists.
///
/// `version` is `None` when the caller has no specific version in mind, in which case the
/// source picks its own default.
pub trait DependencySource {
    fn dependencies(&self, name: &str, version: Option<&str>) -> Result<Vec<String>, SourceError>;
}

impl<F> DependencySource for F
where
    F: Fn(&str, Option<&str>) -> Result<Vec<String>, SourceError>,
{
    fn dependencies(&self, name: &str, version: Option<&str>) -> Result<Vec<String>, SourceError> {
        self(name, version)
    }
}
