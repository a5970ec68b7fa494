use thiserror::Error;

/// This type represents failures of a [`DependencySource`](crate::source::DependencySource)
/// lookup.
///
/// The graph builder never propagates these; a failed lookup is recorded as a package without
/// dependencies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("package '{0}' not found")]
    PackageNotFound(String),
    #[error("version '{version}' of package '{package}' not found")]
    VersionNotFound { package: String, version: String },
}

/// This type represents a malformed line in a package index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// This type represents errors that occur during [`Template`](crate::template::Template)
/// construction.
#[derive(Error, Debug)]
#[error("invalid template: {0}")]
pub struct TemplateError(#[from] tinytemplate::error::Error);
