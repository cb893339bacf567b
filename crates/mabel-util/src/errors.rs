use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all mabel operations.
///
/// Merge-family operations collect these into non-empty lists (see
/// [`crate::validated::Validated`]) rather than returning the first failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum MabelError {
    /// A coordinate string did not have the `group:artifact:version` shape.
    #[error("expected exactly three :, got {input}")]
    CoordinateShape { input: String },

    /// The `Fail` policy saw more than one candidate version.
    #[error("multiple versions found in Fail policy, root: {root}, transitive: {found}")]
    MultipleVersions { root: String, found: String },

    /// The `Fixed` policy had neither a declared root nor a unique candidate.
    #[error("fixed requires 1, or a declared version, found: {found}")]
    FixedRequiresOne { found: String },

    /// Two manifests redirect the same coordinate to different targets.
    #[error("in replacements combine: {left} != {right}")]
    ReplacementCollision { left: String, right: String },

    /// A Scala language entry carried a version outside the `2.X` (X >= 10) family.
    #[error("unsupported scala version: {version}")]
    UnsupportedScalaVersion { version: String },

    /// Invalid or malformed dependencies manifest.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your dependencies YAML for syntax errors"))]
    Manifest { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type MabelResult<T> = miette::Result<T>;
