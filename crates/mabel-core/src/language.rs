//! Source languages and their artifact-id mangling.
//!
//! Scala artifacts published to Maven carry the binary-compatibility suffix
//! (`cats-core_2.11`), so the same logical artifact has a different Maven
//! identity per Scala major version. The [`Language`] of a record decides how
//! its declared name maps to the on-repository artifact id.

use std::fmt;

use mabel_util::errors::MabelError;

use crate::coordinate::{
    ArtifactOrProject, MavenArtifactId, MavenCoordinate, MavenGroup, Subproject,
    UnversionedCoordinate,
};
use crate::version::Version;

/// The language an artifact is published for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    Java,
    Scala(ScalaLanguage),
}

/// A validated Scala language entry.
///
/// Only `2.X` (optionally `2.X.Y`) with X >= 10 is supported; the binary
/// major (`"2.11"`) is derived once at construction so mangling never fails.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScalaLanguage {
    version: Version,
    mangle: bool,
    major: String,
}

impl ScalaLanguage {
    pub fn new(version: Version, mangle: bool) -> Result<Self, MabelError> {
        let major = binary_major(&version)?;
        Ok(Self {
            version,
            mangle,
            major,
        })
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn mangle(&self) -> bool {
        self.mangle
    }

    /// The binary-compatibility major, e.g. `"2.11"` for `2.11.11`.
    pub fn major(&self) -> &str {
        &self.major
    }

    fn suffix(&self) -> String {
        format!("_{}", self.major)
    }
}

fn binary_major(version: &Version) -> Result<String, MabelError> {
    let parts: Vec<&str> = version.as_str().split('.').collect();
    let minor = match parts.as_slice() {
        ["2", minor] | ["2", minor, _] => minor.parse::<u32>().ok(),
        _ => None,
    };
    match minor {
        Some(m) if m >= 10 => Ok(format!("2.{m}")),
        _ => Err(MabelError::UnsupportedScalaVersion {
            version: version.as_str().to_string(),
        }),
    }
}

impl Language {
    /// Construct a validated Scala language entry.
    pub fn scala(version: Version, mangle: bool) -> Result<Self, MabelError> {
        ScalaLanguage::new(version, mangle).map(Language::Scala)
    }

    /// The default Scala entry: 2.11.11, mangled.
    pub fn default_scala() -> Self {
        Language::Scala(ScalaLanguage {
            version: Version::new("2.11.11"),
            mangle: true,
            major: "2.11".to_string(),
        })
    }

    /// The Maven artifact id for a declared name, after subproject joining
    /// and language mangling.
    pub fn maven_artifact_id(
        &self,
        artifact: &ArtifactOrProject,
        subproject: Option<&Subproject>,
    ) -> MavenArtifactId {
        let base = match subproject {
            Some(sp) => artifact.join(sp),
            None => artifact.clone(),
        };
        match self {
            Language::Java => MavenArtifactId::new(base.as_str()),
            Language::Scala(scala) if scala.mangle => {
                MavenArtifactId::new(format!("{}{}", base, scala.suffix()))
            }
            Language::Scala(_) => MavenArtifactId::new(base.as_str()),
        }
    }

    pub fn unversioned(
        &self,
        group: &MavenGroup,
        artifact: &ArtifactOrProject,
        subproject: Option<&Subproject>,
    ) -> UnversionedCoordinate {
        UnversionedCoordinate::new(group.clone(), self.maven_artifact_id(artifact, subproject))
    }

    pub fn maven_coord(
        &self,
        group: &MavenGroup,
        artifact: &ArtifactOrProject,
        subproject: Option<&Subproject>,
        version: &Version,
    ) -> MavenCoordinate {
        MavenCoordinate::new(
            group.clone(),
            self.maven_artifact_id(artifact, subproject),
            version.clone(),
        )
    }

    /// Strip the Scala binary suffix from an artifact id, if present.
    pub fn remove_suffix(&self, artifact_id: &str) -> Option<String> {
        match self {
            Language::Java => None,
            Language::Scala(scala) => artifact_id
                .strip_suffix(&scala.suffix())
                .map(|s| s.to_string()),
        }
    }

    /// The form used in the options `languages` list, which names the full
    /// Scala version: `"java"`, `"scala:2.11.11"`, `"scala/unmangled:2.11.11"`.
    pub fn as_options_string(&self) -> String {
        match self {
            Language::Java => "java".to_string(),
            Language::Scala(scala) if scala.mangle => format!("scala:{}", scala.version),
            Language::Scala(scala) => format!("scala/unmangled:{}", scala.version),
        }
    }

    /// Whether the coordinate's artifact id already carries this language's
    /// Scala binary suffix.
    pub fn ends_with_scala_version(&self, uv: &UnversionedCoordinate) -> bool {
        match self {
            Language::Java => false,
            Language::Scala(scala) => uv.artifact.as_str().ends_with(&scala.suffix()),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Java => f.write_str("java"),
            Language::Scala(scala) if scala.mangle => f.write_str("scala"),
            Language::Scala(_) => f.write_str("scala/unmangled"),
        }
    }
}
