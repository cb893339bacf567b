//! Maven coordinate identity: groups, artifacts, subprojects, and the
//! versioned/unversioned coordinate pairs built from them.

use std::fmt;

use mabel_util::errors::MabelError;

use crate::version::Version;

/// A dotted Maven group identifier, e.g. `org.typelevel`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MavenGroup(String);

impl MavenGroup {
    pub fn new(group: impl Into<String>) -> Self {
        Self(group.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MavenGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An artifact name that may carry `-`-delimited subproject suffixes.
///
/// `a-b-c` can be read as artifact `a-b-c`, or as project `a` with
/// subproject `b-c`, or as project `a-b` with subproject `c`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactOrProject(String);

impl ArtifactOrProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// All prefix/suffix readings of this name at `-` boundaries.
    ///
    /// `a-b-c-d` yields `(a, b-c-d)`, `(a-b, c-d)`, `(a-b-c, d)`. A name
    /// without `-` yields nothing.
    pub fn split_subprojects(&self) -> Vec<(ArtifactOrProject, Subproject)> {
        self.0
            .char_indices()
            .filter(|&(i, c)| c == '-' && i > 0 && i + 1 < self.0.len())
            .map(|(i, _)| {
                (
                    ArtifactOrProject::new(&self.0[..i]),
                    Subproject::new(&self.0[i + 1..]),
                )
            })
            .collect()
    }

    /// Append a subproject suffix; the empty subproject is the name itself.
    pub fn join(&self, subproject: &Subproject) -> ArtifactOrProject {
        if subproject.is_empty() {
            self.clone()
        } else {
            ArtifactOrProject::new(format!("{}-{}", self.0, subproject))
        }
    }
}

impl fmt::Display for ArtifactOrProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `-`-delimited suffix of an [`ArtifactOrProject`]. The empty subproject
/// stands for the bare artifact when a record also declares modules.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subproject(String);

impl Subproject {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Subproject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully-formed Maven artifact id, after subproject joining and language
/// mangling have been applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MavenArtifactId(String);

impl MavenArtifactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MavenArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `group:artifact` without a version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnversionedCoordinate {
    pub group: MavenGroup,
    pub artifact: MavenArtifactId,
}

impl UnversionedCoordinate {
    pub fn new(group: MavenGroup, artifact: MavenArtifactId) -> Self {
        Self { group, artifact }
    }

    /// Name usable as a Bazel external-workspace repository.
    ///
    /// `a.b:c-d` becomes `a_b_c_d`.
    pub fn to_bazel_repo_name(&self) -> String {
        sanitize(&format!("{}:{}", self.group, self.artifact))
    }

    /// Name usable in a Bazel `bind` rule: `jar/<group>/<artifact>` with the
    /// path separators and Maven punctuation all flattened to `_`.
    pub fn to_binding_name(&self) -> String {
        sanitize(&format!(
            "jar/{}/{}",
            self.group.as_str().replace('.', "/"),
            self.artifact
        ))
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '.' | '-' | ':' | '/' => '_',
            other => other,
        })
        .collect()
}

impl fmt::Display for UnversionedCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

/// `group:artifact:version`. Ordered by group, then artifact, then the
/// version total order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MavenCoordinate {
    pub group: MavenGroup,
    pub artifact: MavenArtifactId,
    pub version: Version,
}

impl MavenCoordinate {
    pub fn new(group: MavenGroup, artifact: MavenArtifactId, version: Version) -> Self {
        Self {
            group,
            artifact,
            version,
        }
    }

    /// Parse `"group:artifact:version"`. Anything but exactly three parts is
    /// rejected.
    pub fn parse(s: &str) -> Result<Self, MabelError> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, artifact, version] => Ok(Self {
                group: MavenGroup::new(*group),
                artifact: MavenArtifactId::new(*artifact),
                version: Version::new(*version),
            }),
            _ => Err(MabelError::CoordinateShape {
                input: s.to_string(),
            }),
        }
    }

    pub fn unversioned(&self) -> UnversionedCoordinate {
        UnversionedCoordinate::new(self.group.clone(), self.artifact.clone())
    }
}

impl fmt::Display for MavenCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}
