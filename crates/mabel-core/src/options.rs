//! Global manifest options and their combine semantics.
//!
//! Every field is optional so that manifests only state what they override;
//! combining two options values is a per-field merge, and reads go through
//! defaulting accessors.

use std::collections::BTreeSet;
use std::fmt;

use mabel_util::errors::MabelError;
use mabel_util::validated::Validated;

use crate::language::Language;
use crate::version::Version;

/// How to pick a version when several are declared for the same coordinate.
///
/// Policies form a semilattice ordered by strictness (`Highest` < `Fixed` <
/// `Fail`); combining two takes the stricter, and `Highest` is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum VersionConflictPolicy {
    #[default]
    Highest,
    Fixed,
    Fail,
}

impl VersionConflictPolicy {
    pub fn combine(self, other: Self) -> Self {
        self.max(other)
    }

    /// Pick one version out of `candidates`, honoring a declared root
    /// version when present. `candidates` must be non-empty.
    pub fn resolve(
        self,
        root: Option<&Version>,
        candidates: &BTreeSet<Version>,
    ) -> Validated<Version> {
        match self {
            VersionConflictPolicy::Fail => {
                let only = if candidates.len() == 1 {
                    candidates.iter().next()
                } else {
                    None
                };
                match only {
                    Some(v) if root.is_none() || root == Some(v) => Validated::valid(v.clone()),
                    _ => Validated::invalid(MabelError::MultipleVersions {
                        root: root
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "none".to_string()),
                        found: sorted_list(candidates),
                    }),
                }
            }
            VersionConflictPolicy::Fixed => match (root, candidates.iter().next()) {
                (Some(v), _) => Validated::valid(v.clone()),
                (None, Some(v)) if candidates.len() == 1 => Validated::valid(v.clone()),
                _ => Validated::invalid(MabelError::FixedRequiresOne {
                    found: sorted_list(candidates),
                }),
            },
            VersionConflictPolicy::Highest => match root {
                Some(v) => Validated::valid(v.clone()),
                None => Validated::valid(
                    candidates
                        .iter()
                        .next_back()
                        .cloned()
                        .expect("resolve requires at least one candidate version"),
                ),
            },
        }
    }
}

impl fmt::Display for VersionConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConflictPolicy::Highest => f.write_str("highest"),
            VersionConflictPolicy::Fixed => f.write_str("fixed"),
            VersionConflictPolicy::Fail => f.write_str("fail"),
        }
    }
}

fn sorted_list(candidates: &BTreeSet<Version>) -> String {
    let items: Vec<&str> = candidates.iter().map(Version::as_str).collect();
    format!("[{}]", items.join(", "))
}

/// How generated targets propagate their dependencies: via `runtime_deps`
/// or via `exports`. A commutative monoid whose identity is `RuntimeDeps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Transitivity {
    #[default]
    RuntimeDeps,
    Exports,
}

impl Transitivity {
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Transitivity::RuntimeDeps, x) => x,
            (x, Transitivity::RuntimeDeps) => x,
            (Transitivity::Exports, Transitivity::Exports) => Transitivity::Exports,
        }
    }
}

impl fmt::Display for Transitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transitivity::RuntimeDeps => f.write_str("runtime_deps"),
            Transitivity::Exports => f.write_str("exports"),
        }
    }
}

/// Directory the generated third-party tree lives under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirectoryName(String);

impl DirectoryName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DirectoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Maven server artifacts are resolved against.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MavenServer {
    pub id: String,
    pub server_type: String,
    pub url: String,
}

impl MavenServer {
    pub fn new(
        id: impl Into<String>,
        server_type: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            server_type: server_type.into(),
            url: url.into(),
        }
    }

    /// The default resolver when a manifest names none.
    pub fn central() -> Self {
        Self::new("central", "default", "http://central.maven.org/maven2/")
    }
}

/// Global options of a dependency manifest. All fields optional; reads go
/// through the defaulting accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub version_conflict_policy: Option<VersionConflictPolicy>,
    pub third_party_directory: Option<DirectoryName>,
    pub languages: Option<BTreeSet<Language>>,
    pub resolvers: Option<Vec<MavenServer>>,
    pub transitivity: Option<Transitivity>,
    pub build_header: Option<Vec<String>>,
}

impl Options {
    /// Per-field merge of two options values. `Options::default()` is the
    /// identity on both sides.
    pub fn combine(&self, other: &Options) -> Options {
        Options {
            version_conflict_policy: merge_with(
                self.version_conflict_policy,
                other.version_conflict_policy,
                VersionConflictPolicy::combine,
            ),
            // Later manifests override the directory outright.
            third_party_directory: other
                .third_party_directory
                .clone()
                .or_else(|| self.third_party_directory.clone()),
            languages: merge_with(self.languages.clone(), other.languages.clone(), |mut a, b| {
                a.extend(b);
                a
            }),
            resolvers: merge_with(self.resolvers.clone(), other.resolvers.clone(), concat_dedup),
            transitivity: merge_with(
                self.transitivity,
                other.transitivity,
                Transitivity::combine,
            ),
            build_header: merge_with(
                self.build_header.clone(),
                other.build_header.clone(),
                concat_dedup,
            ),
        }
    }

    pub fn version_conflict_policy(&self) -> VersionConflictPolicy {
        self.version_conflict_policy.unwrap_or_default()
    }

    pub fn third_party_directory(&self) -> DirectoryName {
        self.third_party_directory
            .clone()
            .unwrap_or_else(|| DirectoryName::new("3rdparty/jvm"))
    }

    pub fn languages(&self) -> BTreeSet<Language> {
        self.languages.clone().unwrap_or_else(|| {
            [Language::Java, Language::default_scala()].into_iter().collect()
        })
    }

    pub fn resolvers(&self) -> Vec<MavenServer> {
        self.resolvers
            .clone()
            .unwrap_or_else(|| vec![MavenServer::central()])
    }

    pub fn transitivity(&self) -> Transitivity {
        self.transitivity.unwrap_or(Transitivity::Exports)
    }

    pub fn build_header(&self) -> String {
        self.build_header
            .as_deref()
            .unwrap_or_default()
            .join("\n")
    }
}

fn merge_with<T>(a: Option<T>, b: Option<T>, f: impl FnOnce(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn concat_dedup<T: PartialEq + Clone>(mut first: Vec<T>, second: Vec<T>) -> Vec<T> {
    for item in second {
        if !first.contains(&item) {
            first.push(item);
        }
    }
    first
}
