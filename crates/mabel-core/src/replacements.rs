//! Local substitutions: Maven coordinates redirected to in-repo targets.

use std::collections::BTreeMap;
use std::fmt;

use mabel_util::errors::MabelError;
use mabel_util::validated::Validated;

use crate::coordinate::{ArtifactOrProject, MavenGroup, UnversionedCoordinate};
use crate::language::Language;

/// A Bazel build target label, e.g. `//3rdparty/jvm/org/example:lib`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BazelTarget(String);

impl BazelTarget {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BazelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Redirects one coordinate to a local build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRecord {
    pub lang: Language,
    pub target: BazelTarget,
}

pub type ReplacementMap = BTreeMap<MavenGroup, BTreeMap<ArtifactOrProject, ReplacementRecord>>;

/// All replacement records of a model, with a derived index from the
/// language-mangled unversioned coordinate.
#[derive(Debug, Clone)]
pub struct Replacements {
    map: ReplacementMap,
    unversioned_to_record: BTreeMap<UnversionedCoordinate, ReplacementRecord>,
}

impl Replacements {
    pub fn new(map: ReplacementMap) -> Self {
        let mut unversioned_to_record = BTreeMap::new();
        for (group, artifacts) in &map {
            for (artifact, record) in artifacts {
                let uv = record.lang.unversioned(group, artifact, None);
                unversioned_to_record.insert(uv, record.clone());
            }
        }
        Self {
            map,
            unversioned_to_record,
        }
    }

    pub fn empty() -> Self {
        Self::new(BTreeMap::new())
    }

    pub fn groups(&self) -> &ReplacementMap {
        &self.map
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, uv: &UnversionedCoordinate) -> Option<&ReplacementRecord> {
        self.unversioned_to_record.get(uv)
    }

    /// The mangled coordinate this replacement declares for `(group,
    /// artifact)`, if one is declared.
    pub fn unversioned_coordinates_of(
        &self,
        group: &MavenGroup,
        artifact: &ArtifactOrProject,
    ) -> Option<UnversionedCoordinate> {
        self.map
            .get(group)
            .and_then(|artifacts| artifacts.get(artifact))
            .map(|record| record.lang.unversioned(group, artifact, None))
    }

    /// Pointwise merge. Records colliding on the same key must be
    /// structurally equal; every unequal collision contributes one error.
    pub fn combine(a: &Replacements, b: &Replacements) -> Validated<Replacements> {
        let mut merged: ReplacementMap = a.map.clone();
        let mut errors = Vec::new();
        for (group, artifacts) in &b.map {
            let into = merged.entry(group.clone()).or_default();
            for (artifact, record) in artifacts {
                match into.get(artifact) {
                    None => {
                        into.insert(artifact.clone(), record.clone());
                    }
                    Some(existing) if existing == record => {}
                    Some(existing) => {
                        errors.push(MabelError::ReplacementCollision {
                            left: describe(group, artifact, existing),
                            right: describe(group, artifact, record),
                        });
                    }
                }
            }
        }
        if errors.is_empty() {
            Validated::valid(Replacements::new(merged))
        } else {
            Validated::invalid_all(errors)
        }
    }
}

impl PartialEq for Replacements {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl Eq for Replacements {}

fn describe(group: &MavenGroup, artifact: &ArtifactOrProject, record: &ReplacementRecord) -> String {
    format!(
        "{}:{} -> {} ({})",
        group, artifact, record.target, record.lang
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacements(entries: &[(&str, &str, &str)]) -> Replacements {
        let mut map: ReplacementMap = BTreeMap::new();
        for (group, artifact, target) in entries {
            map.entry(MavenGroup::new(*group)).or_default().insert(
                ArtifactOrProject::new(*artifact),
                ReplacementRecord {
                    lang: Language::Java,
                    target: BazelTarget::new(*target),
                },
            );
        }
        Replacements::new(map)
    }

    #[test]
    fn equal_records_merge() {
        let a = replacements(&[("com.g", "bar", "//repo:bar")]);
        let b = replacements(&[("com.g", "bar", "//repo:bar"), ("com.g", "baz", "//repo:baz")]);
        let merged = Replacements::combine(&a, &b).into_result().unwrap();
        assert_eq!(merged.groups().len(), 1);
        assert_eq!(merged.groups()[&MavenGroup::new("com.g")].len(), 2);
    }

    #[test]
    fn unequal_collision_is_one_error_per_key() {
        let a = replacements(&[
            ("com.g", "bar", "//repo:bar"),
            ("com.g", "baz", "//repo:baz"),
        ]);
        let b = replacements(&[
            ("com.g", "bar", "//other:bar"),
            ("com.g", "baz", "//other:baz"),
        ]);
        let errs = Replacements::combine(&a, &b).into_result().unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs[0]
            .to_string()
            .starts_with("in replacements combine:"));
        assert!(errs[0].to_string().contains("//repo:bar"));
        assert!(errs[0].to_string().contains("//other:bar"));
    }

    #[test]
    fn lookup_uses_the_mangled_coordinate() {
        let mut map: ReplacementMap = BTreeMap::new();
        map.entry(MavenGroup::new("org.scala-lang")).or_default().insert(
            ArtifactOrProject::new("scala-library"),
            ReplacementRecord {
                lang: Language::scala(crate::version::Version::new("2.11.11"), false).unwrap(),
                target: BazelTarget::new("@scala//:library"),
            },
        );
        let reps = Replacements::new(map);
        let uv = reps
            .unversioned_coordinates_of(
                &MavenGroup::new("org.scala-lang"),
                &ArtifactOrProject::new("scala-library"),
            )
            .unwrap();
        assert_eq!(uv.to_string(), "org.scala-lang:scala-library");
        assert!(reps.get(&uv).is_some());
    }
}
