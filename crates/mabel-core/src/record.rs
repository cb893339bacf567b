//! Per-artifact dependency declarations.

use std::collections::BTreeSet;

use crate::coordinate::{ArtifactOrProject, MavenCoordinate, MavenGroup, Subproject, UnversionedCoordinate};
use crate::language::Language;
use crate::version::Version;

/// One declared artifact (or module group) inside a dependency manifest.
///
/// Without `modules` the record denotes a single artifact. With `modules`
/// it denotes the cross product `artifact-<m>` for every member, and can be
/// flattened into that many independent records. An absent `version` means
/// the artifact takes whatever version the rest of the graph demands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub lang: Language,
    pub version: Option<Version>,
    pub modules: Option<BTreeSet<Subproject>>,
    pub exports: Option<BTreeSet<(MavenGroup, ArtifactOrProject)>>,
    pub exclude: Option<BTreeSet<(MavenGroup, ArtifactOrProject)>>,
}

impl ProjectRecord {
    pub fn new(lang: Language, version: Option<Version>) -> Self {
        Self {
            lang,
            version,
            modules: None,
            exports: None,
            exclude: None,
        }
    }

    fn has_modules(&self) -> bool {
        self.modules.as_ref().is_some_and(|m| !m.is_empty())
    }

    /// Expand a module group into one `(artifact, record)` pair per module,
    /// each with `modules` cleared. A record without modules yields itself.
    pub fn flatten(&self, artifact: &ArtifactOrProject) -> Vec<(ArtifactOrProject, ProjectRecord)> {
        let bare = ProjectRecord {
            modules: None,
            ..self.clone()
        };
        match &self.modules {
            Some(mods) if !mods.is_empty() => mods
                .iter()
                .map(|m| (artifact.join(m), bare.clone()))
                .collect(),
            _ => vec![(artifact.clone(), bare)],
        }
    }

    /// Re-root this record one `-` segment higher: the record for `a-b`
    /// becomes a record for `a` with module `b` (existing modules are
    /// prefixed accordingly).
    pub fn with_module(&self, module: &Subproject) -> ProjectRecord {
        let modules = match &self.modules {
            Some(mods) if !mods.is_empty() => mods
                .iter()
                .map(|s| {
                    if s.is_empty() {
                        module.clone()
                    } else {
                        Subproject::new(format!("{module}-{s}"))
                    }
                })
                .collect(),
            _ => std::iter::once(module.clone()).collect(),
        };
        ProjectRecord {
            modules: Some(modules),
            ..self.clone()
        }
    }

    /// Fuse two records into one module group, when their identities agree.
    ///
    /// Succeeds iff `lang`, `exports` and `exclude` match and the versions
    /// are either both absent or equal. When exactly one side is a bare
    /// artifact, the empty subproject joins the merged module set to keep
    /// that bare member representable.
    pub fn combine_modules(&self, other: &ProjectRecord) -> Option<ProjectRecord> {
        if self.lang != other.lang
            || self.exports != other.exports
            || self.exclude != other.exclude
        {
            return None;
        }
        let version = match (&self.version, &other.version) {
            (None, None) => None,
            (Some(a), Some(b)) if a == b => Some(a.clone()),
            _ => return None,
        };
        let modules = match (self.has_modules(), other.has_modules()) {
            (false, false) => None,
            (true, false) => Some(with_sentinel(self.module_set())),
            (false, true) => Some(with_sentinel(other.module_set())),
            (true, true) => {
                let mut all = self.module_set();
                all.extend(other.module_set());
                Some(all)
            }
        };
        Some(ProjectRecord {
            lang: self.lang.clone(),
            version,
            modules,
            exports: self.exports.clone(),
            exclude: self.exclude.clone(),
        })
    }

    fn module_set(&self) -> BTreeSet<Subproject> {
        self.modules.clone().unwrap_or_default()
    }

    /// All versioned coordinates this record declares; empty when no version
    /// is declared.
    pub fn versioned_dependencies(
        &self,
        group: &MavenGroup,
        artifact: &ArtifactOrProject,
    ) -> Vec<MavenCoordinate> {
        let Some(version) = &self.version else {
            return Vec::new();
        };
        match &self.modules {
            Some(mods) if !mods.is_empty() => mods
                .iter()
                .map(|m| self.lang.maven_coord(group, artifact, Some(m), version))
                .collect(),
            _ => vec![self.lang.maven_coord(group, artifact, None, version)],
        }
    }

    /// All unversioned coordinates this record declares; never empty.
    pub fn all_dependencies(
        &self,
        group: &MavenGroup,
        artifact: &ArtifactOrProject,
    ) -> Vec<UnversionedCoordinate> {
        match &self.modules {
            Some(mods) if !mods.is_empty() => mods
                .iter()
                .map(|m| self.lang.unversioned(group, artifact, Some(m)))
                .collect(),
            _ => vec![self.lang.unversioned(group, artifact, None)],
        }
    }
}

fn with_sentinel(mut modules: BTreeSet<Subproject>) -> BTreeSet<Subproject> {
    modules.insert(Subproject::new(""));
    modules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: Option<&str>, modules: &[&str]) -> ProjectRecord {
        ProjectRecord {
            lang: Language::Java,
            version: version.map(Version::new),
            modules: if modules.is_empty() {
                None
            } else {
                Some(modules.iter().map(|m| Subproject::new(*m)).collect())
            },
            exports: None,
            exclude: None,
        }
    }

    #[test]
    fn flatten_without_modules_is_identity() {
        let rec = record(Some("1.0"), &[]);
        let flat = rec.flatten(&ArtifactOrProject::new("foo"));
        assert_eq!(flat, vec![(ArtifactOrProject::new("foo"), rec)]);
    }

    #[test]
    fn flatten_expands_each_module() {
        let rec = record(Some("1.0"), &["x", "y"]);
        let flat = rec.flatten(&ArtifactOrProject::new("bar"));
        let names: Vec<&str> = flat.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(names, vec!["bar-x", "bar-y"]);
        assert!(flat.iter().all(|(_, r)| r.modules.is_none()));
    }

    #[test]
    fn flatten_keeps_the_bare_artifact_for_the_empty_module() {
        let rec = record(Some("1.0"), &["", "x"]);
        let flat = rec.flatten(&ArtifactOrProject::new("bar"));
        let names: Vec<&str> = flat.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(names, vec!["bar", "bar-x"]);
    }

    #[test]
    fn flatten_then_remerge_restores_the_module_set() {
        let rec = record(Some("2.0"), &["x", "y"]);
        let ap = ArtifactOrProject::new("bar");
        let flat = rec.flatten(&ap);
        // Re-root each flattened artifact at "bar" and fuse them back.
        let remodulings: Vec<ProjectRecord> = flat
            .iter()
            .map(|(a, r)| {
                let (_, sub) = a
                    .split_subprojects()
                    .into_iter()
                    .find(|(stem, _)| stem == &ap)
                    .unwrap();
                r.with_module(&sub)
            })
            .collect();
        let merged = remodulings
            .into_iter()
            .reduce(|a, b| a.combine_modules(&b).unwrap())
            .unwrap();
        assert_eq!(merged, rec);
    }

    #[test]
    fn with_module_prefixes_existing_modules() {
        let rec = record(None, &["x", "y"]);
        let rerooted = rec.with_module(&Subproject::new("b"));
        let mods: Vec<&str> = rerooted
            .modules
            .as_ref()
            .unwrap()
            .iter()
            .map(|m| m.as_str())
            .collect();
        assert_eq!(mods, vec!["b-x", "b-y"]);
    }

    #[test]
    fn with_module_keeps_the_sentinel_bare() {
        let rec = record(None, &["", "x"]);
        let rerooted = rec.with_module(&Subproject::new("b"));
        let mods: Vec<&str> = rerooted
            .modules
            .as_ref()
            .unwrap()
            .iter()
            .map(|m| m.as_str())
            .collect();
        assert_eq!(mods, vec!["b", "b-x"]);
    }

    #[test]
    fn combine_modules_unions_both_sides() {
        let a = record(Some("2.0"), &["x", "y"]);
        let b = record(Some("2.0"), &["y", "z"]);
        let merged = a.combine_modules(&b).unwrap();
        let mods: Vec<&str> = merged
            .modules
            .as_ref()
            .unwrap()
            .iter()
            .map(|m| m.as_str())
            .collect();
        assert_eq!(mods, vec!["x", "y", "z"]);
    }

    #[test]
    fn combine_modules_adds_sentinel_for_one_sided_bare() {
        let bare = record(Some("2.0"), &[]);
        let grouped = record(Some("2.0"), &["x"]);
        let merged = bare.combine_modules(&grouped).unwrap();
        let mods: Vec<&str> = merged
            .modules
            .as_ref()
            .unwrap()
            .iter()
            .map(|m| m.as_str())
            .collect();
        assert_eq!(mods, vec!["", "x"]);
    }

    #[test]
    fn combine_modules_is_commutative_when_versions_agree() {
        let a = record(Some("2.0"), &["x"]);
        let b = record(Some("2.0"), &["y", "z"]);
        assert_eq!(a.combine_modules(&b), b.combine_modules(&a));
    }

    #[test]
    fn combine_modules_rejects_mismatches() {
        let a = record(Some("1.0"), &["x"]);
        let b = record(Some("2.0"), &["y"]);
        assert!(a.combine_modules(&b).is_none());

        let one_versioned = record(Some("1.0"), &[]);
        let unversioned = record(None, &[]);
        assert!(one_versioned.combine_modules(&unversioned).is_none());

        let mut scala = record(Some("1.0"), &["x"]);
        scala.lang = Language::default_scala();
        assert!(a.combine_modules(&scala).is_none());
    }

    #[test]
    fn versioned_dependencies_cover_each_module() {
        let mut rec = record(Some("1.0"), &["core", "extra"]);
        rec.lang = Language::default_scala();
        let coords = rec.versioned_dependencies(
            &MavenGroup::new("org.example"),
            &ArtifactOrProject::new("lib"),
        );
        let strings: Vec<String> = coords.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            strings,
            vec![
                "org.example:lib-core_2.11:1.0".to_string(),
                "org.example:lib-extra_2.11:1.0".to_string(),
            ]
        );
    }

    #[test]
    fn versioned_dependencies_empty_without_a_version() {
        let rec = record(None, &["x"]);
        assert!(rec
            .versioned_dependencies(&MavenGroup::new("g"), &ArtifactOrProject::new("a"))
            .is_empty());
        // The unversioned view is never empty.
        assert_eq!(
            rec.all_dependencies(&MavenGroup::new("g"), &ArtifactOrProject::new("a"))
                .len(),
            1
        );
    }
}
