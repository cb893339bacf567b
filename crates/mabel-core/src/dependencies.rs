//! The declared dependency map, its derived coordinate indices, and the
//! policy-driven merge.

use std::collections::{BTreeMap, BTreeSet};

use mabel_util::validated::Validated;

use crate::coordinate::{
    ArtifactOrProject, MavenArtifactId, MavenCoordinate, MavenGroup, UnversionedCoordinate,
};
use crate::language::Language;
use crate::options::VersionConflictPolicy;
use crate::record::ProjectRecord;
use crate::replacements::Replacements;
use crate::version::Version;

pub type DependencyMap = BTreeMap<MavenGroup, BTreeMap<ArtifactOrProject, ProjectRecord>>;

/// All dependency declarations of a model, group by group.
///
/// The derived indices are rebuilt whenever a value is constructed, so they
/// are always consistent with the map. The programmatic identity of a
/// `Dependencies` value is its flattened form: module groups and their
/// expanded encodings compare equal.
#[derive(Debug, Clone)]
pub struct Dependencies {
    map: DependencyMap,
    coord_to_proj: BTreeMap<MavenCoordinate, ProjectRecord>,
    unversioned_to_proj: BTreeMap<UnversionedCoordinate, ProjectRecord>,
}

impl Dependencies {
    pub fn new(map: DependencyMap) -> Self {
        let mut coord_to_proj = BTreeMap::new();
        let mut unversioned_to_proj = BTreeMap::new();
        for (group, artifacts) in &map {
            for (artifact, record) in artifacts {
                for coord in record.versioned_dependencies(group, artifact) {
                    coord_to_proj.insert(coord, record.clone());
                }
                for uv in record.all_dependencies(group, artifact) {
                    unversioned_to_proj.insert(uv, record.clone());
                }
            }
        }
        Self {
            map,
            coord_to_proj,
            unversioned_to_proj,
        }
    }

    pub fn empty() -> Self {
        Self::new(BTreeMap::new())
    }

    pub fn groups(&self) -> &DependencyMap {
        &self.map
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Every versioned coordinate declared by some record.
    pub fn roots(&self) -> BTreeSet<MavenCoordinate> {
        self.coord_to_proj.keys().cloned().collect()
    }

    /// Coordinates declared without a version: their version is decided by
    /// whatever the rest of the graph demands.
    pub fn unversioned_roots(&self) -> BTreeSet<UnversionedCoordinate> {
        self.unversioned_to_proj
            .iter()
            .filter(|(_, record)| record.version.is_none())
            .map(|(uv, _)| uv.clone())
            .collect()
    }

    /// The map with every module group expanded into independent records.
    /// Groups without any record are dropped.
    pub fn flattened(&self) -> DependencyMap {
        let mut flat: DependencyMap = BTreeMap::new();
        for (group, artifacts) in &self.map {
            if artifacts.is_empty() {
                continue;
            }
            let expanded = flat.entry(group.clone()).or_default();
            for (artifact, record) in artifacts {
                for (name, rec) in record.flatten(artifact) {
                    expanded.insert(name, rec);
                }
            }
        }
        flat
    }

    /// Merge two dependency maps under a version-conflict policy.
    ///
    /// Both sides are flattened first so module groups and their expanded
    /// encodings merge identically. Errors from every conflicting key are
    /// collected; a partial result is never returned.
    pub fn combine(
        policy: VersionConflictPolicy,
        a: &Dependencies,
        b: &Dependencies,
    ) -> Validated<Dependencies> {
        let left = a.flattened();
        let right = b.flattened();
        let mut merged: DependencyMap = BTreeMap::new();
        let mut errors = Vec::new();

        let group_keys: BTreeSet<&MavenGroup> = left.keys().chain(right.keys()).collect();
        for group in group_keys {
            let combined = match (left.get(group), right.get(group)) {
                (Some(l), None) => l.clone(),
                (None, Some(r)) => r.clone(),
                (Some(l), Some(r)) => {
                    let mut out = BTreeMap::new();
                    let artifact_keys: BTreeSet<&ArtifactOrProject> =
                        l.keys().chain(r.keys()).collect();
                    for artifact in artifact_keys {
                        match (l.get(artifact), r.get(artifact)) {
                            (Some(x), None) => {
                                out.insert(artifact.clone(), x.clone());
                            }
                            (None, Some(y)) => {
                                out.insert(artifact.clone(), y.clone());
                            }
                            (Some(x), Some(y)) => match merge_record(policy, x, y) {
                                Validated::Valid(record) => {
                                    out.insert(artifact.clone(), record);
                                }
                                Validated::Invalid(errs) => errors.extend(errs),
                            },
                            (None, None) => {
                                unreachable!("artifact key came from the union of both maps")
                            }
                        }
                    }
                    out
                }
                (None, None) => unreachable!("group key came from the union of both maps"),
            };
            merged.insert(group.clone(), combined);
        }

        if errors.is_empty() {
            Validated::valid(Dependencies::new(merged))
        } else {
            Validated::invalid_all(errors)
        }
    }

    /// The unique unversioned coordinate implied by the declared records for
    /// `artifact` under `group`, reading the name both as a bare artifact
    /// and as every `project-subproject` split. `None` unless exactly one
    /// candidate remains.
    pub fn unversioned_coordinates_of(
        &self,
        group: &MavenGroup,
        artifact: &ArtifactOrProject,
    ) -> Option<UnversionedCoordinate> {
        let artifacts = self.map.get(group)?;
        let mut candidates = BTreeSet::new();
        if let Some(record) = artifacts.get(artifact) {
            candidates.insert(record.lang.unversioned(group, artifact, None));
        }
        for (project, subproject) in artifact.split_subprojects() {
            if let Some(record) = artifacts.get(&project) {
                let declared = record
                    .modules
                    .as_ref()
                    .is_some_and(|mods| mods.contains(&subproject));
                if declared {
                    candidates.insert(record.lang.unversioned(group, &project, Some(&subproject)));
                }
            }
        }
        if candidates.len() == 1 {
            candidates.pop_first()
        } else {
            None
        }
    }

    /// Resolve the exports of the record at `uv` against the declared
    /// dependencies, falling back to replacements. The `Err` side lists the
    /// `(group, artifact)` pairs that resolved in neither source.
    #[allow(clippy::type_complexity)]
    pub fn exported_unversioned(
        &self,
        uv: &UnversionedCoordinate,
        replacements: &Replacements,
    ) -> Result<Vec<UnversionedCoordinate>, Vec<(MavenGroup, ArtifactOrProject)>> {
        let exports = self
            .unversioned_to_proj
            .get(uv)
            .and_then(|record| record.exports.clone())
            .unwrap_or_default();

        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();
        for (group, artifact) in &exports {
            match self
                .unversioned_coordinates_of(group, artifact)
                .or_else(|| replacements.unversioned_coordinates_of(group, artifact))
            {
                Some(coord) => resolved.push(coord),
                None => unresolved.push((group.clone(), artifact.clone())),
            }
        }
        if unresolved.is_empty() {
            Ok(resolved)
        } else {
            Err(unresolved)
        }
    }

    pub fn language_of(&self, uv: &UnversionedCoordinate) -> Option<&Language> {
        self.unversioned_to_proj.get(uv).map(|record| &record.lang)
    }

    /// The coordinates excluded by the record at `uv`. Pairs that do not
    /// resolve to a declared record keep their raw artifact name.
    pub fn excludes(&self, uv: &UnversionedCoordinate) -> BTreeSet<UnversionedCoordinate> {
        let excluded = self
            .unversioned_to_proj
            .get(uv)
            .and_then(|record| record.exclude.clone())
            .unwrap_or_default();
        excluded
            .iter()
            .map(|(group, artifact)| {
                self.unversioned_coordinates_of(group, artifact)
                    .unwrap_or_else(|| {
                        UnversionedCoordinate::new(
                            group.clone(),
                            MavenArtifactId::new(artifact.as_str()),
                        )
                    })
            })
            .collect()
    }
}

impl PartialEq for Dependencies {
    fn eq(&self, other: &Self) -> bool {
        self.flattened() == other.flattened()
    }
}

impl Eq for Dependencies {}

fn merge_record(
    policy: VersionConflictPolicy,
    left: &ProjectRecord,
    right: &ProjectRecord,
) -> Validated<ProjectRecord> {
    match (&left.version, &right.version) {
        (None, None) => Validated::valid(right.clone()),
        (Some(_), None) => Validated::valid(left.clone()),
        (None, Some(_)) => Validated::valid(right.clone()),
        (Some(lv), Some(rv)) if lv == rv => Validated::valid(right.clone()),
        (Some(lv), Some(rv)) => {
            let candidates: BTreeSet<Version> = [lv.clone(), rv.clone()].into_iter().collect();
            let left = left.clone();
            let right = right.clone();
            let rv = rv.clone();
            policy.resolve(None, &candidates).map(move |picked| {
                if picked == rv {
                    right
                } else {
                    left
                }
            })
        }
    }
}
