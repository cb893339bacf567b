//! The top-level manifest model and the fold that merges several of them.

use mabel_util::errors::MabelError;
use mabel_util::validated::Validated;

use crate::dependencies::Dependencies;
use crate::options::Options;
use crate::replacements::Replacements;

/// One parsed dependency manifest: declarations, local replacements, and
/// global options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub dependencies: Dependencies,
    pub replacements: Option<Replacements>,
    pub options: Option<Options>,
}

impl Model {
    pub fn new(
        dependencies: Dependencies,
        replacements: Option<Replacements>,
        options: Option<Options>,
    ) -> Self {
        Self {
            dependencies,
            replacements,
            options,
        }
    }

    /// The effective options, with `Options::default()` standing in when the
    /// manifest declared none.
    pub fn options(&self) -> Options {
        self.options.clone().unwrap_or_default()
    }

    /// Merge two models. Options combine first, because the combined options
    /// decide the version-conflict policy the dependency merge runs under.
    /// Dependency and replacement errors accumulate across both combines.
    pub fn combine(a: &Model, b: &Model) -> Validated<Model> {
        let options = match (&a.options, &b.options) {
            (None, None) => None,
            (Some(x), None) => Some(x.clone()),
            (None, Some(y)) => Some(y.clone()),
            (Some(x), Some(y)) => Some(x.combine(y)),
        };
        let policy = options
            .as_ref()
            .map(Options::version_conflict_policy)
            .unwrap_or_default();

        let dependencies = Dependencies::combine(policy, &a.dependencies, &b.dependencies);
        let replacements = match (&a.replacements, &b.replacements) {
            (None, None) => Validated::valid(None),
            (Some(x), None) => Validated::valid(Some(x.clone())),
            (None, Some(y)) => Validated::valid(Some(y.clone())),
            (Some(x), Some(y)) => Replacements::combine(x, y).map(Some),
        };

        dependencies.map2(replacements, |dependencies, replacements| Model {
            dependencies,
            replacements,
            options,
        })
    }

    /// Left fold of `combine` over a non-empty sequence. Within one pairwise
    /// combine all errors are collected; the fold itself stops at the first
    /// failing pair.
    pub fn combine_all(
        head: Model,
        tail: impl IntoIterator<Item = Model>,
    ) -> Result<Model, Vec<MabelError>> {
        let mut acc = head;
        for next in tail {
            acc = Model::combine(&acc, &next).into_result()?;
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::coordinate::{ArtifactOrProject, MavenGroup};
    use crate::dependencies::DependencyMap;
    use crate::language::Language;
    use crate::options::VersionConflictPolicy;
    use crate::record::ProjectRecord;
    use crate::replacements::{BazelTarget, ReplacementMap, ReplacementRecord};
    use crate::version::Version;

    fn model_with(group: &str, artifact: &str, version: &str, options: Option<Options>) -> Model {
        let mut map: DependencyMap = BTreeMap::new();
        map.entry(MavenGroup::new(group)).or_default().insert(
            ArtifactOrProject::new(artifact),
            ProjectRecord::new(Language::Java, Some(Version::new(version))),
        );
        Model::new(Dependencies::new(map), None, options)
    }

    fn replacement_model(group: &str, artifact: &str, target: &str) -> Model {
        let mut map: ReplacementMap = BTreeMap::new();
        map.entry(MavenGroup::new(group)).or_default().insert(
            ArtifactOrProject::new(artifact),
            ReplacementRecord {
                lang: Language::Java,
                target: BazelTarget::new(target),
            },
        );
        Model::new(
            Dependencies::empty(),
            Some(Replacements::new(map)),
            None,
        )
    }

    #[test]
    fn highest_policy_keeps_the_newer_version() {
        let a = model_with("org.example", "foo", "1.0", None);
        let b = model_with("org.example", "foo", "1.1", None);
        let merged = Model::combine(&a, &b).into_result().unwrap();
        let roots: Vec<String> = merged
            .dependencies
            .roots()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(roots, vec!["org.example:foo:1.1".to_string()]);
    }

    #[test]
    fn fail_policy_from_either_side_governs_the_merge() {
        let strict = Options {
            version_conflict_policy: Some(VersionConflictPolicy::Fail),
            ..Options::default()
        };
        let a = model_with("org.example", "foo", "1.0", Some(strict));
        let b = model_with("org.example", "foo", "1.1", None);
        let errs = Model::combine(&a, &b).into_result().unwrap_err();
        assert_eq!(errs.len(), 1);
        let msg = errs[0].to_string();
        assert!(msg.contains("1.0") && msg.contains("1.1"));
    }

    #[test]
    fn replacement_collisions_surface_alongside_dependency_errors() {
        let strict = Options {
            version_conflict_policy: Some(VersionConflictPolicy::Fail),
            ..Options::default()
        };
        let mut a = model_with("org.example", "foo", "1.0", Some(strict));
        a.replacements = replacement_model("com.g", "bar", "//repo:bar").replacements;
        let mut b = model_with("org.example", "foo", "1.1", None);
        b.replacements = replacement_model("com.g", "bar", "//other:bar").replacements;

        let errs = Model::combine(&a, &b).into_result().unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().any(|e| e.to_string().contains("in replacements combine")));
    }

    #[test]
    fn replacement_conflict_is_a_single_error() {
        let a = replacement_model("com.g", "bar", "//repo:bar");
        let b = replacement_model("com.g", "bar", "//other:bar");
        let errs = Model::combine(&a, &b).into_result().unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].to_string().contains("//repo:bar"));
        assert!(errs[0].to_string().contains("//other:bar"));
    }

    #[test]
    fn combine_all_folds_left_to_right() {
        let merged = Model::combine_all(
            model_with("org.example", "foo", "1.0", None),
            vec![
                model_with("org.example", "foo", "1.1", None),
                model_with("org.example", "foo", "1.0.1", None),
            ],
        )
        .unwrap();
        let roots: Vec<String> = merged
            .dependencies
            .roots()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(roots, vec!["org.example:foo:1.1".to_string()]);
    }

    #[test]
    fn combine_all_stops_at_the_first_failing_pair() {
        let strict = Options {
            version_conflict_policy: Some(VersionConflictPolicy::Fail),
            ..Options::default()
        };
        let result = Model::combine_all(
            model_with("org.example", "foo", "1.0", Some(strict)),
            vec![
                model_with("org.example", "foo", "1.1", None),
                model_with("org.example", "foo", "1.2", None),
            ],
        );
        let errs = result.unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].to_string().contains("1.1"));
        assert!(!errs[0].to_string().contains("1.2"));
    }
}
