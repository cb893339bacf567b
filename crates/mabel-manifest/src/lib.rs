//! YAML manifest front-end: decodes a dependencies document and converts it,
//! with validation, into a [`mabel_core::model::Model`].

mod de;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use mabel_core::coordinate::{ArtifactOrProject, MavenGroup, Subproject};
use mabel_core::dependencies::{Dependencies, DependencyMap};
use mabel_core::language::Language;
use mabel_core::model::Model;
use mabel_core::options::{
    DirectoryName, MavenServer, Options, Transitivity, VersionConflictPolicy,
};
use mabel_core::record::ProjectRecord;
use mabel_core::replacements::{BazelTarget, ReplacementMap, ReplacementRecord, Replacements};
use mabel_core::version::Version;
use mabel_util::errors::{MabelError, MabelResult};

use crate::de::{RawModel, RawOptions, RawProject, RawReplacement};

/// Parse a dependencies YAML document into a model.
pub fn parse_model(content: &str) -> MabelResult<Model> {
    let raw: RawModel = serde_yaml::from_str(content).map_err(|e| MabelError::Manifest {
        message: format!("Failed to parse dependencies YAML: {e}"),
    })?;

    let options = raw.options.map(convert_options).transpose()?;
    // Record languages name only "scala"; the version comes from the
    // effective options languages.
    let scala_version = scala_version_of(options.as_ref());

    let dependencies = match raw.dependencies {
        None => Dependencies::empty(),
        Some(groups) => {
            let mut map: DependencyMap = BTreeMap::new();
            for (group, artifacts) in groups {
                let converted = map.entry(MavenGroup::new(group)).or_default();
                for (artifact, project) in artifacts {
                    converted.insert(
                        ArtifactOrProject::new(artifact),
                        convert_project(project, &scala_version)?,
                    );
                }
            }
            Dependencies::new(map)
        }
    };

    let replacements = match raw.replacements {
        None => None,
        Some(groups) => {
            let mut map: ReplacementMap = BTreeMap::new();
            for (group, artifacts) in groups {
                let converted = map.entry(MavenGroup::new(group)).or_default();
                for (artifact, replacement) in artifacts {
                    converted.insert(
                        ArtifactOrProject::new(artifact),
                        convert_replacement(replacement, &scala_version)?,
                    );
                }
            }
            Some(Replacements::new(map))
        }
    };

    Ok(Model::new(dependencies, replacements, options))
}

/// Read and parse a dependencies YAML file.
pub fn load_model(path: &Path) -> MabelResult<Model> {
    let content = std::fs::read_to_string(path).map_err(|e| MabelError::Manifest {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    parse_model(&content)
}

fn convert_options(raw: RawOptions) -> MabelResult<Options> {
    let version_conflict_policy = raw
        .version_conflict_policy
        .map(|s| parse_policy(&s))
        .transpose()?;
    let transitivity = raw.transitivity.map(|s| parse_transitivity(&s)).transpose()?;
    let languages = nonempty(raw.languages)
        .map(|langs| {
            langs
                .iter()
                .map(|s| parse_options_language(s))
                .collect::<Result<BTreeSet<Language>, MabelError>>()
        })
        .transpose()?;
    let resolvers = raw.resolvers.filter(|r| !r.is_empty()).map(|resolvers| {
        resolvers
            .into_iter()
            .map(|r| MavenServer::new(r.id, r.server_type, r.url))
            .collect()
    });

    Ok(Options {
        version_conflict_policy,
        third_party_directory: raw.third_party_directory.map(DirectoryName::new),
        languages,
        resolvers,
        transitivity,
        build_header: nonempty(raw.build_header),
    })
}

fn convert_project(raw: RawProject, scala_version: &Version) -> MabelResult<ProjectRecord> {
    let lang = parse_record_language(&raw.lang, scala_version)?;
    let modules: Option<BTreeSet<Subproject>> = nonempty(raw.modules)
        .map(|mods| mods.into_iter().map(Subproject::new).collect());
    let exports = nonempty(raw.exports).map(|e| parse_pairs(&e)).transpose()?;
    let exclude = nonempty(raw.exclude).map(|e| parse_pairs(&e)).transpose()?;

    Ok(ProjectRecord {
        lang,
        version: raw.version.map(Version::new),
        modules,
        exports,
        exclude,
    })
}

fn convert_replacement(
    raw: RawReplacement,
    scala_version: &Version,
) -> MabelResult<ReplacementRecord> {
    Ok(ReplacementRecord {
        lang: parse_record_language(&raw.lang, scala_version)?,
        target: BazelTarget::new(raw.target),
    })
}

fn scala_version_of(options: Option<&Options>) -> Version {
    options
        .map(|o| o.languages())
        .unwrap_or_else(|| Options::default().languages())
        .iter()
        .find_map(|lang| match lang {
            Language::Scala(scala) => Some(scala.version().clone()),
            Language::Java => None,
        })
        .unwrap_or_else(|| Version::new("2.11.11"))
}

fn parse_policy(s: &str) -> Result<VersionConflictPolicy, MabelError> {
    match s {
        "highest" => Ok(VersionConflictPolicy::Highest),
        "fixed" => Ok(VersionConflictPolicy::Fixed),
        "fail" => Ok(VersionConflictPolicy::Fail),
        other => Err(MabelError::Manifest {
            message: format!("unknown versionConflictPolicy: {other}"),
        }),
    }
}

fn parse_transitivity(s: &str) -> Result<Transitivity, MabelError> {
    match s {
        "runtime_deps" => Ok(Transitivity::RuntimeDeps),
        "exports" => Ok(Transitivity::Exports),
        other => Err(MabelError::Manifest {
            message: format!("unknown transitivity: {other}"),
        }),
    }
}

/// Languages in the options list carry their full version:
/// `scala:2.11.11`, `scala/unmangled:2.11.11`, or plain `java`.
fn parse_options_language(s: &str) -> Result<Language, MabelError> {
    match s {
        "java" => Ok(Language::Java),
        "scala" => Ok(Language::default_scala()),
        other => {
            if let Some(version) = other.strip_prefix("scala:") {
                Language::scala(Version::new(version), true)
            } else if let Some(version) = other.strip_prefix("scala/unmangled:") {
                Language::scala(Version::new(version), false)
            } else {
                Err(MabelError::Manifest {
                    message: format!("unknown language: {other}"),
                })
            }
        }
    }
}

/// Record languages name the flavor only; the Scala version is the one the
/// options declare.
fn parse_record_language(s: &str, scala_version: &Version) -> Result<Language, MabelError> {
    match s {
        "java" => Ok(Language::Java),
        "scala" => Language::scala(scala_version.clone(), true),
        "scala/unmangled" => Language::scala(scala_version.clone(), false),
        other => Err(MabelError::Manifest {
            message: format!("unknown language: {other}"),
        }),
    }
}

fn parse_pairs(entries: &[String]) -> Result<BTreeSet<(MavenGroup, ArtifactOrProject)>, MabelError> {
    entries
        .iter()
        .map(|entry| match entry.split(':').collect::<Vec<_>>()[..] {
            [group, artifact] => Ok((MavenGroup::new(group), ArtifactOrProject::new(artifact))),
            _ => Err(MabelError::Manifest {
                message: format!("expected group:artifact, got {entry}"),
            }),
        })
        .collect()
}

fn nonempty(list: Option<Vec<String>>) -> Option<Vec<String>> {
    list.filter(|items| !items.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_document() {
        let doc = r#"
options:
  versionConflictPolicy: "fail"
  thirdPartyDirectory: "3rdparty/jvm"
  languages: [ "java", "scala:2.11.11" ]
  transitivity: "exports"

dependencies:
  com.example:
    foo:
      lang: "java"
      version: "1.0"
    widgets:
      lang: "scala"
      version: "2.1"
      modules: [ "api", "impl" ]
      exports: [ "com.example:foo" ]

replacements:
  org.scala-lang:
    scala-library:
      lang: "scala/unmangled"
      target: "@scala//:library"
"#;
        let model = parse_model(doc).unwrap();
        assert_eq!(
            model.options().version_conflict_policy(),
            VersionConflictPolicy::Fail
        );

        let roots: Vec<String> = model
            .dependencies
            .roots()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(
            roots,
            vec![
                "com.example:foo:1.0".to_string(),
                "com.example:widgets-api_2.11:2.1".to_string(),
                "com.example:widgets-impl_2.11:2.1".to_string(),
            ]
        );

        let replacements = model.replacements.unwrap();
        let uv = replacements
            .unversioned_coordinates_of(
                &MavenGroup::new("org.scala-lang"),
                &ArtifactOrProject::new("scala-library"),
            )
            .unwrap();
        assert_eq!(uv.to_string(), "org.scala-lang:scala-library");
    }

    #[test]
    fn record_scala_version_follows_the_options() {
        let doc = r#"
options:
  languages: [ "scala:2.12.4" ]

dependencies:
  org.typelevel:
    cats-core:
      lang: "scala"
      version: "1.0.1"
"#;
        let model = parse_model(doc).unwrap();
        let roots: Vec<String> = model
            .dependencies
            .roots()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(roots, vec!["org.typelevel:cats-core_2.12:1.0.1".to_string()]);
    }

    #[test]
    fn rejects_unknown_policies_and_languages() {
        assert!(parse_model("options:\n  versionConflictPolicy: \"loudest\"\n").is_err());
        let doc = "dependencies:\n  g:\n    a:\n      lang: \"fortran\"\n";
        assert!(parse_model(doc).is_err());
    }

    #[test]
    fn rejects_unsupported_scala_versions() {
        let doc = "options:\n  languages: [ \"scala:2.9.3\" ]\n";
        let err = parse_model(doc).unwrap_err();
        assert!(err.to_string().contains("unsupported scala version"));
    }

    #[test]
    fn rejects_malformed_export_pairs() {
        let doc = "dependencies:\n  g:\n    a:\n      lang: \"java\"\n      exports: [ \"justonename\" ]\n";
        let err = parse_model(doc).unwrap_err();
        assert!(err.to_string().contains("expected group:artifact"));
    }

    #[test]
    fn empty_module_lists_normalize_to_absent() {
        let doc = "dependencies:\n  g:\n    a:\n      lang: \"java\"\n      modules: []\n";
        let model = parse_model(doc).unwrap();
        let record = &model.dependencies.groups()[&MavenGroup::new("g")]
            [&ArtifactOrProject::new("a")];
        assert!(record.modules.is_none());
    }

    #[test]
    fn missing_sections_stay_absent() {
        let model = parse_model("dependencies: {}\n").unwrap();
        assert!(model.dependencies.is_empty());
        assert!(model.replacements.is_none());
        assert!(model.options.is_none());
    }
}
