//! Canonical rendering of a model as a deterministic YAML document.
//!
//! The output is stable across runs and across equivalent encodings of the
//! same declarations: groups and artifacts are sorted, module groups are
//! re-fused from the flattened form, and record fields appear in field-name
//! order. Fixtures and round-trip tests depend on this byte layout.

use crate::coordinate::ArtifactOrProject;
use crate::dependencies::Dependencies;
use crate::model::Model;
use crate::options::Options;
use crate::record::ProjectRecord;
use crate::replacements::Replacements;

impl Model {
    /// Render the canonical YAML document for this model.
    pub fn to_string_pretty(&self) -> String {
        let mut sections = Vec::new();
        if let Some(options) = &self.options {
            sections.push(render_options(options));
        }
        sections.push(render_dependencies(&self.dependencies));
        if let Some(replacements) = &self.replacements {
            sections.push(render_replacements(replacements));
        }
        // Two blank lines between top-level sections.
        format!("{}\n", sections.join("\n\n\n"))
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn inline_list(items: impl IntoIterator<Item = String>) -> String {
    let quoted: Vec<String> = items.into_iter().map(|s| quote(&s)).collect();
    format!("[ {} ]", quoted.join(", "))
}

fn render_options(options: &Options) -> String {
    let mut lines = vec!["options:".to_string()];
    if let Some(header) = &options.build_header {
        lines.push("  buildHeader:".to_string());
        for entry in header {
            lines.push(format!("    - {}", quote(entry)));
        }
    }
    if let Some(languages) = &options.languages {
        lines.push(format!(
            "  languages: {}",
            inline_list(languages.iter().map(|l| l.as_options_string()))
        ));
    }
    if let Some(resolvers) = &options.resolvers {
        lines.push("  resolvers:".to_string());
        for server in resolvers {
            lines.push(format!("    - id: {}", quote(&server.id)));
            lines.push(format!("      type: {}", quote(&server.server_type)));
            lines.push(format!("      url: {}", quote(&server.url)));
        }
    }
    if let Some(dir) = &options.third_party_directory {
        lines.push(format!("  thirdPartyDirectory: {}", quote(dir.as_str())));
    }
    if let Some(transitivity) = &options.transitivity {
        lines.push(format!("  transitivity: {}", quote(&transitivity.to_string())));
    }
    if let Some(policy) = &options.version_conflict_policy {
        lines.push(format!(
            "  versionConflictPolicy: {}",
            quote(&policy.to_string())
        ));
    }
    lines.join("\n")
}

fn render_dependencies(dependencies: &Dependencies) -> String {
    let flat = dependencies.flattened();
    if flat.is_empty() {
        return "dependencies: {}".to_string();
    }
    let mut groups = Vec::new();
    for (group, artifacts) in &flat {
        let entries: Vec<(ArtifactOrProject, ProjectRecord)> = artifacts
            .iter()
            .map(|(a, r)| (a.clone(), r.clone()))
            .collect();
        let mut lines = vec![format!("  {group}:")];
        for (artifact, record) in fuse_adjacent(entries) {
            lines.push(format!("    {artifact}:"));
            lines.extend(render_record(&record));
        }
        groups.push(lines.join("\n"));
    }
    // One blank line between groups.
    format!("dependencies:\n{}", groups.join("\n\n"))
}

fn render_record(record: &ProjectRecord) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(exclude) = &record.exclude {
        if !exclude.is_empty() {
            lines.push(format!(
                "      exclude: {}",
                inline_list(exclude.iter().map(|(g, a)| format!("{g}:{a}")))
            ));
        }
    }
    if let Some(exports) = &record.exports {
        if !exports.is_empty() {
            lines.push(format!(
                "      exports: {}",
                inline_list(exports.iter().map(|(g, a)| format!("{g}:{a}")))
            ));
        }
    }
    lines.push(format!("      lang: {}", quote(&record.lang.to_string())));
    if let Some(modules) = &record.modules {
        if !modules.is_empty() {
            lines.push(format!(
                "      modules: {}",
                inline_list(modules.iter().map(|m| m.to_string()))
            ));
        }
    }
    if let Some(version) = &record.version {
        lines.push(format!("      version: {}", quote(version.as_str())));
    }
    lines
}

fn render_replacements(replacements: &Replacements) -> String {
    let mut groups = Vec::new();
    for (group, artifacts) in replacements.groups() {
        if artifacts.is_empty() {
            continue;
        }
        let mut lines = vec![format!("  {group}:")];
        for (artifact, record) in artifacts {
            lines.push(format!("    {artifact}:"));
            lines.push(format!("      lang: {}", quote(&record.lang.to_string())));
            lines.push(format!("      target: {}", quote(record.target.as_str())));
        }
        groups.push(lines.join("\n"));
    }
    if groups.is_empty() {
        return "replacements: {}".to_string();
    }
    format!("replacements:\n{}", groups.join("\n\n"))
}

/// Fuse sorted adjacent artifacts back into module groups.
///
/// Each pair of neighbors is re-rooted at every shared stem (the artifact
/// itself, plus each `project-subproject` split) and the longest stem whose
/// `combine_modules` succeeds wins. A fuse is rejected when the entry kept
/// before the fuse target already carries the same stem, which would
/// otherwise re-fuse across a boundary a failed merge established.
fn fuse_adjacent(
    entries: Vec<(ArtifactOrProject, ProjectRecord)>,
) -> Vec<(ArtifactOrProject, ProjectRecord)> {
    let mut kept: Vec<(ArtifactOrProject, ProjectRecord)> = Vec::new();
    for entry in entries {
        if let Some(last) = kept.last() {
            if let Some((stem, merged)) = merge_entries(last, &entry) {
                let prior_shares_stem = kept.len() >= 2 && kept[kept.len() - 2].0 == stem;
                if !prior_shares_stem {
                    kept.pop();
                    kept.push((stem, merged));
                    continue;
                }
            }
        }
        kept.push(entry);
    }
    kept
}

fn merge_entries(
    left: &(ArtifactOrProject, ProjectRecord),
    right: &(ArtifactOrProject, ProjectRecord),
) -> Option<(ArtifactOrProject, ProjectRecord)> {
    let mut best: Option<(ArtifactOrProject, ProjectRecord)> = None;
    for (left_stem, left_record) in remodulings(left) {
        for (right_stem, right_record) in remodulings(right) {
            if left_stem != right_stem {
                continue;
            }
            if let Some(merged) = left_record.combine_modules(&right_record) {
                let longer = best
                    .as_ref()
                    .is_none_or(|(stem, _)| left_stem.as_str().len() > stem.as_str().len());
                if longer {
                    best = Some((left_stem.clone(), merged));
                }
            }
        }
    }
    best
}

/// The candidate `(stem, record)` readings of one entry: unchanged, plus one
/// per subproject split with the suffix pushed into the module set.
fn remodulings(
    entry: &(ArtifactOrProject, ProjectRecord),
) -> Vec<(ArtifactOrProject, ProjectRecord)> {
    let (artifact, record) = entry;
    let mut out = vec![(artifact.clone(), record.clone())];
    for (stem, subproject) in artifact.split_subprojects() {
        out.push((stem, record.with_module(&subproject)));
    }
    out
}
