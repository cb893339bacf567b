//! Serde structs mirroring the on-disk YAML manifest.
//!
//! These stay dumb: every value is a string at this layer, and all
//! validation happens while converting into the core model.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub(crate) struct RawModel {
    #[serde(default)]
    pub options: Option<RawOptions>,

    #[serde(default)]
    pub dependencies: Option<BTreeMap<String, BTreeMap<String, RawProject>>>,

    #[serde(default)]
    pub replacements: Option<BTreeMap<String, BTreeMap<String, RawReplacement>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawOptions {
    #[serde(default)]
    pub version_conflict_policy: Option<String>,

    #[serde(default)]
    pub third_party_directory: Option<String>,

    #[serde(default)]
    pub languages: Option<Vec<String>>,

    #[serde(default)]
    pub resolvers: Option<Vec<RawResolver>>,

    #[serde(default)]
    pub transitivity: Option<String>,

    #[serde(default)]
    pub build_header: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawResolver {
    pub id: String,
    #[serde(rename = "type")]
    pub server_type: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawProject {
    pub lang: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub modules: Option<Vec<String>>,

    #[serde(default)]
    pub exports: Option<Vec<String>>,

    #[serde(default)]
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawReplacement {
    pub lang: String,
    pub target: String,
}
