//! The in-progress cache configuration (draft).
//!
//! A draft is an insertion-ordered settings tree plus the set of enabled
//! features and a little metadata. Drafts are plain values: the builder
//! methods here return a new draft, and the only in-place writes go through
//! [`crate::application::ConfigurationStore`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{AppError, Result};
use super::feature::FeatureDefinition;

/// A dot-separated address into the settings tree, e.g. `indexing.enabled`.
///
/// Every segment must be usable as a markup element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SettingPath {
    segments: Vec<String>,
}

impl SettingPath {
    /// Path segments from the root downwards.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether `self` equals `other` or addresses one of its ancestors.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Whether `self` and `other` address overlapping sub-trees.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }
}

impl FromStr for SettingPath {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_path(s, "path is empty"));
        }

        let segments: Vec<String> = trimmed.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(AppError::invalid_path(s, "empty segment"));
        }
        if let Some(segment) = segments.iter().find(|segment| !is_element_name(segment)) {
            return Err(AppError::invalid_path(
                s,
                format!("'{segment}' is not a valid element name"),
            ));
        }

        Ok(Self { segments })
    }
}

impl TryFrom<String> for SettingPath {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SettingPath> for String {
    fn from(path: SettingPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for SettingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// A single `PATH=VALUE` assignment as typed on the command line.
///
/// The value is read as JSON when it parses (`true`, `3`, `{"a":1}`,
/// `null`), and as a plain string otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingAssignment {
    pub path: SettingPath,
    pub value: Value,
}

impl FromStr for SettingAssignment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let (path, raw) = s.split_once('=').ok_or_else(|| AppError::InvalidData {
            message: format!("Expected PATH=VALUE, got '{s}'"),
        })?;

        let path = path.parse()?;
        let value = parse_setting_value(raw.trim());
        check_value_keys(&value)?;

        Ok(Self { path, value })
    }
}

/// Reads a raw setting value, falling back to a string.
#[must_use]
pub fn parse_setting_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Whether `key` can be written as a markup element name: a letter or `_`,
/// then letters, digits, `-` or `_`.
#[must_use]
pub fn is_element_name(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Rejects object keys anywhere inside `value` that are not element names.
///
/// # Errors
/// Returns `InvalidData` naming the first offending key.
pub fn check_value_keys(value: &Value) -> Result<()> {
    match value {
        Value::Object(map) => check_keys(map),
        Value::Array(items) => items.iter().try_for_each(check_value_keys),
        _ => Ok(()),
    }
}

fn check_keys(map: &Map<String, Value>) -> Result<()> {
    for (key, value) in map {
        if !is_element_name(key) {
            return Err(AppError::InvalidData {
                message: format!("Setting key '{key}' is not a valid element name"),
            });
        }
        check_value_keys(value)?;
    }
    Ok(())
}

/// Descriptive metadata carried alongside the settings tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftMetadata {
    /// Name of the cache being created.
    #[serde(default)]
    pub cache_name: Option<String>,
    /// Template the cache is based on.
    #[serde(default)]
    pub template: Option<String>,
    /// Cache container the cache will live in.
    #[serde(default)]
    pub container: Option<String>,
}

/// The in-progress cache configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDraft {
    #[serde(default)]
    settings: Map<String, Value>,
    #[serde(default)]
    features: BTreeSet<String>,
    #[serde(default)]
    metadata: DraftMetadata,
    /// Per enabled feature, depth of the first root parent it had to create.
    #[serde(skip)]
    created_parents: BTreeMap<String, usize>,
}

impl ConfigurationDraft {
    /// Create an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The settings tree, in insertion order.
    #[must_use]
    pub const fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    /// Enabled feature identifiers, sorted.
    #[must_use]
    pub const fn features(&self) -> &BTreeSet<String> {
        &self.features
    }

    #[must_use]
    pub const fn metadata(&self) -> &DraftMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn is_feature_enabled(&self, feature_id: &str) -> bool {
        self.features.contains(feature_id)
    }

    /// True when the draft has neither settings nor features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty() && self.features.is_empty()
    }

    /// Look up the value at `path`.
    #[must_use]
    pub fn get(&self, path: &SettingPath) -> Option<&Value> {
        let (last, parents) = path.segments.split_last()?;
        let mut map = &self.settings;
        for segment in parents {
            map = map.get(segment)?.as_object()?;
        }
        map.get(last)
    }

    /// Return a copy with `value` written at `path`.
    ///
    /// Missing parents are created; a scalar sitting where a parent is
    /// needed is replaced by an object. An existing key keeps its position.
    #[must_use]
    pub fn with_setting(mut self, path: &SettingPath, value: Value) -> Self {
        insert_at(&mut self.settings, path.segments(), value);
        self
    }

    /// Return a copy with the value at `path` removed.
    ///
    /// Parent objects left empty are removed too.
    #[must_use]
    pub fn without_setting(mut self, path: &SettingPath) -> Self {
        remove_at(&mut self.settings, path.segments(), 0);
        self
    }

    /// Check that every settings key can be written as a markup element.
    ///
    /// # Errors
    /// Returns `InvalidData` naming the first offending key.
    pub fn check_keys(&self) -> Result<()> {
        check_keys(&self.settings)
    }

    /// Return a copy carrying `metadata`.
    #[must_use]
    pub fn with_metadata(mut self, metadata: DraftMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Enable `feature` and materialize its default sub-tree.
    ///
    /// Returns false when the feature was already enabled.
    ///
    /// # Errors
    /// Returns `InvalidData` when a non-object value sits on the root's
    /// parent path. The draft is left unchanged.
    pub(crate) fn materialize_feature(&mut self, feature: &FeatureDefinition) -> Result<bool> {
        if self.features.contains(&feature.id) {
            return Ok(false);
        }

        let created_from = missing_parent_depth(&self.settings, feature.root.segments())?;
        if self.get(&feature.root).is_none() {
            insert_at(
                &mut self.settings,
                feature.root.segments(),
                feature.defaults.clone(),
            );
            if let Some(depth) = created_from {
                self.created_parents.insert(feature.id.clone(), depth);
            }
        }
        self.features.insert(feature.id.clone());
        Ok(true)
    }

    /// Disable `feature` and delete its whole sub-tree.
    ///
    /// Only parents created by [`Self::materialize_feature`] are pruned.
    /// Returns false when the feature was not enabled.
    pub(crate) fn drop_feature(&mut self, feature: &FeatureDefinition) -> bool {
        if !self.features.remove(&feature.id) {
            return false;
        }
        let prune_from = self
            .created_parents
            .remove(&feature.id)
            .unwrap_or(usize::MAX);
        remove_at(&mut self.settings, feature.root.segments(), prune_from);
        true
    }
}

/// Depth of the first parent of `segments` that is missing, if any.
fn missing_parent_depth(map: &Map<String, Value>, segments: &[String]) -> Result<Option<usize>> {
    let Some((_, parents)) = segments.split_last() else {
        return Ok(None);
    };

    let mut map = map;
    for (depth, segment) in parents.iter().enumerate() {
        match map.get(segment) {
            None => return Ok(Some(depth)),
            Some(Value::Object(child)) => map = child,
            Some(_) => {
                return Err(AppError::InvalidData {
                    message: format!(
                        "'{}' holds a value, not a group of settings",
                        parents[..=depth].join(".")
                    ),
                });
            }
        }
    }
    Ok(None)
}

fn insert_at(map: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        map.insert(first.clone(), value);
        return;
    }

    let child = map
        .entry(first.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    if let Value::Object(child_map) = child {
        insert_at(child_map, rest, value);
    }
}

/// Removes the value at `segments`. Parents at depth `prune_from` or deeper
/// are removed as well once left empty.
fn remove_at(map: &mut Map<String, Value>, segments: &[String], prune_from: usize) -> Option<Value> {
    let (first, rest) = segments.split_first()?;

    if rest.is_empty() {
        return map.shift_remove(first);
    }

    let child_map = map.get_mut(first)?.as_object_mut()?;
    let removed = remove_at(child_map, rest, prune_from.saturating_sub(1));
    if removed.is_some() && prune_from == 0 && child_map.is_empty() {
        map.shift_remove(first);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> SettingPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_setting_path_parse() {
        let p = path("indexing.enabled");
        assert_eq!(p.segments(), ["indexing", "enabled"]);
        assert_eq!(p.to_string(), "indexing.enabled");
    }

    #[test]
    fn test_setting_path_rejects_empty_segments() {
        assert!("".parse::<SettingPath>().is_err());
        assert!("a..b".parse::<SettingPath>().is_err());
        assert!(".a".parse::<SettingPath>().is_err());
    }

    #[test]
    fn test_setting_path_rejects_non_element_names() {
        assert!("max size".parse::<SettingPath>().is_err());
        assert!("memory.a<b".parse::<SettingPath>().is_err());
        assert!("1st".parse::<SettingPath>().is_err());
        assert!(matches!(
            "cache.x/y".parse::<SettingPath>(),
            Err(AppError::InvalidPath { .. })
        ));

        assert!("encoding.media-type".parse::<SettingPath>().is_ok());
        assert!("_internal.v2".parse::<SettingPath>().is_ok());
    }

    #[test]
    fn test_setting_path_overlap() {
        assert!(path("a").overlaps(&path("a.b")));
        assert!(path("a.b").overlaps(&path("a")));
        assert!(!path("a.b").overlaps(&path("a.c")));
        assert!(!path("ab").overlaps(&path("a")));
    }

    #[test]
    fn test_assignment_parse() {
        let a: SettingAssignment = "indexing.enabled=true".parse().unwrap();
        assert_eq!(a.path, path("indexing.enabled"));
        assert_eq!(a.value, json!(true));

        let a: SettingAssignment = "memory.max-size=200MB".parse().unwrap();
        assert_eq!(a.value, json!("200MB"));

        assert!("no-equals".parse::<SettingAssignment>().is_err());
        assert!(r#"memory={"max size":1}"#.parse::<SettingAssignment>().is_err());
        assert!(r#"stores=[{"a>b":1}]"#.parse::<SettingAssignment>().is_err());
    }

    #[test]
    fn test_check_keys() {
        let draft: ConfigurationDraft =
            serde_json::from_str(r#"{"settings":{"memory":{"max-count":5}}}"#).unwrap();
        assert!(draft.check_keys().is_ok());

        let draft: ConfigurationDraft =
            serde_json::from_str(r#"{"settings":{"memory":{"</memory>":5}}}"#).unwrap();
        assert!(matches!(
            draft.check_keys(),
            Err(AppError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_drop_feature_prunes_only_created_parents() {
        let feature = FeatureDefinition::new("c", json!(1))
            .unwrap()
            .with_root(path("a.b.c"));
        let base = ConfigurationDraft::new().with_setting(&path("a"), json!({}));

        let mut draft = base.clone();
        assert!(draft.materialize_feature(&feature).unwrap());
        assert_eq!(
            serde_json::to_string(draft.settings()).unwrap(),
            r#"{"a":{"b":{"c":1}}}"#
        );

        assert!(draft.drop_feature(&feature));
        assert_eq!(draft, base);
    }

    #[test]
    fn test_materialize_refuses_scalar_parent() {
        let feature = FeatureDefinition::new("c", json!(1))
            .unwrap()
            .with_root(path("a.b.c"));
        let base = ConfigurationDraft::new().with_setting(&path("a.b"), json!("fixed"));

        let mut draft = base.clone();
        assert!(matches!(
            draft.materialize_feature(&feature),
            Err(AppError::InvalidData { .. })
        ));
        assert_eq!(draft, base);
        assert!(!draft.is_feature_enabled("c"));
    }

    #[test]
    fn test_with_setting_creates_parents() {
        let draft = ConfigurationDraft::new().with_setting(&path("a.b.c"), json!(1));
        assert_eq!(draft.get(&path("a.b.c")), Some(&json!(1)));
        assert_eq!(
            serde_json::to_string(draft.settings()).unwrap(),
            r#"{"a":{"b":{"c":1}}}"#
        );
    }

    #[test]
    fn test_with_setting_updates_in_place() {
        let draft = ConfigurationDraft::new()
            .with_setting(&path("first"), json!(1))
            .with_setting(&path("second"), json!(2))
            .with_setting(&path("first"), json!(3));

        let keys: Vec<&String> = draft.settings().keys().collect();
        assert_eq!(keys, ["first", "second"]);
        assert_eq!(draft.get(&path("first")), Some(&json!(3)));
    }

    #[test]
    fn test_without_setting_prunes_empty_parents() {
        let draft = ConfigurationDraft::new()
            .with_setting(&path("a.b"), json!(1))
            .with_setting(&path("c"), json!(2))
            .without_setting(&path("a.b"));

        assert!(draft.get(&path("a")).is_none());
        assert_eq!(draft.get(&path("c")), Some(&json!(2)));
    }

    #[test]
    fn test_without_setting_keeps_order() {
        let draft = ConfigurationDraft::new()
            .with_setting(&path("a"), json!(1))
            .with_setting(&path("b"), json!(2))
            .with_setting(&path("c"), json!(3))
            .without_setting(&path("a"));

        let keys: Vec<&String> = draft.settings().keys().collect();
        assert_eq!(keys, ["b", "c"]);
    }

    #[test]
    fn test_draft_deserializes_with_defaults() {
        let draft: ConfigurationDraft =
            serde_json::from_str(r#"{"settings":{"mode":"SYNC"}}"#).unwrap();
        assert_eq!(draft.get(&path("mode")), Some(&json!("SYNC")));
        assert!(draft.features().is_empty());
        assert_eq!(draft.metadata(), &DraftMetadata::default());
    }
}
