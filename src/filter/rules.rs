//! Per-page line removal rules.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Keyword that removes every line of a page.
pub const SKIP_ALL_KEYWORD: &str = "ALL";

/// What to remove from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRule {
    /// Drop the whole body; the page marker stays.
    SkipAll,
    /// Drop lines by 0-based position in the unfiltered page.
    RemoveByIndex(BTreeSet<usize>),
    /// Drop lines containing any of the substrings.
    RemoveByContent(Vec<String>),
}

impl LineRule {
    /// Rule dropping the given line indices.
    pub fn indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        LineRule::RemoveByIndex(indices.into_iter().collect())
    }

    /// Rule dropping lines that contain any of the patterns.
    pub fn containing<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LineRule::RemoveByContent(patterns.into_iter().map(Into::into).collect())
    }

    /// Whether the line at `index` with the given text is removed.
    pub fn removes(&self, index: usize, line: &str) -> bool {
        match self {
            LineRule::SkipAll => true,
            LineRule::RemoveByIndex(set) => set.contains(&index),
            LineRule::RemoveByContent(patterns) => {
                patterns.iter().any(|pattern| line.contains(pattern.as_str()))
            }
        }
    }

    /// Decide the variant from its JSON form.
    ///
    /// `"ALL"` skips the page, a list of integers removes by index and a list
    /// of strings removes by content. Anything else is rejected.
    pub fn from_value(page: usize, value: &Value) -> Result<Self> {
        match value {
            Value::String(s) if s == SKIP_ALL_KEYWORD => Ok(LineRule::SkipAll),
            Value::String(s) => Err(Error::config(format!(
                "page {}: unknown rule keyword {:?} (expected \"{}\" or a list)",
                page, s, SKIP_ALL_KEYWORD
            ))),
            Value::Array(items) if items.is_empty() => Err(Error::config(format!(
                "page {}: empty rule list",
                page
            ))),
            Value::Array(items) if items.iter().all(Value::is_string) => {
                let patterns = items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect();
                Ok(LineRule::RemoveByContent(patterns))
            }
            Value::Array(items) if items.iter().all(Value::is_number) => {
                let mut set = BTreeSet::new();
                for item in items {
                    let index = item
                        .as_u64()
                        .and_then(|index| usize::try_from(index).ok())
                        .ok_or_else(|| {
                            Error::config(format!(
                                "page {}: line index {} is not a usable non-negative integer",
                                page, item
                            ))
                        })?;
                    set.insert(index);
                }
                Ok(LineRule::RemoveByIndex(set))
            }
            Value::Array(_) => Err(Error::config(format!(
                "page {}: rule list mixes line indices and text patterns",
                page
            ))),
            other => Err(Error::config(format!(
                "page {}: unsupported rule value {}",
                page, other
            ))),
        }
    }
}

impl Serialize for LineRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            LineRule::SkipAll => serializer.serialize_str(SKIP_ALL_KEYWORD),
            LineRule::RemoveByIndex(set) => set.serialize(serializer),
            LineRule::RemoveByContent(patterns) => patterns.serialize(serializer),
        }
    }
}

/// Removal rules keyed by 0-based page index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RemovalRules {
    rules: BTreeMap<usize, LineRule>,
}

impl RemovalRules {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for a page.
    pub fn with_rule(mut self, page_index: usize, rule: LineRule) -> Self {
        self.insert(page_index, rule);
        self
    }

    /// Add or replace the rule for a page.
    pub fn insert(&mut self, page_index: usize, rule: LineRule) {
        self.rules.insert(page_index, rule);
    }

    /// Rule for a page, if any.
    pub fn get(&self, page_index: usize) -> Option<&LineRule> {
        self.rules.get(&page_index)
    }

    /// Iterate rules in page order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &LineRule)> {
        self.rules.iter().map(|(page, rule)| (*page, rule))
    }

    /// Number of pages with a rule.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Build rules from a JSON object `{"<page>": rule, ...}`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::config("removal rules must be a JSON object keyed by page index")
        })?;

        let mut rules = Self::new();
        for (key, rule) in object {
            let page = parse_index_key(key, "page index")?;
            rules.insert(page, LineRule::from_value(page, rule)?);
        }
        Ok(rules)
    }

    /// Parse rules from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Load rules from a JSON file in any text encoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&crate::encoding::read_text_file(path)?)
    }
}

impl<'de> Deserialize<'de> for RemovalRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl FromIterator<(usize, LineRule)> for RemovalRules {
    fn from_iter<I: IntoIterator<Item = (usize, LineRule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Parse a JSON object key as a non-negative integer.
pub(crate) fn parse_index_key(key: &str, what: &str) -> Result<usize> {
    key.trim()
        .parse::<usize>()
        .map_err(|_| Error::config(format!("{} {:?} is not a non-negative integer", what, key)))
}
