//! Insertion and deletion directives addressed by page and line.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::filter::parse_index_key;
use crate::model::ExtractedFields;

/// Directive value that deletes the addressed line.
pub const DELETE_SENTINEL: &str = "DELETE";

/// What happens at one `(page, line)` address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Emit the text (one or more lines) before the addressed line.
    Insert(String),
    /// Drop the addressed line.
    Delete,
}

impl Directive {
    /// Number of lines the directive adds to the page.
    pub fn inserted_lines(&self) -> usize {
        match self {
            Directive::Insert(text) => text.lines().count().max(1),
            Directive::Delete => 0,
        }
    }

    fn from_value(page: usize, line: usize, value: &Value) -> Result<Self> {
        match value {
            Value::String(s) if s == DELETE_SENTINEL => Ok(Directive::Delete),
            Value::String(s) => Ok(Directive::Insert(s.clone())),
            other => Err(Error::config(format!(
                "page {} line {}: directive must be a string, got {}",
                page, line, other
            ))),
        }
    }

    fn as_config_str(&self) -> &str {
        match self {
            Directive::Insert(text) => text,
            Directive::Delete => DELETE_SENTINEL,
        }
    }
}

/// Directives keyed by `(page_index, line_number)`.
///
/// `page_index` is 0-based, the same index space as removal rules, so page
/// index 2 addresses the body under `--- Page 3 ---`. `line_number` is the
/// 1-based position in the page body as it reaches the inserter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    entries: BTreeMap<(usize, usize), Directive>,
}

impl Directives {
    /// Create an empty directive set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert text before a line.
    pub fn with_insert(mut self, page_index: usize, line: usize, text: impl Into<String>) -> Self {
        self.set(page_index, line, Directive::Insert(text.into()));
        self
    }

    /// Delete a line.
    pub fn with_delete(mut self, page_index: usize, line: usize) -> Self {
        self.set(page_index, line, Directive::Delete);
        self
    }

    /// Add or replace the directive at an address.
    pub fn set(&mut self, page_index: usize, line: usize, directive: Directive) {
        self.entries.insert((page_index, line), directive);
    }

    /// Directive at an address, if any.
    pub fn get(&self, page_index: usize, line: usize) -> Option<&Directive> {
        self.entries.get(&(page_index, line))
    }

    /// Iterate directives in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&(usize, usize), &Directive)> {
        self.entries.iter()
    }

    /// Number of directives.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no directives.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substitute `{category}`, `{name}`, `{date}` and `{scores}` in every
    /// insertion text. Missing fields become empty strings.
    pub fn render(&self, fields: &ExtractedFields) -> Directives {
        let category = fields.category.map(|c| c.as_str()).unwrap_or_default();
        let name = fields.name.as_deref().unwrap_or_default();
        let date = fields.date.as_deref().unwrap_or_default();
        let scores = fields.scores.summary();

        let entries = self
            .entries
            .iter()
            .map(|(key, directive)| {
                let rendered = match directive {
                    Directive::Insert(text) => Directive::Insert(
                        text.replace("{category}", category)
                            .replace("{name}", name)
                            .replace("{date}", date)
                            .replace("{scores}", &scores),
                    ),
                    Directive::Delete => Directive::Delete,
                };
                (*key, rendered)
            })
            .collect();
        Directives { entries }
    }

    /// Build directives from `{"<page>": {"<line>": "text" | "DELETE"}}`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let pages = value.as_object().ok_or_else(|| {
            Error::config("directives must be a JSON object keyed by page index")
        })?;

        let mut directives = Self::new();
        for (page_key, lines) in pages {
            let page = parse_index_key(page_key, "page index")?;
            let lines = lines.as_object().ok_or_else(|| {
                Error::config(format!(
                    "page {}: directives must be an object keyed by line number",
                    page
                ))
            })?;
            for (line_key, value) in lines {
                let line = parse_index_key(line_key, "line number")?;
                if line == 0 {
                    return Err(Error::config(format!(
                        "page {}: line numbers start at 1",
                        page
                    )));
                }
                directives.set(page, line, Directive::from_value(page, line, value)?);
            }
        }
        Ok(directives)
    }

    /// Parse directives from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Load directives from a JSON file in any text encoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&crate::encoding::read_text_file(path)?)
    }
}

impl Serialize for Directives {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut pages: BTreeMap<usize, BTreeMap<usize, &str>> = BTreeMap::new();
        for ((page, line), directive) in &self.entries {
            pages
                .entry(*page)
                .or_default()
                .insert(*line, directive.as_config_str());
        }
        pages.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Directives {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryCode, Quality};
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let directives =
            Directives::from_json(r#"{"2": {"1": "HEADER", "5": "DELETE"}, "0": {"3": "x"}}"#)
                .unwrap();
        assert_eq!(directives.len(), 3);
        assert_eq!(
            directives.get(2, 1),
            Some(&Directive::Insert("HEADER".into()))
        );
        assert_eq!(directives.get(2, 5), Some(&Directive::Delete));
        assert_eq!(directives.get(0, 3), Some(&Directive::Insert("x".into())));
        // "delete" is ordinary text
        let lower = Directives::from_json(r#"{"0": {"1": "delete"}}"#).unwrap();
        assert_eq!(lower.get(0, 1), Some(&Directive::Insert("delete".into())));
    }

    #[test]
    fn test_malformed_directives_rejected() {
        for bad in [
            json!({"0": {"0": "x"}}),
            json!({"0": {"-1": "x"}}),
            json!({"0": {"one": "x"}}),
            json!({"p": {"1": "x"}}),
            json!({"0": {"1": 5}}),
            json!({"0": ["x"]}),
            json!("DELETE"),
        ] {
            assert!(
                matches!(Directives::from_value(&bad), Err(Error::Config(_))),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_render_templates() {
        let mut fields = ExtractedFields {
            name: Some("Dana".into()),
            category: Some(CategoryCode::Intj),
            ..Default::default()
        };
        fields.scores.set(Quality::Thinking, 4);
        fields.scores.raw = vec![("THINKING".into(), 4)];

        let directives = Directives::new()
            .with_insert(0, 1, "{name} ({category}) {date}")
            .with_insert(1, 1, "{scores}")
            .with_delete(1, 2);
        let rendered = directives.render(&fields);
        assert_eq!(rendered.get(0, 1), Some(&Directive::Insert("Dana (INTJ) ".into())));
        assert_eq!(
            rendered.get(1, 1),
            Some(&Directive::Insert("Thinking : 4".into()))
        );
        assert_eq!(rendered.get(1, 2), Some(&Directive::Delete));
    }

    #[test]
    fn test_serialize_shape() {
        let directives = Directives::new().with_insert(2, 1, "HEADER").with_delete(2, 4);
        let json = serde_json::to_value(&directives).unwrap();
        assert_eq!(json, json!({"2": {"1": "HEADER", "4": "DELETE"}}));
        let back: Directives = serde_json::from_value(json).unwrap();
        assert_eq!(back, directives);
    }

    #[test]
    fn test_inserted_lines() {
        assert_eq!(Directive::Insert("a\nb".into()).inserted_lines(), 2);
        assert_eq!(Directive::Insert(String::new()).inserted_lines(), 1);
        assert_eq!(Directive::Delete.inserted_lines(), 0);
    }
}
