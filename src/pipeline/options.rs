//! Pipeline options and the per-run configuration file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::fields::FieldOptions;
use crate::filter::RemovalRules;
use crate::insert::Directives;
use crate::parser::ParseOptions;

/// Run-time behavior of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Extraction options
    pub parse: ParseOptions,

    /// Fail when a translation changes the number of page markers
    pub strict_pages: bool,

    /// Keep the raw and filtered streams in the result
    pub keep_intermediate: bool,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Treat a page count change during translation as an error.
    pub fn with_strict_pages(mut self, strict: bool) -> Self {
        self.strict_pages = strict;
        self
    }

    /// Keep the raw and filtered streams.
    pub fn with_intermediate(mut self, keep: bool) -> Self {
        self.keep_intermediate = keep;
        self
    }
}

/// What to remove, what to insert and where fields live.
///
/// Loaded from a JSON file shaped like:
///
/// ```json
/// {
///   "rules": { "0": "ALL", "2": [0, 1], "3": ["Confidential"] },
///   "directives": { "2": { "1": "Type: {category}", "4": "DELETE" } },
///   "fields": { "name_line": 2, "scores_page": 3 }
/// }
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Line removal rules
    pub rules: RemovalRules,

    /// Fixed-text directives, rendered with the extracted fields
    pub directives: Directives,

    /// Field lookup positions
    pub fields: FieldOptions,
}

impl PipelineConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the removal rules.
    pub fn with_rules(mut self, rules: RemovalRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the directives.
    pub fn with_directives(mut self, directives: Directives) -> Self {
        self.directives = directives;
        self
    }

    /// Set the field options.
    pub fn with_fields(mut self, fields: FieldOptions) -> Self {
        self.fields = fields;
        self
    }

    /// Build a configuration from a parsed JSON value.
    ///
    /// Malformed rules or directives are reported as [`Error::Config`].
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::config("configuration must be a JSON object"))?;

        let mut config = Self::new();
        for (section, body) in object {
            match section.as_str() {
                "rules" => config.rules = RemovalRules::from_value(body)?,
                "directives" => config.directives = Directives::from_value(body)?,
                "fields" => config.fields = FieldOptions::deserialize(body)?,
                other => log::warn!("Ignoring unknown configuration section {:?}", other),
            }
        }
        Ok(config)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Load a configuration file in any text encoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_json(&crate::encoding::read_text_file(path)?)?;
        log::debug!(
            "Loaded {} removal rules and {} directives from {}",
            config.rules.len(),
            config.directives.len(),
            path.display()
        );
        Ok(config)
    }

    /// Serialize the configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::LineRule;
    use crate::insert::Directive;
    use std::io::Write;

    #[test]
    fn test_pipeline_options_builder() {
        let options = PipelineOptions::new()
            .with_strict_pages(true)
            .with_intermediate(true)
            .with_parse_options(ParseOptions::new().lenient());
        assert!(options.strict_pages);
        assert!(options.keep_intermediate);
        assert_eq!(options.parse.error_mode, crate::parser::ErrorMode::Lenient);
    }

    #[test]
    fn test_config_from_json() {
        let config = PipelineConfig::from_json(
            r#"{"rules": {"0": "ALL"}, "directives": {"2": {"1": "HEADER"}}}"#,
        )
        .unwrap();
        assert_eq!(config.rules.get(0), Some(&LineRule::SkipAll));
        assert_eq!(
            config.directives.get(2, 1),
            Some(&Directive::Insert("HEADER".into()))
        );
        assert_eq!(config.fields, FieldOptions::default());
    }

    #[test]
    fn test_config_errors_are_reported() {
        let err = PipelineConfig::from_json(r#"{"rules": {"0": [1, "a"]}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("mixes"));
        assert!(matches!(
            PipelineConfig::from_json(r#"{"directives": {"0": {"0": "x"}}}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json("[]"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_config_from_file_roundtrip() {
        let config = PipelineConfig::new()
            .with_rules(RemovalRules::new().with_rule(1, LineRule::indices([0, 2])))
            .with_directives(Directives::new().with_delete(0, 3));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();
        assert_eq!(PipelineConfig::from_file(file.path()).unwrap(), config);
    }
}
