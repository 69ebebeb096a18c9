use crate::model::{ExtractedFields, PageStream, Quality, QualityScores};

use super::heuristics::{
    find_category_code, find_date, find_name, find_scores_line, parse_scores_line,
};
use super::options::FieldOptions;

/// Recovers [`ExtractedFields`] from a page-delimited stream.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    options: FieldOptions,
}

impl FieldExtractor {
    /// Create an extractor with default positions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom positions.
    pub fn with_options(options: FieldOptions) -> Self {
        Self { options }
    }

    /// Current options.
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Run every lookup. Misses are logged and left empty.
    pub fn extract(&self, stream: &PageStream) -> ExtractedFields {
        let text = stream.as_str();

        let category = find_category_code(text);
        if category.is_none() {
            log::warn!("No category code found");
        }

        let name = find_name(stream, self.options.name_line);
        if name.is_none() {
            log::warn!("No name at non-empty line {}", self.options.name_line);
        }

        let date = find_date(text);
        if date.is_none() {
            log::debug!("No date found");
        }

        let scores = self.extract_scores(stream);

        let fields = ExtractedFields {
            name,
            date,
            category,
            scores,
        };
        log::info!("Extracted {} of 4 fields", fields.found_count());
        fields
    }

    fn extract_scores(&self, stream: &PageStream) -> QualityScores {
        let mut scores = QualityScores::new();

        let Some(line) = find_scores_line(stream, self.options.scores_page) else {
            log::warn!("No score row on page {}", self.options.scores_page);
            return scores;
        };
        let Some(pairs) = parse_scores_line(line) else {
            log::warn!("Score row on page {} has no label/score pairs", self.options.scores_page);
            return scores;
        };

        for (label, score) in &pairs {
            match Quality::from_label(label) {
                Some(quality) => scores.set(quality, *score),
                None => log::warn!("Unrecognized quality label {:?} (score {})", label, score),
            }
        }
        scores.raw = pairs;
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryCode;

    fn report() -> PageStream {
        PageStream::from_text(
            "--- Page 1 ---\nPersonality Report\nDana Levi\n15 January 2024\n--- Page 2 ---\nType ENFP\n--- Page 3 ---\nEXTRAVERSION | 11 INTUITION | 9 THINKING | 4 PERCEIVING | 11\n",
        )
    }

    #[test]
    fn test_extract_all_fields() {
        let fields = FieldExtractor::new().extract(&report());
        assert_eq!(fields.name.as_deref(), Some("Dana Levi"));
        assert_eq!(fields.date.as_deref(), Some("15 January 2024"));
        assert_eq!(fields.category, Some(CategoryCode::Enfp));
        assert_eq!(fields.scores.get(Quality::Extraversion), 11);
        assert_eq!(fields.scores.get(Quality::Intuition), 9);
        assert_eq!(fields.scores.get(Quality::Thinking), 4);
        assert_eq!(fields.scores.get(Quality::Perceiving), 11);
        assert_eq!(fields.scores.get(Quality::Feeling), 0);
        assert_eq!(fields.found_count(), 4);
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let fields = FieldExtractor::new().extract(&PageStream::from_text("--- Page 1 ---\nhello\n"));
        assert_eq!(fields, ExtractedFields::default());
    }

    #[test]
    fn test_unknown_label_kept_raw() {
        let stream = PageStream::from_text("--- Page 3 ---\nCLARITY | 5 THINKING | 2 X | 1\n");
        let fields = FieldExtractor::new().extract(&stream);
        assert_eq!(fields.scores.get(Quality::Thinking), 2);
        assert_eq!(fields.scores.present().count(), 1);
        assert_eq!(fields.scores.raw.len(), 3);
        assert_eq!(fields.scores.raw[0], ("CLARITY".to_string(), 5));
    }

    #[test]
    fn test_custom_positions() {
        let options = FieldOptions::new().with_name_line(1).with_scores_page(1);
        let stream = PageStream::from_text("--- Page 1 ---\nDana\nFEELING | 3 JUDGING | 1 X | 0\n");
        let fields = FieldExtractor::with_options(options).extract(&stream);
        assert_eq!(fields.name.as_deref(), Some("Dana"));
        assert_eq!(fields.scores.get(Quality::Feeling), 3);
        assert_eq!(fields.scores.get(Quality::Judging), 1);
    }
}
