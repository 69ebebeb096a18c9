//! Structured fields recovered from a report stream.
//!
//! The category codes, quality names and the code-to-qualities table are fixed
//! report vocabulary and live here as static data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the sixteen four-letter category codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryCode {
    Istj,
    Isfj,
    Infj,
    Intj,
    Istp,
    Isfp,
    Infp,
    Intp,
    Estp,
    Esfp,
    Enfp,
    Entp,
    Estj,
    Esfj,
    Enfj,
    Entj,
}

impl CategoryCode {
    /// All codes, in canonical table order.
    pub const ALL: [CategoryCode; 16] = [
        CategoryCode::Istj,
        CategoryCode::Isfj,
        CategoryCode::Infj,
        CategoryCode::Intj,
        CategoryCode::Istp,
        CategoryCode::Isfp,
        CategoryCode::Infp,
        CategoryCode::Intp,
        CategoryCode::Estp,
        CategoryCode::Esfp,
        CategoryCode::Enfp,
        CategoryCode::Entp,
        CategoryCode::Estj,
        CategoryCode::Esfj,
        CategoryCode::Enfj,
        CategoryCode::Entj,
    ];

    /// The four-letter code.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryCode::Istj => "ISTJ",
            CategoryCode::Isfj => "ISFJ",
            CategoryCode::Infj => "INFJ",
            CategoryCode::Intj => "INTJ",
            CategoryCode::Istp => "ISTP",
            CategoryCode::Isfp => "ISFP",
            CategoryCode::Infp => "INFP",
            CategoryCode::Intp => "INTP",
            CategoryCode::Estp => "ESTP",
            CategoryCode::Esfp => "ESFP",
            CategoryCode::Enfp => "ENFP",
            CategoryCode::Entp => "ENTP",
            CategoryCode::Estj => "ESTJ",
            CategoryCode::Esfj => "ESFJ",
            CategoryCode::Enfj => "ENFJ",
            CategoryCode::Entj => "ENTJ",
        }
    }

    /// The four qualities the code stands for, one per letter.
    pub fn qualities(&self) -> [Quality; 4] {
        use Quality::*;
        match self {
            CategoryCode::Istj => [Introversion, Sensing, Thinking, Judging],
            CategoryCode::Isfj => [Introversion, Sensing, Feeling, Judging],
            CategoryCode::Infj => [Introversion, Intuition, Feeling, Judging],
            CategoryCode::Intj => [Introversion, Intuition, Thinking, Judging],
            CategoryCode::Istp => [Introversion, Sensing, Thinking, Perceiving],
            CategoryCode::Isfp => [Introversion, Sensing, Feeling, Perceiving],
            CategoryCode::Infp => [Introversion, Intuition, Feeling, Perceiving],
            CategoryCode::Intp => [Introversion, Intuition, Thinking, Perceiving],
            CategoryCode::Estp => [Extraversion, Sensing, Thinking, Perceiving],
            CategoryCode::Esfp => [Extraversion, Sensing, Feeling, Perceiving],
            CategoryCode::Enfp => [Extraversion, Intuition, Feeling, Perceiving],
            CategoryCode::Entp => [Extraversion, Intuition, Thinking, Perceiving],
            CategoryCode::Estj => [Extraversion, Sensing, Thinking, Judging],
            CategoryCode::Esfj => [Extraversion, Sensing, Feeling, Judging],
            CategoryCode::Enfj => [Extraversion, Intuition, Feeling, Judging],
            CategoryCode::Entj => [Extraversion, Intuition, Thinking, Judging],
        }
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryCode {
    type Err = ();

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or(())
    }
}

/// One of the eight scored qualities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quality {
    Extraversion,
    Introversion,
    Sensing,
    Intuition,
    Thinking,
    Feeling,
    Judging,
    Perceiving,
}

impl Quality {
    /// All qualities, paired by dimension.
    pub const ALL: [Quality; 8] = [
        Quality::Extraversion,
        Quality::Introversion,
        Quality::Sensing,
        Quality::Intuition,
        Quality::Thinking,
        Quality::Feeling,
        Quality::Judging,
        Quality::Perceiving,
    ];

    /// English display name.
    pub fn name(&self) -> &'static str {
        match self {
            Quality::Extraversion => "Extraversion",
            Quality::Introversion => "Introversion",
            Quality::Sensing => "Sensing",
            Quality::Intuition => "Intuition",
            Quality::Thinking => "Thinking",
            Quality::Feeling => "Feeling",
            Quality::Judging => "Judging",
            Quality::Perceiving => "Perceiving",
        }
    }

    /// Hebrew name used in translated reports.
    pub fn hebrew_name(&self) -> &'static str {
        match self {
            Quality::Extraversion => "מוחצנות",
            Quality::Introversion => "מופנמות",
            Quality::Sensing => "חישה",
            Quality::Intuition => "אינטואיציה",
            Quality::Thinking => "חשיבה",
            Quality::Feeling => "רגש",
            Quality::Judging => "שיפוטיות",
            Quality::Perceiving => "הסתגלות",
        }
    }

    /// The letter this quality contributes to a category code.
    pub fn letter(&self) -> char {
        match self {
            Quality::Extraversion => 'E',
            Quality::Introversion => 'I',
            Quality::Sensing => 'S',
            Quality::Intuition => 'N',
            Quality::Thinking => 'T',
            Quality::Feeling => 'F',
            Quality::Judging => 'J',
            Quality::Perceiving => 'P',
        }
    }

    /// Resolve a table label to a quality.
    ///
    /// Matches English names case-insensitively (plus spellings seen in source
    /// reports) and the Hebrew names.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let upper = label.to_uppercase();
        let english = match upper.as_str() {
            "EXTRAVERSION" | "EXTROVERSION" => Some(Quality::Extraversion),
            "INTROVERSION" => Some(Quality::Introversion),
            "SENSING" | "SENSOR" => Some(Quality::Sensing),
            "INTUITION" => Some(Quality::Intuition),
            "THINKING" => Some(Quality::Thinking),
            "FEELING" => Some(Quality::Feeling),
            "JUDGING" | "JUDJING" => Some(Quality::Judging),
            "PERCEIVING" => Some(Quality::Perceiving),
            _ => None,
        };
        english.or_else(|| {
            Quality::ALL
                .iter()
                .copied()
                .find(|q| label.contains(q.hebrew_name()))
        })
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scores for the eight qualities. Unset qualities read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScores {
    values: [Option<u32>; 8],

    /// Label/score pairs as they appeared in the table row
    pub raw: Vec<(String, u32)>,
}

impl QualityScores {
    /// Create an empty score set.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(quality: Quality) -> usize {
        Quality::ALL
            .iter()
            .position(|q| *q == quality)
            .unwrap_or_default()
    }

    /// Score of a quality, 0 when absent.
    pub fn get(&self, quality: Quality) -> u32 {
        self.values[Self::slot(quality)].unwrap_or(0)
    }

    /// Set the score of a quality.
    pub fn set(&mut self, quality: Quality, score: u32) {
        self.values[Self::slot(quality)] = Some(score);
    }

    /// Whether a score was found for the quality.
    pub fn contains(&self, quality: Quality) -> bool {
        self.values[Self::slot(quality)].is_some()
    }

    /// Qualities that were found, in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (Quality, u32)> + '_ {
        Quality::ALL
            .iter()
            .zip(self.values.iter())
            .filter_map(|(q, v)| v.map(|score| (*q, score)))
    }

    /// Check if no quality was found.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// One-line summary in row order: `"Extraversion : 11 | Intuition : 9"`.
    ///
    /// Labels that resolved to a quality use its English name; others are
    /// shown as they appeared.
    pub fn summary(&self) -> String {
        self.raw
            .iter()
            .map(|(label, score)| {
                let name = Quality::from_label(label)
                    .map(|q| q.name().to_string())
                    .unwrap_or_else(|| label.clone());
                format!("{} : {}", name, score)
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Fields recovered from a stream. Every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Recipient name
    pub name: Option<String>,

    /// Report date as it appeared in the text
    pub date: Option<String>,

    /// Category code
    pub category: Option<CategoryCode>,

    /// Quality scores
    pub scores: QualityScores,
}

impl ExtractedFields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the date when it uses English month names ("15 January 2024").
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date.trim(), "%d %B %Y")
            .or_else(|_| NaiveDate::parse_from_str(date.trim(), "%B %d, %Y"))
            .ok()
    }

    /// Count of fields that were found (scores count once).
    pub fn found_count(&self) -> usize {
        [
            self.name.is_some(),
            self.date.is_some(),
            self.category.is_some(),
            !self.scores.is_empty(),
        ]
        .iter()
        .filter(|found| **found)
        .count()
    }
}
