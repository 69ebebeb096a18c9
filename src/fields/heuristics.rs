//! Individual field lookups.
//!
//! Each lookup is a free function over text or a stream and returns `None`
//! when its pattern is not there. None of them fail.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{CategoryCode, PageStream};

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let codes: Vec<&str> = CategoryCode::ALL.iter().map(|c| c.as_str()).collect();
    Regex::new(&format!(r"\b(?:{})\b", codes.join("|"))).unwrap()
});

const ENGLISH_MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

const HEBREW_MONTHS: &str =
    "ינואר|פברואר|מרץ|אפריל|מאי|יוני|יולי|אוגוסט|ספטמבר|אוקטובר|נובמבר|דצמבר";

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b\d{{1,2}}\s+(?:{en})\s+\d{{4}}\b|\b(?:{en})\s+\d{{1,2}},\s*\d{{4}}\b|\b\d{{1,2}}\s+ב?(?:{he})\s+\d{{4}}\b",
        en = ENGLISH_MONTHS,
        he = HEBREW_MONTHS
    ))
    .unwrap()
});

static SCORE_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\s*(.*)$").unwrap());

/// Separator between cells of a score row.
pub const SCORE_SEPARATOR: char = '|';

/// First whole-token, case-sensitive category code in the text.
pub fn find_category_code(text: &str) -> Option<CategoryCode> {
    CATEGORY_RE
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// The `position`-th (1-based) non-empty body line of the stream, trimmed.
///
/// Page markers are not counted.
pub fn find_name(stream: &PageStream, position: usize) -> Option<String> {
    if position == 0 {
        return None;
    }
    stream
        .body_lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .nth(position - 1)
        .map(str::to_string)
}

/// First day / month-name / year date in the text, as written.
///
/// Recognizes "15 January 2024", "January 15, 2024" and the Hebrew
/// "15 בינואר 2024" (with or without the `ב` prefix).
pub fn find_date(text: &str) -> Option<String> {
    DATE_RE.find(text).map(|m| m.as_str().to_string())
}

/// First line of the page with at least three separators and a digit.
pub fn find_scores_line<'a>(stream: &'a PageStream, page_number: usize) -> Option<&'a str> {
    let page = stream.page(page_number)?;
    page.lines.into_iter().find(|line| {
        line.matches(SCORE_SEPARATOR).count() >= 3 && line.chars().any(|c| c.is_ascii_digit())
    })
}

/// Split a score row into ordered `(label, score)` pairs.
///
/// The row reads `label | <n> label | ... | <n>`: the first cell is a label,
/// each middle cell is a score followed by the next label, and the last cell
/// is a score. A score always pairs with the label directly before it; when a
/// score is unreadable that label is dropped and the following pairs are
/// unaffected. Returns `None` when no pair can be formed.
pub fn parse_scores_line(line: &str) -> Option<Vec<(String, u32)>> {
    let cells: Vec<&str> = line.split(SCORE_SEPARATOR).map(str::trim).collect();
    if cells.len() < 2 {
        return None;
    }

    let mut pairs: Vec<(String, u32)> = Vec::new();
    let mut label = non_empty(cells[0]);

    for cell in &cells[1..cells.len() - 1] {
        let Some(caps) = SCORE_SEGMENT_RE.captures(cell) else {
            label = None;
            continue;
        };
        if let Some(pending) = label.take() {
            match caps[1].parse::<u32>() {
                Ok(score) => pairs.push((pending.to_string(), score)),
                Err(_) => log::debug!("Unreadable score {:?} for {:?}", &caps[1], pending),
            }
        }
        label = caps.get(2).and_then(|m| non_empty(m.as_str().trim()));
    }

    if let (Some(pending), Some(last)) = (label, cells.last()) {
        if !last.is_empty() && last.chars().all(|c| c.is_ascii_digit()) {
            match last.parse::<u32>() {
                Ok(score) => pairs.push((pending.to_string(), score)),
                Err(_) => log::debug!("Unreadable score {:?} for {:?}", last, pending),
            }
        }
    }

    if pairs.is_empty() {
        None
    } else {
        Some(pairs)
    }
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_whole_token() {
        assert_eq!(
            find_category_code("Your type: ENFP (MBTI)"),
            Some(CategoryCode::Enfp)
        );
        assert_eq!(find_category_code("XENFPX and enfp"), None);
        assert_eq!(find_category_code("MBTI report"), None);
        assert_eq!(
            find_category_code("ISTJ then ENTP"),
            Some(CategoryCode::Istj)
        );
    }

    #[test]
    fn test_find_name_skips_markers_and_blanks() {
        let stream = PageStream::from_text("--- Page 1 ---\nReport\n\n  Dana Levi  \n--- Page 2 ---\n");
        assert_eq!(find_name(&stream, 2).as_deref(), Some("Dana Levi"));
        assert_eq!(find_name(&stream, 1).as_deref(), Some("Report"));
        assert_eq!(find_name(&stream, 3), None);
        assert_eq!(find_name(&stream, 0), None);
    }

    #[test]
    fn test_find_date_formats() {
        assert_eq!(
            find_date("Issued on 15 January 2024 by").as_deref(),
            Some("15 January 2024")
        );
        assert_eq!(
            find_date("March 3, 2023").as_deref(),
            Some("March 3, 2023")
        );
        assert_eq!(
            find_date("תאריך: 15 בינואר 2024").as_deref(),
            Some("15 בינואר 2024")
        );
        assert_eq!(find_date("15 Janvier 2024"), None);
    }

    #[test]
    fn test_find_scores_line() {
        let stream = PageStream::from_text(
            "--- Page 3 ---\nA | B | C | D\nEXTRAVERSION | 11 INTUITION | 9 THINKING | 4 PERCEIVING | 11\n",
        );
        assert_eq!(
            find_scores_line(&stream, 3),
            Some("EXTRAVERSION | 11 INTUITION | 9 THINKING | 4 PERCEIVING | 11")
        );
        assert_eq!(find_scores_line(&stream, 2), None);
    }

    #[test]
    fn test_parse_scores_line() {
        let pairs =
            parse_scores_line("EXTRAVERSION | 11 INTUITION | 9 THINKING | 4 PERCEIVING | 11")
                .unwrap();
        assert_eq!(
            pairs,
            vec![
                ("EXTRAVERSION".to_string(), 11),
                ("INTUITION".to_string(), 9),
                ("THINKING".to_string(), 4),
                ("PERCEIVING".to_string(), 11),
            ]
        );
    }

    #[test]
    fn test_parse_scores_line_truncates() {
        // No trailing score: the last label has nothing to pair with.
        let pairs = parse_scores_line("A | 1 B | 2 C | D").unwrap();
        assert_eq!(pairs, vec![("A".to_string(), 1), ("B".to_string(), 2)]);
        assert_eq!(parse_scores_line("no separators"), None);
        assert_eq!(parse_scores_line("A | B | C | D"), None);
    }

    #[test]
    fn test_unreadable_score_does_not_shift_pairs() {
        let overflow =
            parse_scores_line("EXTRAVERSION | 99999999999 INTUITION | 9 THINKING | 4 PERCEIVING | 11")
                .unwrap();
        assert_eq!(
            overflow,
            vec![
                ("INTUITION".to_string(), 9),
                ("THINKING".to_string(), 4),
                ("PERCEIVING".to_string(), 11),
            ]
        );

        // Arabic-Indic digits are not read as a score.
        let non_ascii =
            parse_scores_line("EXTRAVERSION | \u{661}\u{661} INTUITION | 9 THINKING | 4 PERCEIVING | 11")
                .unwrap();
        assert_eq!(
            non_ascii,
            vec![("THINKING".to_string(), 4), ("PERCEIVING".to_string(), 11)]
        );
    }
}
