//! Integration tests for fixed-text insertion.

use pagefix::{Directive, Directives, Error, FixedTextInserter, PageStream};

const STREAM: &str = "--- Page 1 ---\ntitle\nname\n--- Page 2 ---\n--- Page 3 ---\none\ntwo\nthree\nfour\n";

fn body_len(stream: &PageStream, number: usize) -> usize {
    stream.page(number).map(|p| p.lines.len()).unwrap_or(0)
}

#[test]
fn test_empty_directives_are_byte_identical() {
    for text in [
        STREAM,
        "",
        "no markers at all\n",
        "--- Page 1 ---\r\nwindows\r\nline\r\n",
        "--- Page 1 ---\nno trailing newline",
    ] {
        let stream = PageStream::from_text(text);
        let output = FixedTextInserter::new().apply(&stream, &Directives::new());
        assert_eq!(output.as_str(), text);
    }
}

#[test]
fn test_deletions_shrink_page_by_directive_count() {
    let stream = PageStream::from_text(STREAM);
    let directives = Directives::new()
        .with_delete(2, 1)
        .with_delete(2, 3)
        .with_delete(2, 4);
    let output = FixedTextInserter::new().apply(&stream, &directives);
    assert_eq!(body_len(&output, 3), body_len(&stream, 3) - 3);
    assert_eq!(output.page(3).unwrap().lines, vec!["two"]);
    assert_eq!(body_len(&output, 1), body_len(&stream, 1));
}

#[test]
fn test_insertions_grow_page_by_inserted_lines() {
    let stream = PageStream::from_text(STREAM);
    let directives = Directives::new()
        .with_insert(2, 1, "A")
        .with_insert(2, 4, "B\nC");
    let (output, stats) = FixedTextInserter::new().apply_with_stats(&stream, &directives);
    assert_eq!(body_len(&output, 3), body_len(&stream, 3) + 3);
    assert_eq!(stats.lines_inserted, 3);
    assert_eq!(
        output.page(3).unwrap().lines,
        vec!["A", "one", "two", "three", "B", "C", "four"]
    );
}

#[test]
fn test_directive_on_empty_page_is_unmatched() {
    let stream = PageStream::from_text(STREAM);
    let directives = Directives::new().with_insert(1, 1, "lost");
    let (output, stats) = FixedTextInserter::new().apply_with_stats(&stream, &directives);
    assert_eq!(output.as_str(), STREAM);
    assert_eq!(stats.unmatched, vec![(1, 1)]);
}

#[test]
fn test_page_keys_are_zero_based_indices() {
    let stream = PageStream::from_text(STREAM);
    let directives = Directives::from_json(r#"{"0": {"2": "HERE"}}"#).unwrap();
    let output = FixedTextInserter::new().apply(&stream, &directives);
    assert_eq!(output.page(1).unwrap().lines, vec!["title", "HERE", "name"]);
}

#[test]
fn test_translated_markers_are_recognized() {
    let stream = PageStream::from_text("--- page 1 ---\nשלום\n");
    let directives = Directives::new().with_insert(0, 1, "כותרת");
    let output = FixedTextInserter::new().apply(&stream, &directives);
    assert_eq!(output.as_str(), "--- page 1 ---\nכותרת\nשלום\n");
}

#[test]
fn test_delete_sentinel_is_exact() {
    let directives = Directives::from_json(r#"{"0": {"1": "DELETE", "2": "Delete"}}"#).unwrap();
    assert_eq!(directives.get(0, 1), Some(&Directive::Delete));
    assert_eq!(
        directives.get(0, 2),
        Some(&Directive::Insert("Delete".to_string()))
    );
}

#[test]
fn test_malformed_directives() {
    assert!(matches!(
        Directives::from_json(r#"{"0": {"0": "x"}}"#),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        Directives::from_json(r#"{"0": {"1": null}}"#),
        Err(Error::Config(_))
    ));
    assert!(matches!(Directives::from_json("{"), Err(Error::Json(_))));
}
