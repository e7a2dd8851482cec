use crate::{LineIndex, Position};

#[test]
fn first_line_offsets() {
    let index = LineIndex::new("f main() {}");

    assert_eq!(index.line_col(0), (1, 1));
    assert_eq!(index.line_col(2), (1, 3));
    assert_eq!(index.line_count(), 1);
}

#[test]
fn offsets_after_newlines() {
    let source = "const a = 1;\nconst b = a;\n";
    let index = LineIndex::new(source);

    assert_eq!(index.line_col(13), (2, 1));
    assert_eq!(index.line_col(19), (2, 7));
    assert_eq!(index.line_col(source.len() as u32), (3, 1));
}

#[test]
fn position_from_range() {
    let index = LineIndex::new("a\nbcd");
    let pos = index.position(3, 5);

    assert_eq!(pos, Position::new(3, 5, 2, 2));
    assert_eq!(pos.len(), 2);
    assert_eq!(pos.to_string(), "2:2");
}

#[test]
fn line_text_strips_terminators() {
    let source = "first\r\nsecond\nthird";
    let index = LineIndex::new(source);

    assert_eq!(index.line_text(source, 1), Some("first"));
    assert_eq!(index.line_text(source, 2), Some("second"));
    assert_eq!(index.line_text(source, 3), Some("third"));
    assert_eq!(index.line_text(source, 0), None);
    assert_eq!(index.line_text(source, 4), None);
}

#[test]
fn cover_spans_both() {
    let a = Position::new(4, 6, 1, 5);
    let b = Position::new(0, 2, 1, 1);

    assert_eq!(a.cover(b), Position::new(0, 6, 1, 1));
    assert_eq!(b.cover(a), Position::new(0, 6, 1, 1));
}

#[test]
#[should_panic(expected = "past the end")]
fn offset_out_of_bounds() {
    LineIndex::new("ab").line_col(3);
}
