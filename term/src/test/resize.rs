//! Resize behavior (spec.md §3's lifecycle): pad/truncate at the top,
//! re-clamp cursor and margins, preserve existing rows in place.

use super::TestTerm;

#[test]
fn growing_pads_new_empty_rows_at_the_top() {
    let mut term = TestTerm::new(2, 20);
    term.send("bottom\ntop");
    term.state.resize(4, 20);
    term.assert_visible_contents(&["", "", "bottom", "top"]);
}

#[test]
fn shrinking_truncates_from_the_top_and_keeps_the_bottom_rows() {
    let mut term = TestTerm::new(4, 20);
    term.send("a\nb\nc\nd");
    term.state.resize(2, 20);
    assert_eq!(term.visible_contents().len(), 2);
}

#[test]
fn shrinking_reclamps_margins_and_cursor_row() {
    let mut term = TestTerm::new(10, 20);
    term.cup(1, 1);
    term.state.resize(3, 20);
    assert_eq!(term.state.cursor.margin_top(), 2);
    assert!(term.state.cursor.row() <= 2);
}

#[test]
fn resize_marks_every_row_dirty() {
    let mut term = TestTerm::new(3, 20);
    term.send("hi");
    for row in 0..3 {
        let _ = term.state.screen.line(row);
    }
    term.state.resize(5, 20);
    for row in 0..5 {
        assert!(term.state.screen.line(row).is_dirty());
    }
}
