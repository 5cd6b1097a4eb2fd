//! The line buffer. Row 0 is the bottom of the visible screen, row
//! `height - 1` is the top (spec.md §3's bottom-up coordinate
//! convention) — this mirrors the source's plain list of strings
//! indexed the same way `y = row * font_height` addresses them in a
//! bottom-left-origin window.

/// A single screen line: a Unicode-scalar string plus a dirty flag.
#[derive(Debug, Clone)]
pub struct Line {
    text: String,
    dirty: bool,
}

impl Line {
    fn new() -> Self {
        Line { text: String::new(), dirty: true }
    }

    fn from_text(text: &str) -> Self {
        Line { text: text.to_string(), dirty: true }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_dirty(&mut self) {
        self.dirty = true;
    }

    fn set_clean(&mut self) {
        self.dirty = false;
    }
}

/// The ordered sequence of exactly `height` `Line`s that make up the
/// visible screen.
pub struct ScreenBuffer {
    lines: Vec<Line>,
    height: usize,
}

impl ScreenBuffer {
    pub fn new(height: usize) -> Self {
        let mut lines = Vec::with_capacity(height);
        for _ in 0..height {
            lines.push(Line::new());
        }
        ScreenBuffer { lines, height }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn line(&self, row: usize) -> &Line {
        &self.lines[row]
    }

    fn mark_dirty(&mut self, row: usize) {
        if let Some(line) = self.lines.get_mut(row) {
            line.set_dirty();
        }
    }

    /// Every dirty row, in ascending order, as `(index, text)`.
    pub fn dirty_rows(&self) -> Vec<(usize, String)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.dirty)
            .map(|(i, l)| (i, l.text.clone()))
            .collect()
    }

    pub fn clear_dirty(&mut self) {
        for line in &mut self.lines {
            line.set_clean();
        }
    }

    /// Replace `row`'s `[start, end)` slice (scalar indices) with empty.
    /// `end = None` means "to end of line". Does not move the cursor.
    pub fn splice(&mut self, row: usize, start: usize, end: Option<usize>) {
        let chars: Vec<char> = self.lines[row].text.chars().collect();
        let start = start.min(chars.len());
        let mut new_text: String = chars[..start].iter().collect();
        if let Some(end) = end {
            let end = end.min(chars.len());
            new_text.extend(&chars[end..]);
        }
        self.lines[row].text = new_text;
        self.mark_dirty(row);
    }

    /// Drop the last line, insert `text` at `index`. Marks
    /// `[index, height)` dirty. Net length stays `height`.
    ///
    /// `index` is clamped to the post-pop length, so `index == height`
    /// (e.g. `row + 1` with `row` at the top margin) appends instead of
    /// panicking — matching the source's saturating `list.insert`.
    pub fn insert_line(&mut self, index: usize, text: &str) {
        self.lines.pop();
        let index = index.min(self.lines.len());
        self.lines.insert(index, Line::from_text(text));
        for i in index..self.height {
            self.mark_dirty(i);
        }
    }

    /// Delete the line at `index`, append an empty line at the end.
    /// Marks `[index, height)` dirty.
    pub fn remove(&mut self, index: usize) {
        self.lines.remove(index);
        self.lines.push(Line::new());
        for i in index..self.height {
            self.mark_dirty(i);
        }
    }

    /// Write `text` at `(row, col)`. Pads the prefix with spaces to
    /// `col` if the line is shorter. In insert mode the tail is shifted
    /// right; otherwise it's overwritten. Returns the cursor column
    /// after the write (before any wrap-induced reset).
    ///
    /// If the *pre-write* line length was `>= width`, applies the
    /// (intentionally peculiar) wrap policy from spec.md §4.4: preserved
    /// as specified, not "fixed" — see DESIGN.md.
    pub fn write_at(
        &mut self,
        row: usize,
        col: usize,
        text: &str,
        insert_mode: bool,
        autowrap: bool,
        width: usize,
    ) -> usize {
        let before: Vec<char> = self.lines[row].text.chars().collect();
        let prefix_len = col.min(before.len());
        let mut prefix: String = before[..prefix_len].iter().collect();
        while prefix.chars().count() < col {
            prefix.push(' ');
        }

        let inserted: Vec<char> = text.chars().collect();
        let new_col = col + inserted.len();

        let tail_start = if insert_mode { col } else { new_col };
        let tail: String = if tail_start < before.len() {
            before[tail_start..].iter().collect()
        } else {
            String::new()
        };

        self.lines[row].text = format!("{}{}{}", prefix, text, tail);
        self.mark_dirty(row);

        let mut col = new_col;
        if before.len() >= width {
            if autowrap {
                self.insert_line(0, "");
                col = 0;
                let overflow: String = self.lines[row].text.chars().skip(width).collect();
                col = self.write_at(row, col, &overflow, insert_mode, autowrap, width);
                if row + 1 < self.height {
                    self.splice(row + 1, width, None);
                    self.mark_dirty(row + 1);
                }
            } else {
                self.splice(row, width, None);
            }
        }
        self.mark_dirty(row);
        col
    }

    /// Pad with empty lines at the top, or truncate from the top, to
    /// reach `new_height` (spec.md §3's "Lifecycle": resize pads/
    /// truncates at the top). Marks everything dirty.
    pub fn resize(&mut self, new_height: usize) {
        if new_height > self.lines.len() {
            for _ in self.lines.len()..new_height {
                self.lines.push(Line::new());
            }
        } else if new_height < self.lines.len() {
            self.lines.truncate(new_height);
        }
        self.height = new_height;
        for line in &mut self.lines {
            line.set_dirty();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn texts(sb: &ScreenBuffer) -> Vec<&str> {
        (0..sb.height()).map(|i| sb.line(i).text()).collect()
    }

    #[test]
    fn write_at_pads_prefix() {
        let mut sb = ScreenBuffer::new(3);
        sb.write_at(0, 2, "hi", false, false, 10);
        assert_eq!(sb.line(0).text(), "  hi");
    }

    #[test]
    fn write_at_insert_mode_shifts_tail() {
        let mut sb = ScreenBuffer::new(1);
        sb.write_at(0, 0, "abc", false, false, 10);
        sb.write_at(0, 1, "X", true, false, 10);
        assert_eq!(sb.line(0).text(), "aXbc");
    }

    #[test]
    fn write_at_overwrite_mode_replaces_tail() {
        let mut sb = ScreenBuffer::new(1);
        sb.write_at(0, 0, "abc", false, false, 10);
        sb.write_at(0, 1, "X", false, false, 10);
        assert_eq!(sb.line(0).text(), "aXc");
    }

    #[test]
    fn insert_line_drops_top_and_marks_dirty() {
        let mut sb = ScreenBuffer::new(3);
        sb.write_at(2, 0, "top", false, false, 10);
        sb.clear_dirty();
        sb.insert_line(0, "new");
        assert_eq!(texts(&sb), vec!["new", "", ""]);
        assert_eq!(sb.dirty_rows().len(), 3);
    }

    #[test]
    fn insert_line_at_height_appends_instead_of_panicking() {
        let mut sb = ScreenBuffer::new(3);
        sb.write_at(0, 0, "bottom", false, false, 10);
        sb.insert_line(3, "new");
        assert_eq!(texts(&sb), vec!["bottom", "", "new"]);
    }

    #[test]
    fn remove_appends_empty_at_end() {
        let mut sb = ScreenBuffer::new(3);
        sb.write_at(0, 0, "a", false, false, 10);
        sb.write_at(1, 0, "b", false, false, 10);
        sb.write_at(2, 0, "c", false, false, 10);
        sb.remove(1);
        assert_eq!(texts(&sb), vec!["a", "c", ""]);
    }

    #[test]
    fn splice_to_end_clears_suffix() {
        let mut sb = ScreenBuffer::new(1);
        sb.write_at(0, 0, "hello", false, false, 10);
        sb.splice(0, 2, None);
        assert_eq!(sb.line(0).text(), "he");
    }

    #[test]
    fn splice_bounded_range_clears_middle() {
        let mut sb = ScreenBuffer::new(1);
        sb.write_at(0, 0, "hello", false, false, 10);
        sb.splice(0, 1, Some(3));
        assert_eq!(sb.line(0).text(), "hlo");
    }

    #[test]
    fn write_at_without_autowrap_discards_overflow() {
        let mut sb = ScreenBuffer::new(1);
        sb.write_at(0, 0, "abcdefghij", false, false, 5);
        assert_eq!(sb.line(0).text(), "abcde");
    }

    #[test]
    fn resize_pads_at_top() {
        let mut sb = ScreenBuffer::new(2);
        sb.write_at(0, 0, "bottom", false, false, 10);
        sb.resize(4);
        assert_eq!(texts(&sb), vec!["bottom", "", "", ""]);
    }

    #[test]
    fn resize_truncates_from_top() {
        let mut sb = ScreenBuffer::new(3);
        sb.write_at(0, 0, "bottom", false, false, 10);
        sb.write_at(2, 0, "top", false, false, 10);
        sb.resize(1);
        assert_eq!(texts(&sb), vec!["bottom"]);
    }
}
