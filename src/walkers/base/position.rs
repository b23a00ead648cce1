// Byte offset -> 1-based (line, column) resolution
//
// Built once per document. Embedded regions (HTML <script>/<style>) share the
// document's index and add their region start to every offset, so positions
// always refer to the original text.

#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// 1-based line and column; the column counts characters, not bytes.
    ///
    /// Offsets past the end clamp to the end of the text, and offsets inside
    /// a multi-byte character resolve to that character.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self.text[line_start..offset].chars().count() + 1;

        (line as u32, column as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_are_one_based() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.position(0), (1, 1));
        assert_eq!(index.position(2), (2, 1));
        assert_eq!(index.position(3), (2, 2));
        assert_eq!(index.position(5), (3, 1));
        assert_eq!(index.position(6), (4, 1));
    }

    #[test]
    fn test_columns_count_characters() {
        let text = "/* é */ a {}";
        let index = LineIndex::new(text);
        let offset = text.find('a').unwrap();
        assert_eq!(index.position(offset), (1, 9));
    }

    #[test]
    fn test_out_of_range_offsets_clamp() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.position(100), (2, 3));
        let multi = LineIndex::new("é");
        assert_eq!(multi.position(1), (1, 1));
    }
}
