//! Line/column positions, ranges and the mapping between flat offsets and positions.

use derive_more::Display;
use std::cmp::Ordering;

/// Position of a character in a document. Both line and character are zero-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Display)]
#[display("{line}:{character}")]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    pub fn at_or_before(&self, other: &Position) -> bool {
        self <= other
    }

    pub fn at_or_after(&self, other: &Position) -> bool {
        self >= other
    }

    pub fn is_before(&self, other: &Position) -> bool {
        self < other
    }

    pub fn is_after(&self, other: &Position) -> bool {
        self > other
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line.cmp(&other.line).then(self.character.cmp(&other.character))
    }
}

/// A range of a document. Both ends are inclusive when testing containment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
#[display("[{start}, {end}]")]
pub struct PddlRange {
    pub start: Position,
    pub end: Position,
}

impl PddlRange {
    pub fn new(start_line: u32, start_character: u32, end_line: u32, end_character: u32) -> Self {
        Self::from_positions(
            Position::new(start_line, start_character),
            Position::new(end_line, end_character),
        )
    }

    pub fn from_positions(start: Position, end: Position) -> Self {
        debug_assert!(start.at_or_before(&end), "range ends before it starts: {start} > {end}");
        Self { start, end }
    }

    pub fn single_point(position: Position) -> Self {
        Self::from_positions(position, position)
    }

    pub fn from_offsets(resolver: &dyn PositionResolver, start: usize, end: usize) -> Self {
        resolver.resolve_to_range(start, end)
    }

    pub fn includes(&self, position: &Position) -> bool {
        self.start.at_or_before(position) && position.at_or_before(&self.end)
    }

    pub fn includes_range(&self, other: &PddlRange) -> bool {
        self.includes(&other.start) && self.includes(&other.end)
    }

    /// True if this range ends at or before the start of `other`.
    pub fn is_before(&self, other: &PddlRange) -> bool {
        self.end.at_or_before(&other.start)
    }

    pub fn overlaps(&self, other: &PddlRange) -> bool {
        self.start.at_or_before(&other.end) && other.start.at_or_before(&self.end)
    }
}

/// Bidirectional mapping between byte offsets of a text and line/column positions.
///
/// Implementations must satisfy `resolve_to_offset(resolve_to_position(o)) == o` for any
/// offset `o` in `0..=text.len()`. Offsets beyond the text are a caller error.
pub trait PositionResolver: Send + Sync {
    fn resolve_to_position(&self, offset: usize) -> Position;

    fn resolve_to_offset(&self, position: Position) -> usize;

    fn resolve_to_range(&self, start: usize, end: usize) -> PddlRange {
        PddlRange::from_positions(self.resolve_to_position(start), self.resolve_to_position(end))
    }
}

/// Position resolver over a snapshot of a document.
///
/// Line starts are computed once. A line ends with `\n`; a `\r` immediately preceding it is part
/// of the terminator, so `\r\n` and `\n` endings may be freely mixed.
#[derive(Clone, Debug)]
pub struct DocumentPositionResolver {
    /// Offset of the first character of each line. Always starts with `0`.
    line_starts: Vec<usize>,
    len: usize,
}

impl DocumentPositionResolver {
    pub fn new(text: &str) -> Self {
        // a `\r` preceding the `\n` is simply left at the end of its line
        let line_starts = std::iter::once(0)
            .chain(text.bytes().enumerate().filter(|(_, b)| *b == b'\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Length of the text this resolver was built from.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of the first character of the given line.
    pub fn line_start(&self, line: u32) -> usize {
        self.line_starts[line as usize]
    }
}

impl PositionResolver for DocumentPositionResolver {
    fn resolve_to_position(&self, offset: usize) -> Position {
        assert!(offset <= self.len, "offset {offset} is beyond the end of the text ({})", self.len);
        // index of the last line starting at or before the offset
        let line = self.line_starts.partition_point(|start| *start <= offset) - 1;
        let character = offset - self.line_starts[line];
        Position::new(line as u32, character as u32)
    }

    fn resolve_to_offset(&self, position: Position) -> usize {
        let line = position.line as usize;
        assert!(line < self.line_starts.len(), "line {line} is beyond the end of the text");
        let start = self.line_starts[line];
        // a position on the terminator of a line (e.g. on the `\n` of a `\r\n`) is still a valid offset
        let end = match self.line_starts.get(line + 1) {
            Some(next_start) => next_start - 1,
            None => self.len,
        };
        let offset = start + position.character as usize;
        assert!(offset <= end, "position {position} is beyond the end of its line");
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(text: &str) {
        let resolver = DocumentPositionResolver::new(text);
        for offset in 0..=text.len() {
            let pos = resolver.resolve_to_position(offset);
            assert_eq!(resolver.resolve_to_offset(pos), offset, "offset {offset} -> {pos} in {text:?}");
        }
    }

    #[test]
    fn offsets_round_trip() {
        round_trip("");
        round_trip("(define (domain d))");
        round_trip("line1\nline2\n\nline4");
        round_trip("line1\r\nline2\r\n");
        round_trip("mixed\r\nendings\nhere\r\n\n;last");
    }

    #[test]
    fn crlf_counts_as_one_line_break() {
        let resolver = DocumentPositionResolver::new("ab\r\ncd\nef");
        assert_eq!(resolver.resolve_to_position(0), Position::new(0, 0));
        assert_eq!(resolver.resolve_to_position(4), Position::new(1, 0));
        assert_eq!(resolver.resolve_to_position(5), Position::new(1, 1));
        assert_eq!(resolver.resolve_to_position(7), Position::new(2, 0));
        assert_eq!(resolver.resolve_to_offset(Position::new(2, 2)), 9);
        assert_eq!(resolver.line_count(), 3);
    }

    #[test]
    #[should_panic]
    fn offset_out_of_range() {
        let resolver = DocumentPositionResolver::new("abc");
        resolver.resolve_to_position(4);
    }

    #[test]
    fn position_ordering() {
        let a = Position::new(1, 5);
        let b = Position::new(2, 0);
        assert!(a.at_or_before(&a));
        assert!(a.at_or_before(&b));
        assert!(!b.at_or_before(&a));
        assert!(b.is_after(&a));
        assert!(Position::new(1, 1).is_before(&Position::new(1, 2)));
    }

    #[test]
    fn single_point_range_includes_its_point() {
        let range = PddlRange::new(1, 1, 1, 1);
        assert!(range.includes(&Position::new(1, 1)));
        assert!(!range.includes(&Position::new(10, 10)));
    }

    #[test]
    fn range_relations() {
        let outer = PddlRange::new(0, 0, 5, 0);
        let inner = PddlRange::new(1, 2, 2, 3);
        let after = PddlRange::new(5, 0, 6, 0);
        assert!(outer.includes_range(&inner));
        assert!(!inner.includes_range(&outer));
        assert!(outer.is_before(&after));
        assert!(outer.overlaps(&after));
        assert!(!inner.overlaps(&after));
    }

    #[test]
    fn range_from_offsets() {
        let resolver = DocumentPositionResolver::new("(a\n b)");
        let range = PddlRange::from_offsets(&resolver, 0, 5);
        assert_eq!(range, PddlRange::new(0, 0, 1, 2));
    }
}
