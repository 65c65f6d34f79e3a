//! Generic record index over tab-separated tables
//!
//! Every input of the pipeline is a tab-separated table with comment rows and
//! header rows marked by their leading character. [`read_records`] walks such
//! a table and hands each data row to a callback as a zero-copy
//! [`RecordView`]; [`RecordIndex`] is the keyed lookup table the callbacks
//! build. Lookups return `Option` so that misses can be skipped.

use crate::core::error::{ParseError, ParseResult};
use crate::core::io::ByteLineIterator;
use memchr::memchr;
use std::collections::HashMap;
use std::io::BufRead;

/// Legacy comment markers
pub const COMMENT_MARKERS: &[u8] = b"#";

/// Legacy header markers (`probe_id...`, `probeset_id...`, `Affy...`)
pub const HEADER_MARKERS: &[u8] = b"pA";

/// Leading characters that classify a row as comment or header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMarkers {
    pub comment: Vec<u8>,
    pub header: Vec<u8>,
}

impl Default for LineMarkers {
    fn default() -> Self {
        Self {
            comment: COMMENT_MARKERS.to_vec(),
            header: HEADER_MARKERS.to_vec(),
        }
    }
}

/// Classification of a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Header,
    Data,
}

impl LineMarkers {
    /// Classify a row by its first byte
    pub fn classify(&self, line: &[u8]) -> LineKind {
        match line.first() {
            None => LineKind::Blank,
            Some(b) if self.comment.contains(b) => LineKind::Comment,
            Some(b) if self.header.contains(b) => LineKind::Header,
            Some(_) if line.iter().all(|b| b.is_ascii_whitespace()) => LineKind::Blank,
            Some(_) => LineKind::Data,
        }
    }
}

/// What to do with header rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// Drop header rows
    Skip,
    /// Keep the first header row verbatim, drop any others
    Capture,
}

/// Zero-copy view over one tab-separated data row
pub struct RecordView<'a> {
    line: &'a str,
    line_number: usize,
    field_bounds: Vec<(usize, usize)>,
}

impl<'a> RecordView<'a> {
    /// Split a row on tabs
    pub fn parse(line: &'a str, line_number: usize) -> Self {
        let bytes = line.as_bytes();
        let mut field_bounds = Vec::with_capacity(16);
        let mut start = 0;

        while let Some(tab) = memchr(b'\t', &bytes[start..]) {
            field_bounds.push((start, start + tab));
            start += tab + 1;
        }
        field_bounds.push((start, bytes.len()));

        Self {
            line,
            line_number,
            field_bounds,
        }
    }

    /// 1-based line number of this row in its file
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The complete row, without its line terminator
    pub fn line(&self) -> &'a str {
        self.line
    }

    pub fn field_count(&self) -> usize {
        self.field_bounds.len()
    }

    /// Get field as string slice
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.field_bounds
            .get(index)
            .map(|&(start, end)| &self.line[start..end])
    }

    /// Get a field that the format requires
    pub fn require(&self, index: usize) -> ParseResult<&'a str> {
        self.field(index).ok_or(ParseError::TooFewFields {
            line: self.line_number,
            expected: index + 1,
            found: self.field_count(),
        })
    }

    /// Fail unless the row has at least `expected` fields
    pub fn expect_fields(&self, expected: usize) -> ParseResult<()> {
        if self.field_count() < expected {
            return Err(ParseError::TooFewFields {
                line: self.line_number,
                expected,
                found: self.field_count(),
            });
        }
        Ok(())
    }

    /// Parse a required numeric field
    pub fn parse_field<T: std::str::FromStr>(
        &self,
        index: usize,
        name: &'static str,
    ) -> ParseResult<T> {
        let value = self.require(index)?;
        value
            .trim()
            .parse()
            .map_err(|_| ParseError::invalid_number(name, value, self.line_number))
    }

    /// Fields from `index` to the end of the row
    pub fn fields_from(&self, index: usize) -> impl Iterator<Item = &'a str> + '_ {
        self.field_bounds
            .iter()
            .skip(index)
            .map(move |&(start, end)| &self.line[start..end])
    }
}

/// Walk a table, passing each data row to `on_record`
///
/// Comment and blank rows are dropped. Header rows are dropped or, with
/// [`HeaderPolicy::Capture`], the first one is returned verbatim.
pub fn read_records<R, F>(
    reader: R,
    markers: &LineMarkers,
    policy: HeaderPolicy,
    mut on_record: F,
) -> ParseResult<Option<String>>
where
    R: BufRead,
    F: FnMut(&RecordView<'_>) -> ParseResult<()>,
{
    let mut lines = ByteLineIterator::new(reader);
    let mut header: Option<String> = None;
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_number += 1;

        match markers.classify(line) {
            LineKind::Blank | LineKind::Comment => continue,
            LineKind::Header => {
                if policy == HeaderPolicy::Capture {
                    let text = std::str::from_utf8(line)
                        .map_err(|_| ParseError::InvalidUtf8 { line: line_number })?
                        .trim_end();
                    match header {
                        None => header = Some(text.to_string()),
                        Some(_) => log::warn!(
                            "Ignoring extra header row at line {}",
                            line_number
                        ),
                    }
                }
            }
            LineKind::Data => {
                let text = std::str::from_utf8(line)
                    .map_err(|_| ParseError::InvalidUtf8 { line: line_number })?
                    .trim_end_matches([' ', '\t', '\r']);
                on_record(&RecordView::parse(text, line_number))?;
            }
        }
    }

    Ok(header)
}

/// Keyed lookup table built from one input file
///
/// Iteration follows first-insertion order so output is reproducible.
#[derive(Debug, Clone)]
pub struct RecordIndex<V> {
    entries: HashMap<String, V>,
    order: Vec<String>,
    header: Option<String>,
}

impl<V> Default for RecordIndex<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            header: None,
        }
    }
}

impl<V> RecordIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single record; a later record with the same key replaces it
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, value);
    }

    /// Look up a key; misses are expected and return `None`
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The captured header row, if any
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn set_header(&mut self, header: Option<String>) {
        self.header = header;
    }

    /// Keys in first-insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.order
            .iter()
            .filter_map(move |key| self.entries.get(key).map(|v| (key.as_str(), v)))
    }
}

impl<T> RecordIndex<Vec<T>> {
    /// Append a sub-record to the list kept under `key`
    pub fn push(&mut self, key: &str, item: T) {
        match self.entries.get_mut(key) {
            Some(items) => items.push(item),
            None => self.insert(key, vec![item]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn test_classify_lines() {
        let markers = LineMarkers::default();
        assert_eq!(markers.classify(b""), LineKind::Blank);
        assert_eq!(markers.classify(b"  \t"), LineKind::Blank);
        assert_eq!(markers.classify(b"#%chip_type=HuEx"), LineKind::Comment);
        assert_eq!(markers.classify(b"probe_id\tx"), LineKind::Header);
        assert_eq!(markers.classify(b"Affy\tx"), LineKind::Header);
        assert_eq!(markers.classify(b"123\t4"), LineKind::Data);
    }

    #[test]
    fn test_record_view_fields() {
        let view = RecordView::parse("a\tb\t\td", 4);
        assert_eq!(view.field_count(), 4);
        assert_eq!(view.field(0), Some("a"));
        assert_eq!(view.field(2), Some(""));
        assert_eq!(view.field(4), None);
        assert_eq!(view.fields_from(1).collect::<Vec<_>>(), vec!["b", "", "d"]);
        assert_eq!(view.line_number(), 4);
    }

    #[test]
    fn test_require_reports_line() {
        let view = RecordView::parse("a\tb", 12);
        match view.require(5) {
            Err(ParseError::TooFewFields { line, expected, found }) => {
                assert_eq!((line, expected, found), (12, 6, 2));
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_parse_field_number() {
        let view = RecordView::parse("7\tx", 1);
        assert_eq!(view.parse_field::<u32>(0, "count").unwrap(), 7);
        assert!(matches!(
            view.parse_field::<u32>(1, "count"),
            Err(ParseError::InvalidNumber { field: "count", .. })
        ));
    }

    #[test]
    fn test_read_records_captures_first_header() {
        let data = "#comment\nprobe_id\tx\n1\t2\nprobe_id\tdup\n\n3\t4\r\n";
        let mut keys = Vec::new();
        let header = read_records(
            BufReader::new(data.as_bytes()),
            &LineMarkers::default(),
            HeaderPolicy::Capture,
            |view| {
                keys.push((view.require(0)?.to_string(), view.line_number()));
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(header.as_deref(), Some("probe_id\tx"));
        assert_eq!(keys, vec![("1".to_string(), 3), ("3".to_string(), 6)]);
    }

    #[test]
    fn test_read_records_skip_policy() {
        let data = "probe_id\tx\n1\t2\n";
        let header = read_records(
            BufReader::new(data.as_bytes()),
            &LineMarkers::default(),
            HeaderPolicy::Skip,
            |_| Ok(()),
        )
        .unwrap();
        assert!(header.is_none());
    }

    #[test]
    fn test_index_preserves_insertion_order() {
        let mut index = RecordIndex::new();
        index.insert("b", 1);
        index.insert("a", 2);
        index.insert("b", 3);

        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(index.get("b"), Some(&3));
        assert_eq!(index.get("missing"), None);
    }

    #[test]
    fn test_index_push_accumulates() {
        let mut index: RecordIndex<Vec<&str>> = RecordIndex::new();
        index.push("k", "x");
        index.push("k", "x");
        index.push("j", "y");

        assert_eq!(index.get("k"), Some(&vec!["x", "x"]));
        assert_eq!(index.len(), 2);
    }
}
