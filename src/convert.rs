//! Substitution engine: rewrite free text against one dictionary direction.
//!
//! Terms are tried longest first (ties in mapping order). Each term replaces
//! *every* occurrence still present in the unconsumed parts of the text in a
//! single pass. Replaced spans are taken out of the working text, so a
//! shorter term can never match inside, or across, a span that a longer
//! term already consumed.
//!
//! Instead of splicing placeholder tokens into the string, the working text
//! is kept as a list of segments: raw text that can still match, and
//! replacements that are final. Concatenating the segments at the end is
//! the second pass.

use crate::dictionary::{Dictionary, Mapping, Statistics};
use crate::direction::Direction;
use crate::error::DirectionError;

#[derive(Debug)]
enum Segment<'a> {
    Raw(String),
    Replaced(&'a str),
}

/// Rewrite `text` using `mapping`.
///
/// Pure: never fails on any input and never touches the mapping.
pub fn substitute(mapping: &Mapping, text: &str) -> String {
    if text.is_empty() || mapping.is_empty() {
        return text.to_string();
    }

    let mut segments = vec![Segment::Raw(text.to_string())];
    for (term, replacement) in mapping.longest_first() {
        let present = segments
            .iter()
            .any(|s| matches!(s, Segment::Raw(raw) if raw.contains(term)));
        if !present {
            continue;
        }

        let mut next = Vec::with_capacity(segments.len() + 2);
        for segment in segments {
            match segment {
                Segment::Raw(raw) if raw.contains(term) => {
                    let mut last = 0;
                    for (idx, matched) in raw.match_indices(term) {
                        if idx > last {
                            next.push(Segment::Raw(raw[last..idx].to_string()));
                        }
                        next.push(Segment::Replaced(replacement));
                        last = idx + matched.len();
                    }
                    if last < raw.len() {
                        next.push(Segment::Raw(raw[last..].to_string()));
                    }
                }
                other => next.push(other),
            }
        }
        segments = next;
    }

    let mut out = String::with_capacity(text.len());
    for segment in &segments {
        match segment {
            Segment::Raw(raw) => out.push_str(raw),
            Segment::Replaced(rep) => out.push_str(rep),
        }
    }
    out
}

/// One conversion session over an owned, immutable dictionary.
///
/// Picking up glossary changes means building a new `Converter`.
#[derive(Debug, Clone)]
pub struct Converter {
    dictionary: Dictionary,
}

impl Converter {
    pub fn new(dictionary: Dictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn convert(&self, text: &str, direction: Direction) -> String {
        substitute(self.dictionary.mapping(direction), text)
    }

    /// Like [`convert`](Self::convert), with the direction given by name
    /// (`cn_to_tw` or `tw_to_cn`).
    pub fn convert_named(&self, text: &str, direction: &str) -> Result<String, DirectionError> {
        let direction = direction.parse::<Direction>()?;
        Ok(self.convert(text, direction))
    }

    pub fn lookup(&self, term: &str, direction: Direction) -> Option<&str> {
        self.dictionary.lookup(term, direction)
    }

    pub fn search(&self, keyword: &str, direction: Direction) -> Vec<(&str, &str)> {
        self.dictionary.search(keyword, direction)
    }

    pub fn statistics(&self) -> Statistics {
        self.dictionary.statistics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter(raw: &[(&str, &str)]) -> Converter {
        Converter::new(Dictionary::from_forward(
            raw.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    fn tech() -> Converter {
        converter(&[
            ("应用程序", "應用程式"),
            ("程序", "程式"),
            ("算法", "演算法"),
            ("数据", "資料"),
            ("云计算", "雲端運算"),
            ("集成开发环境", "整合式開發環境"),
            ("开发", "開發X"),
        ])
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(tech().convert("", Direction::CnToTw), "");
        assert_eq!(tech().convert("", Direction::TwToCn), "");
    }

    #[test]
    fn text_without_terms_is_unchanged() {
        let c = tech();
        for text in ["今天天氣很好", "hello world", "  \n\t", "__MARKER_0__"] {
            assert_eq!(c.convert(text, Direction::CnToTw), text);
            assert_eq!(c.convert(text, Direction::TwToCn), text);
        }
    }

    #[test]
    fn longest_match_wins() {
        let c = tech();
        assert_eq!(c.convert("集成开发环境", Direction::CnToTw), "整合式開發環境");
        assert_eq!(c.convert("开发", Direction::CnToTw), "開發X");
        assert_eq!(
            c.convert("这个应用程序的程序", Direction::CnToTw),
            "这个應用程式的程式"
        );
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let c = tech();
        assert_eq!(
            c.convert("数据和数据，算法与算法", Direction::CnToTw),
            "資料和資料，演算法与演算法"
        );
    }

    #[test]
    fn replacements_are_not_rematched() {
        // "演算法" would match "演算" if replacements were fed back in.
        let c = converter(&[("算法", "演算法"), ("演算", "推演")]);
        assert_eq!(c.convert("算法", Direction::CnToTw), "演算法");
    }

    #[test]
    fn no_match_across_consumed_span() {
        // Removing "BC" must not let "AD" match across the gap.
        let c = converter(&[("BC", "x"), ("AD", "y")]);
        assert_eq!(c.convert("ABCD", Direction::CnToTw), "AxD");
    }

    #[test]
    fn equal_length_overlap_first_in_order_wins() {
        let c = converter(&[("AB", "1"), ("BC", "2")]);
        assert_eq!(c.convert("ABC", Direction::CnToTw), "1C");
        let c = converter(&[("BC", "2"), ("AB", "1")]);
        assert_eq!(c.convert("ABC", Direction::CnToTw), "A2");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // "数据库" is 3 chars but 9 bytes; "据库ab" is 4 chars but 8 bytes.
        let c = converter(&[("数据库", "資料庫"), ("据库ab", "Z")]);
        assert_eq!(c.convert("数据库ab", Direction::CnToTw), "数Z");
    }

    #[test]
    fn reverse_direction_uses_inverted_mapping() {
        let c = converter(&[("软件", "軟件;軟體"), ("程序", "程式")]);
        assert_eq!(c.convert("軟體和程式", Direction::TwToCn), "软件和程序");
    }

    #[test]
    fn forward_output_contains_target() {
        let c = tech();
        for (s, t) in c.dictionary().mapping(Direction::CnToTw).iter() {
            assert!(c.convert(s, Direction::CnToTw).contains(t), "{s} -> {t}");
        }
    }

    #[test]
    fn round_trip_is_stable() {
        let c = tech();
        let text = "应用程序算法数据";
        let forward = c.convert(text, Direction::CnToTw);
        assert_eq!(forward, "應用程式演算法資料");
        let back = c.convert(&forward, Direction::TwToCn);
        for _ in 0..3 {
            let again = c.convert(&c.convert(text, Direction::CnToTw), Direction::TwToCn);
            assert_eq!(again, back);
        }
    }

    #[test]
    fn named_direction_rejects_unknown_value() {
        let c = tech();
        assert_eq!(c.convert_named("算法", "cn_to_tw").unwrap(), "演算法");
        assert!(matches!(
            c.convert_named("算法", "cn_to_jp"),
            Err(DirectionError::InvalidArgument { .. })
        ));
    }
}
