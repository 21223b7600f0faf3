//! Bidirectional term dictionary used by the substitution engine.
//!
//! A [`Dictionary`] is loaded once per conversion session and never mutated.
//! It holds two independent mappings:
//!
//! - **forward** (`cn_to_tw`): source term → canonical joined target string
//! - **reverse** (`tw_to_cn`): target term → source term
//!
//! The reverse mapping is derived by inverting every (source, one-of-targets)
//! pair, so a source with N targets yields N reverse entries. Both mappings
//! keep their insertion order, which breaks length ties during conversion.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::direction::Direction;
use crate::error::{DictionaryError, DictionaryResult, GlossaryError};
use crate::glossary::Glossary;
use crate::term::{TargetSet, TermEntry};

/// One directional mapping, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    pairs: Vec<(String, String)>,
    index: HashMap<String, usize>,
    longest_first: Vec<usize>,
}

impl Mapping {
    /// Build from ordered pairs. The first occurrence of a key wins; empty
    /// keys, empty values, and self-mappings are dropped.
    fn from_pairs(raw: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut pairs = Vec::new();
        let mut index = HashMap::new();
        for (key, value) in raw {
            if key.is_empty() || value.is_empty() || key == value {
                tracing::warn!(key = %key, value = %value, "skipping empty or self-mapping term");
                continue;
            }
            if index.contains_key(&key) {
                tracing::debug!(key = %key, value = %value, "duplicate term, keeping first mapping");
                continue;
            }
            index.insert(key.clone(), pairs.len());
            pairs.push((key, value));
        }

        // Stable: equal lengths keep mapping order.
        let mut longest_first: Vec<usize> = (0..pairs.len()).collect();
        longest_first.sort_by_key(|&i| std::cmp::Reverse(pairs[i].0.chars().count()));

        Self {
            pairs,
            index,
            longest_first,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.pairs[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs ordered by descending key length in characters, ties in
    /// mapping order.
    pub fn longest_first(&self) -> impl Iterator<Item = (&str, &str)> {
        self.longest_first.iter().map(|&i| {
            let (k, v) = &self.pairs[i];
            (k.as_str(), v.as_str())
        })
    }
}

/// Optional descriptive metadata carried by a JSON vocabulary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VocabularyMetadata {
    pub version: Option<String>,
    pub description: Option<String>,
}

/// Mapping counts and provenance, as reported by `tw-terms stats`.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub cn_to_tw_mappings: usize,
    pub tw_to_cn_mappings: usize,
    pub vocabulary_file: String,
    pub version: String,
    pub description: String,
}

/// An immutable, per-session bidirectional term dictionary.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    forward: Mapping,
    reverse: Mapping,
    source: Option<PathBuf>,
    metadata: VocabularyMetadata,
}

impl Dictionary {
    /// Load from a vocabulary file. `.json` files use the vocabulary
    /// object layout; anything else is read as a `cn,tw` CSV glossary.
    pub fn load(path: &Path) -> DictionaryResult<Self> {
        if !path.exists() {
            return Err(DictionaryError::NotFound {
                path: path.display().to_string(),
            });
        }

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut dict = if is_json {
            Self::load_json(path)?
        } else {
            let glossary = Glossary::open(path).map_err(|e| glossary_to_dictionary(path, e))?;
            Self::from_glossary(&glossary)
        };
        dict.source = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            cn_to_tw = dict.forward.len(),
            tw_to_cn = dict.reverse.len(),
            "loaded vocabulary"
        );
        Ok(dict)
    }

    /// Build both mappings from a glossary table.
    pub fn from_glossary(glossary: &Glossary) -> Self {
        let forward = glossary
            .iter()
            .map(|(s, t)| (s.to_string(), t.joined()))
            .collect::<Vec<_>>();
        Self::from_forward(forward)
    }

    /// Build from ordered `(source, joined targets)` pairs, deriving the
    /// reverse mapping by inversion.
    pub fn from_forward(forward: Vec<(String, String)>) -> Self {
        let forward = Mapping::from_pairs(forward);
        let reverse = Mapping::from_pairs(invert(&forward));
        Self {
            forward,
            reverse,
            source: None,
            metadata: VocabularyMetadata::default(),
        }
    }

    fn load_json(path: &Path) -> DictionaryResult<Self> {
        let format_err = |message: String| DictionaryError::Format {
            path: path.display().to_string(),
            message,
        };

        let data = std::fs::read_to_string(path).map_err(|e| DictionaryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&data).map_err(|e| format_err(format!("invalid JSON: {e}")))?;
        let root = value
            .as_object()
            .ok_or_else(|| format_err("top level is not an object".into()))?;

        let string_pairs = |field: &str| -> DictionaryResult<Option<Vec<(String, String)>>> {
            let Some(raw) = root.get(field) else {
                return Ok(None);
            };
            let obj = raw
                .as_object()
                .ok_or_else(|| format_err(format!("`{field}` is not an object")))?;
            obj.iter()
                .map(|(k, v)| {
                    v.as_str()
                        .map(|v| (k.clone(), v.to_string()))
                        .ok_or_else(|| format_err(format!("`{field}.{k}` is not a string")))
                })
                .collect::<DictionaryResult<Vec<_>>>()
                .map(Some)
        };

        let forward_pairs = string_pairs("cn_to_tw")?
            .ok_or_else(|| format_err("missing required field `cn_to_tw`".into()))?;
        let forward = Mapping::from_pairs(forward_pairs);
        let reverse = match string_pairs("tw_to_cn")? {
            Some(pairs) => Mapping::from_pairs(pairs),
            None => Mapping::from_pairs(invert(&forward)),
        };

        let meta = root.get("metadata");
        let meta_str = |key: &str| {
            meta.and_then(|m| m.get(key))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        let metadata = VocabularyMetadata {
            version: meta_str("version"),
            description: meta_str("description"),
        };

        Ok(Self {
            forward,
            reverse,
            source: None,
            metadata,
        })
    }

    /// The mapping active for `direction`.
    pub fn mapping(&self, direction: Direction) -> &Mapping {
        match direction {
            Direction::CnToTw => &self.forward,
            Direction::TwToCn => &self.reverse,
        }
    }

    /// Exact-match lookup.
    pub fn lookup(&self, term: &str, direction: Direction) -> Option<&str> {
        self.mapping(direction).get(term)
    }

    /// Every pair whose key or value contains `keyword`, in mapping order.
    pub fn search(&self, keyword: &str, direction: Direction) -> Vec<(&str, &str)> {
        self.mapping(direction)
            .iter()
            .filter(|(k, v)| k.contains(keyword) || v.contains(keyword))
            .collect()
    }

    pub fn size(&self, direction: Direction) -> usize {
        self.mapping(direction).len()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            cn_to_tw_mappings: self.forward.len(),
            tw_to_cn_mappings: self.reverse.len(),
            vocabulary_file: self
                .source
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(in memory)".into()),
            version: self
                .metadata
                .version
                .clone()
                .unwrap_or_else(|| "unknown".into()),
            description: self.metadata.description.clone().unwrap_or_default(),
        }
    }

    pub fn metadata(&self) -> &VocabularyMetadata {
        &self.metadata
    }
}

/// `(target, source)` for every target of every forward entry. When two
/// sources share a target, the first source in mapping order keeps it.
fn invert(forward: &Mapping) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for (source, joined) in forward.iter() {
        let Some(entry) = TermEntry::new(source, TargetSet::parse(joined)) else {
            continue;
        };
        for target in entry.targets.iter() {
            out.push((target.to_string(), entry.source.clone()));
        }
    }
    out
}

fn glossary_to_dictionary(path: &Path, err: GlossaryError) -> DictionaryError {
    let display = path.display().to_string();
    match err {
        GlossaryError::FileNotFound { .. } => DictionaryError::NotFound { path: display },
        GlossaryError::Io { source, .. } => DictionaryError::Io {
            path: display,
            source,
        },
        other => DictionaryError::Format {
            path: display,
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reverse_is_derived_per_target() {
        let dict = Dictionary::from_forward(pairs(&[("软件", "軟件;軟體"), ("程序", "程式")]));
        assert_eq!(dict.size(Direction::CnToTw), 2);
        assert_eq!(dict.size(Direction::TwToCn), 3);
        assert_eq!(dict.lookup("軟件", Direction::TwToCn), Some("软件"));
        assert_eq!(dict.lookup("軟體", Direction::TwToCn), Some("软件"));
        assert_eq!(dict.lookup("软件", Direction::CnToTw), Some("軟件;軟體"));
    }

    #[test]
    fn shared_target_keeps_first_source() {
        let dict = Dictionary::from_forward(pairs(&[("程序", "程式"), ("软件程序", "程式")]));
        assert_eq!(dict.lookup("程式", Direction::TwToCn), Some("程序"));
    }

    #[test]
    fn lookup_is_exact() {
        let dict = Dictionary::from_forward(pairs(&[("程序", "程式")]));
        assert_eq!(dict.lookup("程", Direction::CnToTw), None);
        assert_eq!(dict.lookup("程序员", Direction::CnToTw), None);
    }

    #[test]
    fn search_matches_either_side_in_order() {
        let dict = Dictionary::from_forward(pairs(&[
            ("应用程序", "應用程式"),
            ("算法", "演算法"),
            ("程序", "程式"),
        ]));
        let hits = dict.search("程", Direction::CnToTw);
        assert_eq!(hits, vec![("应用程序", "應用程式"), ("程序", "程式")]);

        let hits = dict.search("演算", Direction::CnToTw);
        assert_eq!(hits, vec![("算法", "演算法")]);
        assert!(dict.search("網路", Direction::CnToTw).is_empty());
    }

    #[test]
    fn longest_first_is_stable() {
        let dict = Dictionary::from_forward(pairs(&[
            ("开发", "開發X"),
            ("数据", "資料"),
            ("集成开发环境", "整合式開發環境"),
        ]));
        let order: Vec<&str> = dict
            .mapping(Direction::CnToTw)
            .longest_first()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(order, vec!["集成开发环境", "开发", "数据"]);
    }

    #[test]
    fn load_json_with_metadata() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terminology.json");
        std::fs::write(
            &path,
            r#"{"cn_to_tw": {"算法": "演算法", "程序": "程式"},
                "metadata": {"version": "1.2", "description": "tech terms"}}"#,
        )
        .unwrap();

        let dict = Dictionary::load(&path).unwrap();
        assert_eq!(dict.lookup("算法", Direction::CnToTw), Some("演算法"));
        assert_eq!(dict.lookup("演算法", Direction::TwToCn), Some("算法"));

        let stats = dict.statistics();
        assert_eq!(stats.cn_to_tw_mappings, 2);
        assert_eq!(stats.version, "1.2");
        assert_eq!(stats.description, "tech terms");
    }

    #[test]
    fn load_json_preserves_file_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terminology.json");
        std::fs::write(&path, r#"{"cn_to_tw": {"程序": "程式", "算法": "演算法"}}"#).unwrap();

        let dict = Dictionary::load(&path).unwrap();
        let keys: Vec<&str> = dict.mapping(Direction::CnToTw).iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["程序", "算法"]);
    }

    #[test]
    fn load_json_uses_explicit_reverse_mapping() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terminology.json");
        std::fs::write(
            &path,
            r#"{"cn_to_tw": {"程序": "程式"}, "tw_to_cn": {"程式": "程序", "軟體": "软件"}}"#,
        )
        .unwrap();

        let dict = Dictionary::load(&path).unwrap();
        assert_eq!(dict.size(Direction::TwToCn), 2);
        assert_eq!(dict.statistics().version, "unknown");
    }

    #[test]
    fn load_json_missing_field_is_format_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terminology.json");
        std::fs::write(&path, r#"{"tw_to_cn": {}}"#).unwrap();
        assert!(matches!(
            Dictionary::load(&path),
            Err(DictionaryError::Format { .. })
        ));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Dictionary::load(&path),
            Err(DictionaryError::Format { .. })
        ));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Dictionary::load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DictionaryError::NotFound { .. }));
    }

    #[test]
    fn load_csv_glossary() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terms.csv");
        std::fs::write(&path, "cn,tw\n软件,軟件;軟體\n程序,程式\n").unwrap();

        let dict = Dictionary::load(&path).unwrap();
        assert_eq!(dict.size(Direction::CnToTw), 2);
        assert_eq!(dict.size(Direction::TwToCn), 3);
        assert!(dict.statistics().vocabulary_file.ends_with("terms.csv"));
    }

    #[test]
    fn load_csv_without_header_columns_is_format_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terms.csv");
        std::fs::write(&path, "source,target\n软件,軟體\n").unwrap();
        assert!(matches!(
            Dictionary::load(&path),
            Err(DictionaryError::Format { .. })
        ));
    }
}
