//! Exemplar domain types.
//!
//! An exemplar is a previously solved (skeleton, implementation) pair that can
//! be shown to a model as a few-shot demonstration. Once inserted into a
//! corpus index it is never mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable, unique identifier for an exemplar.
///
/// Corpus files may use integer or string ids; both deserialize from their
/// natural JSON form. Ordering is total and is used as the retrieval
/// tie-breaker: every integer id sorts before every string id, integers
/// compare numerically and strings byte-wise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExemplarId {
    Int(i64),
    Str(String),
}

impl ExemplarId {
    /// String id, kept as given even if it looks numeric.
    pub fn new(id: impl Into<String>) -> Self {
        Self::Str(id.into())
    }

    /// Parse user input: anything that reads as an `i64` becomes an
    /// integer id, everything else a string id.
    pub fn parse(input: &str) -> Self {
        match input.parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Str(input.to_string()),
        }
    }
}

impl From<&str> for ExemplarId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ExemplarId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for ExemplarId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl std::fmt::Display for ExemplarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => f.pad(&n.to_string()),
            Self::Str(s) => f.pad(s),
        }
    }
}

/// Deserialize an optional field, treating an explicit `null` like a missing one.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Exemplar metadata: a few reserved keys plus an open bag.
///
/// `extra` is a `BTreeMap` so serialization order never depends on insertion
/// order or hasher state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExemplarMetadata {
    /// Source language of the skeleton (e.g. "python", "rust")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Where the exemplar came from (repository, benchmark split, file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Free-form labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Everything else, kept verbatim for forward compatibility
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ExemplarMetadata {
    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.source.is_none() && self.tags.is_empty() && self.extra.is_empty()
    }
}

/// A stored (skeleton, implementation) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exemplar {
    /// Unique ID within a corpus
    pub id: ExemplarId,

    /// Name of the class or unit the skeleton declares
    pub class_name: String,

    /// Source text with signatures but no bodies
    pub skeleton: String,

    /// The completed source text
    pub implementation: String,

    /// Optional metadata
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "ExemplarMetadata::is_empty"
    )]
    pub metadata: ExemplarMetadata,
}

impl Exemplar {
    /// Create an exemplar with empty metadata.
    pub fn new(
        id: impl Into<ExemplarId>,
        class_name: impl Into<String>,
        skeleton: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            class_name: class_name.into(),
            skeleton: skeleton.into(),
            implementation: implementation.into(),
            metadata: ExemplarMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ExemplarMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// One entry of a ranked retrieval. Produced per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub exemplar_id: ExemplarId,
    pub similarity_score: f32,
    /// 0-based position in the ranked list
    pub rank: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_order_bytewise() {
        let mut ids = vec![ExemplarId::from("b"), ExemplarId::from("a10"), ExemplarId::from("a2")];
        ids.sort();
        let ordered: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(ordered, vec!["a10", "a2", "b"]);
    }

    #[test]
    fn integer_ids_order_numerically_and_before_strings() {
        let mut ids = vec![
            ExemplarId::from("9"),
            ExemplarId::from(10),
            ExemplarId::from("a"),
            ExemplarId::from(9),
            ExemplarId::from(-1),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                ExemplarId::Int(-1),
                ExemplarId::Int(9),
                ExemplarId::Int(10),
                ExemplarId::from("9"),
                ExemplarId::from("a"),
            ]
        );
    }

    #[test]
    fn ids_deserialize_from_int_or_string() {
        let ids: Vec<ExemplarId> = serde_json::from_str(r#"[42, "calc", "7"]"#).unwrap();
        assert_eq!(ids, vec![ExemplarId::Int(42), ExemplarId::from("calc"), ExemplarId::from("7")]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[42,"calc","7"]"#);
        assert!(serde_json::from_str::<ExemplarId>("1.5").is_err());
    }

    #[test]
    fn parse_prefers_integers() {
        assert_eq!(ExemplarId::parse("42"), ExemplarId::Int(42));
        assert_eq!(ExemplarId::parse("calc"), ExemplarId::from("calc"));
        assert_eq!(format!("{:<4}|", ExemplarId::Int(7)), "7   |");
    }

    #[test]
    fn null_metadata_reads_as_empty() {
        let json = r#"{"id":1,"class_name":"A","skeleton":"s","implementation":"i","metadata":null}"#;
        let ex: Exemplar = serde_json::from_str(json).unwrap();
        assert!(ex.metadata.is_empty());
        assert_eq!(ex.id, ExemplarId::Int(1));
    }

    #[test]
    fn metadata_extra_is_flattened() {
        let json = r#"{"language":"python","difficulty":"easy","tags":["math"]}"#;
        let meta: ExemplarMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.language.as_deref(), Some("python"));
        assert_eq!(meta.tags, vec!["math".to_string()]);
        assert_eq!(meta.extra.get("difficulty"), Some(&serde_json::json!("easy")));
    }

    #[test]
    fn empty_metadata_is_omitted() {
        let ex = Exemplar::new("calc", "Calculator", "class Calculator: ...", "class Calculator: pass");
        let json = serde_json::to_string(&ex).unwrap();
        assert!(!json.contains("metadata"));
        let back: Exemplar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ex);
    }
}
