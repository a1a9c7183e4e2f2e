use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Identifies a question within an assessment, `"{topic-slug}-{position}"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(topic_slug: &str, position: usize) -> Self {
        Self(format!("{}-{}", topic_slug, position))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,

    /// text shown to the student
    pub prompt: String,

    pub kind: QuestionKind,
}

impl Question {
    pub fn new(id: QuestionId, prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            kind,
        }
    }

    /// every question is worth one point
    pub fn points(&self) -> u32 {
        1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    SingleChoice { options: Vec<String>, correct: usize },
    #[serde(rename = "fill-in-blank")]
    FillBlank { answer: String },
    Matching { pairs: Vec<MatchPair> },
    TrueFalse { correct: bool },
}

impl QuestionKind {
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice { .. } => "single-choice",
            QuestionKind::FillBlank { .. } => "fill-in-blank",
            QuestionKind::Matching { .. } => "matching",
            QuestionKind::TrueFalse { .. } => "true-false",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

impl MatchPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// A submitted answer. The shape must fit the question kind to be evaluated
/// as correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Choice(usize),
    Flag(bool),
    Text(String),
    /// pair index -> right-hand value chosen for it
    Pairs(BTreeMap<usize, String>),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }

    pub fn pairs<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        Answer::Pairs(values.into_iter().map(|(i, v)| (i, v.into())).collect())
    }

    /// Blank answers do not count as answered for progression.
    pub fn is_blank(&self) -> bool {
        match self {
            Answer::Text(s) => s.trim().is_empty(),
            Answer::Pairs(map) => map.is_empty(),
            Answer::Choice(_) | Answer::Flag(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_joins_slug_and_position() {
        let id = QuestionId::new("css-basics", 3);
        assert_eq!(id.as_str(), "css-basics-3");
        assert_eq!(id.to_string(), "css-basics-3");
    }

    #[test]
    fn blank_answers() {
        assert!(Answer::text("").is_blank());
        assert!(Answer::text("   ").is_blank());
        assert!(Answer::Pairs(BTreeMap::new()).is_blank());
        assert!(!Answer::text("div").is_blank());
        assert!(!Answer::Choice(0).is_blank());
        assert!(!Answer::Flag(false).is_blank());
    }

    #[test]
    fn kind_names_match_wire_tags() {
        let kind = QuestionKind::FillBlank {
            answer: "div".to_string(),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], kind.name());

        let kind = QuestionKind::TrueFalse { correct: true };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "true-false");
    }
}
