use serde::Serialize;

use super::question::{Question, QuestionId};

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub title: String,

    /// topics in presentation order
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    pub name: String,

    /// unique within the assessment
    pub slug: String,

    /// how many questions a session draws from the bank
    pub questions_per_topic: usize,

    /// candidate questions
    pub bank: Vec<Question>,
}

/// The questions one session presents for one topic.
#[derive(Debug, Clone, Serialize)]
pub struct TopicSet {
    pub topic: usize,
    pub name: String,
    pub questions: Vec<Question>,
}

impl TopicSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.questions.iter().any(|q| &q.id == id)
    }
}
