use rand::Rng;
use serde::Serialize;
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};
use thiserror::Error;

use super::{
    evaluate::is_correct,
    feedback::FeedbackTier,
    question::{Answer, Question, QuestionId},
    randomize::generate_set,
    topic::{Assessment, TopicSet},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    InProgress { topic: usize, question: usize },
    TopicFeedback { topic: usize },
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::InProgress { topic, question } => {
                write!(f, "in progress (topic {}, question {})", topic, question)
            }
            Phase::TopicFeedback { topic } => write!(f, "topic feedback (topic {})", topic),
            Phase::Complete => f.write_str("complete"),
        }
    }
}

/// A rejected transition. The session the caller holds is still valid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while {found}")]
    WrongPhase { action: &'static str, found: Phase },

    #[error("question '{0}' has no answer yet")]
    Unanswered(QuestionId),

    #[error("question '{0}' is not part of the current topic")]
    UnknownQuestion(QuestionId),
}

/// Outcome of one topic, as shown on the topic-complete screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicResult {
    pub topic: usize,
    pub name: String,
    pub wrong: usize,
    pub total: usize,
    pub tier: FeedbackTier,
}

impl TopicResult {
    pub fn correct(&self) -> usize {
        self.total.saturating_sub(self.wrong)
    }
}

impl fmt::Display for TopicResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct(), self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub results: Vec<TopicResult>,
}

impl Summary {
    pub fn total_correct(&self) -> usize {
        self.results.iter().map(TopicResult::correct).sum()
    }

    pub fn total_questions(&self) -> usize {
        self.results.iter().map(|r| r.total).sum()
    }
}

/// Assessment progression. Transitions never mutate: each one returns the
/// next session, or an error and the caller keeps the current one.
#[derive(Debug, Clone)]
pub struct Session {
    sets: Arc<[TopicSet]>,
    phase: Phase,
    answers: HashMap<QuestionId, Answer>,

    /// topic index -> wrong answers, for evaluated topics
    wrong_counts: BTreeMap<usize, usize>,
}

impl Session {
    /// Draws every topic's question set up front.
    pub fn new<R>(assessment: &Assessment, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let sets: Vec<TopicSet> = assessment
            .topics
            .iter()
            .enumerate()
            .map(|(index, topic)| generate_set(index, topic, rng))
            .collect();

        log::debug!(
            "new session for '{}' with {} topics",
            assessment.title,
            sets.len()
        );
        Self::from_sets(sets)
    }

    /// Starts a session over question sets generated elsewhere.
    pub fn from_sets(sets: Vec<TopicSet>) -> Self {
        Self::from_shared(sets.into())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sets(&self) -> &[TopicSet] {
        &self.sets
    }

    pub fn current_set(&self) -> Option<&TopicSet> {
        match self.phase {
            Phase::InProgress { topic, .. } | Phase::TopicFeedback { topic } => {
                self.sets.get(topic)
            }
            Phase::Complete => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::InProgress { topic, question } => {
                self.sets.get(topic).and_then(|s| s.questions.get(question))
            }
            _ => None,
        }
    }

    pub fn answer(&self, id: &QuestionId) -> Option<&Answer> {
        self.answers.get(id)
    }

    pub fn is_answered(&self, id: &QuestionId) -> bool {
        self.answers.get(id).is_some_and(|a| !a.is_blank())
    }

    /// Whether `advance` would be accepted.
    pub fn can_advance(&self) -> bool {
        match self.phase {
            Phase::InProgress { .. } => self
                .current_question()
                .map_or(true, |q| self.is_answered(&q.id)),
            _ => false,
        }
    }

    pub fn submit_answer(&self, id: &QuestionId, answer: Answer) -> Result<Session, SessionError> {
        if !matches!(self.phase, Phase::InProgress { .. }) {
            return Err(SessionError::WrongPhase {
                action: "submit an answer",
                found: self.phase,
            });
        }
        if !self.current_set().is_some_and(|s| s.contains(id)) {
            return Err(SessionError::UnknownQuestion(id.clone()));
        }

        let mut next = self.clone();
        next.answers.insert(id.clone(), answer);
        Ok(next)
    }

    pub fn advance(&self) -> Result<Session, SessionError> {
        let Phase::InProgress { topic, question } = self.phase else {
            return Err(SessionError::WrongPhase {
                action: "advance",
                found: self.phase,
            });
        };

        if let Some(current) = self.current_question() {
            if !self.is_answered(&current.id) {
                return Err(SessionError::Unanswered(current.id.clone()));
            }
        }

        let mut next = self.clone();
        let set_len = self.sets.get(topic).map_or(0, TopicSet::len);
        if question + 1 < set_len {
            next.phase = Phase::InProgress {
                topic,
                question: question + 1,
            };
            return Ok(next);
        }

        let wrong = self.count_wrong(topic);
        log::debug!("topic {} evaluated: {} of {} wrong", topic, wrong, set_len);
        next.wrong_counts.insert(topic, wrong);
        next.phase = Phase::TopicFeedback { topic };
        Ok(next)
    }

    pub fn continue_to_next_topic(&self) -> Result<Session, SessionError> {
        let Phase::TopicFeedback { topic } = self.phase else {
            return Err(SessionError::WrongPhase {
                action: "continue to the next topic",
                found: self.phase,
            });
        };

        let mut next = self.clone();
        next.phase = if topic + 1 >= self.sets.len() {
            log::debug!("assessment complete");
            Phase::Complete
        } else {
            Phase::InProgress {
                topic: topic + 1,
                question: 0,
            }
        };
        Ok(next)
    }

    /// Back to the first question with the same question sets. Drawing new
    /// sets means building a new session.
    pub fn restart(&self) -> Session {
        log::debug!("restarting session from {}", self.phase);
        Self::from_shared(self.sets.clone())
    }

    fn from_shared(sets: Arc<[TopicSet]>) -> Self {
        let phase = if sets.is_empty() {
            Phase::Complete
        } else {
            Phase::InProgress {
                topic: 0,
                question: 0,
            }
        };

        Self {
            sets,
            phase,
            answers: HashMap::new(),
            wrong_counts: BTreeMap::new(),
        }
    }

    fn count_wrong(&self, topic: usize) -> usize {
        self.sets.get(topic).map_or(0, |set| {
            set.questions
                .iter()
                .filter(|q| !is_correct(q, self.answers.get(&q.id)))
                .count()
        })
    }

    pub fn wrong_count(&self, topic: usize) -> Option<usize> {
        self.wrong_counts.get(&topic).copied()
    }

    /// Result of an evaluated topic.
    pub fn topic_result(&self, topic: usize) -> Option<TopicResult> {
        let wrong = self.wrong_count(topic)?;
        let set = self.sets.get(topic)?;
        Some(TopicResult {
            topic,
            name: set.name.clone(),
            wrong,
            total: set.len(),
            tier: FeedbackTier::classify(wrong),
        })
    }

    /// Available once the session is complete.
    pub fn summary(&self) -> Option<Summary> {
        if self.phase != Phase::Complete {
            return None;
        }

        let results = (0..self.sets.len())
            .map(|topic| self.topic_result(topic))
            .collect::<Option<Vec<_>>>()?;
        Some(Summary { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::QuestionKind;

    fn true_false_set(topic: usize, name: &str, size: usize) -> TopicSet {
        TopicSet {
            topic,
            name: name.to_string(),
            questions: (0..size)
                .map(|i| {
                    Question::new(
                        QuestionId::new(&name.to_lowercase(), i),
                        format!("{} statement {}", name, i),
                        QuestionKind::TrueFalse { correct: true },
                    )
                })
                .collect(),
        }
    }

    /// Answers every question of the current topic, `wrong` of them wrongly,
    /// and advances past the last one.
    fn answer_topic(mut session: Session, wrong: usize) -> Session {
        let mut answered = 0;
        while let Some(question) = session.current_question().cloned() {
            let answer = Answer::Flag(answered >= wrong);
            session = session.submit_answer(&question.id, answer).unwrap();
            session = session.advance().unwrap();
            answered += 1;
            if matches!(session.phase(), Phase::TopicFeedback { .. }) {
                break;
            }
        }
        session
    }

    #[test]
    fn starts_at_first_question() {
        let session = Session::from_sets(vec![true_false_set(0, "HTML", 3)]);
        assert_eq!(
            session.phase(),
            Phase::InProgress {
                topic: 0,
                question: 0
            }
        );
        assert_eq!(session.current_question().unwrap().id.as_str(), "html-0");
    }

    #[test]
    fn no_topics_is_already_complete() {
        let session = Session::from_sets(Vec::new());
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.summary().unwrap().results, Vec::new());
    }

    #[test]
    fn submitting_does_not_move() {
        let session = Session::from_sets(vec![true_false_set(0, "HTML", 3)]);
        let id = QuestionId::new("html", 0);
        let next = session.submit_answer(&id, Answer::Flag(true)).unwrap();

        assert_eq!(next.phase(), session.phase());
        assert_eq!(next.answer(&id), Some(&Answer::Flag(true)));
        assert_eq!(session.answer(&id), None, "original is untouched");
    }

    #[test]
    fn advance_requires_an_answer() {
        let session = Session::from_sets(vec![true_false_set(0, "HTML", 3)]);
        assert!(!session.can_advance());
        assert_eq!(
            session.advance().unwrap_err(),
            SessionError::Unanswered(QuestionId::new("html", 0))
        );
    }

    #[test]
    fn blank_text_counts_as_unanswered() {
        let set = TopicSet {
            topic: 0,
            name: "CSS".to_string(),
            questions: vec![Question::new(
                QuestionId::new("css", 0),
                "CSS stands for?",
                QuestionKind::FillBlank {
                    answer: "Cascading Style Sheets".to_string(),
                },
            )],
        };
        let session = Session::from_sets(vec![set]);
        let session = session
            .submit_answer(&QuestionId::new("css", 0), Answer::text("  "))
            .unwrap();
        assert!(matches!(
            session.advance(),
            Err(SessionError::Unanswered(_))
        ));
    }

    #[test]
    fn unknown_question_is_rejected() {
        let session = Session::from_sets(vec![
            true_false_set(0, "HTML", 2),
            true_false_set(1, "CSS", 2),
        ]);
        let err = session
            .submit_answer(&QuestionId::new("css", 0), Answer::Flag(true))
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownQuestion(QuestionId::new("css", 0)));
    }

    #[test]
    fn last_question_evaluates_topic() {
        let session = Session::from_sets(vec![true_false_set(0, "HTML", 5)]);
        let session = answer_topic(session, 2);

        assert_eq!(session.phase(), Phase::TopicFeedback { topic: 0 });
        let result = session.topic_result(0).unwrap();
        assert_eq!(result.wrong, 2);
        assert_eq!(result.tier, FeedbackTier::NeedsReview);
        assert_eq!(result.to_string(), "3/5");
    }

    #[test]
    fn feedback_blocks_answers_and_advance() {
        let session = answer_topic(Session::from_sets(vec![true_false_set(0, "HTML", 1)]), 0);
        assert!(matches!(
            session.advance(),
            Err(SessionError::WrongPhase { .. })
        ));
        assert!(matches!(
            session.submit_answer(&QuestionId::new("html", 0), Answer::Flag(false)),
            Err(SessionError::WrongPhase { .. })
        ));
    }

    #[test]
    fn continue_moves_to_next_topic_then_completes() {
        let session = Session::from_sets(vec![
            true_false_set(0, "HTML", 2),
            true_false_set(1, "CSS", 2),
        ]);
        assert!(session.continue_to_next_topic().is_err());

        let session = answer_topic(session, 0);
        let session = session.continue_to_next_topic().unwrap();
        assert_eq!(
            session.phase(),
            Phase::InProgress {
                topic: 1,
                question: 0
            }
        );
        assert!(session.summary().is_none());

        let session = answer_topic(session, 1);
        let session = session.continue_to_next_topic().unwrap();
        assert_eq!(session.phase(), Phase::Complete);

        let summary = session.summary().unwrap();
        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.results[0].tier, FeedbackTier::Mastered);
        assert_eq!(summary.results[1].tier, FeedbackTier::LightReview);
        assert_eq!(summary.total_correct(), 3);
        assert_eq!(summary.total_questions(), 4);
    }

    #[test]
    fn empty_topic_goes_straight_to_feedback() {
        let session = Session::from_sets(vec![true_false_set(0, "HTML", 0)]);
        assert!(session.can_advance());
        let session = session.advance().unwrap();
        assert_eq!(session.phase(), Phase::TopicFeedback { topic: 0 });
        assert_eq!(session.wrong_count(0), Some(0));
    }

    #[test]
    fn restart_replays_the_same_sets() {
        let session = Session::from_sets(vec![
            true_false_set(0, "HTML", 2),
            true_false_set(1, "CSS", 2),
        ]);
        let progressed = answer_topic(session, 1).continue_to_next_topic().unwrap();

        let restarted = progressed.restart();
        assert_eq!(
            restarted.phase(),
            Phase::InProgress {
                topic: 0,
                question: 0
            }
        );
        assert_eq!(restarted.wrong_count(0), None);
        assert_eq!(restarted.answer(&QuestionId::new("html", 0)), None);
        assert!(Arc::ptr_eq(&restarted.sets, &progressed.sets));
    }
}
