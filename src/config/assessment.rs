use anyhow::Context;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

use crate::assessment::{Assessment, MatchPair, Question, QuestionId, QuestionKind, Topic};

const DEFAULT_QUESTIONS_PER_TOPIC: usize = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuestionError {
    #[error("single-choice question needs at least one option")]
    NoOptions,

    #[error("correct_answer {index} is out of range for {count} options")]
    CorrectOutOfRange { index: usize, count: usize },

    #[error("{kind} question needs a {expected} correct_answer")]
    CorrectAnswerShape {
        kind: &'static str,
        expected: &'static str,
    },

    #[error("fill-in-blank question needs a non-empty answer")]
    EmptyAnswer,

    #[error("matching question needs at least one pair")]
    NoPairs,
}

#[derive(Deserialize, Debug)]
struct AssessmentRecord {
    title: String,
    #[serde(default = "default_questions_per_topic")]
    questions_per_topic: usize,
    topics: Vec<TopicRecord>,
}

fn default_questions_per_topic() -> usize {
    DEFAULT_QUESTIONS_PER_TOPIC
}

#[derive(Deserialize, Debug)]
struct TopicRecord {
    name: String,
    questions_per_topic: Option<usize>,
    #[serde(default)]
    questions: Vec<QuestionRecord>,
}

/// One question as written in the assessment file. Older files carry no
/// `type` and are all single-choice.
#[derive(Deserialize, Debug)]
struct QuestionRecord {
    #[serde(rename = "type")]
    kind: Option<String>,
    question: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: Option<CorrectAnswer>,
    answer: Option<String>,
    #[serde(default)]
    pairs: Vec<MatchPair>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(untagged)]
enum CorrectAnswer {
    Index(usize),
    Flag(bool),
}

impl QuestionRecord {
    fn into_kind(self) -> Result<QuestionKind, QuestionError> {
        match self.kind.as_deref() {
            Some("fill-in-blank") => match self.answer {
                Some(answer) if !answer.trim().is_empty() => Ok(QuestionKind::FillBlank { answer }),
                _ => Err(QuestionError::EmptyAnswer),
            },
            Some("matching") => {
                if self.pairs.is_empty() {
                    return Err(QuestionError::NoPairs);
                }
                Ok(QuestionKind::Matching { pairs: self.pairs })
            }
            Some("true-false") => match self.correct_answer {
                Some(CorrectAnswer::Flag(correct)) => Ok(QuestionKind::TrueFalse { correct }),
                _ => Err(QuestionError::CorrectAnswerShape {
                    kind: "true-false",
                    expected: "boolean",
                }),
            },
            Some("single-choice") => self.into_single_choice(),
            other => {
                log::warn!(
                    "question '{}' has type {:?}, reading it as single-choice",
                    self.question,
                    other
                );
                self.into_single_choice()
            }
        }
    }

    fn into_single_choice(self) -> Result<QuestionKind, QuestionError> {
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        let Some(CorrectAnswer::Index(index)) = self.correct_answer else {
            return Err(QuestionError::CorrectAnswerShape {
                kind: "single-choice",
                expected: "numeric",
            });
        };
        if index >= self.options.len() {
            return Err(QuestionError::CorrectOutOfRange {
                index,
                count: self.options.len(),
            });
        }

        Ok(QuestionKind::SingleChoice {
            options: self.options,
            correct: index,
        })
    }
}

pub fn load_assessment(path: impl AsRef<Path>) -> anyhow::Result<Assessment> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .context(format!("failed to read assessment {}", path.display()))?;
    let assessment = parse_assessment(&content)
        .context(format!("failed to parse assessment {}", path.display()))?;

    log::info!(
        "loaded assessment '{}' with {} topics from {}",
        assessment.title,
        assessment.topics.len(),
        path.display()
    );
    Ok(assessment)
}

pub fn parse_assessment(content: &str) -> anyhow::Result<Assessment> {
    let record: AssessmentRecord =
        serde_yaml_ng::from_str(content).context("assessment is not valid YAML")?;
    let mut slugger = github_slugger::Slugger::default();

    let topics = record
        .topics
        .into_iter()
        .enumerate()
        .map(|(index, topic)| {
            let slug = slugger.slug(&topic.name);
            let bank = topic
                .questions
                .into_iter()
                .enumerate()
                .map(|(position, q)| {
                    let prompt = q.question.clone();
                    let kind = q.into_kind().context(format!(
                        "question {} in topic '{}' is invalid",
                        position, &topic.name
                    ))?;
                    Ok(Question::new(QuestionId::new(&slug, position), prompt, kind))
                })
                .collect::<anyhow::Result<Vec<Question>>>()
                .context(format!("topic {} ('{}')", index, &topic.name))?;

            Ok(Topic {
                name: topic.name,
                slug,
                questions_per_topic: topic
                    .questions_per_topic
                    .unwrap_or(record.questions_per_topic),
                bank,
            })
        })
        .collect::<anyhow::Result<Vec<Topic>>>()?;

    Ok(Assessment {
        title: record.title,
        topics,
    })
}
