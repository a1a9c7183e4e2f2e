use std::collections::HashMap;

use super::question::{Answer, Question, QuestionId, QuestionKind};

/// Decides whether `submitted` answers `question`. Missing answers and
/// answers of the wrong shape are incorrect.
pub fn is_correct(question: &Question, submitted: Option<&Answer>) -> bool {
    let Some(submitted) = submitted else {
        return false;
    };

    match (&question.kind, submitted) {
        (QuestionKind::SingleChoice { correct, .. }, Answer::Choice(choice)) => choice == correct,
        (QuestionKind::FillBlank { answer }, Answer::Text(text)) => {
            normalize(text) == normalize(answer)
        }
        (QuestionKind::Matching { pairs }, Answer::Pairs(chosen)) => pairs
            .iter()
            .enumerate()
            .all(|(i, pair)| chosen.get(&i) == Some(&pair.right)),
        (QuestionKind::TrueFalse { correct }, Answer::Flag(flag)) => flag == correct,
        _ => false,
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Score of a quiz embedded in a lesson page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LessonScore {
    pub correct: usize,

    /// questions that count towards the score
    pub scored: usize,

    /// simulated questions (matching) that are shown but never scored
    pub unscored: usize,
}

/// Lesson quizzes treat matching items as practice: they are never scored.
pub fn score_lesson_quiz(
    questions: &[Question],
    answers: &HashMap<QuestionId, Answer>,
) -> LessonScore {
    questions
        .iter()
        .fold(LessonScore::default(), |mut score, question| {
            if matches!(question.kind, QuestionKind::Matching { .. }) {
                score.unscored += 1;
            } else {
                score.scored += 1;
                if is_correct(question, answers.get(&question.id)) {
                    score.correct += 1;
                }
            }
            score
        })
}
