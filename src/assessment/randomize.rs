use rand::{seq::SliceRandom, Rng};

use super::{
    question::{MatchPair, Question, QuestionKind},
    topic::{Topic, TopicSet},
};

/// Draws `min(count, bank.len())` distinct questions in random order.
pub fn select_questions<R>(bank: &[Question], count: usize, rng: &mut R) -> Vec<Question>
where
    R: Rng + ?Sized,
{
    let mut picked = bank.to_vec();
    picked.shuffle(rng);
    picked.truncate(count);
    picked
}

/// Permutes the options of a single-choice question, remapping the correct
/// index to the same option value. Other kinds come back unchanged.
pub fn shuffle_options<R>(question: &Question, rng: &mut R) -> Question
where
    R: Rng + ?Sized,
{
    let QuestionKind::SingleChoice { options, correct } = &question.kind else {
        return question.clone();
    };

    let mut order: Vec<usize> = (0..options.len()).collect();
    order.shuffle(rng);

    // an out of range index has no option to follow
    let Some(remapped) = order.iter().position(|&i| i == *correct) else {
        return question.clone();
    };

    Question {
        kind: QuestionKind::SingleChoice {
            options: order.iter().map(|&i| options[i].clone()).collect(),
            correct: remapped,
        },
        ..question.clone()
    }
}

pub fn generate_set<R>(index: usize, topic: &Topic, rng: &mut R) -> TopicSet
where
    R: Rng + ?Sized,
{
    if topic.bank.len() < topic.questions_per_topic {
        log::warn!(
            "topic '{}' has {} questions, fewer than the {} requested",
            topic.name,
            topic.bank.len(),
            topic.questions_per_topic
        );
    }

    let questions = select_questions(&topic.bank, topic.questions_per_topic, rng)
        .iter()
        .map(|q| shuffle_options(q, rng))
        .collect();

    TopicSet {
        topic: index,
        name: topic.name.clone(),
        questions,
    }
}

/// The right-hand column of a matching question, in presentation order.
pub fn shuffled_right_values<R>(pairs: &[MatchPair], rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let mut values: Vec<String> = pairs.iter().map(|p| p.right.clone()).collect();
    values.shuffle(rng);
    values
}
