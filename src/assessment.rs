mod evaluate;
mod feedback;
mod question;
mod randomize;
mod session;
mod topic;

pub use evaluate::{is_correct, score_lesson_quiz, LessonScore};
pub use feedback::FeedbackTier;
pub use question::{Answer, MatchPair, Question, QuestionId, QuestionKind};
pub use randomize::{generate_set, select_questions, shuffle_options, shuffled_right_values};
pub use session::{Phase, Session, SessionError, Summary, TopicResult};
pub use topic::{Assessment, Topic, TopicSet};
