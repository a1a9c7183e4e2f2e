use serde::Serialize;
use std::fmt;

/// Qualitative feedback for one topic, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    Mastered,
    LightReview,
    NeedsReview,
    NeedsRestudy,
}

impl FeedbackTier {
    /// Absolute thresholds: every topic draws the same number of questions.
    pub fn classify(wrong: usize) -> Self {
        match wrong {
            0 => FeedbackTier::Mastered,
            1 => FeedbackTier::LightReview,
            2..=3 => FeedbackTier::NeedsReview,
            _ => FeedbackTier::NeedsRestudy,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FeedbackTier::Mastered => "Excellent! You have mastered this topic.",
            FeedbackTier::LightReview => "You need a light review of this topic.",
            FeedbackTier::NeedsReview => "You need to review this topic again.",
            FeedbackTier::NeedsRestudy => "You need to study the topic again.",
        }
    }
}

impl fmt::Display for FeedbackTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
