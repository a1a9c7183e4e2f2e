mod assessment;
mod env;

pub use assessment::{load_assessment, parse_assessment, QuestionError};
pub use env::Config;
