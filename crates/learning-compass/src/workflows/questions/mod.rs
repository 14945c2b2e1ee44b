//! Published questionnaire items and the bank that indexes them by grade band.

mod catalog;
pub mod domain;
mod import;

pub use catalog::{PublishError, QuestionBank};
pub use domain::{
    Category, CategoryFamily, Grade, GradeBand, OptionId, Question, QuestionId, QuestionKind,
    QuestionOption, QuestionValidationError, SCORE_MAX, SCORE_MIN,
};
pub use import::{QuestionBankImporter, QuestionImportError};
