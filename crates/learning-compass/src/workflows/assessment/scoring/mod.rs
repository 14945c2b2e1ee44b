//! Category aggregation, style classification, and the learning profile derived from them.
//!
//! Everything here is recomputed from an assessment's responses on demand; none of it is
//! persisted.

mod aggregate;
mod classify;
mod profile;

use serde::Serialize;

use super::domain::Assessment;
use crate::workflows::questions::{CategoryFamily, QuestionBank};

pub use aggregate::{
    round_one_decimal, CategoryAggregator, CategoryMean, CategoryScoreView, CategoryScores,
    FreeTextScorer, IgnoreFreeText,
};
pub use classify::{
    rank_order, ClassificationResult, ClassificationView, RankedCategory, RankedCategoryView,
    StyleClassifier, NOT_APPLICABLE,
};
pub use profile::{
    learning_tips, EnvironmentPreference, IdealEnvironment, PreferenceLevel,
};

/// Scores and classifications for one completed assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentScoring {
    pub scores: CategoryScores,
    pub learning_style: Option<ClassificationResult>,
    pub cognitive_strength: Option<ClassificationResult>,
}

impl AssessmentScoring {
    pub fn compute<S>(bank: &QuestionBank, free_text: &S, assessment: &Assessment) -> Self
    where
        S: FreeTextScorer + ?Sized,
    {
        let scores = CategoryAggregator::new(bank, free_text).aggregate(&assessment.responses);
        let learning_style = StyleClassifier::classify(&scores, CategoryFamily::LearningStyle);
        let cognitive_strength =
            StyleClassifier::classify(&scores, CategoryFamily::CognitiveStrength);

        Self {
            scores,
            learning_style,
            cognitive_strength,
        }
    }

    pub fn tips(&self) -> Vec<&'static str> {
        learning_tips(self.learning_style.as_ref(), self.cognitive_strength.as_ref())
    }

    pub fn environment(&self) -> IdealEnvironment {
        IdealEnvironment::from_scores(&self.scores)
    }

    pub fn to_view(&self) -> ScoringView {
        ScoringView {
            category_scores: self.scores.to_view(),
            learning_style: self.learning_style.as_ref().map(ClassificationResult::to_view),
            cognitive_strength: self
                .cognitive_strength
                .as_ref()
                .map(ClassificationResult::to_view),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringView {
    pub category_scores: Vec<CategoryScoreView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_style: Option<ClassificationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognitive_strength: Option<ClassificationView>,
}
