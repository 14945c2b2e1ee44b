use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workflows::assessment::scoring::{
    AssessmentScoring, CategoryScoreView, ClassificationView, IdealEnvironment,
};
use crate::workflows::assessment::{Assessment, AssessmentId, PaymentStatus, StudentId};
use crate::workflows::questions::{CategoryFamily, Grade, GradeBand};
use crate::workflows::recommendation::RecommendationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Summary,
    Detailed,
}

impl ReportKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Detailed => "detailed",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Summary => "Learning Profile Summary",
            Self::Detailed => "Detailed Learning Profile",
        }
    }

    pub fn file_name(self, assessment_id: &AssessmentId) -> String {
        format!("{}_report_{}.html", self.as_str(), assessment_id)
    }
}

/// A finished report document, ready to be served or written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub kind: ReportKind,
    pub file_name: String,
    pub content_type: mime::Mime,
    pub body: String,
}

/// Everything a report shows, gathered from one completed assessment.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub assessment_id: AssessmentId,
    pub student_id: StudentId,
    pub grade: Grade,
    pub grade_band: GradeBand,
    pub completed_at: Option<DateTime<Utc>>,
    pub generated_at: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub learning_style_scores: Vec<CategoryScoreView>,
    pub cognitive_strength_scores: Vec<CategoryScoreView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_style: Option<ClassificationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognitive_strength: Option<ClassificationView>,
    pub tips: Vec<&'static str>,
    pub environment: IdealEnvironment,
    pub recommendation: RecommendationRecord,
}

impl ReportData {
    pub fn new(
        assessment: &Assessment,
        scoring: &AssessmentScoring,
        recommendation: RecommendationRecord,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let scores_for = |family: CategoryFamily| -> Vec<CategoryScoreView> {
            scoring
                .scores
                .family(family)
                .map(|(category, mean)| CategoryScoreView::new(category, mean))
                .collect()
        };

        Self {
            assessment_id: assessment.id.clone(),
            student_id: assessment.student_id.clone(),
            grade: assessment.grade,
            grade_band: assessment.grade_band(),
            completed_at: assessment.completed_at,
            generated_at,
            payment_status: assessment.payment_status,
            learning_style_scores: scores_for(CategoryFamily::LearningStyle),
            cognitive_strength_scores: scores_for(CategoryFamily::CognitiveStrength),
            learning_style: scoring.learning_style.as_ref().map(|result| result.to_view()),
            cognitive_strength: scoring
                .cognitive_strength
                .as_ref()
                .map(|result| result.to_view()),
            tips: scoring.tips(),
            environment: scoring.environment(),
            recommendation,
        }
    }
}
