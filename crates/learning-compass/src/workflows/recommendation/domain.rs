use serde::Serialize;

use crate::workflows::questions::{Category, Grade, GradeBand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

/// Static course description stored in the recommendation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseTemplate {
    pub name: &'static str,
    pub subject: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub duration_weeks: u8,
}

/// Table row: everything recommended for one (style, band) pair or for the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationEntry {
    pub courses: Vec<CourseTemplate>,
    pub learning_path: &'static str,
    pub careers: Vec<&'static str>,
    pub colleges: Vec<&'static str>,
    pub exams: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStage {
    Foundation,
    Expansion,
    Mastery,
}

impl JourneyStage {
    pub const fn ordered() -> [Self; 3] {
        [Self::Foundation, Self::Expansion, Self::Mastery]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Foundation => "Foundation",
            Self::Expansion => "Expansion",
            Self::Mastery => "Mastery",
        }
    }

    pub const fn duration_weeks(self) -> u8 {
        match self {
            Self::Foundation => 4,
            Self::Expansion => 6,
            Self::Mastery => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyStep {
    pub stage: JourneyStage,
    pub title: String,
    pub description: &'static str,
    pub skills: Vec<&'static str>,
    pub duration_weeks: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseRecommendation {
    pub name: &'static str,
    pub subject: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub difficulty_label: &'static str,
    pub duration_weeks: u8,
    pub learning_journey: Vec<JourneyStep>,
}

/// Whether a record came from a tailored table row or the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Tailored,
    Default,
}

/// Mapper output consumed by the reports and the recommendations endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationRecord {
    pub source: RecommendationSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_style: Option<Category>,
    pub grade: Grade,
    pub grade_band: GradeBand,
    pub courses: Vec<CourseRecommendation>,
    pub learning_path: &'static str,
    pub career_affinities: Vec<&'static str>,
    pub college_recommendations: Vec<&'static str>,
    pub global_exams: Vec<&'static str>,
}
