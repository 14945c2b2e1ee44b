use serde::Serialize;

use super::aggregate::{round_one_decimal, CategoryScores};
use super::classify::ClassificationResult;
use crate::workflows::questions::Category;

const HIGH_THRESHOLD: f64 = 7.0;
const BALANCED_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceLevel {
    High,
    Balanced,
    Low,
}

impl PreferenceLevel {
    fn from_score(score: f64) -> Self {
        if score > HIGH_THRESHOLD {
            Self::High
        } else if score > BALANCED_THRESHOLD {
            Self::Balanced
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentPreference {
    pub level: PreferenceLevel,
    pub score: f64,
    pub description: &'static str,
}

/// Setting in which the student is expected to learn best.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdealEnvironment {
    pub structure: EnvironmentPreference,
    pub social: EnvironmentPreference,
}

impl IdealEnvironment {
    pub fn from_scores(scores: &CategoryScores) -> Self {
        let weighted = |category: Category, weight: f64| {
            scores.mean(category).map_or(0.0, |mean| mean * weight)
        };

        let structure_score =
            weighted(Category::Logical, 0.7) + weighted(Category::Attention, 0.3);
        let social_score = weighted(Category::Social, 0.6)
            + scores
                .mean(Category::Solitary)
                .map_or(0.0, |mean| (10.0 - mean) * 0.4);

        let structure = PreferenceLevel::from_score(structure_score);
        let social = PreferenceLevel::from_score(social_score);

        Self {
            structure: EnvironmentPreference {
                level: structure,
                score: round_one_decimal(structure_score),
                description: match structure {
                    PreferenceLevel::High => "Highly structured",
                    PreferenceLevel::Balanced => "Moderately structured",
                    PreferenceLevel::Low => "Flexible and unstructured",
                },
            },
            social: EnvironmentPreference {
                level: social,
                score: round_one_decimal(social_score),
                description: match social {
                    PreferenceLevel::High => "Collaborative group settings",
                    PreferenceLevel::Balanced => "Balance of group and independent work",
                    PreferenceLevel::Low => "Independent study",
                },
            },
        }
    }
}

/// Study tips for a primary learning style and primary cognitive strength.
pub fn learning_tips(
    style: Option<&ClassificationResult>,
    strength: Option<&ClassificationResult>,
) -> Vec<&'static str> {
    let mut tips = Vec::new();
    if let Some(result) = style {
        tips.extend_from_slice(tips_for(result.primary));
    }
    if let Some(result) = strength {
        tips.extend_from_slice(tips_for(result.primary));
    }
    tips
}

fn tips_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Visual => &[
            "Use diagrams, charts, and mind maps to visualize concepts",
            "Color-code notes and study materials",
            "Watch educational videos and demonstrations",
        ],
        Category::Auditory => &[
            "Record lessons and listen to them again",
            "Read material aloud or use text-to-speech",
            "Discuss concepts with others to reinforce understanding",
        ],
        Category::Kinesthetic => &[
            "Use hands-on activities and experiments",
            "Take breaks for physical movement during study sessions",
            "Create physical models or use manipulatives",
        ],
        Category::Logical => &[
            "Organize information in logical sequences or hierarchies",
            "Look for patterns and relationships between concepts",
            "Break complex problems into smaller, manageable steps",
        ],
        Category::Social => &[
            "Form or join study groups",
            "Teach concepts to others to reinforce understanding",
            "Engage in class discussions and collaborative projects",
        ],
        Category::Solitary => &[
            "Create a quiet, distraction-free study environment",
            "Set personal goals and track progress",
            "Use self-paced learning resources",
        ],
        Category::Analytical => &[
            "Question assumptions and evaluate evidence",
            "Compare and contrast different perspectives",
        ],
        Category::Creative => &[
            "Explore multiple approaches to assignments",
            "Connect concepts across different subjects",
        ],
        Category::Practical => &[
            "Practice with a variety of problem types",
            "Analyze worked examples before attempting new problems",
        ],
        Category::Memory => &[
            "Use spaced repetition techniques for memorization",
            "Create mnemonic devices for complex information",
        ],
        Category::Attention => &[
            "Use short focused work sessions with planned breaks",
            "Minimize distractions in your study environment",
        ],
    }
}
