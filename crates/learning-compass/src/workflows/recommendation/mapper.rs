use std::collections::HashMap;

use super::domain::{
    CourseRecommendation, CourseTemplate, JourneyStage, JourneyStep, RecommendationEntry,
    RecommendationRecord, RecommendationSource,
};
use super::table::{default_entry, standard_rows};
use crate::workflows::questions::{Category, Grade, GradeBand};

/// Static lookup from (primary style, grade band) to recommendations.
#[derive(Debug)]
pub struct RecommendationMapper {
    tailored: HashMap<(Category, GradeBand), RecommendationEntry>,
}

impl RecommendationMapper {
    pub fn standard() -> Self {
        let tailored = standard_rows()
            .into_iter()
            .map(|row| ((row.style, row.band), row.entry))
            .collect();
        Self { tailored }
    }

    pub fn has_tailored(&self, style: Category, band: GradeBand) -> bool {
        self.tailored.contains_key(&(style, band))
    }

    /// Never fails; unknown combinations and a missing style fall back to the band default.
    pub fn recommend(&self, primary_style: Option<Category>, grade: Grade) -> RecommendationRecord {
        let band = grade.band();
        let tailored = primary_style.and_then(|style| self.tailored.get(&(style, band)));

        let (source, entry) = match tailored {
            Some(entry) => (RecommendationSource::Tailored, entry.clone()),
            None => {
                tracing::debug!(
                    style = primary_style.map(Category::as_str),
                    band = band.as_str(),
                    "no tailored recommendations; using default entry"
                );
                (RecommendationSource::Default, default_entry(band))
            }
        };

        RecommendationRecord {
            source,
            primary_style,
            grade,
            grade_band: band,
            courses: entry.courses.iter().map(course_recommendation).collect(),
            learning_path: entry.learning_path,
            career_affinities: entry.careers,
            college_recommendations: entry.colleges,
            global_exams: entry.exams,
        }
    }
}

fn course_recommendation(course: &CourseTemplate) -> CourseRecommendation {
    CourseRecommendation {
        name: course.name,
        subject: course.subject,
        description: course.description,
        difficulty: course.difficulty,
        difficulty_label: course.difficulty.label(),
        duration_weeks: course.duration_weeks,
        learning_journey: learning_journey(course.name),
    }
}

fn learning_journey(course_name: &str) -> Vec<JourneyStep> {
    JourneyStage::ordered()
        .into_iter()
        .map(|stage| {
            let (title, description, skills) = match stage {
                JourneyStage::Foundation => (
                    format!("Introduction to {course_name}"),
                    "Foundational concepts and basic skills",
                    vec!["Basic understanding", "Fundamental techniques", "Core principles"],
                ),
                JourneyStage::Expansion => (
                    format!("Expanding {course_name} Skills"),
                    "Intermediate concepts and applied techniques",
                    vec!["Problem-solving", "Applied knowledge", "Project work"],
                ),
                JourneyStage::Mastery => (
                    format!("Advanced {course_name} Mastery"),
                    "Specialized techniques and real-world applications",
                    vec!["Advanced techniques", "Independent projects", "Real-world application"],
                ),
            };
            JourneyStep {
                stage,
                title,
                description,
                skills,
                duration_weeks: stage.duration_weeks(),
            }
        })
        .collect()
}
