pub mod domain;
mod mapper;
mod table;

pub use domain::{
    CourseRecommendation, CourseTemplate, Difficulty, JourneyStage, JourneyStep,
    RecommendationEntry, RecommendationRecord, RecommendationSource,
};
pub use mapper::RecommendationMapper;
