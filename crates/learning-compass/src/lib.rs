//! Learning-style assessments for K-12 students: question bank, response collection,
//! category scoring, recommendations, and paywalled reports.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
