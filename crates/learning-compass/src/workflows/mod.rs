pub mod assessment;
pub mod questions;
pub mod recommendation;
pub mod report;
