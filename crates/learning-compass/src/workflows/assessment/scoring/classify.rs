use std::cmp::Ordering;

use serde::Serialize;

use super::aggregate::{round_one_decimal, CategoryScores};
use crate::workflows::questions::{Category, CategoryFamily};

/// One entry of a ranking, mean kept at full precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCategory {
    pub category: Category,
    pub mean: f64,
}

/// Top two categories of a family plus the full descending ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub family: CategoryFamily,
    pub primary: Category,
    pub secondary: Option<Category>,
    pub ranking: Vec<RankedCategory>,
}

impl ClassificationResult {
    pub fn to_view(&self) -> ClassificationView {
        ClassificationView {
            family: self.family,
            primary: self.primary,
            primary_label: self.primary.label(),
            secondary: self.secondary,
            secondary_label: self
                .secondary
                .map(Category::label)
                .unwrap_or(NOT_APPLICABLE),
            ranking: self
                .ranking
                .iter()
                .map(|entry| RankedCategoryView {
                    category: entry.category,
                    label: entry.category.label(),
                    mean: round_one_decimal(entry.mean),
                })
                .collect(),
        }
    }
}

pub const NOT_APPLICABLE: &str = "Not applicable";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCategoryView {
    pub category: Category,
    pub label: &'static str,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationView {
    pub family: CategoryFamily,
    pub primary: Category,
    pub primary_label: &'static str,
    pub secondary: Option<Category>,
    pub secondary_label: &'static str,
    pub ranking: Vec<RankedCategoryView>,
}

/// Descending by mean; equal means fall back to alphabetical category name.
pub fn rank_order(a: &RankedCategory, b: &RankedCategory) -> Ordering {
    b.mean
        .total_cmp(&a.mean)
        .then_with(|| a.category.as_str().cmp(b.category.as_str()))
}

pub struct StyleClassifier;

impl StyleClassifier {
    /// Ranks one family's categories. `None` when the family has no scored categories.
    pub fn classify(
        scores: &CategoryScores,
        family: CategoryFamily,
    ) -> Option<ClassificationResult> {
        let mut ranking: Vec<RankedCategory> = scores
            .family(family)
            .map(|(category, mean)| RankedCategory {
                category,
                mean: mean.mean(),
            })
            .collect();
        ranking.sort_by(rank_order);

        let primary = ranking.first()?.category;
        let secondary = ranking.get(1).map(|entry| entry.category);

        Some(ClassificationResult {
            family,
            primary,
            secondary,
            ranking,
        })
    }
}
