use std::collections::BTreeMap;

use serde::Serialize;

use super::super::domain::{Answer, Response};
use crate::workflows::questions::{Category, CategoryFamily, Question, QuestionBank};

/// Source of category contributions for free-text answers.
///
/// Free text is scored outside this crate (e.g. by an NLP service); the
/// aggregator treats whatever this returns as opaque input.
pub trait FreeTextScorer: Send + Sync {
    fn score(&self, question: &Question, text: &str) -> Vec<(Category, f64)>;
}

/// Scorer that leaves free-text answers out of the category means.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreFreeText;

impl FreeTextScorer for IgnoreFreeText {
    fn score(&self, _question: &Question, _text: &str) -> Vec<(Category, f64)> {
        Vec::new()
    }
}

/// Running statistics for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryMean {
    total: f64,
    count: u32,
    min: f64,
    max: f64,
}

impl CategoryMean {
    fn first(value: f64) -> Self {
        Self {
            total: value,
            count: 1,
            min: value,
            max: value,
        }
    }

    fn push(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Full-precision mean, kept inside the observed range.
    pub fn mean(&self) -> f64 {
        (self.total / f64::from(self.count)).clamp(self.min, self.max)
    }

    /// Mean rounded to one decimal place for display.
    pub fn display_mean(&self) -> f64 {
        round_one_decimal(self.mean())
    }

    pub fn responses(&self) -> u32 {
        self.count
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Category means for one assessment. Categories without contributions are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryScores {
    means: BTreeMap<Category, CategoryMean>,
}

impl CategoryScores {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (Category, f64)>,
    {
        let mut scores = Self::default();
        for (category, value) in values {
            scores.push(category, value);
        }
        scores
    }

    fn push(&mut self, category: Category, value: f64) {
        if !value.is_finite() {
            tracing::warn!(%category, value, "dropping non-finite category contribution");
            return;
        }
        self.means
            .entry(category)
            .and_modify(|mean| mean.push(value))
            .or_insert_with(|| CategoryMean::first(value));
    }

    pub fn get(&self, category: Category) -> Option<&CategoryMean> {
        self.means.get(&category)
    }

    pub fn mean(&self, category: Category) -> Option<f64> {
        self.get(category).map(CategoryMean::mean)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryMean)> {
        self.means.iter().map(|(category, mean)| (*category, mean))
    }

    pub fn family(&self, family: CategoryFamily) -> impl Iterator<Item = (Category, &CategoryMean)> {
        self.iter()
            .filter(move |(category, _)| category.family() == family)
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    pub fn to_view(&self) -> Vec<CategoryScoreView> {
        self.iter()
            .map(|(category, mean)| CategoryScoreView::new(category, mean))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScoreView {
    pub category: Category,
    pub label: &'static str,
    pub family: CategoryFamily,
    pub mean: f64,
    pub responses: u32,
}

impl CategoryScoreView {
    pub fn new(category: Category, mean: &CategoryMean) -> Self {
        Self {
            category,
            label: category.label(),
            family: category.family(),
            mean: mean.display_mean(),
            responses: mean.responses(),
        }
    }
}

/// Groups response scores by category and averages them.
pub struct CategoryAggregator<'a, S: ?Sized> {
    bank: &'a QuestionBank,
    free_text: &'a S,
}

impl<'a, S> CategoryAggregator<'a, S>
where
    S: FreeTextScorer + ?Sized,
{
    pub fn new(bank: &'a QuestionBank, free_text: &'a S) -> Self {
        Self { bank, free_text }
    }

    pub fn aggregate(&self, responses: &[Response]) -> CategoryScores {
        let mut scores = CategoryScores::default();

        for response in responses {
            let Some(question) = self.bank.get(&response.question_id) else {
                tracing::warn!(question_id = %response.question_id, "response references an unpublished question");
                continue;
            };

            let contributions = match &response.answer {
                Answer::Choice { option_id } => match question.option(option_id) {
                    Some(option) => option.contributions(question.category),
                    None => {
                        tracing::warn!(
                            question_id = %question.id,
                            option_id = %option_id,
                            "response references an unknown option"
                        );
                        continue;
                    }
                },
                Answer::FreeText { text } => self.free_text.score(question, text),
            };

            for (category, value) in contributions {
                scores.push(category, value);
            }
        }

        scores
    }
}
