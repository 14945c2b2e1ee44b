use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// School grade of the student taking an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "K")]
    Kindergarten,
    G1,
    G2,
    G3,
    G4,
    G5,
    G6,
    G7,
    G8,
    G9,
    G10,
    G11,
    G12,
}

impl Grade {
    pub const fn ordered() -> [Self; 13] {
        [
            Self::Kindergarten,
            Self::G1,
            Self::G2,
            Self::G3,
            Self::G4,
            Self::G5,
            Self::G6,
            Self::G7,
            Self::G8,
            Self::G9,
            Self::G10,
            Self::G11,
            Self::G12,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Kindergarten => "K",
            Self::G1 => "G1",
            Self::G2 => "G2",
            Self::G3 => "G3",
            Self::G4 => "G4",
            Self::G5 => "G5",
            Self::G6 => "G6",
            Self::G7 => "G7",
            Self::G8 => "G8",
            Self::G9 => "G9",
            Self::G10 => "G10",
            Self::G11 => "G11",
            Self::G12 => "G12",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Kindergarten => "Kindergarten",
            Self::G1 => "Grade 1",
            Self::G2 => "Grade 2",
            Self::G3 => "Grade 3",
            Self::G4 => "Grade 4",
            Self::G5 => "Grade 5",
            Self::G6 => "Grade 6",
            Self::G7 => "Grade 7",
            Self::G8 => "Grade 8",
            Self::G9 => "Grade 9",
            Self::G10 => "Grade 10",
            Self::G11 => "Grade 11",
            Self::G12 => "Grade 12",
        }
    }

    pub const fn band(self) -> GradeBand {
        match self {
            Self::Kindergarten | Self::G1 | Self::G2 => GradeBand::Early,
            Self::G3 | Self::G4 | Self::G5 => GradeBand::Elementary,
            Self::G6 | Self::G7 | Self::G8 => GradeBand::Middle,
            Self::G9 | Self::G10 | Self::G11 | Self::G12 => GradeBand::High,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|grade| grade.code().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Grade grouping that selects both the question set and the recommendation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBand {
    Early,
    Elementary,
    Middle,
    High,
}

impl GradeBand {
    pub const fn ordered() -> [Self; 4] {
        [Self::Early, Self::Elementary, Self::Middle, Self::High]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Elementary => "elementary",
            Self::Middle => "middle",
            Self::High => "high",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Early => "Early Years (K-2)",
            Self::Elementary => "Elementary (3-5)",
            Self::Middle => "Middle School (6-8)",
            Self::High => "High School (9-12)",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|band| band.as_str().eq_ignore_ascii_case(trimmed))
    }
}

/// The two independent dimensions a questionnaire measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFamily {
    LearningStyle,
    CognitiveStrength,
}

impl CategoryFamily {
    pub const fn ordered() -> [Self; 2] {
        [Self::LearningStyle, Self::CognitiveStrength]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LearningStyle => "Learning Style",
            Self::CognitiveStrength => "Cognitive Strength",
        }
    }
}

/// Scored dimension a question or option contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Visual,
    Auditory,
    Kinesthetic,
    Logical,
    Social,
    Solitary,
    Analytical,
    Creative,
    Practical,
    Memory,
    Attention,
}

impl Category {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::Visual,
            Self::Auditory,
            Self::Kinesthetic,
            Self::Logical,
            Self::Social,
            Self::Solitary,
            Self::Analytical,
            Self::Creative,
            Self::Practical,
            Self::Memory,
            Self::Attention,
        ]
    }

    pub const fn family(self) -> CategoryFamily {
        match self {
            Self::Visual
            | Self::Auditory
            | Self::Kinesthetic
            | Self::Logical
            | Self::Social
            | Self::Solitary => CategoryFamily::LearningStyle,
            Self::Analytical | Self::Creative | Self::Practical | Self::Memory | Self::Attention => {
                CategoryFamily::CognitiveStrength
            }
        }
    }

    /// Stable lowercase name; also the tie-break key when means are equal.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::Logical => "logical",
            Self::Social => "social",
            Self::Solitary => "solitary",
            Self::Analytical => "analytical",
            Self::Creative => "creative",
            Self::Practical => "practical",
            Self::Memory => "memory",
            Self::Attention => "attention",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Visual => "Visual",
            Self::Auditory => "Auditory",
            Self::Kinesthetic => "Kinesthetic",
            Self::Logical => "Logical",
            Self::Social => "Social",
            Self::Solitary => "Solitary",
            Self::Analytical => "Analytical",
            Self::Creative => "Creative",
            Self::Practical => "Practical",
            Self::Memory => "Memory",
            Self::Attention => "Attention",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier wrapper for published questions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an option, unique within its question.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub String);

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice,
    FreeText,
}

impl QuestionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleChoice => "single choice",
            Self::FreeText => "free text",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single_choice" | "single-choice" | "choice" => Some(Self::SingleChoice),
            "free_text" | "free-text" | "text" | "open_ended" => Some(Self::FreeText),
            _ => None,
        }
    }
}

/// Lowest and highest score any option may contribute.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

/// Selectable answer. `value` feeds the question's own category unless
/// `impacts` names explicit per-category contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: OptionId,
    pub text: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub impacts: BTreeMap<Category, f64>,
}

impl QuestionOption {
    /// Category contributions made when this option is selected on `question_category`.
    pub fn contributions(&self, question_category: Category) -> Vec<(Category, f64)> {
        if self.impacts.is_empty() {
            vec![(question_category, self.value)]
        } else {
            self.impacts
                .iter()
                .map(|(category, weight)| (*category, *weight))
                .collect()
        }
    }
}

/// A published questionnaire item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub category: Category,
    pub kind: QuestionKind,
    pub grade_bands: Vec<GradeBand>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn applies_to(&self, band: GradeBand) -> bool {
        self.grade_bands.contains(&band)
    }

    pub fn option(&self, id: &OptionId) -> Option<&QuestionOption> {
        self.options.iter().find(|option| &option.id == id)
    }

    /// Checks the structural rules a question must satisfy before publishing.
    pub fn validate(&self) -> Result<(), QuestionValidationError> {
        if self.id.0.trim().is_empty() {
            return Err(QuestionValidationError::MissingId);
        }
        if self.prompt.trim().is_empty() {
            return Err(QuestionValidationError::MissingPrompt {
                question_id: self.id.clone(),
            });
        }
        if self.grade_bands.is_empty() {
            return Err(QuestionValidationError::NoGradeBands {
                question_id: self.id.clone(),
            });
        }

        match self.kind {
            QuestionKind::FreeText => {
                if !self.options.is_empty() {
                    return Err(QuestionValidationError::OptionsOnFreeText {
                        question_id: self.id.clone(),
                    });
                }
            }
            QuestionKind::SingleChoice => {
                if self.options.len() < 2 {
                    return Err(QuestionValidationError::TooFewOptions {
                        question_id: self.id.clone(),
                        found: self.options.len(),
                    });
                }
                for (index, option) in self.options.iter().enumerate() {
                    if option.id.0.trim().is_empty() {
                        return Err(QuestionValidationError::MissingOptionId {
                            question_id: self.id.clone(),
                            position: index + 1,
                        });
                    }
                    if self.options[..index].iter().any(|other| other.id == option.id) {
                        return Err(QuestionValidationError::DuplicateOption {
                            question_id: self.id.clone(),
                            option_id: option.id.clone(),
                        });
                    }
                    let weights = std::iter::once(option.value).chain(option.impacts.values().copied());
                    for weight in weights {
                        if !weight.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&weight) {
                            return Err(QuestionValidationError::ScoreOutOfRange {
                                question_id: self.id.clone(),
                                option_id: option.id.clone(),
                                value: weight,
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Structural problems found while publishing or importing a question.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuestionValidationError {
    #[error("question id must not be blank")]
    MissingId,
    #[error("question {question_id} has no prompt text")]
    MissingPrompt { question_id: QuestionId },
    #[error("question {question_id} does not apply to any grade band")]
    NoGradeBands { question_id: QuestionId },
    #[error("free-text question {question_id} must not define options")]
    OptionsOnFreeText { question_id: QuestionId },
    #[error("choice question {question_id} needs at least two options (found {found})")]
    TooFewOptions { question_id: QuestionId, found: usize },
    #[error("option #{position} of question {question_id} has no id")]
    MissingOptionId {
        question_id: QuestionId,
        position: usize,
    },
    #[error("question {question_id} repeats option id {option_id}")]
    DuplicateOption {
        question_id: QuestionId,
        option_id: OptionId,
    },
    #[error("option {option_id} of question {question_id} scores {value}, outside 0-10")]
    ScoreOutOfRange {
        question_id: QuestionId,
        option_id: OptionId,
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(id: &str, values: &[f64]) -> Question {
        Question {
            id: QuestionId(id.to_string()),
            prompt: "I remember things better when I see them drawn out.".to_string(),
            category: Category::Visual,
            kind: QuestionKind::SingleChoice,
            grade_bands: vec![GradeBand::Elementary],
            options: values
                .iter()
                .enumerate()
                .map(|(index, value)| QuestionOption {
                    id: OptionId(format!("{id}-{}", index + 1)),
                    text: format!("Option {}", index + 1),
                    value: *value,
                    impacts: BTreeMap::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn grades_map_to_bands() {
        assert_eq!(Grade::Kindergarten.band(), GradeBand::Early);
        assert_eq!(Grade::G2.band(), GradeBand::Early);
        assert_eq!(Grade::G3.band(), GradeBand::Elementary);
        assert_eq!(Grade::G8.band(), GradeBand::Middle);
        assert_eq!(Grade::G12.band(), GradeBand::High);
    }

    #[test]
    fn grade_codes_round_trip_through_serde() {
        let json = serde_json::to_string(&Grade::Kindergarten).expect("serializes");
        assert_eq!(json, "\"K\"");
        let parsed: Grade = serde_json::from_str("\"G10\"").expect("parses");
        assert_eq!(parsed, Grade::G10);
        assert_eq!(Grade::parse("g7"), Some(Grade::G7));
        assert_eq!(Grade::parse("G13"), None);
    }

    #[test]
    fn categories_know_their_family() {
        assert_eq!(Category::Solitary.family(), CategoryFamily::LearningStyle);
        assert_eq!(Category::Memory.family(), CategoryFamily::CognitiveStrength);
        assert_eq!(Category::parse("Kinesthetic"), Some(Category::Kinesthetic));
    }

    #[test]
    fn option_without_impacts_feeds_question_category() {
        let question = choice("q-1", &[1.0, 5.0]);
        let contributions = question.options[1].contributions(question.category);
        assert_eq!(contributions, vec![(Category::Visual, 5.0)]);
    }

    #[test]
    fn explicit_impacts_replace_implicit_value() {
        let mut question = choice("q-1", &[1.0, 5.0]);
        question.options[0]
            .impacts
            .insert(Category::Logical, 7.0);
        question.options[0]
            .impacts
            .insert(Category::Analytical, 6.0);
        let contributions = question.options[0].contributions(question.category);
        assert_eq!(
            contributions,
            vec![(Category::Logical, 7.0), (Category::Analytical, 6.0)]
        );
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        let question = choice("q-2", &[1.0, 11.0]);
        assert!(matches!(
            question.validate(),
            Err(QuestionValidationError::ScoreOutOfRange { value, .. }) if value == 11.0
        ));
    }

    #[test]
    fn validate_rejects_duplicate_option_ids() {
        let mut question = choice("q-3", &[1.0, 2.0]);
        question.options[1].id = question.options[0].id.clone();
        assert!(matches!(
            question.validate(),
            Err(QuestionValidationError::DuplicateOption { .. })
        ));
    }

    #[test]
    fn validate_rejects_options_on_free_text() {
        let mut question = choice("q-4", &[1.0, 2.0]);
        question.kind = QuestionKind::FreeText;
        assert!(matches!(
            question.validate(),
            Err(QuestionValidationError::OptionsOnFreeText { .. })
        ));
        question.options.clear();
        assert!(question.validate().is_ok());
    }
}
