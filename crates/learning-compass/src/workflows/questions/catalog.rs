use std::collections::{BTreeMap, HashMap};

use super::domain::{
    Category, GradeBand, OptionId, Question, QuestionId, QuestionKind, QuestionOption,
    QuestionValidationError,
};

/// Published questions, kept in publication order.
#[derive(Debug, Default, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
}

/// Reasons a question cannot be added to the bank.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    Invalid(#[from] QuestionValidationError),
    #[error("question {0} is already published")]
    AlreadyPublished(QuestionId),
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in questionnaire covering every grade band.
    pub fn standard() -> Self {
        let mut bank = Self::new();
        for question in standard_questions() {
            if let Err(err) = bank.publish(question) {
                tracing::error!(%err, "standard question bank rejected a built-in question");
            }
        }
        bank
    }

    pub fn publish(&mut self, question: Question) -> Result<&Question, PublishError> {
        question.validate()?;
        if self.index.contains_key(&question.id) {
            return Err(PublishError::AlreadyPublished(question.id));
        }

        let position = self.questions.len();
        self.index.insert(question.id.clone(), position);
        self.questions.push(question);
        Ok(&self.questions[position])
    }

    /// Publishes every question, stopping at the first rejection.
    pub fn extend<I>(&mut self, questions: I) -> Result<usize, PublishError>
    where
        I: IntoIterator<Item = Question>,
    {
        let mut added = 0;
        for question in questions {
            self.publish(question)?;
            added += 1;
        }
        Ok(added)
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.index.get(id).map(|position| &self.questions[*position])
    }

    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question set assigned to a grade band, in publication order.
    pub fn for_band(&self, band: GradeBand) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.applies_to(band))
            .collect()
    }
}

const LIKERT_SCALE: [(&str, f64); 5] = [
    ("Never", 1.0),
    ("Rarely", 2.0),
    ("Sometimes", 3.0),
    ("Often", 4.0),
    ("Always", 5.0),
];

fn likert(id: &str) -> Vec<QuestionOption> {
    LIKERT_SCALE
        .iter()
        .enumerate()
        .map(|(index, (text, value))| QuestionOption {
            id: OptionId(format!("{id}-{}", index + 1)),
            text: (*text).to_string(),
            value: *value,
            impacts: BTreeMap::new(),
        })
        .collect()
}

fn scaled(id: &str, prompt: &str, category: Category, bands: &[GradeBand]) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        prompt: prompt.to_string(),
        category,
        kind: QuestionKind::SingleChoice,
        grade_bands: bands.to_vec(),
        options: likert(id),
    }
}

fn standard_questions() -> Vec<Question> {
    use Category::*;
    const ALL: &[GradeBand] = &[
        GradeBand::Early,
        GradeBand::Elementary,
        GradeBand::Middle,
        GradeBand::High,
    ];
    const OLDER: &[GradeBand] = &[GradeBand::Elementary, GradeBand::Middle, GradeBand::High];

    let mut questions = vec![
        scaled("ls-visual-1", "I understand a story better when it has pictures.", Visual, ALL),
        scaled("ls-visual-2", "I like to draw or map out ideas before I start.", Visual, ALL),
        scaled("ls-auditory-1", "I remember things best when someone explains them out loud.", Auditory, ALL),
        scaled("ls-auditory-2", "I like to hum, sing, or talk to myself while I work.", Auditory, ALL),
        scaled("ls-kinesthetic-1", "I learn best when I can build or touch something.", Kinesthetic, ALL),
        scaled("ls-kinesthetic-2", "I find it hard to sit still for a long lesson.", Kinesthetic, ALL),
        scaled("ls-logical-1", "I enjoy puzzles and finding patterns.", Logical, ALL),
        scaled("ls-logical-2", "I like to know the steps before I begin a task.", Logical, ALL),
        scaled("ls-social-1", "I enjoy working on projects with classmates.", Social, ALL),
        scaled("ls-social-2", "Explaining things to a friend helps me understand them.", Social, ALL),
        scaled("ls-solitary-1", "I prefer to study by myself in a quiet place.", Solitary, ALL),
        scaled("ls-solitary-2", "I like to set my own goals and check my own progress.", Solitary, ALL),
        scaled("cs-analytical-1", "I like to compare different answers before choosing one.", Analytical, OLDER),
        scaled("cs-creative-1", "I come up with new ways to do ordinary things.", Creative, ALL),
        scaled("cs-practical-1", "I like learning things I can use right away.", Practical, ALL),
        scaled("cs-memory-1", "I can remember new words or facts after hearing them once or twice.", Memory, ALL),
        scaled("cs-attention-1", "I can keep working on one thing even when there is noise around me.", Attention, ALL),
    ];

    questions.push(Question {
        id: QuestionId("reflect-1".to_string()),
        prompt: "Describe a time you learned something new and enjoyed it.".to_string(),
        category: Creative,
        kind: QuestionKind::FreeText,
        grade_bands: OLDER.to_vec(),
        options: Vec::new(),
    });

    questions
}
