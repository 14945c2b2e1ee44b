use super::catalog::{PublishError, QuestionBank};
use super::domain::{
    Category, GradeBand, OptionId, Question, QuestionId, QuestionKind, QuestionOption,
};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum QuestionImportError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid question bank CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("question bank line {line}: {message}")]
    Row { line: usize, message: String },
    #[error("could not publish imported question: {0}")]
    Publish(#[from] PublishError),
}

/// Reads question banks exported as CSV, one row per option.
///
/// Columns: `question_id, prompt, category, kind, grade_bands, option_id,
/// option_text, value, impacts`. Bands are `;`-separated, impacts are
/// `category:weight` pairs separated by `;`. Free-text questions use a single
/// row with the option columns left blank.
pub struct QuestionBankImporter;

impl QuestionBankImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, QuestionImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Question>, QuestionImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut questions: Vec<Question> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (index, record) in csv_reader.deserialize::<QuestionRow>().enumerate() {
            let row = record?;
            // Header occupies line 1.
            let line = index + 2;

            let position = match positions.get(&row.question_id) {
                Some(position) => *position,
                None => {
                    let question = row.question(line)?;
                    positions.insert(row.question_id.clone(), questions.len());
                    questions.push(question);
                    questions.len() - 1
                }
            };

            if let Some(option) = row.option(line)? {
                let question = &mut questions[position];
                if question.kind == QuestionKind::FreeText {
                    return Err(QuestionImportError::Row {
                        line,
                        message: format!(
                            "free-text question {} cannot list options",
                            question.id
                        ),
                    });
                }
                question.options.push(option);
            }
        }

        for question in &questions {
            question
                .validate()
                .map_err(|err| QuestionImportError::Publish(PublishError::Invalid(err)))?;
        }

        Ok(questions)
    }

    /// Parses the CSV and publishes each question into `bank`, returning how many were added.
    pub fn publish_into<R: Read>(
        reader: R,
        bank: &mut QuestionBank,
    ) -> Result<usize, QuestionImportError> {
        let questions = Self::from_reader(reader)?;
        Ok(bank.extend(questions)?)
    }
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    question_id: String,
    prompt: String,
    category: String,
    kind: String,
    grade_bands: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    option_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    option_text: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    impacts: Option<String>,
}

impl QuestionRow {
    fn question(&self, line: usize) -> Result<Question, QuestionImportError> {
        let category = Category::parse(&self.category).ok_or_else(|| QuestionImportError::Row {
            line,
            message: format!("unknown category '{}'", self.category),
        })?;
        let kind = QuestionKind::parse(&self.kind).ok_or_else(|| QuestionImportError::Row {
            line,
            message: format!("unknown question kind '{}'", self.kind),
        })?;

        let mut grade_bands = Vec::new();
        for raw in self.grade_bands.split(';').filter(|raw| !raw.trim().is_empty()) {
            let band = GradeBand::parse(raw).ok_or_else(|| QuestionImportError::Row {
                line,
                message: format!("unknown grade band '{}'", raw.trim()),
            })?;
            if !grade_bands.contains(&band) {
                grade_bands.push(band);
            }
        }

        Ok(Question {
            id: QuestionId(self.question_id.clone()),
            prompt: self.prompt.clone(),
            category,
            kind,
            grade_bands,
            options: Vec::new(),
        })
    }

    fn option(&self, line: usize) -> Result<Option<QuestionOption>, QuestionImportError> {
        let Some(option_id) = self.option_id.as_deref() else {
            return Ok(None);
        };

        let value = match self.value.as_deref() {
            Some(raw) => raw.parse::<f64>().map_err(|_| QuestionImportError::Row {
                line,
                message: format!("option value '{raw}' is not a number"),
            })?,
            None => 0.0,
        };

        let mut impacts = BTreeMap::new();
        if let Some(raw) = self.impacts.as_deref() {
            for pair in raw.split(';').filter(|pair| !pair.trim().is_empty()) {
                let (name, weight) = pair.split_once(':').ok_or_else(|| QuestionImportError::Row {
                    line,
                    message: format!("impact '{}' must look like category:weight", pair.trim()),
                })?;
                let category = Category::parse(name).ok_or_else(|| QuestionImportError::Row {
                    line,
                    message: format!("unknown impact category '{}'", name.trim()),
                })?;
                let weight = weight
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| QuestionImportError::Row {
                        line,
                        message: format!("impact weight '{}' is not a number", weight.trim()),
                    })?;
                impacts.insert(category, weight);
            }
        }

        Ok(Some(QuestionOption {
            id: OptionId(option_id.to_string()),
            text: self.option_text.clone().unwrap_or_default(),
            value,
            impacts,
        }))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
