use super::normalizer::{normalize_code, normalize_text};
use crate::orientation::{Dimension, ProgramRecord, Question};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Row-level failure in the question export.
#[derive(Debug)]
pub(crate) enum QuestionRowError {
    Csv(csv::Error),
    InvalidDimension { row: usize, value: String },
    MissingText { row: usize },
}

impl From<csv::Error> for QuestionRowError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) fn parse_questions<R: Read>(reader: R) -> Result<Vec<Question>, QuestionRowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut questions = Vec::new();

    for (index, record) in csv_reader.deserialize::<QuestionRow>().enumerate() {
        let row = record?;
        // Header is line 1.
        let line = index + 2;

        let text = normalize_text(&row.text);
        if text.is_empty() {
            return Err(QuestionRowError::MissingText { row: line });
        }
        let dimension = row.dimension.parse::<Dimension>().map_err(|_| {
            QuestionRowError::InvalidDimension {
                row: line,
                value: row.dimension.clone(),
            }
        })?;

        questions.push(Question {
            display_order: row.display_order.unwrap_or(index as u32 + 1),
            text,
            translation: row.translation.as_deref().map(normalize_text),
            dimension,
        });
    }

    questions.sort_by_key(|question| question.display_order);
    Ok(questions)
}

pub(crate) fn parse_programs<R: Read>(reader: R) -> Result<Vec<ProgramRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut programs = Vec::new();

    for record in csv_reader.deserialize::<ProgramRow>() {
        let row = record?;
        programs.push(ProgramRecord {
            name: normalize_text(&row.name),
            institution: normalize_text(&row.institution),
            code: row.code.as_deref().map(normalize_code).unwrap_or_default(),
        });
    }

    Ok(programs)
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    #[serde(
        alias = "ordre_affichage",
        default,
        deserialize_with = "empty_string_as_none_u32"
    )]
    display_order: Option<u32>,
    #[serde(alias = "question_fr")]
    text: String,
    #[serde(
        alias = "question_ar",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    translation: Option<String>,
    dimension: String,
}

#[derive(Debug, Deserialize)]
struct ProgramRow {
    #[serde(alias = "filiere_nom")]
    name: String,
    #[serde(alias = "etablissement")]
    institution: String,
    #[serde(
        alias = "code_riasec",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    code: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_string_as_none_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    empty_string_as_none(deserializer)?
        .map(|value| value.trim().parse::<u32>().map_err(serde::de::Error::custom))
        .transpose()
}
