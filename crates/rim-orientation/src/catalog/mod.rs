mod normalizer;
mod parser;
mod results;

pub use results::CsvResultSink;

use crate::orientation::{ProgramRecord, Question};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use parser::QuestionRowError;

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidDimension { row: usize, value: String },
    MissingQuestionText { row: usize },
    EmptyQuestionnaire,
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::InvalidDimension { row, value } => write!(
                f,
                "row {}: '{}' is not a RIASEC dimension (expected R, I, A, S, E or C)",
                row, value
            ),
            CatalogImportError::MissingQuestionText { row } => {
                write!(f, "row {}: question text is empty", row)
            }
            CatalogImportError::EmptyQuestionnaire => {
                write!(f, "the question catalog contains no questions")
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::InvalidDimension { .. }
            | CatalogImportError::MissingQuestionText { .. }
            | CatalogImportError::EmptyQuestionnaire => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<QuestionRowError> for CatalogImportError {
    fn from(err: QuestionRowError) -> Self {
        match err {
            QuestionRowError::Csv(err) => Self::Csv(err),
            QuestionRowError::InvalidDimension { row, value } => {
                Self::InvalidDimension { row, value }
            }
            QuestionRowError::MissingText { row } => Self::MissingQuestionText { row },
        }
    }
}

/// Loads the ordered questionnaire.
pub struct QuestionCatalog;

impl QuestionCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, CatalogImportError> {
        let file = std::fs::File::open(path.as_ref())?;
        let questions = Self::from_reader(file)?;
        info!(
            path = %path.as_ref().display(),
            count = questions.len(),
            "question catalog loaded"
        );
        Ok(questions)
    }

    /// Questions come back sorted by display order. An empty export is an
    /// error: a quiz without questions cannot produce a profile.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Question>, CatalogImportError> {
        let questions = parser::parse_questions(reader)?;
        if questions.is_empty() {
            return Err(CatalogImportError::EmptyQuestionnaire);
        }
        Ok(questions)
    }
}

/// Loads the program catalog. Rows with unusable codes are kept; the matcher
/// skips them.
pub struct ProgramCatalog;

impl ProgramCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ProgramRecord>, CatalogImportError> {
        let file = std::fs::File::open(path.as_ref())?;
        let programs = Self::from_reader(file)?;
        info!(
            path = %path.as_ref().display(),
            count = programs.len(),
            "program catalog loaded"
        );
        Ok(programs)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ProgramRecord>, CatalogImportError> {
        let programs = parser::parse_programs(reader)?;
        let invalid = programs
            .iter()
            .filter(|program| program.parsed_code().is_none())
            .count();
        if invalid > 0 {
            warn!(invalid, "program rows without a usable RIASEC code will not be matched");
        }
        Ok(programs)
    }
}
