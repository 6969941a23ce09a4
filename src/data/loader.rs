use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{validate_bank, Question, QuestionSetError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is not a usable question bank: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: QuestionSetError,
    },
}

/// Accepted bank layouts: a bare array, or an object wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum BankFile {
    List(Vec<Question>),
    Wrapped { questions: Vec<Question> },
}

impl BankFile {
    fn into_questions(self) -> Vec<Question> {
        match self {
            BankFile::List(questions) | BankFile::Wrapped { questions } => questions,
        }
    }
}

/// Load and validate a question bank.
///
/// Every question must be well-formed and the bank must not be empty.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let questions = parse_questions(&json_content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_bank(&questions).map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), count = questions.len(), "question bank loaded");
    Ok(questions)
}

pub fn parse_questions(json: &str) -> Result<Vec<Question>, serde_json::Error> {
    serde_json::from_str::<BankFile>(json).map(BankFile::into_questions)
}
