use std::path::PathBuf;

use thiserror::Error;

/// Upper bound on questions drawn for a practice quiz.
pub const DEFAULT_PRACTICE_SIZE: usize = 40;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("time limit must be at least one second")]
    ZeroTimeLimit,

    #[error("practice size must be at least one question")]
    ZeroPracticeSize,
}

/// Settings for one quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Seconds per question. `None` runs the quiz untimed.
    pub time_limit: Option<u32>,
    pub practice_size: usize,
    /// Where session and results blobs are kept. `None` keeps them in memory.
    pub state_dir: Option<PathBuf>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            practice_size: DEFAULT_PRACTICE_SIZE,
            state_dir: None,
        }
    }
}

impl QuizConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.practice_size == 0 {
            return Err(ConfigError::ZeroPracticeSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(QuizConfig::default().validate().is_ok());

        let timed = QuizConfig {
            time_limit: Some(30),
            ..QuizConfig::default()
        };
        assert!(timed.validate().is_ok());

        let zero_time = QuizConfig {
            time_limit: Some(0),
            ..QuizConfig::default()
        };
        assert_eq!(zero_time.validate(), Err(ConfigError::ZeroTimeLimit));

        let zero_size = QuizConfig {
            practice_size: 0,
            ..QuizConfig::default()
        };
        assert_eq!(zero_size.validate(), Err(ConfigError::ZeroPracticeSize));
    }
}
