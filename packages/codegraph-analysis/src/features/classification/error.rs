//! Error types for the classifier

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Report serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;
