//! Power database persistence.
//!
//! `labeled` is the on-disk field format; `power_db` maps a [`PowerSpace`]
//! onto it.
//!
//! [`PowerSpace`]: crate::entities::PowerSpace

mod labeled;
mod power_db;

pub use labeled::{TextLabeledReader, TextLabeledWriter};
pub use power_db::{load, load_file, save, save_file, LoadReport};

use crate::entities::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected '{expected}', found '{found}'")]
    UnexpectedLabel {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("line {line}: input ended while expecting '{expected}'")]
    UnexpectedEof { expected: String, line: usize },

    #[error("line {line}: malformed '{label}': {message}")]
    Malformed {
        label: String,
        line: usize,
        message: String,
    },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl PersistenceError {
    pub fn malformed(label: &str, line: usize, message: impl ToString) -> Self {
        Self::Malformed {
            label: label.to_string(),
            line,
            message: message.to_string(),
        }
    }
}
