//! Labeled-field persistence ports.
//!
//! The power database is a sequence of `label value` fields. Readers check
//! each label against what the loader expects next, so a truncated or
//! reordered file fails loudly instead of loading garbage.

use divscope_domain::Dbref;

use crate::infrastructure::persistence::PersistenceError;

pub trait LabeledReader {
    /// Label of the next field, without consuming it. `None` at end of input.
    fn peek_label(&mut self) -> Result<Option<String>, PersistenceError>;

    fn read_number(&mut self, label: &str) -> Result<i64, PersistenceError>;

    fn read_string(&mut self, label: &str) -> Result<String, PersistenceError>;

    fn read_dbref(&mut self, label: &str) -> Result<Option<Dbref>, PersistenceError>;
}

pub trait LabeledWriter {
    fn write_number(&mut self, label: &str, value: i64) -> Result<(), PersistenceError>;

    fn write_string(&mut self, label: &str, value: &str) -> Result<(), PersistenceError>;

    fn write_dbref(&mut self, label: &str, value: Option<Dbref>) -> Result<(), PersistenceError>;
}
