//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while normalizing catalog records.
///
/// None of these ever escape a listing operation: the loader counts and
/// logs them, then moves on to the next record.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Record is not a JSON object.
    #[error("Record {index} is not an object")]
    NotAnObject { index: usize },

    /// Record is missing a required field.
    #[error("Record {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// Record could not be deserialized.
    #[error("Record {index} is malformed: {reason}")]
    Malformed { index: usize, reason: String },
}

impl CatalogError {
    /// Index of the offending record in its input set.
    pub fn index(&self) -> usize {
        match self {
            CatalogError::NotAnObject { index }
            | CatalogError::MissingField { index, .. }
            | CatalogError::Malformed { index, .. } => *index,
        }
    }
}
