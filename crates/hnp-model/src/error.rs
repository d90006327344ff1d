use thiserror::Error;

#[derive(Debug, Error)]
pub enum TidyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The one explicit precondition check in the pipeline: a required
    /// source column is absent after renaming.
    #[error("{table} table: required column {column:?} is missing")]
    SchemaMismatch { table: String, column: String },

    /// The join produced zero rows: the two sources share no
    /// (country_code, year) keys.
    #[error("merged table is empty: no (country_code, year) keys overlap")]
    EmptyMerge,

    #[error("indicator catalog {path} has no entries")]
    EmptyCatalog { path: String },

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, TidyError>;
