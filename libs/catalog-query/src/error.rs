use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors raised while composing a filter query.
///
/// Every variant signals a caller bug, not a user/runtime condition: these
/// surface immediately and are not meant to be caught and defaulted.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("unrecognized clause kind: {0:?}")]
    InvalidClauseKind(String),

    #[error("table {0:?} is not a catalog entity")]
    UnknownEntity(String),

    #[error("clause {expr:?} has {placeholders} placeholder(s) but {values} bind value(s)")]
    ClauseShape {
        expr: String,
        placeholders: usize,
        values: usize,
    },
}
