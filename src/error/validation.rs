use thiserror::Error as ThisError;

/// Payload rejected before anything reaches the database.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,

    #[error("invalid price")]
    InvalidPrice,

    #[error("invalid quantity")]
    InvalidQuantity,

    #[error("id is immutable")]
    ImmutableId,

    #[error("no values to write")]
    EmptyValues,

    #[error("sold totals out of range")]
    SoldTotalsOverflow,

    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),
}
