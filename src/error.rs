use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("entry file is not known to the host")]
    EntryFileUnknown,

    #[error("dependency closure exceeded the node budget of {limit}")]
    BudgetExceeded { limit: usize },

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

pub type FlattenResult<T> = Result<T, FlattenError>;
