use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("record must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("view {view} has no filter field named {field}")]
    UnknownFilterField { view: String, field: String },
    #[error("{value:?} is not a valid choice for {field}")]
    InvalidChoice { field: String, value: String },
    #[error("unknown export format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
