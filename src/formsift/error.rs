use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Malformed field name: {0:?}")]
    MalformedField(String),

    #[error("Unknown filter attribute: {0}")]
    UnknownAttribute(String),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidAttribute { name: String, value: String },

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
