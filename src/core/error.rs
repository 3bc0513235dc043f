use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("No routing configuration recorded; run setup first")]
    ConfigurationMissing,

    #[error("Source is not form-compatible: {0}")]
    SourceNotCompatible(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Designated field index {0} is out of range for a row of {1} columns")]
    FieldOutOfRange(usize, usize),

    #[error("Row position {0} is out of range for table '{1}'")]
    PositionOutOfRange(u64, String),

    #[error("Failed to create partition '{0}': {1}")]
    PartitionCreation(String, String),

    #[error("Failed to append to partition '{0}': {1}")]
    Append(String, String),

    #[error("Processed-set store unavailable: {0}")]
    TrackerUnavailable(String),

    #[error("Configuration store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, RouterError>;

impl<T> From<std::sync::PoisonError<T>> for RouterError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}

impl From<std::io::Error> for RouterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
