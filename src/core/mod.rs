pub mod error;
pub mod types;
pub mod value;

pub use error::{Result, RouterError};
pub use types::{Configuration, FormattedRow, RecordIdentity, Row, TableId};
pub use value::Value;
