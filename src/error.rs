use thiserror::Error;

/// Failure to load the reference dataset. Raised only at load time; day
/// resolution itself never fails.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read table {table}")]
    Io {
        table: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse table {table}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid table {table}: {message}")]
    Schema {
        table: &'static str,
        message: String,
    },
}

impl DataError {
    pub(crate) fn schema(table: &'static str, message: impl Into<String>) -> Self {
        Self::Schema {
            table,
            message: message.into(),
        }
    }
}

pub type DataResult<T> = Result<T, DataError>;

/// A single record that cannot be turned into its typed form, e.g. a feast
/// carrying both a fixed date and a Pascha offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RecordError(pub String);

impl RecordError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
