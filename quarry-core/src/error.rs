use crate::{Value, separated_by, truncate};
use thiserror::Error;

/// Typed failures raised by the data layer.
///
/// They travel inside [`crate::Error`] (`anyhow::Error`), callers classify them
/// with `error.downcast_ref::<DatabaseError>()`.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Illegal operator and value combination: `{operator}` with NULL")]
    IllegalOperatorAndValue { operator: String },

    #[error("Order direction must be \"asc\" or \"desc\", found \"{0}\"")]
    InvalidOrderDirection(String),

    #[error("Invalid binding type: {0}")]
    InvalidBindingType(String),

    #[error("Every inserted row must have the same columns, expected {expected} found {found}")]
    InconsistentInsertColumns { expected: String, found: String },

    #[error("{feature} is not supported by the {grammar} grammar")]
    Unsupported {
        feature: &'static str,
        grammar: &'static str,
    },

    #[error(transparent)]
    QueryExecution(#[from] QueryExecutionError),

    #[error("Database connection [{0}] is disconnected")]
    Disconnected(String),

    #[error("Database connection [{0}] not configured")]
    ConnectionNotConfigured(String),

    #[error("Unsupported database driver [{0}]")]
    UnsupportedDriver(String),

    #[error("Invalid database configuration: {0}")]
    InvalidConfiguration(String),

    #[error("No primary key defined on model [{0}]")]
    MissingPrimaryKey(String),

    #[error("No query results for model [{model}] {id}")]
    ModelNotFound { model: String, id: String },
}

impl DatabaseError {
    /// Raised while the query is being built, before any SQL reaches the server.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::IllegalOperatorAndValue { .. }
                | Self::InvalidOrderDirection(..)
                | Self::InvalidBindingType(..)
                | Self::InconsistentInsertColumns { .. }
                | Self::Unsupported { .. }
        )
    }

    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::QueryExecution(..) | Self::Disconnected(..))
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionNotConfigured(..)
                | Self::UnsupportedDriver(..)
                | Self::InvalidConfiguration(..)
        )
    }

    pub fn is_orm_error(&self) -> bool {
        matches!(self, Self::MissingPrimaryKey(..) | Self::ModelNotFound { .. })
    }
}

/// A driver failure while running a statement, with the statement and its bindings.
#[derive(Debug, Error)]
#[error("{source:#} (SQL: {}) (Bindings: {bindings})", truncate(.statement))]
pub struct QueryExecutionError {
    pub statement: String,
    pub bindings: String,
    #[source]
    pub source: anyhow::Error,
}

impl QueryExecutionError {
    pub fn new(statement: &str, bindings: &[Value], source: anyhow::Error) -> Self {
        let mut joined = String::new();
        separated_by(
            &mut joined,
            bindings,
            |out, v| out.push_str(&v.to_string()),
            ", ",
        );
        Self {
            statement: statement.into(),
            bindings: joined,
            source,
        }
    }
}

/// Classification helpers usable directly on [`crate::Error`].
pub trait ErrorKind {
    fn database_error(&self) -> Option<&DatabaseError>;

    fn is_build_error(&self) -> bool {
        self.database_error().is_some_and(DatabaseError::is_build_error)
    }
    fn is_execution_error(&self) -> bool {
        self.database_error()
            .is_some_and(DatabaseError::is_execution_error)
    }
    fn is_configuration_error(&self) -> bool {
        self.database_error()
            .is_some_and(DatabaseError::is_configuration_error)
    }
    fn is_orm_error(&self) -> bool {
        self.database_error().is_some_and(DatabaseError::is_orm_error)
    }
}

impl ErrorKind for anyhow::Error {
    fn database_error(&self) -> Option<&DatabaseError> {
        self.chain().find_map(|e| e.downcast_ref::<DatabaseError>())
    }
}
