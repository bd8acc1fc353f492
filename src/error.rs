//! Error types for sqlkit operations

use sqlkit_driver::DriverError;

/// Result type alias for sqlkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the statement layer.
///
/// Every native failure arrives as one of these, carrying the native error
/// descriptor verbatim; there is no retry anywhere in this layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from the connection registry (unregistered name, failed open).
   #[error(transparent)]
   ConnectionManager(#[from] sqlkit_conn_mgr::Error),

   /// Beginning or committing a transaction failed.
   #[error("transaction failed: {source}")]
   Transaction {
      /// Native error reported by the driver
      source: DriverError,
   },

   /// Executing or binding a statement failed; carries the offending SQL
   /// text for diagnostics.
   #[error("statement failed: {source} (sql: {sql})")]
   Statement {
      /// SQL text of the failed statement, verbatim
      sql: String,
      /// Native error reported by the driver
      source: DriverError,
   },
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> &'static str {
      match self {
         Error::ConnectionManager(sqlkit_conn_mgr::Error::Configuration(_)) => {
            "CONFIGURATION_ERROR"
         }
         Error::ConnectionManager(sqlkit_conn_mgr::Error::Open { .. }) => "CONNECTION_ERROR",
         Error::Transaction { .. } => "TRANSACTION_ERROR",
         Error::Statement { .. } => "STATEMENT_ERROR",
      }
   }
}
