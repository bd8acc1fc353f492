//! Error types for sqlkit-conn-mgr

use sqlkit_driver::DriverError;
use thiserror::Error;

/// Errors that may occur when resolving a logical connection.
#[derive(Error, Debug)]
pub enum Error {
   /// No settings have been registered for the requested logical name.
   #[error("no database settings registered for connection '{0}'")]
   Configuration(String),

   /// Opening the physical connection failed (after one retry); carries
   /// the native error descriptor.
   #[error("failed to open connection '{name}': {source}")]
   Open {
      /// Logical connection name
      name: String,
      /// Native error reported by the driver
      source: DriverError,
   },
}
