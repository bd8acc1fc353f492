//! Native error descriptor surfaced by every driver failure

/// Error descriptor reported by a native driver.
///
/// Carries the driver's human-readable message and, when the driver reports
/// one, its native error code. Higher layers wrap this descriptor together
/// with context (the offending SQL text, the logical connection name).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DriverError {
   /// Human-readable message from the native driver
   pub message: String,

   /// Native error code, when the driver reports one (e.g. `SQLITE_1`)
   pub code: Option<String>,
}

impl DriverError {
   /// Creates a descriptor with a message and no native code.
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         message: message.into(),
         code: None,
      }
   }
}
