//! Connection settings registered under logical names

use serde::{Deserialize, Serialize};

/// Which native driver a [`DbSetting`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverKind {
   /// The bundled embedded SQLite driver (single file or in-memory)
   Sqlite,
}

/// Settings for one logical connection.
///
/// Registered under a logical name via [`crate::configure`]; immutable once
/// a physical connection has been opened from it (re-registration only
/// affects future opens).
///
/// # Examples
///
/// ```
/// use sqlkit_conn_mgr::DbSetting;
///
/// // Embedded conveniences
/// let mem = DbSetting::sqlite_in_memory();
/// let file = DbSetting::sqlite_file("/tmp/app.db");
///
/// assert_eq!(mem.database, ":memory:");
/// assert_eq!(file.database, "/tmp/app.db");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbSetting {
   /// Driver backing this connection
   pub driver: DriverKind,

   /// Server host; empty for embedded drivers
   pub host: String,

   /// Server port, when the driver uses one
   pub port: Option<u16>,

   /// Login username; empty for embedded drivers
   pub username: String,

   /// Login password; empty for embedded drivers
   pub password: String,

   /// Database name, or file path / `:memory:` for embedded drivers
   pub database: String,
}

impl DbSetting {
   /// Settings for an in-memory SQLite database.
   ///
   /// Note that every (thread, logical name) pair opens its own physical
   /// connection, and each in-memory connection is an independent database.
   pub fn sqlite_in_memory() -> Self {
      Self::sqlite_file(":memory:")
   }

   /// Settings for a single-file SQLite database at `path`.
   pub fn sqlite_file(path: impl Into<String>) -> Self {
      Self {
         driver: DriverKind::Sqlite,
         host: String::new(),
         port: None,
         username: String::new(),
         password: String::new(),
         database: path.into(),
      }
   }
}
