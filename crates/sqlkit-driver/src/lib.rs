//! # sqlkit-driver
//!
//! The bottom layer of the sqlkit workspace: the tagged SQL value type, the
//! capability trait every native driver must implement, the native error
//! descriptor, and the bundled SQLite driver.
//!
//! ## Core Types
//!
//! - **[`Value`]**: tagged union covering the SQL-representable scalar types
//! - **[`Connection`]**: the capability set sqlkit requires from a driver
//! - **[`SqliteConnection`]**: rusqlite-backed embedded/in-memory driver
//! - **[`DriverError`]**: native error descriptor carried by every failure
//!
//! Higher layers (`sqlkit-conn-mgr`, `sqlkit`) never talk to a concrete
//! driver; any type implementing [`Connection`] is usable interchangeably.

mod driver;
mod error;
mod sqlite;
mod value;

pub use driver::{Connection, ExecSummary, NativeRows};
pub use error::DriverError;
pub use sqlite::SqliteConnection;
pub use value::{FromValue, Value};

/// A type alias for Results carrying the native error descriptor
pub type DriverResult<T> = std::result::Result<T, DriverError>;
