//! # sqlkit-conn-mgr
//!
//! Connection registry and per-thread pooling for sqlkit.
//!
//! ## Architecture
//!
//! - **Settings map**: one process-global map of logical connection name to
//!   [`DbSetting`], guarded by a single mutex held only for register/lookup
//! - **Per-thread pools**: each thread lazily owns at most one physical
//!   connection per logical name; connections are never shared across
//!   threads, so no per-query locking exists anywhere
//! - **Teardown**: a thread's pool closes every owned connection when the
//!   thread (or the process) ends
//!
//! ## Usage
//!
//! ```
//! use sqlkit_conn_mgr::{Connection, configure, acquire, DbSetting};
//!
//! configure("main", DbSetting::sqlite_in_memory());
//!
//! let conn = acquire("main").unwrap();
//! conn.execute("CREATE TABLE t (a int)").unwrap();
//!
//! // Same thread, same name: the pooled connection is reused
//! let again = acquire("main").unwrap();
//! assert_eq!(conn.id(), again.id());
//! ```

mod config;
mod error;
mod pool;
mod registry;

pub use config::{DbSetting, DriverKind};
pub use error::Error;
pub use registry::{
   DEFAULT_CONNECTION, acquire, acquire_default, configure, configure_default, is_configured,
};

// Re-export the driver capability trait and error descriptor for callers
// working directly with acquired connections
pub use sqlkit_driver::{Connection, DriverError};

/// A type alias for Results with the connection manager's Error type
pub type Result<T> = std::result::Result<T, Error>;
