//! # sqlkit
//!
//! A statement-construction and execution layer between application code
//! and a native relational-database driver. It provides:
//!
//! - [`Transaction`] — scoped transactions with automatic rollback on
//!   abandonment
//! - [`InsertQuery`] / [`UpdateQuery`] / [`DeleteQuery`] — fluent builders
//!   compiling to parameterized SQL
//! - [`PreparedQuery`] — compile-once statements with positional,
//!   directional (in/out/in-out), and aliased parameter binding
//! - [`QueryResult`] — a row cursor materializing rows as maps, ordered
//!   lists, typed vectors, tuples, or struct fields
//! - a connection registry with per-thread pooling, keyed by logical
//!   connection name (re-exported from `sqlkit-conn-mgr`)
//!
//! Execution is purely synchronous on the calling thread; physical
//! connections are never shared across threads.
//!
//! # Example
//!
//! ```no_run
//! use sqlkit::{DbSetting, Transaction, params};
//!
//! fn main() -> sqlkit::Result<()> {
//!    sqlkit::configure_default(DbSetting::sqlite_in_memory());
//!
//!    let mut t = Transaction::open_default()?;
//!
//!    t.exec_non_query("CREATE TABLE t (a int, b int, c int, d text)")?;
//!
//!    t.insert_into("t")
//!       .values(params![1, 2, 3, "row1"])
//!       .values(params![4, 5, 6, "row2"])
//!       .values(params![7, 8, 9, "row3"])
//!       .exec()?;
//!
//!    let mut query = t.prepare("SELECT a, b, c, d FROM t WHERE a=?");
//!    let mut res = query.exec(params![4])?;
//!    while res.next() {
//!       println!("{:?}", res.to_map());
//!    }
//!
//!    t.update("t")
//!       .set("a", 111)
//!       .set("b", 222)
//!       .where_("c = ? OR c = ?", params![3, 6])?;
//!
//!    // Rolled back at end of scope if not explicitly committed
//!    t.commit()?;
//!    Ok(())
//! }
//! ```

pub mod builders;
pub mod database;
pub mod error;
pub mod prepared;
pub mod record;
pub mod result;
pub mod transaction;
pub mod util;

pub use builders::{DeleteQuery, InsertQuery, UpdateQuery};
pub use database::Database;
pub use error::{Error, Result};
pub use prepared::{Direction, Param, PreparedQuery};
pub use record::RecordFields;
pub use result::{FetchVars, NonQueryResult, QueryResult};
pub use transaction::{Transaction, TransactionState};

// Re-export the driver vocabulary and the registry surface
pub use sqlkit_conn_mgr::{
   DEFAULT_CONNECTION, DbSetting, DriverKind, acquire, acquire_default, configure,
   configure_default, is_configured,
};
pub use sqlkit_driver::{
   Connection, DriverError, DriverResult, ExecSummary, FromValue, NativeRows, SqliteConnection,
   Value, params,
};
