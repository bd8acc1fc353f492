//! The capability trait sqlkit requires from a native driver

use crate::{DriverResult, Value};

/// Outcome of a non-row-returning statement.
#[derive(Debug, Clone, Default)]
pub struct ExecSummary {
   /// Number of rows the statement changed, or -1 if unknown
   pub rows_affected: i64,

   /// Row id of the most recent successful INSERT on this connection.
   ///
   /// Only meaningful directly after an INSERT; drivers without rowid
   /// support report `None`.
   pub last_insert_id: Option<i64>,
}

/// Fully-fetched native result set.
///
/// Drivers materialize the whole result before handing it back; the cursor
/// layer owns navigation and per-row decoding over this buffer.
#[derive(Debug, Clone, Default)]
pub struct NativeRows {
   /// Result column names, in select-list order
   pub columns: Vec<String>,

   /// Row data, one `Value` per column
   pub rows: Vec<Vec<Value>>,

   /// Rows changed by the statement (for row-returning statements this
   /// reflects the connection's most recent write)
   pub rows_affected: i64,

   /// Row id of the most recent successful INSERT on this connection
   pub last_insert_id: Option<i64>,
}

/// The native driver capability set.
///
/// This is the only surface the rest of sqlkit depends on: any driver
/// implementing it is usable interchangeably. Implementations are owned by
/// exactly one thread (handles are shared via `Rc`, never across threads),
/// so methods take `&self` and drivers use interior mutability where their
/// native handle demands it.
pub trait Connection {
   /// Process-unique identifier assigned by the pool that opened this
   /// connection.
   fn id(&self) -> &str;

   /// Short name of the driver backing this connection (e.g. `"sqlite"`).
   fn driver_name(&self) -> &'static str;

   /// Returns false once [`Connection::close`] has been called.
   fn is_open(&self) -> bool;

   /// Marks the connection unusable. Subsequent operations fail with a
   /// driver error; the native handle is released when the last reference
   /// drops.
   fn close(&self);

   /// Executes a non-row-returning statement with no parameters.
   fn execute(&self, sql: &str) -> DriverResult<ExecSummary>;

   /// Prepares (or reuses a cached compilation of) `sql`, binds `params`
   /// positionally, and executes a non-row-returning statement.
   fn execute_with(&self, sql: &str, params: &[Value]) -> DriverResult<ExecSummary>;

   /// Batched execution: `columns[i]` holds the value of placeholder `i`
   /// for every row, all columns the same length. One logical round trip.
   fn execute_batch(&self, sql: &str, columns: &[Vec<Value>]) -> DriverResult<ExecSummary>;

   /// Prepares (or reuses a cached compilation of) `sql`, binds `params`
   /// positionally, executes, and fetches the full result set.
   fn query(&self, sql: &str, params: &[Value]) -> DriverResult<NativeRows>;

   /// Begins a native transaction.
   fn begin(&self) -> DriverResult<()>;

   /// Commits the current native transaction.
   fn commit(&self) -> DriverResult<()>;

   /// Rolls back the current native transaction.
   fn rollback(&self) -> DriverResult<()>;
}
