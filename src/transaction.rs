//! Scoped transactions with guaranteed rollback on abandonment

use std::ops::Deref;

use tracing::warn;

use crate::database::Database;
use crate::{Error, Result};

/// Lifecycle state of a [`Transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
   /// Begun and neither committed nor rolled back
   Started,
   /// Explicitly committed; terminal
   Committed,
   /// Rolled back, explicitly or at end of scope; terminal
   RolledBack,
}

/// A transaction bracketing statements on one connection.
///
/// Derefs to [`Database`], so every statement facility is available inside
/// the bracket. Dropping a transaction that is still `Started` rolls it
/// back unconditionally: no transaction begun by this object is ever left
/// open past its scope.
///
/// # Examples
///
/// ```no_run
/// use sqlkit::{Transaction, params};
///
/// # fn demo() -> sqlkit::Result<()> {
/// let mut t = Transaction::open_default()?;
///
/// t.exec_non_query("CREATE TABLE t (a int, b int, c int, d text)")?;
/// t.insert_into("t")
///    .values(params![1, 2, 3, "row1"])
///    .values(params![4, 5, 6, "row2"])
///    .exec()?;
///
/// // Rolled back at end of scope unless explicitly committed
/// t.commit()?;
/// # Ok(())
/// # }
/// ```
#[must_use = "if unused, the transaction is immediately rolled back"]
pub struct Transaction {
   db: Database,
   state: TransactionState,
}

impl Transaction {
   /// Begins a transaction on `db`'s connection.
   ///
   /// A failed begin surfaces as [`Error::Transaction`] and no transaction
   /// object is produced.
   pub fn new(db: Database) -> Result<Self> {
      db.connection()
         .begin()
         .map_err(|source| Error::Transaction { source })?;

      Ok(Self {
         db,
         state: TransactionState::Started,
      })
   }

   /// Opens the logical connection `name` and begins a transaction on it.
   pub fn open(name: &str) -> Result<Self> {
      Self::new(Database::open(name)?)
   }

   /// Opens the default logical connection and begins a transaction.
   pub fn open_default() -> Result<Self> {
      Self::new(Database::open_default()?)
   }

   /// Commits the transaction.
   ///
   /// A no-op once committed. On failure the state stays `Started`, so the
   /// caller may retry or let end-of-scope rollback take over.
   pub fn commit(&mut self) -> Result<()> {
      if self.state == TransactionState::Committed {
         return Ok(());
      }

      self
         .db
         .connection()
         .commit()
         .map_err(|source| Error::Transaction { source })?;

      self.state = TransactionState::Committed;
      Ok(())
   }

   /// Rolls back the transaction, best-effort.
   ///
   /// A no-op once committed. The state becomes `RolledBack` whether or
   /// not the native call succeeds; returns the native call's success.
   pub fn rollback(&mut self) -> bool {
      if self.state == TransactionState::Committed {
         return false;
      }

      let rolled_back = match self.db.connection().rollback() {
         Ok(()) => true,
         Err(err) => {
            warn!(error = %err, "transaction rollback failed");
            false
         }
      };

      self.state = TransactionState::RolledBack;
      rolled_back
   }

   /// Current lifecycle state.
   pub fn state(&self) -> TransactionState {
      self.state
   }

   /// True once the transaction has been committed successfully.
   pub fn is_committed(&self) -> bool {
      self.state == TransactionState::Committed
   }
}

impl Deref for Transaction {
   type Target = Database;

   fn deref(&self) -> &Self::Target {
      &self.db
   }
}

impl Drop for Transaction {
   fn drop(&mut self) {
      // Destructors must not fail: the rollback attempt is unconditional
      // and any native failure is swallowed.
      if self.state == TransactionState::Started {
         if let Err(err) = self.db.connection().rollback() {
            warn!(error = %err, "implicit rollback at end of scope failed");
         }
      }
   }
}
