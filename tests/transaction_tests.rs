//! Tests for transaction lifecycle: scoped rollback, commit durability,
//! and state transitions.

use sqlkit::{Database, DbSetting, Transaction, TransactionState, configure, params};

fn test_db(name: &str) -> Database {
   configure(name, DbSetting::sqlite_in_memory());
   let db = Database::open(name).unwrap();
   db.exec_non_query("CREATE TABLE testTable (a int, b int, c int, d text)")
      .unwrap();
   db
}

fn count(db: &Database) -> i64 {
   db.scalar("SELECT COUNT(*) FROM testTable").unwrap()
}

#[test]
fn test_drop_without_commit_rolls_back() {
   let db = test_db("tx-rollback-law");

   {
      let t = db.begin_transaction().unwrap();
      t.insert_into("testTable (a, b, c, d)")
         .values(params![1, 2, 3, "a"])
         .values(params![4, 5, 6, "b"])
         .exec()
         .unwrap();

      assert_eq!(count(&t), 2);
      // Out of scope without commit
   }

   // A fresh look at the same connection observes none of those rows
   assert_eq!(count(&db), 0);
}

#[test]
fn test_commit_is_durable_across_transaction_objects() {
   let db = test_db("tx-commit-durable");

   {
      let mut t = db.begin_transaction().unwrap();
      t.insert_into("testTable (a, b, c, d)")
         .values(params![1, 2, 3, "a"])
         .exec()
         .unwrap();
      t.commit().unwrap();
   }

   let t = db.begin_transaction().unwrap();
   assert_eq!(count(&t), 1);
   drop(t);
   assert_eq!(count(&db), 1);
}

#[test]
fn test_commit_is_idempotent() {
   let db = test_db("tx-commit-idempotent");

   let mut t = db.begin_transaction().unwrap();
   t.insert_into("testTable (a, b, c, d)")
      .values(params![1, 2, 3, "a"])
      .exec()
      .unwrap();

   t.commit().unwrap();
   // Second commit is a no-op, not an error
   t.commit().unwrap();
   assert!(t.is_committed());
}

#[test]
fn test_explicit_rollback_discards_writes() {
   let db = test_db("tx-explicit-rollback");

   let mut t = db.begin_transaction().unwrap();
   t.insert_into("testTable (a, b, c, d)")
      .values(params![1, 2, 3, "a"])
      .exec()
      .unwrap();

   assert!(t.rollback());
   assert_eq!(t.state(), TransactionState::RolledBack);
   drop(t);

   assert_eq!(count(&db), 0);
}

#[test]
fn test_rollback_after_commit_is_a_no_op() {
   let db = test_db("tx-rollback-after-commit");

   let mut t = db.begin_transaction().unwrap();
   t.insert_into("testTable (a, b, c, d)")
      .values(params![1, 2, 3, "a"])
      .exec()
      .unwrap();
   t.commit().unwrap();

   assert!(!t.rollback());
   assert_eq!(t.state(), TransactionState::Committed);
   drop(t);

   // The committed row survives
   assert_eq!(count(&db), 1);
}

#[test]
fn test_failed_statement_still_rolls_back_on_drop() {
   let db = test_db("tx-failed-statement");

   {
      let t = db.begin_transaction().unwrap();
      t.insert_into("testTable (a, b, c, d)")
         .values(params![1, 2, 3, "a"])
         .exec()
         .unwrap();

      // The failure leaves the transaction open; scope exit cleans up
      let err = t.exec_non_query("INSERT INTO noSuchTable VALUES (1)");
      assert!(err.is_err());
   }

   assert_eq!(count(&db), 0);
}

#[test]
fn test_transaction_state_starts_started() {
   let db = test_db("tx-state");

   let mut t = db.begin_transaction().unwrap();
   assert_eq!(t.state(), TransactionState::Started);
   assert!(!t.is_committed());

   t.commit().unwrap();
   assert_eq!(t.state(), TransactionState::Committed);
}

#[test]
fn test_commit_is_visible_across_physical_connections() {
   let dir = tempfile::TempDir::new().unwrap();
   let path = dir.path().join("tx.db");

   // Two logical names over the same file: two physical connections
   configure("tx-file-a", DbSetting::sqlite_file(path.to_string_lossy()));
   configure("tx-file-b", DbSetting::sqlite_file(path.to_string_lossy()));

   {
      let mut t = Transaction::open("tx-file-a").unwrap();
      t.exec_non_query("CREATE TABLE testTable (a int, b int, c int, d text)")
         .unwrap();
      t.insert_into("testTable (a, b, c, d)")
         .values(params![1, 2, 3, "a"])
         .exec()
         .unwrap();
      t.commit().unwrap();
   }

   let db = Database::open("tx-file-b").unwrap();
   assert_eq!(count(&db), 1);
}

#[test]
fn test_transaction_open_by_logical_name() {
   configure("tx-open-name", DbSetting::sqlite_in_memory());

   {
      let mut t = Transaction::open("tx-open-name").unwrap();
      t.exec_non_query("CREATE TABLE testTable (a int, b int, c int, d text)")
         .unwrap();
      t.insert_into("testTable (a, b, c, d)")
         .values(params![1, 2, 3, "a"])
         .exec()
         .unwrap();
      t.commit().unwrap();
   }

   // Same thread resolves the same pooled connection
   let db = Database::open("tx-open-name").unwrap();
   assert_eq!(count(&db), 1);
}
