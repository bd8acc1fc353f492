//! Tests for query execution, cursor navigation, and row materialization.

use sqlkit::{Database, DbSetting, FromValue, RecordFields, Value, configure, params};

fn test_db(name: &str) -> Database {
   configure(name, DbSetting::sqlite_in_memory());
   let db = Database::open(name).unwrap();
   db.exec_non_query("CREATE TABLE testTable (a int, b int, c int, d text)")
      .unwrap();

   db.insert_into("testTable (a, b, c, d)")
      .values(params![1, 2, 3, "a"])
      .values(params![4, 5, 6, "b"])
      .values(params![7, 8, 9, "c"])
      .exec()
      .unwrap();

   db
}

#[test]
fn test_column_names_captured_once_and_reflect_select_list() {
   let db = test_db("select-columns");

   // Two of the four table columns are selected: two names, no more
   let mut res = db.exec_query("SELECT a, c FROM testTable").unwrap();
   assert!(res.field_names().is_empty());

   assert!(res.next());
   assert_eq!(res.field_names(), ["a", "c"]);

   while res.next() {}
   assert_eq!(res.field_names(), ["a", "c"]);
}

#[test]
fn test_to_map_follows_column_order() {
   let db = test_db("select-map");

   let mut res = db.exec_query("SELECT d, a FROM testTable").unwrap();
   assert!(res.next());

   let map = res.to_map();
   let keys: Vec<&String> = map.keys().collect();
   assert_eq!(keys, ["d", "a"]);
   assert_eq!(map["d"], Value::Text("a".into()));
   assert_eq!(map["a"], Value::Integer(1));
}

#[test]
fn test_to_vec_and_string_vec() {
   let db = test_db("select-vec");

   let mut res = db.exec_query("SELECT a, b, c, d FROM testTable").unwrap();
   assert!(res.next());

   assert_eq!(
      res.to_vec(),
      vec![
         Value::Integer(1),
         Value::Integer(2),
         Value::Integer(3),
         Value::Text("a".into()),
      ]
   );
   assert_eq!(res.to_string_vec(), ["1", "2", "3", "a"]);
}

#[test]
fn test_fetch_vars_restarts_at_first_column_per_call() {
   let db = test_db("select-fetch-vars");

   let mut res = db.exec_query("SELECT a, b, c, d FROM testTable").unwrap();

   // First row: consume three columns
   assert!(res.next());
   let (a, b, c): (i64, i64, i64) = res.fetch_vars();
   assert_eq!((a, b, c), (1, 2, 3));

   // Second row: a shorter read still starts from the first column
   assert!(res.next());
   let a: i64 = res.fetch_vars();
   assert_eq!(a, 4);

   // Mixed target types convert per element
   assert!(res.next());
   let (a, flag, d): (i64, bool, String) = res.fetch_vars();
   assert_eq!(a, 7);
   assert!(flag);
   assert_eq!(d, "9");
}

#[test]
fn test_typed_vec_flags() {
   let db = test_db("select-typed");
   db.delete_from("testTable").exec().unwrap();
   db.insert_into("testTable (a, b, c, d)")
      .values(params![1, None::<i64>, 3, "junk"])
      .exec()
      .unwrap();

   let mut res = db.exec_query("SELECT a, b, c, d FROM testTable").unwrap();
   assert!(res.next());

   // Defaults fill in for both the NULL and the unparsable text
   assert_eq!(res.to_typed_vec::<i64>(false, false), [1, 0, 3, 0]);
   // Unconvertible elided, NULL still zero-filled
   assert_eq!(res.to_typed_vec::<i64>(true, false), [1, 0, 3]);
   // Both elided
   assert_eq!(res.to_typed_vec::<i64>(true, true), [1, 3]);
}

// Text-affinity columns keep digit strings textual, which is what the
// base-N parsing path operates on.
fn parse_fixture(db: &Database) {
   db.exec_non_query("CREATE TABLE parseTable (a text, b text, c text, d int)")
      .unwrap();
}

#[test]
fn test_parse_int_vec_base_10() {
   let db = test_db("select-parse-10");
   parse_fixture(&db);
   db.insert_into("parseTable (a, b, c, d)")
      .values(params!["42", "junk", None::<i64>, 7])
      .exec()
      .unwrap();

   let mut res = db.exec_query("SELECT a, b, c, d FROM parseTable").unwrap();
   assert!(res.next());

   // "junk" is silently elided (not zero-filled); NULL zero-fills
   assert_eq!(res.parse_int_vec(10, false), [42, 0, 7]);
   // NULL elided when requested
   assert_eq!(res.parse_int_vec(10, true), [42, 7]);
}

#[test]
fn test_parse_int_vec_base_16() {
   let db = test_db("select-parse-16");
   parse_fixture(&db);
   db.insert_into("parseTable (a, b, c, d)")
      .values(params!["ff", "1A", "xyz", 10])
      .exec()
      .unwrap();

   let mut res = db.exec_query("SELECT a, b, c, d FROM parseTable").unwrap();
   assert!(res.next());

   // Numeric values coerce directly and are not re-parsed in the base
   assert_eq!(res.parse_int_vec(16, false), [255, 26, 10]);
}

#[test]
fn test_parse_int_vec_base_2() {
   let db = test_db("select-parse-2");
   parse_fixture(&db);
   db.insert_into("parseTable (a, b, c, d)")
      .values(params!["101", "2", "-11", None::<i64>])
      .exec()
      .unwrap();

   let mut res = db.exec_query("SELECT a, b, c, d FROM parseTable").unwrap();
   assert!(res.next());

   // "2" is not a binary digit: elided, not zeroed
   assert_eq!(res.parse_int_vec(2, true), [5, -3]);
}

#[derive(Default)]
struct Row {
   a: i64,
   b: i64,
   c: i64,
   d: String,
   e: i64,
}

impl RecordFields for Row {
   fn writable_fields(&self) -> &'static [&'static str] {
      &["a", "b", "c", "d", "e"]
   }

   fn set_field(&mut self, name: &str, value: &Value) {
      match name {
         "a" => self.a = i64::from_value(value),
         "b" => self.b = i64::from_value(value),
         "c" => self.c = i64::from_value(value),
         "d" => self.d = String::from_value(value),
         "e" => self.e = i64::from_value(value),
         _ => {}
      }
   }
}

#[test]
fn test_fetch_into_assigns_matching_fields_only() {
   let db = test_db("select-object");

   let mut res = db.exec_query("SELECT a, b, c, d FROM testTable").unwrap();
   assert!(res.next());
   assert!(res.next());

   let mut row = Row {
      e: 99,
      ..Row::default()
   };
   res.fetch_into(&mut row);

   assert_eq!((row.a, row.b, row.c), (4, 5, 6));
   assert_eq!(row.d, "b");
   // No "e" column in the result: the field stays untouched
   assert_eq!(row.e, 99);
}

#[test]
fn test_fetch_into_ignores_extra_columns() {
   let db = test_db("select-object-extra");

   #[derive(Default)]
   struct Narrow {
      d: String,
   }

   impl RecordFields for Narrow {
      fn writable_fields(&self) -> &'static [&'static str] {
         &["d"]
      }

      fn set_field(&mut self, name: &str, value: &Value) {
         if name == "d" {
            self.d = String::from_value(value);
         }
      }
   }

   let mut res = db.exec_query("SELECT a, b, c, d FROM testTable").unwrap();
   assert!(res.next());

   let mut narrow = Narrow::default();
   res.fetch_into(&mut narrow);
   assert_eq!(narrow.d, "a");
}

#[test]
fn test_scalar_of_empty_result_is_default_not_error() {
   let db = test_db("select-scalar-empty");

   let count: i64 = db
      .scalar("SELECT a FROM testTable WHERE a = 12345")
      .unwrap();
   assert_eq!(count, 0);

   let raw = db
      .scalar_value("SELECT a FROM testTable WHERE a = 12345")
      .unwrap();
   assert_eq!(raw, Value::Null);
}

#[test]
fn test_scalar_conversions() {
   let db = test_db("select-scalar");

   let n: i64 = db.scalar("SELECT COUNT(*) FROM testTable").unwrap();
   assert_eq!(n, 3);

   let d: String = db
      .scalar("SELECT d FROM testTable WHERE a = 4")
      .unwrap();
   assert_eq!(d, "b");
}

#[test]
fn test_datetime_round_trip_through_text_storage() {
   use time::PrimitiveDateTime;
   use time::macros::datetime;

   let db = test_db("select-datetime");
   db.exec_non_query("CREATE TABLE eventTable (at datetime, d text)")
      .unwrap();

   let stamp = datetime!(2024-03-05 17:30:00);
   db.insert_into("eventTable (at, d)")
      .values(params![stamp, "deadline"])
      .exec()
      .unwrap();

   let mut res = db.exec_query("SELECT at, d FROM eventTable").unwrap();
   assert!(res.next());

   // Stored as ISO text, converted back on fetch
   assert_eq!(res.value(0), Value::Text("2024-03-05 17:30:00".into()));
   let (at, d): (PrimitiveDateTime, String) = res.fetch_vars();
   assert_eq!(at, stamp);
   assert_eq!(d, "deadline");
}

#[test]
fn test_value_named_is_case_insensitive() {
   let db = test_db("select-named");

   let mut res = db.exec_query("SELECT a, d FROM testTable").unwrap();
   assert!(res.next());

   assert_eq!(res.value_named("D"), Value::Text("a".into()));
   assert_eq!(res.value_named("missing"), Value::Null);
}

#[test]
fn test_each_visits_every_row() {
   let db = test_db("select-each");

   let mut total = 0_i64;
   let visited = db
      .each("SELECT a FROM testTable", |row| {
         total += row.scalar::<i64>();
      })
      .unwrap();

   assert_eq!(visited, 3);
   assert_eq!(total, 12);
}

#[test]
fn test_first_and_top() {
   let db = test_db("select-top");

   let mut first_a = 0_i64;
   assert_eq!(
      db.first("SELECT a FROM testTable", |row| first_a = row.scalar())
         .unwrap(),
      1
   );
   assert_eq!(first_a, 1);

   let mut seen = Vec::new();
   assert_eq!(
      db.top("SELECT a FROM testTable", 2, |row| seen
         .push(row.scalar::<i64>()))
         .unwrap(),
      2
   );
   assert_eq!(seen, [1, 4]);
}

#[test]
fn test_range_skips_then_visits() {
   let db = test_db("select-range");

   // Visits exactly the row at index 1
   let mut seen = Vec::new();
   let visited = db
      .range("SELECT a FROM testTable", 1, 1, |row| {
         seen.push(row.scalar::<i64>());
      })
      .unwrap();
   assert_eq!(visited, 1);
   assert_eq!(seen, [4]);

   // Skipping past the end visits nothing
   let visited = db
      .range("SELECT a FROM testTable", 10, 10, |_| {
         panic!("no row should be visited");
      })
      .unwrap();
   assert_eq!(visited, 0);
}

#[test]
fn test_scrollable_navigation() {
   let db = test_db("select-scroll");

   let mut query = db.prepare_scrollable("SELECT a FROM testTable");
   let mut res = query.exec(params![]).unwrap();

   assert!(res.next());
   assert!(res.last());
   assert_eq!(res.scalar::<i64>(), 7);
   assert!(res.previous());
   assert_eq!(res.scalar::<i64>(), 4);
   assert!(res.first());
   assert_eq!(res.scalar::<i64>(), 1);
   assert!(res.seek(2, false));
   assert_eq!(res.scalar::<i64>(), 7);
   assert_eq!(res.size(), 3);
}

#[test]
fn test_forward_only_cursor_refuses_backward_navigation() {
   let db = test_db("select-forward");

   let mut query = db.prepare("SELECT a FROM testTable");
   let mut res = query.exec(params![]).unwrap();

   assert!(res.next());
   assert!(res.next());
   assert!(!res.previous());
   assert!(!res.first());
   assert!(!res.seek(0, false));
   assert!(res.is_forward_only());
}
