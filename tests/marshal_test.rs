//! Tests for the marshalling layer against a bundled in-memory SQLite
//! Run with: cargo test --test marshal_test

use rusqlite::{ffi, Connection};
use sqlite_bridge::marshal::{
    self, bind_blob, bind_bytes, bind_double, bind_int64, bind_null, bind_parameter_count,
    bind_parameter_index, bind_text, column_count, column_name, column_type, extract_bytes,
    extract_double, extract_int64, extract_string, extract_text16, read_error_message, ColumnType,
    DbHandle, Error, HandleCell, StatusCode,
};

fn open() -> (Connection, DbHandle) {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    let db = unsafe { DbHandle::from_raw(conn.handle()) }.expect("non-null handle");
    (conn, db)
}

fn with_table(conn: &Connection) {
    conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, v)")
        .expect("create table");
}

/// Insert one value through `bind`, then select it back positioned on its row
fn store_and_select<F>(db: DbHandle, bind: F) -> marshal::RawStatement
where
    F: FnOnce(&marshal::RawStatement) -> StatusCode,
{
    let insert = marshal::prepare(db, "INSERT INTO t (v) VALUES (?1)").unwrap();
    assert!(bind(&insert).is_ok());
    assert!(insert.step().is_done());
    assert!(insert.finalize().is_ok());

    let select = marshal::prepare(db, "SELECT v FROM t ORDER BY id DESC LIMIT 1").unwrap();
    assert!(select.step().is_row());
    select
}

mod binding_tests {
    use super::*;

    #[test]
    fn blob_round_trip_scenario() {
        let (conn, db) = open();
        with_table(&conn);

        let data = vec![0x01u8, 0x02, 0x03, 0x04];
        let select = store_and_select(db, |stmt| bind_blob(stmt, 1, &data));

        assert_eq!(column_type(&select, 0), ColumnType::Blob);
        assert_eq!(extract_bytes(&select, 0).unwrap(), Some(vec![1, 2, 3, 4]));
    }

    #[test]
    fn bind_bytes_matches_bind_blob() {
        let (conn, db) = open();
        with_table(&conn);

        let data: Vec<u8> = (0..=255).collect();
        let select = store_and_select(db, |stmt| bind_bytes(stmt, 1, &data));

        assert_eq!(column_type(&select, 0), ColumnType::Blob);
        assert_eq!(extract_bytes(&select, 0).unwrap(), Some(data));
    }

    #[test]
    fn bound_buffer_may_be_dropped_before_step() {
        let (conn, db) = open();
        with_table(&conn);

        let insert = marshal::prepare(db, "INSERT INTO t (v) VALUES (?1)").unwrap();
        {
            let mut transient = b"copied at bind".to_vec();
            assert!(bind_text(&insert, 1, &transient).is_ok());
            transient.iter_mut().for_each(|b| *b = b'x');
        }
        assert!(insert.step().is_done());
        drop(insert);

        let select = marshal::prepare(db, "SELECT v FROM t").unwrap();
        assert!(select.step().is_row());
        assert_eq!(
            extract_string(&select, 0).unwrap(),
            Some(b"copied at bind".to_vec())
        );
    }

    #[test]
    fn empty_blob_is_not_null() {
        let (conn, db) = open();
        with_table(&conn);

        let select = store_and_select(db, |stmt| bind_blob(stmt, 1, &[]));

        assert_eq!(column_type(&select, 0), ColumnType::Blob);
        assert_eq!(extract_bytes(&select, 0).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn null_extracts_as_none() {
        let (conn, db) = open();
        with_table(&conn);

        let select = store_and_select(db, |stmt| bind_null(stmt, 1));

        assert_eq!(column_type(&select, 0), ColumnType::Null);
        assert_eq!(extract_bytes(&select, 0).unwrap(), None);
        assert_eq!(extract_string(&select, 0).unwrap(), None);
        assert_eq!(extract_text16(&select, 0).unwrap(), None);
        assert_eq!(extract_int64(&select, 0), None);
        assert_eq!(extract_double(&select, 0), None);
    }

    #[test]
    fn numeric_binds() {
        let (conn, db) = open();
        with_table(&conn);

        let stmt = marshal::prepare(db, "SELECT ?1, ?2").unwrap();
        assert!(bind_int64(&stmt, 1, i64::MIN).is_ok());
        assert!(bind_double(&stmt, 2, 2.5).is_ok());
        assert!(stmt.step().is_row());

        assert_eq!(column_type(&stmt, 0), ColumnType::Integer);
        assert_eq!(extract_int64(&stmt, 0), Some(i64::MIN));
        assert_eq!(column_type(&stmt, 1), ColumnType::Float);
        assert_eq!(extract_double(&stmt, 1), Some(2.5));
    }

    #[test]
    fn out_of_range_index_is_forwarded() {
        let (_conn, db) = open();

        let stmt = marshal::prepare(db, "SELECT ?1").unwrap();
        assert_eq!(bind_blob(&stmt, 2, b"x").code(), ffi::SQLITE_RANGE);
        assert_eq!(bind_text(&stmt, 0, b"x").code(), ffi::SQLITE_RANGE);
        assert_eq!(bind_null(&stmt, 7).code(), ffi::SQLITE_RANGE);
    }

    #[test]
    fn named_parameters() {
        let (_conn, db) = open();

        let stmt = marshal::prepare(db, "SELECT :a, $b, ?3").unwrap();
        assert_eq!(bind_parameter_count(&stmt), 3);
        assert_eq!(bind_parameter_index(&stmt, ":a").unwrap(), 1);
        assert_eq!(bind_parameter_index(&stmt, "$b").unwrap(), 2);
        assert_eq!(bind_parameter_index(&stmt, ":missing").unwrap(), 0);
        assert!(matches!(
            bind_parameter_index(&stmt, "bad\0name"),
            Err(Error::InteriorNul { .. })
        ));
    }

    #[test]
    fn constraint_violation_status_is_verbatim() {
        let (conn, db) = open();
        conn.execute_batch("CREATE TABLE u (k BLOB UNIQUE)").unwrap();

        for expected_done in [true, false] {
            let insert = marshal::prepare(db, "INSERT INTO u (k) VALUES (?1)").unwrap();
            assert!(bind_blob(&insert, 1, b"dup").is_ok());
            let rc = insert.step();
            if expected_done {
                assert!(rc.is_done());
            } else {
                assert_eq!(rc.primary(), ffi::SQLITE_CONSTRAINT);
                assert_eq!(db.errcode().code(), ffi::SQLITE_CONSTRAINT_UNIQUE);
            }
        }
    }
}

mod extraction_tests {
    use super::*;

    #[test]
    fn text16_code_units() {
        let (conn, db) = open();
        with_table(&conn);

        let text = "h\u{e9}llo \u{1F600}";
        let select = store_and_select(db, |stmt| bind_text(stmt, 1, text.as_bytes()));

        let units = extract_text16(&select, 0).unwrap().unwrap();
        let expected: Vec<u16> = text.encode_utf16().collect();
        assert_eq!(units, expected);
        assert_eq!(String::from_utf16(&units).unwrap(), text);
    }

    #[test]
    fn empty_text16() {
        let (conn, db) = open();
        with_table(&conn);

        let select = store_and_select(db, |stmt| bind_text(stmt, 1, b""));

        assert_eq!(column_type(&select, 0), ColumnType::Text);
        assert_eq!(extract_text16(&select, 0).unwrap(), Some(Vec::new()));
        assert_eq!(extract_string(&select, 0).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn string_path_is_byte_exact() {
        let (conn, db) = open();
        with_table(&conn);

        let text = "caf\u{e9} \u{4e16}\u{754c}";
        let select = store_and_select(db, |stmt| bind_text(stmt, 1, text.as_bytes()));

        assert_eq!(column_type(&select, 0), ColumnType::Text);
        assert_eq!(
            extract_string(&select, 0).unwrap(),
            Some(text.as_bytes().to_vec())
        );
    }

    #[test]
    fn column_names_multi_column() {
        let (conn, db) = open();
        conn.execute_batch("CREATE TABLE people (first_name TEXT, age INTEGER)")
            .unwrap();

        let stmt = marshal::prepare(db, "SELECT first_name, age, age + 1 AS next_age, 42 FROM people")
            .unwrap();
        assert_eq!(column_count(&stmt), 4);
        assert_eq!(column_name(&stmt, 0).unwrap(), b"first_name".to_vec());
        assert_eq!(column_name(&stmt, 1).unwrap(), b"age".to_vec());
        assert_eq!(column_name(&stmt, 2).unwrap(), b"next_age".to_vec());
        assert_eq!(column_name(&stmt, 3).unwrap(), b"42".to_vec());
        // out of range: the engine returns no name
        assert_eq!(column_name(&stmt, 9).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn values_are_copied_out() {
        let (conn, db) = open();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, v);
             INSERT INTO t (v) VALUES (x'aabb'), (x'ccdd');",
        )
        .unwrap();

        let select = marshal::prepare(db, "SELECT v FROM t ORDER BY id").unwrap();
        assert!(select.step().is_row());
        let first = extract_bytes(&select, 0).unwrap();
        assert!(select.step().is_row());
        let second = extract_bytes(&select, 0).unwrap();
        assert!(select.step().is_done());
        drop(select);

        assert_eq!(first, Some(vec![0xaa, 0xbb]));
        assert_eq!(second, Some(vec![0xcc, 0xdd]));
    }

    #[test]
    fn odd_length_blob_is_not_wide_text() {
        let (conn, db) = open();
        conn.execute_batch(
            "PRAGMA encoding = 'UTF-16le';
             CREATE TABLE t (id INTEGER PRIMARY KEY, v);
             INSERT INTO t (v) VALUES (x'414243');",
        )
        .unwrap();

        let select = marshal::prepare(db, "SELECT v FROM t").unwrap();
        assert!(select.step().is_row());
        assert_eq!(
            extract_text16(&select, 0),
            Err(Error::OddText16Length { len: 3 })
        );
        assert_eq!(extract_bytes(&select, 0).unwrap(), Some(vec![65, 66, 67]));
    }
}

mod handle_tests {
    use super::*;
    use std::ptr;

    #[test]
    fn reference_cell_holds_the_engine_handle() {
        let (_conn, db) = open();

        let mut cell = HandleCell::<ffi::sqlite3_stmt>::allocate().unwrap();
        assert_eq!(cell.read(), None);

        let sql = "SELECT 1";
        let rc = cell.fill(|out| unsafe {
            ffi::sqlite3_prepare_v2(
                db.as_ptr(),
                sql.as_ptr() as *const _,
                sql.len() as i32,
                out,
                ptr::null_mut(),
            )
        });
        assert!(rc.is_ok());

        let handle = cell.read().expect("cell was written");
        assert!(!handle.is_null());
        assert_eq!(cell.read(), Some(handle));
        let listed = unsafe { ffi::sqlite3_next_stmt(db.as_ptr(), ptr::null_mut()) };
        assert_eq!(listed, handle);

        assert_eq!(unsafe { ffi::sqlite3_finalize(handle) }, ffi::SQLITE_OK);
    }

    #[test]
    fn statement_reset_and_rebind() {
        let (_conn, db) = open();

        let stmt = marshal::prepare(db, "SELECT ?1").unwrap();
        for value in [b"one".as_slice(), b"two".as_slice()] {
            assert!(stmt.reset().is_ok());
            assert!(stmt.clear_bindings().is_ok());
            assert!(bind_blob(&stmt, 1, value).is_ok());
            assert!(stmt.step().is_row());
            assert_eq!(extract_bytes(&stmt, 0).unwrap(), Some(value.to_vec()));
        }
        assert_eq!(stmt.sql(), "SELECT ?1");
        assert!(stmt.readonly());
    }

    #[test]
    fn empty_sql_has_no_statement() {
        let (_conn, db) = open();
        assert_eq!(
            marshal::prepare(db, "-- nothing").unwrap_err(),
            Error::NullHandle("sqlite3_prepare_v2")
        );
    }
}

mod error_message_tests {
    use super::*;

    #[test]
    fn fresh_connection_has_no_message() {
        let (_conn, db) = open();
        assert!(read_error_message(db).unwrap().is_empty());
    }

    #[test]
    fn failed_prepare_leaves_engine_message() {
        let (_conn, db) = open();

        let err = marshal::prepare(db, "SELECT * FROM missing_table").unwrap_err();
        let message = read_error_message(db).unwrap();
        assert_eq!(message, b"no such table: missing_table".to_vec());
        assert_eq!(err.native_code(), Some(ffi::SQLITE_ERROR));
        assert!(err.to_string().contains("no such table: missing_table"));
    }

    #[test]
    fn message_clears_after_success() {
        let (_conn, db) = open();

        assert!(marshal::prepare(db, "SELEKT 1").is_err());
        assert!(!read_error_message(db).unwrap().is_empty());

        let ok = marshal::prepare(db, "SELECT 1").unwrap();
        assert!(ok.step().is_row());
        assert!(read_error_message(db).unwrap().is_empty());
    }
}

mod on_disk_tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.db");

        {
            let conn = Connection::open(&path).unwrap();
            with_table(&conn);
            let db = unsafe { DbHandle::from_raw(conn.handle()) }.unwrap();
            let insert = marshal::prepare(db, "INSERT INTO t (v) VALUES (?1)").unwrap();
            assert!(bind_text(&insert, 1, "persisted \u{2713}".as_bytes()).is_ok());
            assert!(insert.step().is_done());
        }

        let conn = Connection::open(&path).unwrap();
        let db = unsafe { DbHandle::from_raw(conn.handle()) }.unwrap();
        let select = marshal::prepare(db, "SELECT v FROM t").unwrap();
        assert!(select.step().is_row());
        let units = extract_text16(&select, 0).unwrap().unwrap();
        assert_eq!(String::from_utf16(&units).unwrap(), "persisted \u{2713}");
    }
}
