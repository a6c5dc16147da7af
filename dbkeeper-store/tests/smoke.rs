// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! Smoke tests for dbkeeper-store.
//!
//! Every test works in its own temporary storage directory.

use std::fs;
use std::thread;
use std::time::Duration;

use dbkeeper_store::metadata::keys;
use dbkeeper_store::{
    Catalog, Database, Error, METADATA_TABLE, MetaValue, Metadata, RawOutcome, Record, Value,
};
use rstest::rstest;
use tempfile::TempDir;

fn new_db(name: &str) -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Catalog::new(dir.path()).database(name);
    db.open_or_create(None).unwrap();
    (dir, db)
}

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn text(s: &str) -> Value {
    Value::Text(s.to_owned())
}

/// Verify metadata survives a save/get roundtrip with the automatic keys.
#[test]
fn test_metadata_roundtrip() {
    let (_dir, db) = new_db("meta");
    let metadata = Metadata::new()
        .with(keys::DESCRIPTION, "Inventory")
        .with(keys::OWNER, "ops")
        .with(
            keys::TAGS,
            vec![" demo".to_owned(), "".to_owned(), "stock ".to_owned()],
        );
    db.save_metadata(&metadata).unwrap();

    let stored = db.get_metadata().unwrap().unwrap();
    assert_eq!(stored.text(keys::DESCRIPTION), Some("Inventory"));
    assert_eq!(stored.text(keys::OWNER), Some("ops"));
    assert_eq!(stored.tags(), ["demo", "stock"]);
    assert_eq!(stored.text(keys::DATABASE_NAME), Some("meta.db"));
    assert!(stored.text(keys::CREATED_DATE).is_some());
    assert!(stored.text(keys::LAST_MODIFIED).is_some());
}

/// Verify a fresh database with metadata stores it on creation.
#[test]
fn test_open_or_create_saves_metadata_once() {
    let dir = tempfile::tempdir().unwrap();
    let db = Catalog::new(dir.path()).database("shop");

    let first = Metadata::new().with(keys::DESCRIPTION, "test");
    assert!(db.open_or_create(Some(&first)).unwrap());

    let second = Metadata::new().with(keys::DESCRIPTION, "ignored");
    assert!(!db.open_or_create(Some(&second)).unwrap());

    let stored = db.get_metadata().unwrap().unwrap();
    assert_eq!(stored.text(keys::DESCRIPTION), Some("test"));
}

/// Verify metadata is absent (not empty) when nothing was saved.
#[test]
fn test_metadata_absent() {
    let (_dir, db) = new_db("bare");
    assert_eq!(db.get_metadata().unwrap(), None);

    let dir = tempfile::tempdir().unwrap();
    let missing = Catalog::new(dir.path()).database("nowhere");
    assert_eq!(missing.get_metadata().unwrap(), None);
}

/// Verify updates refresh last_modified but keep created_date.
#[test]
fn test_update_metadata_timestamps() {
    let (_dir, db) = new_db("stamps");
    db.save_metadata(&Metadata::new().with(keys::PURPOSE, "testing"))
        .unwrap();
    let before = db.get_metadata().unwrap().unwrap();

    thread::sleep(Duration::from_millis(5));
    db.update_metadata(
        &Metadata::new()
            .with(keys::OWNER, "alice")
            .with(keys::CREATED_DATE, "1970-01-01T00:00:00.000000"),
    )
    .unwrap();
    let after = db.get_metadata().unwrap().unwrap();

    assert_eq!(
        after.text(keys::CREATED_DATE),
        before.text(keys::CREATED_DATE)
    );
    assert!(after.text(keys::LAST_MODIFIED) >= before.text(keys::LAST_MODIFIED));
    assert_eq!(after.text(keys::OWNER), Some("alice"));
    assert_eq!(after.text(keys::PURPOSE), Some("testing"));

    // A second save must not move created_date either.
    db.save_metadata(&Metadata::new()).unwrap();
    let resaved = db.get_metadata().unwrap().unwrap();
    assert_eq!(
        resaved.text(keys::CREATED_DATE),
        before.text(keys::CREATED_DATE)
    );
}

/// Verify updating a database without metadata fills in the automatic keys.
#[test]
fn test_update_metadata_on_bare_database() {
    let (_dir, db) = new_db("bare");
    assert!(db.get_metadata().unwrap().is_none());

    db.update_metadata(&Metadata::new().with(keys::OWNER, "bob"))
        .unwrap();
    let stored = db.get_metadata().unwrap().unwrap();
    assert_eq!(stored.text(keys::OWNER), Some("bob"));
    assert_eq!(stored.text(keys::DATABASE_NAME), Some("bare.db"));
    assert!(stored.text(keys::CREATED_DATE).is_some());
    assert!(stored.text(keys::LAST_MODIFIED).is_some());

    // Later updates keep the first created_date.
    let created = stored.text(keys::CREATED_DATE).map(str::to_owned);
    thread::sleep(Duration::from_millis(5));
    db.update_metadata(&Metadata::new().with(keys::OWNER, "carol"))
        .unwrap();
    let stored = db.get_metadata().unwrap().unwrap();
    assert_eq!(stored.text(keys::CREATED_DATE).map(str::to_owned), created);
    assert_eq!(stored.text(keys::OWNER), Some("carol"));
}

#[rstest]
#[case("")]
#[case("select")]
#[case("_internal")]
#[case("1abc")]
fn test_create_table_rejects_invalid_names(#[case] name: &str) {
    let (_dir, db) = new_db("names");
    let err = db.create_table(name, "id INTEGER").unwrap_err();
    assert!(matches!(err, Error::InvalidTableName { .. }), "{err}");
    assert!(!db.list_tables().unwrap().contains(&name.to_owned()));
}

#[test]
fn test_create_table_twice() {
    let (_dir, db) = new_db("twice");
    db.create_table("products", "id INTEGER PRIMARY KEY, name TEXT")
        .unwrap();

    let err = db.create_table("products", "other REAL").unwrap_err();
    assert!(err.to_string().contains("already exists"), "{err}");

    let columns = db.column_names("products").unwrap();
    assert_eq!(columns, ["id", "name"]);
}

/// Table names that differ only in case are the same table to SQLite.
#[rstest]
#[case("Products")]
#[case("PRODUCTS")]
fn test_create_table_twice_other_case(#[case] name: &str) {
    let (_dir, db) = new_db("case");
    db.create_table("products", "id INTEGER PRIMARY KEY, name TEXT")
        .unwrap();

    let err = db.create_table(name, "other REAL").unwrap_err();
    assert!(matches!(err, Error::TableExists(_)), "{err}");
    assert!(err.is_validation());

    assert!(db.table_exists(name).unwrap());
    let schema = db.get_schema(name).unwrap().unwrap();
    assert_eq!(schema.len(), 2);
    assert_eq!(db.list_tables().unwrap(), ["products"]);
}

#[test]
fn test_create_table_engine_error() {
    let (_dir, db) = new_db("broken");
    let err = db.create_table("things", "id INTEGER,,").unwrap_err();
    assert!(matches!(err, Error::CreateTable { .. }), "{err}");
    assert!(!db.table_exists("things").unwrap());
}

#[test]
fn test_insert_and_page() {
    let (_dir, db) = new_db("rows");
    db.create_table("t", "id INTEGER PRIMARY KEY, name TEXT")
        .unwrap();

    let err = db.insert("t", &Record::new()).unwrap_err();
    assert!(matches!(err, Error::EmptyRecord { .. }));
    assert_eq!(db.count("t", "").unwrap(), 0);

    let id = db.insert("t", &record(&[("name", text("x"))])).unwrap();
    assert_eq!(id, 1);

    let page = db.get_page("t", 1).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page.columns, ["id", "name"]);
    assert!(page.contains_text("x"));
}

#[test]
fn test_list_tables_hides_metadata_table() {
    let (_dir, db) = new_db("hidden");
    db.create_table("alpha", "a TEXT").unwrap();
    for i in 0..3 {
        db.update_metadata(&Metadata::new().with(keys::OWNER, format!("owner{i}")))
            .unwrap();
    }
    db.create_table("beta", "b TEXT").unwrap();

    let tables = db.list_tables().unwrap();
    assert_eq!(tables, ["alpha", "beta"]);
    assert!(!tables.iter().any(|t| t == METADATA_TABLE));
}

#[test]
fn test_schema_lookup() {
    let (_dir, db) = new_db("schema");
    db.create_table(
        "users",
        "id INTEGER PRIMARY KEY AUTOINCREMENT, username TEXT NOT NULL UNIQUE, balance REAL DEFAULT 0.0",
    )
    .unwrap();

    assert_eq!(db.get_schema("nope").unwrap(), None);

    let schema = db.get_schema("users").unwrap().unwrap();
    assert_eq!(schema.len(), 3);
    assert!(schema[0].primary_key);
    assert_eq!(schema[0].declared_type, "INTEGER");
    assert!(schema[1].not_null);
    assert!(!schema[1].primary_key);
    assert_eq!(schema[2].default_value.as_deref(), Some("0.0"));
    assert_eq!(schema[2].cid, 2);
}

#[test]
fn test_select_update_delete() {
    let (_dir, db) = new_db("crud");
    db.create_table(
        "products",
        "id INTEGER PRIMARY KEY, name TEXT, category TEXT, price REAL",
    )
    .unwrap();
    for (name, category, price) in [
        ("Laptop", "Electronics", 999.5),
        ("Mug", "Kitchen", 12.5),
        ("Headphones", "Electronics", 80.0),
    ] {
        db.insert(
            "products",
            &record(&[
                ("name", text(name)),
                ("category", text(category)),
                ("price", Value::Real(price)),
            ]),
        )
        .unwrap();
    }

    let electronics = db
        .select("products", "name", "category = 'Electronics'")
        .unwrap();
    assert_eq!(electronics.len(), 2);
    assert_eq!(electronics.columns, ["name"]);

    let categories = db.select_distinct("products", "category", "1=1").unwrap();
    assert_eq!(categories.len(), 2);

    assert_eq!(db.count("products", "price > 50").unwrap(), 2);
    assert_eq!(
        db.sum("products", "price", "category = 'Electronics'")
            .unwrap(),
        Value::Real(1079.5)
    );
    assert_eq!(
        db.sum("products", "price", "category = 'Garden'").unwrap(),
        Value::Null
    );

    assert_eq!(
        db.update("products", "price = price * 2", "name = 'Mug'")
            .unwrap(),
        1
    );
    assert_eq!(
        db.sum("products", "price", "name = 'Mug'").unwrap(),
        Value::Real(25.0)
    );

    assert_eq!(
        db.delete("products", "category = 'Electronics'").unwrap(),
        2
    );
    assert_eq!(db.select_all("products").unwrap().len(), 1);

    assert!(matches!(
        db.delete("products", " ").unwrap_err(),
        Error::EmptyCondition { .. }
    ));
}

#[test]
fn test_execute_raw() {
    let (_dir, db) = new_db("raw");

    let outcome = db
        .execute_raw("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)")
        .unwrap();
    assert_eq!(outcome, RawOutcome::Executed { changes: 0 });

    let outcome = db
        .execute_raw("insert into notes (body) values ('one'), ('two')")
        .unwrap();
    assert_eq!(outcome, RawOutcome::Executed { changes: 2 });

    match db
        .execute_raw("  select body from notes order by id")
        .unwrap()
    {
        RawOutcome::Rows(rows) => {
            assert_eq!(rows.columns, ["body"]);
            assert_eq!(rows.rows, vec![vec![text("one")], vec![text("two")]]);
        }
        other => panic!("expected rows, got {other:?}"),
    }

    match db
        .execute_raw("-- newest first\nSELECT body FROM notes ORDER BY id DESC")
        .unwrap()
    {
        RawOutcome::Rows(rows) => assert_eq!(rows.rows[0], [text("two")]),
        other => panic!("expected rows, got {other:?}"),
    }

    assert!(matches!(
        db.execute_raw("SELEC nonsense").unwrap_err(),
        Error::Sqlite(_)
    ));
}

#[test]
fn test_constraint_violation_surfaces() {
    let (_dir, db) = new_db("constraints");
    db.create_table("people", "id INTEGER PRIMARY KEY, email TEXT NOT NULL UNIQUE")
        .unwrap();
    db.insert("people", &record(&[("email", text("a@example.com"))]))
        .unwrap();

    let err = db
        .insert("people", &record(&[("email", text("a@example.com"))]))
        .unwrap_err();
    assert!(matches!(err, Error::Sqlite(_)));
    assert!(!err.is_validation());
}

#[test]
fn test_list_all_databases_survives_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::new(dir.path());

    catalog
        .database("alpha")
        .open_or_create(Some(&Metadata::new().with(keys::DESCRIPTION, "first")))
        .unwrap();
    catalog
        .database("gamma")
        .open_or_create(Some(&Metadata::new().with(keys::DESCRIPTION, "third")))
        .unwrap();
    fs::write(
        dir.path().join("beta.db"),
        b"this is definitely not an sqlite database file, just some bytes to fill the header",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let entries = catalog.list_all_databases().unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["alpha", "beta", "gamma"]);

    assert_eq!(entries[1].file, "beta.db");
    assert_eq!(entries[1].metadata, None);
    assert_eq!(
        entries[0].metadata.as_ref().unwrap().get(keys::DESCRIPTION),
        Some(&MetaValue::Text("first".into()))
    );
    assert!(entries[2].metadata.is_some());
}

#[test]
fn test_list_all_databases_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::new(dir.path().join("absent"));
    assert!(catalog.list_all_databases().unwrap().is_empty());
}

/// The shop scenario: create, define, insert, count, describe.
#[test]
fn test_shop_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let db = Catalog::new(dir.path()).database("shop");

    db.open_or_create(Some(&Metadata::new().with(keys::DESCRIPTION, "test")))
        .unwrap();
    db.create_table("items", "id INTEGER PRIMARY KEY, name TEXT NOT NULL")
        .unwrap();
    db.insert("items", &record(&[("name", text("Widget"))]))
        .unwrap();

    assert_eq!(db.count("items", "1=1").unwrap(), 1);

    let schema = db.get_schema("items").unwrap().unwrap();
    let name = schema.iter().find(|c| c.name == "name").unwrap();
    assert!(name.not_null);
    assert!(!name.primary_key);
    assert_eq!(name.declared_type, "TEXT");
}
