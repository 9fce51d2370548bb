//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    roster_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("resource"), "missing resource table");
    assert!(info_str.contains("project"), "missing project table");
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    roster_db::run_migrations(&db).await.unwrap();
    roster_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn resource_text_fields_are_optional() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    roster_db::run_migrations(&db).await.unwrap();

    db.query("CREATE resource SET email = 'nobody@example.com'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let mut result = db.query("SELECT VALUE name FROM resource").await.unwrap();
    let names: Vec<Option<String>> = result.take(0).unwrap();
    assert_eq!(names, vec![None]);
}

#[tokio::test]
async fn project_members_default_to_empty() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    roster_db::run_migrations(&db).await.unwrap();

    db.query("CREATE project:apollo SET name = 'Apollo'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let mut result = db
        .query("SELECT VALUE array::len(members) FROM project:apollo")
        .await
        .unwrap();
    let lens: Vec<i64> = result.take(0).unwrap();
    assert_eq!(lens, vec![0]);
}
