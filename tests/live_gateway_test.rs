//! Integration tests for the record gateway against a live PostgreSQL database
//!
//! Covers CRUD round-trips, condition filtering, pagination counters,
//! transactions and the lenient session. Set DATABASE_URL to run them;
//! without it every test skips.
//!
//! Each test works on its own scratch table so the suite can run in parallel.

use rowhaus::prelude::*;
use serde_json::json;
use sqlx::PgPool;

async fn setup_session() -> Option<DbSession> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping: DATABASE_URL not set");
        return None;
    };

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    Some(DbSession::new(pool))
}

async fn fresh_students_table(session: &DbSession, table: &str) {
    let _ = session
        .execute(&format!("DROP TABLE IF EXISTS {} CASCADE", table), vec![])
        .await;
    session
        .execute(
            &format!(
                "CREATE TABLE {} (
                    id BIGSERIAL PRIMARY KEY,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    phone TEXT,
                    lessons_taken INT NOT NULL DEFAULT 0
                )",
                table
            ),
            vec![],
        )
        .await
        .expect("Failed to create table");
}

async fn drop_table(session: &DbSession, table: &str) {
    let _ = session
        .execute(&format!("DROP TABLE IF EXISTS {} CASCADE", table), vec![])
        .await;
}

fn students_gateway(session: &DbSession, table: &str) -> RecordGateway {
    let meta = TableMeta::new(table)
        .unwrap()
        .with_fillable(&["first_name", "last_name", "email", "phone", "lessons_taken"])
        .unwrap();
    RecordGateway::new(session.clone(), meta)
}

fn student(first: &str, last: &str, email: &str, lessons: i64) -> Record {
    let mut record = Record::new();
    record.insert("first_name".to_string(), json!(first));
    record.insert("last_name".to_string(), json!(last));
    record.insert("email".to_string(), json!(email));
    record.insert("lessons_taken".to_string(), json!(lessons));
    record
}

#[tokio::test]
async fn test_create_and_get_by_id_round_trip() {
    let Some(session) = setup_session().await else { return };
    let table = "gw_test_round_trip";
    fresh_students_table(&session, table).await;
    let gateway = students_gateway(&session, table);

    let mut payload = student("Anna", "Jansen", "anna@example.com", 3);
    // Keys outside the fillable whitelist must be dropped, not rejected
    payload.insert("role".to_string(), json!("admin"));

    let id = gateway.create(payload).await.unwrap();
    assert!(id.is_i64(), "BIGSERIAL key should come back numeric: {:?}", id);

    let row = gateway.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(row["first_name"], "Anna");
    assert_eq!(row["email"], "anna@example.com");
    assert_eq!(row["lessons_taken"], 3);
    assert!(row["phone"].is_null());

    let missing = gateway.get_by_id(&json!(999_999)).await.unwrap();
    assert!(missing.is_none());

    drop_table(&session, table).await;
}

#[tokio::test]
async fn test_list_all_filters_and_orders() {
    let Some(session) = setup_session().await else { return };
    let table = "gw_test_list_all";
    fresh_students_table(&session, table).await;
    let gateway = students_gateway(&session, table);

    gateway
        .create(student("Anna", "Jansen", "anna@example.com", 10))
        .await
        .unwrap();
    gateway
        .create(student("Bram", "de Vries", "bram@example.com", 4))
        .await
        .unwrap();
    gateway
        .create(student("Carla", "Bakker", "carla@example.com", 7))
        .await
        .unwrap();

    let experienced = gateway
        .list_all(
            &Conditions::new().gte("lessons_taken", json!(5)).unwrap(),
            &OrderBy::new().desc("lessons_taken").unwrap(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(experienced.len(), 2);
    assert_eq!(experienced[0]["first_name"], "Anna");
    assert_eq!(experienced[1]["first_name"], "Carla");

    let limited = gateway
        .list_all(
            &Conditions::new(),
            &OrderBy::new().asc("first_name").unwrap(),
            Some(2),
        )
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0]["first_name"], "Anna");

    drop_table(&session, table).await;
}

#[tokio::test]
async fn test_get_one_returns_a_single_match() {
    let Some(session) = setup_session().await else { return };
    let table = "gw_test_get_one";
    fresh_students_table(&session, table).await;
    let gateway = students_gateway(&session, table);

    gateway
        .create(student("Anna", "Jansen", "anna@example.com", 2))
        .await
        .unwrap();
    gateway
        .create(student("Bram", "Jansen", "bram@example.com", 2))
        .await
        .unwrap();

    let row = gateway
        .get_one(&Conditions::new().eq("last_name", json!("Jansen")).unwrap())
        .await
        .unwrap();
    assert!(row.is_some());

    let nobody = gateway
        .get_one(&Conditions::new().eq("last_name", json!("Smit")).unwrap())
        .await
        .unwrap();
    assert!(nobody.is_none());

    drop_table(&session, table).await;
}

#[tokio::test]
async fn test_update_reports_whether_a_row_matched() {
    let Some(session) = setup_session().await else { return };
    let table = "gw_test_update";
    fresh_students_table(&session, table).await;
    let gateway = students_gateway(&session, table);

    let id = gateway
        .create(student("Anna", "Jansen", "anna@example.com", 0))
        .await
        .unwrap();

    let mut changes = Record::new();
    changes.insert("lessons_taken".to_string(), json!(5));
    changes.insert("phone".to_string(), json!("+31-6-1234-5678"));

    assert!(gateway.update(&id, changes.clone()).await.unwrap());

    let row = gateway.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(row["lessons_taken"], 5);
    assert_eq!(row["phone"], "+31-6-1234-5678");
    // Untouched columns keep their values
    assert_eq!(row["first_name"], "Anna");

    // Same statement against a key that matches nothing
    assert!(!gateway.update(&json!(999_999), changes).await.unwrap());

    drop_table(&session, table).await;
}

#[tokio::test]
async fn test_remove_deletes_exactly_one_row() {
    let Some(session) = setup_session().await else { return };
    let table = "gw_test_remove";
    fresh_students_table(&session, table).await;
    let gateway = students_gateway(&session, table);

    let id = gateway
        .create(student("Anna", "Jansen", "anna@example.com", 0))
        .await
        .unwrap();
    gateway
        .create(student("Bram", "de Vries", "bram@example.com", 0))
        .await
        .unwrap();

    assert!(gateway.remove(&id).await.unwrap());
    assert!(gateway.get_by_id(&id).await.unwrap().is_none());
    // A second remove of the same key is a clean miss
    assert!(!gateway.remove(&id).await.unwrap());

    assert_eq!(gateway.count(&Conditions::new()).await.unwrap(), 1);

    drop_table(&session, table).await;
}

#[tokio::test]
async fn test_count_and_exists() {
    let Some(session) = setup_session().await else { return };
    let table = "gw_test_count";
    fresh_students_table(&session, table).await;
    let gateway = students_gateway(&session, table);

    for (name, lessons) in [("Anna", 10), ("Bram", 0), ("Carla", 3)] {
        gateway
            .create(student(
                name,
                "Tester",
                &format!("{}@example.com", name.to_lowercase()),
                lessons,
            ))
            .await
            .unwrap();
    }

    assert_eq!(gateway.count(&Conditions::new()).await.unwrap(), 3);

    let filter = Conditions::new().gt("lessons_taken", json!(0)).unwrap();
    let first = gateway.count(&filter).await.unwrap();
    assert_eq!(first, 2);
    // Without intervening writes the count does not drift
    assert_eq!(gateway.count(&filter).await.unwrap(), first);

    assert!(gateway
        .exists(&Conditions::new().eq("first_name", json!("Carla")).unwrap())
        .await
        .unwrap());
    assert!(!gateway
        .exists(&Conditions::new().eq("first_name", json!("Daan")).unwrap())
        .await
        .unwrap());

    drop_table(&session, table).await;
}

#[tokio::test]
async fn test_paginate_counters_and_clamping() {
    let Some(session) = setup_session().await else { return };
    let table = "gw_test_paginate";
    fresh_students_table(&session, table).await;
    let gateway = students_gateway(&session, table);

    for i in 0..7 {
        gateway
            .create(student(
                &format!("Student{}", i),
                "Paged",
                &format!("student{}@example.com", i),
                i,
            ))
            .await
            .unwrap();
    }

    let order = OrderBy::new().asc("lessons_taken").unwrap();

    let first = gateway
        .paginate(1, Some(3), &Conditions::new(), &order)
        .await
        .unwrap();
    assert_eq!(first.rows.len(), 3);
    assert_eq!(first.total, 7);
    assert_eq!(first.per_page, 3);
    assert_eq!(first.current_page, 1);
    assert_eq!(first.last_page, 3);
    assert!(first.has_more());
    assert_eq!(first.rows[0]["first_name"], "Student0");

    let last = gateway
        .paginate(3, Some(3), &Conditions::new(), &order)
        .await
        .unwrap();
    assert_eq!(last.rows.len(), 1);
    assert!(!last.has_more());
    assert_eq!(last.rows[0]["first_name"], "Student6");

    // Page zero clamps to the first page
    let clamped = gateway
        .paginate(0, Some(3), &Conditions::new(), &order)
        .await
        .unwrap();
    assert_eq!(clamped.current_page, 1);
    assert_eq!(clamped.rows[0]["first_name"], "Student0");

    // Beyond the last page the slice is empty but the counters hold
    let beyond = gateway
        .paginate(99, Some(3), &Conditions::new(), &order)
        .await
        .unwrap();
    assert!(beyond.rows.is_empty());
    assert_eq!(beyond.total, 7);
    assert_eq!(beyond.last_page, 3);

    // Filtered pagination counts only matching rows
    let filtered = gateway
        .paginate(
            1,
            Some(3),
            &Conditions::new().gte("lessons_taken", json!(5)).unwrap(),
            &order,
        )
        .await
        .unwrap();
    assert_eq!(filtered.total, 2);
    assert_eq!(filtered.last_page, 1);

    drop_table(&session, table).await;
}

#[tokio::test]
async fn test_null_in_and_pattern_conditions() {
    let Some(session) = setup_session().await else { return };
    let table = "gw_test_conditions";
    fresh_students_table(&session, table).await;
    let gateway = students_gateway(&session, table);

    let mut with_phone = student("Anna", "Jansen", "anna@example.com", 1);
    with_phone.insert("phone".to_string(), json!("+31-6-1111-2222"));
    gateway.create(with_phone).await.unwrap();
    gateway
        .create(student("Bram", "de Vries", "bram@example.com", 2))
        .await
        .unwrap();
    gateway
        .create(student("Carla", "Bakker", "carla@example.com", 3))
        .await
        .unwrap();

    let unreachable = gateway
        .count(&Conditions::new().is_null("phone").unwrap())
        .await
        .unwrap();
    assert_eq!(unreachable, 2);

    let picked = gateway
        .list_all(
            &Conditions::new()
                .in_values("first_name", vec![json!("Anna"), json!("Carla")])
                .unwrap(),
            &OrderBy::new().asc("first_name").unwrap(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(picked.len(), 2);
    assert_eq!(picked[0]["first_name"], "Anna");

    // An empty IN list matches nothing instead of erroring
    let none = gateway
        .count(&Conditions::new().in_values("first_name", vec![]).unwrap())
        .await
        .unwrap();
    assert_eq!(none, 0);

    let janssens = gateway
        .count(&Conditions::new().ilike("last_name", "%jans%").unwrap())
        .await
        .unwrap();
    assert_eq!(janssens, 1);

    drop_table(&session, table).await;
}

#[tokio::test]
async fn test_transaction_commit_and_rollback() {
    let Some(session) = setup_session().await else { return };
    let table = "gw_test_transactions";
    fresh_students_table(&session, table).await;
    let gateway = students_gateway(&session, table);

    // Rolled back writes leave no trace
    let mut tx = gateway.begin_transaction().await.unwrap();
    let ghost_id = gateway
        .create_tx(&mut tx, student("Ghost", "Writer", "ghost@example.com", 0))
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert!(gateway.get_by_id(&ghost_id).await.unwrap().is_none());
    assert_eq!(gateway.count(&Conditions::new()).await.unwrap(), 0);

    // Committed writes are visible afterwards
    let mut tx = gateway.begin_transaction().await.unwrap();
    let kept_id = gateway
        .create_tx(&mut tx, student("Anna", "Jansen", "anna@example.com", 0))
        .await
        .unwrap();

    let mut changes = Record::new();
    changes.insert("lessons_taken".to_string(), json!(1));
    assert!(gateway.update_tx(&mut tx, &kept_id, changes).await.unwrap());
    tx.commit().await.unwrap();

    let row = gateway.get_by_id(&kept_id).await.unwrap().unwrap();
    assert_eq!(row["lessons_taken"], 1);

    // Dropping a transaction without commit rolls it back
    {
        let mut tx = gateway.begin_transaction().await.unwrap();
        gateway
            .create_tx(&mut tx, student("Drop", "Me", "drop@example.com", 0))
            .await
            .unwrap();
    }
    assert_eq!(gateway.count(&Conditions::new()).await.unwrap(), 1);

    drop_table(&session, table).await;
}

#[tokio::test]
async fn test_lenient_session_swallows_failures() {
    let Some(session) = setup_session().await else { return };
    let lenient = session.lenient();

    let rows = lenient
        .select_many("SELECT * FROM gw_test_no_such_table", vec![])
        .await;
    assert!(rows.is_empty());

    let row = lenient
        .select_one("SELECT * FROM gw_test_no_such_table WHERE id = $1", vec![json!(1)])
        .await;
    assert!(row.is_none());

    let key = lenient
        .insert(
            "INSERT INTO gw_test_no_such_table (x) VALUES ($1) RETURNING id",
            vec![json!(1)],
        )
        .await;
    assert!(key.is_none());

    assert!(!lenient.update("UPDATE gw_test_no_such_table SET x = 1", vec![]).await);
    assert!(!lenient.delete("DELETE FROM gw_test_no_such_table", vec![]).await);
    assert_eq!(lenient.row_count("DELETE FROM gw_test_no_such_table", vec![]).await, 0);

    // The underlying connection is still healthy
    assert!(lenient.is_healthy().await);
    assert!(session.is_healthy().await);
}

#[tokio::test]
async fn test_run_query_passthrough() {
    let Some(session) = setup_session().await else { return };
    let table = "gw_test_raw_sql";
    fresh_students_table(&session, table).await;
    let gateway = students_gateway(&session, table);

    for (name, lessons) in [("Anna", 4), ("Bram", 4), ("Carla", 9)] {
        gateway
            .create(student(
                name,
                "Raw",
                &format!("{}@example.com", name.to_lowercase()),
                lessons,
            ))
            .await
            .unwrap();
    }

    let rows = gateway
        .run_query(
            &format!(
                "SELECT lessons_taken, COUNT(*) AS students FROM {} \
                 GROUP BY lessons_taken ORDER BY lessons_taken",
                table
            ),
            vec![],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["lessons_taken"], 4);
    assert_eq!(rows[0]["students"], 2);

    let row = gateway
        .run_query_one(
            &format!("SELECT first_name FROM {} WHERE lessons_taken > $1", table),
            vec![json!(5)],
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row["first_name"], "Carla");

    drop_table(&session, table).await;
}
