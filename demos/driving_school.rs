//! # Driving School Demo
//!
//! A slice of a driving-school back office built on Rowhaus:
//! - Enrollment payloads checked against field rules before any write
//! - Typed structs round-tripped through dynamic records
//! - Lesson planning with search, ordering and pagination
//! - An invoice and its payment written atomically in one transaction
//! - Raw SQL passthrough for a reporting query

use anyhow::Result;
use chrono::{Duration, Utc};
use rowhaus::prelude::*;

/// Enrollment form data, serialized into a record before validation
#[derive(Debug, Serialize)]
struct Enrollment {
    first_name: String,
    last_name: String,
    email: String,
    lessons_taken: i64,
}

/// Typed view of a student row
#[derive(Debug, Deserialize)]
struct Student {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    lessons_taken: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("🚀 Rowhaus Driving School Demo");
    println!("===============================");

    // 1. Connect and prepare the schema
    println!("\n📊 Step 1: Database Setup");
    println!("--------------------------");

    let config = AppConfig {
        database: DatabaseConfig::new(
            "localhost".to_string(),
            5432,
            "rowhaus".to_string(),
            "postgres".to_string(),
            "password".to_string(),
            1,    // min_connections
            5,    // max_connections
            30,   // connection_timeout_seconds
            600,  // idle_timeout_seconds
            3600, // max_lifetime_seconds
        ),
        gateway: GatewayConfig::default(),
    };

    let mut school = Rowhaus::new(config).await?;
    let session = school.session().clone();
    println!("✅ Connected to PostgreSQL database");

    session
        .execute(
            "CREATE TABLE IF NOT EXISTS students (
                id BIGSERIAL PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT,
                lessons_taken INT NOT NULL DEFAULT 0
            )",
            vec![],
        )
        .await?;
    session
        .execute(
            "CREATE TABLE IF NOT EXISTS lessons (
                id BIGSERIAL PRIMARY KEY,
                student_id BIGINT NOT NULL,
                instructor TEXT NOT NULL,
                scheduled_at TIMESTAMPTZ NOT NULL,
                status TEXT NOT NULL DEFAULT 'planned'
            )",
            vec![],
        )
        .await?;
    session
        .execute(
            "CREATE TABLE IF NOT EXISTS invoices (
                id BIGSERIAL PRIMARY KEY,
                student_id BIGINT NOT NULL,
                amount_cents BIGINT NOT NULL,
                status TEXT NOT NULL DEFAULT 'open',
                issued_on DATE NOT NULL
            )",
            vec![],
        )
        .await?;
    session
        .execute(
            "CREATE TABLE IF NOT EXISTS payments (
                id BIGSERIAL PRIMARY KEY,
                invoice_id BIGINT NOT NULL,
                amount_cents BIGINT NOT NULL,
                paid_at TIMESTAMPTZ NOT NULL,
                payment_code TEXT NOT NULL
            )",
            vec![],
        )
        .await?;

    // Empty tables so the demo output is deterministic on re-runs
    session.execute("DELETE FROM payments", vec![]).await?;
    session.execute("DELETE FROM invoices", vec![]).await?;
    session.execute("DELETE FROM lessons", vec![]).await?;
    session.execute("DELETE FROM students", vec![]).await?;
    println!("✅ Schema ready (students, lessons, invoices, payments)");

    school.register_gateway(
        "students".to_string(),
        TableMeta::new("students")?
            .with_fillable(&["first_name", "last_name", "email", "phone", "lessons_taken"])?,
    )?;
    school.register_gateway(
        "lessons".to_string(),
        TableMeta::new("lessons")?
            .with_fillable(&["student_id", "instructor", "scheduled_at", "status"])?,
    )?;
    school.register_gateway(
        "invoices".to_string(),
        TableMeta::new("invoices")?
            .with_fillable(&["student_id", "amount_cents", "status", "issued_on"])?,
    )?;
    school.register_gateway(
        "payments".to_string(),
        TableMeta::new("payments")?
            .with_fillable(&["invoice_id", "amount_cents", "paid_at", "payment_code"])?,
    )?;

    let students = school.gateway("students")?;
    let lessons = school.gateway("lessons")?;
    let invoices = school.gateway("invoices")?;
    let payments = school.gateway("payments")?;
    println!("✅ Gateways registered: {:?}", school.list_gateways());

    // 2. Validate an enrollment before writing it
    println!("\n📝 Step 2: Validated Enrollment");
    println!("--------------------------------");

    let enrollment_rules = RuleSet::new()
        .field("first_name", "required|min:2|max:50")?
        .field("last_name", "required|min:2|max:50")?
        .field("email", "required|email")?
        .field("lessons_taken", "numeric")?;

    let mut bad = Record::new();
    bad.insert("first_name".to_string(), json!("A"));
    bad.insert("email".to_string(), json!("not-an-email"));

    let errors = students.validate_fields(&bad, &enrollment_rules);
    println!("❌ Rejected enrollment with {} field error(s):", errors.len());
    for (field, message) in &errors {
        println!("  • {}: {}", field, message);
    }

    let enrollment = Enrollment {
        first_name: "Anna".to_string(),
        last_name: "Jansen".to_string(),
        email: "anna.jansen@example.com".to_string(),
        lessons_taken: 0,
    };
    let payload = to_record(&enrollment)?;

    let errors = students.validate_fields(&payload, &enrollment_rules);
    assert!(errors.is_empty());

    let student_id = students.create(payload).await?;
    println!("✅ Enrolled Anna Jansen (id: {})", student_id);

    if let Some(row) = students.get_by_id(&student_id).await? {
        let student: Student = from_record(&row)?;
        println!(
            "👤 Typed read-back: {} {} <{}> with {} lessons (id {})",
            student.first_name,
            student.last_name,
            student.email,
            student.lessons_taken,
            student.id
        );
    }

    // 3. Plan a block of lessons and page through them
    println!("\n📅 Step 3: Lesson Planning and Pagination");
    println!("------------------------------------------");

    for week in 0..12 {
        let mut lesson = Record::new();
        lesson.insert("student_id".to_string(), student_id.clone());
        lesson.insert(
            "instructor".to_string(),
            json!(if week % 2 == 0 { "Khalid" } else { "Marieke" }),
        );
        lesson.insert(
            "scheduled_at".to_string(),
            json!((Utc::now() + Duration::weeks(week)).to_rfc3339()),
        );
        lesson.insert(
            "status".to_string(),
            json!(if week < 4 { "done" } else { "planned" }),
        );
        lessons.create(lesson).await?;
    }
    println!("✅ Planned 12 weekly lessons");

    let page = lessons
        .paginate(
            1,
            Some(5),
            &Conditions::new().eq("student_id", student_id.clone())?,
            &OrderBy::new().asc("scheduled_at")?,
        )
        .await?;
    println!(
        "📄 Page {}/{}: {} of {} lessons, more pages: {}",
        page.current_page,
        page.last_page,
        page.len(),
        page.total,
        page.has_more()
    );

    let last = lessons
        .paginate(
            page.last_page,
            Some(5),
            &Conditions::new().eq("student_id", student_id.clone())?,
            &OrderBy::new().asc("scheduled_at")?,
        )
        .await?;
    println!("📄 Last page holds {} lesson(s)", last.len());

    // 4. Search with bound patterns
    println!("\n🔍 Step 4: Searching Lessons");
    println!("-----------------------------");

    let khalid_lessons = lessons
        .list_all(
            &Conditions::new()
                .ilike("instructor", "%khal%")?
                .eq("status", json!("planned"))?,
            &OrderBy::new().asc("scheduled_at")?,
            Some(3),
        )
        .await?;
    println!(
        "📋 Next {} planned lesson(s) with Khalid:",
        khalid_lessons.len()
    );
    for lesson in &khalid_lessons {
        println!(
            "  • lesson {} at {}",
            lesson.get("id").and_then(|v| v.as_i64()).unwrap_or(0),
            lesson
                .get("scheduled_at")
                .and_then(|v| v.as_str())
                .unwrap_or("?")
        );
    }

    let done = lessons
        .count(&Conditions::new().eq("status", json!("done"))?)
        .await?;
    println!("📊 Lessons already taken: {}", done);

    let mut progress = Record::new();
    progress.insert("lessons_taken".to_string(), json!(done));
    students.update(&student_id, progress).await?;
    println!("✅ Student progress synced");

    // 5. Invoice and payment in one transaction
    println!("\n💶 Step 5: Atomic Invoice + Payment");
    println!("------------------------------------");

    let mut tx = invoices.begin_transaction().await?;

    let mut invoice = Record::new();
    invoice.insert("student_id".to_string(), student_id.clone());
    invoice.insert("amount_cents".to_string(), json!(149_500));
    invoice.insert("status".to_string(), json!("paid"));
    invoice.insert(
        "issued_on".to_string(),
        json!(Utc::now().date_naive().to_string()),
    );
    let invoice_id = invoices.create_tx(&mut tx, invoice).await?;

    let mut payment = Record::new();
    payment.insert("invoice_id".to_string(), invoice_id.clone());
    payment.insert("amount_cents".to_string(), json!(149_500));
    payment.insert("paid_at".to_string(), json!(Utc::now().to_rfc3339()));
    payment.insert(
        "payment_code".to_string(),
        json!(Uuid::new_v4().to_string()),
    );
    payments.create_tx(&mut tx, payment).await?;

    tx.commit().await?;
    println!(
        "✅ Invoice {} and its payment committed together",
        invoice_id
    );

    // A rolled-back write leaves no trace
    let mut tx = invoices.begin_transaction().await?;
    let mut draft = Record::new();
    draft.insert("student_id".to_string(), student_id.clone());
    draft.insert("amount_cents".to_string(), json!(9_900));
    draft.insert("status".to_string(), json!("draft"));
    draft.insert(
        "issued_on".to_string(),
        json!(Utc::now().date_naive().to_string()),
    );
    let draft_id = invoices.create_tx(&mut tx, draft).await?;
    tx.rollback().await?;

    let ghost = invoices.get_by_id(&draft_id).await?;
    println!("↩️  Rolled-back draft invoice still visible: {}", ghost.is_some());

    // 6. Raw SQL for reporting
    println!("\n📈 Step 6: Reporting via Raw SQL");
    println!("---------------------------------");

    let workload = lessons
        .run_query(
            "SELECT instructor, COUNT(*) AS lesson_count
             FROM lessons
             GROUP BY instructor
             ORDER BY lesson_count DESC, instructor",
            vec![],
        )
        .await?;
    println!("📊 Lessons per instructor:");
    for row in &workload {
        println!(
            "  • {}: {}",
            row.get("instructor").and_then(|v| v.as_str()).unwrap_or("?"),
            row.get("lesson_count").and_then(|v| v.as_i64()).unwrap_or(0)
        );
    }

    let open_balance = invoices
        .run_query_one(
            "SELECT COALESCE(SUM(amount_cents), 0) AS open_cents
             FROM invoices WHERE status = $1",
            vec![json!("open")],
        )
        .await?;
    let open_cents = open_balance
        .as_ref()
        .and_then(|row| row.get("open_cents"))
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    println!("📊 Outstanding invoice balance: €{}.{:02}", open_cents / 100, open_cents % 100);

    println!("\n🎉 Driving School Demo Complete!");
    println!("=================================");
    println!("\n🎯 Key Takeaways:");
    println!("✅ Field rules reject bad payloads before SQL is ever built");
    println!("✅ to_record / from_record bridge typed structs and dynamic rows");
    println!("✅ Pagination returns totals and page counters in one call");
    println!("✅ Several gateways can write into one transaction atomically");
    println!("✅ Raw SQL stays available for reporting edge cases");

    Ok(())
}
