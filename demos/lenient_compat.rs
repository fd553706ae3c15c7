//! # Lenient Compatibility Demo
//!
//! `LenientSession` mirrors a legacy data layer that never surfaced database
//! errors to its callers: failures collapse into empty results and booleans,
//! with a single warning line left in the log. This demo shows the quiet
//! degradation side by side with the strict session, which is the better
//! default for new code.

use anyhow::Result;
use rowhaus::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    println!("🚀 Rowhaus Lenient Session Demo");
    println!("================================");

    // 1. Connect and prepare a scratch table
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

    let rowhaus = Rowhaus::new(config).await?;
    let session = rowhaus.session().clone();
    session
        .execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id BIGSERIAL PRIMARY KEY,
                body TEXT NOT NULL
            )",
            vec![],
        )
        .await?;
    session.execute("DELETE FROM notes", vec![]).await?;
    println!("✅ Connected, 'notes' table ready");

    let lenient = session.lenient();

    // 2. Successful calls look the same as on the strict session
    println!("\n📝 Step 2: Happy Path");
    println!("----------------------");

    let inserted = lenient
        .insert(
            "INSERT INTO notes (body) VALUES ($1) RETURNING id",
            vec![json!("remember the cones for tomorrow")],
        )
        .await;
    println!("✅ Inserted note, returned key: {:?}", inserted);

    let rows = lenient.select_many("SELECT * FROM notes ORDER BY id", vec![]).await;
    println!("📋 Notes in table: {}", rows.len());

    // 3. Failures degrade to neutral values instead of errors
    println!("\n🤫 Step 3: Swallowed Failures");
    println!("------------------------------");

    let rows = lenient
        .select_many("SELECT * FROM no_such_table", vec![])
        .await;
    println!(
        "📋 Rows from a missing table: {} (error swallowed, warning logged)",
        rows.len()
    );

    let row = lenient
        .select_one("SELECT * FROM no_such_table WHERE id = $1", vec![json!(1)])
        .await;
    println!("📋 Single row from a missing table: {:?}", row);

    let ok = lenient
        .update("UPDATE no_such_table SET body = $1", vec![json!("x")])
        .await;
    println!("✏️  Update against a missing table reported: {}", ok);

    let touched = lenient.row_count("DELETE FROM no_such_table", vec![]).await;
    println!("🔢 Rows touched by a failing delete: {}", touched);

    // 4. The boolean hides how many rows matched
    println!("\n⚠️  Step 4: What the Boolean Hides");
    println!("-----------------------------------");

    let ok = lenient
        .update(
            "UPDATE notes SET body = $1 WHERE id = $2",
            vec![json!("late edit"), json!(999_999)],
        )
        .await;
    println!(
        "✏️  Lenient update matching zero rows reported: {} (statement ran; nothing changed)",
        ok
    );

    let strict = session
        .update(
            "UPDATE notes SET body = $1 WHERE id = $2",
            vec![json!("late edit"), json!(999_999)],
        )
        .await?;
    println!("🔬 Strict session reports whether a row changed: {}", strict);

    match session.select_many("SELECT * FROM no_such_table", vec![]).await {
        Ok(_) => println!("🔬 Unexpected success"),
        Err(e) => println!("🔬 Strict session surfaces the failure: {}", e),
    }

    // 5. Health stays visible either way
    println!("\n❤️  Step 5: Health Check");
    println!("------------------------");
    println!("📊 Lenient session healthy: {}", lenient.is_healthy().await);

    session.execute("DELETE FROM notes", vec![]).await?;

    println!("\n🎉 Lenient Session Demo Complete!");
    println!("==================================");
    println!("\n🎯 Key Takeaways:");
    println!("✅ LenientSession never returns an error, only neutral values");
    println!("✅ Every swallowed failure still leaves a warning in the log");
    println!("✅ Strict DbSession keeps the real Result for new code");
    println!("✅ Both views share the same pool and health check");

    Ok(())
}
