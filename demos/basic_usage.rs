//! # Basic Usage Demo
//!
//! This demo walks through the fundamental concepts of Rowhaus:
//! - Connecting with a typed configuration
//! - Describing a table with `TableMeta` and a fillable whitelist
//! - Basic CRUD operations (Create, Read, Update, Delete)
//! - Counting and existence checks
//!
//! This is the perfect starting point for new users.

use rowhaus::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 Rowhaus Basic Usage Demo");
    println!("============================");

    // 1. Setup Database Connection
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

    let mut rowhaus = Rowhaus::new(config).await?;
    println!("✅ Connected to PostgreSQL database");

    // 2. Create the demo table through the raw session
    let session = rowhaus.session().clone();
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
    println!("✅ Ensured 'students' table exists");

    // 3. Register a gateway for the table
    let meta = TableMeta::new("students")?
        .with_fillable(&["first_name", "last_name", "email", "phone", "lessons_taken"])?;
    rowhaus.register_gateway("students".to_string(), meta)?;
    let students = rowhaus.gateway("students")?;

    println!("✅ Student gateway configured and ready");

    // 4. CREATE
    println!("\n📝 Step 2: Creating Records");
    println!("----------------------------");

    let mut anna = Record::new();
    anna.insert("first_name".to_string(), json!("Anna"));
    anna.insert("last_name".to_string(), json!("Jansen"));
    anna.insert("email".to_string(), json!("anna@example.com"));
    anna.insert("phone".to_string(), json!("+31-6-1234-5601"));

    let mut bram = Record::new();
    bram.insert("first_name".to_string(), json!("Bram"));
    bram.insert("last_name".to_string(), json!("de Vries"));
    bram.insert("email".to_string(), json!("bram@example.com"));
    // Keys outside the fillable whitelist are silently dropped
    bram.insert("role".to_string(), json!("admin"));

    let anna_id = students.create(anna).await?;
    let bram_id = students.create(bram).await?;

    println!("✅ Created student Anna (id: {})", anna_id);
    println!(
        "✅ Created student Bram (id: {}, 'role' key was filtered out)",
        bram_id
    );

    // 5. READ
    println!("\n📖 Step 3: Reading Records");
    println!("--------------------------");

    if let Some(student) = students.get_by_id(&anna_id).await? {
        println!(
            "📋 Found by id: {} {}",
            student
                .get("first_name")
                .and_then(|v| v.as_str())
                .unwrap_or("?"),
            student
                .get("last_name")
                .and_then(|v| v.as_str())
                .unwrap_or("?")
        );
    }

    let all = students
        .list_all(&Conditions::new(), &OrderBy::new().asc("last_name")?, None)
        .await?;
    println!("📋 Total students listed: {}", all.len());

    for student in &all {
        println!(
            "  • {} ({})",
            student
                .get("first_name")
                .and_then(|v| v.as_str())
                .unwrap_or("?"),
            student.get("email").and_then(|v| v.as_str()).unwrap_or("?")
        );
    }

    let found = students
        .get_one(&Conditions::new().eq("email", json!("anna@example.com"))?)
        .await?;
    println!("🔎 Lookup by email found a row: {}", found.is_some());

    // 6. UPDATE
    println!("\n✏️  Step 4: Updating Records");
    println!("----------------------------");

    let mut changes = Record::new();
    changes.insert("lessons_taken".to_string(), json!(3));
    changes.insert("phone".to_string(), json!("+31-6-1234-5699"));

    let updated = students.update(&anna_id, changes).await?;
    println!("✅ Update touched a row: {}", updated);

    // 7. COUNT and EXISTS
    println!("\n🔢 Step 5: Counting Records");
    println!("---------------------------");

    let total = students.count(&Conditions::new()).await?;
    println!("📊 Total students: {}", total);

    let has_active = students
        .exists(&Conditions::new().gt("lessons_taken", json!(0))?)
        .await?;
    println!("📊 Any student with lessons taken: {}", has_active);

    // 8. DELETE
    println!("\n🗑️  Step 6: Deleting Records");
    println!("----------------------------");

    let was_deleted = students.remove(&bram_id).await?;
    if was_deleted {
        println!("✅ Deleted student Bram");
    } else {
        println!("❌ Failed to delete student");
    }

    let remaining = students.count(&Conditions::new()).await?;
    println!("📊 Remaining students: {}", remaining);

    // Clean up the remaining demo row
    students.remove(&anna_id).await?;

    println!("\n🎉 Basic Usage Demo Complete!");
    println!("==============================");
    println!("\n🎯 Key Takeaways:");
    println!("✅ One Rowhaus instance shares a single pool across gateways");
    println!("✅ TableMeta + fillable whitelist guard every write payload");
    println!("✅ CRUD operations are straightforward");
    println!("✅ Conditions keep every value a bound parameter");

    println!("\n📚 Next Steps:");
    println!("  • Try driving_school.rs for pagination, rules and transactions");
    println!("  • Check lenient_compat.rs for the error-swallowing surface");

    Ok(())
}
