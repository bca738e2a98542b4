//! Seed script for development — populates a fresh database with sample
//! content.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use sqlx::PgPool;
use uuid::Uuid;

use atrium::services::slug::strip_text;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Atrium Seed Script ===");

    let news = seed_category(&pool, "Firm News").await?;
    let insights = seed_category(&pool, "Insights").await?;
    seed_posts(&pool, &news, &insights).await?;
    seed_events(&pool).await?;
    seed_banners(&pool).await?;

    println!("Done.");
    Ok(())
}

async fn seed_category(pool: &PgPool, name: &str) -> anyhow::Result<String> {
    let unique_id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO categories (unique_id, name, stripped, status) VALUES ($1, $2, $3, 1) \
         ON CONFLICT (stripped) DO NOTHING",
    )
    .bind(&unique_id)
    .bind(name)
    .bind(strip_text(name))
    .execute(pool)
    .await?;

    let existing: String =
        sqlx::query_scalar("SELECT unique_id FROM categories WHERE stripped = $1")
            .bind(strip_text(name))
            .fetch_one(pool)
            .await?;
    println!("category: {name} ({existing})");
    Ok(existing)
}

async fn seed_posts(pool: &PgPool, news: &str, insights: &str) -> anyhow::Result<()> {
    let samples = [
        (news, "Office Relocation Announced", "We are moving to new premises downtown."),
        (news, "New Partner Joins the Firm", "A warm welcome to our newest partner."),
        (insights, "Understanding Service Contracts", "A practical walkthrough of common clauses."),
        (insights, "Regulatory Outlook 2026", "What the new compliance season brings."),
    ];

    for (category, title, details) in samples {
        sqlx::query(
            "INSERT INTO posts (unique_id, category_unique_id, title, stripped, alt_text, \
                 details, views, likes, status) \
             VALUES ($1, $2, $3, $4, $5, $6, 0, 0, 1) \
             ON CONFLICT (stripped) DO NOTHING",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(category)
        .bind(title)
        .bind(strip_text(title))
        .bind(title)
        .bind(details)
        .execute(pool)
        .await?;
        println!("post: {title}");
    }
    Ok(())
}

async fn seed_events(pool: &PgPool) -> anyhow::Result<()> {
    let samples = [
        ("Annual Client Reception", "reception", "Main Hall", "2027-06-15 18:00"),
        ("Employment Law Seminar", "seminar", "Conference Room B", "2027-09-01 09:30"),
    ];

    for (name, kind, location, start) in samples {
        let start = atrium::models::event::parse_datetime(start).expect("valid seed datetime");
        sqlx::query(
            "INSERT INTO events (unique_id, name, stripped, type, location, start_time, \
                 views, status) \
             VALUES ($1, $2, $3, $4, $5, $6, 0, 1) \
             ON CONFLICT (stripped) DO NOTHING",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(strip_text(name))
        .bind(kind)
        .bind(location)
        .bind(start)
        .execute(pool)
        .await?;
        println!("event: {name}");
    }
    Ok(())
}

async fn seed_banners(pool: &PgPool) -> anyhow::Result<()> {
    let samples = [
        (Some("Welcome"), Some("https://example.com/welcome")),
        (None, None),
    ];

    for (title, url) in samples {
        sqlx::query(
            "INSERT INTO banners (unique_id, title, url, status) VALUES ($1, $2, $3, 1)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(title)
        .bind(url)
        .execute(pool)
        .await?;
        println!("banner: {}", title.unwrap_or("(untitled)"));
    }
    Ok(())
}
