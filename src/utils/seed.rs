use anyhow::{Context, anyhow};
use sqlx::MySqlPool;
use tracing::info;

use crate::auth::password::hash_password;

/// Seeds a default admin and one sample employee when the users table is
/// empty. Idempotent: a non-empty table is left untouched.
pub async fn seed_default_users(
    pool: &MySqlPool,
    admin_email: &str,
    admin_password: &str,
) -> anyhow::Result<()> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .context("counting users")?;

    if existing > 0 {
        return Ok(());
    }

    let admin_hash =
        hash_password(admin_password).map_err(|e| anyhow!("hashing admin password: {e}"))?;
    let sample_hash =
        hash_password("password123").map_err(|e| anyhow!("hashing sample password: {e}"))?;

    sqlx::query(r#"INSERT INTO users (name, email, password, is_admin) VALUES (?, ?, ?, TRUE)"#)
        .bind("Admin")
        .bind(admin_email)
        .bind(&admin_hash)
        .execute(pool)
        .await
        .context("inserting admin user")?;

    sqlx::query(r#"INSERT INTO users (name, email, password, is_admin) VALUES (?, ?, ?, FALSE)"#)
        .bind("Alice Employee")
        .bind("alice@example.com")
        .bind(&sample_hash)
        .execute(pool)
        .await
        .context("inserting sample user")?;

    info!(admin_email, "Seeded default users");
    Ok(())
}
