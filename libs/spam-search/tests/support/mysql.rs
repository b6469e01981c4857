//! Throwaway MySQL database seeded with a small contact fixture.
//!
//! Tests using it are `#[ignore]`d and need `SPAMFINDER_TEST_DATABASE_URL`
//! pointing at a server where the user may create and drop databases.

use anyhow::Context as _;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::sync::atomic::{AtomicUsize, Ordering};

use spamfinder_search::MySqlExecutor;

pub const TEST_DATABASE_URL_VAR: &str = "SPAMFINDER_TEST_DATABASE_URL";

static NEXT_DATABASE: AtomicUsize = AtomicUsize::new(0);

const SCHEMA: [&str; 4] = [
    "CREATE TABLE civicrm_contact (
        id INT UNSIGNED NOT NULL PRIMARY KEY,
        first_name VARCHAR(64) NULL,
        last_name VARCHAR(64) NULL,
        is_deleted TINYINT NOT NULL DEFAULT 0
    )",
    "CREATE TABLE civicrm_email (
        id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        contact_id INT UNSIGNED NOT NULL,
        email VARCHAR(254) NULL,
        is_primary TINYINT NOT NULL DEFAULT 0
    )",
    "CREATE TABLE civicrm_address (
        id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        contact_id INT UNSIGNED NOT NULL,
        postal_code VARCHAR(64) NULL,
        country_id INT UNSIGNED NULL,
        is_primary TINYINT NOT NULL DEFAULT 0
    )",
    "CREATE TABLE civicrm_phone (
        id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        contact_id INT UNSIGNED NOT NULL,
        phone VARCHAR(32) NULL,
        is_primary TINYINT NOT NULL DEFAULT 0
    )",
];

/// Contacts 1-10. Contact 9 is soft-deleted; contact 10 has a blank first name.
const SEED: [&str; 4] = [
    "INSERT INTO civicrm_contact (id, first_name, last_name, is_deleted) VALUES
        (1, 'Alice', 'Smith', 0),
        (2, 'Spam', 'Spam', 0),
        (3, 'b0b', 'Jones', 0),
        (4, 'Maria', 'DeLaCruz', 0),
        (5, 'Pat', 'Lee', 0),
        (6, 'Jo', 'Kim', 0),
        (7, 'Sam', 'Hart', 0),
        (8, 'Chris', 'Smith!', 0),
        (9, 'Del', 'Del', 1),
        (10, '', 'Blank', 0)",
    "INSERT INTO civicrm_email (contact_id, email, is_primary) VALUES
        (3, 'bob@example.org', 1),
        (3, 'old-bob@example.org', 0)",
    "INSERT INTO civicrm_address (contact_id, postal_code, country_id, is_primary) VALUES
        (1, '12345', 1013, 1),
        (5, 'AB1 2CD', 1013, 1),
        (6, 'SW1A', 1226, 1),
        (7, 'X9', NULL, 1),
        (7, '123456789', 1013, 0)",
    "INSERT INTO civicrm_phone (contact_id, phone, is_primary) VALUES
        (1, '5551234567', 1),
        (5, '555-1234', 1),
        (6, '+44 20 7946 0958 ext 12', 1)",
];

pub struct TestDatabase {
    pub executor: MySqlExecutor,
    pool: MySqlPool,
    admin: MySqlConnectOptions,
    name: String,
}

impl TestDatabase {
    /// Create a fresh database, load the schema and seed rows.
    pub async fn create() -> anyhow::Result<Self> {
        let url = std::env::var(TEST_DATABASE_URL_VAR)
            .with_context(|| format!("{TEST_DATABASE_URL_VAR} must be set"))?;
        let admin: MySqlConnectOptions = url.parse().context("parse test database url")?;

        let name = format!(
            "spamfinder_test_{}_{}",
            std::process::id(),
            NEXT_DATABASE.fetch_add(1, Ordering::SeqCst)
        );
        let admin_pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(admin.clone())
            .await
            .context("connect admin database")?;
        sqlx::query(&format!("CREATE DATABASE `{}`", name))
            .execute(&admin_pool)
            .await
            .context("create test database")?;
        admin_pool.close().await;

        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .connect_with(admin.clone().database(&name))
            .await
            .context("connect test database")?;
        for statement in SCHEMA.iter().chain(SEED.iter()) {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .with_context(|| format!("seed test database: {statement}"))?;
        }

        Ok(Self {
            executor: MySqlExecutor::new(pool.clone()),
            pool,
            admin,
            name,
        })
    }

    pub async fn cleanup(self) -> anyhow::Result<()> {
        self.pool.close().await;

        let admin_pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(self.admin)
            .await
            .context("connect admin database for drop")?;
        sqlx::query(&format!("DROP DATABASE `{}`", self.name))
            .execute(&admin_pool)
            .await
            .context("drop test database")?;
        admin_pool.close().await;
        Ok(())
    }
}
