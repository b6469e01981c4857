//! Shared fixtures for spam search integration tests.
#![allow(dead_code)]

pub mod mysql;

use async_trait::async_trait;
use spamfinder_search::{AclClauses, AclProvider, ContactRow, QueryExecutor, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory executor over a fixed contact fixture.
///
/// Records every statement it receives and answers with the fixture rows
/// without evaluating the SQL, so callers pass only rows their statement would
/// match. Predicates are checked against MySQL in `mysql_counts.rs`.
pub struct FixtureExecutor {
    rows: Vec<ContactRow>,
    statements: Mutex<Vec<String>>,
}

impl FixtureExecutor {
    pub fn new(rows: Vec<ContactRow>) -> Self {
        Self {
            rows,
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for FixtureExecutor {
    async fn fetch_count(&self, sql: &str) -> Result<i64> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(self.rows.len() as i64)
    }

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<ContactRow>> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(self.rows.clone())
    }
}

/// ACL provider that counts how often it is consulted.
#[derive(Default)]
pub struct CountingAcl {
    pub calls: AtomicUsize,
    pub last_alias: Mutex<Option<String>>,
}

impl AclProvider for CountingAcl {
    fn resolve_acl_clauses(&self, table_alias: &str) -> AclClauses {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_alias.lock().unwrap() = Some(table_alias.to_string());
        AclClauses::new(
            format!(
                "INNER JOIN civicrm_acl_contact_cache aclContactCache ON {}.id = aclContactCache.contact_id",
                table_alias
            ),
            Some("aclContactCache.user_id = 12".to_string()),
        )
    }
}

pub fn contact(id: i64, first: &str, last: &str) -> ContactRow {
    ContactRow {
        contact_id: id,
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        ..Default::default()
    }
}

pub fn fixture_rows() -> Vec<ContactRow> {
    vec![
        contact(3, "Spam", "Spam"),
        contact(7, "b0b", "Smith"),
        ContactRow {
            postcode: Some("ABC 123".to_string()),
            ..contact(9, "Ann", "McDonald")
        },
    ]
}

pub fn items(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
