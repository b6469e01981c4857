//! Permission scoping for contact searches.
//!
//! The search never decides visibility itself. It asks an [`AclProvider`] for a
//! pair of SQL fragments scoped to a table alias: one appended after the joins,
//! one added to the WHERE conjunction.

/// SQL fragments restricting visible contact rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclClauses {
    /// Extra joins appended to the FROM clause.
    pub from: String,
    /// Predicate added to the WHERE conjunction; `None` when unrestricted.
    pub where_clause: Option<String>,
}

impl AclClauses {
    pub fn new(from: impl Into<String>, where_clause: Option<String>) -> Self {
        Self {
            from: from.into(),
            where_clause: where_clause.filter(|w| !w.trim().is_empty()),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.from.trim().is_empty() && self.where_clause.is_none()
    }
}

/// Resolves the caller's visibility scope over contact records.
///
/// Implementations carry whatever session or user context they need; the
/// search only passes the alias it uses for the contact table.
pub trait AclProvider: Send + Sync {
    fn resolve_acl_clauses(&self, table_alias: &str) -> AclClauses;
}

/// Sees every contact.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrestricted;

impl AclProvider for Unrestricted {
    fn resolve_acl_clauses(&self, _table_alias: &str) -> AclClauses {
        AclClauses::default()
    }
}

/// Fixed fragments, typically from configuration.
///
/// `{alias}` in either fragment is replaced by the requested table alias.
#[derive(Debug, Clone, Default)]
pub struct StaticAcl {
    from: String,
    where_clause: Option<String>,
}

impl StaticAcl {
    pub fn new(from: impl Into<String>, where_clause: Option<String>) -> Self {
        Self {
            from: from.into(),
            where_clause,
        }
    }
}

impl AclProvider for StaticAcl {
    fn resolve_acl_clauses(&self, table_alias: &str) -> AclClauses {
        AclClauses::new(
            self.from.replace("{alias}", table_alias),
            self.where_clause
                .as_ref()
                .map(|w| w.replace("{alias}", table_alias)),
        )
    }
}
