//! Spam search entry point for the host framework.
//!
//! The host constructs a [`SpamSearch`] from the submitted form values, asks it
//! for the form definition, then for listing/count SQL while paging results.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::{
    acl::{AclClauses, AclProvider},
    definition::{self, Column, FormDefinition, COLUMNS},
    executor::{ContactRow, QueryExecutor},
    form::FilterValues,
    query_builder::{SearchSettings, SortOrder, SpamSearchQuery},
    Result,
};

/// Operations a host custom-search framework calls on a search.
#[async_trait]
pub trait CustomSearch: Send + Sync {
    /// Form fields and display hints.
    fn build_form(&self) -> FormDefinition;

    /// Template used to lay out the form and results listing.
    fn template_file(&self) -> &'static str;

    /// SQL for one page of results.
    fn all(
        &self,
        offset: i64,
        row_count: i64,
        sort: Option<SortOrder>,
        include_selected: bool,
        ids_only: bool,
    ) -> String;

    /// Total number of matching rows.
    async fn count(&self, executor: &dyn QueryExecutor) -> Result<i64>;

    /// Result columns for header rendering.
    fn columns(&self) -> &[Column];

    /// Aggregate summary row, if the search has one.
    fn summary(&self) -> Option<JsonValue>;
}

/// Contacts matching a spam / data-quality heuristic.
#[derive(Clone)]
pub struct SpamSearch {
    values: FilterValues,
    settings: SearchSettings,
    acl: Arc<dyn AclProvider>,
}

impl SpamSearch {
    pub fn new(values: FilterValues, acl: Arc<dyn AclProvider>) -> Self {
        Self {
            values,
            settings: SearchSettings::default(),
            acl,
        }
    }

    /// Build from the raw `(field, value)` pairs the host form submitted.
    pub fn from_items(items: &[(String, String)], acl: Arc<dyn AclProvider>) -> Self {
        Self::new(FilterValues::from_items(items), acl)
    }

    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn filter_values(&self) -> &FilterValues {
        &self.values
    }

    /// Whether any result checkbox was submitted.
    pub fn has_selection(&self) -> bool {
        !self.values.selected_contact_ids.is_empty()
    }

    /// Resolve the ACL fragments for `table_alias`.
    pub fn build_acl_clause(&self, table_alias: &str) -> AclClauses {
        let clauses = self.acl.resolve_acl_clauses(table_alias);
        tracing::debug!(
            table_alias,
            restricted = !clauses.is_unrestricted(),
            "Resolved ACL clauses"
        );
        clauses
    }

    /// Query builder with ACL fragments resolved once for both FROM and WHERE.
    pub fn query(&self, sort: Option<SortOrder>) -> SpamSearchQuery {
        let acl = self.build_acl_clause(SpamSearchQuery::table_alias());
        SpamSearchQuery::new(&self.values, acl)
            .with_settings(self.settings.clone())
            .with_sort(sort)
    }

    /// WHERE conjunction for the current values.
    pub fn where_clause(&self, include_selected: bool) -> String {
        self.query(None).where_clause(include_selected)
    }

    /// Count SQL, as run by [`CustomSearch::count`].
    pub fn count_sql(&self) -> String {
        self.query(None).build_count_sql()
    }

    /// Fetch one page of rows, restricted to the checked contacts when
    /// `include_selected` is set.
    pub async fn rows(
        &self,
        executor: &dyn QueryExecutor,
        offset: i64,
        row_count: i64,
        sort: Option<SortOrder>,
        include_selected: bool,
    ) -> Result<Vec<ContactRow>> {
        let sql = self.all(offset, row_count, sort, include_selected, false);
        let rows = executor.fetch_rows(&sql).await?;
        tracing::debug!(rows = rows.len(), offset, row_count, "Fetched spam search page");
        Ok(rows)
    }
}

#[async_trait]
impl CustomSearch for SpamSearch {
    fn build_form(&self) -> FormDefinition {
        definition::spam_search_form()
    }

    fn template_file(&self) -> &'static str {
        definition::TEMPLATE_FILE
    }

    fn all(
        &self,
        offset: i64,
        row_count: i64,
        sort: Option<SortOrder>,
        include_selected: bool,
        ids_only: bool,
    ) -> String {
        self.query(sort)
            .build_sql(offset, row_count, include_selected, ids_only)
    }

    async fn count(&self, executor: &dyn QueryExecutor) -> Result<i64> {
        let sql = self.count_sql();
        let total = executor.fetch_count(&sql).await?;
        tracing::debug!(total, spam_option = ?self.values.spam_options, "Counted spam search matches");
        Ok(total)
    }

    fn columns(&self) -> &[Column] {
        &COLUMNS
    }

    fn summary(&self) -> Option<JsonValue> {
        None
    }
}
