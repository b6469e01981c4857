//! Spamfinder search
//!
//! A custom contact search that flags likely spam and badly formatted records:
//! - Form definition for the host (heuristic selector, length and id filters)
//! - Listing and count SQL built from untrusted form values
//! - Permission scoping through an injected ACL provider
//! - Execution through an async executor (MySQL via `sqlx`)

pub mod acl;
pub mod config;
pub mod definition;
pub mod error;
pub mod executor;
pub mod form;
pub mod logging;
pub mod query_builder;
pub mod search;

pub use acl::{AclClauses, AclProvider, StaticAcl, Unrestricted};
pub use crate::config::Config;
pub use definition::{Column, FormDefinition, FormField, COLUMNS};
pub use error::{Error, Result};
pub use executor::{ContactRow, MySqlExecutor, QueryExecutor};
pub use form::FilterValues;
pub use query_builder::{LengthPolicy, SearchSettings, SortOrder, SpamOption, SpamSearchQuery};
pub use search::{CustomSearch, SpamSearch};
