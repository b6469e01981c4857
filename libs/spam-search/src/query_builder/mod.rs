//! SQL query builder for the spam search.
//!
//! Builds MySQL statements from parsed form values:
//! - Listing query (optionally id-only, sorted and paged)
//! - Count query over the unpaged listing
//! - WHERE conjunction: soft-delete exclusion, ACL scope, heuristic, filters
//!
//! Every value embedded in the SQL is either an integer produced by coercion or a
//! fixed fragment from this module. ACL fragments are trusted provider output.

use serde::Deserialize;

use crate::acl::AclClauses;
use crate::form::FilterValues;

mod clauses;
mod sort;

pub use sort::SortOrder;

const CONTACT_ALIAS: &str = "contact_a";

const ID_COLUMN: &str = "contact_a.id as contact_id";

const DISPLAY_COLUMNS: &str = "contact_a.id as contact_id, contact_a.first_name as first_name, contact_a.last_name as last_name, email.email as email, phone.phone as phone, address.postal_code as postcode";

const BASE_FROM: &str = "FROM civicrm_contact AS contact_a LEFT JOIN civicrm_email email ON contact_a.id = email.contact_id AND email.is_primary = 1 LEFT JOIN civicrm_address address ON contact_a.id = address.contact_id AND address.is_primary = 1 LEFT JOIN civicrm_phone phone ON contact_a.id = phone.contact_id AND phone.is_primary = 1";

/// Selectable heuristics, keyed by their form value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpamOption {
    FirstEqualsLast,
    NamesContainNumbers,
    /// Declared, not implemented: matches like [`SpamOption::FirstEqualsLast`].
    QuestionableEmail,
    /// Declared, not implemented: matches like [`SpamOption::FirstEqualsLast`].
    QuestionablePhone,
    /// Declared, not implemented: matches like [`SpamOption::FirstEqualsLast`].
    LongPostcode,
    MixedCaseLastName,
    NonNumericPostcode,
    PostcodeLength,
    PhoneLength,
    UnexpectedPunctuation,
}

impl SpamOption {
    pub const ALL: [SpamOption; 10] = [
        SpamOption::FirstEqualsLast,
        SpamOption::NamesContainNumbers,
        SpamOption::QuestionableEmail,
        SpamOption::QuestionablePhone,
        SpamOption::LongPostcode,
        SpamOption::MixedCaseLastName,
        SpamOption::NonNumericPostcode,
        SpamOption::PostcodeLength,
        SpamOption::PhoneLength,
        SpamOption::UnexpectedPunctuation,
    ];

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::FirstEqualsLast),
            2 => Some(Self::NamesContainNumbers),
            3 => Some(Self::QuestionableEmail),
            4 => Some(Self::QuestionablePhone),
            5 => Some(Self::LongPostcode),
            6 => Some(Self::MixedCaseLastName),
            7 => Some(Self::NonNumericPostcode),
            8 => Some(Self::PostcodeLength),
            9 => Some(Self::PhoneLength),
            10 => Some(Self::UnexpectedPunctuation),
            _ => None,
        }
    }

    pub fn value(self) -> i64 {
        match self {
            Self::FirstEqualsLast => 1,
            Self::NamesContainNumbers => 2,
            Self::QuestionableEmail => 3,
            Self::QuestionablePhone => 4,
            Self::LongPostcode => 5,
            Self::MixedCaseLastName => 6,
            Self::NonNumericPostcode => 7,
            Self::PostcodeLength => 8,
            Self::PhoneLength => 9,
            Self::UnexpectedPunctuation => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FirstEqualsLast => "First name equals last name",
            Self::NamesContainNumbers => "Names contain numbers",
            Self::QuestionableEmail => "Questionable email addresses",
            Self::QuestionablePhone => "Questionable phone numbers by length",
            Self::LongPostcode => "Long postcodes",
            Self::MixedCaseLastName => "MiXEd cAsE LAsT namE",
            Self::NonNumericPostcode => {
                "Non-Numeric Postcode (and address not known to be overseas)"
            }
            Self::PostcodeLength => "Long or short Postcode",
            Self::PhoneLength => "Long or short Phone Number",
            Self::UnexpectedPunctuation => "Unexpected Punctuation in Name",
        }
    }

    /// Options 3–5 have no predicate of their own yet.
    pub fn is_placeholder(self) -> bool {
        matches!(
            self,
            Self::QuestionableEmail | Self::QuestionablePhone | Self::LongPostcode
        )
    }
}

/// How the submitted length bounds become the bounds in the predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPolicy {
    /// Use the submitted numbers as-is; blank means 0.
    #[default]
    Literal,
    /// Blank values take the per-heuristic defaults (postcode 4/4, phone 10/14),
    /// a minimum of 10000 or more means no lower bound, a non-positive maximum
    /// means no upper bound.
    Defaulted,
}

/// Resolved `(min, max)` length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: i64,
    pub max: i64,
}

impl LengthBounds {
    pub const POSTCODE_DEFAULT: LengthBounds = LengthBounds { min: 4, max: 4 };
    pub const PHONE_DEFAULT: LengthBounds = LengthBounds { min: 10, max: 14 };

    const UNBOUNDED: i64 = 10_000;

    pub fn resolve(policy: LengthPolicy, values: &FilterValues, defaults: LengthBounds) -> Self {
        match policy {
            LengthPolicy::Literal => Self {
                min: values.min_length.unwrap_or(0),
                max: values.max_length.unwrap_or(0),
            },
            LengthPolicy::Defaulted => {
                let min = match values.min_length {
                    None => defaults.min,
                    Some(v) if v >= Self::UNBOUNDED => 0,
                    Some(v) => v,
                };
                let max = match values.max_length {
                    None => defaults.max,
                    Some(v) if v <= 0 => Self::UNBOUNDED,
                    Some(v) => v,
                };
                Self { min, max }
            }
        }
    }
}

/// Search-wide settings that are not part of the submitted form.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Country id treated as domestic by the non-numeric postcode check.
    pub home_country_id: i64,
    pub length_policy: LengthPolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            home_country_id: 1013,
            length_policy: LengthPolicy::Literal,
        }
    }
}

/// Query builder for the spam search.
#[derive(Debug, Clone)]
pub struct SpamSearchQuery {
    values: FilterValues,
    settings: SearchSettings,
    acl: AclClauses,
    sort: Option<SortOrder>,
}

impl SpamSearchQuery {
    pub fn new(values: &FilterValues, acl: AclClauses) -> Self {
        Self {
            values: values.clone(),
            settings: SearchSettings::default(),
            acl,
            sort: None,
        }
    }

    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_sort(mut self, sort: Option<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    pub fn table_alias() -> &'static str {
        CONTACT_ALIAS
    }

    /// One page of matching contacts.
    ///
    /// `LIMIT offset, row_count` is only applied when `row_count > 0` and
    /// `offset >= 0`; otherwise the statement is unbounded.
    pub fn build_sql(
        &self,
        offset: i64,
        row_count: i64,
        include_selected: bool,
        ids_only: bool,
    ) -> String {
        let select = if ids_only { ID_COLUMN } else { DISPLAY_COLUMNS };
        let mut sql = format!("SELECT {} {}", select, self.from_clause());

        let where_clause = self.where_clause(include_selected);
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        if let Some(sort) = self.sort {
            sql.push_str(" ORDER BY ");
            sql.push_str(&sort.to_sql());
        }

        if row_count > 0 && offset >= 0 {
            sql.push_str(&format!(" LIMIT {}, {}", offset, row_count));
        }

        tracing::debug!(sql = %sql, "Built spam search listing query");
        sql
    }

    /// Number of rows the unpaged, unselected listing returns.
    pub fn build_count_sql(&self) -> String {
        let listing = Self {
            sort: None,
            ..self.clone()
        }
        .build_sql(0, 0, false, true);
        format!("SELECT COUNT(*) FROM ({}) AS matches", listing)
    }

    pub fn from_clause(&self) -> String {
        let acl_from = self.acl.from.trim();
        if acl_from.is_empty() {
            BASE_FROM.to_string()
        } else {
            format!("{} {}", BASE_FROM, acl_from)
        }
    }

    /// WHERE conjunction (without the keyword); empty when there are no clauses.
    pub fn where_clause(&self, include_selected: bool) -> String {
        let mut parts = vec!["(not contact_a.is_deleted)".to_string()];

        // Grouped: a top-level OR in the fragment must not escape the conjunction.
        if let Some(acl_where) = &self.acl.where_clause {
            parts.push(format!("({})", acl_where.trim()));
        }

        if let Some(option) = self.spam_option() {
            if option.is_placeholder() {
                tracing::warn!(
                    spam_option = option.value(),
                    "Placeholder heuristic selected, matching first name equals last name"
                );
            }
            parts.push(clauses::build_heuristic_clause(
                option,
                &self.values,
                &self.settings,
            ));
        }

        if self.values.min_contact_id != 0 {
            parts.push(format!("(contact_a.id > {})", self.values.min_contact_id));
        }

        if self.values.blank_names {
            parts.push(clauses::blank_names_clause());
        }

        if include_selected && !self.values.selected_contact_ids.is_empty() {
            let ids = self
                .values
                .selected_contact_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("contact_a.id IN ({})", ids));
        }

        parts.join(" AND ")
    }

    fn spam_option(&self) -> Option<SpamOption> {
        let raw = self.values.spam_options?;
        let option = SpamOption::from_value(raw);
        if option.is_none() {
            tracing::warn!(spam_option = raw, "Unrecognised spam option, no heuristic applied");
        }
        option
    }
}
