//! Form value parsing
//!
//! Turns the raw `(field, value)` pairs submitted by the host form into typed
//! filter values. Nothing here rejects input: every numeric field is coerced to
//! an integer and anything unusable collapses to zero / absent, so no submitted
//! text ever reaches the generated SQL.

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Field-name prefix the host uses for row selection checkboxes (`mark_x_<contact id>`).
pub const CHECKBOX_PREFIX: &str = "mark_x_";

/// Date layouts accepted for `start_date`.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d"];

/// Parsed search form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterValues {
    /// Selected heuristic; `None` when the field was absent or empty.
    pub spam_options: Option<i64>,

    /// Length bounds as submitted; `None` when left blank.
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,

    /// Contacts added since. Retained for the host; not part of the predicate.
    pub start_date: Option<NaiveDate>,

    /// Exclusive lower bound on contact id; zero means "no bound".
    pub min_contact_id: i64,

    pub blank_names: bool,

    /// Contact ids the host marked through selection checkboxes.
    pub selected_contact_ids: BTreeSet<i64>,
}

impl FilterValues {
    /// Parse filter values from ordered (key, value) items.
    ///
    /// Repeated keys keep the last value, matching how the host flattens form posts.
    pub fn from_items(items: &[(String, String)]) -> Self {
        let mut values = Self::default();

        for (key, value) in items {
            match key.as_str() {
                "spam_options" => {
                    values.spam_options = coerce_optional(value);
                }
                "min_length" => values.min_length = coerce_optional(value),
                "max_length" => values.max_length = coerce_optional(value),
                "start_date" => values.start_date = parse_date(value),
                "min_contact_id" => values.min_contact_id = coerce_int(value),
                "blank_names" => values.blank_names = is_truthy(value),
                k => {
                    if let Some(suffix) = k.strip_prefix(CHECKBOX_PREFIX) {
                        values.record_selection(suffix, value);
                    }
                }
            }
        }

        values
    }

    fn record_selection(&mut self, suffix: &str, value: &str) {
        match suffix.parse::<i64>() {
            Ok(id) if id > 0 => {
                if is_truthy(value) {
                    self.selected_contact_ids.insert(id);
                } else {
                    self.selected_contact_ids.remove(&id);
                }
            }
            _ => {
                tracing::debug!(field = %suffix, "Ignoring selection checkbox with non-numeric id");
            }
        }
    }
}

/// Coerce untrusted text to an integer.
///
/// Takes the leading integer (`"12abc"` → 12), so `"abc"`, `""` and values that
/// overflow `i64` all become 0.
pub fn coerce_int(raw: &str) -> i64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0usize;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 0;
    }
    s[..end].parse().unwrap_or(0)
}

fn coerce_optional(raw: &str) -> Option<i64> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(coerce_int(raw))
    }
}

/// Host form truthiness: empty and `"0"` are false.
pub fn is_truthy(raw: &str) -> bool {
    let s = raw.trim();
    !s.is_empty() && s != "0"
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let parsed = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok());
    if parsed.is_none() {
        tracing::debug!(value = %s, "Ignoring unparseable start_date");
    }
    parsed
}
