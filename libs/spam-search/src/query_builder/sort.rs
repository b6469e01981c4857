use crate::definition::COLUMNS;
use crate::{Error, Result};

/// Validated ordering over one of the result columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    field: &'static str,
    ascending: bool,
}

impl SortOrder {
    pub fn ascending(field: &str) -> Result<Self> {
        Ok(Self {
            field: known_field(field)?,
            ascending: true,
        })
    }

    pub fn descending(field: &str) -> Result<Self> {
        Ok(Self {
            field: known_field(field)?,
            ascending: false,
        })
    }

    /// Parse a host sort string.
    ///
    /// Accepts `field`, `field asc`, `field desc` and `-field` (descending).
    /// Only result column fields are accepted.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if let Some(field) = value.strip_prefix('-') {
            return Self::descending(field.trim());
        }

        let mut parts = value.split_whitespace();
        let field = parts
            .next()
            .ok_or_else(|| Error::InvalidSort("empty sort".to_string()))?;
        let ascending = match parts.next().map(|d| d.to_ascii_lowercase()) {
            None => true,
            Some(d) if d == "asc" => true,
            Some(d) if d == "desc" => false,
            Some(d) => {
                return Err(Error::InvalidSort(format!(
                    "unknown direction '{}' in '{}'",
                    d, value
                )))
            }
        };
        if parts.next().is_some() {
            return Err(Error::InvalidSort(format!("unexpected tokens in '{}'", value)));
        }

        Ok(Self {
            field: known_field(field)?,
            ascending,
        })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// `ORDER BY` body. Uses qualified expressions so it also works for id-only selects.
    pub(super) fn to_sql(self) -> String {
        let dir = if self.ascending { "ASC" } else { "DESC" };
        let expr = column_expr(self.field);
        if expr == "contact_a.id" {
            return format!("contact_a.id {dir}");
        }
        // Deterministic ordering for paging.
        format!("{expr} {dir}, contact_a.id {dir}")
    }
}

fn known_field(field: &str) -> Result<&'static str> {
    COLUMNS
        .iter()
        .find(|c| c.field.eq_ignore_ascii_case(field))
        .map(|c| c.field)
        .ok_or_else(|| Error::InvalidSort(format!("unknown sort column '{}'", field)))
}

fn column_expr(field: &str) -> &'static str {
    match field {
        "first_name" => "contact_a.first_name",
        "last_name" => "contact_a.last_name",
        "email" => "email.email",
        "phone" => "phone.phone",
        "postcode" => "address.postal_code",
        _ => "contact_a.id",
    }
}
