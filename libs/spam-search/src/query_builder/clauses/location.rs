use super::LengthBounds;

/// Postcode containing anything but digits and spaces, for addresses in the
/// home country or with no country recorded.
pub(super) fn non_numeric_postcode_clause(home_country_id: i64) -> String {
    format!(
        "((address.country_id = {} OR address.country_id IS NULL) AND (address.postal_code rlike '[^0-9 ]'))",
        home_country_id
    )
}

pub(super) fn length_out_of_bounds_clause(column: &str, bounds: LengthBounds) -> String {
    format!(
        "(length({col}) < {} OR length({col}) > {})",
        bounds.min,
        bounds.max,
        col = column
    )
}
