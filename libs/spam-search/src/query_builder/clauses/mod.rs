//! Heuristic predicates.
//!
//! One module per kind of record the heuristic inspects.

mod location;
mod names;

use super::{LengthBounds, SearchSettings, SpamOption};
use crate::form::FilterValues;

pub(in crate::query_builder) use names::blank_names_clause;

/// Predicate for the selected heuristic.
pub(in crate::query_builder) fn build_heuristic_clause(
    option: SpamOption,
    values: &FilterValues,
    settings: &SearchSettings,
) -> String {
    match option {
        SpamOption::FirstEqualsLast
        | SpamOption::QuestionableEmail
        | SpamOption::QuestionablePhone
        | SpamOption::LongPostcode => names::first_equals_last_clause(),
        SpamOption::NamesContainNumbers => names::names_contain_numbers_clause(),
        SpamOption::MixedCaseLastName => names::mixed_case_last_name_clause(),
        SpamOption::NonNumericPostcode => {
            location::non_numeric_postcode_clause(settings.home_country_id)
        }
        SpamOption::PostcodeLength => {
            let bounds = LengthBounds::resolve(
                settings.length_policy,
                values,
                LengthBounds::POSTCODE_DEFAULT,
            );
            location::length_out_of_bounds_clause("address.postal_code", bounds)
        }
        SpamOption::PhoneLength => {
            let bounds =
                LengthBounds::resolve(settings.length_policy, values, LengthBounds::PHONE_DEFAULT);
            location::length_out_of_bounds_clause("phone.phone", bounds)
        }
        SpamOption::UnexpectedPunctuation => names::unexpected_punctuation_clause(),
    }
}
