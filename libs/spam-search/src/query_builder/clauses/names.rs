/// Bracket expression of characters not expected in a personal name: control
/// characters, most punctuation, and DEL. Built with `char()` so the statement
/// itself stays printable.
const UNEXPECTED_NAME_CHARS: &str = r#"concat('[', char(1), '-', char(31), char(33), '-', char(37), char(40), '-', char(43), char(58), '-', char(64), "\\", char(91), '-', char(96), char(123), '-', char(127), ']')"#;

pub(super) fn first_equals_last_clause() -> String {
    "(contact_a.first_name = contact_a.last_name)".to_string()
}

pub(super) fn names_contain_numbers_clause() -> String {
    "(contact_a.first_name rlike '[0-9]')".to_string()
}

/// Case-sensitive: at least one lower→upper→lower→upper run.
pub(super) fn mixed_case_last_name_clause() -> String {
    "(contact_a.last_name rlike BINARY '[a-z][A-Z]+[a-z]+[A-Z]')".to_string()
}

pub(super) fn unexpected_punctuation_clause() -> String {
    format!(
        "((contact_a.first_name rlike {chars}) OR (contact_a.last_name rlike {chars}))",
        chars = UNEXPECTED_NAME_CHARS
    )
}

pub(in crate::query_builder) fn blank_names_clause() -> String {
    "(contact_a.first_name <> '' AND contact_a.last_name <> '')".to_string()
}
