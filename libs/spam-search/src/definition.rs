//! Form and result-column declarations handed to the host.

use serde::Serialize;

use crate::query_builder::SpamOption;

pub const TITLE: &str = "Potential spam entries and names for fixing";

/// Shared results template used by the host renderer.
pub const TEMPLATE_FILE: &str = "CRM/Contact/Form/Search/Custom.tpl";

/// Fields the host template renders, in display order.
pub const DISPLAY_ELEMENTS: [&str; 5] = [
    "spam_options",
    "min_contact_id",
    "blank_names",
    "min_length",
    "max_length",
];

/// Result column: header label and the row field it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub label: &'static str,
    pub field: &'static str,
}

pub const COLUMNS: [Column; 6] = [
    Column {
        label: "Contact Id",
        field: "contact_id",
    },
    Column {
        label: "First",
        field: "first_name",
    },
    Column {
        label: "Last",
        field: "last_name",
    },
    Column {
        label: "Email",
        field: "email",
    },
    Column {
        label: "Phone",
        field: "phone",
    },
    Column {
        label: "Postcode",
        field: "postcode",
    },
];

/// One selectable value of a radio group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOption {
    pub value: i64,
    pub label: String,
    /// Declared but not offered for selection.
    pub disabled: bool,
}

/// A single form element declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormField {
    Radio {
        name: String,
        label: String,
        options: Vec<FormOption>,
        separator: String,
        required: bool,
    },
    Text {
        name: String,
        label: String,
    },
    Date {
        name: String,
        label: String,
        required: bool,
        format_type: String,
    },
    Checkbox {
        name: String,
        label: String,
    },
}

impl FormField {
    pub fn name(&self) -> &str {
        match self {
            FormField::Radio { name, .. }
            | FormField::Text { name, .. }
            | FormField::Date { name, .. }
            | FormField::Checkbox { name, .. } => name,
        }
    }
}

/// Everything the host needs to render the search form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormDefinition {
    pub title: String,
    pub template: String,
    pub fields: Vec<FormField>,
    pub elements: Vec<String>,
}

impl FormDefinition {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

pub(crate) fn spam_search_form() -> FormDefinition {
    let options = SpamOption::ALL
        .iter()
        .map(|opt| FormOption {
            value: opt.value(),
            label: opt.label().to_string(),
            disabled: opt.is_placeholder(),
        })
        .collect();

    let fields = vec![
        FormField::Radio {
            name: "spam_options".to_string(),
            label: "Search options".to_string(),
            options,
            separator: "<br />".to_string(),
            required: true,
        },
        FormField::Text {
            name: "min_length".to_string(),
            label: "Shortest length of postcodes (default: 4) or phone numbers (default: 10)"
                .to_string(),
        },
        FormField::Text {
            name: "max_length".to_string(),
            label: "Longest length of postcodes (default: 4) or phone numbers (default: 14)"
                .to_string(),
        },
        FormField::Date {
            name: "start_date".to_string(),
            label: "Contact records added since".to_string(),
            required: false,
            format_type: "custom".to_string(),
        },
        FormField::Text {
            name: "min_contact_id".to_string(),
            label: "Only show contact records with ID greater than:".to_string(),
        },
        FormField::Checkbox {
            name: "blank_names".to_string(),
            label: "Check to not display contacts whose first and last name are both blank"
                .to_string(),
        },
    ];

    FormDefinition {
        title: TITLE.to_string(),
        template: TEMPLATE_FILE.to_string(),
        fields,
        elements: DISPLAY_ELEMENTS.iter().map(|s| s.to_string()).collect(),
    }
}
