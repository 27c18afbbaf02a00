//! Claim forms – the submitted values and one content builder per claim type.
//!
//! A builder draws its fields through the [`LayoutCursor`] in a fixed order
//! and leaves the cursor after the last line it drew. Adding a claim type
//! means adding a [`FormType`] variant and a builder; the assembler only ever
//! calls [`FormType::builder`].

mod expense_note;
mod public_transport;
mod relocation;

pub use expense_note::ExpenseNote;
pub use public_transport::PublicTransport;
pub use relocation::Relocation;

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::attachment::AttachmentResource;
use crate::error::ClaimError;
use crate::format::{format_euro, format_euro_number};
use crate::layout::LayoutCursor;

/// Field names shared by the front-end, the builders and the validators.
pub mod fields {
    pub const FORM_TYPE: &str = "formType";
    pub const USER_DISPLAY_NAME: &str = "userDisplayName";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const AMOUNT: &str = "amount";
    pub const ACCOUNT_NUMBER: &str = "accountNumber";
    pub const CHARGED_TO_STUDENTS: &str = "chargedToStudents";
    pub const TRIP_OR_SUBJECT: &str = "tripOrSubject";
    pub const STUDENT_AMOUNT: &str = "studentAmount";
    pub const CLASSES_OR_STUDENTS: &str = "classesOrStudents";
    pub const MONTH: &str = "month";
    pub const YEAR: &str = "year";
    pub const DECLARATION: &str = "declaration";
    pub const ATTACHMENTS: &str = "attachments";
}

/// Vertical lift applied when a builder captures the top of a framed section.
pub(crate) const SECTION_LIFT: f32 = 5.0;
/// Character budget for wrapped free-text fields.
pub(crate) const WRAP_CHARS: usize = 90;

/// One submitted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Attachments(Vec<AttachmentResource>),
}

impl FieldValue {
    /// The value as it would be printed; attachments read as empty.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Attachments(_) => String::new(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Vec<AttachmentResource>> for FieldValue {
    fn from(list: Vec<AttachmentResource>) -> Self {
        FieldValue::Attachments(list)
    }
}

/// Submitted form values, in submission order.
///
/// A field submitted as `null` is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormValues {
    values: IndexMap<String, FieldValue>,
}

impl<'de> Deserialize<'de> for FormValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Option<FieldValue>>::deserialize(deserializer)?;
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();
        Ok(Self { values })
    }
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Chainable variant of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Field as text; absent fields read as the empty string.
    pub fn text(&self, key: &str) -> String {
        self.values.get(key).map(FieldValue::as_text).unwrap_or_default()
    }

    /// Field formatted as a euro amount (decimal comma, two decimals).
    pub fn euro(&self, key: &str) -> String {
        match self.values.get(key) {
            Some(FieldValue::Number(n)) => format_euro_number(*n),
            Some(other) => format_euro(&other.as_text()),
            None => String::new(),
        }
    }

    /// Whether a yes/no choice was answered with yes.
    pub fn is_affirmative(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(FieldValue::Bool(b)) => *b,
            Some(other) => matches!(
                other.as_text().trim().to_ascii_lowercase().as_str(),
                "ja" | "yes" | "true" | "on"
            ),
            None => false,
        }
    }

    /// Attachments stored under `key`; empty when absent or not a list.
    pub fn attachments(&self, key: &str) -> &[AttachmentResource] {
        match self.values.get(key) {
            Some(FieldValue::Attachments(list)) => list,
            _ => &[],
        }
    }

    /// The claim type named by the `formType` discriminant.
    pub fn form_type(&self) -> Result<FormType, ClaimError> {
        let raw = self.text(fields::FORM_TYPE);
        FormType::parse(&raw).ok_or(ClaimError::UnknownFormType(raw))
    }
}

/// The kinds of claim the front-end can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    #[serde(alias = "onkostennota")]
    ExpenseNote,
    #[serde(alias = "verplaatsing")]
    Relocation,
    #[serde(alias = "openbaar_vervoer")]
    PublicTransport,
}

impl FormType {
    /// Parse the discriminant, accepting the front-end's Dutch identifiers.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "expense_note" | "onkostennota" => Some(FormType::ExpenseNote),
            "relocation" | "verplaatsing" => Some(FormType::Relocation),
            "public_transport" | "openbaar_vervoer" => Some(FormType::PublicTransport),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormType::ExpenseNote => "expense_note",
            FormType::Relocation => "relocation",
            FormType::PublicTransport => "public_transport",
        }
    }

    /// The builder that renders this claim type.
    pub fn builder(self) -> &'static dyn ContentBuilder {
        match self {
            FormType::ExpenseNote => &ExpenseNote,
            FormType::Relocation => &Relocation,
            FormType::PublicTransport => &PublicTransport,
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values every builder may need besides the form itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildContext {
    /// Date printed on the claim.
    pub issue_date: NaiveDate,
}

/// Draws one claim type's content below the letterhead.
pub trait ContentBuilder {
    fn build(&self, cursor: &mut LayoutCursor, values: &FormValues, ctx: &BuildContext);
}
