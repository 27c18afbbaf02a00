//! Field validation run before a claim is assembled.
//!
//! Validation never fails hard: it returns the messages to show next to each
//! field, in the order the fields appear on the form.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;

use crate::format::parse_amount;
use crate::forms::{fields, FormType, FormValues};
use crate::iban::is_valid_belgian_iban;

/// Field name → message to show the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: IndexMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Validate `values` for their claim type.
///
/// `today` anchors the year check of the public transport claim.
pub fn validate(values: &FormValues, today: NaiveDate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    match FormType::parse(&values.text(fields::FORM_TYPE)) {
        Some(FormType::ExpenseNote) => check_expense_note(values, &mut errors),
        Some(FormType::PublicTransport) => check_public_transport(values, today, &mut errors),
        Some(FormType::Relocation) => {}
        None => errors.add(fields::FORM_TYPE, "Onbekend formuliertype."),
    }
    errors.into_result()
}

fn text(values: &FormValues, key: &str) -> String {
    values.text(key).trim().to_string()
}

fn has_attachment(values: &FormValues) -> bool {
    values
        .attachments(fields::ATTACHMENTS)
        .iter()
        .any(|a| !a.is_empty())
}

fn check_iban(values: &FormValues, errors: &mut ValidationErrors) {
    let account = text(values, fields::ACCOUNT_NUMBER);
    if account.is_empty() {
        errors.add(fields::ACCOUNT_NUMBER, "Dit veld is verplicht.");
    } else if !is_valid_belgian_iban(&account) {
        errors.add(
            fields::ACCOUNT_NUMBER,
            "Dit is geen geldig Belgisch IBAN-nummer.",
        );
    }
}

fn check_expense_note(values: &FormValues, errors: &mut ValidationErrors) {
    let description = text(values, fields::DESCRIPTION);
    if description.is_empty() {
        errors.add(fields::DESCRIPTION, "Vul hier een korte omschrijving in.");
    } else if description.chars().count() < 5 {
        errors.add(fields::DESCRIPTION, "De omschrijving is te kort.");
    }

    if text(values, fields::CATEGORY).is_empty() {
        errors.add(fields::CATEGORY, "Kies een categorie.");
    }

    let amount = parse_amount(&values.text(fields::AMOUNT));
    match amount {
        None => errors.add(fields::AMOUNT, "Vul een geldig bedrag in."),
        Some(a) if a < 0.0 => errors.add(fields::AMOUNT, "Het bedrag kan niet negatief zijn."),
        Some(_) => {}
    }

    check_iban(values, errors);

    let charged = text(values, fields::CHARGED_TO_STUDENTS);
    if charged.is_empty() {
        errors.add(fields::CHARGED_TO_STUDENTS, "Maak een keuze.");
    }

    if values.is_affirmative(fields::CHARGED_TO_STUDENTS) {
        if text(values, fields::TRIP_OR_SUBJECT).is_empty() {
            errors.add(
                fields::TRIP_OR_SUBJECT,
                "Vul in voor welke uitstap of welk vak dit is.",
            );
        }

        match parse_amount(&values.text(fields::STUDENT_AMOUNT)) {
            None => errors.add(fields::STUDENT_AMOUNT, "Vul een geldig bedrag in."),
            Some(a) if a < 0.0 => {
                errors.add(fields::STUDENT_AMOUNT, "Het bedrag kan niet negatief zijn.")
            }
            Some(a) if amount.is_some_and(|total| a > total) => errors.add(
                fields::STUDENT_AMOUNT,
                "Dit bedrag kan niet groter zijn dan het totaalbedrag.",
            ),
            Some(_) => {}
        }

        if text(values, fields::CLASSES_OR_STUDENTS).is_empty() {
            errors.add(
                fields::CLASSES_OR_STUDENTS,
                "Vul in aan wie dit bedrag moet worden verrekend.",
            );
        }
    }

    if !has_attachment(values) {
        errors.add(fields::ATTACHMENTS, "Voeg een factuur of kasbon toe.");
    }
}

fn check_public_transport(values: &FormValues, today: NaiveDate, errors: &mut ValidationErrors) {
    if !values.is_affirmative(fields::DECLARATION) {
        errors.add(
            fields::DECLARATION,
            "Je moet de verklaring aanvinken om dit formulier te kunnen indienen.",
        );
    }

    let current = today.year();
    let previous = current - 1;
    let year = text(values, fields::YEAR);
    if year.is_empty() {
        errors.add(fields::YEAR, "Kies een jaar.");
    } else if !matches!(year.parse::<i32>(), Ok(y) if y == current || y == previous) {
        errors.add(
            fields::YEAR,
            format!("Het jaar moet {previous} of {current} zijn."),
        );
    }

    if text(values, fields::MONTH).is_empty() {
        errors.add(fields::MONTH, "Kies een maand.");
    }

    if !parse_amount(&values.text(fields::AMOUNT)).is_some_and(|a| a > 0.0) {
        errors.add(fields::AMOUNT, "Geef een bedrag groter dan 0 in.");
    }

    check_iban(values, errors);

    if !has_attachment(values) {
        errors.add(
            fields::ATTACHMENTS,
            "Voeg minstens één betalingsbewijs toe (pdf of afbeelding).",
        );
    }
}
