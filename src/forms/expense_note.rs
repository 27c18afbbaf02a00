use crate::format::format_date_dutch;
use crate::layout::{LayoutCursor, TextStyle};

use super::{fields, BuildContext, ContentBuilder, FormValues, SECTION_LIFT, WRAP_CHARS};

/// Version tag printed at the foot of the form.
pub const VERSION_TAG: &str = "CPD Arcadia-2021.02.10";

/// Expense note: a purchase paid out of pocket, optionally charged on to
/// students.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpenseNote;

impl ContentBuilder for ExpenseNote {
    fn build(&self, cursor: &mut LayoutCursor, values: &FormValues, ctx: &BuildContext) {
        let body = TextStyle::default();

        cursor.draw_text("Onkostennota", TextStyle::bold().size(18.0).line_gap(10.0));
        cursor.advance(10.0);

        let name = values.text(fields::USER_DISPLAY_NAME);
        let date = format_date_dutch(ctx.issue_date);
        cursor.draw_text(&format!("Voornaam en naam: {name}   Datum: {date}"), body);
        cursor.advance(10.0);

        cursor.draw_text(
            "Heeft de toestemming verkregen via begroting of klasbudget voor:",
            body,
        );
        cursor.advance(10.0);

        // description and category
        let section = cursor.begin_section(SECTION_LIFT);
        cursor.draw_text("Omschrijving aankoop/kosten:", TextStyle::bold());
        cursor.wrap_and_draw(&values.text(fields::DESCRIPTION), WRAP_CHARS, body);
        cursor.advance(10.0);

        cursor.draw_text("Categorie:", TextStyle::bold());
        cursor.draw_text(&values.text(fields::CATEGORY), body);
        cursor.draw_text(
            "Aankoop B- of C-producten vereist VOORAF de toestemming van de preventiedienst",
            body.size(9.0),
        );
        cursor.end_section(section);
        cursor.advance(20.0);

        // amount and account
        let section = cursor.begin_section(SECTION_LIFT);
        cursor.draw_text(
            &format!(
                "Volgend bedrag dient aan mij overgeschreven worden: € {}",
                values.euro(fields::AMOUNT)
            ),
            TextStyle::bold(),
        );
        cursor.advance(5.0);
        cursor.draw_text(
            &format!("Mijn rekeningnummer: {}", values.text(fields::ACCOUNT_NUMBER)),
            body,
        );
        cursor.end_section(section);
        cursor.advance(20.0);

        if values.is_affirmative(fields::CHARGED_TO_STUDENTS) {
            let section = cursor.begin_section(SECTION_LIFT);
            cursor.draw_text(
                "Aankoop/onkosten door te rekenen aan de leerlingen",
                TextStyle::bold(),
            );
            cursor.advance(10.0);

            cursor.draw_text(
                &format!(
                    "Aankoop/onkosten voor vak of uitstap: {}.",
                    values.text(fields::TRIP_OR_SUBJECT)
                ),
                body,
            );
            cursor.advance(5.0);

            cursor.draw_text(
                &format!(
                    "Van dit bedrag moet € {} worden doorgerekend aan de volgende leerlingen:",
                    values.euro(fields::STUDENT_AMOUNT)
                ),
                body,
            );
            cursor.wrap_and_draw(&values.text(fields::CLASSES_OR_STUDENTS), WRAP_CHARS, body);
            cursor.advance(10.0);

            cursor.end_section(section);
            cursor.advance(20.0);
        }

        cursor.draw_text("Factuur of kassabon:", TextStyle::bold());
        cursor.draw_text("Zie bijlage.", body);
        cursor.advance(20.0);

        cursor.draw_text(VERSION_TAG, body.size(8.0));
    }
}
