use crate::format::format_date_dutch;
use crate::layout::{LayoutCursor, TextStyle};

use super::{fields, BuildContext, ContentBuilder, FormValues, SECTION_LIFT, WRAP_CHARS};

/// Monthly reimbursement of public transport used for commuting.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicTransport;

impl ContentBuilder for PublicTransport {
    fn build(&self, cursor: &mut LayoutCursor, values: &FormValues, ctx: &BuildContext) {
        let body = TextStyle::default();

        cursor.draw_text(
            "Openbaar vervoer voor het woon-werkverkeer",
            TextStyle::bold().size(18.0).line_gap(10.0),
        );
        cursor.advance(10.0);

        let section = cursor.begin_section(SECTION_LIFT);
        cursor.draw_text(
            &format!("Voornaam en naam: {}", values.text(fields::USER_DISPLAY_NAME)),
            body,
        );
        cursor.advance(10.0);

        cursor.draw_text(&format!("Datum: {}", format_date_dutch(ctx.issue_date)), body);
        cursor.advance(10.0);

        cursor.draw_text(
            &format!("Rekeningnummer: {}", values.text(fields::ACCOUNT_NUMBER)),
            body,
        );
        cursor.end_section(section);
        cursor.advance(20.0);

        let statement = format!(
            "Ik verklaar op eer dat ik tijdens de maand {} {} het openbaar vervoer heb gebruikt \
             voor de woon-werkverplaatsing of een deel ervan.",
            values.text(fields::MONTH),
            values.text(fields::YEAR)
        );
        cursor.wrap_and_draw(&statement, WRAP_CHARS, body);

        cursor.draw_text(
            &format!(
                "Volgend bedrag dient aan mij overgeschreven worden: € {}",
                values.euro(fields::AMOUNT)
            ),
            TextStyle::bold(),
        );
        cursor.advance(20.0);

        cursor.draw_text("Factuur of kassabon:", TextStyle::bold());
        cursor.draw_text("Zie bijlage.", body);
    }
}
