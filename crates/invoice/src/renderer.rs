//! Fixed-layout invoice renderer.

use chrono::NaiveDate;

use strata_core::{DomainError, DomainResult, DueId};
use strata_dues::Due;
use strata_members::Member;

use crate::pdf::{self, TextLine};

/// Issuer block printed on every invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerDetails {
    pub name: String,
    pub address_lines: Vec<String>,
}

impl Default for IssuerDetails {
    fn default() -> Self {
        Self {
            name: "Harmony Heights Co-operative Housing Society".to_string(),
            address_lines: vec![
                "14 Lakeview Road".to_string(),
                "Vadodara, Gujarat 390001".to_string(),
            ],
        }
    }
}

/// Renders a `(Due, Member)` pair into a printable invoice document.
///
/// Deterministic: the generation date is injected, never read from a clock.
#[derive(Debug, Clone, Default)]
pub struct InvoiceRenderer {
    issuer: IssuerDetails,
}

impl InvoiceRenderer {
    pub fn new(issuer: IssuerDetails) -> Self {
        Self { issuer }
    }

    /// Produce the invoice bytes.
    ///
    /// Sections, top to bottom: header with generation date, issuer block,
    /// recipient block, one line item (fee description + due date, amount to
    /// two decimals), a total restating the line amount, footer.
    pub fn render(
        &self,
        due: &Due,
        member: &Member,
        generated_on: NaiveDate,
    ) -> DomainResult<Vec<u8>> {
        if !due.amount.is_positive() {
            return Err(DomainError::invalid_amount(
                "cannot render an invoice for a non-positive amount",
            ));
        }

        let amount = due.amount.to_string();
        let mut lines = vec![
            TextLine::new(180, 790, 18, "MAINTENANCE INVOICE"),
            TextLine::new(400, 764, 9, format!("Invoice date: {}", generated_on.format("%Y-%m-%d"))),
        ];

        let mut y = 730;
        lines.push(TextLine::new(50, y, 12, self.issuer.name.clone()));
        for address_line in &self.issuer.address_lines {
            y -= 14;
            lines.push(TextLine::new(50, y, 10, address_line.clone()));
        }

        y -= 28;
        lines.push(TextLine::new(50, y, 12, format!("Bill To: {}", member.name)));
        for detail in [
            format!("Apartment: {}", member.apartment),
            format!("Email: {}", member.email),
            format!("Phone: {}", member.phone.as_deref().unwrap_or("N/A")),
        ] {
            y -= 14;
            lines.push(TextLine::new(50, y, 10, detail));
        }

        y -= 32;
        lines.push(TextLine::new(50, y, 11, "Description"));
        lines.push(TextLine::new(400, y, 11, "Amount"));
        y -= 18;
        lines.push(TextLine::new(
            50,
            y,
            10,
            format!("Maintenance fee due {}", due.due_date.format("%Y-%m-%d")),
        ));
        lines.push(TextLine::new(400, y, 10, amount.clone()));

        y -= 28;
        lines.push(TextLine::new(400, y, 11, format!("Total due: {amount}")));

        lines.push(TextLine::new(
            170,
            y - 48,
            9,
            "Thank you for your timely payment.",
        ));

        Ok(pdf::document(&lines))
    }
}

/// Attachment filename for a due's invoice.
pub fn attachment_filename(due_id: DueId) -> String {
    format!("invoice_{due_id}.pdf")
}
