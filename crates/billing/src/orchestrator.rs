//! Billing orchestration: batch issuance with invoices, reminders.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, Utc};

use strata_auth::{Actor, Capability, authorize};
use strata_core::{Amount, DomainError, DomainResult, DueId, MemberId};
use strata_dues::{Due, DueLedger};
use strata_invoice::{InvoiceRenderer, attachment_filename};
use strata_members::{Member, MemberStore};
use strata_notify::{
    Attachment, Channel, Delivery, DeliveryOutcome, Dispatcher, OutboundMessage, Recipient,
};

/// Result of issuing a billing batch.
///
/// Ledger writes and notification outcomes are reported separately: the dues
/// exist even when some deliveries failed, and the per-recipient ledger tells
/// the caller exactly which ones to chase.
#[derive(Debug)]
pub struct BatchOutcome {
    pub dues: Vec<Due>,
    pub deliveries: Vec<Delivery>,
}

/// Drives the issue-and-notify flows on top of the due ledger.
pub struct BillingOrchestrator {
    ledger: Arc<DueLedger>,
    members: Arc<dyn MemberStore>,
    dispatcher: Arc<Dispatcher>,
    renderer: InvoiceRenderer,
}

impl BillingOrchestrator {
    pub fn new(
        ledger: Arc<DueLedger>,
        members: Arc<dyn MemberStore>,
        dispatcher: Arc<Dispatcher>,
        renderer: InvoiceRenderer,
    ) -> Self {
        Self {
            ledger,
            members,
            dispatcher,
            renderer,
        }
    }

    /// Create a due per targeted member, then email each an invoice.
    ///
    /// Ledger creation is all-or-nothing and happens first; notification runs
    /// afterwards and never rolls it back. A render or transport failure for
    /// one member is recorded as a `Failed` delivery and the loop continues.
    pub fn issue_batch(
        &self,
        actor: &Actor,
        amount: Amount,
        due_date: NaiveDate,
        member_ids: Option<&[MemberId]>,
        now: DateTime<Utc>,
    ) -> DomainResult<BatchOutcome> {
        let dues = self
            .ledger
            .create_batch(actor, amount, due_date, member_ids, now)?;

        let today = now.date_naive();
        let mut deliveries = Vec::with_capacity(dues.len());
        for due in &dues {
            deliveries.push(self.email_invoice(due, today));
        }

        let sent = deliveries
            .iter()
            .filter(|d| d.outcome == DeliveryOutcome::Sent)
            .count();
        tracing::info!(
            dues = dues.len(),
            sent,
            undelivered = deliveries.len() - sent,
            "billing batch issued"
        );
        Ok(BatchOutcome { dues, deliveries })
    }

    /// Email a payment reminder for one unpaid due.
    pub fn send_reminder(&self, actor: &Actor, due_id: DueId) -> DomainResult<Delivery> {
        authorize(actor, Capability::RemindMembers)?;

        let due = self.ledger.get(due_id)?;
        if due.is_paid {
            return Err(DomainError::AlreadyPaid);
        }
        let member = self.member(due.member_id)?;

        let message = reminder_message(&due, &member);
        let delivery = self
            .dispatcher
            .send(&Recipient::from(&member), Channel::Email, &message);
        match &delivery.outcome {
            DeliveryOutcome::Sent => {
                tracing::info!(due_id = %due_id, member_id = %member.id, "payment reminder sent");
            }
            outcome => {
                tracing::warn!(due_id = %due_id, member_id = %member.id, ?outcome, "payment reminder not delivered");
            }
        }
        Ok(delivery)
    }

    /// Remind every member whose unpaid due falls within the next
    /// `within_days` days (overdue dues included), over email and SMS.
    pub fn remind_upcoming(
        &self,
        actor: &Actor,
        within_days: u64,
        today: NaiveDate,
    ) -> DomainResult<Vec<Delivery>> {
        authorize(actor, Capability::RemindMembers)?;

        let cutoff = today
            .checked_add_days(Days::new(within_days))
            .ok_or_else(|| DomainError::validation("reminder window out of range"))?;

        let mut deliveries = Vec::new();
        for due in self.ledger.list_all(actor)? {
            if due.is_paid || due.due_date > cutoff {
                continue;
            }
            let member = match self.member(due.member_id) {
                Ok(member) => member,
                Err(_) => {
                    tracing::warn!(due_id = %due.id, member_id = %due.member_id, "due references unknown member, skipping reminder");
                    continue;
                }
            };

            let message = reminder_message(&due, &member);
            let recipient = Recipient::from(&member);
            deliveries.push(self.dispatcher.send(&recipient, Channel::Email, &message));
            deliveries.push(self.dispatcher.send(&recipient, Channel::Sms, &message));
        }

        tracing::info!(
            within_days,
            deliveries = deliveries.len(),
            "upcoming-due reminders dispatched"
        );
        Ok(deliveries)
    }

    fn email_invoice(&self, due: &Due, today: NaiveDate) -> Delivery {
        let member = match self.member(due.member_id) {
            Ok(member) => member,
            Err(e) => {
                tracing::warn!(due_id = %due.id, member_id = %due.member_id, "member lookup failed during batch notification");
                return Delivery {
                    member_id: due.member_id,
                    channel: Channel::Email,
                    outcome: DeliveryOutcome::Failed(e.to_string()),
                };
            }
        };

        let pdf = match self.renderer.render(due, &member, today) {
            Ok(pdf) => pdf,
            Err(e) => {
                tracing::warn!(due_id = %due.id, member_id = %member.id, error = %e, "invoice render failed");
                return Delivery {
                    member_id: member.id,
                    channel: Channel::Email,
                    outcome: DeliveryOutcome::Failed(e.to_string()),
                };
            }
        };

        let message = OutboundMessage::text(
            "New Maintenance Payment Issued - Invoice Attached",
            format!(
                "Dear {},\n\nA maintenance payment of {} has been issued for apartment {}. \
                 It is due on {}. Your invoice is attached.\n\nRegards,\nThe Society Office",
                member.name,
                due.amount,
                member.apartment,
                due.due_date.format("%Y-%m-%d"),
            ),
        )
        .with_attachment(Attachment {
            filename: attachment_filename(due.id),
            content_type: "application/pdf".to_string(),
            content: pdf,
        });

        self.dispatcher
            .send(&Recipient::from(&member), Channel::Email, &message)
    }

    fn member(&self, member_id: MemberId) -> DomainResult<Member> {
        self.members.get(member_id)?.ok_or(DomainError::NotFound)
    }
}

fn reminder_message(due: &Due, member: &Member) -> OutboundMessage {
    OutboundMessage::text(
        "Payment Reminder: Maintenance Fee Due",
        format!(
            "Dear {}, this is a reminder that a maintenance payment of {} for apartment {} \
             is due on {}. Please pay at your earliest convenience.",
            member.name,
            due.amount,
            member.apartment,
            due.due_date.format("%Y-%m-%d"),
        ),
    )
}
