//! The notification dispatcher.

use std::sync::Arc;

use serde::Serialize;

use strata_core::MemberId;

use crate::message::{Channel, OutboundMessage, Recipient};
use crate::transport::{EmailTransport, SmsTransport};

/// Why a send was skipped without being attempted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoEmailOnFile,
    NoPhoneOnFile,
}

/// Outcome of one send attempt.
///
/// A missing contact field is a skip, not a failure: the dispatcher must not
/// error on a precondition the caller is expected to pre-filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum DeliveryOutcome {
    Sent,
    Skipped(SkipReason),
    Failed(String),
}

/// Per-recipient delivery record returned to callers instead of
/// fire-and-forget, so a failed subset can be retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub member_id: MemberId,
    pub channel: Channel,
    pub outcome: DeliveryOutcome,
}

/// Sends templated messages to recipients over email/SMS, isolating
/// per-recipient failure.
pub struct Dispatcher {
    email: Arc<dyn EmailTransport>,
    sms: Arc<dyn SmsTransport>,
}

impl Dispatcher {
    pub fn new(email: Arc<dyn EmailTransport>, sms: Arc<dyn SmsTransport>) -> Self {
        Self { email, sms }
    }

    /// Send one message to one recipient over one channel.
    pub fn send(
        &self,
        recipient: &Recipient,
        channel: Channel,
        message: &OutboundMessage,
    ) -> Delivery {
        let outcome = match channel {
            Channel::Email => match &recipient.email {
                None => DeliveryOutcome::Skipped(SkipReason::NoEmailOnFile),
                Some(address) => match self.email.send(
                    address,
                    &message.subject,
                    &message.body,
                    &message.attachments,
                ) {
                    Ok(()) => DeliveryOutcome::Sent,
                    Err(e) => DeliveryOutcome::Failed(e.to_string()),
                },
            },
            // SMS is plain text; attachments are dropped, not an error.
            Channel::Sms => match &recipient.phone {
                None => DeliveryOutcome::Skipped(SkipReason::NoPhoneOnFile),
                Some(number) => match self.sms.send(number, &message.body) {
                    Ok(()) => DeliveryOutcome::Sent,
                    Err(e) => DeliveryOutcome::Failed(e.to_string()),
                },
            },
        };

        match &outcome {
            DeliveryOutcome::Sent => {
                tracing::debug!(member_id = %recipient.member_id, %channel, "message delivered");
            }
            DeliveryOutcome::Skipped(reason) => {
                tracing::debug!(member_id = %recipient.member_id, %channel, ?reason, "message skipped");
            }
            DeliveryOutcome::Failed(reason) => {
                tracing::warn!(member_id = %recipient.member_id, %channel, reason, "message delivery failed");
            }
        }

        Delivery {
            member_id: recipient.member_id,
            channel,
            outcome,
        }
    }

    /// Fan a message out to many recipients over the given channels.
    ///
    /// Isolate-and-continue: one recipient's transport failure never stops
    /// delivery to the remaining recipients.
    pub fn broadcast(
        &self,
        recipients: &[Recipient],
        channels: &[Channel],
        message: &OutboundMessage,
    ) -> Vec<Delivery> {
        let mut deliveries = Vec::with_capacity(recipients.len() * channels.len());
        for recipient in recipients {
            for &channel in channels {
                deliveries.push(self.send(recipient, channel, message));
            }
        }
        deliveries
    }
}
