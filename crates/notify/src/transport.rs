//! Transport seams for outbound mail/SMS.
//!
//! Real SMTP/SMS integrations live outside this system; the shipped
//! implementations either log (dev) or record (test).

use std::collections::HashSet;
use std::sync::Mutex;

use thiserror::Error;

use crate::message::Attachment;

/// A transport-level delivery failure (connection refused, provider 5xx...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

/// Outbound email seam. Synchronous; the caller isolates failures.
pub trait EmailTransport: Send + Sync {
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachments: &[Attachment],
    ) -> Result<(), TransportError>;
}

/// Outbound SMS seam. Plain text only.
pub trait SmsTransport: Send + Sync {
    fn send(&self, to: &str, body: &str) -> Result<(), TransportError>;
}

/// Dev transport: logs the send instead of talking to a provider.
#[derive(Debug, Default)]
pub struct LoggingEmailTransport;

impl EmailTransport for LoggingEmailTransport {
    fn send(
        &self,
        to: &str,
        subject: &str,
        _body: &str,
        attachments: &[Attachment],
    ) -> Result<(), TransportError> {
        tracing::info!(to, subject, attachments = attachments.len(), "email send (logging transport)");
        Ok(())
    }
}

/// Dev transport: logs the send instead of talking to a provider.
#[derive(Debug, Default)]
pub struct LoggingSmsTransport;

impl SmsTransport for LoggingSmsTransport {
    fn send(&self, to: &str, body: &str) -> Result<(), TransportError> {
        tracing::info!(to, chars = body.len(), "sms send (logging transport)");
        Ok(())
    }
}

/// A recorded email send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

/// A recorded SMS send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub to: String,
    pub body: String,
}

/// Test transport that records sends and can be told to fail per address.
#[derive(Debug, Default)]
pub struct RecordingEmailTransport {
    sent: Mutex<Vec<SentEmail>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingEmailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, address: impl Into<String>) {
        self.failing.lock().unwrap().insert(address.into());
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl EmailTransport for RecordingEmailTransport {
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachments: &[Attachment],
    ) -> Result<(), TransportError> {
        if self.failing.lock().unwrap().contains(to) {
            return Err(TransportError(format!("mailbox {to} unreachable")));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            attachments: attachments.to_vec(),
        });
        Ok(())
    }
}

/// Test transport that records sends and can be told to fail per number.
#[derive(Debug, Default)]
pub struct RecordingSmsTransport {
    sent: Mutex<Vec<SentSms>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingSmsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, number: impl Into<String>) {
        self.failing.lock().unwrap().insert(number.into());
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }
}

impl SmsTransport for RecordingSmsTransport {
    fn send(&self, to: &str, body: &str) -> Result<(), TransportError> {
        if self.failing.lock().unwrap().contains(to) {
            return Err(TransportError(format!("number {to} unreachable")));
        }
        self.sent.lock().unwrap().push(SentSms {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
