use serde::{Deserialize, Serialize};

use strata_core::MemberId;
use strata_members::Member;

/// Delivery channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary attachment carried by email sends. SMS ignores attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A fully-formed message, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

impl OutboundMessage {
    pub fn text(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Contact surface of one recipient.
///
/// Contact fields are optional; the dispatcher turns a missing field into a
/// skip, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub member_id: MemberId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<&Member> for Recipient {
    fn from(member: &Member) -> Self {
        Self {
            member_id: member.id,
            name: member.name.clone(),
            email: Some(member.email.clone()),
            phone: member.phone.clone(),
        }
    }
}
