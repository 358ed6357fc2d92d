//! `strata-notify` — per-recipient message dispatch over email and SMS.
//!
//! The transports are external collaborators behind traits; this crate owns
//! the skip/fail semantics and the per-recipient delivery ledger. One
//! recipient's failure never stops delivery to the rest.

pub mod dispatcher;
pub mod message;
pub mod transport;

pub use dispatcher::{Delivery, DeliveryOutcome, Dispatcher, SkipReason};
pub use message::{Attachment, Channel, OutboundMessage, Recipient};
pub use transport::{
    EmailTransport, LoggingEmailTransport, LoggingSmsTransport, RecordingEmailTransport,
    RecordingSmsTransport, SmsTransport, TransportError,
};
