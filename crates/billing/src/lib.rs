//! `strata-billing` — the flows tying the ledger, renderer and dispatcher
//! together: batch issuance with invoice emails, reminders, announcements.

pub mod announce;
pub mod orchestrator;

pub use announce::{
    Announcement, AnnouncementStore, Announcer, InMemoryAnnouncementStore, NewAnnouncement,
};
pub use orchestrator::{BatchOutcome, BillingOrchestrator};
