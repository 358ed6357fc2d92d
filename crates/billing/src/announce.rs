//! Society-wide announcements with opt-in notification fan-out.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use strata_auth::{Actor, Capability, authorize};
use strata_core::{AnnouncementId, DomainError, DomainResult, MemberId};
use strata_members::MemberStore;
use strata_notify::{Channel, Delivery, Dispatcher, OutboundMessage, Recipient};

/// SMS bodies are truncated to this many characters of the announcement.
const SMS_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub body: String,
    pub author: MemberId,
    pub notify_email: bool,
    pub notify_sms: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for publishing a new announcement.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAnnouncement {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub notify_email: bool,
    #[serde(default)]
    pub notify_sms: bool,
}

pub trait AnnouncementStore: Send + Sync {
    fn insert(&self, announcement: Announcement) -> DomainResult<()>;

    /// Newest first.
    fn list(&self) -> DomainResult<Vec<Announcement>>;
}

/// In-memory announcement store for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryAnnouncementStore {
    inner: RwLock<HashMap<AnnouncementId, Announcement>>,
}

impl InMemoryAnnouncementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnnouncementStore for InMemoryAnnouncementStore {
    fn insert(&self, announcement: Announcement) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::persistence("announcement store lock poisoned"))?;
        map.insert(announcement.id, announcement);
        Ok(())
    }

    fn list(&self) -> DomainResult<Vec<Announcement>> {
        let map = self
            .inner
            .read()
            .map_err(|_| DomainError::persistence("announcement store lock poisoned"))?;
        let mut all: Vec<Announcement> = map.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(all)
    }
}

/// Publishes announcements and fans them out on the opted-in channels.
pub struct Announcer {
    store: Arc<dyn AnnouncementStore>,
    members: Arc<dyn MemberStore>,
    dispatcher: Arc<Dispatcher>,
}

impl Announcer {
    pub fn new(
        store: Arc<dyn AnnouncementStore>,
        members: Arc<dyn MemberStore>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            store,
            members,
            dispatcher,
        }
    }

    /// Persist the announcement, then broadcast it to every member over each
    /// opted-in channel. With both flags off, publishing is a plain write.
    ///
    /// The record is stored before any send; notification failure never
    /// unpublishes it.
    pub fn publish(
        &self,
        actor: &Actor,
        new: NewAnnouncement,
        now: DateTime<Utc>,
    ) -> DomainResult<(Announcement, Vec<Delivery>)> {
        authorize(actor, Capability::PublishAnnouncements)?;

        if new.title.trim().is_empty() {
            return Err(DomainError::validation("announcement title must not be empty"));
        }
        if new.body.trim().is_empty() {
            return Err(DomainError::validation("announcement body must not be empty"));
        }

        let announcement = Announcement {
            id: AnnouncementId::new(),
            title: new.title,
            body: new.body,
            author: actor.member_id,
            notify_email: new.notify_email,
            notify_sms: new.notify_sms,
            created_at: now,
        };
        self.store.insert(announcement.clone())?;

        let mut deliveries = Vec::new();
        if announcement.notify_email || announcement.notify_sms {
            let recipients: Vec<Recipient> = self
                .members
                .list()?
                .iter()
                .map(Recipient::from)
                .collect();

            if announcement.notify_email {
                let message = OutboundMessage::text(
                    format!("New Announcement: {}", announcement.title),
                    announcement.body.clone(),
                );
                deliveries.extend(self.dispatcher.broadcast(
                    &recipients,
                    &[Channel::Email],
                    &message,
                ));
            }
            if announcement.notify_sms {
                let message =
                    OutboundMessage::text(announcement.title.clone(), sms_preview(&announcement));
                deliveries.extend(self.dispatcher.broadcast(
                    &recipients,
                    &[Channel::Sms],
                    &message,
                ));
            }
        }

        tracing::info!(
            announcement_id = %announcement.id,
            author = %announcement.author,
            deliveries = deliveries.len(),
            "announcement published"
        );
        Ok((announcement, deliveries))
    }

    pub fn list(&self) -> DomainResult<Vec<Announcement>> {
        self.store.list()
    }
}

fn sms_preview(announcement: &Announcement) -> String {
    let preview: String = announcement.body.chars().take(SMS_PREVIEW_CHARS).collect();
    if announcement.body.chars().count() > SMS_PREVIEW_CHARS {
        format!("{}: {preview}...", announcement.title)
    } else {
        format!("{}: {preview}", announcement.title)
    }
}
