//! Service wiring for the HTTP app.
//!
//! Everything is backed by the in-memory stores and logging transports; the
//! store and transport traits are where persistent/provider-backed
//! implementations plug in.

use std::sync::Arc;

use chrono::Utc;

use strata_billing::{Announcer, BillingOrchestrator, InMemoryAnnouncementStore};
use strata_core::MemberId;
use strata_dues::{DueLedger, InMemoryDueStore};
use strata_gateway::{InMemoryGateway, Reconciliation};
use strata_invoice::{InvoiceRenderer, IssuerDetails};
use strata_members::{InMemoryMemberStore, Member, MemberStore};
use strata_notify::{Dispatcher, LoggingEmailTransport, LoggingSmsTransport};

pub struct AppServices {
    pub members: Arc<dyn MemberStore>,
    pub ledger: Arc<DueLedger>,
    pub orchestrator: BillingOrchestrator,
    pub reconciliation: Reconciliation,
    pub announcer: Announcer,
}

pub async fn build_services(webhook_secret: String) -> AppServices {
    let members: Arc<dyn MemberStore> = Arc::new(InMemoryMemberStore::new());
    seed_dev_members(&members);

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(LoggingEmailTransport),
        Arc::new(LoggingSmsTransport),
    ));

    let ledger = Arc::new(DueLedger::new(
        Arc::new(InMemoryDueStore::new()),
        members.clone(),
    ));

    let orchestrator = BillingOrchestrator::new(
        ledger.clone(),
        members.clone(),
        dispatcher.clone(),
        InvoiceRenderer::new(IssuerDetails::default()),
    );

    let reconciliation = Reconciliation::new(
        Arc::new(InMemoryGateway::new()),
        ledger.clone(),
        webhook_secret,
    );

    let announcer = Announcer::new(
        Arc::new(InMemoryAnnouncementStore::new()),
        members.clone(),
        dispatcher,
    );

    AppServices {
        members,
        ledger,
        orchestrator,
        reconciliation,
        announcer,
    }
}

// The in-memory store starts empty; a small fixture makes the dev server
// usable immediately. Tokens minted with these ids exercise both roles.
fn seed_dev_members(members: &Arc<dyn MemberStore>) {
    let fixtures = [
        ("Asha Kulkarni", "asha@example.com", Some("+91-9000000001"), "A-101", true),
        ("Ravi Shah", "ravi@example.com", Some("+91-9000000002"), "B-204", false),
        ("Meera Nair", "meera@example.com", None, "C-003", false),
    ];

    for (name, email, phone, apartment, is_admin) in fixtures {
        let mut member = match Member::new(MemberId::new(), name, email, apartment, is_admin, Utc::now()) {
            Ok(member) => member,
            Err(e) => {
                tracing::error!(name, error = %e, "dev member fixture rejected");
                continue;
            }
        };
        if let Some(phone) = phone {
            member = member.with_phone(phone);
        }
        tracing::info!(member_id = %member.id, name, is_admin, "seeded dev member");
        if let Err(e) = members.upsert(member) {
            tracing::error!(name, error = %e, "dev member seed failed");
        }
    }
}
