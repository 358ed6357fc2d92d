use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::json;

use strata_auth::{Hs256TokenCodec, JwtClaims, Role};
use strata_core::MemberId;
use strata_gateway::{SettlementEvent, SignedSettlementEvent};

const JWT_SECRET: &str = "test-secret";
const WEBHOOK_SECRET: &str = "whsec-test";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app =
            strata_api::app::build_app(JWT_SECRET.to_string(), WEBHOOK_SECRET.to_string()).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(member_id: MemberId, role: Role) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: member_id,
        role,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };
    Hs256TokenCodec::new(JWT_SECRET.as_bytes())
        .encode(&claims)
        .expect("failed to encode jwt")
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whoami_reflects_the_token() {
    let srv = TestServer::spawn().await;
    let member_id = MemberId::new();
    let token = mint_jwt(member_id, Role::Admin);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["member_id"], member_id.to_string());
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn resident_cannot_list_all_payments() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(MemberId::new(), Role::Resident);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/payments", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn invalid_due_id_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(MemberId::new(), Role::Admin);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/payments/remind/not-a-uuid", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn batch_settlement_and_reminder_flow() {
    let srv = TestServer::spawn().await;
    let admin = mint_jwt(MemberId::new(), Role::Admin);
    let client = reqwest::Client::new();

    // Bill every seeded member.
    let res = client
        .post(format!("{}/payments/batch", srv.base_url))
        .bearer_auth(&admin)
        .json(&json!({ "amount": 500.0, "due_date": "2025-01-31" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: serde_json::Value = res.json().await.unwrap();
    let dues = body["dues"].as_array().unwrap();
    assert_eq!(dues.len(), 3);
    assert!(dues.iter().all(|d| d["is_paid"] == false));
    assert_eq!(body["deliveries"].as_array().unwrap().len(), 3);

    let due_id = dues[0]["id"].as_str().unwrap().to_string();
    let owner_id: MemberId = dues[0]["member_id"].as_str().unwrap().parse().unwrap();
    let owner = mint_jwt(owner_id, Role::Resident);

    // The owner sees exactly their own due.
    let res = client
        .get(format!("{}/payments/my", srv.base_url))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    // Owner opens a settlement intent.
    let res = client
        .post(format!("{}/settlement/intent", srv.base_url))
        .bearer_auth(&owner)
        .json(&json!({ "due_id": due_id, "amount": 500.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let intent: serde_json::Value = res.json().await.unwrap();
    assert_eq!(intent["amount_minor"], 50_000);
    assert!(intent["client_secret"].as_str().unwrap().contains("_secret_"));

    // The gateway confirms with a signed event; no bearer token involved.
    let signed = SignedSettlementEvent::sign(
        &SettlementEvent {
            due_id: due_id.parse().unwrap(),
            transaction_id: "txn_bb_1".to_string(),
            payment_method: "Stripe".to_string(),
            amount_minor: 50_000,
            settled: true,
        },
        WEBHOOK_SECRET.as_bytes(),
    )
    .unwrap();

    let res = client
        .post(format!("{}/settlement/confirm", srv.base_url))
        .json(&signed)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["newly_settled"], true);
    assert_eq!(body["due"]["payment_method"], "Stripe");

    // Redelivery of the same event is a no-op.
    let res = client
        .post(format!("{}/settlement/confirm", srv.base_url))
        .json(&signed)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["newly_settled"], false);

    // A tampered signature never touches the ledger.
    let mut tampered = signed.clone();
    tampered.signature = tampered.signature.chars().rev().collect();
    let res = client
        .post(format!("{}/settlement/confirm", srv.base_url))
        .json(&tampered)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    // Admin view: one settled, two outstanding.
    let res = client
        .get(format!("{}/payments", srv.base_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.iter().filter(|d| d["is_paid"] == true).count(), 1);
    assert_eq!(items.iter().filter(|d| d["is_paid"] == false).count(), 2);

    // Reminding the settled due is refused.
    let res = client
        .post(format!("{}/payments/remind/{}", srv.base_url, due_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "already_paid");
}

#[tokio::test]
async fn announcement_publish_requires_admin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let payload = json!({
        "title": "Water maintenance",
        "body": "Water supply will be off on Saturday morning.",
        "notify_email": true
    });

    let resident = mint_jwt(MemberId::new(), Role::Resident);
    let res = client
        .post(format!("{}/announcements", srv.base_url))
        .bearer_auth(&resident)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let admin = mint_jwt(MemberId::new(), Role::Admin);
    let res = client
        .post(format!("{}/announcements", srv.base_url))
        .bearer_auth(&admin)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    // Every seeded member gets the email.
    assert_eq!(body["deliveries"].as_array().unwrap().len(), 3);
}
