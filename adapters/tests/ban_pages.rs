use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use time::{OffsetDateTime, macros::datetime};
use tower::ServiceExt;

use chanban_adapters::{incoming::http_axum::routes::build_application_router, shared::app_state::AppState};
use chanban_application::{
    ban::service::BanService,
    infrastructure_config::Config,
    ports::outgoing::{ban_store::BanStorePort, clock::ClockPort},
    testing::{AuthCall, FixedClock, RecordingBanStore, UpdateCall},
};
use domain::ban::BanRecord;

const NOW: OffsetDateTime = datetime!(2018-03-15 12:00:00 UTC);

fn bad_user_ban() -> BanRecord {
    BanRecord {
        channel: "#project".to_string(),
        mask: "$a:baduser".to_string(),
        mode: 'b',
        set_at: datetime!(2018-03-14 15:09:26 UTC),
        set_by: "someop!foo".to_string(),
        expire_at: Some(datetime!(2018-03-21 15:09:26 UTC)),
        reason: "bad behavior".to_string(),
        revoked_at: None,
        revoked_by: None,
    }
}

fn forgiven_user_ban() -> BanRecord {
    BanRecord {
        channel: "#project".to_string(),
        mask: "$a:forgivenuser".to_string(),
        mode: 'b',
        set_at: datetime!(2018-02-07 18:28:18 UTC),
        set_by: "someop!foo".to_string(),
        expire_at: Some(datetime!(2018-02-14 18:28:18 UTC)),
        reason: "forgivable behavior".to_string(),
        revoked_at: Some(datetime!(2018-02-10 18:28:18 UTC)),
        revoked_by: Some("forgivingop!bar".to_string()),
    }
}

fn app(store: &Arc<RecordingBanStore>) -> Router {
    let ban_store: Arc<dyn BanStorePort> = Arc::clone(store) as Arc<dyn BanStorePort>;
    let clock: Arc<dyn ClockPort> = Arc::new(FixedClock(NOW));
    let service = Arc::new(BanService::new(ban_store, clock));
    let state = AppState::new(
        Arc::new(Config::default()),
        Arc::clone(&service) as _,
        service,
    );

    build_application_router().with_state(state)
}

async fn get(app: Router, path: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post_form(app: Router, path: &str, form: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn active_listing_shows_nick_and_mask() {
    let store = Arc::new(RecordingBanStore::new().with_active(vec![bad_user_ban()]));

    let (status, content) = get(app(&store), "/bans").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content.contains("<table"));
    assert!(content.contains("<td class=\"set-by\">someop</td>"));
    assert!(content.contains("$a:baduser</td>"));
    assert!(!content.contains("someop!foo"));
}

#[tokio::test]
async fn expired_listing_shows_forgiven_ban() {
    let store = Arc::new(RecordingBanStore::new().with_recently_expired(vec![forgiven_user_ban()]));

    let (status, content) = get(app(&store), "/bans/expired").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content.contains("<table"));
    assert!(content.contains("$a:forgivenuser</td>"));
    assert!(content.contains("<td class=\"revoked-by\">forgivingop</td>"));
}

#[tokio::test]
async fn full_listing_shows_every_ban() {
    let store = Arc::new(
        RecordingBanStore::new().with_all(vec![bad_user_ban(), forgiven_user_ban()]),
    );

    let (status, content) = get(app(&store), "/bans/all").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content.contains("<table"));
    assert!(content.contains("$a:baduser</td>"));
    assert!(content.contains("$a:forgivenuser</td>"));
}

#[tokio::test]
async fn edit_page_authorizes_with_path_values() {
    let store = Arc::new(RecordingBanStore::new().with_editable("5", "deadbeef", bad_user_ban()));

    let (status, content) = get(app(&store), "/bans/edit/5/deadbeef").await;

    assert_eq!(
        store.auth_calls(),
        vec![AuthCall {
            row_id: "5".to_string(),
            token: "deadbeef".to_string(),
        }]
    );
    assert_eq!(status, StatusCode::OK);
    assert!(content.contains("<form"));
    assert!(content.contains("#project"));
    assert!(content.contains("$a:baduser"));
    assert!(content.contains("bad behavior"));
    assert!(store.update_calls().is_empty());
}

#[tokio::test]
async fn posting_never_clears_the_deadline() {
    let store = Arc::new(RecordingBanStore::new().with_editable("5", "deadbeef", bad_user_ban()));

    let (status, content) = post_form(
        app(&store),
        "/bans/edit/5/deadbeef",
        "expire_at=never&reason=they+lost+their+chance",
    )
    .await;

    assert_eq!(
        store.auth_calls(),
        vec![AuthCall {
            row_id: "5".to_string(),
            token: "deadbeef".to_string(),
        }]
    );
    assert_eq!(
        store.update_calls(),
        vec![UpdateCall {
            row_id: "5".to_string(),
            expire_at: None,
            reason: "they lost their chance".to_string(),
        }]
    );
    assert_eq!(status, StatusCode::OK);
    assert!(content.contains("<form"));
    assert!(content.contains("#project"));
    assert!(content.contains("<dd class=\"expire-at\">never</dd>"));
    assert!(content.contains("$a:baduser"));
    assert!(content.contains("they lost their chance"));
}

#[tokio::test]
async fn posting_bad_expiry_reports_error_without_writing() {
    let store = Arc::new(RecordingBanStore::new().with_editable("5", "deadbeef", bad_user_ban()));

    let (status, content) = post_form(
        app(&store),
        "/bans/edit/5/deadbeef",
        "expire_at=1day&reason=they+lost+their+chance",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(content.contains("<p>Invalid expiration timestamp or relative date '1day'"));
    assert!(content.contains("#project"));
    assert!(content.contains("never"));
    assert!(content.contains("$a:baduser"));
    assert!(content.contains("bad behavior"));
    assert!(store.update_calls().is_empty());
}

#[tokio::test]
async fn posting_expiry_before_ban_was_set_is_rejected() {
    let store = Arc::new(RecordingBanStore::new().with_editable("5", "deadbeef", bad_user_ban()));

    let (status, content) = post_form(
        app(&store),
        "/bans/edit/5/deadbeef",
        "expire_at=2000-01-01T00%3A00%3A00&reason=ancient+history",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(content.contains(
        "<p>Expiration '2000-01-01T00:00:00' is before the ban was set (2018-03-14T15:09:26)"
    ));
    assert!(content.contains("2018-03-21T15:09:26"));
    assert!(content.contains("bad behavior"));
    assert!(content.contains("ancient history"));
    assert!(!content.contains("Ban updated"));
    assert!(store.update_calls().is_empty());
}

#[tokio::test]
async fn wrong_token_renders_not_found_in_page() {
    let store = Arc::new(RecordingBanStore::new().with_editable("5", "deadbeef", bad_user_ban()));

    let (status, content) = get(app(&store), "/bans/edit/5/cafebabe").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content.contains("Ban not found"));
    assert!(!content.contains("$a:baduser"));

    let (status, content) = post_form(
        app(&store),
        "/bans/edit/5/cafebabe",
        "expire_at=never&reason=sneaky",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(content.contains("Ban not found"));
    assert!(store.update_calls().is_empty());
}

#[tokio::test]
async fn failing_store_renders_server_error_page() {
    let store = Arc::new(
        RecordingBanStore::new()
            .with_editable("5", "deadbeef", bad_user_ban())
            .failing_updates(),
    );

    let (status, content) = post_form(
        app(&store),
        "/bans/edit/5/deadbeef",
        "expire_at=%2B1day&reason=escalated",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content.contains("Database error"));
    assert!(!content.contains("rejected by test store"));
}

#[tokio::test]
async fn root_redirects_to_active_listing() {
    let store = Arc::new(RecordingBanStore::new());

    let response = app(&store)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/bans");
}

#[tokio::test]
async fn unknown_path_is_not_found_page() {
    let store = Arc::new(RecordingBanStore::new());

    let (status, content) = get(app(&store), "/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(content.contains("404 Not Found"));
}

#[tokio::test]
async fn request_id_is_propagated_or_generated() {
    let store = Arc::new(RecordingBanStore::new());

    let response = app(&store)
        .oneshot(
            Request::builder()
                .uri("/bans")
                .header("X-Request-Id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let response = app(&store)
        .oneshot(Request::builder().uri("/bans").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn health_reports_ok() {
    let store = Arc::new(RecordingBanStore::new());

    let (status, content) = get(app(&store), "/health").await;
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["environment"], "development");
}
