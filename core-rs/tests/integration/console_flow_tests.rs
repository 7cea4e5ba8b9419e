//! Integration tests for the wired console
//!
//! Drives the full path against the mock backend:
//! login → protected call → backend revokes → 401 → store clears →
//! guard redirects → banner shows and hides.

use std::sync::Arc;

use sesc_core::api::MockAuthBackend;
use sesc_core::{
    BannerState, Console, ConsoleConfig, ConsoleError, GuardDecision, ManualClock, MemoryStorage,
};

fn console() -> (Arc<MockAuthBackend>, Console) {
    let backend = Arc::new(MockAuthBackend::new());
    let console = Console::new(
        ConsoleConfig::default(),
        Box::new(MemoryStorage::new()),
        backend.clone(),
    );
    (backend, console)
}

#[tokio::test]
async fn test_full_expiry_flow() {
    let (backend, console) = console();
    let clock = Arc::new(ManualClock::new());
    let mut notifier = console.notifier(clock.clone());

    // 1. Sign in and use the API
    console.sign_in("admin@example.com", "admin123").await.unwrap();
    assert_eq!(console.client().get_balance().await.unwrap(), 100.0);
    assert!(console.check_route("/users").is_render());

    // 2. Backend expires the token
    backend.revoke_all_tokens();
    let err = console.client().get_domains().await.unwrap_err();
    assert!(matches!(err, ConsoleError::SessionExpired));

    // 3. Guard now redirects, preserving the origin
    assert_eq!(
        console.check_route("/users"),
        GuardDecision::Redirect {
            to: "/login".to_string(),
            from: "/users".to_string(),
        }
    );

    // 4. Banner shows, then hides after 5s
    notifier.sync(console.store());
    assert_eq!(notifier.state(), BannerState::Visible);
    clock.advance_ms(5000);
    assert!(notifier.tick(console.store()));
    assert_eq!(notifier.state(), BannerState::Hidden);
}

#[tokio::test]
async fn test_login_clears_visible_banner() {
    let (backend, console) = console();
    let clock = Arc::new(ManualClock::new());
    let mut notifier = console.notifier(clock.clone());

    console.sign_in("viewer@example.com", "viewer123").await.unwrap();
    backend.revoke_all_tokens();
    let _ = console.client().get_balance().await;
    notifier.sync(console.store());
    assert!(notifier.is_visible());

    console.sign_in("viewer@example.com", "viewer123").await.unwrap();
    notifier.sync(console.store());
    assert!(!notifier.is_visible());
    assert!(!console.store().is_just_expired());
}

#[tokio::test]
async fn test_viewer_access_denied_on_manager_route() {
    let (_backend, console) = console();
    console.sign_in("viewer@example.com", "viewer123").await.unwrap();

    let decision = console.check_route("/compose");
    assert_eq!(
        decision,
        GuardDecision::AccessDenied {
            user_role: "Viewer".to_string(),
            required: vec!["Manager".to_string()],
        }
    );
    assert!(console.check_route("/stats").is_render());
}

#[tokio::test]
async fn test_validation_failure_keeps_session() {
    let (_backend, console) = console();
    console.sign_in("manager@example.com", "manager123").await.unwrap();

    let err = console.client().get_stats("   ").await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
    assert!(console.store().is_authenticated());
}

#[tokio::test]
async fn test_campaign_endpoints_through_mock() {
    let (_backend, console) = console();
    console.sign_in("manager@example.com", "manager123").await.unwrap();

    let stats = console.client().get_stats("spring sale.csv").await.unwrap();
    assert_eq!(stats.file_name.as_deref(), Some("spring sale.csv"));
    assert_eq!(stats.sent, 0);

    let domains = console.client().get_domains().await.unwrap();
    assert_eq!(domains.len(), 2);

    let record = console.client().verify_domain("news.example.com").await.unwrap();
    assert_eq!(record.domain, "news.example.com");

    let url = console
        .client()
        .get_upload_url("spring.csv", "Spring Sale", "<p>Hi</p>")
        .await
        .unwrap();
    assert!(url.contains("X-Amz-Signature"));

    assert!(console.client().get_campaigns().await.unwrap().is_empty());
}
