// Expiry Signal Contract Tests
//
// A 401 from the backend must drive the session store to LoggedOut exactly
// once per rejected token, before the caller sees the error, no matter how
// many in-flight requests fail together.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Barrier;

use sesc_core::api::{
    ApiClient, HttpRequest, HttpResponse, MockAuthBackend, SessionExpiryListener, TokenSource, Transport,
};
use sesc_core::{ConsoleError, Identity, MemoryStorage, SessionStore};

/// Forwards to the store and counts invocations
struct CountingListener {
    store: Arc<SessionStore>,
    calls: AtomicUsize,
}

impl SessionExpiryListener for CountingListener {
    fn on_session_expired(&self, rejected_token: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.store.token_rejected(rejected_token);
    }
}

async fn logged_in_client() -> (Arc<MockAuthBackend>, Arc<SessionStore>, Arc<CountingListener>, ApiClient) {
    let backend = Arc::new(MockAuthBackend::new());
    let store = Arc::new(SessionStore::restore(Box::new(MemoryStorage::new())));
    let listener = Arc::new(CountingListener {
        store: store.clone(),
        calls: AtomicUsize::new(0),
    });
    let client = ApiClient::new("mock://backend", backend.clone(), store.clone())
        .with_expiry_listener(listener.clone());

    let login = client.login("admin@example.com", "admin123").await.unwrap();
    store
        .login(login.access_token.clone(), login.identity_or("admin@example.com"))
        .unwrap();

    (backend, store, listener, client)
}

/// Holds every request until `parties` are in flight, then rejects them all
struct GatedUnauthorized {
    barrier: Barrier,
    seen: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl Transport for GatedUnauthorized {
    async fn send(&self, request: HttpRequest) -> sesc_core::Result<HttpResponse> {
        self.seen
            .lock()
            .unwrap()
            .push(request.header("Authorization").map(str::to_string));
        self.barrier.wait().await;
        Ok(HttpResponse::json(401, &json!({"detail": "Token expired"})))
    }
}

/// Logs the store in with a new token while the old-token request is in flight
struct LateLogin {
    store: Arc<SessionStore>,
    fresh_token: String,
}

#[async_trait]
impl Transport for LateLogin {
    async fn send(&self, _request: HttpRequest) -> sesc_core::Result<HttpResponse> {
        self.store
            .login(self.fresh_token.clone(), Identity::new("admin@example.com").with_role("Admin"))
            .unwrap();
        Ok(HttpResponse::json(401, &json!({"detail": "Token expired"})))
    }
}

/// WHY: The banner and the store clear must happen once per expiry event
/// BREAKS: Duplicate banners if every failing request re-signals
#[tokio::test]
async fn concurrent_401s_signal_exactly_once() {
    let store = Arc::new(SessionStore::restore(Box::new(MemoryStorage::new())));
    store
        .login("tok-shared", Identity::new("admin@example.com").with_role("Admin"))
        .unwrap();
    let listener = Arc::new(CountingListener {
        store: store.clone(),
        calls: AtomicUsize::new(0),
    });
    let transport = Arc::new(GatedUnauthorized {
        barrier: Barrier::new(3),
        seen: Mutex::new(Vec::new()),
    });
    let client = ApiClient::new("https://api.example.com", transport.clone(), store.clone())
        .with_expiry_listener(listener.clone());

    let (a, b, c) = tokio::join!(client.get_balance(), client.get_domains(), client.get_campaigns());

    assert!(a.unwrap_err().is_session_expired());
    assert!(b.unwrap_err().is_session_expired());
    assert!(c.unwrap_err().is_session_expired());

    // All three were in flight with the same token before any 401 landed
    let seen = transport.seen.lock().unwrap().clone();
    assert_eq!(seen, vec![Some("Bearer tok-shared".to_string()); 3]);

    assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
    assert!(!store.is_authenticated());
    assert!(store.is_just_expired());
    assert_eq!(store.expiry_epoch(), 1);
}

/// WHY: A 401 answering a request sent with a replaced token must not end
/// the newer session
/// BREAKS: Fresh login wiped out by a late response for the old token
#[tokio::test]
async fn late_401_for_replaced_token_keeps_new_session() {
    let store = Arc::new(SessionStore::restore(Box::new(MemoryStorage::new())));
    store
        .login("tok-A", Identity::new("admin@example.com").with_role("Admin"))
        .unwrap();
    let listener = Arc::new(CountingListener {
        store: store.clone(),
        calls: AtomicUsize::new(0),
    });
    let transport = Arc::new(LateLogin {
        store: store.clone(),
        fresh_token: "tok-B".to_string(),
    });
    let client = ApiClient::new("https://api.example.com", transport, store.clone())
        .with_expiry_listener(listener.clone());

    let err = client.get_balance().await.unwrap_err();
    assert!(err.is_session_expired());

    assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.current_token().as_deref(), Some("tok-B"));
    assert!(store.is_authenticated());
    assert!(!store.is_just_expired());
    assert_eq!(store.expiry_epoch(), 0);
}

/// WHY: The store must already be LoggedOut when the caller handles the error
#[tokio::test]
async fn store_transitions_before_error_reaches_caller() {
    let (backend, store, _listener, client) = logged_in_client().await;
    backend.revoke_all_tokens();

    match client.get_stats("spring.csv").await {
        Err(ConsoleError::SessionExpired) => {
            assert!(!store.is_authenticated(), "store must transition before the error propagates");
        }
        other => panic!("Expected SessionExpired, got {:?}", other),
    }
}

/// WHY: After the store cleared the token, later calls go out anonymous and
/// must not re-signal for the already-reported stale token
#[tokio::test]
async fn no_automatic_retry_with_stale_token() {
    let (backend, _store, listener, client) = logged_in_client().await;
    let before = backend.request_count();
    backend.revoke_all_tokens();

    let _ = client.get_balance().await;
    assert_eq!(backend.request_count(), before + 1, "a 401 must not be retried");
    assert_eq!(listener.calls.load(Ordering::SeqCst), 1);
}

/// WHY: A fresh login re-arms the signal for the next expiry
#[tokio::test]
async fn new_token_rearms_signal() {
    let (backend, store, listener, client) = logged_in_client().await;
    backend.revoke_all_tokens();
    let _ = client.get_balance().await;

    let login = client.login("admin@example.com", "admin123").await.unwrap();
    store
        .login(login.access_token, Identity::new("admin@example.com").with_role("Admin"))
        .unwrap();
    assert!(!store.is_just_expired());
    assert!(client.get_balance().await.is_ok());

    backend.revoke_all_tokens();
    let _ = client.get_balance().await;
    assert_eq!(listener.calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.expiry_epoch(), 2);
}

/// WHY: Independent clients carry independent listeners (no global slot)
#[tokio::test]
async fn listeners_are_per_client() {
    let (backend, _store, listener, _client) = logged_in_client().await;

    let other_store = Arc::new(SessionStore::restore(Box::new(MemoryStorage::new())));
    let other_listener = Arc::new(CountingListener {
        store: other_store.clone(),
        calls: AtomicUsize::new(0),
    });
    let other = ApiClient::new("mock://backend", backend.clone(), other_store.clone())
        .with_expiry_listener(other_listener.clone());
    let login = other.login("viewer@example.com", "viewer123").await.unwrap();
    other_store
        .login(login.access_token.clone(), login.identity_or("viewer@example.com"))
        .unwrap();

    backend.revoke_all_tokens();
    assert!(other.get_balance().await.unwrap_err().is_session_expired());
    assert_eq!(other_listener.calls.load(Ordering::SeqCst), 1);
    assert_eq!(listener.calls.load(Ordering::SeqCst), 0);
}

/// WHY: A 401 with no token behind it is not a session expiry
#[tokio::test]
async fn anonymous_401_does_not_signal() {
    let (backend, store, listener, client) = logged_in_client().await;
    store.logout().unwrap();

    assert!(client.get_balance().await.unwrap_err().is_session_expired());
    assert_eq!(listener.calls.load(Ordering::SeqCst), 0);
    assert!(!store.is_just_expired());
    assert!(backend.request_count() > 0);
}
