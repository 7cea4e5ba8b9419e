//! Seams between the API client and whoever owns the session

/// Supplies the bearer token for outgoing requests
pub trait TokenSource: Send + Sync {
    fn current_token(&self) -> Option<String>;
}

/// Notified when the backend rejects a request with 401
///
/// Injected into each [`ApiClient`](super::ApiClient); there is no global slot.
/// `rejected_token` is the token the failed request carried, which may no
/// longer be the current one if the response arrived late.
pub trait SessionExpiryListener: Send + Sync {
    fn on_session_expired(&self, rejected_token: &str);
}

/// Fixed token, for one-off or anonymous clients
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn current_token(&self) -> Option<String> {
        self.0.clone()
    }
}
