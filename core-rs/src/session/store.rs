//! Session store
//!
//! States: LoggedOut, LoggedIn, and the JustExpired sub-flag of LoggedOut
//! (the last transition was a 401, not an explicit logout).
//!
//! All writes go through `login`, `logout` and `session_expired`. There is no
//! wall-clock expiry; the store only reacts to the API client's signal.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use super::identity::Identity;
use super::storage::{SessionStorage, TOKEN_KEY, USER_KEY};
use crate::api::{SessionExpiryListener, TokenSource};
use crate::errors::{ConsoleError, Result};

#[derive(Debug)]
struct SessionState {
    token: Option<String>,
    identity: Option<Identity>,
    loading: bool,
    just_expired: bool,
    expiry_epoch: u64,
}

/// Read-only view of the store for the route guard and UI code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub authenticated: bool,
    pub identity: Option<Identity>,
    pub just_expired: bool,
}

impl SessionSnapshot {
    /// Role of the current identity, if any
    pub fn role(&self) -> Option<&str> {
        self.identity.as_ref().and_then(|i| i.role.as_deref())
    }
}

pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Create a store in the loading state; call [`initialize`](Self::initialize)
    /// to restore persisted credentials
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        SessionStore {
            storage,
            state: RwLock::new(SessionState {
                token: None,
                identity: None,
                loading: true,
                just_expired: false,
                expiry_epoch: 0,
            }),
        }
    }

    /// Create and immediately restore from storage
    pub fn restore(storage: Box<dyn SessionStorage>) -> Self {
        let store = Self::new(storage);
        store.initialize();
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restore persisted credentials
    ///
    /// Anything short of a non-empty token plus a parseable identity leaves
    /// the store logged out. Corrupt or half-written entries are removed.
    /// Never fails.
    pub fn initialize(&self) {
        let restored = match self.read_persisted() {
            Ok(restored) => restored,
            Err(e) => {
                warn!(error = %e, "discarding persisted session");
                self.remove_persisted();
                None
            }
        };

        let mut state = self.write();
        match restored {
            Some((token, identity)) => {
                info!(email = %identity.email, "session restored");
                state.token = Some(token);
                state.identity = Some(identity);
            }
            None => {
                debug!("no persisted session");
                state.token = None;
                state.identity = None;
            }
        }
        state.loading = false;
    }

    fn read_persisted(&self) -> Result<Option<(String, Identity)>> {
        let token = self.storage.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
        let user = self.storage.get(USER_KEY)?;

        match (token, user) {
            (None, None) => Ok(None),
            (Some(token), Some(user)) => {
                let identity: Identity = serde_json::from_str(&user).map_err(|e| {
                    ConsoleError::PersistenceCorruption(format!("invalid {} entry: {}", USER_KEY, e))
                })?;
                Ok(Some((token, identity)))
            }
            (Some(_), None) => Err(ConsoleError::PersistenceCorruption(format!(
                "{} present without {}",
                TOKEN_KEY, USER_KEY
            ))),
            (None, Some(_)) => Err(ConsoleError::PersistenceCorruption(format!(
                "{} present without {}",
                USER_KEY, TOKEN_KEY
            ))),
        }
    }

    fn remove_persisted(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "failed to remove persisted entry");
            }
        }
    }

    /// Any state → LoggedIn; persists the token and full identity
    pub fn login(&self, token: impl Into<String>, identity: Identity) -> Result<()> {
        let token = token.into();
        if token.is_empty() {
            return Err(ConsoleError::Validation("Token cannot be empty".to_string()));
        }

        let user = serde_json::to_string(&identity)?;
        self.storage.set(TOKEN_KEY, &token)?;
        self.storage.set(USER_KEY, &user)?;

        let mut state = self.write();
        info!(email = %identity.email, role = ?identity.role, "logged in");
        state.token = Some(token);
        state.identity = Some(identity);
        state.just_expired = false;
        state.loading = false;
        Ok(())
    }

    /// Any state → LoggedOut; idempotent
    ///
    /// In-memory state is cleared even if removing the persisted entries fails.
    pub fn logout(&self) -> Result<()> {
        {
            let mut state = self.write();
            if state.token.is_some() {
                info!("logged out");
            }
            state.token = None;
            state.identity = None;
        }

        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        Ok(())
    }

    /// LoggedIn → LoggedOut with JustExpired raised
    ///
    /// Returns false (and changes nothing) when already logged out, so
    /// repeated signals for the same event are harmless.
    pub fn session_expired(&self) -> bool {
        self.expire_if(|_| true)
    }

    /// Expire the session only if `rejected` is still the current token
    ///
    /// A 401 for a token that has since been replaced by a fresh login is
    /// stale and leaves the newer session alone.
    pub fn token_rejected(&self, rejected: &str) -> bool {
        self.expire_if(|current| current == rejected)
    }

    fn expire_if(&self, matches: impl FnOnce(&str) -> bool) -> bool {
        {
            let mut state = self.write();
            let Some(current) = state.token.as_deref() else {
                debug!("expiry signal while logged out, ignoring");
                return false;
            };
            if !matches(current) {
                debug!("401 for a replaced token, keeping current session");
                return false;
            }
            state.token = None;
            state.identity = None;
            state.just_expired = true;
            state.expiry_epoch += 1;
            warn!(epoch = state.expiry_epoch, "session expired");
        }

        self.remove_persisted();
        true
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn is_just_expired(&self) -> bool {
        self.read().just_expired
    }

    /// Number of expiry events seen by this store
    pub fn expiry_epoch(&self) -> u64 {
        self.read().expiry_epoch
    }

    /// Lower the JustExpired flag (notifier hid the banner)
    pub fn clear_expired_flag(&self) {
        self.write().just_expired = false;
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            loading: state.loading,
            authenticated: state.token.is_some(),
            identity: state.identity.clone(),
            just_expired: state.just_expired,
        }
    }
}

impl TokenSource for SessionStore {
    fn current_token(&self) -> Option<String> {
        self.read().token.clone()
    }
}

impl SessionExpiryListener for SessionStore {
    fn on_session_expired(&self, rejected_token: &str) {
        self.token_rejected(rejected_token);
    }
}
