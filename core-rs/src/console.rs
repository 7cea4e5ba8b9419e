//! Console wiring
//!
//! Builds the object graph the UI works against: one session store shared as
//! the client's token source and expiry listener, plus the route guard and
//! route table.

use std::sync::Arc;

use tracing::info;

use crate::api::{ApiClient, ReqwestTransport, Transport};
use crate::config::ConsoleConfig;
use crate::errors::Result;
use crate::guard::{GuardDecision, RouteAccess, RouteGuard, RouteRequest, RouteTable};
use crate::notifier::{Clock, ExpiryNotifier};
use crate::session::{FileStorage, Identity, SessionStorage, SessionStore};
use crate::validation::RegistrationForm;

pub struct Console {
    config: ConsoleConfig,
    store: Arc<SessionStore>,
    client: ApiClient,
    guard: RouteGuard,
    routes: RouteTable,
}

impl Console {
    /// Wire a console over explicit storage and transport; restores any
    /// persisted session
    pub fn new(
        config: ConsoleConfig,
        storage: Box<dyn SessionStorage>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let store = Arc::new(SessionStore::restore(storage));
        let client = ApiClient::new(config.api_base_url.clone(), transport, store.clone())
            .with_auth_base(config.auth_base())
            .with_expiry_listener(store.clone());
        let guard = RouteGuard::new(config.login_path.clone());

        Console {
            config,
            store,
            client,
            guard,
            routes: RouteTable::default(),
        }
    }

    /// Production wiring: session file on disk, reqwest transport
    pub fn open(config: ConsoleConfig) -> Result<Self> {
        let storage = FileStorage::new(config.session_file());
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Ok(Self::new(config, Box::new(storage), Arc::new(transport)))
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut RouteTable {
        &mut self.routes
    }

    /// Log in against the auth service and start a session
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let response = self.client.login(email, password).await?;
        let identity = response.identity_or(email.trim());
        self.store.login(response.access_token, identity.clone())?;
        info!(email = %identity.email, "signed in");
        Ok(identity)
    }

    pub fn sign_out(&self) -> Result<()> {
        self.store.logout()
    }

    /// Validate the form, then create the account; the user still has to log in
    pub async fn register(&self, form: &RegistrationForm) -> Result<()> {
        form.validate()?;
        self.client.register(&form.email, &form.password).await?;
        info!(email = %form.email, "registered");
        Ok(())
    }

    /// Guard decision for navigating to `path`
    ///
    /// Public routes always render; paths missing from the table require
    /// authentication.
    pub fn check_route(&self, path: &str) -> GuardDecision {
        let request = match self.routes.access(path) {
            Some(RouteAccess::Public) => {
                return GuardDecision::Render {
                    path: path.to_string(),
                }
            }
            Some(_) => self.routes.request_for(path),
            None => None,
        }
        .unwrap_or_else(|| RouteRequest::new(path));

        self.guard.evaluate(&self.store.snapshot(), &request)
    }

    /// Notifier using the configured timeout
    pub fn notifier(&self, clock: Arc<dyn Clock>) -> ExpiryNotifier {
        ExpiryNotifier::with_timeout(clock, self.config.notifier_timeout())
    }
}
