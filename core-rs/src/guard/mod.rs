//! Route guard
//!
//! Gates protected views on every navigation. Owns no state: the decision is
//! a pure function of a [`SessionSnapshot`] and the requested route.

pub mod route_table;

pub use route_table::{RouteAccess, RouteTable};

use serde::Serialize;

use crate::config::DEFAULT_LOGIN_PATH;
use crate::rbac::PermissionChecker;
use crate::session::SessionSnapshot;

/// A navigation to a protected view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub path: String,
    /// Acceptable roles; empty = any authenticated user
    pub allowed_roles: Vec<String>,
}

impl RouteRequest {
    pub fn new(path: impl Into<String>) -> Self {
        RouteRequest {
            path: path.into(),
            allowed_roles: Vec::new(),
        }
    }

    pub fn allow<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles.extend(roles.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum GuardDecision {
    /// Session still restoring; show a neutral spinner, don't redirect yet
    Loading,
    /// Send to login, remembering where the user was going
    Redirect { to: String, from: String },
    /// Authenticated but under-privileged
    AccessDenied { user_role: String, required: Vec<String> },
    Render { path: String },
}

impl GuardDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render { .. })
    }

    /// "Manager or Admin" style label for the access-denied view
    pub fn required_roles_label(&self) -> Option<String> {
        match self {
            GuardDecision::AccessDenied { required, .. } => Some(required.join(" or ")),
            _ => None,
        }
    }
}

/// Role shown when the identity carries none
pub const NO_ROLE_LABEL: &str = "none";

#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH)
    }
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>) -> Self {
        RouteGuard {
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// # Example
    /// ```
    /// use sesc_core::guard::{GuardDecision, RouteGuard, RouteRequest};
    /// use sesc_core::session::SessionSnapshot;
    ///
    /// let logged_out = SessionSnapshot {
    ///     loading: false,
    ///     authenticated: false,
    ///     identity: None,
    ///     just_expired: false,
    /// };
    /// let decision = RouteGuard::default().evaluate(&logged_out, &RouteRequest::new("/stats"));
    /// assert_eq!(
    ///     decision,
    ///     GuardDecision::Redirect { to: "/login".to_string(), from: "/stats".to_string() }
    /// );
    /// ```
    pub fn evaluate(&self, session: &SessionSnapshot, request: &RouteRequest) -> GuardDecision {
        if session.loading {
            return GuardDecision::Loading;
        }

        if !session.authenticated {
            return GuardDecision::Redirect {
                to: self.login_path.clone(),
                from: request.path.clone(),
            };
        }

        let checker = PermissionChecker::for_role(session.role());
        if !checker.allows_any(&request.allowed_roles) {
            return GuardDecision::AccessDenied {
                user_role: session.role().unwrap_or(NO_ROLE_LABEL).to_string(),
                required: request.allowed_roles.clone(),
            };
        }

        GuardDecision::Render {
            path: request.path.clone(),
        }
    }
}
