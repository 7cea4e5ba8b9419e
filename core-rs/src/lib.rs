//! # SESC Core - session core for the SES campaign console
//!
//! The console is a set of CRUD screens over a remote campaign API. This
//! crate holds the part with actual state: who is logged in, what they may
//! see, and what happens when the backend stops accepting their token.
//!
//! ## Components
//!
//! - `rbac`: role hierarchy (Admin > Manager > Viewer) and capability checks
//! - `api`: bearer-token client; a 401 signals session expiry exactly once
//! - `session`: token + identity store, persisted and restored at startup
//! - `guard`: loading / redirect / access-denied / render per navigation
//! - `notifier`: auto-hiding "session expired" banner with an injected clock
//!
//! ## Flow
//!
//! ```text
//!  page action ──► ApiClient ──401──► SessionStore::session_expired()
//!                                          │
//!                      ┌───────────────────┴──────────────┐
//!                      ▼                                  ▼
//!                RouteGuard: Redirect(/login)    ExpiryNotifier: Visible (5s)
//! ```

pub mod errors;
pub mod config;
pub mod validation;
pub mod rbac;
pub mod api;
pub mod session;
pub mod guard;
pub mod notifier;
pub mod console;

pub use errors::{ConsoleError, Result};
pub use config::ConsoleConfig;
pub use rbac::{can_access, role_level, PermissionChecker, Role, RolePermissions};
pub use api::{ApiClient, MockAuthBackend, SessionExpiryListener, TokenSource, Transport};
pub use session::{FileStorage, Identity, MemoryStorage, SessionSnapshot, SessionStorage, SessionStore};
pub use guard::{GuardDecision, RouteGuard, RouteRequest, RouteTable};
pub use notifier::{BannerState, Clock, ExpiryNotifier, ManualClock, SystemClock};
pub use console::Console;
pub use validation::RegistrationForm;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
