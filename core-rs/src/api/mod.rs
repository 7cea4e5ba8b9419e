//! API module
//!
//! Bearer-token client for the campaign backend, the transport it sends
//! through, and the seams ([`TokenSource`], [`SessionExpiryListener`]) that
//! connect it to the session store without a global callback slot.

pub mod client;
pub mod events;
pub mod mock;
pub mod models;
pub mod transport;

pub use client::ApiClient;
pub use events::{SessionExpiryListener, StaticToken, TokenSource};
pub use mock::MockAuthBackend;
pub use models::{
    CampaignStats, CampaignSummary, CampaignTotals, DomainRecord, DomainStatus, LoginResponse,
};
pub use transport::{Body, HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
