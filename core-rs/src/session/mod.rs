//! Session module
//!
//! Process-wide authentication state: bearer token plus user identity,
//! persisted through a [`SessionStorage`] backend and restored at startup.

pub mod identity;
pub mod storage;
pub mod store;

pub use identity::Identity;
pub use storage::{FileStorage, MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};
pub use store::{SessionSnapshot, SessionStore};
