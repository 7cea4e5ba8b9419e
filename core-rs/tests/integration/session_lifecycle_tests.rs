//! Integration tests for the session lifecycle
//!
//! Tests the store against real file storage:
//! - Restore on start (valid, corrupt, missing)
//! - Logout idempotence
//! - Expiry and re-login

use std::fs;

use sesc_core::session::{SessionStorage, TOKEN_KEY, USER_KEY};
use sesc_core::{FileStorage, Identity, SessionStore};
use tempfile::TempDir;

#[test]
fn test_session_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");

    // 1. Log in
    {
        let store = SessionStore::restore(Box::new(FileStorage::new(&path)));
        assert!(!store.is_authenticated());
        store
            .login("tok-1", Identity::new("viewer@example.com").with_role("Viewer"))
            .unwrap();
    }

    // 2. Restart restores the same identity
    let store = SessionStore::new(Box::new(FileStorage::new(&path)));
    assert!(store.is_loading());
    store.initialize();
    assert!(!store.is_loading());
    assert!(store.is_authenticated());
    assert_eq!(
        store.identity(),
        Some(Identity::new("viewer@example.com").with_role("Viewer"))
    );
}

#[test]
fn test_corrupt_identity_starts_logged_out() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    let storage = FileStorage::new(&path);
    storage.set(TOKEN_KEY, "tok-1").unwrap();
    storage.set(USER_KEY, "{\"email\": ").unwrap();

    let store = SessionStore::restore(Box::new(FileStorage::new(&path)));
    assert!(!store.is_authenticated());
    assert!(store.identity().is_none());

    // Corrupt entries were removed
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
}

#[test]
fn test_garbage_session_file_starts_logged_out() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    fs::write(&path, "\u{0}\u{1}garbage").unwrap();

    let store = SessionStore::restore(Box::new(FileStorage::new(&path)));
    assert!(!store.is_authenticated());

    // Store is still usable afterwards
    store.login("tok", Identity::new("a@b.com")).unwrap();
    assert!(store.is_authenticated());
}

#[test]
fn test_logout_twice() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    let store = SessionStore::restore(Box::new(FileStorage::new(&path)));
    store.login("tok", Identity::new("a@b.com")).unwrap();

    store.logout().unwrap();
    store.logout().unwrap();

    assert!(!store.is_authenticated());
    let storage = FileStorage::new(&path);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
}

#[test]
fn test_expire_then_login_again() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::restore(Box::new(FileStorage::new(temp_dir.path().join("s.json"))));
    store.login("tok-1", Identity::new("a@b.com")).unwrap();

    assert!(store.session_expired());
    assert!(store.is_just_expired());
    assert!(!store.is_authenticated());

    store.login("tok-2", Identity::new("a@b.com")).unwrap();
    assert!(!store.is_just_expired());
    assert!(store.is_authenticated());
}
