// Persisted Layout Contract Tests
//
// Durable storage holds exactly two keys: `auth_token` (raw token string)
// and `user` (JSON identity). The transient expiry flag is never persisted.

use std::fs;

use serde_json::Value;
use sesc_core::session::{TOKEN_KEY, USER_KEY};
use sesc_core::{FileStorage, Identity, SessionStore};
use tempfile::TempDir;

#[test]
fn key_names_are_stable() {
    assert_eq!(TOKEN_KEY, "auth_token");
    assert_eq!(USER_KEY, "user");
}

#[test]
fn logged_in_file_layout() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    let store = SessionStore::restore(Box::new(FileStorage::new(&path)));

    store
        .login(
            "tok-abc",
            Identity::new("manager@example.com")
                .with_display_name("Manager User")
                .with_role("Manager"),
        )
        .unwrap();

    let file: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let entries = file.as_object().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["auth_token"], "tok-abc");

    // Identity is stored as a JSON string, role included
    let user: Value = serde_json::from_str(entries["user"].as_str().unwrap()).unwrap();
    assert_eq!(user["email"], "manager@example.com");
    assert_eq!(user["role"], "Manager");
    assert_eq!(user["displayName"], "Manager User");
}

/// WHY: The expiry flag is transient; a restart must not replay the banner
#[test]
fn expiry_flag_not_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    let store = SessionStore::restore(Box::new(FileStorage::new(&path)));
    store.login("tok", Identity::new("a@b.com")).unwrap();
    store.session_expired();

    let file: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(file.as_object().unwrap().is_empty());

    let restarted = SessionStore::restore(Box::new(FileStorage::new(&path)));
    assert!(!restarted.is_just_expired());
    assert!(!restarted.is_authenticated());
}

/// WHY: Older sessions persisted only `{ email }`; they restore without a role
#[test]
fn minimal_identity_restores_as_no_role() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    fs::write(
        &path,
        r#"{"auth_token":"tok-old","user":"{\"email\":\"old@example.com\"}"}"#,
    )
    .unwrap();

    let store = SessionStore::restore(Box::new(FileStorage::new(&path)));
    assert!(store.is_authenticated());
    let snapshot = store.snapshot();
    assert_eq!(snapshot.role(), None);
}
