//! In-process stand-in for the campaign backend
//!
//! Implements [`Transport`] over a hardcoded user table so the console can
//! run offline and tests can drive real client code. Tokens it issues can be
//! revoked to simulate the backend expiring a session.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use super::transport::{Body, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::errors::Result;
use crate::rbac::Role;

#[derive(Debug, Clone)]
struct MockUser {
    id: u64,
    email: String,
    password: String,
    name: Option<String>,
    role: Role,
}

impl MockUser {
    /// Public view: never includes the password
    fn to_json(&self) -> JsonValue {
        let mut user = json!({
            "email": self.email,
            "role": self.role.as_str(),
        });
        if let Some(name) = &self.name {
            user["displayName"] = json!(name);
        }
        user
    }
}

#[derive(Debug)]
struct MockState {
    users: Vec<MockUser>,
    issued: HashSet<String>,
    next_token: u64,
    next_domain_id: u64,
}

pub struct MockAuthBackend {
    state: Mutex<MockState>,
    requests: AtomicUsize,
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuthBackend {
    /// Backend seeded with one user per role
    pub fn new() -> Self {
        let seed = [
            ("admin@example.com", "admin123", "Admin User", Role::Admin),
            ("manager@example.com", "manager123", "Manager User", Role::Manager),
            ("viewer@example.com", "viewer123", "Viewer User", Role::Viewer),
        ];
        let users = seed
            .iter()
            .enumerate()
            .map(|(idx, (email, password, name, role))| MockUser {
                id: idx as u64 + 1,
                email: email.to_string(),
                password: password.to_string(),
                name: Some(name.to_string()),
                role: *role,
            })
            .collect();

        MockAuthBackend {
            state: Mutex::new(MockState {
                users,
                issued: HashSet::new(),
                next_token: 1,
                next_domain_id: 100,
            }),
            requests: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Invalidate every issued token; the next authenticated call gets 401
    pub fn revoke_all_tokens(&self) {
        self.state().issued.clear();
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let path = request.path();
        match (request.method, path) {
            (HttpMethod::Post, p) if p.ends_with("/auth/login") => self.login(request),
            (HttpMethod::Post, p) if p.ends_with("/auth/register") => self.register(request),
            _ => {
                if !self.is_authorized(request) {
                    return HttpResponse::json(401, &json!({"detail": "Not authenticated"}));
                }
                self.protected(request.method, path, request)
            }
        }
    }

    fn is_authorized(&self, request: &HttpRequest) -> bool {
        request
            .header("Authorization")
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|token| self.state().issued.contains(token))
            .unwrap_or(false)
    }

    fn login(&self, request: &HttpRequest) -> HttpResponse {
        let Body::Form(fields) = &request.body else {
            return HttpResponse::json(422, &json!({"detail": "Expected form body"}));
        };
        let field = |name: &str| {
            fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .unwrap_or("")
        };
        let (email, password) = (field("username"), field("password"));

        let mut state = self.state();
        let Some(user) = state
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned()
        else {
            return HttpResponse::json(401, &json!({"detail": "Invalid email or password"}));
        };

        let token = format!("mock-{}-{}", user.id, state.next_token);
        state.next_token += 1;
        state.issued.insert(token.clone());

        HttpResponse::json(
            200,
            &json!({
                "access_token": token,
                "token_type": "bearer",
                "user": user.to_json(),
            }),
        )
    }

    fn register(&self, request: &HttpRequest) -> HttpResponse {
        let Body::Json(body) = &request.body else {
            return HttpResponse::json(422, &json!({"detail": "Expected JSON body"}));
        };
        let email = body.get("email").and_then(JsonValue::as_str).unwrap_or("");
        let password = body.get("password").and_then(JsonValue::as_str).unwrap_or("");
        if email.is_empty() || password.is_empty() {
            return HttpResponse::json(422, &json!({"detail": "email and password are required"}));
        }

        let mut state = self.state();
        if state.users.iter().any(|u| u.email == email) {
            return HttpResponse::json(409, &json!({"detail": "User with this email already exists"}));
        }

        let user = MockUser {
            id: state.users.len() as u64 + 1,
            email: email.to_string(),
            password: password.to_string(),
            name: None,
            role: Role::Viewer,
        };
        let public = user.to_json();
        state.users.push(user);
        HttpResponse::json(201, &public)
    }

    fn protected(&self, method: HttpMethod, path: &str, request: &HttpRequest) -> HttpResponse {
        match (method, path) {
            (HttpMethod::Get, p) if p.ends_with("/balance") => {
                HttpResponse::json(200, &json!({"balance": 100}))
            }
            (HttpMethod::Get, p) if p.ends_with("/campaigns") => HttpResponse::json(200, &json!([])),
            (HttpMethod::Get, p) if p.ends_with("/stats") => {
                let file_name = request.query_param("fileName").unwrap_or_default();
                let file_name = urlencoding::decode(file_name)
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| file_name.to_string());
                HttpResponse::json(
                    200,
                    &json!({
                        "SentCount": 0,
                        "OpenCount": 0,
                        "ClickCount": 0,
                        "BounceCount": 0,
                        "FileName": file_name,
                    }),
                )
            }
            (HttpMethod::Get, p) if p.ends_with("/domains") => HttpResponse::json(
                200,
                &json!([
                    {"id": 1, "domain": "example.com", "status": "verified"},
                    {"id": 2, "domain": "test.org", "status": "pending"},
                ]),
            ),
            (HttpMethod::Post, p) if p.ends_with("/domains/verify") => {
                let domain = match &request.body {
                    Body::Json(body) => body.get("domain").and_then(JsonValue::as_str).unwrap_or(""),
                    _ => "",
                };
                let mut state = self.state();
                let id = state.next_domain_id;
                state.next_domain_id += 1;
                HttpResponse::json(200, &json!({"id": id, "domain": domain, "status": "pending"}))
            }
            (HttpMethod::Post, p) if p.ends_with("/upload") => HttpResponse::json(
                200,
                &json!({"uploadURL": "https://mock-bucket.s3.amazonaws.com/upload?X-Amz-Signature=mock"}),
            ),
            _ => HttpResponse::json(404, &json!({"detail": "Not Found"})),
        }
    }
}

#[async_trait]
impl Transport for MockAuthBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.handle(&request))
    }
}
