//! Console routes and their role requirements

use super::RouteRequest;
use crate::rbac::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Reachable without a session (login, register)
    Public,
    /// Any authenticated user
    Authenticated,
    /// At least one of these roles
    Roles(Vec<Role>),
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<(String, RouteAccess)>,
}

impl Default for RouteTable {
    /// The console's navigation
    fn default() -> Self {
        let mut table = RouteTable { routes: Vec::new() };
        table
            .add("/login", RouteAccess::Public)
            .add("/register", RouteAccess::Public)
            .add("/", RouteAccess::Authenticated)
            .add("/profile", RouteAccess::Authenticated)
            .add("/domains", RouteAccess::Roles(vec![Role::Manager]))
            .add("/compose", RouteAccess::Roles(vec![Role::Manager]))
            .add("/contacts", RouteAccess::Roles(vec![Role::Manager]))
            .add("/stats", RouteAccess::Roles(vec![Role::Viewer]))
            .add("/users", RouteAccess::Roles(vec![Role::Admin]));
        table
    }
}

impl RouteTable {
    pub fn empty() -> Self {
        RouteTable { routes: Vec::new() }
    }

    /// Register (or replace) a route
    pub fn add(&mut self, path: impl Into<String>, access: RouteAccess) -> &mut Self {
        let path = path.into();
        match self.routes.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = access,
            None => self.routes.push((path, access)),
        }
        self
    }

    /// Access rule for a path; trailing slashes and query strings are ignored
    pub fn access(&self, path: &str) -> Option<&RouteAccess> {
        let normalized = normalize(path);
        self.routes
            .iter()
            .find(|(p, _)| *p == normalized)
            .map(|(_, access)| access)
    }

    /// Guard request for a path, or None for public and unknown routes
    pub fn request_for(&self, path: &str) -> Option<RouteRequest> {
        match self.access(path)? {
            RouteAccess::Public => None,
            RouteAccess::Authenticated => Some(RouteRequest::new(normalize(path))),
            RouteAccess::Roles(roles) => Some(
                RouteRequest::new(normalize(path)).allow(roles.iter().map(|r| r.as_str())),
            ),
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(p, _)| p.as_str())
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
