//! Static route visibility table read by the route guard.
//!
//! Routes are tagged explicitly at startup instead of being discovered from
//! handler annotations:
//! - a **controller** tag covers every route under a path prefix
//!   (whole segments only; the longest prefix wins when controllers nest)
//! - a **handler** tag covers exactly one `(method, route path)` pair and
//!   overrides its controller
//! - anything untagged requires authentication

use std::collections::HashMap;

use axum::http::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    handlers: HashMap<Method, HashMap<String, Visibility>>,
    controllers: Vec<(String, Visibility)>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Effective visibility of `path` (a route template such as `/api/v1/users/{id}`).
    pub fn resolve(&self, method: &Method, path: &str) -> Visibility {
        let path = normalize(path);

        self.handler_visibility(method, &path)
            .or_else(|| self.controller_visibility(&path))
            .unwrap_or(Visibility::Protected)
    }

    fn handler_visibility(&self, method: &Method, path: &str) -> Option<Visibility> {
        let lookup = |m: &Method| self.handlers.get(m).and_then(|paths| paths.get(path)).copied();

        // axum serves HEAD through the GET handler
        lookup(method).or_else(|| {
            if *method == Method::HEAD {
                lookup(&Method::GET)
            } else {
                None
            }
        })
    }

    fn controller_visibility(&self, path: &str) -> Option<Visibility> {
        self.controllers
            .iter()
            .filter(|(prefix, _)| covers(prefix, path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, visibility)| *visibility)
    }
}

#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    table: RouteTable,
}

impl RouteTableBuilder {
    /// Tag every route under `prefix`. Re-tagging the same prefix replaces the old tag.
    pub fn controller(mut self, prefix: &str, visibility: Visibility) -> Self {
        let prefix = normalize(prefix);
        self.table.controllers.retain(|(p, _)| *p != prefix);
        self.table.controllers.push((prefix, visibility));
        self
    }

    pub fn handler(mut self, method: Method, path: &str, visibility: Visibility) -> Self {
        self.table
            .handlers
            .entry(method)
            .or_default()
            .insert(normalize(path), visibility);
        self
    }

    pub fn build(self) -> RouteTable {
        self.table
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

// Both sides are normalized; "/" covers everything.
fn covers(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
